use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Utc;
use tera::Tera;

use crate::domain::types::PostId;
use crate::forms::posts::{PostForm, parse_post_form, save_image};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::{CategoryReader, DieselRepository, LocationReader};
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::posts::{
    create_post as create_post_service, delete_post as delete_post_service,
    show_post as show_post_service, update_post as update_post_service,
};

fn post_url(post_id: i32) -> String {
    format!("/posts/{post_id}")
}

/// Category and location choices for the post form selects.
fn insert_form_choices(context: &mut tera::Context, repo: &DieselRepository) {
    match repo.list_categories() {
        Ok(categories) => context.insert("categories", &categories),
        Err(e) => {
            log::error!("Failed to list categories for post form: {e}");
            context.insert("categories", &Vec::<()>::new());
        }
    }
    match repo.list_locations() {
        Ok(locations) => context.insert("locations", &locations),
        Err(e) => {
            log::error!("Failed to list locations for post form: {e}");
            context.insert("locations", &Vec::<()>::new());
        }
    }
}

#[get("/posts/{post_id}")]
pub async fn show_post(
    post_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Ok(post_id) = PostId::new(post_id.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };
    let now = Utc::now().naive_utc();

    match show_post_service(post_id, user.as_ref(), now, repo.get_ref()) {
        Ok((post, comments)) => {
            let is_author = user.as_ref().is_some_and(|u| post.author_id == u.id);
            let mut context = base_context(&flash_messages, user.as_ref(), "post");
            context.insert("post", &post);
            context.insert("comments", &comments);
            context.insert("is_author", &is_author);
            render_template(&tera, "blog/detail.html", &context)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Публикация не существует").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to render post: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/posts/create")]
pub async fn create_post_form(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(&flash_messages, Some(&user), "create_post");
    insert_form_choices(&mut context, repo.get_ref());
    render_template(&tera, "blog/create.html", &context)
}

#[post("/posts/create")]
pub async fn create_post(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    MultipartForm(form): MultipartForm<PostForm>,
) -> impl Responder {
    let payload = match parse_post_form(&form) {
        Ok(payload) => payload,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect("/posts/create");
        }
    };

    let image = match &form.image {
        Some(file) => match save_image(file, &server_config.media_root) {
            Ok(path) => Some(path),
            Err(err) => {
                FlashMessage::error(err.to_string()).send();
                return redirect("/posts/create");
            }
        },
        None => None,
    };

    match create_post_service(payload, image, &user, repo.get_ref()) {
        Ok(post) => {
            FlashMessage::success("Публикация создана").send();
            redirect(&post_url(post.id.get()))
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/posts/create")
        }
        Err(err) => {
            log::error!("Failed to create post: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/posts/{post_id}/edit")]
pub async fn edit_post_form(
    post_id: web::Path<i32>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let raw_id = post_id.into_inner();
    let Ok(post_id) = PostId::new(raw_id) else {
        return HttpResponse::NotFound().finish();
    };
    let now = Utc::now().naive_utc();

    match show_post_service(post_id, Some(&user), now, repo.get_ref()) {
        Ok((post, _)) => {
            // Denied edits bounce to the read-only view of the same post.
            if post.author_id != user.id {
                FlashMessage::error("Вы не автор этой публикации").send();
                return redirect(&post_url(raw_id));
            }
            let mut context = base_context(&flash_messages, Some(&user), "edit_post");
            context.insert("post", &post);
            insert_form_choices(&mut context, repo.get_ref());
            render_template(&tera, "blog/create.html", &context)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Публикация не существует").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to render edit form: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/posts/{post_id}/edit")]
pub async fn update_post(
    post_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    MultipartForm(form): MultipartForm<PostForm>,
) -> impl Responder {
    let raw_id = post_id.into_inner();
    let Ok(post_id) = PostId::new(raw_id) else {
        return HttpResponse::NotFound().finish();
    };

    let payload = match parse_post_form(&form) {
        Ok(payload) => payload,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&format!("/posts/{raw_id}/edit"));
        }
    };

    let image = match &form.image {
        Some(file) => match save_image(file, &server_config.media_root) {
            Ok(path) => Some(path),
            Err(err) => {
                FlashMessage::error(err.to_string()).send();
                return redirect(&format!("/posts/{raw_id}/edit"));
            }
        },
        None => None,
    };

    match update_post_service(post_id, payload, image, &user, repo.get_ref()) {
        Ok(()) => {
            FlashMessage::success("Публикация обновлена").send();
            redirect(&post_url(raw_id))
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Вы не автор этой публикации").send();
            redirect(&post_url(raw_id))
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Публикация не существует").send();
            redirect("/")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&format!("/posts/{raw_id}/edit"))
        }
        Err(err) => {
            log::error!("Failed to update post: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/posts/{post_id}/delete")]
pub async fn delete_post(
    post_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let raw_id = post_id.into_inner();
    let Ok(post_id) = PostId::new(raw_id) else {
        return HttpResponse::NotFound().finish();
    };

    match delete_post_service(post_id, &user, repo.get_ref()) {
        Ok(()) => {
            FlashMessage::success("Публикация удалена").send();
            redirect("/")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Вы не автор этой публикации").send();
            redirect(&post_url(raw_id))
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Публикация не существует").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to delete post: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
