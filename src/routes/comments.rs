use actix_web::{HttpResponse, Responder, post, web};
use actix_web_flash_messages::FlashMessage;
use chrono::Utc;

use crate::domain::types::{CommentId, PostId};
use crate::forms::comments::{CommentForm, CommentFormPayload};
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::redirect;
use crate::services::ServiceError;
use crate::services::comments::{
    add_comment as add_comment_service, delete_comment as delete_comment_service,
    update_comment as update_comment_service,
};

fn post_url(post_id: i32) -> String {
    format!("/posts/{post_id}")
}

#[post("/posts/{post_id}/comment")]
pub async fn add_comment(
    post_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<CommentForm>,
) -> impl Responder {
    let raw_id = post_id.into_inner();
    let Ok(post_id) = PostId::new(raw_id) else {
        return HttpResponse::NotFound().finish();
    };

    let payload: CommentFormPayload = match form.into_inner().try_into() {
        Ok(payload) => payload,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&post_url(raw_id));
        }
    };

    let now = Utc::now().naive_utc();
    match add_comment_service(post_id, payload, &user, now, repo.get_ref()) {
        Ok(_) => {
            FlashMessage::success("Комментарий добавлен").send();
            redirect(&post_url(raw_id))
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Публикация не существует").send();
            redirect("/")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&post_url(raw_id))
        }
        Err(err) => {
            log::error!("Failed to add comment: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/posts/{post_id}/comments/{comment_id}/edit")]
pub async fn update_comment(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<CommentForm>,
) -> impl Responder {
    let (raw_post_id, raw_comment_id) = path.into_inner();
    let Ok(comment_id) = CommentId::new(raw_comment_id) else {
        return HttpResponse::NotFound().finish();
    };

    let payload: CommentFormPayload = match form.into_inner().try_into() {
        Ok(payload) => payload,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&post_url(raw_post_id));
        }
    };

    match update_comment_service(comment_id, payload, &user, repo.get_ref()) {
        Ok(()) => {
            FlashMessage::success("Комментарий обновлён").send();
            redirect(&post_url(raw_post_id))
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Вы не автор этого комментария").send();
            redirect(&post_url(raw_post_id))
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Комментарий не существует").send();
            redirect(&post_url(raw_post_id))
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&post_url(raw_post_id))
        }
        Err(err) => {
            log::error!("Failed to update comment: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/posts/{post_id}/comments/{comment_id}/delete")]
pub async fn delete_comment(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (raw_post_id, raw_comment_id) = path.into_inner();
    let Ok(comment_id) = CommentId::new(raw_comment_id) else {
        return HttpResponse::NotFound().finish();
    };

    match delete_comment_service(comment_id, &user, repo.get_ref()) {
        Ok(()) => {
            FlashMessage::success("Комментарий удалён").send();
            redirect(&post_url(raw_post_id))
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Вы не автор этого комментария").send();
            redirect(&post_url(raw_post_id))
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Комментарий не существует").send();
            redirect(&post_url(raw_post_id))
        }
        Err(err) => {
            log::error!("Failed to delete comment: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
