use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Utc;
use serde::Deserialize;
use tera::Tera;

use crate::forms::users::{UserEditForm, UserEditFormPayload};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::profiles::{
    show_profile as show_profile_service, update_profile as update_profile_service,
};

#[derive(Deserialize)]
struct ProfileQueryParams {
    page: Option<usize>,
}

#[get("/profile/{username}")]
pub async fn show_profile(
    username: web::Path<String>,
    params: web::Query<ProfileQueryParams>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let page = params.page.unwrap_or(1);
    let now = Utc::now().naive_utc();

    match show_profile_service(
        &username,
        user.as_ref(),
        page,
        server_config.items_per_page,
        now,
        repo.get_ref(),
    ) {
        Ok((profile, posts)) => {
            let is_owner = user.as_ref().is_some_and(|u| profile.id == u.id);
            let mut context = base_context(&flash_messages, user.as_ref(), "profile");
            context.insert("profile", &profile);
            context.insert("full_name", &profile.full_name());
            context.insert("posts", &posts);
            context.insert("is_owner", &is_owner);
            render_template(&tera, "blog/profile.html", &context)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Пользователь не существует").send();
            redirect("/")
        }
        Err(ServiceError::Configuration(message)) => HttpResponse::BadRequest().body(message),
        Err(err) => {
            log::error!("Failed to render profile: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/profile/{username}/edit")]
pub async fn edit_profile_form(
    username: web::Path<String>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let username = username.into_inner();
    // Denied edits bounce to the actor's own profile.
    if username != user.username {
        FlashMessage::error("Это не ваш профиль").send();
        return redirect(&format!("/profile/{}", user.username));
    }

    let mut context = base_context(&flash_messages, Some(&user), "edit_profile");
    render_template(&tera, "blog/profile_edit.html", &context)
}

#[post("/profile/{username}/edit")]
pub async fn update_profile(
    req: HttpRequest,
    username: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<UserEditForm>,
) -> impl Responder {
    let username = username.into_inner();

    let payload: UserEditFormPayload = match form.into_inner().try_into() {
        Ok(payload) => payload,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&format!("/profile/{username}/edit"));
        }
    };

    let new_username = payload.username.to_string();
    let updated_claims = AuthenticatedUser {
        id: user.id,
        username: new_username.clone(),
        name: format!("{} {}", payload.first_name, payload.last_name)
            .trim()
            .to_string(),
        email: payload.email.to_string(),
    };

    match update_profile_service(&username, payload, &user, repo.get_ref()) {
        Ok(()) => {
            // Refresh the session so the navbar shows the new username
            // immediately.
            match serde_json::to_string(&updated_claims) {
                Ok(claims) => {
                    if let Err(e) = Identity::login(&req.extensions(), claims) {
                        log::error!("Failed to refresh session after profile update: {e}");
                    }
                }
                Err(e) => log::error!("Failed to serialize session claims: {e}"),
            }
            FlashMessage::success("Профиль обновлён").send();
            redirect(&format!("/profile/{new_username}"))
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Это не ваш профиль").send();
            redirect(&format!("/profile/{}", user.username))
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Пользователь не существует").send();
            redirect("/")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&format!("/profile/{username}/edit"))
        }
        Err(err) => {
            log::error!("Failed to update profile: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
