use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::auth::{LoginForm, LoginFormPayload};
use crate::forms::users::{RegistrationForm, RegistrationFormPayload};
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::auth::{login_user as login_user_service, register_user as register_user_service};

fn log_in_session(req: &HttpRequest, claims: &AuthenticatedUser) -> Result<(), ServiceError> {
    let claims = serde_json::to_string(claims).map_err(|e| {
        log::error!("Failed to serialize session claims: {e}");
        ServiceError::Internal
    })?;
    Identity::login(&req.extensions(), claims).map_err(|e| {
        log::error!("Failed to establish session: {e}");
        ServiceError::Internal
    })?;
    Ok(())
}

#[get("/auth/register")]
pub async fn register_form(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if user.is_some() {
        return redirect("/");
    }
    let context = base_context(&flash_messages, None, "register");
    render_template(&tera, "auth/register.html", &context)
}

#[post("/auth/register")]
pub async fn register(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    form: web::Form<RegistrationForm>,
) -> impl Responder {
    let payload: RegistrationFormPayload = match form.into_inner().try_into() {
        Ok(payload) => payload,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect("/auth/register");
        }
    };

    match register_user_service(payload, repo.get_ref()) {
        Ok(user) => {
            let claims = AuthenticatedUser::from(&user);
            if log_in_session(&req, &claims).is_err() {
                return HttpResponse::InternalServerError().finish();
            }
            FlashMessage::success("Добро пожаловать!").send();
            redirect(&format!("/profile/{}", user.username))
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/auth/register")
        }
        Err(err) => {
            log::error!("Failed to register user: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/auth/login")]
pub async fn login_form(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if user.is_some() {
        return redirect("/");
    }
    let context = base_context(&flash_messages, None, "login");
    render_template(&tera, "auth/login.html", &context)
}

#[post("/auth/login")]
pub async fn login(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    form: web::Form<LoginForm>,
) -> impl Responder {
    let payload: LoginFormPayload = match form.into_inner().try_into() {
        Ok(payload) => payload,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect("/auth/login");
        }
    };

    match login_user_service(payload, repo.get_ref()) {
        Ok(user) => {
            let claims = AuthenticatedUser::from(&user);
            if log_in_session(&req, &claims).is_err() {
                return HttpResponse::InternalServerError().finish();
            }
            redirect("/")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/auth/login")
        }
        Err(err) => {
            log::error!("Failed to log user in: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/auth/logout")]
pub async fn logout(identity: Option<Identity>) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    redirect("/")
}
