use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use chrono::Utc;
use serde::Deserialize;
use tera::Tera;

use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, render_template};
use crate::services::ServiceError;
use crate::services::main::show_index as show_index_service;

#[derive(Deserialize)]
struct IndexQueryParams {
    page: Option<usize>,
}

#[get("/")]
pub async fn index(
    params: web::Query<IndexQueryParams>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let page = params.page.unwrap_or(1);
    let now = Utc::now().naive_utc();

    match show_index_service(page, server_config.items_per_page, now, repo.get_ref()) {
        Ok(posts) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "index");
            context.insert("posts", &posts);
            render_template(&tera, "blog/index.html", &context)
        }
        Err(ServiceError::Configuration(message)) => HttpResponse::BadRequest().body(message),
        Err(err) => {
            log::error!("Failed to render index: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
