use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Utc;
use serde::Deserialize;
use tera::Tera;

use crate::domain::types::CategorySlug;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::categories::show_category as show_category_service;

#[derive(Deserialize)]
struct CategoryQueryParams {
    page: Option<usize>,
}

#[get("/category/{slug}")]
pub async fn show_category(
    slug: web::Path<String>,
    params: web::Query<CategoryQueryParams>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Ok(slug) = CategorySlug::new(slug.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };
    let page = params.page.unwrap_or(1);
    let now = Utc::now().naive_utc();

    match show_category_service(&slug, page, server_config.items_per_page, now, repo.get_ref()) {
        Ok((category, posts)) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "category");
            context.insert("category", &category);
            context.insert("posts", &posts);
            render_template(&tera, "blog/category.html", &context)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Категория не существует").send();
            redirect("/")
        }
        Err(ServiceError::Configuration(message)) => HttpResponse::BadRequest().body(message),
        Err(err) => {
            log::error!("Failed to render category: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
