//! JSON API surface.
//!
//! Unlike the HTML endpoints, denied mutations here report `403 Forbidden`
//! instead of redirecting.

use actix_web::{HttpResponse, Responder, delete, get, web};
use chrono::Utc;
use log::error;
use serde::Deserialize;

use crate::domain::types::{CommentId, PostId};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::{DieselRepository, PostListQuery, PostReader};
use crate::services::ServiceError;
use crate::services::comments::delete_comment as delete_comment_service;
use crate::services::posts::delete_post as delete_post_service;

#[derive(Deserialize, Debug)]
struct ApiV1PostsQueryParams {
    page: Option<usize>,
}

#[get("/v1/posts")]
pub async fn api_v1_posts(
    params: web::Query<ApiV1PostsQueryParams>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let page = params.page.unwrap_or(1);
    let now = Utc::now().naive_utc();

    let query = PostListQuery::new()
        .published(now)
        .with_related()
        .with_comment_count()
        .paginate(page, server_config.items_per_page);

    match repo.list_posts(query) {
        Ok((_total, posts)) => HttpResponse::Ok().json(posts),
        Err(e) => {
            error!("Failed to list posts: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[delete("/v1/posts/{post_id}")]
pub async fn api_v1_delete_post(
    post_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let Ok(post_id) = PostId::new(post_id.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };

    match delete_post_service(post_id, &user, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(ServiceError::Unauthorized) => HttpResponse::Forbidden().finish(),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(e) => {
            error!("Failed to delete post: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[delete("/v1/comments/{comment_id}")]
pub async fn api_v1_delete_comment(
    comment_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let Ok(comment_id) = CommentId::new(comment_id.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };

    match delete_comment_service(comment_id, &user, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(ServiceError::Unauthorized) => HttpResponse::Forbidden().finish(),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(e) => {
            error!("Failed to delete comment: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
