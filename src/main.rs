use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_flash_messages::storage::CookieMessageStore;
use tera::Tera;

use zapiski::db::establish_connection_pool;
use zapiski::models::config::ServerConfig;
use zapiski::repository::DieselRepository;
use zapiski::routes::{api, auth, categories, comments, main as blog, posts, profiles};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/settings").required(false))
        .add_source(config::Environment::with_prefix("ZAPISKI"))
        .build()
        .map_err(std::io::Error::other)?;
    let server_config: ServerConfig = settings.try_deserialize().map_err(std::io::Error::other)?;

    // Key::from panics below this length.
    if server_config.secret_key.len() < 64 {
        return Err(std::io::Error::other(
            "secret_key must be at least 64 bytes long",
        ));
    }

    let pool =
        establish_connection_pool(&server_config.database_url).map_err(std::io::Error::other)?;
    let repo = DieselRepository::new(pool);

    let tera = Tera::new("templates/**/*.html").map_err(std::io::Error::other)?;

    std::fs::create_dir_all(&server_config.media_root)?;

    let secret_key = Key::from(server_config.secret_key.as_bytes());
    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let bind_address = (server_config.bind_address.clone(), server_config.port);
    let media_root = server_config.media_root.clone();

    log::info!(
        "Starting zapiski on {}:{}",
        server_config.bind_address,
        server_config.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .app_data(web::Data::new(tera.clone()))
            .wrap(middleware::Logger::default())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(SessionMiddleware::new(
                CookieSessionStore::default(),
                secret_key.clone(),
            ))
            .service(Files::new("/media", &media_root))
            .service(blog::index)
            // `/posts/create` must be registered before `/posts/{post_id}`.
            .service(posts::create_post_form)
            .service(posts::create_post)
            .service(posts::edit_post_form)
            .service(posts::update_post)
            .service(posts::delete_post)
            .service(posts::show_post)
            .service(comments::add_comment)
            .service(comments::update_comment)
            .service(comments::delete_comment)
            .service(categories::show_category)
            .service(profiles::edit_profile_form)
            .service(profiles::update_profile)
            .service(profiles::show_profile)
            .service(auth::register_form)
            .service(auth::register)
            .service(auth::login_form)
            .service(auth::login)
            .service(auth::logout)
            .service(
                web::scope("/api")
                    .service(api::api_v1_posts)
                    .service(api::api_v1_delete_post)
                    .service(api::api_v1_delete_comment),
            )
    })
    .bind(bind_address)?
    .run()
    .await
}
