use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::path::Path;

use bookstore_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::{Mailer, PushService},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().expect("Failed to load configuration file");

    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );

    // outbound collaborators
    let mailer = Mailer::new(config.smtp.clone());
    let push_service = PushService::new(config.push.clone());

    let account_service = AccountService::new(pool.clone(), jwt_service.clone(), mailer.clone());
    let book_service = BookService::new(pool.clone(), config.uploads.clone());
    let cart_service = CartService::new(pool.clone());
    let order_service = OrderService::new(pool.clone(), mailer.clone());
    let review_service = ReviewService::new(pool.clone());
    let bookmark_service = BookmarkService::new(pool.clone());
    let announcement_service = AnnouncementService::new(pool.clone(), push_service.clone());

    let images_dir = Path::new(&config.uploads.root).join("images");
    std::fs::create_dir_all(&images_dir).expect("Failed to create image upload directory");

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    let server_config = config.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .app_data(web::Data::new(account_service.clone()))
            .app_data(web::Data::new(book_service.clone()))
            .app_data(web::Data::new(cart_service.clone()))
            .app_data(web::Data::new(order_service.clone()))
            .app_data(web::Data::new(review_service.clone()))
            .app_data(web::Data::new(bookmark_service.clone()))
            .app_data(web::Data::new(announcement_service.clone()))
            .configure(swagger_config)
            .service(actix_files::Files::new(
                "/images",
                Path::new(&server_config.uploads.root).join("images"),
            ))
            .service(
                web::scope("/api")
                    .configure(handlers::account_config)
                    .configure(handlers::book_config)
                    .configure(handlers::cart_config)
                    .configure(handlers::order_config)
                    .configure(handlers::review_config)
                    .configure(handlers::bookmark_config)
                    .configure(handlers::announcement_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
