use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

mod auth;
mod config;
mod db;
mod errors;
mod filter;
mod handlers;
mod middleware;
mod models;
mod products;
mod response;
mod store;

use auth::{Argon2Encoder, AuthService, JwtTokenIssuer};
use products::ProductService;
use store::mongo::{MongoCatalogStore, MongoCredentialStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok(); // Load environment variables from .env file
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config::Config::from_env().map_err(std::io::Error::other)?;

    let db = db::connect(&config).await.map_err(std::io::Error::other)?;
    db::ensure_indexes(&db).await.map_err(std::io::Error::other)?;

    let tokens = Arc::new(JwtTokenIssuer::new(&config.jwt_secret, config.jwt_expiration_hours));
    let auth = web::Data::new(AuthService::new(
        Arc::new(MongoCredentialStore::new(&db)),
        Arc::new(Argon2Encoder),
        tokens.clone(),
    ));
    let products = web::Data::new(ProductService::new(Arc::new(MongoCatalogStore::new(&db))));

    log::info!("Listening on {}", config.bind_addr);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(auth.clone())
            .app_data(products.clone())
            .configure(handlers::extractor_config)
            .service(web::scope("/api/auth").configure(handlers::auth_routes))
            .service(
                web::scope("/api")
                    .wrap(middleware::AuthMiddleware::new(tokens.clone()))
                    .configure(handlers::catalog_routes),
            )
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
