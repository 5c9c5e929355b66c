mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;
mod storage;
#[cfg(test)]
mod testing;
mod utils;

use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::info;
use std::sync::Arc;

use crate::config::Config;
use crate::db::{create_pool, PostgresEmployeeStore};
use crate::services::employee::EmployeeService;
use crate::storage::S3BlobStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let pool = create_pool(&config.database_url).await;
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    let s3_client = utils::s3::create_s3_client().await;
    let blobs = S3BlobStore::new(
        s3_client,
        config.s3_bucket.clone(),
        config.url_style,
        config.signed_url_ttl,
    );

    // Stores are constructed once here and injected; handlers and tests see
    // only the trait handles.
    let service = web::Data::new(EmployeeService::new(
        Arc::new(PostgresEmployeeStore::new(pool)),
        Arc::new(blobs),
        config.call_timeout,
        config.max_photo_bytes,
    ));

    info!("Starting server at {}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .service(
                web::resource("/api/employees/count")
                    .route(web::get().to(handlers::employee::count_employees)),
            )
            .service(
                web::resource("/api/employees")
                    .route(web::post().to(handlers::employee::create_employee))
                    .route(web::get().to(handlers::employee::get_employees)),
            )
            .service(
                web::resource("/api/employees/{id}")
                    .route(web::put().to(handlers::employee::update_employee))
                    .route(web::delete().to(handlers::employee::delete_employee)),
            )
    })
    .bind(config.bind_addr.as_str())?
    .run()
    .await
}
