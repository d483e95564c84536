// src/main.rs
mod config;
mod db;
mod dtos;
mod errors;
mod handlers;
mod middleware;
mod models;
mod repositories;
mod services;

use std::env;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use log::{error, info};

use crate::db::Db;
use crate::errors::ApiError;
use crate::handlers::admin_handlers::{
    approve, approved_admins, delete_admin, pending_users, reject,
};
use crate::handlers::auth_handlers::{
    check_approval, create_pending_user, create_user, setup_super_admin,
};
use crate::handlers::jenis_paket_handlers::{
    create_jenis_paket, delete_jenis_paket, get_jenis_paket, list_jenis_paket,
    update_jenis_paket,
};
use crate::handlers::makanan_handlers::{
    create_makanan, delete_makanan, get_makanan, list_makanan, update_makanan,
};
use crate::services::session::SessionVerifier;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    dotenv::dotenv().ok();

    let pg_pool = match config::get_pg_pool() {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to create PG pool: {}", e);
            std::process::exit(1);
        }
    };

    let retry = config::get_retry_policy();
    info!(
        "database retry policy: max {} attempts, base delay {:?}",
        retry.max_attempts, retry.base_delay
    );

    let state = web::Data::new(AppState {
        db: Db::new(pg_pool, retry),
    });
    let verifier_data = web::Data::new(SessionVerifier::new_from_env());

    let allowed_origins = env::var("ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".into());

    let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let bind_address = format!("0.0.0.0:{}", port);

    info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                "authorization",
                "content-type",
                "accept",
                "x-requested-with",
            ])
            .supports_credentials()
            .max_age(3600);

        for origin in allowed_origins.split(',').map(|s| s.trim()).filter(|s| !s.is_empty()) {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(state.clone())
            .app_data(verifier_data.clone())
            // body JSON rusak juga dijawab {"error": "..."}
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                ApiError::BadRequest(err.to_string()).into()
            }))
            .service(
                web::scope("/api/auth")
                    .service(check_approval)       // POST /api/auth/check-approval
                    .service(create_pending_user)  // POST /api/auth/create-pending-user
                    .service(create_user)          // POST /api/auth/create-user
                    .service(setup_super_admin),   // POST /api/auth/setup-super-admin
            )
            .service(
                web::scope("/api/admin")
                    .service(approve)              // POST /api/admin/approve
                    .service(reject)               // POST /api/admin/reject
                    .service(delete_admin)         // POST /api/admin/delete
                    .service(pending_users)        // GET  /api/admin/pending-users
                    .service(approved_admins),     // GET  /api/admin/approved-admins
            )
            .service(
                web::scope("/api/jenis-paket")
                    .service(list_jenis_paket)     // GET    /api/jenis-paket
                    .service(create_jenis_paket)   // POST   /api/jenis-paket
                    .service(get_jenis_paket)      // GET    /api/jenis-paket/{id}
                    .service(update_jenis_paket)   // PUT    /api/jenis-paket/{id}
                    .service(delete_jenis_paket),  // DELETE /api/jenis-paket/{id}
            )
            .service(
                web::scope("/api/makanan")
                    .service(list_makanan)         // GET    /api/makanan
                    .service(create_makanan)       // POST   /api/makanan
                    .service(get_makanan)          // GET    /api/makanan/{id}
                    .service(update_makanan)       // PUT    /api/makanan/{id}
                    .service(delete_makanan),      // DELETE /api/makanan/{id}
            )
    })
    .bind(&bind_address)?
    .run()
    .await
}
