// src/handlers/jenis_paket_handlers.rs
use actix_web::{HttpResponse, delete, get, post, put, web};
use log::info;
use serde_json::json;

use crate::AppState;
use crate::dtos::katalog::JenisPaketInput;
use crate::errors::ApiError;
use crate::handlers::{parse_id, required_field};
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::repositories::katalog_repository::{DeleteJenisPaketOutcome, KatalogRepository};

/// GET /api/jenis-paket - semua paket plus jumlah makanan per paket.
#[get("")]
pub async fn list_jenis_paket(
    state: web::Data<AppState>,
    _session: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let paket = KatalogRepository::list_jenis_paket(&state.db).await?;
    Ok(HttpResponse::Ok().json(paket))
}

/// POST /api/jenis-paket
#[post("")]
pub async fn create_jenis_paket(
    state: web::Data<AppState>,
    _session: AuthenticatedUser,
    body: web::Json<JenisPaketInput>,
) -> Result<HttpResponse, ApiError> {
    let nama_paket = required_field(&body.nama_paket, "Nama paket is required")?;
    let paket = KatalogRepository::create_jenis_paket(&state.db, nama_paket).await?;
    Ok(HttpResponse::Created().json(paket))
}

/// GET /api/jenis-paket/{id} - detail paket plus daftar makanannya.
#[get("/{id}")]
pub async fn get_jenis_paket(
    state: web::Data<AppState>,
    _session: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    match KatalogRepository::find_jenis_paket(&state.db, id).await? {
        Some(detail) => Ok(HttpResponse::Ok().json(detail)),
        None => Err(ApiError::NotFound("Jenis paket not found".to_string())),
    }
}

/// PUT /api/jenis-paket/{id}
#[put("/{id}")]
pub async fn update_jenis_paket(
    state: web::Data<AppState>,
    _session: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<JenisPaketInput>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    let nama_paket = required_field(&body.nama_paket, "Nama paket is required")?;
    match KatalogRepository::update_jenis_paket(&state.db, id, nama_paket).await? {
        Some(paket) => Ok(HttpResponse::Ok().json(paket)),
        None => Err(ApiError::NotFound("Jenis paket not found".to_string())),
    }
}

/// DELETE /api/jenis-paket/{id} - ditolak selama masih ada makanan terkait.
#[delete("/{id}")]
pub async fn delete_jenis_paket(
    state: web::Data<AppState>,
    _session: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    match KatalogRepository::delete_jenis_paket(&state.db, id).await? {
        DeleteJenisPaketOutcome::NotFound => {
            Err(ApiError::NotFound("Jenis paket not found".to_string()))
        }
        DeleteJenisPaketOutcome::HasMakanan(count) => {
            info!("refusing to delete jenis paket {}: {} makanan attached", id, count);
            Err(ApiError::BadRequest(
                "Cannot delete jenis paket that has associated makanan".to_string(),
            ))
        }
        DeleteJenisPaketOutcome::Deleted => Ok(HttpResponse::Ok().json(json!({
            "message": "Jenis paket deleted successfully",
        }))),
    }
}
