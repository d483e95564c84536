// src/handlers/makanan_handlers.rs
use actix_web::{HttpResponse, delete, get, post, put, web};
use serde_json::json;

use crate::AppState;
use crate::dtos::katalog::MakananInput;
use crate::errors::ApiError;
use crate::handlers::parse_id;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::repositories::katalog_repository::{
    KatalogRepository, MakananWriteOutcome, NewMakanan,
};

/// Semua field wajib; `foto` dinormalisasi jadi JSON array URL di sini,
/// sebelum menyentuh database.
fn validate_makanan(input: &MakananInput) -> Result<NewMakanan, ApiError> {
    let missing = || ApiError::BadRequest("All fields are required".to_string());

    let nama_makanan = input
        .nama_makanan
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(missing)?;
    let deskripsi = input
        .deskripsi
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(missing)?;
    let foto = input.foto.as_ref().filter(|f| !f.is_empty()).ok_or_else(missing)?;
    let harga = input.harga.filter(|h| *h > 0).ok_or_else(missing)?;
    let jenis_paket_id = input.jenis_paket_id.ok_or_else(missing)?;

    Ok(NewMakanan {
        nama_makanan: nama_makanan.to_string(),
        deskripsi: deskripsi.to_string(),
        foto: foto.to_column(),
        harga,
        jenis_paket_id,
    })
}

/// GET /api/makanan - semua makanan plus jenis paketnya, terbaru dulu.
#[get("")]
pub async fn list_makanan(
    state: web::Data<AppState>,
    _session: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let makanan = KatalogRepository::list_makanan(&state.db).await?;
    Ok(HttpResponse::Ok().json(makanan))
}

/// POST /api/makanan
#[post("")]
pub async fn create_makanan(
    state: web::Data<AppState>,
    _session: AuthenticatedUser,
    body: web::Json<MakananInput>,
) -> Result<HttpResponse, ApiError> {
    let input = validate_makanan(&body)?;
    match KatalogRepository::create_makanan(&state.db, &input).await? {
        MakananWriteOutcome::JenisPaketNotFound => {
            Err(ApiError::BadRequest("Jenis paket not found".to_string()))
        }
        MakananWriteOutcome::NotFound => Err(ApiError::NotFound("Makanan not found".to_string())),
        MakananWriteOutcome::Saved(makanan) => Ok(HttpResponse::Created().json(makanan)),
    }
}

/// GET /api/makanan/{id}
#[get("/{id}")]
pub async fn get_makanan(
    state: web::Data<AppState>,
    _session: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    match KatalogRepository::find_makanan(&state.db, id).await? {
        Some(makanan) => Ok(HttpResponse::Ok().json(makanan)),
        None => Err(ApiError::NotFound("Makanan not found".to_string())),
    }
}

/// PUT /api/makanan/{id}
#[put("/{id}")]
pub async fn update_makanan(
    state: web::Data<AppState>,
    _session: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<MakananInput>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    let input = validate_makanan(&body)?;
    match KatalogRepository::update_makanan(&state.db, id, &input).await? {
        MakananWriteOutcome::JenisPaketNotFound => {
            Err(ApiError::BadRequest("Jenis paket not found".to_string()))
        }
        MakananWriteOutcome::NotFound => Err(ApiError::NotFound("Makanan not found".to_string())),
        MakananWriteOutcome::Saved(makanan) => Ok(HttpResponse::Ok().json(makanan)),
    }
}

/// DELETE /api/makanan/{id}
#[delete("/{id}")]
pub async fn delete_makanan(
    state: web::Data<AppState>,
    _session: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    if !KatalogRepository::delete_makanan(&state.db, id).await? {
        return Err(ApiError::NotFound("Makanan not found".to_string()));
    }
    Ok(HttpResponse::Ok().json(json!({
        "message": "Makanan deleted successfully",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_input() -> MakananInput {
        serde_json::from_str(
            r#"{
                "namaMakanan": "Ayam Bakar",
                "deskripsi": "Ayam bakar bumbu kecap",
                "foto": "http://x/img.png",
                "harga": 20000,
                "jenisPaketId": 3
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn validate_normalizes_bare_foto_url() {
        let input = validate_makanan(&full_input()).unwrap();
        assert_eq!(input.foto, r#"["http://x/img.png"]"#);
        assert_eq!(input.harga, 20000);
        assert_eq!(input.jenis_paket_id, 3);
    }

    #[test]
    fn validate_rejects_missing_fields() {
        let mut input = full_input();
        input.nama_makanan = None;
        let err = validate_makanan(&input).unwrap_err();
        assert_eq!(err.to_string(), "All fields are required");

        let mut input = full_input();
        input.foto = None;
        assert!(validate_makanan(&input).is_err());

        let mut input = full_input();
        input.harga = Some(0);
        assert!(validate_makanan(&input).is_err());

        let mut input = full_input();
        input.jenis_paket_id = None;
        assert!(validate_makanan(&input).is_err());
    }

    #[test]
    fn validate_rejects_blank_foto_list() {
        let mut input = full_input();
        input.foto = Some(serde_json::from_str(r#"["", " "]"#).unwrap());
        assert!(validate_makanan(&input).is_err());
    }

    #[test]
    fn validate_keeps_foto_array_order() {
        let mut input = full_input();
        input.foto = Some(serde_json::from_str(r#"["http://x/a.png","http://x/b.png"]"#).unwrap());
        let parsed = validate_makanan(&input).unwrap();
        assert_eq!(parsed.foto, r#"["http://x/a.png","http://x/b.png"]"#);
    }
}
