// src/handlers/admin_handlers.rs - operasi yang hanya boleh dilakukan super admin
use actix_web::{HttpResponse, get, post, web};
use log::info;
use serde_json::json;

use crate::AppState;
use crate::db::Db;
use crate::dtos::auth::{DeleteAdminRequest, PendingUserIdRequest};
use crate::errors::ApiError;
use crate::handlers::required_field;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::repositories::user_repository::{
    ApprovalOutcome, DeleteAdminOutcome, UserRepository,
};

/// Guard: row user milik pemanggil harus ber-role SUPER_ADMIN.
async fn ensure_super_admin(db: &Db, session: &AuthenticatedUser) -> Result<(), ApiError> {
    let current = UserRepository::find_by_id(db, &session.user_id.to_string()).await?;
    match current {
        Some(user) if user.is_super_admin() => Ok(()),
        _ => Err(ApiError::Forbidden(
            "Forbidden: Super Admin access required".to_string(),
        )),
    }
}

/// POST /api/admin/approve
#[post("/approve")]
pub async fn approve(
    state: web::Data<AppState>,
    session: AuthenticatedUser,
    body: web::Json<PendingUserIdRequest>,
) -> Result<HttpResponse, ApiError> {
    ensure_super_admin(&state.db, &session).await?;
    let pending_user_id = required_field(&body.pending_user_id, "Pending user ID is required")?;

    match UserRepository::approve_pending_user(&state.db, pending_user_id).await? {
        ApprovalOutcome::PendingNotFound => {
            Err(ApiError::NotFound("Pending user not found".to_string()))
        }
        ApprovalOutcome::ApprovedExisting(user) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": format!("User {} berhasil disetujui", user.email),
            "user": user,
        }))),
        ApprovalOutcome::AlreadyApproved(user) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": format!("User {} sudah disetujui sebelumnya", user.email),
            "user": user,
        }))),
        ApprovalOutcome::ApprovedNew(user) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": format!(
                "User {} berhasil disetujui dan dipindahkan ke tabel user",
                user.email
            ),
            "user": user,
        }))),
    }
}

/// POST /api/admin/reject - buang row pending tanpa membuat user.
#[post("/reject")]
pub async fn reject(
    state: web::Data<AppState>,
    session: AuthenticatedUser,
    body: web::Json<PendingUserIdRequest>,
) -> Result<HttpResponse, ApiError> {
    ensure_super_admin(&state.db, &session).await?;
    let pending_user_id = required_field(&body.pending_user_id, "Pending user ID is required")?;

    if !UserRepository::delete_pending_user(&state.db, pending_user_id).await? {
        return Err(ApiError::NotFound("Pending user not found".to_string()));
    }
    info!("rejected pending user {}", pending_user_id);
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Pending user berhasil ditolak",
    })))
}

/// POST /api/admin/delete - hapus admin; row SUPER_ADMIN tidak bisa dihapus.
#[post("/delete")]
pub async fn delete_admin(
    state: web::Data<AppState>,
    session: AuthenticatedUser,
    body: web::Json<DeleteAdminRequest>,
) -> Result<HttpResponse, ApiError> {
    ensure_super_admin(&state.db, &session).await?;
    let id = required_field(&body.id, "User ID is required")?;

    match UserRepository::delete_admin(&state.db, id).await? {
        DeleteAdminOutcome::NotFound => Err(ApiError::NotFound("User not found".to_string())),
        DeleteAdminOutcome::IsSuperAdmin => Err(ApiError::BadRequest(
            "Cannot delete super admin".to_string(),
        )),
        DeleteAdminOutcome::Deleted => {
            info!("deleted admin {}", id);
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "message": "Admin berhasil dihapus",
            })))
        }
    }
}

/// GET /api/admin/pending-users
#[get("/pending-users")]
pub async fn pending_users(
    state: web::Data<AppState>,
    session: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    ensure_super_admin(&state.db, &session).await?;
    let pending = UserRepository::list_pending_users(&state.db).await?;
    Ok(HttpResponse::Ok().json(pending))
}

/// GET /api/admin/approved-admins
#[get("/approved-admins")]
pub async fn approved_admins(
    state: web::Data<AppState>,
    session: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    ensure_super_admin(&state.db, &session).await?;
    let admins = UserRepository::list_approved_users(&state.db).await?;
    Ok(HttpResponse::Ok().json(admins))
}
