// src/handlers/auth_handlers.rs - onboarding & resolusi status approval
use actix_web::{HttpResponse, post, web};
use log::info;
use serde_json::json;

use crate::AppState;
use crate::dtos::auth::{CreatePendingUserRequest, CreateUserRequest, SetupSuperAdminRequest};
use crate::errors::ApiError;
use crate::handlers::required_field;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::repositories::user_repository::{
    CreatePendingOutcome, SetupSuperAdminOutcome, UserRepository,
};

/// POST /api/auth/check-approval
/// Status approval untuk identitas sesi: users dulu, lalu pending_users.
#[post("/check-approval")]
pub async fn check_approval(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let status = UserRepository::approval_status(&state.db, &user.email).await?;
    Ok(HttpResponse::Ok().json(status))
}

/// POST /api/auth/create-pending-user
/// Dipanggil saat sign-in pertama dari identitas yang belum dikenal,
/// sebelum ada sesi yang berguna untuk API ini - jadi tanpa guard.
#[post("/create-pending-user")]
pub async fn create_pending_user(
    state: web::Data<AppState>,
    body: web::Json<CreatePendingUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let email = required_field(&body.email, "Missing required fields")?;
    let name = required_field(&body.name, "Missing required fields")?;
    let auth_provider = required_field(&body.auth_provider, "Missing required fields")?;

    info!("creating pending user {} via {}", email, auth_provider);

    let outcome = match UserRepository::create_pending_user(&state.db, email, name, auth_provider)
        .await
    {
        Ok(outcome) => outcome,
        // insert kalah balapan dengan request lain untuk email yang sama
        Err(err) if err.is_unique_violation() => {
            return Err(ApiError::Conflict("User already pending approval".to_string()));
        }
        Err(err) => return Err(err.into()),
    };

    match outcome {
        CreatePendingOutcome::ExistsAsUser => {
            Err(ApiError::Conflict("User already exists".to_string()))
        }
        CreatePendingOutcome::ExistsAsPending => Err(ApiError::Conflict(
            "User already pending approval".to_string(),
        )),
        CreatePendingOutcome::Created(pending) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "message": "Pending user created successfully",
            "pendingUser": pending,
        }))),
    }
}

/// POST /api/auth/create-user
/// Idempoten: dipanggil tiap sign-in untuk memastikan row user ada.
#[post("/create-user")]
pub async fn create_user(
    state: web::Data<AppState>,
    body: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let user_id = required_field(&body.user_id, "User ID and email are required")?;
    let email = required_field(&body.email, "User ID and email are required")?;
    let name = body.name.as_deref().map(str::trim).filter(|n| !n.is_empty());

    let (user, created) =
        UserRepository::create_user_if_absent(&state.db, user_id, email, name).await?;
    let message = if created {
        "User created successfully"
    } else {
        "User already exists"
    };
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": message,
        "user": user,
    })))
}

/// POST /api/auth/setup-super-admin
/// Bootstrap satu-satunya SUPER_ADMIN; ditolak kalau sudah ada.
#[post("/setup-super-admin")]
pub async fn setup_super_admin(
    state: web::Data<AppState>,
    _session: AuthenticatedUser,
    body: web::Json<SetupSuperAdminRequest>,
) -> Result<HttpResponse, ApiError> {
    let user_id = required_field(&body.user_id, "User ID and email are required")?;
    let email = required_field(&body.email, "User ID and email are required")?;

    match UserRepository::setup_super_admin(&state.db, user_id, email).await? {
        SetupSuperAdminOutcome::AlreadyExists => Err(ApiError::BadRequest(
            "Super admin already exists".to_string(),
        )),
        SetupSuperAdminOutcome::Promoted(user) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "User updated to super admin successfully",
            "user": user,
        }))),
        SetupSuperAdminOutcome::Created(user) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Super admin created successfully",
            "user": user,
        }))),
    }
}
