use serde::{Deserialize, Serialize};

/// Body POST /api/auth/create-pending-user.
/// Field dibiarkan Option supaya yang hilang bisa dijawab 400 dengan pesan
/// yang jelas, bukan error deserialisasi mentah.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePendingUserRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub auth_provider: Option<String>,
}

/// Body POST /api/auth/create-user (dipanggil saat sign-in, sebelum approval).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Body POST /api/auth/setup-super-admin.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupSuperAdminRequest {
    pub user_id: Option<String>,
    pub email: Option<String>,
}

/// Response POST /api/auth/check-approval.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalStatus {
    pub is_approved: bool,
    pub role: String,
}

/// Body POST /api/admin/approve dan /api/admin/reject.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingUserIdRequest {
    pub pending_user_id: Option<String>,
}

/// Body POST /api/admin/delete.
#[derive(Debug, Deserialize)]
pub struct DeleteAdminRequest {
    pub id: Option<String>,
}
