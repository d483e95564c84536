use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_postgres::Row;

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_SUPER_ADMIN: &str = "SUPER_ADMIN";

/// Role yang dilaporkan check-approval untuk identitas yang belum jadi user.
pub const ROLE_PENDING: &str = "PENDING";
pub const ROLE_NOT_FOUND: &str = "NOT_FOUND";

/// Row tabel `users`. `id` sama dengan auth user id (Supabase),
/// kecuali untuk user yang dibuat lewat approval: id warisan dari pending user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(User {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            role: row.try_get("role")?,
            is_approved: row.try_get("is_approved")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == ROLE_SUPER_ADMIN
    }
}

/// Identitas yang sudah sign-in tapi belum disetujui super admin.
/// Dihapus begitu di-approve (pindah ke `users`) atau di-reject.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub auth_provider: String,
    pub created_at: DateTime<Utc>,
}

impl PendingUser {
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(PendingUser {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            auth_provider: row.try_get("auth_provider")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
