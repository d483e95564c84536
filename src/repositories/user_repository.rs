// src/repositories/user_repository.rs
use log::info;
use uuid::Uuid;

use crate::db::{Db, DbError};
use crate::dtos::auth::ApprovalStatus;
use crate::models::user::{
    PendingUser, ROLE_ADMIN, ROLE_NOT_FOUND, ROLE_PENDING, ROLE_SUPER_ADMIN, User,
};

/// Hasil transisi approve. Dua statement (update/insert user + delete pending)
/// jalan dalam satu transaksi; pending row di-lock FOR UPDATE supaya dua
/// approve bersamaan untuk id yang sama tidak dobel-proses.
#[derive(Debug)]
pub enum ApprovalOutcome {
    PendingNotFound,
    ApprovedExisting(User),
    AlreadyApproved(User),
    ApprovedNew(User),
}

#[derive(Debug)]
pub enum CreatePendingOutcome {
    ExistsAsUser,
    ExistsAsPending,
    Created(PendingUser),
}

#[derive(Debug)]
pub enum SetupSuperAdminOutcome {
    AlreadyExists,
    Promoted(User),
    Created(User),
}

#[derive(Debug)]
pub enum DeleteAdminOutcome {
    NotFound,
    IsSuperAdmin,
    Deleted,
}

pub struct UserRepository;

impl UserRepository {
    pub async fn find_by_id(db: &Db, id: &str) -> Result<Option<User>, DbError> {
        db.run(|client| async move {
            let row = client
                .query_opt(
                    "SELECT id, email, name, role, is_approved, created_at, updated_at \
                     FROM users WHERE id = $1",
                    &[&id],
                )
                .await?;
            row.as_ref().map(User::from_row).transpose()
        })
        .await
    }

    /// Resolusi identitas: tabel users dulu, lalu pending_users.
    /// Error database tetap jadi error, tidak pernah dipetakan ke NOT_FOUND.
    pub async fn approval_status(db: &Db, email: &str) -> Result<ApprovalStatus, DbError> {
        db.run(|client| async move {
            let user = client
                .query_opt("SELECT is_approved, role FROM users WHERE email = $1", &[&email])
                .await?;
            if let Some(row) = user {
                return Ok(ApprovalStatus {
                    is_approved: row.try_get("is_approved")?,
                    role: row.try_get("role")?,
                });
            }

            let pending = client
                .query_opt("SELECT id FROM pending_users WHERE email = $1", &[&email])
                .await?;
            Ok(ApprovalStatus {
                is_approved: false,
                role: if pending.is_some() {
                    ROLE_PENDING.to_string()
                } else {
                    ROLE_NOT_FOUND.to_string()
                },
            })
        })
        .await
    }

    /// Email boleh ada di paling banyak satu dari {users, pending_users}.
    pub async fn create_pending_user(
        db: &Db,
        email: &str,
        name: &str,
        auth_provider: &str,
    ) -> Result<CreatePendingOutcome, DbError> {
        let generated_id = Uuid::new_v4().to_string();
        let id = generated_id.as_str();
        db.run(|client| async move {
            let existing_user = client
                .query_opt("SELECT id FROM users WHERE email = $1", &[&email])
                .await?;
            if existing_user.is_some() {
                return Ok(CreatePendingOutcome::ExistsAsUser);
            }

            let existing_pending = client
                .query_opt("SELECT id FROM pending_users WHERE email = $1", &[&email])
                .await?;
            if existing_pending.is_some() {
                return Ok(CreatePendingOutcome::ExistsAsPending);
            }

            let row = client
                .query_one(
                    "INSERT INTO pending_users (id, email, name, auth_provider) \
                     VALUES ($1, $2, $3, $4) \
                     RETURNING id, email, name, auth_provider, created_at",
                    &[&id, &email, &name, &auth_provider],
                )
                .await?;
            Ok(CreatePendingOutcome::Created(PendingUser::from_row(&row)?))
        })
        .await
    }

    /// Pastikan row user ada untuk auth id ini; dibuat belum-approved kalau
    /// belum ada. Mengembalikan `(user, created)`.
    pub async fn create_user_if_absent(
        db: &Db,
        user_id: &str,
        email: &str,
        name: Option<&str>,
    ) -> Result<(User, bool), DbError> {
        db.run(|client| async move {
            let existing = client
                .query_opt(
                    "SELECT id, email, name, role, is_approved, created_at, updated_at \
                     FROM users WHERE id = $1",
                    &[&user_id],
                )
                .await?;
            if let Some(row) = existing {
                return Ok((User::from_row(&row)?, false));
            }

            let row = client
                .query_one(
                    "INSERT INTO users (id, email, name, role, is_approved) \
                     VALUES ($1, $2, $3, $4, FALSE) \
                     RETURNING id, email, name, role, is_approved, created_at, updated_at",
                    &[&user_id, &email, &name, &ROLE_ADMIN],
                )
                .await?;
            Ok((User::from_row(&row)?, true))
        })
        .await
    }

    /// Hanya boleh ada satu SUPER_ADMIN; setup ditolak kalau sudah ada.
    pub async fn setup_super_admin(
        db: &Db,
        user_id: &str,
        email: &str,
    ) -> Result<SetupSuperAdminOutcome, DbError> {
        db.run(|client| async move {
            let existing_super = client
                .query_opt(
                    "SELECT id FROM users WHERE role = $1 LIMIT 1",
                    &[&ROLE_SUPER_ADMIN],
                )
                .await?;
            if existing_super.is_some() {
                return Ok(SetupSuperAdminOutcome::AlreadyExists);
            }

            let existing = client
                .query_opt("SELECT id FROM users WHERE id = $1", &[&user_id])
                .await?;
            if existing.is_some() {
                let row = client
                    .query_one(
                        "UPDATE users SET role = $2, is_approved = TRUE, updated_at = now() \
                         WHERE id = $1 \
                         RETURNING id, email, name, role, is_approved, created_at, updated_at",
                        &[&user_id, &ROLE_SUPER_ADMIN],
                    )
                    .await?;
                return Ok(SetupSuperAdminOutcome::Promoted(User::from_row(&row)?));
            }

            let row = client
                .query_one(
                    "INSERT INTO users (id, email, role, is_approved) \
                     VALUES ($1, $2, $3, TRUE) \
                     RETURNING id, email, name, role, is_approved, created_at, updated_at",
                    &[&user_id, &email, &ROLE_SUPER_ADMIN],
                )
                .await?;
            Ok(SetupSuperAdminOutcome::Created(User::from_row(&row)?))
        })
        .await
    }

    /// Transisi PENDING -> APPROVED dalam satu transaksi.
    pub async fn approve_pending_user(
        db: &Db,
        pending_user_id: &str,
    ) -> Result<ApprovalOutcome, DbError> {
        db.run(|mut client| async move {
            let tx = client.transaction().await?;

            let pending_row = tx
                .query_opt(
                    "SELECT id, email, name, auth_provider, created_at \
                     FROM pending_users WHERE id = $1 FOR UPDATE",
                    &[&pending_user_id],
                )
                .await?;
            let pending = match pending_row {
                Some(row) => PendingUser::from_row(&row)?,
                None => return Ok(ApprovalOutcome::PendingNotFound),
            };

            let existing_row = tx
                .query_opt(
                    "SELECT id, email, name, role, is_approved, created_at, updated_at \
                     FROM users WHERE email = $1",
                    &[&pending.email],
                )
                .await?;

            let outcome = match existing_row {
                Some(row) => {
                    let existing = User::from_row(&row)?;
                    if existing.is_approved {
                        tx.execute("DELETE FROM pending_users WHERE id = $1", &[&pending.id])
                            .await?;
                        ApprovalOutcome::AlreadyApproved(existing)
                    } else {
                        let updated = tx
                            .query_one(
                                "UPDATE users SET is_approved = TRUE, updated_at = now() \
                                 WHERE id = $1 \
                                 RETURNING id, email, name, role, is_approved, created_at, updated_at",
                                &[&existing.id],
                            )
                            .await?;
                        tx.execute("DELETE FROM pending_users WHERE id = $1", &[&pending.id])
                            .await?;
                        ApprovalOutcome::ApprovedExisting(User::from_row(&updated)?)
                    }
                }
                None => {
                    // id pending dipakai ulang sebagai primary key user baru
                    let created = tx
                        .query_one(
                            "INSERT INTO users (id, email, name, role, is_approved) \
                             VALUES ($1, $2, $3, $4, TRUE) \
                             RETURNING id, email, name, role, is_approved, created_at, updated_at",
                            &[&pending.id, &pending.email, &pending.name, &ROLE_ADMIN],
                        )
                        .await?;
                    tx.execute("DELETE FROM pending_users WHERE id = $1", &[&pending.id])
                        .await?;
                    ApprovalOutcome::ApprovedNew(User::from_row(&created)?)
                }
            };

            tx.commit().await?;
            info!("approved pending user {}", pending_user_id);
            Ok(outcome)
        })
        .await
    }

    /// Reject = hapus row pending. `false` kalau row sudah tidak ada.
    pub async fn delete_pending_user(db: &Db, id: &str) -> Result<bool, DbError> {
        db.run(|client| async move {
            let deleted = client
                .execute("DELETE FROM pending_users WHERE id = $1", &[&id])
                .await?;
            Ok(deleted > 0)
        })
        .await
    }

    pub async fn delete_admin(db: &Db, id: &str) -> Result<DeleteAdminOutcome, DbError> {
        db.run(|client| async move {
            let row = client
                .query_opt("SELECT role FROM users WHERE id = $1", &[&id])
                .await?;
            let role: String = match row {
                Some(row) => row.try_get("role")?,
                None => return Ok(DeleteAdminOutcome::NotFound),
            };
            if role == ROLE_SUPER_ADMIN {
                return Ok(DeleteAdminOutcome::IsSuperAdmin);
            }
            client
                .execute("DELETE FROM users WHERE id = $1", &[&id])
                .await?;
            Ok(DeleteAdminOutcome::Deleted)
        })
        .await
    }

    pub async fn list_pending_users(db: &Db) -> Result<Vec<PendingUser>, DbError> {
        db.run(|client| async move {
            let rows = client
                .query(
                    "SELECT id, email, name, auth_provider, created_at \
                     FROM pending_users ORDER BY created_at ASC",
                    &[],
                )
                .await?;
            rows.iter().map(PendingUser::from_row).collect()
        })
        .await
    }

    pub async fn list_approved_users(db: &Db) -> Result<Vec<User>, DbError> {
        db.run(|client| async move {
            let rows = client
                .query(
                    "SELECT id, email, name, role, is_approved, created_at, updated_at \
                     FROM users WHERE is_approved = TRUE ORDER BY created_at ASC",
                    &[],
                )
                .await?;
            rows.iter().map(User::from_row).collect()
        })
        .await
    }
}
