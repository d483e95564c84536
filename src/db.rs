// src/db.rs - gateway ke Postgres: ambil koneksi dari pool, retry kalau transient
use std::future::Future;
use std::time::Duration;

use deadpool_postgres::{Client, Pool, PoolError};
use log::warn;
use thiserror::Error;
use tokio_postgres::error::SqlState;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("failed to get connection from pool: {0}")]
    Pool(#[from] PoolError),
    #[error("query failed: {0}")]
    Postgres(#[from] tokio_postgres::Error),
}

impl DbError {
    /// Pelanggaran unique constraint; dipakai handler untuk menjawab 409
    /// ketika insert kalah balapan dengan request lain.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            DbError::Postgres(err) if err.code() == Some(&SqlState::UNIQUE_VIOLATION)
        )
    }
}

/// Kebijakan retry dibaca sekali saat startup, dipakai oleh semua operasi.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Exponential backoff: base * 2^(attempt-1).
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
        }
    }
}

#[derive(Clone)]
pub struct Db {
    pool: Pool,
    retry: RetryPolicy,
}

impl Db {
    pub fn new(pool: Pool, retry: RetryPolicy) -> Self {
        Db { pool, retry }
    }

    /// Jalankan satu operasi database dengan koneksi segar dari pool.
    ///
    /// Setiap attempt mendapat koneksi sendiri; koneksi dikembalikan ke pool
    /// begitu future milik `op` selesai. Error transient di-retry sampai
    /// `max_attempts` dengan backoff, error lain langsung diteruskan.
    pub async fn run<T, F, Fut>(&self, op: F) -> Result<T, DbError>
    where
        F: Fn(Client) -> Fut,
        Fut: Future<Output = Result<T, tokio_postgres::Error>>,
    {
        let mut attempt = 1u32;
        loop {
            let client = match self.pool.get().await {
                Ok(client) => client,
                Err(err) if pool_error_is_transient(&err) && attempt < self.retry.max_attempts => {
                    warn!(
                        "pool error, attempt {}/{}: {}",
                        attempt, self.retry.max_attempts, err
                    );
                    tokio::time::sleep(self.retry.delay(attempt)).await;
                    attempt += 1;
                    continue;
                }
                Err(err) => return Err(DbError::Pool(err)),
            };

            match op(client).await {
                Ok(value) => return Ok(value),
                Err(err) if is_transient(&err) && attempt < self.retry.max_attempts => {
                    warn!(
                        "transient database error, attempt {}/{}: {}",
                        attempt, self.retry.max_attempts, err
                    );
                    tokio::time::sleep(self.retry.delay(attempt)).await;
                    attempt += 1;
                }
                Err(err) => return Err(DbError::Postgres(err)),
            }
        }
    }
}

/// SQLSTATE yang dianggap transient: gangguan koneksi, shutdown server,
/// konflik serialisasi/deadlock, dan konflik prepared statement di belakang
/// pgbouncer. Klasifikasi lewat kode, bukan isi pesan error.
const TRANSIENT_STATES: [&SqlState; 13] = [
    &SqlState::CONNECTION_EXCEPTION,
    &SqlState::CONNECTION_DOES_NOT_EXIST,
    &SqlState::CONNECTION_FAILURE,
    &SqlState::SQLCLIENT_UNABLE_TO_ESTABLISH_SQLCONNECTION,
    &SqlState::SQLSERVER_REJECTED_ESTABLISHMENT_OF_SQLCONNECTION,
    &SqlState::ADMIN_SHUTDOWN,
    &SqlState::CRASH_SHUTDOWN,
    &SqlState::CANNOT_CONNECT_NOW,
    &SqlState::TOO_MANY_CONNECTIONS,
    &SqlState::T_R_SERIALIZATION_FAILURE,
    &SqlState::T_R_DEADLOCK_DETECTED,
    &SqlState::DUPLICATE_PSTATEMENT,
    &SqlState::INVALID_SQL_STATEMENT_NAME,
];

fn is_transient_state(code: &SqlState) -> bool {
    TRANSIENT_STATES.iter().any(|state| *state == code)
}

fn is_transient(err: &tokio_postgres::Error) -> bool {
    if err.is_closed() {
        return true;
    }
    match err.code() {
        Some(code) => is_transient_state(code),
        None => false,
    }
}

fn pool_error_is_transient(err: &PoolError) -> bool {
    match err {
        PoolError::Timeout(_) => true,
        PoolError::Backend(inner) => is_transient(inner),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_per_attempt() {
        let policy = RetryPolicy {
            max_attempts: 4,
            base_delay: Duration::from_millis(100),
        };
        assert_eq!(policy.delay(1), Duration::from_millis(100));
        assert_eq!(policy.delay(2), Duration::from_millis(200));
        assert_eq!(policy.delay(3), Duration::from_millis(400));
    }

    #[test]
    fn backoff_handles_attempt_zero() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay(0), policy.base_delay);
    }

    #[test]
    fn connection_and_prepared_statement_errors_are_transient() {
        assert!(is_transient_state(&SqlState::CONNECTION_FAILURE));
        assert!(is_transient_state(&SqlState::ADMIN_SHUTDOWN));
        assert!(is_transient_state(&SqlState::DUPLICATE_PSTATEMENT));
        assert!(is_transient_state(&SqlState::T_R_SERIALIZATION_FAILURE));
    }

    #[test]
    fn constraint_violations_are_not_transient() {
        assert!(!is_transient_state(&SqlState::UNIQUE_VIOLATION));
        assert!(!is_transient_state(&SqlState::FOREIGN_KEY_VIOLATION));
        assert!(!is_transient_state(&SqlState::SYNTAX_ERROR));
        assert!(!is_transient_state(&SqlState::UNDEFINED_TABLE));
    }
}
