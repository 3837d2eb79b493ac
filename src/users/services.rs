use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sqlx::SqlitePool;
use tracing::info;

use super::models::{NewUser, Otp, User, STATUS_ACTIVE, STATUS_PENDING};
use crate::common::{
    format_timestamp, generate_otp_id, generate_user_id, now_timestamp, safe_email_log, ApiError,
};

const USER_COLUMNS: &str = "id, name, email, phone, password, role, status, refresh_token, created_at, updated_at";

/// Four-digit numeric verification code
pub fn generate_otp_code() -> String {
    rand::thread_rng().gen_range(1000..=9999).to_string()
}

pub struct UserService {
    db: SqlitePool,
}

impl UserService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    // ============================================================================
    // Users
    // ============================================================================

    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, ApiError> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(user_id)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = ?",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::DatabaseError)
    }

    pub async fn find_by_email_or_phone(
        &self,
        email: &str,
        phone: &str,
    ) -> Result<Option<User>, ApiError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = ? OR phone = ? LIMIT 1",
            USER_COLUMNS
        ))
        .bind(email)
        .bind(phone)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::DatabaseError)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY created_at ASC, rowid ASC",
            USER_COLUMNS
        ))
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::DatabaseError)
    }

    pub async fn create_user(&self, new_user: NewUser) -> Result<User, ApiError> {
        let user_id = generate_user_id();
        let now = now_timestamp();

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, phone, password, role, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user_id)
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.phone)
        .bind(&new_user.password_hash)
        .bind(new_user.role)
        .bind(STATUS_PENDING)
        .bind(&now)
        .bind(&now)
        .execute(&self.db)
        .await
        .map_err(|e| ApiError::from_write_error(e, "User already exists"))?;

        info!(
            user_id = %user_id,
            email = %safe_email_log(&new_user.email),
            role = %new_user.role,
            "Created user"
        );

        self.find_by_id(&user_id)
            .await?
            .ok_or_else(|| ApiError::InternalServer("Created user could not be loaded".to_string()))
    }

    /// Stores (or with `None`, removes) the user's refresh token
    pub async fn set_refresh_token(
        &self,
        user_id: &str,
        refresh_token: Option<&str>,
    ) -> Result<(), ApiError> {
        sqlx::query("UPDATE users SET refresh_token = ?, updated_at = ? WHERE id = ?")
            .bind(refresh_token)
            .bind(now_timestamp())
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        Ok(())
    }

    pub async fn activate_user(&self, user_id: &str) -> Result<(), ApiError> {
        sqlx::query("UPDATE users SET status = ?, updated_at = ? WHERE id = ?")
            .bind(STATUS_ACTIVE)
            .bind(now_timestamp())
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        Ok(())
    }

    // ============================================================================
    // OTPs
    // ============================================================================

    pub async fn create_otp(
        &self,
        user_id: &str,
        code: &str,
        ttl_minutes: i64,
    ) -> Result<Otp, ApiError> {
        let now = Utc::now();
        let otp = Otp {
            id: generate_otp_id(),
            user_id: user_id.to_string(),
            otp: code.to_string(),
            expires_at: format_timestamp(now + Duration::minutes(ttl_minutes)),
            created_at: format_timestamp(now),
        };

        sqlx::query(
            "INSERT INTO otps (id, user_id, otp, expires_at, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&otp.id)
        .bind(&otp.user_id)
        .bind(&otp.otp)
        .bind(&otp.expires_at)
        .bind(&otp.created_at)
        .execute(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        Ok(otp)
    }

    /// Most recently issued OTP that has not been used yet
    pub async fn latest_unverified_otp(&self, user_id: &str) -> Result<Option<Otp>, ApiError> {
        sqlx::query_as::<_, Otp>(
            r#"
            SELECT id, user_id, otp, expires_at, created_at
            FROM otps
            WHERE user_id = ? AND verified_at IS NULL
            ORDER BY created_at DESC, rowid DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::DatabaseError)
    }

    pub async fn mark_otp_verified(&self, otp_id: &str) -> Result<(), ApiError> {
        sqlx::query("UPDATE otps SET verified_at = ? WHERE id = ?")
            .bind(now_timestamp())
            .bind(otp_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        Ok(())
    }
}

/// True once `now` has reached the OTP's expiry; unparseable timestamps count as expired
pub fn otp_is_expired(otp: &Otp, now: DateTime<Utc>) -> bool {
    DateTime::parse_from_rfc3339(&otp.expires_at)
        .map(|expires_at| expires_at.with_timezone(&Utc) <= now)
        .unwrap_or(true)
}
