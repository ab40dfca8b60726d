/// Account manager implementation using runtime queries
use crate::{
    account::SessionUser,
    config::ServerConfig,
    db::models::{Session, User},
    error::{AppError, AppResult},
    policy::Role,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

/// Length of the random session token
const SESSION_TOKEN_LEN: usize = 48;

/// Account manager service
pub struct AccountManager {
    db: SqlitePool,
    config: Arc<ServerConfig>,
}

impl AccountManager {
    /// Create a new account manager
    pub fn new(db: SqlitePool, config: Arc<ServerConfig>) -> Self {
        Self { db, config }
    }

    /// Look up a provisioned user by global id
    pub async fn get_user(&self, global_id: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT global_id, name, phone, email, role, location, password_hash
             FROM users WHERE global_id = ?1",
        )
        .bind(global_id)
        .fetch_optional(&self.db)
        .await
        .map_err(AppError::Database)?;

        Ok(user)
    }

    /// Authenticate and create a session
    pub async fn login(&self, global_id: &str, password: &str) -> AppResult<(User, Session)> {
        let global_id = global_id.trim();
        if global_id.is_empty() || password.is_empty() {
            return Err(AppError::Validation("Both fields are required".to_string()));
        }

        // An unknown id and an unregistered (passwordless) id get the same
        // answer, matching the registration-first provisioning model.
        let user = match self.get_user(global_id).await? {
            Some(u) if u.password_hash.is_some() => u,
            _ => {
                return Err(AppError::Authentication(
                    "Invalid Global ID or unregistered user".to_string(),
                ))
            }
        };

        let hash = user.password_hash.as_deref().unwrap_or_default();
        if !verify_password(password, hash)? {
            return Err(AppError::Authentication("Incorrect password".to_string()));
        }

        let session = self.create_session(&user.global_id).await?;

        Ok((user, session))
    }

    /// Registration step 1: check whether a global id is provisioned and
    /// still awaiting its password.
    pub async fn register_check(&self, global_id: &str) -> AppResult<User> {
        let global_id = global_id.trim();
        if global_id.is_empty() {
            return Err(AppError::Validation("Please enter Global ID".to_string()));
        }

        let user = self
            .get_user(global_id)
            .await?
            .ok_or_else(|| {
                AppError::Validation("Global ID not found. Contact admin.".to_string())
            })?;

        if user.password_hash.is_some() {
            return Err(AppError::Conflict(
                "Already registered. Please login.".to_string(),
            ));
        }

        Ok(user)
    }

    /// Registration step 2: set the password, exactly once
    ///
    /// The conditional update only matches while password_hash is still NULL,
    /// so a concurrent or repeated completion loses with zero affected rows.
    pub async fn register_complete(&self, global_id: &str, password: &str) -> AppResult<()> {
        let global_id = global_id.trim();
        if global_id.is_empty() || password.is_empty() {
            return Err(AppError::Validation("Missing required fields".to_string()));
        }

        let hash = hash_password(password)?;

        let result = sqlx::query(
            "UPDATE users SET password_hash = ?1 WHERE global_id = ?2 AND password_hash IS NULL",
        )
        .bind(&hash)
        .bind(global_id)
        .execute(&self.db)
        .await
        .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(
                "Already registered or Global ID not found".to_string(),
            ));
        }

        Ok(())
    }

    /// Create a session for a user
    pub async fn create_session(&self, global_id: &str) -> AppResult<Session> {
        let session_id = Uuid::new_v4().to_string();
        let token = generate_session_token();

        let now = Utc::now();
        let expires_at = now + Duration::seconds(self.config.session.ttl_secs);

        sqlx::query(
            "INSERT INTO sessions (id, global_id, token, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&session_id)
        .bind(global_id)
        .bind(&token)
        .bind(now)
        .bind(expires_at)
        .execute(&self.db)
        .await
        .map_err(AppError::Database)?;

        Ok(Session {
            id: session_id,
            global_id: global_id.to_string(),
            token,
            created_at: now,
            expires_at,
        })
    }

    /// Validate a session token and return the session identity
    pub async fn validate_session(&self, token: &str) -> AppResult<SessionUser> {
        let row = sqlx::query_as::<_, SessionJoinRow>(
            "SELECT s.id AS session_id, s.expires_at, u.global_id, u.name, u.role, u.location
             FROM sessions s
             JOIN users u ON s.global_id = u.global_id
             WHERE s.token = ?1",
        )
        .bind(token)
        .fetch_optional(&self.db)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::Authentication("Invalid or expired session".to_string()))?;

        if Utc::now() > row.expires_at {
            return Err(AppError::Authentication("Session expired".to_string()));
        }

        Ok(SessionUser {
            session_id: row.session_id,
            global_id: row.global_id,
            name: row.name,
            role: Role::from_str(&row.role)?,
            location: row.location,
        })
    }

    /// Delete a session by token (logout)
    pub async fn delete_session(&self, token: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM sessions WHERE token = ?1")
            .bind(token)
            .execute(&self.db)
            .await
            .map_err(AppError::Database)?;

        Ok(())
    }

    /// Remove expired sessions; returns how many rows were swept
    pub async fn sweep_expired_sessions(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < ?1")
            .bind(Utc::now())
            .execute(&self.db)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected())
    }
}

#[derive(sqlx::FromRow)]
struct SessionJoinRow {
    session_id: String,
    expires_at: chrono::DateTime<Utc>,
    global_id: String,
    name: String,
    role: String,
    location: String,
}

fn generate_session_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Hash a password with Argon2id and a fresh random salt
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Stored hash is invalid: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
