/// Database row types
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Provisioned identity in the users table
///
/// Rows are created out-of-band; this service only ever fills in
/// `password_hash`, once, during registration completion.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub global_id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub role: String,
    pub location: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
}

/// Ticket record in the database
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    /// Raiser's global id
    pub global_id: String,
    /// Raiser's display name, snapshotted at submission
    pub raised_by: String,
    pub category: String,
    pub description: String,
    pub building_no: Option<String>,
    pub area_code: Option<String>,
    pub sub_area: Option<String>,
    pub keyword: Option<String>,
    pub location: String,
    pub status: String,
    pub assigned_to: Option<String>,
    pub planner_id: Option<String>,
    pub completion_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Session record in the database
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub global_id: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
