/// Account and session management
///
/// Identities are provisioned out-of-band; this module handles the one-time
/// registration step that sets a password, login, and DB-backed sessions.

mod manager;

pub use manager::AccountManager;

use crate::policy::Role;
use serde::{Deserialize, Serialize};

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub global_id: String,
    pub password: String,
}

/// Login response; `redirect_to` carries the role's home dashboard so the
/// client can route the way the old server-rendered app redirected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub global_id: String,
    pub name: String,
    pub role: Role,
    pub location: String,
    pub redirect_to: String,
}

/// Registration lookup request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterCheckRequest {
    pub global_id: String,
}

/// Provisioned profile returned for confirmation before the password is set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterCheckResponse {
    pub global_id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub role: Role,
    pub location: String,
}

/// Registration completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterCompleteRequest {
    pub global_id: String,
    pub password: String,
}

/// Validated session identity, read once per request
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub session_id: String,
    pub global_id: String,
    pub name: String,
    pub role: Role,
    pub location: String,
}
