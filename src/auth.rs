/// Authentication extractors
use crate::{
    account::SessionUser,
    api::middleware::extract_session_token,
    context::AppContext,
    error::AppError,
    policy::{Action, ScopeFilter},
};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// Authenticated context - extracts and validates the session from the
/// request cookie (or bearer token for non-browser clients).
///
/// A missing or invalid session rejects with the login redirect; the request
/// is treated as anonymous, not as an error.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub session: SessionUser,
}

#[async_trait]
impl FromRequestParts<AppContext> for AuthContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_session_token(&parts.headers).ok_or(AppError::LoginRequired)?;

        let session = state
            .account_manager
            .validate_session(&token)
            .await
            .map_err(|_| AppError::LoginRequired)?;

        Ok(AuthContext { session })
    }
}

impl AuthContext {
    /// Deny with an explicit 403 unless the session's role allows the action
    pub fn require(&self, action: Action) -> Result<(), AppError> {
        if self.session.role.allows(action) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Role {} may not {}",
                self.session.role.as_str(),
                action.as_str()
            )))
        }
    }

    /// Location scope every query and mutation for this session binds to
    pub fn scope(&self) -> ScopeFilter {
        ScopeFilter::new(self.session.location.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Role;

    fn auth(role: Role) -> AuthContext {
        AuthContext {
            session: SessionUser {
                session_id: "s".to_string(),
                global_id: "G1".to_string(),
                name: "Test".to_string(),
                role,
                location: "Pune".to_string(),
            },
        }
    }

    #[test]
    fn test_require_maps_to_access_denied() {
        let ctx = auth(Role::NormalUser);
        assert!(ctx.require(Action::SubmitTicket).is_ok());

        let err = ctx.require(Action::AssignTicket).unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));
    }

    #[test]
    fn test_scope_binds_session_location() {
        let ctx = auth(Role::Admin);
        assert_eq!(ctx.scope(), ScopeFilter::new("Pune"));
    }
}
