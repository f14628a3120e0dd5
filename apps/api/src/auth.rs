use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::errors::AppError;

/// Capability required to create introduction requests.
pub const PERM_SEND_INTRODUCTIONS: &str = "send_introductions";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRole {
    Professional,
    HrPartner,
}

impl ActorRole {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "professional" => Some(ActorRole::Professional),
            "hr_partner" => Some(ActorRole::HrPartner),
            _ => None,
        }
    }
}

/// Caller identity resolved by the upstream auth gateway and injected per
/// request via headers. Core operations take this value explicitly instead of
/// reading ambient session state, which keeps them testable without HTTP.
#[derive(Debug, Clone)]
pub struct AuthenticatedActor {
    pub id: Uuid,
    pub role: ActorRole,
    pub permissions: Vec<String>,
}

impl AuthenticatedActor {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    /// Fails with 403 unless the actor holds the given role.
    pub fn require_role(&self, role: ActorRole) -> Result<(), AppError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "This action is not available for your account type".to_string(),
            ))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedActor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| -> Option<&str> {
            parts.headers.get(name).and_then(|v| v.to_str().ok())
        };

        let id = header("x-actor-id")
            .and_then(|v| Uuid::parse_str(v).ok())
            .ok_or(AppError::Unauthorized)?;
        let role = header("x-actor-role")
            .and_then(ActorRole::parse)
            .ok_or(AppError::Unauthorized)?;
        let permissions = header("x-actor-permissions")
            .map(|v| {
                v.split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(AuthenticatedActor {
            id,
            role,
            permissions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: ActorRole, perms: &[&str]) -> AuthenticatedActor {
        AuthenticatedActor {
            id: Uuid::new_v4(),
            role,
            permissions: perms.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(ActorRole::parse("professional"), Some(ActorRole::Professional));
        assert_eq!(ActorRole::parse("hr_partner"), Some(ActorRole::HrPartner));
        assert_eq!(ActorRole::parse("admin"), None);
    }

    #[test]
    fn test_permission_check() {
        let a = actor(ActorRole::HrPartner, &[PERM_SEND_INTRODUCTIONS]);
        assert!(a.has_permission(PERM_SEND_INTRODUCTIONS));
        assert!(!a.has_permission("manage_billing"));
    }

    #[test]
    fn test_require_role_mismatch() {
        let a = actor(ActorRole::Professional, &[]);
        assert!(a.require_role(ActorRole::HrPartner).is_err());
        assert!(a.require_role(ActorRole::Professional).is_ok());
    }
}
