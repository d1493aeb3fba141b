use crate::models::{Claims, ServiceError};

// Actions a caller can attempt. Scheduling and lockdown mutations plus the
// roster listing are administrative; everything else only needs a valid login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ManageSchedule,
    ManageLockdown,
    ViewRoster,
    Signup,
    Read,
}

// Explicit allow/deny decision for (actor, action). Called at the handler
// boundary before any side effect.
pub fn authorize(claims: &Claims, action: Action) -> Result<(), ServiceError> {
    match action {
        Action::ManageSchedule | Action::ManageLockdown | Action::ViewRoster => {
            if claims.is_admin {
                Ok(())
            } else {
                Err(ServiceError::Forbidden("policy".to_string()))
            }
        }
        Action::Signup | Action::Read => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(is_admin: bool) -> Claims {
        Claims {
            sub: "user-1".to_string(),
            email: "user@example.com".to_string(),
            is_admin,
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn admin_actions_require_admin() {
        assert!(authorize(&claims(false), Action::ManageSchedule).is_err());
        assert!(authorize(&claims(false), Action::ManageLockdown).is_err());
        assert!(authorize(&claims(false), Action::ViewRoster).is_err());
        assert!(authorize(&claims(true), Action::ManageSchedule).is_ok());
        assert!(authorize(&claims(true), Action::ManageLockdown).is_ok());
        assert!(authorize(&claims(true), Action::ViewRoster).is_ok());
    }

    #[test]
    fn signup_and_read_only_need_authentication() {
        assert!(authorize(&claims(false), Action::Signup).is_ok());
        assert!(authorize(&claims(false), Action::Read).is_ok());
    }
}
