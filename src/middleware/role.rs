//! Role-based authorization extractors.
//!
//! Attendance endpoints are split strictly by role: teachers run sessions,
//! students mark themselves present. Handlers take one of the `Require*`
//! extractors instead of a bare [`AuthUser`], so a token with the wrong role
//! is rejected with 403 before the handler body runs.
//!
//! ```rust,ignore
//! pub async fn end_session(
//!     State(state): State<AppState>,
//!     RequireTeacher(auth_user): RequireTeacher,
//!     Path(id): Path<AttendanceSessionId>,
//! ) -> Result<Json<AttendanceSessionResponse>, AppError> {
//!     // only teachers get here
//! }
//! ```

use axum::extract::FromRequestParts;
use classcue_core::AppError;
use classcue_models::UserRole;

use crate::middleware::auth::AuthUser;

/// Fails with 403 unless `actual` is `required`.
pub fn check_role(actual: UserRole, required: UserRole) -> Result<(), AppError> {
    if actual != required {
        return Err(AppError::forbidden(format!(
            "Access denied. This action requires the {} role",
            required
        )));
    }
    Ok(())
}

/// Defines an extractor that authenticates the caller and requires one role.
macro_rules! require_role {
    ($name:ident, $role:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub AuthUser);

        impl FromRequestParts<crate::state::AppState> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user = AuthUser::from_request_parts(parts, state).await?;
                check_role(auth_user.role()?, $role)?;
                Ok($name(auth_user))
            }
        }
    };
}

require_role!(RequireTeacher, UserRole::Teacher);
require_role!(RequireStudent, UserRole::Student);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_role_matches_exactly() {
        assert!(check_role(UserRole::Teacher, UserRole::Teacher).is_ok());

        let err = check_role(UserRole::Admin, UserRole::Teacher).unwrap_err();
        assert_eq!(err.status.as_u16(), 403);
        assert!(err.error.to_string().contains("teacher"));

        assert!(check_role(UserRole::Teacher, UserRole::Student).is_err());
    }
}
