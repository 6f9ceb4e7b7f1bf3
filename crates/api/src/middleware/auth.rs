//! Identity extractor for Axum handlers.
//!
//! Authentication lives at the gateway in front of this service; by the
//! time a request arrives here, the gateway has already verified the caller
//! and forwards the subject in the `x-user-id` header. The extractor only
//! enforces that the header is present and non-empty.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use cura_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// The authenticated caller, taken from the `x-user-id` header.
///
/// Use as an extractor parameter in any handler that requires identity:
///
/// ```ignore
/// async fn my_handler(user: CurrentUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Opaque subject identifier from the identity provider.
    pub id: String,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing x-user-id header".into()))
            })?;

        Ok(CurrentUser {
            id: user_id.to_string(),
        })
    }
}
