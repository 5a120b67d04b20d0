//! Show-token extractor for plugin endpoints.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use showplay_core::error::CoreError;

use crate::error::AppError;

/// Header carrying the caller's show token.
pub const SHOW_TOKEN_HEADER: &str = "showtoken";

/// Token identifying which show a plugin request acts on.
///
/// Only presence is checked here; the handler's load step turns an unknown
/// token into a 404.
///
/// ```ignore
/// async fn my_handler(token: ShowToken) -> AppResult<Json<()>> {
///     tracing::info!(show_token = %token.0, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ShowToken(pub String);

impl<S: Send + Sync> FromRequestParts<S> for ShowToken {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(SHOW_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing showtoken header".into()))
            })?;

        Ok(ShowToken(token.to_string()))
    }
}
