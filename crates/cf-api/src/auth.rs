//! Principal extraction from the `Authorization: Token <key>` header.

use crate::error::ApiError;
use crate::AppState;
use actix_web::http::header;
use actix_web::HttpRequest;
use cf_core::error::AppError;
use cf_core::models::User;

/// Resolves the request's principal, if any.
///
/// No header (or a foreign scheme) means an anonymous caller, which is not
/// itself an error: whether anonymity is acceptable is the policy layer's
/// decision. A present-but-invalid token, however, is rejected here with
/// `Unauthenticated`.
pub async fn current_principal(
    req: &HttpRequest,
    state: &AppState,
) -> Result<Option<User>, ApiError> {
    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| ApiError(AppError::Unauthenticated))?;
    let Some(key) = value.strip_prefix("Token ") else {
        return Ok(None);
    };

    match state.auth.principal_for_token(key.trim()).await? {
        Some(user) => Ok(Some(user)),
        None => Err(ApiError(AppError::Unauthenticated)),
    }
}
