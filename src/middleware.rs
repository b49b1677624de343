use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::database::AppState;

/// Middleware that refuses to serve anything while the admin path is unsafe
///
/// A missing or short `ADMIN_PATH` would leave the admin API guessable, so
/// every request fails with the security error until it is fixed. This runs
/// before routing and is independent of the handlers.
pub async fn require_secure_admin_path(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    if let Err(err) = state.config.admin_path() {
        warn!(
            "rejecting {} request: ADMIN_PATH is missing or too short",
            request.method()
        );
        return Err(err.into_response());
    }

    Ok(next.run(request).await)
}

/// Whether `path` names the admin area
///
/// Constant-time so response timing does not leak how much of the secret a
/// guess got right.
pub fn is_admin_path(secret: &str, path: &str) -> bool {
    secret.as_bytes().ct_eq(path.as_bytes()).into()
}
