//! Route definitions
//!
//! Configures the Axum router with the application state.

use axum::middleware;
use axum::routing::any;
use axum::Router;

use crate::database::AppState;
use crate::handler::{dispatch, landing};
use crate::middleware::require_secure_admin_path;

/// Creates the application router
///
/// # Route Definitions
///
/// - `ANY /` - Landing page
/// - `ANY /{*path}` - Admin area, redirect, or 404 depending on the path
///
/// Every route sits behind [`require_secure_admin_path`].
///
/// # Example Usage
///
/// ```no_run
/// # use std::sync::Arc;
/// # use edgelink::config::Config;
/// # use edgelink::database::{init_db, AppState, RedbStore};
/// # use edgelink::route::create_app;
/// # let db = init_db("data.db").unwrap();
/// let state = AppState::new(Arc::new(RedbStore::new(db)), Config::from_env()).unwrap();
/// let app = create_app(state);
/// // axum::serve(listener, app).await.unwrap();
/// ```
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", any(landing))
        .route("/{*path}", any(dispatch))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_secure_admin_path,
        ))
        .with_state(state)
}
