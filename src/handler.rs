//! HTTP request handlers
//!
//! Every path except `/` goes through [`dispatch`], which decides between:
//! - the admin area (UI on GET, JSON API on POST) when the path is the secret
//! - redirect resolution when the path is a stored slug
//! - the 404 page otherwise

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Utc;
use futures_util::future::join_all;
use serde_json::Map;
use tracing::{debug, info, warn};

use crate::database::AppState;
use crate::error::{ApiError, AppError};
use crate::middleware::is_admin_path;
use crate::model::{AdminAction, AdminRequest, AdminResponse, LinkEntry, LinkRecord};

/// Landing page served at `/`
pub async fn landing(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(state.pages.landing(&state.config)?))
}

/// Routes a non-root request to the admin area, a redirect, or the 404 page
///
/// A path parameter that cannot be decoded is treated as empty, which ends
/// on the 404 page.
pub async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    path: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<Response, AppError> {
    let path = path.map(|Path(path)| path).unwrap_or_default();
    let admin_path = state.config.admin_path()?;

    if is_admin_path(admin_path, &path) {
        if method == Method::POST {
            return Ok(Json(admin_api(&state, &body).await).into_response());
        }
        return Ok(Html(state.pages.admin(state.config.lang)?).into_response());
    }

    if !path.is_empty() {
        if let Some(response) = resolve_slug(&state, &path).await? {
            return Ok(response);
        }
    }

    not_found(&state)
}

/// Runs one admin API action. Failures are reported in the body, never as
/// an HTTP error.
///
/// # Request Body
///
/// ```json
/// { "action": "create", "slug": "docs", "target": "https://example.com", "interstitial": false }
/// ```
///
/// `action` is one of `list`, `create`, `update` or `delete`.
pub async fn admin_api(state: &AppState, body: &[u8]) -> AdminResponse {
    match run_admin_action(state, body).await {
        Ok(response) => response,
        Err(err) => {
            warn!("admin request failed: {}", err);
            AdminResponse::failure(Some(err.to_string()))
        }
    }
}

async fn run_admin_action(state: &AppState, body: &[u8]) -> Result<AdminResponse, ApiError> {
    let request: AdminRequest = serde_json::from_slice(body).map_err(ApiError::InvalidBody)?;

    match request.action() {
        AdminAction::List => list_links(state).await,
        AdminAction::Upsert => {
            let (Some(slug), Some(target)) = (request.slug(), request.target()) else {
                return Ok(AdminResponse::failure(Some("Missing fields".to_string())));
            };
            upsert_link(state, &slug, &target, request.interstitial()).await
        }
        AdminAction::Delete => {
            let Some(slug) = request.slug() else {
                return Ok(AdminResponse::failure(None));
            };
            state.store.delete(&slug).await?;
            info!("deleted link /{}", slug);
            Ok(AdminResponse::ok())
        }
        AdminAction::Unknown(action) => {
            debug!("unknown admin action {:?}", action);
            Ok(AdminResponse::failure(Some("Unknown action".to_string())))
        }
    }
}

/// Fetches every record concurrently. Undecodable payloads are listed with a
/// placeholder; keys removed between listing and fetching are skipped.
async fn list_links(state: &AppState) -> Result<AdminResponse, ApiError> {
    let keys = state.store.list().await?;

    let fetched = join_all(keys.into_iter().map(|slug| async move {
        let raw = state.store.get(&slug).await;
        (slug, raw)
    }))
    .await;

    let mut entries = Vec::with_capacity(fetched.len());
    for (slug, raw) in fetched {
        if let Some(raw) = raw? {
            entries.push(LinkEntry::from_stored(slug, &raw));
        }
    }

    Ok(AdminResponse::listing(entries))
}

/// Writes `slug`, replacing everything but the accumulated visit count
async fn upsert_link(
    state: &AppState,
    slug: &str,
    target: &str,
    interstitial: bool,
) -> Result<AdminResponse, ApiError> {
    let existing = state.store.get(slug).await?;
    let record = LinkRecord {
        url: target.to_string(),
        interstitial,
        visits: LinkRecord::visits_of(existing.as_deref()),
        updated_at: Some(Utc::now().timestamp_millis()),
        extra: Map::new(),
    };

    let encoded = record.encode().map_err(ApiError::Encode)?;
    state.store.put(slug, &encoded).await?;

    info!(
        "saved link /{} -> {} (interstitial: {}, visits kept: {})",
        slug, record.url, record.interstitial, record.visits
    );
    Ok(AdminResponse::ok())
}

/// Looks up `slug` and answers with a redirect or the interstitial page
///
/// Returns `Ok(None)` when no record exists. The visit counter is bumped
/// before responding; if persisting it fails the visitor is still served.
async fn resolve_slug(state: &AppState, slug: &str) -> Result<Option<Response>, AppError> {
    let Some(raw) = state.store.get(slug).await? else {
        return Ok(None);
    };

    let mut record = LinkRecord::decode(&raw).map_err(|source| AppError::CorruptRecord {
        slug: slug.to_string(),
        source,
    })?;

    let location = if record.interstitial {
        None
    } else {
        let value = HeaderValue::from_str(&record.url)
            .map_err(|_| AppError::InvalidDestination(slug.to_string()))?;
        Some(value)
    };

    record.visits = record.visits.saturating_add(1);
    match record.encode() {
        Ok(encoded) => {
            if let Err(err) = state.store.put(slug, &encoded).await {
                warn!("failed to record visit for /{}: {}", slug, err);
            }
        }
        Err(err) => warn!("failed to encode visit for /{}: {}", slug, err),
    }

    debug!("resolved /{} -> {} (visits: {})", slug, record.url, record.visits);

    let response = match location {
        Some(location) => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
        None => Html(state.pages.interstitial(state.config.lang, &record.url)?).into_response(),
    };
    Ok(Some(response))
}

fn not_found(state: &AppState) -> Result<Response, AppError> {
    let page = state.pages.not_found(state.config.lang)?;
    Ok((StatusCode::NOT_FOUND, Html(page)).into_response())
}
