//! Cache-Aside Middleware
//!
//! Serves `GET` requests from the response cache when possible and captures
//! successful handler responses to fill it on a miss.

use axum::{
    body::{Body, Bytes, HttpBody},
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::cache::SharedCache;
use crate::config::TtlCategory;
use crate::error::CacheError;

/// Largest response body the middleware will buffer and cache.
pub const MAX_CACHED_BODY_BYTES: usize = 1024 * 1024; // 1 MB

/// Header reporting whether a response came from the cache.
pub const CACHE_STATUS_HEADER: &str = "x-cache";

// == Cached Response ==
/// What the middleware stores per request key.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl CachedResponse {
    fn to_response(&self, cache_status: &'static str) -> Response {
        let mut response = Response::new(Body::from(self.body.clone()));
        *response.status_mut() = self.status;
        if let Some(content_type) = &self.content_type {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, content_type.clone());
        }
        mark(&mut response, cache_status);
        response
    }
}

/// Cache key for a request: its path plus query string.
pub fn cache_key(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

/// Cache-aside layer body, for use with `axum::middleware::from_fn_with_state`.
///
/// Only anonymous `GET` requests are cached: a request carrying
/// `Authorization` or `Cookie` is neither served from nor stored in the
/// cache, since the key does not identify the caller. Non-2xx responses,
/// responses that set cookies or are marked `Cache-Control: no-store` or
/// `private`, and bodies without a known size up to
/// [`MAX_CACHED_BODY_BYTES`] pass through untouched.
pub async fn cache_aside(
    State(cache): State<SharedCache<CachedResponse>>,
    request: Request,
    next: Next,
) -> Response {
    if !is_shareable(&request) {
        return next.run(request).await;
    }

    let key = cache_key(request.uri());
    let category = TtlCategory::for_path(request.uri().path());

    let cached = cache.write().await.get(&key);
    if let Some(hit) = cached {
        debug!(key = %key, "response cache hit");
        return hit.to_response("HIT");
    }

    let response = next.run(request).await;
    if !is_cacheable(&response) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let body = match axum::body::to_bytes(body, MAX_CACHED_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(key = %key, error = %err, "failed to buffer response for caching");
            return CacheError::Internal("failed to read response body".to_string())
                .into_response();
        }
    };

    let entry = CachedResponse {
        status: parts.status,
        content_type: parts.headers.get(header::CONTENT_TYPE).cloned(),
        body: body.clone(),
    };
    cache.write().await.set_with_category(key.clone(), entry, category);
    debug!(key = %key, ?category, "response cached");

    let mut response = Response::from_parts(parts, Body::from(body));
    mark(&mut response, "MISS");
    response
}

fn is_shareable(request: &Request) -> bool {
    let headers = request.headers();
    request.method() == Method::GET
        && !headers.contains_key(header::AUTHORIZATION)
        && !headers.contains_key(header::COOKIE)
}

fn is_cacheable(response: &Response) -> bool {
    if !response.status().is_success() || response.headers().contains_key(header::SET_COOKIE) {
        return false;
    }

    let restricted = response
        .headers()
        .get_all(header::CACHE_CONTROL)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|directive| directive.trim().to_ascii_lowercase())
        .any(|directive| directive == "no-store" || directive.starts_with("private"));
    if restricted {
        return false;
    }

    response
        .body()
        .size_hint()
        .upper()
        .is_some_and(|len| len <= MAX_CACHED_BODY_BYTES as u64)
}

fn mark(response: &mut Response, cache_status: &'static str) {
    response
        .headers_mut()
        .insert(CACHE_STATUS_HEADER, HeaderValue::from_static(cache_status));
}
