use axum::{
    extract::{ Request, State },
    http::StatusCode,
    middleware::Next,
    response::{ IntoResponse, Response },
    Json,
};
use log::{ debug, warn };
use std::sync::Arc;

use crate::models::chat::ErrorResponse;

pub const API_KEY_HEADER: &str = "X-API-Key";
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Optional shared-secret check applied in front of the chat route.
#[derive(Clone, Default)]
pub struct ApiKeyGuard {
    required: Option<Arc<str>>,
}

impl ApiKeyGuard {
    pub fn new(api_key: Option<String>) -> Self {
        let required = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .map(Arc::from);
        Self { required }
    }

    pub fn is_enabled(&self) -> bool {
        self.required.is_some()
    }

    fn accepts(&self, provided: Option<&str>) -> bool {
        match self.required.as_deref() {
            Some(required) => provided == Some(required),
            None => true,
        }
    }
}

fn provided_key(req: &Request) -> Option<String> {
    let from_header = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    if from_header.is_some() {
        return from_header;
    }

    let query = req.uri().query()?;
    for pair in query.split('&') {
        let mut kv = pair.splitn(2, '=');
        if kv.next() == Some("api_key") {
            return kv.next().map(|v| v.to_string());
        }
    }
    None
}

pub async fn require_api_key(
    State(guard): State<ApiKeyGuard>,
    req: Request,
    next: Next
) -> Response {
    if guard.is_enabled() {
        let provided = provided_key(&req);
        if !guard.accepts(provided.as_deref()) {
            warn!("{} {}: bad or missing API key", req.method(), req.uri().path());
            let body = ErrorResponse { message: UNAUTHORIZED_MESSAGE.to_string() };
            return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
        }
        debug!("{} {}: authenticated", req.method(), req.uri().path());
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_key_disables_the_guard() {
        assert!(!ApiKeyGuard::new(None).is_enabled());
        assert!(!ApiKeyGuard::new(Some("  ".into())).is_enabled());
        assert!(ApiKeyGuard::new(None).accepts(None));
    }

    #[test]
    fn enabled_guard_needs_exact_match() {
        let guard = ApiKeyGuard::new(Some("secret".into()));
        assert!(guard.accepts(Some("secret")));
        assert!(!guard.accepts(Some("Secret")));
        assert!(!guard.accepts(None));
    }

    #[test]
    fn key_is_read_from_header_then_query() {
        let req = axum::http::Request::builder()
            .uri("/api/chat?api_key=from-query")
            .header(API_KEY_HEADER, "from-header")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(provided_key(&req).as_deref(), Some("from-header"));

        let req = axum::http::Request::builder()
            .uri("/api/chat?x=1&api_key=from-query")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(provided_key(&req).as_deref(), Some("from-query"));
    }
}
