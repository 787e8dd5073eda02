use crate::agent::ChainHandle;
use crate::models::chat::{ ChatRequest, ChatResponse, ErrorResponse };
use crate::rag::history::flatten_history;
use crate::rag::retrieval::ChainInput;
use super::auth::{ require_api_key, ApiKeyGuard };

use std::error::Error;
use std::sync::Arc;
use axum::{
    body::Bytes,
    extract::{ rejection::BytesRejection, State },
    http::StatusCode,
    middleware,
    response::{ IntoResponse, Response },
    routing::post,
    Json,
    Router,
};
use tower_http::cors::{ Any, CorsLayer };
use log::{ debug, error };

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Clone)]
pub struct AppState {
    pub chain: Arc<ChainHandle>,
}

/// Every failure on the chat path, whatever its cause.
///
/// Rendered as a 500 with a fixed body; the cause only reaches the log.
#[derive(Debug)]
pub struct RequestFailure(Box<dyn Error + Send + Sync>);

impl<E> From<E> for RequestFailure where E: Into<Box<dyn Error + Send + Sync>> {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for RequestFailure {
    fn into_response(self) -> Response {
        error!("Error in chat endpoint: {}", describe_error(&*self.0));
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse { message: INTERNAL_ERROR_MESSAGE.to_string() }),
        ).into_response()
    }
}

fn describe_error(err: &(dyn Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

pub fn router(state: AppState, guard: ApiKeyGuard) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat", post(chat_handler))
        .route_layer(middleware::from_fn_with_state(guard, require_api_key))
        .layer(cors)
        .with_state(state)
}

/// The body is parsed by hand so that malformed input takes the same 500 path as everything else.
async fn chat_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>
) -> Result<Json<ChatResponse>, RequestFailure> {
    let body = body?;
    let req: ChatRequest = serde_json::from_slice(&body)?;
    debug!("Chat request: {} chars, {} history turns", req.message.len(), req.history.len());

    let chain = state.chain.get().await?;
    let output = chain.invoke(ChainInput {
        chat_history: flatten_history(&req.history),
        input: req.message,
    }).await?;

    Ok(Json(ChatResponse { response: output.answer }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Outer(std::io::Error);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "query failed")
        }
    }

    impl Error for Outer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn error_description_follows_the_source_chain() {
        let err = Outer(std::io::Error::new(std::io::ErrorKind::Other, "connection reset"));
        assert_eq!(describe_error(&err), "query failed: connection reset");
    }

    #[test]
    fn failure_renders_fixed_body() {
        let resp = RequestFailure::from("boom").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
