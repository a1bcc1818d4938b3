use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, StatusCode, header::CACHE_CONTROL},
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};

use crate::{
    application::page::ContentPageService,
    presentation::views::{
        ContentTemplate, RawMarkupPolicy, render_not_found_response, render_template_response,
    },
};

use super::middleware::{log_responses, set_request_context};

const CONTENT_PATH: &str = "/content";

#[derive(Clone)]
pub struct HttpState {
    pub pages: Arc<ContentPageService>,
    pub markup_policy: RawMarkupPolicy,
}

impl HttpState {
    pub fn new(pages: ContentPageService, markup_policy: RawMarkupPolicy) -> Self {
        Self {
            pages: Arc::new(pages),
            markup_policy,
        }
    }
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index))
        .route(CONTENT_PATH, get(content_page))
        .route("/content.json", get(content_json))
        .route("/_health", get(health))
        .fallback(fallback_router)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn index() -> Redirect {
    Redirect::to(CONTENT_PATH)
}

async fn content_page(State(state): State<HttpState>) -> Response {
    let view = state.pages.page_view().await;
    let response = render_template_response(
        ContentTemplate::new(view, state.markup_policy),
        StatusCode::OK,
    );
    no_store(response)
}

async fn content_json(State(state): State<HttpState>) -> Response {
    let view = state.pages.page_view().await;
    no_store(Json(view).into_response())
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn fallback_router() -> Response {
    render_not_found_response()
}

/// Every render reflects the latest CMS state; never let intermediaries cache it.
fn no_store(mut response: Response) -> Response {
    if response.status().is_success() {
        response
            .headers_mut()
            .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    }
    response
}
