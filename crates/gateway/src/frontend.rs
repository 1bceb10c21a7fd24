//! Embedded static frontend assets.
//!
//! The HTML, CSS, and JS files from `frontend/` are compiled into the binary
//! using `include_str!`, enabling single-binary deployment. The decorative
//! logo is the one asset read from disk at startup; when it is missing the
//! route degrades to 404 and everything else keeps working.

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};

use crate::SharedState;

/// The embedded frontend files.
const INDEX_HTML: &str = include_str!("../../../frontend/index.html");
const STYLE_CSS: &str = include_str!("../../../frontend/style.css");
const APP_JS: &str = include_str!("../../../frontend/app.js");

/// Build a router that serves the embedded frontend.
pub fn frontend_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/static/style.css", get(css_handler))
        .route("/static/app.js", get(js_handler))
        .route("/static/logo.png", get(logo_handler))
        .with_state(state)
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn css_handler() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLE_CSS,
    )
        .into_response()
}

async fn js_handler() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        APP_JS,
    )
        .into_response()
}

async fn logo_handler(State(state): State<SharedState>) -> Response {
    match &state.logo {
        Some(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "image/png")],
            bytes.clone(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_state;
    use axum::body::Body;
    use axum::http::Request;
    use connectsense_chat::{ChatRuntime, ContextAssembler};
    use connectsense_core::session::ActiveProvider;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn state_with_logo(logo: Option<Vec<u8>>) -> SharedState {
        let runtime = ChatRuntime::new(
            None,
            ContextAssembler::new("You are ConnectSense."),
            ActiveProvider::None,
        );
        build_state(runtime, logo)
    }

    #[tokio::test]
    async fn serves_index_html() {
        let app = frontend_router(state_with_logo(None));

        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("ConnectSense"), "Index HTML should contain 'ConnectSense'");
        assert!(text.contains("<!DOCTYPE html>"), "Should be valid HTML");
    }

    #[tokio::test]
    async fn serves_css() {
        let app = frontend_router(state_with_logo(None));

        let req = Request::builder()
            .uri("/static/style.css")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let content_type = response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(content_type.contains("text/css"));
    }

    #[tokio::test]
    async fn serves_js() {
        let app = frontend_router(state_with_logo(None));

        let req = Request::builder()
            .uri("/static/app.js")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("sessionId"), "JS should contain app code");
    }

    #[tokio::test]
    async fn missing_logo_is_404_not_error() {
        let app = frontend_router(state_with_logo(None));

        let req = Request::builder()
            .uri("/static/logo.png")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn present_logo_is_served_as_png() {
        let app = frontend_router(state_with_logo(Some(vec![0x89, 0x50, 0x4E, 0x47])));

        let req = Request::builder()
            .uri("/static/logo.png")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "image/png"
        );
    }
}
