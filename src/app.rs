use std::net::SocketAddr;

use anyhow::Context;
use axum::{
    body::Body,
    http::{header, HeaderValue, Method, Request, Response, StatusCode},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{auth, config::AppConfig, crafts, state::AppState};

pub fn build_app(state: AppState) -> anyhow::Result<Router> {
    let cors = cors_layer(&state.config.cors_origin)?;

    Ok(Router::new()
        .route("/", get(|| async { "Hello World" }))
        .route("/health", get(|| async { "ok" }))
        .merge(auth::router())
        .merge(crafts::router())
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_response(record_response),
        ))
}

// Query strings carry owner emails; only the path goes into the span.
fn request_span(req: &Request<Body>) -> tracing::Span {
    let scoped = is_scoped(req.uri().query());
    tracing::info_span!(
        "http_request",
        method = %req.method(),
        path = req.uri().path(),
        scoped,
        status = tracing::field::Empty,
        latency_ms = tracing::field::Empty,
    )
}

fn is_scoped(query: Option<&str>) -> bool {
    query.is_some_and(|q| {
        q.split('&')
            .any(|pair| pair.starts_with("email=") && pair.len() > "email=".len())
    })
}

fn record_response(
    res: &Response<Body>,
    latency: std::time::Duration,
    span: &tracing::Span,
) {
    let status = res.status();
    span.record("status", status.as_u16());
    span.record("latency_ms", latency.as_millis() as u64);
    if status.is_server_error() {
        tracing::error!(%status, "request failed");
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        tracing::warn!(%status, "request denied");
    } else {
        tracing::info!(%status, "request served");
    }
}

/// Single credentialed origin; browsers must send the session cookie cross-site.
fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin)
        .with_context(|| format!("invalid CORS origin {origin:?}"))?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]))
}

pub async fn serve(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower::ServiceExt;

    #[tokio::test]
    async fn preflight_allows_configured_origin_with_credentials() {
        let router = build_app(AppState::fake()).unwrap();
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/crafts")
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn foreign_origin_gets_no_cors_grant() {
        let router = build_app(AppState::fake()).unwrap();
        let request = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, "https://evil.example")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[test]
    fn scoped_requests_are_flagged_without_logging_the_email() {
        assert!(is_scoped(Some("email=a@x.com&page=1")));
        assert!(is_scoped(Some("search=vase&email=a@x.com")));
        assert!(!is_scoped(Some("email=&search=vase")));
        assert!(!is_scoped(Some("search=email=x")));
        assert!(!is_scoped(None));

        let req = Request::builder()
            .uri("/crafts?email=a@x.com")
            .body(Body::empty())
            .unwrap();
        let span = request_span(&req);
        assert!(span.metadata().map_or(true, |m| m.fields().field("uri").is_none()));
    }

    #[test]
    fn rejects_unusable_origin() {
        assert!(cors_layer("bad\norigin").is_err());
    }
}
