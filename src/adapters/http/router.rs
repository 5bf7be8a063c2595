//! HTTP server composition.
//!
//! Requests flow through middleware in order:
//! 1. Request/response logging
//! 2. Timeout enforcement
//! 3. Panic recovery (a panicking handler becomes a 500)
//! 4. Handler execution, or static assets for unmatched paths

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::webhook::{webhook_routes, WebhookAppState};

/// Cross-cutting router settings.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Upper bound on a whole request.
    pub request_timeout: Duration,
    /// Directory served for paths no route matches.
    pub static_dir: Option<PathBuf>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            static_dir: None,
        }
    }
}

/// Creates the application router with all routes and middleware.
pub fn build_router(state: WebhookAppState, options: &RouterOptions) -> Router {
    with_middleware(webhook_routes().with_state(state), options)
}

fn with_middleware(router: Router, options: &RouterOptions) -> Router {
    let router = match &options.static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::new(options.request_timeout))
        .layer(TraceLayer::new_for_http())
}

/// Serves `router` on `addr` until CTRL+C or SIGTERM.
///
/// # Errors
///
/// Returns `std::io::Error` if the address cannot be bound.
pub async fn serve(router: Router, addr: SocketAddr) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    tracing::info!(address = %actual_addr, "HTTP server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received CTRL+C, starting graceful shutdown"),
        () = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stripe::MockCustomerDirectory;
    use crate::domain::webhook::{EventClassifier, WebhookVerifier};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state() -> WebhookAppState {
        WebhookAppState::new(
            WebhookVerifier::new("whsec_test", 300),
            EventClassifier::default(),
            Arc::new(MockCustomerDirectory::new()),
        )
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let app = build_router(state(), &RouterOptions::default());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, r#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn unknown_path_without_static_dir_is_not_found() {
        let app = build_router(state(), &RouterOptions::default());

        let response = app
            .oneshot(Request::builder().uri("/index.html").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn static_dir_serves_unmatched_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>Pasha</h1>").unwrap();
        let options = RouterOptions {
            static_dir: Some(dir.path().to_path_buf()),
            ..RouterOptions::default()
        };
        let app = build_router(state(), &options);

        let response = app
            .oneshot(Request::builder().uri("/index.html").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "<h1>Pasha</h1>");
    }

    #[tokio::test]
    async fn routes_take_precedence_over_static_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("health"), "static").unwrap();
        let options = RouterOptions {
            static_dir: Some(dir.path().to_path_buf()),
            ..RouterOptions::default()
        };
        let app = build_router(state(), &options);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(body_text(response).await, r#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn panicking_handler_becomes_internal_error() {
        async fn boom() -> &'static str {
            panic!("handler exploded")
        }
        let app = with_middleware(
            Router::new().route("/boom", get(boom)),
            &RouterOptions::default(),
        );

        let response = app
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn slow_handler_times_out() {
        async fn slow() -> &'static str {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "done"
        }
        let options = RouterOptions {
            request_timeout: Duration::from_millis(50),
            ..RouterOptions::default()
        };
        let app = with_middleware(Router::new().route("/slow", get(slow)), &options);

        let response = app
            .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }
}
