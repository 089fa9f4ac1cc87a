//! Demo server mounting a request listener on a local HTTP port.
//!
//! Stands in for a host shell: registers the listener as the catch-all
//! service of an axum router and wires Ctrl+C to the shutdown coordinator,
//! so in-flight and subsequent requests resolve to the fixed 499.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fetch_listener::{create_request_listener, BoxError, ListenerOptions, Shutdown};

async fn handler(request: Request<Body>) -> Result<Response, BoxError> {
    if request.uri().path() == "/fail" {
        return Err("synthetic handler failure".into());
    }
    Ok(Response::new(Body::from(format!(
        "Hello from {}",
        request.uri().path()
    ))))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fetch_listener=debug,demo_server=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let shutdown = Shutdown::new();

    let listener = create_request_listener(
        handler,
        ListenerOptions::new()
            .on_error(|error| async move {
                tracing::warn!(error = %error, "handler failed, serving fallback");
                Ok(Some(
                    Response::builder()
                        .status(StatusCode::SERVICE_UNAVAILABLE)
                        .body(Body::from("temporarily unavailable"))?,
                ))
            })
            .signal(shutdown.signal()),
    );

    let app = Router::new().fallback_service(listener);

    let tcp = TcpListener::bind("127.0.0.1:8080").await?;
    tracing::info!(
        address = %tcp.local_addr()?,
        "demo server listening"
    );

    let mut drain = shutdown.signal();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        tracing::info!("Shutdown signal received");
        shutdown.trigger();
    });

    axum::serve(tcp, app)
        .with_graceful_shutdown(async move { drain.triggered().await })
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
