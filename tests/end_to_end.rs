//! End-to-end tests mounting the listener on a real HTTP server.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use tokio::net::TcpListener;

use fetch_listener::{
    create_request_listener, BoxError, ListenerOptions, RequestListener, Shutdown,
};

async fn echo_handler(request: Request<Body>) -> Result<Response, BoxError> {
    match request.uri().path() {
        "/fail" => Err("synthetic failure".into()),
        path => Ok(Response::new(Body::from(format!("echo {path}")))),
    }
}

/// Serve the listener as the catch-all service of a bare router.
async fn serve(listener: RequestListener) -> SocketAddr {
    let app = Router::new().fallback_service(listener);
    let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = tcp.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(tcp, app).await.unwrap();
    });

    addr
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn test_success_over_http() {
    let listener = create_request_listener(echo_handler, ListenerOptions::new());
    let addr = serve(listener).await;

    let res = client()
        .get(format!("http://{addr}/hello"))
        .send()
        .await
        .expect("Listener unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "echo /hello");
}

#[tokio::test]
async fn test_handler_failure_over_http() {
    let listener = create_request_listener(echo_handler, ListenerOptions::new());
    let addr = serve(listener).await;

    let res = client()
        .get(format!("http://{addr}/fail"))
        .send()
        .await
        .expect("Listener unreachable");

    assert_eq!(res.status(), 500);
    assert_eq!(
        res.headers()["content-type"].to_str().unwrap(),
        "text/plain"
    );
    assert_eq!(res.text().await.unwrap(), "Internal Server Error");
}

#[tokio::test]
async fn test_custom_error_handler_over_http() {
    let listener = create_request_listener(
        echo_handler,
        ListenerOptions::new().on_error(|_error| async {
            Ok(Some(
                Response::builder()
                    .status(503)
                    .body(Body::from("be right back"))?,
            ))
        }),
    );
    let addr = serve(listener).await;

    let res = client()
        .get(format!("http://{addr}/fail"))
        .send()
        .await
        .expect("Listener unreachable");

    assert_eq!(res.status(), 503);
    assert_eq!(res.text().await.unwrap(), "be right back");
}

#[tokio::test]
async fn test_shutdown_aborts_subsequent_requests() {
    let called = Arc::new(AtomicBool::new(false));
    let called_in_handler = called.clone();

    let shutdown = Shutdown::new();
    let listener = create_request_listener(
        move |request: Request<Body>| {
            let called = called_in_handler.clone();
            async move {
                called.store(true, Ordering::SeqCst);
                echo_handler(request).await
            }
        },
        ListenerOptions::new().signal(shutdown.signal()),
    );
    let addr = serve(listener).await;

    // Before the trigger the listener behaves normally.
    let res = client()
        .get(format!("http://{addr}/first"))
        .send()
        .await
        .expect("Listener unreachable");
    assert_eq!(res.status(), 200);
    assert!(called.load(Ordering::SeqCst));

    shutdown.trigger();
    called.store(false, Ordering::SeqCst);

    let res = client()
        .get(format!("http://{addr}/second"))
        .send()
        .await
        .expect("Listener unreachable");

    assert_eq!(res.status().as_u16(), 499);
    assert_eq!(res.text().await.unwrap(), "Request aborted");
    assert!(!called.load(Ordering::SeqCst), "Handler ran after abort");
}
