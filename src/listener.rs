//! Request listener adapter.
//!
//! # Responsibilities
//! - Wrap a caller-supplied fetch handler into a total request → response function
//! - Recover handler failures through a configurable error handler
//! - Honor a cooperative cancellation signal at three checkpoints
//! - Expose the result as a `tower::Service` for mounting on a dispatch host
//!
//! # Design Decisions
//! - The produced listener never fails: the service error type is `Infallible`
//! - Cancellation is result-discarding, not preemptive; in-flight handler
//!   calls run to completion and only their output is suppressed
//! - The error handler runs inside its own catch boundary, separate from the
//!   handler's, so a second-order failure still ends in a fixed response

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use futures_util::future::BoxFuture;
use tower::Service;

use crate::lifecycle::ShutdownSignal;
use crate::response;

/// Boxed error type carried out of handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of an error handler: a replacement response, a decline
/// (fall back to the fixed 500), or a second-order failure.
pub type ErrorHandlerResult = Result<Option<Response>, BoxError>;

type BoxedErrorHandler = Arc<dyn Fn(BoxError) -> BoxFuture<'static, ErrorHandlerResult> + Send + Sync>;

/// A fetch-style request handler.
///
/// Implemented for any `Fn(Request<Body>)` returning a future of
/// `Result<Response, E>`, so plain async closures and `async fn`s qualify.
/// Handlers that compute their response without suspending can return
/// [`std::future::ready`].
pub trait FetchHandler: Send + Sync + 'static {
    /// Process one request, producing a response or an error.
    fn call(&self, request: Request<Body>) -> BoxFuture<'static, Result<Response, BoxError>>;
}

impl<F, Fut, E> FetchHandler for F
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, E>> + Send + 'static,
    E: Into<BoxError>,
{
    fn call(&self, request: Request<Body>) -> BoxFuture<'static, Result<Response, BoxError>> {
        let fut = self(request);
        Box::pin(async move { fut.await.map_err(Into::into) })
    }
}

/// Options for [`create_request_listener`].
#[derive(Default)]
pub struct ListenerOptions {
    on_error: Option<BoxedErrorHandler>,
    signal: Option<ShutdownSignal>,
}

impl ListenerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a custom error handler deciding the response when the request
    /// handler fails.
    ///
    /// Returning `Ok(Some(response))` serves that response, `Ok(None)` falls
    /// back to the fixed 500, and `Err(_)` is swallowed: the listener reports
    /// it and serves the fixed 500 itself.
    pub fn on_error<F, Fut>(mut self, on_error: F) -> Self
    where
        F: Fn(BoxError) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ErrorHandlerResult> + Send + 'static,
    {
        self.on_error = Some(boxed_error_handler(on_error));
        self
    }

    /// Attach a cancellation signal.
    ///
    /// The listener only ever reads the signal; triggering it remains the
    /// owner's job (typically wired to application shutdown).
    pub fn signal(mut self, signal: ShutdownSignal) -> Self {
        self.signal = Some(signal);
        self
    }
}

/// Wrap a fetch handler for registration against a host's request-dispatch
/// mechanism.
///
/// The produced [`RequestListener`] turns every outcome — handler success,
/// handler failure, error-handler failure, cancellation — into exactly one
/// response per request. Nothing escapes it as an error.
///
/// ```no_run
/// use axum::{body::Body, http::Request, response::Response, Router};
/// use fetch_listener::{create_request_listener, BoxError, ListenerOptions};
///
/// async fn handler(_request: Request<Body>) -> Result<Response, BoxError> {
///     Ok(Response::new(Body::from("Hello, world!")))
/// }
///
/// let listener = create_request_listener(handler, ListenerOptions::new());
/// let app: Router = Router::new().fallback_service(listener);
/// ```
pub fn create_request_listener<H>(handler: H, options: ListenerOptions) -> RequestListener
where
    H: FetchHandler,
{
    RequestListener {
        handler: Arc::new(handler),
        on_error: options
            .on_error
            .unwrap_or_else(|| boxed_error_handler(default_error_handler)),
        signal: options.signal,
    }
}

/// A total, cloneable request listener produced by [`create_request_listener`].
///
/// Holds no mutable state; concurrent invocations share only the handler,
/// the error handler, and the externally owned signal.
#[derive(Clone)]
pub struct RequestListener {
    handler: Arc<dyn FetchHandler>,
    on_error: BoxedErrorHandler,
    signal: Option<ShutdownSignal>,
}

impl RequestListener {
    /// Process one request. Always resolves to exactly one response.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        // A handler must never observe a request submitted on an
        // already-cancelled signal.
        if self.is_aborted() {
            return response::request_aborted();
        }

        let response = match self.handler.call(request).await {
            Ok(response) => response,
            Err(error) => {
                // Cancellation outranks error reporting; the failure may be
                // teardown fallout from the abort itself.
                if self.is_aborted() {
                    return response::request_aborted();
                }
                self.recover(error).await
            }
        };

        // A result computed after the signal fired is discarded.
        if self.is_aborted() {
            return response::request_aborted();
        }

        response
    }

    /// Run the installed error handler inside its own catch boundary.
    async fn recover(&self, error: BoxError) -> Response {
        match (self.on_error)(error).await {
            Ok(Some(response)) => response,
            Ok(None) => response::internal_server_error(),
            Err(handler_error) => {
                tracing::error!(error = %handler_error, "error handler failed");
                response::internal_server_error()
            }
        }
    }

    fn is_aborted(&self) -> bool {
        self.signal.as_ref().is_some_and(ShutdownSignal::is_triggered)
    }
}

impl Service<Request<Body>> for RequestListener {
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Infallible>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let listener = self.clone();
        Box::pin(async move { Ok(listener.handle(request).await) })
    }
}

/// Default error handler: reports the failure, serves the fixed 500.
async fn default_error_handler(error: BoxError) -> ErrorHandlerResult {
    tracing::error!(error = %error, "request handler failed");
    Ok(Some(response::internal_server_error()))
}

fn boxed_error_handler<F, Fut>(on_error: F) -> BoxedErrorHandler
where
    F: Fn(BoxError) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ErrorHandlerResult> + Send + 'static,
{
    Arc::new(move |error| {
        let fut: BoxFuture<'static, ErrorHandlerResult> = Box::pin(on_error(error));
        fut
    })
}
