//! Fetch Listener Adapter Library
//!
//! Wraps a fetch-style request handler so it can be registered against a
//! host application's request-dispatch mechanism. The produced listener is
//! total: every invocation resolves to exactly one response, whether the
//! handler succeeded, failed, or the request was cancelled.
//!
//! ```text
//! Host dispatch ──▶ RequestListener::handle
//!     signal aborted? ──▶ fixed 499
//!     handler(request)
//!         Err ──▶ signal aborted? ──▶ fixed 499
//!               ──▶ error handler ──▶ response | fixed 500
//!     signal aborted? ──▶ fixed 499 (late result discarded)
//!     ──▶ response
//! ```

pub mod lifecycle;
pub mod listener;
mod response;

pub use lifecycle::{Shutdown, ShutdownSignal};
pub use listener::{
    create_request_listener, BoxError, ErrorHandlerResult, FetchHandler, ListenerOptions,
    RequestListener,
};
