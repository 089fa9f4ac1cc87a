//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Owner (application shell):
//!     Shutdown::new() → hand signal() views to listeners → trigger() on quit
//!
//! Listener:
//!     ShutdownSignal::is_triggered() at each checkpoint → discard late results
//! ```
//!
//! # Design Decisions
//! - The signal is advisory: in-flight handlers are never preempted
//! - Ownership is one-way; listeners hold read-only views

pub mod shutdown;

pub use shutdown::{Shutdown, ShutdownSignal};
