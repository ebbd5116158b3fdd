//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → resolve wait_for_signal()
//!
//! Shutdown (shutdown.rs):
//!     trigger() → every subscriber wakes → server stops accepting → drain → exit
//! ```
//!
//! # Design Decisions
//! - Ordered shutdown: stop accept, drain in-flight requests, exit
//! - Config reload is file-driven, not signal-driven

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::wait_for_signal;
