//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build relay & server → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C received → broadcast signal → stop accepting → drain → exit
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
