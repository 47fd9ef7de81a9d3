//! The bootstrap lifecycle.
//!
//! # Lifecycle Phases
//!
//! ```text
//! 1. Container Creation
//!    ↓
//! 2. Extension Registration (configuration values injected per extension)
//!    ↓
//! 3. BeforeStartup (each extension, registration order)
//!    ↓
//! 4. OnStartup (each extension, registration order)
//!    ↓
//! 5. AfterStartup (each extension, registration order)
//!    ↓
//! [Running...]
//!    ↓
//! 6. Shutdown Signal (SIGTERM/SIGINT) or explicit shutdown()
//!    ↓
//! 7. OnShutdown (each extension, reverse registration order)
//! ```
//!
//! Each phase is a barrier: no extension enters a phase until every
//! extension has completed the previous one.

mod bootstrapper;
mod error;
mod shutdown;

pub use bootstrapper::Bootstrapper;
pub use error::{BootError, Phase, Result};
pub use shutdown::{ShutdownHandler, shutdown_signal};
