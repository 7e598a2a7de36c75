//! ss-core: shared foundation for the steady-state workspace.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - timing (opt-in phase timers for the elimination engine)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod timing;

pub use error::{SsError, SsResult};
pub use numeric::*;
