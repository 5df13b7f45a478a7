/*!
 * Core Module
 * Fundamental monitor types, limits and error handling
 */

pub mod clock;
pub mod data_structures;
pub mod errors;
pub mod limits;
pub mod sync;
pub mod types;

// Re-export for convenience
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use errors::*;
pub use types::*;
