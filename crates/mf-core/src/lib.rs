//! mf-core: shared foundation for the max-flow workspace.
//!
//! Contains:
//! - numeric (vertex-index and capacity width traits, implemented for u32/u64)
//! - error (shared error types)
//! - timing (opt-in wall-clock timers, enabled by `MF_TIMING`)

pub mod error;
pub mod numeric;
pub mod timing;

// Re-exports: nice ergonomics for downstream crates
pub use error::{MfError, MfResult};
pub use numeric::{Capacity, VertexIndex};
