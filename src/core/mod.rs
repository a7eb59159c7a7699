/*!
 * Core Module
 * Fundamental probe types, limits and error handling
 */

pub mod errors;
pub mod format;
pub mod limits;
pub mod types;

// Re-export for convenience
pub use errors::*;
pub use format::format_memory;
pub use types::*;
