//! Discord command implementations organized by category.

/// General utility commands
pub mod general;

/// Moderation warning commands
pub mod moderation;

/// Voice statistics commands
pub mod stats;

// Export commands
pub use general::*;
pub use moderation::*;
pub use stats::*;
