//! Domain models for vaultlog.
//!
//! - [`Session`]: one logged practice or meet, lengths in canonical inches.
//! - [`SessionKind`]: practice (routine snapshot) or meet (attempts).
//! - [`Settings`]: user preferences, currently the display [`Units`](crate::units::Units).
//! - [`plan`]: the fixed weekly training plan.

pub mod plan;
mod session;
mod settings;

pub use session::*;
pub use settings::*;
