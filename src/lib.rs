//! Pole-vault session log.
//!
//! Lengths are stored in canonical inches ([`units`]); derived values such as
//! the personal record come from pure functions over the session history
//! ([`stats`]). [`store::Store`] owns the history and the unit preference and
//! persists them through [`db::Database`].

pub mod config;
pub mod db;
pub mod export;
pub mod models;
pub mod render;
pub mod stats;
pub mod store;
pub mod units;
