//! core/mod.rs
//!
//! The brain of the crate:
//! - `types` / `record`: the canonical record and its field vocabulary
//! - `tags`: mapping table, encoders, stores, writer
//! - `config` / `error`: ambient plumbing
//!
//! Pipeline for a single write:
//!   (A) resolve album art (one read + one delete)
//!   (B) encode record -> Vec<(key, value)> for the target scheme
//!   (C) apply to an open store, optionally save
//!
//! (B) is pure, so callers can inspect exactly what would be written.

pub mod config;
pub mod error;
pub mod record;
pub mod tags;
pub mod types;
