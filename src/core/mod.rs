//! Core domain logic for statsync
//!
//! This module contains the batch and publish logic with no direct I/O.
//! All external interactions are abstracted through port traits.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (`WorkUnit`, `BatchRun`, `PublishAction`)
//! - `services/` - Orchestration and publishing
//! - `ports/` - Trait definitions for external dependencies

pub mod models;
pub mod ports;
pub mod services;
