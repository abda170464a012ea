//! Domain models for statsync
//!
//! Pure data structures with no I/O dependencies.
//!
//! - [`WorkUnit`] - One rebuildable entity and how to produce it
//! - [`RefreshMode`] - Full rebuild or incremental update
//! - [`BatchRun`] - One pass over the units and its lifecycle
//! - [`PublishAction`] / [`PublishReport`] - What to commit and what happened

mod mode;
mod publish;
mod run;
mod unit;

pub use mode::RefreshMode;
pub use publish::{
    PublishAction, PublishRecord, PublishReport, PublishStep, SyncStrategy, format_timestamp,
};
pub use run::{BatchRun, RunStatus, UnitOutcome, UnitRecord};
pub use unit::{ProducerInvocation, WorkUnit, validate_units};
