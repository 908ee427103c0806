//! Generation pipeline
//!
//! Research and Plan run from the brief alone; Assets needs a plan and uses
//! research when it has one. Every stage validates the response against its
//! document contract and retries once on a contract violation.

pub mod assets;
mod brief;
mod error;
mod orchestrator;
pub mod plan;
pub mod research;
mod session;
mod stage;

pub use brief::Brief;
pub use error::StageError;
pub use orchestrator::{Orchestrator, PLAN_REQUIRED, RunReport, StageOutcome};
pub use session::{Session, StageStatus};
pub use stage::{STRICT_JSON_SUFFIX, Stage};
