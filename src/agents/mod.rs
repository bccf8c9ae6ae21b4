//! Query orchestration.
//!
//! A query flows through these stages:
//!
//! 1. [`fast_path`] - pure arithmetic goes straight to the calculator
//! 2. [`router`] - the model picks a tool and its arguments
//! 3. [`executor`] - the chosen tool (or the conversational fallback) runs
//! 4. [`failure`] - provider errors become friendly text
//!
//! [`Orchestrator`] ties them together.

pub mod executor;
pub mod failure;
pub mod fast_path;
pub mod orchestrator;
pub mod router;

pub use executor::CapabilityExecutor;
pub use orchestrator::Orchestrator;
pub use router::IntentRouter;
