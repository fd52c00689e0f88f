pub mod branch_actions;
pub mod orchestrator;
pub mod reconcile;
pub mod repo_actions;

pub use orchestrator::{ActionPhase, Orchestrator, Services};
pub use reconcile::{Listing, Reconciler, ViewObserver};
