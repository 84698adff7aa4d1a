//! Globe Antipode: look up a place, find the point on the opposite side of
//! the Earth, and frame both on the globe joined by a beam.
//!
//! [`SearchOrchestrator`] runs lookups and publishes [`SearchState`];
//! [`PresentationShell`] owns the globe engine and applies that state each
//! frame; [`ScenePostProcessor`] makes the finished scene translucent once.

pub mod config;
pub mod orchestrator;
pub mod post_process;
pub mod shell;
pub mod state;

pub use config::*;
pub use orchestrator::*;
pub use post_process::*;
pub use shell::*;
pub use state::*;
