//! Runtime components: probing, opening and orchestration

pub mod opener;
pub mod orchestrator;
pub mod probe;

pub use opener::*;
pub use orchestrator::*;
pub use probe::*;
