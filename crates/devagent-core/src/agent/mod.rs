mod orchestrator;

pub use orchestrator::{FileSelection, Orchestrator, SendOutcome, Status};
