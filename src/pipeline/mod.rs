// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: request orchestration

mod orchestrator;
mod progress;
pub mod synonyms;

pub use orchestrator::SummaryOrchestrator;
pub use progress::{QueryProgress, QueryStats};
pub use synonyms::{MapThesaurus, NoThesaurus, Thesaurus, alternate_phrase};
