//! Use cases: the orchestration logic of the research engine.

pub mod deepen;
pub mod run_research;
pub(crate) mod shared;

pub use deepen::{DeepenOutput, DeepenResearchUseCase};
pub use run_research::{
    ResearchConfig, ResearchError, RunResearchInput, RunResearchOutput, RunResearchUseCase,
};
