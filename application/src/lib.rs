//! Application layer for lexora
//!
//! This crate contains use cases and port definitions. It depends only on
//! the domain layer; adapters for every port live in the infrastructure
//! layer and are injected at wiring time.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    cache::ResultCache,
    completion::{CompletionGateway, CompletionSession, GatewayError, ToolResultMessage},
    law::{CaseLawSearchPort, DateRange, LawSourceError, RegulationPort},
    progress::{NoProgress, ProgressEvent, ProgressEventType, ResearchProgressNotifier, StepType},
    tool_executor::ToolExecutorPort,
};
pub use use_cases::{
    DeepenOutput, DeepenResearchUseCase, ResearchConfig, ResearchError, RunResearchInput,
    RunResearchOutput, RunResearchUseCase,
};
