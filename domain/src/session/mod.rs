//! Completion session types: structured responses and content blocks.

pub mod response;

pub use response::{CompletionResponse, ContentBlock, StopReason};
