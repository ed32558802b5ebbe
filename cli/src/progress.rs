//! Console progress reporter.

use colored::Colorize;
use lexora_application::ports::progress::{
    ProgressEvent, ProgressEventType, ResearchProgressNotifier,
};

/// Prints progress events and tool activity to stderr.
pub struct ConsoleProgress;

impl ResearchProgressNotifier for ConsoleProgress {
    fn on_event(&self, event: &ProgressEvent) {
        let label = match event.event_type {
            ProgressEventType::Progress => format!("{:>3}%", event.progress_percent).cyan(),
            ProgressEventType::Complete => "done".green(),
            ProgressEventType::Error => "err ".red(),
        };
        eprintln!(
            "[{}] {}: {}",
            label,
            event.step_type.as_str().bold(),
            event.message
        );
    }

    fn on_tool_call(&self, tool_name: &str) {
        eprintln!("      {} {}", "tool".yellow(), tool_name);
    }

    fn on_tool_result(&self, tool_name: &str, success: bool, cache_hit: bool) {
        let mark = if success { "ok".green() } else { "failed".red() };
        let origin = if cache_hit { " (cached)" } else { "" };
        eprintln!("      {} {} {}{}", "tool".yellow(), tool_name, mark, origin);
    }
}
