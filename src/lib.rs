pub mod analyzer;
pub mod cli;
pub mod config;
pub mod dict;
pub mod engine;
pub mod logging;
pub mod parser;
pub mod reflow;

pub use analyzer::Analyzer;
pub use config::{Config, Preferences};
pub use engine::{CorrectionSession, EngineError, Region, RegionId};

use serde::{Deserialize, Serialize};

/// Everything an analyzer found in one text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerOutput {
    /// Sorted by `from_pos`, non-overlapping.
    pub matches: Vec<Match>,
}

/// A finding over the analyzed text, in character offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub from_pos: usize,
    pub to_pos: usize,
    /// Ranked best first; may be empty.
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Match {
    pub fn new(from_pos: usize, to_pos: usize, suggestions: Vec<String>) -> Self {
        Self {
            from_pos,
            to_pos,
            suggestions,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
