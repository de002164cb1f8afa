//! Analysis backends.
//!
//! An [`Analyzer`] turns text into ranked suggestions over character spans.
//! Analysis may block on disk or network, so callers run it off the thread
//! that owns the correction session.

pub mod dictionary;
pub mod languagetool;
pub mod spelling;
pub mod suggestions;

use crate::config::{Backend, Config, Dirs};
use crate::parser::FileType;
use crate::AnalyzerOutput;
use anyhow::Result;
use std::sync::Arc;
use tracing::error;

pub use languagetool::LanguageToolAnalyzer;
pub use spelling::DictionaryAnalyzer;

pub trait Analyzer: Send + Sync {
    /// Find correction candidates in `text`. Matches come back sorted by
    /// `from_pos` and never overlap.
    fn analyze(&self, text: &str) -> Result<AnalyzerOutput>;
}

/// Build the analyzer selected by `config`.
pub fn from_config(
    config: &Config,
    dirs: &Dirs,
    language: &str,
    file_type: FileType,
) -> Result<Arc<dyn Analyzer>> {
    Ok(match config.backend {
        Backend::Dictionary => Arc::new(DictionaryAnalyzer::new(config, dirs, language)?.with_file_type(file_type)),
        Backend::LanguageTool => Arc::new(LanguageToolAnalyzer::new(&config.server_url, language)),
    })
}

/// Run `analyzer` on the blocking pool and hand the result back to the
/// calling task. Failures are logged and reported as `None`.
pub async fn analyze_off_thread(analyzer: Arc<dyn Analyzer>, text: String) -> Option<AnalyzerOutput> {
    match tokio::task::spawn_blocking(move || analyzer.analyze(&text)).await {
        Ok(Ok(output)) => Some(output),
        Ok(Err(err)) => {
            error!("analysis failed: {err:#}");
            None
        }
        Err(err) => {
            error!(error = %err, "analysis task did not complete");
            None
        }
    }
}
