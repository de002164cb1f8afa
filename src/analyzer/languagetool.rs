use crate::analyzer::Analyzer;
use crate::{AnalyzerOutput, Match};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Grammar and spelling analysis through a LanguageTool server.
pub struct LanguageToolAnalyzer {
    endpoint: String,
    language: String,
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    matches: Vec<CheckMatch>,
}

#[derive(Debug, Deserialize)]
struct CheckMatch {
    #[serde(default)]
    message: String,
    /// UTF-16 code units, not characters.
    offset: usize,
    length: usize,
    #[serde(default)]
    replacements: Vec<Replacement>,
}

#[derive(Debug, Deserialize)]
struct Replacement {
    value: String,
}

impl LanguageToolAnalyzer {
    pub fn new(server_url: &str, language: &str) -> Self {
        Self {
            endpoint: format!("{}/v2/check", server_url.trim_end_matches('/')),
            language: language_code(language),
        }
    }
}

impl Analyzer for LanguageToolAnalyzer {
    fn analyze(&self, text: &str) -> Result<AnalyzerOutput> {
        // The blocking client owns a runtime of its own, so it is built on
        // the analysis thread rather than held across async contexts.
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        let response = client
            .post(&self.endpoint)
            .form(&[("text", text), ("language", self.language.as_str())])
            .send()
            .with_context(|| format!("Failed to reach {}", self.endpoint))?;

        if !response.status().is_success() {
            anyhow::bail!("LanguageTool request failed: HTTP {}", response.status());
        }

        let body = response.text().context("Failed to read LanguageTool response")?;
        let parsed: CheckResponse =
            serde_json::from_str(&body).context("Failed to parse LanguageTool response")?;

        debug!(matches = parsed.matches.len(), language = %self.language, "LanguageTool check finished");
        Ok(into_output(text, parsed))
    }
}

/// `en_US` style codes become the `en-US` form the server expects.
pub fn language_code(language: &str) -> String {
    language.replace('_', "-")
}

/// Convert server matches into sorted, non-overlapping character spans.
fn into_output(text: &str, response: CheckResponse) -> AnalyzerOutput {
    let offsets = utf16_to_char_offsets(text);

    let mut matches: Vec<Match> = response
        .matches
        .into_iter()
        .filter_map(|m| {
            let from = offsets.get(m.offset).copied();
            let to = offsets.get(m.offset + m.length).copied();
            let (Some(from_pos), Some(to_pos)) = (from, to) else {
                warn!(offset = m.offset, length = m.length, "dropping match outside the text");
                return None;
            };
            let suggestions = m.replacements.into_iter().map(|r| r.value).collect();
            Some(Match::new(from_pos, to_pos, suggestions).with_message(m.message))
        })
        .collect();

    matches.sort_by_key(|m| (m.from_pos, m.to_pos));

    let mut accepted: Vec<Match> = Vec::with_capacity(matches.len());
    for m in matches {
        if accepted.last().is_some_and(|prev| m.from_pos < prev.to_pos) {
            warn!(from = m.from_pos, to = m.to_pos, "dropping overlapping match");
            continue;
        }
        accepted.push(m);
    }

    AnalyzerOutput { matches: accepted }
}

/// Map every UTF-16 offset (including the end) to a character offset.
fn utf16_to_char_offsets(text: &str) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(text.len() + 1);
    let mut count = 0;
    for (index, ch) in text.chars().enumerate() {
        for _ in 0..ch.len_utf16() {
            offsets.push(index);
        }
        count = index + 1;
    }
    offsets.push(count);
    offsets
}
