use crate::analyzer::dictionary::Dictionary;
use crate::analyzer::{suggestions, Analyzer};
use crate::config::{Config, Dirs};
use crate::parser::{self, FileType, WordSpan};
use crate::{AnalyzerOutput, Match};
use anyhow::{Context, Result};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use tracing::{debug, warn};

/// Offline spelling analysis against a word list.
pub struct DictionaryAnalyzer {
    dictionary: Dictionary,
    personal_words: HashSet<String>,
    ignore_patterns: Vec<Regex>,
    file_type: FileType,
    max_suggestions: usize,
    case_sensitive: bool,
}

impl DictionaryAnalyzer {
    pub fn new(config: &Config, dirs: &Dirs, language: &str) -> Result<Self> {
        let dictionary = match &config.dictionary {
            Some(path) => Dictionary::load_from_path(path)?,
            None => Dictionary::load(language, dirs)?,
        };

        let mut analyzer = Self::with_dictionary(dictionary);
        analyzer.max_suggestions = config.max_suggestions;
        analyzer.case_sensitive = config.case_sensitive;

        if let Some(personal_dict_path) = &config.personal_dictionary {
            if personal_dict_path.exists() {
                let content = fs::read_to_string(personal_dict_path)
                    .context("Failed to read personal dictionary")?;
                analyzer = analyzer.with_personal_words(
                    content
                        .lines()
                        .map(str::trim)
                        .filter(|word| !word.is_empty() && !word.starts_with('#')),
                );
            }
        }

        for pattern in &config.ignore_patterns {
            match Regex::new(pattern) {
                Ok(re) => analyzer.ignore_patterns.push(re),
                Err(e) => warn!(pattern = %pattern, error = %e, "skipping invalid ignore pattern"),
            }
        }

        Ok(analyzer)
    }

    pub fn with_dictionary(dictionary: Dictionary) -> Self {
        Self {
            dictionary,
            personal_words: HashSet::new(),
            ignore_patterns: Vec::new(),
            file_type: FileType::PlainText,
            max_suggestions: 5,
            case_sensitive: false,
        }
    }

    pub fn with_file_type(mut self, file_type: FileType) -> Self {
        self.file_type = file_type;
        self
    }

    pub fn with_personal_words<'a>(mut self, words: impl IntoIterator<Item = &'a str>) -> Self {
        self.personal_words
            .extend(words.into_iter().map(str::to_lowercase));
        self
    }

    fn is_known(&self, span: &WordSpan) -> bool {
        let lower = span.text.to_lowercase();
        if self.personal_words.contains(&lower) {
            return true;
        }
        if self.case_sensitive {
            self.dictionary.contains(&span.text)
        } else {
            self.dictionary.contains(&lower)
        }
    }

    fn should_ignore(&self, word: &str) -> bool {
        if word.chars().count() <= 1 {
            return true;
        }

        if word.chars().any(|c| c.is_numeric()) {
            return true;
        }

        self.ignore_patterns.iter().any(|pattern| pattern.is_match(word))
    }
}

impl Analyzer for DictionaryAnalyzer {
    fn analyze(&self, text: &str) -> Result<AnalyzerOutput> {
        let spans = parser::parse(text, self.file_type);
        let words = spans.len();

        let matches: Vec<Match> = spans
            .into_iter()
            .filter(|span| !self.should_ignore(&span.text) && !self.is_known(span))
            .map(|span| {
                let suggestions = suggestions::generate(&span.text.to_lowercase(), &self.dictionary, self.max_suggestions)
                    .into_iter()
                    .map(|s| match_case(&span.text, &s))
                    .collect();
                Match::new(span.start, span.end, suggestions)
                    .with_message(format!("Possible spelling mistake: '{}'", span.text))
            })
            .collect();

        debug!(words, misspelled = matches.len(), "dictionary analysis finished");
        Ok(AnalyzerOutput { matches })
    }
}

/// Give `suggestion` the capitalisation pattern of `original`.
fn match_case(original: &str, suggestion: &str) -> String {
    let mut chars = original.chars();
    let first_upper = chars.next().is_some_and(char::is_uppercase);
    let rest_upper = original.chars().count() > 1 && chars.all(|c| !c.is_lowercase());

    if first_upper && rest_upper {
        suggestion.to_uppercase()
    } else if first_upper {
        let mut out = String::with_capacity(suggestion.len());
        let mut rest = suggestion.chars();
        if let Some(first) = rest.next() {
            out.extend(first.to_uppercase());
        }
        out.push_str(rest.as_str());
        out
    } else {
        suggestion.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> DictionaryAnalyzer {
        DictionaryAnalyzer::with_dictionary(Dictionary::from_words(["the", "cat", "sat", "on", "mat", "hello"]).unwrap())
    }

    #[test]
    fn test_finds_misspellings_with_char_offsets() {
        let output = analyzer().analyze("The ćat sat on teh mat").unwrap();
        let spans: Vec<_> = output.matches.iter().map(|m| (m.from_pos, m.to_pos)).collect();
        assert_eq!(spans, vec![(4, 7), (15, 18)]);
        assert_eq!(output.matches[1].suggestions[0], "the");
        assert!(output.matches[1].message.as_deref().unwrap().contains("teh"));
    }

    #[test]
    fn test_personal_words_and_patterns() {
        let mut analyzer = analyzer().with_personal_words(["Rustacean"]);
        analyzer.ignore_patterns.push(Regex::new(r"^[A-Z]{2,}$").unwrap());
        let output = analyzer.analyze("hello rustacean NASA x2y").unwrap();
        assert!(output.matches.is_empty());
    }

    #[test]
    fn test_suggestions_keep_case() {
        let output = analyzer().analyze("Teh CAAT").unwrap();
        assert_eq!(output.matches[0].suggestions[0], "The");
        assert_eq!(output.matches[1].suggestions[0], "CAT");
    }

    #[test]
    fn test_markdown_code_is_not_analyzed() {
        let output = analyzer()
            .with_file_type(FileType::Markdown)
            .analyze("hello `qwzx` teh\n")
            .unwrap();
        assert_eq!(output.matches.len(), 1);
        assert_eq!(output.matches[0].from_pos, 13);
    }

    #[test]
    fn test_match_case() {
        assert_eq!(match_case("teh", "the"), "the");
        assert_eq!(match_case("Teh", "the"), "The");
        assert_eq!(match_case("TEH", "the"), "THE");
        assert_eq!(match_case("T", "the"), "The");
    }
}
