use crate::analyzer::dictionary::Dictionary;
use crate::config::Dirs;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

// Pinned to a commit so the word list cannot change underneath us.
const WORDLIST_BASE_URL: &str =
    "https://raw.githubusercontent.com/dwyl/english-words/6e4bc58ad764c3e6df8b5be4048671962c9d6a23";
pub const WORDLIST_VERSION: &str = "2023.12";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryInfo {
    pub language: String,
    pub path: PathBuf,
    pub word_count: usize,
    pub size_bytes: u64,
}

/// Installed dictionaries, sorted by language.
pub fn list_dictionaries(dirs: &Dirs) -> Result<Vec<DictionaryInfo>> {
    if !dirs.data.exists() {
        return Ok(Vec::new());
    }

    let mut installed = Vec::new();
    for entry in fs::read_dir(&dirs.data).context("Failed to read data directory")? {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) != Some("dict") {
            continue;
        }
        if let Some(language) = path.file_stem().and_then(|s| s.to_str()) {
            if let Some(info) = dictionary_info(dirs, language)? {
                installed.push(info);
            }
        }
    }

    installed.sort_by(|a, b| a.language.cmp(&b.language));
    Ok(installed)
}

/// Details of the installed dictionary for `language`, if any.
pub fn dictionary_info(dirs: &Dirs, language: &str) -> Result<Option<DictionaryInfo>> {
    let path = dirs.dictionary(language);
    if !path.exists() {
        return Ok(None);
    }

    let size_bytes = fs::metadata(&path)?.len();
    let word_count = Dictionary::load_from_path(&path)?.len();

    Ok(Some(DictionaryInfo {
        language: language.to_string(),
        path,
        word_count,
        size_bytes,
    }))
}

fn wordlist_url(language: &str) -> Result<String> {
    match language {
        "en_US" | "en_GB" => Ok(format!("{}/words_alpha.txt", WORDLIST_BASE_URL)),
        other => anyhow::bail!(
            "Language '{}' is not supported. Only 'en_US' and 'en_GB' are currently available.",
            other
        ),
    }
}

/// Download the word list for `language` and install it as an FST.
pub fn download_dictionary(dirs: &Dirs, language: &str) -> Result<DictionaryInfo> {
    let url = wordlist_url(language)?;
    fs::create_dir_all(&dirs.data).context("Failed to create data directory")?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Downloading {}", url));

    let response = reqwest::blocking::get(&url).context("Failed to download dictionary")?;
    if !response.status().is_success() {
        pb.finish_and_clear();
        anyhow::bail!("Failed to download dictionary: HTTP {}", response.status());
    }
    let content = response.text()?;

    pb.set_message("Building dictionary");
    let words = parse_wordlist(&content);
    let path = dirs.dictionary(language);
    let word_count = Dictionary::build_from_words(&words, &path)?;
    pb.finish_and_clear();

    info!(language, words = word_count, path = %path.display(), "dictionary installed");
    Ok(DictionaryInfo {
        language: language.to_string(),
        size_bytes: fs::metadata(&path)?.len(),
        path,
        word_count,
    })
}

/// Re-download every installed dictionary.
pub fn update_dictionaries(dirs: &Dirs) -> Result<Vec<DictionaryInfo>> {
    list_dictionaries(dirs)?
        .into_iter()
        .map(|installed| download_dictionary(dirs, &installed.language))
        .collect()
}

/// One lowercase word per line; blank lines and single letters dropped.
fn parse_wordlist(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| line.chars().count() > 1)
        .collect()
}
