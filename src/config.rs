use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const LOCAL_CONFIG: &str = ".corrector.toml";
const DEFAULT_SERVER_URL: &str = "https://api.languagetool.org";
const ENGLISH: &str = "en_US";

/// Where configuration and downloaded data live.
#[derive(Debug, Clone)]
pub struct Dirs {
    pub config: PathBuf,
    pub data: PathBuf,
}

impl Dirs {
    /// Platform directories, or everything under `root` when given.
    pub fn resolve(root: Option<&Path>) -> Result<Self> {
        match root {
            Some(root) => Ok(Self::under(root)),
            None => ProjectDirs::from("", "", "corrector")
                .map(|dirs| Self {
                    config: dirs.config_dir().to_path_buf(),
                    data: dirs.data_dir().to_path_buf(),
                })
                .context("Failed to determine the home directory"),
        }
    }

    pub fn under(root: &Path) -> Self {
        Self {
            config: root.to_path_buf(),
            data: root.join("data"),
        }
    }

    pub fn global_config(&self) -> PathBuf {
        self.config.join("config.toml")
    }

    pub fn preferences(&self) -> PathBuf {
        self.config.join("preferences.toml")
    }

    pub fn personal_dictionary(&self) -> PathBuf {
        self.config.join("personal.txt")
    }

    pub fn dictionary(&self, language: &str) -> PathBuf {
        self.data.join(format!("{}.dict", language))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Dictionary,
    LanguageTool,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dictionary" | "dict" => Ok(Backend::Dictionary),
            "languagetool" | "lt" => Ok(Backend::LanguageTool),
            _ => Err(format!("Unknown backend: {}", s)),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Dictionary => write!(f, "dictionary"),
            Backend::LanguageTool => write!(f, "languagetool"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub language: String,
    pub backend: Backend,
    pub server_url: String,
    /// Explicit dictionary file; overrides the installed one for `language`.
    pub dictionary: Option<PathBuf>,
    pub personal_dictionary: Option<PathBuf>,
    pub ignore_patterns: Vec<String>,
    pub max_suggestions: usize,
    pub case_sensitive: bool,
    pub tab_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: ENGLISH.to_string(),
            backend: Backend::Dictionary,
            server_url: DEFAULT_SERVER_URL.to_string(),
            dictionary: None,
            personal_dictionary: None,
            ignore_patterns: vec![
                r"^[A-Z0-9_]{2,}$".to_string(),    // ALL_CAPS
                r"^[a-fA-F0-9]{32,}$".to_string(), // Hashes
            ],
            max_suggestions: 5,
            case_sensitive: false,
            tab_width: 4,
        }
    }
}

/// Settings given on the command line; `None` leaves the file value alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub language: Option<String>,
    pub backend: Option<Backend>,
    pub server_url: Option<String>,
    pub dictionary: Option<PathBuf>,
    pub personal_dictionary: Option<PathBuf>,
    pub ignore_patterns: Vec<String>,
}

/// One configuration file. Only the keys it actually sets are applied.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
struct ConfigLayer {
    language: Option<String>,
    backend: Option<Backend>,
    server_url: Option<String>,
    dictionary: Option<PathBuf>,
    personal_dictionary: Option<PathBuf>,
    ignore_patterns: Option<Vec<String>>,
    max_suggestions: Option<usize>,
    case_sensitive: Option<bool>,
    tab_width: Option<usize>,
}

impl ConfigLayer {
    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global config > defaults
    pub fn load(dirs: &Dirs, overrides: Overrides) -> Result<Self> {
        Self::load_layers(dirs, Path::new(LOCAL_CONFIG), overrides)
    }

    fn load_layers(dirs: &Dirs, local_path: &Path, overrides: Overrides) -> Result<Self> {
        let mut config = Self::default();

        let global_path = dirs.global_config();
        if global_path.exists() {
            config.merge(ConfigLayer::from_file(&global_path)?);
        }

        if local_path.exists() {
            config.merge(ConfigLayer::from_file(local_path)?);
        }

        config.apply(overrides);

        if config.personal_dictionary.is_none() {
            config.personal_dictionary = Some(dirs.personal_dictionary());
        }

        if let Some(path) = &config.personal_dictionary {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .context("Failed to create personal dictionary directory")?;
            }
            if !path.exists() {
                fs::write(path, "").context("Failed to create personal dictionary file")?;
            }
        }

        Ok(config)
    }

    fn merge(&mut self, layer: ConfigLayer) {
        if let Some(language) = layer.language {
            self.language = language;
        }
        if let Some(backend) = layer.backend {
            self.backend = backend;
        }
        if let Some(url) = layer.server_url {
            self.server_url = url;
        }
        if layer.dictionary.is_some() {
            self.dictionary = layer.dictionary;
        }
        if layer.personal_dictionary.is_some() {
            self.personal_dictionary = layer.personal_dictionary;
        }
        if let Some(patterns) = layer.ignore_patterns {
            self.ignore_patterns = patterns;
        }
        if let Some(max) = layer.max_suggestions {
            self.max_suggestions = max;
        }
        if let Some(case_sensitive) = layer.case_sensitive {
            self.case_sensitive = case_sensitive;
        }
        if let Some(tab_width) = layer.tab_width {
            self.tab_width = tab_width;
        }
    }

    fn apply(&mut self, overrides: Overrides) {
        if let Some(language) = overrides.language {
            self.language = language;
        }
        if let Some(backend) = overrides.backend {
            self.backend = backend;
        }
        if let Some(url) = overrides.server_url {
            self.server_url = url;
        }
        if let Some(dict) = overrides.dictionary {
            self.dictionary = Some(dict);
        }
        if let Some(dict) = overrides.personal_dictionary {
            self.personal_dictionary = Some(dict);
        }
        self.ignore_patterns.extend(overrides.ignore_patterns);
    }

    /// Language to analyze in, after the English toggle.
    pub fn analysis_language(&self, preferences: &Preferences) -> String {
        if preferences.english_enabled {
            ENGLISH.to_string()
        } else {
            self.language.clone()
        }
    }
}

/// User preferences of the surrounding session, persisted across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Reflow saved output into paragraphs.
    pub paragraphs_enabled: bool,
    pub sentences_per_paragraph: u32,
    /// Analyze in English regardless of the configured language.
    pub english_enabled: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            paragraphs_enabled: false,
            sentences_per_paragraph: 3,
            english_enabled: false,
        }
    }
}

impl Preferences {
    pub const SENTENCE_RANGE: RangeInclusive<u32> = 1..=10;

    /// Read preferences from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read preferences: {}", path.display()))?;
        let mut prefs: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse preferences: {}", path.display()))?;
        prefs.set_sentences_per_paragraph(prefs.sentences_per_paragraph);
        Ok(prefs)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize preferences")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write preferences: {}", path.display()))
    }

    pub fn set_sentences_per_paragraph(&mut self, sentences: u32) {
        self.sentences_per_paragraph =
            sentences.clamp(*Self::SENTENCE_RANGE.start(), *Self::SENTENCE_RANGE.end());
    }
}
