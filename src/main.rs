use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use colored::*;
use console::Term;
use corrector::cli::output::{self, OutputFormat};
use corrector::config::{Backend, Dirs, Overrides};
use corrector::engine::{MonospaceMetrics, Viewport};
use corrector::parser::FileType;
use corrector::{analyzer, cli, dict, logging, reflow, Config, CorrectionSession, Preferences};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "corrector")]
#[command(version, about = "Correct text in one pass, then review every change", long_about = None)]
struct Cli {
    /// File to correct (reads stdin when omitted)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Write the corrected text here instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Review each correction before writing
    #[arg(short, long, requires = "file")]
    interactive: bool,

    /// Analysis backend (dictionary, languagetool)
    #[arg(short, long)]
    backend: Option<Backend>,

    /// Language to analyze in (e.g., en_US, de_DE)
    #[arg(short, long)]
    language: Option<String>,

    /// LanguageTool server
    #[arg(long, value_name = "URL")]
    server_url: Option<String>,

    /// Dictionary file to use instead of the installed one
    #[arg(long, value_name = "PATH")]
    dictionary: Option<PathBuf>,

    /// Personal dictionary file
    #[arg(long, value_name = "PATH")]
    personal_dict: Option<PathBuf>,

    /// Pattern to ignore (regex)
    #[arg(long)]
    ignore_pattern: Vec<String>,

    /// Wrapping width in columns (defaults to the terminal width)
    #[arg(long)]
    width: Option<u16>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Directory holding configuration and dictionaries
    #[arg(long, env = "CORRECTOR_CONFIG_DIR", value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Dictionary management
    Dict {
        #[command(subcommand)]
        action: DictCommands,
    },
    /// Session preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsCommands,
    },
}

#[derive(Parser, Debug)]
enum DictCommands {
    /// List installed dictionaries
    List,
    /// Download a dictionary
    Download {
        /// Language code (e.g., en_US, en_GB)
        language: String,
    },
    /// Update all dictionaries
    Update,
    /// Show dictionary info
    Info {
        /// Language code
        language: String,
    },
}

#[derive(Parser, Debug)]
enum PrefsCommands {
    /// Print the current preferences
    Show,
    /// Change one or more preferences
    Set {
        /// Reflow saved text into paragraphs
        #[arg(long)]
        paragraphs: Option<bool>,
        /// Sentences per paragraph (1-10)
        #[arg(long)]
        sentences: Option<u32>,
        /// Always analyze in English
        #[arg(long)]
        english: Option<bool>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "corrector", &mut io::stdout());
        return Ok(());
    }

    let dirs = Dirs::resolve(cli.config_dir.as_deref())?;
    let colored = !cli.no_color;

    if let Some(command) = cli.command {
        return handle_command(command, &dirs, colored);
    }

    let (original, file_type) = match &cli.file {
        Some(path) => (
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?,
            FileType::from_path(path),
        ),
        None => (io::read_to_string(io::stdin()).context("Failed to read stdin")?, FileType::default()),
    };

    let config = Config::load(
        &dirs,
        Overrides {
            language: cli.language,
            backend: cli.backend,
            server_url: cli.server_url,
            dictionary: cli.dictionary,
            personal_dictionary: cli.personal_dict,
            ignore_patterns: cli.ignore_pattern,
        },
    )?;
    let prefs = Preferences::load_from(&dirs.preferences())?;

    let options = RunOptions {
        file_type,
        width: cli.width,
        format: cli.format,
        interactive: cli.interactive,
        output: cli.output,
        colored,
    };
    let outcome = correct(&original, &config, &dirs, &prefs, &options);

    // Preferences are written back even when the run itself failed.
    let saved = prefs.save_to(&dirs.preferences());
    outcome.and(saved)
}

struct RunOptions {
    file_type: FileType,
    width: Option<u16>,
    format: OutputFormat,
    interactive: bool,
    output: Option<PathBuf>,
    colored: bool,
}

fn correct(original: &str, config: &Config, dirs: &Dirs, prefs: &Preferences, options: &RunOptions) -> Result<()> {
    let language = config.analysis_language(prefs);
    let analyzer = analyzer::from_config(config, dirs, &language, options.file_type)?;

    // The runtime only lives for the analysis; blocking HTTP clients must
    // not be created inside it on this thread.
    let analysis = {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .context("Failed to start analysis runtime")?;
        runtime.block_on(analyzer::analyze_off_thread(analyzer, original.to_string()))
    };

    let metrics = MonospaceMetrics::terminal(config.tab_width);
    let viewport = viewport_for(options.width, &metrics);
    let mut session = CorrectionSession::new(metrics, viewport);
    session.run_batch(original, analysis)?;

    let colored = options.colored;
    match options.format {
        OutputFormat::Text => {
            output::print_regions(&session, colored);
            if options.interactive {
                cli::review::run(&mut session, colored)?;
            }
            let corrections = session
                .regions()
                .iter()
                .filter(|region| region.replacement() != region.source())
                .count();
            write_text(&final_text(session.buffer(), prefs), options.output.as_deref())?;
            output::print_summary(corrections, colored);
        }
        OutputFormat::Json => {
            println!("{}", output::to_json(&session)?);
            if let Some(path) = options.output.as_deref() {
                write_text(&final_text(session.buffer(), prefs), Some(path))?;
            }
        }
    }
    Ok(())
}

fn viewport_for(width: Option<u16>, metrics: &MonospaceMetrics) -> Viewport {
    let columns = width.or_else(|| Term::stdout().size_checked().map(|(_, cols)| cols));
    match columns {
        Some(columns) => Viewport::new(f32::from(columns) * metrics.cell_width),
        None => Viewport::unbounded(),
    }
}

fn final_text(buffer: &str, prefs: &Preferences) -> String {
    if prefs.paragraphs_enabled {
        reflow::reflow(buffer, prefs.sentences_per_paragraph)
    } else {
        buffer.to_string()
    }
}

fn write_text(text: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes()).context("Failed to write stdout")?;
            stdout.flush().context("Failed to write stdout")
        }
    }
}

fn handle_command(command: Commands, dirs: &Dirs, colored: bool) -> Result<()> {
    match command {
        Commands::Dict { action } => match action {
            DictCommands::List => {
                output::print_dictionaries(&dict::manager::list_dictionaries(dirs)?, colored);
            }
            DictCommands::Download { language } => {
                let info = dict::manager::download_dictionary(dirs, &language)?;
                if colored {
                    println!("{} Installed {} ({} words)", "✓".green().bold(), info.language, info.word_count);
                } else {
                    println!("✓ Installed {} ({} words)", info.language, info.word_count);
                }
            }
            DictCommands::Update => {
                let updated = dict::manager::update_dictionaries(dirs)?;
                if updated.is_empty() {
                    println!("No dictionaries installed.");
                }
                for info in updated {
                    println!("✓ Updated {} ({} words)", info.language, info.word_count);
                }
            }
            DictCommands::Info { language } => match dict::manager::dictionary_info(dirs, &language)? {
                Some(info) => output::print_dictionary_info(&info, colored),
                None => anyhow::bail!(
                    "Dictionary '{}' is not installed. Run: corrector dict download {}",
                    language,
                    language
                ),
            },
        },
        Commands::Prefs { action } => {
            let path = dirs.preferences();
            let mut prefs = Preferences::load_from(&path)?;
            if let PrefsCommands::Set { paragraphs, sentences, english } = action {
                if let Some(paragraphs) = paragraphs {
                    prefs.paragraphs_enabled = paragraphs;
                }
                if let Some(sentences) = sentences {
                    prefs.set_sentences_per_paragraph(sentences);
                }
                if let Some(english) = english {
                    prefs.english_enabled = english;
                }
                prefs.save_to(&path)?;
            }
            output::print_preferences(&prefs, colored);
        }
    }
    Ok(())
}
