use crate::config::Preferences;
use crate::dict::manager::DictionaryInfo;
use crate::engine::geometry::{visual_rows, FontMetrics};
use crate::engine::{CorrectionSession, Region};
use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonRegion<'a> {
    from: usize,
    to: usize,
    line: usize,
    column: usize,
    source: &'a str,
    replacement: &'a str,
    alternatives: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    text: &'a str,
    regions: Vec<JsonRegion<'a>>,
}

/// 1-based line and column of the character at `index`.
pub fn line_column(buffer: &str, index: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for ch in buffer.chars().take(index) {
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

/// One-line description of a region, used by the report and the review menu.
pub fn describe_region(buffer: &str, region: &Region, colored: bool) -> String {
    let (line, column) = line_column(buffer, region.from());
    let position = format!("{}:{}", line, column);

    if colored {
        format!(
            "{} {} {} {}",
            position.blue().bold(),
            region.source().red().bold(),
            "→".dimmed(),
            region.replacement().green()
        )
    } else {
        format!("{} {} → {}", position, region.source(), region.replacement())
    }
}

/// Region report on stderr, leaving stdout for the corrected text.
pub fn print_regions<M: FontMetrics>(session: &CorrectionSession<M>, colored: bool) {
    let buffer = session.buffer();
    for region in session.regions() {
        eprintln!("  {}", describe_region(buffer, region, colored));

        let others: Vec<&str> = region
            .choices()
            .filter(|choice| *choice != region.replacement())
            .take(5)
            .collect();
        if !others.is_empty() {
            if colored {
                let list = others
                    .iter()
                    .map(|s| s.yellow().to_string())
                    .collect::<Vec<_>>()
                    .join(&", ".dimmed().to_string());
                eprintln!("    {} {}", "also:".dimmed(), list);
            } else {
                eprintln!("    also: {}", others.join(", "));
            }
        }

        if let Some(message) = region.message() {
            if colored {
                eprintln!("    {}", message.dimmed());
            } else {
                eprintln!("    {}", message);
            }
        }
    }
}

/// Serialize the corrected text and its regions.
pub fn to_json<M: FontMetrics>(session: &CorrectionSession<M>) -> Result<String> {
    let buffer = session.buffer();
    let regions = session
        .regions()
        .iter()
        .map(|region| {
            let (line, column) = line_column(buffer, region.from());
            JsonRegion {
                from: region.from(),
                to: region.to(),
                line,
                column,
                source: region.source(),
                replacement: region.replacement(),
                alternatives: region.alternatives(),
                message: region.message(),
            }
        })
        .collect();

    serde_json::to_string_pretty(&JsonOutput { text: buffer, regions })
        .context("Failed to serialize output")
}

/// The wrapped buffer as it is laid out on screen, one entry per visual row,
/// with region text highlighted.
pub fn render_rows<M: FontMetrics>(session: &CorrectionSession<M>, colored: bool) -> Vec<String> {
    let chars: Vec<char> = session.buffer().chars().collect();
    let tab = " ".repeat(tab_cells(session.metrics()));
    let spans: Vec<Range<usize>> = session.regions().iter().map(|r| r.from()..r.to()).collect();

    visual_rows(session.buffer(), session.metrics(), session.viewport())
        .into_iter()
        .map(|row| {
            let mut line = String::new();
            let mut plain = String::new();
            let mut marked = String::new();

            for index in row {
                let ch = chars[index];
                if ch == '\n' {
                    continue;
                }
                let in_region = spans.iter().any(|span| span.contains(&index));
                let target = if in_region && colored {
                    if !plain.is_empty() {
                        line.push_str(&plain);
                        plain.clear();
                    }
                    &mut marked
                } else {
                    if !marked.is_empty() {
                        line.push_str(&marked.yellow().underline().to_string());
                        marked.clear();
                    }
                    &mut plain
                };
                if ch == '\t' {
                    target.push_str(&tab);
                } else {
                    target.push(ch);
                }
            }
            line.push_str(&plain);
            if !marked.is_empty() {
                line.push_str(&marked.yellow().underline().to_string());
            }
            line
        })
        .collect()
}

/// Cells a tab occupies in the layout, so printed rows match it.
fn tab_cells<M: FontMetrics>(metrics: &M) -> usize {
    let cell = metrics.advance(' ');
    if cell <= 0.0 {
        return 1;
    }
    (metrics.advance('\t') / cell).round().max(1.0) as usize
}

pub fn print_summary(corrections: usize, colored: bool) {
    eprintln!();
    if corrections == 0 {
        if colored {
            eprintln!("{}", "✓ Nothing to correct!".green().bold());
        } else {
            eprintln!("✓ Nothing to correct!");
        }
    } else {
        let word = if corrections == 1 { "correction" } else { "corrections" };
        if colored {
            eprintln!(
                "{} {} {} applied",
                "✓".green().bold(),
                corrections.to_string().green().bold(),
                word
            );
        } else {
            eprintln!("✓ {} {} applied", corrections, word);
        }
    }
}

pub fn print_dictionaries(installed: &[DictionaryInfo], colored: bool) {
    if installed.is_empty() {
        println!("No dictionaries installed.");
        println!("Download one with: corrector dict download en_US");
        return;
    }

    if colored {
        println!("{}", "Installed dictionaries:".bold());
    } else {
        println!("Installed dictionaries:");
    }
    for info in installed {
        println!("  {} ({} words)", info.language, info.word_count);
    }
}

pub fn print_dictionary_info(info: &DictionaryInfo, colored: bool) {
    if colored {
        println!("{}", format!("Dictionary: {}", info.language).bold());
    } else {
        println!("Dictionary: {}", info.language);
    }
    println!("  Path:  {}", info.path.display());
    println!("  Size:  {:.1} KB", info.size_bytes as f64 / 1024.0);
    println!("  Words: {}", info.word_count);
}

pub fn print_preferences(prefs: &Preferences, colored: bool) {
    let rows = [
        ("paragraphs", prefs.paragraphs_enabled.to_string()),
        ("sentences", prefs.sentences_per_paragraph.to_string()),
        ("english", prefs.english_enabled.to_string()),
    ];
    for (name, value) in rows {
        if colored {
            println!("{:<12} {}", name.cyan(), value);
        } else {
            println!("{:<12} {}", name, value);
        }
    }
}
