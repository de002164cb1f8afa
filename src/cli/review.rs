//! Interactive review of the regions left by a batch pass.
//!
//! The terminal stands in for the editor surface: the wrapped buffer is
//! drawn one page at a time, paging reports a scroll change to the session,
//! and picking a cell goes through the session's screen-space hit test.

use crate::cli::output::{describe_region, render_rows};
use crate::engine::geometry::{FontMetrics, Point, Viewport};
use crate::engine::{CorrectionSession, RegionId};
use anyhow::Result;
use colored::*;
use console::Term;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};

/// Cells taken by the row-number gutter and the space after it.
const GUTTER_CELLS: u16 = 7;

enum Action {
    Region(RegionId),
    PickByPosition,
    PageDown,
    PageUp,
    Done,
}

/// Walk the user through the regions, swapping in whichever choice they
/// pick. Returns how many swaps were made.
pub fn run<M: FontMetrics>(session: &mut CorrectionSession<M>, colored: bool) -> Result<usize> {
    if session.regions().is_empty() {
        return Ok(0);
    }

    let term = Term::stderr();
    let theme = ColorfulTheme::default();
    let (term_rows, term_cols) = term.size();
    let page = usize::from(term_rows).saturating_sub(8).max(1);
    let line_height = session.metrics().line_height();

    let outer = session.viewport();
    let review = review_viewport(outer, term_cols, session.metrics().advance(' '));
    session.on_viewport_resized(review);

    let mut top_row = 0;
    let mut swaps = 0;

    loop {
        let rows = render_rows(session, colored);
        term.write_line("")?;
        for (number, row) in rows.iter().enumerate().skip(top_row).take(page) {
            let gutter = format!("{:>4} │", number - top_row + 1);
            if colored {
                term.write_line(&format!("{} {}", gutter.dimmed(), row))?;
            } else {
                term.write_line(&format!("{} {}", gutter, row))?;
            }
        }

        let mut actions = Vec::new();
        let mut items = Vec::new();
        for region in session.regions() {
            actions.push(Action::Region(region.id()));
            items.push(describe_region(session.buffer(), region, colored));
        }
        for (action, label) in [
            (Action::PickByPosition, "Pick by position"),
            (Action::PageDown, "Page down"),
            (Action::PageUp, "Page up"),
            (Action::Done, "Done"),
        ] {
            actions.push(action);
            items.push(label.to_string());
        }

        let selected = Select::with_theme(&theme)
            .with_prompt("Review")
            .items(&items)
            .default(0)
            .interact_on(&term)?;

        match &actions[selected] {
            Action::Region(id) => {
                if choose(session, *id, &theme, &term)? {
                    swaps += 1;
                }
            }
            Action::PickByPosition => {
                let cell = Input::<String>::with_theme(&theme)
                    .with_prompt("Screen row:column")
                    .interact_text_on(&term)?;
                let Some((row, column)) = parse_cell(&cell) else {
                    term.write_line("Expected row:column, both starting at 1")?;
                    continue;
                };

                let width = session.metrics().advance(' ');
                let point = Point::new((column as f32 - 0.5) * width, (row as f32 - 0.5) * line_height);
                let hit = session.hit_test(point).first().map(|region| region.id());
                match hit {
                    Some(id) => {
                        if choose(session, id, &theme, &term)? {
                            swaps += 1;
                        }
                    }
                    None => term.write_line("No correction there")?,
                }
            }
            Action::PageDown => {
                top_row = (top_row + page).min(rows.len().saturating_sub(1));
                session.on_scroll_changed(top_row as f32 * line_height);
            }
            Action::PageUp => {
                top_row = top_row.saturating_sub(page);
                session.on_scroll_changed(top_row as f32 * line_height);
            }
            Action::Done => break,
        }
    }

    session.on_scroll_changed(0.0);
    session.on_viewport_resized(outer);
    Ok(swaps)
}

/// Width left for text once the gutter is drawn, never wider than the
/// terminal or the session's own viewport.
fn review_viewport(outer: Viewport, term_cols: u16, cell_width: f32) -> Viewport {
    let text_cols = term_cols.saturating_sub(GUTTER_CELLS).max(1);
    let width = (f32::from(text_cols) * cell_width).min(outer.width);
    Viewport::new(width.max(cell_width))
}

/// Offer the region's choices; returns whether the buffer changed.
fn choose<M: FontMetrics>(
    session: &mut CorrectionSession<M>,
    id: RegionId,
    theme: &ColorfulTheme,
    term: &Term,
) -> Result<bool> {
    let Some(region) = session.region(id) else {
        return Ok(false);
    };
    let choices: Vec<String> = region.choices().map(str::to_string).collect();
    let current = choices
        .iter()
        .position(|choice| choice == region.replacement())
        .unwrap_or(0);
    if let Some(message) = region.message() {
        term.write_line(message)?;
    }

    let picked = Select::with_theme(theme)
        .with_prompt(format!("Replace '{}' with", region.replacement()))
        .items(&choices)
        .default(current)
        .interact_on(term)?;

    if picked == current {
        return Ok(false);
    }
    session.swap(id, &choices[picked])?;
    Ok(true)
}

/// `"row:column"`, both 1-based.
fn parse_cell(input: &str) -> Option<(usize, usize)> {
    let (row, column) = input.trim().split_once(':')?;
    let row: usize = row.trim().parse().ok()?;
    let column: usize = column.trim().parse().ok()?;
    (row > 0 && column > 0).then_some((row, column))
}
