//! Text layout used to place regions on screen.
//!
//! Layout breaks lines at explicit newlines and wraps at character
//! boundaries whenever the next glyph would overflow the viewport width.
//! All coordinates are document-local; scrolling is applied only when a
//! screen point is hit-tested.

use serde::Serialize;
use std::ops::Range;
use std::str::Chars;
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

/// Wrapping constraints of the text area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
}

impl Viewport {
    pub fn new(width: f32) -> Self {
        Self { width }
    }

    /// A viewport that never wraps.
    pub fn unbounded() -> Self {
        Self { width: f32::INFINITY }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Measurements of the active font.
pub trait FontMetrics {
    /// Horizontal advance of a single character.
    fn advance(&self, ch: char) -> f32;

    fn line_height(&self) -> f32;
}

/// Fixed-pitch metrics: every character advances by its display width in
/// cells (wide CJK glyphs take two, combining marks none).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    pub cell_width: f32,
    pub line_height: f32,
    pub tab_width: usize,
}

impl MonospaceMetrics {
    /// One unit per terminal cell and row.
    pub fn terminal(tab_width: usize) -> Self {
        Self {
            cell_width: 1.0,
            line_height: 1.0,
            tab_width,
        }
    }
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::terminal(4)
    }
}

impl FontMetrics for MonospaceMetrics {
    fn advance(&self, ch: char) -> f32 {
        let cells = match ch {
            '\t' => self.tab_width,
            _ => ch.width().unwrap_or(0),
        };
        cells as f32 * self.cell_width
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Pen {
    x: f32,
    row: usize,
}

impl Pen {
    /// Advance past `ch`, returning the x at which it is drawn.
    fn place(&mut self, ch: char, metrics: &impl FontMetrics, viewport: Viewport) -> f32 {
        if ch == '\n' {
            self.x = 0.0;
            self.row += 1;
            return 0.0;
        }
        let advance = metrics.advance(ch);
        if self.x > 0.0 && self.x + advance > viewport.width {
            self.x = 0.0;
            self.row += 1;
        }
        let start = self.x;
        self.x += advance;
        start
    }
}

/// Forward-only walk over a buffer that tracks where each character lands.
///
/// Seeking to ascending positions costs one pass over the buffer in total,
/// which is what keeps resyncing many regions cheap.
pub struct LayoutCursor<'a, M> {
    chars: Chars<'a>,
    index: usize,
    pen: Pen,
    metrics: &'a M,
    viewport: Viewport,
}

impl<'a, M: FontMetrics> LayoutCursor<'a, M> {
    pub fn new(buffer: &'a str, metrics: &'a M, viewport: Viewport) -> Self {
        Self {
            chars: buffer.chars(),
            index: 0,
            pen: Pen::default(),
            metrics,
            viewport,
        }
    }

    /// Character index the cursor sits at.
    pub fn position(&self) -> usize {
        self.index
    }

    /// Lay out everything before `target`. Targets behind the cursor are
    /// ignored.
    pub fn seek(&mut self, target: usize) {
        while self.index < target {
            let Some(ch) = self.chars.next() else { break };
            self.pen.place(ch, self.metrics, self.viewport);
            self.index += 1;
        }
    }

    /// Bounding box of the next `len` characters, without moving the cursor.
    pub fn measure(&self, len: usize) -> Rect {
        let line_height = self.metrics.line_height();
        let mut pen = self.pen;
        let mut extent: Option<(f32, f32, usize, usize)> = None;

        for ch in self.chars.clone().take(len) {
            let start = pen.place(ch, self.metrics, self.viewport);
            if ch == '\n' {
                continue;
            }
            let end = pen.x;
            extent = Some(match extent {
                None => (start, end, pen.row, pen.row),
                Some((left, right, top, _)) => (left.min(start), right.max(end), top, pen.row),
            });
        }

        match extent {
            Some((left, right, top, bottom)) => Rect {
                x: left,
                y: top as f32 * line_height,
                width: right - left,
                height: (bottom - top + 1) as f32 * line_height,
            },
            None => Rect {
                x: self.pen.x,
                y: self.pen.row as f32 * line_height,
                width: 0.0,
                height: line_height,
            },
        }
    }
}

/// Box occupied by `[from, from + len)` when `buffer` is laid out.
pub fn bounds_of<M: FontMetrics>(buffer: &str, from: usize, len: usize, metrics: &M, viewport: Viewport) -> Rect {
    let mut cursor = LayoutCursor::new(buffer, metrics, viewport);
    cursor.seek(from);
    cursor.measure(len)
}

/// Character ranges of each visual row. Newlines stay attached to the row
/// they terminate.
pub fn visual_rows<M: FontMetrics>(buffer: &str, metrics: &M, viewport: Viewport) -> Vec<Range<usize>> {
    let mut rows = Vec::new();
    let mut pen = Pen::default();
    let mut row_start = 0;

    for (index, ch) in buffer.chars().enumerate() {
        let row = pen.row;
        pen.place(ch, metrics, viewport);
        if ch == '\n' {
            rows.push(row_start..index + 1);
            row_start = index + 1;
        } else if pen.row != row {
            rows.push(row_start..index);
            row_start = index;
        }
    }
    rows.push(row_start..buffer.chars().count());
    rows
}
