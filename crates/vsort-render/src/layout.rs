#![forbid(unsafe_code)]

//! Snapshot-to-bar mapping.
//!
//! Every `stride`-th element of the active buffer becomes one column, with
//! `stride = ceil(len / width)`, so the primary and miniature buffers both fit
//! the same surface width. Column heights are measured in eighths of a cell
//! and drawn bottom-up with the block glyphs in [`EIGHTHS`].
//!
//! Three labels overlay the bars: the list size (top-left), the elapsed time
//! (second row) and the algorithm name (centered on the top row).

use std::time::Duration;

use vsort_core::{BufferKind, Phase, Snapshot};

use crate::grid::{Cell, CellFlags, Grid, Tone};

/// Partial-block glyphs indexed by eighths of a cell.
pub const EIGHTHS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Left margin of the overlay labels.
const LABEL_MARGIN: u16 = 1;

/// Geometry of the fixed-size bar surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarLayout {
    width: u16,
    height: u16,
}

impl BarLayout {
    /// Zero dimensions are raised to one.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Elements per column for a buffer of `len` elements.
    #[must_use]
    pub fn stride(&self, len: usize) -> usize {
        len.div_ceil(usize::from(self.width)).max(1)
    }

    /// Tallest possible bar, in eighths of a cell.
    #[must_use]
    pub fn max_eighths(&self) -> u32 {
        u32::from(self.height) * 8
    }

    /// Column heights, in eighths, for every `stride`-th value.
    ///
    /// Values are assumed to lie in `1..=values.len()`; anything larger is
    /// clamped to the full height.
    #[must_use]
    pub fn sample(&self, values: &[i32]) -> Vec<u32> {
        let len = values.len();
        if len == 0 {
            return Vec::new();
        }
        let max = u64::from(self.max_eighths());
        values
            .iter()
            .step_by(self.stride(len))
            .map(|&v| {
                let v = u64::try_from(v).unwrap_or(0);
                // Bounded by `max`, which fits in u32.
                (v * max / len as u64).min(max) as u32
            })
            .collect()
    }
}

/// Owned, render-ready frame: sampled bars plus the overlay text inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct BarFrame {
    pub bars: Vec<u32>,
    /// Length of the sampled buffer (the "List Size" label).
    pub len: usize,
    pub buffer: BufferKind,
    pub algorithm: &'static str,
    pub elapsed: Duration,
    pub sequence: u64,
    pub phase: Phase,
}

impl BarFrame {
    #[must_use]
    pub fn from_snapshot(snapshot: &Snapshot<'_>, layout: &BarLayout) -> Self {
        Self {
            bars: layout.sample(snapshot.values),
            len: snapshot.values.len(),
            buffer: snapshot.buffer,
            algorithm: snapshot.algorithm_name(),
            elapsed: snapshot.elapsed,
            sequence: snapshot.sequence,
            phase: snapshot.phase,
        }
    }

    #[must_use]
    pub fn size_label(&self) -> String {
        format!("List Size: {}", self.len)
    }

    #[must_use]
    pub fn time_label(&self) -> String {
        format!("Time taken: {} seconds", format_seconds(self.elapsed))
    }

    /// Draw the frame into `grid`, replacing its contents.
    pub fn compose(&self, grid: &mut Grid) {
        grid.clear();
        let tone = if self.buffer.is_mini() {
            Tone::MiniBar
        } else {
            Tone::Bar
        };

        let bottom = grid.height().saturating_sub(1);
        for (x, &eighths) in self.bars.iter().enumerate() {
            let Ok(x) = u16::try_from(x) else { break };
            if x >= grid.width() {
                break;
            }
            let full = eighths / 8;
            let partial = eighths % 8;
            for level in 0..u32::from(grid.height()) {
                let glyph = if level < full {
                    EIGHTHS[8]
                } else if level == full && partial > 0 {
                    EIGHTHS[partial as usize]
                } else {
                    break;
                };
                // `level` is below the grid height, so it fits in u16.
                grid.set(x, bottom - level as u16, Cell::new(glyph, tone));
            }
        }

        let bold = CellFlags::BOLD;
        grid.put_str(LABEL_MARGIN, 0, &self.size_label(), Tone::Label, bold);
        grid.put_str(LABEL_MARGIN, 1, &self.time_label(), Tone::Label, bold);
        let name_width = self.algorithm.chars().count() as u16;
        let name_x = grid.width().saturating_sub(name_width) / 2;
        grid.put_str(name_x, 0, self.algorithm, Tone::Label, bold);
    }
}

/// Whole milliseconds as seconds, with at least one decimal and no trailing
/// zeros: `0.0`, `1.5`, `12.034`.
#[must_use]
pub fn format_seconds(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    let whole = millis / 1000;
    let frac = millis % 1000;
    if frac == 0 {
        return format!("{whole}.0");
    }
    let digits = format!("{frac:03}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}
