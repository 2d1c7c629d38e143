#![forbid(unsafe_code)]

//! Presenter: state-tracked ANSI emission.
//!
//! Turns a grid plus its change runs into terminal output, emitting a cursor
//! move only at the start of each run and an SGR sequence only when the style
//! changes. All output for a frame is buffered and flushed once, wrapped in
//! synchronized-output markers when enabled.

use std::io::{self, BufWriter, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

use crate::grid::{Cell, CellFlags, ChangeRun, Grid, Tone};

/// Size of the internal write buffer (64KB).
const BUFFER_CAPACITY: usize = 64 * 1024;

const SYNC_BEGIN: &[u8] = b"\x1b[?2026h";
const SYNC_END: &[u8] = b"\x1b[?2026l";

/// Per-frame output statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresentStats {
    pub cells: usize,
    pub runs: usize,
    pub bytes: u64,
}

/// Byte-counting writer.
struct CountingWriter<W> {
    inner: W,
    count: u64,
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellStyle {
    tone: Tone,
    flags: CellFlags,
}

impl CellStyle {
    fn from_cell(cell: &Cell) -> Self {
        Self {
            tone: cell.tone,
            flags: cell.flags,
        }
    }
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Plain => Color::Reset,
        Tone::Bar => Color::Cyan,
        Tone::MiniBar => Color::Magenta,
        Tone::Label => Color::White,
    }
}

pub struct Presenter<W: Write> {
    writer: CountingWriter<BufWriter<W>>,
    /// None = unknown/reset.
    current_style: Option<CellStyle>,
    /// None = unknown.
    cursor: Option<(u16, u16)>,
    sync_output: bool,
}

impl<W: Write> Presenter<W> {
    #[must_use]
    pub fn new(writer: W, sync_output: bool) -> Self {
        Self {
            writer: CountingWriter {
                inner: BufWriter::with_capacity(BUFFER_CAPACITY, writer),
                count: 0,
            },
            current_style: None,
            cursor: None,
            sync_output,
        }
    }

    /// Emit the cells of `grid` covered by `runs`, then flush.
    pub fn present(&mut self, grid: &Grid, runs: &[ChangeRun]) -> io::Result<PresentStats> {
        let _span = tracing::trace_span!("present", runs = runs.len()).entered();
        self.writer.count = 0;

        if self.sync_output {
            self.writer.write_all(SYNC_BEGIN)?;
        }

        let mut cells = 0;
        for run in runs {
            self.move_cursor_to(run.x0, run.y)?;
            for x in run.x0..=run.x1 {
                let cell = grid.get(x, run.y).copied().unwrap_or_default();
                self.emit_cell(&cell)?;
                cells += 1;
            }
        }

        // Leave a clean style state for the next frame.
        queue!(self.writer, SetAttribute(Attribute::Reset))?;
        self.current_style = None;

        if self.sync_output {
            self.writer.write_all(SYNC_END)?;
        }
        self.writer.flush()?;

        Ok(PresentStats {
            cells,
            runs: runs.len(),
            bytes: self.writer.count,
        })
    }

    fn emit_cell(&mut self, cell: &Cell) -> io::Result<()> {
        let style = CellStyle::from_cell(cell);
        if self.current_style != Some(style) {
            queue!(
                self.writer,
                SetAttribute(Attribute::Reset),
                SetForegroundColor(tone_color(style.tone))
            )?;
            if style.flags.contains(CellFlags::BOLD) {
                queue!(self.writer, SetAttribute(Attribute::Bold))?;
            }
            self.current_style = Some(style);
        }

        queue!(self.writer, Print(cell.ch))?;
        if let Some((x, y)) = self.cursor {
            self.cursor = Some((x.saturating_add(1), y));
        }
        Ok(())
    }

    fn move_cursor_to(&mut self, x: u16, y: u16) -> io::Result<()> {
        if self.cursor == Some((x, y)) {
            return Ok(());
        }
        queue!(self.writer, MoveTo(x, y))?;
        self.cursor = Some((x, y));
        Ok(())
    }

    pub fn clear_screen(&mut self) -> io::Result<()> {
        queue!(self.writer, Clear(ClearType::All), MoveTo(0, 0))?;
        self.cursor = Some((0, 0));
        self.writer.flush()
    }

    /// Forget tracked style and cursor state.
    pub fn reset(&mut self) {
        self.current_style = None;
        self.cursor = None;
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Flushes any buffered data before returning the writer.
    pub fn into_inner(self) -> Result<W, io::Error> {
        self.writer.inner.into_inner().map_err(|e| e.into_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(presenter: Presenter<Vec<u8>>) -> String {
        String::from_utf8(presenter.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn empty_diff_produces_minimal_output() {
        let grid = Grid::new(4, 2);
        let mut presenter = Presenter::new(Vec::new(), false);
        let stats = presenter.present(&grid, &[]).unwrap();
        assert_eq!(stats.cells, 0);
        // Only the trailing SGR reset.
        assert_eq!(output(presenter), "\x1b[0m");
    }

    #[test]
    fn one_cursor_move_per_run() {
        let mut grid = Grid::new(8, 2);
        grid.put_str(2, 1, "abc", Tone::Label, CellFlags::empty());
        let runs = grid.diff(&Grid::new(8, 2));
        let mut presenter = Presenter::new(Vec::new(), false);
        let stats = presenter.present(&grid, &runs).unwrap();
        assert_eq!(stats.runs, 1);
        assert_eq!(stats.cells, 3);

        let out = output(presenter);
        // CUP is 1-based: row 2, column 3.
        assert_eq!(out.matches("\x1b[2;3H").count(), 1);
        assert!(out.contains("abc"));
    }

    #[test]
    fn style_tracking_avoids_redundant_sgr() {
        let mut grid = Grid::new(4, 1);
        grid.put_str(0, 0, "████", Tone::Bar, CellFlags::empty());
        let runs = grid.diff(&Grid::new(4, 1));
        let mut presenter = Presenter::new(Vec::new(), false);
        presenter.present(&grid, &runs).unwrap();
        let out = output(presenter);
        assert_eq!(out.matches("\x1b[38;").count(), 1, "{out:?}");
    }

    #[test]
    fn bold_labels_emit_bold_attribute() {
        let mut grid = Grid::new(3, 1);
        grid.put_str(0, 0, "ok", Tone::Label, CellFlags::BOLD);
        let runs = grid.diff(&Grid::new(3, 1));
        let mut presenter = Presenter::new(Vec::new(), false);
        presenter.present(&grid, &runs).unwrap();
        assert!(output(presenter).contains("\x1b[1m"));
    }

    #[test]
    fn sync_output_wrapped_when_enabled() {
        let grid = Grid::new(1, 1);
        let mut presenter = Presenter::new(Vec::new(), true);
        presenter.present(&grid, &[]).unwrap();
        let out = output(presenter);
        assert!(out.starts_with("\x1b[?2026h"));
        assert!(out.ends_with("\x1b[?2026l"));
    }

    #[test]
    fn skips_cursor_move_when_already_in_place() {
        let mut grid = Grid::new(4, 1);
        grid.put_str(0, 0, "ab", Tone::Plain, CellFlags::empty());
        let mut presenter = Presenter::new(Vec::new(), false);
        presenter
            .present(&grid, &[ChangeRun { y: 0, x0: 0, x1: 0 }])
            .unwrap();
        presenter
            .present(&grid, &[ChangeRun { y: 0, x0: 1, x1: 1 }])
            .unwrap();
        let out = output(presenter);
        assert_eq!(out.matches('H').count(), 1, "{out:?}");
    }

    #[test]
    fn stats_count_bytes_written() {
        let mut grid = Grid::new(2, 1);
        grid.set(0, 0, Cell::new('x', Tone::Plain));
        let runs = grid.diff(&Grid::new(2, 1));
        let mut presenter = Presenter::new(Vec::new(), false);
        let stats = presenter.present(&grid, &runs).unwrap();
        let out = output(presenter);
        assert_eq!(stats.bytes, out.len() as u64);
    }
}
