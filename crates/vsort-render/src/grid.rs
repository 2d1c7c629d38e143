#![forbid(unsafe_code)]

//! Fixed-size cell grid and row-run diffing.
//!
//! The render thread keeps two grids: the one currently on screen and the one
//! being composed. [`Grid::diff`] reports the changed cells as horizontal runs
//! so the presenter can emit one cursor move per run.

use bitflags::bitflags;

bitflags! {
    /// Cell attributes rendered as SGR flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellFlags: u8 {
        const BOLD = 0b0000_0001;
    }
}

/// Foreground tone of a cell. Mapped to terminal colors by the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tone {
    #[default]
    Plain,
    /// Bars of the primary buffer.
    Bar,
    /// Bars of the miniature buffer.
    MiniBar,
    /// Overlay text.
    Label,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub ch: char,
    pub tone: Tone,
    pub flags: CellFlags,
}

impl Cell {
    pub const EMPTY: Self = Self {
        ch: ' ',
        tone: Tone::Plain,
        flags: CellFlags::empty(),
    };

    #[must_use]
    pub const fn new(ch: char, tone: Tone) -> Self {
        Self {
            ch,
            tone,
            flags: CellFlags::empty(),
        }
    }

    #[must_use]
    pub const fn with_flags(mut self, flags: CellFlags) -> Self {
        self.flags = flags;
        self
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// A horizontal run of changed cells on row `y`, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeRun {
    pub y: u16,
    pub x0: u16,
    pub x1: u16,
}

impl ChangeRun {
    /// Number of cells in the run.
    #[must_use]
    pub fn cells(&self) -> usize {
        usize::from(self.x1 - self.x0) + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Grid {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; usize::from(width) * usize::from(height)],
        }
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Set one cell; out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Write `text` starting at `(x, y)`, clipped at the right edge.
    ///
    /// Returns the column after the last written character.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, tone: Tone, flags: CellFlags) -> u16 {
        let mut col = x;
        for ch in text.chars() {
            if col >= self.width {
                break;
            }
            self.set(col, y, Cell::new(ch, tone).with_flags(flags));
            col += 1;
        }
        col
    }

    /// Contents of row `y` as a string, for tests and logs.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .map(|c| c.ch)
            .collect()
    }

    /// Runs of cells in `self` that differ from `previous`.
    ///
    /// A size mismatch reports every cell as changed.
    #[must_use]
    pub fn diff(&self, previous: &Self) -> Vec<ChangeRun> {
        let full = previous.width != self.width || previous.height != self.height;
        let mut runs = Vec::new();
        for y in 0..self.height {
            let mut start: Option<u16> = None;
            for x in 0..self.width {
                let changed = full || self.get(x, y) != previous.get(x, y);
                match (changed, start) {
                    (true, None) => start = Some(x),
                    (false, Some(x0)) => {
                        runs.push(ChangeRun { y, x0, x1: x - 1 });
                        start = None;
                    }
                    _ => {}
                }
            }
            if let Some(x0) = start {
                runs.push(ChangeRun {
                    y,
                    x0,
                    x1: self.width - 1,
                });
            }
        }
        runs
    }
}
