#![forbid(unsafe_code)]

//! Dedicated render/output thread.
//!
//! The sort cycle runs on the main thread and must never wait on the
//! terminal for long. [`RenderThread`] owns the presenter and both grids;
//! the main thread only hands it sampled [`BarFrame`]s.
//!
//! # Coalescing Rules
//!
//! - **Frame** messages are coalesced: if several frames arrive before the
//!   thread wakes, only the latest is composed and presented. Presentation
//!   order therefore always matches mutation order.
//! - **Shutdown** presents any pending frame, flushes and exits.
//!
//! # Input
//!
//! Between frames the thread polls an optional [`QuitSource`]. When it
//! reports a quit request the thread runs the quit hook, which in the binary
//! restores the terminal and exits the process.
//!
//! # Error Propagation
//!
//! IO errors are sent back over a dedicated channel; poll them with
//! [`RenderThread::check_error`].

use std::io::{self, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use tracing::{debug, info, trace};

use crate::grid::Grid;
use crate::layout::{BarFrame, BarLayout};
use crate::presenter::Presenter;

/// Channel capacity for the outbound frame queue.
pub const CHANNEL_CAPACITY: usize = 8;

/// Longest wait for a frame before polling input again.
const INPUT_POLL: Duration = Duration::from_millis(50);

/// Messages sent from the main thread to the render thread.
#[derive(Debug)]
pub enum OutMsg {
    Frame(BarFrame),
    Shutdown,
}

/// Source of the "exit now" request.
pub trait QuitSource: Send {
    /// Check for a quit request without blocking longer than `timeout`.
    fn poll_quit(&mut self, timeout: Duration) -> io::Result<bool>;
}

/// Reads crossterm key events; the quit key or Ctrl-C requests exit.
#[derive(Debug, Clone, Copy)]
pub struct KeyQuit {
    key: char,
}

impl KeyQuit {
    #[must_use]
    pub fn new(key: char) -> Self {
        Self { key }
    }

    /// Whether `event` is a quit request.
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        let Event::Key(key) = event else {
            return false;
        };
        if key.kind != KeyEventKind::Press {
            return false;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => true,
            KeyCode::Char(c) => c.eq_ignore_ascii_case(&self.key),
            _ => false,
        }
    }
}

impl QuitSource for KeyQuit {
    fn poll_quit(&mut self, timeout: Duration) -> io::Result<bool> {
        let mut wait = timeout;
        while crossterm::event::poll(wait)? {
            if self.matches(&crossterm::event::read()?) {
                return Ok(true);
            }
            // Drain whatever else is queued without blocking again.
            wait = Duration::ZERO;
        }
        Ok(false)
    }
}

/// Input watching for the render thread: where quit requests come from and
/// what to do when one arrives.
pub struct InputWatch {
    pub source: Box<dyn QuitSource>,
    pub on_quit: Box<dyn FnMut() + Send>,
}

impl InputWatch {
    pub fn new(source: impl QuitSource + 'static, on_quit: impl FnMut() + Send + 'static) -> Self {
        Self {
            source: Box::new(source),
            on_quit: Box::new(on_quit),
        }
    }
}

pub struct RenderThread {
    sender: mpsc::SyncSender<OutMsg>,
    handle: Option<JoinHandle<()>>,
    error_rx: mpsc::Receiver<io::Error>,
}

impl std::fmt::Debug for RenderThread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderThread")
            .field("running", &self.handle.is_some())
            .finish_non_exhaustive()
    }
}

impl RenderThread {
    /// Spawn the render thread. The surface is cleared before the first frame.
    pub fn start<W: Write + Send + 'static>(
        presenter: Presenter<W>,
        layout: BarLayout,
        input: Option<InputWatch>,
    ) -> io::Result<Self> {
        let (tx, rx) = mpsc::sync_channel::<OutMsg>(CHANNEL_CAPACITY);
        let (err_tx, err_rx) = mpsc::sync_channel::<io::Error>(8);

        let handle = thread::Builder::new()
            .name("vsort-render".into())
            .spawn(move || {
                render_loop(presenter, layout, input, rx, err_tx);
            })?;

        Ok(Self {
            sender: tx,
            handle: Some(handle),
            error_rx: err_rx,
        })
    }

    /// Queue a message, blocking while the queue is full.
    pub fn send(&self, msg: OutMsg) -> Result<(), mpsc::SendError<OutMsg>> {
        self.sender.send(msg)
    }

    /// Queue a message, failing immediately if the queue is full.
    pub fn try_send(&self, msg: OutMsg) -> Result<(), mpsc::TrySendError<OutMsg>> {
        self.sender.try_send(msg)
    }

    pub fn check_error(&self) -> Option<io::Error> {
        self.error_rx.try_recv().ok()
    }

    /// Present any pending frame, then stop the thread.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.sender.send(OutMsg::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for RenderThread {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Result of draining the queue after a wakeup.
#[derive(Debug, Default)]
struct Pending {
    frame: Option<BarFrame>,
    shutdown: bool,
    /// Frames replaced by a newer one before being presented.
    coalesced: usize,
}

fn coalesce(first: Option<OutMsg>, rx: &mpsc::Receiver<OutMsg>) -> Pending {
    let mut pending = Pending::default();
    for msg in first.into_iter().chain(std::iter::from_fn(|| rx.try_recv().ok())) {
        match msg {
            OutMsg::Frame(frame) => {
                pending.coalesced += usize::from(pending.frame.is_some());
                pending.frame = Some(frame);
            }
            OutMsg::Shutdown => {
                pending.shutdown = true;
                break;
            }
        }
    }
    pending
}

fn render_loop<W: Write>(
    mut presenter: Presenter<W>,
    layout: BarLayout,
    mut input: Option<InputWatch>,
    rx: mpsc::Receiver<OutMsg>,
    err_tx: mpsc::SyncSender<io::Error>,
) {
    let mut current = Grid::new(layout.width(), layout.height());
    let mut next = current.clone();

    if let Err(e) = presenter.clear_screen() {
        let _ = err_tx.try_send(e);
        return;
    }

    loop {
        let first = match rx.recv_timeout(INPUT_POLL) {
            Ok(msg) => Some(msg),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => return,
        };

        let Pending {
            frame: latest,
            shutdown,
            coalesced,
        } = coalesce(first, &rx);

        if let Some(frame) = latest {
            frame.compose(&mut next);
            let runs = next.diff(&current);
            match presenter.present(&next, &runs) {
                Ok(stats) => trace!(
                    sequence = frame.sequence,
                    coalesced,
                    cells = stats.cells,
                    bytes = stats.bytes,
                    "frame presented"
                ),
                Err(e) => {
                    let _ = err_tx.try_send(e);
                    return;
                }
            }
            std::mem::swap(&mut current, &mut next);
        }

        if shutdown {
            let _ = presenter.flush();
            debug!("render thread shut down");
            return;
        }

        if let Some(watch) = input.as_mut() {
            match watch.source.poll_quit(Duration::ZERO) {
                Ok(true) => {
                    info!("quit requested");
                    (watch.on_quit)();
                    return;
                }
                Ok(false) => {}
                Err(e) => {
                    let _ = err_tx.try_send(e);
                    return;
                }
            }
        }
    }
}
