#![forbid(unsafe_code)]

//! Terminal lifecycle: raw mode, alternate screen and guaranteed cleanup.
//!
//! [`TerminalSession`] enters raw mode and (optionally) the alternate screen,
//! and restores both in reverse order on drop. A panic hook and a unix signal
//! guard cover the paths that skip `Drop`: panics with `panic = "abort"`,
//! SIGINT/SIGTERM, and the quit key, which exits the process directly.
//!
//! ```no_run
//! use vsort_render::session::{SessionOptions, TerminalSession};
//!
//! let session = TerminalSession::new(SessionOptions {
//!     alternate_screen: true,
//!     hide_cursor: true,
//! })?;
//! let (cols, rows) = session.size()?;
//! // ... draw ...
//! // Terminal restored when `session` is dropped.
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, Write};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

const SYNC_END: &[u8] = b"\x1b[?2026l";

/// Fallback surface size when the terminal reports nothing usable.
pub const FALLBACK_SIZE: (u16, u16) = (80, 24);

static TERMINAL_SESSION_ACTIVE: AtomicBool = AtomicBool::new(false);

#[derive(Debug)]
struct SessionLock;

impl SessionLock {
    fn acquire() -> io::Result<Self> {
        if TERMINAL_SESSION_ACTIVE
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(io::Error::other("TerminalSession already active"));
        }
        Ok(Self)
    }
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        TERMINAL_SESSION_ACTIVE.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Switch to the alternate screen buffer, restoring the original screen
    /// on exit.
    pub alternate_screen: bool,
    /// Hide the cursor while the session is active.
    pub hide_cursor: bool,
}

/// Owns raw mode for the lifetime of the value.
///
/// Only one session may exist at a time; a second `new` fails.
#[derive(Debug)]
pub struct TerminalSession {
    session_lock: Option<SessionLock>,
    alternate_screen_enabled: bool,
    cursor_hidden: bool,
    #[cfg(unix)]
    signal_guard: Option<SignalGuard>,
}

impl TerminalSession {
    /// Enter raw mode and enable the requested features.
    ///
    /// # Errors
    ///
    /// Returns an error if another session is active or raw mode cannot be
    /// enabled.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        install_panic_hook();

        let session_lock = SessionLock::acquire()?;

        // Create the signal guard before raw mode so a failure here cannot
        // leave the terminal raw.
        #[cfg(unix)]
        let signal_guard = Some(SignalGuard::new()?);

        crossterm::terminal::enable_raw_mode()?;
        info!("terminal raw mode enabled");

        let mut session = Self {
            session_lock: Some(session_lock),
            alternate_screen_enabled: false,
            cursor_hidden: false,
            #[cfg(unix)]
            signal_guard,
        };

        let mut stdout = io::stdout();
        if options.alternate_screen {
            crossterm::execute!(
                stdout,
                crossterm::terminal::EnterAlternateScreen,
                crossterm::terminal::Clear(crossterm::terminal::ClearType::All),
                crossterm::cursor::MoveTo(0, 0)
            )?;
            session.alternate_screen_enabled = true;
            info!("alternate screen enabled");
        }

        if options.hide_cursor {
            crossterm::execute!(stdout, crossterm::cursor::Hide)?;
            session.cursor_hidden = true;
        }

        Ok(session)
    }

    /// Current terminal size (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        let (w, h) = crossterm::terminal::size()?;
        if w > 1 && h > 1 {
            return Ok((w, h));
        }
        Ok(FALLBACK_SIZE)
    }

    fn cleanup(&mut self) {
        #[cfg(unix)]
        let _ = self.signal_guard.take();

        let mut stdout = io::stdout();
        let _ = stdout.write_all(SYNC_END);
        let _ = crossterm::execute!(
            stdout,
            crossterm::style::SetAttribute(crossterm::style::Attribute::Reset)
        );

        if self.cursor_hidden {
            let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
            self.cursor_hidden = false;
        }

        if self.alternate_screen_enabled {
            let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
            self.alternate_screen_enabled = false;
            info!("alternate screen disabled");
        }

        // Raw mode goes last.
        let _ = crossterm::terminal::disable_raw_mode();
        info!("terminal raw mode disabled");
        let _ = stdout.flush();

        let _ = self.session_lock.take();
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_cleanup();
            previous(info);
        }));
    });
}

/// Best-effort cleanup for termination paths that skip `Drop`.
///
/// Call this before `std::process::exit` to restore terminal state.
pub fn best_effort_cleanup_for_exit() {
    best_effort_cleanup();
}

fn best_effort_cleanup() {
    let mut stdout = io::stdout();
    let _ = stdout.write_all(SYNC_END);
    let _ = crossterm::execute!(
        stdout,
        crossterm::style::SetAttribute(crossterm::style::Attribute::Reset),
        crossterm::cursor::Show,
        crossterm::terminal::LeaveAlternateScreen
    );
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = stdout.flush();
}

#[cfg(unix)]
#[derive(Debug)]
struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalGuard {
    fn new() -> io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = std::thread::Builder::new()
            .name("vsort-signals".into())
            .spawn(move || {
                if let Some(signal) = signals.forever().next() {
                    warn!(signal, "termination signal received, cleaning up");
                    best_effort_cleanup();
                    std::process::exit(128 + signal);
                }
            })?;
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
