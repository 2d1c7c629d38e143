#![forbid(unsafe_code)]

//! Interactive mode: raw-mode session, render thread and the endless cycle.

use std::io;

use tracing::info;
use vsort_core::{SortCycle, SystemClock, ThreadPacer};
use vsort_render::{
    BarLayout, InputWatch, KeyQuit, Presenter, RenderThread, SessionOptions, TerminalSession,
    TerminalSink, best_effort_cleanup_for_exit,
};

use crate::config::AppConfig;
use crate::error::Result;

/// Restore the terminal and leave. Runs on the render thread, which cannot
/// unwind the sort loop on the main thread.
fn quit_now() {
    best_effort_cleanup_for_exit();
    std::process::exit(0);
}

pub fn run_terminal(config: AppConfig) -> Result<()> {
    // Declared first so it drops last, after the render thread has stopped.
    let session = TerminalSession::new(SessionOptions {
        alternate_screen: true,
        hide_cursor: true,
    })?;

    let (width, height) = config.render.surface_size(session.size()?);
    let layout = BarLayout::new(width, height);
    info!(width, height, "surface fixed");

    let presenter = Presenter::new(io::stdout(), config.render.sync_output);
    let watch = InputWatch::new(KeyQuit::new(config.render.quit_key), quit_now);
    let render = RenderThread::start(presenter, layout, Some(watch))?;
    let sink = TerminalSink::new(render, layout, config.render.frame_interval());

    let mut cycle = SortCycle::new(config.engine, SystemClock, ThreadPacer, sink)?;
    let result = cycle.run();

    let sink = cycle.into_sink();
    info!(
        frames_sent = sink.frames_sent(),
        frames_dropped = sink.frames_dropped(),
        "render stats"
    );
    sink.shutdown();
    drop(session);

    result.map_err(Into::into)
}
