//! Terminal match-3 runner (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer from `term`. Board
//! parameters come from the `MATCH3_*` environment variables; logs go to
//! `MATCH3_LOG_PATH` so they never touch the screen.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{debug, info, trace};

use tui_match3::core::{BoardSession, GameSnapshot, SessionConfig};
use tui_match3::engine::{apply_hint, Driver};
use tui_match3::input::{handle_key_event, left_click, should_quit, Cursor};
use tui_match3::logging::{init_file_logging, seed_from_env};
use tui_match3::term::{restore_terminal, FrameBuffer, GameView, TerminalRenderer, Viewport};
use tui_match3::types::{GameAction, TICK_MS};

fn main() -> Result<()> {
    init_file_logging()?;

    let config = SessionConfig::from_env();
    let seed = seed_from_env();
    let mut session = BoardSession::new(config, seed)?;
    info!(seed, "starting tui-match3");

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        default_hook(panic_info);
    }));

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut session);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, session: &mut BoardSession) -> Result<()> {
    let view = GameView::default();
    let mut driver = Driver::default();
    let mut cursor = Cursor::new(session.config().width, session.config().height);
    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let viewport = Viewport::new(w, h);
        session.snapshot_into(&mut snap);
        view.render_into(&snap, Some(cursor.pos()), viewport, &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        apply_action(session, &mut driver, &mut cursor, action);
                    }
                }
                Event::Mouse(mouse) => {
                    let hit = left_click(mouse)
                        .and_then(|(col, row)| view.cell_at(&snap, viewport, col, row));
                    if let Some(pos) = hit {
                        cursor.set(pos);
                        session.select_tile(pos);
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            driver.tick(session, TICK_MS);
            for event in session.drain_events() {
                trace!(?event, "board event");
            }
        }
    }
}

fn apply_action(
    session: &mut BoardSession,
    driver: &mut Driver,
    cursor: &mut Cursor,
    action: GameAction,
) {
    match action {
        GameAction::CursorLeft
        | GameAction::CursorRight
        | GameAction::CursorUp
        | GameAction::CursorDown => {
            cursor.apply(action);
        }
        GameAction::Select => {
            session.select_tile(cursor.pos());
        }
        GameAction::Hint => match apply_hint(session) {
            Ok((a, _)) => {
                cursor.set(a);
            }
            Err(err) => debug!(code = err.code(), "{}", err.message()),
        },
        GameAction::Restart => {
            session.restart();
            driver.reset();
        }
    }
}
