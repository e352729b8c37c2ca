//! Runtime: event loop and input routing for the TUI.
//!
//! Responsibilities
//! - Own the terminal lifecycle (enter/leave alternate screen, raw mode).
//! - Drive a single event loop over terminal input, the animation ticker,
//!   and the execution-result channel.
//! - Translate keys into [`Msg`]s based on the focused area and execute the
//!   returned [`Effect`]s through the command layer.
//!
//! A dedicated task blocks on `crossterm` input and forwards events over a
//! channel; keeping `poll()` and `read()` together avoids lost events in
//! some terminals. Ticking is fast only while something animates (the
//! throbber or a pending copy acknowledgment) and slow when idle.

use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, prelude::*};
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};

use crate::app::{App, Focus, Msg, SharedCtx};
use crate::{cmd, ui};

/// Spawn a dedicated task that blocks on terminal input and forwards
/// `crossterm` events over a channel.
async fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);

    tokio::spawn(async move {
        let sixteen_ms = Duration::from_millis(16);
        loop {
            if event::poll(sixteen_ms).unwrap_or(false) {
                match event::read() {
                    Ok(event) => {
                        if let Err(error) = sender.send(event).await {
                            tracing::warn!("Failed to send event: {}", error);
                            break;
                        }
                    }
                    Err(error) => {
                        tracing::warn!("Failed to read event: {}", error);
                        break;
                    }
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Whether the key ends the session. `q` types into text fields, so it only
/// quits outside the parameter form.
fn is_quit(app: &App, key: KeyEvent) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }
    key.code == KeyCode::Char('q') && app.focus != Focus::Params
}

/// Translate a key press into a state-machine message for the focused area.
fn key_to_msg(app: &App, key: KeyEvent) -> Option<Msg> {
    match key.code {
        KeyCode::Tab => return Some(Msg::FocusNext),
        KeyCode::BackTab => return Some(Msg::FocusPrev),
        _ => {}
    }

    match app.focus {
        Focus::Services => match key.code {
            KeyCode::Up => Some(Msg::ServiceCursor(-1)),
            KeyCode::Down => Some(Msg::ServiceCursor(1)),
            _ => shared_key(key),
        },
        Focus::Functions => match key.code {
            KeyCode::Left | KeyCode::Up => Some(Msg::FunctionCursor(-1)),
            KeyCode::Right | KeyCode::Down => Some(Msg::FunctionCursor(1)),
            KeyCode::Enter => Some(Msg::RunTest),
            _ => shared_key(key),
        },
        Focus::Params => match key.code {
            KeyCode::Up => Some(Msg::ParamsUp),
            KeyCode::Down => Some(Msg::ParamsDown),
            KeyCode::Left => Some(Msg::ParamCycle(-1)),
            KeyCode::Right => Some(Msg::ParamCycle(1)),
            KeyCode::Enter => Some(Msg::RunTest),
            KeyCode::Backspace => Some(Msg::ParamBackspace),
            KeyCode::Char(c) => Some(Msg::ParamChar(c)),
            _ => None,
        },
        Focus::Result => match key.code {
            KeyCode::Up => Some(Msg::ResultNav(-1, 0)),
            KeyCode::Down => Some(Msg::ResultNav(1, 0)),
            KeyCode::Left => Some(Msg::ResultNav(0, -1)),
            KeyCode::Right => Some(Msg::ResultNav(0, 1)),
            KeyCode::PageUp => Some(Msg::ResultNav(-10, 0)),
            KeyCode::PageDown => Some(Msg::ResultNav(10, 0)),
            KeyCode::Char('c') => Some(Msg::CopyCell),
            _ => shared_key(key),
        },
    }
}

/// Keys available in every area except the parameter form.
fn shared_key(key: KeyEvent) -> Option<Msg> {
    match key.code {
        KeyCode::Char('s') => Some(Msg::ServerCycle(1)),
        KeyCode::Char('d') => Some(Msg::ServerDelete),
        KeyCode::Char('y') => Some(Msg::CopyResult),
        _ => None,
    }
}

/// Entry point for the TUI runtime: sets up the terminal, spawns the event
/// producer, runs the event loop, and performs cleanup on exit.
pub async fn run_app(ctx: SharedCtx) -> Result<()> {
    let mut input_receiver = spawn_input_thread().await;
    let (exec_sender, mut exec_receiver) = mpsc::unbounded_channel();

    let (mut app, initial_effects) = App::new(ctx);
    cmd::run_cmds(&mut app, cmd::from_effects(initial_effects), &exec_sender);

    let mut terminal = setup_terminal()?;

    // Ticking strategy: fast while animating, slow when idle.
    let fast_interval = Duration::from_millis(100);
    let idle_interval = Duration::from_millis(5000);
    let mut current_interval = idle_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    terminal.draw(|frame| ui::draw(frame, &mut app))?;

    loop {
        let needs_animation = app.executing || app.result.has_acks();
        let target_interval = if needs_animation { fast_interval } else { idle_interval };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        let mut needs_render = false;
        tokio::select! {
            maybe_event = input_receiver.recv() => {
                match maybe_event {
                    Some(Event::Key(key_event)) => {
                        if is_quit(&app, key_event) {
                            break;
                        }
                        if let Some(msg) = key_to_msg(&app, key_event) {
                            let effects = app.update(msg);
                            cmd::run_cmds(&mut app, cmd::from_effects(effects), &exec_sender);
                        }
                        needs_render = true;
                    }
                    Some(Event::Resize(width, height)) => {
                        app.update(Msg::Resize(width, height));
                        needs_render = true;
                    }
                    Some(_) => {}
                    None => break, // input channel closed; shut down cleanly
                }
            }

            _ = ticker.tick() => {
                app.update(Msg::Tick);
                needs_render = needs_animation;
            }

            Some(outcome) = exec_receiver.recv() => {
                app.update(Msg::ExecCompleted(outcome));
                needs_render = true;
            }

            _ = signal::ctrl_c() => { break; }
        }

        if needs_render {
            terminal.draw(|frame| ui::draw(frame, &mut app))?;
        }
    }

    cleanup_terminal(&mut terminal)?;
    Ok(())
}
