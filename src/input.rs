//! Terminal input
//!
//! Provides:
//! - `InputPump` - blocking crossterm reads on a worker, delivered over a channel
//! - Key and mouse event to [`Command`] mapping

use anyhow::{anyhow, Result};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::app::Command;
use crate::rating::Rating;

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25);
const INPUT_CHANNEL_CAPACITY: usize = 256;

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Reads terminal events on a blocking worker so the main task can wait on
/// input and frame ticks at the same time
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(stop2, tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    /// Next terminal event. `None` once the worker has gone away.
    pub async fn next(&mut self) -> Result<Option<Event>> {
        match self.rx.recv().await {
            Some(InputMsg::Event(ev)) => Ok(Some(ev)),
            Some(InputMsg::Error(msg)) => Err(anyhow!("input error: {msg}")),
            None => Ok(None),
        }
    }

    pub async fn shutdown(&mut self) {
        // Close first so a worker blocked on a full channel wakes up
        self.rx.close();
        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: Arc<AtomicBool>, tx: mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
    tracing::debug!("Input worker stopped");
}

/// Decode a terminal event into a command, if it means anything here
pub fn command_for_event(ev: &Event) -> Option<Command> {
    match ev {
        Event::Key(key) => command_for_key(key),
        Event::Mouse(mouse) => command_for_mouse(mouse),
        _ => None,
    }
}

fn command_for_key(key: &KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let command = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Command::Quit,
        KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
        KeyCode::Char(c @ '1'..='5') => Command::Select(Rating::from_digit(c)?),
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => Command::FocusPrev,
        KeyCode::Tab => Command::FocusNext,
        KeyCode::BackTab => Command::FocusPrev,
        KeyCode::Right | KeyCode::Down | KeyCode::Char('l') | KeyCode::Char('j') => {
            Command::MoveNext
        }
        KeyCode::Left | KeyCode::Up | KeyCode::Char('h') | KeyCode::Char('k') => {
            Command::MovePrev
        }
        KeyCode::Char(' ') => Command::Activate,
        KeyCode::Enter => Command::Submit,
        _ => return None,
    };
    Some(command)
}

fn command_for_mouse(mouse: &MouseEvent) -> Option<Command> {
    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Command::Click { column, row }),
        MouseEventKind::Moved => Some(Command::Hover { column, row }),
        _ => None,
    }
}
