//! Event channels for the interactive session.
//!
//! Two sources feed the event loop: terminal input, pumped from a dedicated
//! thread so blocking reads never stall the UI, and session messages, which
//! carry results produced outside the loop (generation completions, async
//! delete failures) back into it.

use std::thread;

use tokio::sync::mpsc::{self, Receiver, UnboundedReceiver, UnboundedSender};

use crate::ui::Msg;

pub type UserEvent = crossterm::event::Event;

/// Spawn the input-reading thread and return the receiving end. The thread
/// exits on its own once the receiver is dropped.
pub fn init_user_events() -> Receiver<std::io::Result<UserEvent>> {
    let (tx, rx) = mpsc::channel(64);
    thread::spawn(move || {
        loop {
            if tx.blocking_send(crossterm::event::read()).is_err() {
                break;
            }
        }
    });
    rx
}

/// Channel for messages delivered back into the event loop from spawned
/// tasks. Unbounded is fine: these are low-frequency, one-shot results.
pub fn init_session_messages() -> (UnboundedSender<Msg>, UnboundedReceiver<Msg>) {
    mpsc::unbounded_channel()
}
