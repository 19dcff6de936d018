use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};

use log::{debug, error, warn};

use crate::*;


/// how many fired actions can be waiting for the handler .. hotkeys are human-paced, so this is plenty
pub const ACTION_QUEUE_CAPACITY : usize = 20;


/// Application logic that fired hotkey actions are delivered to. Invocations are strictly sequential.
pub trait ActionHandler {
    fn on_action (&mut self, action:HotkeyAction);
}

impl <F: FnMut(HotkeyAction)> ActionHandler for F {
    fn on_action (&mut self, action:HotkeyAction) { self(action) }
}



/// Producer side of the dispatch bridge. Both tiers hold one of these (the native hotkey message loop, and the
/// low-level kbd hook) and push matched actions through it, from whatever thread they happen to run on.
# [ derive (Clone) ]
pub struct Dispatcher {
    tx : SyncSender <HotkeyAction>,
}

/// Consumer side .. drained by the single execution context that runs the [`ActionHandler`]
pub struct ActionQueue {
    rx : Receiver <HotkeyAction>,
}


impl Dispatcher {

    pub fn channel (capacity:usize) -> (Dispatcher, ActionQueue) {
        let (tx, rx) = sync_channel::<HotkeyAction> (capacity);
        (Dispatcher {tx}, ActionQueue {rx})
    }

    /// Queues the action for the handler. Never blocks (the kbd hook has a hard time budget), so if the queue is
    /// full or the consumer is gone, the action is dropped and we return false.
    pub fn dispatch (&self, action:HotkeyAction) -> bool {
        match self.tx.try_send (action) {
            Ok(()) => true,
            Err(TrySendError::Full(a)) => {
                warn! ("action queue full, dropping {}", a);
                false
            }
            Err(TrySendError::Disconnected(a)) => {
                debug! ("action handler gone, dropping {}", a);
                false
            }
        }
    }

}


impl ActionQueue {

    /// Drains actions into the handler one at a time, in the order they were dispatched, until every [`Dispatcher`]
    /// is dropped. A panicking handler invocation is logged and the loop moves on to the next action.
    pub fn run <H: ActionHandler> (self, handler: &mut H) {
        while let Ok(action) = self.rx.recv() {
            debug! ("dispatching {}", action);
            if catch_unwind (AssertUnwindSafe (|| handler.on_action(action))) .is_err() {
                error! ("handler panicked while processing {}", action);
            }
        }
    }

    /// Runs the queue on its own thread, handing the handler back once all dispatchers are gone
    pub fn spawn <H: ActionHandler + Send + 'static> (self, mut handler:H) -> io::Result<JoinHandle<H>> {
        thread::Builder::new() .name ("action-dispatch".into())
            .spawn (move || { self.run (&mut handler); handler })
    }

}
