//! Per-instance access to the current sender.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::mvu::sender::Sender;

/// Hands the mounted instance's [`Sender`] to nested consumers that were not
/// given one explicitly.
///
/// A channel belongs to exactly one runtime. Clones share the same slot, so a
/// host can give clones to nested components before mounting; they observe
/// the sender once the runtime publishes it. Outside the mount lifetime
/// [`MessageChannel::sender`] returns a detached sender that logs the misuse
/// and refuses the message instead of panicking.
pub struct MessageChannel<Msg> {
    slot: Rc<RefCell<Option<Sender<Msg>>>>,
    fallback: Sender<Msg>,
}

impl<Msg> MessageChannel<Msg> {
    pub fn new() -> Self {
        Self {
            slot: Rc::new(RefCell::new(None)),
            fallback: Sender::detached(),
        }
    }

    /// Current sender, or the detached fallback when nothing is mounted.
    pub fn sender(&self) -> Sender<Msg> {
        self.slot
            .borrow()
            .clone()
            .unwrap_or_else(|| self.fallback.clone())
    }

    /// Returns true while a mounted instance has published its sender.
    pub fn is_live(&self) -> bool {
        self.slot.borrow().is_some()
    }

    pub(crate) fn publish(&self, sender: Sender<Msg>) {
        *self.slot.borrow_mut() = Some(sender);
    }

    /// Clears the slot if it still holds `sender`; a later mount onto the
    /// same channel keeps its own sender.
    pub(crate) fn release(&self, sender: &Sender<Msg>) {
        let mut slot = self.slot.borrow_mut();
        if slot.as_ref().is_some_and(|held| Sender::same(held, sender)) {
            *slot = None;
        }
    }
}

impl<Msg> Default for MessageChannel<Msg> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Msg> Clone for MessageChannel<Msg> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
            fallback: self.fallback.clone(),
        }
    }
}

impl<Msg> fmt::Debug for MessageChannel<Msg> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageChannel")
            .field("live", &self.is_live())
            .finish()
    }
}
