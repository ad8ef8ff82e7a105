//! The message-sending handle shared by views, effects and subscriptions.

use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::RuntimeError;
use crate::mvu::message::Tagged;

/// Drains a sender's queue on behalf of the instance that owns it.
pub(crate) trait Pump {
    fn pump(&self) -> Result<(), RuntimeError>;
}

enum Link {
    /// Never attached to an instance (channel fallback).
    Detached,
    Connected(Weak<dyn Pump>),
    /// The instance was unmounted.
    Closed,
}

struct Shared<Msg> {
    queue: RefCell<VecDeque<Msg>>,
    pumping: Cell<bool>,
    link: RefCell<Link>,
}

/// Capability used to inject a message into a mounted instance.
///
/// One sender is created per mounted instance and every clone refers to the
/// same handle, so equality is identity: a nested consumer can compare the
/// sender it was handed with the one published in its channel.
///
/// Sending enqueues the message. If no dispatch is in progress the queue is
/// drained immediately; otherwise (a send from inside an effect, a
/// subscription start, or the view) the running dispatch applies it after the
/// current transition.
pub struct Sender<Msg> {
    shared: Rc<Shared<Msg>>,
}

impl<Msg> Sender<Msg> {
    pub(crate) fn new() -> Self {
        Self::with_link(Link::Closed)
    }

    /// A sender with no instance behind it. Sending reports the misuse and
    /// returns [`RuntimeError::NotMounted`].
    pub(crate) fn detached() -> Self {
        Self::with_link(Link::Detached)
    }

    fn with_link(link: Link) -> Self {
        Self {
            shared: Rc::new(Shared {
                queue: RefCell::new(VecDeque::new()),
                pumping: Cell::new(false),
                link: RefCell::new(link),
            }),
        }
    }

    /// Sends a message to the instance.
    pub fn send(&self, msg: Msg) -> Result<(), RuntimeError> {
        let pump = match &*self.shared.link.borrow() {
            Link::Connected(pump) => pump.upgrade(),
            Link::Detached => {
                tracing::warn!("message sent through a channel with no mounted instance");
                return Err(RuntimeError::NotMounted);
            }
            Link::Closed => None,
        };
        let Some(pump) = pump else {
            tracing::debug!("dropping message sent after unmount");
            return Err(RuntimeError::NotMounted);
        };

        self.shared.queue.borrow_mut().push_back(msg);
        if self.shared.pumping.get() {
            return Ok(());
        }
        pump.pump().inspect_err(|_| {
            // Nothing is draining; the message must not linger for a later burst.
            self.shared.queue.borrow_mut().clear();
        })
    }

    /// Returns true when both handles refer to the same sender.
    pub fn same(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.shared, &b.shared)
    }

    /// Returns true while an instance is mounted behind this sender.
    pub fn is_connected(&self) -> bool {
        matches!(
            &*self.shared.link.borrow(),
            Link::Connected(pump) if pump.strong_count() > 0
        )
    }

    /// Number of messages waiting to be applied.
    pub fn pending(&self) -> usize {
        self.shared.queue.borrow().len()
    }

    pub(crate) fn connect(&self, pump: Weak<dyn Pump>) {
        *self.shared.link.borrow_mut() = Link::Connected(pump);
    }

    pub(crate) fn close(&self) {
        *self.shared.link.borrow_mut() = Link::Closed;
    }

    pub(crate) fn pop(&self) -> Option<Msg> {
        self.shared.queue.borrow_mut().pop_front()
    }

    /// Discards queued messages, returning how many were dropped.
    pub(crate) fn discard_pending(&self) -> usize {
        let mut queue = self.shared.queue.borrow_mut();
        let dropped = queue.len();
        queue.clear();
        dropped
    }

    /// Marks a dispatch as running until the guard is dropped; sends made
    /// meanwhile only enqueue.
    pub(crate) fn pumping(&self) -> PumpGuard<'_, Msg> {
        let was_pumping = self.shared.pumping.replace(true);
        PumpGuard {
            sender: self,
            was_pumping,
        }
    }
}

impl<P> Sender<Tagged<P>> {
    /// Sends a payload-less tagged message, e.g. `sender.msg("plus")`.
    pub fn msg(&self, kind: impl Into<Cow<'static, str>>) -> Result<(), RuntimeError> {
        self.send(Tagged::new(kind))
    }

    /// Sends a tagged message carrying a payload.
    pub fn msg_with(
        &self,
        kind: impl Into<Cow<'static, str>>,
        payload: P,
    ) -> Result<(), RuntimeError> {
        self.send(Tagged::with_payload(kind, payload))
    }
}

impl<Msg> Clone for Sender<Msg> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<Msg> PartialEq for Sender<Msg> {
    fn eq(&self, other: &Self) -> bool {
        Self::same(self, other)
    }
}

impl<Msg> Eq for Sender<Msg> {}

impl<Msg> fmt::Debug for Sender<Msg> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sender")
            .field("connected", &self.is_connected())
            .field("pending", &self.pending())
            .field("pumping", &self.shared.pumping.get())
            .finish()
    }
}

pub(crate) struct PumpGuard<'a, Msg> {
    sender: &'a Sender<Msg>,
    was_pumping: bool,
}

impl<Msg> Drop for PumpGuard<'_, Msg> {
    fn drop(&mut self) {
        self.sender.shared.pumping.set(self.was_pumping);
    }
}
