//! Document-level click listeners for the terminal host.
//!
//! The terminal has no DOM, so mouse clicks anywhere on screen are delivered
//! to this listener hub. Subscriptions attach to it the same way a browser
//! subscription would attach to `document`.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::anyhow;

use crate::mvu::{Subscription, SubscriptionId, Unsubscribe};

/// Screen position of a mouse press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Click {
    pub column: u16,
    pub row: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<dyn Fn(Click) -> anyhow::Result<()>>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Listener)>,
}

/// Shared click target. Clones refer to the same listener set.
#[derive(Clone, Default)]
pub struct Document {
    listeners: Rc<RefCell<Listeners>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(
        &self,
        listener: impl Fn(Click) -> anyhow::Result<()> + 'static,
    ) -> ListenerId {
        let mut listeners = self.listeners.borrow_mut();
        let id = ListenerId(listeners.next_id);
        listeners.next_id += 1;
        listeners.entries.push((id, Rc::new(listener)));
        id
    }

    /// Returns false if `id` was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.entries.len();
        listeners.entries.retain(|(entry, _)| *entry != id);
        listeners.entries.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }

    fn is_registered(&self, id: ListenerId) -> bool {
        self.listeners
            .borrow()
            .entries
            .iter()
            .any(|(entry, _)| *entry == id)
    }

    /// Delivers a click to every listener registered when it happened.
    ///
    /// A listener removed by an earlier listener during the same click is
    /// not called. Stops at the first listener error.
    pub fn click(&self, click: Click) -> anyhow::Result<()> {
        let snapshot: Vec<(ListenerId, Listener)> = self
            .listeners
            .borrow()
            .entries
            .iter()
            .map(|(id, listener)| (*id, Rc::clone(listener)))
            .collect();

        for (id, listener) in snapshot {
            if self.is_registered(id) {
                listener(click)?;
            }
        }
        Ok(())
    }

    /// Subscription that sends `to_msg(click)` for every click while bound.
    pub fn on_click<Msg: 'static>(
        &self,
        id: SubscriptionId,
        to_msg: impl Fn(Click) -> Msg + 'static,
    ) -> Subscription<Msg> {
        let document = self.clone();
        Subscription::new(id, move |sender| {
            let sender = sender.clone();
            let listener = document.add_listener(move |click| {
                sender.send(to_msg(click))?;
                Ok(())
            });
            Unsubscribe::fallible(move || {
                if document.remove_listener(listener) {
                    Ok(())
                } else {
                    Err(anyhow!("click listener {:?} was already removed", listener))
                }
            })
        })
    }
}
