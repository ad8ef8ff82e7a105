//! Shared test utilities: a recording mount target, the basic counter
//! program and spies.

#![allow(dead_code, unused_imports)]

use mvu_state::mvu::{
    FnProgram, MountTarget, Sender, Subscription, SubscriptionId, Tagged, Transition,
    Unsubscribe,
};
use mvu_state::ui::document::{Click, Document};
use mvu_state::UpdateError;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub const ORIGIN: Click = Click { column: 0, row: 0 };

/// Mount target recording every rendered output. Clones share the record.
pub struct Recorder<O> {
    frames: Rc<RefCell<Vec<O>>>,
    detached: Rc<Cell<bool>>,
}

impl<O> Recorder<O> {
    pub fn new() -> Self {
        Self {
            frames: Rc::new(RefCell::new(Vec::new())),
            detached: Rc::new(Cell::new(false)),
        }
    }

    pub fn renders(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn is_detached(&self) -> bool {
        self.detached.get()
    }
}

impl<O: Clone> Recorder<O> {
    pub fn last(&self) -> Option<O> {
        self.frames.borrow().last().cloned()
    }

    pub fn frames(&self) -> Vec<O> {
        self.frames.borrow().clone()
    }
}

impl<O> Clone for Recorder<O> {
    fn clone(&self) -> Self {
        Self {
            frames: Rc::clone(&self.frames),
            detached: Rc::clone(&self.detached),
        }
    }
}

impl<O> MountTarget<O> for Recorder<O> {
    fn render(&mut self, output: O) {
        self.frames.borrow_mut().push(output);
    }

    fn detach(&mut self) {
        self.detached.set(true);
    }
}

pub type Basic = FnProgram<i64, Tagged, i64>;

/// plus/minus/reset/documentClick reducer with a failing default branch.
pub fn basic_update(msg: Tagged, model: &i64) -> Result<Transition<i64, Tagged>, UpdateError> {
    match msg.kind() {
        "plus" => Ok(Transition::new(model + 1)),
        "minus" => Ok(Transition::new(model - 1)),
        "reset" => Ok(Transition::new(0)),
        "documentClick" => Ok(Transition::new(model + 5)),
        _ => Err(msg.unknown()),
    }
}

/// Counter starting at 0 whose view output is the count itself.
pub fn basic() -> Basic {
    FnProgram::new(
        || Transition::new(0),
        basic_update,
        |model: &i64, _: &Sender<Tagged>| *model,
    )
}

pub fn click_subscription(document: &Document) -> Subscription<Tagged> {
    document.on_click(SubscriptionId::new("document-click"), |_| {
        Tagged::new("documentClick")
    })
}

pub type Spy = Rc<Cell<usize>>;

pub fn spy() -> Spy {
    Rc::new(Cell::new(0))
}

pub fn bump(spy: &Spy) {
    spy.set(spy.get() + 1);
}

/// Subscription counting its starts and stops.
pub fn counted(name: &'static str, starts: &Spy, stops: &Spy) -> Subscription<Tagged> {
    let starts = Rc::clone(starts);
    let stops = Rc::clone(stops);
    Subscription::new(SubscriptionId::new(name), move |_| {
        bump(&starts);
        Unsubscribe::new(move || bump(&stops))
    })
}
