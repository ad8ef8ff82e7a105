//! Declarative subscriptions and their reconciler.
//!
//! A program describes which external bindings it wants for the current model
//! by returning a list of [`Subscription`]s. The [`SubscriptionReconciler`]
//! diffs that list against what is already bound, keyed by
//! [`SubscriptionId`]:
//!
//! ```text
//! desired ids ──┬── new id     ──→ start(sender), remember its Unsubscribe
//!               ├── known id   ──→ left alone
//! registry ─────┴── missing id ──→ remove, call its Unsubscribe
//! ```
//!
//! Identity is the id, never the captured state: a factory that needs a
//! rebind after the model changes must hand out a different id.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::RuntimeError;
use crate::mvu::sender::Sender;

/// Key identifying a logical subscription across reconciliations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    name: Cow<'static, str>,
    discriminant: Option<u64>,
}

impl SubscriptionId {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            discriminant: None,
        }
    }

    /// Same name, distinct identity per discriminant.
    pub fn keyed(mut self, discriminant: u64) -> Self {
        self.discriminant = Some(discriminant);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.discriminant {
            Some(key) => write!(f, "{}#{}", self.name, key),
            None => f.write_str(&self.name),
        }
    }
}

/// Stops a bound subscription. Called at most once.
pub struct Unsubscribe {
    stop: Box<dyn FnOnce() -> anyhow::Result<()>>,
}

impl Unsubscribe {
    pub fn new(stop: impl FnOnce() + 'static) -> Self {
        Self::fallible(move || {
            stop();
            Ok(())
        })
    }

    /// An unsubscribe whose failure is reported to the caller of the
    /// reconciliation that stopped it.
    pub fn fallible(stop: impl FnOnce() -> anyhow::Result<()> + 'static) -> Self {
        Self {
            stop: Box::new(stop),
        }
    }

    /// For subscriptions with nothing to release.
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    fn call(self) -> anyhow::Result<()> {
        (self.stop)()
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Unsubscribe(..)")
    }
}

/// A long-lived external binding: an id plus the capability to start it.
pub struct Subscription<Msg> {
    id: SubscriptionId,
    start: Box<dyn FnOnce(&Sender<Msg>) -> Unsubscribe>,
}

impl<Msg> Subscription<Msg> {
    pub fn new(
        id: SubscriptionId,
        start: impl FnOnce(&Sender<Msg>) -> Unsubscribe + 'static,
    ) -> Self {
        Self {
            id,
            start: Box::new(start),
        }
    }

    pub fn id(&self) -> &SubscriptionId {
        &self.id
    }
}

impl<Msg> fmt::Debug for Subscription<Msg> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Counts from one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub started: usize,
    pub stopped: usize,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.started == 0 && self.stopped == 0
    }
}

/// Registry of bound subscriptions keyed by id, remembering bind order.
///
/// Invariant: `order` holds exactly the keys of `bindings`, every one of
/// them was started and not yet stopped, and no id appears twice.
#[derive(Default)]
pub struct SubscriptionReconciler {
    bindings: HashMap<SubscriptionId, Unsubscribe>,
    order: Vec<SubscriptionId>,
}

impl SubscriptionReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Brings the registry in line with `desired`.
    ///
    /// New ids are started first, then ids no longer desired are stopped.
    /// Every stale subscription is stopped even if one of them fails; the
    /// first failure is returned.
    pub fn reconcile<Msg>(
        &mut self,
        desired: impl IntoIterator<Item = Option<Subscription<Msg>>>,
        sender: &Sender<Msg>,
    ) -> Result<ReconcileReport, RuntimeError> {
        let mut report = ReconcileReport::default();
        let mut wanted = HashSet::new();

        for (index, entry) in desired.into_iter().enumerate() {
            let Some(Subscription { id, start }) = entry else {
                tracing::trace!(index, "skipping empty subscription slot");
                continue;
            };
            if !wanted.insert(id.clone()) {
                tracing::trace!(subscription = %id, "duplicate subscription id ignored");
                continue;
            }
            if self.is_bound(&id) {
                continue;
            }
            tracing::debug!(subscription = %id, "binding subscription");
            let unsubscribe = start(sender);
            self.order.push(id.clone());
            self.bindings.insert(id, unsubscribe);
            report.started += 1;
        }

        let (kept, stale): (Vec<_>, Vec<_>) = std::mem::take(&mut self.order)
            .into_iter()
            .partition(|id| wanted.contains(id));
        self.order = kept;

        let mut failure = None;
        for id in stale {
            let Some(unsubscribe) = self.bindings.remove(&id) else {
                continue;
            };
            tracing::debug!(subscription = %id, "unbinding subscription");
            report.stopped += 1;
            if let Err(source) = unsubscribe.call() {
                tracing::warn!(subscription = %id, error = %source, "unsubscribe failed");
                if failure.is_none() {
                    failure = Some(RuntimeError::Unsubscribe { id, source });
                }
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(report),
        }
    }

    /// Stops everything that is bound.
    pub fn flush<Msg>(&mut self, sender: &Sender<Msg>) -> Result<ReconcileReport, RuntimeError> {
        self.reconcile(std::iter::empty(), sender)
    }

    pub fn is_bound(&self, id: &SubscriptionId) -> bool {
        self.bindings.contains_key(id)
    }

    /// Bound ids in bind order.
    pub fn ids(&self) -> Vec<SubscriptionId> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl fmt::Debug for SubscriptionReconciler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.order).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Default)]
    struct Spy {
        starts: Cell<usize>,
        stops: Cell<usize>,
    }

    fn tracked(name: &'static str, spy: &Rc<Spy>) -> Option<Subscription<u8>> {
        let spy = Rc::clone(spy);
        Some(Subscription::new(SubscriptionId::new(name), move |_| {
            spy.starts.set(spy.starts.get() + 1);
            Unsubscribe::new(move || spy.stops.set(spy.stops.get() + 1))
        }))
    }

    #[test]
    fn starts_new_and_keeps_existing() {
        let spy = Rc::new(Spy::default());
        let sender = Sender::new();
        let mut reconciler = SubscriptionReconciler::new();

        let first = reconciler.reconcile([tracked("clock", &spy)], &sender).unwrap();
        let second = reconciler.reconcile([tracked("clock", &spy)], &sender).unwrap();

        assert_eq!(first, ReconcileReport { started: 1, stopped: 0 });
        assert!(second.is_noop());
        assert_eq!(spy.starts.get(), 1);
        assert_eq!(spy.stops.get(), 0);
        assert!(reconciler.is_bound(&SubscriptionId::new("clock")));
    }

    #[test]
    fn stops_ids_that_disappear() {
        let spy = Rc::new(Spy::default());
        let sender = Sender::new();
        let mut reconciler = SubscriptionReconciler::new();

        reconciler
            .reconcile([tracked("a", &spy), tracked("b", &spy)], &sender)
            .unwrap();
        let report = reconciler.reconcile([tracked("b", &spy)], &sender).unwrap();

        assert_eq!(report, ReconcileReport { started: 0, stopped: 1 });
        assert_eq!(reconciler.ids(), vec![SubscriptionId::new("b")]);
        assert_eq!(spy.stops.get(), 1);
    }

    #[test]
    fn keyed_ids_force_rebind() {
        let spy = Rc::new(Spy::default());
        let sender = Sender::new();
        let mut reconciler = SubscriptionReconciler::new();

        let keyed = |key| {
            let spy = Rc::clone(&spy);
            Some(Subscription::<u8>::new(
                SubscriptionId::new("poll").keyed(key),
                move |_| {
                    spy.starts.set(spy.starts.get() + 1);
                    Unsubscribe::new(move || spy.stops.set(spy.stops.get() + 1))
                },
            ))
        };

        reconciler.reconcile([keyed(1)], &sender).unwrap();
        reconciler.reconcile([keyed(2)], &sender).unwrap();

        assert_eq!(spy.starts.get(), 2);
        assert_eq!(spy.stops.get(), 1);
        assert_eq!(reconciler.ids(), vec![SubscriptionId::new("poll").keyed(2)]);
    }

    #[test]
    fn empty_slots_and_duplicates_are_skipped() {
        let spy = Rc::new(Spy::default());
        let sender = Sender::new();
        let mut reconciler = SubscriptionReconciler::new();

        let report = reconciler
            .reconcile([None, tracked("x", &spy), tracked("x", &spy)], &sender)
            .unwrap();

        assert_eq!(report.started, 1);
        assert_eq!(reconciler.len(), 1);
        assert_eq!(spy.starts.get(), 1);
    }

    #[test]
    fn flush_stops_everything_once() {
        let spy = Rc::new(Spy::default());
        let sender = Sender::new();
        let mut reconciler = SubscriptionReconciler::new();

        reconciler
            .reconcile(
                [tracked("a", &spy), tracked("b", &spy), tracked("c", &spy)],
                &sender,
            )
            .unwrap();
        let report = reconciler.flush(&sender).unwrap();
        let again = reconciler.flush(&sender).unwrap();

        assert_eq!(report.stopped, 3);
        assert!(again.is_noop());
        assert!(reconciler.is_empty());
        assert_eq!(spy.stops.get(), 3);
    }

    #[test]
    fn failed_unsubscribe_is_reported_after_stopping_the_rest() {
        let stopped = Rc::new(RefCell::new(Vec::new()));
        let sender: Sender<u8> = Sender::new();
        let mut reconciler = SubscriptionReconciler::new();

        let failing = Some(Subscription::new(SubscriptionId::new("broken"), |_| {
            Unsubscribe::fallible(|| Err(anyhow::anyhow!("listener already removed")))
        }));
        let log = Rc::clone(&stopped);
        let healthy = Some(Subscription::new(SubscriptionId::new("healthy"), move |_| {
            Unsubscribe::new(move || log.borrow_mut().push("healthy"))
        }));

        reconciler.reconcile([failing, healthy], &sender).unwrap();
        let err = reconciler.flush(&sender).unwrap_err();

        match err {
            RuntimeError::Unsubscribe { id, .. } => assert_eq!(id, SubscriptionId::new("broken")),
            other => panic!("expected Unsubscribe error, got {other:?}"),
        }
        assert_eq!(*stopped.borrow(), vec!["healthy"]);
        assert!(reconciler.is_empty());
    }

    #[test]
    fn ids_keep_bind_order_across_removals() {
        let spy = Rc::new(Spy::default());
        let sender = Sender::new();
        let mut reconciler = SubscriptionReconciler::new();

        reconciler
            .reconcile([tracked("c", &spy), tracked("a", &spy)], &sender)
            .unwrap();
        reconciler
            .reconcile(
                [tracked("b", &spy), tracked("a", &spy), tracked("c", &spy)],
                &sender,
            )
            .unwrap();
        reconciler
            .reconcile([tracked("b", &spy), tracked("c", &spy)], &sender)
            .unwrap();

        assert_eq!(
            reconciler.ids(),
            vec![SubscriptionId::new("c"), SubscriptionId::new("b")]
        );
        assert!(!reconciler.is_bound(&SubscriptionId::new("a")));
        assert_eq!(reconciler.len(), 2);
    }

    #[test]
    fn display_includes_discriminant() {
        assert_eq!(SubscriptionId::new("tick").to_string(), "tick");
        assert_eq!(SubscriptionId::new("tick").keyed(3).to_string(), "tick#3");
    }
}
