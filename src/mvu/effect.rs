//! One-shot side effects produced by state transitions.

use std::fmt;

use crate::mvu::sender::Sender;

/// A side effect scheduled by `init` or `update`.
///
/// Fires exactly once, after the transition that produced it has been
/// published, and may send any number of messages through the handle.
pub struct Effect<Msg> {
    run: Box<dyn FnOnce(&Sender<Msg>)>,
}

impl<Msg: 'static> Effect<Msg> {
    pub fn new(run: impl FnOnce(&Sender<Msg>) + 'static) -> Self {
        Self { run: Box::new(run) }
    }

    /// Effect that sends a single follow-up message.
    pub fn message(msg: Msg) -> Self {
        Self::new(move |sender| {
            if let Err(err) = sender.send(msg) {
                tracing::warn!(error = %err, "follow-up message was not delivered");
            }
        })
    }
}

impl<Msg> Effect<Msg> {
    fn fire(self, sender: &Sender<Msg>) {
        (self.run)(sender)
    }
}

impl<Msg> fmt::Debug for Effect<Msg> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Effect(..)")
    }
}

/// Runs effect batches in list order.
pub struct EffectRunner;

impl EffectRunner {
    /// Fires every present effect with `sender`; `None` entries are skipped.
    ///
    /// Returns the number of effects fired.
    pub fn run<Msg>(
        effects: impl IntoIterator<Item = Option<Effect<Msg>>>,
        sender: &Sender<Msg>,
    ) -> usize {
        let mut fired = 0;
        for (index, effect) in effects.into_iter().enumerate() {
            match effect {
                Some(effect) => {
                    effect.fire(sender);
                    fired += 1;
                }
                None => tracing::trace!(index, "skipping empty effect slot"),
            }
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn runs_in_list_order_and_skips_empty_slots() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let effects: Vec<Option<Effect<u8>>> = (0..3)
            .map(|i| {
                let log = Rc::clone(&log);
                Some(Effect::new(move |_| log.borrow_mut().push(i)))
            })
            .chain(std::iter::once(None))
            .collect();

        let sender = Sender::new();
        let fired = EffectRunner::run(effects, &sender);

        assert_eq!(fired, 3);
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn effect_receives_the_given_sender() {
        let sender: Sender<u8> = Sender::new();
        let seen = Rc::new(RefCell::new(None));
        let slot = Rc::clone(&seen);
        let effect = Effect::new(move |s: &Sender<u8>| *slot.borrow_mut() = Some(s.clone()));

        EffectRunner::run([Some(effect)], &sender);

        assert_eq!(seen.borrow().as_ref(), Some(&sender));
    }

    #[test]
    fn empty_batch_fires_nothing() {
        let sender: Sender<u8> = Sender::new();
        assert_eq!(EffectRunner::run(Vec::new(), &sender), 0);
    }
}
