//! Mounting a program: wiring the update loop, effects, subscriptions, view
//! and channel into one live instance.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::RuntimeConfig;
use crate::error::RuntimeError;
use crate::mvu::channel::MessageChannel;
use crate::mvu::effect::{Effect, EffectRunner};
use crate::mvu::program::{Program, Transition};
use crate::mvu::sender::{Pump, Sender};
use crate::mvu::subscription::{SubscriptionId, SubscriptionReconciler};
use crate::mvu::target::MountTarget;
use crate::mvu::update_loop::UpdateLoop;

/// Configuration bundle for one mountable application.
pub struct AppRuntime<P: Program> {
    program: P,
    config: RuntimeConfig,
    channel: MessageChannel<P::Msg>,
}

impl<P: Program> AppRuntime<P> {
    pub fn new(program: P) -> Self {
        Self {
            program,
            config: RuntimeConfig::default(),
            channel: MessageChannel::new(),
        }
    }

    pub fn with_config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Publish the sender into a channel created by the host, so nested
    /// consumers built before mount can hold a clone of it.
    pub fn with_channel(mut self, channel: MessageChannel<P::Msg>) -> Self {
        self.channel = channel;
        self
    }

    pub fn channel(&self) -> MessageChannel<P::Msg> {
        self.channel.clone()
    }

    /// Mounts the program onto `target`.
    ///
    /// The initial model is published first, then the initial effects fire
    /// and any messages they send are applied. Only then does the first
    /// commit render the view and bind the initial subscriptions.
    pub fn mount<T>(self, target: T) -> Result<Instance<P, T>, RuntimeError>
    where
        T: MountTarget<P::Output> + 'static,
    {
        let AppRuntime {
            program,
            config,
            channel,
        } = self;

        let Transition { model, effects } = program.init();
        let sender = Sender::new();
        let mounted = Rc::new(Mounted {
            core: RefCell::new(Core {
                program,
                limit: config.max_transitions_per_dispatch,
                updates: UpdateLoop::new(model, sender.clone()),
                reconciler: SubscriptionReconciler::new(),
                target: Some(target),
                dirty: true,
                commits: 0,
            }),
        });
        let pump: Rc<dyn Pump> = mounted.clone();
        sender.connect(Rc::downgrade(&pump));

        if channel.is_live() {
            tracing::warn!("channel already carries a mounted sender; replacing it");
        }
        channel.publish(sender.clone());
        tracing::info!("instance mounted");

        let mut instance = Instance {
            mounted,
            sender,
            channel,
            live: true,
        };
        if let Err(err) = instance.start(effects) {
            if let Err(teardown_err) = instance.teardown() {
                tracing::warn!(error = %teardown_err, "teardown after failed mount also failed");
            }
            return Err(err);
        }
        Ok(instance)
    }
}

struct Core<P: Program, T> {
    program: P,
    limit: usize,
    updates: UpdateLoop<P::Model, P::Msg>,
    reconciler: SubscriptionReconciler,
    target: Option<T>,
    /// A transition was applied since the last commit.
    dirty: bool,
    commits: u64,
}

impl<P: Program, T: MountTarget<P::Output>> Core<P, T> {
    /// Applies queued messages one by one, committing whenever the queue runs
    /// dry, until a commit leaves nothing new behind.
    fn drain(&mut self, sender: &Sender<P::Msg>) -> Result<(), RuntimeError> {
        let mut applied = 0usize;
        loop {
            while let Some(msg) = sender.pop() {
                if applied == self.limit {
                    let dropped = sender.discard_pending() + 1;
                    tracing::warn!(limit = self.limit, dropped, "dispatch burst overflowed");
                    let overflow = RuntimeError::DispatchOverflow { limit: self.limit };
                    return Err(self.abort(sender, overflow));
                }
                applied += 1;

                let program = &self.program;
                match self.updates.step(msg, |msg, model| program.update(msg, model)) {
                    Ok(effects) => {
                        self.dirty = true;
                        tracing::trace!(
                            transition = self.updates.transitions(),
                            effects,
                            "transition applied"
                        );
                    }
                    Err(err) => {
                        let dropped = sender.discard_pending();
                        tracing::warn!(
                            error = %err,
                            dropped,
                            "update failed; queued messages discarded"
                        );
                        return Err(self.abort(sender, err.into()));
                    }
                }
            }

            if !self.dirty {
                return Ok(());
            }
            if let Err(err) = self.commit(sender) {
                sender.discard_pending();
                return Err(err);
            }
            if sender.pending() == 0 {
                return Ok(());
            }
        }
    }

    /// Ends a failed burst. Transitions applied before the failure stay
    /// published, so they are committed before `err` is handed back; anything
    /// that commit sends is dropped with the rest of the burst.
    fn abort(&mut self, sender: &Sender<P::Msg>, err: RuntimeError) -> RuntimeError {
        if self.dirty {
            if let Err(commit_err) = self.commit(sender) {
                tracing::warn!(error = %commit_err, "commit after failed burst also failed");
            }
            let dropped = sender.discard_pending();
            if dropped > 0 {
                tracing::debug!(dropped, "messages sent by the final commit discarded");
            }
        }
        err
    }

    /// Renders the published model and reconciles its subscriptions.
    fn commit(&mut self, sender: &Sender<P::Msg>) -> Result<(), RuntimeError> {
        self.dirty = false;
        self.commits += 1;

        let output = self.program.view(self.updates.model(), sender);
        if let Some(target) = self.target.as_mut() {
            target.render(output);
        }

        let desired = self.program.subscriptions(self.updates.model());
        let report = self.reconciler.reconcile(desired, sender)?;
        tracing::debug!(
            commit = self.commits,
            started = report.started,
            stopped = report.stopped,
            bound = self.reconciler.len(),
            "model committed"
        );
        Ok(())
    }

    /// Stops every subscription and detaches the target.
    fn teardown(&mut self, sender: &Sender<P::Msg>) -> Result<Option<T>, RuntimeError> {
        let flushed = self.reconciler.flush(sender);
        let mut target = self.target.take();
        if let Some(target) = target.as_mut() {
            target.detach();
        }
        let report = flushed?;
        tracing::debug!(stopped = report.stopped, "subscriptions flushed");
        Ok(target)
    }
}

struct Mounted<P: Program, T> {
    core: RefCell<Core<P, T>>,
}

impl<P: Program, T: MountTarget<P::Output>> Pump for Mounted<P, T> {
    fn pump(&self) -> Result<(), RuntimeError> {
        let mut core = self
            .core
            .try_borrow_mut()
            .map_err(|_| RuntimeError::Busy)?;
        let sender = core.updates.sender().clone();
        let _pumping = sender.pumping();
        core.drain(&sender)
    }
}

/// A live, mounted application.
///
/// Dropping an instance tears it down like [`Instance::unmount`], logging any
/// failure instead of returning it.
pub struct Instance<P: Program, T: MountTarget<P::Output>> {
    mounted: Rc<Mounted<P, T>>,
    sender: Sender<P::Msg>,
    channel: MessageChannel<P::Msg>,
    live: bool,
}

impl<P: Program, T: MountTarget<P::Output>> Instance<P, T> {
    fn start(&self, effects: Vec<Option<Effect<P::Msg>>>) -> Result<(), RuntimeError> {
        let mut core = self.mounted.core.borrow_mut();
        let _pumping = self.sender.pumping();
        let fired = EffectRunner::run(effects, &self.sender);
        tracing::debug!(fired, "initial effects fired");
        core.drain(&self.sender)
    }

    /// The instance's sender; the same handle for its whole lifetime.
    pub fn sender(&self) -> &Sender<P::Msg> {
        &self.sender
    }

    pub fn channel(&self) -> MessageChannel<P::Msg> {
        self.channel.clone()
    }

    /// Dispatches `msg` and everything it causes before returning.
    pub fn dispatch(&self, msg: P::Msg) -> Result<(), RuntimeError> {
        self.sender.send(msg)
    }

    /// Snapshot of the current model.
    pub fn model(&self) -> P::Model
    where
        P::Model: Clone,
    {
        self.mounted.core.borrow().updates.model().clone()
    }

    /// Runs `f` against the mount target. Messages sent from inside `f` are
    /// refused with [`RuntimeError::Busy`].
    pub fn with_target<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.mounted.core.borrow().target.as_ref().map(f)
    }

    pub fn bound_subscriptions(&self) -> Vec<SubscriptionId> {
        self.mounted.core.borrow().reconciler.ids()
    }

    /// Transitions applied since mount.
    pub fn transitions(&self) -> u64 {
        self.mounted.core.borrow().updates.transitions()
    }

    /// Commits (view + reconcile) since mount.
    pub fn commits(&self) -> u64 {
        self.mounted.core.borrow().commits
    }

    /// Stops every subscription, releases the channel and returns the target.
    ///
    /// Afterwards the sender refuses messages, so nothing reaches `update`
    /// again. If an unsubscribe fails the error is returned once every other
    /// subscription has been stopped, and the target is dropped.
    pub fn unmount(mut self) -> Result<T, RuntimeError> {
        self.teardown()?.ok_or(RuntimeError::NotMounted)
    }

    fn teardown(&mut self) -> Result<Option<T>, RuntimeError> {
        if !self.live {
            return Ok(None);
        }
        self.live = false;

        let result = {
            let mut core = self.mounted.core.borrow_mut();
            let _pumping = self.sender.pumping();
            core.teardown(&self.sender)
        };
        let dropped = self.sender.discard_pending();
        if dropped > 0 {
            tracing::debug!(dropped, "messages sent during teardown discarded");
        }
        self.sender.close();
        self.channel.release(&self.sender);
        tracing::info!("instance unmounted");
        result
    }
}

impl<P: Program, T: MountTarget<P::Output>> Drop for Instance<P, T> {
    fn drop(&mut self) {
        if let Err(err) = self.teardown() {
            tracing::warn!(error = %err, "teardown on drop failed");
        }
    }
}
