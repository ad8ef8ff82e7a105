//! Holder of the current model and applier of reducer transitions.

use crate::error::UpdateError;
use crate::mvu::effect::EffectRunner;
use crate::mvu::program::Transition;
use crate::mvu::sender::Sender;

/// Owns the model and replaces it wholesale on every transition.
pub struct UpdateLoop<Model, Msg> {
    model: Model,
    sender: Sender<Msg>,
    transitions: u64,
}

impl<Model, Msg> UpdateLoop<Model, Msg> {
    pub fn new(model: Model, sender: Sender<Msg>) -> Self {
        Self {
            model,
            sender,
            transitions: 0,
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn sender(&self) -> &Sender<Msg> {
        &self.sender
    }

    /// Transitions applied since construction.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Applies one message.
    ///
    /// `update` sees the model as left by the previous step. The result is
    /// published before its effects fire, and a failed update leaves the model
    /// untouched. Returns the number of effects fired.
    pub fn step<F>(&mut self, msg: Msg, update: F) -> Result<usize, UpdateError>
    where
        F: FnOnce(Msg, &Model) -> Result<Transition<Model, Msg>, UpdateError>,
    {
        let Transition { model, effects } = update(msg, &self.model)?;
        self.model = model;
        self.transitions += 1;
        Ok(EffectRunner::run(effects, &self.sender))
    }
}
