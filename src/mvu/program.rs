//! The program contract: `init`, `update`, `view`, `subscriptions`.

use crate::error::UpdateError;
use crate::mvu::effect::Effect;
use crate::mvu::sender::Sender;
use crate::mvu::subscription::Subscription;

/// A next model plus the effects to fire once it is published.
///
/// Effect slots are `Option`s so conditional effects can be listed inline;
/// empty slots are skipped.
pub struct Transition<Model, Msg> {
    pub model: Model,
    pub effects: Vec<Option<Effect<Msg>>>,
}

impl<Model, Msg> Transition<Model, Msg> {
    /// Transition without effects.
    pub fn new(model: Model) -> Self {
        Self {
            model,
            effects: Vec::new(),
        }
    }

    pub fn with_effects(
        model: Model,
        effects: impl IntoIterator<Item = Option<Effect<Msg>>>,
    ) -> Self {
        Self {
            model,
            effects: effects.into_iter().collect(),
        }
    }

    pub fn effect(mut self, effect: Effect<Msg>) -> Self {
        self.effects.push(Some(effect));
        self
    }

    pub fn maybe_effect(mut self, effect: Option<Effect<Msg>>) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Application definition driven by the runtime.
pub trait Program: 'static {
    type Model: 'static;
    type Msg: 'static;
    /// Renderable value in the host's vocabulary; opaque to the runtime.
    type Output: 'static;

    /// Called once at mount.
    fn init(&self) -> Transition<Self::Model, Self::Msg>;

    /// Pure transition: must handle every message the application can
    /// produce and return an error for anything else.
    fn update(
        &self,
        msg: Self::Msg,
        model: &Self::Model,
    ) -> Result<Transition<Self::Model, Self::Msg>, UpdateError>;

    /// Called after every published model.
    fn view(&self, model: &Self::Model, sender: &Sender<Self::Msg>) -> Self::Output;

    /// Subscriptions wanted for `model`. Ids that should stay bound across
    /// models must be returned unchanged.
    fn subscriptions(&self, _model: &Self::Model) -> Vec<Option<Subscription<Self::Msg>>> {
        Vec::new()
    }
}

type InitFn<Model, Msg> = Box<dyn Fn() -> Transition<Model, Msg>>;
type UpdateFn<Model, Msg> = Box<dyn Fn(Msg, &Model) -> Result<Transition<Model, Msg>, UpdateError>>;
type ViewFn<Model, Msg, Output> = Box<dyn Fn(&Model, &Sender<Msg>) -> Output>;
type SubscriptionsFn<Model, Msg> = Box<dyn Fn(&Model) -> Vec<Option<Subscription<Msg>>>>;

/// A [`Program`] assembled from closures.
pub struct FnProgram<Model, Msg, Output> {
    init: InitFn<Model, Msg>,
    update: UpdateFn<Model, Msg>,
    view: ViewFn<Model, Msg, Output>,
    subscriptions: SubscriptionsFn<Model, Msg>,
}

impl<Model: 'static, Msg: 'static, Output: 'static> FnProgram<Model, Msg, Output> {
    pub fn new(
        init: impl Fn() -> Transition<Model, Msg> + 'static,
        update: impl Fn(Msg, &Model) -> Result<Transition<Model, Msg>, UpdateError> + 'static,
        view: impl Fn(&Model, &Sender<Msg>) -> Output + 'static,
    ) -> Self {
        Self {
            init: Box::new(init),
            update: Box::new(update),
            view: Box::new(view),
            subscriptions: Box::new(|_| Vec::new()),
        }
    }

    pub fn with_subscriptions(
        mut self,
        subscriptions: impl Fn(&Model) -> Vec<Option<Subscription<Msg>>> + 'static,
    ) -> Self {
        self.subscriptions = Box::new(subscriptions);
        self
    }
}

impl<Model: 'static, Msg: 'static, Output: 'static> Program for FnProgram<Model, Msg, Output> {
    type Model = Model;
    type Msg = Msg;
    type Output = Output;

    fn init(&self) -> Transition<Model, Msg> {
        (self.init)()
    }

    fn update(&self, msg: Msg, model: &Model) -> Result<Transition<Model, Msg>, UpdateError> {
        (self.update)(msg, model)
    }

    fn view(&self, model: &Model, sender: &Sender<Msg>) -> Output {
        (self.view)(model, sender)
    }

    fn subscriptions(&self, model: &Model) -> Vec<Option<Subscription<Msg>>> {
        (self.subscriptions)(model)
    }
}
