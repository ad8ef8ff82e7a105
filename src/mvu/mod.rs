//! Model-View-Update runtime.
//!
//! # Architecture
//!
//! ```text
//!            ┌──────────── Sender ◄──────────────┬──────────────┐
//!            ▼                                   │              │
//!  queue ──→ UpdateLoop ──→ Model ──→ view ──→ MountTarget      │
//!            │  update(msg, &model)     │                       │
//!            ▼                          ▼                       │
//!        EffectRunner            SubscriptionReconciler ────────┘
//! ```
//!
//! - **Program**: `init`, `update`, `view` and `subscriptions`
//! - **Sender**: stable per-instance handle that enqueues messages
//! - **UpdateLoop**: owns the model, replaces it on every message
//! - **EffectRunner**: fires a transition's effects after it is published
//! - **SubscriptionReconciler**: binds and unbinds external sources by id
//! - **MessageChannel**: hands the sender to nested consumers
//! - **AppRuntime / Instance**: mount, dispatch, unmount

mod channel;
mod effect;
mod message;
mod program;
mod runtime;
mod sender;
mod subscription;
mod target;
mod update_loop;

pub use channel::MessageChannel;
pub use effect::{Effect, EffectRunner};
pub use message::Tagged;
pub use program::{FnProgram, Program, Transition};
pub use runtime::{AppRuntime, Instance};
pub use sender::Sender;
pub use subscription::{
    ReconcileReport, Subscription, SubscriptionId, SubscriptionReconciler, Unsubscribe,
};
pub use target::MountTarget;
pub use update_loop::UpdateLoop;
