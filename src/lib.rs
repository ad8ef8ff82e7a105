//! Model/update/view state runtime.
//!
//! A [`mvu::Program`] supplies `init`, `update`, `view` and `subscriptions`;
//! [`mvu::AppRuntime`] mounts it onto a host-defined [`mvu::MountTarget`] and
//! keeps the model, effects and external subscriptions in step with every
//! dispatched message.

pub mod config;
pub mod error;
pub mod logging;
pub mod mvu;
pub mod ui;

pub use error::{RuntimeError, UpdateError};
