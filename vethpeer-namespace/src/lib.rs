//! Network namespace isolation for the peer lookup
//!
//! This crate provides:
//! - [`NamespaceBinder`] - joins the network namespace of a process
//! - [`transport`] - one-shot pipe carrying the lookup result
//! - [`executor`] - forks a disposable worker that binds and runs the lookup

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod binder;
pub mod executor;
pub mod transport;

pub use binder::{NamespaceBinder, bind_to_namespace};
pub use executor::run_isolated;
pub use transport::{ResultReceiver, ResultSender};
