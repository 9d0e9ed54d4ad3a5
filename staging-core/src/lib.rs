//! This crate provides the component model used to stage Java applications for a cloud runtime.
//!
//! A staging run takes an uploaded [`Application`], produces a runtime-ready [`Droplet`], and
//! drives a set of [`Component`]s through a fixed three-phase lifecycle: detect (applicability
//! check), compile (filesystem/setup work), release (produce the runtime launch contribution).
//! The driver that orders and times those calls lives outside this crate; components only
//! implement the phases.

pub mod application;
pub mod component;
pub mod config;
pub mod droplet;
pub mod log;

mod env;
mod error;

pub use application::Application;
pub use component::{Component, DetectOutcome, ReleaseOutcome, StagingContext};
pub use droplet::{Droplet, JavaHome, LibraryCollection};
pub use env::EnvironmentVariables;
pub use error::{Error, Result};
