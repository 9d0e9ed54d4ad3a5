//! The three-phase component lifecycle.

use crate::application::Application;
use crate::droplet::Droplet;
use std::fmt::Debug;

/// Context shared by the lifecycle phases of a single staging run.
///
/// A context is constructed once per run and threaded through detect, compile and release in
/// that order by an external driver; components never persist state across runs.
#[derive(Debug)]
pub struct StagingContext {
    pub application: Application,
    pub droplet: Droplet,
}

/// The result of a component's applicability check.
///
/// Detection failures are "this component does not apply", never errors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DetectOutcome {
    /// The component applies; carries its stable dash-case identifier.
    Pass(&'static str),
    Fail,
}

impl DetectOutcome {
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, DetectOutcome::Pass(_))
    }

    /// The component identifier, if detection passed.
    #[must_use]
    pub fn id(&self) -> Option<&'static str> {
        match self {
            DetectOutcome::Pass(id) => Some(id),
            DetectOutcome::Fail => None,
        }
    }
}

/// The release phase contribution of a component.
#[derive(Debug)]
pub struct ReleaseOutcome {
    /// The droplet view to thread to later consumers. Components that narrow the droplet's
    /// library collections return the filtered view here instead of mutating shared state.
    pub droplet: Droplet,

    /// The launch command fragment, if the component contributes one.
    pub command: Option<String>,
}

impl ReleaseOutcome {
    /// An outcome that passes the droplet through unchanged and contributes no command.
    #[must_use]
    pub fn pass_through(droplet: Droplet) -> Self {
        Self {
            droplet,
            command: None,
        }
    }
}

/// A staging component.
///
/// Implementations are constructed once per staging run with their validated configuration and
/// queried via [`detect`](Component::detect), then optionally
/// [`compile`](Component::compile), then [`release`](Component::release), then discarded.
pub trait Component {
    /// The component specific error type, usually an enum. The framework wraps it in
    /// [`Error::Component`](crate::Error::Component) alongside its own lower-level errors.
    type Error: Debug;

    /// The stable dash-case identifier reported when detection passes.
    fn id(&self) -> &'static str;

    /// Decides whether this component applies to the application being staged.
    ///
    /// Must be free of side effects: repeated calls without intervening filesystem changes
    /// return the same outcome.
    fn detect(&self, context: &StagingContext) -> DetectOutcome;

    /// Performs the component's filesystem/setup work.
    fn compile(&self, context: &StagingContext) -> crate::Result<(), Self::Error>;

    /// Produces the component's contribution to the runtime launch command.
    ///
    /// Takes the context by value so the component can hand back an updated droplet view in
    /// the [`ReleaseOutcome`].
    fn release(&self, context: StagingContext) -> crate::Result<ReleaseOutcome, Self::Error>;
}
