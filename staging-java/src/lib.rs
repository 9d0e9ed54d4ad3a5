//! Staging components for Java applications.
//!
//! Both components implement the [`staging_core::Component`] lifecycle and are driven by an
//! external orchestrator in the fixed order detect, compile, release. No data flows between
//! them; each is self-contained.

pub mod keystore_injector;
pub mod uberjar;

pub use keystore_injector::KeystoreInjector;
pub use uberjar::Uberjar;
