//! Entity model of the coverage hierarchy.
//!
//! Every level is a typed container keyed by a stable business [`Key`].
//! Entities are created on first encounter and merged in place on every later
//! encounter of the same key (see [`Merge`] and [`Upsert`]).

mod config;
pub use config::{Config, ConfigError};

mod coverage;
pub use coverage::CoverageRoot;

mod exchange;
pub use exchange::{InterfaceExchangeRequirement, ProgrammaticInterface, Service};

mod interface;
pub use interface::{ExchangePoint, Function, SystemInterface, TechnicalInterface};

/// Business key type.
pub mod key;
pub use key::Key;

mod merge;
pub use merge::{Merge, Upsert};

mod requirement;
pub use requirement::{Requirement, Status};

mod test_case;
pub use test_case::TestCase;
