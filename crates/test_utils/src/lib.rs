//! Shared test support for the tax filing portal workspace.
//!
//! Fixtures hand out well-known values (amounts, actors, ids), the
//! builders construct aggregates at a chosen lifecycle stage, and the
//! generators feed the property tests. Everything is re-exported flat
//! so test files can take what they need with a single `use`.

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
