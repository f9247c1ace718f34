//! Variable reference checks for the jsck checker.
//!
//! - `VarCheck` - Resolves every name, repairs undefined variables and checks
//!   cross-module references against declared module dependencies
//! - `NameRefInExternsCheck` - Flags name references that have no effect in externs
//! - `SyntheticExterns` - Extern input holding placeholder declarations
//! - `diagnostics` - Definitions of everything the checks report

pub mod diagnostics;

pub mod externs_check;
pub use externs_check::NameRefInExternsCheck;

pub mod synthetic;
pub use synthetic::{SYNTHETIC_VARS_DECLAR, SyntheticExterns};

pub mod var_check;
pub use var_check::{VarCheck, VarCheckError};
