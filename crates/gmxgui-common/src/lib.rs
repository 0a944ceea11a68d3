//! gmxgui-common: Shared types, errors, and catalogs used across all GROMACS GUI crates.

pub mod error;
pub mod forcefield;
pub mod formats;

// Re-export commonly used types
pub use error::{ApiError, GmxGuiError, Result};
pub use forcefield::{ForceField, FORCEFIELDS};
pub use formats::{FileKind, SUPPORTED_EXTENSIONS};
