//! Python packaging adapter
//!
//! Editable installs through pip or uv, recovery of the installed
//! distribution name, and lookup of installed distribution metadata.

pub mod distribution;
pub mod editable;
pub mod errors;
pub mod installer;
pub mod output_matchers;

pub use distribution::{normalize_name, DistributionLocator};
pub use editable::EditableInstall;
pub use errors::InstallerError;
pub use installer::{DistributionManager, PackageInstaller};
pub use output_matchers::{parse_distribution_name, MatchedDistribution};
