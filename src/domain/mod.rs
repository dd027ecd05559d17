//! Domain logic - pure release rules independent of git operations

pub mod branch;
pub mod context;
pub mod prerelease;
pub mod tag;
pub mod version;

pub use branch::BranchContext;
pub use context::ReleaseContext;
pub use prerelease::PreRelease;
pub use tag::{Tag, TagKind, TagSet};
pub use version::VersionBump;
