//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use deps::{ServerDeps, YoutubeAdapter};
pub use test_dependencies::{
    InMemoryCredentialStore, InsertCallArgs, MockUploadOutcome, MockVideoPlatform,
};
pub use traits::*;
