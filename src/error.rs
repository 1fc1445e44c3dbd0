//! Error types
//!
//! Only startup failures (`AssetRootMissing`, `Config`, `Io`) may abort.
//! Everything else is recovered from where it happens.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A texture, sound or particle file is missing or unreadable
    #[error("asset `{name}` could not be loaded: {reason}")]
    AssetLoad { name: String, reason: String },

    /// The asset directory itself does not exist
    #[error("asset directory {0} does not exist")]
    AssetRootMissing(PathBuf),

    /// A tap did not hit any surface candidate
    #[error("tap did not hit a surface candidate")]
    InvalidSurfaceSelection,

    /// A timer or contact named an entity that was already removed
    #[error("{callback} fired for removed entity {entity}")]
    StaleEntityCallback {
        callback: &'static str,
        entity: u32,
    },

    #[error("invalid settings: {0}")]
    Config(String),

    #[error("settings parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the match can keep running after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::AssetLoad { .. } | Error::InvalidSurfaceSelection | Error::StaleEntityCallback { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_split() {
        assert!(Error::InvalidSurfaceSelection.is_recoverable());
        assert!(
            Error::StaleEntityCallback {
                callback: "fuse",
                entity: 4
            }
            .is_recoverable()
        );
        assert!(!Error::AssetRootMissing(PathBuf::from("assets")).is_recoverable());
        assert!(!Error::Config("fuse must be positive".into()).is_recoverable());
    }

    #[test]
    fn test_display() {
        let err = Error::StaleEntityCallback {
            callback: "cube fuse",
            entity: 7,
        };
        assert_eq!(err.to_string(), "cube fuse fired for removed entity 7");
    }
}
