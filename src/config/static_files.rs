//! Static asset configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Static asset configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaticFilesConfig {
    /// Directory served for paths no route matches
    pub dir: Option<PathBuf>,
}

impl StaticFilesConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.dir {
            Some(dir) if !dir.is_dir() => Err(ValidationError::StaticDirNotFound(dir.clone())),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_dir_is_valid() {
        assert!(StaticFilesConfig::default().validate().is_ok());
    }

    #[test]
    fn test_existing_dir_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let config = StaticFilesConfig {
            dir: Some(dir.path().to_path_buf()),
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_dir_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = StaticFilesConfig {
            dir: Some(dir.path().join("nope")),
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::StaticDirNotFound(_))
        ));
    }
}
