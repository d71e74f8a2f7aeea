use std::fs;
use std::path::{Path, PathBuf};
use crate::errors::{UnveiledError, UnveiledResult};
use crate::structs::stored_result::StoredResult;
use crate::traits::result_sink::ResultSink;

/// Keeps finished results on disk as `<root>/<username>/<key>.json`.
pub struct FileResultSink {
    root: PathBuf,
}

impl FileResultSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, username: &str, key: &str) -> PathBuf {
        self.root.join(username).join(format!("{}.json", key))
    }

    pub fn load(&self, username: &str, key: &str) -> UnveiledResult<StoredResult> {
        let path = self.path_for(username, key);
        if !path.exists() {
            return Err(UnveiledError::not_found("Stored result", &path.display().to_string()));
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl ResultSink for FileResultSink {
    fn persist(&self, username: &str, key: &str, result: &StoredResult) -> UnveiledResult<()> {
        if username.is_empty() || username.contains(['/', '\\']) || username.starts_with('.') {
            return Err(UnveiledError::validation_error(
                "username",
                username,
                "must be a plain directory name",
                None,
            ));
        }

        let path = self.path_for(username, key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(result)?)?;

        log::info!("💾 Saved analysis result to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn persisted_result_can_be_loaded_back() {
        let dir = TempDir::new().unwrap();
        let sink = FileResultSink::new(dir.path());
        let stored = StoredResult::success(json!({"summary": {"average_score": 81.5}}));

        sink.persist("alice", "profileAnalysisResult", &stored).unwrap();

        assert!(dir.path().join("alice").join("profileAnalysisResult.json").exists());
        assert_eq!(sink.load("alice", "profileAnalysisResult").unwrap(), stored);
    }

    #[test]
    fn path_like_usernames_are_rejected() {
        let dir = TempDir::new().unwrap();
        let sink = FileResultSink::new(dir.path());
        let stored = StoredResult::success(json!({}));

        assert!(sink.persist("../escape", "profileAnalysisResult", &stored).is_err());
        assert!(sink.persist("", "profileAnalysisResult", &stored).is_err());
    }

    #[test]
    fn missing_result_is_not_found() {
        let dir = TempDir::new().unwrap();
        let sink = FileResultSink::new(dir.path());
        let err = sink.load("nobody", "profileAnalysisResult").unwrap_err();
        assert!(matches!(err, UnveiledError::NotFound { .. }));
    }
}
