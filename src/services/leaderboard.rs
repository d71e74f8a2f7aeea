use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use chrono::{DateTime, Utc};
use serde_json::Value;
use crate::config::constants::{LEADERBOARD_FILE_NAME, RESULT_STORAGE_KEY};
use crate::errors::UnveiledResult;
use crate::structs::leaderboard_entry::LeaderboardEntry;
use crate::structs::stored_result::StoredResult;

/// Ranks every stored profile result under a results directory.
pub struct LeaderboardService {
    results_dir: PathBuf,
}

impl LeaderboardService {
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self { results_dir: results_dir.into() }
    }

    pub fn output_path(&self) -> PathBuf {
        self.results_dir.join(LEADERBOARD_FILE_NAME)
    }

    /// Rebuilds the leaderboard and writes it next to the results.
    pub fn update(&self) -> UnveiledResult<Vec<LeaderboardEntry>> {
        let entries = self.collect()?;

        fs::create_dir_all(&self.results_dir)?;
        let output = self.output_path();
        fs::write(&output, serde_json::to_string_pretty(&entries)?)?;

        log::info!("🏆 Leaderboard updated with {} profiles ({})", entries.len(), output.display());
        Ok(entries)
    }

    pub fn collect(&self) -> UnveiledResult<Vec<LeaderboardEntry>> {
        if !self.results_dir.exists() {
            log::warn!("📂 No results directory at {}", self.results_dir.display());
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for dir_entry in fs::read_dir(&self.results_dir)? {
            let dir_entry = dir_entry?;
            if !dir_entry.file_type()?.is_dir() {
                continue;
            }
            let username = dir_entry.file_name().to_string_lossy().into_owned();
            let path = dir_entry.path().join(format!("{}.json", RESULT_STORAGE_KEY));

            match read_entry(&username, &path) {
                Some(entry) => entries.push(entry),
                None => log::debug!("Skipping {} for leaderboard", path.display()),
            }
        }

        entries.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.username.cmp(&b.username))
        });
        for (index, entry) in entries.iter_mut().enumerate() {
            entry.rank = index + 1;
        }

        Ok(entries)
    }
}

fn read_entry(username: &str, path: &Path) -> Option<LeaderboardEntry> {
    let content = fs::read_to_string(path).ok()?;
    let stored: StoredResult = match serde_json::from_str(&content) {
        Ok(stored) => stored,
        Err(e) => {
            log::warn!("⚠️ Unreadable result at {}: {}", path.display(), e);
            return None;
        }
    };
    if !stored.success {
        return None;
    }

    let summary = stored.data.get("summary");
    let score = summary
        .and_then(|s| s.get("average_score"))
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    let repositories_analyzed = summary
        .and_then(|s| s.get("repositories_analyzed"))
        .and_then(Value::as_u64)
        .unwrap_or(0) as usize;
    let updated_at = DateTime::<Utc>::from_timestamp_millis(stored.timestamp).unwrap_or_else(Utc::now);

    Some(LeaderboardEntry {
        rank: 0,
        username: username.to_string(),
        score,
        repositories_analyzed,
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;
    use crate::services::file_result_sink::FileResultSink;
    use crate::traits::result_sink::ResultSink;

    fn store(sink: &FileResultSink, username: &str, score: f64) {
        let data = json!({ "summary": { "average_score": score, "repositories_analyzed": 3 } });
        sink.persist(username, RESULT_STORAGE_KEY, &StoredResult::success(data)).unwrap();
    }

    #[test]
    fn ranks_by_score_then_username() {
        let dir = TempDir::new().unwrap();
        let sink = FileResultSink::new(dir.path());
        store(&sink, "carol", 70.0);
        store(&sink, "alice", 91.5);
        store(&sink, "bob", 70.0);

        let entries = LeaderboardService::new(dir.path()).update().unwrap();
        let order: Vec<(usize, &str)> = entries.iter().map(|e| (e.rank, e.username.as_str())).collect();
        assert_eq!(order, vec![(1, "alice"), (2, "bob"), (3, "carol")]);
        assert_eq!(entries[0].repositories_analyzed, 3);

        let written: Vec<LeaderboardEntry> =
            serde_json::from_str(&fs::read_to_string(dir.path().join("leaderboard.json")).unwrap()).unwrap();
        assert_eq!(written, entries);
    }

    #[test]
    fn skips_failed_and_corrupt_results() {
        let dir = TempDir::new().unwrap();
        let sink = FileResultSink::new(dir.path());
        store(&sink, "alice", 50.0);

        let failed = StoredResult { success: false, data: json!({}), timestamp: 0 };
        sink.persist("bob", RESULT_STORAGE_KEY, &failed).unwrap();

        fs::create_dir_all(dir.path().join("carol")).unwrap();
        fs::write(dir.path().join("carol").join("profileAnalysisResult.json"), "{not json").unwrap();
        fs::create_dir_all(dir.path().join("dave")).unwrap();

        let entries = LeaderboardService::new(dir.path()).collect().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].username, "alice");
    }

    #[test]
    fn missing_directory_yields_empty_board() {
        let dir = TempDir::new().unwrap();
        let service = LeaderboardService::new(dir.path().join("absent"));
        assert!(service.collect().unwrap().is_empty());
    }
}
