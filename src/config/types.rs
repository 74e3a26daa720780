use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings file read from the working directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// What to do with the source file when its content is already present at
/// the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Log the duplicate and leave the source file in place.
    #[default]
    Report,
    /// Remove the source file once the duplicate is confirmed.
    DeleteSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Config {
    /// Root of the unsorted tree to organize.
    pub source_location: PathBuf,
    /// Destination root for photo files.
    pub photo_dest_location: PathBuf,
    /// Destination root for video files.
    pub video_dest_location: PathBuf,
    /// Worker pool size for per-directory file batches.
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,
    #[serde(default)]
    pub on_duplicate: DuplicatePolicy,
    /// Upper bound on `_<n>` rename attempts when a destination name is
    /// taken by a file with different content.
    #[serde(default = "default_max_collision_attempts")]
    pub max_collision_attempts: usize,
}

const fn default_worker_threads() -> usize {
    1
}

const fn default_max_collision_attempts() -> usize {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_keys_take_defaults() {
        let config: Config = serde_json::from_str(
            r#"{
                "SourceLocation": "/data/unsorted",
                "PhotoDestLocation": "/data/photos",
                "VideoDestLocation": "/data/videos"
            }"#,
        )
        .unwrap();

        assert_eq!(config.worker_threads, 1);
        assert_eq!(config.on_duplicate, DuplicatePolicy::Report);
        assert_eq!(config.max_collision_attempts, 100);
    }

    #[test]
    fn test_duplicate_policy_kebab_case() {
        let config: Config = serde_json::from_str(
            r#"{
                "SourceLocation": "/a",
                "PhotoDestLocation": "/b",
                "VideoDestLocation": "/c",
                "OnDuplicate": "delete-source",
                "WorkerThreads": 4
            }"#,
        )
        .unwrap();

        assert_eq!(config.on_duplicate, DuplicatePolicy::DeleteSource);
        assert_eq!(config.worker_threads, 4);
    }
}
