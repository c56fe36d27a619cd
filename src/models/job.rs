use serde::{Deserialize, Serialize};

/// Name of the job created by `init`.
pub const DEFAULT_JOB: &str = "default";

/// A named work context sessions belong to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Job {
    pub id: i64, // ⇔ time_clok_jobs.id
    pub name: String, // ⇔ time_clok_jobs.name (UNIQUE, always lowercase)
}

impl Job {
    /// Job names are stored lowercased and trimmed.
    pub fn normalize_name(name: &str) -> String {
        name.trim().to_lowercase()
    }
}
