use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthServices {
    pub github: String,
    pub analyzer: String,
    pub progress_store: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub version: String,
    pub services: HealthServices,
}

impl HealthReport {
    pub fn new(github_configured: bool, analyzer_url: &str, progress_store: &str) -> Self {
        let (status, github) = if github_configured {
            ("healthy", "configured")
        } else {
            ("degraded", "missing token")
        };

        Self {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            services: HealthServices {
                github: github.to_string(),
                analyzer: analyzer_url.to_string(),
                progress_store: progress_store.to_string(),
            },
        }
    }
}
