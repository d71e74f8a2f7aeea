use crate::config::constants::{GITHUB_USERNAME_MAX_LENGTH, MAX_JOB_ID_LENGTH};
use crate::errors::{UnveiledError, UnveiledResult};

/// Checks a GitHub login and returns it trimmed.
pub fn validate_username(username: &str) -> UnveiledResult<String> {
    let username = username.trim();
    let invalid = |constraint: &str| {
        UnveiledError::validation_error("username", username, constraint, Some("Pass the GitHub login, e.g. 'octocat'"))
    };

    if username.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if username.chars().count() > GITHUB_USERNAME_MAX_LENGTH {
        return Err(invalid("must be at most 39 characters"));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(invalid("may only contain letters, digits and hyphens"));
    }
    if username.starts_with('-') || username.ends_with('-') || username.contains("--") {
        return Err(invalid("hyphens must separate other characters"));
    }

    Ok(username.to_string())
}

/// Job ids end up in cache keys and URL paths; keep them to a safe alphabet.
pub fn sanitize_job_id(job_id: &str) -> String {
    job_id.chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .take(MAX_JOB_ID_LENGTH)
        .collect()
}
