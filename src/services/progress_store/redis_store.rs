use std::collections::HashMap;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use crate::config::constants::{PROGRESS_KEY_PREFIX, STATUS_PENDING};
use crate::errors::{UnveiledError, UnveiledResult};
use crate::structs::progress_record::ProgressRecord;
use crate::traits::progress_store::ProgressStore;

const BACKEND: &str = "redis";

#[derive(Deserialize, Debug)]
struct RestReply {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<String>,
}

/// Progress records kept as Redis hashes behind an HTTP (Upstash-style) REST endpoint.
/// Every write refreshes the key's TTL.
#[derive(Clone)]
pub struct RedisProgressStore {
    client: Client,
    base_url: String,
    token: String,
    ttl_secs: u64,
}

impl RedisProgressStore {
    pub fn new(base_url: &str, token: &str, ttl_secs: u64) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            ttl_secs,
        }
    }

    fn key(job_id: &str) -> String {
        format!("{}{}", PROGRESS_KEY_PREFIX, job_id)
    }

    async fn post(&self, url: String, body: Value, operation: &str) -> UnveiledResult<Value> {
        let response = self.client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| UnveiledError::store_error(BACKEND, operation, &e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(UnveiledError::store_error(
                BACKEND,
                operation,
                &format!("HTTP {}: {}", status, error_text),
            ));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| UnveiledError::store_error(BACKEND, operation, &e.to_string()))
    }
}

/// Flat `field, value, field, value, ...` layout used for HSET.
pub(crate) fn encode_fields(record: &ProgressRecord) -> Vec<String> {
    let mut fields = vec![
        "jobId".to_string(), record.job_id.clone(),
        "status".to_string(), record.status.clone(),
        "progress".to_string(), record.progress.to_string(),
        "updatedAt".to_string(), record.updated_at.to_rfc3339(),
        "complete".to_string(), record.complete.to_string(),
    ];
    if let Some(error) = &record.error {
        fields.push("error".to_string());
        fields.push(error.clone());
    }
    fields
}

/// Inverse of [`encode_fields`] over an HGETALL reply. An empty hash means no record.
pub(crate) fn decode_fields(job_id: &str, flat: &[String]) -> Option<ProgressRecord> {
    if flat.is_empty() {
        return None;
    }

    let fields: HashMap<&str, &str> = flat
        .chunks_exact(2)
        .map(|pair| (pair[0].as_str(), pair[1].as_str()))
        .collect();

    Some(ProgressRecord {
        job_id: fields.get("jobId").map_or_else(|| job_id.to_string(), |v| (*v).to_string()),
        status: fields.get("status").map_or_else(|| STATUS_PENDING.to_string(), |v| (*v).to_string()),
        progress: fields.get("progress").and_then(|v| v.parse::<u8>().ok()).unwrap_or(0).min(100),
        updated_at: fields
            .get("updatedAt")
            .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
            .map_or_else(Utc::now, |t| t.with_timezone(&Utc)),
        complete: fields.get("complete").is_some_and(|v| *v == "true"),
        error: fields.get("error").map(|v| (*v).to_string()),
    })
}

#[async_trait]
impl ProgressStore for RedisProgressStore {
    async fn get(&self, job_id: &str) -> UnveiledResult<Option<ProgressRecord>> {
        let reply = self.post(self.base_url.clone(), json!(["HGETALL", Self::key(job_id)]), "get").await?;
        let reply: RestReply = serde_json::from_value(reply)
            .map_err(|e| UnveiledError::store_error(BACKEND, "get", &e.to_string()))?;

        if let Some(error) = reply.error {
            return Err(UnveiledError::store_error(BACKEND, "get", &error));
        }

        let flat: Vec<String> = match reply.result {
            Value::Null => Vec::new(),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect(),
            other => {
                return Err(UnveiledError::store_error(
                    BACKEND,
                    "get",
                    &format!("unexpected HGETALL reply: {}", other),
                ))
            }
        };

        Ok(decode_fields(job_id, &flat))
    }

    async fn set(&self, record: &ProgressRecord) -> UnveiledResult<()> {
        let key = Self::key(&record.job_id);
        let mut hset = vec!["HSET".to_string(), key.clone()];
        hset.extend(encode_fields(record));

        let mut commands = Vec::with_capacity(3);
        if record.error.is_none() {
            // HSET never removes fields; a restarted job must not inherit the last run's error.
            commands.push(json!(["HDEL", key, "error"]));
        }
        commands.push(json!(hset));
        commands.push(json!(["EXPIRE", key, self.ttl_secs.to_string()]));
        let commands = Value::Array(commands);

        let reply = self.post(format!("{}/pipeline", self.base_url), commands, "set").await?;
        let replies: Vec<RestReply> = serde_json::from_value(reply)
            .map_err(|e| UnveiledError::store_error(BACKEND, "set", &e.to_string()))?;

        if let Some(error) = replies.into_iter().find_map(|r| r.error) {
            return Err(UnveiledError::store_error(BACKEND, "set", &error));
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        BACKEND
    }
}
