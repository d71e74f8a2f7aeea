use serde_json::Value;
use crate::structs::stream_event::StreamEvent;

/// A decoded stream event. `error` wins over `result`, which wins over plain progress.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamSignal {
    Progress {
        step: Option<String>,
        progress: Option<u8>,
    },
    Result {
        step: Option<String>,
        progress: Option<u8>,
        data: Value,
    },
    Failure {
        message: String,
    },
}

impl From<StreamEvent> for StreamSignal {
    fn from(event: StreamEvent) -> Self {
        match event {
            StreamEvent { error: Some(message), .. } => StreamSignal::Failure { message },
            StreamEvent { result: Some(data), step, progress, .. } => StreamSignal::Result { step, progress, data },
            StreamEvent { step, progress, .. } => StreamSignal::Progress { step, progress },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_takes_precedence_over_result() {
        let event = StreamEvent {
            result: Some(json!({"x": 1})),
            error: Some("boom".to_string()),
            ..StreamEvent::default()
        };
        assert_eq!(StreamSignal::from(event), StreamSignal::Failure { message: "boom".to_string() });
    }

    #[test]
    fn plain_step_is_progress() {
        let signal = StreamSignal::from(StreamEvent::step("Fetching portfolio...", 25));
        assert_eq!(
            signal,
            StreamSignal::Progress { step: Some("Fetching portfolio...".to_string()), progress: Some(25) }
        );
    }
}
