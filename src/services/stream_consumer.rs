use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use futures::{Stream, StreamExt};
use reqwest::Client;
use serde_json::Value;
use tokio::sync::{oneshot, watch};
use tokio::time::Instant;
use crate::config::constants::RESULT_STORAGE_KEY;
use crate::enums::consumer_error::ConsumerError;
use crate::enums::consumer_state::ConsumerState;
use crate::enums::stream_signal::StreamSignal;
use crate::helpers::line_buffer::{parse_data_line, LineBuffer};
use crate::structs::analyze_request::AnalyzeRequest;
use crate::structs::consumer_view::ConsumerView;
use crate::structs::stored_result::StoredResult;
use crate::traits::navigator::Navigator;
use crate::traits::result_sink::ResultSink;

/// One-shot guard: the first `fire` runs its action, every later call is a no-op.
#[derive(Debug, Default)]
pub struct RedirectLatch {
    fired: AtomicBool,
}

impl RedirectLatch {
    pub fn fire<F: FnOnce()>(&self, action: F) -> bool {
        if self.fired.swap(true, Ordering::SeqCst) {
            return false;
        }
        action();
        true
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }
}

pub fn results_path(username: &str) -> String {
    format!("/analyze/profile/{}/results", username)
}

/// Reads an analysis event stream and turns it into view state.
///
/// `Idle -> Streaming -> Complete | Errored`; both end states are absorbing.
/// A run counts as finished when an event carries a `result`, reports progress 100,
/// or its step text mentions "complete". A delivered result is persisted before the
/// redirect; the redirect fires at most once and never after an error.
pub struct StreamConsumer {
    username: String,
    state: ConsumerState,
    view: watch::Sender<ConsumerView>,
    result: Option<Value>,
    failure: Option<ConsumerError>,
    sink: Arc<dyn ResultSink>,
    navigator: Arc<dyn Navigator>,
    latch: RedirectLatch,
    timeout: Duration,
    deadline: Option<Instant>,
}

impl StreamConsumer {
    pub fn new(username: &str, sink: Arc<dyn ResultSink>, navigator: Arc<dyn Navigator>, timeout: Duration) -> Self {
        let (view, _) = watch::channel(ConsumerView::default());
        Self {
            username: username.trim().to_string(),
            state: ConsumerState::Idle,
            view,
            result: None,
            failure: None,
            sink,
            navigator,
            latch: RedirectLatch::default(),
            timeout,
            deadline: None,
        }
    }

    pub fn state(&self) -> ConsumerState {
        self.state
    }

    pub fn view(&self) -> ConsumerView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConsumerView> {
        self.view.subscribe()
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    pub fn redirected(&self) -> bool {
        self.latch.has_fired()
    }

    /// Posts the request and consumes the response. The deadline covers the request as well.
    pub async fn start(
        &mut self,
        client: &Client,
        server_url: &str,
        request: &AnalyzeRequest,
        cancel: Option<oneshot::Receiver<()>>,
    ) -> Result<ConsumerView, ConsumerError> {
        self.begin();
        let url = format!("{}/api/analyze/profile", server_url.trim_end_matches('/'));
        let deadline = self.deadline();

        let sent = tokio::time::timeout_at(deadline, client.post(&url).json(request).send()).await;
        let response = match sent {
            Err(_) => return self.fail(ConsumerError::Timeout(self.timeout)),
            Ok(Err(e)) => return self.fail(ConsumerError::Network(e.to_string())),
            Ok(Ok(response)) => response,
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return self.fail(ConsumerError::Status { status: status.as_u16(), body });
        }

        self.consume(Box::pin(response.bytes_stream()), cancel).await
    }

    /// Consumes an already-open byte stream. Resolving or dropping the `cancel` sender aborts.
    pub async fn consume<S, B, E>(
        &mut self,
        mut stream: S,
        mut cancel: Option<oneshot::Receiver<()>>,
    ) -> Result<ConsumerView, ConsumerError>
    where
        S: Stream<Item = Result<B, E>> + Unpin,
        B: AsRef<[u8]>,
        E: Display,
    {
        self.begin();
        if self.state.is_terminal() {
            return self.finished();
        }

        let mut timer = Box::pin(tokio::time::sleep_until(self.deadline()));
        let mut buffer = LineBuffer::new();

        let outcome = loop {
            tokio::select! {
                () = &mut timer => break Err(ConsumerError::Timeout(self.timeout)),
                () = cancelled(&mut cancel) => break Err(ConsumerError::Cancelled),
                chunk = stream.next() => match chunk {
                    Some(Ok(bytes)) => {
                        for line in buffer.push(bytes.as_ref()) {
                            self.handle_line(&line);
                        }
                        if self.state.is_terminal() {
                            break Ok(());
                        }
                    }
                    Some(Err(e)) => break Err(ConsumerError::Network(e.to_string())),
                    None => {
                        if let Some(line) = buffer.finish() {
                            self.handle_line(&line);
                        }
                        break if self.state.is_terminal() { Ok(()) } else { Err(ConsumerError::Incomplete) };
                    }
                }
            }
        };

        drop(stream);
        drop(timer);
        log::debug!("Released analysis stream for '{}'", self.username);

        match outcome {
            Ok(()) => self.finished(),
            Err(e) => self.fail(e),
        }
    }

    fn begin(&mut self) {
        if self.state == ConsumerState::Idle {
            self.state = ConsumerState::Streaming;
            self.deadline = Some(Instant::now() + self.timeout);
        }
    }

    fn deadline(&mut self) -> Instant {
        let timeout = self.timeout;
        *self.deadline.get_or_insert_with(|| Instant::now() + timeout)
    }

    fn finished(&self) -> Result<ConsumerView, ConsumerError> {
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(self.view()),
        }
    }

    fn handle_line(&mut self, line: &str) {
        match parse_data_line(line) {
            None => {}
            Some(Ok(event)) => self.apply(StreamSignal::from(event)),
            Some(Err(e)) => log::warn!("⚠️ Skipping malformed stream line ({}): {}", e, line),
        }
    }

    pub fn apply(&mut self, signal: StreamSignal) {
        if self.state.is_terminal() {
            return;
        }
        self.state = ConsumerState::Streaming;

        match signal {
            StreamSignal::Progress { step, progress } => {
                let terminal = progress == Some(100)
                    || step.as_deref().is_some_and(|s| s.to_lowercase().contains("complete"));
                self.update_view(step, progress);
                if terminal {
                    self.complete();
                }
            }
            StreamSignal::Result { step, progress, data } => {
                self.update_view(step, progress.or(Some(100)));
                let stored = StoredResult::success(data.clone());
                self.result = Some(data);
                if let Err(e) = self.sink.persist(&self.username, RESULT_STORAGE_KEY, &stored) {
                    let _ = self.fail(ConsumerError::Persist(e.short_message()));
                    return;
                }
                self.complete();
            }
            StreamSignal::Failure { message } => {
                let _ = self.fail(ConsumerError::Remote(message));
            }
        }
    }

    fn update_view(&mut self, step: Option<String>, progress: Option<u8>) {
        self.view.send_modify(|view| {
            if let Some(step) = step {
                view.status = step;
            }
            if let Some(progress) = progress {
                view.progress = progress.min(100);
            }
        });
    }

    fn complete(&mut self) {
        self.state = ConsumerState::Complete;
        self.view.send_modify(|view| {
            view.progress = 100;
            view.complete = true;
        });

        let path = results_path(&self.username);
        let navigator = Arc::clone(&self.navigator);
        self.latch.fire(|| navigator.navigate(&path));
    }

    fn fail(&mut self, error: ConsumerError) -> Result<ConsumerView, ConsumerError> {
        if self.state != ConsumerState::Errored {
            log::error!("❌ Analysis stream for '{}' failed: {}", self.username, error);
            self.state = ConsumerState::Errored;
            self.failure = Some(error.clone());
            let message = error.to_string();
            self.view.send_modify(|view| {
                view.error = Some(message);
                view.complete = true;
            });
        }
        Err(error)
    }
}

async fn cancelled(cancel: &mut Option<oneshot::Receiver<()>>) {
    match cancel {
        Some(rx) => {
            let _ = rx.await;
        }
        None => futures::future::pending::<()>().await,
    }
}
