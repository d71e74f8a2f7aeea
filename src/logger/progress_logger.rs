use std::io::Write;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use crate::structs::consumer_view::ConsumerView;

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Spinner on stderr that follows a consumer's view: current step and percentage.
pub struct ProgressLogger {
    stop_sender: Option<mpsc::UnboundedSender<()>>,
    task_handle: Option<JoinHandle<()>>,
}

impl ProgressLogger {
    pub fn new() -> Self {
        Self {
            stop_sender: None,
            task_handle: None,
        }
    }

    pub fn start(&mut self, mut view: watch::Receiver<ConsumerView>) {
        let (stop_tx, mut stop_rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(async move {
            let mut frame = 0;
            let mut interval = tokio::time::interval(tokio::time::Duration::from_millis(150));
            let mut line = render(&view.borrow_and_update());

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        eprint!("\r\x1b[K{} {} ", line, FRAMES[frame]);
                        let _ = std::io::stderr().flush();
                        frame = (frame + 1) % FRAMES.len();
                    }
                    changed = view.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        line = render(&view.borrow_and_update());
                    }
                    _ = stop_rx.recv() => {
                        break;
                    }
                }
            }
        });

        self.stop_sender = Some(stop_tx);
        self.task_handle = Some(handle);
    }

    pub async fn stop(&mut self, final_message: &str) {
        self.halt().await;
        eprint!("\r\x1b[K✅  {}\n", final_message);
        let _ = std::io::stderr().flush();
    }

    pub async fn error(&mut self, error_message: &str) {
        self.halt().await;
        eprint!("\r\x1b[K❌ {}\n", error_message);
        let _ = std::io::stderr().flush();
    }

    async fn halt(&mut self) {
        if let Some(sender) = self.stop_sender.take() {
            let _ = sender.send(());
        }
        if let Some(handle) = self.task_handle.take() {
            let _ = handle.await;
        }
    }
}

impl Default for ProgressLogger {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn render(view: &ConsumerView) -> String {
    format!("{} [{:>3}%]", view.status, view.progress)
}
