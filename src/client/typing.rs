use std::sync::Arc;
use std::time::Duration;
use tokio::{sync::watch, task::JoinHandle};

/// Delay between revealed characters.
pub const CHAR_INTERVAL: Duration = Duration::from_millis(8);

/// One published state of the narrative.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    /// Animation run that produced this frame.
    pub run: u64,
    pub text: String,
    pub done: bool,
}

/// Owns the single typing-animation task. Starting a new run aborts the
/// previous one through its stored handle; frames from an older run are never
/// published after a newer run has begun.
pub struct Typewriter {
    tx: Arc<watch::Sender<Frame>>,
    handle: Option<JoinHandle<()>>,
    run: u64,
    interval: Duration,
}

impl Default for Typewriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Typewriter {
    pub fn new() -> Self {
        Self::with_interval(CHAR_INTERVAL)
    }

    pub fn with_interval(interval: Duration) -> Self {
        let (tx, _rx) = watch::channel(Frame { done: true, ..Frame::default() });
        Self { tx: Arc::new(tx), handle: None, run: 0, interval }
    }

    pub fn subscribe(&self) -> watch::Receiver<Frame> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Frame {
        self.tx.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Reveals `text` one character per interval. Must be called inside a
    /// tokio runtime.
    pub fn start(&mut self, text: String) {
        let run = self.next_run(String::new(), text.is_empty());
        if text.is_empty() {
            return;
        }

        let tx = Arc::clone(&self.tx);
        let interval = self.interval;
        self.handle = Some(tokio::spawn(async move {
            let ends: Vec<usize> = text.char_indices().map(|(i, c)| i + c.len_utf8()).collect();
            for end in ends {
                tokio::time::sleep(interval).await;
                let published = tx.send_if_modified(|frame| {
                    if frame.run != run {
                        return false;
                    }
                    frame.text = text[..end].to_string();
                    frame.done = end == text.len();
                    true
                });
                if !published {
                    break;
                }
            }
        }));
    }

    /// Shows `text` at once, cancelling any running animation.
    pub fn show(&mut self, text: String) {
        self.next_run(text, true);
    }

    /// Cancels any running animation and blanks the narrative.
    pub fn clear(&mut self) {
        self.next_run(String::new(), true);
    }

    fn next_run(&mut self, text: String, done: bool) -> u64 {
        self.cancel();
        self.run += 1;
        self.tx.send_replace(Frame { run: self.run, text, done });
        self.run
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Typewriter {
    fn drop(&mut self) {
        self.cancel();
    }
}
