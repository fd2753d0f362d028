use std::sync::mpsc;
use std::time::Duration;

/// A unit of callback work handed to a [`CallbackExecutor`].
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Execution context that snapshot callbacks are delivered on.
///
/// The worker never waits for a job to finish; `execute` must only schedule it.
pub trait CallbackExecutor: Send + Sync {
    /// Schedule `job`.
    fn execute(&self, job: Job);
}

/// Runs callbacks directly on the drawing worker thread.
///
/// Callbacks must be quick: they delay every command queued behind them.
#[derive(Clone, Copy, Debug, Default)]
pub struct WorkerExecutor;

impl CallbackExecutor for WorkerExecutor {
    fn execute(&self, job: Job) {
        job();
    }
}

/// Sending half of [`callback_channel`]; forwards jobs to the thread that owns the pump.
#[derive(Clone, Debug)]
pub struct ChannelExecutor {
    tx: mpsc::Sender<Job>,
}

impl CallbackExecutor for ChannelExecutor {
    fn execute(&self, job: Job) {
        if self.tx.send(job).is_err() {
            tracing::debug!("callback pump dropped; discarding job");
        }
    }
}

/// Receiving half of [`callback_channel`], drained by the caller's own loop (e.g. a UI frame).
#[derive(Debug)]
pub struct CallbackPump {
    rx: mpsc::Receiver<Job>,
}

impl CallbackPump {
    /// Run every job that has already arrived. Never blocks.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            job();
            ran += 1;
        }
        ran
    }

    /// Wait up to `timeout` for one job and run it. Returns `false` on timeout.
    pub fn run_next(&self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(job) => {
                job();
                true
            }
            Err(_) => false,
        }
    }
}

/// Executor/pump pair delivering callbacks to whichever thread drains the pump.
pub fn callback_channel() -> (ChannelExecutor, CallbackPump) {
    let (tx, rx) = mpsc::channel();
    (ChannelExecutor { tx }, CallbackPump { rx })
}
