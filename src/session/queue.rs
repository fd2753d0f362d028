use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use crate::foundation::core::{Point, Rgba8, SurfaceSize};
use crate::render::bitmap::Bitmap;
use crate::session::executor::CallbackExecutor;
use crate::session::output::Output;

/// Handle returned by [`crate::SignatureModel::observe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub(crate) u64);

/// A one-shot snapshot request.
pub(crate) struct Delivery {
    pub(crate) executor: Arc<dyn CallbackExecutor>,
    pub(crate) callback: Box<dyn FnOnce(Output) + Send + 'static>,
}

impl Delivery {
    pub(crate) fn deliver(self, output: Output) {
        let callback = self.callback;
        self.executor.execute(Box::new(move || callback(output)));
    }
}

/// A registered change handler.
#[derive(Clone)]
pub(crate) struct Observer {
    pub(crate) executor: Arc<dyn CallbackExecutor>,
    pub(crate) handler: Arc<dyn Fn(Output) + Send + Sync + 'static>,
}

impl Observer {
    pub(crate) fn notify(&self, output: Output) {
        let handler = Arc::clone(&self.handler);
        self.executor.execute(Box::new(move || handler(output)));
    }
}

/// Work item for the drawing worker. Applied strictly in submission order.
pub(crate) enum Command {
    /// A run of consecutive samples for the open stroke.
    Points(Vec<Point>),
    EndStroke,
    Reset,
    SetSize(SurfaceSize),
    SetColor(Rgba8),
    Inject(Bitmap),
    Query(Delivery),
    Observe(ObserverId, Observer),
    Unobserve(ObserverId),
}

/// Discriminant-only view of a [`Command`], used for logging and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CommandKind {
    Points(usize),
    EndStroke,
    Reset,
    SetSize,
    SetColor,
    Inject,
    Query,
    Observe,
    Unobserve,
}

impl Command {
    pub(crate) fn kind(&self) -> CommandKind {
        match self {
            Self::Points(points) => CommandKind::Points(points.len()),
            Self::EndStroke => CommandKind::EndStroke,
            Self::Reset => CommandKind::Reset,
            Self::SetSize(_) => CommandKind::SetSize,
            Self::SetColor(_) => CommandKind::SetColor,
            Self::Inject(_) => CommandKind::Inject,
            Self::Query(_) => CommandKind::Query,
            Self::Observe(..) => CommandKind::Observe,
            Self::Unobserve(_) => CommandKind::Unobserve,
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind().fmt(f)
    }
}

#[derive(Default)]
struct QueueState {
    pending: VecDeque<Command>,
    closed: bool,
}

/// FIFO command queue between callers and the drawing worker.
///
/// Coalescing policy: a sample pushed while the newest pending command is a sample run is
/// appended to that run. Samples are never dropped, and any other command closes the run, so
/// stroke boundaries keep their position relative to the samples around them.
#[derive(Default)]
pub(crate) struct CommandQueue {
    state: Mutex<QueueState>,
    ready: Condvar,
}

impl CommandQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueue a command. Returns `false` once the queue is closed.
    pub(crate) fn push(&self, cmd: Command) -> bool {
        let mut state = self.lock();
        if state.closed {
            return false;
        }
        state.pending.push_back(cmd);
        drop(state);
        self.ready.notify_one();
        true
    }

    /// Enqueue one sample, merging it into a pending sample run when possible.
    pub(crate) fn push_point(&self, p: Point) -> bool {
        let mut state = self.lock();
        if state.closed {
            return false;
        }
        match state.pending.back_mut() {
            Some(Command::Points(run)) => run.push(p),
            _ => state.pending.push_back(Command::Points(vec![p])),
        }
        drop(state);
        self.ready.notify_one();
        true
    }

    /// Block until work is available and take all of it.
    ///
    /// Returns `None` once the queue is closed and fully drained.
    pub(crate) fn wait_batch(&self) -> Option<VecDeque<Command>> {
        let mut state = self.lock();
        loop {
            if !state.pending.is_empty() {
                return Some(std::mem::take(&mut state.pending));
            }
            if state.closed {
                return None;
            }
            state = self
                .ready
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Refuse further commands; already queued ones are still handed out.
    pub(crate) fn close(&self) {
        self.lock().closed = true;
        self.ready.notify_all();
    }

    #[cfg(test)]
    pub(crate) fn pending_kinds(&self) -> Vec<CommandKind> {
        self.lock().pending.iter().map(Command::kind).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/queue.rs"]
mod tests;
