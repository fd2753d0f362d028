use std::sync::{Arc, PoisonError, RwLock};

use crate::curve::fitter::{CurveFitter, PushOutcome};
use crate::foundation::config::ModelConfig;
use crate::foundation::core::{Point, Rgba8, SurfaceSize, is_finite_point};
use crate::render::bitmap::Bitmap;
use crate::render::compositor::StrokeCompositor;
use crate::session::output::{LiveCurve, Output};
use crate::session::queue::{Command, CommandQueue, Observer, ObserverId};

/// Drawing state owned exclusively by the worker thread.
pub(crate) struct DrawingState {
    size: Option<SurfaceSize>,
    color: Rgba8,
    live_span_limit: Option<usize>,
    stroke: Option<CurveFitter>,
    compositor: StrokeCompositor,
    live_cache: Option<LiveCurve>,
    revision: u64,
}

impl DrawingState {
    pub(crate) fn new(cfg: &ModelConfig) -> Self {
        let mut state = Self {
            size: None,
            color: cfg.color,
            live_span_limit: cfg.live_span_limit,
            stroke: None,
            compositor: StrokeCompositor::from_config(cfg),
            live_cache: None,
            revision: 0,
        };
        if let Some(size) = cfg.initial_size {
            state.set_size(size);
            state.revision = 0;
        }
        state
    }

    pub(crate) fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.live_cache = None;
    }

    /// Append samples to the open stroke, starting one if needed.
    ///
    /// Non-finite and off-surface samples are discarded individually; the stroke continues.
    pub(crate) fn extend(&mut self, points: &[Point]) {
        let Some(size) = self.size else {
            tracing::debug!(
                count = points.len(),
                "no surface size yet; discarding samples"
            );
            return;
        };

        let fitter = self.stroke.get_or_insert_with(CurveFitter::new);
        let mut accepted = 0usize;
        for &p in points {
            if !is_finite_point(p) {
                tracing::debug!("non-finite sample discarded");
                continue;
            }
            if !size.contains(p) {
                tracing::debug!(x = p.x, y = p.y, "sample outside surface discarded");
                continue;
            }
            if fitter.push(p) == PushOutcome::Accepted {
                accepted += 1;
            }
        }
        if accepted == 0 {
            return;
        }
        self.touch();
        self.flush_finalized();
    }

    /// Commit finalized spans once the open stroke has accumulated `live_span_limit` of them.
    fn flush_finalized(&mut self) {
        let (Some(limit), Some(fitter)) = (self.live_span_limit, self.stroke.as_mut()) else {
            return;
        };
        if fitter.finalized_len() < limit {
            return;
        }
        if let Some(spans) = fitter.take_finalized() {
            tracing::trace!(limit, "flushing finalized spans of the open stroke");
            if let Err(err) = self.compositor.commit_piece(&spans, self.color) {
                tracing::error!(%err, "failed to commit finalized spans");
            }
        }
    }

    /// Close the open stroke and rasterize what is left of it into the committed image.
    #[tracing::instrument(level = "debug", skip_all)]
    pub(crate) fn end_stroke(&mut self) {
        let Some(fitter) = self.stroke.take() else {
            return;
        };
        if let Some(path) = fitter.path()
            && let Err(err) = self.compositor.commit(&path, self.color)
        {
            tracing::error!(%err, "failed to commit stroke");
        }
        self.compositor.close_stroke();
        self.touch();
    }

    pub(crate) fn reset(&mut self) {
        self.stroke = None;
        self.compositor.reset();
        self.touch();
    }

    pub(crate) fn set_size(&mut self, size: SurfaceSize) {
        match self.compositor.resize(size) {
            Ok(()) => {
                self.size = Some(size);
                self.touch();
            }
            Err(err) => tracing::warn!(%err, "surface size rejected; keeping previous size"),
        }
    }

    pub(crate) fn set_color(&mut self, color: Rgba8) {
        if self.color != color {
            self.color = color;
            self.touch();
        }
    }

    pub(crate) fn inject(&mut self, image: Bitmap) {
        self.compositor.inject(image);
        self.touch();
    }

    /// Value snapshot of the current state. The live outline is built at most once per change.
    pub(crate) fn snapshot(&mut self) -> Output {
        if self.live_cache.is_none() {
            self.live_cache = self.build_live();
        }
        Output {
            committed: self.compositor.committed(),
            live: self.live_cache.clone(),
            surface: self.size,
            pixel_scale: self.compositor.pixel_scale(),
            revision: self.revision,
        }
    }

    fn build_live(&self) -> Option<LiveCurve> {
        let centerline = self.stroke.as_ref()?.path()?;
        let outline = self.compositor.outline(&centerline);
        Some(LiveCurve {
            centerline: Arc::new(centerline),
            outline: Arc::new(outline),
            color: self.color,
            stroke_width: self.compositor.stroke_width(),
        })
    }
}

/// Single consumer of the command queue.
pub(crate) struct Worker {
    queue: Arc<CommandQueue>,
    state: DrawingState,
    latest: Arc<RwLock<Output>>,
    observers: Vec<(ObserverId, Observer)>,
    published: u64,
}

impl Worker {
    pub(crate) fn new(
        queue: Arc<CommandQueue>,
        state: DrawingState,
        latest: Arc<RwLock<Output>>,
    ) -> Self {
        let published = state.revision();
        Self {
            queue,
            state,
            latest,
            observers: Vec::new(),
            published,
        }
    }

    /// Drain batches until the queue is closed.
    pub(crate) fn run(mut self) {
        tracing::debug!("signature worker started");
        while let Some(batch) = self.queue.wait_batch() {
            tracing::trace!(commands = batch.len(), "draining batch");
            for cmd in batch {
                self.apply(cmd);
            }
            self.publish();
        }
        tracing::debug!("signature worker stopped");
    }

    fn apply(&mut self, cmd: Command) {
        match cmd {
            Command::Points(points) => self.state.extend(&points),
            Command::EndStroke => self.state.end_stroke(),
            Command::Reset => self.state.reset(),
            Command::SetSize(size) => self.state.set_size(size),
            Command::SetColor(color) => self.state.set_color(color),
            Command::Inject(image) => self.state.inject(image),
            Command::Query(delivery) => delivery.deliver(self.state.snapshot()),
            Command::Observe(id, observer) => self.observers.push((id, observer)),
            Command::Unobserve(id) => self.observers.retain(|(oid, _)| *oid != id),
        }
    }

    /// Refresh the shared latest snapshot and notify observers, once per changed batch.
    fn publish(&mut self) {
        if self.state.revision() == self.published {
            return;
        }
        let output = self.state.snapshot();
        self.published = output.revision;
        *self.latest.write().unwrap_or_else(PoisonError::into_inner) = output.clone();
        for (_, observer) in &self.observers {
            observer.notify(output.clone());
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/worker.rs"]
mod tests;
