use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread::JoinHandle;

use crate::foundation::config::ModelConfig;
use crate::foundation::core::{Point, Rgba8, SurfaceSize};
use crate::foundation::error::{SigpadError, SigpadResult};
use crate::render::bitmap::Bitmap;
use crate::session::executor::{CallbackExecutor, WorkerExecutor};
use crate::session::output::Output;
use crate::session::queue::{Command, CommandQueue, Delivery, Observer, ObserverId};
use crate::session::worker::{DrawingState, Worker};

/// Signature drawing model.
///
/// Every mutation is enqueued and applied in submission order by one background worker; no call
/// blocks on that worker except the explicit [`Self::wait_for_output`] / [`Self::full_image`]
/// helpers. Every method takes `&self`, so the model can be shared across threads in an [`Arc`].
/// Dropping the model drains the queue and joins the worker.
pub struct SignatureModel {
    config: ModelConfig,
    size: Mutex<Option<SurfaceSize>>,
    color: Mutex<Rgba8>,
    queue: Arc<CommandQueue>,
    latest: Arc<RwLock<Output>>,
    next_observer: AtomicU64,
    worker: Option<JoinHandle<()>>,
}

impl SignatureModel {
    /// Validate `config` and start the worker thread.
    pub fn new(config: ModelConfig) -> SigpadResult<Self> {
        config.validate()?;

        let mut state = DrawingState::new(&config);
        let queue = Arc::new(CommandQueue::new());
        let latest = Arc::new(RwLock::new(state.snapshot()));
        let worker = Worker::new(Arc::clone(&queue), state, Arc::clone(&latest));

        let handle = std::thread::Builder::new()
            .name(config.worker_name.clone())
            .spawn(move || worker.run())
            .map_err(|e| SigpadError::worker(format!("failed to spawn drawing worker: {e}")))?;

        tracing::debug!(worker = %config.worker_name, "signature model started");
        Ok(Self {
            size: Mutex::new(config.initial_size),
            color: Mutex::new(config.color),
            config,
            queue,
            latest,
            next_observer: AtomicU64::new(1),
            worker: Some(handle),
        })
    }

    fn submit(&self, cmd: Command) {
        if !self.queue.push(cmd) {
            tracing::warn!("drawing worker is shut down; command dropped");
        }
    }

    /// Extend the open stroke with `p`, starting a new stroke if none is open.
    pub fn extend_stroke(&self, p: Point) {
        if !self.queue.push_point(p) {
            tracing::warn!("drawing worker is shut down; sample dropped");
        }
    }

    /// Close the open stroke; its geometry moves into the committed image.
    pub fn end_stroke(&self) {
        self.submit(Command::EndStroke);
    }

    /// Set the drawing surface size.
    ///
    /// Sizes whose backing pixel dimensions exceed the rasterizer limit are rejected here and the
    /// previous size stays in effect.
    pub fn set_surface_size(&self, size: SurfaceSize) -> SigpadResult<()> {
        size.pixel_dims(self.config.pixel_scale)?;
        // Held across the push so the recorded size matches the last queued one.
        let mut current = self.size.lock().unwrap_or_else(PoisonError::into_inner);
        *current = Some(size);
        self.submit(Command::SetSize(size));
        Ok(())
    }

    /// Color for strokes committed from now on. Also recolors the live stroke.
    pub fn set_color(&self, color: Rgba8) {
        let mut current = self.color.lock().unwrap_or_else(PoisonError::into_inner);
        *current = color;
        self.submit(Command::SetColor(color));
    }

    /// Clear the committed image and any open stroke.
    pub fn reset(&self) {
        self.submit(Command::Reset);
    }

    /// Replace the committed image with a previously saved signature.
    pub fn preload_image(&self, image: Bitmap) {
        self.submit(Command::Inject(image));
    }

    /// Deliver one snapshot, reflecting every command submitted before this call, to `callback`
    /// via `executor`.
    pub fn request_output<F>(&self, executor: Arc<dyn CallbackExecutor>, callback: F)
    where
        F: FnOnce(Output) + Send + 'static,
    {
        self.submit(Command::Query(Delivery {
            executor,
            callback: Box::new(callback),
        }));
    }

    /// Register `handler` to receive a snapshot after every batch of commands that changed state.
    pub fn observe<F>(&self, executor: Arc<dyn CallbackExecutor>, handler: F) -> ObserverId
    where
        F: Fn(Output) + Send + Sync + 'static,
    {
        let id = ObserverId(self.next_observer.fetch_add(1, Ordering::Relaxed));
        self.submit(Command::Observe(
            id,
            Observer {
                executor,
                handler: Arc::new(handler),
            },
        ));
        id
    }

    /// Stop notifying `id`. Notifications already scheduled may still run.
    pub fn unobserve(&self, id: ObserverId) {
        self.submit(Command::Unobserve(id));
    }

    /// Latest published snapshot. May lag behind commands still in the queue.
    pub fn current_output(&self) -> Output {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// [`Output::full_image`] of [`Self::current_output`]; `None` means "no signature".
    pub fn current_full_image(&self) -> Option<Bitmap> {
        self.current_output().full_image()
    }

    /// Block until the worker has applied everything queued so far and return that snapshot.
    pub fn wait_for_output(&self) -> SigpadResult<Output> {
        let (tx, rx) = mpsc::sync_channel(1);
        self.request_output(Arc::new(WorkerExecutor), move |out| {
            let _ = tx.send(out);
        });
        rx.recv_timeout(self.config.snapshot_timeout())
            .map_err(|e| match e {
                mpsc::RecvTimeoutError::Timeout => SigpadError::worker(format!(
                    "no snapshot within {} ms",
                    self.config.snapshot_timeout_ms
                )),
                mpsc::RecvTimeoutError::Disconnected => {
                    SigpadError::worker("drawing worker is not accepting queries")
                }
            })
    }

    /// Blocking variant of [`Self::current_full_image`] that first waits for queued commands.
    pub fn full_image(&self) -> SigpadResult<Option<Bitmap>> {
        Ok(self.wait_for_output()?.full_image())
    }

    /// Current stroke color as last set on this model.
    pub fn color(&self) -> Rgba8 {
        *self.color.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Surface size as last accepted by this model.
    pub fn surface_size(&self) -> Option<SurfaceSize> {
        *self.size.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Configuration the model was built with.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }
}

impl Drop for SignatureModel {
    fn drop(&mut self) {
        self.queue.close();
        if let Some(handle) = self.worker.take()
            && handle.join().is_err()
        {
            tracing::error!("drawing worker panicked");
        }
    }
}

impl std::fmt::Debug for SignatureModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureModel")
            .field("size", &self.surface_size())
            .field("color", &self.color())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
