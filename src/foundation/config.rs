use std::time::Duration;

use crate::foundation::core::{Rgba8, SurfaceSize};
use crate::foundation::error::{SigpadError, SigpadResult};

/// Options controlling a [`crate::SignatureModel`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Stroke width in logical surface units.
    pub stroke_width: f64,
    /// Backing pixels per logical unit.
    pub pixel_scale: f64,
    /// Initial signature color.
    pub color: Rgba8,
    /// Commit finalized spans of an open stroke once this many have accumulated.
    /// `None` keeps the whole stroke live until it ends.
    pub live_span_limit: Option<usize>,
    /// Flattening tolerance used when outlining strokes.
    pub curve_tolerance: f64,
    /// Upper bound for the blocking snapshot helpers.
    pub snapshot_timeout_ms: u64,
    /// Surface size applied before any caller command.
    pub initial_size: Option<SurfaceSize>,
    /// Name given to the background worker thread.
    pub worker_name: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            stroke_width: 2.5,
            pixel_scale: 1.0,
            color: Rgba8::BLACK,
            live_span_limit: Some(64),
            curve_tolerance: 0.1,
            snapshot_timeout_ms: 5_000,
            initial_size: None,
            worker_name: "sigpad-worker".to_string(),
        }
    }
}

impl ModelConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> SigpadResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| SigpadError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply `SIGPAD_*` environment overrides. Unparseable or out-of-range values are ignored.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `SIGPAD_*` overrides read through `lookup`.
    ///
    /// `SIGPAD_LIVE_SPAN_LIMIT=0` disables periodic flushing.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let number = |key: &str| {
            lookup(key)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v > 0.0)
        };
        if let Some(w) = number("SIGPAD_STROKE_WIDTH") {
            self.stroke_width = w;
        }
        if let Some(s) = number("SIGPAD_PIXEL_SCALE") {
            self.pixel_scale = s;
        }
        if let Some(n) = lookup("SIGPAD_LIVE_SPAN_LIMIT").and_then(|v| v.trim().parse::<usize>().ok())
        {
            self.live_span_limit = (n > 0).then_some(n);
        }
        self
    }

    /// Check that every numeric option is usable.
    pub fn validate(&self) -> SigpadResult<()> {
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(SigpadError::validation("stroke_width must be finite and > 0"));
        }
        if !self.pixel_scale.is_finite() || self.pixel_scale <= 0.0 {
            return Err(SigpadError::validation("pixel_scale must be finite and > 0"));
        }
        if !self.curve_tolerance.is_finite() || self.curve_tolerance <= 0.0 {
            return Err(SigpadError::validation(
                "curve_tolerance must be finite and > 0",
            ));
        }
        if self.live_span_limit == Some(0) {
            return Err(SigpadError::validation(
                "live_span_limit must be >= 1 (use null to disable)",
            ));
        }
        if let Some(size) = self.initial_size {
            size.pixel_dims(self.pixel_scale)?;
        }
        Ok(())
    }

    /// [`Self::snapshot_timeout_ms`] as a [`Duration`].
    pub fn snapshot_timeout(&self) -> Duration {
        Duration::from_millis(self.snapshot_timeout_ms)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
