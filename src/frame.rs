/// Elapsed-time gate that caps how often the animation callback draws.
///
/// The host fires the callback once per display refresh; frames arriving
/// sooner than the minimum interval after the last drawn frame are skipped.
#[derive(Debug, Clone)]
pub struct FrameGate {
    min_interval_ms: f64,
    last_ms: Option<f64>,
}

impl FrameGate {
    /// `max_fps` must be positive; [`RenderConfig::validate`] checks it.
    ///
    /// [`RenderConfig::validate`]: crate::config::RenderConfig::validate
    pub fn with_max_fps(max_fps: f64) -> Self {
        Self {
            min_interval_ms: 1000.0 / max_fps,
            last_ms: None,
        }
    }

    /// Returns whether a frame should be drawn at `now_ms`, and if so records
    /// it as the last drawn frame. The first call always admits.
    pub fn admit(&mut self, now_ms: f64) -> bool {
        match self.last_ms {
            Some(last) if now_ms - last < self.min_interval_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }
}
