//! Viewport intersection observer
//!
//! Tracks whether a single target crosses the configured visibility threshold
//! of a viewport. The host feeds it fresh geometry after every scroll or
//! resize; an [`IntersectionEntry`] comes back once right after
//! [`IntersectionObserver::observe`] and afterwards only when the
//! intersecting state flips.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Default fraction of the target that must be visible
pub const DEFAULT_THRESHOLD: f32 = 0.1;

/// Observer configuration
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObserverOptions {
    /// Fraction of the target area (0.0-1.0) that must be inside the viewport
    pub threshold: f32,
    /// Pixels added to every side of the viewport before measuring
    /// (negative values shrink it)
    pub root_margin: f32,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            root_margin: 0.0,
        }
    }
}

impl ObserverOptions {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            ..Default::default()
        }
    }

    pub fn with_root_margin(mut self, margin: f32) -> Self {
        self.root_margin = margin;
        self
    }

    /// Threshold clamped to 0.0-1.0, falling back to the default when not finite
    pub fn effective_threshold(&self) -> f32 {
        if self.threshold.is_finite() {
            self.threshold.clamp(0.0, 1.0)
        } else {
            DEFAULT_THRESHOLD
        }
    }

    fn effective_margin(&self) -> f32 {
        if self.root_margin.is_finite() {
            self.root_margin
        } else {
            0.0
        }
    }
}

/// A reported change in a target's intersection with the viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    /// Target bounds the entry was computed from
    pub target: Rect,
    /// Visible fraction of the target
    pub ratio: f32,
    /// Whether the ratio satisfies the threshold
    pub is_intersecting: bool,
}

/// Observer for a single target
#[derive(Clone, Debug)]
pub struct IntersectionObserver {
    options: ObserverOptions,
    connected: bool,
    last: Option<bool>,
}

impl IntersectionObserver {
    /// Create a disconnected observer
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            connected: false,
            last: None,
        }
    }

    pub fn options(&self) -> ObserverOptions {
        self.options
    }

    /// Start (or restart) observing
    ///
    /// The next [`update`](Self::update) always reports an entry.
    pub fn observe(&mut self) {
        self.connected = true;
        self.last = None;
        tracing::trace!(threshold = self.options.threshold, "observer connected");
    }

    /// Stop observing; updates are ignored until [`observe`](Self::observe)
    pub fn disconnect(&mut self) {
        if self.connected {
            tracing::trace!("observer disconnected");
        }
        self.connected = false;
        self.last = None;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Replace the options and restart observation
    pub fn reconfigure(&mut self, options: ObserverOptions) {
        self.options = options;
        if self.connected {
            self.observe();
        }
    }

    /// Measure `target` against `viewport`
    ///
    /// Returns an entry when the observer is connected and either nothing has
    /// been reported since the last `observe()` or the intersecting state
    /// changed.
    pub fn update(&mut self, target: Rect, viewport: Rect) -> Option<IntersectionEntry> {
        if !self.connected {
            return None;
        }

        let root = viewport.outset(self.options.effective_margin());
        let ratio = target.visible_fraction(&root);
        let is_intersecting = ratio > 0.0 && ratio >= self.options.effective_threshold();

        if self.last == Some(is_intersecting) {
            return None;
        }
        self.last = Some(is_intersecting);

        Some(IntersectionEntry {
            target,
            ratio,
            is_intersecting,
        })
    }
}

impl Default for IntersectionObserver {
    fn default() -> Self {
        Self::new(ObserverOptions::default())
    }
}
