//! Host-facing component interface

use unveil_animation::VisibilityState;
use unveil_core::{Millis, Rect, RenderNode};

/// A scroll-triggered component driven by a host
///
/// The host owns the clock and the layout. It mounts the component, feeds it
/// container geometry whenever the page scrolls or resizes, advances it to
/// the current time, and renders it.
pub trait Reveal {
    /// Register the viewport observer and sync the component clock to `now`
    fn mount(&mut self, now: Millis);

    /// Deregister the observer and cancel every pending timer
    fn unmount(&mut self);

    /// Container bounds and viewport, both in viewport coordinates
    fn layout(&mut self, target: Rect, viewport: Rect);

    /// Fire every timer due at or before `now`
    fn advance_to(&mut self, now: Millis);

    fn render(&self) -> RenderNode;

    fn visibility(&self) -> VisibilityState;

    /// Timers still scheduled, including pending visibility flips
    fn pending_timers(&self) -> usize;
}
