//! Viewport visibility trigger
//!
//! The pattern shared by every reveal component: observe the container,
//! flip `visible` a fixed delay after each intersection change, and
//! optionally lock into a settled state once an only-once animation has
//! played.
//!
//! ```text
//! Unobserved --mount--> Watching(visible=false)
//!     Watching --intersect (after delay)--> Watching(visible=true/false)
//!     Watching(visible=true) --lock() with only_once--> Watching(locked)
//! ```
//!
//! Locked is sticky. The observer keeps reporting and flips keep landing,
//! but components render the settled state regardless.
//!
//! Delayed flips are not debounced. Scrolling in and out quickly queues one
//! flip per change and the last one to fire wins.

use unveil_core::{IntersectionEntry, IntersectionObserver, Millis, ObserverOptions, Rect};

use crate::timer::{TimerGroup, TimerId, TimerQueue};

/// Default delay between an intersection change and the visibility flip
pub const DEFAULT_TRIGGER_DELAY: Millis = 100;

/// Trigger configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerOptions {
    /// Fraction of the container that must be visible
    pub threshold: f32,
    /// Viewport margin in pixels
    pub root_margin: f32,
    /// Delay before an intersection change becomes a visibility flip
    pub delay: Millis,
    /// Allow locking into the settled state
    pub only_once: bool,
}

impl Default for TriggerOptions {
    fn default() -> Self {
        Self {
            threshold: unveil_core::DEFAULT_THRESHOLD,
            root_margin: 0.0,
            delay: DEFAULT_TRIGGER_DELAY,
            only_once: false,
        }
    }
}

impl TriggerOptions {
    fn observer_options(&self) -> ObserverOptions {
        ObserverOptions::new(self.threshold).with_root_margin(self.root_margin)
    }
}

/// Per-instance visibility state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisibilityState {
    pub visible: bool,
    /// Set once an only-once animation has completed
    pub locked: bool,
}

/// Timer message carrying a delayed visibility flip
///
/// Component message types implement `From<VisibilityFlip>` so the trigger
/// can schedule flips on the component's own queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibilityFlip {
    pub visible: bool,
}

/// Outcome of applying a flip
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisibilityChange {
    /// Became visible
    Shown,
    /// Became hidden
    Hidden,
    /// Flip matched the current state
    Unchanged,
    /// The trigger is locked; the flip has no rendering effect
    Locked,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Unobserved,
    Watching,
}

/// Shared visibility state machine
#[derive(Clone, Debug)]
pub struct VisibilityTrigger {
    options: TriggerOptions,
    observer: IntersectionObserver,
    state: VisibilityState,
    phase: Phase,
    /// Delayed flips not yet delivered
    pending: TimerGroup,
}

impl VisibilityTrigger {
    pub fn new(options: TriggerOptions) -> Self {
        Self {
            observer: IntersectionObserver::new(options.observer_options()),
            options,
            state: VisibilityState::default(),
            phase: Phase::Unobserved,
            pending: TimerGroup::new(),
        }
    }

    pub fn options(&self) -> TriggerOptions {
        self.options
    }

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    pub fn is_locked(&self) -> bool {
        self.state.locked
    }

    pub fn is_mounted(&self) -> bool {
        self.phase == Phase::Watching
    }

    /// Number of flips scheduled but not yet delivered
    pub fn pending_flips(&self) -> usize {
        self.pending.len()
    }

    /// Register the observer
    pub fn mount(&mut self) {
        if self.phase == Phase::Watching {
            return;
        }
        self.observer.observe();
        self.phase = Phase::Watching;
        tracing::debug!(
            threshold = self.options.threshold,
            delay = self.options.delay,
            "visibility trigger mounted"
        );
    }

    /// Deregister the observer and drop undelivered flips
    ///
    /// Visibility resets to hidden; a lock survives.
    pub fn unmount<M: Clone>(&mut self, queue: &mut TimerQueue<M>) {
        if self.phase == Phase::Unobserved {
            return;
        }
        self.observer.disconnect();
        let dropped = self.pending.cancel_all(queue);
        self.phase = Phase::Unobserved;
        self.state.visible = false;
        tracing::debug!(dropped, "visibility trigger unmounted");
    }

    /// Feed fresh container geometry
    ///
    /// When the observer reports a change, a flip is scheduled `delay` ms
    /// later on `queue` and the entry is returned.
    pub fn observe<M>(
        &mut self,
        queue: &mut TimerQueue<M>,
        target: Rect,
        viewport: Rect,
    ) -> Option<IntersectionEntry>
    where
        M: Clone + From<VisibilityFlip>,
    {
        if self.phase != Phase::Watching {
            return None;
        }

        let entry = self.observer.update(target, viewport)?;
        let flip = VisibilityFlip {
            visible: entry.is_intersecting,
        };
        self.pending
            .track(queue.set_timeout(self.options.delay, M::from(flip)));

        tracing::trace!(
            ratio = entry.ratio,
            intersecting = entry.is_intersecting,
            "intersection changed"
        );
        Some(entry)
    }

    /// Deliver a flip that fired on the component's queue
    pub fn apply(&mut self, id: TimerId, flip: VisibilityFlip) -> VisibilityChange {
        self.pending.release(id);

        let was_visible = self.state.visible;
        self.state.visible = flip.visible;

        if self.state.locked {
            return VisibilityChange::Locked;
        }

        match (was_visible, flip.visible) {
            (false, true) => {
                tracing::debug!("became visible");
                VisibilityChange::Shown
            }
            (true, false) => {
                tracing::debug!("became hidden");
                VisibilityChange::Hidden
            }
            _ => VisibilityChange::Unchanged,
        }
    }

    /// Enter the settled state
    ///
    /// Only possible with `only_once` while visible. Returns whether the lock
    /// was newly taken.
    pub fn lock(&mut self) -> bool {
        if !self.options.only_once || self.state.locked || !self.state.visible {
            return false;
        }
        self.state.locked = true;
        tracing::debug!("visibility locked");
        true
    }

    /// Replace the options, keeping the current visibility
    ///
    /// A changed threshold, margin, or delay re-registers the observer so the
    /// current intersection is reported again under the new settings.
    pub fn set_options(&mut self, options: TriggerOptions) {
        let reobserve = options.threshold != self.options.threshold
            || options.root_margin != self.options.root_margin
            || options.delay != self.options.delay;

        self.options = options;
        if reobserve {
            self.observer.reconfigure(options.observer_options());
        }
    }
}

impl Default for VisibilityTrigger {
    fn default() -> Self {
        Self::new(TriggerOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    enum Msg {
        Flip(VisibilityFlip),
    }

    impl From<VisibilityFlip> for Msg {
        fn from(flip: VisibilityFlip) -> Self {
            Msg::Flip(flip)
        }
    }

    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);
    const ON_SCREEN: Rect = Rect::new(0.0, 100.0, 800.0, 200.0);
    const OFF_SCREEN: Rect = Rect::new(0.0, 2000.0, 800.0, 200.0);

    fn run(
        trigger: &mut VisibilityTrigger,
        queue: &mut TimerQueue<Msg>,
        until: Millis,
    ) -> Vec<VisibilityChange> {
        let mut changes = Vec::new();
        while let Some((id, Msg::Flip(flip))) = queue.pop_due(until) {
            changes.push(trigger.apply(id, flip));
        }
        queue.catch_up(until);
        changes
    }

    #[test]
    fn test_flip_after_delay() {
        let mut queue = TimerQueue::new();
        let mut trigger = VisibilityTrigger::default();
        trigger.mount();

        assert!(trigger.observe(&mut queue, ON_SCREEN, VIEWPORT).is_some());
        assert!(run(&mut trigger, &mut queue, 99).is_empty());
        assert!(!trigger.is_visible());

        assert_eq!(run(&mut trigger, &mut queue, 100), vec![VisibilityChange::Shown]);
        assert!(trigger.is_visible());
    }

    #[test]
    fn test_unmounted_trigger_ignores_geometry() {
        let mut queue: TimerQueue<Msg> = TimerQueue::new();
        let mut trigger = VisibilityTrigger::default();

        assert!(trigger.observe(&mut queue, ON_SCREEN, VIEWPORT).is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_last_flip_wins() {
        let mut queue = TimerQueue::new();
        let mut trigger = VisibilityTrigger::default();
        trigger.mount();

        trigger.observe(&mut queue, ON_SCREEN, VIEWPORT);
        queue.catch_up(30);
        trigger.observe(&mut queue, OFF_SCREEN, VIEWPORT);
        queue.catch_up(60);
        trigger.observe(&mut queue, ON_SCREEN, VIEWPORT);
        assert_eq!(trigger.pending_flips(), 3);

        let changes = run(&mut trigger, &mut queue, 500);
        assert_eq!(
            changes,
            vec![
                VisibilityChange::Shown,
                VisibilityChange::Hidden,
                VisibilityChange::Shown
            ]
        );
        assert!(trigger.is_visible());
        assert_eq!(trigger.pending_flips(), 0);
    }

    #[test]
    fn test_lock_requires_only_once_and_visibility() {
        let mut queue = TimerQueue::new();
        let mut plain = VisibilityTrigger::default();
        plain.mount();
        plain.observe(&mut queue, ON_SCREEN, VIEWPORT);
        run(&mut plain, &mut queue, 200);
        assert!(!plain.lock());

        let mut once = VisibilityTrigger::new(TriggerOptions {
            only_once: true,
            ..Default::default()
        });
        assert!(!once.lock());

        let mut queue = TimerQueue::new();
        once.mount();
        once.observe(&mut queue, ON_SCREEN, VIEWPORT);
        run(&mut once, &mut queue, 200);
        assert!(once.lock());
        assert!(!once.lock());
    }

    #[test]
    fn test_locked_trigger_reports_locked() {
        let mut queue = TimerQueue::new();
        let mut trigger = VisibilityTrigger::new(TriggerOptions {
            only_once: true,
            ..Default::default()
        });
        trigger.mount();
        trigger.observe(&mut queue, ON_SCREEN, VIEWPORT);
        run(&mut trigger, &mut queue, 100);
        trigger.lock();

        trigger.observe(&mut queue, OFF_SCREEN, VIEWPORT);
        assert_eq!(run(&mut trigger, &mut queue, 300), vec![VisibilityChange::Locked]);
        assert!(trigger.is_locked());
    }

    #[test]
    fn test_unmount_cancels_pending_flips() {
        let mut queue = TimerQueue::new();
        let mut trigger = VisibilityTrigger::default();
        trigger.mount();
        trigger.observe(&mut queue, ON_SCREEN, VIEWPORT);

        trigger.unmount(&mut queue);
        assert!(queue.is_empty());
        assert!(run(&mut trigger, &mut queue, 1000).is_empty());
        assert!(!trigger.is_mounted());
    }

    #[test]
    fn test_set_options_reobserves_without_resetting() {
        let mut queue = TimerQueue::new();
        let mut trigger = VisibilityTrigger::default();
        trigger.mount();
        trigger.observe(&mut queue, ON_SCREEN, VIEWPORT);
        run(&mut trigger, &mut queue, 100);

        trigger.set_options(TriggerOptions {
            delay: 300,
            ..Default::default()
        });
        assert!(trigger.is_visible());

        // Same geometry is reported again after re-registration
        assert!(trigger.observe(&mut queue, ON_SCREEN, VIEWPORT).is_some());
        assert_eq!(queue.next_due(), Some(400));
        assert_eq!(run(&mut trigger, &mut queue, 400), vec![VisibilityChange::Unchanged]);
    }
}
