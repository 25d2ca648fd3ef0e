//! Text reveal wrapper
//!
//! Splits its content into one unit per character and, once the container
//! becomes visible, reveals the units in order with one of three sequences:
//!
//! - **Typewriter**: one unit per step behind a moving cursor; a synthetic
//!   trailing unit hosts the blinking cursor once typing is done
//! - **Fade**: one unit per step, each fading in
//! - **Random**: each unit cycles through random substitutes before settling
//!   on its real character
//!
//! Every sequence is driven by a single interval on the component's own timer
//! queue. Losing visibility cancels the run and hides every unit again.
//!
//! ```rust
//! use unveil_core::Rect;
//! use unveil_widgets::prelude::*;
//!
//! let mut title = RevealText::new(TextOptions::new("Hi", TextAnimation::fade()));
//! assert_eq!(title.units().len(), 2);
//!
//! title.mount(0);
//! title.layout(Rect::new(0.0, 0.0, 800.0, 100.0), Rect::new(0.0, 0.0, 800.0, 600.0));
//! title.advance_to(100 + 2 * 500);
//! assert_eq!(title.visible_text(), "Hi");
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;
use unveil_animation::{
    TimerGroup, TimerId, TimerQueue, VisibilityChange, VisibilityFlip, VisibilityState,
    VisibilityTrigger,
};
use unveil_core::{Millis, Rect, RenderNode, Result, StyleValue, UnveilError};

use crate::charset::CharPool;
use crate::component::Reveal;
use crate::options::{TextAnimation, TextOptions};

/// Class of the observed outer container
pub const TEXT_CONTAINER_CLASS: &str = "scroll-animation-text";
/// Class of every character unit
pub const CHAR_CLASS: &str = "scroll-anim-text-char";
/// Class of units not yet revealed
pub const HIDE_CLASS: &str = "hide";
/// Class of the unit currently under the typewriter cursor
pub const CURSOR_CLASS: &str = "scroll-text-cursor";
/// Class of the heading while the shared typewriter cursor is shown
pub const CURSOR_HOST_CLASS: &str = "scroll-text-caret";
/// Animation left on the trailing typewriter unit
pub const CURSOR_BLINK: &str = "cursor 1.5s steps(1) infinite";

#[derive(Clone, Debug, PartialEq)]
enum TextMsg {
    Flip(VisibilityFlip),
    /// Advance the running sequence
    Step,
    /// Typewriter cursor leaves the unit at this index
    CursorOff(usize),
}

impl From<VisibilityFlip> for TextMsg {
    fn from(flip: VisibilityFlip) -> Self {
        TextMsg::Flip(flip)
    }
}

/// One animatable character
#[derive(Clone, Debug, PartialEq)]
pub struct CharUnit {
    index: usize,
    /// `None` for the trailing typewriter unit
    glyph: Option<char>,
    shown: String,
    hidden: bool,
    cursor: bool,
    animation: Option<String>,
    opacity: Option<f32>,
    scrambles: u32,
}

impl CharUnit {
    fn new(index: usize, glyph: Option<char>) -> Self {
        Self {
            index,
            glyph,
            shown: glyph.map(String::from).unwrap_or_default(),
            hidden: true,
            cursor: false,
            animation: None,
            opacity: None,
            scrambles: 0,
        }
    }

    /// Position in the sequence; stable for the lifetime of the content
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn glyph(&self) -> Option<char> {
        self.glyph
    }

    /// Text currently displayed (a substitute while scrambling)
    pub fn text(&self) -> &str {
        &self.shown
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn has_cursor(&self) -> bool {
        self.cursor
    }

    pub fn animation(&self) -> Option<&str> {
        self.animation.as_deref()
    }

    pub fn opacity(&self) -> Option<f32> {
        self.opacity
    }

    /// Substitutions applied during the current run
    pub fn scrambles(&self) -> u32 {
        self.scrambles
    }

    fn restore(&mut self) {
        self.shown = self.glyph.map(String::from).unwrap_or_default();
    }

    fn reset(&mut self) {
        self.restore();
        self.hidden = true;
        self.cursor = false;
        self.animation = None;
        self.opacity = None;
        self.scrambles = 0;
    }

    fn render(&self) -> RenderNode {
        let mut node = RenderNode::span().class(CHAR_CLASS);
        if self.hidden {
            node = node.class(HIDE_CLASS);
        }
        if self.cursor {
            node = node.class(CURSOR_CLASS);
        }
        if let Some(animation) = &self.animation {
            node = node.style("animation", StyleValue::text(animation.clone()));
        } else if !self.hidden {
            node = node.style("animation", StyleValue::text("none"));
        }
        if let Some(opacity) = self.opacity {
            node = node.style("opacity", StyleValue::number(opacity));
        }
        node.text(self.shown.clone())
    }
}

/// Progress of the current reveal sequence
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunState {
    /// Nothing revealed
    #[default]
    Idle,
    Running,
    /// Every unit revealed
    Complete,
}

/// A unit partway through its random substitutions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Scramble {
    unit: usize,
    ran: u32,
}

/// Scroll-triggered per-character text animation
pub struct RevealText {
    options: TextOptions,
    units: Vec<CharUnit>,
    cursor_host: bool,
    pool: CharPool,
    rng: StdRng,
    trigger: VisibilityTrigger,
    queue: TimerQueue<TextMsg>,
    /// Timers of the current run
    run: TimerGroup,
    step_timer: Option<TimerId>,
    state: RunState,
    /// Next unit to reveal
    next_unit: usize,
    /// Steps taken in the current run
    ticks: u64,
    scramble: Option<Scramble>,
}

/// Create a text wrapper with default timing
pub fn reveal_text(content: impl Into<String>, animation: TextAnimation) -> RevealText {
    RevealText::new(TextOptions::new(content, animation))
}

impl RevealText {
    pub fn new(options: TextOptions) -> Self {
        let units = derive_units(&options.content, &options.animation);
        Self {
            pool: pool_for(&options.animation),
            cursor_host: options.animation.is_typewriter(),
            trigger: VisibilityTrigger::new(options.trigger_options()),
            units,
            options,
            rng: StdRng::from_entropy(),
            queue: TimerQueue::new(),
            run: TimerGroup::new(),
            step_timer: None,
            state: RunState::Idle,
            next_unit: 0,
            ticks: 0,
            scramble: None,
        }
    }

    /// Use a deterministic substitute sequence
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn options(&self) -> &TextOptions {
        &self.options
    }

    pub fn units(&self) -> &[CharUnit] {
        &self.units
    }

    pub fn run_state(&self) -> RunState {
        self.state
    }

    /// Whether the shared typewriter cursor is shown
    pub fn has_cursor_host(&self) -> bool {
        self.cursor_host
    }

    pub fn pool(&self) -> CharPool {
        self.pool
    }

    /// Text of every revealed unit, in order
    pub fn visible_text(&self) -> String {
        self.units
            .iter()
            .filter(|u| !u.hidden)
            .map(|u| u.shown.as_str())
            .collect()
    }

    /// Replace the content, re-deriving the units
    ///
    /// A visible, unlocked instance restarts its sequence; a locked one shows
    /// the new content fully revealed.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.options.content = content.into();
        self.cancel_run();
        self.units = derive_units(&self.options.content, &self.options.animation);
        self.cursor_host = self.options.animation.is_typewriter();

        if self.trigger.is_locked() {
            self.settle_all();
        } else if self.trigger.is_visible() {
            self.start_run();
        } else {
            self.state = RunState::Idle;
        }
    }

    /// Change parameters of the current animation kind
    ///
    /// The kind itself is fixed for the lifetime of the instance. A running
    /// sequence restarts with the new parameters.
    pub fn set_animation(&mut self, animation: TextAnimation) -> Result<()> {
        if animation.kind() != self.options.animation.kind() {
            return Err(UnveilError::invalid(
                "type",
                format!(
                    "cannot change animation kind from `{}` to `{}`",
                    self.options.animation.kind(),
                    animation.kind()
                ),
            ));
        }

        self.options.animation = animation;
        self.pool = pool_for(&self.options.animation);
        let playing = self.trigger.is_mounted()
            && self.trigger.is_visible()
            && !self.trigger.is_locked();
        if playing && self.state == RunState::Running {
            self.start_run();
        }
        Ok(())
    }

    pub fn set_delay(&mut self, ms: Millis) {
        self.options.delay = ms;
        self.trigger.set_options(self.options.trigger_options());
    }

    pub fn set_trigger_at(&mut self, fraction: f32) {
        self.options.trigger_at = fraction;
        self.trigger.set_options(self.options.trigger_options());
    }

    // =========================================================================
    // Run management
    // =========================================================================

    /// Cancel any previous run and start the sequence from the first unit
    fn start_run(&mut self) {
        self.cancel_run();
        self.reset_units();

        let total = self.units.len();
        if total == 0 {
            self.finish_run();
            return;
        }

        let period = self.options.animation.step_period();
        let step = self.queue.set_interval(period, TextMsg::Step);
        self.step_timer = Some(self.run.track(step));
        self.state = RunState::Running;

        tracing::debug!(
            kind = self.options.animation.kind(),
            units = total,
            period,
            "text sequence started"
        );
    }

    fn cancel_run(&mut self) {
        let cancelled = self.run.cancel_all(&mut self.queue);
        if cancelled > 0 {
            tracing::debug!(cancelled, "text sequence cancelled");
        }
        self.step_timer = None;
        self.next_unit = 0;
        self.ticks = 0;
        self.scramble = None;
    }

    fn reset_units(&mut self) {
        for unit in &mut self.units {
            unit.reset();
        }
        self.cursor_host = self.options.animation.is_typewriter();
    }

    fn stop_stepping(&mut self) {
        if let Some(id) = self.step_timer.take() {
            self.run.cancel(&mut self.queue, id);
        }
    }

    fn finish_run(&mut self) {
        self.stop_stepping();
        self.run.cancel_all(&mut self.queue);
        self.state = RunState::Complete;
        tracing::debug!(kind = self.options.animation.kind(), "text sequence complete");

        if self.trigger.lock() {
            tracing::debug!("text settled");
        }
    }

    /// Reveal every unit in its final state without animating
    fn settle_all(&mut self) {
        for unit in &mut self.units {
            unit.reset();
            unit.hidden = false;
        }
        if let TextAnimation::Typewriter { hide_cursor, .. } = self.options.animation {
            self.cursor_host = !hide_cursor;
        }
        self.state = RunState::Complete;
    }

    fn hide(&mut self) {
        self.cancel_run();
        self.reset_units();
        self.state = RunState::Idle;
    }

    // =========================================================================
    // Sequences
    // =========================================================================

    fn handle(&mut self, id: TimerId, msg: TextMsg) {
        match msg {
            TextMsg::Flip(flip) => match self.trigger.apply(id, flip) {
                VisibilityChange::Shown => self.start_run(),
                VisibilityChange::Hidden => self.hide(),
                VisibilityChange::Unchanged | VisibilityChange::Locked => {}
            },
            TextMsg::Step => match self.options.animation {
                TextAnimation::Typewriter { hide_cursor, .. } => self.typewriter_step(hide_cursor),
                TextAnimation::Fade { .. } => self.fade_step(),
                TextAnimation::Random { .. } => self.random_step(),
            },
            TextMsg::CursorOff(index) => {
                self.run.release(id);
                self.cursor_off(index);
            }
        }
    }

    fn typewriter_step(&mut self, hide_cursor: bool) {
        let period = self.options.animation.step_period();
        let index = self.next_unit;

        if let Some(unit) = self.units.get_mut(index) {
            unit.hidden = false;
            unit.cursor = true;
            unit.animation = Some(format!("type {period}ms steps(2)"));
            let off = self.queue.set_timeout(period, TextMsg::CursorOff(index));
            self.run.track(off);
        }

        self.next_unit += 1;
        if self.next_unit >= self.units.len() {
            if hide_cursor {
                self.cursor_host = false;
            }
            self.stop_stepping();
        }
    }

    fn cursor_off(&mut self, index: usize) {
        let last = self.units.len().saturating_sub(1);
        let hide_cursor = matches!(
            self.options.animation,
            TextAnimation::Typewriter {
                hide_cursor: true,
                ..
            }
        );

        let Some(unit) = self.units.get_mut(index) else {
            return;
        };

        if index == last {
            if hide_cursor {
                unit.animation = None;
                unit.opacity = Some(0.0);
            } else {
                unit.animation = Some(CURSOR_BLINK.to_string());
            }
            self.finish_run();
        } else {
            unit.cursor = false;
        }
    }

    fn fade_step(&mut self) {
        let period = self.options.animation.step_period();

        if let Some(unit) = self.units.get_mut(self.next_unit) {
            unit.hidden = false;
            unit.animation = Some(format!("fade {period}ms linear"));
        }

        self.next_unit += 1;
        if self.next_unit >= self.units.len() {
            self.finish_run();
        }
    }

    /// One scramble step
    ///
    /// A single counter drives both phases: the active unit takes one
    /// substitution per step and restores its glyph after `randoms` of them,
    /// and every `randoms` steps the next unit is revealed and becomes active.
    /// Unit `i` is revealed at step `randoms * (i + 1)` and settles `randoms`
    /// steps later.
    fn random_step(&mut self) {
        let randoms = self.options.animation.randoms();
        self.ticks += 1;

        if let Some(mut scramble) = self.scramble.take() {
            let substitute = self.pool.pick(&mut self.rng);
            if let Some(unit) = self.units.get_mut(scramble.unit) {
                scramble.ran += 1;
                unit.scrambles += 1;
                if scramble.ran >= randoms {
                    unit.restore();
                    tracing::trace!(unit = scramble.unit, "unit settled");
                } else {
                    unit.shown = substitute.to_string();
                    self.scramble = Some(scramble);
                }
            }
        }

        if self.ticks % u64::from(randoms) == 0 {
            if let Some(unit) = self.units.get_mut(self.next_unit) {
                unit.hidden = false;
                self.scramble = Some(Scramble {
                    unit: self.next_unit,
                    ran: 0,
                });
                self.next_unit += 1;
            }
        }

        if self.next_unit >= self.units.len() && self.scramble.is_none() {
            self.finish_run();
        }
    }
}

fn derive_units(content: &str, animation: &TextAnimation) -> Vec<CharUnit> {
    let mut units: Vec<CharUnit> = content
        .chars()
        .enumerate()
        .map(|(index, c)| CharUnit::new(index, Some(c)))
        .collect();
    if animation.is_typewriter() {
        units.push(CharUnit::new(units.len(), None));
    }
    units
}

fn pool_for(animation: &TextAnimation) -> CharPool {
    match animation {
        TextAnimation::Random {
            alphabet_only,
            number_only,
            ..
        } => CharPool::from_flags(*alphabet_only, *number_only),
        _ => CharPool::default(),
    }
}

impl Reveal for RevealText {
    fn mount(&mut self, now: Millis) {
        self.queue.catch_up(now);
        self.trigger.mount();
    }

    fn unmount(&mut self) {
        if self.trigger.is_locked() {
            self.cancel_run();
        } else {
            self.hide();
        }
        self.trigger.unmount(&mut self.queue);
    }

    fn layout(&mut self, target: Rect, viewport: Rect) {
        self.trigger.observe(&mut self.queue, target, viewport);
    }

    fn advance_to(&mut self, now: Millis) {
        while let Some((id, msg)) = self.queue.pop_due(now) {
            self.handle(id, msg);
        }
        self.queue.catch_up(now);
    }

    fn render(&self) -> RenderNode {
        let mut heading = RenderNode::heading();
        if self.cursor_host {
            heading = heading.class(CURSOR_HOST_CLASS);
        }

        RenderNode::div()
            .class(TEXT_CONTAINER_CLASS)
            .child(heading.children(self.units.iter().map(CharUnit::render)))
    }

    fn visibility(&self) -> VisibilityState {
        self.trigger.state()
    }

    fn pending_timers(&self) -> usize {
        self.queue.len()
    }
}
