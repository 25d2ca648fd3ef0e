//! Block reveal wrapper
//!
//! Wraps children in an observed container and swaps the inner node's class
//! between the neutral out-of-view class, the recipe class, and the settled
//! class:
//!
//! ```rust
//! use unveil_core::{Rect, RenderNode};
//! use unveil_widgets::prelude::*;
//!
//! let mut hero = reveal_div(BlockAnimation::slide(SlideOrigin::Left))
//!     .child(RenderNode::span().text("Hello"));
//!
//! hero.mount(0);
//! hero.layout(Rect::new(0.0, 100.0, 800.0, 200.0), Rect::new(0.0, 0.0, 800.0, 600.0));
//! assert_eq!(hero.current_class(), "scroll-not-in-port");
//!
//! hero.advance_to(100);
//! assert_eq!(hero.current_class(), "slide slide-left");
//! ```

use unveil_animation::{
    TimerGroup, TimerId, TimerQueue, VisibilityChange, VisibilityFlip, VisibilityState,
    VisibilityTrigger,
};
use unveil_core::{Millis, Rect, RenderNode};

use crate::component::Reveal;
use crate::options::{BlockAnimation, DivOptions, TimingFunction};
use crate::recipe::{Recipe, DIV_CONTAINER_CLASS, NOT_IN_VIEWPORT_CLASS, SETTLED_CLASS};

#[derive(Clone, Debug, PartialEq)]
enum DivMsg {
    Flip(VisibilityFlip),
    /// Only-once animation has run for its full duration
    Settle,
}

impl From<VisibilityFlip> for DivMsg {
    fn from(flip: VisibilityFlip) -> Self {
        DivMsg::Flip(flip)
    }
}

/// Content of a [`RevealDiv`]
pub enum DivChild {
    /// Static content
    Node(RenderNode),
    /// A nested component sharing this container's bounds
    Reveal(Box<dyn Reveal>),
}

/// Scroll-triggered block animation wrapper
pub struct RevealDiv {
    options: DivOptions,
    recipe: Recipe,
    trigger: VisibilityTrigger,
    queue: TimerQueue<DivMsg>,
    /// Timers of the current animation run
    run: TimerGroup,
    children: Vec<DivChild>,
}

/// Create a block wrapper with default timing
pub fn reveal_div(animation: BlockAnimation) -> RevealDiv {
    RevealDiv::new(DivOptions::new(animation))
}

impl RevealDiv {
    pub fn new(options: DivOptions) -> Self {
        Self {
            recipe: Recipe::for_options(&options),
            trigger: VisibilityTrigger::new(options.trigger_options()),
            options,
            queue: TimerQueue::new(),
            run: TimerGroup::new(),
            children: Vec::new(),
        }
    }

    /// Add static content
    pub fn child(mut self, node: RenderNode) -> Self {
        self.children.push(DivChild::Node(node));
        self
    }

    /// Nest another component inside this container
    pub fn reveal_child(mut self, child: impl Reveal + 'static) -> Self {
        self.children.push(DivChild::Reveal(Box::new(child)));
        self
    }

    pub fn options(&self) -> &DivOptions {
        &self.options
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn children(&self) -> &[DivChild] {
        &self.children
    }

    /// Class currently applied to the inner node
    pub fn current_class(&self) -> &str {
        if self.trigger.is_locked() {
            SETTLED_CLASS
        } else if self.trigger.is_visible() {
            self.recipe.class()
        } else {
            NOT_IN_VIEWPORT_CLASS
        }
    }

    pub fn set_duration(&mut self, ms: Millis) {
        self.options.duration = ms;
        self.refresh();
    }

    pub fn set_delay(&mut self, ms: Millis) {
        self.options.delay = ms;
        self.refresh();
    }

    pub fn set_trigger_at(&mut self, fraction: f32) {
        self.options.trigger_at = fraction;
        self.refresh();
    }

    pub fn set_timing_function(&mut self, function: Option<TimingFunction>) {
        self.options.timing_function = function;
        self.refresh();
    }

    /// Recompute style variables and observer settings, keeping visibility
    fn refresh(&mut self) {
        self.recipe = Recipe::for_options(&self.options);
        self.trigger.set_options(self.options.trigger_options());
    }

    fn handle(&mut self, id: TimerId, msg: DivMsg) {
        match msg {
            DivMsg::Flip(flip) => match self.trigger.apply(id, flip) {
                VisibilityChange::Shown => {
                    self.run.cancel_all(&mut self.queue);
                    if self.options.only_once {
                        let settle = self.queue.set_timeout(self.options.duration, DivMsg::Settle);
                        self.run.track(settle);
                    }
                    tracing::debug!(
                        kind = self.options.animation.kind(),
                        class = self.recipe.class(),
                        "block animation started"
                    );
                }
                VisibilityChange::Hidden => {
                    let cancelled = self.run.cancel_all(&mut self.queue);
                    tracing::debug!(cancelled, "block animation reset");
                }
                VisibilityChange::Unchanged | VisibilityChange::Locked => {}
            },
            DivMsg::Settle => {
                self.run.release(id);
                if self.trigger.lock() {
                    tracing::debug!(kind = self.options.animation.kind(), "block settled");
                }
            }
        }
    }
}

impl Reveal for RevealDiv {
    fn mount(&mut self, now: Millis) {
        self.queue.catch_up(now);
        self.trigger.mount();
        for child in &mut self.children {
            if let DivChild::Reveal(reveal) = child {
                reveal.mount(now);
            }
        }
    }

    fn unmount(&mut self) {
        self.run.cancel_all(&mut self.queue);
        self.trigger.unmount(&mut self.queue);
        for child in &mut self.children {
            if let DivChild::Reveal(reveal) = child {
                reveal.unmount();
            }
        }
    }

    fn layout(&mut self, target: Rect, viewport: Rect) {
        self.trigger.observe(&mut self.queue, target, viewport);
        for child in &mut self.children {
            if let DivChild::Reveal(reveal) = child {
                reveal.layout(target, viewport);
            }
        }
    }

    fn advance_to(&mut self, now: Millis) {
        while let Some((id, msg)) = self.queue.pop_due(now) {
            self.handle(id, msg);
        }
        self.queue.catch_up(now);

        for child in &mut self.children {
            if let DivChild::Reveal(reveal) = child {
                reveal.advance_to(now);
            }
        }
    }

    fn render(&self) -> RenderNode {
        let inner = RenderNode::div()
            .class(self.current_class())
            .children(self.children.iter().map(|child| match child {
                DivChild::Node(node) => node.clone(),
                DivChild::Reveal(reveal) => reveal.render(),
            }));

        RenderNode::div()
            .class(DIV_CONTAINER_CLASS)
            .styles(self.recipe.vars().iter().map(|(k, v)| (k.clone(), v.clone())))
            .child(inner)
    }

    fn visibility(&self) -> VisibilityState {
        self.trigger.state()
    }

    fn pending_timers(&self) -> usize {
        let nested: usize = self
            .children
            .iter()
            .map(|child| match child {
                DivChild::Reveal(reveal) => reveal.pending_timers(),
                DivChild::Node(_) => 0,
            })
            .sum();
        self.queue.len() + nested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{FlipDirection, RollDirection, SlideOrigin, TextAnimation, TextOptions};
    use crate::text::RevealText;

    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);
    const ON_SCREEN: Rect = Rect::new(0.0, 100.0, 800.0, 200.0);
    const OFF_SCREEN: Rect = Rect::new(0.0, 1600.0, 800.0, 200.0);

    fn all_kinds() -> Vec<BlockAnimation> {
        vec![
            BlockAnimation::Fade,
            BlockAnimation::Flicker,
            BlockAnimation::zoom(0.5),
            BlockAnimation::flip(FlipDirection::LeftRight),
            BlockAnimation::slide(SlideOrigin::Bottom),
            BlockAnimation::blur(4.0),
            BlockAnimation::scale(0.2, 0.8),
            BlockAnimation::roll(RollDirection::Clock),
        ]
    }

    fn inner_class(div: &RevealDiv) -> String {
        div.render().child_nodes()[0].classes().to_string()
    }

    #[test]
    fn test_not_in_viewport_class_for_every_kind() {
        for kind in all_kinds() {
            let mut div = reveal_div(kind);
            div.mount(0);
            div.layout(OFF_SCREEN, VIEWPORT);
            div.advance_to(500);

            assert_eq!(inner_class(&div), NOT_IN_VIEWPORT_CLASS);
        }
    }

    #[test]
    fn test_class_before_first_layout_is_neutral() {
        let div = reveal_div(BlockAnimation::Fade);
        assert_eq!(inner_class(&div), NOT_IN_VIEWPORT_CLASS);
    }

    #[test]
    fn test_visible_after_delay() {
        let mut div = RevealDiv::new(DivOptions::new(BlockAnimation::Fade).with_delay(250));
        div.mount(0);
        div.layout(ON_SCREEN, VIEWPORT);

        div.advance_to(249);
        assert_eq!(div.current_class(), NOT_IN_VIEWPORT_CLASS);

        div.advance_to(250);
        assert_eq!(div.current_class(), "fade");
        assert!(div.visibility().visible);
    }

    #[test]
    fn test_toggles_without_only_once() {
        let mut div = reveal_div(BlockAnimation::roll(RollDirection::Clock));
        div.mount(0);
        div.layout(ON_SCREEN, VIEWPORT);
        div.advance_to(2000);
        assert_eq!(div.current_class(), "roll roll-clock");

        div.layout(OFF_SCREEN, VIEWPORT);
        div.advance_to(2100);
        assert_eq!(div.current_class(), NOT_IN_VIEWPORT_CLASS);
        assert!(!div.visibility().locked);
    }

    #[test]
    fn test_only_once_settles_after_duration() {
        let mut div = RevealDiv::new(
            DivOptions::new(BlockAnimation::Fade)
                .with_duration(500)
                .with_only_once(true),
        );
        div.mount(0);
        div.layout(ON_SCREEN, VIEWPORT);

        div.advance_to(599);
        assert_eq!(div.current_class(), "fade");

        div.advance_to(600);
        assert_eq!(div.current_class(), SETTLED_CLASS);

        div.layout(OFF_SCREEN, VIEWPORT);
        div.advance_to(2000);
        assert_eq!(div.current_class(), SETTLED_CLASS);
        assert!(div.visibility().locked);
    }

    #[test]
    fn test_only_once_hidden_before_settling_does_not_lock() {
        let mut div = RevealDiv::new(
            DivOptions::new(BlockAnimation::Fade)
                .with_duration(500)
                .with_only_once(true),
        );
        div.mount(0);
        div.layout(ON_SCREEN, VIEWPORT);
        div.advance_to(200);

        div.layout(OFF_SCREEN, VIEWPORT);
        div.advance_to(2000);

        assert_eq!(div.current_class(), NOT_IN_VIEWPORT_CLASS);
        assert!(!div.visibility().locked);
        assert_eq!(div.pending_timers(), 0);
    }

    #[test]
    fn test_style_vars_on_container() {
        let div = reveal_div(BlockAnimation::slide(SlideOrigin::Left));
        let node = div.render();

        assert!(node.classes().contains(DIV_CONTAINER_CLASS));
        assert_eq!(node.style_value("--duration").map(|v| v.to_string()), Some("1000ms".into()));
        assert_eq!(
            node.style_value("--slide-distance").map(|v| v.to_string()),
            Some("-50%".into())
        );
    }

    #[test]
    fn test_duration_change_keeps_visibility() {
        let mut div = reveal_div(BlockAnimation::Fade);
        div.mount(0);
        div.layout(ON_SCREEN, VIEWPORT);
        div.advance_to(100);

        div.set_duration(300);
        assert!(div.visibility().visible);
        assert_eq!(div.current_class(), "fade");
        assert_eq!(
            div.render().style_value("--duration").map(|v| v.to_string()),
            Some("300ms".into())
        );
    }

    #[test]
    fn test_unknown_flip_direction_renders_empty_class() {
        let mut div = reveal_div(BlockAnimation::flip(FlipDirection::Unknown));
        div.mount(0);
        div.layout(ON_SCREEN, VIEWPORT);
        div.advance_to(100);

        assert_eq!(div.current_class(), "");
        assert!(div.render().child_nodes()[0].classes().is_empty());
    }

    #[test]
    fn test_unmount_cancels_timers() {
        let mut div = RevealDiv::new(DivOptions::new(BlockAnimation::Fade).with_only_once(true));
        div.mount(0);
        div.layout(ON_SCREEN, VIEWPORT);
        div.advance_to(100);
        assert_eq!(div.pending_timers(), 1);

        div.layout(OFF_SCREEN, VIEWPORT);
        div.unmount();
        assert_eq!(div.pending_timers(), 0);
    }

    #[test]
    fn test_nested_text_follows_container() {
        let text = RevealText::new(TextOptions::new("Test", TextAnimation::typewriter()));
        let mut div = reveal_div(BlockAnimation::Fade).reveal_child(text);

        div.mount(0);
        div.layout(ON_SCREEN, VIEWPORT);
        div.advance_to(1000);

        let node = div.render();
        assert_eq!(node.child_nodes()[0].classes().to_string(), "fade");
        assert_eq!(node.text_content(), "Test");
    }
}
