//! Headless host for reveal components
//!
//! A [`Stage`] stacks components vertically inside a scrollable viewport,
//! owns the clock, and feeds every component its container geometry after
//! each scroll or resize. It stands in for a document when driving the
//! components from tests or the command line.

use indexmap::IndexMap;
use serde::Serialize;
use unveil_core::{Millis, Rect, RenderNode, Result, Size, UnveilError};

use crate::component::Reveal;

/// Class of the stage root node
pub const STAGE_CLASS: &str = "unveil-stage";

struct Slot {
    height: f32,
    component: Box<dyn Reveal>,
}

/// Rendered state of one component at a point in time
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComponentSnapshot {
    pub key: String,
    /// Container bounds in viewport coordinates
    pub bounds: Rect,
    pub visible: bool,
    pub locked: bool,
    pub node: RenderNode,
}

/// Rendered state of the whole stage
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StageSnapshot {
    pub time: Millis,
    pub scroll_y: f32,
    pub components: Vec<ComponentSnapshot>,
}

/// Vertical stack of mounted components in a scrollable viewport
pub struct Stage {
    viewport: Size,
    gap: f32,
    scroll_y: f32,
    now: Millis,
    slots: IndexMap<String, Slot>,
}

impl Stage {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            gap: 0.0,
            scroll_y: 0.0,
            now: 0,
            slots: IndexMap::new(),
        }
    }

    /// Vertical space between stacked components
    pub fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap.max(0.0);
        self
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    /// Total height of the stacked components
    pub fn content_height(&self) -> f32 {
        let heights: f32 = self.slots.values().map(|s| s.height.max(0.0)).sum();
        let gaps = self.gap * self.slots.len().saturating_sub(1) as f32;
        heights + gaps
    }

    pub fn max_scroll(&self) -> f32 {
        (self.content_height() - self.viewport.height).max(0.0)
    }

    /// Mount a component at the bottom of the stack
    pub fn push(
        &mut self,
        key: impl Into<String>,
        height: f32,
        component: impl Reveal + 'static,
    ) -> Result<()> {
        self.push_boxed(key, height, Box::new(component))
    }

    pub fn push_boxed(
        &mut self,
        key: impl Into<String>,
        height: f32,
        mut component: Box<dyn Reveal>,
    ) -> Result<()> {
        let key = key.into();
        if self.slots.contains_key(&key) {
            return Err(UnveilError::DuplicateComponent(key));
        }

        component.mount(self.now);
        tracing::debug!(key = %key, height, "component mounted");
        self.slots.insert(key, Slot { height, component });
        self.relayout();
        Ok(())
    }

    /// Unmount and return a component
    pub fn remove(&mut self, key: &str) -> Result<Box<dyn Reveal>> {
        let mut slot = self
            .slots
            .shift_remove(key)
            .ok_or_else(|| UnveilError::UnknownComponent(key.to_string()))?;

        slot.component.unmount();
        tracing::debug!(key, "component unmounted");

        self.scroll_y = self.scroll_y.min(self.max_scroll());
        self.relayout();
        Ok(slot.component)
    }

    pub fn get(&self, key: &str) -> Result<&dyn Reveal> {
        self.slots
            .get(key)
            .map(|s| s.component.as_ref())
            .ok_or_else(|| UnveilError::UnknownComponent(key.to_string()))
    }

    pub fn get_mut(&mut self, key: &str) -> Result<&mut dyn Reveal> {
        match self.slots.get_mut(key) {
            Some(slot) => Ok(slot.component.as_mut()),
            None => Err(UnveilError::UnknownComponent(key.to_string())),
        }
    }

    /// Container bounds of a component in viewport coordinates
    pub fn bounds_of(&self, key: &str) -> Option<Rect> {
        self.layout_rects()
            .find(|(k, _)| *k == key)
            .map(|(_, rect)| rect)
    }

    /// Scroll to an absolute offset, clamped to the content
    pub fn scroll_to(&mut self, y: f32) {
        let target = if y.is_finite() { y } else { 0.0 };
        self.scroll_y = target.clamp(0.0, self.max_scroll());
        tracing::trace!(scroll_y = self.scroll_y, "scrolled");
        self.relayout();
    }

    pub fn scroll_by(&mut self, dy: f32) {
        self.scroll_to(self.scroll_y + dy);
    }

    pub fn resize(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.scroll_y = self.scroll_y.min(self.max_scroll());
        tracing::debug!(width = viewport.width, height = viewport.height, "viewport resized");
        self.relayout();
    }

    /// Move the clock forward by `ms`, firing every due timer
    pub fn advance(&mut self, ms: Millis) {
        self.advance_to(self.now.saturating_add(ms));
    }

    pub fn advance_to(&mut self, now: Millis) {
        self.now = self.now.max(now);
        for slot in self.slots.values_mut() {
            slot.component.advance_to(self.now);
        }
    }

    /// Timers scheduled across every component
    pub fn pending_timers(&self) -> usize {
        self.slots.values().map(|s| s.component.pending_timers()).sum()
    }

    pub fn render(&self) -> RenderNode {
        RenderNode::div()
            .class(STAGE_CLASS)
            .children(self.slots.values().map(|s| s.component.render()))
    }

    pub fn snapshot(&self) -> StageSnapshot {
        let components = self
            .layout_rects()
            .zip(self.slots.values())
            .map(|((key, bounds), slot)| {
                let visibility = slot.component.visibility();
                ComponentSnapshot {
                    key: key.to_string(),
                    bounds,
                    visible: visibility.visible,
                    locked: visibility.locked,
                    node: slot.component.render(),
                }
            })
            .collect();

        StageSnapshot {
            time: self.now,
            scroll_y: self.scroll_y,
            components,
        }
    }

    fn viewport_rect(&self) -> Rect {
        self.viewport.to_rect()
    }

    fn layout_rects(&self) -> impl Iterator<Item = (&str, Rect)> + '_ {
        let width = self.viewport.width;
        let gap = self.gap;
        let mut offset = -self.scroll_y;
        self.slots.iter().map(move |(key, slot)| {
            let height = slot.height.max(0.0);
            let rect = Rect::new(0.0, offset, width, height);
            offset += height + gap;
            (key.as_str(), rect)
        })
    }

    fn relayout(&mut self) {
        let viewport = self.viewport_rect();
        let rects: Vec<Rect> = self.layout_rects().map(|(_, rect)| rect).collect();
        for (slot, rect) in self.slots.values_mut().zip(rects) {
            slot.component.layout(rect, viewport);
        }
    }
}
