//! Snapshot rendering for `unveil simulate`

use serde::Serialize;
use std::fmt::Write;
use unveil_core::RenderNode;
use unveil_widgets::stage::{ComponentSnapshot, StageSnapshot};

const HIDDEN_CLASS: &str = "hide";

/// A stage snapshot taken by the script
#[derive(Debug, Serialize)]
pub struct LabeledSnapshot {
    pub label: String,
    #[serde(flatten)]
    pub snapshot: StageSnapshot,
}

/// Human-readable summary, one block per snapshot
pub fn format_text(snapshots: &[LabeledSnapshot]) -> String {
    let mut out = String::new();
    for (i, labeled) in snapshots.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let snapshot = &labeled.snapshot;
        let _ = writeln!(
            out,
            "[{}] t={}ms scroll={}",
            labeled.label, snapshot.time, snapshot.scroll_y
        );
        for component in &snapshot.components {
            let _ = writeln!(out, "  {}", format_component(component));
        }
    }
    out
}

fn format_component(component: &ComponentSnapshot) -> String {
    let state = match (component.visible, component.locked) {
        (_, true) => "settled",
        (true, false) => "visible",
        (false, false) => "hidden",
    };

    let inner = component.node.child_nodes().first();
    let class = inner.map(|n| n.classes().to_string()).unwrap_or_default();
    let mut line = format!(
        "{:<12} {:<8} y={:<8} class=\"{}\"",
        component.key,
        state,
        component.bounds.y(),
        class
    );

    let text = visible_text(&component.node);
    if !text.is_empty() {
        let _ = write!(line, " text=\"{text}\"");
    }
    line
}

/// Text of every node not hidden by the `hide` class
pub fn visible_text(node: &RenderNode) -> String {
    let mut out = String::new();
    collect_visible(node, &mut out);
    out
}

fn collect_visible(node: &RenderNode, out: &mut String) {
    if node.classes().contains(HIDDEN_CLASS) {
        return;
    }
    if let Some(text) = node.own_text() {
        out.push_str(text);
    }
    for child in node.child_nodes() {
        collect_visible(child, out);
    }
}

pub fn format_json(snapshots: &[LabeledSnapshot]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(snapshots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use unveil_core::Size;
    use unveil_widgets::prelude::*;

    fn snapshot_after(ms: u64) -> LabeledSnapshot {
        let mut stage = Stage::new(Size::new(800.0, 600.0));
        stage
            .push("hero", 200.0, reveal_div(BlockAnimation::Fade))
            .unwrap();
        stage
            .push("title", 100.0, reveal_text("Hey", TextAnimation::fade()))
            .unwrap();
        stage.advance(ms);
        LabeledSnapshot {
            label: "t".into(),
            snapshot: stage.snapshot(),
        }
    }

    #[test]
    fn test_text_report() {
        let report = format_text(&[snapshot_after(600)]);
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], "[t] t=600ms scroll=0");
        assert!(lines[1].contains("hero"));
        assert!(lines[1].contains("visible"));
        assert!(lines[1].contains("class=\"fade\""));
        assert!(lines[2].contains("text=\"H\""));
    }

    #[test]
    fn test_visible_text_skips_hidden_units() {
        let node = RenderNode::div()
            .child(RenderNode::span().text("a"))
            .child(RenderNode::span().class("hide").text("b"));
        assert_eq!(visible_text(&node), "a");
    }

    #[test]
    fn test_json_report() {
        let json = format_json(&[snapshot_after(100)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["label"], "t");
        assert_eq!(value[0]["time"], 100);
        assert_eq!(value[0]["components"][1]["key"], "title");
    }
}
