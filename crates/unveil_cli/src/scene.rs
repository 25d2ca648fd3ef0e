//! Scene file handling
//!
//! A scene describes a page of stacked reveal components and a scroll script
//! to run against it. Scenes are TOML by default; files ending in `.json`
//! are read as JSON.
//!
//! ```toml
//! gap = 40
//!
//! [viewport]
//! width = 800
//! height = 600
//!
//! [[components]]
//! key = "hero"
//! height = 400
//! div = { type = "zoom", initialZoom = 0.5, hasBounce = true }
//!
//! [[components]]
//! key = "title"
//! height = 120
//! text = { type = "typewriter", content = "Hello" }
//!
//! [[script]]
//! advance = 1000
//!
//! [[script]]
//! snapshot = "hero revealed"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use unveil_core::{Millis, Size, UnveilError};
use unveil_widgets::{DivOptions, RevealDiv, RevealText, Stage, TextOptions};

// =============================================================================
// Scene file
// =============================================================================

/// A page of components plus the script that drives it
#[derive(Debug, Deserialize, Serialize)]
pub struct Scene {
    #[serde(default)]
    pub viewport: ViewportConfig,
    /// Vertical space between components
    #[serde(default)]
    pub gap: f32,
    /// Seed for random text animations
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub components: Vec<ComponentConfig>,
    #[serde(default)]
    pub script: Vec<Step>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl ViewportConfig {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// One component in the stack
#[derive(Debug, Deserialize, Serialize)]
pub struct ComponentConfig {
    pub key: String,
    pub height: f32,
    #[serde(flatten)]
    pub widget: WidgetConfig,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetConfig {
    Div(DivOptions),
    Text(TextOptions),
}

impl WidgetConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            WidgetConfig::Div(_) => "div",
            WidgetConfig::Text(_) => "text",
        }
    }
}

/// One scripted host action
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Scroll to an absolute offset
    ScrollTo(f32),
    ScrollBy(f32),
    /// Advance the clock by this many ms
    Advance(Millis),
    Resize { width: f32, height: f32 },
    /// Record the rendered state under a label
    Snapshot(String),
}

impl Scene {
    /// Load a scene, choosing the format by extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        };

        parsed.with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let scene = toml::from_str(content).map_err(|e| UnveilError::Config(e.to_string()))?;
        Ok(scene)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let scene =
            serde_json::from_str(content).map_err(|e| UnveilError::Config(e.to_string()))?;
        Ok(scene)
    }

    /// Report every configuration mistake the components would silently
    /// paper over
    pub fn validate(&self) -> Result<()> {
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            anyhow::bail!(
                "Viewport must have a positive size, got {}x{}",
                self.viewport.width,
                self.viewport.height
            );
        }
        if !self.gap.is_finite() || self.gap < 0.0 {
            anyhow::bail!("Gap must be a non-negative number, got {}", self.gap);
        }

        let mut seen = HashSet::new();
        for component in &self.components {
            if !seen.insert(component.key.as_str()) {
                anyhow::bail!("Duplicate component key `{}`", component.key);
            }
            if !component.height.is_finite() || component.height < 0.0 {
                anyhow::bail!(
                    "Component `{}` has invalid height {}",
                    component.key,
                    component.height
                );
            }

            let checked = match &component.widget {
                WidgetConfig::Div(options) => options.validate(),
                WidgetConfig::Text(options) => options.validate(),
            };
            checked.with_context(|| format!("Invalid options for component `{}`", component.key))?;
        }

        Ok(())
    }

    /// Mount every component on a fresh stage
    pub fn build_stage(&self) -> Result<Stage> {
        let mut stage = Stage::new(self.viewport.size()).with_gap(self.gap);

        for component in &self.components {
            let mounted = match &component.widget {
                WidgetConfig::Div(options) => {
                    stage.push(&component.key, component.height, RevealDiv::new(options.clone()))
                }
                WidgetConfig::Text(options) => {
                    let mut text = RevealText::new(options.clone());
                    if let Some(seed) = self.seed {
                        text = text.with_seed(seed);
                    }
                    stage.push(&component.key, component.height, text)
                }
            };
            mounted.with_context(|| format!("Failed to mount component `{}`", component.key))?;
        }

        Ok(stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unveil_widgets::{BlockAnimation, TextAnimation};

    const SCENE: &str = r#"
        gap = 40
        seed = 7

        [viewport]
        width = 800
        height = 600

        [[components]]
        key = "hero"
        height = 400
        div = { type = "zoom", initialZoom = 0.5, hasBounce = true, onlyOnce = true }

        [[components]]
        key = "title"
        height = 120
        text = { type = "random", content = "Hi", randoms = 2, duration = 10 }

        [[script]]
        advance = 1000

        [[script]]
        scroll_to = 300

        [[script]]
        resize = { width = 1024, height = 768 }

        [[script]]
        snapshot = "after"
    "#;

    #[test]
    fn test_parse_toml_scene() {
        let scene = Scene::from_toml(SCENE).unwrap();

        assert_eq!(scene.viewport.width, 800.0);
        assert_eq!(scene.gap, 40.0);
        assert_eq!(scene.components.len(), 2);

        match &scene.components[0].widget {
            WidgetConfig::Div(options) => {
                assert!(matches!(options.animation, BlockAnimation::Zoom { .. }));
                assert!(options.only_once);
            }
            other => panic!("expected div, got {}", other.kind()),
        }
        match &scene.components[1].widget {
            WidgetConfig::Text(options) => {
                assert_eq!(options.content, "Hi");
                assert!(matches!(options.animation, TextAnimation::Random { .. }));
            }
            other => panic!("expected text, got {}", other.kind()),
        }

        assert_eq!(
            scene.script,
            vec![
                Step::Advance(1000),
                Step::ScrollTo(300.0),
                Step::Resize {
                    width: 1024.0,
                    height: 768.0
                },
                Step::Snapshot("after".into()),
            ]
        );
    }

    #[test]
    fn test_parse_json_scene() {
        let scene = Scene::from_json(
            r#"{
                "components": [
                    { "key": "a", "height": 200, "div": { "type": "fade" } }
                ],
                "script": [ { "advance": 100 }, { "scroll_by": 50 } ]
            }"#,
        )
        .unwrap();

        assert_eq!(scene.viewport.width, 1280.0);
        assert_eq!(scene.components[0].widget.kind(), "div");
        assert_eq!(scene.script[1], Step::ScrollBy(50.0));
    }

    #[test]
    fn test_parse_errors_are_config_errors() {
        let err = Scene::from_toml("[[components]]\nkey = ").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<UnveilError>(),
            Some(UnveilError::Config(_))
        ));

        let err = Scene::from_json(r#"{ "components": [ { "key": 1 } ] }"#).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<UnveilError>(),
            Some(UnveilError::Config(_))
        ));
        assert!(err.to_string().starts_with("configuration error"));
    }

    #[test]
    fn test_load_keeps_path_context() {
        let path = std::env::temp_dir().join(format!("unveil-bad-{}.toml", std::process::id()));
        fs::write(&path, "gap = [").unwrap();

        let err = Scene::load(&path).unwrap_err();
        let _ = fs::remove_file(&path);

        assert!(err.to_string().starts_with("Failed to parse"));
        assert!(matches!(
            err.downcast_ref::<UnveilError>(),
            Some(UnveilError::Config(_))
        ));
    }

    #[test]
    fn test_validate_reports_bad_components() {
        let mut scene = Scene::from_toml(SCENE).unwrap();
        assert!(scene.validate().is_ok());

        scene.components[1].key = "hero".into();
        let err = scene.validate().unwrap_err();
        assert!(err.to_string().contains("Duplicate"));

        let mut scene = Scene::from_toml(SCENE).unwrap();
        if let WidgetConfig::Div(options) = &mut scene.components[0].widget {
            options.trigger_at = 2.0;
        }
        let err = scene.validate().unwrap_err();
        assert!(format!("{err:#}").contains("triggerAt"));
    }

    #[test]
    fn test_build_stage_mounts_components() {
        let scene = Scene::from_toml(SCENE).unwrap();
        let mut stage = scene.build_stage().unwrap();

        assert_eq!(stage.len(), 2);
        stage.advance(100);
        assert!(stage.get("hero").unwrap().visibility().visible);
        assert_eq!(stage.bounds_of("title").map(|r| r.y()), Some(440.0));
    }
}
