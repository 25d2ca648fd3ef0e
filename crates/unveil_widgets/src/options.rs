//! Option contracts for the reveal components
//!
//! Options deserialize from the same shape used by markup-style configs: a
//! `type` discriminator plus camelCase fields.
//!
//! ```rust
//! use unveil_widgets::options::{BlockAnimation, DivOptions, SlideOrigin};
//!
//! let opts: DivOptions = serde_json::from_str(
//!     r#"{ "type": "slide", "origin": "left", "hasMomentum": true, "onlyOnce": true }"#,
//! ).unwrap();
//!
//! assert!(matches!(
//!     opts.animation,
//!     BlockAnimation::Slide { origin: SlideOrigin::Left, has_momentum: true, .. }
//! ));
//! assert_eq!(opts.duration, 1000);
//! ```
//!
//! Missing optional values take their documented defaults. Components never
//! reject values; [`DivOptions::validate`] and [`TextOptions::validate`] are
//! for configuration front ends that want to report mistakes.

use serde::{Deserialize, Serialize};
use unveil_animation::{TriggerOptions, DEFAULT_TRIGGER_DELAY};
use unveil_core::error::{ensure_finite, ensure_fraction, ensure_non_negative};
use unveil_core::{Millis, Result, UnveilError, DEFAULT_THRESHOLD};

/// Default block animation duration
pub const DEFAULT_DURATION: Millis = 1000;
/// Default typewriter step
pub const DEFAULT_LATTER_DELAY: Millis = 100;
/// Default per-character fade step
pub const DEFAULT_FADE_DURATION: Millis = 500;
/// Default scramble step
pub const DEFAULT_SCRAMBLE_DURATION: Millis = 100;
/// Default number of substitutions per character
pub const DEFAULT_RANDOMS: u32 = 5;

fn default_duration() -> Millis {
    DEFAULT_DURATION
}

fn default_delay() -> Millis {
    DEFAULT_TRIGGER_DELAY
}

fn default_trigger_at() -> f32 {
    DEFAULT_THRESHOLD
}

// ============================================================================
// Block animation parameters
// ============================================================================

/// Transform origin for zoom animations
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pivot {
    #[default]
    Center,
    Top,
    Bottom,
    Left,
    Right,
}

impl Pivot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pivot::Center => "center",
            Pivot::Top => "top",
            Pivot::Bottom => "bottom",
            Pivot::Left => "left",
            Pivot::Right => "right",
        }
    }
}

/// Axis of a flip animation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlipDirection {
    LeftRight,
    TopBottom,
    /// Any other value; renders no animation class
    #[serde(other)]
    Unknown,
}

/// Edge a slide animation starts from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideOrigin {
    Left,
    Right,
    Top,
    Bottom,
}

impl SlideOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlideOrigin::Left => "left",
            SlideOrigin::Right => "right",
            SlideOrigin::Top => "top",
            SlideOrigin::Bottom => "bottom",
        }
    }

    /// Slides from the left or top travel in the negative direction
    pub fn is_negative(&self) -> bool {
        matches!(self, SlideOrigin::Left | SlideOrigin::Top)
    }
}

/// Rotation sense of a roll animation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RollDirection {
    Clock,
    AntiClock,
}

impl RollDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            RollDirection::Clock => "clock",
            RollDirection::AntiClock => "anti-clock",
        }
    }
}

/// CSS timing function applied to block animations
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimingFunction {
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Leave the stylesheet default in place
    Auto,
}

impl TimingFunction {
    /// CSS keyword, or `None` for [`TimingFunction::Auto`]
    pub fn as_css(&self) -> Option<&'static str> {
        match self {
            TimingFunction::Linear => Some("linear"),
            TimingFunction::Ease => Some("ease"),
            TimingFunction::EaseIn => Some("ease-in"),
            TimingFunction::EaseOut => Some("ease-out"),
            TimingFunction::EaseInOut => Some("ease-in-out"),
            TimingFunction::Auto => None,
        }
    }
}

/// Animation recipe applied by [`RevealDiv`](crate::div::RevealDiv)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum BlockAnimation {
    Fade,
    Flicker,
    Zoom {
        initial_zoom: f64,
        #[serde(default)]
        has_bounce: bool,
        #[serde(default)]
        bounce_factor: Option<f64>,
        #[serde(default)]
        pivot: Option<Pivot>,
    },
    Flip {
        direction: FlipDirection,
    },
    Slide {
        origin: SlideOrigin,
        /// Percentage of the element size
        #[serde(default)]
        distance: Option<f64>,
        #[serde(default)]
        has_momentum: bool,
    },
    Blur {
        /// Pixels
        amount: f64,
    },
    Scale {
        initial_scale: (f64, f64),
    },
    Roll {
        direction: RollDirection,
    },
}

impl BlockAnimation {
    pub fn zoom(initial_zoom: f64) -> Self {
        BlockAnimation::Zoom {
            initial_zoom,
            has_bounce: false,
            bounce_factor: None,
            pivot: None,
        }
    }

    pub fn slide(origin: SlideOrigin) -> Self {
        BlockAnimation::Slide {
            origin,
            distance: None,
            has_momentum: false,
        }
    }

    pub fn flip(direction: FlipDirection) -> Self {
        BlockAnimation::Flip { direction }
    }

    pub fn blur(amount: f64) -> Self {
        BlockAnimation::Blur { amount }
    }

    pub fn scale(x: f64, y: f64) -> Self {
        BlockAnimation::Scale {
            initial_scale: (x, y),
        }
    }

    pub fn roll(direction: RollDirection) -> Self {
        BlockAnimation::Roll { direction }
    }

    /// The `type` discriminator
    pub fn kind(&self) -> &'static str {
        match self {
            BlockAnimation::Fade => "fade",
            BlockAnimation::Flicker => "flicker",
            BlockAnimation::Zoom { .. } => "zoom",
            BlockAnimation::Flip { .. } => "flip",
            BlockAnimation::Slide { .. } => "slide",
            BlockAnimation::Blur { .. } => "blur",
            BlockAnimation::Scale { .. } => "scale",
            BlockAnimation::Roll { .. } => "roll",
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            BlockAnimation::Fade | BlockAnimation::Flicker => Ok(()),
            BlockAnimation::Zoom {
                initial_zoom,
                bounce_factor,
                ..
            } => {
                ensure_non_negative("initialZoom", *initial_zoom)?;
                if let Some(factor) = bounce_factor {
                    ensure_finite("bounceFactor", *factor)?;
                    if *factor <= 0.0 {
                        return Err(UnveilError::invalid(
                            "bounceFactor",
                            format!("must be positive, got {factor}"),
                        ));
                    }
                }
                Ok(())
            }
            BlockAnimation::Flip { .. } | BlockAnimation::Roll { .. } => Ok(()),
            BlockAnimation::Slide { distance, .. } => match distance {
                Some(d) => ensure_non_negative("distance", *d),
                None => Ok(()),
            },
            BlockAnimation::Blur { amount } => ensure_non_negative("amount", *amount),
            BlockAnimation::Scale { initial_scale } => {
                ensure_finite("initialScale", initial_scale.0)?;
                ensure_finite("initialScale", initial_scale.1)
            }
        }
    }
}

// ============================================================================
// Block wrapper options
// ============================================================================

/// Options for [`RevealDiv`](crate::div::RevealDiv)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivOptions {
    #[serde(flatten)]
    pub animation: BlockAnimation,
    /// Animation length in ms
    #[serde(default = "default_duration")]
    pub duration: Millis,
    /// Delay between an intersection change and the visibility flip
    #[serde(default = "default_delay")]
    pub delay: Millis,
    /// Visible fraction that counts as "in view"
    #[serde(default = "default_trigger_at")]
    pub trigger_at: f32,
    /// Viewport margin in pixels
    #[serde(default)]
    pub root_margin: f32,
    /// Settle after the first complete animation
    #[serde(default)]
    pub only_once: bool,
    #[serde(default, rename = "function")]
    pub timing_function: Option<TimingFunction>,
}

impl DivOptions {
    pub fn new(animation: BlockAnimation) -> Self {
        Self {
            animation,
            duration: DEFAULT_DURATION,
            delay: DEFAULT_TRIGGER_DELAY,
            trigger_at: DEFAULT_THRESHOLD,
            root_margin: 0.0,
            only_once: false,
            timing_function: None,
        }
    }

    pub fn with_duration(mut self, ms: Millis) -> Self {
        self.duration = ms;
        self
    }

    pub fn with_delay(mut self, ms: Millis) -> Self {
        self.delay = ms;
        self
    }

    pub fn with_trigger_at(mut self, fraction: f32) -> Self {
        self.trigger_at = fraction;
        self
    }

    pub fn with_root_margin(mut self, px: f32) -> Self {
        self.root_margin = px;
        self
    }

    pub fn with_only_once(mut self, only_once: bool) -> Self {
        self.only_once = only_once;
        self
    }

    pub fn with_timing_function(mut self, function: TimingFunction) -> Self {
        self.timing_function = Some(function);
        self
    }

    pub fn trigger_options(&self) -> TriggerOptions {
        TriggerOptions {
            threshold: self.trigger_at,
            root_margin: self.root_margin,
            delay: self.delay,
            only_once: self.only_once,
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure_fraction("triggerAt", self.trigger_at as f64)?;
        ensure_finite("rootMargin", self.root_margin as f64)?;
        self.animation.validate()
    }
}

impl From<BlockAnimation> for DivOptions {
    fn from(animation: BlockAnimation) -> Self {
        Self::new(animation)
    }
}

// ============================================================================
// Text wrapper options
// ============================================================================

/// Reveal sequence run by [`RevealText`](crate::text::RevealText)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum TextAnimation {
    /// Characters appear one at a time behind a cursor
    Typewriter {
        #[serde(default)]
        hide_cursor: bool,
        #[serde(default)]
        latter_delay: Option<Millis>,
    },
    /// Characters fade in one at a time
    Fade {
        #[serde(default)]
        duration: Option<Millis>,
    },
    /// Characters cycle through random substitutes before settling
    Random {
        #[serde(default)]
        alphabet_only: bool,
        #[serde(default)]
        number_only: bool,
        #[serde(default)]
        duration: Option<Millis>,
        #[serde(default)]
        randoms: Option<u32>,
    },
}

impl TextAnimation {
    pub fn typewriter() -> Self {
        TextAnimation::Typewriter {
            hide_cursor: false,
            latter_delay: None,
        }
    }

    pub fn fade() -> Self {
        TextAnimation::Fade { duration: None }
    }

    pub fn random() -> Self {
        TextAnimation::Random {
            alphabet_only: false,
            number_only: false,
            duration: None,
            randoms: None,
        }
    }

    /// The `type` discriminator
    pub fn kind(&self) -> &'static str {
        match self {
            TextAnimation::Typewriter { .. } => "typewriter",
            TextAnimation::Fade { .. } => "fade",
            TextAnimation::Random { .. } => "random",
        }
    }

    pub fn is_typewriter(&self) -> bool {
        matches!(self, TextAnimation::Typewriter { .. })
    }

    /// Interval between sequence steps; zero or missing values use the default
    pub fn step_period(&self) -> Millis {
        let (value, default) = match self {
            TextAnimation::Typewriter { latter_delay, .. } => (*latter_delay, DEFAULT_LATTER_DELAY),
            TextAnimation::Fade { duration } => (*duration, DEFAULT_FADE_DURATION),
            TextAnimation::Random { duration, .. } => (*duration, DEFAULT_SCRAMBLE_DURATION),
        };
        value.filter(|v| *v > 0).unwrap_or(default)
    }

    /// Substitutions per character in random mode
    pub fn randoms(&self) -> u32 {
        match self {
            TextAnimation::Random { randoms, .. } => {
                randoms.filter(|r| *r > 0).unwrap_or(DEFAULT_RANDOMS)
            }
            _ => 0,
        }
    }
}

/// Options for [`RevealText`](crate::text::RevealText)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOptions {
    pub content: String,
    #[serde(flatten)]
    pub animation: TextAnimation,
    #[serde(default = "default_delay")]
    pub delay: Millis,
    #[serde(default = "default_trigger_at")]
    pub trigger_at: f32,
    #[serde(default)]
    pub root_margin: f32,
    /// Keep the revealed text once the sequence has completed
    #[serde(default)]
    pub only_once: bool,
}

impl TextOptions {
    pub fn new(content: impl Into<String>, animation: TextAnimation) -> Self {
        Self {
            content: content.into(),
            animation,
            delay: DEFAULT_TRIGGER_DELAY,
            trigger_at: DEFAULT_THRESHOLD,
            root_margin: 0.0,
            only_once: false,
        }
    }

    pub fn with_delay(mut self, ms: Millis) -> Self {
        self.delay = ms;
        self
    }

    pub fn with_trigger_at(mut self, fraction: f32) -> Self {
        self.trigger_at = fraction;
        self
    }

    pub fn with_root_margin(mut self, px: f32) -> Self {
        self.root_margin = px;
        self
    }

    pub fn with_only_once(mut self, only_once: bool) -> Self {
        self.only_once = only_once;
        self
    }

    pub fn trigger_options(&self) -> TriggerOptions {
        TriggerOptions {
            threshold: self.trigger_at,
            root_margin: self.root_margin,
            delay: self.delay,
            only_once: self.only_once,
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure_fraction("triggerAt", self.trigger_at as f64)?;
        ensure_finite("rootMargin", self.root_margin as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_defaults_from_json() {
        let opts: DivOptions = serde_json::from_str(r#"{ "type": "fade" }"#).unwrap();

        assert_eq!(opts.animation, BlockAnimation::Fade);
        assert_eq!(opts.duration, 1000);
        assert_eq!(opts.delay, 100);
        assert_eq!(opts.trigger_at, 0.1);
        assert!(!opts.only_once);
        assert_eq!(opts.timing_function, None);
    }

    #[test]
    fn test_zoom_from_json() {
        let opts: DivOptions = serde_json::from_str(
            r#"{ "type": "zoom", "initialZoom": 0.5, "hasBounce": true, "pivot": "top", "function": "ease-in-out" }"#,
        )
        .unwrap();

        assert_eq!(
            opts.animation,
            BlockAnimation::Zoom {
                initial_zoom: 0.5,
                has_bounce: true,
                bounce_factor: None,
                pivot: Some(Pivot::Top),
            }
        );
        assert_eq!(opts.timing_function, Some(TimingFunction::EaseInOut));
    }

    #[test]
    fn test_unknown_flip_direction_is_accepted() {
        let opts: DivOptions =
            serde_json::from_str(r#"{ "type": "flip", "direction": "diagonal" }"#).unwrap();

        assert_eq!(opts.animation, BlockAnimation::flip(FlipDirection::Unknown));
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_scale_and_roll_from_toml() {
        let scale: DivOptions = toml::from_str(
            r#"
            type = "scale"
            initialScale = [0.5, 2.0]
            onlyOnce = true
            "#,
        )
        .unwrap();
        assert_eq!(scale.animation, BlockAnimation::scale(0.5, 2.0));
        assert!(scale.only_once);

        let roll: DivOptions = toml::from_str(
            r#"
            type = "roll"
            direction = "anti-clock"
            duration = 600
            "#,
        )
        .unwrap();
        assert_eq!(roll.animation, BlockAnimation::roll(RollDirection::AntiClock));
        assert_eq!(roll.duration, 600);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result: std::result::Result<DivOptions, _> =
            serde_json::from_str(r#"{ "type": "explode" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_block_validation() {
        assert!(DivOptions::new(BlockAnimation::Fade).validate().is_ok());
        assert!(DivOptions::new(BlockAnimation::Fade)
            .with_trigger_at(1.5)
            .validate()
            .is_err());
        assert!(DivOptions::new(BlockAnimation::blur(-2.0)).validate().is_err());
        assert!(DivOptions::new(BlockAnimation::Zoom {
            initial_zoom: 0.5,
            has_bounce: true,
            bounce_factor: Some(0.0),
            pivot: None,
        })
        .validate()
        .is_err());
        assert!(DivOptions::new(BlockAnimation::scale(f64::NAN, 1.0))
            .validate()
            .is_err());
    }

    #[test]
    fn test_text_options_from_json() {
        let opts: TextOptions = serde_json::from_str(
            r#"{ "content": "Hi", "type": "random", "randoms": 2, "duration": 10, "numberOnly": true }"#,
        )
        .unwrap();

        assert_eq!(opts.content, "Hi");
        assert_eq!(opts.animation.randoms(), 2);
        assert_eq!(opts.animation.step_period(), 10);
        assert_eq!(opts.delay, 100);
    }

    #[test]
    fn test_text_step_defaults() {
        assert_eq!(TextAnimation::typewriter().step_period(), 100);
        assert_eq!(TextAnimation::fade().step_period(), 500);
        assert_eq!(TextAnimation::random().step_period(), 100);
        assert_eq!(TextAnimation::random().randoms(), 5);

        let zeroed = TextAnimation::Random {
            alphabet_only: false,
            number_only: false,
            duration: Some(0),
            randoms: Some(0),
        };
        assert_eq!(zeroed.step_period(), 100);
        assert_eq!(zeroed.randoms(), 5);
    }

    #[test]
    fn test_trigger_options_mirror_fields() {
        let opts = DivOptions::new(BlockAnimation::Fade)
            .with_delay(250)
            .with_trigger_at(0.5)
            .with_only_once(true);
        let trigger = opts.trigger_options();

        assert_eq!(trigger.delay, 250);
        assert_eq!(trigger.threshold, 0.5);
        assert!(trigger.only_once);
    }
}
