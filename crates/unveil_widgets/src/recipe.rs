//! Block animation recipes
//!
//! A recipe is the fixed mapping from a [`BlockAnimation`] to the class name
//! the stylesheet animates and the style variables its keyframes read. The
//! mapping is pure; [`RevealDiv`](crate::div::RevealDiv) recomputes it
//! whenever timing options change.

use unveil_core::{Millis, StyleMap, StyleValue};

use crate::options::{BlockAnimation, DivOptions, FlipDirection, TimingFunction};

/// Class of an inner node whose container is out of view
pub const NOT_IN_VIEWPORT_CLASS: &str = "scroll-not-in-port";
/// Class of an inner node that has settled after an only-once animation
pub const SETTLED_CLASS: &str = "once-only";
/// Class of the observed outer container
pub const DIV_CONTAINER_CLASS: &str = "scroll-animation-div";

/// Bounce overshoot when zooming in from below 1
pub const DEFAULT_BOUNCE_UP: f64 = 1.1;
/// Bounce overshoot when zooming out from above 1
pub const DEFAULT_BOUNCE_DOWN: f64 = 0.9;
/// Slide distance in percent
pub const DEFAULT_SLIDE_DISTANCE: f64 = 50.0;

/// Class and style variables for one block animation
#[derive(Clone, Debug, PartialEq)]
pub struct Recipe {
    class: String,
    vars: StyleMap,
}

impl Recipe {
    pub fn new(
        animation: &BlockAnimation,
        duration: Millis,
        timing: Option<TimingFunction>,
    ) -> Self {
        let mut vars = StyleMap::new();
        vars.insert("--duration".into(), StyleValue::millis(duration));
        if let Some(css) = timing.and_then(|t| t.as_css()) {
            vars.insert("--timing-function".into(), StyleValue::text(css));
        }

        let class = match animation {
            BlockAnimation::Fade => "fade".to_string(),
            BlockAnimation::Flicker => "flicker".to_string(),
            BlockAnimation::Zoom {
                initial_zoom,
                has_bounce,
                bounce_factor,
                pivot,
            } => {
                let (up, down) = bounce_factors(*initial_zoom, *bounce_factor);
                vars.insert("--zoom".into(), StyleValue::number(*initial_zoom));
                vars.insert("--bounce-factor-up".into(), StyleValue::number(up));
                vars.insert("--bounce-factor-down".into(), StyleValue::number(down));

                let base = if *has_bounce { "zoom-bounce" } else { "zoom" };
                format!("{base} zoom-{}", pivot.unwrap_or_default().as_str())
            }
            BlockAnimation::Flip { direction } => match direction {
                FlipDirection::LeftRight => "flip-left-right".to_string(),
                FlipDirection::TopBottom => "flip-top-bottom".to_string(),
                FlipDirection::Unknown => String::new(),
            },
            BlockAnimation::Slide {
                origin,
                distance,
                has_momentum,
            } => {
                vars.insert(
                    "--slide-distance".into(),
                    StyleValue::percent(slide_distance(origin.is_negative(), *distance)),
                );
                let skew = if *has_momentum { "-skew" } else { "" };
                format!("slide slide-{}{skew}", origin.as_str())
            }
            BlockAnimation::Blur { amount } => {
                vars.insert("--blur-amount".into(), StyleValue::px(*amount));
                "blur".to_string()
            }
            BlockAnimation::Scale { initial_scale } => {
                vars.insert("--scale-anim-x".into(), StyleValue::number(initial_scale.0));
                vars.insert("--scale-anim-y".into(), StyleValue::number(initial_scale.1));
                "scale".to_string()
            }
            BlockAnimation::Roll { direction } => format!("roll roll-{}", direction.as_str()),
        };

        Self { class, vars }
    }

    pub fn for_options(options: &DivOptions) -> Self {
        Self::new(&options.animation, options.duration, options.timing_function)
    }

    /// Class applied while visible (may be empty)
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn vars(&self) -> &StyleMap {
        &self.vars
    }

    pub fn var(&self, name: &str) -> Option<&StyleValue> {
        self.vars.get(name)
    }
}

/// Bounce overshoot pair for a zoom starting at `initial_zoom`
///
/// The "up" factor always moves toward 1: above 1 when zooming in from
/// `initial_zoom <= 1`, below 1 otherwise. "down" is its reciprocal.
/// Missing, non-finite, or non-positive factors use the defaults.
pub fn bounce_factors(initial_zoom: f64, bounce_factor: Option<f64>) -> (f64, f64) {
    let factor = bounce_factor.filter(|f| f.is_finite() && *f > 0.0);
    let up = if initial_zoom <= 1.0 {
        factor.unwrap_or(DEFAULT_BOUNCE_UP)
    } else {
        factor.map(|f| 1.0 / f).unwrap_or(DEFAULT_BOUNCE_DOWN)
    };
    (up, 1.0 / up)
}

/// Signed slide distance in percent
fn slide_distance(negative: bool, distance: Option<f64>) -> f64 {
    let magnitude = distance
        .filter(|d| d.is_finite() && *d != 0.0)
        .unwrap_or(DEFAULT_SLIDE_DISTANCE);
    if negative {
        -magnitude
    } else {
        magnitude
    }
}
