//! Unveil Reveal Components
//!
//! Scroll-triggered reveal effects as headless components. Each component
//! watches its container against the viewport, flips its visibility a short
//! delay after the container crosses the threshold, and renders a tree of
//! class names and style variables that the bundled [`STYLESHEET`] animates.
//!
//! # Components
//!
//! 1. **[`RevealDiv`]**: wraps arbitrary children and plays one of eight
//!    block recipes (fade, flicker, zoom, flip, slide, blur, scale, roll)
//!    each time it enters the viewport.
//!
//! 2. **[`RevealText`]**: reveals a string one character at a time as a
//!    typewriter, a per-character fade, or a random scramble.
//!
//! 3. **[`Stage`]**: a scrollable vertical stack that hosts components
//!    without a document, for tests and command-line simulation.
//!
//! Components never read a wall clock. The host advances them explicitly, so
//! every sequence is reproducible.
//!
//! # Example
//!
//! ```rust
//! use unveil_core::Size;
//! use unveil_widgets::prelude::*;
//!
//! let mut stage = Stage::new(Size::new(800.0, 600.0));
//! stage.push("hero", 300.0, reveal_div(BlockAnimation::Fade)).unwrap();
//! stage
//!     .push("title", 100.0, reveal_text("Hi", TextAnimation::typewriter()))
//!     .unwrap();
//!
//! stage.advance(1000);
//! assert!(stage.get("hero").unwrap().visibility().visible);
//! assert_eq!(stage.render().text_content(), "Hi");
//! ```

pub mod charset;
pub mod component;
pub mod div;
pub mod options;
pub mod recipe;
pub mod stage;
pub mod stylesheet;
pub mod text;

pub use charset::CharPool;
pub use component::Reveal;
pub use div::{reveal_div, DivChild, RevealDiv};
pub use options::{
    BlockAnimation, DivOptions, FlipDirection, Pivot, RollDirection, SlideOrigin, TextAnimation,
    TextOptions, TimingFunction,
};
pub use recipe::Recipe;
pub use stage::{ComponentSnapshot, Stage, StageSnapshot};
pub use stylesheet::STYLESHEET;
pub use text::{reveal_text, CharUnit, RevealText, RunState};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::component::Reveal;
    pub use crate::div::{reveal_div, RevealDiv};
    pub use crate::options::{
        BlockAnimation, DivOptions, FlipDirection, Pivot, RollDirection, SlideOrigin,
        TextAnimation, TextOptions, TimingFunction,
    };
    pub use crate::stage::Stage;
    pub use crate::text::{reveal_text, RevealText};
}
