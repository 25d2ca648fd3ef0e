//! Unveil Core
//!
//! Foundational types shared by the unveil reveal components:
//!
//! - **Geometry**: points, sizes, and rectangles with visible-fraction math
//! - **Render tree**: class lists and style variables emitted by components
//! - **Intersection observer**: threshold-based viewport visibility tracking
//! - **Errors**: configuration validation errors
//!
//! # Example
//!
//! ```rust
//! use unveil_core::{IntersectionObserver, ObserverOptions, Rect};
//!
//! let mut observer = IntersectionObserver::new(ObserverOptions::new(0.1));
//! observer.observe();
//!
//! let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
//! let entry = observer.update(Rect::new(0.0, 100.0, 800.0, 200.0), viewport);
//! assert!(entry.unwrap().is_intersecting);
//! ```

pub mod error;
pub mod geometry;
pub mod node;
pub mod observer;

pub use error::{Result, UnveilError};
pub use geometry::{Point, Rect, Size};
pub use node::{ClassList, RenderNode, StyleMap, StyleValue};
pub use observer::{IntersectionEntry, IntersectionObserver, ObserverOptions, DEFAULT_THRESHOLD};

/// Milliseconds on the host's monotonic clock
pub type Millis = u64;
