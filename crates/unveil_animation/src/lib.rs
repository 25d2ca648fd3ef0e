//! Unveil Animation Runtime
//!
//! Time-driven plumbing shared by the reveal components.
//!
//! # Features
//!
//! - **Timer queue**: per-instance timeouts and intervals on a virtual clock,
//!   addressed by cancellable [`TimerId`] handles
//! - **Timer groups**: every timer of one animation run, cancelled together
//! - **Visibility trigger**: delayed, optionally one-shot visibility state
//!   driven by an intersection observer

pub mod timer;
pub mod visibility;

pub use timer::{TimerGroup, TimerId, TimerQueue};
pub use visibility::{
    TriggerOptions, VisibilityChange, VisibilityFlip, VisibilityState, VisibilityTrigger,
    DEFAULT_TRIGGER_DELAY,
};
