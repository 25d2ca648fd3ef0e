//! Stylesheet for the emitted class names
//!
//! Keyframes read the style variables set by [`Recipe`](crate::recipe::Recipe)
//! on the container (`--duration`, `--zoom`, `--slide-distance`, ...). Hosts
//! that render the tree into a document include this once.

/// CSS implementing every class the reveal components emit
pub const STYLESHEET: &str = r#"
.scroll-animation-div {
  --duration: 1000ms;
  --timing-function: ease;
  overflow: visible;
}

.scroll-not-in-port {
  opacity: 0;
}

.once-only {
  opacity: 1;
  animation: none;
}

.fade,
.flicker,
.zoom,
.zoom-bounce,
.flip-left-right,
.flip-top-bottom,
.slide,
.blur,
.scale,
.roll {
  animation-duration: var(--duration);
  animation-timing-function: var(--timing-function);
  animation-fill-mode: both;
}

.fade { animation-name: unveil-fade; }
@keyframes unveil-fade {
  from { opacity: 0; }
  to { opacity: 1; }
}

.flicker { animation-name: unveil-flicker; }
@keyframes unveil-flicker {
  0% { opacity: 0; }
  10% { opacity: 1; }
  20% { opacity: 0; }
  40% { opacity: 1; }
  50% { opacity: 0.2; }
  70% { opacity: 1; }
  80% { opacity: 0.4; }
  100% { opacity: 1; }
}

.zoom-center { transform-origin: center; }
.zoom-top { transform-origin: top; }
.zoom-bottom { transform-origin: bottom; }
.zoom-left { transform-origin: left; }
.zoom-right { transform-origin: right; }

.zoom { animation-name: unveil-zoom; }
@keyframes unveil-zoom {
  from { opacity: 0; transform: scale(var(--zoom)); }
  to { opacity: 1; transform: scale(1); }
}

.zoom-bounce { animation-name: unveil-zoom-bounce; }
@keyframes unveil-zoom-bounce {
  0% { opacity: 0; transform: scale(var(--zoom)); }
  60% { opacity: 1; transform: scale(var(--bounce-factor-up)); }
  80% { transform: scale(var(--bounce-factor-down)); }
  100% { transform: scale(1); }
}

.flip-left-right { animation-name: unveil-flip-left-right; }
@keyframes unveil-flip-left-right {
  from { opacity: 0; transform: perspective(800px) rotateY(90deg); }
  to { opacity: 1; transform: perspective(800px) rotateY(0); }
}

.flip-top-bottom { animation-name: unveil-flip-top-bottom; }
@keyframes unveil-flip-top-bottom {
  from { opacity: 0; transform: perspective(800px) rotateX(90deg); }
  to { opacity: 1; transform: perspective(800px) rotateX(0); }
}

.slide-left,
.slide-right { animation-name: unveil-slide-x; }
.slide-top,
.slide-bottom { animation-name: unveil-slide-y; }
.slide-left-skew,
.slide-right-skew { animation-name: unveil-slide-x-skew; }
.slide-top-skew,
.slide-bottom-skew { animation-name: unveil-slide-y-skew; }

@keyframes unveil-slide-x {
  from { opacity: 0; transform: translateX(var(--slide-distance)); }
  to { opacity: 1; transform: translateX(0); }
}
@keyframes unveil-slide-y {
  from { opacity: 0; transform: translateY(var(--slide-distance)); }
  to { opacity: 1; transform: translateY(0); }
}
@keyframes unveil-slide-x-skew {
  0% { opacity: 0; transform: translateX(var(--slide-distance)) skewX(-20deg); }
  70% { opacity: 1; transform: translateX(0) skewX(8deg); }
  100% { transform: translateX(0) skewX(0); }
}
@keyframes unveil-slide-y-skew {
  0% { opacity: 0; transform: translateY(var(--slide-distance)) skewY(-10deg); }
  70% { opacity: 1; transform: translateY(0) skewY(4deg); }
  100% { transform: translateY(0) skewY(0); }
}

.blur { animation-name: unveil-blur; }
@keyframes unveil-blur {
  from { opacity: 0; filter: blur(var(--blur-amount)); }
  to { opacity: 1; filter: blur(0); }
}

.scale { animation-name: unveil-scale; }
@keyframes unveil-scale {
  from { opacity: 0; transform: scale(var(--scale-anim-x), var(--scale-anim-y)); }
  to { opacity: 1; transform: scale(1, 1); }
}

.roll-clock { animation-name: unveil-roll-clock; }
.roll-anti-clock { animation-name: unveil-roll-anti-clock; }
@keyframes unveil-roll-clock {
  from { opacity: 0; transform: translateX(-100%) rotate(-120deg); }
  to { opacity: 1; transform: translateX(0) rotate(0); }
}
@keyframes unveil-roll-anti-clock {
  from { opacity: 0; transform: translateX(100%) rotate(120deg); }
  to { opacity: 1; transform: translateX(0) rotate(0); }
}

.scroll-animation-text h1 {
  white-space: pre-wrap;
}

.scroll-anim-text-char {
  display: inline-block;
  white-space: pre;
}

.scroll-anim-text-char.hide {
  visibility: hidden;
}

.scroll-text-cursor {
  border-right: 0.08em solid currentColor;
}

.scroll-text-caret .scroll-anim-text-char:last-child {
  min-width: 0.08em;
}

@keyframes type {
  from { border-right-color: currentColor; }
  to { border-right-color: transparent; }
}

@keyframes fade {
  from { opacity: 0; }
  to { opacity: 1; }
}

@keyframes cursor {
  0% { border-right-color: currentColor; }
  50% { border-right-color: transparent; }
}
"#;
