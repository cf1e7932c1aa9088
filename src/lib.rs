//! Scrubline turns an ordered list of 2D drawing/transform commands into a
//! scrubbable timeline: render at any fractional position, forward or
//! backward, and animate smoothly between positions.
//!
//! # Pipeline overview
//!
//! 1. **Validate**: wire tuples (`RawCommand`) -> `CommandList` (strict or
//!    skip-and-warn policy)
//! 2. **Compile**: `CommandList` -> `Timeline` (cumulative matrices, resolved
//!    colors, per-step progress functions; pure and deterministic)
//! 3. **Evaluate**: `Timeline` + position -> draw calls on a `Surface`, plus
//!    an execution trace
//! 4. **Animate**: `Player` drives the position over caller-supplied
//!    timestamps with a chosen easing law
//!
//! Compiled timelines are immutable and safely shareable across renders;
//! independent `Player`s may drive the same timeline.

#![forbid(unsafe_code)]

pub mod anim;
pub mod anim_ease;
pub mod color;
pub mod command;
pub mod compile;
pub mod error;
pub mod eval;
pub mod render;
pub mod render_cpu;

pub use anim::Player;
pub use anim_ease::Ease;
pub use color::Rgba8;
pub use command::{Command, CommandError, CommandList, ListEntry, RawCommand};
pub use compile::{
    CompiledStep, DEFAULT_FILL, DEFAULT_STROKE, StackKind, StackWarning, Timeline, ValidationMode,
    compile, compile_raw,
};
pub use error::{ScrublineError, ScrublineResult};
pub use eval::{Direction, RenderOptions, RenderOutput, ReverseConvention, render};
pub use render::{
    BACKWARD_CURRENT_FRAME_COLOR, BACKWARD_START_FRAME_COLOR, FORWARD_CURRENT_FRAME_COLOR,
    FORWARD_START_FRAME_COLOR, GRID_SIZE, RecordedOp, RecordingSurface, Surface, arc_path,
    draw_axes, rect_path, triangle_path,
};
pub use render_cpu::{FrameRgba, PixmapSurface};
