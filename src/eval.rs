//! Timeline evaluation: render the scene at a continuous position along the
//! list and produce a textual execution trace.
//!
//! Forward and backward playback are genuinely different rendering
//! strategies, not one parameterized code path. Forward composes each
//! command inside the transform chain of itself and everything before it;
//! backward accumulates partial effects flat against one shared running
//! frame ("time travel from the last object's point of view").

use kurbo::Affine;

use crate::{
    color::Rgba8,
    command::{Command, ListEntry},
    compile::{CompiledStep, DEFAULT_FILL, DEFAULT_STROKE, Timeline},
    error::{ScrublineError, ScrublineResult},
    render::{Surface, arc_path, rect_path, triangle_path},
};

/// Stroke width used by the stroke drawing commands, in scene units.
const COMMAND_STROKE_WIDTH: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// How a backward render maps the incoming param to an effective position:
/// either unchanged, or mirrored to `len - param` so the scrub axis keeps
/// its forward orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ReverseConvention {
    #[default]
    Direct,
    Mirrored,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RenderOptions {
    pub direction: Direction,
    pub reverse_convention: ReverseConvention,
}

#[derive(Clone, Debug)]
pub struct RenderOutput {
    /// Execution trace, one block per command, current line marked.
    pub trace: String,
    /// Frame of the last command with nonzero progress; the caller draws its
    /// current-reference-frame marker here.
    pub current_frame: Affine,
}

/// Render `timeline` at `param` onto `surface`.
///
/// `param` ranges over `[0, len]` and is clamped before use. An empty
/// timeline renders nothing and is not an error. Backward rendering of a
/// list containing Save/Restore is refused.
#[tracing::instrument(skip(timeline, surface), fields(len = timeline.len()))]
pub fn render(
    timeline: &Timeline,
    surface: &mut dyn Surface,
    param: f64,
    options: &RenderOptions,
) -> ScrublineResult<RenderOutput> {
    let n = timeline.len() as f64;
    let param = if param.is_finite() {
        param.clamp(0.0, n)
    } else {
        0.0
    };

    if timeline.is_empty() {
        return Ok(RenderOutput {
            trace: String::new(),
            current_frame: Affine::IDENTITY,
        });
    }

    match options.direction {
        Direction::Forward => {
            let mut current = Affine::IDENTITY;
            for (i, step) in timeline.steps().iter().enumerate() {
                let amt = (param - i as f64).clamp(0.0, 1.0);
                if amt > 0.0 {
                    // Nested: the step's own frame already contains every
                    // prior command via its cumulative prev matrix.
                    let frame = step.matrix_at(amt);
                    draw_step(surface, step, frame, amt);
                    current = frame;
                }
            }
            Ok(RenderOutput {
                trace: trace_text(timeline, param, options.direction),
                current_frame: current,
            })
        }
        Direction::Backward => {
            if !timeline.supports_backward() {
                return Err(ScrublineError::mode(
                    "backward playback is not valid for lists containing save/restore",
                ));
            }
            let effective = match options.reverse_convention {
                ReverseConvention::Direct => param,
                ReverseConvention::Mirrored => n - param,
            };

            let mut running = Affine::IDENTITY;
            for (i, step) in timeline.steps().iter().enumerate() {
                let amt = ((i + 1) as f64 - effective).clamp(0.0, 1.0);
                if amt > 0.0 {
                    // Flat: every partial effect lands on one shared frame.
                    running = running * step.step_matrix(amt);
                    draw_step(surface, step, running, amt);
                }
            }
            Ok(RenderOutput {
                trace: trace_text(timeline, effective, options.direction),
                current_frame: running,
            })
        }
    }
}

fn draw_step(surface: &mut dyn Surface, step: &CompiledStep, frame: Affine, amt: f64) {
    let Some(cmd) = &step.command else { return };
    match *cmd {
        Command::FillRect { x, y, w, h, .. } => {
            surface.fill_path(&rect_path(x, y, w, h), frame, step.fill_at(amt));
        }
        Command::StrokeRect { x, y, w, h, .. } => {
            surface.stroke_path(
                &rect_path(x, y, w, h),
                frame,
                step.stroke_at(amt),
                COMMAND_STROKE_WIDTH,
            );
        }
        Command::FillTriangle { x1, y1, x2, y2, x3, y3, .. } => {
            surface.fill_path(
                &triangle_path(x1, y1, x2, y2, x3, y3),
                frame,
                step.fill_at(amt),
            );
        }
        Command::StrokeTriangle { x1, y1, x2, y2, x3, y3, .. } => {
            surface.stroke_path(
                &triangle_path(x1, y1, x2, y2, x3, y3),
                frame,
                step.stroke_at(amt),
                COMMAND_STROKE_WIDTH,
            );
        }
        Command::FillArc { x, y, radius, start_deg, end_deg, ccw, .. } => {
            surface.fill_path(
                &arc_path(x, y, radius, start_deg, end_deg, ccw, true),
                frame,
                step.fill_at(amt),
            );
        }
        Command::StrokeArc { x, y, radius, start_deg, end_deg, ccw, .. } => {
            surface.stroke_path(
                &arc_path(x, y, radius, start_deg, end_deg, ccw, false),
                frame,
                step.stroke_at(amt),
                COMMAND_STROKE_WIDTH,
            );
        }
        _ => {}
    }
}

/// Build the execution trace at `effective` position. The command currently
/// mid-interpolation is marked with `>`; every other line is indented to
/// match.
fn trace_text(timeline: &Timeline, effective: f64, direction: Direction) -> String {
    let mut out = String::new();
    let steps = timeline.steps();
    for (i, entry) in timeline.list().entries().iter().enumerate() {
        let amt = (effective - i as f64).clamp(0.0, 1.0);
        let t = match direction {
            Direction::Forward => amt,
            Direction::Backward => 1.0 - amt,
        };
        let active = (i as f64) < effective && effective < (i + 1) as f64;
        let marker = if active { "> " } else { "  " };

        for line in entry_lines(entry, steps, i, t) {
            out.push_str(marker);
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

fn changed_fill(steps: &[CompiledStep], i: usize) -> bool {
    if i == 0 {
        steps[0].fill_after != DEFAULT_FILL
    } else {
        steps[i].fill_after != steps[i - 1].fill_after
    }
}

fn changed_stroke(steps: &[CompiledStep], i: usize) -> bool {
    if i == 0 {
        steps[0].stroke_after != DEFAULT_STROKE
    } else {
        steps[i].stroke_after != steps[i - 1].stroke_after
    }
}

fn entry_lines(entry: &ListEntry, steps: &[CompiledStep], i: usize, t: f64) -> Vec<String> {
    fn lerp(a: f64, b: f64, t: f64) -> f64 {
        a + (b - a) * t
    }
    fn fill_line(c: Rgba8) -> String {
        format!("fillStyle = \"{}\";", c.to_css())
    }
    fn stroke_line(c: Rgba8) -> String {
        format!("strokeStyle = \"{}\";", c.to_css())
    }

    let cmd = match entry {
        ListEntry::Valid(cmd) => cmd,
        ListEntry::Skipped { error, .. } => {
            return vec![format!("// skipped: {error}")];
        }
    };

    match *cmd {
        Command::Translate { tx, ty } => {
            vec![format!("translate({:.1},{:.1});", tx * t, ty * t)]
        }
        Command::Rotate { angle_deg } => vec![format!("rotate({:.1});", angle_deg * t)],
        Command::Scale { sx, sy } => vec![format!(
            "scale({:.1},{:.1});",
            lerp(1.0, sx, t),
            lerp(1.0, sy, t)
        )],
        Command::Shear { shx, shy } => {
            vec![format!("shear({:.1},{:.1});", shx * t, shy * t)]
        }
        Command::Transform { a, b, c, d, e, f } => vec![format!(
            "transform({:.2},{:.2},{:.2},{:.2},{:.2},{:.2});",
            lerp(1.0, a, t),
            lerp(0.0, b, t),
            lerp(0.0, c, t),
            lerp(1.0, d, t),
            lerp(0.0, e, t),
            lerp(0.0, f, t)
        )],
        Command::Save => vec!["save();".to_string()],
        Command::Restore => vec!["restore();".to_string()],
        Command::FillStyle { .. } => vec![fill_line(steps[i].fill_after)],
        Command::StrokeStyle { .. } => vec![stroke_line(steps[i].stroke_after)],
        Command::FillRect { x, y, w, h, .. } => {
            let mut lines = Vec::new();
            if changed_fill(steps, i) {
                lines.push(fill_line(steps[i].fill_after));
            }
            lines.push(format!("fillRect({x},{y},{w},{h});"));
            lines
        }
        Command::StrokeRect { x, y, w, h, .. } => {
            let mut lines = Vec::new();
            if changed_stroke(steps, i) {
                lines.push(stroke_line(steps[i].stroke_after));
            }
            lines.push(format!("strokeRect({x},{y},{w},{h});"));
            lines
        }
        Command::FillTriangle { x1, y1, x2, y2, x3, y3, .. } => {
            let mut lines = Vec::new();
            if changed_fill(steps, i) {
                lines.push(fill_line(steps[i].fill_after));
            }
            lines.push(format!("fillTriangle({x1},{y1},{x2},{y2},{x3},{y3});"));
            lines
        }
        Command::StrokeTriangle { x1, y1, x2, y2, x3, y3, .. } => {
            let mut lines = Vec::new();
            if changed_stroke(steps, i) {
                lines.push(stroke_line(steps[i].stroke_after));
            }
            lines.push(format!("strokeTriangle({x1},{y1},{x2},{y2},{x3},{y3});"));
            lines
        }
        Command::FillArc { x, y, radius, start_deg, end_deg, ccw, .. } => {
            let mut lines = Vec::new();
            if changed_fill(steps, i) {
                lines.push(fill_line(steps[i].fill_after));
            }
            let ccw_arg = if ccw { ",true" } else { "" };
            lines.push(format!(
                "fillArc({x},{y},{radius},{start_deg},{end_deg}{ccw_arg});"
            ));
            lines
        }
        Command::StrokeArc { x, y, radius, start_deg, end_deg, ccw, .. } => {
            let mut lines = Vec::new();
            if changed_stroke(steps, i) {
                lines.push(stroke_line(steps[i].stroke_after));
            }
            let ccw_arg = if ccw { ",true" } else { "" };
            lines.push(format!(
                "strokeArc({x},{y},{radius},{start_deg},{end_deg}{ccw_arg});"
            ));
            lines
        }
    }
}
