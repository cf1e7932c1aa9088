//! Timeline compilation: one left-to-right pass over a command list that
//! precomputes, per index, the cumulative transform before/after the step,
//! the resolved fill/stroke colors, and the step's progress function.

use kurbo::Affine;

use crate::{
    color::Rgba8,
    command::{Command, CommandError, CommandList, RawCommand},
};

/// Fill color in effect before any `fillStyle` command runs.
pub const DEFAULT_FILL: Rgba8 = Rgba8::BLACK;
/// Stroke color in effect before any `strokeStyle` command runs.
pub const DEFAULT_STROKE: Rgba8 = Rgba8::BLACK;

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Which of the three independent save/restore stacks a warning concerns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackKind {
    Matrix,
    Fill,
    Stroke,
}

impl StackKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Matrix => "matrix",
            Self::Fill => "fill",
            Self::Stroke => "stroke",
        }
    }
}

/// Non-fatal warning: a `restore` popped an empty stack. The corresponding
/// state is left unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StackWarning {
    pub index: usize,
    pub stack: StackKind,
}

/// Precomputed per-instruction state. Immutable and shared read-only across
/// every render of the owning [`Timeline`].
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledStep {
    /// The validated command, or `None` for a skipped (invalid) slot, which
    /// is a no-op for transform and style purposes.
    pub command: Option<Command>,
    /// Cumulative transform before this step.
    pub prev_matrix: Affine,
    /// Cumulative transform after this step.
    pub matrix: Affine,
    /// Resolved fill color after this step, including a per-drawing-command
    /// explicit override at this index only.
    pub fill_after: Rgba8,
    /// Resolved stroke color after this step.
    pub stroke_after: Rgba8,
}

/// Partial effect of `cmd` at progress `t`, expressed in the step's own
/// (local) frame. Identity for non-transform commands.
fn partial_matrix(cmd: &Command, t: f64) -> Affine {
    match *cmd {
        Command::Translate { tx, ty } => Affine::translate((tx * t, ty * t)),
        Command::Rotate { angle_deg } => Affine::rotate((angle_deg * t).to_radians()),
        Command::Scale { sx, sy } => {
            Affine::scale_non_uniform(lerp(1.0, sx, t), lerp(1.0, sy, t))
        }
        Command::Shear { shx, shy } => Affine::new([1.0, shy * t, shx * t, 1.0, 0.0, 0.0]),
        Command::Transform { a, b, c, d, e, f } => Affine::new([
            lerp(1.0, a, t),
            lerp(0.0, b, t),
            lerp(0.0, c, t),
            lerp(1.0, d, t),
            lerp(0.0, e, t),
            lerp(0.0, f, t),
        ]),
        _ => Affine::IDENTITY,
    }
}

impl CompiledStep {
    /// Partial effect of this step at progress `t`, in the step's own frame.
    pub fn step_matrix(&self, t: f64) -> Affine {
        let t = t.clamp(0.0, 1.0);
        match &self.command {
            Some(cmd) => partial_matrix(cmd, t),
            None => Affine::IDENTITY,
        }
    }

    /// Cumulative transform at progress `t`: `progress(0)` equals
    /// `prev_matrix`, `progress(1)` equals `matrix`.
    ///
    /// Save/Restore never advance the displayed matrix mid-interpolation;
    /// their post-step matrix applies exactly at `t = 1`.
    pub fn matrix_at(&self, t: f64) -> Affine {
        let t = t.clamp(0.0, 1.0);
        match &self.command {
            Some(Command::Save | Command::Restore) => {
                if t >= 1.0 {
                    self.matrix
                } else {
                    self.prev_matrix
                }
            }
            Some(cmd) => self.prev_matrix * partial_matrix(cmd, t),
            None => self.prev_matrix,
        }
    }

    /// Resolved fill color at progress `t`. Drawing commands materialize by
    /// fading alpha from 0 to the full resolved value.
    pub fn fill_at(&self, t: f64) -> Rgba8 {
        match &self.command {
            Some(cmd) if cmd.is_drawing() => self.fill_after.fade(t),
            _ => self.fill_after,
        }
    }

    /// Resolved stroke color at progress `t`.
    pub fn stroke_at(&self, t: f64) -> Rgba8 {
        match &self.command {
            Some(cmd) if cmd.is_drawing() => self.stroke_after.fade(t),
            _ => self.stroke_after,
        }
    }
}

/// A compiled command list: the list itself plus one [`CompiledStep`] per
/// index and any stack-imbalance warnings raised during compilation.
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    list: CommandList,
    steps: Vec<CompiledStep>,
    warnings: Vec<StackWarning>,
}

impl Timeline {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[CompiledStep] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&CompiledStep> {
        self.steps.get(index)
    }

    pub fn list(&self) -> &CommandList {
        &self.list
    }

    pub fn warnings(&self) -> &[StackWarning] {
        &self.warnings
    }

    /// Backward playback is only valid for lists without Save/Restore; the
    /// flat-accumulation model cannot express a matrix stack.
    pub fn supports_backward(&self) -> bool {
        !self.list.uses_state_stack()
    }
}

/// Compile a command list. Pure and deterministic: compiling the same list
/// twice yields bit-identical step sequences.
pub fn compile(list: &CommandList) -> Timeline {
    let n = list.len();
    let mut warnings = Vec::new();

    // Style pass: persistent fill/stroke plus their save/restore stacks,
    // then per-drawing-command overrides that apply to one index only.
    let mut fill_after = Vec::with_capacity(n);
    let mut stroke_after = Vec::with_capacity(n);
    {
        let mut curr_fill: Option<Rgba8> = None;
        let mut curr_stroke: Option<Rgba8> = None;
        let mut fill_stack: Vec<Option<Rgba8>> = Vec::new();
        let mut stroke_stack: Vec<Option<Rgba8>> = Vec::new();

        for (index, entry) in list.entries().iter().enumerate() {
            match entry.command() {
                Some(Command::FillStyle { color }) => curr_fill = Some(*color),
                Some(Command::StrokeStyle { color }) => curr_stroke = Some(*color),
                Some(Command::Save) => {
                    fill_stack.push(curr_fill);
                    stroke_stack.push(curr_stroke);
                }
                Some(Command::Restore) => {
                    match fill_stack.pop() {
                        Some(saved) => curr_fill = saved,
                        None => {
                            tracing::warn!(index, stack = "fill", "restore with empty stack");
                            warnings.push(StackWarning { index, stack: StackKind::Fill });
                        }
                    }
                    match stroke_stack.pop() {
                        Some(saved) => curr_stroke = saved,
                        None => {
                            tracing::warn!(index, stack = "stroke", "restore with empty stack");
                            warnings.push(StackWarning { index, stack: StackKind::Stroke });
                        }
                    }
                }
                _ => {}
            }

            let mut fill = curr_fill.unwrap_or(DEFAULT_FILL);
            let mut stroke = curr_stroke.unwrap_or(DEFAULT_STROKE);
            match entry.command() {
                Some(
                    Command::FillRect { color: Some(c), .. }
                    | Command::FillTriangle { color: Some(c), .. }
                    | Command::FillArc { color: Some(c), .. },
                ) => fill = *c,
                Some(
                    Command::StrokeRect { color: Some(c), .. }
                    | Command::StrokeTriangle { color: Some(c), .. }
                    | Command::StrokeArc { color: Some(c), .. },
                ) => stroke = *c,
                _ => {}
            }
            fill_after.push(fill);
            stroke_after.push(stroke);
        }
    }

    // Matrix pass: record the transform before each step, then apply the
    // step's full effect.
    let mut steps = Vec::with_capacity(n);
    {
        let mut curr = Affine::IDENTITY;
        let mut stack: Vec<Affine> = Vec::new();

        for (index, entry) in list.entries().iter().enumerate() {
            let prev = curr;
            match entry.command() {
                Some(Command::Save) => stack.push(curr),
                Some(Command::Restore) => match stack.pop() {
                    Some(saved) => curr = saved,
                    None => {
                        tracing::warn!(index, stack = "matrix", "restore with empty stack");
                        warnings.push(StackWarning { index, stack: StackKind::Matrix });
                    }
                },
                Some(
                    cmd @ (Command::Translate { .. }
                    | Command::Rotate { .. }
                    | Command::Scale { .. }
                    | Command::Shear { .. }
                    | Command::Transform { .. }),
                ) => {
                    curr = curr * partial_matrix(cmd, 1.0);
                }
                _ => {}
            }
            steps.push(CompiledStep {
                command: entry.command().cloned(),
                prev_matrix: prev,
                matrix: curr,
                fill_after: fill_after[index],
                stroke_after: stroke_after[index],
            });
        }
    }

    Timeline {
        list: list.clone(),
        steps,
        warnings,
    }
}

/// Validation policy for [`compile_raw`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationMode {
    /// Interactive authoring: any invalid instruction blocks compilation.
    Strict,
    /// Pre-authored lists: invalid instructions become timeline no-ops.
    Lenient,
}

/// Compile directly from wire tuples under the chosen validation policy.
/// In lenient mode validation errors never fail compilation; they are
/// reported through the skipped list entries.
pub fn compile_raw(
    raw: &[RawCommand],
    mode: ValidationMode,
) -> Result<Timeline, Vec<CommandError>> {
    let list = match mode {
        ValidationMode::Strict => CommandList::parse_strict(raw)?,
        ValidationMode::Lenient => CommandList::parse_lenient(raw).0,
    };
    Ok(compile(&list))
}
