//! The command model: a closed sum type over every instruction kind, the
//! `[name, ...args]` wire tuples they round-trip through, and the validating
//! dispatcher that turns one into the other.

use crate::color::Rgba8;

/// One instruction on the wire: a JSON array `[commandName, ...args]` with
/// colors as strings and numeric arguments as plain numbers.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RawCommand(pub Vec<serde_json::Value>);

impl RawCommand {
    pub fn name(&self) -> Option<&str> {
        self.0.first().and_then(|v| v.as_str())
    }

    pub fn args(&self) -> &[serde_json::Value] {
        self.0.get(1..).unwrap_or(&[])
    }
}

/// Structured validation error. Carries enough context (command index, field
/// name, expected type, received value) to localize the fix.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum CommandError {
    #[error("command {index}: empty instruction")]
    Empty { index: usize },

    #[error("command {index}: command name must be a string, got {received}")]
    BadName { index: usize, received: String },

    #[error("command {index}: unrecognized command '{name}'")]
    Unknown { index: usize, name: String },

    #[error("command {index} ({command}): expected {expected} arguments, got {got}")]
    Arity {
        index: usize,
        command: &'static str,
        expected: &'static str,
        got: usize,
    },

    #[error("command {index} ({command}): argument '{field}' must be {expected}, got {received}")]
    Argument {
        index: usize,
        command: &'static str,
        field: &'static str,
        expected: &'static str,
        received: String,
    },
}

impl CommandError {
    /// Index of the offending instruction within its list.
    pub fn index(&self) -> usize {
        match self {
            Self::Empty { index }
            | Self::BadName { index, .. }
            | Self::Unknown { index, .. }
            | Self::Arity { index, .. }
            | Self::Argument { index, .. } => *index,
        }
    }
}

/// A validated drawing/transform instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Translate { tx: f64, ty: f64 },
    Rotate { angle_deg: f64 },
    Scale { sx: f64, sy: f64 },
    Shear { shx: f64, shy: f64 },
    /// Generic affine `(a, b, c, d, e, f)` mapping
    /// `(x, y) -> (a*x + c*y + e, b*x + d*y + f)`.
    Transform { a: f64, b: f64, c: f64, d: f64, e: f64, f: f64 },
    Save,
    Restore,
    FillStyle { color: Rgba8 },
    StrokeStyle { color: Rgba8 },
    FillRect { x: f64, y: f64, w: f64, h: f64, color: Option<Rgba8> },
    StrokeRect { x: f64, y: f64, w: f64, h: f64, color: Option<Rgba8> },
    FillTriangle { x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64, color: Option<Rgba8> },
    StrokeTriangle { x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64, color: Option<Rgba8> },
    FillArc {
        x: f64,
        y: f64,
        radius: f64,
        start_deg: f64,
        end_deg: f64,
        ccw: bool,
        color: Option<Rgba8>,
    },
    StrokeArc {
        x: f64,
        y: f64,
        radius: f64,
        start_deg: f64,
        end_deg: f64,
        ccw: bool,
        color: Option<Rgba8>,
    },
}

impl Command {
    /// Wire name of this command.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Translate { .. } => "translate",
            Self::Rotate { .. } => "rotate",
            Self::Scale { .. } => "scale",
            Self::Shear { .. } => "shear",
            Self::Transform { .. } => "transform",
            Self::Save => "save",
            Self::Restore => "restore",
            Self::FillStyle { .. } => "fillStyle",
            Self::StrokeStyle { .. } => "strokeStyle",
            Self::FillRect { .. } => "fillRect",
            Self::StrokeRect { .. } => "strokeRect",
            Self::FillTriangle { .. } => "fillTriangle",
            Self::StrokeTriangle { .. } => "strokeTriangle",
            Self::FillArc { .. } => "fillArc",
            Self::StrokeArc { .. } => "strokeArc",
        }
    }

    /// True for commands that paint geometry.
    pub fn is_drawing(&self) -> bool {
        matches!(
            self,
            Self::FillRect { .. }
                | Self::StrokeRect { .. }
                | Self::FillTriangle { .. }
                | Self::StrokeTriangle { .. }
                | Self::FillArc { .. }
                | Self::StrokeArc { .. }
        )
    }

    /// Decode and validate one wire tuple. Every instruction matches exactly
    /// one schema or falls through to an error; there is no silent
    /// multiple-match ambiguity.
    pub fn parse(raw: &RawCommand, index: usize) -> Result<Self, CommandError> {
        let Some(first) = raw.0.first() else {
            return Err(CommandError::Empty { index });
        };
        let Some(name) = first.as_str() else {
            return Err(CommandError::BadName {
                index,
                received: first.to_string(),
            });
        };

        let args = Args {
            index,
            command: "",
            values: raw.args(),
        };

        match name {
            "translate" => {
                let args = args.named("translate");
                args.exact(2, "2")?;
                Ok(Self::Translate {
                    tx: args.num(0, "tx")?,
                    ty: args.num(1, "ty")?,
                })
            }
            "rotate" => {
                let args = args.named("rotate");
                args.exact(1, "1")?;
                Ok(Self::Rotate {
                    angle_deg: args.num(0, "angle")?,
                })
            }
            "scale" => {
                let args = args.named("scale");
                args.exact(2, "2")?;
                Ok(Self::Scale {
                    sx: args.num(0, "sx")?,
                    sy: args.num(1, "sy")?,
                })
            }
            "shear" => {
                let args = args.named("shear");
                args.exact(2, "2")?;
                Ok(Self::Shear {
                    shx: args.num(0, "shx")?,
                    shy: args.num(1, "shy")?,
                })
            }
            "transform" => {
                let args = args.named("transform");
                args.exact(6, "6")?;
                Ok(Self::Transform {
                    a: args.num(0, "a")?,
                    b: args.num(1, "b")?,
                    c: args.num(2, "c")?,
                    d: args.num(3, "d")?,
                    e: args.num(4, "e")?,
                    f: args.num(5, "f")?,
                })
            }
            "save" => {
                let args = args.named("save");
                args.exact(0, "0")?;
                Ok(Self::Save)
            }
            "restore" => {
                let args = args.named("restore");
                args.exact(0, "0")?;
                Ok(Self::Restore)
            }
            "fillStyle" => {
                let args = args.named("fillStyle");
                args.exact(1, "1")?;
                Ok(Self::FillStyle {
                    color: args.color(0, "color")?,
                })
            }
            "strokeStyle" => {
                let args = args.named("strokeStyle");
                args.exact(1, "1")?;
                Ok(Self::StrokeStyle {
                    color: args.color(0, "color")?,
                })
            }
            "fillRect" | "strokeRect" => {
                let args = args.named(if name == "fillRect" { "fillRect" } else { "strokeRect" });
                args.range(4, 5, "4 or 5")?;
                let (x, y, w, h) = (
                    args.num(0, "x")?,
                    args.num(1, "y")?,
                    args.num(2, "w")?,
                    args.num(3, "h")?,
                );
                let color = args.color_opt(4, "color")?;
                Ok(if name == "fillRect" {
                    Self::FillRect { x, y, w, h, color }
                } else {
                    Self::StrokeRect { x, y, w, h, color }
                })
            }
            "fillTriangle" | "strokeTriangle" => {
                let args = args.named(if name == "fillTriangle" {
                    "fillTriangle"
                } else {
                    "strokeTriangle"
                });
                args.range(6, 7, "6 or 7")?;
                let (x1, y1, x2, y2, x3, y3) = (
                    args.num(0, "x1")?,
                    args.num(1, "y1")?,
                    args.num(2, "x2")?,
                    args.num(3, "y2")?,
                    args.num(4, "x3")?,
                    args.num(5, "y3")?,
                );
                let color = args.color_opt(6, "color")?;
                Ok(if name == "fillTriangle" {
                    Self::FillTriangle { x1, y1, x2, y2, x3, y3, color }
                } else {
                    Self::StrokeTriangle { x1, y1, x2, y2, x3, y3, color }
                })
            }
            "fillArc" | "strokeArc" => {
                let args = args.named(if name == "fillArc" { "fillArc" } else { "strokeArc" });
                args.range(5, 7, "5 to 7")?;
                let (x, y, radius, start_deg, end_deg) = (
                    args.num(0, "x")?,
                    args.num(1, "y")?,
                    args.num(2, "radius")?,
                    args.num(3, "startAngle")?,
                    args.num(4, "endAngle")?,
                );
                let ccw = args.bool_opt(5, "counterclockwise")?.unwrap_or(false);
                let color = args.color_opt(6, "color")?;
                Ok(if name == "fillArc" {
                    Self::FillArc { x, y, radius, start_deg, end_deg, ccw, color }
                } else {
                    Self::StrokeArc { x, y, radius, start_deg, end_deg, ccw, color }
                })
            }
            other => Err(CommandError::Unknown {
                index,
                name: other.to_string(),
            }),
        }
    }

    /// Export back to the wire tuple. Re-parsing the result yields an equal
    /// command.
    pub fn to_raw(&self) -> RawCommand {
        use serde_json::{Value, json};

        fn push_color(parts: &mut Vec<Value>, color: &Option<Rgba8>) {
            if let Some(c) = color {
                parts.push(json!(c.to_css()));
            }
        }

        let mut parts: Vec<Value> = vec![json!(self.name())];
        match self {
            Self::Translate { tx, ty } => parts.extend([json!(tx), json!(ty)]),
            Self::Rotate { angle_deg } => parts.push(json!(angle_deg)),
            Self::Scale { sx, sy } => parts.extend([json!(sx), json!(sy)]),
            Self::Shear { shx, shy } => parts.extend([json!(shx), json!(shy)]),
            Self::Transform { a, b, c, d, e, f } => {
                parts.extend([json!(a), json!(b), json!(c), json!(d), json!(e), json!(f)]);
            }
            Self::Save | Self::Restore => {}
            Self::FillStyle { color } | Self::StrokeStyle { color } => {
                parts.push(json!(color.to_css()));
            }
            Self::FillRect { x, y, w, h, color } | Self::StrokeRect { x, y, w, h, color } => {
                parts.extend([json!(x), json!(y), json!(w), json!(h)]);
                push_color(&mut parts, color);
            }
            Self::FillTriangle { x1, y1, x2, y2, x3, y3, color }
            | Self::StrokeTriangle { x1, y1, x2, y2, x3, y3, color } => {
                parts.extend([json!(x1), json!(y1), json!(x2), json!(y2), json!(x3), json!(y3)]);
                push_color(&mut parts, color);
            }
            Self::FillArc { x, y, radius, start_deg, end_deg, ccw, color }
            | Self::StrokeArc { x, y, radius, start_deg, end_deg, ccw, color } => {
                parts.extend([
                    json!(x),
                    json!(y),
                    json!(radius),
                    json!(start_deg),
                    json!(end_deg),
                ]);
                if *ccw || color.is_some() {
                    parts.push(json!(ccw));
                }
                push_color(&mut parts, color);
            }
        }
        RawCommand(parts)
    }
}

/// Positional argument reader with uniform error reporting.
#[derive(Clone, Copy)]
struct Args<'a> {
    index: usize,
    command: &'static str,
    values: &'a [serde_json::Value],
}

fn describe(v: Option<&serde_json::Value>) -> String {
    match v {
        None => "nothing".to_string(),
        Some(v) => v.to_string(),
    }
}

impl Args<'_> {
    fn named(mut self, command: &'static str) -> Self {
        self.command = command;
        self
    }

    fn exact(&self, n: usize, expected: &'static str) -> Result<(), CommandError> {
        self.range(n, n, expected)
    }

    fn range(&self, min: usize, max: usize, expected: &'static str) -> Result<(), CommandError> {
        if self.values.len() < min || self.values.len() > max {
            return Err(CommandError::Arity {
                index: self.index,
                command: self.command,
                expected,
                got: self.values.len(),
            });
        }
        Ok(())
    }

    fn num(&self, i: usize, field: &'static str) -> Result<f64, CommandError> {
        match self.values.get(i).and_then(|v| v.as_f64()) {
            Some(n) if n.is_finite() => Ok(n),
            _ => Err(CommandError::Argument {
                index: self.index,
                command: self.command,
                field,
                expected: "a finite number",
                received: describe(self.values.get(i)),
            }),
        }
    }

    fn color(&self, i: usize, field: &'static str) -> Result<Rgba8, CommandError> {
        let Some(v) = self.values.get(i) else {
            return Err(CommandError::Argument {
                index: self.index,
                command: self.command,
                field,
                expected: "a color string",
                received: "nothing".to_string(),
            });
        };
        let parsed = v.as_str().and_then(|s| Rgba8::parse_css(s).ok());
        parsed.ok_or_else(|| CommandError::Argument {
            index: self.index,
            command: self.command,
            field,
            expected: "a color string",
            received: v.to_string(),
        })
    }

    fn color_opt(&self, i: usize, field: &'static str) -> Result<Option<Rgba8>, CommandError> {
        if self.values.get(i).is_none() {
            return Ok(None);
        }
        self.color(i, field).map(Some)
    }

    fn bool_opt(&self, i: usize, field: &'static str) -> Result<Option<bool>, CommandError> {
        match self.values.get(i) {
            None => Ok(None),
            Some(serde_json::Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(CommandError::Argument {
                index: self.index,
                command: self.command,
                field,
                expected: "a boolean",
                received: other.to_string(),
            }),
        }
    }
}

/// One slot of a command list: either a validated command or a skipped
/// instruction kept as a no-op placeholder (lenient policy). Skipped slots
/// keep their raw tuple so export is lossless.
#[derive(Clone, Debug, PartialEq)]
pub enum ListEntry {
    Valid(Command),
    Skipped { raw: RawCommand, error: CommandError },
}

impl ListEntry {
    pub fn command(&self) -> Option<&Command> {
        match self {
            Self::Valid(cmd) => Some(cmd),
            Self::Skipped { .. } => None,
        }
    }
}

/// An ordered, 0-indexed command list. Immutable once compiled.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct CommandList {
    entries: Vec<ListEntry>,
}

impl CommandList {
    pub fn from_commands(commands: impl IntoIterator<Item = Command>) -> Self {
        Self {
            entries: commands.into_iter().map(ListEntry::Valid).collect(),
        }
    }

    /// Strict policy (interactive authoring): any invalid instruction blocks
    /// the whole list. All errors are collected, not just the first.
    pub fn parse_strict(raw: &[RawCommand]) -> Result<Self, Vec<CommandError>> {
        let mut entries = Vec::with_capacity(raw.len());
        let mut errors = Vec::new();
        for (index, r) in raw.iter().enumerate() {
            match Command::parse(r, index) {
                Ok(cmd) => entries.push(ListEntry::Valid(cmd)),
                Err(err) => errors.push(err),
            }
        }
        if errors.is_empty() {
            Ok(Self { entries })
        } else {
            Err(errors)
        }
    }

    /// Skip-and-warn policy (pre-authored demo lists): invalid instructions
    /// become no-op slots that still occupy their timeline index.
    pub fn parse_lenient(raw: &[RawCommand]) -> (Self, Vec<CommandError>) {
        let mut entries = Vec::with_capacity(raw.len());
        let mut errors = Vec::new();
        for (index, r) in raw.iter().enumerate() {
            match Command::parse(r, index) {
                Ok(cmd) => entries.push(ListEntry::Valid(cmd)),
                Err(err) => {
                    tracing::warn!(index, error = %err, "skipping invalid instruction");
                    errors.push(err.clone());
                    entries.push(ListEntry::Skipped {
                        raw: r.clone(),
                        error: err,
                    });
                }
            }
        }
        (Self { entries }, errors)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    pub fn command(&self, index: usize) -> Option<&Command> {
        self.entries.get(index).and_then(ListEntry::command)
    }

    /// Export to the wire format. Valid commands export canonically; skipped
    /// slots reproduce their original tuple verbatim.
    pub fn to_raw(&self) -> Vec<RawCommand> {
        self.entries
            .iter()
            .map(|e| match e {
                ListEntry::Valid(cmd) => cmd.to_raw(),
                ListEntry::Skipped { raw, .. } => raw.clone(),
            })
            .collect()
    }

    /// True when the list contains Save/Restore. Backward playback cannot
    /// express a matrix stack and is refused for such lists.
    pub fn uses_state_stack(&self) -> bool {
        self.entries
            .iter()
            .any(|e| matches!(e.command(), Some(Command::Save | Command::Restore)))
    }
}
