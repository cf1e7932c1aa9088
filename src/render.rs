//! The minimal drawing-surface capability the evaluator draws against, plus
//! shape builders and the coordinate-system marker.

use kurbo::{Affine, BezPath, Shape};

use crate::color::Rgba8;

/// Extent of the coordinate-system marker grid, in scene units.
pub const GRID_SIZE: f64 = 50.0;

const GRID_LINE_WIDTH: f64 = 0.5;
const AXIS_LINE_WIDTH: f64 = 3.0;
const ARROW_SIZE: f64 = 6.0;

/// Start-of-list frame marker color, forward playback.
pub const FORWARD_START_FRAME_COLOR: Rgba8 = Rgba8::opaque(0x00, 0x00, 0x00);
/// Current-frame marker color, forward playback.
pub const FORWARD_CURRENT_FRAME_COLOR: Rgba8 = Rgba8::opaque(0x7f, 0x00, 0x00);
/// Start-of-list frame marker color, backward playback.
pub const BACKWARD_START_FRAME_COLOR: Rgba8 = Rgba8::opaque(0xa8, 0x4a, 0xff);
/// Current-frame marker color, backward playback.
pub const BACKWARD_CURRENT_FRAME_COLOR: Rgba8 = Rgba8::opaque(0x00, 0x80, 0xff);

/// What the core needs from a drawing surface: fill or stroke one path under
/// an explicit affine transform and color. Everything else (pixels, vectors,
/// recording) is the implementation's business.
pub trait Surface {
    fn fill_path(&mut self, path: &BezPath, transform: Affine, color: Rgba8);
    fn stroke_path(&mut self, path: &BezPath, transform: Affine, color: Rgba8, width: f64);
}

/// Axis-aligned rectangle as an explicit closed path. Built point by point
/// rather than as a rect primitive so it deforms correctly under any affine.
pub fn rect_path(x: f64, y: f64, w: f64, h: f64) -> BezPath {
    let mut p = BezPath::new();
    p.move_to((x, y));
    p.line_to((x, y + h));
    p.line_to((x + w, y + h));
    p.line_to((x + w, y));
    p.close_path();
    p
}

pub fn triangle_path(x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) -> BezPath {
    let mut p = BezPath::new();
    p.move_to((x1, y1));
    p.line_to((x2, y2));
    p.line_to((x3, y3));
    p.close_path();
    p
}

/// Circular arc with canvas sweep semantics: angles in degrees measured
/// toward +y, `ccw` flips the sweep direction, and a span of a full turn or
/// more draws the whole circle. `close_chord` closes the path back to the
/// arc's start point (the fill variant of the arc commands).
pub fn arc_path(
    x: f64,
    y: f64,
    radius: f64,
    start_deg: f64,
    end_deg: f64,
    ccw: bool,
    close_chord: bool,
) -> BezPath {
    const TAU: f64 = std::f64::consts::TAU;

    let start = start_deg.to_radians();
    let delta = end_deg.to_radians() - start;
    let sweep = if delta == 0.0 {
        0.0
    } else if ccw {
        if delta <= -TAU {
            -TAU
        } else {
            delta.rem_euclid(TAU) - TAU
        }
    } else if delta >= TAU {
        TAU
    } else {
        delta.rem_euclid(TAU)
    };

    let arc = kurbo::Arc::new((x, y), (radius, radius), start, sweep, 0.0);
    let mut p = BezPath::new();
    for el in arc.path_elements(0.1) {
        p.push(el);
    }
    if close_chord {
        p.close_path();
    }
    p
}

/// Draw a coordinate-system marker in `frame`: a faint unit grid, bold axes,
/// and arrowheads pointing along +x and +y.
pub fn draw_axes(surface: &mut dyn Surface, frame: Affine, color: Rgba8) {
    let mut grid = BezPath::new();
    for i in -5..=5 {
        let pos = f64::from(i) * 10.0;
        grid.move_to((pos, -GRID_SIZE));
        grid.line_to((pos, GRID_SIZE));
        grid.move_to((-GRID_SIZE, pos));
        grid.line_to((GRID_SIZE, pos));
    }
    surface.stroke_path(&grid, frame, color, GRID_LINE_WIDTH);

    let mut axes = BezPath::new();
    axes.move_to((0.0, -GRID_SIZE));
    axes.line_to((0.0, GRID_SIZE));
    axes.move_to((-GRID_SIZE, 0.0));
    axes.line_to((GRID_SIZE, 0.0));
    surface.stroke_path(&axes, frame, color, AXIS_LINE_WIDTH);

    surface.fill_path(
        &triangle_path(3.0, GRID_SIZE, 0.0, GRID_SIZE + ARROW_SIZE, -3.0, GRID_SIZE),
        frame,
        color,
    );
    surface.fill_path(
        &triangle_path(GRID_SIZE, -3.0, GRID_SIZE + ARROW_SIZE, 0.0, GRID_SIZE, 3.0),
        frame,
        color,
    );
}

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedOp {
    Fill {
        path: BezPath,
        transform: Affine,
        color: Rgba8,
    },
    Stroke {
        path: BezPath,
        transform: Affine,
        color: Rgba8,
        width: f64,
    },
}

/// A surface that records draw calls instead of rasterizing them. Useful for
/// tests and for inspecting what a render would paint.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<RecordedOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Surface for RecordingSurface {
    fn fill_path(&mut self, path: &BezPath, transform: Affine, color: Rgba8) {
        self.ops.push(RecordedOp::Fill {
            path: path.clone(),
            transform,
            color,
        });
    }

    fn stroke_path(&mut self, path: &BezPath, transform: Affine, color: Rgba8, width: f64) {
        self.ops.push(RecordedOp::Stroke {
            path: path.clone(),
            transform,
            color,
            width,
        });
    }
}
