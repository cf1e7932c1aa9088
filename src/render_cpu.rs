//! CPU rasterization of a [`Surface`] via `vello_cpu`.

use kurbo::{Affine, BezPath, PathEl};

use crate::{color::Rgba8, render::Surface};

/// A rendered frame: premultiplied RGBA8, row-major.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

/// A [`Surface`] that rasterizes into a `vello_cpu` pixmap. An optional base
/// transform (typically "center the origin and zoom in") is composed under
/// every draw call.
pub struct PixmapSurface {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
    base: Affine,
}

impl PixmapSurface {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            ctx: vello_cpu::RenderContext::new(width, height),
            width,
            height,
            base: Affine::IDENTITY,
        }
    }

    pub fn with_base(mut self, base: Affine) -> Self {
        self.base = base;
        self
    }

    pub fn base(&self) -> Affine {
        self.base
    }

    /// Flush pending work and read the frame back.
    pub fn finish(mut self) -> FrameRgba {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        FrameRgba {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

impl Surface for PixmapSurface {
    fn fill_path(&mut self, path: &BezPath, transform: Affine, color: Rgba8) {
        self.ctx.set_transform(affine_to_cpu(self.base * transform));
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    fn stroke_path(&mut self, path: &BezPath, transform: Affine, color: Rgba8, width: f64) {
        self.ctx.set_transform(affine_to_cpu(self.base * transform));
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx
            .set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_path(&bezpath_to_cpu(path));
    }
}

// `vello_cpu` re-exports its own kurbo; convert at the boundary.
fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::rect_path;

    #[test]
    fn filled_rect_produces_pixels() {
        let mut surface = PixmapSurface::new(16, 16);
        surface.fill_path(
            &rect_path(0.0, 0.0, 16.0, 16.0),
            Affine::IDENTITY,
            Rgba8::opaque(255, 0, 0),
        );
        let frame = surface.finish();
        assert_eq!(frame.data.len(), 16 * 16 * 4);
        assert!(frame.data.iter().any(|&b| b != 0));
    }

    #[test]
    fn empty_surface_is_transparent() {
        let frame = PixmapSurface::new(8, 8).finish();
        assert!(frame.data.iter().all(|&b| b == 0));
    }
}
