use crate::foundation::core::{Affine, BezPath, Point, Rgba8};
use crate::foundation::error::{SigpadError, SigpadResult};
use crate::render::bitmap::Bitmap;
use crate::render::composite::composite_layer;

/// Rasterize a filled outline into a fresh transparent layer the size of `target`, then
/// composite it over `target`.
///
/// `transform` maps logical surface coordinates to pixels.
pub fn fill_outline_over(
    target: &mut Bitmap,
    outline: &BezPath,
    color: Rgba8,
    transform: Affine,
) -> SigpadResult<()> {
    if outline.elements().is_empty() || color.a == 0 {
        return Ok(());
    }
    let layer = rasterize_outline(outline, color, transform, target.width(), target.height())?;
    composite_layer(target.data_mut(), &layer)
}

/// Antialiased non-zero fill of `outline` into premultiplied RGBA8 bytes.
pub fn rasterize_outline(
    outline: &BezPath,
    color: Rgba8,
    transform: Affine,
    width: u32,
    height: u32,
) -> SigpadResult<Vec<u8>> {
    let width_u16: u16 = width
        .try_into()
        .map_err(|_| SigpadError::render("raster width exceeds u16"))?;
    let height_u16: u16 = height
        .try_into()
        .map_err(|_| SigpadError::render("raster height exceeds u16"))?;
    if width_u16 == 0 || height_u16 == 0 {
        return Err(SigpadError::render("raster target has zero area"));
    }

    let mut pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);
    let mut ctx = vello_cpu::RenderContext::new(width_u16, height_u16);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        color.r, color.g, color.b, color.a,
    ));
    ctx.fill_path(&bezpath_to_cpu(outline));
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    Ok(pixmap.data_as_u8_slice().to_vec())
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
