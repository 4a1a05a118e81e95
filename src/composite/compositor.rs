//! Flattens a layer stack into a single output surface.

use log::trace;

use super::blend::BlendMode;
use super::blur::gaussian_blur;
use crate::layer::{Layer, LayerEffect, LayerStack};
use crate::raster::color::TRANSPARENT;
use crate::raster::{PixelSurface, Rgba};

/// Renders a [`LayerStack`] bottom-to-top into one [`PixelSurface`],
/// honoring per-layer visibility, opacity, blend mode, effects, and mask.
///
/// The compositor is stateless; callers construct one and reuse it for
/// every paint request.
#[derive(Debug, Default)]
pub struct Compositor;

impl Compositor {
    pub fn new() -> Self {
        Self
    }

    /// Produces the flattened document image.
    ///
    /// Hidden layers are skipped. Zero-opacity layers still run their blend
    /// function; skipping them is a permitted optimization we deliberately
    /// do not take, so mask and effect interactions stay uniform.
    pub fn render(&self, stack: &LayerStack) -> PixelSurface {
        // Same dimensions as the stack, starting fully clear.
        let mut out = stack.layers()[0].surface().clone();
        out.fill(TRANSPARENT);

        for (index, layer) in stack.layers().iter().enumerate() {
            if !layer.visible {
                trace!("Skipping hidden layer {index}");
                continue;
            }
            let alpha = f32::from(layer.opacity()) / 100.0;

            for effect in &layer.effects {
                if effect.renders_below_layer() {
                    let decoration = render_effect(layer, effect);
                    composite_over(&mut out, &decoration, BlendMode::Normal, alpha, None);
                }
            }

            composite_over(&mut out, layer.surface(), layer.blend_mode(), alpha, layer.mask());

            for effect in &layer.effects {
                if !effect.renders_below_layer() {
                    let decoration = render_effect(layer, effect);
                    composite_over(&mut out, &decoration, BlendMode::Normal, alpha, layer.mask());
                }
            }
        }
        out
    }
}

/// Composites `src` onto `out` with the given blend mode and layer alpha.
///
/// Per-pixel this follows the standard blending pipeline: the blend
/// function mixes backdrop and source colors weighted by backdrop alpha,
/// then the result is source-over alpha composited. An optional mask
/// multiplies the source alpha channel; `None` is ignored.
fn composite_over(
    out: &mut PixelSurface,
    src: &PixelSurface,
    mode: BlendMode,
    alpha: f32,
    mask: Option<&PixelSurface>,
) {
    let width = out.width().min(src.width()) as i32;
    let height = out.height().min(src.height()) as i32;

    for y in 0..height {
        for x in 0..width {
            let sp = match src.pixel(x, y) {
                Some(p) => p,
                None => continue,
            };
            let dp = match out.pixel(x, y) {
                Some(p) => p,
                None => continue,
            };

            let mut sa = f32::from(sp.a) / 255.0 * alpha;
            if let Some(mask) = mask {
                if let Some(mp) = mask.pixel(x, y) {
                    sa *= f32::from(mp.a) / 255.0;
                }
            }
            let da = f32::from(dp.a) / 255.0;

            let cs = [
                f32::from(sp.r) / 255.0,
                f32::from(sp.g) / 255.0,
                f32::from(sp.b) / 255.0,
            ];
            let cb = [
                f32::from(dp.r) / 255.0,
                f32::from(dp.g) / 255.0,
                f32::from(dp.b) / 255.0,
            ];

            // Blend result only applies where the backdrop has coverage.
            let mixed = mode.blend(cb, cs);
            let cs_final = [
                (1.0 - da) * cs[0] + da * mixed[0],
                (1.0 - da) * cs[1] + da * mixed[1],
                (1.0 - da) * cs[2] + da * mixed[2],
            ];

            let out_a = sa + da * (1.0 - sa);
            if out_a <= 0.0 {
                out.set_pixel(x, y, TRANSPARENT);
                continue;
            }
            let channel = |s: f32, b: f32| -> u8 {
                let c = (s * sa + b * da * (1.0 - sa)) / out_a;
                (c * 255.0).round().clamp(0.0, 255.0) as u8
            };
            out.set_pixel(
                x,
                y,
                Rgba {
                    r: channel(cs_final[0], cb[0]),
                    g: channel(cs_final[1], cb[1]),
                    b: channel(cs_final[2], cb[2]),
                    a: (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
                },
            );
        }
    }
}

/// Rasterizes one effect as that layer's decoration surface.
fn render_effect(layer: &Layer, effect: &LayerEffect) -> PixelSurface {
    match *effect {
        LayerEffect::DropShadow {
            dx,
            dy,
            blur,
            color,
        } => gaussian_blur(&silhouette(layer.surface(), color, dx, dy), blur),
        LayerEffect::OuterGlow { blur, color } => {
            gaussian_blur(&silhouette(layer.surface(), color, 0, 0), blur)
        }
        LayerEffect::InnerShadow {
            dx,
            dy,
            blur,
            color,
        } => {
            let inverted = inverted_silhouette(layer.surface(), color, dx, dy);
            clip_to_alpha(&gaussian_blur(&inverted, blur), layer.surface())
        }
        LayerEffect::InnerGlow { blur, color } => {
            let inverted = inverted_silhouette(layer.surface(), color, 0, 0);
            clip_to_alpha(&gaussian_blur(&inverted, blur), layer.surface())
        }
        LayerEffect::Stroke { size, color } => stroke_rim(layer.surface(), size, color),
    }
}

/// Colored copy of the layer's alpha channel, offset by `(dx, dy)`.
fn silhouette(src: &PixelSurface, color: Rgba, dx: i32, dy: i32) -> PixelSurface {
    let mut out = src.clone();
    out.fill(TRANSPARENT);
    for y in 0..src.height() as i32 {
        for x in 0..src.width() as i32 {
            if let Some(p) = src.pixel(x, y) {
                if p.a > 0 {
                    out.set_pixel(
                        x + dx,
                        y + dy,
                        Rgba {
                            a: p.a,
                            ..color
                        },
                    );
                }
            }
        }
    }
    out
}

/// Colored copy of the layer's *inverted* alpha, offset by `(dx, dy)`.
fn inverted_silhouette(src: &PixelSurface, color: Rgba, dx: i32, dy: i32) -> PixelSurface {
    let mut out = src.clone();
    // Outside the canvas counts as empty, which inverts to full coverage;
    // pre-filling means offsets pull shadow in from the edges.
    out.fill(Rgba { a: 255, ..color });
    for y in 0..src.height() as i32 {
        for x in 0..src.width() as i32 {
            if let Some(p) = src.pixel(x, y) {
                out.set_pixel(
                    x + dx,
                    y + dy,
                    Rgba {
                        a: 255 - p.a,
                        ..color
                    },
                );
            }
        }
    }
    out
}

/// Multiplies `src` alpha by the layer's own alpha, confining inner
/// effects to the layer's opaque region.
fn clip_to_alpha(src: &PixelSurface, clip: &PixelSurface) -> PixelSurface {
    let mut out = src.clone();
    for y in 0..out.height() as i32 {
        for x in 0..out.width() as i32 {
            if let (Some(p), Some(c)) = (src.pixel(x, y), clip.pixel(x, y)) {
                let a = (u16::from(p.a) * u16::from(c.a) / 255) as u8;
                out.set_pixel(x, y, Rgba { a, ..p });
            }
        }
    }
    out
}

/// Solid rim of `size` pixels around the layer's opaque region.
fn stroke_rim(src: &PixelSurface, size: u32, color: Rgba) -> PixelSurface {
    let mut out = src.clone();
    out.fill(TRANSPARENT);
    if size == 0 {
        return out;
    }
    let r = size as i32;
    let r_sq = r * r;
    for y in 0..src.height() as i32 {
        for x in 0..src.width() as i32 {
            let own = src.pixel(x, y).map(|p| p.a).unwrap_or(0);
            if own > 0 {
                continue;
            }
            // Transparent pixel close to an opaque one belongs to the rim.
            let mut near_opaque = false;
            'scan: for sy in (y - r)..=(y + r) {
                for sx in (x - r)..=(x + r) {
                    let ddx = sx - x;
                    let ddy = sy - y;
                    if ddx * ddx + ddy * ddy > r_sq {
                        continue;
                    }
                    if let Some(p) = src.pixel(sx, sy) {
                        if p.a > 0 {
                            near_opaque = true;
                            break 'scan;
                        }
                    }
                }
            }
            if near_opaque {
                out.set_pixel(x, y, color);
            }
        }
    }
    out
}
