//! Two-pass gaussian blur used by shadow and glow effects.

use crate::raster::PixelSurface;

/// Blurs a surface with a separable gaussian kernel.
///
/// Channels are premultiplied before filtering and unpremultiplied after,
/// so partially transparent edges blur without color fringing. Radius 0
/// returns an unchanged copy. Samples past the edges clamp to the border
/// pixel.
pub fn gaussian_blur(surface: &PixelSurface, radius: u32) -> PixelSurface {
    if radius == 0 {
        return surface.clone();
    }

    let width = surface.width() as usize;
    let height = surface.height() as usize;
    let kernel = gaussian_kernel(radius);
    let r = radius as i64;

    // Straight u8 -> premultiplied f32.
    let mut premul = vec![0.0f32; width * height * 4];
    for (i, px) in surface.data().chunks_exact(4).enumerate() {
        let a = f32::from(px[3]) / 255.0;
        premul[i * 4] = f32::from(px[0]) / 255.0 * a;
        premul[i * 4 + 1] = f32::from(px[1]) / 255.0 * a;
        premul[i * 4 + 2] = f32::from(px[2]) / 255.0 * a;
        premul[i * 4 + 3] = a;
    }

    let mut tmp = vec![0.0f32; premul.len()];
    for y in 0..height {
        for x in 0..width {
            let mut acc = [0.0f32; 4];
            for (k, weight) in kernel.iter().enumerate() {
                let sx = (x as i64 + k as i64 - r).clamp(0, width as i64 - 1) as usize;
                let idx = (y * width + sx) * 4;
                for c in 0..4 {
                    acc[c] += premul[idx + c] * weight;
                }
            }
            let idx = (y * width + x) * 4;
            tmp[idx..idx + 4].copy_from_slice(&acc);
        }
    }

    let mut blurred = vec![0.0f32; premul.len()];
    for y in 0..height {
        for x in 0..width {
            let mut acc = [0.0f32; 4];
            for (k, weight) in kernel.iter().enumerate() {
                let sy = (y as i64 + k as i64 - r).clamp(0, height as i64 - 1) as usize;
                let idx = (sy * width + x) * 4;
                for c in 0..4 {
                    acc[c] += tmp[idx + c] * weight;
                }
            }
            let idx = (y * width + x) * 4;
            blurred[idx..idx + 4].copy_from_slice(&acc);
        }
    }

    // Premultiplied f32 -> straight u8.
    let mut out = Vec::with_capacity(width * height * 4);
    for px in blurred.chunks_exact(4) {
        let a = px[3].clamp(0.0, 1.0);
        if a <= 0.0 {
            out.extend_from_slice(&[0, 0, 0, 0]);
        } else {
            for c in &px[..3] {
                out.push(((c / a).clamp(0.0, 1.0) * 255.0).round() as u8);
            }
            out.push((a * 255.0).round() as u8);
        }
    }

    PixelSurface::from_raw(surface.width(), surface.height(), out)
        .expect("blur preserves surface dimensions")
}

fn gaussian_kernel(radius: u32) -> Vec<f32> {
    let sigma = (radius as f32 / 2.0).max(0.5);
    let denom = 2.0 * sigma * sigma;
    let r = radius as i64;

    let mut weights = Vec::with_capacity((2 * radius + 1) as usize);
    let mut sum = 0.0f32;
    for i in -r..=r {
        let x = i as f32;
        let w = (-x * x / denom).exp();
        weights.push(w);
        sum += w;
    }
    for w in &mut weights {
        *w /= sum;
    }
    weights
}
