//! Tool selection.

use crate::layer::Layer;
use crate::raster::Rgba;

/// The active editing tool.
///
/// Tools are tagged variants carrying their own parameters, selected once
/// at tool-change time; event handling never re-dispatches on a tool name.
/// Each variant knows how to rasterize one segment of a gesture onto a
/// layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    /// Paints a round stroke in a solid color.
    Brush { color: Rgba, size: u32 },
    /// Clears pixels back to transparency.
    Eraser { size: u32 },
}

impl ToolKind {
    /// History entry description for a completed gesture with this tool.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Brush { .. } => "Brush stroke",
            Self::Eraser { .. } => "Erase",
        }
    }

    /// Rasterizes one gesture segment onto `layer`.
    ///
    /// A zero-length segment (start of a gesture) stamps a single dab.
    pub(crate) fn apply_segment(&self, layer: &mut Layer, x0: i32, y0: i32, x1: i32, y1: i32) {
        match *self {
            Self::Brush { color, size } => {
                layer.draw_line(x0, y0, x1, y1, color, size);
            }
            Self::Eraser { size } => {
                let radius = size.max(1) / 2 + 1;
                let steps = (x1 - x0).abs().max((y1 - y0).abs());
                if steps == 0 {
                    layer.erase(x0, y0, radius);
                    return;
                }
                for i in 0..=steps {
                    let x = x0 + (x1 - x0) * i / steps;
                    let y = y0 + (y1 - y0) * i / steps;
                    layer.erase(x, y, radius);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::color::RED;

    #[test]
    fn brush_paints_and_eraser_clears() {
        let mut layer = Layer::pixel(1, "L".into(), 16, 16).unwrap();
        let brush = ToolKind::Brush {
            color: RED,
            size: 3,
        };
        brush.apply_segment(&mut layer, 2, 8, 13, 8);
        assert!(layer.surface().pixel(8, 8).unwrap().a > 0);

        let eraser = ToolKind::Eraser { size: 4 };
        eraser.apply_segment(&mut layer, 2, 8, 13, 8);
        assert_eq!(layer.surface().pixel(8, 8).unwrap().a, 0);
    }

    #[test]
    fn zero_length_segment_stamps_a_dab() {
        let mut layer = Layer::pixel(1, "L".into(), 8, 8).unwrap();
        let brush = ToolKind::Brush {
            color: RED,
            size: 2,
        };
        brush.apply_segment(&mut layer, 4, 4, 4, 4);
        assert!(layer.surface().pixel(4, 4).unwrap().a > 0);
    }
}
