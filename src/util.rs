//! Utility functions for color naming.
//!
//! The configuration file and the CLI identify brush colors by name; this
//! module provides the name/value mappings.

use crate::raster::Rgba;
use crate::raster::color::*;

/// Maps color name strings to [`Rgba`] values.
///
/// Used by the configuration system to parse color names from the config
/// file.
///
/// # Supported Names (case-insensitive)
/// - "red", "green", "blue", "yellow", "orange", "white", "black"
pub fn name_to_color(name: &str) -> Option<Rgba> {
    match name.to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "yellow" => Some(YELLOW),
        "orange" => Some(ORANGE),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        _ => None,
    }
}

/// Maps an [`Rgba`] value to its human-readable name, or "Custom" when the
/// color matches no predefined constant.
pub fn color_to_name(color: Rgba) -> &'static str {
    match color {
        RED => "Red",
        GREEN => "Green",
        BLUE => "Blue",
        YELLOW => "Yellow",
        ORANGE => "Orange",
        WHITE => "White",
        BLACK => "Black",
        _ => "Custom",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_mappings_round_trip() {
        assert_eq!(name_to_color("red").unwrap(), RED);
        assert_eq!(name_to_color("WHITE").unwrap(), WHITE);
        assert!(name_to_color("chartreuse").is_none());
        assert_eq!(color_to_name(BLACK), "Black");
        assert_eq!(color_to_name(Rgba::opaque(42, 42, 42)), "Custom");
    }
}
