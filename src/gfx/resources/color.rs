//! RGB color values with CSS-style string encoding
//!
//! Panel widgets exchange colors as style strings while materials store
//! [`Color`] values, so both directions live here.

use std::{fmt, str::FromStr};

use crate::error::ColorParseError;

/// Linear RGB color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from a packed `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Packs the color into `0xRRGGBB`, clamping out-of-range components
    pub fn to_hex(&self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Encodes the color as `#rrggbb`
    pub fn style(&self) -> String {
        format!("#{:06x}", self.to_hex())
    }

    /// Replaces this color with the decoded `style`
    ///
    /// On error the color keeps its previous value.
    pub fn set_style(&mut self, style: &str) -> Result<(), ColorParseError> {
        *self = style.parse()?;
        Ok(())
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_array(rgb: [f32; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.style())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    /// Accepts `#rgb`, `#rrggbb`, `rgb(r, g, b)` with 0-255 integers and
    /// `rgb(r%, g%, b%)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let style = s.trim();
        if style.is_empty() {
            return Err(ColorParseError::Empty);
        }

        if let Some(hex) = style.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorParseError::InvalidHex(s.to_string()));
        }

        if let Some(args) = style
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_rgb(args).ok_or_else(|| ColorParseError::InvalidRgb(s.to_string()));
        }

        Err(ColorParseError::Unsupported(s.to_string()))
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            // #rgb expands each digit: #f80 == #ff8800
            let value = u32::from_str_radix(hex, 16).ok()?;
            let r = (value >> 8) & 0xf;
            let g = (value >> 4) & 0xf;
            let b = value & 0xf;
            Some(Color::from_hex((r * 17) << 16 | (g * 17) << 8 | b * 17))
        }
        6 => u32::from_str_radix(hex, 16).ok().map(Color::from_hex),
        _ => None,
    }
}

fn parse_rgb(args: &str) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return None;
    }

    let mut channels = [0.0f32; 3];
    for (channel, part) in channels.iter_mut().zip(&parts) {
        *channel = match part.strip_suffix('%') {
            Some(percent) => percent.trim().parse::<f32>().ok()?.clamp(0.0, 100.0) / 100.0,
            None => part.parse::<u32>().ok()?.min(255) as f32 / 255.0,
        };
    }
    Some(Color::from_array(channels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_style_round_trip_keeps_hex() {
        let color = Color::from_hex(0x343434);
        assert_eq!(color.style(), "#343434");
        assert_eq!(color.style().parse::<Color>().unwrap().to_hex(), 0x343434);
    }

    #[test]
    fn test_short_hex_expands() {
        let color: Color = "#f80".parse().unwrap();
        assert_eq!(color.to_hex(), 0xff8800);
    }

    #[test]
    fn test_rgb_functional_notation() {
        let color: Color = "rgb(255, 0, 0)".parse().unwrap();
        assert_relative_eq!(color.r, 1.0);
        assert_relative_eq!(color.g, 0.0);

        let color: Color = "rgb(50%, 100%, 0%)".parse().unwrap();
        assert_relative_eq!(color.r, 0.5);
        assert_relative_eq!(color.g, 1.0);
        assert_relative_eq!(color.b, 0.0);
    }

    #[test]
    fn test_malformed_style_keeps_previous_value() {
        let mut color = Color::from_hex(0x00ff00);
        assert!(color.set_style("#12345").is_err());
        assert!(color.set_style("#gggggg").is_err());
        assert!(color.set_style("rgb(1, 2)").is_err());
        assert!(color.set_style("chartreuse").is_err());
        assert_eq!(color.set_style(""), Err(ColorParseError::Empty));
        assert_eq!(color.to_hex(), 0x00ff00);
    }
}
