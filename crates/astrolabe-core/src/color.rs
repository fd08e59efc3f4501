//! Color handling for Astrolabe diagrams.
//!
//! [`Color`] wraps `DynamicColor` from the `color` crate and accepts any CSS
//! color string.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{DynamicColor, Srgb};

/// A CSS color used for fills, strokes, and text.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_hex().hash(state);
        self.alpha().to_bits().hash(state);
    }
}

impl Color {
    /// Parses a CSS color string such as `"#ff0000"`, `"rgb(255, 0, 0)"` or `"red"`.
    ///
    /// # Errors
    ///
    /// Returns a message naming the rejected input when it is not a valid CSS color.
    ///
    /// # Examples
    ///
    /// ```
    /// use astrolabe_core::color::Color;
    ///
    /// assert!(Color::new("#fdf6e3").is_ok());
    /// assert!(Color::new("navy").is_ok());
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        DynamicColor::from_str(color_str)
            .map(|color| Self { color })
            .map_err(|err| format!("invalid color `{color_str}`: {err}"))
    }

    /// Returns the RGB part of the color as `#rrggbb`.
    ///
    /// Alpha is dropped; SVG output carries it separately through the
    /// `*-opacity` attributes. Hex notation is understood by browsers,
    /// resvg and Graphviz alike.
    ///
    /// ```
    /// use astrolabe_core::color::Color;
    ///
    /// assert_eq!(Color::new("red").unwrap().to_hex(), "#ff0000");
    /// assert_eq!(Color::new("#00ff0080").unwrap().to_hex(), "#00ff00");
    /// ```
    pub fn to_hex(self) -> String {
        let rgba = self.color.to_alpha_color::<Srgb>().to_rgba8();
        format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
    }

    /// Returns a string usable inside an SVG `id` attribute.
    ///
    /// The result only contains alphanumerics and underscores and starts with a letter.
    pub fn to_id_safe_string(self) -> String {
        let sanitized: String = self
            .to_hex()
            .replace('#', "hex")
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();

        if sanitized.chars().next().is_some_and(|c| !c.is_ascii_alphabetic()) {
            format!("c_{sanitized}")
        } else {
            sanitized
        }
    }

    /// Returns a copy of this color with the given alpha in `0.0..=1.0`.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Alpha component, `0.0` is transparent and `1.0` opaque.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<Color> for svg::node::Value {
    fn from(color: Color) -> Self {
        Self::from(color.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_color_new() {
        assert!(Color::new("#ff0000").is_ok());
        assert!(Color::new("rgb(10, 20, 30)").is_ok());

        let err = Color::new("definitely-not").unwrap_err();
        assert!(err.contains("definitely-not"));
    }

    #[test]
    fn test_color_with_alpha() {
        let color = Color::new("red").unwrap().with_alpha(0.25);
        assert!((color.alpha() - 0.25).abs() < 0.001);
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(Color::new("white").unwrap().to_hex(), "#ffffff");
        assert_eq!(Color::new("rgb(1, 2, 3)").unwrap().to_hex(), "#010203");
        assert_eq!(Color::default().to_hex(), "#000000");
    }

    #[test]
    fn test_default_is_opaque() {
        assert!((Color::default().alpha() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_id_safe_string() {
        for input in ["#ff0000", "rgb(1, 2, 3)", "blue", "hsl(120 50% 50%)"] {
            let id = Color::new(input).unwrap().to_id_safe_string();
            assert!(
                id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
                "unexpected character in `{id}`"
            );
            assert!(id.chars().next().is_some_and(|c| c.is_ascii_alphabetic()));
        }
    }

    #[test]
    fn test_eq_and_hash() {
        let mut set = HashSet::new();
        set.insert(Color::new("red").unwrap());

        assert!(set.contains(&Color::new("red").unwrap()));
        assert!(!set.contains(&Color::new("blue").unwrap()));
    }
}
