//! Color palettes and colormaps
//!
//! Discrete palettes are used for categorical series (ridge rows, bar
//! stacks, rug traces). Colormaps describe the continuous mapping a renderer
//! applies to values such as point density.

use std::fmt;

use gp_core::{PlotError, PlotResult};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// An sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const GREY: Rgb = Rgb { r: 128, g: 128, b: 128 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Hex notation, e.g. `#66c2a5`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse `#rrggbb` (the leading `#` is optional)
    pub fn from_hex(text: &str) -> PlotResult<Self> {
        let digits = text.strip_prefix('#').unwrap_or(text);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(PlotError::invalid(format!("'{}' is not a #rrggbb color", text)));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| PlotError::invalid(format!("'{}' is not a #rrggbb color", text)))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<colorous::Color> for Rgb {
    fn from(color: colorous::Color) -> Self {
        Self::new(color.r, color.g, color.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = PlotError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

/// Ordered list of colors for categorical data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub name: String,
    pub colors: Vec<Rgb>,
}

impl Palette {
    /// Color for the `index`-th series, cycling through the palette
    pub fn color(&self, index: usize) -> Rgb {
        if self.colors.is_empty() {
            return Rgb::GREY;
        }
        self.colors[index % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Default discrete palette: Set2 with 8 colors.
///
/// Built once and never mutated; callers that want a different palette pass
/// their own.
pub static DEFAULT_PALETTE: Lazy<Palette> = Lazy::new(|| {
    Palette {
        name: "Set2".to_string(),
        colors: colorous::SET2.iter().copied().map(Rgb::from).collect(),
    }
});

fn categorical_scheme(name: &str) -> Option<&'static [colorous::Color]> {
    let scheme: &'static [colorous::Color] = match name.to_ascii_lowercase().as_str() {
        "set1" => &colorous::SET1,
        "set2" => &colorous::SET2,
        "set3" => &colorous::SET3,
        "pastel1" => &colorous::PASTEL1,
        "pastel2" => &colorous::PASTEL2,
        "dark2" => &colorous::DARK2,
        "paired" => &colorous::PAIRED,
        "accent" => &colorous::ACCENT,
        "tableau10" => &colorous::TABLEAU10,
        "category10" | "tab10" => &colorous::CATEGORY10,
        _ => return None,
    };
    Some(scheme)
}

/// Build a discrete palette of `n` colors from a named categorical scheme.
///
/// Colors repeat once the scheme is exhausted.
pub fn discrete_palette(name: &str, n: usize) -> PlotResult<Palette> {
    if n == 0 {
        return Err(PlotError::invalid("palette size must be at least 1"));
    }
    let scheme = categorical_scheme(name)
        .ok_or_else(|| PlotError::invalid(format!("unknown palette '{}'", name)))?;

    Ok(Palette {
        name: name.to_string(),
        colors: (0..n).map(|i| Rgb::from(scheme[i % scheme.len()])).collect(),
    })
}

fn gradient(name: &str) -> Option<colorous::Gradient> {
    let gradient = match name.to_ascii_lowercase().as_str() {
        "viridis" => colorous::VIRIDIS,
        "inferno" => colorous::INFERNO,
        "magma" => colorous::MAGMA,
        "plasma" => colorous::PLASMA,
        "cividis" => colorous::CIVIDIS,
        "turbo" => colorous::TURBO,
        "blues" => colorous::BLUES,
        "greens" => colorous::GREENS,
        "greys" => colorous::GREYS,
        "oranges" => colorous::ORANGES,
        "purples" => colorous::PURPLES,
        "reds" => colorous::REDS,
        "rdbu" => colorous::RED_BLUE,
        "rdylbu" => colorous::RED_YELLOW_BLUE,
        "rdylgn" => colorous::RED_YELLOW_GREEN,
        "rdgy" => colorous::RED_GREY,
        "brbg" => colorous::BROWN_GREEN,
        "piyg" => colorous::PINK_GREEN,
        "prgn" => colorous::PURPLE_GREEN,
        "puor" => colorous::PURPLE_ORANGE,
        "spectral" => colorous::SPECTRAL,
        _ => return None,
    };
    Some(gradient)
}

/// A named continuous colormap, optionally reversed (`_r` suffix)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colormap {
    base: String,
    reversed: bool,
}

impl Colormap {
    /// Resolve a colormap name such as `viridis` or `RdBu_r`
    pub fn from_name(name: &str) -> PlotResult<Self> {
        let (base, reversed) = match name.strip_suffix("_r") {
            Some(base) => (base, true),
            None => (name, false),
        };
        if gradient(base).is_none() {
            return Err(PlotError::invalid(format!("unknown colormap '{}'", name)));
        }
        Ok(Self {
            base: base.to_string(),
            reversed,
        })
    }

    /// Full name including the `_r` suffix when reversed
    pub fn name(&self) -> String {
        if self.reversed {
            format!("{}_r", self.base)
        } else {
            self.base.clone()
        }
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Sample the colormap at `t`, clamped to `[0, 1]`
    pub fn color_at(&self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let t = if self.reversed { 1.0 - t } else { t };
        gradient(&self.base)
            .map(|g| Rgb::from(g.eval_continuous(t)))
            .unwrap_or(Rgb::GREY)
    }
}

impl Default for Colormap {
    fn default() -> Self {
        Self {
            base: "viridis".to_string(),
            reversed: false,
        }
    }
}

impl TryFrom<String> for Colormap {
    type Error = PlotError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Colormap::from_name(&value)
    }
}

impl From<Colormap> for String {
    fn from(cmap: Colormap) -> Self {
        cmap.name()
    }
}

/// Default sequential colormap is `viridis`
pub fn sequential_cmap(name: Option<&str>) -> PlotResult<Colormap> {
    Colormap::from_name(name.unwrap_or("viridis"))
}

/// Default diverging colormap is `RdBu_r`
pub fn diverging_cmap(name: Option<&str>) -> PlotResult<Colormap> {
    Colormap::from_name(name.unwrap_or("RdBu_r"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette_is_set2() {
        assert_eq!(DEFAULT_PALETTE.name, "Set2");
        assert_eq!(DEFAULT_PALETTE.len(), 8);
        assert_eq!(DEFAULT_PALETTE.color(0).to_hex(), "#66c2a5");
        assert_eq!(*DEFAULT_PALETTE, discrete_palette("Set2", 8).unwrap());
    }

    #[test]
    fn test_palette_cycles() {
        let palette = discrete_palette("set1", 12).unwrap();
        assert_eq!(palette.len(), 12);
        // Set1 has 9 colors
        assert_eq!(palette.colors[9], palette.colors[0]);
        assert_eq!(palette.color(12), palette.color(0));
    }

    #[test]
    fn test_palette_errors() {
        assert!(discrete_palette("Set2", 0).unwrap_err().is_invalid_argument());
        assert!(discrete_palette("rainbow", 4).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_reversed_colormap() {
        let rdbu = Colormap::from_name("RdBu").unwrap();
        let rdbu_r = diverging_cmap(None).unwrap();
        assert!(rdbu_r.is_reversed());
        assert_eq!(rdbu_r.name(), "RdBu_r");
        assert_eq!(rdbu.color_at(0.0), rdbu_r.color_at(1.0));
        assert_eq!(rdbu.color_at(0.25), rdbu_r.color_at(0.75));
    }

    #[test]
    fn test_color_at_clamps() {
        let viridis = sequential_cmap(None).unwrap();
        assert_eq!(viridis, Colormap::default());
        assert_eq!(viridis.color_at(-3.0), viridis.color_at(0.0));
        assert_eq!(viridis.color_at(7.0), viridis.color_at(1.0));
        assert_ne!(viridis.color_at(0.0), viridis.color_at(1.0));
        assert!(Colormap::from_name("jet").is_err());
    }

    #[test]
    fn test_hex_round_trip() {
        let color = Rgb::from_hex("#fc8d62").unwrap();
        assert_eq!(color, Rgb::new(252, 141, 98));
        assert_eq!(color.to_string(), "#fc8d62");
        assert!(Rgb::from_hex("#fc8d6").is_err());
        assert!(Rgb::from_hex("zzzzzz").is_err());
    }
}
