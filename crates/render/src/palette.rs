//! Colour gradients for speed maps.
//!
//! A palette is an ordered list of sRGB stops sampled by linear interpolation.

use leapfrog_core::SimError;

const PALETTE_NAMES: &[&str] = &["cornflower", "mono", "fire"];

/// sRGB color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    /// `#6495ed`, the default streamline colour.
    pub const CORNFLOWER: Rgb = Rgb {
        r: 100.0 / 255.0,
        g: 149.0 / 255.0,
        b: 237.0 / 255.0,
    };

    /// Parses a hex color string like "#6495ed" or "6495ED".
    ///
    /// Returns `SimError::InvalidColor` if the input is not a valid 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Rgb, SimError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(SimError::InvalidColor(format!(
                "expected 6 hex digits, got '{hex}'"
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map(|v| v as f64 / 255.0)
                .map_err(|e| SimError::InvalidColor(format!("'{hex}': {e}")))
        };
        Ok(Rgb {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Quantizes to 8-bit channels.
    pub fn to_bytes(self) -> [u8; 3] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        Rgb {
            r: self.r + t * (other.r - self.r),
            g: self.g + t * (other.g - self.g),
            b: self.b + t * (other.b - self.b),
        }
    }
}

/// Evenly spaced colour stops: `sample(0.0)` is the first, `sample(1.0)` the last.
#[derive(Debug, Clone)]
pub struct Palette {
    stops: Vec<Rgb>,
}

impl Palette {
    /// Requires at least one stop.
    pub fn new(stops: Vec<Rgb>) -> Result<Self, SimError> {
        if stops.is_empty() {
            return Err(SimError::InvalidPalette(
                "palette requires at least 1 color".to_string(),
            ));
        }
        Ok(Self { stops })
    }

    pub fn from_hex(hexes: &[&str]) -> Result<Self, SimError> {
        let stops = hexes
            .iter()
            .map(|h| Rgb::from_hex(h))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(stops)
    }

    /// Looks up a built-in palette.
    ///
    /// Returns `SimError::InvalidPalette` for unknown names.
    pub fn from_name(name: &str) -> Result<Self, SimError> {
        let hexes: &[&str] = match name {
            "cornflower" => &["#f7f9fc", "#b3c7f0", "#6495ed", "#27408b"],
            "mono" => &["#ffffff", "#000000"],
            "fire" => &["#000004", "#56106e", "#bb3754", "#f98c0a", "#fcffa4"],
            _ => {
                return Err(SimError::InvalidPalette(format!(
                    "unknown palette '{name}', expected one of: {}",
                    PALETTE_NAMES.join(", ")
                )))
            }
        };
        Self::from_hex(hexes)
    }

    pub fn list_names() -> &'static [&'static str] {
        PALETTE_NAMES
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Always false for a constructed palette.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Samples at `t`, clamped to [0, 1]. NaN samples the first stop.
    pub fn sample(&self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let n = self.stops.len();
        if n == 1 {
            return self.stops[0];
        }
        let scaled = t * (n - 1) as f64;
        let idx = (scaled as usize).min(n - 2);
        self.stops[idx].lerp(self.stops[idx + 1], scaled - idx as f64)
    }
}
