/// A color in any of the spaces the protocol can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum Color {
    Rgb(Rgb),
    Hsl(Hsl),
    Hwb(Hwb),
}

/// Channels are 0-255; alpha is 0-1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: f64,
}

/// Hue in degrees; saturation and lightness as percentages 0-100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
    pub alpha: f64,
}

/// Hue in degrees; whiteness and blackness as percentages 0-100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hwb {
    pub hue: f64,
    pub whiteness: f64,
    pub blackness: f64,
    pub alpha: f64,
}

/// Byte-per-channel color, the uniform extraction target.
///
/// Alpha maps 0-1 onto 0-255 with ties rounded away from zero, so an
/// alpha of 0.5 lands on 128, never 127.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    /// Collapse any color space to bytes.
    pub fn to_rgba(&self) -> Rgba {
        match self {
            Color::Rgb(rgb) => Rgba {
                red: rgb.red,
                green: rgb.green,
                blue: rgb.blue,
                alpha: unit_to_byte(rgb.alpha),
            },
            Color::Hsl(hsl) => {
                let (red, green, blue) =
                    hsl_to_rgb_bytes(hsl.hue, hsl.saturation, hsl.lightness);
                Rgba {
                    red,
                    green,
                    blue,
                    alpha: unit_to_byte(hsl.alpha),
                }
            }
            Color::Hwb(hwb) => {
                let (red, green, blue) =
                    hwb_to_rgb_bytes(hwb.hue, hwb.whiteness, hwb.blackness);
                Rgba {
                    red,
                    green,
                    blue,
                    alpha: unit_to_byte(hwb.alpha),
                }
            }
        }
    }
}

impl Rgba {
    /// Alpha as the 0-1 fraction the protocol carries.
    pub fn alpha_unit(&self) -> f64 {
        f64::from(self.alpha) / 255.0
    }
}

/// Map a 0-1 fraction to a byte, rounding ties away from zero.
pub fn unit_to_byte(fraction: f64) -> u8 {
    (fraction.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn hsl_to_rgb_bytes(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let (red, green, blue) = hsl_to_rgb_units(hue, saturation, lightness);
    (unit_to_byte(red), unit_to_byte(green), unit_to_byte(blue))
}

fn hsl_to_rgb_units(hue: f64, saturation: f64, lightness: f64) -> (f64, f64, f64) {
    let hue = hue.rem_euclid(360.0);
    let saturation = (saturation / 100.0).clamp(0.0, 1.0);
    let lightness = (lightness / 100.0).clamp(0.0, 1.0);

    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let hue_prime = hue / 60.0;
    let x = chroma * (1.0 - (hue_prime % 2.0 - 1.0).abs());

    let (red, green, blue) = match hue_prime as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    let m = lightness - chroma / 2.0;
    (red + m, green + m, blue + m)
}

fn hwb_to_rgb_bytes(hue: f64, whiteness: f64, blackness: f64) -> (u8, u8, u8) {
    let whiteness = (whiteness / 100.0).clamp(0.0, 1.0);
    let blackness = (blackness / 100.0).clamp(0.0, 1.0);

    // Fully washed out: the hue no longer matters, only the gray level.
    if whiteness + blackness >= 1.0 {
        let gray = unit_to_byte(whiteness / (whiteness + blackness));
        return (gray, gray, gray);
    }

    let (red, green, blue) = hsl_to_rgb_units(hue, 100.0, 50.0);
    let scale = 1.0 - whiteness - blackness;
    (
        unit_to_byte(red * scale + whiteness),
        unit_to_byte(green * scale + whiteness),
        unit_to_byte(blue * scale + whiteness),
    )
}
