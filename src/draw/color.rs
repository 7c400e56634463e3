use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("invalid color format: {0:?}")]
    InvalidFormat(String),
    #[error("color channel {channel} out of range: {value}")]
    ChannelOutOfRange { channel: &'static str, value: i64 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Builds a color from wider integers, rejecting any channel outside 0..=255.
    pub fn try_from_channels(r: i64, g: i64, b: i64, a: i64) -> Result<Self, ColorError> {
        Ok(Self {
            r: channel("r", r)?,
            g: channel("g", g)?,
            b: channel("b", b)?,
            a: channel("a", a)?,
        })
    }

    pub fn to_rgba_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_rgba_array(color: [u8; 4]) -> Self {
        Self::rgba(color[0], color[1], color[2], color[3])
    }

    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Parses the color strings a toolbar or settings file may hand over.
    ///
    /// Accepted forms: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`,
    /// `rgba(r, g, b, a)` with `a` in `0..=1`, and the names `black`, `white`
    /// and `transparent`.
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let trimmed = input.trim();
        let invalid = || ColorError::InvalidFormat(input.to_owned());

        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }

        let lower = trimmed.to_ascii_lowercase();
        match lower.as_str() {
            "black" => return Ok(Self::BLACK),
            "white" => return Ok(Self::WHITE),
            "transparent" => return Ok(Self::TRANSPARENT),
            _ => {}
        }

        if let Some(body) = function_body(&lower, "rgba") {
            let parts: Vec<&str> = body.split(',').map(str::trim).collect();
            let [r, g, b, a] = parts.as_slice() else {
                return Err(invalid());
            };
            let alpha: f32 = a.parse().map_err(|_| invalid())?;
            if !(0.0..=1.0).contains(&alpha) {
                return Err(invalid());
            }
            return Self::try_from_channels(
                parse_int(r).ok_or_else(invalid)?,
                parse_int(g).ok_or_else(invalid)?,
                parse_int(b).ok_or_else(invalid)?,
                (alpha * 255.0).round() as i64,
            );
        }

        if let Some(body) = function_body(&lower, "rgb") {
            let parts: Vec<&str> = body.split(',').map(str::trim).collect();
            let [r, g, b] = parts.as_slice() else {
                return Err(invalid());
            };
            return Self::try_from_channels(
                parse_int(r).ok_or_else(invalid)?,
                parse_int(g).ok_or_else(invalid)?,
                parse_int(b).ok_or_else(invalid)?,
                255,
            );
        }

        Err(invalid())
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl std::str::FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Fill-matching equality.
///
/// Two fully transparent colors are always equal and a transparent color never
/// equals an opaque one; otherwise every channel must differ by at most
/// `tolerance`.
pub fn colors_equal(a: Color, b: Color, tolerance: u8) -> bool {
    match (a.is_transparent(), b.is_transparent()) {
        (true, true) => true,
        (true, false) | (false, true) => false,
        (false, false) => {
            let t = tolerance as i16;
            (a.r as i16 - b.r as i16).abs() <= t
                && (a.g as i16 - b.g as i16).abs() <= t
                && (a.b as i16 - b.b as i16).abs() <= t
                && (a.a as i16 - b.a as i16).abs() <= t
        }
    }
}

fn channel(name: &'static str, value: i64) -> Result<u8, ColorError> {
    u8::try_from(value).map_err(|_| ColorError::ChannelOutOfRange {
        channel: name,
        value,
    })
}

fn function_body<'a>(input: &'a str, name: &str) -> Option<&'a str> {
    input
        .strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_int(value: &str) -> Option<i64> {
    value.parse().ok()
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Color::rgba(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}
