//! ICC basic types
//!
//! Number encodings from ICC.1:2022 section 4. Encoding rounds to nearest and
//! refuses to wrap; decoding is exact.

use std::fmt;

use chrono::{DateTime, Datelike, Timelike, Utc};

use super::IccError;
use crate::color::Xyz;

/// ICC tag signature (4-byte ASCII code)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagSignature(pub u32);

impl TagSignature {
    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(b))
    }

    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    pub const PROFILE_DESC: Self = Self::from_bytes(*b"desc");
    pub const COPYRIGHT: Self = Self::from_bytes(*b"cprt");
    pub const RED_COLORANT: Self = Self::from_bytes(*b"rXYZ");
    /// Red colorant code as written by the shipping correction profiles
    pub const RED_COLORANT_LEGACY: Self = Self::from_bytes(*b"rXYS");
    pub const GREEN_COLORANT: Self = Self::from_bytes(*b"gXYZ");
    pub const BLUE_COLORANT: Self = Self::from_bytes(*b"bXYZ");
    pub const MEDIA_WHITE: Self = Self::from_bytes(*b"wtpt");
    pub const LUMINANCE: Self = Self::from_bytes(*b"lumi");
    pub const RED_TRC: Self = Self::from_bytes(*b"rTRC");
    pub const GREEN_TRC: Self = Self::from_bytes(*b"gTRC");
    pub const BLUE_TRC: Self = Self::from_bytes(*b"bTRC");
    /// Microsoft hardware calibration tag
    pub const MHC2: Self = Self::from_bytes(*b"MHC2");
}

impl fmt::Display for TagSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.to_bytes()))
    }
}

/// Type signatures for ICC tag data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSignature(pub u32);

impl TypeSignature {
    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(b))
    }

    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    pub const XYZ: Self = Self::from_bytes(*b"XYZ ");
    pub const CURVE: Self = Self::from_bytes(*b"curv");
    pub const MLUC: Self = Self::from_bytes(*b"mluc");
    pub const SF32: Self = Self::from_bytes(*b"sf32");
    pub const MHC2: Self = Self::from_bytes(*b"MHC2");
}

/// s15Fixed16Number - 16.16 signed fixed point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct S15Fixed16(pub i32);

impl S15Fixed16 {
    pub const ONE: Self = Self(0x0001_0000);

    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// `round(val * 65536)`, rejecting non-finite and out-of-range values
    pub fn try_from_f64(val: f64) -> Result<Self, IccError> {
        let scaled = (val * 65536.0).round();
        if !scaled.is_finite() || scaled < i32::MIN as f64 || scaled > i32::MAX as f64 {
            return Err(IccError::FixedPointOverflow { value: val });
        }
        Ok(Self(scaled as i32))
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 65536.0
    }

    pub fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self(i32::from_be_bytes(bytes))
    }

    pub fn to_be_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

/// u8Fixed8Number - unsigned 8.8 fixed point, used by the gamma form of 'curv'
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct U8Fixed8(pub u16);

impl U8Fixed8 {
    pub fn try_from_f64(val: f64) -> Result<Self, IccError> {
        let scaled = (val * 256.0).round();
        if !scaled.is_finite() || scaled < 0.0 || scaled > u16::MAX as f64 {
            return Err(IccError::FixedPointOverflow { value: val });
        }
        Ok(Self(scaled as u16))
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 256.0
    }

    pub fn from_be_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_be_bytes(bytes))
    }
}

/// XYZNumber - three s15Fixed16 values
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct XyzNumber {
    pub x: S15Fixed16,
    pub y: S15Fixed16,
    pub z: S15Fixed16,
}

impl XyzNumber {
    pub fn try_from_xyz(xyz: &Xyz) -> Result<Self, IccError> {
        Ok(Self {
            x: S15Fixed16::try_from_f64(xyz.x)?,
            y: S15Fixed16::try_from_f64(xyz.y)?,
            z: S15Fixed16::try_from_f64(xyz.z)?,
        })
    }

    /// Parse from 12 bytes (big-endian)
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 12 {
            return None;
        }
        Some(Self {
            x: S15Fixed16::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            y: S15Fixed16::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            z: S15Fixed16::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
        })
    }

    pub fn to_xyz(&self) -> Xyz {
        Xyz::new(self.x.to_f64(), self.y.to_f64(), self.z.to_f64())
    }
}

/// dateTimeNumber - header creation date, UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateTimeNumber {
    pub year: u16,
    pub month: u16,
    pub day: u16,
    pub hour: u16,
    pub minute: u16,
    pub second: u16,
}

impl DateTimeNumber {
    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    /// Parse from 12 bytes (big-endian)
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 12 {
            return None;
        }
        let field = |i: usize| u16::from_be_bytes([bytes[i], bytes[i + 1]]);
        Some(Self {
            year: field(0),
            month: field(2),
            day: field(4),
            hour: field(6),
            minute: field(8),
            second: field(10),
        })
    }

    pub fn fields(&self) -> [u16; 6] {
        [
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
        ]
    }
}

impl From<DateTime<Utc>> for DateTimeNumber {
    fn from(dt: DateTime<Utc>) -> Self {
        Self {
            year: dt.year().clamp(0, u16::MAX as i32) as u16,
            month: dt.month() as u16,
            day: dt.day() as u16,
            hour: dt.hour() as u16,
            minute: dt.minute() as u16,
            // Leap seconds are folded into :59
            second: dt.second().min(59) as u16,
        }
    }
}
