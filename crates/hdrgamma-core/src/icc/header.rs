//! ICC Profile Header
//!
//! The header is exactly 128 bytes. See ICC.1:2022 Section 7.2.

use super::error::IccError;
use super::types::{DateTimeNumber, XyzNumber};
use super::writer::IccWriter;
use crate::color::{D50, Xyz};

/// Profile file signature - must be 'acsp' (0x61637370)
pub const PROFILE_SIGNATURE: u32 = 0x61637370;

/// Primary platform 'MSFT'
pub const PLATFORM_MICROSOFT: u32 = u32::from_be_bytes(*b"MSFT");

/// Header size, and the minimum valid profile size
pub const HEADER_SIZE: usize = 128;

/// The header fields this crate writes; everything else is zero
#[derive(Debug, Clone, PartialEq)]
pub struct IccHeader {
    /// Profile size in bytes
    pub size: u32,
    pub version: ProfileVersion,
    pub device_class: ProfileClass,
    /// Color space of data
    pub color_space: ColorSpace,
    /// Profile connection space
    pub pcs: ColorSpace,
    pub creation_date: DateTimeNumber,
    pub platform: u32,
    pub rendering_intent: RenderingIntent,
    /// PCS illuminant (D50)
    pub illuminant: Xyz,
}

impl IccHeader {
    /// An RGB→XYZ header for the given class, size still unknown
    pub fn new(device_class: ProfileClass, version: ProfileVersion, date: DateTimeNumber) -> Self {
        Self {
            size: 0,
            version,
            device_class,
            color_space: ColorSpace::Rgb,
            pcs: ColorSpace::Xyz,
            creation_date: date,
            platform: PLATFORM_MICROSOFT,
            rendering_intent: RenderingIntent::Perceptual,
            illuminant: D50.xyz,
        }
    }

    /// Append the 128 header bytes
    pub fn write(&self, w: &mut IccWriter) -> Result<(), IccError> {
        let start = w.len();

        w.write_u32(self.size); // 0
        w.write_u32(0); // 4 preferred CMM
        w.write_u32(self.version.to_u32()); // 8
        w.write_u32(self.device_class.to_u32()); // 12
        w.write_u32(self.color_space.to_u32()); // 16
        w.write_u32(self.pcs.to_u32()); // 20
        for field in self.creation_date.fields() {
            w.write_u16(field); // 24..36
        }
        w.write_u32(PROFILE_SIGNATURE); // 36
        w.write_u32(self.platform); // 40
        w.write_zeros(4 + 4 + 4 + 8); // 44 flags, manufacturer, model, attributes
        w.write_u32(self.rendering_intent.to_u32()); // 64
        w.write_xyz(&self.illuminant)?; // 68
        w.write_zeros(4 + 16 + 28); // 80 creator, profile ID, reserved

        let written = w.len() - start;
        if written != HEADER_SIZE {
            return Err(IccError::LayoutInvariant(format!(
                "header is {} bytes, expected {}",
                written, HEADER_SIZE
            )));
        }
        Ok(())
    }

    /// Parse header from bytes
    pub fn parse(data: &[u8]) -> Result<Self, IccError> {
        if data.len() < HEADER_SIZE {
            return Err(IccError::TooSmall {
                expected: HEADER_SIZE,
                actual: data.len(),
            });
        }

        let be = |i: usize| u32::from_be_bytes([data[i], data[i + 1], data[i + 2], data[i + 3]]);

        let signature = be(36);
        if signature != PROFILE_SIGNATURE {
            return Err(IccError::InvalidSignature(signature));
        }

        Ok(Self {
            size: be(0),
            version: ProfileVersion::from_u32(be(8)),
            device_class: ProfileClass::from_u32(be(12))?,
            color_space: ColorSpace::from_u32(be(16))?,
            pcs: ColorSpace::from_u32(be(20))?,
            creation_date: DateTimeNumber::from_bytes(&data[24..36]).unwrap_or_default(),
            platform: be(40),
            rendering_intent: RenderingIntent::from_u32(be(64))?,
            illuminant: XyzNumber::from_bytes(&data[68..80])
                .unwrap_or_default()
                .to_xyz(),
        })
    }
}

/// ICC Profile Version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl ProfileVersion {
    pub const V4_3: Self = Self::new(4, 3, 0);
    pub const V4_4: Self = Self::new(4, 4, 0);

    pub const fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Byte 8 major, byte 9 minor/bugfix nibbles, bytes 10..12 zero
    pub fn to_u32(&self) -> u32 {
        u32::from_be_bytes([self.major, (self.minor << 4) | (self.patch & 0x0F), 0, 0])
    }

    pub fn from_u32(val: u32) -> Self {
        let [major, minor, _, _] = val.to_be_bytes();
        Self {
            major,
            minor: minor >> 4,
            patch: minor & 0x0F,
        }
    }
}

impl Default for ProfileVersion {
    fn default() -> Self {
        Self::V4_3
    }
}

/// Device class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileClass {
    /// Input device (scanner, camera)
    Input,
    /// Display device (monitor)
    #[default]
    Display,
    /// Output device (printer)
    Output,
}

impl ProfileClass {
    pub fn from_u32(val: u32) -> Result<Self, IccError> {
        match &val.to_be_bytes() {
            b"scnr" => Ok(Self::Input),
            b"mntr" => Ok(Self::Display),
            b"prtr" => Ok(Self::Output),
            _ => Err(IccError::InvalidProfileClass(val)),
        }
    }

    pub fn to_u32(&self) -> u32 {
        match self {
            Self::Input => u32::from_be_bytes(*b"scnr"),
            Self::Display => u32::from_be_bytes(*b"mntr"),
            Self::Output => u32::from_be_bytes(*b"prtr"),
        }
    }
}

/// Data and connection color spaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Xyz,
    Lab,
    Rgb,
}

impl ColorSpace {
    pub fn from_u32(val: u32) -> Result<Self, IccError> {
        match &val.to_be_bytes() {
            b"XYZ " => Ok(Self::Xyz),
            b"Lab " => Ok(Self::Lab),
            b"RGB " => Ok(Self::Rgb),
            _ => Err(IccError::InvalidColorSpace(val)),
        }
    }

    pub fn to_u32(&self) -> u32 {
        match self {
            Self::Xyz => u32::from_be_bytes(*b"XYZ "),
            Self::Lab => u32::from_be_bytes(*b"Lab "),
            Self::Rgb => u32::from_be_bytes(*b"RGB "),
        }
    }
}

/// ICC Rendering Intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderingIntent {
    #[default]
    Perceptual,
    RelativeColorimetric,
    Saturation,
    AbsoluteColorimetric,
}

impl RenderingIntent {
    pub fn from_u32(val: u32) -> Result<Self, IccError> {
        match val {
            0 => Ok(Self::Perceptual),
            1 => Ok(Self::RelativeColorimetric),
            2 => Ok(Self::Saturation),
            3 => Ok(Self::AbsoluteColorimetric),
            _ => Err(IccError::InvalidRenderingIntent(val)),
        }
    }

    pub fn to_u32(&self) -> u32 {
        match self {
            Self::Perceptual => 0,
            Self::RelativeColorimetric => 1,
            Self::Saturation => 2,
            Self::AbsoluteColorimetric => 3,
        }
    }
}
