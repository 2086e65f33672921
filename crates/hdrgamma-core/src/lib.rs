//! # hdrgamma - SDR gamma correction profiles for HDR desktops
//!
//! When Windows runs a display in HDR mode, SDR content is decoded with the
//! piecewise sRGB curve instead of the pure 2.2 power law most content is
//! mastered for, which lifts shadows and washes out contrast. This crate
//! computes the regamma curve that undoes the mismatch and writes it into an
//! ICC profile carrying the `MHC2` calibration tag, which the display
//! pipeline applies in hardware.
//!
//! ## Pipeline
//!
//! display characteristics → [`curve`] (via [`math::transfer`]) → LUTs →
//! [`profile::ProfileEncoder`] (via [`icc`]) → profile bytes →
//! [`install::ProfileInstaller`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use hdrgamma_core::{
//!     CorrectionConfig, DirectoryInstaller, DisplayCharacteristics, GammaCorrection,
//! };
//!
//! let installer = DirectoryInstaller::new("color").unwrap();
//! let correction = GammaCorrection::new(installer, CorrectionConfig::default()).unwrap();
//!
//! let display = DisplayCharacteristics {
//!     hdr_enabled: true,
//!     max_luminance: 600.0,
//!     sdr_white_level_nits: 240.0,
//!     ..Default::default()
//! };
//! let outcome = correction.apply(&display).unwrap();
//! println!("{:?} -> {}", outcome.before, outcome.after);
//! ```
//!
//! Encoding alone needs no installer:
//!
//! ```
//! use hdrgamma_core::{CalibrationMatrix, ProfileEncoder, ProfileMetadata, legacy_curve};
//!
//! let curve = legacy_curve(1024).unwrap();
//! let profile = ProfileEncoder::new(ProfileMetadata::new("Gamma 2.2"))
//!     .encode_uniform(&CalibrationMatrix::identity(), &curve)
//!     .unwrap();
//! assert_eq!(profile.tag_table().unwrap().len(), 11);
//! ```

pub mod color;
pub mod config;
pub mod correction;
pub mod curve;
pub mod display;
pub mod error;
pub mod icc;
pub mod install;
pub mod math;
pub mod profile;

pub use color::{Chromaticity, Colorants, Primaries, Xyz};
pub use config::CorrectionConfig;
pub use correction::{ApplyOutcome, CorrectionState, GammaCorrection};
pub use curve::{
    CurveCache, CurveKind, CurveRequest, HdrCurveParams, TransferCurve, hdr_curve, legacy_curve,
};
pub use display::{DisplayCharacteristics, DisplayId};
pub use error::{Error, Result};
pub use icc::{IccError, ProfileLayout, TagEntry, TagSignature};
pub use install::{DirectoryInstaller, InstallError, ProfileInstaller};
pub use math::{CalibrationMatrix, TransferFunction};
pub use profile::{EncodedProfile, ProfileEncoder, ProfileMetadata, RedColorantTag};

/// Version of hdrgamma
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
