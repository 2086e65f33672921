//! Calibration profile assembly
//!
//! [`ProfileEncoder`] turns a calibration matrix and three regamma curves into
//! a complete ICC v4 display profile with an `MHC2` tag. Encoding is pure: it
//! validates every input before producing bytes, and the result is checked
//! against the container's layout rules before it is returned.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::{Colorants, D50};
use crate::curve::TransferCurve;
use crate::icc::tags::{gamma_curve_tag, mluc_tag, xyz_tag};
use crate::icc::{
    DateTimeNumber, IccError, IccHeader, IccWriter, Mhc2Tag, ProfileClass, ProfileLayout,
    ProfileVersion, TAG_ENTRY_SIZE, TAG_TABLE_OFFSET, TagEntry, TagSignature,
};
use crate::math::{CalibrationMatrix, TARGET_GAMMA};
use crate::{Error, Result};

/// File name used when none is configured
pub const DEFAULT_PROFILE_FILE_NAME: &str = "HdrGamma22.icm";

/// Description used when none is configured
pub const DEFAULT_DESCRIPTION: &str = "Gamma 2.2 SDR Correction";

pub const DEFAULT_COPYRIGHT: &str = "No copyright, use freely";

/// Signature written for the red colorant tag
///
/// Correction profiles in circulation write `rXYS`; standard readers look
/// for `rXYZ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedColorantTag {
    #[default]
    Legacy,
    Conventional,
}

impl RedColorantTag {
    pub fn signature(self) -> TagSignature {
        match self {
            Self::Legacy => TagSignature::RED_COLORANT_LEGACY,
            Self::Conventional => TagSignature::RED_COLORANT,
        }
    }
}

/// Descriptive fields of a profile
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileMetadata {
    pub file_name: String,
    pub description: String,
    pub copyright: String,
    pub device_class: ProfileClass,
    pub version: ProfileVersion,
    pub creation_date: DateTimeNumber,
    pub red_colorant_tag: RedColorantTag,
}

impl ProfileMetadata {
    /// Defaults, stamped with the current UTC time
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            creation_date: DateTimeNumber::now(),
            ..Self::default()
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn with_copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyright = copyright.into();
        self
    }

    pub fn with_creation_date(mut self, date: DateTimeNumber) -> Self {
        self.creation_date = date;
        self
    }

    pub fn with_version(mut self, version: ProfileVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_red_colorant_tag(mut self, tag: RedColorantTag) -> Self {
        self.red_colorant_tag = tag;
        self
    }

    fn validate(&self) -> Result<()> {
        let name = &self.file_name;
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(Error::InvalidInput(format!(
                "profile file name {:?} is not a plain file name",
                name
            )));
        }
        Ok(())
    }
}

/// Zero timestamp; see [`ProfileMetadata::new`] for a stamped one
impl Default for ProfileMetadata {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_PROFILE_FILE_NAME.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            copyright: DEFAULT_COPYRIGHT.to_string(),
            device_class: ProfileClass::Display,
            version: ProfileVersion::default(),
            creation_date: DateTimeNumber::default(),
            red_colorant_tag: RedColorantTag::default(),
        }
    }
}

/// Assembles MHC2 calibration profiles
#[derive(Debug, Clone)]
pub struct ProfileEncoder {
    metadata: ProfileMetadata,
    colorants: Colorants,
    min_luminance: f64,
    max_luminance: f64,
    trc_gamma: f64,
}

impl ProfileEncoder {
    /// Rec.709 colorants, 0-80 nits, gamma 2.2 TRCs
    pub fn new(metadata: ProfileMetadata) -> Self {
        Self {
            metadata,
            colorants: Colorants::REC709_D50,
            min_luminance: 0.0,
            max_luminance: 80.0,
            trc_gamma: TARGET_GAMMA,
        }
    }

    pub fn with_colorants(mut self, colorants: Colorants) -> Self {
        self.colorants = colorants;
        self
    }

    /// Display luminance range in nits
    pub fn with_luminance(mut self, min: f64, max: f64) -> Self {
        self.min_luminance = min;
        self.max_luminance = max;
        self
    }

    pub fn with_trc_gamma(mut self, gamma: f64) -> Self {
        self.trc_gamma = gamma;
        self
    }

    pub fn metadata(&self) -> &ProfileMetadata {
        &self.metadata
    }

    /// Encode with the same curve on all three channels
    pub fn encode_uniform(
        &self,
        matrix: &CalibrationMatrix,
        curve: &TransferCurve,
    ) -> Result<EncodedProfile> {
        self.encode(matrix, [curve, curve, curve])
    }

    /// Encode a profile for the given matrix and red, green, blue curves
    pub fn encode(
        &self,
        matrix: &CalibrationMatrix,
        curves: [&TransferCurve; 3],
    ) -> Result<EncodedProfile> {
        self.validate()?;

        let [red, green, blue] = curves;
        let mhc2 = Mhc2Tag {
            min_luminance: self.min_luminance,
            max_luminance: self.max_luminance,
            matrix,
            red,
            green,
            blue,
        };
        mhc2.validate()?;

        let tags = self.build_tags(&mhc2)?;
        let bytes = assemble(&self.metadata, &tags)?;

        debug!(
            file_name = %self.metadata.file_name,
            tags = tags.len(),
            size = bytes.len(),
            lut_entries = mhc2.entry_count(),
            "encoded calibration profile"
        );

        Ok(EncodedProfile {
            file_name: self.metadata.file_name.clone(),
            bytes,
        })
    }

    fn validate(&self) -> Result<()> {
        self.metadata.validate()?;
        if !self.colorants.is_finite() {
            return Err(Error::InvalidInput(
                "colorants must be finite".to_string(),
            ));
        }
        if !self.min_luminance.is_finite()
            || !self.max_luminance.is_finite()
            || self.min_luminance < 0.0
            || self.max_luminance < self.min_luminance
        {
            return Err(Error::InvalidInput(format!(
                "invalid luminance range {}..{} nits",
                self.min_luminance, self.max_luminance
            )));
        }
        if !self.trc_gamma.is_finite() || self.trc_gamma <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "TRC gamma must be finite and positive, got {}",
                self.trc_gamma
            )));
        }
        Ok(())
    }

    /// Tag bodies in directory order
    fn build_tags(&self, mhc2: &Mhc2Tag<'_>) -> std::result::Result<Vec<(TagSignature, Vec<u8>)>, IccError> {
        let meta = &self.metadata;
        let trc = gamma_curve_tag(self.trc_gamma)?;

        Ok(vec![
            (TagSignature::PROFILE_DESC, mluc_tag(&meta.description)?),
            (TagSignature::COPYRIGHT, mluc_tag(&meta.copyright)?),
            (meta.red_colorant_tag.signature(), xyz_tag(&self.colorants.red)?),
            (TagSignature::GREEN_COLORANT, xyz_tag(&self.colorants.green)?),
            (TagSignature::BLUE_COLORANT, xyz_tag(&self.colorants.blue)?),
            (TagSignature::MEDIA_WHITE, xyz_tag(&D50.xyz)?),
            (
                TagSignature::LUMINANCE,
                xyz_tag(&D50.xyz.scale(self.max_luminance))?,
            ),
            (TagSignature::RED_TRC, trc.clone()),
            (TagSignature::GREEN_TRC, trc.clone()),
            (TagSignature::BLUE_TRC, trc),
            (TagSignature::MHC2, mhc2.encode()?),
        ])
    }
}

/// Header, directory, then each body in order
fn assemble(
    metadata: &ProfileMetadata,
    tags: &[(TagSignature, Vec<u8>)],
) -> std::result::Result<Vec<u8>, IccError> {
    let too_large = || IccError::InvalidInput("profile exceeds 4 GiB".to_string());

    let mut entries = Vec::with_capacity(tags.len());
    let mut offset = TAG_TABLE_OFFSET + tags.len() * TAG_ENTRY_SIZE;
    for (signature, body) in tags {
        entries.push(TagEntry {
            signature: *signature,
            offset: u32::try_from(offset).map_err(|_| too_large())?,
            length: u32::try_from(body.len()).map_err(|_| too_large())?,
        });
        offset += body.len();
    }
    let total = u32::try_from(offset).map_err(|_| too_large())?;

    let mut header = IccHeader::new(
        metadata.device_class,
        metadata.version,
        metadata.creation_date,
    );
    header.size = total;

    let mut w = IccWriter::with_capacity(offset);
    header.write(&mut w)?;
    w.write_u32(entries.len() as u32);
    for entry in &entries {
        w.write_tag_signature(entry.signature);
        w.write_u32(entry.offset);
        w.write_u32(entry.length);
    }
    for (entry, (_, body)) in entries.iter().zip(tags) {
        if w.len() != entry.offset as usize {
            return Err(IccError::LayoutInvariant(format!(
                "tag '{}' written at {}, directory says {}",
                entry.signature,
                w.len(),
                entry.offset
            )));
        }
        w.write_bytes(body);
    }

    let bytes = w.into_bytes();
    let layout = ProfileLayout::parse(&bytes)?;
    layout.check_layout()?;
    if layout.tags.len() != tags.len() {
        return Err(IccError::LayoutInvariant(format!(
            "directory lists {} tags, {} written",
            layout.tags.len(),
            tags.len()
        )));
    }
    Ok(bytes)
}

/// A finished profile; never edited in place
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedProfile {
    file_name: String,
    bytes: Vec<u8>,
}

impl EncodedProfile {
    /// Wrap bytes from elsewhere, checking the layout
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        ProfileLayout::parse(&bytes)?.check_layout()?;
        Ok(Self {
            file_name: file_name.into(),
            bytes,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn layout(&self) -> Result<ProfileLayout<'_>> {
        Ok(ProfileLayout::parse(&self.bytes)?)
    }

    /// Directory entries in file order
    pub fn tag_table(&self) -> Result<Vec<TagEntry>> {
        Ok(self.layout()?.tags)
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, &self.bytes)?;
        Ok(())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{HdrCurveParams, hdr_curve, legacy_curve};
    use crate::icc::{Mhc2Data, TagData};

    fn fixed_metadata() -> ProfileMetadata {
        ProfileMetadata::default().with_creation_date(DateTimeNumber {
            year: 2025,
            month: 1,
            day: 2,
            hour: 3,
            minute: 4,
            second: 5,
        })
    }

    fn encode_legacy(metadata: ProfileMetadata) -> EncodedProfile {
        let curve = legacy_curve(1024).unwrap();
        ProfileEncoder::new(metadata)
            .with_luminance(0.1, 400.0)
            .encode_uniform(&CalibrationMatrix::identity(), &curve)
            .unwrap()
    }

    #[test]
    fn test_tag_order_and_count() {
        let profile = encode_legacy(fixed_metadata());
        let layout = profile.layout().unwrap();
        let sigs: Vec<String> = layout.signatures().map(|s| s.to_string()).collect();
        assert_eq!(
            sigs,
            [
                "desc", "cprt", "rXYS", "gXYZ", "bXYZ", "wtpt", "lumi", "rTRC", "gTRC", "bTRC",
                "MHC2"
            ]
        );
        assert_eq!(layout.tags[0].offset, 264);
    }

    #[test]
    fn test_size_and_alignment() {
        let profile = encode_legacy(fixed_metadata());
        let bytes = profile.as_bytes();
        let declared = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        assert_eq!(declared as usize, bytes.len());
        assert_eq!(bytes.len() % 4, 0);
        profile.layout().unwrap().check_layout().unwrap();
    }

    #[test]
    fn test_conventional_red_tag() {
        let profile =
            encode_legacy(fixed_metadata().with_red_colorant_tag(RedColorantTag::Conventional));
        let layout = profile.layout().unwrap();
        assert!(layout.find(TagSignature::RED_COLORANT).is_some());
        assert!(layout.find(TagSignature::RED_COLORANT_LEGACY).is_none());
    }

    #[test]
    fn test_luminance_tag() {
        let profile = encode_legacy(fixed_metadata());
        let layout = profile.layout().unwrap();
        match layout.tag(TagSignature::LUMINANCE).unwrap() {
            Some(TagData::Xyz(xyz)) => {
                assert!((xyz.y - 400.0).abs() < 1e-4);
                assert!((xyz.x - 0.9642 * 400.0).abs() < 1e-3);
            }
            other => panic!("unexpected lumi {:?}", other),
        }
    }

    #[test]
    fn test_mhc2_carries_curve() {
        let curve = hdr_curve(&HdrCurveParams::new(200.0)).unwrap();
        let profile = ProfileEncoder::new(fixed_metadata())
            .with_luminance(0.05, 1000.0)
            .encode_uniform(&CalibrationMatrix::identity(), &curve)
            .unwrap();
        let layout = profile.layout().unwrap();
        let Some(TagData::Mhc2(Mhc2Data { red, blue, max_luminance, .. })) =
            layout.tag(TagSignature::MHC2).unwrap()
        else {
            panic!("MHC2 tag missing");
        };
        assert_eq!(red.len(), 4096);
        assert_eq!(red, blue);
        assert!((max_luminance - 1000.0).abs() < 1e-9);
        for (got, want) in red.iter().zip(curve.samples()) {
            assert!((got - want).abs() <= 0.5 / 65536.0 + 1e-12);
        }
    }

    #[test]
    fn test_deterministic() {
        let a = encode_legacy(fixed_metadata());
        let b = encode_legacy(fixed_metadata());
        assert_eq!(a, b);
    }

    #[test]
    fn test_only_date_differs() {
        let a = encode_legacy(fixed_metadata());
        let b = encode_legacy(fixed_metadata().with_creation_date(DateTimeNumber::default()));
        let diffs: Vec<usize> = a
            .as_bytes()
            .iter()
            .zip(b.as_bytes())
            .enumerate()
            .filter(|(_, (x, y))| x != y)
            .map(|(i, _)| i)
            .collect();
        assert!(!diffs.is_empty());
        assert!(diffs.iter().all(|&i| (24..36).contains(&i)), "{:?}", diffs);
    }

    #[test]
    fn test_rejects_before_encoding() {
        let a = legacy_curve(1024).unwrap();
        let b = legacy_curve(512).unwrap();
        let encoder = ProfileEncoder::new(fixed_metadata());
        let err = encoder
            .encode(&CalibrationMatrix::identity(), [&a, &b, &a])
            .unwrap_err();
        assert!(err.is_invalid_input(), "{}", err);

        let err = ProfileEncoder::new(fixed_metadata())
            .with_luminance(0.0, f64::NAN)
            .encode_uniform(&CalibrationMatrix::identity(), &a)
            .unwrap_err();
        assert!(err.is_invalid_input());

        let err = ProfileEncoder::new(fixed_metadata().with_file_name("../evil.icm"))
            .encode_uniform(&CalibrationMatrix::identity(), &a)
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_write_to() {
        let profile = encode_legacy(fixed_metadata());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(profile.file_name());
        profile.write_to(&path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), profile.as_bytes());

        let reread = EncodedProfile::from_bytes(profile.file_name(), fs::read(&path).unwrap())
            .unwrap();
        assert_eq!(reread.tag_table().unwrap().len(), 11);
    }
}
