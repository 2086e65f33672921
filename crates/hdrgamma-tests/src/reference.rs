//! Reference decoder wrapper
//!
//! Reads our profiles with moxcms and flattens the parts we care about into
//! plain values, so tests don't depend on the decoder's own types.

use anyhow::{Result, anyhow};

/// What moxcms sees in an encoded profile
#[derive(Debug, Clone)]
pub struct DecodedProfile {
    /// Debug rendering of the device class
    pub profile_class: String,
    /// Red, green, blue colorants as XYZ
    pub colorants: [[f64; 3]; 3],
    /// Entries of each TRC when stored as a `curv` table
    pub trc_luts: [Option<Vec<u16>>; 3],
    /// Debug rendering of the description tag
    pub description: String,
}

fn lut_of(trc: &Option<moxcms::ToneReprCurve>) -> Option<Vec<u16>> {
    match trc {
        Some(moxcms::ToneReprCurve::Lut(lut)) => Some(lut.clone()),
        _ => None,
    }
}

/// Decode `bytes` with moxcms
pub fn decode_moxcms(bytes: &[u8]) -> Result<DecodedProfile> {
    let profile = moxcms::ColorProfile::new_from_slice(bytes)
        .map_err(|e| anyhow!("moxcms rejected profile: {:?}", e))?;

    let colorant = |x: f64, y: f64, z: f64| [x, y, z];
    Ok(DecodedProfile {
        profile_class: format!("{:?}", profile.profile_class),
        colorants: [
            colorant(
                profile.red_colorant.x as f64,
                profile.red_colorant.y as f64,
                profile.red_colorant.z as f64,
            ),
            colorant(
                profile.green_colorant.x as f64,
                profile.green_colorant.y as f64,
                profile.green_colorant.z as f64,
            ),
            colorant(
                profile.blue_colorant.x as f64,
                profile.blue_colorant.y as f64,
                profile.blue_colorant.z as f64,
            ),
        ],
        trc_luts: [
            lut_of(&profile.red_trc),
            lut_of(&profile.green_trc),
            lut_of(&profile.blue_trc),
        ],
        description: format!("{:?}", profile.description),
    })
}
