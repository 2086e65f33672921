//! Gamma 2.2 correction: build, apply, revert, diagnose
//!
//! HDR displays get the HDR-aware curve at their current SDR white level,
//! SDR displays get the legacy curve. The same curve drives all three
//! channels and the matrix is identity.
//!
//! Everything that can fail on bad input fails before the installer is
//! touched, so a rejected apply leaves the display's current profile in
//! place. [`ApplyOutcome`] carries the previous association so a caller can
//! restore it.

use std::sync::Arc;

use tracing::info;

use crate::color::Colorants;
use crate::config::CorrectionConfig;
use crate::curve::{CurveCache, CurveRequest, HdrCurveParams, TransferCurve};
use crate::display::{DisplayCharacteristics, DisplayId};
use crate::install::ProfileInstaller;
use crate::math::CalibrationMatrix;
use crate::profile::{EncodedProfile, ProfileEncoder, ProfileMetadata};
use crate::Result;

/// Association state of one display before and after an apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub display: DisplayId,
    /// Profile associated before the apply, if any
    pub before: Option<String>,
    pub after: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionState {
    Applied,
    NotApplied,
}

pub struct GammaCorrection<I> {
    installer: I,
    config: CorrectionConfig,
    cache: Option<CurveCache>,
}

impl<I: ProfileInstaller> GammaCorrection<I> {
    pub fn new(installer: I, config: CorrectionConfig) -> Result<Self> {
        config.validate()?;
        let cache = config.cache_curves.then(CurveCache::new);
        Ok(Self {
            installer,
            config,
            cache,
        })
    }

    pub fn installer(&self) -> &I {
        &self.installer
    }

    pub fn config(&self) -> &CorrectionConfig {
        &self.config
    }

    /// The curve this display needs
    pub fn curve_request(&self, display: &DisplayCharacteristics) -> CurveRequest {
        if display.hdr_enabled {
            let white = display.effective_sdr_white_nits(self.config.default_white_level_nits);
            CurveRequest::HdrAware(
                HdrCurveParams::new(white)
                    .with_size(self.config.hdr_lut_size)
                    .with_black_level(self.config.black_level_nits)
                    .with_gamma(self.config.target_gamma),
            )
        } else {
            CurveRequest::Legacy {
                size: self.config.legacy_lut_size,
                gamma: self.config.target_gamma,
            }
        }
    }

    fn curve(&self, request: &CurveRequest) -> Result<Arc<TransferCurve>> {
        match &self.cache {
            Some(cache) => cache.get_or_build(request),
            None => Ok(Arc::new(request.build()?)),
        }
    }

    /// Encode the correction profile for `display` without installing it
    pub fn build_profile(&self, display: &DisplayCharacteristics) -> Result<EncodedProfile> {
        display.validate()?;

        let curve = self.curve(&self.curve_request(display))?;
        let colorants = if self.config.use_display_primaries {
            display.colorants()
        } else {
            Colorants::REC709_D50
        };

        let metadata = ProfileMetadata::new(self.config.description.clone())
            .with_file_name(self.config.profile_file_name.clone())
            .with_copyright(self.config.copyright.clone())
            .with_red_colorant_tag(self.config.red_colorant_tag);

        ProfileEncoder::new(metadata)
            .with_colorants(colorants)
            .with_luminance(display.min_luminance, display.max_luminance)
            .with_trc_gamma(self.config.target_gamma)
            .encode_uniform(&CalibrationMatrix::identity(), &curve)
    }

    /// Build, install and associate the correction profile
    pub fn apply(&self, display: &DisplayCharacteristics) -> Result<ApplyOutcome> {
        let profile = self.build_profile(display)?;

        let before = self.installer.associated_profile(&display.id)?;
        self.installer.install(&profile, &display.id)?;

        let (id, name, hdr) = (display.id, &display.name, display.hdr_enabled);
        info!(
            display = %id,
            name = %name,
            hdr,
            profile = profile.file_name(),
            previous = ?before,
            "applied gamma correction"
        );
        Ok(ApplyOutcome {
            display: display.id,
            before,
            after: profile.file_name().to_string(),
        })
    }

    /// Disassociate and remove the correction profile
    pub fn revert(&self, display: &DisplayCharacteristics) -> Result<()> {
        self.installer
            .uninstall(&self.config.profile_file_name, &display.id)?;
        let id = display.id;
        info!(display = %id, profile = %self.config.profile_file_name, "reverted gamma correction");
        Ok(())
    }

    /// Whether the correction profile is installed at all
    pub fn diagnose(&self) -> CorrectionState {
        if self.installer.is_installed(&self.config.profile_file_name) {
            CorrectionState::Applied
        } else {
            CorrectionState::NotApplied
        }
    }

    /// Whether the correction profile is the display's current association
    pub fn diagnose_display(&self, display: &DisplayId) -> Result<CorrectionState> {
        let associated = self.installer.associated_profile(display)?;
        Ok(
            if associated.as_deref() == Some(self.config.profile_file_name.as_str()) {
                CorrectionState::Applied
            } else {
                CorrectionState::NotApplied
            },
        )
    }
}
