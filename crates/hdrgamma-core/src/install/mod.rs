//! Profile installation boundary
//!
//! Installing a profile and associating it with a display is platform
//! specific. [`ProfileInstaller`] is the seam: the core hands over finished
//! bytes and a [`DisplayId`], and gets back success or the platform's reason
//! for failure. Failures are passed up unchanged; nothing here retries.
//!
//! Install and uninstall against the same display must be serialized by the
//! caller.

mod directory;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use directory::{ASSOCIATIONS_FILE, DirectoryInstaller};

use crate::display::DisplayId;
use crate::profile::EncodedProfile;

/// Failures reported by an installer
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InstallError {
    #[error("profile file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// The platform call failed with an error code
    #[error("{operation} failed with OS error {code}")]
    Os { operation: &'static str, code: i32 },

    #[error("profile {0} is not installed")]
    NotInstalled(String),

    #[error("invalid association store: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl InstallError {
    /// Keep the OS code when the I/O error carries one
    pub fn from_io(operation: &'static str, err: io::Error) -> Self {
        match err.raw_os_error() {
            Some(code) => Self::Os { operation, code },
            None => Self::Io(err),
        }
    }
}

/// Installs, associates and removes calibration profiles
pub trait ProfileInstaller {
    /// Install `profile` and make it the display's default
    fn install(&self, profile: &EncodedProfile, display: &DisplayId) -> Result<(), InstallError>;

    /// Install a profile that already exists on disk
    fn install_file(&self, path: &Path, display: &DisplayId) -> Result<(), InstallError>;

    /// Disassociate `profile_name` from the display, then remove it
    fn uninstall(&self, profile_name: &str, display: &DisplayId) -> Result<(), InstallError>;

    fn is_installed(&self, profile_name: &str) -> bool;

    /// Profile currently associated with the display, if any
    fn associated_profile(&self, display: &DisplayId) -> Result<Option<String>, InstallError>;
}

impl<T: ProfileInstaller + ?Sized> ProfileInstaller for &T {
    fn install(&self, profile: &EncodedProfile, display: &DisplayId) -> Result<(), InstallError> {
        (**self).install(profile, display)
    }

    fn install_file(&self, path: &Path, display: &DisplayId) -> Result<(), InstallError> {
        (**self).install_file(path, display)
    }

    fn uninstall(&self, profile_name: &str, display: &DisplayId) -> Result<(), InstallError> {
        (**self).uninstall(profile_name, display)
    }

    fn is_installed(&self, profile_name: &str) -> bool {
        (**self).is_installed(profile_name)
    }

    fn associated_profile(&self, display: &DisplayId) -> Result<Option<String>, InstallError> {
        (**self).associated_profile(display)
    }
}
