use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::{InstallError, ProfileInstaller};
use crate::display::DisplayId;
use crate::profile::EncodedProfile;

/// Association table kept next to the installed profiles
pub const ASSOCIATIONS_FILE: &str = "associations.json";

/// Display id → profile file name
type Associations = BTreeMap<String, String>;

/// Installer backed by a plain color directory
///
/// Profiles are stored as files; associations live in
/// [`ASSOCIATIONS_FILE`], keyed by the display id's string form.
#[derive(Debug, Clone)]
pub struct DirectoryInstaller {
    root: PathBuf,
}

impl DirectoryInstaller {
    /// Use `root` as the color directory, creating it if needed
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, InstallError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| InstallError::from_io("create color directory", e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn profile_path(&self, profile_name: &str) -> PathBuf {
        self.root.join(profile_name)
    }

    fn associations_path(&self) -> PathBuf {
        self.root.join(ASSOCIATIONS_FILE)
    }

    fn load_associations(&self) -> Result<Associations, InstallError> {
        let path = self.associations_path();
        if !path.exists() {
            return Ok(Associations::new());
        }
        let text =
            fs::read_to_string(&path).map_err(|e| InstallError::from_io("read associations", e))?;
        serde_json::from_str(&text).map_err(|e| InstallError::Store(e.to_string()))
    }

    /// Write to a sibling file, then rename over the old table
    fn save_associations(&self, associations: &Associations) -> Result<(), InstallError> {
        let json = serde_json::to_string_pretty(associations)
            .map_err(|e| InstallError::Store(e.to_string()))?;
        let tmp = self.root.join(format!("{}.tmp", ASSOCIATIONS_FILE));
        fs::write(&tmp, json).map_err(|e| InstallError::from_io("write associations", e))?;
        fs::rename(&tmp, self.associations_path())
            .map_err(|e| InstallError::from_io("write associations", e))
    }

    fn associate(&self, profile_name: &str, display_id: &DisplayId) -> Result<(), InstallError> {
        let mut associations = self.load_associations()?;
        associations.insert(display_id.to_string(), profile_name.to_string());
        self.save_associations(&associations)?;
        info!(display = %display_id, profile = profile_name, "associated profile");
        Ok(())
    }
}

impl ProfileInstaller for DirectoryInstaller {
    fn install(&self, profile: &EncodedProfile, display: &DisplayId) -> Result<(), InstallError> {
        let path = self.profile_path(profile.file_name());
        fs::write(&path, profile.as_bytes())
            .map_err(|e| InstallError::from_io("install profile", e))?;
        info!(path = %path.display(), bytes = profile.len(), "installed profile");
        self.associate(profile.file_name(), display)
    }

    fn install_file(&self, path: &Path, display: &DisplayId) -> Result<(), InstallError> {
        if !path.is_file() {
            return Err(InstallError::MissingFile(path.to_path_buf()));
        }
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| InstallError::MissingFile(path.to_path_buf()))?
            .to_string();

        // Copy through a sibling so a source that already is the destination
        // (under any spelling of the path) is never truncated
        let dest = self.profile_path(&name);
        let tmp = self.root.join(format!("{}.tmp", name));
        fs::copy(path, &tmp).map_err(|e| InstallError::from_io("install profile", e))?;
        fs::rename(&tmp, &dest).map_err(|e| InstallError::from_io("install profile", e))?;
        info!(path = %dest.display(), "installed profile");
        self.associate(&name, display)
    }

    fn uninstall(&self, profile_name: &str, display_id: &DisplayId) -> Result<(), InstallError> {
        let path = self.profile_path(profile_name);
        if !path.is_file() {
            return Err(InstallError::NotInstalled(profile_name.to_string()));
        }

        let mut associations = self.load_associations()?;
        let key = display_id.to_string();
        if associations.get(&key).map(String::as_str) == Some(profile_name) {
            associations.remove(&key);
            self.save_associations(&associations)?;
            info!(display = %display_id, profile = profile_name, "disassociated profile");
        }

        // Other displays may still use the file
        if !associations.values().any(|p| p == profile_name) {
            fs::remove_file(&path).map_err(|e| InstallError::from_io("uninstall profile", e))?;
            info!(path = %path.display(), "removed profile");
        }
        Ok(())
    }

    fn is_installed(&self, profile_name: &str) -> bool {
        self.profile_path(profile_name).is_file()
    }

    fn associated_profile(&self, display: &DisplayId) -> Result<Option<String>, InstallError> {
        Ok(self.load_associations()?.remove(&display.to_string()))
    }
}
