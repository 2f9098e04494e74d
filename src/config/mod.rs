#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::{ArkError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const ARK_FOLDER: &str = ".ark";
pub const INDEX_FILE: &str = "index";
pub const PREVIEWS_DIR: &str = "previews";
pub const APP_ID_FILE: &str = "app_id";
pub const ARK_CONFIG_DIR: &str = ".config/ark";
pub const ARK_BACKUPS_DIR: &str = ".ark-backups";
pub const ROOTS_CFG_FILENAME: &str = "roots";

/// 應用程式層級的路徑，環境變數可覆寫以便測試與容器環境
#[derive(Debug, Clone)]
pub struct ArkPaths {
    ark_home: PathBuf,
    config_dir: PathBuf,
    backups_dir: PathBuf,
}

impl ArkPaths {
    pub fn resolve() -> Result<Self> {
        let ark_home = match std::env::var_os("ARK_HOME") {
            Some(path) => PathBuf::from(path),
            None => home_dir()?.join(ARK_FOLDER),
        };

        let config_dir = match std::env::var_os("ARK_CONFIG_HOME") {
            Some(path) => PathBuf::from(path),
            None => home_dir()?.join(ARK_CONFIG_DIR),
        };

        let backups_dir = match std::env::var_os("ARK_BACKUPS_PATH") {
            Some(path) => PathBuf::from(path),
            None => home_dir()?.join(ARK_BACKUPS_DIR),
        };

        Ok(Self {
            ark_home,
            config_dir,
            backups_dir,
        })
    }

    /// Everything under one base directory. Used by tests and portable setups.
    pub fn rooted_at(base: &Path) -> Self {
        Self {
            ark_home: base.join(ARK_FOLDER),
            config_dir: base.join(ARK_CONFIG_DIR),
            backups_dir: base.join(ARK_BACKUPS_DIR),
        }
    }

    pub fn ark_home(&self) -> &Path {
        &self.ark_home
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    pub fn roots_file(&self) -> PathBuf {
        self.config_dir.join(ROOTS_CFG_FILENAME)
    }

    pub fn ensure_ark_home(&self) -> Result<()> {
        if !self.ark_home.exists() {
            fs::create_dir_all(&self.ark_home)?;
        }
        Ok(())
    }
}

fn home_dir() -> Result<PathBuf> {
    home::home_dir().ok_or(ArkError::HomeDirNotFound)
}

/// 載入或建立本機安裝識別碼
pub fn load_or_create_app_id(paths: &ArkPaths) -> Result<String> {
    paths.ensure_ark_home()?;
    let app_id_path = paths.ark_home().join(APP_ID_FILE);

    if app_id_path.exists() {
        let id = fs::read_to_string(&app_id_path)?.trim().to_string();
        if !id.is_empty() {
            return Ok(id);
        }
        tracing::warn!("App id file is empty, regenerating");
    }

    let id = Uuid::new_v4().to_string();
    fs::write(&app_id_path, &id)?;
    tracing::debug!("Created app id at {}", app_id_path.display());
    Ok(id)
}

pub fn provide_root(root_dir: Option<&Path>) -> Result<PathBuf> {
    match root_dir {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(std::env::current_dir()?),
    }
}

/// Roots registry: one absolute path per line, `#` starts a comment line.
pub fn read_roots_registry(path: &Path) -> Result<Vec<PathBuf>> {
    let contents = fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(PathBuf::from)
        .collect())
}

pub fn discover_roots(paths: &ArkPaths, roots_cfg: Option<&Path>) -> Result<Vec<PathBuf>> {
    match roots_cfg {
        Some(path) => read_roots_registry(path),
        None => {
            let registry = paths.roots_file();
            if registry.exists() {
                read_roots_registry(&registry)
            } else {
                Ok(Vec::new())
            }
        }
    }
}
