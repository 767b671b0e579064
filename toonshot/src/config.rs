use anyhow::{Context, Result, bail};
use camera::{FacingMode, QualityPreset};
use log::debug;
use once_cell::sync::Lazy;
use platform_dirs::AppDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

const APP_NAME: &str = env!("CARGO_PKG_NAME");
static CONFIG: Lazy<Mutex<Config>> = Lazy::new(|| Mutex::new(Config::default()));

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct Config {
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(skip)]
    pub is_first_run: bool,

    #[serde(default)]
    pub preference: Preference,

    #[serde(default)]
    pub endpoint: Endpoint,

    #[serde(default)]
    pub download: Download,
}

/// Camera settings remembered across sessions.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Preference {
    #[serde(default)]
    pub camera_facing_mode: FacingMode,

    #[serde(default)]
    pub camera_quality: QualityPreset,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Endpoint {
    #[derivative(Default(value = "\"http://127.0.0.1:8787/cartoonize\".to_string()"))]
    pub url: String,

    pub api_key: String,

    #[derivative(Default(value = "120"))]
    pub timeout_secs: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Download {
    /// Empty means the current directory.
    #[serde(default)]
    pub save_dir: String,
}

impl Config {
    /// Resolves the platform config dir and loads `<app>.toml` from it.
    pub fn init(&mut self) -> Result<()> {
        let app_dirs = AppDirs::new(Some(APP_NAME), true)
            .with_context(|| "no config directory on this platform")?;

        fs::create_dir_all(&app_dirs.config_dir)?;
        self.config_path = app_dirs.config_dir.join(format!("{APP_NAME}.toml"));
        self.load().with_context(|| "load config file failed")?;

        debug!("{:?}", self);
        Ok(())
    }

    /// Loads the config stored at `path`, creating it with defaults if absent.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Config {
            config_path: path.as_ref().to_path_buf(),
            ..Default::default()
        };

        if let Some(dir) = config.config_path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }

        config.load()?;
        Ok(config)
    }

    fn load(&mut self) -> Result<()> {
        match fs::read_to_string(&self.config_path) {
            Ok(text) => match toml::from_str::<Config>(&text) {
                Ok(mut c) => {
                    c.config_path = self.config_path.clone();
                    c.is_first_run = self.is_first_run;
                    *self = c;
                    Ok(())
                }
                Err(e) => {
                    log::warn!("parse {} failed: {e}", self.config_path.display());
                    self.is_first_run = true;

                    if let Some(bak_file) = self.config_path.as_os_str().to_str() {
                        _ = fs::copy(&self.config_path, format!("{bak_file}.bak"));
                    }
                    self.save()
                }
            },
            Err(_) => {
                self.is_first_run = true;
                self.save()
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        match toml::to_string_pretty(self) {
            Ok(text) => Ok(fs::write(&self.config_path, text)
                .with_context(|| "save config failed".to_string())?),
            Err(e) => bail!(format!("convert config to toml format failed. {e:?}")),
        }
    }
}

/// Initializes the global configuration from the platform config dir.
pub fn init() -> Result<()> {
    let mut config = Config::default();
    config.init()?;
    *CONFIG.lock().unwrap() = config;
    Ok(())
}

/// Initializes the global configuration from an explicit file.
pub fn init_with_path(path: impl AsRef<Path>) -> Result<()> {
    let config = Config::from_path(path)?;
    *CONFIG.lock().unwrap() = config;
    Ok(())
}

pub fn all() -> Config {
    CONFIG.lock().unwrap().clone()
}

pub fn save(conf: Config) -> Result<()> {
    let mut config = CONFIG.lock().unwrap();
    *config = conf;
    config.save()
}
