use anyhow::{Context, Result, bail};
use log::debug;
use once_cell::sync::Lazy;
use platform_dirs::AppDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::Mutex};

const CARGO_TOML: &str = include_str!("../Cargo.toml");
static CONFIG: Lazy<Mutex<Config>> = Lazy::new(|| Mutex::new(Config::default()));

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct Config {
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(skip)]
    pub is_first_run: bool,

    #[serde(skip)]
    pub app_name: String,

    pub preference: Preference,
    pub slideshow: Slideshow,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
pub struct Preference {
    #[derivative(Default(value = "560"))]
    pub win_width: u32,

    #[derivative(Default(value = "520"))]
    pub win_height: u32,
}

/// Last-used form values, restored on the next start.
#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
pub struct Slideshow {
    pub image_folder: String,
    pub audio_file: String,
    pub save_file: String,

    #[derivative(Default(value = "\"2\".to_string()"))]
    pub seconds_per_image: String,
}

impl Config {
    pub fn init(&mut self) -> Result<()> {
        let metadata = toml::from_str::<toml::Table>(CARGO_TOML).expect("Parse Cargo.toml error");

        self.app_name = metadata
            .get("package")
            .unwrap()
            .get("name")
            .unwrap()
            .to_string()
            .trim_matches('"')
            .to_string();

        let app_dirs = AppDirs::new(Some(&self.app_name), true).unwrap();
        self.create_dirs(&app_dirs)?;
        self.load().with_context(|| "load config file failed")?;
        debug!("{:?}", self);
        Ok(())
    }

    fn create_dirs(&mut self, app_dirs: &AppDirs) -> Result<()> {
        self.config_path = app_dirs.config_dir.join(format!("{}.toml", self.app_name));
        fs::create_dir_all(&app_dirs.config_dir)?;
        Ok(())
    }

    fn load(&mut self) -> Result<()> {
        match fs::read_to_string(&self.config_path) {
            Ok(text) => match toml::from_str::<Config>(&text) {
                Ok(mut c) => {
                    c.config_path = self.config_path.clone();
                    c.is_first_run = self.is_first_run;
                    c.app_name = self.app_name.clone();
                    *self = c;

                    Ok(())
                }
                Err(_) => {
                    self.is_first_run = true;

                    if let Some(bak_file) = &self.config_path.as_os_str().to_str() {
                        _ = fs::copy(&self.config_path, format!("{}.bak", bak_file));
                    }

                    match toml::to_string_pretty(self) {
                        Ok(text) => Ok(fs::write(&self.config_path, text)?),
                        Err(e) => Err(e.into()),
                    }
                }
            },
            Err(_) => {
                self.is_first_run = true;

                match toml::to_string_pretty(self) {
                    Ok(text) => Ok(fs::write(&self.config_path, text)?),
                    Err(e) => Err(e.into()),
                }
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

/// Initializes the global configuration. Called once at startup.
pub fn init() {
    CONFIG.lock().unwrap().init().unwrap();
}

/// Returns a clone of the current configuration.
pub fn all() -> Config {
    CONFIG.lock().unwrap().clone()
}

/// Saves a new configuration and updates the global instance.
pub fn save(conf: Config) -> Result<()> {
    let mut config = CONFIG.lock().unwrap();
    *config = conf;
    config.save()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.slideshow.seconds_per_image, "2");
        assert!(config.slideshow.image_folder.is_empty());
        assert_eq!(config.preference.win_width, 560);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.slideshow.image_folder = "/photos".to_string();
        config.slideshow.seconds_per_image = "3.5".to_string();

        let text = toml::to_string_pretty(&config).unwrap();
        let back = toml::from_str::<Config>(&text).unwrap();

        assert_eq!(back.slideshow.image_folder, "/photos");
        assert_eq!(back.slideshow.seconds_per_image, "3.5");
    }
}
