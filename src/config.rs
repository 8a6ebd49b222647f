//! Configuration management for CamView
//!
//! Provides loading, saving, and validation of the camera control's
//! configuration surface, and application of a loaded configuration onto a
//! `CameraView`.

use crate::barcode::{BarcodeDecodeOptions, BarcodeFormat};
use crate::errors::CameraError;
use crate::types::{FlashMode, ImageFormat};
use crate::view::CameraView;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CamViewConfig {
    pub camera: CameraSection,
    pub barcode: BarcodeSection,
    pub snapshot: SnapshotSection,
}

/// Camera property defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSection {
    /// Flash mode applied at startup
    pub flash_mode: FlashMode,
    /// Torch LED on at startup
    pub torch_enabled: bool,
    /// Mirror the preview image
    pub mirrored_image: bool,
    /// Initial zoom factor (clamped to the selected camera's bounds)
    pub zoom_factor: f32,
}

/// Barcode detection defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarcodeSection {
    /// Enable detection at startup
    pub detection_enabled: bool,
    /// Decode every Nth frame
    pub detection_frame_rate: u32,
    /// Report every code found instead of the first
    pub read_multiple_codes: bool,
    /// Spend more time per decode attempt
    pub try_harder: bool,
    /// Try rotated orientations
    pub auto_rotate: bool,
    /// Also try the inverted image
    pub try_inverted: bool,
    /// Assume the frame is a clean barcode with no surrounding scene
    pub pure_barcode: bool,
    /// Restrict decoding to these formats; empty accepts any
    pub possible_formats: Vec<BarcodeFormat>,
    /// Character set override; empty keeps the decoder default
    pub character_set: String,
}

/// Snapshot defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotSection {
    /// Seconds between automatic captures; 0 disables them
    pub auto_seconds: f32,
    /// Encoded format for captures
    pub format: ImageFormat,
    /// Keep a decoded image handle for automatic captures
    pub as_image_source: bool,
}

impl Default for CamViewConfig {
    fn default() -> Self {
        Self {
            camera: CameraSection {
                flash_mode: FlashMode::Disabled,
                torch_enabled: false,
                mirrored_image: false,
                zoom_factor: 1.0,
            },
            barcode: BarcodeSection {
                detection_enabled: false,
                detection_frame_rate: 10,
                read_multiple_codes: false,
                try_harder: false,
                auto_rotate: false,
                try_inverted: false,
                pure_barcode: false,
                possible_formats: Vec::new(),
                character_set: String::new(),
            },
            snapshot: SnapshotSection {
                auto_seconds: 0.0,
                format: ImageFormat::Png,
                as_image_source: false,
            },
        }
    }
}

impl CamViewConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CameraError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            CameraError::InitializationError(format!("Failed to read config file: {}", e))
        })?;

        let config: CamViewConfig = toml::from_str(&contents).map_err(|e| {
            CameraError::InitializationError(format!("Failed to parse config file: {}", e))
        })?;

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CameraError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                CameraError::InitializationError(format!(
                    "Failed to create config directory: {}",
                    e
                ))
            })?;
        }

        let toml_string = toml::to_string_pretty(self).map_err(|e| {
            CameraError::InitializationError(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, toml_string).map_err(|e| {
            CameraError::InitializationError(format!("Failed to write config file: {}", e))
        })?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get default config file path
    pub fn default_path() -> PathBuf {
        PathBuf::from("camview.toml")
    }

    /// Load from default location or create with defaults
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_path()).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.camera.zoom_factor <= 0.0 || !self.camera.zoom_factor.is_finite() {
            return Err("Zoom factor must be a positive number".to_string());
        }
        if self.barcode.detection_frame_rate < 1 {
            return Err("Detection frame rate must be at least 1".to_string());
        }
        if self.snapshot.auto_seconds < 0.0 || !self.snapshot.auto_seconds.is_finite() {
            return Err("Auto snapshot seconds must be zero or positive".to_string());
        }
        Ok(())
    }

    /// Apply the configuration onto a view's property surface
    pub fn apply(&self, view: &CameraView) -> Result<(), CameraError> {
        self.validate().map_err(CameraError::ControlError)?;

        view.set_flash_mode(self.camera.flash_mode)?;
        view.set_torch_enabled(self.camera.torch_enabled)?;
        view.set_mirrored_image(self.camera.mirrored_image)?;
        view.set_zoom_factor(self.camera.zoom_factor)?;

        view.set_barcode_detection_enabled(self.barcode.detection_enabled);
        view.set_barcode_detection_frame_rate(self.barcode.detection_frame_rate)?;
        view.set_barcode_options(BarcodeDecodeOptions {
            auto_rotate: self.barcode.auto_rotate,
            character_set: self.barcode.character_set.clone(),
            possible_formats: self.barcode.possible_formats.clone(),
            try_harder: self.barcode.try_harder,
            try_inverted: self.barcode.try_inverted,
            pure_barcode: self.barcode.pure_barcode,
            read_multiple_codes: self.barcode.read_multiple_codes,
        });

        view.set_auto_snapshot_seconds(self.snapshot.auto_seconds)?;
        view.set_auto_snapshot_format(self.snapshot.format);
        view.set_auto_snapshot_as_image_source(self.snapshot.as_image_source);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CamViewConfig::default();
        assert_eq!(config.barcode.detection_frame_rate, 10);
        assert_eq!(config.snapshot.auto_seconds, 0.0);
        assert_eq!(config.camera.flash_mode, FlashMode::Disabled);
    }

    #[test]
    fn test_config_validation() {
        let config = CamViewConfig::default();
        assert!(config.validate().is_ok());

        let mut bad_rate = config.clone();
        bad_rate.barcode.detection_frame_rate = 0;
        assert!(bad_rate.validate().is_err());

        let mut bad_seconds = config.clone();
        bad_seconds.snapshot.auto_seconds = -1.0;
        assert!(bad_seconds.validate().is_err());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = std::env::temp_dir();
        let config_path = temp_dir.join("test_camview.toml");
        let _ = fs::remove_file(&config_path);

        let mut config = CamViewConfig::default();
        config.barcode.detection_frame_rate = 5;
        assert!(config.save_to_file(&config_path).is_ok());

        let loaded = CamViewConfig::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.barcode.detection_frame_rate, 5);
        assert_eq!(loaded.snapshot.format, config.snapshot.format);

        let _ = fs::remove_file(&config_path);
    }

    #[test]
    fn test_config_toml_format() {
        let config = CamViewConfig::default();
        let toml_string = toml::to_string_pretty(&config).unwrap();

        assert!(toml_string.contains("[camera]"));
        assert!(toml_string.contains("[barcode]"));
        assert!(toml_string.contains("[snapshot]"));
        assert!(toml_string.contains("detection_frame_rate"));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = CamViewConfig::load_from_file("nonexistent_file.toml");
        assert!(result.is_ok()); // Should return default
        assert_eq!(result.unwrap().barcode.detection_frame_rate, 10);
    }

    #[test]
    fn test_apply_to_view() {
        let mut config = CamViewConfig::default();
        config.barcode.detection_enabled = true;
        config.barcode.detection_frame_rate = 3;
        config.snapshot.auto_seconds = 1.5;
        config.snapshot.format = ImageFormat::Jpeg;

        let view = CameraView::new();
        config.apply(&view).unwrap();

        assert!(view.barcode_detection_enabled());
        assert_eq!(view.barcode_detection_frame_rate(), 3);
        assert_eq!(view.auto_snapshot_seconds(), 1.5);
        assert_eq!(view.auto_snapshot_format(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_apply_carries_every_decode_option() {
        let mut config = CamViewConfig::default();
        config.barcode.auto_rotate = true;
        config.barcode.try_harder = true;
        config.barcode.try_inverted = true;
        config.barcode.pure_barcode = true;
        config.barcode.read_multiple_codes = true;
        config.barcode.possible_formats = vec![BarcodeFormat::QrCode, BarcodeFormat::Ean13];
        config.barcode.character_set = "UTF-8".to_string();

        let view = CameraView::new();
        config.apply(&view).unwrap();

        let options = view.barcode_options();
        assert!(options.auto_rotate);
        assert!(options.try_harder);
        assert!(options.try_inverted);
        assert!(options.pure_barcode);
        assert!(options.read_multiple_codes);
        assert_eq!(
            options.possible_formats,
            vec![BarcodeFormat::QrCode, BarcodeFormat::Ean13]
        );
        assert_eq!(options.character_set, "UTF-8");
    }

    #[test]
    fn test_decode_options_survive_toml_round_trip() {
        let mut config = CamViewConfig::default();
        config.barcode.pure_barcode = true;
        config.barcode.possible_formats = vec![BarcodeFormat::QrCode];

        let toml_string = toml::to_string_pretty(&config).unwrap();
        let loaded: CamViewConfig = toml::from_str(&toml_string).unwrap();
        assert!(loaded.barcode.pure_barcode);
        assert_eq!(loaded.barcode.possible_formats, vec![BarcodeFormat::QrCode]);
    }
}
