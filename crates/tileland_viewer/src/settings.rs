//! # Settings
//!
//! TOML-backed viewer configuration. Every field has a default so a missing
//! or partial file still yields a usable configuration; parse failures fall
//! back to the defaults with a warning rather than aborting startup.

use std::path::Path;

use serde::Deserialize;
use tileland_world::WorldMetadata;

/// Viewer configuration.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Controller tick rate target.
    pub target_tps: f64,
    /// Render frame rate cap.
    pub target_fps: f64,
    /// View rectangle width in tiles.
    pub view_width: i32,
    /// View rectangle height in tiles.
    pub view_height: i32,
    /// Background alpha of the stats bar.
    pub stats_overlay_alpha: f64,
    /// Whether the stats bar is drawn.
    pub enable_stats_overlay: bool,
    /// Background alpha of the mouse crosshair.
    pub mouse_cross_alpha: f64,
    /// Whether mouse motion draws a crosshair overlay.
    pub enable_mouse_cross: bool,
    /// Whether unchanged frames and rows are skipped on output.
    pub enable_diff_rendering: bool,
    /// Whether the formatting-library render backend is used.
    pub use_fmt_renderer: bool,
    /// Directory holding `.tlwf` / `.tlwz` saves.
    pub save_directory: String,
    /// Noise generator parameters for new worlds.
    pub noise: NoiseSettings,
}

/// Noise parameters mirroring the persisted world metadata.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct NoiseSettings {
    /// Noise seed.
    pub seed: i64,
    /// Sample frequency.
    pub frequency: f32,
    /// Base noise type name.
    pub noise_type: String,
    /// Fractal modifier name.
    pub fractal_type: String,
    /// Fractal octaves.
    pub octaves: i32,
    /// Fractal lacunarity.
    pub lacunarity: f32,
    /// Fractal gain.
    pub gain: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_tps: 60.0,
            target_fps: 360.0,
            view_width: 64,
            view_height: 48,
            stats_overlay_alpha: 0.10,
            enable_stats_overlay: true,
            mouse_cross_alpha: 0.10,
            enable_mouse_cross: true,
            enable_diff_rendering: false,
            use_fmt_renderer: false,
            save_directory: "saves".to_string(),
            noise: NoiseSettings::default(),
        }
    }
}

impl Default for NoiseSettings {
    fn default() -> Self {
        let meta = WorldMetadata::default();
        Self {
            seed: meta.seed,
            frequency: meta.frequency,
            noise_type: meta.noise_type,
            fractal_type: meta.fractal_type,
            octaves: meta.octaves,
            lacunarity: meta.lacunarity,
            gain: meta.gain,
        }
    }
}

impl NoiseSettings {
    /// Converts the settings block into world metadata for a new world.
    #[must_use]
    pub fn to_metadata(&self) -> WorldMetadata {
        WorldMetadata {
            seed: self.seed,
            frequency: self.frequency,
            noise_type: self.noise_type.clone(),
            fractal_type: self.fractal_type.clone(),
            octaves: self.octaves,
            lacunarity: self.lacunarity,
            gain: self.gain,
        }
    }
}

impl Settings {
    /// Loads settings from a TOML file.
    ///
    /// A missing file yields the defaults silently; a malformed file yields
    /// the defaults with a warning.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => {
                tracing::info!(path = %path.display(), "no settings file, using defaults");
                return Self::default();
            }
        };
        match toml::from_str(&text) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "invalid settings file, using defaults"
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let settings = Settings::default();
        assert!(settings.target_tps > 0.0);
        assert_eq!(settings.view_width, 64);
        assert_eq!(settings.noise.noise_type, "OpenSimplex2");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let parsed: Settings = toml::from_str(
            r#"
            view_width = 32
            [noise]
            seed = 7
            "#,
        )
        .unwrap();
        assert_eq!(parsed.view_width, 32);
        assert_eq!(parsed.view_height, 48);
        assert_eq!(parsed.noise.seed, 7);
        assert_eq!(parsed.noise.octaves, 5);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = Settings::load(Path::new("/nonexistent/tileland-settings.toml"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_noise_settings_round_trip_to_metadata() {
        let meta = NoiseSettings::default().to_metadata();
        assert_eq!(meta, WorldMetadata::default());
    }
}
