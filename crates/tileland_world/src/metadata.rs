//! World generation metadata carried inside save files.

/// Generator configuration persisted with a world so a reload reproduces the
/// same terrain.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldMetadata {
    /// Noise seed.
    pub seed: i64,
    /// Noise sample frequency.
    pub frequency: f32,
    /// Base noise type name (e.g. "OpenSimplex2", "Perlin", "Value").
    pub noise_type: String,
    /// Fractal modifier name (e.g. "FBm", "Ridged"; empty or "None" = none).
    pub fractal_type: String,
    /// Fractal octave count.
    pub octaves: i32,
    /// Fractal lacunarity.
    pub lacunarity: f32,
    /// Fractal gain.
    pub gain: f32,
}

impl Default for WorldMetadata {
    fn default() -> Self {
        Self {
            seed: 1337,
            frequency: 0.025,
            noise_type: "OpenSimplex2".to_string(),
            fractal_type: "FBm".to_string(),
            octaves: 5,
            lacunarity: 2.0,
            gain: 0.5,
        }
    }
}
