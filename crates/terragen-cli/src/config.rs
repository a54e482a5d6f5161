use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct GeneratorConfig {
    pub world: WorldSection,
    #[serde(default)]
    pub generate: GenerateSection,
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Deserialize)]
pub struct WorldSection {
    pub seed: u64,
}

#[derive(Debug, Deserialize)]
pub struct GenerateSection {
    /// Chunk coordinates of the square's center.
    #[serde(default)]
    pub center_x: i32,
    #[serde(default)]
    pub center_z: i32,
    /// Chunks generated per side of center: a radius of 2 yields a 5x5
    /// square.
    #[serde(default = "default_radius")]
    pub radius: i32,
}

fn default_radius() -> i32 {
    2
}

impl Default for GenerateSection {
    fn default() -> Self {
        Self {
            center_x: 0,
            center_z: 0,
            radius: default_radius(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OutputSection {
    #[serde(default = "default_directory")]
    pub directory: String,
}

fn default_directory() -> String {
    "chunks".into()
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            directory: default_directory(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".into()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl GeneratorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}
