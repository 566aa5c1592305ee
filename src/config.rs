//! Harness configuration.
//!
//! Defaults reproduce the stock benchmark (3 images, 3 block sizes,
//! 4 grid shapes, both memory modes). A TOML file may override any
//! subset of it, unknown keys are rejected.

use crate::error::*;
use crate::layout::Layout;
use crate::params::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// What to do when a single run fails.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Record the failure and move on to the next combination.
    #[default]
    Continue,

    /// Stop the sweep at the first failed run.
    Abort,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Program followed by its arguments, empty to skip the build.
    pub command: Vec<String>,

    /// Abort when the build fails instead of benchmarking a stale binary.
    pub required: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            command: vec!["make".to_string(), "all".to_string()],
            required: false,
        }
    }
}

/// The four parameter sets swept over.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepParameters {
    pub block_sizes: Vec<u32>,
    pub grid_shapes: Vec<GridShape>,
    pub modes: Vec<MemoryMode>,

    /// Array of tables, kept last for TOML serialization.
    pub images: Vec<ImageSpec>,
}

impl Default for SweepParameters {
    fn default() -> Self {
        SweepParameters {
            block_sizes: vec![16, 32, 64],
            grid_shapes: vec![
                GridShape::new(10, 10),
                GridShape::new(20, 10),
                GridShape::new(15, 30),
                GridShape::new(40, 40),
            ],
            modes: MemoryMode::ALL.to_vec(),
            images: vec![
                ImageSpec::new("1200x1200.png", 1200, 1200),
                ImageSpec::new("720x720.png", 720, 720),
                ImageSpec::new("360x360.png", 360, 360),
            ],
        }
    }
}

/// A single point of the sweep.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Combination<'a> {
    pub image: &'a ImageSpec,
    pub block_size: u32,
    pub grid_shape: GridShape,
    pub mode: MemoryMode,
}

impl std::fmt::Display for Combination<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} block={} grid={}",
            self.image.name, self.mode, self.block_size, self.grid_shape
        )
    }
}

impl SweepParameters {
    /// Number of combinations in the full cartesian product.
    pub fn len(&self) -> usize {
        self.images.len()
            * self.block_sizes.len()
            * self.grid_shapes.len()
            * self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Image -> block size -> grid shape -> mode, innermost last.
    pub fn combinations(&self) -> impl Iterator<Item = Combination<'_>> + '_ {
        self.images.iter().flat_map(move |image| {
            self.block_sizes.iter().flat_map(move |&block_size| {
                self.grid_shapes.iter().flat_map(move |&grid_shape| {
                    self.modes.iter().map(move |&mode| Combination {
                        image,
                        block_size,
                        grid_shape,
                        mode,
                    })
                })
            })
        })
    }

    pub fn validate(&self) -> Result<()> {
        fn no_duplicates<T: std::hash::Hash + Eq + std::fmt::Debug>(
            what: &str,
            items: impl Iterator<Item = T>,
        ) -> Result<()> {
            let mut seen = HashSet::new();
            for item in items {
                if !seen.insert(item) {
                    return Err(Error::InvalidConfig(format!(
                        "duplicate {what} in sweep"
                    )));
                }
            }
            if seen.is_empty() {
                return Err(Error::InvalidConfig(format!("no {what} in sweep")));
            }
            Ok(())
        }

        no_duplicates("image", self.images.iter().map(|i| &i.name))?;
        no_duplicates("block size", self.block_sizes.iter())?;
        no_duplicates("grid shape", self.grid_shapes.iter())?;
        no_duplicates("mode", self.modes.iter())?;

        // Distinct names can still share a stem and collide on output files
        no_duplicates("image stem", self.images.iter().map(|i| i.stem()))?;

        if let Some(image) = self
            .images
            .iter()
            .find(|i| i.name.is_empty() || i.width == 0 || i.height == 0)
        {
            return Err(Error::InvalidConfig(format!(
                "image `{}` needs a name and non-zero dimensions",
                image.name
            )));
        }
        if self.block_sizes.contains(&0) {
            return Err(Error::InvalidConfig(
                "block sizes must be positive".to_string(),
            ));
        }
        if let Some(g) =
            self.grid_shapes.iter().find(|g| g.width == 0 || g.height == 0)
        {
            return Err(Error::InvalidConfig(format!(
                "grid shape {g} must be positive in both dimensions"
            )));
        }
        Ok(())
    }
}

/// Stores the whole configuration of a benchmark session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Path to the convolution binary.
    pub binary: PathBuf,

    /// Behaviour when a run fails.
    pub on_failure: FailurePolicy,

    pub build: BuildConfig,

    pub layout: Layout,

    pub sweep: SweepParameters,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            binary: PathBuf::from("./bin/cuda_convolution"),
            on_failure: FailurePolicy::default(),
            build: BuildConfig::default(),
            layout: Layout::default(),
            sweep: SweepParameters::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract the configuration from the given configuration file.
    /// Keys missing from the file keep their default value.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| {
            Error::ConfigRead {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::from_toml(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.binary.as_os_str().is_empty() {
            let msg = "binary path is empty".to_string();
            return Err(Error::InvalidConfig(msg));
        }
        self.sweep.validate()
    }
}
