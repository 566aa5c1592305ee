use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which kernel variant the convolution binary runs.
/// The binary takes the variant as a numeric flag.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    ValueEnum,
    Serialize,
    Deserialize,
)]
pub enum MemoryMode {
    /// Kernel reads the image straight from global memory
    Global,

    /// Kernel stages tiles through shared memory
    Shared,
}

impl MemoryMode {
    pub const ALL: [MemoryMode; 2] = [MemoryMode::Global, MemoryMode::Shared];

    pub fn flag(&self) -> u8 {
        match self {
            MemoryMode::Global => 0,
            MemoryMode::Shared => 1,
        }
    }

    pub fn from_flag(flag: u8) -> Option<Self> {
        match flag {
            0 => Some(MemoryMode::Global),
            1 => Some(MemoryMode::Shared),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MemoryMode::Global => "Global",
            MemoryMode::Shared => "Shared",
        }
    }
}

impl std::fmt::Display for MemoryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// CUDA grid dimensions, written as `WxH`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GridShape {
    pub width: u32,
    pub height: u32,
}

impl GridShape {
    pub const fn new(width: u32, height: u32) -> Self {
        GridShape { width, height }
    }

    pub fn label(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

impl std::fmt::Display for GridShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl std::str::FromStr for GridShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("grid shape `{s}` is not of the form WxH"))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|e| format!("grid shape `{s}`: {e}"))
        };
        Ok(GridShape::new(parse(w)?, parse(h)?))
    }
}

impl TryFrom<String> for GridShape {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GridShape> for String {
    fn from(value: GridShape) -> Self {
        value.label()
    }
}

/// One entry of the image catalog.
/// The dimensions are only used to sanity check the input file,
/// the binary itself is handed the file name alone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageSpec {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl ImageSpec {
    pub fn new(name: &str, width: u32, height: u32) -> Self {
        ImageSpec {
            name: name.to_string(),
            width,
            height,
        }
    }

    pub fn stem(&self) -> &str {
        file_stem(&self.name)
    }
}

/// File name without extension, used to build output names.
pub fn file_stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
}
