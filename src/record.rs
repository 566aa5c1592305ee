use crate::config::Combination;
use crate::invoke::InvocationResult;
use crate::params::*;
use serde::{Deserialize, Serialize};

/// One timed run of the convolution binary.
/// Field order is the column order of the results table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    #[serde(rename = "Image")]
    pub image: String,

    #[serde(rename = "Mode")]
    pub mode: MemoryMode,

    #[serde(rename = "Block Size")]
    pub block_size: u32,

    #[serde(rename = "Grid Shape")]
    pub grid_shape: GridShape,

    /// Seconds of wall clock time
    #[serde(rename = "Execution Time")]
    pub execution_time: f64,

    #[serde(rename = "Success")]
    pub success: bool,

    #[serde(rename = "Exit Code")]
    pub exit_code: Option<i32>,

    /// Captured output, kept in memory only
    #[serde(skip)]
    pub stdout: String,

    #[serde(skip)]
    pub stderr: String,
}

impl RunRecord {
    /// Table header, matches the serde names above.
    pub const COLUMNS: [&'static str; 7] = [
        "Image",
        "Mode",
        "Block Size",
        "Grid Shape",
        "Execution Time",
        "Success",
        "Exit Code",
    ];

    pub fn new(combination: &Combination, result: InvocationResult) -> Self {
        RunRecord {
            image: combination.image.name.clone(),
            mode: combination.mode,
            block_size: combination.block_size,
            grid_shape: combination.grid_shape,
            execution_time: result.elapsed.as_secs_f64(),
            success: result.success,
            exit_code: result.exit_code,
            stdout: result.stdout,
            stderr: result.stderr,
        }
    }

    pub fn matches(&self, combination: &Combination) -> bool {
        self.image == combination.image.name
            && self.mode == combination.mode
            && self.block_size == combination.block_size
            && self.grid_shape == combination.grid_shape
    }
}
