use crate::config::Combination;
use crate::error::*;
use crate::params::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the harness reads inputs and writes everything it produces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Layout {
    /// Input images, must already exist.
    pub input_dir: PathBuf,

    /// Images written by the convolution binary.
    pub output_dir: PathBuf,

    /// Rendered charts.
    pub graphs_dir: PathBuf,

    /// CSV tables.
    pub tables_dir: PathBuf,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            input_dir: PathBuf::from("./input"),
            output_dir: PathBuf::from("./output"),
            graphs_dir: PathBuf::from("./graphs"),
            tables_dir: PathBuf::from("./tables"),
        }
    }
}

impl Layout {
    /// Same layout with every directory placed under `root`.
    pub fn rooted<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Layout {
            input_dir: root.join("input"),
            output_dir: root.join("output"),
            graphs_dir: root.join("graphs"),
            tables_dir: root.join("tables"),
        }
    }

    pub fn input_path(&self, image: &ImageSpec) -> PathBuf {
        self.input_dir.join(&image.name)
    }

    /// `<stem>_<mode flag>_<block size>_<W>x<H>.png`
    pub fn output_path(&self, combination: &Combination) -> PathBuf {
        self.output_dir.join(format!(
            "{}_{}_{}_{}.png",
            combination.image.stem(),
            combination.mode.flag(),
            combination.block_size,
            combination.grid_shape
        ))
    }

    pub fn table_path(&self) -> PathBuf {
        self.tables_dir.join("performance_results.csv")
    }

    pub fn average_table_path(&self) -> PathBuf {
        self.tables_dir.join("average_performance.csv")
    }

    pub fn chart_path(&self, image_name: &str, block_size: u32) -> PathBuf {
        self.graphs_dir.join(format!(
            "{}_block_{}_performance.png",
            file_stem(image_name),
            block_size
        ))
    }

    pub fn average_chart_path(&self) -> PathBuf {
        self.graphs_dir.join("average_performance.png")
    }

    /// Create every directory the harness writes to.
    pub fn ensure_output_dirs(&self) -> Result<()> {
        for dir in [&self.output_dir, &self.graphs_dir, &self.tables_dir] {
            ensure_dir_exists(dir)?;
        }
        Ok(())
    }
}

/// Utility function to ensure output directories exist when needed
pub fn ensure_dir_exists<P: AsRef<Path>>(path: &P) -> Result<()> {
    let p = path.as_ref();
    if p.exists() {
        if !p.is_dir() {
            return Err(Error::NotADirectory {
                path: p.to_path_buf(),
            });
        }
        log::debug!("Exists: {p:?}");
    } else {
        log::info!("Creating: {p:?}");
        std::fs::create_dir_all(p).map_err(|source| Error::CreateDir {
            path: p.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn output_path_naming() {
        let layout = Layout::default();
        let image = ImageSpec::new("720x720.png", 720, 720);
        let combination = Combination {
            image: &image,
            block_size: 32,
            grid_shape: GridShape::new(15, 30),
            mode: MemoryMode::Shared,
        };
        let expected = PathBuf::from("./output/720x720_1_32_15x30.png");
        assert_eq!(layout.output_path(&combination), expected);
        // Same inputs, same name
        assert_eq!(layout.output_path(&combination), expected);

        let global = Combination {
            mode: MemoryMode::Global,
            ..combination
        };
        assert_ne!(layout.output_path(&global), expected);
    }

    #[test]
    fn chart_naming() {
        let layout = Layout::rooted("/tmp/bench");
        let image = ImageSpec::new("360x360.png", 360, 360);
        assert_eq!(
            layout.chart_path(&image.name, 64),
            PathBuf::from("/tmp/bench/graphs/360x360_block_64_performance.png")
        );
        assert_eq!(
            layout.average_chart_path(),
            PathBuf::from("/tmp/bench/graphs/average_performance.png")
        );
        assert_eq!(
            layout.input_path(&image),
            PathBuf::from("/tmp/bench/input/360x360.png")
        );
    }

    #[test]
    fn creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::rooted(dir.path());
        layout.ensure_output_dirs().unwrap();
        assert!(layout.output_dir.is_dir());
        assert!(layout.graphs_dir.is_dir());
        assert!(layout.tables_dir.is_dir());
        assert!(!layout.input_dir.exists());
        // Second call is a no-op
        layout.ensure_output_dirs().unwrap();
    }

    #[test]
    fn rejects_file_in_place_of_dir() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::rooted(dir.path());
        std::fs::write(&layout.tables_dir, b"not a dir").unwrap();
        assert!(matches!(
            layout.ensure_output_dirs(),
            Err(Error::NotADirectory { .. })
        ));
    }
}
