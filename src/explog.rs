//! Experiment logging.
//!
//! Persists run artifacts — named variable dumps, matrices, projection
//! images — to a run-specific directory. Purely an output sink: nothing
//! here feeds back into the pipeline.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::errors::Result;
use crate::raster::ProjectionImage;

/// A run directory under `<base>/<experiment>/<instance>-<unix time>/`.
#[derive(Debug)]
pub struct ExperimentLog {
    pub name: String,
    pub instance: String,
    pub dir: PathBuf,
}

impl ExperimentLog {
    pub fn new(name: &str, instance: &str, base: &Path) -> Result<Self> {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let dir = base
            .join(slug(name))
            .join(format!("{}-{stamp}", slug(instance)));
        fs::create_dir_all(&dir)?;
        Ok(Self { name: name.to_string(), instance: instance.to_string(), dir })
    }

    /// Dump a serializable value as pretty JSON.
    pub fn save_variables<T: Serialize>(&self, label: &str, value: &T) -> Result<PathBuf> {
        let path = self.dir.join(format!("{}.json", slug(label)));
        fs::write(&path, serde_json::to_string_pretty(value)?)?;
        Ok(path)
    }

    /// Dump a row-major matrix as CSV.
    pub fn save_matrix(&self, label: &str, rows: &[Vec<f64>]) -> Result<PathBuf> {
        let path = self.dir.join(format!("{}.csv", slug(label)));
        let mut out = String::new();
        for row in rows {
            let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            out.push_str(&line.join(","));
            out.push('\n');
        }
        fs::write(&path, out)?;
        Ok(path)
    }

    /// Dump a projection image as PPM.
    pub fn save_image(&self, label: &str, image: &ProjectionImage) -> Result<PathBuf> {
        let path = self.dir.join(format!("{}.ppm", slug(label)));
        fs::write(&path, image.to_ppm())?;
        Ok(path)
    }
}

fn slug(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Dump {
        startup: usize,
        leak_rate: f64,
    }

    #[test]
    fn test_run_directory_and_artifacts() {
        let base = std::env::temp_dir().join("echotext-explog");
        let log = ExperimentLog::new("Author Clustering", "two authors, PCA", &base).unwrap();
        assert!(log.dir.starts_with(base.join("author-clustering")));

        let json = log
            .save_variables("settings", &Dump { startup: 20, leak_rate: 0.05 })
            .unwrap();
        let content = fs::read_to_string(json).unwrap();
        assert!(content.contains("\"startup\": 20"));

        let csv = log
            .save_matrix("states", &[vec![1.0, 2.0], vec![3.0, 4.5]])
            .unwrap();
        let content = fs::read_to_string(csv).unwrap();
        assert_eq!(content, "1,2\n3,4.5\n");

        let image = ProjectionImage::from_point_sets(&[vec![0.0, 0.0]], &[]).unwrap();
        let ppm = log.save_image("projection", &image).unwrap();
        assert!(ppm.to_string_lossy().ends_with("projection.ppm"));
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Author clustering, PCA"), "author-clustering--pca");
    }
}
