use data::Observation;
use data::observation::{self, LoadError};

use std::fmt;
use std::path::{Path, PathBuf};

const BUNDLED_CSV: &str = include_str!("../assets/llm_usage.csv");

#[derive(thiserror::Error, Debug, Clone)]
pub enum AppError {
    #[error("Failed to load {origin}: {reason}")]
    Load { origin: String, reason: String },
}

impl AppError {
    fn load(origin: &DataSource, err: LoadError) -> Self {
        AppError::Load {
            origin: origin.to_string(),
            reason: err.to_string(),
        }
    }
}

/// Where the usage table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Bundled,
}

impl DataSource {
    /// Command line first, then the last file used, then the bundled sample.
    pub fn resolve(arg: Option<PathBuf>, saved: Option<PathBuf>) -> Self {
        match arg.or(saved) {
            Some(path) => DataSource::File(path),
            None => DataSource::Bundled,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            DataSource::File(path) => Some(path),
            DataSource::Bundled => None,
        }
    }

    /// Reads and parses on the blocking pool, off the executor threads.
    pub async fn load(self) -> Result<Vec<Observation>, AppError> {
        let origin = self.to_string();

        tokio::task::spawn_blocking(move || self.read())
            .await
            .map_err(|err| AppError::Load {
                origin,
                reason: err.to_string(),
            })?
    }

    fn read(&self) -> Result<Vec<Observation>, AppError> {
        let result = match self {
            DataSource::File(path) => observation::load_csv(path),
            DataSource::Bundled => observation::from_reader(BUNDLED_CSV.as_bytes()),
        };

        result.map_err(|err| AppError::load(self, err))
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Bundled => write!(f, "bundled sample"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_wins_over_saved_path() {
        let source = DataSource::resolve(Some("a.csv".into()), Some("b.csv".into()));
        assert_eq!(source, DataSource::File("a.csv".into()));

        let source = DataSource::resolve(None, Some("b.csv".into()));
        assert_eq!(source.path(), Some(Path::new("b.csv")));

        assert_eq!(DataSource::resolve(None, None), DataSource::Bundled);
    }

    #[test]
    fn bundled_sample_covers_every_model() {
        let observations = DataSource::Bundled.read().unwrap();
        assert_eq!(observations.len(), 24);

        let catalog = data::SeriesCatalog::llm_models();
        for obs in &observations {
            assert!(catalog.iter().all(|e| obs.value(&e.name).is_finite()));
        }
        assert!(observations.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn async_load_matches_direct_read() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();

        let loaded = runtime.block_on(DataSource::Bundled.load()).unwrap();
        assert_eq!(loaded, DataSource::Bundled.read().unwrap());
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = DataSource::File("does/not/exist.csv".into())
            .read()
            .unwrap_err();

        assert!(err.to_string().contains("does/not/exist.csv"));
    }
}
