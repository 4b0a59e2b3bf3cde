//! Submitter that writes each package as a JSON file.

use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};

use tracing::info;

use intake_wizard::{SubmissionPackage, SubmitError, Submitter};

/// Writes `submission-<fingerprint>.json` into a directory.
#[derive(Debug, Clone)]
pub struct JsonFileSubmitter {
    output_dir: PathBuf,
}

impl JsonFileSubmitter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Where the package for a given file fingerprint is written.
    pub fn package_path(&self, package: &SubmissionPackage) -> PathBuf {
        self.output_dir
            .join(format!("submission-{}.json", package.file.short_fingerprint()))
    }

    fn write(&self, package: &SubmissionPackage) -> Result<String, SubmitError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| SubmitError::Io {
            path: self.output_dir.clone(),
            source,
        })?;
        let path = self.package_path(package);
        let json = serde_json::to_string_pretty(package)?;
        fs::write(&path, json).map_err(|source| SubmitError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "wrote submission package");
        Ok(path.display().to_string())
    }
}

impl Submitter for JsonFileSubmitter {
    fn submit(
        &self,
        package: &SubmissionPackage,
    ) -> impl Future<Output = Result<String, SubmitError>> + Send {
        let result = self.write(package);
        async move { result }
    }
}
