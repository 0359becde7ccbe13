use crate::codec::Charset;
use crate::error::{Result, XorsweepError};
use std::path::PathBuf;
use std::time::Duration;

/// Worker count used when none is requested
pub const DEFAULT_WORKERS: usize = 1;

/// Upper bound on workers; each one is an OS thread with its own temp file
pub const MAX_WORKERS: usize = 256;

/// Options for a sweep run
#[derive(Debug, Clone)]
pub struct SweepOptions {
    /// Number of work units and workers (one thread per unit)
    pub workers: usize,
    /// Overall deadline for collecting batches. `None` waits for every worker.
    pub worker_timeout: Option<Duration>,
    /// Where work unit files are created. `None` uses the system temp dir.
    pub temp_dir: Option<PathBuf>,
    /// Character class a decoding must match to be reported
    pub charset: Charset,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            worker_timeout: None,
            temp_dir: None,
            charset: Charset::default(),
        }
    }
}

impl SweepOptions {
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers,
            ..Default::default()
        }
    }

    /// Reject configurations before any file is touched
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 || self.workers > MAX_WORKERS {
            return Err(XorsweepError::InvalidWorkerCount(self.workers));
        }

        if let Some(timeout) = self.worker_timeout {
            if timeout.is_zero() {
                return Err(XorsweepError::InvalidConfig(
                    "worker timeout must be greater than zero".into(),
                ));
            }
        }

        if let Some(dir) = &self.temp_dir {
            if !dir.is_dir() {
                return Err(XorsweepError::InvalidConfig(format!(
                    "temp dir {} is not a directory",
                    dir.display()
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_is_valid() {
        let options = SweepOptions::default();
        assert_eq!(options.workers, 1);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_worker_bounds() {
        assert!(matches!(
            SweepOptions::with_workers(0).validate(),
            Err(XorsweepError::InvalidWorkerCount(0))
        ));
        assert!(SweepOptions::with_workers(MAX_WORKERS).validate().is_ok());
        assert!(matches!(
            SweepOptions::with_workers(MAX_WORKERS + 1).validate(),
            Err(XorsweepError::InvalidWorkerCount(_))
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let options = SweepOptions {
            worker_timeout: Some(Duration::ZERO),
            ..Default::default()
        };
        assert!(matches!(
            options.validate(),
            Err(XorsweepError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_temp_dir_must_exist() {
        let dir = tempdir().unwrap();
        let ok = SweepOptions {
            temp_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let missing = SweepOptions {
            temp_dir: Some(dir.path().join("nope")),
            ..Default::default()
        };
        assert!(matches!(
            missing.validate(),
            Err(XorsweepError::InvalidConfig(_))
        ));
    }
}
