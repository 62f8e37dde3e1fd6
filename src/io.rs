use std::path::{Path, PathBuf};

use miette::{Context, IntoDiagnostic, Result};
use tracing::{debug, warn};

/// Change the process working directory for as long as the guard lives.
///
/// The previous working directory is restored when the guard is dropped,
/// whichever way the scope is exited.
#[derive(Debug)]
pub struct CurrentDirGuard {
    previous: PathBuf,
}

impl CurrentDirGuard {
    pub fn enter(dir: &Path) -> Result<Self> {
        let previous = std::env::current_dir()
            .into_diagnostic()
            .wrap_err("Could not get the current directory")?;

        std::env::set_current_dir(dir)
            .into_diagnostic()
            .wrap_err_with(|| format!("Could not enter directory {}", dir.display()))?;
        debug!("Entered directory {}", dir.display());

        Ok(Self { previous })
    }
}

impl Drop for CurrentDirGuard {
    fn drop(&mut self) {
        if let Err(err) = std::env::set_current_dir(&self.previous) {
            warn!(
                "Could not go back to directory {}: {err}",
                self.previous.display()
            );
        }
    }
}

/// Held by the tests that change the process working directory
#[cfg(test)]
pub static CWD_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Create the directory and its parents if they do not exist
pub fn create_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .into_diagnostic()
        .wrap_err_with(|| format!("Could not create directory {}", dir.display()))?;
    Ok(())
}

pub fn remove_file(path: &Path) -> Result<()> {
    std::fs::remove_file(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Could not remove file {}", path.display()))?;
    debug!("Removed {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_restores_previous_directory() {
        let _lock = CWD_LOCK.lock().unwrap_or_else(|err| err.into_inner());
        let tmp = tempfile::tempdir().unwrap();
        let before = std::env::current_dir().unwrap();

        {
            let _guard = CurrentDirGuard::enter(tmp.path()).unwrap();
            assert_eq!(
                std::env::current_dir().unwrap().canonicalize().unwrap(),
                tmp.path().canonicalize().unwrap()
            );
        }

        assert_eq!(std::env::current_dir().unwrap(), before);

        // A missing directory leaves the current one untouched
        assert!(CurrentDirGuard::enter(&tmp.path().join("missing")).is_err());
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn create_then_remove() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("a").join("b");
        create_dir(&dir).unwrap();
        assert!(dir.is_dir());

        let file = dir.join("file.mp4");
        std::fs::write(&file, b"data").unwrap();
        remove_file(&file).unwrap();
        assert!(!file.exists());
        assert!(remove_file(&file).is_err());
    }
}
