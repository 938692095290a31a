use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Raw page markup kept on disk for the length of one scrape.
///
/// The file is removed by [`TempArtifact::remove`] or, failing that, when the
/// guard is dropped.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
    removed: bool,
}

impl TempArtifact {
    /// Reserve a uniquely named `.html` path inside `dir`, creating `dir` if needed.
    /// Nothing is written until [`TempArtifact::write`].
    pub fn acquire(dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.html", Uuid::new_v4()));
        ::log::debug!("Reserved temporary artifact {}", path.display());
        Ok(Self {
            path,
            removed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, html: &str) -> io::Result<()> {
        fs::write(&self.path, html)
    }

    pub fn read(&self) -> io::Result<String> {
        fs::read_to_string(&self.path)
    }

    /// Delete the file now
    pub fn remove(mut self) {
        self.cleanup();
    }

    fn cleanup(&mut self) {
        if self.removed {
            return;
        }
        self.removed = true;

        match fs::remove_file(&self.path) {
            Ok(()) => ::log::info!("Deleted temporary file: {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                ::log::debug!("Temporary file was never written: {}", self.path.display())
            }
            Err(e) => ::log::warn!(
                "Failed to delete temporary file {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        self.cleanup();
    }
}
