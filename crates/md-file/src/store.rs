//! Filesystem snapshot storage
//!
//! Every store owns a private session directory under a base temp dir.
//! Snapshots are plain copies named `<stem>-<n>.<ext>` so external tools
//! recognise their format. Writes land through a sibling temp file and a
//! rename, so a failed write never leaves a half-written artifact behind.

use std::fs;
use std::path::{Path, PathBuf};

use md_core::{ArtifactRef, ArtifactStore, StoreError};
use parking_lot::Mutex;

/// Snapshot storage on the local filesystem
pub struct FsArtifactStore {
    /// Session directory (owned by this store)
    dir: PathBuf,
    /// Snapshots created and not yet released
    allocated: Mutex<Vec<PathBuf>>,
    /// Running snapshot counter
    next_number: Mutex<u32>,
    /// Leave files on disk when dropped
    keep_files: bool,
}

impl FsArtifactStore {
    /// Create a store with a fresh session directory inside `base_dir`
    pub fn new(base_dir: &Path) -> std::io::Result<Self> {
        let dir = base_dir.join(uuid::Uuid::new_v4().simple().to_string());
        fs::create_dir_all(&dir)?;
        log::debug!("Snapshot store at {}", dir.display());

        Ok(Self {
            dir,
            allocated: Mutex::new(Vec::new()),
            next_number: Mutex::new(1),
            keep_files: false,
        })
    }

    /// Keep snapshot files after the store is dropped
    pub fn set_keep_files(&mut self, keep: bool) {
        self.keep_files = keep;
    }

    /// Session directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of live snapshots
    pub fn allocated_count(&self) -> usize {
        self.allocated.lock().len()
    }

    fn snapshot_path(&self, derived_from: &ArtifactRef) -> PathBuf {
        let source = derived_from.path();
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "snapshot".to_string());
        // Snapshots of snapshots keep the original stem
        let stem = if source.parent() == Some(self.dir.as_path()) {
            strip_counter(&stem).to_string()
        } else {
            stem
        };

        let number = {
            let mut next = self.next_number.lock();
            let n = *next;
            *next += 1;
            n
        };

        let name = match derived_from.extension() {
            Some(ext) => format!("{}-{}.{}", stem, number, ext),
            None => format!("{}-{}", stem, number),
        };
        self.dir.join(name)
    }
}

impl ArtifactStore for FsArtifactStore {
    fn resolve(&self, artifact: &ArtifactRef) -> Result<(), StoreError> {
        let meta = fs::metadata(artifact.path()).map_err(|e| StoreError::io(artifact, e))?;
        if meta.is_file() {
            Ok(())
        } else {
            Err(StoreError::NotFound(artifact.clone()))
        }
    }

    fn read(&self, artifact: &ArtifactRef) -> Result<Vec<u8>, StoreError> {
        fs::read(artifact.path()).map_err(|e| StoreError::io(artifact, e))
    }

    fn write(&self, artifact: &ArtifactRef, content: &[u8]) -> Result<(), StoreError> {
        let existing = fs::metadata(artifact.path()).ok();
        if let Some(meta) = &existing
            && meta.permissions().readonly()
        {
            return Err(StoreError::io(
                artifact,
                std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            ));
        }

        // Replace the file a symlink points at, not the link
        let path =
            fs::canonicalize(artifact.path()).unwrap_or_else(|_| artifact.path().to_path_buf());
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let tmp = parent.join(format!(
            ".{}.{}.tmp",
            artifact.file_name(),
            uuid::Uuid::new_v4().simple()
        ));

        let staged = fs::write(&tmp, content).and_then(|()| match &existing {
            Some(meta) => fs::set_permissions(&tmp, meta.permissions()),
            None => Ok(()),
        });
        if let Err(e) = staged.and_then(|()| fs::rename(&tmp, &path)) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::io(artifact, e));
        }
        Ok(())
    }

    fn allocate(&self, derived_from: &ArtifactRef) -> Result<ArtifactRef, StoreError> {
        let path = self.snapshot_path(derived_from);
        fs::copy(derived_from.path(), &path).map_err(|e| StoreError::io(derived_from, e))?;

        self.allocated.lock().push(path.clone());
        log::debug!("Allocated snapshot {}", path.display());
        Ok(ArtifactRef::new(path))
    }

    fn release(&self, artifact: &ArtifactRef) -> Result<(), StoreError> {
        let path = artifact.path();
        {
            let mut allocated = self.allocated.lock();
            let Some(pos) = allocated.iter().position(|p| p == path) else {
                // Not ours (e.g. an externally produced snapshot): leave it alone
                return Ok(());
            };
            allocated.remove(pos);
        }

        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(artifact, e)),
        }
    }
}

impl Drop for FsArtifactStore {
    fn drop(&mut self) {
        if self.keep_files {
            return;
        }
        for path in self.allocated.get_mut().drain(..) {
            let _ = fs::remove_file(path);
        }
        if let Err(e) = fs::remove_dir(&self.dir) {
            log::debug!("Snapshot dir {} not removed: {}", self.dir.display(), e);
        }
    }
}

/// "take-12" -> "take"
fn strip_counter(stem: &str) -> &str {
    match stem.rsplit_once('-') {
        Some((base, n)) if !base.is_empty() && n.chars().all(|c| c.is_ascii_digit()) => base,
        _ => stem,
    }
}
