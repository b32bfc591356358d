//! In-memory store for unit tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use md_core::{ArtifactRef, ArtifactStore, StoreError};

#[derive(Default)]
struct Inner {
    files: HashMap<ArtifactRef, Vec<u8>>,
    read_only: Vec<ArtifactRef>,
    released: Vec<ArtifactRef>,
    fail_allocate: bool,
    next: u32,
}

/// Cloneable handle; clones share the same files
#[derive(Clone, Default)]
pub(crate) struct MemStore(Arc<Mutex<Inner>>);

impl MemStore {
    pub fn with_file(path: &str, content: &[u8]) -> Self {
        let store = Self::default();
        store.put(path, content);
        store
    }

    pub fn put(&self, path: &str, content: &[u8]) {
        self.0
            .lock()
            .unwrap()
            .files
            .insert(ArtifactRef::new(path), content.to_vec());
    }

    pub fn content(&self, artifact: &ArtifactRef) -> Option<Vec<u8>> {
        self.0.lock().unwrap().files.get(artifact).cloned()
    }

    pub fn set_read_only(&self, artifact: &ArtifactRef) {
        self.0.lock().unwrap().read_only.push(artifact.clone());
    }

    pub fn set_fail_allocate(&self, fail: bool) {
        self.0.lock().unwrap().fail_allocate = fail;
    }

    pub fn released(&self) -> Vec<ArtifactRef> {
        self.0.lock().unwrap().released.clone()
    }
}

impl ArtifactStore for MemStore {
    fn resolve(&self, artifact: &ArtifactRef) -> Result<(), StoreError> {
        if self.0.lock().unwrap().files.contains_key(artifact) {
            Ok(())
        } else {
            Err(StoreError::NotFound(artifact.clone()))
        }
    }

    fn read(&self, artifact: &ArtifactRef) -> Result<Vec<u8>, StoreError> {
        self.content(artifact)
            .ok_or_else(|| StoreError::NotFound(artifact.clone()))
    }

    fn write(&self, artifact: &ArtifactRef, content: &[u8]) -> Result<(), StoreError> {
        let mut inner = self.0.lock().unwrap();
        if inner.read_only.contains(artifact) {
            return Err(StoreError::io(
                artifact,
                std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            ));
        }
        inner.files.insert(artifact.clone(), content.to_vec());
        Ok(())
    }

    fn allocate(&self, derived_from: &ArtifactRef) -> Result<ArtifactRef, StoreError> {
        let mut inner = self.0.lock().unwrap();
        if inner.fail_allocate {
            return Err(StoreError::io(
                derived_from,
                std::io::Error::other("disk full"),
            ));
        }
        let content = inner
            .files
            .get(derived_from)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(derived_from.clone()))?;
        inner.next += 1;
        let artifact = ArtifactRef::new(format!("/tmp/snap-{}", inner.next));
        inner.files.insert(artifact.clone(), content);
        Ok(artifact)
    }

    fn release(&self, artifact: &ArtifactRef) -> Result<(), StoreError> {
        let mut inner = self.0.lock().unwrap();
        inner.files.remove(artifact);
        inner.released.push(artifact.clone());
        Ok(())
    }
}
