//! Filesystem infrastructure — implements the read-only `LocalFs` port.

use std::path::Path;

/// Production filesystem implementation of `LocalFs`.
pub struct LocalFs;

impl crate::application::ports::LocalFs for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
