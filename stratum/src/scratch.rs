//! Self-cleaning scratch directories.
//!
//! [`ScratchDir`] owns a freshly created temporary directory and removes
//! the whole tree when it goes out of scope, on every exit path — normal
//! drop, explicit [`ScratchDir::close`], or unwinding out of a
//! [`ScratchDir::scoped`] closure.

use std::io;
use std::path::PathBuf;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;
use thiserror::Error;

/// Errors from creating or removing a scratch directory.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScratchError {
    /// Underlying filesystem failure while creating or removing the tree.
    #[error("scratch directory I/O failure: {0}")]
    Io(#[from] io::Error),

    /// The platform handed back a temporary path that is not valid UTF-8.
    #[error("temporary path '{}' is not valid UTF-8", .path.display())]
    NonUtf8Path {
        /// The offending path as reported by the platform.
        path: PathBuf,
    },
}

/// A temporary directory that is removed when no longer needed.
#[derive(Debug)]
pub struct ScratchDir {
    dir: Option<TempDir>,
    path: Utf8PathBuf,
}

impl ScratchDir {
    /// Create a fresh scratch directory under the system temporary
    /// location.
    ///
    /// # Errors
    ///
    /// Returns [`ScratchError::Io`] when the directory cannot be created,
    /// or [`ScratchError::NonUtf8Path`] when the platform produces a
    /// non-UTF-8 temporary path.
    pub fn new() -> Result<Self, ScratchError> {
        Self::wrap(TempDir::new()?)
    }

    /// Create a fresh scratch directory inside `parent`.
    ///
    /// # Errors
    ///
    /// As [`ScratchDir::new`].
    pub fn new_in(parent: impl AsRef<Utf8Path>) -> Result<Self, ScratchError> {
        Self::wrap(TempDir::new_in(parent.as_ref())?)
    }

    fn wrap(dir: TempDir) -> Result<Self, ScratchError> {
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|path| ScratchError::NonUtf8Path { path })?;
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    /// The directory's path, usable for the lifetime of this value.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Remove the directory tree now, surfacing any removal failure.
    ///
    /// Dropping a `ScratchDir` removes the tree as well, but a drop can
    /// only log a failure; `close` reports it.
    ///
    /// # Errors
    ///
    /// Returns [`ScratchError::Io`] when the tree cannot be removed.
    pub fn close(mut self) -> Result<(), ScratchError> {
        match self.dir.take() {
            Some(dir) => Ok(dir.close()?),
            None => Ok(()),
        }
    }

    /// Run `f` against a fresh scratch directory, removing the tree
    /// afterwards.
    ///
    /// The directory is removed on the normal path (with removal failures
    /// reported) and during unwinding if `f` panics.
    ///
    /// # Errors
    ///
    /// Returns [`ScratchError`] when the directory cannot be created or
    /// removed.
    pub fn scoped<T>(f: impl FnOnce(&Utf8Path) -> T) -> Result<T, ScratchError> {
        let dir = Self::new()?;
        let value = f(dir.path());
        dir.close()?;
        Ok(value)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            if let Err(error) = dir.close() {
                tracing::warn!(path = %self.path, %error, "failed to remove scratch directory");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use camino::Utf8PathBuf;
    use rstest::rstest;

    use super::{ScratchDir, ScratchError};

    #[rstest]
    fn path_exists_while_live_and_vanishes_on_close() {
        let dir = match ScratchDir::new() {
            Ok(dir) => dir,
            Err(error) => panic!("scratch creation failed: {error}"),
        };
        let path = dir.path().to_owned();
        assert!(path.is_dir(), "scratch path should exist while live");

        if let Err(error) = dir.close() {
            panic!("close failed: {error}");
        }
        assert!(!path.exists(), "close should remove the tree");
    }

    #[rstest]
    fn drop_removes_tree_with_contents() {
        let path;
        {
            let dir = match ScratchDir::new() {
                Ok(dir) => dir,
                Err(error) => panic!("scratch creation failed: {error}"),
            };
            path = dir.path().to_owned();
            if let Err(error) = fs::write(path.join("keep.txt"), b"data") {
                panic!("write failed: {error}");
            }
        }
        assert!(!path.exists(), "drop should remove the tree");
    }

    #[rstest]
    fn scoped_returns_closure_value_and_cleans_up() {
        let mut seen = None;
        let result = ScratchDir::scoped(|path| {
            seen = Some(path.to_owned());
            41 + 1
        });
        match result {
            Ok(value) => assert_eq!(value, 42),
            Err(error) => panic!("scoped failed: {error}"),
        }
        let Some(path) = seen else {
            panic!("closure never ran");
        };
        assert!(!path.exists(), "scoped should remove the tree");
    }

    #[rstest]
    fn scoped_cleans_up_when_the_closure_panics() {
        let mut seen: Option<Utf8PathBuf> = None;
        let outcome: Result<Result<(), ScratchError>, _> =
            catch_unwind(AssertUnwindSafe(|| {
                ScratchDir::scoped(|path| {
                    seen = Some(path.to_owned());
                    panic!("induced failure");
                })
            }));
        assert!(outcome.is_err(), "panic should propagate");
        let Some(path) = seen else {
            panic!("closure never ran");
        };
        assert!(!path.exists(), "unwinding should remove the tree");
    }

    #[rstest]
    fn new_in_nests_under_the_parent() {
        let parent = match ScratchDir::new() {
            Ok(dir) => dir,
            Err(error) => panic!("scratch creation failed: {error}"),
        };
        let child = match ScratchDir::new_in(parent.path()) {
            Ok(dir) => dir,
            Err(error) => panic!("nested creation failed: {error}"),
        };
        assert!(
            child.path().starts_with(parent.path()),
            "child should live under the parent"
        );
    }
}
