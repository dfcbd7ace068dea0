//! Shell session state shared by filesystem and command tools.
//!
//! A [`Session`] holds the current working directory. It is mutated only
//! by the `bash` tool's `cd` special case and read by every shell, file,
//! and search tool to resolve relative operations.

use std::path::{Path, PathBuf};

/// Mutable per-conversation working directory record.
#[derive(Debug, Clone)]
pub struct Session {
    cwd: PathBuf,
}

impl Session {
    /// Create a session rooted at the given directory.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    /// Create a session rooted at the process start directory.
    pub fn from_current_dir() -> std::io::Result<Self> {
        Ok(Self {
            cwd: std::env::current_dir()?,
        })
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Resolve a path against the session cwd. Absolute paths pass through.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    /// Apply a `cd` to the session: absolute targets replace the cwd,
    /// relative targets join onto it. The target is not required to
    /// exist; the next command surfaces any failure.
    pub fn change_dir(&mut self, target: &str) -> &Path {
        self.cwd = self.resolve(target.trim());
        &self.cwd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_against_cwd() {
        let session = Session::new("/work/project");
        assert_eq!(session.resolve("src/main.rs"), PathBuf::from("/work/project/src/main.rs"));
    }

    #[test]
    fn test_resolve_absolute_passthrough() {
        let session = Session::new("/work/project");
        assert_eq!(session.resolve("/etc/hosts"), PathBuf::from("/etc/hosts"));
    }

    #[test]
    fn test_change_dir_relative() {
        let mut session = Session::new("/work/project");
        session.change_dir("sub");
        assert_eq!(session.cwd(), Path::new("/work/project/sub"));
    }

    #[test]
    fn test_change_dir_absolute() {
        let mut session = Session::new("/work/project");
        session.change_dir("/tmp");
        assert_eq!(session.cwd(), Path::new("/tmp"));
    }

    #[test]
    fn test_change_dir_trims_whitespace() {
        let mut session = Session::new("/work");
        session.change_dir("  sub  ");
        assert_eq!(session.cwd(), Path::new("/work/sub"));
    }
}
