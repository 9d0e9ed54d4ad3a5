use std::path::{Path, PathBuf};

/// The uploaded application's filesystem root.
///
/// Components resolve relative configuration paths against this root and test them for
/// existence; they never modify the application itself.
#[derive(Clone, Debug)]
pub struct Application {
    root: PathBuf,
}

impl Application {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a configured subpath against the application root.
    ///
    /// See [`valid_path`].
    #[must_use]
    pub fn valid_path(&self, subpath: &str) -> Option<PathBuf> {
        valid_path(&self.root, subpath)
    }
}

/// Resolves a configured relative path against a base directory.
///
/// Returns the joined path only when the configured value is non-blank and the result exists on
/// disk. A blank value or a missing path means the corresponding feature is disabled, not an
/// error.
#[must_use]
pub fn valid_path(base: &Path, subpath: &str) -> Option<PathBuf> {
    if subpath.is_empty() {
        return None;
    }

    let full_path = base.join(subpath);
    full_path.exists().then_some(full_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn valid_path_requires_existence() {
        let tmpdir = tempfile::tempdir().unwrap();
        fs::create_dir(tmpdir.path().join("certs")).unwrap();

        let application = Application::new(tmpdir.path());

        assert_eq!(
            application.valid_path("certs"),
            Some(tmpdir.path().join("certs"))
        );
        assert_eq!(application.valid_path("missing"), None);
    }

    #[test]
    fn valid_path_treats_blank_as_disabled() {
        let tmpdir = tempfile::tempdir().unwrap();

        assert_eq!(Application::new(tmpdir.path()).valid_path(""), None);
    }
}
