//! The staged, runtime-ready view of an application.

use crate::env::EnvironmentVariables;
use std::path::{Path, PathBuf};

/// The droplet produced by a staging run: the runtime filesystem root plus the metadata other
/// components contributed to it (Java home, environment variables, library sets).
///
/// Library collections are filtered by producing new values, never in place; a component that
/// narrows them returns the updated droplet from its release phase so the driver can thread the
/// new view to later consumers explicitly.
#[derive(Clone, Debug)]
pub struct Droplet {
    pub root: PathBuf,
    pub java_home: JavaHome,
    pub environment_variables: EnvironmentVariables,
    pub additional_libraries: LibraryCollection,
    pub root_libraries: LibraryCollection,
}

impl Droplet {
    pub fn new(root: impl Into<PathBuf>, java_home: JavaHome) -> Self {
        Self {
            root: root.into(),
            java_home,
            environment_variables: EnvironmentVariables::new(),
            additional_libraries: LibraryCollection::new(),
            root_libraries: LibraryCollection::new(),
        }
    }

    /// The droplet-relative invocation path of the `java` executable, e.g. `$PWD/.java/bin/java`.
    #[must_use]
    pub fn java_executable(&self) -> String {
        format!("{}/bin/java", qualify_path(self.java_home.root(), &self.root))
    }
}

/// The Java runtime installation inside a droplet.
#[derive(Clone, Debug)]
pub struct JavaHome {
    root: PathBuf,
}

impl JavaHome {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The absolute path of the bundled `keytool` binary.
    #[must_use]
    pub fn keytool(&self) -> PathBuf {
        self.root.join("bin").join("keytool")
    }
}

/// An ordered collection of library paths attached to a droplet.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LibraryCollection {
    paths: Vec<PathBuf>,
}

impl LibraryCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.paths.push(path.into());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns a new collection keeping only entries whose path contains at least one of the
    /// allow-list tokens as a substring. An empty token list lets every entry pass.
    ///
    /// The receiver is left untouched; callers that want the narrowed view to become visible
    /// must use the returned collection.
    #[must_use]
    pub fn retain_matching(&self, tokens: &[String]) -> Self {
        if tokens.is_empty() {
            return self.clone();
        }

        Self {
            paths: self
                .paths
                .iter()
                .filter(|path| {
                    let path = path.to_string_lossy();
                    tokens.iter().any(|token| path.contains(token.as_str()))
                })
                .cloned()
                .collect(),
        }
    }

    /// Renders the collection as a `java` classpath argument with entries qualified against
    /// `base`, e.g. `-cp $PWD/.libs/a.jar:$PWD/.libs/b.jar`.
    #[must_use]
    pub fn as_classpath(&self, base: &Path) -> String {
        format!("-cp {}", self.qualified_paths(base).join(":"))
    }

    /// The entries qualified against `base`, in insertion order.
    #[must_use]
    pub fn qualified_paths(&self, base: &Path) -> Vec<String> {
        self.paths.iter().map(|path| qualify_path(path, base)).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.paths.iter()
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for LibraryCollection {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a LibraryCollection {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Qualifies a path for use inside a launch command.
///
/// A path under `base` renders relative to the runtime working directory as `$PWD/<relative>`;
/// anything else renders as-is.
#[must_use]
pub fn qualify_path(path: &Path, base: &Path) -> String {
    match path.strip_prefix(base) {
        Ok(relative) => format!("$PWD/{}", relative.display()),
        Err(_) => path.display().to_string(),
    }
}
