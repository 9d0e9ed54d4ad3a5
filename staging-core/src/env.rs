use std::collections::BTreeMap;

/// Environment variable assignments attached to a droplet.
///
/// The variables are rendered as `KEY=VALUE` assignments prepended to the launch command. A
/// sorted map keeps the rendered command stable across staging runs.
///
/// # Examples
/// ```
/// use staging_core::EnvironmentVariables;
///
/// let mut env = EnvironmentVariables::new();
/// env.set("FOO", "BAR");
/// env.set("BAZ", "BLAH");
///
/// assert_eq!("BAZ=BLAH FOO=BAR", env.as_env_vars());
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EnvironmentVariables {
    inner: BTreeMap<String, String>,
}

impl EnvironmentVariables {
    /// Creates an empty set of environment variables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a variable, overriding the value if `key` was already present.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.inner.insert(key.into(), value.into());
        self
    }

    /// Returns the value for the given key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Renders all variables as space-joined `KEY=VALUE` assignments, sorted by key.
    #[must_use]
    pub fn as_env_vars(&self) -> String {
        self.inner
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[must_use]
    pub fn iter(&self) -> std::collections::btree_map::Iter<'_, String, String> {
        self.inner.iter()
    }
}

impl<'a> IntoIterator for &'a EnvironmentVariables {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_env_vars_is_sorted_and_space_joined() {
        let mut env = EnvironmentVariables::new();
        env.set("JAVA_TOOL_OPTIONS", "-Xmx1G");
        env.set("ANOTHER", "value");

        assert_eq!("ANOTHER=value JAVA_TOOL_OPTIONS=-Xmx1G", env.as_env_vars());
    }

    #[test]
    fn as_env_vars_is_empty_for_no_variables() {
        assert_eq!("", EnvironmentVariables::new().as_env_vars());
    }

    #[test]
    fn set_overrides_existing_values() {
        let mut env = EnvironmentVariables::new();
        env.set("FOO", "FOO");
        env.set("FOO", "BAR");

        assert_eq!(env.get("FOO"), Some("BAR"));
    }
}
