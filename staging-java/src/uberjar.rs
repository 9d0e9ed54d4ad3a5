//! The uberjar component.
//!
//! Detects applications staged as a standalone executable jar and synthesizes the shell command
//! used to launch them with `java -jar` and a constructed classpath.

use serde::Deserialize;
use staging_core::component::{Component, DetectOutcome, ReleaseOutcome, StagingContext};
use staging_core::config::{self, ConfigError, RawConfig};
use staging_core::droplet::LibraryCollection;
use staging_core::{Application, Droplet};
use std::convert::Infallible;
use std::fs;

const COMPONENT_ID: &str = "java-uberjar";

/// Validated configuration for the [`Uberjar`] component.
///
/// All properties are optional; a blank value disables the corresponding feature. Wrong-typed
/// values fail validation.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct UberjarConfig {
    /// Relative path of the executable jar under the application root. Required for detection.
    uberjar: Option<String>,

    /// Relative path of a pre-built classes directory under the application root.
    class_path: Option<String>,

    /// Relative path of a directory of extra jars under the application root.
    jar_path: Option<String>,

    /// Comma-separated allow-list tokens applied to the droplet's contributed library sets.
    libs_path: Option<String>,

    /// Literal string appended to the launch command.
    arguments: Option<String>,
}

impl UberjarConfig {
    pub fn from_table(table: &RawConfig) -> Result<Self, ConfigError> {
        let raw: Self = config::from_table(table)?;

        Ok(Self {
            uberjar: config::normalize(raw.uberjar),
            class_path: config::normalize(raw.class_path),
            jar_path: config::normalize(raw.jar_path),
            libs_path: config::normalize(raw.libs_path),
            arguments: config::normalize(raw.arguments),
        })
    }

    fn allow_list(&self) -> Vec<String> {
        self.libs_path
            .as_deref()
            .map(|tokens| {
                tokens
                    .split(',')
                    .map(str::trim)
                    .filter(|token| !token.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Stages applications running as standalone uberjars expected to be run with `java -jar`.
pub struct Uberjar {
    config: UberjarConfig,
}

impl Uberjar {
    #[must_use]
    pub fn new(config: UberjarConfig) -> Self {
        Self { config }
    }

    /// Assembles the `-cp` argument from the configured contributors and the droplet's filtered
    /// library collections. Empty when nothing contributes a path.
    fn classpath(
        &self,
        application: &Application,
        droplet: &Droplet,
        additional_libraries: &LibraryCollection,
        root_libraries: &LibraryCollection,
    ) -> std::io::Result<String> {
        let mut paths = Vec::new();

        if let Some(class_path) = &self.config.class_path {
            if application.valid_path(class_path).is_some() {
                paths.push(format!("$PWD/{class_path}"));
            }
        }

        if let Some(jar_path) = &self.config.jar_path {
            if let Some(jar_dir) = application.valid_path(jar_path) {
                for entry in fs::read_dir(jar_dir)? {
                    let entry = entry?;
                    let file_name = entry.file_name();
                    let file_name = file_name.to_string_lossy();

                    if entry.file_type()?.is_file() && file_name.ends_with(".jar") {
                        paths.push(format!("$PWD/{jar_path}/{file_name}"));
                    }
                }
            }
        }

        if !additional_libraries.is_empty() {
            let classpath = additional_libraries.as_classpath(&droplet.root);
            paths.push(classpath.trim_start_matches("-cp ").to_string());
        }

        if !root_libraries.is_empty() {
            paths.push(root_libraries.qualified_paths(&droplet.root).join(":"));
        }

        Ok(if paths.is_empty() {
            String::new()
        } else {
            format!("-cp {}", paths.join(":"))
        })
    }
}

impl Component for Uberjar {
    type Error = Infallible;

    fn id(&self) -> &'static str {
        COMPONENT_ID
    }

    fn detect(&self, _context: &StagingContext) -> DetectOutcome {
        if self.config.uberjar.is_some() {
            DetectOutcome::Pass(self.id())
        } else {
            DetectOutcome::Fail
        }
    }

    fn compile(&self, _context: &StagingContext) -> staging_core::Result<(), Self::Error> {
        // All work is deferred to release; nothing is copied or transformed at compile time.
        Ok(())
    }

    fn release(&self, context: StagingContext) -> staging_core::Result<ReleaseOutcome, Self::Error> {
        let StagingContext {
            application,
            mut droplet,
        } = context;

        let Some(uberjar) = self.config.uberjar.clone() else {
            return Ok(ReleaseOutcome::pass_through(droplet));
        };

        let tokens = self.config.allow_list();
        let additional_libraries = droplet.additional_libraries.retain_matching(&tokens);
        let root_libraries = droplet.root_libraries.retain_matching(&tokens);

        let classpath =
            self.classpath(&application, &droplet, &additional_libraries, &root_libraries)?;

        let mut segments = Vec::new();

        let env_vars = droplet.environment_variables.as_env_vars();
        if !env_vars.is_empty() {
            segments.push(env_vars);
        }

        segments.push(String::from("eval"));
        segments.push(String::from("exec"));
        segments.push(droplet.java_executable());
        segments.push(String::from("$JAVA_OPTS"));

        if !classpath.is_empty() {
            segments.push(classpath);
        }

        segments.push(String::from("-jar"));
        segments.push(format!("$PWD/{uberjar}"));

        if let Some(arguments) = &self.config.arguments {
            segments.push(arguments.clone());
        }

        droplet.additional_libraries = additional_libraries;
        droplet.root_libraries = root_libraries;

        Ok(ReleaseOutcome {
            droplet,
            command: Some(segments.join(" ")),
        })
    }
}
