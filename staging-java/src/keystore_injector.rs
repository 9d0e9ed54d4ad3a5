//! The keystore injector component.
//!
//! Looks for certificates and PEM files bundled with the application and injects them into the
//! local Java keystore, one `keytool` invocation per file.

use serde::Deserialize;
use staging_core::application::valid_path;
use staging_core::component::{Component, DetectOutcome, ReleaseOutcome, StagingContext};
use staging_core::config::{self, ConfigError, RawConfig};
use staging_core::log::{ConsoleLog, Log};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

const COMPONENT_ID: &str = "keystore-injector";
const COMPONENT_NAME: &str = "Keystore Injector";
const DEFAULT_PASSWORD: &str = "changeit";

/// Validated configuration for the [`KeystoreInjector`] component.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct KeystoreConfig {
    /// Relative path of the keystore file under the Java home.
    store: Option<String>,

    /// Relative path of the PEM directory under the application root.
    pem_path: Option<String>,

    /// Keystore password; defaults to `changeit` when unset.
    password: Option<String>,
}

impl KeystoreConfig {
    pub fn from_table(table: &RawConfig) -> Result<Self, ConfigError> {
        let raw: Self = config::from_table(table)?;

        Ok(Self {
            store: config::normalize(raw.store),
            pem_path: config::normalize(raw.pem_path),
            password: config::normalize(raw.password),
        })
    }

    fn password(&self) -> &str {
        self.password.as_deref().unwrap_or(DEFAULT_PASSWORD)
    }
}

/// An error that occurred while importing a PEM file into the keystore.
///
/// Imports are strictly sequential and there is no rollback: a failure surfaces to the caller
/// with any earlier imports left in place.
#[derive(thiserror::Error, Debug)]
pub enum KeystoreInjectorError {
    #[error("Could not execute keytool: {0}")]
    KeytoolSpawn(std::io::Error),

    #[error("keytool exited with {status} while importing {pem_file}")]
    KeytoolExit { pem_file: PathBuf, status: ExitStatus },
}

/// Imports PEM certificates bundled with the application into the default Java keystore.
pub struct KeystoreInjector<L = ConsoleLog> {
    config: KeystoreConfig,
    logger: L,
}

impl KeystoreInjector<ConsoleLog> {
    #[must_use]
    pub fn new(config: KeystoreConfig) -> Self {
        Self::with_logger(config, ConsoleLog)
    }
}

impl<L: Log> KeystoreInjector<L> {
    /// Creates the component with an explicit logger, e.g. a capturing one in tests.
    pub fn with_logger(config: KeystoreConfig, logger: L) -> Self {
        Self { config, logger }
    }

    fn keystore(&self, context: &StagingContext) -> Option<PathBuf> {
        valid_path(
            context.droplet.java_home.root(),
            self.config.store.as_deref()?,
        )
    }

    fn pem_path(&self, context: &StagingContext) -> Option<PathBuf> {
        context
            .application
            .valid_path(self.config.pem_path.as_deref()?)
    }

    /// Adds one PEM file to the keystore, blocking until `keytool` exits.
    fn import_pem(
        &self,
        keytool: &Path,
        pem_file: &Path,
        keystore: &Path,
    ) -> Result<(), KeystoreInjectorError> {
        let file_name = pem_file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.logger
            .step(COMPONENT_NAME, &format!("adding PEM {file_name}"));

        let status = Command::new(keytool)
            .arg("-import")
            .arg("-file")
            .arg(pem_file)
            .arg("-alias")
            .arg(&file_name)
            .arg("-storepass")
            .arg(self.config.password())
            .arg("-keystore")
            .arg(keystore)
            .arg("-noprompt")
            .args(["-storetype", "JKS"])
            .status()
            .map_err(KeystoreInjectorError::KeytoolSpawn)?;

        if status.success() {
            Ok(())
        } else {
            Err(KeystoreInjectorError::KeytoolExit {
                pem_file: pem_file.to_path_buf(),
                status,
            })
        }
    }
}

impl<L: Log> Component for KeystoreInjector<L> {
    type Error = KeystoreInjectorError;

    fn id(&self) -> &'static str {
        COMPONENT_ID
    }

    fn detect(&self, context: &StagingContext) -> DetectOutcome {
        if self.keystore(context).is_some() && self.pem_path(context).is_some() {
            DetectOutcome::Pass(self.id())
        } else {
            DetectOutcome::Fail
        }
    }

    fn compile(&self, context: &StagingContext) -> staging_core::Result<(), Self::Error> {
        let (Some(keystore), Some(pem_path)) = (self.keystore(context), self.pem_path(context))
        else {
            return Ok(());
        };

        self.logger.step(
            COMPONENT_NAME,
            &format!("processing PEMs at {}", pem_path.display()),
        );

        let keytool = context.droplet.java_home.keytool();

        for entry in fs::read_dir(&pem_path)? {
            let entry = entry?;
            let pem_file = entry.path();

            if entry.file_name().to_string_lossy().ends_with(".pem") {
                self.import_pem(&keytool, &pem_file, &keystore)
                    .map_err(staging_core::Error::Component)?;
            }
        }

        Ok(())
    }

    fn release(&self, context: StagingContext) -> staging_core::Result<ReleaseOutcome, Self::Error> {
        Ok(ReleaseOutcome::pass_through(context.droplet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use staging_core::{Application, Droplet, JavaHome};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLog {
        steps: Mutex<Vec<String>>,
    }

    impl Log for &RecordingLog {
        fn step(&self, component: &str, message: &str) {
            self.steps
                .lock()
                .unwrap()
                .push(format!("{component}: {message}"));
        }

        fn error(&self, _header: &str, _body: &str) {}
    }

    fn config(entries: &[(&str, &str)]) -> KeystoreConfig {
        let mut table = RawConfig::new();
        for (key, value) in entries {
            table.insert(String::from(*key), toml::Value::String(String::from(*value)));
        }
        KeystoreConfig::from_table(&table).unwrap()
    }

    struct Fixture {
        application_dir: tempfile::TempDir,
        droplet_dir: tempfile::TempDir,
    }

    impl Fixture {
        /// An application with a `certs/` PEM directory and a droplet whose Java home carries
        /// a keystore at `lib/security/cacerts`.
        fn new() -> Self {
            let application_dir = tempfile::tempdir().unwrap();
            fs::create_dir(application_dir.path().join("certs")).unwrap();

            let droplet_dir = tempfile::tempdir().unwrap();
            let java_home = droplet_dir.path().join(".java");
            fs::create_dir_all(java_home.join("lib/security")).unwrap();
            fs::write(java_home.join("lib/security/cacerts"), []).unwrap();

            Self {
                application_dir,
                droplet_dir,
            }
        }

        fn context(&self) -> StagingContext {
            StagingContext {
                application: Application::new(self.application_dir.path()),
                droplet: Droplet::new(
                    self.droplet_dir.path(),
                    JavaHome::new(self.droplet_dir.path().join(".java")),
                ),
            }
        }

        fn add_pem(&self, name: &str) {
            fs::write(self.application_dir.path().join("certs").join(name), []).unwrap();
        }

        /// Replaces `keytool` with a shell script that appends its arguments to `args.log` and
        /// exits with the given code.
        #[cfg(unix)]
        fn install_fake_keytool(&self, exit_code: i32) -> PathBuf {
            use std::os::unix::fs::PermissionsExt;

            let java_home = self.droplet_dir.path().join(".java");
            fs::create_dir_all(java_home.join("bin")).unwrap();

            let log = self.droplet_dir.path().join("args.log");
            let keytool = java_home.join("bin/keytool");
            fs::write(
                &keytool,
                format!("#!/bin/sh\nprintf '%s\\n' \"$*\" >> {}\nexit {exit_code}\n", log.display()),
            )
            .unwrap();
            fs::set_permissions(&keytool, fs::Permissions::from_mode(0o755)).unwrap();

            log
        }
    }

    fn store_config() -> KeystoreConfig {
        config(&[("store", "lib/security/cacerts"), ("pem_path", "certs")])
    }

    #[test]
    fn detect_fails_when_keystore_is_missing_on_disk() {
        let fixture = Fixture::new();
        let component = KeystoreInjector::new(config(&[
            ("store", "lib/security/other"),
            ("pem_path", "certs"),
        ]));

        assert_eq!(component.detect(&fixture.context()), DetectOutcome::Fail);
    }

    #[test]
    fn detect_fails_when_pem_directory_is_missing_on_disk() {
        let fixture = Fixture::new();
        let component = KeystoreInjector::new(config(&[
            ("store", "lib/security/cacerts"),
            ("pem_path", "missing"),
        ]));

        assert_eq!(component.detect(&fixture.context()), DetectOutcome::Fail);
    }

    #[test]
    fn detect_fails_when_configuration_is_blank() {
        let fixture = Fixture::new();
        let component = KeystoreInjector::new(config(&[("store", ""), ("pem_path", "certs")]));

        assert_eq!(component.detect(&fixture.context()), DetectOutcome::Fail);
    }

    #[test]
    fn detect_passes_when_both_paths_resolve_and_is_idempotent() {
        let fixture = Fixture::new();
        let component = KeystoreInjector::new(store_config());

        assert_eq!(
            component.detect(&fixture.context()),
            DetectOutcome::Pass("keystore-injector")
        );
        assert_eq!(
            component.detect(&fixture.context()),
            DetectOutcome::Pass("keystore-injector")
        );
    }

    #[test]
    #[cfg(unix)]
    fn compile_imports_each_pem_file_once() {
        let fixture = Fixture::new();
        fixture.add_pem("a.pem");
        fixture.add_pem("b.pem");
        fixture.add_pem("notes.txt");
        let args_log = fixture.install_fake_keytool(0);

        let logger = RecordingLog::default();
        let component = KeystoreInjector::with_logger(store_config(), &logger);
        component.compile(&fixture.context()).unwrap();

        let invocations = fs::read_to_string(args_log).unwrap();
        let mut lines: Vec<&str> = invocations.lines().collect();
        lines.sort_unstable();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("-alias a.pem"));
        assert!(lines[1].contains("-alias b.pem"));
        for line in &lines {
            assert!(line.starts_with("-import -file "));
            assert!(line.contains("-storepass changeit"));
            assert!(line.contains("-noprompt -storetype JKS"));
            assert!(line.contains("lib/security/cacerts"));
        }

        let steps = logger.steps.lock().unwrap();
        assert!(steps[0].starts_with("Keystore Injector: processing PEMs at "));
        assert_eq!(steps.len(), 3);
    }

    #[test]
    #[cfg(unix)]
    fn compile_uses_the_configured_password() {
        let fixture = Fixture::new();
        fixture.add_pem("a.pem");
        let args_log = fixture.install_fake_keytool(0);

        let component = KeystoreInjector::new(config(&[
            ("store", "lib/security/cacerts"),
            ("pem_path", "certs"),
            ("password", "sup3r-secret"),
        ]));
        component.compile(&fixture.context()).unwrap();

        let invocations = fs::read_to_string(args_log).unwrap();
        assert!(invocations.contains("-storepass sup3r-secret"));
    }

    #[test]
    #[cfg(unix)]
    fn compile_propagates_keytool_failures() {
        let fixture = Fixture::new();
        fixture.add_pem("a.pem");
        fixture.install_fake_keytool(1);

        let component = KeystoreInjector::new(store_config());
        let result = component.compile(&fixture.context());

        assert!(matches!(
            result,
            Err(staging_core::Error::Component(
                KeystoreInjectorError::KeytoolExit { .. }
            ))
        ));
    }

    #[test]
    fn compile_without_pem_files_issues_no_invocations() {
        let fixture = Fixture::new();

        let logger = RecordingLog::default();
        let component = KeystoreInjector::with_logger(store_config(), &logger);
        component.compile(&fixture.context()).unwrap();

        // Only the processing header; no per-PEM steps and no keytool on the path to run.
        assert_eq!(logger.steps.lock().unwrap().len(), 1);
    }

    #[test]
    fn release_contributes_no_command() {
        let fixture = Fixture::new();
        let component = KeystoreInjector::new(store_config());

        let outcome = component.release(fixture.context()).unwrap();

        assert_eq!(outcome.command, None);
    }
}
