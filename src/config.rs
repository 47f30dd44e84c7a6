//! Provisioner configuration model and loader.
//!
//! A provisioner block selects its scripts through exactly one of three keys:
//!
//! ```yaml
//! inline:
//!   - cd /tmp
//!   - wget http://foobar
//! # or
//! script: scripts/setup.sh
//! # or
//! scripts:
//!   - scripts/a.sh
//!   - scripts/b.sh
//! ```
//!
//! [`ProvisionerConfig`] is the typed form. Its custom `Deserialize` impl and
//! [`ProvisionerConfig::new`] both reject blocks that set zero or several of
//! the keys, and [`ProvisionerConfig::mode`] re-checks the same rule so a
//! config assembled field by field is never resolved in an ambiguous state.

use std::fmt;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use serde::de::{self, MapAccess, Visitor};
use strum::Display;
use tracing::{debug, warn};

use crate::error::RemoteExecError;
use crate::validation;

pub(crate) const NONE_SET: &str = "one of inline, script, or scripts must be set";
pub(crate) const MULTIPLE_SET: &str = "only one of inline, script, or scripts may be set";

/// The active script mode of a [`ProvisionerConfig`], borrowing its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ScriptMode<'a> {
    /// One script per inline command.
    Inline(&'a [String]),
    /// A single script file.
    Script(&'a Utf8Path),
    /// One script per listed file, in order.
    Scripts(&'a [Utf8PathBuf]),
}

/// Typed provisioner block.
///
/// Exactly one of the three fields must be populated. An empty `inline`
/// list, an empty `scripts` list and an empty `script` path all count as
/// unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionerConfig {
    /// Commands executed one script each, in order.
    pub inline: Vec<String>,
    /// Path to a single script file.
    pub script: Option<Utf8PathBuf>,
    /// Paths to script files, executed in order.
    pub scripts: Vec<Utf8PathBuf>,
}

impl ProvisionerConfig {
    /// Builds a config, rejecting zero or multiple active modes.
    pub fn new(
        inline: Vec<String>,
        script: Option<Utf8PathBuf>,
        scripts: Vec<Utf8PathBuf>,
    ) -> Result<Self, RemoteExecError> {
        let config = Self {
            inline,
            script,
            scripts,
        };
        config.mode()?;
        Ok(config)
    }

    /// Creates an inline-mode config.
    pub fn inline<I, S>(commands: I) -> Result<Self, RemoteExecError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(commands.into_iter().map(Into::into).collect(), None, Vec::new())
    }

    /// Creates a single-script config.
    pub fn script(path: impl Into<Utf8PathBuf>) -> Result<Self, RemoteExecError> {
        Self::new(Vec::new(), Some(path.into()), Vec::new())
    }

    /// Creates a multi-script config.
    pub fn scripts<I, P>(paths: I) -> Result<Self, RemoteExecError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        Self::new(Vec::new(), None, paths.into_iter().map(Into::into).collect())
    }

    /// Determines the active mode.
    ///
    /// Fails with [`RemoteExecError::Config`] when no mode or more than one
    /// mode is populated.
    pub fn mode(&self) -> Result<ScriptMode<'_>, RemoteExecError> {
        let script = self.script.as_deref().filter(|p| !p.as_str().is_empty());
        match (!self.inline.is_empty(), script, !self.scripts.is_empty()) {
            (true, None, false) => Ok(ScriptMode::Inline(&self.inline)),
            (false, Some(path), false) => Ok(ScriptMode::Script(path)),
            (false, None, true) => Ok(ScriptMode::Scripts(&self.scripts)),
            (false, None, false) => Err(RemoteExecError::Config(NONE_SET.to_string())),
            _ => Err(RemoteExecError::Config(MULTIPLE_SET.to_string())),
        }
    }
}

/// `inline` accepts a single command as shorthand for a one-element list.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Vec<String> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(command) if command.is_empty() => Vec::new(),
            OneOrMany::One(command) => vec![command],
            OneOrMany::Many(commands) => commands,
        }
    }
}

impl<'de> Deserialize<'de> for ProvisionerConfig {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(field_identifier, rename_all = "lowercase")]
        enum Field {
            Inline,
            Script,
            Scripts,
        }

        struct ProvisionerConfigVisitor;

        impl<'de> Visitor<'de> for ProvisionerConfigVisitor {
            type Value = ProvisionerConfig;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a provisioner block with one of 'inline', 'script' or 'scripts'")
            }

            fn visit_map<V>(self, mut map: V) -> std::result::Result<ProvisionerConfig, V::Error>
            where
                V: MapAccess<'de>,
            {
                let mut inline: Option<Option<OneOrMany>> = None;
                let mut script: Option<Option<Utf8PathBuf>> = None;
                let mut scripts: Option<Option<Vec<Utf8PathBuf>>> = None;

                while let Some(key) = map.next_key()? {
                    match key {
                        Field::Inline => {
                            if inline.is_some() {
                                return Err(de::Error::duplicate_field("inline"));
                            }
                            inline = Some(map.next_value()?);
                        }
                        Field::Script => {
                            if script.is_some() {
                                return Err(de::Error::duplicate_field("script"));
                            }
                            script = Some(map.next_value()?);
                        }
                        Field::Scripts => {
                            if scripts.is_some() {
                                return Err(de::Error::duplicate_field("scripts"));
                            }
                            scripts = Some(map.next_value()?);
                        }
                    }
                }

                ProvisionerConfig::new(
                    inline.flatten().map(Vec::from).unwrap_or_default(),
                    script.flatten(),
                    scripts.flatten().unwrap_or_default(),
                )
                .map_err(|e| match e {
                    RemoteExecError::Config(msg) => de::Error::custom(msg),
                    other => de::Error::custom(other),
                })
            }
        }

        deserializer.deserialize_struct(
            "ProvisionerConfig",
            validation::RECOGNIZED_KEYS,
            ProvisionerConfigVisitor,
        )
    }
}

/// Parses a provisioner block from YAML text.
///
/// The raw document is checked by [`validation::validate`] first so that
/// every problem is reported at once; only a clean document is deserialized.
pub fn parse_config(yaml: &str) -> Result<ProvisionerConfig, RemoteExecError> {
    let raw: serde_yaml::Value = serde_yaml::from_str(yaml)
        .map_err(|e| RemoteExecError::Config(format!("YAML parse error: {}", e)))?;

    let report = validation::validate(&raw, validation::RECOGNIZED_KEYS);
    for warning in &report.warnings {
        warn!("{}", warning);
    }
    report.into_result()?;

    let config: ProvisionerConfig = serde_yaml::from_value(raw)
        .map_err(|e| RemoteExecError::Config(format!("invalid provisioner block: {}", e)))?;
    debug!("parsed provisioner block: {:?}", config);
    Ok(config)
}

/// Loads a provisioner block from a YAML file.
pub fn load_config(path: &Utf8Path) -> Result<ProvisionerConfig, RemoteExecError> {
    let yaml = fs::read_to_string(path).map_err(|e| RemoteExecError::io(path.as_str(), e))?;
    parse_config(&yaml).map_err(|e| match e {
        RemoteExecError::Config(msg) => RemoteExecError::Config(format!("{}: {}", path, msg)),
        other => other,
    })
}
