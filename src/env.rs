//! Load fields from environment variables named by their `env` tag.
//!
//! A field opts in with an `env` tag. An explicit value (`env = "DB_HOST"`)
//! names the variable verbatim. A bare tag synthesizes the name from the
//! loader prefix, the enclosing record names and the field name:
//!
//! | Field path | Prefix | Case | Variable |
//! |------------|--------|------|----------|
//! | `ServerPort` | | `Verbatim` | `SERVERPORT` |
//! | `ServerPort` | | `Snake` | `SERVER_PORT` |
//! | `MySql.Enabled` | `app` | `Snake` | `APP_MY_SQL_ENABLED` |
//!
//! Only non-empty values are applied, and they overwrite whatever the field
//! held before.

use std::collections::HashMap;
use std::ffi::OsString;

use tracing::debug;

use crate::builder::Loader;
use crate::error::TagfigError;
use crate::field::Record;
use crate::naming::env_name;
use crate::types::CaseMode;
use crate::walk::walk;

/// Tag namespace read by [`EnvLoader`] unless configured otherwise.
pub const ENV_TAG: &str = "env";

#[derive(Debug, Clone, Default)]
pub struct EnvLoader {
    prefix: String,
    case: CaseMode,
    tag: Option<String>,
    vars: Option<HashMap<String, String>>,
}

impl EnvLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend `{PREFIX}_` to every synthesized variable name.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn case(mut self, case: CaseMode) -> Self {
        self.case = case;
        self
    }

    /// Read variable names from a different tag namespace.
    pub fn tag(mut self, namespace: impl Into<String>) -> Self {
        self.tag = Some(namespace.into());
        self
    }

    /// Look variables up in a fixed set instead of the process environment.
    ///
    /// Takes an iterator so tests can pass synthetic data instead of
    /// `std::env::vars()`.
    pub fn vars(mut self, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        self.vars = Some(vars.into_iter().collect());
        self
    }

    /// The variable a field with the given tag value and position reads.
    pub fn variable_name(&self, tag_value: &str, segments: &[&str], name: &str) -> String {
        if tag_value.is_empty() {
            env_name(&self.prefix, segments, name, self.case)
        } else {
            tag_value.to_string()
        }
    }

    pub fn apply(&self, record: &mut dyn Record) -> Result<(), TagfigError> {
        let namespace = self.tag.as_deref().unwrap_or(ENV_TAG);
        let snapshot;
        let vars = match &self.vars {
            Some(vars) => vars,
            None => {
                snapshot = process_vars();
                &snapshot
            }
        };

        for mut field in walk(record) {
            let Some(tag_value) = field.tag(namespace) else {
                continue;
            };
            let variable = self.variable_name(tag_value, field.segments(), field.name());
            let Some(value) = vars.get(&variable).filter(|v| !v.is_empty()) else {
                continue;
            };
            field.set(value)?;
            debug!(
                event = "tagfig.env.field_set",
                field = %field.path(),
                variable = %variable,
            );
        }
        Ok(())
    }
}

/// Snapshot the process environment, dropping entries that are not valid UTF-8.
fn process_vars() -> HashMap<String, String> {
    utf8_vars(std::env::vars_os())
}

fn utf8_vars(vars: impl IntoIterator<Item = (OsString, OsString)>) -> HashMap<String, String> {
    vars.into_iter()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                let key = match key {
                    Ok(key) => key,
                    Err(raw) => raw.to_string_lossy().into_owned(),
                };
                debug!(event = "tagfig.env.non_utf8_skipped", key = %key);
                None
            }
        })
        .collect()
}

impl<R: Record> Loader<R> for EnvLoader {
    fn load(&mut self, record: &mut R) -> Result<(), TagfigError> {
        self.apply(record)
    }
}
