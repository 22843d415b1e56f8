//! Command-line loader.
//!
//! Compiled only with the `clap` Cargo feature (on by default). Every walked
//! leaf field becomes a `--long` option on a generated [`clap::Command`]:
//!
//! - `#[tag(flag = "db")]` names the option `--db`; without the tag the name
//!   is the kebab-cased path (`postgres.db_name` → `--postgres-db-name`).
//! - `#[tag(flag = "-")]` keeps the field off the command line.
//! - `#[tag(usage = "...")]` becomes the option's help text.
//!
//! Boolean options may be given bare (`--enabled`) or with a value
//! (`--enabled=false`). Values go through the same coercion as every other
//! loader, so `--labels 1,2,3` fills a `Vec<i32>`.

use std::collections::HashSet;
use std::ffi::OsString;

use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::debug;

use crate::builder::Loader;
use crate::error::TagfigError;
use crate::field::{Field, Record};
use crate::naming::flag_name;
use crate::types::Kind;
use crate::walk::walk;

/// Tag namespace naming a field's option.
pub const FLAG_TAG: &str = "flag";

/// Tag namespace holding a field's help text.
pub const USAGE_TAG: &str = "usage";

/// Tag value that excludes a field from the command line.
pub const FLAG_EXCLUDED: &str = "-";

#[derive(Debug, Clone)]
pub struct FlagLoader {
    name: String,
    args: Option<Vec<OsString>>,
}

impl Default for FlagLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl FlagLoader {
    /// Parse the process arguments.
    pub fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            args: None,
        }
    }

    /// Command name shown in usage and error messages.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Parse these arguments instead of the process arguments. The first item
    /// is the binary name, as with `std::env::args()`.
    pub fn args<I, T>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// The option name for a field, or `None` if it stays off the command line.
    fn option_name(field: &Field<'_>) -> Option<String> {
        if field.kind() == Kind::Unsupported {
            return None;
        }
        match field.tag(FLAG_TAG) {
            Some(FLAG_EXCLUDED) => None,
            Some(name) if !name.is_empty() => Some(name.to_string()),
            _ => Some(flag_name(field.segments(), field.name())),
        }
    }

    /// Build the command describing every option `record` accepts.
    pub fn command(&self, record: &mut dyn Record) -> Result<Command, TagfigError> {
        let mut command = Command::new(self.name.clone());
        let mut seen = HashSet::new();

        for field in walk(record) {
            let Some(long) = Self::option_name(&field) else {
                continue;
            };
            if !seen.insert(long.clone()) {
                return Err(TagfigError::InvalidTarget {
                    field: field.path(),
                    reason: format!("option --{long} is already taken by another field"),
                });
            }

            let mut arg = Arg::new(long.clone())
                .long(long)
                .value_name(field.kind().to_string().to_uppercase())
                .value_parser(clap::value_parser!(String))
                .action(ArgAction::Set);
            if let Some(usage) = field.tag(USAGE_TAG) {
                arg = arg.help(usage);
            }
            if field.kind() == Kind::Bool {
                arg = arg
                    .num_args(0..=1)
                    .require_equals(true)
                    .default_missing_value("true");
            }
            command = command.arg(arg);
        }

        Ok(command)
    }

    fn matches(&self, command: Command) -> Result<ArgMatches, TagfigError> {
        let result = match &self.args {
            Some(args) => command.try_get_matches_from(args.clone()),
            None => command.try_get_matches_from(std::env::args_os()),
        };
        result.map_err(|e| TagfigError::InvalidArguments(e.to_string()))
    }

    pub fn apply(&self, record: &mut dyn Record) -> Result<(), TagfigError> {
        let command = self.command(record)?;
        let matches = self.matches(command)?;

        for mut field in walk(record) {
            let Some(long) = Self::option_name(&field) else {
                continue;
            };
            let Some(value) = matches.get_one::<String>(&long) else {
                continue;
            };
            field.set(value)?;
            debug!(
                event = "tagfig.flag.field_set",
                field = %field.path(),
                option = %long,
            );
        }
        Ok(())
    }
}

impl<R: Record> Loader<R> for FlagLoader {
    fn load(&mut self, record: &mut R) -> Result<(), TagfigError> {
        self.apply(record)
    }
}
