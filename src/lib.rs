//! Tag-driven configuration loading for Rust structs.
//!
//! Annotate a struct's fields with tags, then let loaders fill them in from
//! defaults, files, environment variables and command-line flags, and let
//! validators check the result.
//!
//! ```ignore
//! use tagfig::{Record, Tagfig};
//!
//! #[derive(Record, Default, serde::Serialize, serde::Deserialize)]
//! #[serde(default)]
//! pub struct Server {
//!     #[tag(required = "true")]
//!     pub name: String,
//!
//!     #[tag(default = "6060", env)]
//!     pub port: u16,
//!
//!     #[field(nested)]
//!     pub postgres: Postgres,
//! }
//!
//! let server: Server = Tagfig::standard("config.yaml", "APP").load_default()?;
//! ```
//!
//! That pipeline fills zero fields from `default` tags, merges `config.yaml`
//! over them, applies `APP_PORT` style environment variables and finally
//! fails if a `required` field is still zero.
//!
//! # Design: tags on the struct
//!
//! The struct is the schema. `#[derive(Record)]` gives every `pub` field a
//! [`Field`] accessor carrying its name, kind, tags and a mutable handle on
//! the value. [`walk()`] flattens a record depth-first, expanding
//! `#[field(nested)]` records in place, so every consumer sees the same
//! ordered list of leaf fields with dotted paths (`postgres.port`).
//!
//! Tags are plain `namespace = "value"` pairs. Each loader or validator reads
//! one namespace and ignores the rest, so new consumers never need changes to
//! the derive:
//!
//! | Tag | Read by | Meaning |
//! |-----|---------|---------|
//! | `default = "v"` | [`DefaultLoader`] | value for a zero field |
//! | `env` / `env = "NAME"` | [`EnvLoader`] | variable to read |
//! | `required = "true"` | [`RequiredValidator`] | must be non-zero |
//! | `flag = "name"` / `usage = "..."` | `FlagLoader` | command-line option |
//!
//! # Zero means unset
//!
//! Every field type has a zero value: `0`, `""`, `false`, an empty `Vec`,
//! `None`, or a nested record whose fields are all zero. Defaults only fill
//! zero fields, and the required validator only accepts non-zero ones. A
//! field that may legitimately be zero should not be `required`; make it an
//! `Option<T>` instead when "unset" has to be told apart.
//!
//! # Coercion
//!
//! Loaders that deal in text go through [`Field::set`], which parses with the
//! field's [`Coerce`] rule: the usual boolean tokens, base-10 numbers,
//! verbatim text, `,`-separated sequences, and any type implementing
//! [`TextCodec`]. A failed coercion leaves the field untouched.
//!
//! # Layer precedence
//!
//! Loaders run in registration order and every later loader wins where it
//! supplies a value, except [`DefaultLoader`], which never overwrites a
//! non-zero field. Validators run after the last loader. The first error
//! stops the pipeline and is returned; deciding whether to exit the process
//! is left to the caller.
//!
//! # Logging
//!
//! Loaders emit `tracing` events (`tagfig.env.field_set`,
//! `tagfig.file.loaded`, ...). Install a subscriber to see them.

extern crate self as tagfig;

pub mod error;
pub mod naming;
pub mod ops;
pub mod types;

mod builder;
mod coerce;
mod defaults;
mod duration;
mod env;
mod field;
mod file;
#[cfg(feature = "clap")]
mod flag;
pub(crate) mod merge;
mod validate;
mod walk;

#[cfg(test)]
mod fixtures;

pub use builder::{Loader, Tagfig, TagfigBuilder, Validator};
pub use coerce::{Coerce, Element, SEQUENCE_DELIMITER, TextCodec, parse_bool};
pub use defaults::{DEFAULT_TAG, DefaultLoader};
pub use duration::{format_duration, parse_duration};
pub use env::{ENV_TAG, EnvLoader};
pub use error::{CoerceError, TagfigError};
pub use field::{Field, Record, Tags};
pub use file::FileLoader;
#[cfg(feature = "clap")]
pub use flag::{FLAG_EXCLUDED, FLAG_TAG, FlagLoader, USAGE_TAG};
pub use tagfig_derive::Record;
pub use types::{CaseMode, Format, Kind, SearchPath};
pub use validate::{REQUIRED_SENTINEL, REQUIRED_TAG, RequiredValidator};
pub use walk::{Walk, walk};
