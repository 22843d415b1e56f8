//! Small shared vocabulary: field kinds, env name case modes, file formats and
//! file search locations.

use std::fmt;
use std::path::{Path, PathBuf};

/// The coercion category of a field, fixed by its static type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Integer,
    Float,
    Text,
    /// A `,`-separated sequence of scalar elements.
    Sequence,
    /// A nested record, expanded by the walker rather than coerced.
    Record,
    /// Introspectable, but no coercion rule applies (maps, for instance).
    Unsupported,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Bool => "boolean",
            Kind::Integer => "integer",
            Kind::Float => "floating-point",
            Kind::Text => "text",
            Kind::Sequence => "sequence",
            Kind::Record => "record",
            Kind::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

/// How synthesized environment variable names treat each name segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseMode {
    /// Uppercase the segment as-is: `ServerPort` → `SERVERPORT`.
    #[default]
    Verbatim,
    /// Split mixed-case words with `_` first: `ServerPort` → `SERVER_PORT`.
    Snake,
}

/// Serialized document formats understood by [`FileLoader`](crate::FileLoader).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Toml,
}

impl Format {
    /// Infer the format from a file extension (`json`, `yaml`/`yml`, `toml`).
    pub fn from_path(path: &Path) -> Option<Format> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Json => "JSON",
            Format::Yaml => "YAML",
            Format::Toml => "TOML",
        })
    }
}

/// Where to look for a config file.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPath {
    /// Platform config directory for an application name (XDG on Linux,
    /// `~/Library/Application Support` on macOS).
    Platform(String),
    /// A subdirectory under the user's home directory, e.g. `Home(".myapp")`.
    Home(String),
    /// Current working directory.
    Cwd,
    /// An explicit directory.
    Path(PathBuf),
}
