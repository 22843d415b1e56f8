//! Load a serialized document (JSON, YAML or TOML) into a record.
//!
//! # Sources
//!
//! - [`FileLoader::path`] reads one file. A missing or unreadable file is a
//!   [`SourceUnavailable`](TagfigError::SourceUnavailable) error.
//! - [`FileLoader::search`] looks for `{dir}/{file_name}` across a list of
//!   [`SearchPath`]s in priority-ascending order (last = highest) and uses only
//!   the highest-priority file found. Finding nothing is not an error.
//! - [`FileLoader::reader`] drains an already-open stream on its first load.
//!
//! # Merging
//!
//! The record's current state is serialized, the document is deep-merged on
//! top of it, and the result is deserialized into a scratch copy. Once the
//! whole document has been accepted, the walked fields whose value the
//! document changed are moved into the record; nothing else is touched. A
//! parse or type error leaves the record as it was.
//!
//! Fields the walker never visits (private, `#[field(skip)]`) are out of
//! reach of documents, as are fields serde skips.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::{Deserialize, DeserializeOwned};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::builder::Loader;
use crate::error::TagfigError;
use crate::field::Record;
use crate::merge::deep_merge;
use crate::types::{Format, SearchPath};
use crate::validate::deserialize_strict;
use crate::walk::walk;

enum Source {
    Path(PathBuf),
    Search {
        file_name: String,
        search_paths: Vec<SearchPath>,
    },
    Reader(Option<Box<dyn Read>>),
}

/// A file-backed loader. Build one with [`path`](FileLoader::path),
/// [`search`](FileLoader::search) or [`reader`](FileLoader::reader).
pub struct FileLoader {
    source: Source,
    format: Option<Format>,
    strict: bool,
}

impl fmt::Debug for FileLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match &self.source {
            Source::Path(path) => path.display().to_string(),
            Source::Search { file_name, .. } => format!("search for {file_name}"),
            Source::Reader(_) => "reader".to_string(),
        };
        f.debug_struct("FileLoader")
            .field("source", &source)
            .field("format", &self.format)
            .field("strict", &self.strict)
            .finish()
    }
}

impl FileLoader {
    /// Load the file at `path`. The format comes from the extension unless set
    /// with [`format`](FileLoader::format).
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::Path(path.into()),
            format: None,
            strict: false,
        }
    }

    /// Search `search_paths` for `file_name` and load the highest-priority hit.
    pub fn search(file_name: impl Into<String>, search_paths: Vec<SearchPath>) -> Self {
        Self {
            source: Source::Search {
                file_name: file_name.into(),
                search_paths,
            },
            format: None,
            strict: false,
        }
    }

    /// Load a `format` document from `reader`. The stream is read once; later
    /// loads through the same loader do nothing.
    pub fn reader(format: Format, reader: impl Read + 'static) -> Self {
        Self {
            source: Source::Reader(Some(Box::new(reader))),
            format: Some(format),
            strict: false,
        }
    }

    /// Override the format inferred from the file extension.
    pub fn format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Reject documents carrying keys the record does not declare.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn apply<R>(&mut self, record: &mut R) -> Result<(), TagfigError>
    where
        R: Record + Serialize + DeserializeOwned,
    {
        let Some((origin, format, content)) = self.read_source()? else {
            return Ok(());
        };

        let overlay = parse_document(&content, format, &origin)?;
        let base = serialize_base(&*record, &origin)?;
        let merged = Value::Object(deep_merge(base.clone(), overlay));

        let mut loaded: R = if self.strict {
            deserialize_strict(merged, &origin)?
        } else {
            deserialize_lenient(merged, &origin)?
        };
        // The current state after the same round trip, without the document.
        let mut unchanged: R = deserialize_lenient(Value::Object(base), &origin)?;

        let changed = adopt_changes(record, &mut loaded, &mut unchanged);
        info!(
            event = "tagfig.file.loaded",
            origin = %origin,
            format = %format,
            changed = changed,
        );
        Ok(())
    }

    /// Resolve the configured source to `(origin, format, content)`, or `None`
    /// when there is nothing to load.
    fn read_source(&mut self) -> Result<Option<(String, Format, String)>, TagfigError> {
        match &mut self.source {
            Source::Path(path) => {
                let origin = path.display().to_string();
                let format = resolve_format(self.format, path)?;
                let content =
                    std::fs::read_to_string(&*path).map_err(|e| TagfigError::SourceUnavailable {
                        origin: origin.clone(),
                        source: e,
                    })?;
                Ok(Some((origin, format, content)))
            }
            Source::Search {
                file_name,
                search_paths,
            } => {
                let dirs = expand_search_paths(search_paths);
                let Some((path, content)) = load_first_match(&dirs, file_name)? else {
                    debug!(event = "tagfig.file.not_found", file_name = %file_name);
                    return Ok(None);
                };
                let format = resolve_format(self.format, &path)?;
                Ok(Some((path.display().to_string(), format, content)))
            }
            Source::Reader(reader) => {
                let Some(mut reader) = reader.take() else {
                    debug!(event = "tagfig.file.reader_drained");
                    return Ok(None);
                };
                let origin = "reader".to_string();
                let mut content = String::new();
                reader
                    .read_to_string(&mut content)
                    .map_err(|e| TagfigError::SourceUnavailable {
                        origin: origin.clone(),
                        source: e,
                    })?;
                // Reader sources always carry a format.
                let format = self.format.unwrap_or(Format::Json);
                Ok(Some((origin, format, content)))
            }
        }
    }
}

impl<R> Loader<R> for FileLoader
where
    R: Record + Serialize + DeserializeOwned,
{
    fn load(&mut self, record: &mut R) -> Result<(), TagfigError> {
        self.apply(record)
    }
}

/// Serialize the record as the merge base. Nulls are dropped so values JSON
/// cannot carry (`None`, NaN, infinities) fall back to serde defaults instead
/// of failing to deserialize.
fn serialize_base<R: Serialize>(record: &R, origin: &str) -> Result<Map<String, Value>, TagfigError> {
    let parse_error = |reason: String| TagfigError::ParseError {
        origin: origin.to_string(),
        reason,
    };
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => Ok(strip_nulls(map)),
        Ok(_) => Err(parse_error("record does not serialize to a mapping".into())),
        Err(e) => Err(parse_error(e.to_string())),
    }
}

fn strip_nulls(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::Object(inner) => Some((key, Value::Object(strip_nulls(inner)))),
            other => Some((key, other)),
        })
        .collect()
}

fn deserialize_lenient<R: DeserializeOwned>(value: Value, origin: &str) -> Result<R, TagfigError> {
    R::deserialize(value).map_err(|e| TagfigError::ParseError {
        origin: origin.to_string(),
        reason: e.to_string(),
    })
}

/// Move every walked leaf where `loaded` differs from `unchanged` into
/// `record`. Returns the number of fields moved.
fn adopt_changes(
    record: &mut dyn Record,
    loaded: &mut dyn Record,
    unchanged: &mut dyn Record,
) -> usize {
    let mut changed = 0;
    for ((mut target, mut source), before) in walk(record).zip(walk(loaded)).zip(walk(unchanged)) {
        if source.same_value(&before) {
            continue;
        }
        if target.swap_value(&mut source) {
            debug!(event = "tagfig.file.field_set", field = %target.path());
            changed += 1;
        }
    }
    changed
}

fn resolve_format(explicit: Option<Format>, path: &Path) -> Result<Format, TagfigError> {
    explicit
        .or_else(|| Format::from_path(path))
        .ok_or_else(|| TagfigError::ParseError {
            origin: path.display().to_string(),
            reason: "cannot infer the format from the file extension".into(),
        })
}

/// Parse a document into a JSON object tree. An empty document is an empty
/// mapping; any other non-mapping root is rejected.
fn parse_document(
    content: &str,
    format: Format,
    origin: &str,
) -> Result<Map<String, Value>, TagfigError> {
    let parse_error = |reason: String| TagfigError::ParseError {
        origin: origin.to_string(),
        reason,
    };

    let value: Value = match format {
        Format::Json if content.trim().is_empty() => Value::Null,
        Format::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?,
        Format::Yaml => {
            let de = serde_yaml::Deserializer::from_str(content);
            match Value::deserialize(de) {
                Ok(value) => value,
                Err(e) if content.trim().is_empty() => {
                    debug!(event = "tagfig.file.empty_document", reason = %e);
                    Value::Null
                }
                Err(e) => return Err(parse_error(e.to_string())),
            }
        }
        Format::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string()))?,
    };

    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(parse_error(format!(
            "expected a mapping at the document root, found {}",
            value_kind(&other)
        ))),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

/// Resolve a [`SearchPath`] to a concrete directory.
///
/// Returns `None` if the path cannot be resolved (e.g. no home directory found).
pub fn resolve_search_path(sp: &SearchPath) -> Option<PathBuf> {
    match sp {
        SearchPath::Platform(app_name) => {
            let proj = directories::ProjectDirs::from("", "", app_name)?;
            Some(proj.config_dir().to_path_buf())
        }
        SearchPath::Home(subdir) => {
            let user = directories::UserDirs::new()?;
            Some(user.home_dir().join(subdir))
        }
        SearchPath::Cwd => std::env::current_dir().ok(),
        SearchPath::Path(p) => Some(p.clone()),
    }
}

/// Resolve every search path, dropping the ones that cannot be resolved.
pub fn expand_search_paths(search_paths: &[SearchPath]) -> Vec<PathBuf> {
    search_paths.iter().filter_map(resolve_search_path).collect()
}

/// Load only the highest-priority file found.
///
/// Searches from the end of the directory list (highest priority) backward.
/// Missing files are skipped; other I/O errors are propagated.
fn load_first_match(
    dirs: &[PathBuf],
    file_name: &str,
) -> Result<Option<(PathBuf, String)>, TagfigError> {
    for dir in dirs.iter().rev() {
        let file_path = dir.join(file_name);
        match std::fs::read_to_string(&file_path) {
            Ok(content) => return Ok(Some((file_path, content))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => {
                return Err(TagfigError::SourceUnavailable {
                    origin: file_path.display().to_string(),
                    source: e,
                });
            }
        }
    }
    Ok(None)
}
