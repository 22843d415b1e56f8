//! Field operations by dotted path: listing, lookup and assignment.
//!
//! Provides the logic behind a `config list|get|set` style interface and the
//! [`Report`] enum that callers use to display results.

use std::fmt;

use crate::error::TagfigError;
use crate::field::{Field, Record};
use crate::types::Kind;
use crate::walk::walk;

/// Placeholder for fields with nothing to render (an unset `Option`).
pub const NOT_SET: &str = "<not set>";

/// Placeholder for fields whose kind has no text form.
pub const UNSUPPORTED: &str = "<unsupported>";

/// Result of a field operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// A field's current value and its tags.
    KeyValue {
        key: String,
        value: String,
        tags: Vec<(String, String)>,
    },
    /// Confirmation that a value was assigned.
    ValueSet { key: String, value: String },
    /// Every walked field with its rendered value.
    Listing { entries: Vec<(String, String)> },
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::KeyValue { key, value, tags } => {
                if !tags.is_empty() {
                    let rendered: Vec<String> = tags
                        .iter()
                        .map(|(ns, v)| {
                            if v.is_empty() {
                                ns.clone()
                            } else {
                                format!("{ns}={v:?}")
                            }
                        })
                        .collect();
                    writeln!(f, "# {}", rendered.join(" "))?;
                }
                write!(f, "{key} = {value}")
            }
            Report::ValueSet { key, value } => write!(f, "Set {key} = {value}"),
            Report::Listing { entries } => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                Ok(())
            }
        }
    }
}

fn display_value(field: &Field<'_>) -> String {
    if field.kind() == Kind::Unsupported {
        return UNSUPPORTED.to_string();
    }
    field.to_text().unwrap_or_else(|| NOT_SET.to_string())
}

/// List every walked field as a `(dotted path, rendered value)` pair.
pub fn list_values(record: &mut dyn Record) -> Report {
    let entries = walk(record)
        .map(|field| (field.path(), display_value(&field)))
        .collect();
    Report::Listing { entries }
}

/// Find the field at `key`, or explain why there is none.
fn find<'a>(record: &'a mut dyn Record, key: &str) -> Result<Field<'a>, TagfigError> {
    let mut is_record = false;
    let nested_prefix = format!("{key}.");
    for field in walk(record) {
        let path = field.path();
        if path == key {
            return Ok(field);
        }
        if path.starts_with(&nested_prefix) {
            is_record = true;
        }
    }

    let reason = if is_record {
        "a nested record has no single value"
    } else {
        "no such field"
    };
    Err(TagfigError::InvalidTarget {
        field: key.to_string(),
        reason: reason.into(),
    })
}

/// Get a field's rendered value and tags by dotted path.
pub fn get_value(record: &mut dyn Record, key: &str) -> Result<Report, TagfigError> {
    let field = find(record, key)?;
    Ok(Report::KeyValue {
        key: key.to_string(),
        value: display_value(&field),
        tags: field
            .tags()
            .iter()
            .map(|(ns, v)| (ns.to_string(), v.to_string()))
            .collect(),
    })
}

/// Coerce `raw` into the field at `key`.
pub fn set_value(record: &mut dyn Record, key: &str, raw: &str) -> Result<Report, TagfigError> {
    let mut field = find(record, key)?;
    field.set(raw)?;
    Ok(Report::ValueSet {
        key: key.to_string(),
        value: display_value(&field),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{Server, populated_server};

    #[test]
    fn list_renders_every_leaf() {
        let mut server = populated_server();
        let Report::Listing { entries } = list_values(&mut server) else {
            panic!("Expected Listing");
        };
        assert_eq!(entries.len(), 13);
        assert!(entries.contains(&("port".into(), "6060".into())));
        assert!(entries.contains(&("users".into(), "ankara,istanbul".into())));
        assert!(entries.contains(&("postgres.availability_ratio".into(), "8.23".into())));
        assert!(entries.contains(&("postgres.options".into(), UNSUPPORTED.into())));
        assert!(entries.contains(&("interval".into(), "10s".into())));
    }

    #[test]
    fn list_marks_unset_optionals() {
        #[derive(crate::Record, Default)]
        struct Optional {
            pub url: Option<String>,
            pub retries: Option<u8>,
        }

        let mut optional = Optional {
            retries: Some(3),
            ..Optional::default()
        };
        let listing = list_values(&mut optional);
        assert_eq!(listing.to_string(), "url = <not set>\nretries = 3");
    }

    #[test]
    fn get_returns_value_and_tags() {
        let mut server = populated_server();
        let report = get_value(&mut server, "postgres.port").unwrap();
        assert_eq!(
            report,
            Report::KeyValue {
                key: "postgres.port".into(),
                value: "5432".into(),
                tags: vec![
                    ("required".into(), "true".into()),
                    ("customRequired".into(), "yes".into()),
                ],
            }
        );
        assert_eq!(
            report.to_string(),
            "# required=\"true\" customRequired=\"yes\"\npostgres.port = 5432"
        );
    }

    #[test]
    fn get_unknown_key_is_invalid_target() {
        let mut server = Server::default();
        let err = get_value(&mut server, "nope").unwrap_err();
        assert!(matches!(
            err,
            TagfigError::InvalidTarget { ref field, ref reason } if field == "nope" && reason == "no such field"
        ));
    }

    #[test]
    fn get_record_path_is_invalid_target() {
        let mut server = Server::default();
        let err = get_value(&mut server, "postgres").unwrap_err();
        assert!(matches!(
            err,
            TagfigError::InvalidTarget { ref reason, .. } if reason.contains("nested record")
        ));
    }

    #[test]
    fn set_assigns_by_path() {
        let mut server = Server::default();
        let report = set_value(&mut server, "postgres.hosts", "a,b").unwrap();
        assert_eq!(report.to_string(), "Set postgres.hosts = a,b");
        assert_eq!(server.postgres.hosts, vec!["a", "b"]);
    }

    #[test]
    fn set_bad_value_keeps_field() {
        let mut server = populated_server();
        let err = set_value(&mut server, "port", "http").unwrap_err();
        assert!(matches!(err, TagfigError::TypeMismatch { .. }));
        assert_eq!(server.port, 6060);
    }
}
