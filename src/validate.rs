//! Post-load validation.
//!
//! [`RequiredValidator`] rejects records whose `required` fields are still
//! zero. [`deserialize_strict`] is the unknown-key check used by strict file
//! loading: it deserializes through `serde_ignored` and collects every key the
//! target type does not consume.

use serde::de::{Deserialize, Deserializer};
use tracing::warn;

use crate::builder::Validator;
use crate::error::TagfigError;
use crate::field::Record;
use crate::walk::walk;

/// Tag namespace read by [`RequiredValidator`] unless configured otherwise.
pub const REQUIRED_TAG: &str = "required";

/// Tag value that marks a field as required unless configured otherwise.
pub const REQUIRED_SENTINEL: &str = "true";

/// Fails on the first field whose `required` tag equals the sentinel while its
/// value is still zero.
///
/// A required field cannot legitimately hold its zero value (`0`, `""`,
/// `false`): zero means "never set". Leave the tag off such fields.
#[derive(Debug, Clone)]
pub struct RequiredValidator {
    tag: String,
    sentinel: String,
}

impl Default for RequiredValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl RequiredValidator {
    pub fn new() -> Self {
        Self {
            tag: REQUIRED_TAG.to_string(),
            sentinel: REQUIRED_SENTINEL.to_string(),
        }
    }

    pub fn tag(mut self, namespace: impl Into<String>) -> Self {
        self.tag = namespace.into();
        self
    }

    pub fn sentinel(mut self, value: impl Into<String>) -> Self {
        self.sentinel = value.into();
        self
    }

    pub fn check(&self, record: &mut dyn Record) -> Result<(), TagfigError> {
        for field in walk(record) {
            if field.tag(&self.tag) != Some(self.sentinel.as_str()) {
                continue;
            }
            if field.is_zero() {
                let path = field.path();
                warn!(event = "tagfig.required.missing", field = %path);
                return Err(TagfigError::MissingRequiredField { path });
            }
        }
        Ok(())
    }
}

impl<R: Record> Validator<R> for RequiredValidator {
    fn validate(&self, record: &mut R) -> Result<(), TagfigError> {
        self.check(record)
    }
}

/// Deserialize `T`, failing with [`UnknownKeys`](TagfigError::UnknownKeys) if
/// the input carries keys `T` ignores. Keys are reported as dotted paths.
pub fn deserialize_strict<'de, D, T>(deserializer: D, origin: &str) -> Result<T, TagfigError>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let mut unknown_keys: Vec<String> = Vec::new();

    let value: T = serde_ignored::deserialize(deserializer, |ignored_path| {
        unknown_keys.push(ignored_path.to_string());
    })
    .map_err(|e| TagfigError::ParseError {
        origin: origin.to_string(),
        reason: e.to_string(),
    })?;

    if unknown_keys.is_empty() {
        return Ok(value);
    }

    Err(TagfigError::UnknownKeys {
        origin: origin.to_string(),
        keys: unknown_keys,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{Deep, MySql, Server, populated_server};

    #[test]
    fn populated_record_passes() {
        let mut server = populated_server();
        RequiredValidator::new().check(&mut server).unwrap();
    }

    #[test]
    fn zero_required_field_fails_with_path() {
        let mut server = populated_server();
        server.postgres.hosts.clear();
        let err = RequiredValidator::new().check(&mut server).unwrap_err();
        assert!(matches!(
            err,
            TagfigError::MissingRequiredField { ref path } if path == "postgres.hosts"
        ));
    }

    #[test]
    fn first_violation_wins() {
        let mut server = Server::default();
        let err = RequiredValidator::new().check(&mut server).unwrap_err();
        assert!(matches!(
            err,
            TagfigError::MissingRequiredField { ref path } if path == "name"
        ));
    }

    #[test]
    fn deep_path_is_dotted_from_root() {
        let mut deep = Deep::default();
        let err = RequiredValidator::new().check(&mut deep).unwrap_err();
        assert!(matches!(
            err,
            TagfigError::MissingRequiredField { ref path } if path == "A.B.C"
        ));

        deep.a.b.c = "set".into();
        RequiredValidator::new().check(&mut deep).unwrap();
    }

    #[test]
    fn custom_tag_and_sentinel() {
        let validator = RequiredValidator::new().tag("customRequired").sentinel("yes");

        let mut mysql = MySql::default();
        let err = validator.check(&mut mysql).unwrap_err();
        assert!(matches!(
            err,
            TagfigError::MissingRequiredField { ref path } if path == "Port"
        ));

        // `hosts` is only required under the default tag.
        mysql.port = 3306;
        validator.check(&mut mysql).unwrap();
    }

    #[test]
    fn other_tag_values_are_not_required() {
        #[derive(crate::Record, Default)]
        struct Loose {
            #[tag(required = "false")]
            pub a: String,
            #[tag(required)]
            pub b: String,
        }

        let mut loose = Loose::default();
        RequiredValidator::new().check(&mut loose).unwrap();
    }

    #[test]
    fn legitimate_zero_is_indistinguishable_from_unset() {
        let mut server = populated_server();
        server.postgres.port = 0;
        assert!(RequiredValidator::new().check(&mut server).is_err());
    }

    // -- strict deserialization ----------------------------------------------

    #[test]
    fn strict_accepts_known_keys() {
        let value = serde_json::json!({ "name": "koding", "postgres": { "port": 5432 } });
        let server: Server = deserialize_strict(value, "test").unwrap();
        assert_eq!(server.name, "koding");
        assert_eq!(server.postgres.port, 5432);
    }

    #[test]
    fn strict_reports_nested_unknown_keys() {
        let value = serde_json::json!({
            "name": "koding",
            "typo_key": 1,
            "postgres": { "nope": true }
        });
        let err = deserialize_strict::<_, Server>(value, "config.json").unwrap_err();
        match err {
            TagfigError::UnknownKeys { origin, keys } => {
                assert_eq!(origin, "config.json");
                assert!(keys.contains(&"typo_key".to_string()));
                assert!(keys.contains(&"postgres.nope".to_string()));
            }
            other => panic!("Expected UnknownKeys, got {other:?}"),
        }
    }

    #[test]
    fn strict_surfaces_type_errors_as_parse_errors() {
        let value = serde_json::json!({ "port": "not a number" });
        let err = deserialize_strict::<_, Server>(value, "inline").unwrap_err();
        assert!(matches!(err, TagfigError::ParseError { ref origin, .. } if origin == "inline"));
    }
}
