//! The field accessor: a uniform handle on one struct field.
//!
//! A [`Record`] hands out its visible fields as [`Field`] values, each holding
//! a mutable borrow of the underlying slot. Leaf slots go through [`Coerce`];
//! nested records are opened with [`Field::into_fields`] (or expanded
//! automatically by [`walk`](crate::walk())).

use std::fmt;

use crate::coerce::Coerce;
use crate::error::TagfigError;
use crate::types::Kind;

/// A struct whose fields can be introspected. Implement it with
/// `#[derive(Record)]`.
pub trait Record {
    /// The visible fields, in declaration order. Nested records are returned
    /// unexpanded.
    fn fields(&mut self) -> Vec<Field<'_>>;

    /// `true` iff every visible field is zero, recursively.
    fn is_zero(&self) -> bool;
}

/// Per-field tag table, e.g. `[("env", ""), ("default", "6060")]`.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Tags(&'static [(&'static str, &'static str)]);

impl Tags {
    pub const fn new(pairs: &'static [(&'static str, &'static str)]) -> Self {
        Tags(pairs)
    }

    /// The value for `namespace`, or `None` if the tag is absent. A present
    /// tag may have an empty value.
    pub fn lookup(&self, namespace: &str) -> Option<&'static str> {
        self.0
            .iter()
            .find(|(ns, _)| *ns == namespace)
            .map(|(_, value)| *value)
    }

    /// The value for `namespace`, empty if absent.
    pub fn get(&self, namespace: &str) -> &'static str {
        self.lookup(namespace).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> {
        self.0.iter().copied()
    }
}

impl fmt::Debug for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

enum Slot<'a> {
    Value(&'a mut dyn Coerce),
    Record(&'a mut dyn Record),
}

/// One field of a record.
pub struct Field<'a> {
    name: &'static str,
    tags: Tags,
    parents: Vec<&'static str>,
    slot: Slot<'a>,
}

impl<'a> Field<'a> {
    /// A leaf field backed by a coercible value.
    pub fn value(name: &'static str, tags: Tags, value: &'a mut dyn Coerce) -> Self {
        Field {
            name,
            tags,
            parents: Vec::new(),
            slot: Slot::Value(value),
        }
    }

    /// A nested record field.
    pub fn record(name: &'static str, tags: Tags, record: &'a mut dyn Record) -> Self {
        Field {
            name,
            tags,
            parents: Vec::new(),
            slot: Slot::Record(record),
        }
    }

    /// The field's own name as declared (or renamed).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Names of the enclosing records, outermost first.
    pub fn segments(&self) -> &[&'static str] {
        &self.parents
    }

    /// Dotted path from the root record, e.g. `postgres.port`.
    pub fn path(&self) -> String {
        let mut path = String::new();
        for segment in &self.parents {
            path.push_str(segment);
            path.push('.');
        }
        path.push_str(self.name);
        path
    }

    pub fn kind(&self) -> Kind {
        match &self.slot {
            Slot::Value(value) => value.kind(),
            Slot::Record(_) => Kind::Record,
        }
    }

    pub fn tags(&self) -> Tags {
        self.tags
    }

    /// Shorthand for `self.tags().lookup(namespace)`.
    pub fn tag(&self, namespace: &str) -> Option<&'static str> {
        self.tags.lookup(namespace)
    }

    /// Whether the field still holds its zero value. A nested record is zero
    /// iff all of its fields are.
    pub fn is_zero(&self) -> bool {
        match &self.slot {
            Slot::Value(value) => value.is_zero(),
            Slot::Record(record) => record.is_zero(),
        }
    }

    /// Coerce `raw` into the field's type and store it.
    ///
    /// Fails with [`TypeMismatch`](TagfigError::TypeMismatch) or
    /// [`Unsupported`](TagfigError::Unsupported) without touching the value,
    /// and with [`InvalidTarget`](TagfigError::InvalidTarget) for nested records.
    pub fn set(&mut self, raw: &str) -> Result<(), TagfigError> {
        let path = self.path();
        match &mut self.slot {
            Slot::Value(value) => value.coerce(raw).map_err(|e| e.at(path, raw)),
            Slot::Record(_) => Err(TagfigError::InvalidTarget {
                field: path,
                reason: "a nested record cannot be set from a single value".into(),
            }),
        }
    }

    /// Canonical text of the current value. `None` for nested records, unset
    /// optionals and unsupported kinds.
    pub fn to_text(&self) -> Option<String> {
        match &self.slot {
            Slot::Value(value) => value.to_text(),
            Slot::Record(_) => None,
        }
    }

    /// Whether both fields are leaves of the same type holding equal values.
    pub(crate) fn same_value(&self, other: &Field<'_>) -> bool {
        match (&self.slot, &other.slot) {
            (Slot::Value(value), Slot::Value(other)) => value.same_value(&**other),
            _ => false,
        }
    }

    /// Exchange values with another leaf field of the same type.
    pub(crate) fn swap_value(&mut self, other: &mut Field<'_>) -> bool {
        match (&mut self.slot, &mut other.slot) {
            (Slot::Value(value), Slot::Value(other)) => value.swap_value(&mut **other),
            _ => false,
        }
    }

    /// Open a nested record into its own fields, which inherit this field's
    /// path. Leaf fields are an [`InvalidTarget`](TagfigError::InvalidTarget).
    pub fn into_fields(self) -> Result<Vec<Field<'a>>, TagfigError> {
        self.descend().map_err(|field| TagfigError::InvalidTarget {
            field: field.path(),
            reason: format!("a {} field has no sub-fields", field.kind()),
        })
    }

    /// Expand a record field, handing leaf fields back unchanged.
    pub(crate) fn descend(self) -> Result<Vec<Field<'a>>, Field<'a>> {
        let Field {
            name,
            tags,
            mut parents,
            slot,
        } = self;
        match slot {
            Slot::Record(record) => {
                parents.push(name);
                let children = record
                    .fields()
                    .into_iter()
                    .map(|mut child| {
                        child.parents = parents.clone();
                        child
                    })
                    .collect();
                Ok(children)
            }
            slot @ Slot::Value(_) => Err(Field {
                name,
                tags,
                parents,
                slot,
            }),
        }
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("path", &self.path())
            .field("kind", &self.kind())
            .field("tags", &self.tags)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{Postgres, Server, populated_server};

    #[test]
    fn fields_follow_declaration_order() {
        let mut server = Server::default();
        let names: Vec<&str> = server.fields().iter().map(|f| f.name()).collect();
        assert_eq!(
            names,
            vec!["name", "port", "id", "labels", "enabled", "users", "postgres", "interval"]
        );
    }

    #[test]
    fn private_and_skipped_fields_are_hidden() {
        let mut pg = Postgres::default();
        let names: Vec<&str> = pg.fields().iter().map(|f| f.name()).collect();
        assert!(!names.contains(&"unexported"));
        assert!(!names.contains(&"pool"));
    }

    #[test]
    fn kinds_are_classified() {
        let mut server = Server::default();
        let kinds: Vec<Kind> = server.fields().iter().map(|f| f.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                Kind::Text,
                Kind::Integer,
                Kind::Integer,
                Kind::Sequence,
                Kind::Bool,
                Kind::Sequence,
                Kind::Record,
                Kind::Integer,
            ]
        );
    }

    #[test]
    fn tag_lookup_distinguishes_absent_from_empty() {
        let mut pg = Postgres::default();
        let fields = pg.fields();
        let port = fields.iter().find(|f| f.name() == "port").unwrap();
        assert_eq!(port.tag("required"), Some("true"));
        assert_eq!(port.tag("customRequired"), Some("yes"));
        assert_eq!(port.tag("env"), None);

        let enabled = fields.iter().find(|f| f.name() == "enabled").unwrap();
        assert_eq!(enabled.tag("env"), Some(""));
        assert_eq!(enabled.tags().get("default"), "");
    }

    #[test]
    fn set_mutates_in_place() {
        let mut server = Server::default();
        {
            let mut fields = server.fields();
            let port = fields.iter_mut().find(|f| f.name() == "port").unwrap();
            port.set("6060").unwrap();
        }
        assert_eq!(server.port, 6060);
    }

    #[test]
    fn failed_set_leaves_value_unchanged() {
        let mut server = Server::default();
        server.port = 8080;
        {
            let mut fields = server.fields();
            let port = fields.iter_mut().find(|f| f.name() == "port").unwrap();
            let err = port.set("not-a-number").unwrap_err();
            assert!(matches!(
                err,
                TagfigError::TypeMismatch { ref field, expected: Kind::Integer, .. } if field == "port"
            ));
        }
        assert_eq!(server.port, 8080);
    }

    #[test]
    fn setting_a_nested_record_is_invalid() {
        let mut server = Server::default();
        let mut fields = server.fields();
        let pg = fields.iter_mut().find(|f| f.name() == "postgres").unwrap();
        assert!(matches!(
            pg.set("anything"),
            Err(TagfigError::InvalidTarget { .. })
        ));
    }

    #[test]
    fn unsupported_kind_reports_unsupported() {
        let mut pg = Postgres::default();
        let mut fields = pg.fields();
        let options = fields.iter_mut().find(|f| f.name() == "options").unwrap();
        assert_eq!(options.kind(), Kind::Unsupported);
        assert!(matches!(
            options.set("a=b"),
            Err(TagfigError::Unsupported { .. })
        ));
    }

    #[test]
    fn nested_zero_is_recursive() {
        let mut server = Server::default();
        {
            let fields = server.fields();
            let pg = fields.iter().find(|f| f.name() == "postgres").unwrap();
            assert!(pg.is_zero());
        }
        server.postgres.hosts.push("10.0.0.1".into());
        let fields = server.fields();
        let pg = fields.iter().find(|f| f.name() == "postgres").unwrap();
        assert!(!pg.is_zero());
    }

    #[test]
    fn into_fields_carries_path() {
        let mut server = Server::default();
        let pg = server
            .fields()
            .into_iter()
            .find(|f| f.name() == "postgres")
            .unwrap();
        let children = pg.into_fields().unwrap();
        let port = children.iter().find(|f| f.name() == "port").unwrap();
        assert_eq!(port.segments(), &["postgres"]);
        assert_eq!(port.path(), "postgres.port");
    }

    #[test]
    fn into_fields_on_leaf_is_invalid() {
        let mut server = Server::default();
        let name = server.fields().into_iter().next().unwrap();
        assert!(matches!(
            name.into_fields(),
            Err(TagfigError::InvalidTarget { ref field, .. }) if field == "name"
        ));
    }

    #[test]
    fn to_text_renders_current_value() {
        let mut server = Server::default();
        server.users = vec!["ankara".into(), "istanbul".into()];
        let fields = server.fields();
        let users = fields.iter().find(|f| f.name() == "users").unwrap();
        assert_eq!(users.to_text().as_deref(), Some("ankara,istanbul"));
        let pg = fields.iter().find(|f| f.name() == "postgres").unwrap();
        assert_eq!(pg.to_text(), None);
    }

    #[test]
    fn swap_exchanges_same_typed_leaves() {
        let mut from = populated_server();
        let mut into = Server::default();
        {
            let mut source = from.fields();
            let mut target = into.fields();
            // 0: name (String), 1: port (u16), 6: postgres (record)
            assert!(!target[1].same_value(&source[1]));
            assert!(!target[0].swap_value(&mut source[1]));
            assert!(!target[6].swap_value(&mut source[6]));
            assert!(target[1].swap_value(&mut source[1]));
            assert!(target[1].same_value(&Field::value("port", Tags::default(), &mut 6060u16)));
        }
        assert_eq!(into.port, 6060);
        assert_eq!(from.port, 0);
        assert_eq!(into.name, "");
    }

    #[test]
    fn tags_debug_lists_pairs() {
        let tags = Tags::new(&[("env", ""), ("default", "1")]);
        assert_eq!(format!("{tags:?}"), r#"{"env": "", "default": "1"}"#);
        assert!(Tags::default().is_empty());
    }
}
