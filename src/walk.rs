//! Depth-first traversal over a record's fields.

use std::vec;

use crate::field::{Field, Record};

/// Walk every leaf field of `record` in declaration order, expanding nested
/// records in place.
///
/// The walk is lazy: a nested record's fields are only listed once the walk
/// reaches it. Each yielded [`Field`] knows its enclosing record names, so
/// `field.path()` is the dotted path from `record`.
///
/// ```ignore
/// for mut field in tagfig::walk(&mut config) {
///     if let Some(raw) = field.tag("default") {
///         field.set(raw)?;
///     }
/// }
/// ```
pub fn walk(record: &mut dyn Record) -> Walk<'_> {
    Walk {
        stack: vec![record.fields().into_iter()],
    }
}

/// Iterator returned by [`walk`].
pub struct Walk<'a> {
    stack: Vec<vec::IntoIter<Field<'a>>>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = Field<'a>;

    fn next(&mut self) -> Option<Field<'a>> {
        loop {
            let level = self.stack.last_mut()?;
            let Some(field) = level.next() else {
                self.stack.pop();
                continue;
            };
            match field.descend() {
                Ok(children) => self.stack.push(children.into_iter()),
                Err(leaf) => return Some(leaf),
            }
        }
    }
}
