//! Fill unset fields from their `default` tag.

use tracing::debug;

use crate::builder::Loader;
use crate::error::TagfigError;
use crate::field::Record;
use crate::walk::walk;

/// Tag namespace read by [`DefaultLoader`] unless configured otherwise.
pub const DEFAULT_TAG: &str = "default";

/// Sets every zero-valued field that carries a non-empty `default` tag.
///
/// Fields that already hold a value are left alone, so running the loader
/// after another source never clobbers what that source set.
#[derive(Debug, Clone)]
pub struct DefaultLoader {
    tag: String,
}

impl Default for DefaultLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultLoader {
    pub fn new() -> Self {
        Self {
            tag: DEFAULT_TAG.to_string(),
        }
    }

    /// Read defaults from a different tag namespace.
    pub fn tag(mut self, namespace: impl Into<String>) -> Self {
        self.tag = namespace.into();
        self
    }

    pub fn apply(&self, record: &mut dyn Record) -> Result<(), TagfigError> {
        for mut field in walk(record) {
            let Some(raw) = field.tag(&self.tag) else {
                continue;
            };
            if raw.is_empty() || !field.is_zero() {
                continue;
            }
            field.set(raw)?;
            debug!(
                event = "tagfig.defaults.field_set",
                field = %field.path(),
                value = raw,
            );
        }
        Ok(())
    }
}

impl<R: Record> Loader<R> for DefaultLoader {
    fn load(&mut self, record: &mut R) -> Result<(), TagfigError> {
        self.apply(record)
    }
}
