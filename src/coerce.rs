//! Text-to-value coercion for leaf fields.
//!
//! Three traits cooperate:
//!
//! - [`Coerce`] is the object-safe view the [`Field`](crate::Field) accessor
//!   holds: kind, zero test, assignment from text, rendering back to text.
//! - [`Element`] is the scalar rule set (booleans, numbers, text, paths). Any
//!   `Element` is a `Coerce` on its own, inside `Option<T>`, and as the element
//!   type of `Vec<T>`.
//! - [`TextCodec`] is the extension point for caller-defined types. A codec
//!   type is an `Element` automatically, so its own `decode` is used instead of
//!   any generic rule.
//!
//! Every assignment parses into a temporary first; a failed coercion never
//! leaves a partially written value behind.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::path::PathBuf;

use crate::error::CoerceError;
use crate::types::Kind;

/// Separator between elements of a sequence field.
pub const SEQUENCE_DELIMITER: char = ',';

/// Object-safe access to one leaf value.
pub trait Coerce {
    /// Coercion category, fixed by the static type.
    fn kind(&self) -> Kind;

    /// Whether the value is still in its "unset" state.
    fn is_zero(&self) -> bool;

    /// Parse `raw` and store it. On error the current value is untouched.
    fn coerce(&mut self, raw: &str) -> Result<(), CoerceError>;

    /// Canonical text form, `None` when there is nothing to render.
    fn to_text(&self) -> Option<String>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Whether `other` has the same type and an equal value.
    fn same_value(&self, other: &dyn Coerce) -> bool;

    /// Exchange values with `other`. Returns `false`, touching nothing, when
    /// the types differ.
    fn swap_value(&mut self, other: &mut dyn Coerce) -> bool;
}

fn downcast_eq<T: 'static>(other: &dyn Coerce, eq: impl FnOnce(&T) -> bool) -> bool {
    other.as_any().downcast_ref::<T>().is_some_and(eq)
}

fn downcast_swap<T: 'static>(slot: &mut T, other: &mut dyn Coerce) -> bool {
    match other.as_any_mut().downcast_mut::<T>() {
        Some(other) => {
            std::mem::swap(slot, other);
            true
        }
        None => false,
    }
}

macro_rules! any_access {
    () => {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }

        fn swap_value(&mut self, other: &mut dyn Coerce) -> bool {
            downcast_swap(self, other)
        }
    };
}

/// A scalar that can be parsed from and rendered to a single token.
pub trait Element: Sized {
    const KIND: Kind;

    fn parse(raw: &str) -> Result<Self, CoerceError>;

    fn render(&self) -> String;

    fn is_blank(&self) -> bool;
}

/// The custom textual contract for caller-defined field types.
///
/// ```ignore
/// struct Level(u8);
///
/// impl TextCodec for Level {
///     fn decode(raw: &str) -> Result<Self, String> {
///         match raw {
///             "low" => Ok(Level(1)),
///             "high" => Ok(Level(9)),
///             other => Err(format!("unknown level {other}")),
///         }
///     }
///     fn encode(&self) -> String { /* ... */ }
/// }
/// ```
pub trait TextCodec: Sized {
    /// The kind reported for fields of this type.
    const KIND: Kind = Kind::Text;

    fn decode(raw: &str) -> Result<Self, String>;

    fn encode(&self) -> String;

    /// Zero test used by loaders and validators. Defaults to "encodes to nothing".
    fn is_empty(&self) -> bool {
        self.encode().is_empty()
    }
}

impl<T: TextCodec> Element for T {
    const KIND: Kind = <T as TextCodec>::KIND;

    fn parse(raw: &str) -> Result<Self, CoerceError> {
        T::decode(raw).map_err(|reason| CoerceError::mismatch(<T as TextCodec>::KIND, reason))
    }

    fn render(&self) -> String {
        TextCodec::encode(self)
    }

    fn is_blank(&self) -> bool {
        TextCodec::is_empty(self)
    }
}

impl<T: Element + 'static> Coerce for T {
    fn kind(&self) -> Kind {
        T::KIND
    }

    fn is_zero(&self) -> bool {
        Element::is_blank(self)
    }

    fn coerce(&mut self, raw: &str) -> Result<(), CoerceError> {
        *self = T::parse(raw)?;
        Ok(())
    }

    fn to_text(&self) -> Option<String> {
        Some(Element::render(self))
    }

    fn same_value(&self, other: &dyn Coerce) -> bool {
        downcast_eq(other, |o: &T| o.render() == self.render())
    }

    any_access!();
}

impl<T: Element + 'static> Coerce for Option<T> {
    fn kind(&self) -> Kind {
        T::KIND
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }

    fn coerce(&mut self, raw: &str) -> Result<(), CoerceError> {
        *self = Some(T::parse(raw)?);
        Ok(())
    }

    fn to_text(&self) -> Option<String> {
        self.as_ref().map(Element::render)
    }

    fn same_value(&self, other: &dyn Coerce) -> bool {
        downcast_eq(other, |o: &Option<T>| {
            o.as_ref().map(Element::render) == self.as_ref().map(Element::render)
        })
    }

    any_access!();
}

impl<T: Element + 'static> Coerce for Vec<T> {
    fn kind(&self) -> Kind {
        Kind::Sequence
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn coerce(&mut self, raw: &str) -> Result<(), CoerceError> {
        if raw.is_empty() {
            self.clear();
            return Ok(());
        }
        let items = raw
            .split(SEQUENCE_DELIMITER)
            .map(T::parse)
            .collect::<Result<Vec<T>, _>>()
            .map_err(|err| match err {
                CoerceError::Mismatch { reason, .. } => CoerceError::Mismatch {
                    expected: Kind::Sequence,
                    reason: format!("element is not {}: {reason}", T::KIND),
                },
                other => other,
            })?;
        *self = items;
        Ok(())
    }

    fn to_text(&self) -> Option<String> {
        let parts: Vec<String> = self.iter().map(Element::render).collect();
        let separator = SEQUENCE_DELIMITER.to_string();
        Some(parts.join(separator.as_str()))
    }

    fn same_value(&self, other: &dyn Coerce) -> bool {
        downcast_eq(other, |o: &Vec<T>| {
            o.len() == self.len() && o.iter().zip(self).all(|(a, b)| a.render() == b.render())
        })
    }

    any_access!();
}

impl<K, V, S> Coerce for HashMap<K, V, S>
where
    K: Eq + Hash + 'static,
    V: PartialEq + 'static,
    S: BuildHasher + 'static,
{
    fn kind(&self) -> Kind {
        Kind::Unsupported
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn coerce(&mut self, _raw: &str) -> Result<(), CoerceError> {
        Err(CoerceError::Unsupported(Kind::Unsupported))
    }

    fn to_text(&self) -> Option<String> {
        None
    }

    fn same_value(&self, other: &dyn Coerce) -> bool {
        downcast_eq(other, |o: &Self| o == self)
    }

    any_access!();
}

impl<K, V> Coerce for BTreeMap<K, V>
where
    K: PartialEq + 'static,
    V: PartialEq + 'static,
{
    fn kind(&self) -> Kind {
        Kind::Unsupported
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn coerce(&mut self, _raw: &str) -> Result<(), CoerceError> {
        Err(CoerceError::Unsupported(Kind::Unsupported))
    }

    fn to_text(&self) -> Option<String> {
        None
    }

    fn same_value(&self, other: &dyn Coerce) -> bool {
        downcast_eq(other, |o: &Self| o == self)
    }

    any_access!();
}

// -- scalar rules -----------------------------------------------------------

/// Parse the canonical boolean tokens.
pub fn parse_bool(raw: &str) -> Result<bool, CoerceError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(CoerceError::mismatch(
            Kind::Bool,
            "not a recognized boolean token",
        )),
    }
}

impl Element for bool {
    const KIND: Kind = Kind::Bool;

    fn parse(raw: &str) -> Result<Self, CoerceError> {
        parse_bool(raw)
    }

    fn render(&self) -> String {
        self.to_string()
    }

    fn is_blank(&self) -> bool {
        !*self
    }
}

macro_rules! numeric_element {
    ($kind:expr, $zero:expr => $($ty:ty),+) => {
        $(
            impl Element for $ty {
                const KIND: Kind = $kind;

                fn parse(raw: &str) -> Result<Self, CoerceError> {
                    raw.parse::<$ty>().map_err(|e| CoerceError::mismatch($kind, e))
                }

                fn render(&self) -> String {
                    self.to_string()
                }

                fn is_blank(&self) -> bool {
                    *self == $zero
                }
            }
        )+
    };
}

numeric_element!(Kind::Integer, 0 => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
numeric_element!(Kind::Float, 0.0 => f32, f64);

impl Element for String {
    const KIND: Kind = Kind::Text;

    fn parse(raw: &str) -> Result<Self, CoerceError> {
        Ok(raw.to_string())
    }

    fn render(&self) -> String {
        self.clone()
    }

    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Element for char {
    const KIND: Kind = Kind::Text;

    fn parse(raw: &str) -> Result<Self, CoerceError> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(CoerceError::mismatch(
                Kind::Text,
                "expected exactly one character",
            )),
        }
    }

    fn render(&self) -> String {
        self.to_string()
    }

    fn is_blank(&self) -> bool {
        *self == '\0'
    }
}

impl Element for PathBuf {
    const KIND: Kind = Kind::Text;

    fn parse(raw: &str) -> Result<Self, CoerceError> {
        Ok(PathBuf::from(raw))
    }

    fn render(&self) -> String {
        self.display().to_string()
    }

    fn is_blank(&self) -> bool {
        self.as_os_str().is_empty()
    }
}
