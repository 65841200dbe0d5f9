//! Runtime value taxonomy.
//!
//! Values are a tagged enum dispatched with pattern matching rather than
//! inheritance, per the source's runtime type tests (`object.Object`
//! interface + type switch). `String`, `Array`, and `Hash` are `Rc`-backed:
//! this crate is not arena-allocated, so `Rc` is the closest `std` analogue
//! to "values live for as long as the VM references them" without a garbage
//! collector.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use hashbrown::HashMap;

/// A runtime value.
///
/// `Boolean` and `Null` are identity-comparable in the source language; in
/// safe Rust a `bool` or a unit variant already behaves like a singleton (two
/// `Value::Boolean(true)` are indistinguishable), so no separate singleton
/// table is needed here. `Array` and `Hash` are heap-allocated per
/// construction and compare by `Rc` pointer identity through [`Value::eq`]
/// rather than gaining structural equality the opcode set never specifies.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    String(Rc<str>),
    Array(Rc<Vec<Value>>),
    Hash(Rc<HashObject>),
    Null,
}

/// A hash/map value: a deterministic fingerprint keyed table that retains the
/// original `{key, value}` pair so it can be displayed or iterated.
#[derive(Debug, Clone, Default)]
pub struct HashObject {
    pairs: HashMap<HashKey, (Value, Value)>,
}

impl HashObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: Value, value: Value) -> Result<(), NotHashable> {
        let hash_key = key.hash_key().ok_or(NotHashable)?;
        self.pairs.insert(hash_key, (key, value));
        Ok(())
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        let hash_key = key.hash_key()?;
        self.pairs.get(&hash_key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.pairs.values().map(|(k, v)| (k, v))
    }
}

/// Attempted to use a non-hashable value (`Array`, `Hash`, `Null`) as a hash
/// key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotHashable;

/// A deterministic fingerprint for a hashable value: type tag plus a content
/// hash. Two values that are structurally equal produce the same `HashKey`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    type_tag: TypeTag,
    fingerprint: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum TypeTag {
    Integer,
    Boolean,
    String,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Boolean(_) => "BOOLEAN",
            Value::String(_) => "STRING",
            Value::Array(_) => "ARRAY",
            Value::Hash(_) => "HASH",
            Value::Null => "NULL",
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// `false`/`Null` are not truthy; everything else is.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Boolean(b) => *b,
            Value::Null => false,
            _ => true,
        }
    }

    /// Deterministic fingerprint for use as a hash/map key, or `None` if this
    /// kind of value is not hashable.
    pub fn hash_key(&self) -> Option<HashKey> {
        let mut hasher = DefaultHasher::new();
        let type_tag = match self {
            Value::Integer(n) => {
                n.hash(&mut hasher);
                TypeTag::Integer
            }
            Value::Boolean(b) => {
                b.hash(&mut hasher);
                TypeTag::Boolean
            }
            Value::String(s) => {
                s.as_ref().hash(&mut hasher);
                TypeTag::String
            }
            Value::Array(_) | Value::Hash(_) | Value::Null => return None,
        };
        Some(HashKey {
            type_tag,
            fingerprint: hasher.finish(),
        })
    }

    /// Identity comparison used for `Array`/`Hash`: `Rc` pointer equality.
    fn ptr_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Hash(a), Value::Hash(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Equality as used by the `Eq`/`NotEq` opcodes: structural for Integer
    /// and String, identity for Boolean/Null/Array/Hash. Returns `None` when
    /// the two operands are of incompatible kinds (the caller turns this
    /// into a `TypeMismatch` runtime error).
    pub fn vm_eq(&self, other: &Value) -> Option<bool> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a == b),
            (Value::String(a), Value::String(b)) => Some(a == b),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a == b),
            (Value::Null, Value::Null) => Some(true),
            (Value::Array(_), Value::Array(_)) | (Value::Hash(_), Value::Hash(_)) => {
                Some(self.ptr_eq(other))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Null => write!(f, "null"),
            Value::Array(elems) => {
                write!(f, "[")?;
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{elem}")?;
                }
                write!(f, "]")
            }
            Value::Hash(hash) => {
                write!(f, "{{")?;
                for (i, (key, value)) in hash.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_compare_structurally() {
        let a = Value::Integer(5);
        let b = Value::Integer(5);
        assert_eq!(a.vm_eq(&b), Some(true));
    }

    #[test]
    fn strings_compare_structurally_not_by_identity() {
        let a = Value::String(Rc::from("monkey"));
        let b = Value::String(Rc::from("monkey"));
        assert_eq!(a.vm_eq(&b), Some(true));
    }

    #[test]
    fn booleans_compare_by_value() {
        assert_eq!(
            Value::Boolean(true).vm_eq(&Value::Boolean(true)),
            Some(true)
        );
        assert_eq!(
            Value::Boolean(true).vm_eq(&Value::Boolean(false)),
            Some(false)
        );
    }

    #[test]
    fn arrays_compare_by_identity_only() {
        let elems = Rc::new(vec![Value::Integer(1)]);
        let a = Value::Array(elems.clone());
        let b = Value::Array(elems.clone());
        let c = Value::Array(Rc::new(vec![Value::Integer(1)]));
        assert_eq!(a.vm_eq(&b), Some(true), "same Rc is identity-equal");
        assert_eq!(
            a.vm_eq(&c),
            Some(false),
            "distinct Rc with equal contents is not identity-equal"
        );
    }

    #[test]
    fn mismatched_kinds_are_not_comparable() {
        assert_eq!(Value::Integer(1).vm_eq(&Value::Boolean(true)), None);
    }

    #[test]
    fn null_is_not_hashable() {
        assert_eq!(Value::Null.hash_key(), None);
    }

    #[test]
    fn equal_strings_hash_to_the_same_key() {
        let a = Value::String(Rc::from("key"));
        let b = Value::String(Rc::from("key"));
        assert_eq!(a.hash_key(), b.hash_key());
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
        assert!(Value::Boolean(true).is_truthy());
        assert!(Value::Integer(0).is_truthy());
    }
}
