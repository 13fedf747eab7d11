////////////////////////////////////////////////////////////////////////////////
// This file is part of "Ad Astra", an embeddable scripting programming       //
// language platform.                                                         //
//                                                                            //
// This work is proprietary software with source-available code.              //
//                                                                            //
// To copy, use, distribute, or contribute to this work, you must agree to    //
// the terms of the General License Agreement:                                //
//                                                                            //
// https://github.com/Eliah-Lakhin/ad-astra/blob/master/EULA.md               //
//                                                                            //
// The agreement grants a Basic Commercial License, allowing you to use       //
// this work in non-commercial and limited commercial products with a total   //
// gross revenue cap. To remove this commercial limit for one of your         //
// products, you must acquire a Full Commercial License.                      //
//                                                                            //
// If you contribute to the source code, documentation, or related materials, //
// you must grant me an exclusive license to these contributions.             //
// Contributions are governed by the "Contributions" section of the General   //
// License Agreement.                                                         //
//                                                                            //
// Copying the work in parts is strictly forbidden, except as permitted       //
// under the General License Agreement.                                       //
//                                                                            //
// If you do not or cannot agree to the terms of this Agreement,              //
// do not use this work.                                                      //
//                                                                            //
// This work is provided "as is", without any warranties, express or implied, //
// except where such disclaimers are legally invalid.                         //
//                                                                            //
// Copyright (c) 2024 Ilya Lakhin (Илья Александрович Лахин).                 //
// All rights reserved.                                                       //
////////////////////////////////////////////////////////////////////////////////

use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter},
    ops::Deref,
    rc::Rc,
};

use ahash::RandomState;
use compact_str::CompactString;
use indexmap::IndexMap;

use crate::runtime::ObjectRef;

/// A native carrier of the [integer](ValueKind::Integer) values.
///
/// The width matches the host's machine word.
pub type Integer = i64;

/// A tagged union of the runtime values exchanged between the host and the
/// adapted native types.
///
/// Exactly one kind is active at a time. Text and collection carriers are
/// reference-counted: cloning a Value takes a new reference and leaves the
/// source intact.
///
/// Object handles are not counted by the Value itself. The holder of a
/// `Value::Object` owns one host reference to the object and is responsible
/// for [releasing](crate::runtime::Runtime::release) it.
#[derive(Clone, Default, PartialEq)]
pub enum Value {
    /// A slot that has never been initialized.
    #[default]
    Undef,

    /// An explicit "no value".
    Null,

    Bool(bool),

    Integer(Integer),

    Double(f64),

    Text(Text),

    Collection(Collection),

    Object(ObjectRef),

    Resource(Resource),
}

impl Debug for Value {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undef => formatter.write_str("undef"),
            Self::Null => formatter.write_str("null"),
            Self::Bool(value) => Debug::fmt(value, formatter),
            Self::Integer(value) => Debug::fmt(value, formatter),
            Self::Double(value) => Debug::fmt(value, formatter),
            Self::Text(value) => Debug::fmt(value, formatter),
            Self::Collection(value) => Debug::fmt(value, formatter),
            Self::Object(value) => Debug::fmt(value, formatter),
            Self::Resource(value) => Debug::fmt(value, formatter),
        }
    }
}

impl Display for Value {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undef | Self::Null => Ok(()),
            Self::Bool(true) => formatter.write_str("1"),
            Self::Bool(false) => Ok(()),
            Self::Integer(value) => Display::fmt(value, formatter),
            Self::Double(value) => Display::fmt(value, formatter),
            Self::Text(value) => Display::fmt(value, formatter),
            Self::Collection(_) => formatter.write_str("Collection"),
            Self::Object(value) => Display::fmt(value, formatter),
            Self::Resource(value) => Display::fmt(value, formatter),
        }
    }
}

impl Value {
    /// Returns the kind of the currently active variant.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Undef => ValueKind::Undef,
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Integer(_) => ValueKind::Integer,
            Self::Double(_) => ValueKind::Double,
            Self::Text(_) => ValueKind::Text,
            Self::Collection(_) => ValueKind::Collection,
            Self::Object(_) => ValueKind::Object,
            Self::Resource(_) => ValueKind::Resource,
        }
    }

    /// Returns true if this value is [Undef](Self::Undef) or
    /// [Null](Self::Null).
    #[inline(always)]
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Undef | Self::Null)
    }

    /// Returns the object handle if this value is an object reference.
    #[inline(always)]
    pub fn as_object(&self) -> Option<ObjectRef> {
        match self {
            Self::Object(object) => Some(*object),
            _ => None,
        }
    }

    /// Reads the native carrier of the kind `P`.
    ///
    /// Returns None if the active kind is not `P::KIND`.
    #[inline(always)]
    pub fn read<P: Projection>(&self) -> Option<&P> {
        P::read(self)
    }
}

impl From<bool> for Value {
    #[inline(always)]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Integer> for Value {
    #[inline(always)]
    fn from(value: Integer) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Value {
    #[inline(always)]
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for Value {
    #[inline(always)]
    fn from(value: &str) -> Self {
        Self::Text(Text::from(value))
    }
}

impl From<Text> for Value {
    #[inline(always)]
    fn from(value: Text) -> Self {
        Self::Text(value)
    }
}

impl From<Collection> for Value {
    #[inline(always)]
    fn from(value: Collection) -> Self {
        Self::Collection(value)
    }
}

impl From<ObjectRef> for Value {
    #[inline(always)]
    fn from(value: ObjectRef) -> Self {
        Self::Object(value)
    }
}

impl From<Resource> for Value {
    #[inline(always)]
    fn from(value: Resource) -> Self {
        Self::Resource(value)
    }
}

/// A discriminant of the [Value] variants.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueKind {
    Undef,
    Null,
    Bool,
    Integer,
    Double,
    Text,
    Collection,
    Object,
    Resource,
}

impl Display for ValueKind {
    #[inline]
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.name())
    }
}

impl ValueKind {
    /// Kinds that an adapted object may be cast into through a native
    /// conversion capability, in dispatch order.
    pub const CASTABLE: [Self; 5] = [
        Self::Bool,
        Self::Integer,
        Self::Double,
        Self::Text,
        Self::Collection,
    ];

    /// Kinds that have a dedicated native comparison capability, in
    /// dispatch order. A superset of [CASTABLE](Self::CASTABLE).
    pub const COMPARABLE: [Self; 7] = [
        Self::Bool,
        Self::Integer,
        Self::Double,
        Self::Text,
        Self::Collection,
        Self::Object,
        Self::Resource,
    ];

    /// Returns a user-facing name of the kind.
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            Self::Undef => "undef",
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Integer => "int",
            Self::Double => "float",
            Self::Text => "string",
            Self::Collection => "array",
            Self::Object => "object",
            Self::Resource => "resource",
        }
    }

    #[inline(always)]
    pub fn is_castable(self) -> bool {
        Self::CASTABLE.contains(&self)
    }

    #[inline(always)]
    pub fn is_comparable(self) -> bool {
        Self::COMPARABLE.contains(&self)
    }
}

/// A mapping between a [Value] kind and the native type that carries it.
///
/// The "read" direction borrows the carrier out of a Value of the matching
/// kind. The "write" direction builds a Value of the carrier's kind; for the
/// reference-counted carriers ([Text] and [Collection]) writing takes a new
/// reference instead of consuming the source.
pub trait Projection: Sized {
    /// The kind of the Value this type carries.
    const KIND: ValueKind;

    /// Borrows the carrier from the `value`.
    ///
    /// Returns None if `value` is not of [KIND](Self::KIND).
    fn read(value: &Value) -> Option<&Self>;

    /// Creates a Value of [KIND](Self::KIND) that holds a copy (or a new
    /// reference) of this carrier.
    fn write(&self) -> Value;

    /// Moves this carrier into a Value of [KIND](Self::KIND).
    fn into_value(self) -> Value;
}

macro_rules! projection {
    ($carrier:ty => $variant:ident) => {
        impl Projection for $carrier {
            const KIND: ValueKind = ValueKind::$variant;

            #[inline(always)]
            fn read(value: &Value) -> Option<&Self> {
                match value {
                    Value::$variant(carrier) => Some(carrier),
                    _ => None,
                }
            }

            #[inline(always)]
            fn write(&self) -> Value {
                Value::$variant(self.clone())
            }

            #[inline(always)]
            fn into_value(self) -> Value {
                Value::$variant(self)
            }
        }
    };
}

projection!(bool => Bool);
projection!(Integer => Integer);
projection!(f64 => Double);
projection!(Text => Text);
projection!(Collection => Collection);
projection!(ObjectRef => Object);
projection!(Resource => Resource);

/// A marker of the "no value" operand.
///
/// Native types implement `Compare<Nil>` to be comparable with the
/// [Undef](Value::Undef) and [Null](Value::Null) values.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Nil;

/// An immutable reference-counted string.
///
/// Cloning a Text takes a new reference to the same buffer.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Text(Rc<str>);

impl Debug for Text {
    #[inline(always)]
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&*self.0, formatter)
    }
}

impl Display for Text {
    #[inline(always)]
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&*self.0, formatter)
    }
}

impl Deref for Text {
    type Target = str;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for Text {
    #[inline(always)]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Text {
    #[inline(always)]
    fn from(value: &str) -> Self {
        Self(Rc::from(value))
    }
}

impl From<String> for Text {
    #[inline(always)]
    fn from(value: String) -> Self {
        Self(Rc::from(value))
    }
}

impl Text {
    #[inline(always)]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the number of live references to the underlying buffer.
    #[inline(always)]
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

/// A key of the [Collection] entries.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Key {
    Integer(Integer),
    Text(Text),
}

impl Display for Key {
    #[inline]
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(key) => Display::fmt(key, formatter),
            Self::Text(key) => Display::fmt(key, formatter),
        }
    }
}

impl From<Integer> for Key {
    #[inline(always)]
    fn from(value: Integer) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for Key {
    #[inline(always)]
    fn from(value: &str) -> Self {
        Self::Text(Text::from(value))
    }
}

impl From<Text> for Key {
    #[inline(always)]
    fn from(value: Text) -> Self {
        Self::Text(value)
    }
}

/// A reference-counted ordered map of [Values](Value) keyed by integers or
/// texts.
///
/// Cloning a Collection takes a new reference to the same entries. Mutation
/// functions copy the entries first if they are shared with other references
/// (copy-on-write), so mutating one reference never affects the others.
#[derive(Clone, Default)]
pub struct Collection(Rc<IndexMap<Key, Value, RandomState>>);

impl PartialEq for Collection {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        if Rc::ptr_eq(&self.0, &other.0) {
            return true;
        }

        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .zip(other.0.iter())
                .all(|(this, other)| this == other)
    }
}

impl Debug for Collection {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        let mut debug_map = formatter.debug_map();

        for (key, value) in self.0.iter() {
            debug_map.entry(&format_args!("{key}"), value);
        }

        debug_map.finish()
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Collection {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut collection = Self::new();

        for (key, value) in iter {
            collection.insert(key, value);
        }

        collection
    }
}

impl Collection {
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn get(&self, key: impl Into<Key>) -> Option<&Value> {
        self.0.get(&key.into())
    }

    /// Inserts an entry, replacing the previous value under the same key.
    ///
    /// Replacement keeps the original position of the key.
    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        Rc::make_mut(&mut self.0).insert(key.into(), value.into())
    }

    /// Appends a value under the next integer key (one greater than the
    /// largest integer key, or zero).
    ///
    /// Returns false and leaves the collection unchanged if the largest
    /// integer key is [Integer::MAX].
    pub fn push(&mut self, value: impl Into<Value>) -> bool {
        let largest = self
            .0
            .keys()
            .filter_map(|key| match key {
                Key::Integer(key) => Some(*key),
                Key::Text(_) => None,
            })
            .max();

        let next = match largest {
            None => 0,

            Some(largest) => match largest.checked_add(1) {
                Some(next) => next,
                None => return false,
            },
        };

        let _ = self.insert(next, value);

        true
    }

    #[inline(always)]
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> + '_ {
        self.0.iter()
    }

    /// Returns the number of live references to the underlying entries.
    #[inline(always)]
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

/// An opaque handle of an external resource (a file descriptor, a socket,
/// etc.) owned by the host.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Resource {
    id: u64,
    kind: CompactString,
}

impl Display for Resource {
    #[inline]
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "Resource id #{}", self.id)
    }
}

impl PartialOrd for Resource {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Resource {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Resource {
    #[inline(always)]
    pub fn new(id: u64, kind: &str) -> Self {
        Self {
            id,
            kind: CompactString::from(kind),
        }
    }

    #[inline(always)]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline(always)]
    pub fn kind(&self) -> &str {
        self.kind.as_str()
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{Collection, Integer, Key, Projection, Text, Value, ValueKind};

    #[test]
    fn test_text_write_takes_reference() {
        let text = Text::from("abc");

        let value = text.write();

        assert_eq!(2, text.ref_count());
        assert_eq!(Some(&text), value.read::<Text>());

        drop(value);

        assert_eq!(1, text.ref_count());
    }

    #[test]
    fn test_read_mismatched_kind() {
        let value = Value::Integer(10);

        assert_eq!(Some(&10), value.read::<i64>());
        assert_eq!(None, value.read::<f64>());
        assert_eq!(None, value.read::<bool>());
    }

    #[test]
    fn test_collection_copy_on_write() {
        let mut first = Collection::new();

        assert!(first.push(1));
        assert!(first.push("two"));

        let mut second = first.clone();

        assert_eq!(2, first.ref_count());

        second.insert("extra", true);

        assert_eq!(2, first.len());
        assert_eq!(3, second.len());
        assert_eq!(Some(&Value::from("two")), first.get(1));
        assert_eq!(Some(&Value::Bool(true)), second.get(Key::from("extra")));
        assert_eq!(1, first.ref_count());
    }

    #[test]
    fn test_collection_push_keys() {
        let mut collection = [(5, Value::Null)].into_iter().collect::<Collection>();

        collection.insert("name", 1);
        assert!(collection.push(2));

        assert_eq!(Some(&Value::Integer(2)), collection.get(6));
    }

    #[test]
    fn test_collection_push_exhausted() {
        let mut collection = [(Integer::MAX, Value::from("last"))]
            .into_iter()
            .collect::<Collection>();

        assert!(!collection.push(true));

        assert_eq!(1, collection.len());
        assert_eq!(Some(&Value::from("last")), collection.get(Integer::MAX));
    }

    #[test]
    fn test_kind_tables() {
        assert!(ValueKind::CASTABLE.iter().all(|kind| kind.is_comparable()));
        assert!(!ValueKind::Object.is_castable());
        assert!(ValueKind::Resource.is_comparable());
        assert!(!ValueKind::Null.is_comparable());
    }
}
