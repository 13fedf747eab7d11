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
    fmt::{Debug, Display, Formatter},
    rc::Rc,
};

use ahash::AHashMap;
use compact_str::CompactString;
use strsim::normalized_damerau_levenshtein;

use crate::runtime::{
    Args,
    HandlerTable,
    NativeClass,
    ObjectRef,
    Runtime,
    RuntimeError,
    RuntimeResult,
    Value,
};

/// A minimal similarity of a name to the requested name to be suggested as
/// a replacement.
const SUGGESTION_THRESHOLD: f64 = 0.5;

/// An identifier of a class registered in the [Runtime].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ClassId(u32);

impl Display for ClassId {
    #[inline(always)]
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_fmt(format_args!("class #{}", self.0))
    }
}

impl ClassId {
    #[inline(always)]
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline(always)]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

type InstanceMethod = Rc<dyn Fn(&Runtime, ObjectRef, &mut Args) -> RuntimeResult<Value>>;

type ClassMethod = fn(&mut Runtime, &mut Args) -> RuntimeResult<Value>;

#[derive(Clone)]
pub(crate) enum MethodKind {
    Instance(InstanceMethod),
    Class(ClassMethod),
}

/// A script-visible method of a class.
#[derive(Clone)]
pub struct MethodEntry {
    name: CompactString,
    kind: MethodKind,
}

impl Debug for MethodEntry {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("MethodEntry")
            .field("name", &self.name)
            .field("is_static", &self.is_static())
            .finish()
    }
}

impl MethodEntry {
    /// Declares a method that operates on the native payload of the object
    /// the method is invoked on.
    ///
    /// The payload is borrowed mutably for the duration of the call.
    /// Invoking the method on an object whose construction has been refused
    /// fails with [RuntimeError::NotAnInstance].
    pub fn instance<T: NativeClass>(
        name: &str,
        method: fn(&mut T, &mut Args) -> RuntimeResult<Value>,
    ) -> Self {
        Self {
            name: CompactString::from(name),
            kind: MethodKind::Instance(Rc::new(
                move |runtime: &Runtime, this: ObjectRef, args: &mut Args| {
                    let mut payload = runtime.payload_mut::<T>(this)?;

                    method(&mut *payload, args)
                },
            )),
        }
    }

    /// Declares a static method of the class.
    pub fn class_method(name: &str, method: ClassMethod) -> Self {
        Self {
            name: CompactString::from(name),
            kind: MethodKind::Class(method),
        }
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    #[inline(always)]
    pub fn is_static(&self) -> bool {
        matches!(self.kind, MethodKind::Class(_))
    }

    #[inline(always)]
    pub(crate) fn kind(&self) -> &MethodKind {
        &self.kind
    }
}

/// A description of a class to be [registered](Runtime::register) in the
/// runtime.
///
/// ```
/// # use bindery::{export, runtime::{Args, ClassDeclaration, MethodEntry, Runtime, Value}};
/// #[export]
/// #[derive(Default)]
/// struct Point {
///     x: i64,
/// }
///
/// let mut runtime = Runtime::new();
///
/// let class = runtime
///     .register(
///         ClassDeclaration::new::<Point>("Point")
///             .property("label", "origin")
///             .method(MethodEntry::instance::<Point>("x", |point, _| Ok(Value::Integer(point.x)))),
///     )
///     .unwrap();
///
/// assert_eq!("Point", runtime.class(class).unwrap().name());
/// ```
#[derive(Debug)]
pub struct ClassDeclaration {
    name: CompactString,
    handlers: &'static HandlerTable,
    methods: Vec<MethodEntry>,
    properties: Vec<(CompactString, Value)>,
}

impl ClassDeclaration {
    /// Starts a declaration of the class backed by the native type `T`.
    #[inline]
    pub fn new<T: NativeClass>(name: &str) -> Self {
        Self {
            name: CompactString::from(name),
            handlers: T::handlers(),
            methods: Vec::new(),
            properties: Vec::new(),
        }
    }

    #[inline]
    pub fn method(mut self, method: MethodEntry) -> Self {
        self.methods.push(method);
        self
    }

    #[inline]
    pub fn methods(mut self, methods: impl IntoIterator<Item = MethodEntry>) -> Self {
        self.methods.extend(methods);
        self
    }

    /// Declares a property slot with the initial value every new instance
    /// receives.
    ///
    /// Object handles are not accepted as initial values and turn into
    /// [Null](Value::Null).
    #[inline]
    pub fn property(mut self, name: &str, default: impl Into<Value>) -> Self {
        let default = match default.into() {
            Value::Object(_) => Value::Null,
            other => other,
        };

        self.properties.push((CompactString::from(name), default));
        self
    }
}

/// A registered class.
pub struct ClassEntry {
    id: ClassId,
    name: CompactString,
    handlers: &'static HandlerTable,
    methods: AHashMap<CompactString, MethodEntry>,
    properties: Vec<(CompactString, Value)>,
}

impl Debug for ClassEntry {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ClassEntry")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("type_name", &self.handlers.type_name())
            .field("methods", &self.methods.len())
            .field("properties", &self.properties)
            .finish()
    }
}

impl ClassEntry {
    #[inline(always)]
    pub fn id(&self) -> ClassId {
        self.id
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    #[inline(always)]
    pub fn handlers(&self) -> &'static HandlerTable {
        self.handlers
    }

    /// Looks up a method by its case-insensitive name.
    #[inline]
    pub fn method(&self, name: &str) -> Option<&MethodEntry> {
        self.methods.get(&fold_case(name))
    }

    #[inline]
    pub fn method_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.methods.values().map(MethodEntry::name)
    }

    /// Returns the position of the property slot.
    #[inline]
    pub fn property_index(&self, name: &str) -> Option<usize> {
        self.properties
            .iter()
            .position(|(property, _)| property.as_str() == name)
    }

    #[inline]
    pub fn property_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.properties.iter().map(|(name, _)| name.as_str())
    }

    #[inline]
    pub(crate) fn property_defaults(&self) -> Vec<Value> {
        self.properties
            .iter()
            .map(|(_, default)| default.clone())
            .collect()
    }

    pub(crate) fn suggest_method(&self, name: &str) -> Option<CompactString> {
        closest(name, self.method_names())
    }
}

#[derive(Default)]
pub(crate) struct ClassRegistry {
    entries: Vec<ClassEntry>,
    index: AHashMap<CompactString, ClassId>,
}

impl ClassRegistry {
    pub(crate) fn register(&mut self, declaration: ClassDeclaration) -> RuntimeResult<ClassId> {
        let key = fold_case(&declaration.name);

        if self.index.contains_key(&key) {
            return Err(RuntimeError::DuplicateClass {
                name: declaration.name,
            });
        }

        let id = ClassId::from_index(self.entries.len());

        let methods = declaration
            .methods
            .into_iter()
            .map(|method| (fold_case(method.name()), method))
            .collect();

        self.entries.push(ClassEntry {
            id,
            name: declaration.name,
            handlers: declaration.handlers,
            methods,
            properties: declaration.properties,
        });

        let _ = self.index.insert(key, id);

        Ok(id)
    }

    #[inline(always)]
    pub(crate) fn get(&self, id: ClassId) -> Option<&ClassEntry> {
        self.entries.get(id.index())
    }

    #[inline]
    pub(crate) fn lookup(&self, name: &str) -> Option<ClassId> {
        self.index.get(&fold_case(name)).copied()
    }

    pub(crate) fn suggest(&self, name: &str) -> Option<CompactString> {
        closest(name, self.entries.iter().map(ClassEntry::name))
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[inline]
fn fold_case(name: &str) -> CompactString {
    CompactString::from(name.to_lowercase())
}

fn closest<'a>(pattern: &str, candidates: impl Iterator<Item = &'a str>) -> Option<CompactString> {
    let pattern = pattern.to_lowercase();

    let mut best = None;
    let mut best_score = SUGGESTION_THRESHOLD;

    for candidate in candidates {
        let score = normalized_damerau_levenshtein(&pattern, &candidate.to_lowercase());

        if score >= best_score {
            best_score = score;
            best = Some(candidate);
        }
    }

    best.map(CompactString::from)
}

#[cfg(test)]
mod tests {
    use crate::runtime::class::closest;

    #[test]
    fn test_closest() {
        let candidates = ["Counter", "Ordinal", "Label"];

        assert_eq!(Some("Counter".into()), closest("countr", candidates.into_iter()));
        assert_eq!(Some("Label".into()), closest("LABELS", candidates.into_iter()));
        assert_eq!(None, closest("xyz", candidates.into_iter()));
    }
}
