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
    cell::{Ref, RefMut},
    cmp::Ordering,
    mem::replace,
};

use compact_str::CompactString;
use log::{debug, warn};

use crate::runtime::{
    class::{ClassRegistry, MethodKind},
    object::{ObjectBlock, ObjectHeader, ObjectStore},
    Args,
    ClassDeclaration,
    ClassEntry,
    ClassId,
    Comparison,
    HandlerTable,
    MethodEntry,
    NativeClass,
    ObjectBox,
    ObjectRef,
    RuntimeConfig,
    RuntimeError,
    RuntimeResult,
    Value,
    ValueKind,
    RUNTIME_LOG,
};

/// A single-threaded host object runtime.
///
/// The Runtime owns the registered classes and all objects created through
/// them. Each object is a single allocation of the host header and the
/// native payload, bound to the handler table of its class' native type.
///
/// Objects are reference-counted: [instantiate](Self::instantiate) and
/// [clone_object](Self::clone_object) return a handle that owns one
/// reference, [add_ref](Self::add_ref) takes another one, and
/// [release](Self::release) gives one back. When the count drops to zero,
/// the object is destroyed through its handler table. Objects that are still
/// alive when the Runtime is dropped are destroyed during the teardown.
///
/// ```
/// use bindery::{
///     export,
///     runtime::{ops::ToInteger, Integer, Runtime, Value, ValueKind},
/// };
///
/// #[export]
/// #[derive(Default)]
/// struct Counter {
///     count: Integer,
/// }
///
/// impl ToInteger for Counter {
///     fn to_integer(&self) -> Integer {
///         self.count
///     }
/// }
///
/// let mut runtime = Runtime::new();
///
/// let class = runtime.register_class::<Counter>("Counter", []).unwrap();
/// let counter = runtime.instantiate(class).unwrap();
///
/// runtime.payload_mut::<Counter>(counter).unwrap().count = 5;
///
/// assert_eq!(Value::Integer(5), runtime.cast(counter, ValueKind::Integer).unwrap());
/// assert!(runtime.cast(counter, ValueKind::Double).is_err());
///
/// assert_eq!(0, runtime.release(counter).unwrap());
/// assert!(!runtime.is_alive(counter));
/// ```
pub struct Runtime {
    config: RuntimeConfig,
    classes: ClassRegistry,
    objects: ObjectStore,
    error: Option<RuntimeError>,
}

impl Default for Runtime {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        let remaining = self.objects.len();

        if remaining > 0 {
            debug!(target: RUNTIME_LOG, "Runtime teardown: {remaining} objects alive.");
        }

        for object in self.objects.ids() {
            let Some(block) = self.objects.remove(object) else {
                continue;
            };

            self.destroy(block);
        }
    }
}

impl Runtime {
    /// Creates a Runtime with the default configuration.
    #[inline(always)]
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::new())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            config,
            classes: ClassRegistry::default(),
            objects: ObjectStore::with_capacity(config.object_capacity),
            error: None,
        }
    }

    #[inline(always)]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Registers a class.
    ///
    /// Class names are case-insensitive. Returns
    /// [RuntimeError::DuplicateClass] if the name is already taken.
    pub fn register(&mut self, declaration: ClassDeclaration) -> RuntimeResult<ClassId> {
        let id = self.classes.register(declaration)?;

        if let Some(entry) = self.classes.get(id) {
            debug!(
                target: RUNTIME_LOG,
                "Class {} registered as {id} ({}).",
                entry.name(),
                entry.handlers().type_name(),
            );
        }

        Ok(id)
    }

    /// Registers a class backed by the native type `T` with the `methods`.
    ///
    /// The class binds `T`'s handler table: the create, clone, destroy,
    /// cast and compare callbacks reflect the capabilities `T` implements.
    #[inline]
    pub fn register_class<T: NativeClass>(
        &mut self,
        name: &str,
        methods: impl IntoIterator<Item = MethodEntry>,
    ) -> RuntimeResult<ClassId> {
        self.register(ClassDeclaration::new::<T>(name).methods(methods))
    }

    #[inline(always)]
    pub fn class(&self, class: ClassId) -> Option<&ClassEntry> {
        self.classes.get(class)
    }

    /// Looks up a class by its case-insensitive name.
    pub fn class_by_name(&self, name: &str) -> RuntimeResult<ClassId> {
        if let Some(id) = self.classes.lookup(name) {
            return Ok(id);
        }

        let suggestion = match self.config.suggest_names {
            true => self.classes.suggest(name),
            false => None,
        };

        Err(RuntimeError::UnknownClass {
            name: CompactString::from(name),
            suggestion,
        })
    }

    /// Returns the class of a live object.
    pub fn class_of(&self, object: ObjectRef) -> RuntimeResult<&ClassEntry> {
        let class = self.header(object)?.class();

        self.classes.get(class).ok_or(RuntimeError::DanglingObject { object })
    }

    #[inline(always)]
    pub fn classes_count(&self) -> usize {
        self.classes.len()
    }

    /// Sets the pending error.
    ///
    /// If an error is already pending, the new error is discarded.
    pub fn raise(&mut self, error: RuntimeError) {
        if let Some(pending) = &self.error {
            warn!(target: RUNTIME_LOG, "Error \"{error}\" discarded: \"{pending}\" is pending.");
            return;
        }

        self.error = Some(error);
    }

    /// Takes the pending error out of the Runtime.
    #[inline(always)]
    pub fn take_error(&mut self) -> Option<RuntimeError> {
        self.error.take()
    }

    #[inline(always)]
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Creates a new object of the class.
    ///
    /// If the class' native type refuses the construction, the allocated
    /// header-only object is released right away and the refusal is
    /// returned as an error. Errors that were pending before the call stay
    /// pending.
    pub fn instantiate(&mut self, class: ClassId) -> RuntimeResult<ObjectRef> {
        let Some(entry) = self.classes.get(class) else {
            return Err(RuntimeError::UnknownClass {
                name: CompactString::from(class.to_string()),
                suggestion: None,
            });
        };

        let create = entry.handlers().create();

        let pending = self.error.take();
        let object = create(self, class);
        let raised = replace(&mut self.error, pending);

        if let Some(error) = raised {
            let _ = self.release(object);

            return Err(error);
        }

        Ok(object)
    }

    #[inline]
    pub fn instantiate_by_name(&mut self, name: &str) -> RuntimeResult<ObjectRef> {
        let class = self.class_by_name(name)?;

        self.instantiate(class)
    }

    /// Creates an independent copy of the object.
    ///
    /// Returns [RuntimeError::CloneRefused] if the object's native type is
    /// not clonable.
    pub fn clone_object(&mut self, object: ObjectRef) -> RuntimeResult<ObjectRef> {
        let handlers = self.handlers(object)?;

        let Some(clone) = handlers.clone_fn() else {
            let class = self.object_class_name(object);

            warn!(target: RUNTIME_LOG, "Clone of {class} {object} refused.");

            return Err(RuntimeError::CloneRefused { class });
        };

        clone(self, object)
    }

    /// Takes a new reference to the object.
    ///
    /// Returns the updated reference count.
    pub fn add_ref(&mut self, object: ObjectRef) -> RuntimeResult<usize> {
        let block = self
            .objects
            .get_mut(object)
            .ok_or(RuntimeError::DanglingObject { object })?;

        Ok(block.header_mut().retain())
    }

    /// Gives a reference to the object back.
    ///
    /// When the last reference is released, the object is destroyed and its
    /// handles become stale. Returns the updated reference count.
    pub fn release(&mut self, object: ObjectRef) -> RuntimeResult<usize> {
        let block = self
            .objects
            .get_mut(object)
            .ok_or(RuntimeError::DanglingObject { object })?;

        let count = block.header_mut().unretain();

        if count > 0 {
            return Ok(count);
        }

        if let Some(block) = self.objects.remove(object) {
            self.destroy(block);
        }

        Ok(0)
    }

    /// Releases the object the `value` refers to, if any.
    #[inline]
    pub fn release_value(&mut self, value: Value) {
        if let Value::Object(object) = value {
            let _ = self.release(object);
        }
    }

    #[inline]
    pub fn ref_count(&self, object: ObjectRef) -> Option<usize> {
        Some(self.objects.get(object)?.header().ref_count())
    }

    #[inline(always)]
    pub fn is_alive(&self, object: ObjectRef) -> bool {
        self.objects.get(object).is_some()
    }

    /// Returns the number of objects that are not destroyed yet.
    #[inline(always)]
    pub fn live_objects(&self) -> usize {
        self.objects.len()
    }

    /// Converts the object into a Value of the `target` kind.
    ///
    /// On success, the kind of the returned Value is `target`. Casting into
    /// [Object](ValueKind::Object) returns the same handle and takes a new
    /// reference to the object.
    pub fn cast(&mut self, object: ObjectRef, target: ValueKind) -> RuntimeResult<Value> {
        let cast = self.handlers(object)?.cast();

        match cast(self, object, target) {
            Some(value) => Ok(value),

            None => {
                let class = self.object_class_name(object);

                warn!(target: RUNTIME_LOG, "Cast of {class} {object} to {target} unsupported.");

                Err(RuntimeError::CastUnsupported { class, target })
            }
        }
    }

    /// Compares two values, at least one of which is expected to be an
    /// object.
    ///
    /// Returns [RuntimeError::CompareUnsupported] if neither operand can
    /// compare itself with the other one, and
    /// [RuntimeError::BorrowConflict] if an operand's payload is currently
    /// borrowed mutably.
    pub fn compare(&self, lhs: &Value, rhs: &Value) -> RuntimeResult<Ordering> {
        if let Some(ordering) = self.compare_values(lhs, rhs)?.ordering() {
            return Ok(ordering);
        }

        let lhs = self.operand_name(lhs);
        let rhs = self.operand_name(rhs);

        warn!(target: RUNTIME_LOG, "Comparison of {lhs} and {rhs} unsupported.");

        Err(RuntimeError::CompareUnsupported { lhs, rhs })
    }

    /// Compares two values through the handler tables of the object
    /// operands.
    ///
    /// The left-hand object's table is consulted first. If it fails and the
    /// right-hand operand is an object of another type, that type's table is
    /// consulted too.
    pub fn compare_values(&self, lhs: &Value, rhs: &Value) -> RuntimeResult<Comparison> {
        let lhs_handlers = lhs.as_object().and_then(|object| self.handlers_of(object));
        let rhs_handlers = rhs.as_object().and_then(|object| self.handlers_of(object));

        match (lhs_handlers, rhs_handlers) {
            (Some(lhs_handlers), Some(rhs_handlers)) => {
                let comparison = (lhs_handlers.compare())(self, lhs, rhs)?;

                if comparison.success || lhs_handlers.is(rhs_handlers) {
                    return Ok(comparison);
                }

                (rhs_handlers.compare())(self, lhs, rhs)
            }

            (Some(handlers), None) | (None, Some(handlers)) => (handlers.compare())(self, lhs, rhs),

            (None, None) => Ok(Comparison::failure()),
        }
    }

    /// Borrows the native payload of the object.
    ///
    /// Fails if the object is not a constructed instance of `T`, or if the
    /// payload is currently borrowed mutably.
    pub fn payload<T: NativeClass>(&self, object: ObjectRef) -> RuntimeResult<Ref<'_, T>> {
        let block = self.block::<T>(object)?;

        let payload = block
            .payload()
            .try_borrow()
            .map_err(|_| RuntimeError::BorrowConflict { object })?;

        Ref::filter_map(payload, Option::as_ref).map_err(|_| RuntimeError::NotAnInstance {
            object,
            expected: T::type_name(),
        })
    }

    /// Borrows the native payload of the object mutably.
    ///
    /// Fails if the object is not a constructed instance of `T`, or if the
    /// payload is currently borrowed.
    pub fn payload_mut<T: NativeClass>(&self, object: ObjectRef) -> RuntimeResult<RefMut<'_, T>> {
        let block = self.block::<T>(object)?;

        let payload = block
            .payload()
            .try_borrow_mut()
            .map_err(|_| RuntimeError::BorrowConflict { object })?;

        RefMut::filter_map(payload, Option::as_mut).map_err(|_| RuntimeError::NotAnInstance {
            object,
            expected: T::type_name(),
        })
    }

    /// Returns the handler table the object is bound to.
    #[inline]
    pub fn handlers_of(&self, object: ObjectRef) -> Option<&'static HandlerTable> {
        Some(self.objects.get(object)?.header().handlers())
    }

    /// Returns a property of the object.
    ///
    /// Returns None if the object's class does not declare the property.
    pub fn property(&self, object: ObjectRef, name: &str) -> RuntimeResult<Option<&Value>> {
        let Some(index) = self.class_of(object)?.property_index(name) else {
            return Ok(None);
        };

        Ok(self.header(object)?.properties().get(index))
    }

    /// Replaces a property of the object.
    ///
    /// The object takes over the reference the caller owns, if `value` is
    /// an object. The previous value is released. Returns false (and
    /// releases `value`) if the object's class does not declare the
    /// property.
    pub fn set_property(
        &mut self,
        object: ObjectRef,
        name: &str,
        value: impl Into<Value>,
    ) -> RuntimeResult<bool> {
        let value = value.into();

        let index = match self.class_of(object).map(|class| class.property_index(name)) {
            Ok(index) => index,

            Err(error) => {
                self.release_value(value);
                return Err(error);
            }
        };

        let Some(index) = index else {
            self.release_value(value);
            return Ok(false);
        };

        let previous = match self.objects.get_mut(object) {
            Some(block) => block
                .header_mut()
                .properties_mut()
                .get_mut(index)
                .map(|slot| replace(slot, value)),

            None => None,
        };

        if let Some(previous) = previous {
            self.release_value(previous);
        }

        Ok(true)
    }

    /// Invokes a method of the object's class on the object.
    ///
    /// Static methods are invoked without the object.
    pub fn invoke(&mut self, object: ObjectRef, name: &str, args: &mut Args) -> RuntimeResult<Value> {
        let method = self.method(self.class_of(object)?, name)?;

        match method.kind() {
            MethodKind::Instance(method) => method(self, object, args),
            MethodKind::Class(method) => method(self, args),
        }
    }

    /// Invokes a static method of the class.
    pub fn invoke_static(&mut self, class: ClassId, name: &str, args: &mut Args) -> RuntimeResult<Value> {
        let Some(entry) = self.classes.get(class) else {
            return Err(RuntimeError::UnknownClass {
                name: CompactString::from(class.to_string()),
                suggestion: None,
            });
        };

        let method = self.method(entry, name)?;

        match method.kind() {
            MethodKind::Instance(_) => Err(RuntimeError::InstanceRequired {
                class: CompactString::from(entry.name()),
                method: CompactString::from(method.name()),
            }),

            MethodKind::Class(method) => method(self, args),
        }
    }

    pub(crate) fn allocate<T: 'static>(
        &mut self,
        class: ClassId,
        handlers: &'static HandlerTable,
        payload: Option<T>,
        properties: Option<Vec<Value>>,
    ) -> ObjectRef {
        let properties = match properties {
            Some(properties) => properties,

            None => self
                .classes
                .get(class)
                .map(ClassEntry::property_defaults)
                .unwrap_or_default(),
        };

        self.objects.insert_with(|id| {
            let block: ObjectBox = Box::new(ObjectBlock::new(
                ObjectHeader::new(id, class, handlers, properties),
                payload,
            ));

            block
        })
    }

    #[inline]
    pub(crate) fn header(&self, object: ObjectRef) -> RuntimeResult<&ObjectHeader> {
        match self.objects.get(object) {
            Some(block) => Ok(block.header()),
            None => Err(RuntimeError::DanglingObject { object }),
        }
    }

    pub(crate) fn class_name(&self, class: ClassId) -> CompactString {
        match self.classes.get(class) {
            Some(entry) => CompactString::from(entry.name()),
            None => CompactString::from(class.to_string()),
        }
    }

    #[inline]
    fn handlers(&self, object: ObjectRef) -> RuntimeResult<&'static HandlerTable> {
        self.handlers_of(object)
            .ok_or(RuntimeError::DanglingObject { object })
    }

    fn block<T: NativeClass>(&self, object: ObjectRef) -> RuntimeResult<&ObjectBlock<T>> {
        let block = self
            .objects
            .get(object)
            .ok_or(RuntimeError::DanglingObject { object })?;

        block
            .as_any()
            .downcast_ref::<ObjectBlock<T>>()
            .ok_or(RuntimeError::NotAnInstance {
                object,
                expected: T::type_name(),
            })
    }

    fn method(&self, class: &ClassEntry, name: &str) -> RuntimeResult<MethodEntry> {
        if let Some(method) = class.method(name) {
            return Ok(method.clone());
        }

        let suggestion = match self.config.suggest_names {
            true => class.suggest_method(name),
            false => None,
        };

        Err(RuntimeError::UnknownMethod {
            class: CompactString::from(class.name()),
            method: CompactString::from(name),
            suggestion,
        })
    }

    fn object_class_name(&self, object: ObjectRef) -> CompactString {
        match self.header(object) {
            Ok(header) => self.class_name(header.class()),
            Err(_) => CompactString::from(ValueKind::Object.name()),
        }
    }

    fn operand_name(&self, value: &Value) -> CompactString {
        match value.as_object() {
            Some(object) => self.object_class_name(object),
            None => CompactString::from(value.kind().name()),
        }
    }

    fn destroy(&mut self, block: ObjectBox) {
        let destroy = block.header().handlers().destroy();

        destroy(self, block);
    }
}
