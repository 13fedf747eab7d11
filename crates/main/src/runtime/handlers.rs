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

use std::fmt::{Debug, Formatter};

use crate::runtime::{
    cast::{cast_object, cast_standard},
    compare::{compare_objects, compare_standard},
    lifecycle::{destroy_object, destroy_standard, refuse_construction},
    Capabilities,
    ClassId,
    Comparison,
    ObjectBox,
    ObjectRef,
    Runtime,
    RuntimeResult,
    Value,
    ValueKind,
};

/// Creates a new object of the class.
///
/// The function always returns a handle of a newly allocated object. If the
/// construction is refused, the function raises the error through
/// [Runtime::raise] and returns a header-only object bound to the
/// [STANDARD_HANDLERS].
pub type CreateFn = fn(runtime: &mut Runtime, class: ClassId) -> ObjectRef;

/// Creates an independent copy of the object.
pub type CloneFn = fn(runtime: &mut Runtime, source: ObjectRef) -> RuntimeResult<ObjectRef>;

/// Destroys an object that has been detached from the runtime's object
/// store.
pub type DestroyFn = fn(runtime: &mut Runtime, object: ObjectBox);

/// Converts the object into a Value of the requested kind.
///
/// Returns None if the conversion is not supported.
pub type CastFn = fn(runtime: &mut Runtime, object: ObjectRef, target: ValueKind) -> Option<Value>;

/// Compares two operands, at least one of which is an object bound to the
/// table that provides this function.
///
/// Fails if a payload involved in the comparison cannot be borrowed.
pub type CompareFn = fn(runtime: &Runtime, lhs: &Value, rhs: &Value) -> RuntimeResult<Comparison>;

/// A fixed set of the host runtime callbacks of a native type.
///
/// The runtime invokes these functions when the script code creates,
/// copies, destroys, converts or compares the objects bound to the table.
///
/// Each exported type has exactly one table instance, initialized lazily on
/// first use and immutable afterwards (see [NativeClass::handlers]). The
/// object's identity as an instance of the type is the identity of the table
/// it is bound to.
pub struct HandlerTable {
    type_name: &'static str,
    create: CreateFn,
    clone: Option<CloneFn>,
    destroy: DestroyFn,
    cast: CastFn,
    compare: CompareFn,
}

impl Debug for HandlerTable {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("HandlerTable")
            .field("type_name", &self.type_name)
            .field("clone", &self.clone.is_some())
            .finish_non_exhaustive()
    }
}

/// The handler table of the objects that have no native payload.
///
/// Destruction of such objects releases the host bookkeeping only. Casts
/// succeed for the trivially convertible kinds only, and comparisons always
/// fail.
pub static STANDARD_HANDLERS: HandlerTable = HandlerTable {
    type_name: "object",
    create: refuse_construction,
    clone: None,
    destroy: destroy_standard,
    cast: cast_standard,
    compare: compare_standard,
};

impl HandlerTable {
    /// Builds a handler table of the native type `T` from its detected
    /// [capabilities](NativeClass::capabilities).
    ///
    /// The clone entry is present only if the type is [Clone]. If the type
    /// is not [Default], the create entry refuses the construction.
    pub fn new<T: NativeClass>() -> Self {
        let capabilities = T::capabilities();

        Self {
            type_name: T::type_name(),
            create: capabilities.create.unwrap_or(refuse_construction),
            clone: capabilities.clone,
            destroy: destroy_object::<T>,
            cast: cast_object::<T>,
            compare: compare_objects::<T>,
        }
    }

    /// The name of the native type this table belongs to.
    #[inline(always)]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline(always)]
    pub fn create(&self) -> CreateFn {
        self.create
    }

    /// Returns None if the native type is not clonable.
    #[inline(always)]
    pub fn clone_fn(&self) -> Option<CloneFn> {
        self.clone
    }

    #[inline(always)]
    pub fn destroy(&self) -> DestroyFn {
        self.destroy
    }

    #[inline(always)]
    pub fn cast(&self) -> CastFn {
        self.cast
    }

    #[inline(always)]
    pub fn compare(&self) -> CompareFn {
        self.compare
    }

    /// Returns true if `self` and `other` are the same table instance.
    #[inline(always)]
    pub fn is(&self, other: &HandlerTable) -> bool {
        std::ptr::eq(self, other)
    }
}

/// A native type adapted to the host runtime.
///
/// Normally, this trait is implemented by the [export](crate::export)
/// attribute macro, which detects the type's capabilities at the type's
/// definition site:
///
/// ```
/// # use bindery::{export, runtime::{ops::ToInteger, Integer, NativeClass}};
/// #[export]
/// #[derive(Default)]
/// struct Counter {
///     value: Integer,
/// }
///
/// impl ToInteger for Counter {
///     fn to_integer(&self) -> Integer {
///         self.value
///     }
/// }
///
/// let capabilities = Counter::capabilities();
///
/// assert!(capabilities.create.is_some());
/// assert!(capabilities.clone.is_none());
/// assert!(capabilities.to_integer.is_some());
/// assert!(capabilities.to_double.is_none());
/// ```
pub trait NativeClass: Sized + 'static {
    /// The name of the native type.
    fn type_name() -> &'static str;

    /// The set of the optional capabilities the type implements.
    fn capabilities() -> Capabilities<Self>;

    /// The type's handler table.
    ///
    /// The function returns the same table instance on every call.
    fn handlers() -> &'static HandlerTable;
}
