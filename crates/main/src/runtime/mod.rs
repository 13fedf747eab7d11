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

//! The adapter between the native Rust types and the dynamic host object
//! runtime.
//!
//! A native type becomes a host class by implementing [NativeClass]
//! (normally through the [export](crate::export) macro) and being
//! [registered](Runtime::register_class) in the [Runtime]. The type takes
//! part in the host's object protocols by implementing the optional
//! capabilities from the [ops] module, along with the standard [Default] and
//! [Clone] traits.

mod args;
mod cast;
mod class;
mod compare;
mod config;
mod error;
mod handlers;
mod host;
mod lifecycle;
mod object;
mod value;

// This module is hidden.
//
// You should never use it directly, as its API is not part of the official
// public API of the crate.
#[doc(hidden)]
pub mod __intrinsics;

/// Optional capabilities of the exported types.
///
/// None of these traits is required. The [export](crate::export) macro
/// detects which of them the type implements, independently for each trait
/// and for each [Compare](ops::Compare) operand type.
///
/// ```
/// use std::cmp::Ordering;
///
/// use bindery::{
///     export,
///     runtime::{ops::Compare, Integer, Runtime, Value},
/// };
///
/// #[export]
/// #[derive(Default)]
/// struct Ordinal(Integer);
///
/// impl Compare<Integer> for Ordinal {
///     fn compare(&self, rhs: &Integer) -> Ordering {
///         self.0.cmp(rhs)
///     }
/// }
///
/// let mut runtime = Runtime::new();
///
/// let class = runtime.register_class::<Ordinal>("Ordinal", []).unwrap();
/// let ordinal = runtime.instantiate(class).unwrap();
///
/// runtime.payload_mut::<Ordinal>(ordinal).unwrap().0 = 5;
///
/// let ordinal = Value::Object(ordinal);
///
/// assert_eq!(Ordering::Greater, runtime.compare(&ordinal, &Value::Integer(3)).unwrap());
/// assert_eq!(Ordering::Less, runtime.compare(&Value::Integer(3), &ordinal).unwrap());
///
/// // Comparison with doubles is not implemented.
/// assert!(runtime.compare(&ordinal, &Value::Double(3.0)).is_err());
/// ```
pub mod ops;

pub use crate::runtime::{
    __intrinsics::Capabilities,
    args::{Args, FromArg, ParseArgs},
    class::{ClassDeclaration, ClassEntry, ClassId, MethodEntry},
    compare::Comparison,
    config::RuntimeConfig,
    error::{RuntimeError, RuntimeResult, RuntimeResultExt},
    handlers::{
        CastFn,
        CloneFn,
        CompareFn,
        CreateFn,
        DestroyFn,
        HandlerTable,
        NativeClass,
        STANDARD_HANDLERS,
    },
    host::Runtime,
    object::{Block, ObjectBlock, ObjectBox, ObjectHeader, ObjectRef},
    value::{Collection, Integer, Key, Nil, Projection, Resource, Text, Value, ValueKind},
};

/// The log target of the runtime's records.
pub static RUNTIME_LOG: &'static str = "bindery::runtime";
