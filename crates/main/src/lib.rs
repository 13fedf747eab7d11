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

//! Bindery exposes native Rust types as classes of a dynamically typed host
//! object runtime.
//!
//! See the [runtime] module for the adapter API and the [export] macro for
//! the capability detection.

extern crate self as bindery;

/// Adapts a Rust struct or enum to the host object runtime.
///
/// The macro implements [NativeClass](runtime::NativeClass) for the type.
/// At the type's definition site it detects which of the optional
/// capabilities the type implements: [Default], [Clone], and the traits from
/// the [ops](runtime::ops) module (each [Compare](runtime::ops::Compare)
/// operand type separately). The detected capabilities are wired into the
/// type's [HandlerTable](runtime::HandlerTable); the missing ones turn into
/// clean "unsupported" outcomes of the corresponding runtime operations.
///
/// The class name reported by the handler table defaults to the type's name
/// and can be overridden with the `name` option:
///
/// ```
/// # use bindery::{export, runtime::NativeClass};
/// #[export(name "Vector2")]
/// #[derive(Default, Clone)]
/// struct Vec2 {
///     x: f64,
///     y: f64,
/// }
///
/// assert_eq!("Vector2", Vec2::type_name());
/// assert!(Vec2::handlers().clone_fn().is_some());
/// ```
///
/// Generic types cannot be exported.
pub use bindery_export::export;

mod report;
pub mod runtime;
