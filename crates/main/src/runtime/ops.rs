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

//! Optional capabilities a native type may implement to participate in the
//! host runtime's conversion and comparison protocols.
//!
//! None of these traits is required. The [export](crate::export) macro
//! detects at compile time which of them the exported type implements and
//! wires only those into the type's [HandlerTable](crate::runtime::HandlerTable).
//! A missing capability turns into a clean "unsupported" outcome of the
//! corresponding host operation.
//!
//! Construction and copying are expressed through the standard [Default] and
//! [Clone] traits. Destruction is the type's [Drop] glue.

use std::cmp::Ordering;

use crate::runtime::{Collection, Integer, Text};

/// Conversion of the object into the host's boolean value.
pub trait ToBool {
    fn to_bool(&self) -> bool;
}

/// Conversion of the object into the host's integer value.
pub trait ToInteger {
    fn to_integer(&self) -> Integer;
}

/// Conversion of the object into the host's floating-point value.
pub trait ToDouble {
    fn to_double(&self) -> f64;
}

/// Conversion of the object into the host's string value.
pub trait ToText {
    fn to_text(&self) -> Text;
}

/// Conversion of the object into the host's array value.
pub trait ToCollection {
    fn to_collection(&self) -> Collection;
}

/// A three-way comparison of the object with an operand of type `Rhs`.
///
/// The result is "how `self` relates to `rhs`". The runtime derives the
/// reversed relation on its own when the object appears as the right-hand
/// operand of a host comparison, so implementors should not implement the
/// mirrored comparison on the operand type.
///
/// Each `Rhs` is detected independently: implementing `Compare<Integer>`
/// does not make the type comparable with doubles. The supported operand
/// types are:
///
/// | Rhs                                     | Host operand                    |
/// |-----------------------------------------|---------------------------------|
/// | [Nil](crate::runtime::Nil)              | undef or null                   |
/// | [bool]                                  | boolean                         |
/// | [Integer]                               | integer                         |
/// | [f64]                                   | double                          |
/// | [Text]                                  | string                          |
/// | [Collection]                            | array                           |
/// | `Self`                                  | object of the same class        |
/// | [ObjectRef](crate::runtime::ObjectRef)  | any other object                |
/// | [Resource](crate::runtime::Resource)    | resource                        |
/// | [Value](crate::runtime::Value)          | any operand, as a fallback      |
///
/// `Compare<Self>` takes precedence over `Compare<ObjectRef>` when both
/// operands belong to the same class. `Compare<Value>` is consulted only
/// after the operand-specific comparison is missing.
pub trait Compare<Rhs: ?Sized = Self> {
    fn compare(&self, rhs: &Rhs) -> Ordering;
}
