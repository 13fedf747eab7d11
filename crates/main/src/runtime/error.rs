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
    error::Error as StdError,
    fmt::{Debug, Display, Formatter},
    result::Result as StdResult,
};

use compact_str::CompactString;

use crate::runtime::{ObjectRef, ValueKind};

/// A result of a runtime API call, which can either be a normal value or a
/// [RuntimeError].
pub type RuntimeResult<T> = StdResult<T, RuntimeError>;

/// A helper trait for the [RuntimeResult] object.
///
/// This trait is automatically implemented for RuntimeResult and provides the
/// [expect_blame](Self::expect_blame) function, which either unwraps the
/// underlying value or panics at the caller's location with the error
/// description.
pub trait RuntimeResultExt {
    /// The [Ok] type of the underlying [Result].
    type OkType;

    /// If the result is [Ok], returns the underlying data; otherwise, panics
    /// with the `message` followed by the RuntimeError description.
    fn expect_blame(self, message: &str) -> Self::OkType;
}

impl<T> RuntimeResultExt for RuntimeResult<T> {
    type OkType = T;

    #[inline(always)]
    #[track_caller]
    fn expect_blame(self, message: &str) -> Self::OkType {
        match self {
            Ok(ok) => ok,
            Err(error) => panic!("{message}\n{error}"),
        }
    }
}

/// Represents any error that may occur when the host runtime operates on the
/// adapted native objects.
///
/// The Display implementation provides a brief user-facing description of
/// the error, in the form the host reports to the script code.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum RuntimeError {
    /// The class' native type does not implement [Default], so the host
    /// cannot create its instances directly.
    ConstructionRefused {
        /// The name of the class.
        class: CompactString,
    },

    /// The class' native type does not implement [Clone].
    CloneRefused {
        /// The name of the class.
        class: CompactString,
    },

    /// The object's native type does not implement the conversion into the
    /// requested kind, or the kind is never castable from an object.
    CastUnsupported {
        /// The name of the object's class.
        class: CompactString,

        /// The requested kind of the result.
        target: ValueKind,
    },

    /// Neither operand of a comparison provides a comparison that accepts
    /// the other operand.
    CompareUnsupported {
        /// The class name or the kind name of the left-hand operand.
        lhs: CompactString,

        /// The class name or the kind name of the right-hand operand.
        rhs: CompactString,
    },

    /// The requested class is not registered.
    UnknownClass {
        /// The requested name.
        name: CompactString,

        /// A registered class with the closest name, if any.
        suggestion: Option<CompactString>,
    },

    /// A class with the same name is already registered.
    DuplicateClass {
        /// The name of the class.
        name: CompactString,
    },

    /// The class does not have a method with the requested name.
    UnknownMethod {
        /// The name of the class.
        class: CompactString,

        /// The requested method name.
        method: CompactString,

        /// A method of the class with the closest name, if any.
        suggestion: Option<CompactString>,
    },

    /// An instance method has been invoked without an object.
    InstanceRequired {
        /// The name of the class.
        class: CompactString,

        /// The name of the method.
        method: CompactString,
    },

    /// The number of call arguments does not match the method's signature.
    ArityMismatch {
        /// The number of parameters the method accepts.
        expected: usize,

        /// The number of arguments provided.
        actual: usize,
    },

    /// A call argument cannot be interpreted as the expected native type.
    TypeMismatch {
        /// The zero-based index of the argument.
        index: usize,

        /// The user-facing name of the expected type.
        expected: &'static str,

        /// The kind of the provided value.
        actual: ValueKind,
    },

    /// The object handle refers to an object that has already been
    /// destroyed.
    DanglingObject {
        /// The stale handle.
        object: ObjectRef,
    },

    /// The object's payload is currently borrowed in a way that conflicts
    /// with the requested access.
    BorrowConflict {
        /// The handle of the object.
        object: ObjectRef,
    },

    /// The object is not an instance of the requested native type, or it
    /// has no constructed payload.
    NotAnInstance {
        /// The handle of the object.
        object: ObjectRef,

        /// The name of the requested native type.
        expected: &'static str,
    },
}

impl Display for RuntimeError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConstructionRefused { class } => {
                formatter.write_fmt(format_args!("{class} may not be directly instantiated"))
            }

            Self::CloneRefused { class } => {
                formatter.write_fmt(format_args!("trying to clone an uncloneable object of class {class}"))
            }

            Self::CastUnsupported { class, target } => formatter.write_fmt(format_args!(
                "object of class {class} could not be converted to {target}"
            )),

            Self::CompareUnsupported { lhs, rhs } => formatter.write_fmt(format_args!(
                "values are not comparable: {lhs} and {rhs}"
            )),

            Self::UnknownClass { name, suggestion } => {
                formatter.write_fmt(format_args!("class \"{name}\" not found"))?;

                if let Some(suggestion) = suggestion {
                    formatter.write_fmt(format_args!(", did you mean \"{suggestion}\"?"))?;
                }

                Ok(())
            }

            Self::DuplicateClass { name } => {
                formatter.write_fmt(format_args!("cannot declare class {name}, because the name is already in use"))
            }

            Self::UnknownMethod {
                class,
                method,
                suggestion,
            } => {
                formatter.write_fmt(format_args!("call to undefined method {class}::{method}()"))?;

                if let Some(suggestion) = suggestion {
                    formatter.write_fmt(format_args!(", did you mean {class}::{suggestion}()?"))?;
                }

                Ok(())
            }

            Self::InstanceRequired { class, method } => formatter.write_fmt(format_args!(
                "non-static method {class}::{method}() cannot be called statically"
            )),

            Self::ArityMismatch { expected, actual } => formatter.write_fmt(format_args!(
                "expected {expected} arguments, but {actual} provided"
            )),

            Self::TypeMismatch {
                index,
                expected,
                actual,
            } => formatter.write_fmt(format_args!(
                "argument #{} must be of type {expected}, {actual} given",
                index + 1,
            )),

            Self::DanglingObject { object } => {
                formatter.write_fmt(format_args!("object {object} no longer exists"))
            }

            Self::BorrowConflict { object } => formatter.write_fmt(format_args!(
                "object {object} is already in use"
            )),

            Self::NotAnInstance { object, expected } => formatter.write_fmt(format_args!(
                "object {object} is not an instance of {expected}"
            )),
        }
    }
}

impl StdError for RuntimeError {}

impl RuntimeError {
    /// Returns true if the error is a refusal of an operation that the
    /// object's native type does not support (as opposed to a misuse of the
    /// runtime API).
    #[inline]
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Self::ConstructionRefused { .. }
                | Self::CloneRefused { .. }
                | Self::CastUnsupported { .. }
                | Self::CompareUnsupported { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RuntimeError, RuntimeResult, RuntimeResultExt, ValueKind};

    #[test]
    fn test_error_messages() {
        let error = RuntimeError::ConstructionRefused {
            class: "Handle".into(),
        };

        assert_eq!("Handle may not be directly instantiated", error.to_string());
        assert!(error.is_unsupported());

        let error = RuntimeError::UnknownClass {
            name: "Countr".into(),
            suggestion: Some("Counter".into()),
        };

        assert_eq!(
            "class \"Countr\" not found, did you mean \"Counter\"?",
            error.to_string(),
        );
        assert!(!error.is_unsupported());

        let error = RuntimeError::TypeMismatch {
            index: 0,
            expected: "int",
            actual: ValueKind::Text,
        };

        assert_eq!("argument #1 must be of type int, string given", error.to_string());
    }

    #[test]
    #[should_panic(expected = "values are not comparable")]
    fn test_expect_blame() {
        let result: RuntimeResult<()> = Err(RuntimeError::CompareUnsupported {
            lhs: "Counter".into(),
            rhs: "int".into(),
        });

        result.expect_blame("comparison failure");
    }
}
