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

use crate::runtime::{
    Collection,
    Integer,
    ObjectRef,
    Resource,
    RuntimeError,
    RuntimeResult,
    Text,
    Value,
};

/// Arguments of a method call.
///
/// The object handles among the arguments are borrowed from the caller: the
/// callee does not own host references to them unless it explicitly
/// [retains](crate::runtime::Runtime::add_ref) them.
#[derive(Clone, Default, Debug)]
pub struct Args {
    values: Vec<Value>,
}

impl<V: Into<Value>> FromIterator<V> for Args {
    #[inline]
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Vec<Value>> for Args {
    #[inline(always)]
    fn from(values: Vec<Value>) -> Self {
        Self { values }
    }
}

impl Args {
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the raw argument value.
    #[inline(always)]
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    #[inline(always)]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns an error if the number of arguments is not `expected`.
    #[inline]
    pub fn expect_len(&self, expected: usize) -> RuntimeResult<()> {
        if self.values.len() != expected {
            return Err(RuntimeError::ArityMismatch {
                expected,
                actual: self.values.len(),
            });
        }

        Ok(())
    }

    /// Decodes the argument at `index` into the native type `T`.
    ///
    /// A missing argument is decoded as [Undef](Value::Undef), so optional
    /// trailing arguments can be read as `Option<T>`.
    pub fn get<T: FromArg>(&self, index: usize) -> RuntimeResult<T> {
        let value = self.values.get(index).unwrap_or(&Value::Undef);

        match T::from_arg(value) {
            Some(arg) => Ok(arg),

            None => Err(RuntimeError::TypeMismatch {
                index,
                expected: T::NAME,
                actual: value.kind(),
            }),
        }
    }

    /// Checks the number of arguments and decodes all of them.
    ///
    /// ```
    /// # use bindery::runtime::{Args, Integer, Text, Value};
    /// let args = [Value::Integer(3), Value::from("abc")].into_iter().collect::<Args>();
    ///
    /// let (count, text) = args.parse::<(Integer, Text)>().unwrap();
    ///
    /// assert_eq!(3, count);
    /// assert_eq!("abc", text.as_str());
    /// ```
    #[inline(always)]
    pub fn parse<T: ParseArgs>(&self) -> RuntimeResult<T> {
        T::parse(self)
    }
}

/// A native type that can be decoded from a call argument.
pub trait FromArg: Sized {
    /// The user-facing name of the type.
    const NAME: &'static str;

    /// Returns None if the `value` cannot be interpreted as this type.
    fn from_arg(value: &Value) -> Option<Self>;
}

impl FromArg for Value {
    const NAME: &'static str = "mixed";

    #[inline(always)]
    fn from_arg(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromArg for bool {
    const NAME: &'static str = "bool";

    #[inline(always)]
    fn from_arg(value: &Value) -> Option<Self> {
        value.read::<bool>().copied()
    }
}

impl FromArg for Integer {
    const NAME: &'static str = "int";

    #[inline]
    fn from_arg(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(value) => Some(*value),

            Value::Double(value) if value.fract() == 0.0 => cast::i64(*value).ok(),

            _ => None,
        }
    }
}

impl FromArg for f64 {
    const NAME: &'static str = "float";

    #[inline]
    fn from_arg(value: &Value) -> Option<Self> {
        match value {
            Value::Double(value) => Some(*value),
            Value::Integer(value) => Some(cast::f64(*value)),
            _ => None,
        }
    }
}

impl FromArg for Text {
    const NAME: &'static str = "string";

    #[inline(always)]
    fn from_arg(value: &Value) -> Option<Self> {
        value.read::<Text>().cloned()
    }
}

impl FromArg for Collection {
    const NAME: &'static str = "array";

    #[inline(always)]
    fn from_arg(value: &Value) -> Option<Self> {
        value.read::<Collection>().cloned()
    }
}

impl FromArg for ObjectRef {
    const NAME: &'static str = "object";

    #[inline(always)]
    fn from_arg(value: &Value) -> Option<Self> {
        value.as_object()
    }
}

impl FromArg for Resource {
    const NAME: &'static str = "resource";

    #[inline(always)]
    fn from_arg(value: &Value) -> Option<Self> {
        value.read::<Resource>().cloned()
    }
}

impl<T: FromArg> FromArg for Option<T> {
    const NAME: &'static str = T::NAME;

    #[inline]
    fn from_arg(value: &Value) -> Option<Self> {
        match value.is_nil() {
            true => Some(None),
            false => T::from_arg(value).map(Some),
        }
    }
}

/// A tuple of the native types that can be decoded from the full list of
/// the call arguments.
pub trait ParseArgs: Sized {
    fn parse(args: &Args) -> RuntimeResult<Self>;
}

impl ParseArgs for () {
    #[inline(always)]
    fn parse(args: &Args) -> RuntimeResult<Self> {
        args.expect_len(0)
    }
}

macro_rules! parse_tuple {
    ($($index:tt $param:ident),+) => {
        impl<$($param: FromArg),+> ParseArgs for ($($param,)+) {
            #[inline]
            fn parse(args: &Args) -> RuntimeResult<Self> {
                args.expect_len([$($index),+].len())?;

                Ok(($(args.get::<$param>($index)?,)+))
            }
        }
    };
}

parse_tuple!(0 A);
parse_tuple!(0 A, 1 B);
parse_tuple!(0 A, 1 B, 2 C);
parse_tuple!(0 A, 1 B, 2 C, 3 D);
parse_tuple!(0 A, 1 B, 2 C, 3 D, 4 E);
parse_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F);

#[cfg(test)]
mod tests {
    use crate::runtime::{Args, Integer, RuntimeError, Text, Value, ValueKind};

    #[test]
    fn test_numeric_coercion() {
        let args = [Value::Double(4.0), Value::Integer(7), Value::Double(1.5)]
            .into_iter()
            .collect::<Args>();

        assert_eq!(Ok(4), args.get::<Integer>(0));
        assert_eq!(Ok(7.0), args.get::<f64>(1));
        assert_eq!(
            Err(RuntimeError::TypeMismatch {
                index: 2,
                expected: "int",
                actual: ValueKind::Double,
            }),
            args.get::<Integer>(2),
        );
    }

    #[test]
    fn test_optional_trailing() {
        let args = [Value::from("name")].into_iter().collect::<Args>();

        assert_eq!(Ok(None), args.get::<Option<Integer>>(1));
        assert_eq!("name", args.get::<Text>(0).map(|text| text.to_string()).unwrap_or_default());
    }

    #[test]
    fn test_arity() {
        let args = [Value::Bool(true)].into_iter().collect::<Args>();

        assert_eq!(Ok((true,)), args.parse::<(bool,)>());
        assert_eq!(
            Err(RuntimeError::ArityMismatch {
                expected: 2,
                actual: 1,
            }),
            args.parse::<(bool, Integer)>(),
        );
    }
}
