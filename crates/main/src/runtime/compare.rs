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

use std::cmp::Ordering;

use crate::runtime::{NativeClass, Nil, ObjectRef, Runtime, RuntimeResult, Value};

/// An outcome of the three-way comparison of two operands.
///
/// When [success](Self::success) is false, the [result](Self::result) is
/// [Equal](Ordering::Equal) and carries no meaning.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Comparison {
    /// How the left-hand operand relates to the right-hand operand.
    pub result: Ordering,

    /// Whether the operands are comparable.
    pub success: bool,
}

impl Comparison {
    #[inline(always)]
    pub const fn success(result: Ordering) -> Self {
        Self {
            result,
            success: true,
        }
    }

    #[inline(always)]
    pub const fn failure() -> Self {
        Self {
            result: Ordering::Equal,
            success: false,
        }
    }

    /// Returns the comparison of the swapped operands.
    ///
    /// A failed comparison stays failed.
    #[inline(always)]
    pub fn reverse(self) -> Self {
        match self.success {
            true => Self::success(self.result.reverse()),
            false => self,
        }
    }

    /// Returns the ordering if the comparison succeeded.
    #[inline(always)]
    pub fn ordering(self) -> Option<Ordering> {
        match self.success {
            true => Some(self.result),
            false => None,
        }
    }
}

/// Compares two operands, at least one of which is expected to be an
/// instance of `T`.
///
/// If the left-hand operand is not an instance of `T`, the operands are
/// swapped once, and the successful result is reversed.
///
/// A payload that cannot be borrowed is an error rather than a failed
/// comparison.
pub(crate) fn compare_objects<T: NativeClass>(
    runtime: &Runtime,
    lhs: &Value,
    rhs: &Value,
) -> RuntimeResult<Comparison> {
    if let Some(object) = instance_of::<T>(runtime, lhs) {
        return compare_canonical::<T>(runtime, object, rhs);
    }

    if let Some(object) = instance_of::<T>(runtime, rhs) {
        return Ok(compare_canonical::<T>(runtime, object, lhs)?.reverse());
    }

    Ok(Comparison::failure())
}

/// Compares objects without a payload.
pub(crate) fn compare_standard(
    _runtime: &Runtime,
    _lhs: &Value,
    _rhs: &Value,
) -> RuntimeResult<Comparison> {
    Ok(Comparison::failure())
}

fn instance_of<T: NativeClass>(runtime: &Runtime, value: &Value) -> Option<ObjectRef> {
    let object = value.as_object()?;

    match runtime.handlers_of(object)?.is(T::handlers()) {
        true => Some(object),
        false => None,
    }
}

fn compare_canonical<T: NativeClass>(
    runtime: &Runtime,
    this: ObjectRef,
    other: &Value,
) -> RuntimeResult<Comparison> {
    let capabilities = T::capabilities();

    let payload = runtime.payload::<T>(this)?;
    let payload = &*payload;

    if let (Some(compare), Some(other)) = (capabilities.compare_same, instance_of::<T>(runtime, other)) {
        let other = runtime.payload::<T>(other)?;

        return Ok(Comparison::success(compare(payload, &*other)));
    }

    let result = match other {
        Value::Undef | Value::Null => capabilities.compare_nil.map(|compare| compare(payload, &Nil)),
        Value::Bool(other) => capabilities.compare_bool.map(|compare| compare(payload, other)),
        Value::Integer(other) => capabilities.compare_integer.map(|compare| compare(payload, other)),
        Value::Double(other) => capabilities.compare_double.map(|compare| compare(payload, other)),
        Value::Text(other) => capabilities.compare_text.map(|compare| compare(payload, other)),
        Value::Collection(other) => capabilities.compare_collection.map(|compare| compare(payload, other)),
        Value::Object(other) => capabilities.compare_object.map(|compare| compare(payload, other)),
        Value::Resource(other) => capabilities.compare_resource.map(|compare| compare(payload, other)),
    };

    if let Some(result) = result {
        return Ok(Comparison::success(result));
    }

    if let Some(compare) = capabilities.compare_value {
        return Ok(Comparison::success(compare(payload, other)));
    }

    Ok(Comparison::failure())
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use crate::runtime::Comparison;

    #[test]
    fn test_reverse() {
        assert_eq!(
            Comparison::success(Ordering::Greater),
            Comparison::success(Ordering::Less).reverse(),
        );
        assert_eq!(Comparison::failure(), Comparison::failure().reverse());
        assert_eq!(None, Comparison::failure().ordering());
        assert_eq!(Some(Ordering::Equal), Comparison::success(Ordering::Equal).ordering());
    }
}
