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

use crate::runtime::{NativeClass, ObjectRef, Projection, Runtime, Value, ValueKind};

/// Converts an instance of `T` into a Value of the `target` kind.
///
/// The trivial kinds always succeed. Casting into an object yields a new
/// host reference to the same object. Resources are never produced. The
/// castable kinds are served by the type's conversion capabilities, if
/// implemented.
pub(crate) fn cast_object<T: NativeClass>(
    runtime: &mut Runtime,
    object: ObjectRef,
    target: ValueKind,
) -> Option<Value> {
    if let Some(value) = cast_trivial(runtime, object, target) {
        return Some(value);
    }

    let capabilities = T::capabilities();

    let payload = runtime.payload::<T>(object).ok()?;
    let payload = &*payload;

    let value = match target {
        ValueKind::Bool => (capabilities.to_bool?)(payload).into_value(),
        ValueKind::Integer => (capabilities.to_integer?)(payload).into_value(),
        ValueKind::Double => (capabilities.to_double?)(payload).into_value(),
        ValueKind::Text => (capabilities.to_text?)(payload).into_value(),
        ValueKind::Collection => (capabilities.to_collection?)(payload).into_value(),
        _ => return None,
    };

    Some(value)
}

/// Converts an object without a payload.
pub(crate) fn cast_standard(
    runtime: &mut Runtime,
    object: ObjectRef,
    target: ValueKind,
) -> Option<Value> {
    cast_trivial(runtime, object, target)
}

fn cast_trivial(runtime: &mut Runtime, object: ObjectRef, target: ValueKind) -> Option<Value> {
    match target {
        ValueKind::Undef => Some(Value::Undef),
        ValueKind::Null => Some(Value::Null),

        ValueKind::Object => {
            let _ = runtime.add_ref(object).ok()?;

            Some(Value::Object(object))
        }

        _ => None,
    }
}
