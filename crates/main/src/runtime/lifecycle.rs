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

use std::mem::take;

use log::{trace, warn};

use crate::runtime::{
    ClassId,
    NativeClass,
    ObjectBox,
    ObjectRef,
    Runtime,
    RuntimeError,
    RuntimeResult,
    Value,
    RUNTIME_LOG,
    STANDARD_HANDLERS,
};

/// Allocates an object of the class with the default payload of `T`.
pub(crate) fn create_object<T: NativeClass + Default>(
    runtime: &mut Runtime,
    class: ClassId,
) -> ObjectRef {
    let object = runtime.allocate(class, T::handlers(), Some(T::default()), None);

    if runtime.config().trace_lifecycle {
        trace!(target: RUNTIME_LOG, "{} {object} created.", T::type_name());
    }

    object
}

/// Raises [RuntimeError::ConstructionRefused] and allocates a header-only
/// object bound to the [STANDARD_HANDLERS].
pub(crate) fn refuse_construction(runtime: &mut Runtime, class: ClassId) -> ObjectRef {
    let name = runtime.class_name(class);

    warn!(target: RUNTIME_LOG, "Construction of {name} refused.");

    runtime.raise(RuntimeError::ConstructionRefused { class: name });

    runtime.allocate::<()>(class, &STANDARD_HANDLERS, None, None)
}

/// Allocates an object of the source object's class with a copy of the
/// source payload and the source properties.
pub(crate) fn clone_object<T: NativeClass + Clone>(
    runtime: &mut Runtime,
    source: ObjectRef,
) -> RuntimeResult<ObjectRef> {
    let payload = T::clone(&*runtime.payload::<T>(source)?);

    let (class, properties) = {
        let header = runtime.header(source)?;

        (header.class(), header.properties().to_vec())
    };

    for property in &properties {
        if let Value::Object(object) = property {
            runtime.add_ref(*object)?;
        }
    }

    let object = runtime.allocate(class, T::handlers(), Some(payload), Some(properties));

    if runtime.config().trace_lifecycle {
        trace!(target: RUNTIME_LOG, "{} {source} cloned into {object}.", T::type_name());
    }

    Ok(object)
}

/// Drops the payload of `T`, then releases the host bookkeeping of the
/// object.
pub(crate) fn destroy_object<T: NativeClass>(runtime: &mut Runtime, mut object: ObjectBox) {
    let destructed = object.destruct();

    if destructed && runtime.config().trace_lifecycle {
        trace!(
            target: RUNTIME_LOG,
            "{} {} destroyed.",
            T::type_name(),
            object.header().id(),
        );
    }

    release_properties(runtime, &mut object);
}

/// Releases the host bookkeeping of an object without a payload.
pub(crate) fn destroy_standard(runtime: &mut Runtime, mut object: ObjectBox) {
    if runtime.config().trace_lifecycle {
        trace!(target: RUNTIME_LOG, "Object {} released.", object.header().id());
    }

    release_properties(runtime, &mut object);
}

fn release_properties(runtime: &mut Runtime, object: &mut ObjectBox) {
    let properties = take(object.header_mut().properties_mut());

    for property in properties {
        runtime.release_value(property);
    }
}
