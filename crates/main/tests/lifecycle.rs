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

use std::{cell::Cell, rc::Rc};

use bindery::{
    export,
    runtime::{
        Args,
        ClassDeclaration,
        Integer,
        MethodEntry,
        NativeClass,
        Runtime,
        RuntimeConfig,
        RuntimeError,
        Value,
        ValueKind,
        STANDARD_HANDLERS,
    },
};

thread_local! {
    static DROPS: Rc<Cell<usize>> = Rc::new(Cell::new(0));
}

fn drops() -> usize {
    DROPS.with(|drops| drops.get())
}

#[export]
#[derive(Default, Clone)]
struct Tracked {
    value: Integer,
}

impl Drop for Tracked {
    fn drop(&mut self) {
        DROPS.with(|drops| drops.set(drops.get() + 1));
    }
}

#[export]
struct Handle {
    #[allow(dead_code)]
    fd: Integer,
}

impl Drop for Handle {
    fn drop(&mut self) {
        panic!("An unconstructed payload must never be dropped.");
    }
}

#[export]
#[derive(Default)]
struct Counter {
    count: Integer,
}

#[test]
fn test_clone_independence() {
    let mut runtime = Runtime::new();

    let class = runtime.register_class::<Tracked>("Tracked", []).unwrap();

    let original = runtime.instantiate(class).unwrap();

    runtime.payload_mut::<Tracked>(original).unwrap().value = 10;

    let copy = runtime.clone_object(original).unwrap();

    assert_ne!(original, copy);
    assert_eq!(10, runtime.payload::<Tracked>(copy).unwrap().value);

    runtime.payload_mut::<Tracked>(copy).unwrap().value = 20;

    assert_eq!(10, runtime.payload::<Tracked>(original).unwrap().value);
    assert_eq!(20, runtime.payload::<Tracked>(copy).unwrap().value);
}

#[test]
fn test_destroy_exactly_once() {
    let before = drops();

    {
        let mut runtime = Runtime::new();

        let class = runtime.register_class::<Tracked>("Tracked", []).unwrap();

        let first = runtime.instantiate(class).unwrap();
        let second = runtime.instantiate(class).unwrap();
        let _third = runtime.clone_object(second).unwrap();

        assert_eq!(2, runtime.add_ref(first).unwrap());
        assert_eq!(1, runtime.release(first).unwrap());
        assert_eq!(before, drops());

        assert_eq!(0, runtime.release(first).unwrap());
        assert_eq!(before + 1, drops());
        assert!(!runtime.is_alive(first));

        assert_eq!(
            Err(RuntimeError::DanglingObject { object: first }),
            runtime.release(first),
        );
        assert_eq!(before + 1, drops());
        assert_eq!(2, runtime.live_objects());
    }

    assert_eq!(before + 3, drops());
}

#[test]
fn test_refused_construction() {
    let mut runtime = Runtime::new();

    let class = runtime.register_class::<Handle>("Handle", []).unwrap();

    assert!(Handle::capabilities().create.is_none());

    let result = runtime.instantiate(class);

    assert_eq!(
        Err(RuntimeError::ConstructionRefused {
            class: "Handle".into(),
        }),
        result,
    );
    assert_eq!(
        "Handle may not be directly instantiated",
        result.unwrap_err().to_string(),
    );

    assert_eq!(0, runtime.live_objects());
    assert!(!runtime.has_error());
}

#[test]
fn test_refused_construction_keeps_pending_error() {
    let mut runtime = Runtime::new();

    let class = runtime.register_class::<Handle>("Handle", []).unwrap();

    runtime.raise(RuntimeError::ArityMismatch {
        expected: 1,
        actual: 0,
    });

    assert!(runtime.instantiate(class).is_err());

    assert_eq!(
        Some(RuntimeError::ArityMismatch {
            expected: 1,
            actual: 0,
        }),
        runtime.take_error(),
    );
}

#[test]
fn test_clone_refused() {
    let mut runtime = Runtime::new();

    let class = runtime.register_class::<Counter>("Counter", []).unwrap();

    assert!(Counter::handlers().clone_fn().is_none());

    let counter = runtime.instantiate(class).unwrap();

    assert_eq!(
        Err(RuntimeError::CloneRefused {
            class: "Counter".into(),
        }),
        runtime.clone_object(counter),
    );
    assert_eq!(1, runtime.live_objects());
}

#[test]
fn test_handler_table_identity() {
    let mut runtime = Runtime::new();

    let first = runtime.register_class::<Counter>("Counter", []).unwrap();
    let second = runtime.register_class::<Counter>("Tally", []).unwrap();

    assert_eq!(2, runtime.classes_count());

    assert!(std::ptr::eq(Counter::handlers(), Counter::handlers()));
    assert!(!Counter::handlers().is(&STANDARD_HANDLERS));

    let first = runtime.instantiate(first).unwrap();
    let second = runtime.instantiate(second).unwrap();

    assert!(runtime.handlers_of(first).unwrap().is(runtime.handlers_of(second).unwrap()));
    assert_eq!("Counter", runtime.handlers_of(second).unwrap().type_name());
    assert_eq!("Tally", runtime.class_of(second).unwrap().name());
}

#[test]
fn test_duplicate_class() {
    let mut runtime = Runtime::new();

    let _ = runtime.register_class::<Counter>("Counter", []).unwrap();

    assert_eq!(
        Err(RuntimeError::DuplicateClass {
            name: "COUNTER".into(),
        }),
        runtime.register_class::<Tracked>("COUNTER", []),
    );
}

#[test]
fn test_class_lookup() {
    let mut runtime = Runtime::new();

    let class = runtime.register_class::<Counter>("Counter", []).unwrap();

    assert_eq!(Ok(class), runtime.class_by_name("counter"));

    assert_eq!(
        Err(RuntimeError::UnknownClass {
            name: "Countr".into(),
            suggestion: Some("Counter".into()),
        }),
        runtime.class_by_name("Countr"),
    );

    let mut config = RuntimeConfig::new();

    config.suggest_names = false;

    let mut runtime = Runtime::with_config(config);

    let _ = runtime.register_class::<Counter>("Counter", []).unwrap();

    assert_eq!(
        Err(RuntimeError::UnknownClass {
            name: "Countr".into(),
            suggestion: None,
        }),
        runtime.instantiate_by_name("Countr"),
    );
}

#[test]
fn test_methods() {
    let mut runtime = Runtime::new();

    let class = runtime
        .register(
            ClassDeclaration::new::<Counter>("Counter")
                .method(MethodEntry::instance::<Counter>("increment", |counter, args| {
                    let step = args.get::<Option<Integer>>(0)?.unwrap_or(1);

                    counter.count += step;

                    Ok(Value::Integer(counter.count))
                }))
                .method(MethodEntry::class_method("create", |runtime, _| {
                    let class = runtime.class_by_name("Counter")?;

                    Ok(Value::Object(runtime.instantiate(class)?))
                })),
        )
        .unwrap();

    let Value::Object(counter) = runtime
        .invoke_static(class, "create", &mut Args::new())
        .unwrap()
    else {
        panic!("Object expected.");
    };

    assert_eq!(
        Ok(Value::Integer(1)),
        runtime.invoke(counter, "Increment", &mut Args::new()),
    );

    let mut args = [Value::Integer(5)].into_iter().collect::<Args>();

    assert_eq!(Ok(Value::Integer(6)), runtime.invoke(counter, "increment", &mut args));

    let mut args = [Value::from("five")].into_iter().collect::<Args>();

    assert_eq!(
        Err(RuntimeError::TypeMismatch {
            index: 0,
            expected: "int",
            actual: ValueKind::Text,
        }),
        runtime.invoke(counter, "increment", &mut args),
    );

    assert_eq!(
        Err(RuntimeError::UnknownMethod {
            class: "Counter".into(),
            method: "incremnt".into(),
            suggestion: Some("increment".into()),
        }),
        runtime.invoke(counter, "incremnt", &mut Args::new()),
    );

    assert_eq!(
        Err(RuntimeError::InstanceRequired {
            class: "Counter".into(),
            method: "increment".into(),
        }),
        runtime.invoke_static(class, "increment", &mut Args::new()),
    );
}

#[test]
fn test_properties() {
    let mut runtime = Runtime::new();

    let tracked = runtime.register_class::<Tracked>("Tracked", []).unwrap();

    let holder = runtime
        .register(
            ClassDeclaration::new::<Counter>("Holder")
                .property("label", "none")
                .property("item", Value::Null),
        )
        .unwrap();

    assert_eq!(
        vec!["label", "item"],
        runtime
            .class(holder)
            .unwrap()
            .property_names()
            .collect::<Vec<_>>(),
    );

    let holder = runtime.instantiate(holder).unwrap();
    let item = runtime.instantiate(tracked).unwrap();

    assert_eq!(Ok(Some(&Value::from("none"))), runtime.property(holder, "label"));
    assert_eq!(Ok(None), runtime.property(holder, "missing"));

    assert_eq!(Ok(true), runtime.set_property(holder, "item", item));
    assert_eq!(Some(1), runtime.ref_count(item));

    let copy = runtime.cast(item, ValueKind::Object).unwrap();

    assert_eq!(Value::Object(item), copy);
    assert_eq!(Some(2), runtime.ref_count(item));

    runtime.release_value(copy);

    assert_eq!(0, runtime.release(holder).unwrap());
    assert!(!runtime.is_alive(item));
    assert_eq!(0, runtime.live_objects());
}
