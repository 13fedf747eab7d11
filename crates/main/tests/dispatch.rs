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

use bindery::{
    export,
    runtime::{
        ops::{Compare, ToBool, ToCollection, ToDouble, ToInteger, ToText},
        Collection,
        Comparison,
        Integer,
        NativeClass,
        Nil,
        ObjectRef,
        Resource,
        Runtime,
        RuntimeError,
        Text,
        Value,
        ValueKind,
    },
};

#[export]
#[derive(Default)]
struct Counter {
    count: Integer,
}

#[export]
#[derive(Default)]
struct Ordinal(Integer);

impl Compare<Integer> for Ordinal {
    fn compare(&self, rhs: &Integer) -> Ordering {
        self.0.cmp(rhs)
    }
}

#[export]
#[derive(Default)]
struct Label;

impl ToText for Label {
    fn to_text(&self) -> Text {
        Text::from("abc")
    }
}

#[export(name "Full")]
#[derive(Default, Clone)]
struct Everything(Integer);

impl ToBool for Everything {
    fn to_bool(&self) -> bool {
        self.0 != 0
    }
}

impl ToInteger for Everything {
    fn to_integer(&self) -> Integer {
        self.0
    }
}

impl ToDouble for Everything {
    fn to_double(&self) -> f64 {
        self.0 as f64
    }
}

impl ToText for Everything {
    fn to_text(&self) -> Text {
        Text::from(self.0.to_string())
    }
}

impl ToCollection for Everything {
    fn to_collection(&self) -> Collection {
        [(0 as Integer, self.0)].into_iter().collect()
    }
}

#[export]
#[derive(Default)]
struct Ranked(Integer);

impl Compare for Ranked {
    fn compare(&self, rhs: &Self) -> Ordering {
        self.0.cmp(&rhs.0)
    }
}

impl Compare<ObjectRef> for Ranked {
    fn compare(&self, _rhs: &ObjectRef) -> Ordering {
        Ordering::Less
    }
}

#[export]
#[derive(Default)]
enum Flexible {
    #[default]
    Middle,
}

impl Compare<Value> for Flexible {
    fn compare(&self, rhs: &Value) -> Ordering {
        match self {
            Self::Middle => match rhs {
                Value::Integer(value) => 0.cmp(value),
                _ => Ordering::Greater,
            },
        }
    }
}

#[export]
#[derive(Default)]
struct Bounded(Integer);

impl Compare<Nil> for Bounded {
    fn compare(&self, _rhs: &Nil) -> Ordering {
        self.0.cmp(&0)
    }
}

impl Compare<Resource> for Bounded {
    fn compare(&self, rhs: &Resource) -> Ordering {
        (self.0 as u64).cmp(&rhs.id())
    }
}

impl Compare<Value> for Bounded {
    fn compare(&self, _rhs: &Value) -> Ordering {
        Ordering::Equal
    }
}

#[export]
#[derive(Default)]
struct Measure(f64);

impl Compare<bool> for Measure {
    fn compare(&self, rhs: &bool) -> Ordering {
        (self.0 != 0.0).cmp(rhs)
    }
}

impl Compare<f64> for Measure {
    fn compare(&self, rhs: &f64) -> Ordering {
        self.0.total_cmp(rhs)
    }
}

impl Compare<Text> for Measure {
    fn compare(&self, rhs: &Text) -> Ordering {
        (self.0 as usize).cmp(&rhs.as_str().len())
    }
}

impl Compare<Collection> for Measure {
    fn compare(&self, rhs: &Collection) -> Ordering {
        (self.0 as usize).cmp(&rhs.len())
    }
}

fn instantiate<T: NativeClass>(runtime: &mut Runtime, name: &str) -> ObjectRef {
    let class = match runtime.class_by_name(name) {
        Ok(class) => class,
        Err(_) => runtime.register_class::<T>(name, []).unwrap(),
    };

    runtime.instantiate(class).unwrap()
}

#[test]
fn test_counter_scenario() {
    let mut runtime = Runtime::new();

    let counter = instantiate::<Counter>(&mut runtime, "Counter");

    runtime.payload_mut::<Counter>(counter).unwrap().count = 3;

    assert_eq!(
        Err(RuntimeError::CastUnsupported {
            class: "Counter".into(),
            target: ValueKind::Integer,
        }),
        runtime.cast(counter, ValueKind::Integer),
    );

    let counter = Value::Object(counter);

    assert_eq!(
        Comparison {
            result: Ordering::Equal,
            success: false,
        },
        runtime.compare_values(&counter, &Value::Integer(5)).unwrap(),
    );

    assert_eq!(
        Err(RuntimeError::CompareUnsupported {
            lhs: "Counter".into(),
            rhs: "int".into(),
        }),
        runtime.compare(&counter, &Value::Integer(5)),
    );
}

#[test]
fn test_ordinal_scenario() {
    let mut runtime = Runtime::new();

    let ordinal = instantiate::<Ordinal>(&mut runtime, "Ordinal");

    runtime.payload_mut::<Ordinal>(ordinal).unwrap().0 = 5;

    let ordinal = Value::Object(ordinal);

    assert_eq!(Ok(Ordering::Greater), runtime.compare(&ordinal, &Value::Integer(3)));
    assert_eq!(Ok(Ordering::Equal), runtime.compare(&ordinal, &Value::Integer(5)));
    assert_eq!(Ok(Ordering::Less), runtime.compare(&Value::Integer(3), &ordinal));

    assert!(runtime.compare(&ordinal, &Value::Double(3.0)).is_err());
    assert!(runtime.compare(&ordinal, &Value::Null).is_err());
}

#[test]
fn test_text_like_scenario() {
    let mut runtime = Runtime::new();

    let label = instantiate::<Label>(&mut runtime, "Label");

    assert_eq!(Ok(Value::from("abc")), runtime.cast(label, ValueKind::Text));
    assert!(runtime.cast(label, ValueKind::Integer).is_err());
    assert!(runtime.cast(label, ValueKind::Bool).is_err());
}

#[test]
fn test_cast_totality() {
    let mut runtime = Runtime::new();

    let full = instantiate::<Everything>(&mut runtime, "Full");
    let counter = instantiate::<Counter>(&mut runtime, "Counter");

    runtime.payload_mut::<Everything>(full).unwrap().0 = 7;

    assert_eq!("Full", Everything::type_name());

    for target in ValueKind::CASTABLE {
        let value = runtime.cast(full, target).unwrap();

        assert_eq!(target, value.kind());
        assert!(runtime.cast(counter, target).is_err());
    }

    assert_eq!(Ok(Value::Integer(7)), runtime.cast(full, ValueKind::Integer));
    assert_eq!(Ok(Value::Double(7.0)), runtime.cast(full, ValueKind::Double));
    assert_eq!(Ok(Value::from("7")), runtime.cast(full, ValueKind::Text));

    for object in [full, counter] {
        assert_eq!(Ok(Value::Undef), runtime.cast(object, ValueKind::Undef));
        assert_eq!(Ok(Value::Null), runtime.cast(object, ValueKind::Null));
        assert!(runtime.cast(object, ValueKind::Resource).is_err());
    }
}

#[test]
fn test_cast_to_object_identity() {
    let mut runtime = Runtime::new();

    let counter = instantiate::<Counter>(&mut runtime, "Counter");

    assert_eq!(Some(1), runtime.ref_count(counter));

    let value = runtime.cast(counter, ValueKind::Object).unwrap();

    assert_eq!(Value::Object(counter), value);
    assert_eq!(Some(2), runtime.ref_count(counter));

    runtime.release_value(value);

    assert_eq!(Some(1), runtime.ref_count(counter));
}

#[test]
fn test_anti_symmetry() {
    let mut runtime = Runtime::new();

    let ordinal = instantiate::<Ordinal>(&mut runtime, "Ordinal");
    let flexible = instantiate::<Flexible>(&mut runtime, "Flexible");

    runtime.payload_mut::<Ordinal>(ordinal).unwrap().0 = -2;

    let operands = [
        Value::Integer(-5),
        Value::Integer(-2),
        Value::Integer(0),
        Value::Integer(4),
        Value::Double(1.5),
        Value::from("text"),
        Value::Null,
    ];

    for object in [Value::Object(ordinal), Value::Object(flexible)] {
        for operand in &operands {
            let forward = runtime.compare_values(&object, operand).unwrap();
            let backward = runtime.compare_values(operand, &object).unwrap();

            assert_eq!(forward.success, backward.success);

            if forward.success {
                assert_eq!(forward.result, backward.result.reverse());
            }
        }
    }
}

#[test]
fn test_same_type_priority() {
    let mut runtime = Runtime::new();

    let first = instantiate::<Ranked>(&mut runtime, "Ranked");
    let second = instantiate::<Ranked>(&mut runtime, "Ranked");
    let counter = instantiate::<Counter>(&mut runtime, "Counter");

    runtime.payload_mut::<Ranked>(first).unwrap().0 = 10;
    runtime.payload_mut::<Ranked>(second).unwrap().0 = 1;

    let first = Value::Object(first);
    let second = Value::Object(second);
    let counter = Value::Object(counter);

    assert_eq!(Ok(Ordering::Greater), runtime.compare(&first, &second));
    assert_eq!(Ok(Ordering::Less), runtime.compare(&second, &first));
    assert_eq!(Ok(Ordering::Equal), runtime.compare(&first, &first));

    assert_eq!(Ok(Ordering::Less), runtime.compare(&first, &counter));
    assert_eq!(Ok(Ordering::Greater), runtime.compare(&counter, &first));
}

#[test]
fn test_compare_borrowed_payload() {
    let mut runtime = Runtime::new();

    let first = instantiate::<Ranked>(&mut runtime, "Ranked");
    let second = instantiate::<Ranked>(&mut runtime, "Ranked");
    let counter = instantiate::<Counter>(&mut runtime, "Counter");

    runtime.payload_mut::<Ranked>(first).unwrap().0 = 10;
    runtime.payload_mut::<Ranked>(second).unwrap().0 = 1;

    let borrowed = runtime.payload_mut::<Ranked>(second).unwrap();

    let conflict = Err(RuntimeError::BorrowConflict { object: second });

    let first = Value::Object(first);
    let second = Value::Object(second);
    let counter = Value::Object(counter);

    assert_eq!(conflict, runtime.compare(&first, &second));
    assert_eq!(conflict, runtime.compare(&second, &first));
    assert_eq!(conflict, runtime.compare(&counter, &second));
    assert_eq!(conflict, runtime.compare(&second, &Value::Integer(1)));

    assert_eq!(Ok(Ordering::Less), runtime.compare(&first, &counter));

    drop(borrowed);

    assert_eq!(Ok(Ordering::Greater), runtime.compare(&first, &second));
    assert_eq!(Ok(Ordering::Less), runtime.compare(&second, &first));
}

#[test]
fn test_primitive_overloads() {
    let mut runtime = Runtime::new();

    let measure = instantiate::<Measure>(&mut runtime, "Measure");

    runtime.payload_mut::<Measure>(measure).unwrap().0 = 2.0;

    let measure = Value::Object(measure);

    assert_eq!(Ok(Ordering::Greater), runtime.compare(&measure, &Value::Bool(false)));
    assert_eq!(Ok(Ordering::Equal), runtime.compare(&measure, &Value::Bool(true)));

    assert_eq!(Ok(Ordering::Less), runtime.compare(&measure, &Value::Double(3.5)));
    assert_eq!(Ok(Ordering::Greater), runtime.compare(&Value::Double(3.5), &measure));

    assert_eq!(Ok(Ordering::Less), runtime.compare(&measure, &Value::from("abc")));
    assert_eq!(Ok(Ordering::Equal), runtime.compare(&Value::from("ab"), &measure));

    let collection = [(0 as Integer, 1 as Integer)].into_iter().collect::<Collection>();

    assert_eq!(
        Ok(Ordering::Greater),
        runtime.compare(&measure, &Value::Collection(collection)),
    );

    assert_eq!(
        Err(RuntimeError::CompareUnsupported {
            lhs: "Measure".into(),
            rhs: "int".into(),
        }),
        runtime.compare(&measure, &Value::Integer(2)),
    );

    let capabilities = Measure::capabilities();

    assert!(capabilities.compare_bool.is_some());
    assert!(capabilities.compare_double.is_some());
    assert!(capabilities.compare_text.is_some());
    assert!(capabilities.compare_collection.is_some());
    assert!(capabilities.compare_integer.is_none());
    assert!(capabilities.compare_same.is_none());
}

#[test]
fn test_generic_fallback() {
    let mut runtime = Runtime::new();

    let flexible = Value::Object(instantiate::<Flexible>(&mut runtime, "Flexible"));
    let counter = Value::Object(instantiate::<Counter>(&mut runtime, "Counter"));

    let operands = [
        Value::Undef,
        Value::Null,
        Value::Bool(false),
        Value::Integer(1),
        Value::Double(0.0),
        Value::from("text"),
        Value::Collection(Collection::new()),
        counter,
        Value::Resource(Resource::new(3, "stream")),
    ];

    for operand in &operands {
        assert!(runtime.compare(&flexible, operand).is_ok());
    }

    assert_eq!(Ok(Ordering::Less), runtime.compare(&flexible, &Value::Integer(1)));
    assert_eq!(Ok(Ordering::Greater), runtime.compare(&Value::Integer(1), &flexible));
}

#[test]
fn test_fallback_after_specific_failure() {
    let mut runtime = Runtime::new();

    let sized = instantiate::<Bounded>(&mut runtime, "Bounded");

    runtime.payload_mut::<Bounded>(sized).unwrap().0 = 5;

    let sized = Value::Object(sized);

    assert_eq!(Ok(Ordering::Greater), runtime.compare(&sized, &Value::Null));
    assert_eq!(Ok(Ordering::Greater), runtime.compare(&sized, &Value::Undef));

    assert_eq!(
        Ok(Ordering::Less),
        runtime.compare(&sized, &Value::Resource(Resource::new(9, "stream"))),
    );

    assert_eq!(Ok(Ordering::Equal), runtime.compare(&sized, &Value::Integer(100)));
}

#[test]
fn test_capability_detection() {
    let ordinal = Ordinal::capabilities();

    assert!(ordinal.create.is_some());
    assert!(ordinal.clone.is_none());
    assert!(ordinal.compare_integer.is_some());
    assert!(ordinal.compare_double.is_none());
    assert!(ordinal.compare_same.is_none());
    assert!(ordinal.compare_value.is_none());

    let ranked = Ranked::capabilities();

    assert!(ranked.compare_same.is_some());
    assert!(ranked.compare_object.is_some());
    assert!(ranked.compare_integer.is_none());

    let everything = Everything::capabilities();

    assert!(everything.clone.is_some());
    assert!(everything.to_bool.is_some());
    assert!(everything.to_collection.is_some());
    assert!(!everything.is_comparable());

    let counter = Counter::capabilities();

    assert!(counter.to_bool.is_none());
    assert!(counter.to_text.is_none());
    assert!(!counter.is_comparable());
}
