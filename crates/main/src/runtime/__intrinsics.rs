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

use std::{cmp::Ordering, marker::PhantomData};

pub use lady_deirdre::sync::Lazy;

use crate::runtime::{
    CloneFn,
    Collection,
    CreateFn,
    Integer,
    NativeClass,
    Nil,
    ObjectRef,
    Resource,
    Text,
    Value,
};

/// A zero-sized subject of the capability probes.
///
/// The probe traits from the [probes] module are implemented twice: once
/// for `Probe<T>` under the capability's trait bound and once for
/// `&Probe<T>` without bounds. A method call on a `&Probe<T>` receiver
/// resolves to the bounded implementation whenever the bound holds for the
/// concrete `T`, and falls back to the unbounded implementation (which
/// yields None) otherwise.
///
/// The call must be made at a concrete type:
///
/// ```ignore
/// use bindery::runtime::__intrinsics::{probes::*, Probe};
///
/// let create = (&Probe::<Foo>::new()).create_fn();
/// let compare_integer = (&Probe::<(Foo, Integer)>::new()).compare_fn();
/// ```
pub struct Probe<T>(PhantomData<fn() -> T>);

impl<T> Probe<T> {
    #[inline(always)]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

pub mod probes {
    use std::cmp::Ordering;

    use crate::runtime::{
        __intrinsics::Probe,
        lifecycle::{clone_object, create_object},
        ops::{Compare, ToBool, ToCollection, ToDouble, ToInteger, ToText},
        CloneFn,
        Collection,
        CreateFn,
        Integer,
        NativeClass,
        Text,
    };

    pub trait CreateProbe {
        fn create_fn(&self) -> Option<CreateFn>;
    }

    impl<T: NativeClass + Default> CreateProbe for Probe<T> {
        #[inline(always)]
        fn create_fn(&self) -> Option<CreateFn> {
            Some(create_object::<T>)
        }
    }

    pub trait CreateFallback {
        #[inline(always)]
        fn create_fn(&self) -> Option<CreateFn> {
            None
        }
    }

    impl<T> CreateFallback for &Probe<T> {}

    pub trait CloneProbe {
        fn clone_fn(&self) -> Option<CloneFn>;
    }

    impl<T: NativeClass + Clone> CloneProbe for Probe<T> {
        #[inline(always)]
        fn clone_fn(&self) -> Option<CloneFn> {
            Some(clone_object::<T>)
        }
    }

    pub trait CloneFallback {
        #[inline(always)]
        fn clone_fn(&self) -> Option<CloneFn> {
            None
        }
    }

    impl<T> CloneFallback for &Probe<T> {}

    macro_rules! conversion_probe {
        ($capability:ident::$method:ident -> $carrier:ty, $probe:ident, $fallback:ident, $probe_fn:ident) => {
            pub trait $probe {
                type Subject;

                fn $probe_fn(&self) -> Option<fn(&Self::Subject) -> $carrier>;
            }

            impl<T: $capability> $probe for Probe<T> {
                type Subject = T;

                #[inline(always)]
                fn $probe_fn(&self) -> Option<fn(&T) -> $carrier> {
                    Some(<T as $capability>::$method)
                }
            }

            pub trait $fallback {
                type Subject;

                #[inline(always)]
                fn $probe_fn(&self) -> Option<fn(&Self::Subject) -> $carrier> {
                    None
                }
            }

            impl<T> $fallback for &Probe<T> {
                type Subject = T;
            }
        };
    }

    conversion_probe!(ToBool::to_bool -> bool, ToBoolProbe, ToBoolFallback, to_bool_fn);
    conversion_probe!(ToInteger::to_integer -> Integer, ToIntegerProbe, ToIntegerFallback, to_integer_fn);
    conversion_probe!(ToDouble::to_double -> f64, ToDoubleProbe, ToDoubleFallback, to_double_fn);
    conversion_probe!(ToText::to_text -> Text, ToTextProbe, ToTextFallback, to_text_fn);
    conversion_probe!(ToCollection::to_collection -> Collection, ToCollectionProbe, ToCollectionFallback, to_collection_fn);

    pub trait CompareProbe {
        type Lhs;
        type Rhs;

        fn compare_fn(&self) -> Option<fn(&Self::Lhs, &Self::Rhs) -> Ordering>;
    }

    impl<L: Compare<R>, R> CompareProbe for Probe<(L, R)> {
        type Lhs = L;
        type Rhs = R;

        #[inline(always)]
        fn compare_fn(&self) -> Option<fn(&L, &R) -> Ordering> {
            Some(<L as Compare<R>>::compare)
        }
    }

    pub trait CompareFallback {
        type Lhs;
        type Rhs;

        #[inline(always)]
        fn compare_fn(&self) -> Option<fn(&Self::Lhs, &Self::Rhs) -> Ordering> {
            None
        }
    }

    impl<L, R> CompareFallback for &Probe<(L, R)> {
        type Lhs = L;
        type Rhs = R;
    }
}

/// A record of the optional capabilities of the native type `T`.
///
/// Each field holds a function pointer to the type's implementation of the
/// corresponding capability, or None if the type does not implement it.
pub struct Capabilities<T: 'static> {
    /// The [Default] constructor, wrapped into the host create callback.
    pub create: Option<CreateFn>,

    /// The [Clone] copy constructor, wrapped into the host clone callback.
    pub clone: Option<CloneFn>,

    pub to_bool: Option<fn(&T) -> bool>,
    pub to_integer: Option<fn(&T) -> Integer>,
    pub to_double: Option<fn(&T) -> f64>,
    pub to_text: Option<fn(&T) -> Text>,
    pub to_collection: Option<fn(&T) -> Collection>,

    pub compare_nil: Option<fn(&T, &Nil) -> Ordering>,
    pub compare_bool: Option<fn(&T, &bool) -> Ordering>,
    pub compare_integer: Option<fn(&T, &Integer) -> Ordering>,
    pub compare_double: Option<fn(&T, &f64) -> Ordering>,
    pub compare_text: Option<fn(&T, &Text) -> Ordering>,
    pub compare_collection: Option<fn(&T, &Collection) -> Ordering>,
    pub compare_object: Option<fn(&T, &ObjectRef) -> Ordering>,
    pub compare_resource: Option<fn(&T, &Resource) -> Ordering>,

    /// The comparison with another instance of the same type.
    pub compare_same: Option<fn(&T, &T) -> Ordering>,

    /// The comparison with an operand of any kind.
    pub compare_value: Option<fn(&T, &Value) -> Ordering>,
}

impl<T: 'static> Clone for Capabilities<T> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for Capabilities<T> {}

impl<T: 'static> Default for Capabilities<T> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Capabilities<T> {
    /// Returns a record of a type that implements none of the capabilities.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            create: None,
            clone: None,
            to_bool: None,
            to_integer: None,
            to_double: None,
            to_text: None,
            to_collection: None,
            compare_nil: None,
            compare_bool: None,
            compare_integer: None,
            compare_double: None,
            compare_text: None,
            compare_collection: None,
            compare_object: None,
            compare_resource: None,
            compare_same: None,
            compare_value: None,
        }
    }
}

impl<T: NativeClass> Capabilities<T> {
    /// Returns true if the type provides at least one comparison.
    pub fn is_comparable(&self) -> bool {
        self.compare_nil.is_some()
            || self.compare_bool.is_some()
            || self.compare_integer.is_some()
            || self.compare_double.is_some()
            || self.compare_text.is_some()
            || self.compare_collection.is_some()
            || self.compare_object.is_some()
            || self.compare_resource.is_some()
            || self.compare_same.is_some()
            || self.compare_value.is_some()
    }
}
