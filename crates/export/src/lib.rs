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

//! # Bindery Macros Crate
//!
//! This is a helper crate for the main `bindery` crate, which projects native
//! Rust types into a dynamically typed host object runtime.
//!
//! The [export] attribute macro in this crate detects at compile time which
//! of the optional runtime capabilities a Rust type implements and wires
//! them into the type's handler table.

mod export;
mod utils;

use proc_macro::TokenStream;
use quote::quote_spanned;
use syn::{parse_macro_input, spanned::Spanned};

use crate::export::ExportItem;

/// Adapts a Rust struct or enum to the host object runtime.
///
/// The macro keeps the item as is and implements the `NativeClass` trait for
/// it. The implementation probes, at the item's concrete type, each of the
/// optional capabilities:
///
/// - `Default` and `Clone` for construction and copying.
/// - `ToBool`, `ToInteger`, `ToDouble`, `ToText` and `ToCollection` for the
///   casts into the host's primitive values.
/// - `Compare<Rhs>` for each supported `Rhs` operand type separately.
///
/// A capability the type does not implement turns into a missing handler
/// entry, so the corresponding runtime operation fails cleanly instead of
/// failing to compile.
///
/// ```ignore
/// #[export]
/// #[derive(Default)]
/// struct Counter {
///     count: i64,
/// }
/// ```
///
/// ## Renaming
///
/// By default, the type name reported by the handler table is the item's
/// identifier. The `name` option overrides it:
///
/// ```ignore
/// #[export(name "Vector2")]
/// #[derive(Default, Clone)]
/// struct Vec2(f64, f64);
/// ```
///
/// ## Limitations
///
/// Generic types cannot be exported, because the capabilities are detected
/// at a concrete type.
///
/// ## Debugging
///
/// Using the `#[export(dump)]` attribute, the macro reports the
/// pretty-printed output as a compile-time error. This mode is available in
/// development builds only.
#[proc_macro_attribute]
pub fn export(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attr = proc_macro2::TokenStream::from(attr);
    let attr_span = attr.span();

    let input = TokenStream::from_iter(
        TokenStream::from(quote_spanned!(attr_span=> #[export(#attr)]))
            .into_iter()
            .chain(item),
    );

    let output = parse_macro_input!(input as ExportItem);
    output.into()
}
