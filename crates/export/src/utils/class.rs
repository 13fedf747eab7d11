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

use proc_macro2::{Span, TokenStream};
use quote::{quote_spanned, ToTokens};
use syn::{Ident, LitStr};

use crate::utils::Facade;

pub struct NativeClassImpl<'a> {
    pub span: Span,
    pub ident: &'a Ident,
    pub name: &'a LitStr,
}

impl<'a> ToTokens for NativeClassImpl<'a> {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let span = self.span;

        let runtime = span.face_runtime();
        let intrinsics = span.face_intrinsics();
        let str_type = span.face_str();

        let ident = self.ident;
        let name = self.name;

        let capabilities = Capabilities {
            span,
            ident: self.ident,
        };

        quote_spanned!(span=>
            #[allow(non_local_definitions)]
            impl #runtime::NativeClass for #ident {
                #[inline(always)]
                fn type_name() -> &'static #str_type {
                    #name
                }

                #capabilities

                fn handlers() -> &'static #runtime::HandlerTable {
                    static HANDLERS: #intrinsics::Lazy<#runtime::HandlerTable> =
                        #intrinsics::Lazy::new(|| #runtime::HandlerTable::new::<#ident>());

                    &HANDLERS
                }
            }
        )
        .to_tokens(tokens)
    }
}

struct Capabilities<'a> {
    span: Span,
    ident: &'a Ident,
}

impl<'a> ToTokens for Capabilities<'a> {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let span = self.span;

        let runtime = span.face_runtime();
        let intrinsics = span.face_intrinsics();
        let bool_type = span.face_bool();
        let f64_type = span.face_f64();

        let ident = self.ident;

        let probe = quote_spanned!(span=> (&#intrinsics::Probe::<#ident>::new()));

        let compare_nil = CompareProbe {
            span,
            ident,
            rhs: quote_spanned!(span=> #runtime::Nil),
        };

        let compare_bool = CompareProbe {
            span,
            ident,
            rhs: bool_type,
        };

        let compare_integer = CompareProbe {
            span,
            ident,
            rhs: quote_spanned!(span=> #runtime::Integer),
        };

        let compare_double = CompareProbe {
            span,
            ident,
            rhs: f64_type,
        };

        let compare_text = CompareProbe {
            span,
            ident,
            rhs: quote_spanned!(span=> #runtime::Text),
        };

        let compare_collection = CompareProbe {
            span,
            ident,
            rhs: quote_spanned!(span=> #runtime::Collection),
        };

        let compare_object = CompareProbe {
            span,
            ident,
            rhs: quote_spanned!(span=> #runtime::ObjectRef),
        };

        let compare_resource = CompareProbe {
            span,
            ident,
            rhs: quote_spanned!(span=> #runtime::Resource),
        };

        let compare_same = CompareProbe {
            span,
            ident,
            rhs: ident.to_token_stream(),
        };

        let compare_value = CompareProbe {
            span,
            ident,
            rhs: quote_spanned!(span=> #runtime::Value),
        };

        quote_spanned!(span=>
            fn capabilities() -> #runtime::Capabilities<Self> {
                #[allow(unused_imports)]
                use #intrinsics::probes::*;

                #runtime::Capabilities {
                    create: #probe.create_fn(),
                    clone: #probe.clone_fn(),
                    to_bool: #probe.to_bool_fn(),
                    to_integer: #probe.to_integer_fn(),
                    to_double: #probe.to_double_fn(),
                    to_text: #probe.to_text_fn(),
                    to_collection: #probe.to_collection_fn(),
                    compare_nil: #compare_nil,
                    compare_bool: #compare_bool,
                    compare_integer: #compare_integer,
                    compare_double: #compare_double,
                    compare_text: #compare_text,
                    compare_collection: #compare_collection,
                    compare_object: #compare_object,
                    compare_resource: #compare_resource,
                    compare_same: #compare_same,
                    compare_value: #compare_value,
                }
            }
        )
        .to_tokens(tokens)
    }
}

struct CompareProbe<'a> {
    span: Span,
    ident: &'a Ident,
    rhs: TokenStream,
}

impl<'a> ToTokens for CompareProbe<'a> {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let span = self.span;

        let intrinsics = span.face_intrinsics();

        let ident = self.ident;
        let rhs = &self.rhs;

        quote_spanned!(span=>
            (&#intrinsics::Probe::<(#ident, #rhs)>::new()).compare_fn()
        )
        .to_tokens(tokens)
    }
}
