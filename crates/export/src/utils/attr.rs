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

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    Error,
    LitStr,
    Meta,
    Result,
};

pub const DUMP: u16 = 1 << 0;
pub const RENAME: u16 = 1 << 1;

pub struct Attrs {
    dump: Option<Span>,
    name: Option<(Span, LitStr)>,
}

impl Attrs {
    pub fn check(&self, mask: u16) -> Result<()> {
        if mask & DUMP == 0 {
            if let Some(span) = &self.dump {
                return Err(Error::new(
                    *span,
                    "Export dump marker is not applicable here.",
                ));
            }
        }

        if mask & RENAME == 0 {
            if let Some((span, _)) = &self.name {
                return Err(Error::new(*span, "Renaming is not applicable here."));
            }
        }

        Ok(())
    }

    #[inline(always)]
    pub fn dump(&self) -> Option<Span> {
        self.dump
    }

    #[inline(always)]
    pub fn name(&self) -> Option<&LitStr> {
        self.name.as_ref().map(|(_, name)| name)
    }

    fn append(&mut self, attr: Attr) -> Result<()> {
        match attr {
            Attr::None => {}

            Attr::Dump(span) => {
                if self.dump.is_some() {
                    return Err(Error::new(span, "Duplicate dump export mode marker."));
                }

                self.dump = Some(span);
            }

            Attr::Name((span, name)) => {
                if self.name.is_some() {
                    return Err(Error::new(span, "Duplicate rename."));
                }

                if name.value().is_empty() {
                    return Err(Error::new(name.span(), "Empty names are not allowed."));
                }

                self.name = Some((span, name));
            }
        }

        Ok(())
    }
}

pub trait Exportable: inner::WithAttributes {
    #[inline]
    fn drain_attrs(&mut self) -> Result<Attrs> {
        let attributes = self.attributes_mut();

        let mut export_attributes = Vec::with_capacity(attributes.len().min(1));

        attributes.retain(|attribute| {
            if attribute.path().is_ident("export") {
                export_attributes.push(attribute.clone());
                return false;
            }

            true
        });

        let mut result = Attrs {
            dump: None,
            name: None,
        };

        for attribute in export_attributes {
            let attr = match &attribute.meta {
                Meta::List(meta) => meta.parse_args::<Attr>()?,
                Meta::NameValue(meta) => {
                    return Err(Error::new(
                        meta.eq_token.span,
                        "Name-value attribute format is not supported.",
                    ))
                }
                Meta::Path(..) => continue,
            };

            result.append(attr)?;
        }

        Ok(result)
    }
}

impl<T: inner::WithAttributes> Exportable for T {}

mod inner {
    use syn::{spanned::Spanned, Attribute, ItemEnum, ItemStruct};

    pub trait WithAttributes: Spanned {
        fn attributes_mut(&mut self) -> &mut Vec<Attribute>;
    }

    impl WithAttributes for ItemStruct {
        #[inline(always)]
        fn attributes_mut(&mut self) -> &mut Vec<Attribute> {
            &mut self.attrs
        }
    }

    impl WithAttributes for ItemEnum {
        #[inline(always)]
        fn attributes_mut(&mut self) -> &mut Vec<Attribute> {
            &mut self.attrs
        }
    }
}

enum Attr {
    None,
    Dump(Span),
    Name((Span, LitStr)),
}

impl Parse for Attr {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.is_empty() {
            return Ok(Self::None);
        }

        let lookahead = input.lookahead1();

        if lookahead.peek(keyword::dump) {
            let keyword = input.parse::<keyword::dump>()?;

            if !input.is_empty() {
                return Err(input.error("Unexpected token."));
            }

            return Ok(Self::Dump(keyword.span));
        }

        if lookahead.peek(keyword::name) {
            let keyword = input.parse::<keyword::name>()?;

            let name = input.parse::<LitStr>()?;

            if !input.is_empty() {
                return Err(input.error("Unexpected token."));
            }

            return Ok(Self::Name((keyword.span, name)));
        }

        return Err(lookahead.error());
    }
}

mod keyword {
    syn::custom_keyword!(dump);
    syn::custom_keyword!(name);
}
