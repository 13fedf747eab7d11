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

/// A configuration of the [Runtime](crate::runtime::Runtime).
///
/// The object is constructed with [RuntimeConfig::new] (or [Default]) and
/// then adjusted field by field:
///
/// ```
/// # use bindery::runtime::{Runtime, RuntimeConfig};
/// let mut config = RuntimeConfig::new();
///
/// config.trace_lifecycle = false;
///
/// let runtime = Runtime::with_config(config);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub struct RuntimeConfig {
    /// If set, the runtime emits a trace-level log record for every object
    /// creation, clone and destruction.
    ///
    /// The default value is true.
    pub trace_lifecycle: bool,

    /// If set, the errors about unknown classes and methods carry the name
    /// of the closest registered candidate.
    ///
    /// The default value is true.
    pub suggest_names: bool,

    /// The number of object slots the runtime preallocates on creation.
    ///
    /// The default value is 64.
    pub object_capacity: usize,
}

impl Default for RuntimeConfig {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeConfig {
    /// The default constructor for this configuration object.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            trace_lifecycle: true,
            suggest_names: true,
            object_capacity: 64,
        }
    }
}
