// Copyright 2023 The propmap Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Map flat string properties onto strongly-typed settings.
//!
//! A [`Store`] is layered from properties files, the process environment
//! and ad-hoc command-line tokens. A target type declares its fields with
//! one [`PropertyDescriptor`] each; the [`FieldMapper`] resolves, substitutes
//! `${name}` references, validates and assigns them.

#[cfg(test)]
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

pub mod args;
pub mod descriptor;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod mapper;
pub mod properties;
pub mod store;
pub mod subst;
pub mod value;

pub use crate::descriptor::{PathConstraint, PropertyDescriptor};
pub use crate::errors::{MappingError, SourceError, SubstitutionError};
pub use crate::handlers::{Handler, HandlerOverrides, HandlerRegistry};
pub use crate::mapper::{populate, FieldMapper, Mappable, Schema};
pub use crate::store::{Store, StoreBuilder};
pub use crate::value::{FieldTypeTag, FromValue, Value};
