// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Turn the loosely-typed input builders accept into nodes.

mod insert_values;
mod raw;
mod reference;
mod update_set;
mod value_expression;

pub use insert_values::{InsertObject, InsertValues, UpdateObject, parse_insert_values};
pub use raw::{RawBuilder, raw};
pub use reference::{
    parse_column, parse_from_item, parse_reference, parse_selection, parse_table,
};
pub use update_set::parse_update_object;
