// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Shared repair/cleanup helpers used by more than one per-operator rule:
//! empty-projection repair, inline projection, and the ordering-key
//! dedup/constant cleanup.

use crate::plan::{LogicalPlan, Projection};
use arrow_schema::DataType;
use relplan_common::{Column, Schema, Session};
use relplan_expr::utils::{columns_of, is_runtime_const_expr, structural_hash};
use relplan_expr::{Expr, OrderByItem};
use log::trace;
use std::collections::HashSet;

/// If `plan` is a `Projection` whose schema was pruned down to nothing,
/// append one synthetic `1` column to both `schema` and `exprs`.
///
/// An empty projection is otherwise eliminated by downstream passes, which
/// would be incorrect here: the projection may be the only thing standing
/// between a join and a child whose row count still has to come through.
pub fn repair_empty_projection(plan: &mut LogicalPlan, session: &Session) {
    if let LogicalPlan::Projection(Projection { schema, exprs, .. }) = plan {
        if schema.is_empty() {
            let id = session.alloc_plan_column_id();
            schema.append(Column::new(id, "1", DataType::Int64));
            exprs.push(Expr::one());
            trace!("repair_empty_projection: injected constant-1 column {id}");
        }
    }
}

/// Trims `schema` down to the minimal prefix that still covers every column
/// in `required`, preserving relative order.
///
/// Used by `Join`/`Apply` after rebuilding their schema from (already
/// pruned) children, and by `Limit` after its child has been pruned, to
/// drop trailing columns that turned out not to be needed, without
/// inserting an explicit projection operator.
pub fn inline_projection(schema: &mut Schema, required: &HashSet<Column>) {
    let keep_len = schema
        .columns()
        .iter()
        .rposition(|c| required.contains(c))
        .map(|i| i + 1)
        .unwrap_or(0);
    while schema.len() > keep_len {
        schema.remove(schema.len() - 1);
    }
}

/// Cleans a list of ordering keys (`ORDER BY` / window / top-N), returning
/// the surviving items and the columns they newly require from the child:
///
/// 1. drop any item whose structural hash duplicates an earlier item's;
/// 2. drop a column-free item iff it's a runtime constant;
/// 3. drop an item whose declared type is the `NULL` literal type;
/// 4. otherwise keep the item and contribute its referenced columns.
pub fn clean_ordering_keys(items: Vec<OrderByItem>) -> (Vec<OrderByItem>, HashSet<Column>) {
    let mut seen_hashes = HashSet::new();
    let mut kept = Vec::new();
    let mut required = HashSet::new();

    for item in items {
        let hash = structural_hash(&item.expr);
        if !seen_hashes.insert(hash) {
            trace!("clean_ordering_keys: dropped duplicate ordering key");
            continue;
        }

        let cols = columns_of(&item.expr);
        if cols.is_empty() {
            if is_runtime_const_expr(&item.expr) {
                trace!("clean_ordering_keys: dropped runtime-constant ordering key");
                continue;
            }
            kept.push(item);
            continue;
        }

        if item.expr.data_type() == DataType::Null {
            trace!("clean_ordering_keys: dropped NULL-typed ordering key");
            continue;
        }

        required.extend(cols);
        kept.push(item);
    }

    (kept, required)
}
