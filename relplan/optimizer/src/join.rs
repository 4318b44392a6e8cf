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

//! Join-schema construction and the lock-type/correlated-column helpers
//! `Join`/`Apply`/`Lock` pruning relies on.

use crate::plan::LogicalPlan;
use arrow_schema::DataType;
use relplan_common::{Column, Schema, Session};
use relplan_expr::Expr;
use std::collections::HashSet;

/// The kind of a `Join`/`Apply` node.
///
/// `LeftOuterSemi`/`AntiLeftOuterSemi` are modeled as first-class variants
/// (rather than a bolt-on special case) because their schema always carries
/// one extra trailing boolean "join matched" column that downstream
/// consumers always require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    LeftSemi,
    RightSemi,
    LeftAnti,
    RightAnti,
    LeftOuterSemi,
    AntiLeftOuterSemi,
}

impl JoinType {
    pub fn has_mark_column(self) -> bool {
        matches!(self, JoinType::LeftOuterSemi | JoinType::AntiLeftOuterSemi)
    }
}

/// Builds the output schema of a `Join`/`Apply` node from its children's
/// schemas.
///
/// For the mark-column join types, `existing_mark` lets a caller that is
/// *re*-building the schema during pruning pass through the already
/// allocated mark column rather than mint a fresh one. The mark column is
/// this node's own synthetic output, not derived from either child, so its
/// identity must survive a rebuild unchanged or any sibling/parent
/// expression still referencing it would go dangling. Pass `None` only
/// when constructing the join for the first time.
pub fn build_join_schema(
    join_type: JoinType,
    left: &Schema,
    right: &Schema,
    existing_mark: Option<Column>,
    session: &Session,
) -> Schema {
    let mut schema = match join_type {
        JoinType::Inner | JoinType::Left | JoinType::Right | JoinType::Full => {
            left.iter().chain(right.iter()).cloned().collect::<Schema>()
        }
        JoinType::LeftSemi | JoinType::LeftAnti => left.clone(),
        JoinType::RightSemi | JoinType::RightAnti => right.clone(),
        JoinType::LeftOuterSemi | JoinType::AntiLeftOuterSemi => left.clone(),
    };
    if join_type.has_mark_column() {
        let mark = existing_mark.unwrap_or_else(|| {
            let id = session.alloc_plan_column_id();
            Column::new(id, "_join_mark", DataType::Boolean)
        });
        schema.append(mark);
    }
    schema
}

/// Re-scans `plan` for `CorrelatedColumn` references whose underlying
/// column belongs to `outer_schema`, returning the bare (non-correlated)
/// `Column` form of each distinct reference found.
///
/// Used by `Apply` pruning *after* the right subtree has already
/// been pruned, to discover which of the left child's columns the
/// surviving right subtree still depends on.
pub fn extract_correlated_columns(plan: &LogicalPlan, outer_schema: &Schema) -> Vec<Column> {
    let mut found = HashSet::new();
    collect_correlated(plan, outer_schema, &mut found);
    found.into_iter().collect()
}

fn collect_correlated(plan: &LogicalPlan, outer_schema: &Schema, found: &mut HashSet<Column>) {
    for expr in plan.expressions() {
        collect_correlated_in_expr(expr, outer_schema, found);
    }
    for child in plan.children() {
        collect_correlated(child, outer_schema, found);
    }
}

fn collect_correlated_in_expr(expr: &Expr, outer_schema: &Schema, found: &mut HashSet<Column>) {
    if let Expr::CorrelatedColumn(col) = expr {
        if outer_schema.contains(col) {
            found.insert(col.clone());
        }
        return;
    }
    match expr {
        Expr::ScalarFunction(f) => {
            for arg in &f.args {
                collect_correlated_in_expr(arg, outer_schema, found);
            }
        }
        Expr::Aggregate(a) => {
            for arg in &a.args {
                collect_correlated_in_expr(arg, outer_schema, found);
            }
        }
        Expr::Window(w) => {
            for arg in &w.args {
                collect_correlated_in_expr(arg, outer_schema, found);
            }
        }
        _ => {}
    }
}

/// The kind of row lock a `Lock` node applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockType {
    None,
    ForUpdate,
    ForUpdateNoWait,
    ForShare,
}

/// True for the `SELECT ... FOR UPDATE`-family lock types, which need the
/// handle columns of every locked table kept alive through pruning.
pub fn is_select_for_update_lock_type(lock_type: LockType) -> bool {
    matches!(lock_type, LockType::ForUpdate | LockType::ForUpdateNoWait)
}
