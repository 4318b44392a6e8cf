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

//! [`LogicalPlan`]: the closed set of relational operator variants the
//! pruning rule rewrites.
//!
//! Modeled as a tagged enum rather than an open trait-object hierarchy:
//! every rule is one exhaustive match on the variant, so the compiler
//! flags a missing arm the moment a new variant is added.

use crate::catalog::{ColumnInfo, HandleCols, TableInfo};
use crate::join::{JoinType, LockType};
use relplan_common::{Column, Schema};
use relplan_expr::{AggFuncDesc, Expr, OrderByItem, WindowFuncDesc};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub schema: Schema,
    pub exprs: Vec<Expr>,
    pub child: Box<LogicalPlan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub schema: Schema,
    pub conditions: Vec<Expr>,
    pub child: Box<LogicalPlan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub schema: Schema,
    pub agg_funcs: Vec<AggFuncDesc>,
    pub group_by: Vec<Expr>,
    pub child: Box<LogicalPlan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    pub schema: Schema,
    pub by_items: Vec<OrderByItem>,
    pub child: Box<LogicalPlan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopN {
    pub schema: Schema,
    pub by_items: Vec<OrderByItem>,
    pub count: u64,
    pub offset: u64,
    pub child: Box<LogicalPlan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub schema: Schema,
    pub func_descs: Vec<WindowFuncDesc>,
    pub partition_by: Vec<Expr>,
    pub order_by: Vec<OrderByItem>,
    pub child: Box<LogicalPlan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub schema: Schema,
    pub join_type: JoinType,
    pub equal_conds: Vec<Expr>,
    pub left_conds: Vec<Expr>,
    pub right_conds: Vec<Expr>,
    pub other_conds: Vec<Expr>,
    pub left: Box<LogicalPlan>,
    pub right: Box<LogicalPlan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Apply {
    pub schema: Schema,
    pub join_type: JoinType,
    pub equal_conds: Vec<Expr>,
    pub left_conds: Vec<Expr>,
    pub right_conds: Vec<Expr>,
    pub other_conds: Vec<Expr>,
    /// Columns captured from the right subtree's correlated references to
    /// the left subtree. Re-derived by the pruning rule every pass.
    pub corr_cols: Vec<Column>,
    pub left: Box<LogicalPlan>,
    pub right: Box<LogicalPlan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnionAll {
    pub schema: Schema,
    pub children: Vec<LogicalPlan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnionScan {
    pub schema: Schema,
    pub handle_cols: Option<HandleCols>,
    pub conditions: Vec<Expr>,
    pub child: Box<LogicalPlan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataSource {
    pub schema: Schema,
    pub columns: Vec<ColumnInfo>,
    pub all_conds: Vec<Expr>,
    pub handle_cols: Option<HandleCols>,
    pub table: TableInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemTable {
    pub schema: Schema,
    pub kind: Option<crate::catalog::MemTableKind>,
    pub table_info: TableInfo,
    pub columns: Vec<ColumnInfo>,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDual {
    pub schema: Schema,
    pub row_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Limit {
    pub schema: Schema,
    pub count: u64,
    pub offset: u64,
    pub child: Box<LogicalPlan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lock {
    pub schema: Schema,
    pub lock_type: LockType,
    pub tbl_id_to_handle: HashMap<i64, Vec<HandleCols>>,
    pub extra_pid_info: Option<Vec<Column>>,
    pub partitioned_table: bool,
    pub child: Box<LogicalPlan>,
}

/// A logical relational operator.
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalPlan {
    Projection(Projection),
    Selection(Selection),
    Aggregation(Aggregation),
    Sort(Sort),
    TopN(TopN),
    Window(Window),
    Join(Join),
    Apply(Apply),
    UnionAll(UnionAll),
    UnionScan(UnionScan),
    DataSource(DataSource),
    MemTable(MemTable),
    TableDual(TableDual),
    Limit(Limit),
    Lock(Lock),
}

impl LogicalPlan {
    pub fn schema(&self) -> &Schema {
        match self {
            LogicalPlan::Projection(n) => &n.schema,
            LogicalPlan::Selection(n) => &n.schema,
            LogicalPlan::Aggregation(n) => &n.schema,
            LogicalPlan::Sort(n) => &n.schema,
            LogicalPlan::TopN(n) => &n.schema,
            LogicalPlan::Window(n) => &n.schema,
            LogicalPlan::Join(n) => &n.schema,
            LogicalPlan::Apply(n) => &n.schema,
            LogicalPlan::UnionAll(n) => &n.schema,
            LogicalPlan::UnionScan(n) => &n.schema,
            LogicalPlan::DataSource(n) => &n.schema,
            LogicalPlan::MemTable(n) => &n.schema,
            LogicalPlan::TableDual(n) => &n.schema,
            LogicalPlan::Limit(n) => &n.schema,
            LogicalPlan::Lock(n) => &n.schema,
        }
    }

    pub fn schema_mut(&mut self) -> &mut Schema {
        match self {
            LogicalPlan::Projection(n) => &mut n.schema,
            LogicalPlan::Selection(n) => &mut n.schema,
            LogicalPlan::Aggregation(n) => &mut n.schema,
            LogicalPlan::Sort(n) => &mut n.schema,
            LogicalPlan::TopN(n) => &mut n.schema,
            LogicalPlan::Window(n) => &mut n.schema,
            LogicalPlan::Join(n) => &mut n.schema,
            LogicalPlan::Apply(n) => &mut n.schema,
            LogicalPlan::UnionAll(n) => &mut n.schema,
            LogicalPlan::UnionScan(n) => &mut n.schema,
            LogicalPlan::DataSource(n) => &mut n.schema,
            LogicalPlan::MemTable(n) => &mut n.schema,
            LogicalPlan::TableDual(n) => &mut n.schema,
            LogicalPlan::Limit(n) => &mut n.schema,
            LogicalPlan::Lock(n) => &mut n.schema,
        }
    }

    pub fn children(&self) -> Vec<&LogicalPlan> {
        match self {
            LogicalPlan::Projection(n) => vec![&n.child],
            LogicalPlan::Selection(n) => vec![&n.child],
            LogicalPlan::Aggregation(n) => vec![&n.child],
            LogicalPlan::Sort(n) => vec![&n.child],
            LogicalPlan::TopN(n) => vec![&n.child],
            LogicalPlan::Window(n) => vec![&n.child],
            LogicalPlan::Join(n) => vec![&n.left, &n.right],
            LogicalPlan::Apply(n) => vec![&n.left, &n.right],
            LogicalPlan::UnionAll(n) => n.children.iter().collect(),
            LogicalPlan::UnionScan(n) => vec![&n.child],
            LogicalPlan::DataSource(_) => vec![],
            LogicalPlan::MemTable(_) => vec![],
            LogicalPlan::TableDual(_) => vec![],
            LogicalPlan::Limit(n) => vec![&n.child],
            LogicalPlan::Lock(n) => vec![&n.child],
        }
    }

    /// This node's own payload expressions (not its children's). Used by
    /// correlated-column extraction, which needs to scan every expression
    /// in a subtree.
    pub fn expressions(&self) -> Vec<&Expr> {
        match self {
            LogicalPlan::Projection(n) => n.exprs.iter().collect(),
            LogicalPlan::Selection(n) => n.conditions.iter().collect(),
            LogicalPlan::Aggregation(n) => n
                .agg_funcs
                .iter()
                .flat_map(|f| f.args.iter())
                .chain(n.group_by.iter())
                .collect(),
            LogicalPlan::Sort(n) => n.by_items.iter().map(|i| &i.expr).collect(),
            LogicalPlan::TopN(n) => n.by_items.iter().map(|i| &i.expr).collect(),
            LogicalPlan::Window(n) => n
                .func_descs
                .iter()
                .flat_map(|f| f.args.iter())
                .chain(n.partition_by.iter())
                .chain(n.order_by.iter().map(|i| &i.expr))
                .collect(),
            LogicalPlan::Join(n) => n
                .equal_conds
                .iter()
                .chain(n.left_conds.iter())
                .chain(n.right_conds.iter())
                .chain(n.other_conds.iter())
                .collect(),
            LogicalPlan::Apply(n) => n
                .equal_conds
                .iter()
                .chain(n.left_conds.iter())
                .chain(n.right_conds.iter())
                .chain(n.other_conds.iter())
                .collect(),
            LogicalPlan::UnionAll(_) => vec![],
            LogicalPlan::UnionScan(n) => n.conditions.iter().collect(),
            LogicalPlan::DataSource(n) => n.all_conds.iter().collect(),
            LogicalPlan::MemTable(_) => vec![],
            LogicalPlan::TableDual(_) => vec![],
            LogicalPlan::Limit(_) => vec![],
            LogicalPlan::Lock(_) => vec![],
        }
    }

    pub fn is_projection(&self) -> bool {
        matches!(self, LogicalPlan::Projection(_))
    }
}
