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

//! A small plan-building DSL for the `column_prune` integration tests.
//!
//! Analogous to the `LogicalPlanBuilder` the teacher's `datafusion-expr`
//! crate exposes to its own optimizer tests, except built directly from
//! [`LogicalPlan`] variant structs rather than a builder type, since this
//! crate has no SQL-to-plan frontend to exercise.

#![allow(dead_code)]

use std::collections::HashMap;

use relplan_common::{Column, ColumnId, DataType, Schema, Session};
use relplan_expr::{AggFuncDesc, Expr, OrderByItem, WindowFuncDesc};
use relplan_optimizer::{
    Apply, CatalogLookup, ColumnInfo, DataSource, HandleCols, Join, JoinType, Limit, Lock,
    LockType, LogicalPlan, MemTable, MemTableKind, Projection, Selection, SimpleCatalog,
    TableDual, TableInfo, TopN, UnionScan, Window,
};

/// A fresh session, always starting column IDs at 100 so test plans can use
/// small literal IDs (1, 2, 3, ...) without colliding with anything the
/// pruner allocates during the test.
pub fn session() -> Session {
    Session::new(100)
}

pub fn col(session: &Session, name: &str, data_type: DataType) -> Column {
    Column::new(session.alloc_plan_column_id(), name, data_type)
}

pub fn int_col(session: &Session, name: &str) -> Column {
    col(session, name, DataType::Int64)
}

/// A minimal [`relplan_optimizer::OptimizerConfig`] for tests: a [`Session`]
/// plus a catalog that never reports a table as a cluster table unless told
/// to via [`TestConfig::with_cluster_table`].
pub struct TestConfig {
    session: Session,
    catalog: SimpleCatalog,
}

impl TestConfig {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            catalog: SimpleCatalog::new(),
        }
    }

    pub fn with_cluster_table(mut self, table_id: i64) -> Self {
        self.catalog = self.catalog.with_cluster_table(table_id);
        self
    }
}

impl relplan_optimizer::OptimizerConfig for TestConfig {
    fn catalog(&self) -> &dyn CatalogLookup {
        &self.catalog
    }

    fn session(&self) -> &Session {
        &self.session
    }
}

/// A leaf `DataSource` over `cols`, with no conditions and no declared
/// handle column, on a fresh non-cluster table.
pub fn data_source(table_id: i64, cols: Vec<Column>) -> LogicalPlan {
    data_source_with(table_id, cols, Vec::new(), None)
}

pub fn data_source_with(
    table_id: i64,
    cols: Vec<Column>,
    all_conds: Vec<Expr>,
    handle_cols: Option<HandleCols>,
) -> LogicalPlan {
    let columns = cols.iter().cloned().map(ColumnInfo::new).collect();
    LogicalPlan::DataSource(DataSource {
        schema: Schema::new(cols),
        columns,
        all_conds,
        handle_cols,
        table: TableInfo::new(table_id, format!("t{table_id}")),
    })
}

pub fn projection(exprs: Vec<Expr>, schema_cols: Vec<Column>, child: LogicalPlan) -> LogicalPlan {
    LogicalPlan::Projection(Projection {
        schema: Schema::new(schema_cols),
        exprs,
        child: Box::new(child),
    })
}

pub fn selection(conditions: Vec<Expr>, child: LogicalPlan) -> LogicalPlan {
    let schema = child.schema().clone();
    LogicalPlan::Selection(Selection {
        schema,
        conditions,
        child: Box::new(child),
    })
}

pub fn aggregation(
    agg_funcs: Vec<AggFuncDesc>,
    group_by: Vec<Expr>,
    schema_cols: Vec<Column>,
    child: LogicalPlan,
) -> LogicalPlan {
    LogicalPlan::Aggregation(relplan_optimizer::Aggregation {
        schema: Schema::new(schema_cols),
        agg_funcs,
        group_by,
        child: Box::new(child),
    })
}

pub fn sort(by_items: Vec<OrderByItem>, child: LogicalPlan) -> LogicalPlan {
    let schema = child.schema().clone();
    LogicalPlan::Sort(relplan_optimizer::Sort {
        schema,
        by_items,
        child: Box::new(child),
    })
}

#[allow(clippy::too_many_arguments)]
pub fn join(
    join_type: JoinType,
    equal_conds: Vec<Expr>,
    left_conds: Vec<Expr>,
    right_conds: Vec<Expr>,
    other_conds: Vec<Expr>,
    left: LogicalPlan,
    right: LogicalPlan,
    session: &Session,
) -> LogicalPlan {
    let schema =
        relplan_optimizer::build_join_schema(join_type, left.schema(), right.schema(), None, session);
    LogicalPlan::Join(Join {
        schema,
        join_type,
        equal_conds,
        left_conds,
        right_conds,
        other_conds,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn topn(by_items: Vec<OrderByItem>, count: u64, offset: u64, child: LogicalPlan) -> LogicalPlan {
    let schema = child.schema().clone();
    LogicalPlan::TopN(TopN {
        schema,
        by_items,
        count,
        offset,
        child: Box::new(child),
    })
}

pub fn limit(count: u64, offset: u64, child: LogicalPlan) -> LogicalPlan {
    let schema = child.schema().clone();
    LogicalPlan::Limit(Limit {
        schema,
        count,
        offset,
        child: Box::new(child),
    })
}

pub fn window(
    func_descs: Vec<WindowFuncDesc>,
    partition_by: Vec<Expr>,
    order_by: Vec<OrderByItem>,
    produced_cols: Vec<Column>,
    child: LogicalPlan,
) -> LogicalPlan {
    let mut schema = child.schema().clone();
    for col in produced_cols {
        schema.append(col);
    }
    LogicalPlan::Window(Window {
        schema,
        func_descs,
        partition_by,
        order_by,
        child: Box::new(child),
    })
}

#[allow(clippy::too_many_arguments)]
pub fn apply(
    join_type: JoinType,
    equal_conds: Vec<Expr>,
    left_conds: Vec<Expr>,
    right_conds: Vec<Expr>,
    other_conds: Vec<Expr>,
    left: LogicalPlan,
    right: LogicalPlan,
    session: &Session,
) -> LogicalPlan {
    let schema =
        relplan_optimizer::build_join_schema(join_type, left.schema(), right.schema(), None, session);
    LogicalPlan::Apply(Apply {
        schema,
        join_type,
        equal_conds,
        left_conds,
        right_conds,
        other_conds,
        corr_cols: Vec::new(),
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn union_scan(
    handle_cols: Option<HandleCols>,
    conditions: Vec<Expr>,
    child: LogicalPlan,
) -> LogicalPlan {
    let schema = child.schema().clone();
    LogicalPlan::UnionScan(UnionScan {
        schema,
        handle_cols,
        conditions,
        child: Box::new(child),
    })
}

pub fn table_dual(row_count: usize, cols: Vec<Column>) -> LogicalPlan {
    LogicalPlan::TableDual(TableDual {
        schema: Schema::new(cols),
        row_count,
    })
}

pub fn mem_table(
    kind: Option<MemTableKind>,
    table_id: i64,
    cols: Vec<Column>,
) -> LogicalPlan {
    let columns = cols.iter().cloned().map(ColumnInfo::new).collect();
    let names = cols.iter().map(|c| c.name.clone()).collect();
    LogicalPlan::MemTable(MemTable {
        schema: Schema::new(cols),
        kind,
        table_info: TableInfo::new(table_id, format!("mem{table_id}")),
        columns,
        names,
    })
}

pub fn lock(
    lock_type: LockType,
    tbl_id_to_handle: HashMap<i64, Vec<HandleCols>>,
    extra_pid_info: Option<Vec<Column>>,
    partitioned_table: bool,
    child: LogicalPlan,
) -> LogicalPlan {
    let schema = child.schema().clone();
    LogicalPlan::Lock(Lock {
        schema,
        lock_type,
        tbl_id_to_handle,
        extra_pid_info,
        partitioned_table,
        child: Box::new(child),
    })
}

/// Column IDs appearing in `plan`'s own schema, in order, as raw `u64`s --
/// convenient for asserting on a pruned plan's shape without re-threading
/// `Column` values out of the test body.
pub fn schema_ids(plan: &LogicalPlan) -> Vec<u64> {
    plan.schema().columns().iter().map(|c| c.id.0).collect()
}

pub fn id_of(col: &Column) -> ColumnId {
    col.id
}
