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

//! The `relplan` logical plan model and its column-pruning optimizer rule.
//!
//! `column_prune` rewrites a logical plan so that every operator reads,
//! computes, and emits only the columns transitively required by its
//! consumers, while preserving the multiset of rows the plan produces.

mod catalog;
mod column_prune;
mod join;
mod plan;
mod rule;
mod util;

pub use catalog::{CatalogLookup, ColumnInfo, HandleCols, MemTableKind, SimpleCatalog, TableInfo};
pub use column_prune::{column_prune, ColumnPruneRule};
pub use join::{
    build_join_schema, extract_correlated_columns, is_select_for_update_lock_type, JoinType,
    LockType,
};
pub use plan::{
    Aggregation, Apply, DataSource, Join, Limit, Lock, LogicalPlan, MemTable, Projection,
    Selection, Sort, TableDual, TopN, UnionAll, UnionScan, Window,
};
pub use rule::{OptimizerConfig, OptimizerRule};
