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

//! Catalog stand-ins: just enough of a table catalog for the `DataSource`
//! and `MemTable` leaf rules to consult.

use relplan_common::Column;
use std::collections::HashMap;

/// A reference to a base table, carried by `DataSource`/`MemTable` nodes.
///
/// The pruning rule never interprets `id`/`name` itself; it only ever asks
/// a [`CatalogLookup`] whether the table behind this reference is a cluster
/// table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableInfo {
    pub id: i64,
    pub name: String,
}

impl TableInfo {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// The subset of the table catalog the column-pruning rule consults:
/// whether a table is a TiDB-style "cluster table" (a table whose rows are
/// addressed by the primary key rather than a synthetic row ID; relevant to
/// the DataSource empty-schema repair).
pub trait CatalogLookup: Send + Sync {
    fn is_cluster_table(&self, table: &TableInfo) -> bool;
}

/// A small in-memory [`CatalogLookup`], sufficient for constructing plans
/// in tests without standing up a real catalog.
#[derive(Debug, Default)]
pub struct SimpleCatalog {
    cluster_tables: HashMap<i64, bool>,
}

impl SimpleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cluster_table(mut self, table_id: i64) -> Self {
        self.cluster_tables.insert(table_id, true);
        self
    }
}

impl CatalogLookup for SimpleCatalog {
    fn is_cluster_table(&self, table: &TableInfo) -> bool {
        *self.cluster_tables.get(&table.id).unwrap_or(&false)
    }
}

/// Column-level catalog metadata, position-parallel to a `DataSource` or
/// `MemTable` node's schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub column: Column,
    /// Whether this is a storage-engine-synthesized column (e.g. the
    /// extra handle column manufactured by the empty-schema repair),
    /// rather than one the user's query actually named.
    pub hidden: bool,
}

impl ColumnInfo {
    pub fn new(column: Column) -> Self {
        Self {
            column,
            hidden: false,
        }
    }

    pub fn hidden(column: Column) -> Self {
        Self {
            column,
            hidden: true,
        }
    }
}

/// A row identifier exposed by a data source: either a single integer handle
/// column or a composite ("common") handle over several columns.
#[derive(Debug, Clone, PartialEq)]
pub enum HandleCols {
    Int(Column),
    Common(Vec<Column>),
}

impl HandleCols {
    pub fn columns(&self) -> Vec<Column> {
        match self {
            HandleCols::Int(c) => vec![c.clone()],
            HandleCols::Common(cs) => cs.clone(),
        }
    }

    pub fn first(&self) -> &Column {
        match self {
            HandleCols::Int(c) => c,
            HandleCols::Common(cs) => &cs[0],
        }
    }
}

/// The kinds of in-memory catalog/diagnostic table that participate in
/// column pruning. Every other `MemTable` is left untouched by the rule,
/// using an exhaustive enum rather than a string comparison so the
/// compiler flags call sites when a new participating kind is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemTableKind {
    StatementsSummary,
    StatementsSummaryHistory,
    StatementsSummaryEvicted,
    SlowQuery,
    ClusterSlowQuery,
    TidbTrx,
    ClusterTidbTrx,
    DataLockWaits,
    Deadlocks,
    ClusterDeadlocks,
}
