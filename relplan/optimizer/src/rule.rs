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

//! The `OptimizerRule`/`OptimizerConfig` traits every logical-plan rewrite
//! in this crate is shaped around, matching the seams
//! `datafusion-optimizer` exposes to its own rules.

use crate::catalog::CatalogLookup;
use crate::plan::LogicalPlan;
use relplan_common::{Result, Session};

/// A single logical-plan rewrite.
///
/// Mirrors `datafusion_optimizer::OptimizerRule`: a rule either produces a
/// rewritten plan or declines (`Ok(None)`), and never panics on a
/// structurally valid input.
pub trait OptimizerRule {
    fn try_optimize(
        &self,
        plan: &LogicalPlan,
        config: &dyn OptimizerConfig,
    ) -> Result<Option<LogicalPlan>>;

    fn name(&self) -> &str;
}

/// The configuration surface an `OptimizerRule` may consult.
///
/// `ColumnPruneRule` only ever uses [`OptimizerConfig::catalog`], to ask the
/// `DataSource`/`MemTable` leaf rules whether a table is a cluster table;
/// every other knob a fuller optimizer config would carry (query start
/// time, session variables, …) is out of scope for this crate.
pub trait OptimizerConfig {
    fn catalog(&self) -> &dyn CatalogLookup;

    /// The column-ID allocator for the session this plan belongs to.
    fn session(&self) -> &Session;
}
