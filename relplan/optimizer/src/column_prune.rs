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

//! `column_prune`: the column-pruning optimizer rule.
//!
//! A single top-down tree walk with an inherited attribute (the set of
//! columns the parent requires) and a synthesized effect (the node's
//! mutated schema and expressions). Each plan-node variant has its own
//! pruning rule below; [`prune_node`] is the exhaustive dispatcher every
//! rule recurses back through.

use crate::catalog::{ColumnInfo, HandleCols};
use crate::join::{build_join_schema, extract_correlated_columns, is_select_for_update_lock_type};
use crate::plan::{
    Aggregation, Apply, DataSource, Join, Limit, Lock, LogicalPlan, MemTable, Projection,
    Selection, Sort, TableDual, TopN, UnionAll, UnionScan, Window,
};
use crate::rule::{OptimizerConfig, OptimizerRule};
use crate::util::{clean_ordering_keys, inline_projection, repair_empty_projection};
use arrow_schema::DataType;
use itertools::{izip, Itertools};
use log::{debug, trace};
use relplan_common::{Column, Result, Schema, Session};
use relplan_expr::utils::{columns_of, extract_columns, get_used_list, is_side_effecting};
use relplan_expr::{AggFuncDesc, Expr};
use std::collections::HashSet;

/// The column-pruning optimizer rule.
///
/// Rewrites a logical plan so that every operator reads, computes, and
/// emits only the columns transitively required by its consumers, without
/// changing the multiset of rows the plan produces.
#[derive(Default)]
pub struct ColumnPruneRule {}

impl ColumnPruneRule {
    pub fn new() -> Self {
        Self {}
    }
}

impl OptimizerRule for ColumnPruneRule {
    fn try_optimize(
        &self,
        plan: &LogicalPlan,
        config: &dyn OptimizerConfig,
    ) -> Result<Option<LogicalPlan>> {
        let mut plan = plan.clone();
        column_prune(&mut plan, config.session(), config)?;
        Ok(Some(plan))
    }

    fn name(&self) -> &str {
        "column_prune"
    }
}

/// Entry point: prunes `plan` in place, treating its own output schema as
/// the initial required-column set.
pub fn column_prune(
    plan: &mut LogicalPlan,
    session: &Session,
    config: &dyn OptimizerConfig,
) -> Result<()> {
    let required: HashSet<Column> = plan.schema().columns().iter().cloned().collect();
    debug!(
        "column_prune: entering with root schema of {} columns",
        required.len()
    );
    prune_node(plan, required, session, config)?;
    debug!(
        "column_prune: exiting with root schema of {} columns",
        plan.schema().len()
    );
    Ok(())
}

/// Prunes `child`, then repairs it if pruning left it an empty-schema
/// `Projection`. Every rule below that owns exactly one child
/// recurses through this helper rather than calling [`prune_node`] directly,
/// so the repair is never forgotten at a call site.
fn prune_child(
    child: &mut LogicalPlan,
    required: HashSet<Column>,
    session: &Session,
    config: &dyn OptimizerConfig,
) -> Result<()> {
    prune_node(child, required, session, config)?;
    repair_empty_projection(child, session);
    Ok(())
}

fn prune_node(
    plan: &mut LogicalPlan,
    required: HashSet<Column>,
    session: &Session,
    config: &dyn OptimizerConfig,
) -> Result<()> {
    match plan {
        LogicalPlan::Projection(p) => prune_projection(p, &required, session, config),
        LogicalPlan::Selection(s) => prune_selection(s, &required, session, config),
        LogicalPlan::Aggregation(a) => prune_aggregation(a, &required, session, config),
        LogicalPlan::Sort(s) => prune_sort(s, &required, session, config),
        LogicalPlan::TopN(t) => prune_topn(t, &required, session, config),
        LogicalPlan::Window(w) => prune_window(w, &required, session, config),
        LogicalPlan::Join(j) => prune_join(j, &required, session, config),
        LogicalPlan::Apply(a) => prune_apply(a, &required, session, config),
        LogicalPlan::UnionAll(u) => prune_union_all(u, &required, session, config),
        LogicalPlan::UnionScan(u) => prune_union_scan(u, &required, session, config),
        LogicalPlan::DataSource(d) => prune_data_source(d, &required, session, config),
        LogicalPlan::MemTable(m) => prune_mem_table(m, &required),
        LogicalPlan::TableDual(t) => prune_table_dual(t, &required),
        LogicalPlan::Limit(l) => prune_limit(l, required, session, config),
        LogicalPlan::Lock(l) => prune_lock(l, required, session, config),
    }
}

/// Prunes a `Projection`: drop unused, side-effect-free output positions.
fn prune_projection(
    p: &mut Projection,
    required: &HashSet<Column>,
    session: &Session,
    config: &dyn OptimizerConfig,
) -> Result<()> {
    let n = p.exprs.len();
    for i in (0..n).rev() {
        let col = p.schema.columns()[i].clone();
        if !required.contains(&col) && !is_side_effecting(&p.exprs[i]) {
            p.schema.remove(i);
            p.exprs.remove(i);
            trace!("prune_projection: dropped unused position {i}");
        }
    }

    let mut self_required = HashSet::new();
    for expr in &p.exprs {
        extract_columns(expr, &mut self_required);
    }
    prune_child(&mut p.child, self_required, session, config)
}

/// Prunes a `Selection`: left structurally unchanged, its conditions just
/// contribute their referenced columns to what the child must produce.
fn prune_selection(
    s: &mut Selection,
    required: &HashSet<Column>,
    session: &Session,
    config: &dyn OptimizerConfig,
) -> Result<()> {
    let mut self_required = required.clone();
    for cond in &s.conditions {
        extract_columns(cond, &mut self_required);
    }
    prune_child(&mut s.child, self_required, session, config)?;
    s.schema = s.child.schema().clone();
    Ok(())
}

/// Prunes an `Aggregation`: drops unused, side-effect-free aggregates,
/// repairing the aggregate list and the group-by list so cardinality is
/// preserved even when every real aggregate disappears.
fn prune_aggregation(
    a: &mut Aggregation,
    required: &HashSet<Column>,
    session: &Session,
    config: &dyn OptimizerConfig,
) -> Result<()> {
    let n = a.agg_funcs.len();
    let mut keep = vec![true; n];
    let mut all_first_row = true;
    let mut all_remain_first_row = true;

    for i in (0..n).rev() {
        let is_first_row = a.agg_funcs[i].is_first_row();
        if !is_first_row {
            all_first_row = false;
        }
        let used = required.contains(&a.schema.columns()[i]);
        if !used && a.agg_funcs[i].is_side_effect_free() {
            keep[i] = false;
        }
        if keep[i] && !is_first_row {
            all_remain_first_row = false;
        }
    }

    for i in (0..n).rev() {
        if !keep[i] {
            a.schema.remove(i);
            a.agg_funcs.remove(i);
            trace!("prune_aggregation: dropped unused aggregate at position {i}");
        }
    }

    if a.agg_funcs.is_empty() || (!all_first_row && all_remain_first_row) {
        let synthetic = if all_first_row {
            AggFuncDesc::first_row_one(DataType::Int64)
        } else {
            AggFuncDesc::count_one(DataType::Int64)
        };
        let id = session.alloc_plan_column_id();
        let name = synthetic.name.to_ascii_lowercase();
        a.schema.append(Column::new(id, name, synthetic.ret_type.clone()));
        a.agg_funcs.push(synthetic);
        trace!("prune_aggregation: injected cardinality-preserving synthetic aggregate");
    }

    let mut self_required = HashSet::new();
    for f in a.agg_funcs.iter_mut() {
        for arg in &f.args {
            extract_columns(arg, &mut self_required);
        }
        let (cleaned, order_required) = clean_ordering_keys(std::mem::take(&mut f.order_by_items));
        f.order_by_items = cleaned;
        self_required.extend(order_required);
    }

    let original_group_by_len = a.group_by.len();
    let m = a.group_by.len();
    let mut group_keep = vec![true; m];
    for i in (0..m).rev() {
        let refs = columns_of(&a.group_by[i]);
        if refs.is_empty() && !is_side_effecting(&a.group_by[i]) {
            group_keep[i] = false;
        }
    }
    for i in (0..m).rev() {
        if !group_keep[i] {
            a.group_by.remove(i);
        }
    }
    if a.group_by.is_empty() && original_group_by_len > 0 {
        a.group_by.push(Expr::one());
    } else {
        for g in &a.group_by {
            self_required.extend(columns_of(g));
        }
    }

    prune_child(&mut a.child, self_required, session, config)
}

/// Prunes a `Sort`.
fn prune_sort(
    s: &mut Sort,
    required: &HashSet<Column>,
    session: &Session,
    config: &dyn OptimizerConfig,
) -> Result<()> {
    let (cleaned, order_required) = clean_ordering_keys(std::mem::take(&mut s.by_items));
    s.by_items = cleaned;
    let mut self_required = required.clone();
    self_required.extend(order_required);
    prune_child(&mut s.child, self_required, session, config)?;
    s.schema = s.child.schema().clone();
    Ok(())
}

/// Prunes a `TopN`.
fn prune_topn(
    t: &mut TopN,
    required: &HashSet<Column>,
    session: &Session,
    config: &dyn OptimizerConfig,
) -> Result<()> {
    let (cleaned, order_required) = clean_ordering_keys(std::mem::take(&mut t.by_items));
    t.by_items = cleaned;
    let mut self_required = required.clone();
    self_required.extend(order_required);
    prune_child(&mut t.child, self_required, session, config)?;
    t.schema = t.child.schema().clone();
    Ok(())
}

/// Prunes a `Window`.
fn prune_window(
    w: &mut Window,
    required: &HashSet<Column>,
    session: &Session,
    config: &dyn OptimizerConfig,
) -> Result<()> {
    let n_produced = w.func_descs.len();
    let produced: Vec<Column> = w
        .schema
        .columns()
        .iter()
        .skip(w.schema.len().saturating_sub(n_produced))
        .cloned()
        .collect();
    let produced_set: HashSet<Column> = produced.iter().cloned().collect();

    let mut self_required: HashSet<Column> =
        required.difference(&produced_set).cloned().collect();
    for f in &w.func_descs {
        for arg in &f.args {
            extract_columns(arg, &mut self_required);
        }
    }
    for pb in &w.partition_by {
        extract_columns(pb, &mut self_required);
    }
    let (cleaned_order_by, order_required) = clean_ordering_keys(std::mem::take(&mut w.order_by));
    w.order_by = cleaned_order_by;
    self_required.extend(order_required);

    prune_child(&mut w.child, self_required, session, config)?;

    let mut new_schema = w.child.schema().clone();
    for col in produced {
        new_schema.append(col);
    }
    w.schema = new_schema;
    Ok(())
}

/// Splits a combined required-column set by which child's (pre-pruning)
/// schema each column belongs to. Shared by `Join` and `Apply`.
fn partition_required(
    combined: &HashSet<Column>,
    left_schema: &Schema,
    right_schema: &Schema,
) -> (HashSet<Column>, HashSet<Column>) {
    let mut left = HashSet::new();
    let mut right = HashSet::new();
    for col in combined {
        if left_schema.contains(col) {
            left.insert(col.clone());
        } else if right_schema.contains(col) {
            right.insert(col.clone());
        }
    }
    (left, right)
}

fn join_combined_required(
    required: &HashSet<Column>,
    equal_conds: &[Expr],
    left_conds: &[Expr],
    right_conds: &[Expr],
    other_conds: &[Expr],
) -> HashSet<Column> {
    let mut combined = required.clone();
    for cond in equal_conds.iter().chain(left_conds).chain(right_conds).chain(other_conds) {
        extract_columns(cond, &mut combined);
    }
    combined
}

/// Prunes a `Join`.
fn prune_join(
    j: &mut Join,
    required: &HashSet<Column>,
    session: &Session,
    config: &dyn OptimizerConfig,
) -> Result<()> {
    let combined = join_combined_required(
        required,
        &j.equal_conds,
        &j.left_conds,
        &j.right_conds,
        &j.other_conds,
    );
    let (left_req, right_req) = partition_required(&combined, j.left.schema(), j.right.schema());

    prune_child(&mut j.left, left_req, session, config)?;
    prune_child(&mut j.right, right_req, session, config)?;

    let existing_mark = if j.join_type.has_mark_column() {
        j.schema.columns().last().cloned()
    } else {
        None
    };
    j.schema = build_join_schema(j.join_type, j.left.schema(), j.right.schema(), existing_mark, session);

    let mut out_required = required.clone();
    if j.join_type.has_mark_column() {
        if let Some(mark) = j.schema.columns().last() {
            out_required.insert(mark.clone());
        }
    }
    inline_projection(&mut j.schema, &out_required);
    Ok(())
}

/// Prunes an `Apply`.
fn prune_apply(
    a: &mut Apply,
    required: &HashSet<Column>,
    session: &Session,
    config: &dyn OptimizerConfig,
) -> Result<()> {
    let combined = join_combined_required(
        required,
        &a.equal_conds,
        &a.left_conds,
        &a.right_conds,
        &a.other_conds,
    );
    let (mut left_req, right_req) =
        partition_required(&combined, a.left.schema(), a.right.schema());

    // The right subtree is pruned first: only once it has settled can we
    // discover which of the left's columns it still correlates against.
    prune_child(&mut a.right, right_req, session, config)?;

    let corr = extract_correlated_columns(&a.right, a.left.schema());
    a.corr_cols = corr.clone();
    left_req.extend(corr);

    prune_child(&mut a.left, left_req, session, config)?;

    let existing_mark = if a.join_type.has_mark_column() {
        a.schema.columns().last().cloned()
    } else {
        None
    };
    a.schema = build_join_schema(a.join_type, a.left.schema(), a.right.schema(), existing_mark, session);
    Ok(())
}

/// Prunes a `UnionAll`.
fn prune_union_all(
    u: &mut UnionAll,
    required: &HashSet<Column>,
    session: &Session,
    config: &dyn OptimizerConfig,
) -> Result<()> {
    let used_against_self = get_used_list(required, &u.schema);
    let any_used = used_against_self.iter().any(|&b| b);
    let used = if any_used {
        used_against_self
    } else {
        vec![true; used_against_self.len()]
    };

    for child in u.children.iter_mut() {
        let mut child_required = HashSet::new();
        for (i, &keep) in used.iter().enumerate() {
            if keep {
                if let Some(col) = child.schema().columns().get(i) {
                    child_required.insert(col.clone());
                }
            }
        }
        prune_child(child, child_required, session, config)?;
    }

    if any_used {
        u.schema.retain_positions(&used);
        trace!("prune_union_all: dropped unused positions from union schema");
    }
    Ok(())
}

/// Prunes a `UnionScan`.
fn prune_union_scan(
    u: &mut UnionScan,
    required: &HashSet<Column>,
    session: &Session,
    config: &dyn OptimizerConfig,
) -> Result<()> {
    let mut self_required = required.clone();
    if let Some(handle_cols) = &u.handle_cols {
        self_required.extend(handle_cols.columns());
    }
    for cond in &u.conditions {
        extract_columns(cond, &mut self_required);
    }
    prune_child(&mut u.child, self_required, session, config)?;
    u.schema = u.child.schema().clone();
    Ok(())
}

/// Prunes a `DataSource` leaf.
fn prune_data_source(
    d: &mut DataSource,
    required: &HashSet<Column>,
    session: &Session,
    config: &dyn OptimizerConfig,
) -> Result<()> {
    let original_columns = d.columns.clone();
    let used = get_used_list(required, &d.schema);
    let mut expr_used = HashSet::new();
    for cond in &d.all_conds {
        extract_columns(cond, &mut expr_used);
    }

    let before = d.schema.len();
    let (kept_cols, kept_infos): (Vec<Column>, Vec<ColumnInfo>) = izip!(
        d.schema.columns().iter().cloned(),
        d.columns.iter().cloned(),
        used.iter()
    )
    .filter(|(col, _, &is_used)| is_used || expr_used.contains(col))
    .map(|(col, info, _)| (col, info))
    .unzip();
    d.schema = kept_cols.into_iter().collect();
    d.columns = kept_infos;
    if d.schema.len() != before {
        trace!(
            "prune_data_source: dropped {} unused position(s)",
            before - d.schema.len()
        );
    }

    if d.schema.is_empty() {
        let (chosen_col, chosen_info) = if config.catalog().is_cluster_table(&d.table)
            && !original_columns.is_empty()
        {
            let info = original_columns[0].clone();
            (info.column.clone(), info)
        } else if let Some(handle_cols) = &d.handle_cols {
            let col = handle_cols.first().clone();
            (col.clone(), ColumnInfo::new(col))
        } else {
            let id = session.alloc_plan_column_id();
            let col = Column::new(id, "_extra_handle", DataType::Int64);
            (col.clone(), ColumnInfo::hidden(col))
        };
        d.schema.append(chosen_col);
        d.columns.push(chosen_info);
        trace!("prune_data_source: repaired empty schema with a synthesized handle column");
    }

    if let Some(HandleCols::Int(handle_col)) = &d.handle_cols {
        if !d.schema.contains(handle_col) {
            d.handle_cols = None;
        }
    }
    Ok(())
}

/// Prunes a `MemTable` leaf.
fn prune_mem_table(m: &mut MemTable, required: &HashSet<Column>) -> Result<()> {
    if m.kind.is_none() {
        return Ok(());
    }
    let used = get_used_list(required, &m.schema);
    // Always keep at least one column: an in-memory catalog table queried
    // for zero columns still needs to report its row count.
    let keep_at_least_one = !used.iter().any(|&u| u);

    let before = m.schema.len();
    let (kept_cols, kept_columns, kept_names): (Vec<Column>, Vec<ColumnInfo>, Vec<String>) = izip!(
        m.schema.columns().iter().cloned(),
        m.columns.iter().cloned(),
        m.names.iter().cloned(),
        used.iter(),
        0usize..
    )
    .filter(|(_, _, _, &is_used, idx)| is_used || (keep_at_least_one && *idx == 0))
    .map(|(col, info, name, _, _)| (col, info, name))
    .multiunzip();
    m.schema = kept_cols.into_iter().collect();
    m.columns = kept_columns;
    m.names = kept_names;
    if m.schema.len() != before {
        trace!(
            "prune_mem_table: dropped {} unused position(s)",
            before - m.schema.len()
        );
    }
    Ok(())
}

/// Prunes a `TableDual` leaf.
fn prune_table_dual(t: &mut TableDual, required: &HashSet<Column>) -> Result<()> {
    let used = get_used_list(required, &t.schema);
    let n = t.schema.len();
    for i in (0..n).rev() {
        if !used[i] {
            t.schema.remove(i);
        }
    }
    Ok(())
}

/// Prunes a `Lock`.
fn prune_lock(
    l: &mut Lock,
    required: HashSet<Column>,
    session: &Session,
    config: &dyn OptimizerConfig,
) -> Result<()> {
    if !is_select_for_update_lock_type(l.lock_type) {
        prune_child(&mut l.child, required, session, config)?;
        l.schema = l.child.schema().clone();
        return Ok(());
    }

    let mut self_required = required;
    if l.partitioned_table {
        if let Some(pid_info) = &l.extra_pid_info {
            self_required.extend(pid_info.iter().cloned());
        }
    }
    for handles in l.tbl_id_to_handle.values() {
        for handle_cols in handles {
            self_required.extend(handle_cols.columns());
        }
    }
    prune_child(&mut l.child, self_required, session, config)?;
    l.schema = l.child.schema().clone();
    Ok(())
}

/// Prunes a `Limit`.
fn prune_limit(
    l: &mut Limit,
    required: HashSet<Column>,
    session: &Session,
    config: &dyn OptimizerConfig,
) -> Result<()> {
    if required.is_empty() {
        // LIMIT appearing inside an UPDATE: nothing downstream reads its
        // output schema, so there is nothing to prune.
        return Ok(());
    }
    let saved = required.clone();
    prune_child(&mut l.child, required, session, config)?;
    l.schema = l.child.schema().clone();
    inline_projection(&mut l.schema, &saved);
    Ok(())
}
