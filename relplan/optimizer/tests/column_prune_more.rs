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

//! Coverage for the operators `column_prune.rs` scenario tests don't
//! otherwise touch: `Window`, `Apply`, `UnionScan`, `Lock`, `MemTable`,
//! `TableDual`, `TopN` and `Limit`.

mod support;

use std::collections::HashMap;

#[ctor::ctor]
fn init() {
    let _ = env_logger::try_init();
}

use relplan_common::DataType;
use relplan_expr::{Expr, OrderByItem, WindowFuncDesc};
use relplan_optimizer::{HandleCols, JoinType, LockType, LogicalPlan, MemTableKind, OptimizerConfig};
use support::*;

fn prune(plan: &mut LogicalPlan, config: &TestConfig) {
    relplan_optimizer::column_prune(plan, config.session(), config)
        .expect("column_prune should not fail on a valid plan");
}

#[test]
fn window_drops_its_own_output_from_required_and_keeps_partition_and_order_keys() {
    let session = session();
    let a = int_col(&session, "a");
    let b = int_col(&session, "b");
    let c = int_col(&session, "c");
    let ds = data_source(1, vec![a.clone(), b.clone(), c.clone()]);
    let rn_col = int_col(&session, "row_number");
    let win = window(
        vec![WindowFuncDesc::new("ROW_NUMBER", vec![], DataType::Int64)],
        vec![Expr::Column(b.clone())],
        vec![OrderByItem::asc(Expr::Column(c.clone()))],
        vec![rn_col.clone()],
        ds,
    );
    // The parent only ever reads `a` and the window's own produced column;
    // it must not ask the Window node itself for `rn_col` back as an input.
    let out_col = int_col(&session, "a_out");
    let mut plan = projection(
        vec![Expr::Column(a.clone()), Expr::Column(rn_col.clone())],
        vec![out_col, int_col(&session, "rn_out")],
        win,
    );

    let config = TestConfig::new(session);
    prune(&mut plan, &config);

    let LogicalPlan::Projection(p) = &plan else { panic!("expected Projection") };
    let LogicalPlan::Window(w) = p.child.as_ref() else { panic!("expected Window") };
    assert_eq!(
        w.schema.len(),
        4,
        "a (projection), b (partition-by) and c (order-by) all survive, plus the produced column"
    );
    assert_eq!(w.schema.columns().last().unwrap().id, rn_col.id);
    let LogicalPlan::DataSource(d) = w.child.as_ref() else { panic!("expected DataSource") };
    let ids: Vec<u64> = d.schema.columns().iter().map(|c| c.id.0).collect();
    assert!(ids.contains(&a.id.0), "partition/order/projection-required `a` survives");
    assert!(ids.contains(&b.id.0), "partition-by key `b` survives");
    assert!(ids.contains(&c.id.0), "order-by key `c` survives");
}

#[test]
fn apply_discovers_correlated_columns_from_the_pruned_right_subtree() {
    let session = session();
    let l_a = int_col(&session, "l_a");
    let l_b = int_col(&session, "l_b");
    let left = data_source(1, vec![l_a.clone(), l_b.clone()]);
    let r_x = int_col(&session, "r_x");
    let right = data_source(2, vec![r_x.clone()]);
    // The right side's selection correlates against the left's `l_a`, but
    // nothing in the join conditions themselves mentions it.
    let right_sel = selection(
        vec![Expr::scalar_fn(
            "eq",
            vec![Expr::Column(r_x.clone()), Expr::CorrelatedColumn(l_a.clone())],
        )],
        right,
    );
    let applied = apply(
        JoinType::LeftSemi,
        vec![],
        vec![],
        vec![],
        vec![],
        left,
        right_sel,
        &session,
    );
    // Require nothing of the Apply's own output: if the correlated reference
    // weren't discovered, the left would need no columns at all.
    let const_col = int_col(&session, "one");
    let mut plan = projection(vec![Expr::one()], vec![const_col], applied);

    let config = TestConfig::new(session);
    prune(&mut plan, &config);

    let LogicalPlan::Projection(top) = &plan else { panic!("expected Projection") };
    let LogicalPlan::Apply(a) = top.child.as_ref() else { panic!("expected Apply") };
    assert!(a.corr_cols.iter().any(|c| c.id == l_a.id), "l_a is recorded as correlated");
    let LogicalPlan::DataSource(left_ds) = a.left.as_ref() else { panic!("expected DataSource") };
    assert!(
        left_ds.schema.columns().iter().any(|c| c.id == l_a.id),
        "l_a must survive pruning on the left even though no join condition mentions it"
    );
    assert!(
        !left_ds.schema.columns().iter().any(|c| c.id == l_b.id),
        "l_b is never referenced anywhere and should be dropped"
    );
}

#[test]
fn union_scan_pulls_in_handle_columns_and_condition_columns() {
    let session = session();
    let a = int_col(&session, "a");
    let handle = int_col(&session, "handle");
    let b = int_col(&session, "b");
    let ds = data_source(1, vec![a.clone(), handle.clone(), b.clone()]);
    let scan = union_scan(
        Some(HandleCols::Int(handle.clone())),
        vec![Expr::scalar_fn("gt", vec![Expr::Column(b.clone()), Expr::one()])],
        ds,
    );
    // Nothing above the scan reads anything itself.
    let const_col = int_col(&session, "one");
    let mut plan = projection(vec![Expr::one()], vec![const_col], scan);

    let config = TestConfig::new(session);
    prune(&mut plan, &config);

    let LogicalPlan::Projection(p) = &plan else { panic!("expected Projection") };
    let LogicalPlan::UnionScan(u) = p.child.as_ref() else { panic!("expected UnionScan") };
    let LogicalPlan::DataSource(d) = u.child.as_ref() else { panic!("expected DataSource") };
    let ids: Vec<u64> = d.schema.columns().iter().map(|c| c.id.0).collect();
    assert!(ids.contains(&handle.id.0), "handle column must survive");
    assert!(ids.contains(&b.id.0), "condition column must survive");
    assert!(!ids.contains(&a.id.0), "`a` is unused and should be dropped");
}

#[test]
fn select_for_update_lock_keeps_every_handle_column_alive() {
    let session = session();
    let a = int_col(&session, "a");
    let handle = int_col(&session, "handle");
    let ds = data_source(1, vec![a.clone(), handle.clone()]);
    let mut handles = HashMap::new();
    handles.insert(1i64, vec![HandleCols::Int(handle.clone())]);
    let locked = lock(LockType::ForUpdate, handles, None, false, ds);
    let const_col = int_col(&session, "one");
    let mut plan = projection(vec![Expr::one()], vec![const_col], locked);

    let config = TestConfig::new(session);
    prune(&mut plan, &config);

    let LogicalPlan::Projection(p) = &plan else { panic!("expected Projection") };
    let LogicalPlan::Lock(l) = p.child.as_ref() else { panic!("expected Lock") };
    let LogicalPlan::DataSource(d) = l.child.as_ref() else { panic!("expected DataSource") };
    assert!(
        d.schema.columns().iter().any(|c| c.id == handle.id),
        "FOR UPDATE must keep the handle column alive even though nothing else needs it"
    );
}

#[test]
fn plain_lock_delegates_without_extra_requirements() {
    let session = session();
    let a = int_col(&session, "a");
    let handle = int_col(&session, "handle");
    let ds = data_source(1, vec![a.clone(), handle.clone()]);
    let locked = lock(LockType::None, HashMap::new(), None, false, ds);
    let const_col = int_col(&session, "one");
    let mut plan = projection(vec![Expr::one()], vec![const_col], locked);

    let config = TestConfig::new(session);
    prune(&mut plan, &config);

    let LogicalPlan::Projection(p) = &plan else { panic!("expected Projection") };
    let LogicalPlan::Lock(l) = p.child.as_ref() else { panic!("expected Lock") };
    let LogicalPlan::DataSource(d) = l.child.as_ref() else { panic!("expected DataSource") };
    assert_eq!(
        d.schema.len(),
        1,
        "a non-FOR-UPDATE lock doesn't force the handle column to survive"
    );
}

#[test]
fn mem_table_of_a_participating_kind_drops_unused_columns_but_keeps_one() {
    let session = session();
    let a = int_col(&session, "a");
    let b = int_col(&session, "b");
    let mt = mem_table(Some(MemTableKind::SlowQuery), 1, vec![a.clone(), b.clone()]);
    let const_col = int_col(&session, "one");
    let mut plan = projection(vec![Expr::one()], vec![const_col], mt);

    let config = TestConfig::new(session);
    prune(&mut plan, &config);

    let LogicalPlan::Projection(p) = &plan else { panic!("expected Projection") };
    let LogicalPlan::MemTable(m) = p.child.as_ref() else { panic!("expected MemTable") };
    assert_eq!(m.schema.len(), 1, "at least one column always survives");
    assert_eq!(m.columns.len(), 1);
    assert_eq!(m.names.len(), 1);
}

#[test]
fn mem_table_of_a_non_participating_kind_is_untouched() {
    let session = session();
    let a = int_col(&session, "a");
    let b = int_col(&session, "b");
    let mt = mem_table(None, 1, vec![a.clone(), b.clone()]);
    let const_col = int_col(&session, "one");
    let mut plan = projection(vec![Expr::one()], vec![const_col], mt);

    let config = TestConfig::new(session);
    prune(&mut plan, &config);

    let LogicalPlan::Projection(p) = &plan else { panic!("expected Projection") };
    let LogicalPlan::MemTable(m) = p.child.as_ref() else { panic!("expected MemTable") };
    assert_eq!(m.schema.len(), 2, "non-participating MemTable kinds are left alone");
}

#[test]
fn table_dual_drops_unused_positions() {
    let session = session();
    let a = int_col(&session, "a");
    let b = int_col(&session, "b");
    let td = table_dual(1, vec![a.clone(), b.clone()]);
    let out_col = int_col(&session, "a_out");
    let mut plan = projection(vec![Expr::Column(a.clone())], vec![out_col], td);

    let config = TestConfig::new(session);
    prune(&mut plan, &config);

    let LogicalPlan::Projection(p) = &plan else { panic!("expected Projection") };
    let LogicalPlan::TableDual(t) = p.child.as_ref() else { panic!("expected TableDual") };
    assert_eq!(t.schema.len(), 1);
    assert_eq!(t.schema.columns()[0].id, a.id);
}

#[test]
fn topn_cleans_ordering_keys_like_sort_does() {
    let session = session();
    let a = int_col(&session, "a");
    let b = int_col(&session, "b");
    let ds = data_source(1, vec![a.clone(), b.clone()]);
    let by_items = vec![
        OrderByItem::asc(Expr::Column(a.clone())),
        OrderByItem::asc(Expr::Column(a.clone())),
        OrderByItem::asc(Expr::one()),
    ];
    let tn = topn(by_items, 10, 0, ds);
    let out_col = int_col(&session, "a_out");
    let mut plan = projection(vec![Expr::Column(a.clone())], vec![out_col], tn);

    let config = TestConfig::new(session);
    prune(&mut plan, &config);

    let LogicalPlan::Projection(p) = &plan else { panic!("expected Projection") };
    let LogicalPlan::TopN(t) = p.child.as_ref() else { panic!("expected TopN") };
    assert_eq!(t.by_items.len(), 1, "duplicate and constant keys are dropped");
    let LogicalPlan::DataSource(d) = t.child.as_ref() else { panic!("expected DataSource") };
    assert_eq!(d.schema.len(), 1, "`b` is never referenced once the redundant sort key is gone");
    assert_eq!(d.schema.columns()[0].id, a.id);
}

#[test]
fn limit_with_empty_required_set_is_left_entirely_unpruned() {
    // Mirrors a LIMIT appearing inside an UPDATE statement: nothing downstream
    // reads any of its output columns at all.
    let session = session();
    let a = int_col(&session, "a");
    let b = int_col(&session, "b");
    let ds = data_source(1, vec![a.clone(), b.clone()]);
    let lim = limit(5, 0, ds);
    let const_col = int_col(&session, "one");
    let mut plan = projection(vec![Expr::one()], vec![const_col], lim);

    let config = TestConfig::new(session);
    prune(&mut plan, &config);

    let LogicalPlan::Projection(p) = &plan else { panic!("expected Projection") };
    let LogicalPlan::Limit(l) = p.child.as_ref() else { panic!("expected Limit") };
    assert_eq!(l.schema.len(), 2, "an empty required set means Limit does not prune at all");
    let LogicalPlan::DataSource(d) = l.child.as_ref() else { panic!("expected DataSource") };
    assert_eq!(d.schema.len(), 2, "the child under an unpruned Limit is untouched too");
}

#[test]
fn limit_trims_schema_to_what_the_parent_actually_needs() {
    let session = session();
    let a = int_col(&session, "a");
    let b = int_col(&session, "b");
    let ds = data_source(1, vec![a.clone(), b.clone()]);
    let lim = limit(5, 0, ds);
    let out_col = int_col(&session, "a_out");
    let mut plan = projection(vec![Expr::Column(a.clone())], vec![out_col], lim);

    let config = TestConfig::new(session);
    prune(&mut plan, &config);

    let LogicalPlan::Projection(p) = &plan else { panic!("expected Projection") };
    let LogicalPlan::Limit(l) = p.child.as_ref() else { panic!("expected Limit") };
    assert_eq!(l.schema.len(), 1, "Limit's schema is trimmed to the minimal required prefix");
    assert_eq!(l.schema.columns()[0].id, a.id);
}
