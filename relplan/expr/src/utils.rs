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

//! Expression-analysis helpers consumed by the column-pruning rule:
//! reference extraction, side-effect detection, runtime-constant detection
//! and structural hashing.

use crate::Expr;
use relplan_common::{Column, Schema};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// Scalar function names that mutate session state. An expression
/// referencing one of these must never be pruned away even when its result
/// column is unused.
pub const SET_VAR: &str = "SET_VAR";
/// Scalar function name whose side effect is observable timing rather than
/// session-state mutation; treated identically to [`SET_VAR`] for pruning.
pub const SLEEP: &str = "SLEEP";

/// Recursively collects every `Column`/`CorrelatedColumn` leaf referenced by
/// `expr` into `out`.
pub fn extract_columns(expr: &Expr, out: &mut HashSet<Column>) {
    match expr {
        Expr::Column(c) | Expr::CorrelatedColumn(c) => {
            out.insert(c.clone());
        }
        Expr::Literal(_) => {}
        Expr::ScalarFunction(f) => {
            for arg in &f.args {
                extract_columns(arg, out);
            }
        }
        Expr::Aggregate(a) => {
            for arg in &a.args {
                extract_columns(arg, out);
            }
            for item in &a.order_by_items {
                extract_columns(&item.expr, out);
            }
        }
        Expr::Window(w) => {
            for arg in &w.args {
                extract_columns(arg, out);
            }
        }
    }
}

/// Convenience wrapper returning a fresh set for a single expression.
pub fn columns_of(expr: &Expr) -> HashSet<Column> {
    let mut out = HashSet::new();
    extract_columns(expr, &mut out);
    out
}

/// Accumulates the columns referenced by every expression in `exprs` into
/// `seed`, skipping any expression for which `filter` returns `false`.
///
/// Mirrors the teacher's `extractColumnsFromExpressions(seed, exprs,
/// filter)`: the filter lets a caller (e.g. the aggregation rule) fold in
/// only the expressions that survived pruning.
pub fn extract_columns_from_expressions<'a, I, F>(
    mut seed: HashSet<Column>,
    exprs: I,
    mut filter: F,
) -> HashSet<Column>
where
    I: IntoIterator<Item = &'a Expr>,
    F: FnMut(&Expr) -> bool,
{
    for expr in exprs {
        if filter(expr) {
            extract_columns(expr, &mut seed);
        }
    }
    seed
}

/// Positional membership test: for each column in `schema`, is it present in
/// `required`?
pub fn get_used_list(required: &HashSet<Column>, schema: &Schema) -> Vec<bool> {
    schema.iter().map(|c| required.contains(c)).collect()
}

/// True iff `expr`'s tree contains a scalar function call named `SET_VAR` or
/// `SLEEP`. Detected structurally, independent of argument values.
pub fn is_side_effecting(expr: &Expr) -> bool {
    match expr {
        Expr::Column(_) | Expr::CorrelatedColumn(_) | Expr::Literal(_) => false,
        Expr::ScalarFunction(f) => {
            let name = f.name.to_ascii_uppercase();
            name == SET_VAR || name == SLEEP || f.args.iter().any(is_side_effecting)
        }
        Expr::Aggregate(a) => a.args.iter().any(is_side_effecting),
        Expr::Window(w) => w.args.iter().any(is_side_effecting),
    }
}

/// True iff `expr`'s value does not depend on the current row: a literal, a
/// correlated (outer) column reference, or a scalar function applied only
/// to runtime-constant arguments. Used by the ordering-key cleanup to
/// decide whether a column-free key may be dropped.
pub fn is_runtime_const_expr(expr: &Expr) -> bool {
    match expr {
        Expr::Literal(_) | Expr::CorrelatedColumn(_) => true,
        Expr::Column(_) => false,
        Expr::ScalarFunction(f) => {
            !is_side_effecting(expr) && f.args.iter().all(is_runtime_const_expr)
        }
        Expr::Aggregate(_) | Expr::Window(_) => false,
    }
}

/// A canonical, type-aware structural hash of `expr`.
///
/// Two expressions with different types but otherwise identical structure
/// hash differently, because the declared type is folded into the hash
/// alongside the shape.
pub fn structural_hash(expr: &Expr) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_expr(expr, &mut hasher);
    hasher.finish()
}

fn hash_expr<H: Hasher>(expr: &Expr, hasher: &mut H) {
    std::mem::discriminant(expr).hash(hasher);
    format!("{:?}", expr.data_type()).hash(hasher);
    match expr {
        Expr::Column(c) | Expr::CorrelatedColumn(c) => c.id.hash(hasher),
        Expr::Literal(v) => format!("{v:?}").hash(hasher),
        Expr::ScalarFunction(f) => {
            f.name.hash(hasher);
            for arg in &f.args {
                hash_expr(arg, hasher);
            }
        }
        Expr::Aggregate(a) => {
            a.name.hash(hasher);
            for arg in &a.args {
                hash_expr(arg, hasher);
            }
        }
        Expr::Window(w) => {
            w.name.hash(hasher);
            for arg in &w.args {
                hash_expr(arg, hasher);
            }
        }
    }
}
