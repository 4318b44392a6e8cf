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

//! [`AggFuncDesc`]: aggregate function descriptors, including the internal
//! `FIRST_ROW` aggregate the pruning rule synthesizes.

use crate::{utils::is_side_effecting, Expr, OrderByItem};
use arrow_schema::DataType;
use relplan_common::{PlanError, Result};

/// `FIRST_ROW` is internal: unlike a standard aggregate it returns *no* rows
/// on empty input rather than one `NULL` row, which is why the pruning rule
/// must never let every aggregate in a node collapse down to only
/// `FIRST_ROW`s without an accompanying cardinality-preserving repair.
pub const FIRST_ROW: &str = "FIRST_ROW";
pub const COUNT: &str = "COUNT";
pub const SUM: &str = "SUM";
pub const MIN: &str = "MIN";
pub const MAX: &str = "MAX";
pub const AVG: &str = "AVG";
pub const BIT_OR: &str = "BIT_OR";
pub const BIT_AND: &str = "BIT_AND";
pub const BIT_XOR: &str = "BIT_XOR";
pub const GROUP_CONCAT: &str = "GROUP_CONCAT";

const KNOWN_AGG_NAMES: &[&str] = &[
    FIRST_ROW,
    COUNT,
    SUM,
    MIN,
    MAX,
    AVG,
    BIT_OR,
    BIT_AND,
    BIT_XOR,
    GROUP_CONCAT,
];

/// An aggregate function call: name, arguments, an optional `ORDER BY`
/// (used by ordered-set aggregates like `GROUP_CONCAT`), and the retained
/// output type.
#[derive(Debug, Clone, PartialEq)]
pub struct AggFuncDesc {
    pub name: String,
    pub args: Vec<Expr>,
    pub order_by_items: Vec<OrderByItem>,
    pub ret_type: DataType,
    pub distinct: bool,
}

impl AggFuncDesc {
    /// Constructs a new aggregate descriptor, rejecting unrecognized names.
    ///
    /// This is the sole fallible constructor the pruning rule itself calls
    /// (when synthesizing `COUNT(1)`/`FIRST_ROW(1)`), and the only place a
    /// [`PlanError`] originates from inside the rule rather than from
    /// recursion into a child.
    pub fn try_new(
        name: impl Into<String>,
        args: Vec<Expr>,
        distinct: bool,
        ret_type: DataType,
    ) -> Result<Self> {
        let name = name.into().to_ascii_uppercase();
        if !KNOWN_AGG_NAMES.contains(&name.as_str()) {
            return Err(PlanError::Plan(format!(
                "unrecognized aggregate function name: {name}"
            )));
        }
        Ok(Self {
            name,
            args,
            order_by_items: Vec::new(),
            ret_type,
            distinct,
        })
    }

    pub fn is_first_row(&self) -> bool {
        self.name == FIRST_ROW
    }

    /// A synthetic `COUNT(1)`, appended by the aggregation rule to preserve
    /// row-count semantics once every real aggregate has been pruned away.
    pub fn count_one(ret_type: DataType) -> Self {
        Self {
            name: COUNT.to_string(),
            args: vec![Expr::one()],
            order_by_items: Vec::new(),
            ret_type,
            distinct: false,
        }
    }

    /// A synthetic `FIRST_ROW(1)`, used instead of `COUNT(1)` when every
    /// surviving aggregate was already `FIRST_ROW`. `FIRST_ROW`'s
    /// empty-input semantics differ from `COUNT`'s, so swapping it in for a
    /// real `COUNT` would change cardinality on empty input.
    pub fn first_row_one(ret_type: DataType) -> Self {
        Self {
            name: FIRST_ROW.to_string(),
            args: vec![Expr::one()],
            order_by_items: Vec::new(),
            ret_type,
            distinct: false,
        }
    }

    /// Side-effect-free iff none of this aggregate's arguments is.
    pub fn is_side_effect_free(&self) -> bool {
        !self.args.iter().any(is_side_effecting)
    }
}
