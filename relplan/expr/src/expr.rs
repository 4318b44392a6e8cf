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

//! [`Expr`]: the expression tree shared by every plan node payload.

use crate::{AggFuncDesc, WindowFuncDesc};
use arrow_schema::DataType;
use relplan_common::Column;
use std::sync::Arc;

/// A literal value carried by [`Expr::Literal`].
///
/// This is a deliberately small value domain, just enough for the planner's
/// own tests and for the constant-`1` placeholders the pruning rule
/// synthesizes.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Int64(Option<i64>),
    Utf8(Option<String>),
    Boolean(Option<bool>),
    /// An untyped `NULL` literal. Distinct from `Int64(None)` etc: this is
    /// the "NULL literal type" the ordering-key cleanup looks for.
    Null,
}

impl ScalarValue {
    pub fn data_type(&self) -> DataType {
        match self {
            ScalarValue::Int64(_) => DataType::Int64,
            ScalarValue::Utf8(_) => DataType::Utf8,
            ScalarValue::Boolean(_) => DataType::Boolean,
            ScalarValue::Null => DataType::Null,
        }
    }

    pub fn is_null_type(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }
}

/// A scalar function call: a name plus position-ordered arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarFunctionExpr {
    pub name: String,
    pub args: Vec<Expr>,
}

/// An expression tree over columns, constants, scalar functions, correlated
/// (outer) columns, and aggregate/window descriptors.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A reference to a column produced by this node's own child.
    Column(Column),
    /// A reference to a column produced by an *outer* query block, captured
    /// by `Apply`'s correlated-column extraction.
    CorrelatedColumn(Column),
    Literal(ScalarValue),
    ScalarFunction(ScalarFunctionExpr),
    /// An aggregate call appearing inside a non-`Aggregation` expression
    /// position (e.g. nested inside a `Projection` expr that simply forwards
    /// an already-computed aggregate column is represented as `Column`; this
    /// variant exists for expressions that embed the descriptor directly).
    Aggregate(Arc<AggFuncDesc>),
    Window(Arc<WindowFuncDesc>),
}

impl Expr {
    pub fn column(col: Column) -> Self {
        Expr::Column(col)
    }

    pub fn literal_int(v: i64) -> Self {
        Expr::Literal(ScalarValue::Int64(Some(v)))
    }

    /// The constant `1` literal used throughout the pruning rule as a
    /// cardinality-preserving placeholder argument/column.
    pub fn one() -> Self {
        Expr::literal_int(1)
    }

    pub fn null_literal() -> Self {
        Expr::Literal(ScalarValue::Null)
    }

    pub fn scalar_fn(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::ScalarFunction(ScalarFunctionExpr {
            name: name.into(),
            args,
        })
    }

    pub fn as_column(&self) -> Option<&Column> {
        match self {
            Expr::Column(c) => Some(c),
            _ => None,
        }
    }

    /// The expression's declared output type, used by the NULL-literal-type
    /// check in the ordering-key cleanup.
    pub fn data_type(&self) -> DataType {
        match self {
            Expr::Column(c) | Expr::CorrelatedColumn(c) => c.data_type.clone(),
            Expr::Literal(v) => v.data_type(),
            Expr::ScalarFunction(_) => DataType::Utf8,
            Expr::Aggregate(a) => a.ret_type.clone(),
            Expr::Window(w) => w.ret_type.clone(),
        }
    }
}
