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

//! [`WindowFuncDesc`]: window function descriptors.

use crate::Expr;
use arrow_schema::DataType;

/// A window function call, e.g. `ROW_NUMBER()` or `SUM(a) OVER (...)`.
///
/// The partition-by and order-by lists live on the owning `Window` plan node
/// (they are shared across all of a window node's function descriptors), not
/// here.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowFuncDesc {
    pub name: String,
    pub args: Vec<Expr>,
    pub ret_type: DataType,
}

impl WindowFuncDesc {
    pub fn new(name: impl Into<String>, args: Vec<Expr>, ret_type: DataType) -> Self {
        Self {
            name: name.into(),
            args,
            ret_type,
        }
    }
}
