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

//! [`OrderByItem`]: a single key of an `ORDER BY` / window / top-N key list.

use crate::Expr;

/// One key of an ordering list. Shared by `Sort`, `TopN`, and `Window`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByItem {
    pub expr: Expr,
    pub desc: bool,
}

impl OrderByItem {
    pub fn new(expr: Expr, desc: bool) -> Self {
        Self { expr, desc }
    }

    pub fn asc(expr: Expr) -> Self {
        Self::new(expr, false)
    }
}
