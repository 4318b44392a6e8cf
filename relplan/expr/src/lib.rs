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

//! Expression tree, aggregate/window descriptors, and the expression-level
//! analysis helpers the column-pruning rule is built from.

mod aggregate;
mod expr;
mod order;
pub mod utils;
mod window;

pub use aggregate::{
    AggFuncDesc, AVG, BIT_AND, BIT_OR, BIT_XOR, COUNT, FIRST_ROW, GROUP_CONCAT, MAX, MIN, SUM,
};
pub use expr::{Expr, ScalarFunctionExpr, ScalarValue};
pub use order::OrderByItem;
pub use utils::{SET_VAR, SLEEP};
pub use window::WindowFuncDesc;
