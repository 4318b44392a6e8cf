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

//! Error type shared across the `relplan` crates.

use std::fmt;

/// Errors produced while building or rewriting a logical plan.
///
/// This mirrors the shape of `datafusion_common::DataFusionError`: a small,
/// closed set of variants that each carry a human-readable message, rather
/// than a deep hierarchy of error types per collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// An invariant that the planner itself is responsible for upholding
    /// was violated. Seeing this means there's a bug in the planner, not
    /// in the input plan.
    Internal(String),
    /// The plan as given is not valid (e.g. a position-parallel vector pair
    /// disagreed in length before the pass even started).
    Plan(String),
    /// A schema-level inconsistency (e.g. a referenced column is not present
    /// in any child schema).
    Schema(String),
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::Internal(msg) => write!(f, "Internal error: {msg}"),
            PlanError::Plan(msg) => write!(f, "Invalid plan: {msg}"),
            PlanError::Schema(msg) => write!(f, "Schema error: {msg}"),
        }
    }
}

impl std::error::Error for PlanError {}

impl From<fmt::Error> for PlanError {
    fn from(err: fmt::Error) -> Self {
        PlanError::Internal(err.to_string())
    }
}

/// Result alias used throughout the `relplan` crates.
pub type Result<T, E = PlanError> = std::result::Result<T, E>;
