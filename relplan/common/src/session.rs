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

//! [`Session`]: the only piece of shared mutable state the optimizer
//! touches, a monotonic column-ID allocator.

use crate::ColumnId;
use std::sync::atomic::{AtomicU64, Ordering};

/// Per-query planning session.
///
/// A `Session` hands out fresh, non-colliding [`ColumnId`]s. Each logical
/// plan being optimized owns a distinct `Session`, so concurrent
/// optimization of distinct plans never contends on this counter.
#[derive(Debug)]
pub struct Session {
    next_column_id: AtomicU64,
}

impl Session {
    /// Creates a session whose first allocated ID is `start`.
    ///
    /// Callers building a plan by hand should pass one past the highest
    /// `ColumnId` already present in that plan, so newly allocated IDs
    /// cannot collide with pre-existing ones.
    pub fn new(start: u64) -> Self {
        Self {
            next_column_id: AtomicU64::new(start),
        }
    }

    /// Allocates the next unique plan column ID.
    pub fn alloc_plan_column_id(&self) -> ColumnId {
        ColumnId(self.next_column_id.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(0)
    }
}
