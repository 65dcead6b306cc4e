// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries, backend-agnostic Diesel DSL only.

pub mod availability;
pub mod capacity;
pub mod reservations;
pub mod resources;
