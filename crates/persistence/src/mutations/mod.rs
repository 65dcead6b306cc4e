// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.
//!
//! All multi-step writes run inside a single immediate transaction; a
//! failed verification rolls the whole write back and the store is
//! unchanged.

pub mod reservations;
pub mod reserve;
pub mod resources;
