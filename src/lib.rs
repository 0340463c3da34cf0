// Copyright 2025-2026 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]

//! # typeflow
//!
//! Control-flow-graph post-processing for a static type checker of a
//! dynamic object-oriented language.
//!
//! A front-end lowers each method body into a graph of basic blocks holding
//! three-address-style instructions ([`cfg::Cfg`]). This crate canonicalizes
//! that graph before type inference reads it:
//!
//! 1. **Simplification** ([`passes::simplify`]) - unreachable-block
//!    removal, backedge dedup, jump threading, straight-line fusion.
//! 2. **Alias elimination** ([`passes::dealias`]) - forward copy
//!    propagation rewriting synthetic temporaries to their canonical
//!    source variables.
//! 3. **Loop-header marking** ([`passes::mark_loop_headers`]).
//! 4. **Dead-assignment removal** ([`passes::remove_dead_assigns`]) - drops
//!    pure bindings whose result is never consumed.
//! 5. **Loop-depth summaries** ([`passes::compute_min_max_loops`]) - per
//!    variable, the shallowest read depth and deepest write depth.
//! 6. **Block arguments** ([`passes::fill_in_block_arguments`]) - per-block
//!    live-in variables via two cheap overapproximations and their
//!    intersection, in place of full iterative liveness.
//! 7. **Forward topological order** ([`passes::fill_forwards_topo_sort`]).
//!
//! [`passes::finalize`] runs the whole sequence.
//!
//! # Example
//!
//! ```rust
//! use typeflow::prelude::*;
//!
//! let mut cfg = Cfg::new();
//! let x = LocalRef::source(0);
//! let t = LocalRef::synthetic(0);
//!
//! // entry -> body; body: t = x; v1 = t.bar()
//! let body = cfg.fresh_block(0, 0);
//! cfg.unconditional_jump(cfg.entry(), body)?;
//! cfg[body].exprs.push(Binding::new(t, Op::Ident { what: x }));
//! cfg[body].exprs.push(Binding::new(
//!     LocalRef::source(1),
//!     Op::Send { recv: t, method: "bar".to_string(), args: vec![] },
//! ));
//!
//! finalize(&Context::new(), &mut cfg);
//!
//! // The synthetic temporary has been rewritten to its source variable
//! // and its now-dead binding removed.
//! let Op::Send { recv, .. } = &cfg[body].exprs[0].value.op else { panic!() };
//! assert_eq!(*recv, x);
//! # Ok::<(), typeflow::Error>(())
//! ```
//!
//! # Error Handling
//!
//! The passes are total: on any graph satisfying the documented input
//! invariants they run to completion and return nothing. Broken structural
//! invariants are programming errors and abort with a debug assertion
//! ([`passes::sanity_check`]). Only the graph-wiring surface returns
//! [`Result`].
//!
//! # Concurrency
//!
//! A graph is owned by one worker and processed sequentially; independent
//! graphs may be processed in parallel. The only shared state is the
//! telemetry histogram in [`telemetry`], whose increments are thread-safe.

pub mod cfg;
pub mod passes;
pub mod prelude;
pub mod telemetry;

mod context;
mod error;

pub use context::{Context, LspQuery};
pub use error::Error;

/// Result alias for the graph-construction surface.
pub type Result<T> = std::result::Result<T, Error>;
