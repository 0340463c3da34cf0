//! The post-processing pipeline.
//!
//! The front-end hands over a finished graph; these passes canonicalize it
//! in place and annotate it for type inference:
//!
//! 1. [`simplify`] - unreachable-block removal, backedge dedup, jump
//!    threading, straight-line fusion.
//! 2. [`fill_forwards_topo_sort`] - forward topological order over the
//!    simplified graph.
//! 3. [`dealias`] - copy propagation of synthetic temporaries.
//! 4. [`mark_loop_headers`] - flags blocks reentered from a shallower nest.
//! 5. [`compute_min_max_loops`] - per-variable loop-depth summaries.
//! 6. [`fill_in_block_arguments`] - per-block live-in argument lists.
//! 7. [`remove_dead_assigns`] - drops pure bindings never consumed, not
//!    even demanded as a successor's argument. Depends on the argument
//!    lists, so it runs last.
//!
//! [`finalize`] runs the sequence; each pass is also callable on its own.
//! [`sanity_check`] validates the structural invariants in debug builds and
//! is invoked by the simplifier after every mutation.
//!
//! Passes iterate either the stored post-order (successors before
//! predecessors) or its reverse, as each dataflow direction requires; the
//! simplifier alone iterates the block store in allocation order and
//! restarts its sweep after any mutation.

mod block_args;
mod dealias;
mod dead_assigns;
mod loops;
mod sanity;
mod simplify;
mod topo;

pub use block_args::fill_in_block_arguments;
pub use dealias::dealias;
pub use dead_assigns::remove_dead_assigns;
pub use loops::{compute_min_max_loops, mark_loop_headers};
pub use sanity::sanity_check;
pub use simplify::simplify;
pub use topo::{fill_forwards_topo_sort, topo_sort_fwd};

use crate::cfg::{Cfg, ReadsAndWrites};
use crate::Context;

/// Runs the whole post-processing pipeline over a freshly built graph.
///
/// Returns the read/write summary the later stages were driven by, so that
/// downstream consumers need not recompute it.
pub fn finalize(ctx: &Context, cfg: &mut Cfg) -> ReadsAndWrites {
    sanity_check(cfg);
    simplify(ctx, cfg);
    fill_forwards_topo_sort(cfg);
    dealias(ctx, cfg);
    mark_loop_headers(ctx, cfg);
    let rw = ReadsAndWrites::compute(cfg);
    compute_min_max_loops(ctx, &rw, cfg);
    fill_in_block_arguments(ctx, &rw, cfg);
    remove_dead_assigns(ctx, &rw, cfg);
    sanity_check(cfg);
    rw
}
