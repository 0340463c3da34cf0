//! Per-block live-in arguments via a two-sided overapproximation.
//!
//! A block's arguments are the variables that are both live on entry (some
//! path from the block reads the variable before writing it) and possibly
//! defined by an ancestor. Exact liveness over an arbitrary graph is an
//! iterative dataflow; this pass instead computes two cheaper upper bounds
//! and intersects them:
//!
//! - **bound 1**: reads accumulated backwards through successors, pruned
//!   of variables that are dead on entry - except inside loops, where a
//!   variable stays pinned down to its shallowest mention so that the
//!   flow-insensitive treatment of loop-carried variables remains sound;
//! - **bound 2**: writes accumulated forwards through predecessors.
//!
//! A variable that neither descends from an ancestor's write nor is read
//! downstream cannot be a meaningful entry argument, so the intersection
//! is sound for what type inference consumes. Complexity is
//! (blocks + mentioned variables) x cycles + output size.

use rustc_hash::FxHashSet;
use tracing::trace_span;

use crate::cfg::{Cfg, LocalRef, ReadsAndWrites};
use crate::{telemetry, Context};

/// Unions `sets[src]` into `sets[dst]` in place.
fn union_from(sets: &mut [FxHashSet<LocalRef>], dst: usize, src: usize) {
    if dst == src {
        return;
    }
    let (dst_set, src_set) = if dst < src {
        let (head, tail) = sets.split_at_mut(src);
        (&mut head[dst], &tail[0])
    } else {
        let (head, tail) = sets.split_at_mut(dst);
        (&mut tail[0], &head[src])
    };
    dst_set.extend(src_set.iter().copied());
}

/// Fills in every block's sorted live-in argument list.
pub fn fill_in_block_arguments(_ctx: &Context, rw: &ReadsAndWrites, cfg: &mut Cfg) {
    let n = cfg.max_block_id();

    // Bound 1: what could a block still need? Reads flowing backwards
    // through successors, minus variables dead on entry (with the
    // loop-depth pinning guard).
    let mut upper_bounds1: Vec<FxHashSet<LocalRef>> = vec![FxHashSet::default(); n];
    {
        let _span = trace_span!("upper_bounds1").entered();
        for &bid in &cfg.forwards_topo_sort {
            upper_bounds1[bid.index()].extend(rw.reads[bid.index()].iter().copied());
        }
        let mut changed = true;
        while changed {
            changed = false;
            for &bid in &cfg.forwards_topo_sort {
                let i = bid.index();
                let sz = upper_bounds1[i].len();
                let thenb = cfg[bid].bexit.thenb;
                let elseb = cfg[bid].bexit.elseb;
                if thenb != cfg.dead_block() {
                    union_from(&mut upper_bounds1, i, thenb.index());
                }
                if elseb != cfg.dead_block() {
                    union_from(&mut upper_bounds1, i, elseb.index());
                }
                for &dead_var in &rw.dead[i] {
                    if let Some(&min) = cfg.min_loops.get(&dead_var) {
                        if cfg[bid].outer_loops <= min {
                            upper_bounds1[i].remove(&dead_var);
                        }
                    }
                }
                changed = changed || upper_bounds1[i].len() != sz;
            }
        }
    }

    // Bound 2: what could an ancestor have defined? Writes flowing
    // forwards through backedges.
    let mut upper_bounds2: Vec<FxHashSet<LocalRef>> = vec![FxHashSet::default(); n];
    {
        let _span = trace_span!("upper_bounds2").entered();
        let mut changed = true;
        while changed {
            changed = false;
            for &bid in cfg.forwards_topo_sort.iter().rev() {
                let i = bid.index();
                let sz = upper_bounds2[i].len();
                for pi in 0..cfg[bid].back_edges.len() {
                    let parent = cfg[bid].back_edges[pi];
                    if parent == cfg.dead_block() {
                        continue;
                    }
                    upper_bounds2[i].extend(rw.writes[parent.index()].iter().copied());
                    union_from(&mut upper_bounds2, i, parent.index());
                }
                changed = changed || upper_bounds2[i].len() != sz;
            }
        }
    }

    {
        let _span = trace_span!("upper_bounds_merge").entered();
        let ids: Vec<_> = cfg.block_ids().collect();
        for bid in ids {
            let i = bid.index();
            let (smaller, larger) = if upper_bounds1[i].len() <= upper_bounds2[i].len() {
                (&upper_bounds1[i], &upper_bounds2[i])
            } else {
                (&upper_bounds2[i], &upper_bounds1[i])
            };
            let mut args: Vec<LocalRef> = Vec::with_capacity(smaller.len());
            for &el in smaller {
                if larger.contains(&el) {
                    args.push(el);
                }
            }
            args.sort_unstable();
            telemetry::histogram_inc("cfgbuilder.blockArguments", args.len());
            cfg[bid].args = args;
        }
    }
}
