//! Alias elimination: copy propagation of synthetic temporaries.
//!
//! The front-end lowers nested expressions through compiler-introduced
//! temporaries, many of which are plain copies (`t = x`). This pass runs a
//! forward dataflow over the topological order, carrying a per-block map
//! from temporary to its canonical source variable, and rewrites uses of
//! mapped temporaries back to that source. A separate pass is needed
//! because an argument list can reassign the very receiver it is passed to
//! (`a.foo(a = "2", ...)`); only a flow over the finished graph sees that.
//!
//! At a merge, a mapping survives only if every predecessor agrees on it.
//! At loop headers the backedge predecessor has not been visited yet and
//! contributes an empty map, so headers start from nothing; known to be
//! too conservative for loop headers.

use rustc_hash::FxHashMap;
use tracing::trace_span;

use crate::cfg::{Cfg, LocalRef, Op};
use crate::Context;

/// Resolves `what` through the alias map.
///
/// Only synthetic temporaries are candidates; a named source variable is
/// returned unchanged so diagnostics keep mentioning the user's name.
fn maybe_dealias(what: LocalRef, aliases: &FxHashMap<LocalRef, LocalRef>) -> LocalRef {
    if what.is_synthetic_temporary() {
        aliases.get(&what).copied().unwrap_or(what)
    } else {
        what
    }
}

/// Rewrites uses of synthetic temporaries to their canonical variables.
pub fn dealias(_ctx: &Context, cfg: &mut Cfg) {
    let _span = trace_span!("dealias").entered();

    let mut out_aliases: Vec<FxHashMap<LocalRef, LocalRef>> =
        vec![FxHashMap::default(); cfg.max_block_id()];

    // Reverse of the stored post-order: predecessors before successors.
    let order: Vec<_> = cfg.forwards_topo_sort.iter().rev().copied().collect();
    for bid in order {
        if bid == cfg.dead_block() {
            continue;
        }

        let mut current = match cfg[bid].back_edges.first() {
            Some(first) => out_aliases[first.index()].clone(),
            None => FxHashMap::default(),
        };
        for &parent in &cfg[bid].back_edges {
            let other = &out_aliases[parent.index()];
            current.retain(|k, v| other.get(k).is_some_and(|o| *o == *v));
        }

        let bb = &mut cfg[bid];
        for binding in &mut bb.exprs {
            // Identity copies are canonicalized unconditionally: the alias
            // itself must name the canonical variable even when the
            // instruction is synthetic.
            if let Op::Ident { what } = &mut binding.value.op {
                *what = maybe_dealias(*what, &current);
            }

            // Invalidate mappings whose source is being overwritten.
            let bind = binding.bind;
            current.retain(|_, v| *v != bind);

            // Instructions that may raise diagnostics must keep referring
            // to the user's names, so synthetic ones are left alone.
            if !binding.value.synthetic {
                match &mut binding.value.op {
                    Op::Ident { what } | Op::Return { what } | Op::Absurd { what } => {
                        *what = maybe_dealias(*what, &current);
                    }
                    Op::Send { recv, args, .. } => {
                        *recv = maybe_dealias(*recv, &current);
                        for arg in args {
                            *arg = maybe_dealias(*arg, &current);
                        }
                    }
                    Op::Literal { .. }
                    | Op::LoadSelf
                    | Op::LoadArg { .. }
                    | Op::LoadYieldParams
                    | Op::Alias { .. } => {}
                }
            }

            if let Op::Ident { what } = &binding.value.op {
                current.insert(binding.bind, *what);
            }
        }

        if bb.bexit.cond != LocalRef::unconditional() {
            bb.bexit.cond = maybe_dealias(bb.bexit.cond, &current);
        }

        out_aliases[bid.index()] = current;
    }
}
