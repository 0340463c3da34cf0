//! Graph simplification: dead-block removal, jump threading, fusion.
//!
//! The simplifier repeats a sweep over the block store until no rule fires.
//! Within a sweep each block gets at most one structural rewrite, after
//! which the same block is examined again; backedge dedup and
//! unconditional-jump normalization are applied to every block on every
//! visit. Structural rules never touch `entry` or the dead sink.
//!
//! The closure-tag and loop-depth guards on fusion exist because downstream
//! passes track source-level closures and loop nesting independently; a
//! fusion across either boundary would merge blocks those passes must keep
//! apart. Pass-through collapse additionally refuses closure-call header
//! blocks, which later passes must see intact.

use std::mem;

use tracing::trace_span;

use crate::cfg::{BlockId, Cfg, LocalRef};
use crate::passes::sanity_check;
use crate::Context;

/// Canonicalizes the graph in place.
///
/// Skipped entirely while an interactive query is active, because removing
/// blocks destroys the source locations the query needs.
pub fn simplify(ctx: &Context, cfg: &mut Cfg) {
    if !ctx.lsp_query().is_empty() {
        return;
    }
    let _span = trace_span!("simplify").entered();

    sanity_check(cfg);
    let mut changed = true;
    while changed {
        changed = false;
        let mut idx = 0;
        while idx < cfg.max_block_id() {
            let id = BlockId::new(idx);
            let Some(bb) = cfg.get(id) else {
                idx += 1;
                continue;
            };
            let thenb = bb.bexit.thenb;
            let elseb = bb.bexit.elseb;
            let structural = id != cfg.entry() && id != cfg.dead_block();

            if structural && cfg[id].back_edges.is_empty() {
                // Unreachable: unlink from successors and drop.
                cfg[thenb].back_edges.retain(|&p| p != id);
                if elseb != thenb {
                    cfg[elseb].back_edges.retain(|&p| p != id);
                }
                cfg.remove_block(id);
                cfg.forwards_topo_sort.retain(|&b| b != id);
                changed = true;
                sanity_check(cfg);
                idx += 1;
                continue;
            }

            {
                let bb = &mut cfg[id];
                bb.back_edges.sort_unstable();
                bb.back_edges.dedup();
                if thenb == elseb {
                    bb.bexit.cond = LocalRef::unconditional();
                }
            }

            if !structural {
                idx += 1;
                continue;
            }

            if thenb == elseb
                && thenb != cfg.dead_block()
                && thenb != id
                && cfg[id].closure_id == cfg[thenb].closure_id
            {
                if cfg[thenb].back_edges.len() == 1
                    && cfg[thenb].outer_loops == cfg[id].outer_loops
                {
                    // Fuse the single-predecessor successor into this block.
                    // Its own successors keep a stale backedge to it, which
                    // the unreachable rule scrubs on a later visit.
                    let moved = mem::take(&mut cfg[thenb].exprs);
                    cfg[id].exprs.extend(moved);
                    cfg[thenb].back_edges.clear();
                    let adopted = cfg[thenb].bexit.clone();
                    cfg[id].bexit = adopted.clone();
                    cfg[adopted.thenb].back_edges.push(id);
                    if adopted.thenb != adopted.elseb {
                        cfg[adopted.elseb].back_edges.push(id);
                    }
                    changed = true;
                    sanity_check(cfg);
                    continue;
                } else if cfg[thenb].bexit.cond != LocalRef::closure_call()
                    && cfg[thenb].exprs.is_empty()
                {
                    // Empty pass-through: adopt its exit without fusing.
                    let adopted = cfg[thenb].bexit.clone();
                    cfg[id].bexit = adopted.clone();
                    cfg[thenb].back_edges.retain(|&p| p != id);
                    cfg[adopted.thenb].back_edges.push(id);
                    if adopted.thenb != adopted.elseb {
                        cfg[adopted.elseb].back_edges.push(id);
                    }
                    changed = true;
                    sanity_check(cfg);
                    continue;
                }
            }

            if thenb != cfg.dead_block()
                && cfg[id].closure_id == cfg[thenb].closure_id
                && cfg[thenb].exprs.is_empty()
                && cfg[thenb].bexit.thenb == cfg[thenb].bexit.elseb
                && cfg[id].bexit.thenb != cfg[thenb].bexit.thenb
            {
                // Shortcut the then edge through an empty forwarder.
                let target = cfg[thenb].bexit.thenb;
                cfg[id].bexit.thenb = target;
                cfg[target].back_edges.push(id);
                cfg[thenb].back_edges.retain(|&p| p != id);
                changed = true;
                sanity_check(cfg);
                continue;
            }

            if elseb != cfg.dead_block()
                && cfg[id].closure_id == cfg[thenb].closure_id
                && cfg[elseb].exprs.is_empty()
                && cfg[elseb].bexit.thenb == cfg[elseb].bexit.elseb
                && cfg[id].bexit.elseb != cfg[elseb].bexit.elseb
            {
                // Shortcut the else edge through an empty forwarder.
                let target = cfg[elseb].bexit.elseb;
                cfg[id].bexit.elseb = target;
                cfg[target].back_edges.push(id);
                cfg[elseb].back_edges.retain(|&p| p != id);
                changed = true;
                sanity_check(cfg);
                continue;
            }

            idx += 1;
        }
    }
}
