//! Loop bookkeeping: header flags and per-variable depth summaries.

use rustc_hash::FxHashMap;
use tracing::trace_span;

use crate::cfg::{BlockFlags, Cfg, ReadsAndWrites};
use crate::Context;

/// Flags every block entered by an edge from a shallower loop nest.
///
/// An edge whose source sits at a smaller `outer_loops` than its target is
/// a reentry into the target's loop; the target is that loop's header.
pub fn mark_loop_headers(_ctx: &Context, cfg: &mut Cfg) {
    let _span = trace_span!("mark_loop_headers").entered();

    let ids: Vec<_> = cfg.block_ids().collect();
    for id in ids {
        let is_header = cfg[id]
            .back_edges
            .iter()
            .any(|&parent| cfg[parent].outer_loops < cfg[id].outer_loops);
        if is_header {
            cfg[id].flags.insert(BlockFlags::LOOP_HEADER);
        }
    }
}

/// Populates `cfg.min_loops` and `cfg.max_loop_write`.
///
/// `min_loops[v]` is the shallowest loop depth at which `v` is mentioned at
/// all (read or written); `max_loop_write[v]` is the deepest loop depth at
/// which `v` is assigned. The block-argument solver uses these to keep
/// loop-carried variables pinned.
pub fn compute_min_max_loops(_ctx: &Context, rw: &ReadsAndWrites, cfg: &mut Cfg) {
    let _span = trace_span!("compute_min_max_loops").entered();

    let mut min_loops: FxHashMap<_, u32> = FxHashMap::default();
    let mut max_loop_write: FxHashMap<_, u32> = FxHashMap::default();

    for bb in cfg.blocks() {
        if bb.id() == cfg.dead_block() {
            continue;
        }
        for &what in &rw.reads[bb.id().index()] {
            let cur = min_loops.entry(what).or_insert(u32::MAX);
            *cur = (*cur).min(bb.outer_loops);
        }
    }
    for bb in cfg.blocks() {
        if bb.id() == cfg.dead_block() {
            continue;
        }
        for binding in &bb.exprs {
            let what = binding.bind;
            let cur_min = min_loops.entry(what).or_insert(u32::MAX);
            *cur_min = (*cur_min).min(bb.outer_loops);
            let cur_max = max_loop_write.entry(what).or_insert(0);
            *cur_max = (*cur_max).max(bb.outer_loops);
        }
    }

    cfg.min_loops = min_loops;
    cfg.max_loop_write = max_loop_write;
}
