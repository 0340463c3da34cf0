//! Whole-graph structural invariant checks.

use crate::cfg::{BlockFlags, Cfg};

/// Verifies the backedge/forward-edge consistency of the whole graph.
///
/// For every live block `B`:
///
/// - each predecessor recorded in `B.back_edges` really branches to `B`;
/// - `B` carries `WAS_JUMP_DESTINATION` unless it is `entry`;
/// - `B` is recorded in the backedge lists of both of its successors.
///
/// The dead sink is exempt from the latter two. A malformed graph cannot be
/// repaired locally, so any violation aborts with a message naming the
/// broken invariant. Debug builds only; in release this is a no-op.
pub fn sanity_check(cfg: &Cfg) {
    if !cfg!(debug_assertions) {
        return;
    }
    for bb in cfg.blocks() {
        for &parent in &bb.back_edges {
            let p = &cfg[parent];
            assert!(
                p.bexit.thenb == bb.id() || p.bexit.elseb == bb.id(),
                "block {} is not aware of its child {}",
                parent,
                bb.id()
            );
        }
        if bb.id() == cfg.dead_block() {
            continue;
        }
        if bb.id() != cfg.entry() {
            assert!(
                bb.flags.contains(BlockFlags::WAS_JUMP_DESTINATION),
                "block {} was never linked into the graph",
                bb.id()
            );
        }
        assert!(
            cfg[bb.bexit.thenb].back_edges.contains(&bb.id()),
            "backedge unset for the then target of {}",
            bb.id()
        );
        assert!(
            cfg[bb.bexit.elseb].back_edges.contains(&bb.id()),
            "backedge unset for the else target of {}",
            bb.id()
        );
    }
}
