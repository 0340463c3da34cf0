//! Forward topological ordering of the graph.
//!
//! A DFS from `entry` assigns each reachable block a post-order position in
//! `forwards_topo_sort`: exits land first, `entry` last, so iterating the
//! vector in reverse yields predecessors before successors for every
//! non-backedge. Successor visits are biased so the successor with the
//! shallower loop nest is taken first, which numbers loop bodies before
//! loop exits in the resulting order.

use crate::cfg::{BasicBlock, BlockId, Cfg};

/// Recursive numbering worker.
///
/// Fills `target` with the post-order and stamps each block's `fwd_id` with
/// its assigned position. `next_free` is the next position to hand out;
/// the new watermark is returned. Callers must reset every block's
/// `fwd_id` to [`BasicBlock::FWD_UNVISITED`] beforehand; a block whose
/// `fwd_id` is anything else is skipped, which is also what terminates the
/// recursion on cycles.
pub fn topo_sort_fwd(
    cfg: &mut Cfg,
    target: &mut [BlockId],
    next_free: usize,
    current: BlockId,
) -> usize {
    if cfg[current].fwd_id != BasicBlock::FWD_UNVISITED {
        return next_free;
    }
    cfg[current].fwd_id = BasicBlock::FWD_IN_PROGRESS;
    let thenb = cfg[current].bexit.thenb;
    let elseb = cfg[current].bexit.elseb;
    let next_free = if cfg[thenb].outer_loops > cfg[elseb].outer_loops {
        let next_free = topo_sort_fwd(cfg, target, next_free, elseb);
        topo_sort_fwd(cfg, target, next_free, thenb)
    } else {
        let next_free = topo_sort_fwd(cfg, target, next_free, thenb);
        topo_sort_fwd(cfg, target, next_free, elseb)
    };
    target[next_free] = current;
    // Positions fit in i32: block counts are bounded by method body size.
    cfg[current].fwd_id = next_free as i32;
    next_free + 1
}

/// Recomputes `cfg.forwards_topo_sort` from scratch.
///
/// Resets every block's scratch marker, numbers everything reachable from
/// `entry`, and truncates the order to the blocks actually visited.
pub fn fill_forwards_topo_sort(cfg: &mut Cfg) {
    let ids: Vec<_> = cfg.block_ids().collect();
    for id in ids {
        cfg[id].fwd_id = BasicBlock::FWD_UNVISITED;
    }
    let mut target = vec![BlockId::new(0); cfg.max_block_id()];
    let entry = cfg.entry();
    let visited = topo_sort_fwd(cfg, &mut target, 0, entry);
    target.truncate(visited);
    cfg.forwards_topo_sort = target;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::LocalRef;
    use crate::Result;

    /// Forward position of a block: later in the reversed post-order.
    fn pos(cfg: &Cfg, id: BlockId) -> usize {
        cfg.forwards_topo_sort
            .iter()
            .position(|&b| b == id)
            .expect("block not in topo sort")
    }

    #[test]
    fn test_straight_line_order() -> Result<()> {
        let mut cfg = Cfg::new();
        let b1 = cfg.fresh_block(0, 0);
        let b2 = cfg.fresh_block(0, 0);
        cfg.unconditional_jump(cfg.entry(), b1)?;
        cfg.unconditional_jump(b1, b2)?;

        fill_forwards_topo_sort(&mut cfg);

        // Post-order: predecessors later in the vector.
        assert!(pos(&cfg, cfg.entry()) > pos(&cfg, b1));
        assert!(pos(&cfg, b1) > pos(&cfg, b2));
        // Iterated in reverse, the order is entry, b1, b2.
        let fwd: Vec<_> = cfg
            .forwards_topo_sort
            .iter()
            .rev()
            .copied()
            .filter(|&b| b != cfg.dead_block())
            .collect();
        assert_eq!(fwd, vec![cfg.entry(), b1, b2]);
        Ok(())
    }

    #[test]
    fn test_every_reachable_block_appears_once() -> Result<()> {
        let mut cfg = Cfg::new();
        let b1 = cfg.fresh_block(0, 0);
        let b2 = cfg.fresh_block(0, 0);
        let b3 = cfg.fresh_block(0, 0);
        cfg.unconditional_jump(cfg.entry(), b1)?;
        cfg.conditional_jump(b1, LocalRef::source(0), b2, b3)?;
        cfg.unconditional_jump(b2, b3)?;

        fill_forwards_topo_sort(&mut cfg);

        let mut seen = cfg.forwards_topo_sort.clone();
        seen.sort_unstable();
        let mut expected: Vec<_> = cfg.block_ids().collect();
        expected.sort_unstable();
        // Everything is reachable here, including the dead sink.
        assert_eq!(seen, expected);
        Ok(())
    }

    #[test]
    fn test_forward_edges_respect_positions() -> Result<()> {
        let mut cfg = Cfg::new();
        let b1 = cfg.fresh_block(0, 0);
        let b2 = cfg.fresh_block(0, 0);
        let b3 = cfg.fresh_block(0, 0);
        cfg.unconditional_jump(cfg.entry(), b1)?;
        cfg.conditional_jump(b1, LocalRef::source(0), b2, b3)?;
        cfg.unconditional_jump(b2, b3)?;

        fill_forwards_topo_sort(&mut cfg);

        // For each non-backedge B -> S, B sits later in the stored
        // post-order than S.
        for bb in cfg.blocks() {
            for succ in [bb.bexit.thenb, bb.bexit.elseb] {
                if succ == bb.id() {
                    continue;
                }
                assert!(
                    pos(&cfg, bb.id()) > pos(&cfg, succ),
                    "{} should precede {}",
                    bb.id(),
                    succ
                );
            }
        }
        Ok(())
    }

    #[test]
    fn test_loop_body_numbered_before_exit() -> Result<()> {
        let mut cfg = Cfg::new();
        let header = cfg.fresh_block(0, 1);
        let body = cfg.fresh_block(0, 1);
        let exit = cfg.fresh_block(0, 0);
        cfg.unconditional_jump(cfg.entry(), header)?;
        // The deeper body sits in the then arm; an unbiased then-first DFS
        // would number it before the exit. The bias visits the shallower
        // exit first, so the body lands later in the post-order and thus
        // earlier in the forward order.
        cfg.conditional_jump(header, LocalRef::source(0), body, exit)?;
        cfg.unconditional_jump(body, header)?;

        fill_forwards_topo_sort(&mut cfg);

        // The body belongs to the loop and is ordered before the exit.
        assert!(pos(&cfg, body) > pos(&cfg, exit));
        assert!(pos(&cfg, header) > pos(&cfg, body));
        Ok(())
    }

    #[test]
    fn test_fwd_ids_match_positions() -> Result<()> {
        let mut cfg = Cfg::new();
        let b1 = cfg.fresh_block(0, 0);
        cfg.unconditional_jump(cfg.entry(), b1)?;

        fill_forwards_topo_sort(&mut cfg);

        for (i, &bid) in cfg.forwards_topo_sort.iter().enumerate() {
            assert_eq!(cfg[bid].fwd_id, i as i32);
        }
        Ok(())
    }
}
