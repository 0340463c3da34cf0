//! The owning control-flow-graph container.
//!
//! [`Cfg`] owns every [`BasicBlock`] of one method body in a flat,
//! id-indexed store. Successor and predecessor references are raw
//! [`BlockId`]s rather than owning links, so the reference cycles of a
//! looping graph never become ownership cycles: deleting a block reduces to
//! clearing its slot and scrubbing its id from other blocks' backedge lists.
//!
//! # Reserved blocks
//!
//! Every graph is born with two reserved blocks:
//!
//! - `entry` (id 0) - where control enters the method body.
//! - the dead sink (id 1) - the branch target of statically-dead arms;
//!   control never reaches it. It loops to itself and is exempt from most
//!   invariants.
//!
//! # Wiring
//!
//! Blocks are allocated with [`Cfg::fresh_block`] and terminated with
//! [`Cfg::conditional_jump`] / [`Cfg::unconditional_jump`], which maintain
//! the backedge lists and the `WAS_JUMP_DESTINATION` flag. The
//! post-processing passes never allocate blocks; only the front-end wiring
//! surface does.

use std::fmt::Write as _;
use std::ops::{Index, IndexMut};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::cfg::{BasicBlock, BlockExit, BlockFlags, BlockId, LocalRef};
use crate::{Error, Result};

/// A control-flow graph of basic blocks for a single method body.
///
/// The graph is mutable in place: the simplifier deletes blocks and rewires
/// branches, the dealiaser rewrites operands, and the block-argument solver
/// fills in per-block live-in lists. Ids are never reused.
#[derive(Debug, Clone, PartialEq)]
pub struct Cfg {
    /// Flat block store indexed by id; `None` marks a deleted block.
    blocks: Vec<Option<BasicBlock>>,
    entry: BlockId,
    dead: BlockId,
    /// Live blocks in forward post-order: exits first, `entry` last.
    /// Forward dataflow iterates this in reverse so predecessors are seen
    /// before successors.
    pub forwards_topo_sort: Vec<BlockId>,
    /// Per variable: the shallowest loop depth at which it is mentioned.
    pub min_loops: FxHashMap<LocalRef, u32>,
    /// Per variable: the deepest loop depth at which it is written.
    pub max_loop_write: FxHashMap<LocalRef, u32>,
}

impl Cfg {
    /// Creates a graph containing only the reserved `entry` and dead-sink
    /// blocks, with `entry` falling through into the sink.
    #[must_use]
    pub fn new() -> Self {
        let entry = BlockId::new(0);
        let dead = BlockId::new(1);
        let entry_bb = BasicBlock::new(entry, 0, 0, dead);
        let mut dead_bb = BasicBlock::new(dead, 0, 0, dead);
        dead_bb.back_edges.push(entry);
        Self {
            blocks: vec![Some(entry_bb), Some(dead_bb)],
            entry,
            dead,
            forwards_topo_sort: Vec::new(),
            min_loops: FxHashMap::default(),
            max_loop_write: FxHashMap::default(),
        }
    }

    /// Returns the id of the entry block.
    #[must_use]
    pub const fn entry(&self) -> BlockId {
        self.entry
    }

    /// Returns the id of the dead sink.
    #[must_use]
    pub const fn dead_block(&self) -> BlockId {
        self.dead
    }

    /// One past the largest block id ever allocated. Scratch arrays indexed
    /// by block id are sized by this.
    #[must_use]
    pub fn max_block_id(&self) -> usize {
        self.blocks.len()
    }

    /// Returns the block with the given id, or `None` if the id is out of
    /// range or the block was deleted.
    #[must_use]
    pub fn get(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.get(id.index()).and_then(Option::as_ref)
    }

    /// Iterates the ids of all live blocks, in allocation order.
    pub fn block_ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.blocks
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.as_ref().map(|_| BlockId::new(i)))
    }

    /// Iterates all live blocks, in allocation order.
    pub fn blocks(&self) -> impl Iterator<Item = &BasicBlock> {
        self.blocks.iter().flatten()
    }

    /// Returns the number of live blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.iter().flatten().count()
    }

    /// Allocates a fresh block that initially falls through into the dead
    /// sink, and returns its id.
    pub fn fresh_block(&mut self, closure_id: u32, outer_loops: u32) -> BlockId {
        let id = BlockId::new(self.blocks.len());
        let dead = self.dead;
        self.blocks
            .push(Some(BasicBlock::new(id, closure_id, outer_loops, dead)));
        self[dead].back_edges.push(id);
        id
    }

    /// Terminates `from` with a two-way branch on `cond`.
    ///
    /// Rewires the backedge lists of the old and new successors and marks
    /// both targets as jump destinations. `thenb` and `elseb` may be equal;
    /// the duplicate backedge is deduped by the simplifier.
    ///
    /// # Errors
    ///
    /// Returns an error if any id is out of range or names a deleted block.
    pub fn conditional_jump(
        &mut self,
        from: BlockId,
        cond: LocalRef,
        thenb: BlockId,
        elseb: BlockId,
    ) -> Result<()> {
        self.ensure_live(from)?;
        self.ensure_live(thenb)?;
        self.ensure_live(elseb)?;
        self.unlink_exit(from);
        self[from].bexit = BlockExit { cond, thenb, elseb };
        self[thenb].back_edges.push(from);
        self[thenb].flags.insert(BlockFlags::WAS_JUMP_DESTINATION);
        self[elseb].back_edges.push(from);
        self[elseb].flags.insert(BlockFlags::WAS_JUMP_DESTINATION);
        Ok(())
    }

    /// Terminates `from` with an unconditional jump to `to`.
    ///
    /// # Errors
    ///
    /// Returns an error if either id is out of range or names a deleted
    /// block.
    pub fn unconditional_jump(&mut self, from: BlockId, to: BlockId) -> Result<()> {
        self.ensure_live(from)?;
        self.ensure_live(to)?;
        self.unlink_exit(from);
        self[from].bexit = BlockExit {
            cond: LocalRef::unconditional(),
            thenb: to,
            elseb: to,
        };
        self[to].back_edges.push(from);
        self[to].flags.insert(BlockFlags::WAS_JUMP_DESTINATION);
        Ok(())
    }

    /// Removes `from` from the backedge lists of its current successors.
    fn unlink_exit(&mut self, from: BlockId) {
        let old = self[from].bexit.clone();
        self[old.thenb].back_edges.retain(|&p| p != from);
        if old.elseb != old.thenb {
            self[old.elseb].back_edges.retain(|&p| p != from);
        }
    }

    /// Deletes a block, retiring its id. The caller is responsible for
    /// scrubbing the id from other blocks' backedge lists and from the
    /// topological order.
    pub(crate) fn remove_block(&mut self, id: BlockId) {
        self.blocks[id.index()] = None;
    }

    fn ensure_live(&self, id: BlockId) -> Result<()> {
        match self.blocks.get(id.index()) {
            None => Err(Error::UnknownBlock(id)),
            Some(None) => Err(Error::RemovedBlock(id)),
            Some(Some(_)) => Ok(()),
        }
    }

    /// Renders the graph in Graphviz DOT format for debugging.
    #[must_use]
    pub fn to_dot(&self, title: Option<&str>) -> String {
        let mut dot = String::new();
        dot.push_str("digraph cfg {\n");
        if let Some(name) = title {
            let _ = writeln!(dot, "    label=\"{name}\";");
            dot.push_str("    labelloc=t;\n");
        }
        dot.push_str("    node [shape=box, fontname=\"Courier\", fontsize=10];\n\n");

        for bb in self.blocks() {
            let mut label = format!("{}", bb.id());
            if bb.id() == self.entry {
                label.push_str(" (entry)");
            }
            if bb.id() == self.dead {
                label.push_str(" (dead)");
            }
            if bb.flags.contains(BlockFlags::LOOP_HEADER) {
                label.push_str(" (loop header)");
            }
            label.push_str("\\l");
            if !bb.args.is_empty() {
                let _ = write!(label, "args:");
                for arg in &bb.args {
                    let _ = write!(label, " {arg}");
                }
                label.push_str("\\l");
            }
            for binding in &bb.exprs {
                let _ = write!(label, "{binding}");
                label.push_str("\\l");
            }
            let _ = writeln!(dot, "    {} [label=\"{label}\"];", bb.id());
        }
        dot.push('\n');

        for bb in self.blocks() {
            if bb.is_unconditional() {
                let _ = writeln!(dot, "    {} -> {};", bb.id(), bb.bexit.thenb);
            } else {
                let _ = writeln!(
                    dot,
                    "    {} -> {} [label=\"{} true\"];",
                    bb.id(),
                    bb.bexit.thenb,
                    bb.bexit.cond
                );
                let _ = writeln!(
                    dot,
                    "    {} -> {} [label=\"{} false\"];",
                    bb.id(),
                    bb.bexit.elseb,
                    bb.bexit.cond
                );
            }
        }
        dot.push_str("}\n");
        dot
    }
}

impl Default for Cfg {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<BlockId> for Cfg {
    type Output = BasicBlock;

    fn index(&self, id: BlockId) -> &BasicBlock {
        match self.blocks.get(id.index()) {
            Some(Some(bb)) => bb,
            _ => panic!("no live block {id} in this graph"),
        }
    }
}

impl IndexMut<BlockId> for Cfg {
    fn index_mut(&mut self, id: BlockId) -> &mut BasicBlock {
        match self.blocks.get_mut(id.index()) {
            Some(Some(bb)) => bb,
            _ => panic!("no live block {id} in this graph"),
        }
    }
}

/// Per-block read, write, and dead-on-entry summaries, indexed by block id.
///
/// `dead[b]` holds the variables `b` writes before any in-block read; such a
/// variable cannot be live on entry to `b` regardless of what predecessors
/// do.
#[derive(Debug, Clone, Default)]
pub struct ReadsAndWrites {
    /// Variables read anywhere in each block, including branch conditions.
    pub reads: Vec<FxHashSet<LocalRef>>,
    /// Variables written by each block.
    pub writes: Vec<FxHashSet<LocalRef>>,
    /// Variables written by each block before any in-block read of them.
    pub dead: Vec<FxHashSet<LocalRef>>,
}

impl ReadsAndWrites {
    /// Derives the three per-block summaries from the graph's instruction
    /// stream.
    #[must_use]
    pub fn compute(cfg: &Cfg) -> Self {
        let n = cfg.max_block_id();
        let mut reads = vec![FxHashSet::default(); n];
        let mut writes = vec![FxHashSet::default(); n];
        let mut dead = vec![FxHashSet::default(); n];

        for bb in cfg.blocks() {
            let id = bb.id().index();
            let mut read_so_far: FxHashSet<LocalRef> = FxHashSet::default();
            for binding in &bb.exprs {
                binding.value.op.for_each_read(|v| {
                    reads[id].insert(v);
                    read_so_far.insert(v);
                });
                writes[id].insert(binding.bind);
                if !read_so_far.contains(&binding.bind) {
                    dead[id].insert(binding.bind);
                }
            }
            if bb.bexit.cond != LocalRef::unconditional() {
                reads[id].insert(bb.bexit.cond);
            }
        }

        Self {
            reads,
            writes,
            dead,
        }
    }
}
