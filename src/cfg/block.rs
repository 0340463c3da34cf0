//! Basic blocks and their branch exits.
//!
//! A [`BasicBlock`] is a maximal straight-line sequence of [`Binding`]s
//! terminated by a single two-way [`BlockExit`]. Blocks are owned by the
//! [`Cfg`](crate::cfg::Cfg) container and refer to each other by
//! [`BlockId`], never by pointer, so that the simplifier can delete blocks
//! without invalidating anything.

use std::fmt;

use bitflags::bitflags;

use crate::cfg::{Instruction, LocalRef, Op};

/// Identifier of a basic block within its owning graph.
///
/// Ids are stable for the lifetime of the graph: deleting a block retires
/// its id rather than renumbering the survivors.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(usize);

impl BlockId {
    /// Creates a block id from a raw index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw index, suitable for indexing id-sized scratch arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bb{}", self.0)
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

bitflags! {
    /// Per-block boolean properties.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BlockFlags: u8 {
        /// The front-end wired this block in as a jump target. Every live
        /// block except `entry` must carry it.
        const WAS_JUMP_DESTINATION = 1 << 0;
        /// This block is the target of a backedge from a deeper loop nest.
        const LOOP_HEADER = 1 << 1;
    }
}

/// The two-way branch terminating a block.
///
/// `cond` is the variable whose truthiness selects the edge; the sentinel
/// [`LocalRef::unconditional`] means "always take `thenb`". `thenb` and
/// `elseb` may name the same block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockExit {
    /// The branch condition variable, or the unconditional sentinel.
    pub cond: LocalRef,
    /// Successor taken when `cond` is truthy.
    pub thenb: BlockId,
    /// Successor taken when `cond` is falsy.
    pub elseb: BlockId,
}

/// A destination variable paired with the instruction producing its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// The variable being defined.
    pub bind: LocalRef,
    /// The instruction computing the value.
    pub value: Instruction,
}

impl Binding {
    /// Creates a binding for a user-written instruction.
    #[must_use]
    pub fn new(bind: LocalRef, op: Op) -> Self {
        Self {
            bind,
            value: Instruction::new(op),
        }
    }

    /// Creates a binding for a front-end-inserted scaffolding instruction.
    #[must_use]
    pub fn synthetic(bind: LocalRef, op: Op) -> Self {
        Self {
            bind,
            value: Instruction::synthetic(op),
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.bind, self.value)
    }
}

/// A basic block: straight-line bindings plus a branch exit.
///
/// Predecessors are recorded in `back_edges` as non-owning ids; the
/// invariant maintained across the pipeline is that `B` appears in
/// `S.back_edges` (exactly once after dedup) for each successor `S` of `B`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicBlock {
    id: BlockId,
    /// Tag of the source-level lexical closure this block belongs to.
    /// Blocks with different tags are never fused.
    pub closure_id: u32,
    /// Loop-nesting depth at entry to the block.
    pub outer_loops: u32,
    /// The straight-line code of the block, in execution order.
    pub exprs: Vec<Binding>,
    /// The branch terminating the block.
    pub bexit: BlockExit,
    /// Variables that must be live on entry, sorted ascending. Filled in by
    /// the block-argument solver.
    pub args: Vec<LocalRef>,
    /// Ids of predecessor blocks. May hold duplicates until the simplifier
    /// dedups them.
    pub back_edges: Vec<BlockId>,
    /// Boolean properties of the block.
    pub flags: BlockFlags,
    /// Scratch field of the topological sort: [`BasicBlock::FWD_UNVISITED`],
    /// [`BasicBlock::FWD_IN_PROGRESS`], or the assigned position.
    pub fwd_id: i32,
}

impl BasicBlock {
    /// `fwd_id` marker: the block has not been reached yet.
    pub const FWD_UNVISITED: i32 = -1;
    /// `fwd_id` marker: the block is on the DFS stack.
    pub const FWD_IN_PROGRESS: i32 = -2;

    /// Creates an empty block that falls through into the dead sink.
    pub(crate) fn new(id: BlockId, closure_id: u32, outer_loops: u32, dead: BlockId) -> Self {
        Self {
            id,
            closure_id,
            outer_loops,
            exprs: Vec::new(),
            bexit: BlockExit {
                cond: LocalRef::unconditional(),
                thenb: dead,
                elseb: dead,
            },
            args: Vec::new(),
            back_edges: Vec::new(),
            flags: BlockFlags::empty(),
            fwd_id: Self::FWD_UNVISITED,
        }
    }

    /// Returns this block's id.
    #[must_use]
    pub const fn id(&self) -> BlockId {
        self.id
    }

    /// Returns `true` if the block ends in an unconditional jump.
    #[must_use]
    pub fn is_unconditional(&self) -> bool {
        self.bexit.cond == LocalRef::unconditional()
    }
}
