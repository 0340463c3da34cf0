//! The control-flow-graph data model.
//!
//! A method body is represented as a [`Cfg`]: a flat, id-indexed store of
//! [`BasicBlock`]s, each a run of [`Binding`]s ended by a two-way
//! [`BlockExit`]. Variables are [`LocalRef`] handles; instructions are a
//! closed [`Op`] tag set.
//!
//! # Key Components
//!
//! - [`Cfg`] - the owning container, with the front-end wiring surface
//! - [`BasicBlock`] / [`BlockExit`] / [`BlockFlags`] - blocks and branches
//! - [`Binding`] / [`Instruction`] / [`Op`] - straight-line code
//! - [`LocalRef`] - variable handles with reserved sentinels
//! - [`ReadsAndWrites`] - per-block read/write/dead summaries
//!
//! # Ownership
//!
//! Blocks refer to each other exclusively by [`BlockId`]. Successors live
//! in the branch exit; predecessors are mirrored in per-block backedge
//! lists. The post-processing passes in [`crate::passes`] mutate the graph
//! in place and keep the two views consistent.

mod block;
mod graph;
mod instruction;
mod local;

pub use block::{BasicBlock, Binding, BlockExit, BlockFlags, BlockId};
pub use graph::{Cfg, ReadsAndWrites};
pub use instruction::{Instruction, Literal, Op};
pub use local::{LocalKind, LocalRef};
