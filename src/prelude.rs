//! Convenient re-exports of the most commonly used types.
//!
//! ```rust
//! use typeflow::prelude::*;
//!
//! let mut cfg = Cfg::new();
//! let body = cfg.fresh_block(0, 0);
//! cfg.unconditional_jump(cfg.entry(), body)?;
//! finalize(&Context::new(), &mut cfg);
//! # Ok::<(), typeflow::Error>(())
//! ```

pub use crate::cfg::{
    BasicBlock, Binding, BlockExit, BlockFlags, BlockId, Cfg, Instruction, Literal, LocalKind,
    LocalRef, Op, ReadsAndWrites,
};
pub use crate::passes::{
    compute_min_max_loops, dealias, fill_forwards_topo_sort, fill_in_block_arguments, finalize,
    mark_loop_headers, remove_dead_assigns, sanity_check, simplify, topo_sort_fwd,
};
pub use crate::{Context, Error, LspQuery, Result};
