use thiserror::Error;

use crate::cfg::BlockId;

/// Errors produced by the graph-construction surface.
///
/// The post-processing passes themselves never fail: on any graph
/// satisfying the input invariants they run to completion, and a broken
/// invariant is a debug assertion rather than a recoverable error. What can
/// fail is wiring a graph together, when a jump names a block id the graph
/// does not hold.
#[derive(Debug, Error)]
pub enum Error {
    /// A jump referenced a block id that was never allocated in this graph.
    #[error("block {0} was never allocated in this graph")]
    UnknownBlock(BlockId),

    /// A jump referenced a block that has already been deleted.
    #[error("block {0} has been removed from this graph")]
    RemovedBlock(BlockId),
}
