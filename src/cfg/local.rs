//! Variable handles and their reserved sentinels.
//!
//! This module defines [`LocalRef`], the lightweight handle used everywhere
//! the graph refers to a method-local variable: binding targets, instruction
//! operands, branch conditions, and per-block argument lists.
//!
//! # Design Rationale
//!
//! A handle carries its classification inline ([`LocalKind`]) rather than
//! pointing into a side table. The passes only ever ask two questions about
//! a variable - "is this a compiler-introduced temporary?" and "does this
//! mirror a global?" - and answering them without a table lookup keeps the
//! dataflow inner loops allocation-free.
//!
//! # Sentinels
//!
//! Two reserved handles never name real variables:
//!
//! - [`LocalRef::unconditional`] - stored as a branch condition, it means
//!   "always take the then edge".
//! - [`LocalRef::closure_call`] - the condition of a closure-call header
//!   block; the simplifier must not collapse through such blocks.
//!
//! # Ordering
//!
//! Handles order by `(kind, id)`. The ordering has no semantic meaning, but
//! it is total and stable, which is what the per-block argument lists need
//! to stay deterministic.

use std::fmt;

/// Classification of a variable handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LocalKind {
    /// A variable with a user-visible source name.
    Source,
    /// A compiler-introduced scratch variable with no source name.
    ///
    /// Only these are eligible for alias elimination; rewriting a named
    /// variable would change which name diagnostics mention.
    SyntheticTemp,
    /// A local that mirrors a global; its bindings are never deleted.
    GlobalAlias,
    /// A reserved handle with special meaning to the branch exit.
    Sentinel,
}

/// A lightweight handle to a method-local variable.
///
/// Handles are `Copy`, structurally comparable, hashable, and totally
/// ordered. Two handles are the same variable iff they compare equal.
///
/// # Examples
///
/// ```rust
/// use typeflow::cfg::LocalRef;
///
/// let x = LocalRef::source(0);
/// let t = LocalRef::synthetic(0);
/// assert_ne!(x, t);
/// assert!(t.is_synthetic_temporary());
/// assert!(!x.is_synthetic_temporary());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalRef {
    kind: LocalKind,
    id: u32,
}

const SENTINEL_UNCONDITIONAL: u32 = 0;
const SENTINEL_CLOSURE_CALL: u32 = 1;

impl LocalRef {
    /// Creates a handle to a named source variable.
    #[must_use]
    pub const fn source(id: u32) -> Self {
        Self {
            kind: LocalKind::Source,
            id,
        }
    }

    /// Creates a handle to a compiler-introduced temporary.
    #[must_use]
    pub const fn synthetic(id: u32) -> Self {
        Self {
            kind: LocalKind::SyntheticTemp,
            id,
        }
    }

    /// Creates a handle to a local that mirrors a global.
    #[must_use]
    pub const fn global_alias(id: u32) -> Self {
        Self {
            kind: LocalKind::GlobalAlias,
            id,
        }
    }

    /// The reserved condition meaning "always take the then edge".
    #[must_use]
    pub const fn unconditional() -> Self {
        Self {
            kind: LocalKind::Sentinel,
            id: SENTINEL_UNCONDITIONAL,
        }
    }

    /// The reserved condition of a closure-call header block.
    #[must_use]
    pub const fn closure_call() -> Self {
        Self {
            kind: LocalKind::Sentinel,
            id: SENTINEL_CLOSURE_CALL,
        }
    }

    /// Returns this handle's classification.
    #[must_use]
    pub const fn kind(self) -> LocalKind {
        self.kind
    }

    /// Returns the numeric part of the handle, unique within its kind.
    #[must_use]
    pub const fn id(self) -> u32 {
        self.id
    }

    /// Returns `true` if this is a compiler-introduced temporary.
    #[must_use]
    pub fn is_synthetic_temporary(self) -> bool {
        self.kind == LocalKind::SyntheticTemp
    }

    /// Returns `true` if this local mirrors a global.
    #[must_use]
    pub fn is_alias_for_global(self) -> bool {
        self.kind == LocalKind::GlobalAlias
    }
}

impl fmt::Display for LocalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LocalKind::Source => write!(f, "v{}", self.id),
            LocalKind::SyntheticTemp => write!(f, "t{}", self.id),
            LocalKind::GlobalAlias => write!(f, "g{}", self.id),
            LocalKind::Sentinel => match self.id {
                SENTINEL_UNCONDITIONAL => write!(f, "<unconditional>"),
                SENTINEL_CLOSURE_CALL => write!(f, "<closure-call>"),
                other => write!(f, "<sentinel{other}>"),
            },
        }
    }
}

impl fmt::Debug for LocalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
