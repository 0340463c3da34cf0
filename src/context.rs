//! Caller-supplied signals consulted by the pipeline.
//!
//! The passes themselves are self-contained; the only things they ask of
//! the embedding session are whether an interactive query is in flight
//! (location-destroying passes then skip) and where to report timings
//! (handled ambiently through `tracing` spans).

/// State of the interactive language-server query, if any.
///
/// When a query is active, the analysis must preserve source locations, so
/// the simplifier and the dead-assignment remover become no-ops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LspQuery {
    /// No interactive query is in flight.
    #[default]
    Empty,
    /// An interactive query wants source-accurate structure.
    Active,
}

impl LspQuery {
    /// Returns `true` if no interactive query is in flight.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == LspQuery::Empty
    }
}

/// Read-only session context threaded through every pass.
#[derive(Debug, Clone, Default)]
pub struct Context {
    lsp_query: LspQuery,
}

impl Context {
    /// Creates a context with no interactive query in flight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context carrying the given query state.
    #[must_use]
    pub fn with_lsp_query(lsp_query: LspQuery) -> Self {
        Self { lsp_query }
    }

    /// Returns the interactive-query state.
    #[must_use]
    pub fn lsp_query(&self) -> LspQuery {
        self.lsp_query
    }
}
