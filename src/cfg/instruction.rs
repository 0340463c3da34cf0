//! Three-address instructions carried by basic blocks.
//!
//! Every straight-line statement in a block is a [`Binding`]: a destination
//! variable paired with an [`Instruction`] producing its value. The
//! instruction set is a closed tag space ([`Op`]) discriminated at runtime;
//! passes match on it exhaustively so that adding a variant forces every
//! pass to take a position on it.
//!
//! # Purity
//!
//! [`Op::is_pure`] encodes the set of instructions whose only observable
//! effect is binding their destination. It is an allowlist: a newly added
//! variant is effectful until someone proves otherwise, which keeps
//! dead-assignment removal conservative by default.
//!
//! [`Binding`]: crate::cfg::Binding

use std::fmt;

use crate::cfg::LocalRef;

/// A literal value materialized into a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// The nil value.
    Nil,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A string.
    Str(String),
    /// An interned symbol.
    Sym(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Nil => write!(f, "nil"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Int(i) => write!(f, "{i}"),
            Literal::Str(s) => write!(f, "{s:?}"),
            Literal::Sym(s) => write!(f, ":{s}"),
        }
    }
}

/// The closed set of operations an instruction can perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// A pure copy of another variable.
    Ident {
        /// The variable being copied.
        what: LocalRef,
    },
    /// Materializes a literal value.
    Literal {
        /// The value produced.
        value: Literal,
    },
    /// Loads the receiver of the enclosing method.
    LoadSelf,
    /// Loads one of the enclosing method's formal arguments.
    LoadArg {
        /// Zero-based position of the argument.
        index: u16,
    },
    /// Loads the parameter tuple passed to the closure being executed.
    LoadYieldParams,
    /// Binds a global into a local slot.
    ///
    /// Effectful for our purposes: the binding participates in global
    /// resolution and is never removed as dead.
    Alias {
        /// Fully qualified name of the global.
        name: String,
    },
    /// A method call.
    Send {
        /// Receiver of the call.
        recv: LocalRef,
        /// Name of the method being invoked.
        method: String,
        /// Positional arguments.
        args: Vec<LocalRef>,
    },
    /// Returns a value from the enclosing method.
    Return {
        /// The value being returned.
        what: LocalRef,
    },
    /// Asserts that a value's type has been narrowed away entirely.
    Absurd {
        /// The value claimed to be uninhabited.
        what: LocalRef,
    },
}

impl Op {
    /// Returns `true` if this operation's only observable effect is binding
    /// its destination variable.
    ///
    /// Pure bindings whose result is never consumed are safe to delete.
    /// This is an allowlist so that future effectful operations default to
    /// "keep".
    #[must_use]
    pub fn is_pure(&self) -> bool {
        matches!(
            self,
            Op::Ident { .. }
                | Op::Literal { .. }
                | Op::LoadSelf
                | Op::LoadArg { .. }
                | Op::LoadYieldParams
        )
    }

    /// Calls `f` once for every variable this operation reads.
    ///
    /// The branch condition at the end of a block is not part of any
    /// operation and must be accounted for separately.
    pub fn for_each_read(&self, mut f: impl FnMut(LocalRef)) {
        match self {
            Op::Ident { what } | Op::Return { what } | Op::Absurd { what } => f(*what),
            Op::Send { recv, args, .. } => {
                f(*recv);
                for &arg in args {
                    f(arg);
                }
            }
            Op::Literal { .. }
            | Op::LoadSelf
            | Op::LoadArg { .. }
            | Op::LoadYieldParams
            | Op::Alias { .. } => {}
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Ident { what } => write!(f, "{what}"),
            Op::Literal { value } => write!(f, "{value}"),
            Op::LoadSelf => write!(f, "self"),
            Op::LoadArg { index } => write!(f, "arg({index})"),
            Op::LoadYieldParams => write!(f, "yield_params"),
            Op::Alias { name } => write!(f, "alias({name})"),
            Op::Send { recv, method, args } => {
                write!(f, "{recv}.{method}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Op::Return { what } => write!(f, "return {what}"),
            Op::Absurd { what } => write!(f, "absurd({what})"),
        }
    }
}

/// An operation together with its provenance flag.
///
/// `synthetic` marks instructions the front-end inserted for scaffolding
/// rather than ones written by the user. The dealiaser refuses to rewrite
/// operands of non-`Ident` synthetic instructions into canonical variables,
/// because diagnostics raised from them must mention the user's names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// The operation performed.
    pub op: Op,
    /// Whether the front-end inserted this instruction for scaffolding.
    pub synthetic: bool,
}

impl Instruction {
    /// Creates an instruction that came from user-written code.
    #[must_use]
    pub fn new(op: Op) -> Self {
        Self {
            op,
            synthetic: false,
        }
    }

    /// Creates a front-end-inserted scaffolding instruction.
    #[must_use]
    pub fn synthetic(op: Op) -> Self {
        Self {
            op,
            synthetic: true,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.op, f)
    }
}
