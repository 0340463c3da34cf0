//! Dead-assignment removal.
//!
//! Drops bindings of pure instructions whose result is never consumed: not
//! read in the binding's own block and not demanded as a live-in argument
//! by either successor. One sweep suffices; removing a pure binding cannot
//! make another binding dead, because the read summary is precomputed and
//! pure instructions read nothing that the summary would have to forget.

use tracing::trace_span;

use crate::cfg::{Cfg, ReadsAndWrites};
use crate::Context;

/// Removes pure bindings whose result is never read.
///
/// Skipped while an interactive query is active, because deleted bindings
/// take their source locations with them. Bindings of globals' local
/// mirrors are always kept, as are all effectful instructions.
pub fn remove_dead_assigns(ctx: &Context, rw: &ReadsAndWrites, cfg: &mut Cfg) {
    if !ctx.lsp_query().is_empty() {
        return;
    }
    let _span = trace_span!("remove_dead_assigns").entered();

    let ids: Vec<_> = cfg.block_ids().collect();
    for id in ids {
        let thenb = cfg[id].bexit.thenb;
        let elseb = cfg[id].bexit.elseb;
        let then_args = cfg[thenb].args.clone();
        let else_args = cfg[elseb].args.clone();
        let reads = &rw.reads[id.index()];

        cfg[id].exprs.retain(|binding| {
            if binding.bind.is_alias_for_global() {
                return true;
            }
            let was_read = reads.contains(&binding.bind)
                || then_args.contains(&binding.bind)
                || else_args.contains(&binding.bind);
            was_read || !binding.value.op.is_pure()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::{Binding, Literal, LocalRef, Op};
    use crate::{LspQuery, Result};

    fn literal(bind: LocalRef) -> Binding {
        Binding::new(
            bind,
            Op::Literal {
                value: Literal::Int(1),
            },
        )
    }

    #[test]
    fn test_unread_pure_binding_is_removed() -> Result<()> {
        let mut cfg = Cfg::new();
        let b1 = cfg.fresh_block(0, 0);
        cfg.unconditional_jump(cfg.entry(), b1)?;
        cfg[b1].exprs.push(literal(LocalRef::synthetic(0)));

        let rw = ReadsAndWrites::compute(&cfg);
        remove_dead_assigns(&Context::new(), &rw, &mut cfg);

        assert!(cfg[b1].exprs.is_empty());
        Ok(())
    }

    #[test]
    fn test_read_binding_is_kept() -> Result<()> {
        let mut cfg = Cfg::new();
        let b1 = cfg.fresh_block(0, 0);
        cfg.unconditional_jump(cfg.entry(), b1)?;
        let t = LocalRef::synthetic(0);
        cfg[b1].exprs.push(literal(t));
        cfg[b1].exprs.push(Binding::new(
            LocalRef::source(0),
            Op::Send {
                recv: t,
                method: "foo".to_string(),
                args: vec![],
            },
        ));

        let rw = ReadsAndWrites::compute(&cfg);
        remove_dead_assigns(&Context::new(), &rw, &mut cfg);

        // t is read by the send; the send itself is effectful.
        assert_eq!(cfg[b1].exprs.len(), 2);
        Ok(())
    }

    #[test]
    fn test_effectful_instruction_is_kept_even_if_unread() -> Result<()> {
        let mut cfg = Cfg::new();
        let b1 = cfg.fresh_block(0, 0);
        cfg.unconditional_jump(cfg.entry(), b1)?;
        cfg[b1].exprs.push(Binding::new(
            LocalRef::synthetic(0),
            Op::Send {
                recv: LocalRef::source(0),
                method: "puts".to_string(),
                args: vec![],
            },
        ));

        let rw = ReadsAndWrites::compute(&cfg);
        remove_dead_assigns(&Context::new(), &rw, &mut cfg);

        assert_eq!(cfg[b1].exprs.len(), 1);
        Ok(())
    }

    #[test]
    fn test_global_mirror_is_kept() -> Result<()> {
        let mut cfg = Cfg::new();
        let b1 = cfg.fresh_block(0, 0);
        cfg.unconditional_jump(cfg.entry(), b1)?;
        cfg[b1].exprs.push(literal(LocalRef::global_alias(0)));

        let rw = ReadsAndWrites::compute(&cfg);
        remove_dead_assigns(&Context::new(), &rw, &mut cfg);

        assert_eq!(cfg[b1].exprs.len(), 1);
        Ok(())
    }

    #[test]
    fn test_successor_argument_counts_as_read() -> Result<()> {
        let mut cfg = Cfg::new();
        let b1 = cfg.fresh_block(0, 0);
        let b2 = cfg.fresh_block(0, 0);
        cfg.unconditional_jump(cfg.entry(), b1)?;
        cfg.unconditional_jump(b1, b2)?;
        let t = LocalRef::synthetic(0);
        cfg[b1].exprs.push(literal(t));
        cfg[b2].args.push(t);

        let rw = ReadsAndWrites::compute(&cfg);
        remove_dead_assigns(&Context::new(), &rw, &mut cfg);

        assert_eq!(cfg[b1].exprs.len(), 1);
        Ok(())
    }

    #[test]
    fn test_skipped_during_interactive_query() -> Result<()> {
        let mut cfg = Cfg::new();
        let b1 = cfg.fresh_block(0, 0);
        cfg.unconditional_jump(cfg.entry(), b1)?;
        cfg[b1].exprs.push(literal(LocalRef::synthetic(0)));

        let rw = ReadsAndWrites::compute(&cfg);
        let ctx = Context::with_lsp_query(LspQuery::Active);
        remove_dead_assigns(&ctx, &rw, &mut cfg);

        assert_eq!(cfg[b1].exprs.len(), 1);
        Ok(())
    }
}
