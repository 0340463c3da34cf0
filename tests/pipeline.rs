//! End-to-end tests of the CFG post-processing pipeline.
//!
//! Each test builds a small method-body graph through the public wiring
//! surface, runs [`finalize`], and checks the canonicalized result: which
//! blocks survive, which bindings are rewritten or dropped, what the
//! argument lists and the topological order look like.

use typeflow::prelude::*;

/// Live blocks in forward order (predecessors before successors),
/// excluding the dead sink.
fn forward_order(cfg: &Cfg) -> Vec<BlockId> {
    cfg.forwards_topo_sort
        .iter()
        .rev()
        .copied()
        .filter(|&b| b != cfg.dead_block())
        .collect()
}

fn send(bind: LocalRef, recv: LocalRef, method: &str, args: Vec<LocalRef>) -> Binding {
    Binding::new(
        bind,
        Op::Send {
            recv,
            method: method.to_string(),
            args,
        },
    )
}

#[test]
fn test_straight_line_dead_literal() -> Result<()> {
    let mut cfg = Cfg::new();
    let b1 = cfg.fresh_block(0, 0);
    let tail = cfg.fresh_block(0, 0);
    cfg.unconditional_jump(cfg.entry(), b1)?;
    cfg.unconditional_jump(b1, tail)?;
    cfg[b1].exprs.push(Binding::new(
        LocalRef::synthetic(0),
        Op::Literal {
            value: Literal::Int(1),
        },
    ));

    finalize(&Context::new(), &mut cfg);

    // The empty tail fused into b1, and the unread literal was dropped.
    assert!(cfg.get(tail).is_none());
    assert!(cfg[b1].exprs.is_empty());
    assert!(cfg[b1].args.is_empty());
    assert_eq!(forward_order(&cfg), vec![cfg.entry(), b1]);
    Ok(())
}

#[test]
fn test_alias_chain_collapses_to_source_variable() -> Result<()> {
    let mut cfg = Cfg::new();
    let b1 = cfg.fresh_block(0, 0);
    cfg.unconditional_jump(cfg.entry(), b1)?;

    let x = LocalRef::source(0);
    let y = LocalRef::source(1);
    let t1 = LocalRef::synthetic(1);
    let t2 = LocalRef::synthetic(2);
    // t1 = x; t2 = t1; y = t2.foo()
    cfg[b1].exprs.push(Binding::new(t1, Op::Ident { what: x }));
    cfg[b1].exprs.push(Binding::new(t2, Op::Ident { what: t1 }));
    cfg[b1].exprs.push(send(y, t2, "foo", vec![]));

    finalize(&Context::new(), &mut cfg);

    // The call receiver now names the source variable, and the two
    // temporary copies became dead and were removed.
    assert_eq!(cfg[b1].exprs.len(), 1);
    let Op::Send { recv, method, .. } = &cfg[b1].exprs[0].value.op else {
        panic!("expected a send, got {}", cfg[b1].exprs[0]);
    };
    assert_eq!(*recv, x);
    assert_eq!(method, "foo");
    Ok(())
}

#[test]
fn test_diamond_with_divergent_aliases() -> Result<()> {
    let mut cfg = Cfg::new();
    let b0 = cfg.fresh_block(0, 0);
    let b1 = cfg.fresh_block(0, 0);
    let b2 = cfg.fresh_block(0, 0);
    let b3 = cfg.fresh_block(0, 0);
    cfg.unconditional_jump(cfg.entry(), b0)?;
    cfg.conditional_jump(b0, LocalRef::source(9), b1, b2)?;
    cfg.unconditional_jump(b1, b3)?;
    cfg.unconditional_jump(b2, b3)?;

    let a = LocalRef::source(0);
    let b = LocalRef::source(1);
    let t = LocalRef::synthetic(0);
    cfg[b1].exprs.push(Binding::new(t, Op::Ident { what: a }));
    cfg[b2].exprs.push(Binding::new(t, Op::Ident { what: b }));
    cfg[b3].exprs.push(send(LocalRef::source(2), t, "foo", vec![]));

    finalize(&Context::new(), &mut cfg);

    // The predecessors disagree about t, so the use in the join is not
    // rewritten...
    let Op::Send { recv, .. } = &cfg[b3].exprs[0].value.op else {
        panic!("expected a send");
    };
    assert_eq!(*recv, t);
    // ...which means the join demands t as an argument, and the two
    // copies stay alive to supply it.
    assert!(cfg[b3].args.contains(&t));
    assert!(cfg[b1]
        .exprs
        .iter()
        .any(|bind| bind.bind == t && bind.value.op == Op::Ident { what: a }));
    assert!(cfg[b2]
        .exprs
        .iter()
        .any(|bind| bind.bind == t && bind.value.op == Op::Ident { what: b }));
    Ok(())
}

#[test]
fn test_loop_carried_variable() -> Result<()> {
    let mut cfg = Cfg::new();
    let header = cfg.fresh_block(0, 1);
    let body = cfg.fresh_block(0, 1);
    let exit = cfg.fresh_block(0, 0);
    cfg.unconditional_jump(cfg.entry(), header)?;

    let i = LocalRef::source(0);
    let c = LocalRef::source(1);
    // header: c = i.done?; branch c -> exit | body
    cfg[header].exprs.push(send(c, i, "done", vec![]));
    cfg.conditional_jump(header, c, exit, body)?;
    // body: i = i.succ; back to header
    cfg[body].exprs.push(send(i, i, "succ", vec![]));
    cfg.unconditional_jump(body, header)?;

    finalize(&Context::new(), &mut cfg);

    assert!(cfg[header].flags.contains(BlockFlags::LOOP_HEADER));
    assert!(!cfg[body].flags.contains(BlockFlags::LOOP_HEADER));
    assert_eq!(cfg[header].args, vec![i]);
    assert_eq!(cfg.min_loops.get(&i), Some(&cfg[header].outer_loops));
    assert_eq!(cfg.max_loop_write.get(&i), Some(&cfg[body].outer_loops));
    Ok(())
}

#[test]
fn test_unreachable_block_disappears_entirely() -> Result<()> {
    let mut cfg = Cfg::new();
    let b1 = cfg.fresh_block(0, 0);
    let keep = cfg.fresh_block(0, 0);
    let orphan = cfg.fresh_block(0, 0);
    cfg.unconditional_jump(cfg.entry(), b1)?;
    cfg[b1].exprs.push(send(
        LocalRef::source(1),
        LocalRef::source(0),
        "effect",
        vec![],
    ));
    cfg.conditional_jump(b1, LocalRef::source(9), keep, orphan)?;
    cfg[keep].exprs.push(send(
        LocalRef::source(2),
        LocalRef::source(0),
        "effect",
        vec![],
    ));
    cfg[orphan].exprs.push(send(
        LocalRef::source(3),
        LocalRef::source(0),
        "effect",
        vec![],
    ));
    cfg.unconditional_jump(orphan, keep)?;
    // Retargeting b1 strands the orphan.
    cfg.unconditional_jump(b1, keep)?;

    finalize(&Context::new(), &mut cfg);

    assert!(cfg.get(orphan).is_none());
    assert!(!cfg.forwards_topo_sort.contains(&orphan));
    for bb in cfg.blocks() {
        assert!(!bb.back_edges.contains(&orphan));
    }
    Ok(())
}

#[test]
fn test_jump_threading_end_to_end() -> Result<()> {
    let mut cfg = Cfg::new();
    let b = cfg.fresh_block(0, 0);
    let fwd = cfg.fresh_block(0, 0);
    let other = cfg.fresh_block(0, 0);
    let join = cfg.fresh_block(0, 0);
    cfg.unconditional_jump(cfg.entry(), b)?;
    cfg[b].exprs.push(send(
        LocalRef::source(1),
        LocalRef::source(0),
        "effect",
        vec![],
    ));
    cfg.conditional_jump(b, LocalRef::source(9), fwd, other)?;
    cfg.unconditional_jump(fwd, join)?;
    cfg.unconditional_jump(other, join)?;
    cfg[other].exprs.push(send(
        LocalRef::source(2),
        LocalRef::source(0),
        "effect",
        vec![],
    ));
    cfg[join].exprs.push(send(
        LocalRef::source(3),
        LocalRef::source(0),
        "effect",
        vec![],
    ));

    finalize(&Context::new(), &mut cfg);

    // b branches straight to the join; the empty forwarder is gone.
    assert!(cfg.get(fwd).is_none());
    assert_eq!(cfg[b].bexit.thenb, join);
    assert_eq!(cfg[b].bexit.elseb, other);
    Ok(())
}

#[test]
fn test_interactive_query_preserves_structure() -> Result<()> {
    let mut cfg = Cfg::new();
    let b1 = cfg.fresh_block(0, 0);
    let tail = cfg.fresh_block(0, 0);
    cfg.unconditional_jump(cfg.entry(), b1)?;
    cfg.unconditional_jump(b1, tail)?;
    cfg[b1].exprs.push(Binding::new(
        LocalRef::synthetic(0),
        Op::Literal {
            value: Literal::Int(1),
        },
    ));

    let ctx = Context::with_lsp_query(LspQuery::Active);
    finalize(&ctx, &mut cfg);

    // Neither the fusible tail nor the dead literal was touched.
    assert!(cfg.get(tail).is_some());
    assert_eq!(cfg[b1].exprs.len(), 1);
    Ok(())
}

#[test]
fn test_invariants_hold_after_every_pass() -> Result<()> {
    let mut cfg = Cfg::new();
    let header = cfg.fresh_block(0, 1);
    let body = cfg.fresh_block(0, 1);
    let exit = cfg.fresh_block(0, 0);
    cfg.unconditional_jump(cfg.entry(), header)?;
    let i = LocalRef::source(0);
    let c = LocalRef::source(1);
    cfg[header].exprs.push(send(c, i, "done", vec![]));
    cfg.conditional_jump(header, c, exit, body)?;
    cfg[body].exprs.push(send(i, i, "succ", vec![]));
    cfg.unconditional_jump(body, header)?;

    let ctx = Context::new();
    sanity_check(&cfg);
    simplify(&ctx, &mut cfg);
    sanity_check(&cfg);
    fill_forwards_topo_sort(&mut cfg);
    sanity_check(&cfg);
    dealias(&ctx, &mut cfg);
    sanity_check(&cfg);
    mark_loop_headers(&ctx, &mut cfg);
    sanity_check(&cfg);
    let rw = ReadsAndWrites::compute(&cfg);
    compute_min_max_loops(&ctx, &rw, &mut cfg);
    sanity_check(&cfg);
    fill_in_block_arguments(&ctx, &rw, &mut cfg);
    sanity_check(&cfg);
    remove_dead_assigns(&ctx, &rw, &mut cfg);
    sanity_check(&cfg);

    // The topological order still covers exactly the live blocks.
    let mut in_order = cfg.forwards_topo_sort.clone();
    in_order.sort_unstable();
    let mut live: Vec<_> = cfg.block_ids().collect();
    live.sort_unstable();
    assert_eq!(in_order, live);
    Ok(())
}

#[test]
fn test_finalize_is_stable_on_second_run() -> Result<()> {
    let mut cfg = Cfg::new();
    let b0 = cfg.fresh_block(0, 0);
    let b1 = cfg.fresh_block(0, 0);
    let b2 = cfg.fresh_block(0, 0);
    let b3 = cfg.fresh_block(0, 0);
    cfg.unconditional_jump(cfg.entry(), b0)?;
    cfg.conditional_jump(b0, LocalRef::source(9), b1, b2)?;
    cfg.unconditional_jump(b1, b3)?;
    cfg.unconditional_jump(b2, b3)?;
    let a = LocalRef::source(0);
    let b = LocalRef::source(1);
    let t = LocalRef::synthetic(0);
    cfg[b1].exprs.push(Binding::new(t, Op::Ident { what: a }));
    cfg[b2].exprs.push(Binding::new(t, Op::Ident { what: b }));
    cfg[b3].exprs.push(send(LocalRef::source(2), t, "foo", vec![]));

    finalize(&Context::new(), &mut cfg);
    let once = cfg.clone();
    finalize(&Context::new(), &mut cfg);
    assert_eq!(cfg, once);
    Ok(())
}
