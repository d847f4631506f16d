//! Incremental Reconciliation - Dirty-driven relayout with early stops
//!
//! The engine owns a cache of node and component fragments keyed by node
//! id. A pass walks only dirty paths: a clean node returns its cached
//! fragment without visiting children, and a rebuilt node whose box metrics
//! are unchanged (within tolerance) reports `Skip` so ancestors can stop
//! repositioning. Dirty flags are set by model edits, read here, and
//! cleared when `layout` finishes a pass.
//!
//! The cache assumes a stable context per root: changing the font chain or
//! base style requires `clear`.

use crate::constructs::accent::layout_accent;
use crate::constructs::array::layout_array;
use crate::constructs::attach::{layout_attach, Scripts};
use crate::constructs::fraction::layout_fraction;
use crate::constructs::list::layout_list;
use crate::constructs::radical::layout_radical;
use crate::constructs::under_over::{compose_spreader, layout_under_over};
use crate::context::MathCtx;
use crate::error::{LayoutError, LayoutResult};
use crate::fragment::{
    ColoredFragment, FragmentRef, GlyphFragment, MathFragment, RuleFragment,
};
use crate::canvas::Color;
use crate::style::MathStyle;
use math_model::{ComponentSlot, MathNodeKind, NodeArena, NodeId};
use std::collections::HashMap;
use std::rc::Rc;

/// What a reconciled node reports to its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The fragment's box metrics are unchanged; ancestors need not move
    /// anything
    Skip,
    /// The box changed and ancestors must re-run their layout
    Invalidated,
}

impl Outcome {
    fn merge(self, other: Outcome) -> Outcome {
        if self == Outcome::Invalidated || other == Outcome::Invalidated {
            Outcome::Invalidated
        } else {
            Outcome::Skip
        }
    }
}

/// Cached list fragment of one component slot, together with the child ids
/// it was built from. The ids catch edits that swap in already-clean
/// children, which dirty flags alone cannot see.
struct ComponentCache {
    children: Vec<NodeId>,
    fragment: FragmentRef,
}

/// Incremental layout engine with a fragment cache
pub struct LayoutEngine {
    nodes: HashMap<NodeId, FragmentRef>,
    components: HashMap<(NodeId, ComponentSlot), ComponentCache>,
    tolerance: f32,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            components: HashMap::new(),
            tolerance: 1e-3,
        }
    }

    /// Box-metric tolerance below which a change counts as `Skip`
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Run a full pass: reconcile everything reachable from `root`, clear
    /// the consumed dirty flags, and return the root fragment.
    pub fn layout(
        &mut self,
        arena: &mut NodeArena,
        root: NodeId,
        ctx: &MathCtx,
    ) -> LayoutResult<FragmentRef> {
        self.reconcile(arena, root, ctx)?;
        arena.clear_dirty_subtree(root)?;
        self.cached(root).ok_or(LayoutError::MissingCache(root.0))
    }

    /// The cached fragment of a node, if a pass has produced one
    pub fn cached(&self, id: NodeId) -> Option<FragmentRef> {
        self.nodes.get(&id).cloned()
    }

    /// Drop all cached fragments, forcing the next pass to rebuild from
    /// scratch
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.components.clear();
    }

    /// Reconcile one node. Clean nodes return `Skip` in O(1) without
    /// visiting children.
    pub fn reconcile(
        &mut self,
        arena: &mut NodeArena,
        id: NodeId,
        ctx: &MathCtx,
    ) -> LayoutResult<Outcome> {
        if !arena.is_dirty(id)? && self.nodes.contains_key(&id) {
            return Ok(Outcome::Skip);
        }
        let old = self.cached(id);
        let fragment = Rc::new(self.build(arena, id, ctx, old.as_ref())?);
        arena.record_layout_length(id, fragment.layout_length())?;
        let outcome = match &old {
            Some(old)
                if old
                    .box_metrics()
                    .nearly_equal(&fragment.box_metrics(), self.tolerance) =>
            {
                Outcome::Skip
            }
            _ => Outcome::Invalidated,
        };
        self.nodes.insert(id, fragment);
        tracing::debug!(node = id.0, ?outcome, "reconciled node");
        Ok(outcome)
    }

    /// Reconcile a component list and return its list fragment. Clean
    /// lists come straight from the cache.
    fn reconcile_component(
        &mut self,
        arena: &mut NodeArena,
        parent: NodeId,
        slot: ComponentSlot,
        ctx: &MathCtx,
    ) -> LayoutResult<(FragmentRef, Outcome)> {
        let children: Vec<NodeId> = arena.component_or_empty(parent, slot).to_vec();
        let key = (parent, slot);
        let clean = children
            .iter()
            .all(|child| matches!(arena.is_dirty(*child), Ok(false)));
        if clean {
            if let Some(cached) = self.components.get(&key) {
                // Reuse only a fragment built from the same child list; an
                // edit may have swapped in children that are individually
                // clean
                if cached.children == children {
                    return Ok((cached.fragment.clone(), Outcome::Skip));
                }
            }
        }

        for child in &children {
            self.reconcile(arena, *child, ctx)?;
        }
        let fragments = children
            .iter()
            .map(|child| {
                self.cached(*child)
                    .ok_or(LayoutError::MissingCache(child.0))
            })
            .collect::<LayoutResult<Vec<_>>>()?;
        let fragment = Rc::new(layout_list(fragments, ctx).into_fragment());
        let outcome = match self.components.get(&key) {
            Some(old)
                if old
                    .fragment
                    .box_metrics()
                    .nearly_equal(&fragment.box_metrics(), self.tolerance) =>
            {
                Outcome::Skip
            }
            _ => Outcome::Invalidated,
        };
        self.components.insert(
            key,
            ComponentCache {
                children,
                fragment: fragment.clone(),
            },
        );
        Ok((fragment, outcome))
    }

    fn build(
        &mut self,
        arena: &mut NodeArena,
        id: NodeId,
        ctx: &MathCtx,
        old: Option<&FragmentRef>,
    ) -> LayoutResult<MathFragment> {
        let kind = arena.kind(id)?.clone();
        match kind {
            MathNodeKind::Run(text) => {
                let fragments = text
                    .chars()
                    .map(|ch| Rc::new(resolve_run_char(ch, ctx)))
                    .collect();
                Ok(layout_list(fragments, ctx).into_fragment())
            }
            MathNodeKind::Fraction(subtype) => {
                let (numerator, _) = self.reconcile_component(
                    arena,
                    id,
                    ComponentSlot::Numerator,
                    &ctx.numerator(),
                )?;
                let (denominator, _) = self.reconcile_component(
                    arena,
                    id,
                    ComponentSlot::Denominator,
                    &ctx.denominator(),
                )?;
                Ok(layout_fraction(numerator, denominator, subtype, ctx)?.into_fragment())
            }
            MathNodeKind::Radical { has_index } => {
                let (radicand, _) = self.reconcile_component(
                    arena,
                    id,
                    ComponentSlot::Radicand,
                    &ctx.with_cramped(true),
                )?;
                let index = if has_index {
                    let index_ctx = ctx.with_style(MathStyle::ScriptScript);
                    Some(
                        self.reconcile_component(arena, id, ComponentSlot::Index, &index_ctx)?
                            .0,
                    )
                } else {
                    None
                };
                Ok(layout_radical(radicand, index, ctx)?.into_fragment())
            }
            MathNodeKind::Attach => {
                let (nucleus, _) =
                    self.reconcile_component(arena, id, ComponentSlot::Nucleus, ctx)?;
                let scripts = Scripts {
                    sub: self.script_component(arena, id, ComponentSlot::Sub, &ctx.subscript())?,
                    sup: self
                        .script_component(arena, id, ComponentSlot::Sup, &ctx.superscript())?,
                    lsub: self
                        .script_component(arena, id, ComponentSlot::LSub, &ctx.subscript())?,
                    lsup: self
                        .script_component(arena, id, ComponentSlot::LSup, &ctx.superscript())?,
                };
                Ok(layout_attach(nucleus, scripts, ctx)?.into_fragment())
            }
            MathNodeKind::Accent {
                accent,
                stretchable,
            } => {
                let (nucleus, _) = self.reconcile_component(
                    arena,
                    id,
                    ComponentSlot::Nucleus,
                    &ctx.with_cramped(true),
                )?;
                Ok(layout_accent(nucleus, accent, stretchable, ctx)?.into_fragment())
            }
            MathNodeKind::UnderOver(subtype) => {
                let nucleus_ctx = if subtype.is_over() {
                    ctx.with_cramped(true)
                } else {
                    *ctx
                };
                let (nucleus, outcome) =
                    self.reconcile_component(arena, id, ComponentSlot::Nucleus, &nucleus_ctx)?;
                // An unchanged nucleus box keeps the stretched spreader
                if subtype.spreader().is_some() && outcome == Outcome::Skip {
                    if let Some(MathFragment::Frame(frame)) = old.map(|f| f.as_ref()) {
                        if let Some((_, spreader)) = frame.items.first() {
                            return Ok(compose_spreader(
                                nucleus,
                                spreader.clone(),
                                subtype.is_over(),
                                ctx,
                            )
                            .into_fragment());
                        }
                    }
                }
                Ok(layout_under_over(nucleus, subtype, ctx)?.into_fragment())
            }
            MathNodeKind::Array {
                subtype,
                rows,
                cols,
            } => {
                let cell_ctx =
                    ctx.with_style(ctx.style.array_cell_style(subtype.is_substack()));
                let mut grid = Vec::with_capacity(rows);
                for row in 0..rows {
                    let mut cells = Vec::with_capacity(cols);
                    for col in 0..cols {
                        let slot = ComponentSlot::Cell { row, col };
                        cells.push(self.reconcile_component(arena, id, slot, &cell_ctx)?.0);
                    }
                    grid.push(cells);
                }
                Ok(layout_array(grid, subtype, ctx)?.into_fragment())
            }
        }
    }

    /// A script component, or `None` when the slot is absent or empty
    fn script_component(
        &mut self,
        arena: &mut NodeArena,
        parent: NodeId,
        slot: ComponentSlot,
        ctx: &MathCtx,
    ) -> LayoutResult<Option<FragmentRef>> {
        if arena.component_or_empty(parent, slot).is_empty() {
            return Ok(None);
        }
        Ok(Some(self.reconcile_component(arena, parent, slot, ctx)?.0))
    }
}

/// Run characters fall back to a red replacement mark, or a bare red rule
/// when even the replacement character is uncovered, instead of aborting
/// the whole formula
fn resolve_run_char(ch: char, ctx: &MathCtx) -> MathFragment {
    match GlyphFragment::resolve(ch, ctx) {
        Ok(glyph) => glyph.into_fragment(),
        Err(_) => {
            let inner = match GlyphFragment::resolve('\u{FFFD}', ctx) {
                Ok(replacement) => replacement.into_fragment(),
                Err(_) => {
                    let size = ctx.font_size();
                    RuleFragment::new(size * 0.5, size * 0.7).into_fragment()
                }
            };
            ColoredFragment::new(Color::RED, inner).into_fragment()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use math_font::{FontChain, StaticMathFont, StretchAxis};
    use math_model::FractionSubtype;

    fn chain() -> FontChain {
        let font = StaticMathFont::new(10.0)
            .with_coverage("abcxyz12+=()\u{FFFD}√")
            .with_size_variants('√', StretchAxis::Vertical, &[20.0, 30.0, 50.0]);
        FontChain::new(vec![Box::new(font)]).unwrap()
    }

    fn fraction_tree(arena: &mut NodeArena) -> (NodeId, NodeId, NodeId) {
        let num = arena.push_run("a");
        let den = arena.push_run("b");
        let frac = arena.push(MathNodeKind::Fraction(FractionSubtype::FRACTION));
        arena
            .set_component(frac, ComponentSlot::Numerator, vec![num])
            .unwrap();
        arena
            .set_component(frac, ComponentSlot::Denominator, vec![den])
            .unwrap();
        (frac, num, den)
    }

    #[test]
    fn layout_clears_dirty_flags() {
        let chain = chain();
        let ctx = MathCtx::new(&chain, MathStyle::Text);
        let mut arena = NodeArena::new();
        let (frac, num, den) = fraction_tree(&mut arena);
        let mut engine = LayoutEngine::new();
        engine.layout(&mut arena, frac, &ctx).unwrap();
        for id in [frac, num, den] {
            assert!(!arena.is_dirty(id).unwrap());
        }
    }

    #[test]
    fn clean_nodes_reuse_the_cached_fragment() {
        let chain = chain();
        let ctx = MathCtx::new(&chain, MathStyle::Text);
        let mut arena = NodeArena::new();
        let (frac, _, _) = fraction_tree(&mut arena);
        let mut engine = LayoutEngine::new();
        let first = engine.layout(&mut arena, frac, &ctx).unwrap();
        let again = engine.layout(&mut arena, frac, &ctx).unwrap();
        assert!(Rc::ptr_eq(&first, &again));
    }

    #[test]
    fn same_box_edit_reports_skip_but_updates_content() {
        let chain = chain();
        let ctx = MathCtx::new(&chain, MathStyle::Text);
        let mut arena = NodeArena::new();
        let (frac, num, _) = fraction_tree(&mut arena);
        let mut engine = LayoutEngine::new();
        engine.layout(&mut arena, frac, &ctx).unwrap();

        // Every glyph in the static font has the same advance, so swapping
        // one letter keeps every box identical
        arena.set_run_text(num, "c").unwrap();
        let outcome = engine.reconcile(&mut arena, frac, &ctx).unwrap();
        assert_eq!(outcome, Outcome::Skip);

        let fragment = engine.cached(num).unwrap();
        match fragment.as_ref() {
            MathFragment::Frame(frame) => match frame.items[0].1.as_ref() {
                MathFragment::Glyph(g) => assert_eq!(g.ch, 'c'),
                other => panic!("expected glyph, got {other:?}"),
            },
            other => panic!("expected frame, got {other:?}"),
        }
    }

    #[test]
    fn growing_an_operand_invalidates_ancestors() {
        let chain = chain();
        let ctx = MathCtx::new(&chain, MathStyle::Text);
        let mut arena = NodeArena::new();
        let (frac, num, _) = fraction_tree(&mut arena);
        let mut engine = LayoutEngine::new();
        let before = engine.layout(&mut arena, frac, &ctx).unwrap();

        arena.set_run_text(num, "xyz").unwrap();
        let outcome = engine.reconcile(&mut arena, frac, &ctx).unwrap();
        assert_eq!(outcome, Outcome::Invalidated);
        arena.clear_dirty_subtree(frac).unwrap();
        let after = engine.cached(frac).unwrap();
        assert!(after.width() > before.width());
    }

    #[test]
    fn incremental_result_matches_from_scratch() {
        let chain = chain();
        let ctx = MathCtx::new(&chain, MathStyle::Text);

        // Incremental: lay out, edit, reconcile
        let mut arena = NodeArena::new();
        let (frac, num, _) = fraction_tree(&mut arena);
        let mut engine = LayoutEngine::new();
        engine.layout(&mut arena, frac, &ctx).unwrap();
        arena.set_run_text(num, "xy12").unwrap();
        let incremental = engine.layout(&mut arena, frac, &ctx).unwrap();

        // From scratch with the edited content
        let mut fresh_arena = NodeArena::new();
        let num2 = fresh_arena.push_run("xy12");
        let den2 = fresh_arena.push_run("b");
        let frac2 = fresh_arena.push(MathNodeKind::Fraction(FractionSubtype::FRACTION));
        fresh_arena
            .set_component(frac2, ComponentSlot::Numerator, vec![num2])
            .unwrap();
        fresh_arena
            .set_component(frac2, ComponentSlot::Denominator, vec![den2])
            .unwrap();
        let mut fresh_engine = LayoutEngine::new();
        let scratch = fresh_engine.layout(&mut fresh_arena, frac2, &ctx).unwrap();

        assert!(incremental
            .box_metrics()
            .nearly_equal(&scratch.box_metrics(), 1e-5));
    }

    #[test]
    fn untouched_siblings_keep_their_identity() {
        let chain = chain();
        let ctx = MathCtx::new(&chain, MathStyle::Text);
        let mut arena = NodeArena::new();
        let (frac, num, den) = fraction_tree(&mut arena);
        let mut engine = LayoutEngine::new();
        engine.layout(&mut arena, frac, &ctx).unwrap();
        let den_before = engine.cached(den).unwrap();

        arena.set_run_text(num, "xyz").unwrap();
        engine.layout(&mut arena, frac, &ctx).unwrap();
        let den_after = engine.cached(den).unwrap();
        assert!(Rc::ptr_eq(&den_before, &den_after));
    }

    #[test]
    fn layout_length_is_recorded() {
        let chain = chain();
        let ctx = MathCtx::new(&chain, MathStyle::Text);
        let mut arena = NodeArena::new();
        let run = arena.push_run("abc");
        let mut engine = LayoutEngine::new();
        engine.layout(&mut arena, run, &ctx).unwrap();
        assert_eq!(arena.layout_length(run).unwrap(), 3);
    }

    fn collect_chars(fragment: &MathFragment, out: &mut Vec<char>) {
        match fragment {
            MathFragment::Glyph(g) => out.push(g.ch),
            MathFragment::Frame(f) => {
                for (_, item) in &f.items {
                    collect_chars(item, out);
                }
            }
            MathFragment::Colored(c) => collect_chars(&c.inner, out),
            _ => {}
        }
    }

    #[test]
    fn swapping_in_clean_children_rebuilds_the_component() {
        let chain = chain();
        let ctx = MathCtx::new(&chain, MathStyle::Text);
        let mut arena = NodeArena::new();
        let (frac, _, den) = fraction_tree(&mut arena);
        let mut engine = LayoutEngine::new();
        engine.layout(&mut arena, frac, &ctx).unwrap();

        // `den` is clean after the pass; installing it as the numerator must
        // not leave the numerator's old fragment in place
        arena
            .set_component(frac, ComponentSlot::Numerator, vec![den])
            .unwrap();
        let fragment = engine.layout(&mut arena, frac, &ctx).unwrap();
        let mut chars = Vec::new();
        collect_chars(&fragment, &mut chars);
        assert_eq!(chars, vec!['b', 'b']);
    }

    #[test]
    fn layout_survives_a_missing_replacement_glyph() {
        let font = StaticMathFont::new(10.0).with_coverage("a");
        let chain = FontChain::new(vec![Box::new(font)]).unwrap();
        let ctx = MathCtx::new(&chain, MathStyle::Text);
        let mut arena = NodeArena::new();
        let run = arena.push_run("aΩ");
        let mut engine = LayoutEngine::new();
        let fragment = engine.layout(&mut arena, run, &ctx).unwrap();
        match fragment.as_ref() {
            MathFragment::Frame(frame) => {
                assert!(frame
                    .items
                    .iter()
                    .any(|(_, f)| matches!(f.as_ref(), MathFragment::Colored(_))));
            }
            other => panic!("expected frame, got {other:?}"),
        }
    }

    #[test]
    fn unknown_run_characters_render_as_red_replacements() {
        let chain = chain();
        let ctx = MathCtx::new(&chain, MathStyle::Text);
        let mut arena = NodeArena::new();
        let run = arena.push_run("aΩ");
        let mut engine = LayoutEngine::new();
        let fragment = engine.layout(&mut arena, run, &ctx).unwrap();
        match fragment.as_ref() {
            MathFragment::Frame(frame) => {
                assert!(frame
                    .items
                    .iter()
                    .any(|(_, f)| matches!(f.as_ref(), MathFragment::Colored(_))));
            }
            other => panic!("expected frame, got {other:?}"),
        }
    }
}
