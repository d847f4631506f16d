//! Node Arena - Flat storage for formula trees
//!
//! Nodes are stored in a single vector and referenced by `NodeId`. Each node
//! records its construct kind, its child lists keyed by component slot, its
//! parent, a dirty flag, and the layout length reported by the last layout
//! pass. Edits mark the edited node and its ancestors dirty; the layout
//! engine reads the flags and clears them when a pass finishes.

use crate::error::{ModelError, ModelResult};
use crate::node::{ComponentSlot, MathNodeKind};
use serde::{Deserialize, Serialize};

// =============================================================================
// Node Id
// =============================================================================

/// Index of a node within its arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

// =============================================================================
// Node
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Node {
    kind: MathNodeKind,
    /// Child lists in slot order. Small and iterated in order, so a vector
    /// beats a map here.
    components: Vec<(ComponentSlot, Vec<NodeId>)>,
    parent: Option<NodeId>,
    dirty: bool,
    /// Content length reported by the last layout pass
    layout_length: usize,
}

/// Flat storage for a formula tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn get(&self, id: NodeId) -> ModelResult<&Node> {
        self.nodes.get(id.index()).ok_or(ModelError::UnknownNode(id.0))
    }

    fn get_mut(&mut self, id: NodeId) -> ModelResult<&mut Node> {
        self.nodes
            .get_mut(id.index())
            .ok_or(ModelError::UnknownNode(id.0))
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Add a node with no children. New nodes start dirty so the first layout
    /// pass visits them.
    pub fn push(&mut self, kind: MathNodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            components: Vec::new(),
            parent: None,
            dirty: true,
            layout_length: 0,
        });
        id
    }

    /// Install a child list under `slot`, replacing any previous list and
    /// re-parenting the children. Marks the parent dirty.
    pub fn set_component(
        &mut self,
        parent: NodeId,
        slot: ComponentSlot,
        children: Vec<NodeId>,
    ) -> ModelResult<()> {
        if let ComponentSlot::Cell { row, col } = slot {
            if let MathNodeKind::Array { rows, cols, .. } = self.get(parent)?.kind {
                if row >= rows || col >= cols {
                    return Err(ModelError::CellOutOfBounds {
                        row,
                        col,
                        rows,
                        cols,
                    });
                }
            }
        }
        self.get(parent)?;
        for &child in &children {
            self.get_mut(child)?.parent = Some(parent);
        }
        let node = self.get_mut(parent)?;
        if let Some(entry) = node.components.iter_mut().find(|(s, _)| *s == slot) {
            entry.1 = children;
        } else {
            node.components.push((slot, children));
        }
        self.mark_dirty(parent)?;
        Ok(())
    }

    /// Shorthand that pushes a run node
    pub fn push_run(&mut self, text: impl Into<String>) -> NodeId {
        self.push(MathNodeKind::Run(text.into()))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn kind(&self, id: NodeId) -> ModelResult<&MathNodeKind> {
        Ok(&self.get(id)?.kind)
    }

    pub fn parent(&self, id: NodeId) -> ModelResult<Option<NodeId>> {
        Ok(self.get(id)?.parent)
    }

    /// All populated component lists of a node, in insertion order
    pub fn components(&self, id: NodeId) -> ModelResult<&[(ComponentSlot, Vec<NodeId>)]> {
        Ok(&self.get(id)?.components)
    }

    /// The child list under `slot`, failing if the slot is unpopulated
    pub fn component(&self, id: NodeId, slot: ComponentSlot) -> ModelResult<&[NodeId]> {
        self.get(id)?
            .components
            .iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, children)| children.as_slice())
            .ok_or(ModelError::InvalidSlot(slot))
    }

    /// Like [`component`](Self::component), but absent slots yield an empty
    /// list instead of an error
    pub fn component_or_empty(&self, id: NodeId, slot: ComponentSlot) -> &[NodeId] {
        self.nodes
            .get(id.index())
            .and_then(|node| node.components.iter().find(|(s, _)| *s == slot))
            .map(|(_, children)| children.as_slice())
            .unwrap_or(&[])
    }

    // =========================================================================
    // Dirty Tracking
    // =========================================================================

    pub fn is_dirty(&self, id: NodeId) -> ModelResult<bool> {
        Ok(self.get(id)?.dirty)
    }

    /// Flag a node and all its ancestors as needing layout
    pub fn mark_dirty(&mut self, id: NodeId) -> ModelResult<()> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.get_mut(current)?;
            if node.dirty {
                break;
            }
            node.dirty = true;
            cursor = node.parent;
        }
        Ok(())
    }

    /// Clear dirty flags on a node and everything below it. Called by the
    /// layout engine once a pass has consumed the flags.
    pub fn clear_dirty_subtree(&mut self, id: NodeId) -> ModelResult<()> {
        if !self.get(id)?.dirty {
            return Ok(());
        }
        self.get_mut(id)?.dirty = false;
        let children: Vec<NodeId> = self
            .get(id)?
            .components
            .iter()
            .flat_map(|(_, list)| list.iter().copied())
            .collect();
        for child in children {
            self.clear_dirty_subtree(child)?;
        }
        Ok(())
    }

    // =========================================================================
    // Layout Length
    // =========================================================================

    pub fn record_layout_length(&mut self, id: NodeId, length: usize) -> ModelResult<()> {
        self.get_mut(id)?.layout_length = length;
        Ok(())
    }

    pub fn layout_length(&self, id: NodeId) -> ModelResult<usize> {
        Ok(self.get(id)?.layout_length)
    }

    // =========================================================================
    // Edits
    // =========================================================================

    /// Replace the text of a run node and mark it dirty
    pub fn set_run_text(&mut self, id: NodeId, text: impl Into<String>) -> ModelResult<()> {
        match &mut self.get_mut(id)?.kind {
            MathNodeKind::Run(existing) => *existing = text.into(),
            _ => return Err(ModelError::NotARun),
        }
        self.mark_dirty(id)
    }

    /// Replace a child list and mark the parent dirty
    pub fn replace_component(
        &mut self,
        parent: NodeId,
        slot: ComponentSlot,
        children: Vec<NodeId>,
    ) -> ModelResult<()> {
        self.component(parent, slot)?;
        self.set_component(parent, slot, children)
    }
}
