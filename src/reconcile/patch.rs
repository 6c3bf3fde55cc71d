use std::collections::HashMap;

use crate::element::state::ElementState;
use crate::element::tree::{ElementId, ElementTree, validate_children};
use crate::foundation::error::Pixel8Result;
use crate::scene::node::{Key, Node, NodeKind};

impl ElementTree {
    /// Reconcile the root against the previous frame's root node.
    pub fn patch_root(
        &mut self,
        prev: Option<&Node>,
        next: &Node,
    ) -> Pixel8Result<Option<ElementId>> {
        let root = self.root();
        self.patch(None, root, prev, Some(next))
    }

    /// Bring `element` (a child of `parent`, or the root when `parent` is `None`) from `prev`
    /// to `next`. Returns the element now standing in that place, if any.
    ///
    /// Elements are never mutated across kinds: a kind change destroys and rebuilds.
    pub fn patch(
        &mut self,
        parent: Option<ElementId>,
        element: Option<ElementId>,
        prev: Option<&Node>,
        next: Option<&Node>,
    ) -> Pixel8Result<Option<ElementId>> {
        let Some(next) = next else {
            if let Some(id) = element {
                self.remove(id)?;
            }
            return Ok(None);
        };
        let (Some(id), Some(prev)) = (element, prev) else {
            return match element {
                Some(old) => self.replace(old, next).map(Some),
                None => self.create(parent, next).map(Some),
            };
        };
        if prev.kind != next.kind {
            return self.replace(id, next).map(Some);
        }
        self.patch_same_kind(parent, id, prev, next)?;
        Ok(Some(id))
    }

    fn patch_same_kind(
        &mut self,
        parent: Option<ElementId>,
        id: ElementId,
        prev: &Node,
        next: &Node,
    ) -> Pixel8Result<()> {
        validate_children(next)?;
        self.update(id)?;
        self.set_props(id, next.props.clone())?;
        if let Some(parent) = parent {
            self.on_child_set_props(parent, id)?;
        }
        self.refresh_sprite(id)?;
        match next.kind {
            NodeKind::Callback => self.patch_callback(id)?,
            NodeKind::List => self.patch_keyed(id, prev, next)?,
            _ => self.patch_indexed(id, prev, next)?,
        }
        self.refresh_textbox(id)
    }

    fn patch_indexed(&mut self, id: ElementId, prev: &Node, next: &Node) -> Pixel8Result<()> {
        let existing = self.children(id).to_vec();
        let shared = existing.len().min(next.children.len());
        for (i, (&child, node)) in existing.iter().zip(&next.children).enumerate() {
            self.patch(Some(id), Some(child), prev.children.get(i), Some(node))?;
        }
        for node in &next.children[shared..] {
            self.patch(Some(id), None, None, Some(node))?;
        }
        for &stale in &existing[shared..] {
            self.remove(stale)?;
        }
        Ok(())
    }

    fn patch_keyed(&mut self, id: ElementId, prev: &Node, next: &Node) -> Pixel8Result<()> {
        let existing = self.children(id).to_vec();
        let mut by_key: HashMap<Key, usize> = HashMap::with_capacity(existing.len());
        for i in 0..existing.len() {
            by_key.entry(key_at(prev.children.get(i), i)).or_insert(i);
        }
        let mut taken = vec![false; existing.len()];
        let mut order = Vec::with_capacity(next.children.len());
        for (i, node) in next.children.iter().enumerate() {
            let slot = by_key.remove(&key_at(Some(node), i));
            let child = match slot {
                Some(j) => {
                    taken[j] = true;
                    self.patch(Some(id), Some(existing[j]), prev.children.get(j), Some(node))?
                }
                None => Some(self.build(Some(id), node)?),
            };
            order.extend(child);
        }
        for (j, &stale) in existing.iter().enumerate() {
            if !taken[j] {
                self.remove(stale)?;
            }
        }
        tracing::trace!(?id, children = order.len(), "keyed reorder");
        self.set_children_order(id, order)
    }

    fn patch_callback(&mut self, id: ElementId) -> Pixel8Result<()> {
        let rendered = self.render_callback(id)?;
        let prev = match &mut self.element_mut(id)?.state {
            ElementState::Callback(cb) => cb.node.take(),
            _ => None,
        };
        let child = self.children(id).first().copied();
        self.patch(Some(id), child, prev.as_ref(), Some(&rendered))?;
        if let ElementState::Callback(cb) = &mut self.element_mut(id)?.state {
            cb.last = prev;
            cb.node = Some(rendered);
        }
        Ok(())
    }
}

/// A child's key, falling back to its position.
fn key_at(node: Option<&Node>, pos: usize) -> Key {
    node.and_then(Node::key)
        .cloned()
        .unwrap_or(Key::Index(pos as u64))
}

#[cfg(test)]
#[path = "../../tests/unit/reconcile/patch.rs"]
mod tests;
