use std::borrow::Cow;
use std::fmt;

use crate::element::state::ElementState;
use crate::foundation::core::FrameInfo;
use crate::foundation::error::{Pixel8Error, Pixel8Result};
use crate::scene::node::{Node, NodeKind};
use crate::scene::props::Props;
use crate::text::layout::FontRegistry;

/// Handle to an element in an [`ElementTree`].
///
/// Carries a slot index and a generation so that handles to removed elements never resolve
/// to whatever later reuses the slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId {
    idx: u32,
    generation: u32,
}

impl ElementId {
    pub fn index(self) -> u32 {
        self.idx
    }

    /// Value written into the hitmap for this element. Zero means "nothing".
    pub fn hit_value(self) -> u32 {
        self.idx + 1
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({}@gen{})", self.idx, self.generation)
    }
}

/// Persistent runtime mirror of one node.
#[derive(Debug)]
pub struct Element {
    kind: NodeKind,
    props: Props,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    pub(crate) state: ElementState,
}

impl Element {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    element: Option<Element>,
}

/// Lifetime counters, mostly for diagnostics and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub created: u64,
    pub destroyed: u64,
}

/// Arena owning every live element. Parents own children through `children`; `parent` links
/// are plain handles.
#[derive(Debug, Default)]
pub struct ElementTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: Option<ElementId>,
    pub(crate) fonts: FontRegistry,
    stats: TreeStats,
}

impl ElementTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fonts(fonts: FontRegistry) -> Self {
        Self {
            fonts,
            ..Self::default()
        }
    }

    pub fn fonts_mut(&mut self) -> &mut FontRegistry {
        &mut self.fonts
    }

    pub fn root(&self) -> Option<ElementId> {
        self.root
    }

    pub fn stats(&self) -> TreeStats {
        self.stats
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        let slot = self.slots.get(id.idx as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.element.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        let slot = self.slots.get_mut(id.idx as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.element.as_mut()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn element(&self, id: ElementId) -> Pixel8Result<&Element> {
        self.get(id)
            .ok_or_else(|| Pixel8Error::render(format!("stale element handle {id:?}")))
    }

    pub(crate) fn element_mut(&mut self, id: ElementId) -> Pixel8Result<&mut Element> {
        self.get_mut(id)
            .ok_or_else(|| Pixel8Error::render(format!("stale element handle {id:?}")))
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map_or(&[], |e| e.children.as_slice())
    }

    /// Resolve a hitmap value back to a live element.
    pub fn element_for_hit(&self, value: u32) -> Option<ElementId> {
        let idx = value.checked_sub(1)?;
        let slot = self.slots.get(idx as usize)?;
        slot.element.as_ref()?;
        Some(ElementId {
            idx,
            generation: slot.generation,
        })
    }

    /// Props as drawn: own props with any in-flight transition values of the parent applied.
    pub fn effective_props(&self, id: ElementId) -> Option<Cow<'_, Props>> {
        let el = self.get(id)?;
        let parent_state = el.parent.and_then(|p| self.get(p)).map(|p| &p.state);
        if let Some(ElementState::Transition(tr)) = parent_state
            && tr.has_overrides(id)
        {
            let mut props = el.props.clone();
            tr.apply_overrides(id, &mut props);
            return Some(Cow::Owned(props));
        }
        Some(Cow::Borrowed(&el.props))
    }

    fn alloc(&mut self, element: Element) -> ElementId {
        self.stats.created += 1;
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.element = Some(element);
            return ElementId {
                idx,
                generation: slot.generation,
            };
        }
        let idx = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            element: Some(element),
        });
        ElementId { idx, generation: 0 }
    }

    fn release(&mut self, id: ElementId) {
        if let Some(slot) = self.slots.get_mut(id.idx as usize)
            && slot.generation == id.generation
            && slot.element.take().is_some()
        {
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.idx);
            self.stats.destroyed += 1;
        }
    }

    pub(crate) fn set_root(&mut self, id: Option<ElementId>) {
        self.root = id;
    }

    /// Build an element (and its subtree) from `node`, parented to `parent` but not yet
    /// listed among its children.
    ///
    /// `on_init` fires after props are set and before children are built.
    pub(crate) fn build(
        &mut self,
        parent: Option<ElementId>,
        node: &Node,
    ) -> Pixel8Result<ElementId> {
        validate_children(node)?;
        let id = self.alloc(Element {
            kind: node.kind,
            props: node.props.clone(),
            parent,
            children: Vec::with_capacity(node.children.len()),
            state: ElementState::for_kind(node.kind),
        });
        tracing::trace!(?id, kind = node.kind.name(), "create element");
        if let Err(e) = self.init_subtree(id, node) {
            self.destroy_subtree(id);
            return Err(e);
        }
        Ok(id)
    }

    fn init_subtree(&mut self, id: ElementId, node: &Node) -> Pixel8Result<()> {
        self.refresh_sprite(id)?;
        if let Some(h) = node.props.handlers.on_init.clone() {
            h();
        }
        if node.kind == NodeKind::Callback {
            let rendered = self.render_callback(id)?;
            let child = self.build(Some(id), &rendered)?;
            self.element_mut(id)?.children.push(child);
            if let ElementState::Callback(cb) = &mut self.element_mut(id)?.state {
                cb.node = Some(rendered);
            }
            return Ok(());
        }
        for child_node in &node.children {
            let child = self.build(Some(id), child_node)?;
            self.element_mut(id)?.children.push(child);
        }
        self.refresh_textbox(id)
    }

    /// Insert an already-built element among `parent`'s children, or make it the root.
    pub(crate) fn attach(
        &mut self,
        parent: Option<ElementId>,
        child: ElementId,
        at: Option<usize>,
    ) -> Pixel8Result<()> {
        let Some(parent) = parent else {
            self.root = Some(child);
            return Ok(());
        };
        let children = &mut self.element_mut(parent)?.children;
        match at {
            Some(i) if i <= children.len() => children.insert(i, child),
            _ => children.push(child),
        }
        Ok(())
    }

    /// Build `node` and append it under `parent` (or install it as root).
    pub fn create(&mut self, parent: Option<ElementId>, node: &Node) -> Pixel8Result<ElementId> {
        let id = self.build(parent, node)?;
        self.attach(parent, id, None)?;
        Ok(id)
    }

    /// Remove an element and its subtree.
    ///
    /// `on_destroy` fires for every removed element, parents before children, before the
    /// element leaves its parent's child list.
    pub fn remove(&mut self, id: ElementId) -> Pixel8Result<usize> {
        let parent = self.element(id)?.parent;
        let pos = self.detach(parent, id)?;
        self.destroy_subtree(id);
        Ok(pos)
    }

    /// Unlink `id` from its parent, returning its former position.
    fn detach(&mut self, parent: Option<ElementId>, id: ElementId) -> Pixel8Result<usize> {
        let Some(parent) = parent else {
            if self.root == Some(id) {
                self.root = None;
            }
            return Ok(0);
        };
        let p = self.element_mut(parent)?;
        let pos = p.children.iter().position(|&c| c == id).unwrap_or(p.children.len());
        if pos < p.children.len() {
            p.children.remove(pos);
        }
        if let ElementState::Transition(tr) = &mut p.state {
            tr.purge(id);
        }
        Ok(pos)
    }

    fn destroy_subtree(&mut self, id: ElementId) {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            let Some(el) = self.get(cur) else {
                continue;
            };
            order.push(cur);
            stack.extend(el.children.iter().rev().copied());
        }
        for &cur in &order {
            let hook = self
                .get(cur)
                .and_then(|e| e.props.handlers.on_destroy.clone());
            if let Some(h) = hook {
                h();
            }
        }
        for cur in order {
            tracing::trace!(id = ?cur, "remove element");
            self.release(cur);
        }
    }

    /// Replace `old` with a fresh element built from `node`, keeping its position.
    pub(crate) fn replace(&mut self, old: ElementId, node: &Node) -> Pixel8Result<ElementId> {
        let parent = self.element(old)?.parent;
        tracing::debug!(
            ?old,
            from = self.element(old)?.kind.name(),
            to = node.kind.name(),
            "replace element"
        );
        let pos = self.remove(old)?;
        let id = self.build(parent, node)?;
        self.attach(parent, id, Some(pos))?;
        Ok(id)
    }

    pub(crate) fn set_children_order(
        &mut self,
        id: ElementId,
        order: Vec<ElementId>,
    ) -> Pixel8Result<()> {
        self.element_mut(id)?.children = order;
        Ok(())
    }

    pub(crate) fn set_props(&mut self, id: ElementId, props: Props) -> Pixel8Result<()> {
        self.element_mut(id)?.props = props;
        Ok(())
    }

    /// Per-frame update: user hook, then kind-specific work that reads the current props.
    pub(crate) fn update(&mut self, id: ElementId) -> Pixel8Result<()> {
        let el = self.element(id)?;
        if let Some(h) = el.props.handlers.on_update.clone() {
            h();
        }
        if el.kind == NodeKind::Transition {
            self.step_transition(id)?;
        }
        Ok(())
    }

    fn step_transition(&mut self, id: ElementId) -> Pixel8Result<()> {
        let el = self.element(id)?;
        let values = el.props.values.clone();
        let children = el.children.clone();
        // Children are read first; their props are the ones from the previous frame.
        let snapshot: Vec<(ElementId, Props)> = children
            .into_iter()
            .filter_map(|c| self.get(c).map(|e| (c, e.props.clone())))
            .collect();
        if let ElementState::Transition(tr) = &mut self.element_mut(id)?.state {
            for (child, props) in &snapshot {
                tr.step_child(*child, props, &values);
            }
        }
        Ok(())
    }

    /// Called after `child`'s new props are applied. Flushes queued transition callbacks.
    pub(crate) fn on_child_set_props(
        &mut self,
        parent: ElementId,
        child: ElementId,
    ) -> Pixel8Result<()> {
        if let ElementState::Transition(tr) = &mut self.element_mut(parent)?.state {
            for (event, prop) in tr.flush(child) {
                tracing::trace!(?child, ?event, prop, "transition callback");
            }
        }
        Ok(())
    }

    pub(crate) fn refresh_sprite(&mut self, id: ElementId) -> Pixel8Result<()> {
        let el = self.element_mut(id)?;
        if let ElementState::Sprite(sprite) = &mut el.state {
            sprite.refresh(el.props.src.as_ref())?;
        }
        Ok(())
    }

    pub(crate) fn refresh_textbox(&mut self, id: ElementId) -> Pixel8Result<()> {
        let el = self.element(id)?;
        if el.kind != NodeKind::Textbox {
            return Ok(());
        }
        let text = el
            .children
            .first()
            .and_then(|&c| self.get(c))
            .and_then(|c| c.props.value.clone());
        // Layout follows in-flight transition values, not just the declared props.
        let overridden = match self.effective_props(id) {
            Some(Cow::Owned(props)) => Some(props),
            _ => None,
        };
        let fonts = &self.fonts;
        let Some(slot) = self.slots.get_mut(id.idx as usize) else {
            return Ok(());
        };
        if let Some(Element {
            props,
            state: ElementState::Textbox(tb),
            ..
        }) = slot.element.as_mut()
        {
            let props = overridden.as_ref().unwrap_or(props);
            tb.refresh(props, text.as_deref(), fonts)?;
        }
        Ok(())
    }

    /// Invoke a callback element's `render` prop and advance its private frame counter.
    pub(crate) fn render_callback(&mut self, id: ElementId) -> Pixel8Result<Node> {
        let el = self.element(id)?;
        let render = el.props.handlers.render.clone().ok_or_else(|| {
            Pixel8Error::validation("<callback> requires a render prop")
        })?;
        let frame = match &el.state {
            ElementState::Callback(cb) => cb.frame,
            _ => return Err(Pixel8Error::render("render_callback on a non-callback element")),
        };
        let node = render(&FrameInfo { frame });
        if let ElementState::Callback(cb) = &mut self.element_mut(id)?.state {
            cb.frame = cb.frame.next();
        }
        Ok(node)
    }
}

pub(crate) fn validate_children(node: &Node) -> Pixel8Result<()> {
    if !node.kind.accepts_children() && !node.children.is_empty() {
        return Err(Pixel8Error::validation(format!(
            "<{}> cannot have children",
            node.kind.name()
        )));
    }
    if node.kind == NodeKind::Textbox
        && (node.children.len() > 1
            || node.children.iter().any(|c| c.kind != NodeKind::Text))
    {
        return Err(Pixel8Error::validation(
            "<textbox> accepts a single <text> child",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/element/tree.rs"]
mod tests;
