// SPDX-License-Identifier: GPL-3.0-only

//! In-memory host document.
//!
//! [`MemoryDocument`] keeps a small element tree (`html > head, body`) behind a
//! shared handle, so a test or the demo can play the host page (create fields,
//! move focus, place the caret) while the agent holds its own clone.
//!
//! Behavior mirrors what the agent relies on from a browser:
//!
//! - `<input>`/`<textarea>` carry a value; text-like inputs also carry a
//!   selection, other input types report none
//! - content-editable elements hold their text directly and are edited through
//!   a single document selection
//! - removing an element frees its whole subtree and invalidates its handles
//! - focus moves to nothing when the focused element is removed

use super::{
    splice_chars, DomError, DomResult, ElementId, ElementInfo, ElementSpec, HostDocument, Rect,
    TextRange, Viewport,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Input types whose value can be selected with a caret.
const SELECTABLE_INPUT_TYPES: [&str; 5] = ["text", "search", "url", "tel", "password"];

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: String,
    children: Vec<ElementId>,
    parent: Option<ElementId>,
    content_editable: bool,
    value: String,
    /// `Some` only for fields with selection semantics.
    selection: Option<TextRange>,
    rect: Option<Rect>,
}

impl Node {
    fn from_spec(spec: &ElementSpec) -> Self {
        let tag = spec.tag.to_ascii_uppercase();
        let content_editable = spec
            .attributes
            .get("contenteditable")
            .is_some_and(|v| v.is_empty() || v == "true");
        let selection = match tag.as_str() {
            "TEXTAREA" => Some(TextRange::default()),
            "INPUT" => {
                let input_type = spec.attributes.get("type").map_or("text", String::as_str);
                SELECTABLE_INPUT_TYPES
                    .contains(&input_type)
                    .then(TextRange::default)
            }
            _ => None,
        };

        Self {
            tag,
            id: spec.id.clone(),
            classes: spec.classes.clone(),
            attributes: spec.attributes.clone(),
            style: spec.style.clone(),
            text: spec.text.clone().unwrap_or_default(),
            content_editable,
            selection,
            ..Self::default()
        }
    }

    fn is_field(&self) -> bool {
        self.tag == "INPUT" || self.tag == "TEXTAREA"
    }
}

#[derive(Debug)]
struct Tree {
    nodes: HashMap<ElementId, Node>,
    next_id: u64,
    root: ElementId,
    head: ElementId,
    body: ElementId,
    active: Option<ElementId>,
    selection: Option<(ElementId, TextRange)>,
    viewport: Viewport,
    input_events: Vec<ElementId>,
    read_only: bool,
}

impl Tree {
    fn new() -> Self {
        let mut tree = Self {
            nodes: HashMap::new(),
            next_id: 1,
            root: ElementId::from_raw(0),
            head: ElementId::from_raw(0),
            body: ElementId::from_raw(0),
            active: None,
            selection: None,
            viewport: Viewport::default(),
            input_events: Vec::new(),
            read_only: false,
        };

        tree.root = tree.alloc(Node::from_spec(&ElementSpec::new("html")));
        tree.head = tree.build(&ElementSpec::new("head"), Some(tree.root));
        tree.body = tree.build(&ElementSpec::new("body"), Some(tree.root));
        tree
    }

    fn alloc(&mut self, node: Node) -> ElementId {
        let id = ElementId::from_raw(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    fn build(&mut self, spec: &ElementSpec, parent: Option<ElementId>) -> ElementId {
        let mut node = Node::from_spec(spec);
        node.parent = parent;
        let id = self.alloc(node);

        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.push(id);
        }
        for child in &spec.children {
            self.build(child, Some(id));
        }
        id
    }

    fn writable(&self) -> DomResult<()> {
        if self.read_only {
            return Err(DomError::Rejected("document is read-only".into()));
        }
        Ok(())
    }

    fn node(&self, id: ElementId) -> DomResult<&Node> {
        self.nodes.get(&id).ok_or(DomError::Detached(id))
    }

    fn node_mut(&mut self, id: ElementId) -> DomResult<&mut Node> {
        self.nodes.get_mut(&id).ok_or(DomError::Detached(id))
    }

    fn is_inside(&self, ancestor: ElementId, element: ElementId) -> bool {
        let mut current = Some(element);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }

    fn is_editable(&self, element: ElementId) -> bool {
        let mut current = Some(element);
        while let Some(id) = current {
            match self.nodes.get(&id) {
                Some(node) if node.content_editable => return true,
                Some(node) => current = node.parent,
                None => return false,
            }
        }
        false
    }

    /// Frees `element` and its subtree.
    fn free(&mut self, element: ElementId) {
        if self.active.is_some_and(|a| self.is_inside(element, a)) {
            self.active = None;
        }
        if self.selection.is_some_and(|(e, _)| self.is_inside(element, e)) {
            self.selection = None;
        }

        if let Some(parent) = self.nodes.get(&element).and_then(|n| n.parent) {
            if let Some(parent) = self.nodes.get_mut(&parent) {
                parent.children.retain(|c| *c != element);
            }
        }

        let mut pending = vec![element];
        while let Some(id) = pending.pop() {
            if let Some(node) = self.nodes.remove(&id) {
                pending.extend(node.children);
            }
        }
    }

    fn collect_document_order(&self, from: ElementId, out: &mut Vec<ElementId>) {
        out.push(from);
        if let Some(node) = self.nodes.get(&from) {
            for child in &node.children {
                self.collect_document_order(*child, out);
            }
        }
    }

    fn text_content(&self, element: ElementId, out: &mut String) {
        if let Some(node) = self.nodes.get(&element) {
            out.push_str(&node.text);
            for child in &node.children {
                self.text_content(*child, out);
            }
        }
    }
}

// ============================================================================
// Memory Document
// ============================================================================

/// Shared handle to an in-memory document. Clones address the same tree.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    inner: Arc<Mutex<Tree>>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Creates an empty document with a head and a body.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Tree::new())),
        }
    }

    fn tree(&self) -> MutexGuard<'_, Tree> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ------------------------------------------------------------------------
    // Host page helpers
    // ------------------------------------------------------------------------

    /// Appends an element to the body on behalf of the host page.
    pub fn create_element(&self, spec: ElementSpec) -> ElementId {
        let mut tree = self.tree();
        let body = tree.body;
        tree.build(&spec, Some(body))
    }

    /// Appends an `<input>` of the given type.
    pub fn create_input(&self, input_type: &str) -> ElementId {
        self.create_element(ElementSpec::new("input").with_attr("type", input_type))
    }

    pub fn create_textarea(&self) -> ElementId {
        self.create_element(ElementSpec::new("textarea"))
    }

    /// Appends a content-editable element.
    pub fn create_editable(&self, tag: &str) -> ElementId {
        self.create_element(ElementSpec::new(tag).with_attr("contenteditable", "true"))
    }

    /// Sets a field's value and selection as if the user had typed it.
    pub fn set_field_state(&self, element: ElementId, value: &str, selection: TextRange) {
        if let Some(node) = self.tree().nodes.get_mut(&element) {
            node.value = value.to_owned();
            if node.selection.is_some() {
                node.selection = Some(selection);
            }
        }
    }

    /// Replaces the text of a content-editable element.
    pub fn set_editable_text(&self, element: ElementId, text: &str) {
        if let Some(node) = self.tree().nodes.get_mut(&element) {
            node.text = text.to_owned();
        }
    }

    /// Places the document selection inside `element`.
    pub fn set_document_selection(&self, element: ElementId, range: TextRange) {
        self.tree().selection = Some((element, range));
    }

    /// The document selection, wherever it is.
    #[must_use]
    pub fn document_selection(&self) -> Option<(ElementId, TextRange)> {
        self.tree().selection
    }

    /// Moves focus to the body.
    pub fn blur(&self) {
        self.tree().active = None;
    }

    pub fn set_rect(&self, element: ElementId, rect: Rect) {
        if let Some(node) = self.tree().nodes.get_mut(&element) {
            node.rect = Some(rect);
        }
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.tree().viewport = viewport;
    }

    /// Makes every subsequent mutation fail with [`DomError::Rejected`].
    pub fn set_read_only(&self, read_only: bool) {
        self.tree().read_only = read_only;
    }

    // ------------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------------

    /// Concatenated text of an element and its descendants.
    #[must_use]
    pub fn text_content(&self, element: ElementId) -> String {
        let mut text = String::new();
        self.tree().text_content(element, &mut text);
        text
    }

    #[must_use]
    pub fn classes(&self, element: ElementId) -> Vec<String> {
        self.tree()
            .nodes
            .get(&element)
            .map(|n| n.classes.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.classes(element).iter().any(|c| c == class)
    }

    #[must_use]
    pub fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.tree()
            .nodes
            .get(&element)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Attached elements carrying `class`, in document order.
    #[must_use]
    pub fn elements_with_class(&self, class: &str) -> Vec<ElementId> {
        let tree = self.tree();
        let mut order = Vec::new();
        tree.collect_document_order(tree.root, &mut order);
        order
            .into_iter()
            .filter(|id| {
                tree.nodes
                    .get(id)
                    .is_some_and(|n| n.classes.iter().any(|c| c == class))
            })
            .collect()
    }

    /// Number of elements under the body with the given `id` attribute.
    #[must_use]
    pub fn count_by_id(&self, id: &str) -> usize {
        let tree = self.tree();
        let mut order = Vec::new();
        tree.collect_document_order(tree.body, &mut order);
        order
            .into_iter()
            .filter(|e| tree.nodes.get(e).is_some_and(|n| n.id.as_deref() == Some(id)))
            .count()
    }

    /// Number of `input` events dispatched at `element`.
    #[must_use]
    pub fn input_event_count(&self, element: ElementId) -> usize {
        self.tree().input_events.iter().filter(|e| **e == element).count()
    }

    #[must_use]
    pub fn body(&self) -> ElementId {
        self.tree().body
    }

    #[must_use]
    pub fn head(&self) -> ElementId {
        self.tree().head
    }
}

// ============================================================================
// HostDocument Implementation
// ============================================================================

impl HostDocument for MemoryDocument {
    fn active_element(&self) -> Option<ElementId> {
        let tree = self.tree();
        tree.active.filter(|a| tree.nodes.contains_key(a))
    }

    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        let tree = self.tree();
        let mut order = Vec::new();
        tree.collect_document_order(tree.root, &mut order);
        order
            .into_iter()
            .find(|e| tree.nodes.get(e).is_some_and(|n| n.id.as_deref() == Some(id)))
    }

    fn describe(&self, element: ElementId) -> Option<ElementInfo> {
        let tree = self.tree();
        let node = tree.nodes.get(&element)?;
        Some(ElementInfo {
            tag: node.tag.clone(),
            input_type: node.attributes.get("type").cloned(),
            content_editable: tree.is_editable(element),
        })
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.tree().nodes.get(&element).and_then(|n| n.parent)
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        let tree = self.tree();
        let node = tree.nodes.get(&element)?;
        match name {
            "id" => node.id.clone(),
            "class" => Some(node.classes.join(" ")),
            _ => node.attributes.get(name).cloned(),
        }
    }

    fn style(&self, element: ElementId, property: &str) -> Option<String> {
        self.tree()
            .nodes
            .get(&element)?
            .style
            .get(property)
            .filter(|v| !v.is_empty())
            .cloned()
    }

    fn bounding_rect(&self, element: ElementId) -> Option<Rect> {
        self.tree()
            .nodes
            .get(&element)
            .map(|n| n.rect.unwrap_or_default())
    }

    fn viewport(&self) -> Viewport {
        self.tree().viewport
    }

    fn append_to_head(&mut self, spec: ElementSpec) -> DomResult<ElementId> {
        let head = self.tree().head;
        self.append_child(head, spec)
    }

    fn append_to_body(&mut self, spec: ElementSpec) -> DomResult<ElementId> {
        let body = self.tree().body;
        self.append_child(body, spec)
    }

    fn append_child(&mut self, parent: ElementId, spec: ElementSpec) -> DomResult<ElementId> {
        let mut tree = self.tree();
        tree.writable()?;
        tree.node(parent)?;
        Ok(tree.build(&spec, Some(parent)))
    }

    fn remove(&mut self, element: ElementId) -> bool {
        let mut tree = self.tree();
        let structural = [tree.root, tree.head, tree.body];
        if tree.read_only || structural.contains(&element) || !tree.nodes.contains_key(&element) {
            return false;
        }
        tree.free(element);
        true
    }

    fn set_style(&mut self, element: ElementId, property: &str, value: &str) -> DomResult<()> {
        let mut tree = self.tree();
        tree.writable()?;
        let node = tree.node_mut(element)?;
        if value.is_empty() {
            node.style.remove(property);
        } else {
            node.style.insert(property.to_owned(), value.to_owned());
        }
        Ok(())
    }

    fn value(&self, element: ElementId) -> Option<String> {
        self.tree()
            .nodes
            .get(&element)
            .filter(|n| n.is_field())
            .map(|n| n.value.clone())
    }

    fn set_value(&mut self, element: ElementId, value: String) -> DomResult<()> {
        let mut tree = self.tree();
        tree.writable()?;
        let node = tree.node_mut(element)?;
        let end = value.chars().count();
        node.value = value;
        // Assigning a value moves the caret to the end, as browsers do.
        if node.selection.is_some() {
            node.selection = Some(TextRange::caret(end));
        }
        Ok(())
    }

    fn selection_range(&self, element: ElementId) -> Option<TextRange> {
        self.tree().nodes.get(&element)?.selection
    }

    fn set_selection_range(&mut self, element: ElementId, range: TextRange) -> DomResult<()> {
        let mut tree = self.tree();
        tree.writable()?;
        let node = tree.node_mut(element)?;
        if node.selection.is_some() {
            let len = node.value.chars().count();
            node.selection = Some(TextRange::new(range.start.min(len), range.end.min(len)));
        }
        Ok(())
    }

    fn editable_selection(&self, element: ElementId) -> Option<TextRange> {
        let tree = self.tree();
        tree.selection
            .filter(|(anchor, _)| *anchor == element && tree.nodes.contains_key(anchor))
            .map(|(_, range)| range)
    }

    fn replace_editable_range(
        &mut self,
        element: ElementId,
        range: TextRange,
        text: &str,
    ) -> DomResult<()> {
        let mut tree = self.tree();
        tree.writable()?;
        let node = tree.node_mut(element)?;
        node.text = splice_chars(&node.text, range, text);
        let caret = range.start.min(range.end) + text.chars().count();
        tree.selection = Some((element, TextRange::caret(caret)));
        Ok(())
    }

    fn append_text(&mut self, element: ElementId, text: &str) -> DomResult<()> {
        let mut tree = self.tree();
        tree.writable()?;
        tree.node_mut(element)?.text.push_str(text);
        Ok(())
    }

    fn dispatch_input(&mut self, element: ElementId) -> DomResult<()> {
        let mut tree = self.tree();
        tree.node(element)?;
        tree.input_events.push(element);
        Ok(())
    }

    fn focus(&mut self, element: ElementId) -> DomResult<()> {
        let mut tree = self.tree();
        tree.node(element)?;
        tree.active = Some(element);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
