// SPDX-License-Identifier: GPL-3.0-only

//! Host document abstraction.
//!
//! The page agent never owns the page it runs in. Everything it needs from the
//! host (focus, element lookup, styles, field values, selections and input
//! notifications) goes through the [`HostDocument`] trait, addressed by opaque
//! [`ElementId`] handles.
//!
//! Handles are weak: once the host frees an element, every query on its handle
//! returns `None` and every mutation returns [`DomError::Detached`].
//!
//! # Implementations
//!
//! - [`MemoryDocument`]: an in-process document tree used by tests and the
//!   demo binary.

pub mod memory;
pub mod node;

pub use memory::MemoryDocument;
pub use node::ElementSpec;

use std::fmt;

// ============================================================================
// Handles and Geometry
// ============================================================================

/// Opaque handle to a host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    /// Wraps a raw host identifier.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

/// Viewport-relative bounding box of an element, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Size and scroll offset of the host window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }
}

/// A caret or selected range inside a field, in character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A collapsed range (a caret) at `offset`.
    #[must_use]
    pub const fn caret(offset: usize) -> Self {
        Self { start: offset, end: offset }
    }

    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// Replaces the characters in `range` with `insert`.
///
/// Offsets count Unicode scalar values and are clamped to the text length;
/// a reversed range is normalized.
#[must_use]
pub fn splice_chars(text: &str, range: TextRange, insert: &str) -> String {
    let len = text.chars().count();
    let start = range.start.min(range.end).min(len);
    let end = range.start.max(range.end).min(len);

    let mut spliced = String::with_capacity(text.len() + insert.len());
    spliced.extend(text.chars().take(start));
    spliced.push_str(insert);
    spliced.extend(text.chars().skip(end));
    spliced
}

// ============================================================================
// Element Classification
// ============================================================================

/// Shape of a host element as reported by the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementInfo {
    /// Tag name, in any case.
    pub tag: String,
    /// The `type` attribute of `<input>` elements.
    pub input_type: Option<String>,
    /// Whether the element is inside a content-editable region.
    pub content_editable: bool,
}

/// How the keyboard can edit an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `<input>` or `<textarea>` with a string value.
    PlainField,
    /// A content-editable region edited through the document selection.
    EditableRegion,
    /// Not a text-accepting element.
    Unsupported,
}

impl FieldKind {
    #[must_use]
    pub fn accepts_text(&self) -> bool {
        !matches!(self, FieldKind::Unsupported)
    }
}

/// `<input>` types that never hold typed text.
const NON_TEXT_INPUT_TYPES: [&str; 10] = [
    "checkbox", "radio", "button", "submit", "reset", "file", "image", "color", "range", "hidden",
];

/// Classifies an element by the way the keyboard can edit it.
#[must_use]
pub fn classify(info: &ElementInfo) -> FieldKind {
    if info.content_editable {
        return FieldKind::EditableRegion;
    }

    if info.tag.eq_ignore_ascii_case("textarea") {
        return FieldKind::PlainField;
    }

    if info.tag.eq_ignore_ascii_case("input") {
        let input_type = info.input_type.as_deref().unwrap_or("text").to_ascii_lowercase();
        if NON_TEXT_INPUT_TYPES.contains(&input_type.as_str()) {
            return FieldKind::Unsupported;
        }
        return FieldKind::PlainField;
    }

    FieldKind::Unsupported
}

// ============================================================================
// Errors
// ============================================================================

/// Result type for document mutations.
pub type DomResult<T> = Result<T, DomError>;

/// Errors reported by a host document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The element was freed or removed from the document.
    Detached(ElementId),
    /// The host refused the mutation.
    Rejected(String),
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomError::Detached(id) => write!(f, "element {} is no longer attached", id.raw()),
            DomError::Rejected(msg) => write!(f, "document rejected mutation: {}", msg),
        }
    }
}

impl std::error::Error for DomError {}

// ============================================================================
// Host Document
// ============================================================================

/// Capabilities the page agent needs from the host page.
pub trait HostDocument {
    /// The element that currently has input focus, if any.
    fn active_element(&self) -> Option<ElementId>;

    /// Finds an attached element by its `id` attribute.
    fn element_by_id(&self, id: &str) -> Option<ElementId>;

    /// Describes an element, or `None` if it no longer exists.
    fn describe(&self, element: ElementId) -> Option<ElementInfo>;

    /// Parent of an element, if it has one.
    fn parent(&self, element: ElementId) -> Option<ElementId>;

    /// Whether `element` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: ElementId, element: ElementId) -> bool {
        let mut current = Some(element);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    /// Inline style property value. Empty values are reported as `None`.
    fn style(&self, element: ElementId, property: &str) -> Option<String>;

    fn bounding_rect(&self, element: ElementId) -> Option<Rect>;

    fn viewport(&self) -> Viewport;

    // ------------------------------------------------------------------------
    // Tree mutation
    // ------------------------------------------------------------------------

    /// Builds `spec` and appends it to the document head.
    fn append_to_head(&mut self, spec: ElementSpec) -> DomResult<ElementId>;

    /// Builds `spec` and appends it to the document body.
    fn append_to_body(&mut self, spec: ElementSpec) -> DomResult<ElementId>;

    /// Builds `spec` and appends it as the last child of `parent`.
    fn append_child(&mut self, parent: ElementId, spec: ElementSpec) -> DomResult<ElementId>;

    /// Removes and frees an element. Returns `false` if it was already gone.
    fn remove(&mut self, element: ElementId) -> bool;

    /// Sets an inline style property. An empty value removes the property.
    fn set_style(&mut self, element: ElementId, property: &str, value: &str) -> DomResult<()>;

    // ------------------------------------------------------------------------
    // Plain fields
    // ------------------------------------------------------------------------

    /// Current value of an `<input>` or `<textarea>`.
    fn value(&self, element: ElementId) -> Option<String>;

    fn set_value(&mut self, element: ElementId, value: String) -> DomResult<()>;

    /// Selection of a field that supports caret selection.
    ///
    /// Returns `None` for fields without selection semantics (for example
    /// `<input type="email">`).
    fn selection_range(&self, element: ElementId) -> Option<TextRange>;

    fn set_selection_range(&mut self, element: ElementId, range: TextRange) -> DomResult<()>;

    // ------------------------------------------------------------------------
    // Editable regions
    // ------------------------------------------------------------------------

    /// The document selection, if it lies inside the editable `element`.
    fn editable_selection(&self, element: ElementId) -> Option<TextRange>;

    /// Deletes `range` inside `element`, inserts `text` as a new text node at
    /// its start and collapses the document selection after the inserted text.
    fn replace_editable_range(
        &mut self,
        element: ElementId,
        range: TextRange,
        text: &str,
    ) -> DomResult<()>;

    /// Appends `text` as a trailing text node of `element`.
    fn append_text(&mut self, element: ElementId, text: &str) -> DomResult<()>;

    // ------------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------------

    /// Dispatches a bubbling `input` event at `element`.
    fn dispatch_input(&mut self, element: ElementId) -> DomResult<()>;

    /// Moves input focus to `element`.
    fn focus(&mut self, element: ElementId) -> DomResult<()>;
}

// ============================================================================
// Tests
// ============================================================================
