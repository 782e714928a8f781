// SPDX-License-Identifier: GPL-3.0-only

//! Applying key presses to the focus target.
//!
//! Two kinds of targets are edited differently:
//!
//! - **Plain fields** (`<input>`, `<textarea>`) are edited through their string
//!   value. Fields with caret selection are spliced at the selection; fields
//!   without it (for example `type="email"`) only ever get text appended.
//! - **Editable regions** are edited through the document selection, which is
//!   only honored while it lies inside the target.
//!
//! Every successful edit dispatches a bubbling `input` event at the target and
//! returns focus to it.

use crate::dom::{classify, splice_chars, DomResult, ElementId, FieldKind, HostDocument, TextRange};
use crate::layout::KeyRole;

/// What a key press does to the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keystroke {
    /// Delete backwards.
    Backspace,
    /// Insert text at the caret.
    Insert(String),
}

impl Keystroke {
    /// Interprets a key label. Empty labels do nothing.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        if label.is_empty() {
            return None;
        }
        Some(match KeyRole::of(label) {
            KeyRole::Backspace => Keystroke::Backspace,
            KeyRole::Space => Keystroke::Insert(" ".to_owned()),
            KeyRole::Character => Keystroke::Insert(label.to_owned()),
        })
    }
}

/// Result of applying a keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The target was edited and notified.
    Applied,
    /// The keystroke had nothing to act on (for example, backspace without a
    /// caret).
    Ignored,
    /// There was no live focus target; the keystroke was dropped.
    NoTarget,
}

/// Applies the key `label` to `target`.
///
/// Document failures while editing are returned; a missing or freed target is
/// reported as [`EditOutcome::NoTarget`] and logged.
pub fn apply_keystroke<D: HostDocument>(
    document: &mut D,
    target: Option<ElementId>,
    label: &str,
) -> DomResult<EditOutcome> {
    let Some(keystroke) = Keystroke::from_label(label) else {
        return Ok(EditOutcome::Ignored);
    };

    let live = target.and_then(|t| document.describe(t).map(|info| (t, classify(&info))));
    let Some((target, kind)) = live else {
        tracing::warn!("No focused field to type into; focus a field, then press keys");
        return Ok(EditOutcome::NoTarget);
    };

    let edited = match (&keystroke, kind) {
        (Keystroke::Backspace, FieldKind::EditableRegion) => delete_in_region(document, target)?,
        (Keystroke::Backspace, FieldKind::PlainField) => delete_in_field(document, target)?,
        (Keystroke::Insert(text), FieldKind::EditableRegion) => {
            insert_in_region(document, target, text)?
        }
        (Keystroke::Insert(text), FieldKind::PlainField) => insert_in_field(document, target, text)?,
        (_, FieldKind::Unsupported) => false,
    };

    if !edited {
        tracing::debug!("{:?} had no effect on element {}", keystroke, target.raw());
        return Ok(EditOutcome::Ignored);
    }

    document.dispatch_input(target)?;
    document.focus(target)?;
    Ok(EditOutcome::Applied)
}

// ============================================================================
// Deletion
// ============================================================================

fn delete_in_region<D: HostDocument>(document: &mut D, target: ElementId) -> DomResult<bool> {
    let Some(selection) = document.editable_selection(target) else {
        return Ok(false);
    };

    let start = selection.start.min(selection.end).saturating_sub(1);
    let end = selection.start.max(selection.end);
    document.replace_editable_range(target, TextRange::new(start, end), "")?;
    Ok(true)
}

fn delete_in_field<D: HostDocument>(document: &mut D, target: ElementId) -> DomResult<bool> {
    let Some(selection) = document.selection_range(target) else {
        return Ok(false);
    };
    let value = document.value(target).unwrap_or_default();

    let start = selection.start.min(selection.end);
    let end = selection.start.max(selection.end);
    let removed = if selection.is_collapsed() && start > 0 {
        TextRange::new(start - 1, end)
    } else {
        TextRange::new(start, end)
    };

    document.set_value(target, splice_chars(&value, removed, ""))?;
    document.set_selection_range(target, TextRange::caret(removed.start))?;
    Ok(true)
}

// ============================================================================
// Insertion
// ============================================================================

fn insert_in_region<D: HostDocument>(
    document: &mut D,
    target: ElementId,
    text: &str,
) -> DomResult<bool> {
    match document.editable_selection(target) {
        Some(selection) => document.replace_editable_range(target, selection, text)?,
        None => document.append_text(target, text)?,
    }
    Ok(true)
}

fn insert_in_field<D: HostDocument>(
    document: &mut D,
    target: ElementId,
    text: &str,
) -> DomResult<bool> {
    let value = document.value(target).unwrap_or_default();

    match document.selection_range(target) {
        Some(selection) => {
            let start = selection.start.min(selection.end).min(value.chars().count());
            let caret = start + text.chars().count();
            document.set_value(target, splice_chars(&value, selection, text))?;
            document.set_selection_range(target, TextRange::caret(caret))?;
        }
        None => document.set_value(target, value + text)?,
    }
    Ok(true)
}
