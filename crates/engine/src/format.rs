use quilt_delta::{
    Attribute, AttributeScope, Delta, DeltaError, EMBED_CHAR, Style, ValidationError,
};

use crate::document::Document;
use crate::selection::Selection;

#[derive(Debug, Clone, PartialEq)]
pub enum EditError {
    Validation(ValidationError),
    Delta(DeltaError),
}

impl EditError {
    pub fn message(&self) -> String {
        match self {
            EditError::Validation(err) => err.message().to_string(),
            EditError::Delta(err) => err.message(),
        }
    }
}

impl From<ValidationError> for EditError {
    fn from(value: ValidationError) -> Self {
        EditError::Validation(value)
    }
}

impl From<DeltaError> for EditError {
    fn from(value: DeltaError) -> Self {
        EditError::Delta(value)
    }
}

/// Effective style at a selection. A collapsed selection reports the
/// character immediately before the cursor plus the block style of its
/// line; a range reports only what is uniformly set across every covered
/// run, so a key with mixed values drops out entirely.
pub fn style_at(document: &Document, selection: Selection) -> Style {
    let len = document.len();
    let start = selection.start().min(len);
    let end = selection.end().min(len);
    if start == end {
        let block = line_style(document, start);
        if start == 0 {
            return block;
        }
        let inline = style_of_char(document, start - 1).scoped(AttributeScope::Inline);
        return inline.merge(&block);
    }
    let inline = inline_intersection(document, start, end);
    let block = block_intersection(document, start, end);
    inline.merge(&block)
}

/// The minimal delta toggling an attribute over the selection: unset when
/// the attribute key is uniformly present, set otherwise. Toggling "on"
/// from a mixed state always sets across the whole span.
pub fn toggle_attribute(
    document: &Document,
    selection: Selection,
    attribute: &Attribute,
) -> Result<Delta, EditError> {
    let current = style_at(document, selection);
    let applied = if current.contains_same(attribute) {
        attribute.unset()
    } else {
        attribute.clone()
    };
    format_delta(document, selection, &applied)
}

/// The delta applying an attribute over the selection unconditionally.
/// Values are validated before anything is built; unset forms never are.
/// Block attributes land on the trailing newline of every touched line.
pub fn format_delta(
    document: &Document,
    selection: Selection,
    attribute: &Attribute,
) -> Result<Delta, EditError> {
    attribute.validate()?;
    let len = document.len();
    if selection.end() > len {
        return Err(EditError::Delta(DeltaError::OutOfBounds {
            len,
            needed: selection.end(),
        }));
    }
    match attribute.scope() {
        AttributeScope::Inline => {
            if selection.is_collapsed() {
                return Ok(Delta::new());
            }
            Ok(Delta::new()
                .retain(selection.start())
                .retain_with(selection.len(), Style::single(attribute)))
        }
        AttributeScope::Block => {
            let mut delta = Delta::new();
            let mut pos = 0usize;
            for newline in document.line_boundaries(selection.start(), selection.end()) {
                delta = delta
                    .retain(newline - pos)
                    .retain_with(1, Style::single(attribute));
                pos = newline + 1;
            }
            Ok(delta)
        }
        AttributeScope::Embed => Err(EditError::Validation(ValidationError::new(
            "Embed attributes are attached when the embed is inserted",
        ))),
    }
}

fn style_of_char(document: &Document, index: usize) -> Style {
    let mut pos = 0usize;
    for (text, style) in document.runs() {
        let run_len = text.chars().count();
        if index < pos + run_len {
            return style.clone();
        }
        pos += run_len;
    }
    Style::default()
}

/// Block style of the line containing `offset`, read off the line's
/// trailing newline. A line with no trailing newline has none.
fn line_style(document: &Document, offset: usize) -> Style {
    let text = document.text();
    match text
        .chars()
        .enumerate()
        .skip(offset)
        .find(|(_, ch)| *ch == '\n')
    {
        Some((pos, _)) => style_of_char(document, pos).scoped(AttributeScope::Block),
        None => Style::default(),
    }
}

fn inline_intersection(document: &Document, start: usize, end: usize) -> Style {
    let mut result: Option<Style> = None;
    let mut pos = 0usize;
    for (text, style) in document.runs() {
        let run_len = text.chars().count();
        let run_start = pos;
        pos += run_len;
        if pos <= start {
            continue;
        }
        if run_start >= end {
            break;
        }
        let from = start.saturating_sub(run_start);
        let to = (end - run_start).min(run_len);
        // Newlines and embeds carry no inline formatting of their own and
        // must not break the uniformity check.
        let formattable = text
            .chars()
            .skip(from)
            .take(to - from)
            .any(|ch| ch != '\n' && ch != EMBED_CHAR);
        if !formattable {
            continue;
        }
        let inline = style.scoped(AttributeScope::Inline);
        result = Some(match result {
            None => inline,
            Some(prev) => Style::intersect(&prev, &inline),
        });
    }
    result.unwrap_or_default()
}

fn block_intersection(document: &Document, start: usize, end: usize) -> Style {
    let mut styles: Vec<Style> = document
        .line_boundaries(start, end)
        .into_iter()
        .map(|newline| style_of_char(document, newline).scoped(AttributeScope::Block))
        .collect();
    if touches_unterminated_tail(document, start, end) {
        styles.push(Style::default());
    }
    let mut styles = styles.into_iter();
    let Some(first) = styles.next() else {
        return Style::default();
    };
    styles.fold(first, |acc, style| Style::intersect(&acc, &style))
}

fn touches_unterminated_tail(document: &Document, start: usize, end: usize) -> bool {
    let text = document.text();
    if text.is_empty() || text.ends_with('\n') {
        return false;
    }
    let tail_start = text
        .chars()
        .enumerate()
        .filter(|(_, ch)| *ch == '\n')
        .map(|(pos, _)| pos + 1)
        .last()
        .unwrap_or(0);
    if start == end {
        start >= tail_start
    } else {
        end > tail_start
    }
}
