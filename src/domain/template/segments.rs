//! Shared scanner for `{{ ... }}` delimited templates

use crate::domain::error::{FunctionError, TemplatePosition};

/// A piece of a scanned template
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawSegment<'a> {
    Text(&'a str),
    /// Inner text of a tag (not trimmed) and the byte offset of its opening delimiter
    Tag { inner: &'a str, offset: usize },
}

/// Split `template` into literal text and `{{ ... }}` tags
pub(crate) fn scan_tags<'a>(
    template: &'a str,
    format: &str,
) -> Result<Vec<RawSegment<'a>>, FunctionError> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    while let Some(found) = template[cursor..].find("{{") {
        let open = cursor + found;
        if open > cursor {
            segments.push(RawSegment::Text(&template[cursor..open]));
        }

        let body_start = open + 2;

        let close_at = template[body_start..].find("}}").ok_or_else(|| {
            FunctionError::template_compile(
                format,
                "unclosed '{{'",
                Some(TemplatePosition::from_offset(template, open)),
            )
        })?;

        segments.push(RawSegment::Tag {
            inner: &template[body_start..body_start + close_at],
            offset: open,
        });
        cursor = body_start + close_at + 2;
    }

    if cursor < template.len() {
        segments.push(RawSegment::Text(&template[cursor..]));
    }

    Ok(segments)
}
