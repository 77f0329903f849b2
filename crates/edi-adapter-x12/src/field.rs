//! Field-level decode/encode rules for one segment
//!
//! Decoding is forgiving: short segments yield empty strings, surplus
//! elements are ignored, and nothing here can fail. Encoding reads the
//! [`FieldDefinition`]s without modifying them; the effective width of each
//! field is computed per call.

use crate::syntax::Separators;
use edi_ir::Fields;
use edi_schema::{FieldDefinition, SegmentDefinition, WidthRule};
use std::borrow::Cow;

/// Decodes and renders segments against their definitions
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldCodec {
    separators: Separators,
    new_lines: bool,
    truncate_null: bool,
}

impl FieldCodec {
    pub fn new(separators: Separators) -> Self {
        Self {
            separators,
            new_lines: false,
            truncate_null: false,
        }
    }

    /// Append a line break after each rendered segment
    pub fn new_lines(mut self, new_lines: bool) -> Self {
        self.new_lines = new_lines;
        self
    }

    /// Drop trailing empty elements when rendering
    pub fn truncate_null(mut self, truncate_null: bool) -> Self {
        self.truncate_null = truncate_null;
        self
    }

    pub fn separators(&self) -> Separators {
        self.separators
    }

    /// Decode a segment's data elements (tag excluded)
    pub fn decode(&self, values: &[String], definition: &SegmentDefinition) -> Fields {
        let mut fields = Fields::new();
        for (i, field) in definition.definition.iter().enumerate() {
            let Some(name) = &field.name else {
                continue;
            };
            let value = values.get(i).map_or("", |v| v.trim_end());
            fields.insert(name.clone(), value.to_string());
        }
        fields
    }

    /// Render one segment, terminator (and optional line break) included
    pub fn encode(&self, tag: &str, fields: &Fields, definition: &SegmentDefinition) -> String {
        let mut elements: Vec<String> = definition
            .definition
            .iter()
            .map(|field| render_field(field, fields))
            .collect();

        if self.truncate_null {
            while elements.last().is_some_and(String::is_empty) {
                elements.pop();
            }
        }

        self.separators.render(tag, &elements, self.new_lines)
    }
}

/// Render a single element
///
/// Value resolution: the record's field, else the static value, else "".
/// `max` truncates first; a format pattern then takes over completely,
/// otherwise the width rule pads the value on the right.
pub fn render_field(field: &FieldDefinition, fields: &Fields) -> String {
    let value = field
        .name
        .as_ref()
        .and_then(|name| fields.get(name))
        .or(field.value.as_ref())
        .map_or("", String::as_str);

    let value: Cow<'_, str> = match field.max {
        Some(max) if value.chars().count() > max => Cow::Owned(value.chars().take(max).collect()),
        _ => Cow::Borrowed(value),
    };

    if let Some(format) = &field.format {
        return format.render(&value);
    }

    match field.width_rule(value.chars().count()) {
        WidthRule::Bytes(width) | WidthRule::Min(width) => format!("{value:<width$}"),
        WidthRule::Unpadded => value.into_owned(),
    }
}
