//! Hierarchical X12 writer
//!
//! Walks a record tree in protocol order and renders every segment through
//! the [`FieldCodec`]. Trailer counts are computed while writing; missing
//! control numbers are defaulted (interchange 1, group/set 1-based
//! position) and the defaulted value is used in both header and trailer.

use crate::field::FieldCodec;
use crate::{Error, Result};
use edi_ir::fields::fields_from;
use edi_ir::{
    CONTROL_NUMBER, DetailLoop, Fields, FunctionalGroup, Interchange, TOTAL, TransactionSet,
    Visitor, walk,
};
use edi_schema::envelope::{GE, GS, IEA, ISA, SE, ST};
use edi_schema::{DocumentLayout, SectionKind, SegmentDefinition, SpecCatalog};
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Renders an [`Interchange`] to X12 text
#[derive(Debug, Clone, Copy)]
pub struct HierarchyWriter<'c> {
    catalog: &'c SpecCatalog,
    codec: FieldCodec,
    debug: bool,
}

impl<'c> HierarchyWriter<'c> {
    pub fn new(catalog: &'c SpecCatalog, codec: FieldCodec) -> Self {
        Self {
            catalog,
            codec,
            debug: false,
        }
    }

    /// Emit a `debug!` event per segment
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Render a complete interchange
    ///
    /// Fails when a transaction set names an identifier the catalog has no
    /// document spec for.
    pub fn write(&self, interchange: &Interchange) -> Result<String> {
        let mut ctx = WriteContext {
            writer: self,
            out: String::new(),
            error: None,
            interchange_control: String::new(),
            group_control: String::new(),
            set_control: String::new(),
            layout: None,
            set_segments: 0,
        };

        walk(interchange, &mut ctx);

        match ctx.error {
            Some(error) => Err(error),
            None => Ok(ctx.out),
        }
    }
}

/// Output buffer and cursors for one write call
struct WriteContext<'w> {
    writer: &'w HierarchyWriter<'w>,
    out: String,
    error: Option<Error>,
    interchange_control: String,
    group_control: String,
    set_control: String,
    layout: Option<&'w DocumentLayout>,
    set_segments: usize,
}

impl WriteContext<'_> {
    fn emit(&mut self, tag: &str, fields: &Fields) {
        match self.writer.catalog.segment(tag) {
            Some(definition) => self.render(tag, fields, definition),
            None => warn!(tag, "No definition for envelope segment; skipped"),
        }
    }

    fn render(&mut self, tag: &str, fields: &Fields, definition: &SegmentDefinition) {
        let segment = self.writer.codec.encode(tag, fields, definition);
        if self.writer.debug {
            debug!(segment = segment.trim_end(), "Emitted segment");
        }
        self.out.push_str(&segment);
    }

    /// Emit the payload segments of one section, in structure order
    fn emit_section(&mut self, kind: SectionKind, segments: &BTreeMap<String, Fields>) {
        let Some(layout) = self.layout else {
            return;
        };
        for tag in layout.tags(kind) {
            let Some(fields) = segments.get(tag) else {
                continue;
            };
            match self.writer.catalog.payload_segment(layout, tag) {
                Some(definition) => {
                    self.render(tag, fields, definition);
                    self.set_segments += 1;
                }
                None => warn!(tag, "No segment definition for structure tag; skipped"),
            }
        }
    }

    fn trailer(total: usize, control_number: &str) -> Fields {
        fields_from([(TOTAL, total.to_string()), (CONTROL_NUMBER, control_number.to_string())])
    }
}

/// Header fields with the control number replaced by the assigned one
fn with_control_number<'f>(fields: &'f Fields, control_number: &str) -> Cow<'f, Fields> {
    if fields.get(CONTROL_NUMBER).map(String::as_str) == Some(control_number) {
        return Cow::Borrowed(fields);
    }
    let mut fields = fields.clone();
    fields.insert(CONTROL_NUMBER.to_string(), control_number.to_string());
    Cow::Owned(fields)
}

impl Visitor for WriteContext<'_> {
    fn enter_interchange(&mut self, interchange: &Interchange) {
        self.interchange_control = interchange.control_number().unwrap_or("1").to_string();
        let isa = with_control_number(&interchange.isa, &self.interchange_control);
        self.emit(ISA, &isa);
    }

    fn enter_group(&mut self, index: usize, group: &FunctionalGroup) {
        self.group_control = group
            .control_number()
            .map_or_else(|| (index + 1).to_string(), str::to_string);
        let gs = with_control_number(&group.gs, &self.group_control);
        self.emit(GS, &gs);
    }

    fn enter_set(&mut self, index: usize, set: &TransactionSet) {
        let identifier = set.identifier_code();
        let Some(layout) = self.writer.catalog.document(identifier) else {
            self.error = Some(Error::Configuration(format!(
                "no document spec for transaction set identifier '{identifier}'"
            )));
            return;
        };

        self.layout = Some(layout);
        self.set_segments = 0;
        self.set_control = set
            .control_number()
            .map_or_else(|| (index + 1).to_string(), str::to_string);

        let st = with_control_number(&set.st, &self.set_control);
        self.emit(ST, &st);
        self.emit_section(SectionKind::Header, &set.header);
    }

    fn visit_loop(&mut self, _index: usize, detail: &DetailLoop) {
        self.emit_section(SectionKind::Detail, &detail.segments);
    }

    fn leave_set(&mut self, _index: usize, set: &TransactionSet) {
        self.emit_section(SectionKind::Footer, &set.footer);
        let se = Self::trailer(self.set_segments + 2, &self.set_control);
        self.emit(SE, &se);
        self.layout = None;
    }

    fn leave_group(&mut self, _index: usize, group: &FunctionalGroup) {
        let ge = Self::trailer(group.sets.len(), &self.group_control);
        self.emit(GE, &ge);
    }

    fn leave_interchange(&mut self, interchange: &Interchange) {
        let iea = Self::trailer(interchange.groups.len(), &self.interchange_control);
        self.emit(IEA, &iea);
    }

    fn should_continue(&self) -> bool {
        self.error.is_none()
    }
}
