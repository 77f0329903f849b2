//! Hierarchical X12 parser
//!
//! Drives the envelope state machine over a token stream and builds the
//! record tree. All cursors (open group, set, detail loop) live in a
//! per-call [`ParseContext`], so one parser can serve concurrent calls.

use crate::field::FieldCodec;
use crate::syntax::Segment;
use edi_ir::{DetailLoop, Fields, FunctionalGroup, Interchange, TransactionSet};
use edi_schema::envelope::{GE, GS, IEA, ISA, SE, ST};
use edi_schema::{SectionKind, SpecCatalog};
use tracing::{debug, trace, warn};

/// Position in the envelope hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Outside,
    InInterchange,
    InGroup,
    InSet,
}

type Handler = fn(&mut ParseContext<'_>, &Segment);

/// Envelope tag → transition
const TRANSITIONS: [(&str, Handler); 6] = [
    (ISA, |ctx, segment| ctx.on_isa(segment)),
    (IEA, |ctx, segment| ctx.on_iea(segment)),
    (GS, |ctx, segment| ctx.on_gs(segment)),
    (GE, |ctx, segment| ctx.on_ge(segment)),
    (ST, |ctx, segment| ctx.on_st(segment)),
    (SE, |ctx, segment| ctx.on_se(segment)),
];

/// Builds an [`Interchange`] from tokenized segments
#[derive(Debug, Clone, Copy)]
pub struct HierarchyParser<'c> {
    catalog: &'c SpecCatalog,
    codec: FieldCodec,
    debug: bool,
}

/// Cursor state for one parse call
pub struct ParseContext<'p> {
    parser: &'p HierarchyParser<'p>,
    state: State,
    interchange: Interchange,
    group: Option<FunctionalGroup>,
    set: Option<TransactionSet>,
    detail: Option<DetailLoop>,
}

impl<'c> HierarchyParser<'c> {
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

    /// Parse a token stream into a record tree; never fails
    pub fn parse(&self, segments: &[Segment]) -> Interchange {
        let mut ctx = ParseContext::new(self);
        for segment in segments {
            ctx.feed(segment);
        }
        ctx.finish()
    }
}

impl<'p> ParseContext<'p> {
    fn new(parser: &'p HierarchyParser<'p>) -> Self {
        Self {
            parser,
            state: State::Outside,
            interchange: Interchange::default(),
            group: None,
            set: None,
            detail: None,
        }
    }

    /// Current state of the envelope machine
    pub fn state(&self) -> State {
        self.state
    }

    fn feed(&mut self, segment: &Segment) {
        let tag = segment.tag();
        if self.parser.debug {
            debug!(position = segment.position, tag, state = ?self.state, "Segment");
        }

        match TRANSITIONS.iter().find(|(envelope, _)| *envelope == tag) {
            Some((_, handler)) => handler(self, segment),
            None => self.on_payload(segment),
        }
    }

    fn finish(mut self) -> Interchange {
        if self.set.take().is_some() {
            warn!("Input ended inside a transaction set; discarding unterminated set");
        }
        if self.group.take().is_some() {
            warn!("Input ended inside a functional group; discarding unterminated group");
        }
        debug!(groups = self.interchange.groups.len(), "Parsed interchange");
        self.interchange
    }

    fn envelope_fields(&self, tag: &str, segment: &Segment) -> Fields {
        self.parser
            .catalog
            .segment(tag)
            .map(|definition| self.parser.codec.decode(segment.values(), definition))
            .unwrap_or_default()
    }

    fn discard_open_set(&mut self, position: usize) {
        self.detail = None;
        if let Some(set) = self.set.take() {
            warn!(
                position,
                identifier = set.identifier_code(),
                "Discarding transaction set without SE trailer"
            );
        }
    }

    fn discard_open_group(&mut self, position: usize) {
        self.discard_open_set(position);
        if self.group.take().is_some() {
            warn!(position, "Discarding functional group without GE trailer");
        }
    }

    fn on_isa(&mut self, segment: &Segment) {
        self.interchange.isa = self.envelope_fields(ISA, segment);
        self.state = State::InInterchange;
    }

    fn on_iea(&mut self, segment: &Segment) {
        self.discard_open_group(segment.position);
        self.state = State::Outside;
    }

    fn on_gs(&mut self, segment: &Segment) {
        self.discard_open_group(segment.position);
        self.group = Some(FunctionalGroup::new(self.envelope_fields(GS, segment)));
        self.state = State::InGroup;
    }

    fn on_ge(&mut self, segment: &Segment) {
        self.discard_open_set(segment.position);
        match self.group.take() {
            Some(group) => {
                debug!(sets = group.sets.len(), "Closed functional group");
                self.interchange.groups.push(group);
            }
            None => trace!(position = segment.position, "GE without open group ignored"),
        }
        self.state = State::InInterchange;
    }

    fn on_st(&mut self, segment: &Segment) {
        self.discard_open_set(segment.position);
        self.set = Some(TransactionSet::new(self.envelope_fields(ST, segment)));
        self.state = State::InSet;
    }

    fn on_se(&mut self, segment: &Segment) {
        let Some(mut set) = self.set.take() else {
            trace!(position = segment.position, "SE without open set ignored");
            return;
        };
        if let Some(detail) = self.detail.take() {
            set.detail_loops.push(detail);
        }

        match self.group.as_mut() {
            Some(group) => {
                debug!(
                    identifier = set.identifier_code(),
                    loops = set.detail_loops.len(),
                    "Closed transaction set"
                );
                group.sets.push(set);
                self.state = State::InGroup;
            }
            None => {
                warn!(
                    position = segment.position,
                    "Discarding transaction set outside a functional group"
                );
                self.state = State::InInterchange;
            }
        }
    }

    fn on_payload(&mut self, segment: &Segment) {
        let tag = segment.tag();
        let catalog = self.parser.catalog;

        let Some(set) = self.set.as_mut().filter(|_| self.state == State::InSet) else {
            trace!(position = segment.position, tag, "Segment outside a transaction set ignored");
            return;
        };
        let Some(layout) = catalog.document(set.identifier_code()) else {
            trace!(tag, identifier = set.identifier_code(), "No document spec; segment ignored");
            return;
        };
        let (Some(section), Some(definition)) =
            (layout.section_of(tag), catalog.payload_segment(layout, tag))
        else {
            trace!(position = segment.position, tag, "Unknown segment ignored");
            return;
        };

        let fields = self.parser.codec.decode(segment.values(), definition);
        match section {
            SectionKind::Header => {
                set.header.insert(tag.to_string(), fields);
            }
            SectionKind::Footer => {
                set.footer.insert(tag.to_string(), fields);
            }
            SectionKind::Detail => {
                if self.detail.as_ref().is_some_and(|open| open.contains(tag)) {
                    if let Some(closed) = self.detail.take() {
                        set.detail_loops.push(closed);
                    }
                }
                self.detail
                    .get_or_insert_with(DetailLoop::new)
                    .insert(tag, fields);
            }
        }
    }
}
