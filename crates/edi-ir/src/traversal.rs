//! Traversal and path lookup for the record tree

use crate::fields::Fields;
use crate::tree::{DetailLoop, FunctionalGroup, Interchange, Section, TransactionSet};
use crate::{Error, Result};
use serde::Serialize;

/// Callbacks fired while walking an interchange in document order
///
/// Indices are positions among siblings, starting at 0.
pub trait Visitor {
    /// Called before any group is visited
    fn enter_interchange(&mut self, _interchange: &Interchange) {}

    /// Called before the sets of a group are visited
    fn enter_group(&mut self, _index: usize, _group: &FunctionalGroup) {}

    /// Called before the detail loops of a set are visited
    fn enter_set(&mut self, _index: usize, _set: &TransactionSet) {}

    /// Called once per detail loop
    fn visit_loop(&mut self, _index: usize, _detail: &DetailLoop) {}

    /// Called after the detail loops of a set
    fn leave_set(&mut self, _index: usize, _set: &TransactionSet) {}

    /// Called after the sets of a group
    fn leave_group(&mut self, _index: usize, _group: &FunctionalGroup) {}

    /// Called after all groups
    fn leave_interchange(&mut self, _interchange: &Interchange) {}

    /// Returns true if traversal should continue
    fn should_continue(&self) -> bool {
        true
    }
}

/// Walk an interchange, stopping as soon as the visitor asks to
pub fn walk<V: Visitor>(interchange: &Interchange, visitor: &mut V) {
    if !visitor.should_continue() {
        return;
    }
    visitor.enter_interchange(interchange);

    for (group_index, group) in interchange.groups.iter().enumerate() {
        if !visitor.should_continue() {
            return;
        }
        visitor.enter_group(group_index, group);

        for (set_index, set) in group.sets.iter().enumerate() {
            if !visitor.should_continue() {
                return;
            }
            visitor.enter_set(set_index, set);

            for (loop_index, detail) in set.detail_loops.iter().enumerate() {
                if !visitor.should_continue() {
                    return;
                }
                visitor.visit_loop(loop_index, detail);
            }

            if !visitor.should_continue() {
                return;
            }
            visitor.leave_set(set_index, set);
        }

        if !visitor.should_continue() {
            return;
        }
        visitor.leave_group(group_index, group);
    }

    if visitor.should_continue() {
        visitor.leave_interchange(interchange);
    }
}

/// A node of the record tree reached by [`Selection::navigate`]
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum Selection<'a> {
    Interchange(&'a Interchange),
    Group(&'a FunctionalGroup),
    Set(&'a TransactionSet),
    Section(&'a Section),
    Loop(&'a DetailLoop),
    Fields(&'a Fields),
}

impl<'a> Selection<'a> {
    /// Navigate using a path mirroring the JSON shape of the tree
    ///
    /// e.g. `ISA`, `GS[0]/fields`, `GS[0]/ST[1]/header/BEG`,
    /// `GS[0]/ST[0]/detail[2]/PO1`. An empty path selects the interchange.
    pub fn navigate(interchange: &'a Interchange, path: &str) -> Result<Selection<'a>> {
        let mut current = Selection::Interchange(interchange);
        let mut walked: Vec<&str> = Vec::new();

        for segment in path.split('/') {
            if segment.is_empty() {
                continue;
            }

            let (name, index) = split_index(path, segment)?;
            walked.push(segment);
            current = current
                .step(name, index)
                .ok_or_else(|| Error::node_not_found(walked.join("/")))?;
        }

        Ok(current)
    }

    /// The field map at this node, if the node is a segment
    pub fn as_fields(&self) -> Option<&'a Fields> {
        match self {
            Selection::Fields(fields) => Some(fields),
            _ => None,
        }
    }

    fn step(self, name: &str, index: Option<usize>) -> Option<Selection<'a>> {
        match (self, name, index) {
            (Selection::Interchange(interchange), "ISA", None) => {
                Some(Selection::Fields(&interchange.isa))
            }
            (Selection::Interchange(interchange), "GS", Some(i)) => {
                interchange.groups.get(i).map(Selection::Group)
            }
            (Selection::Group(group), "fields", None) => Some(Selection::Fields(&group.gs)),
            (Selection::Group(group), "ST", Some(i)) => group.sets.get(i).map(Selection::Set),
            (Selection::Set(set), "fields", None) => Some(Selection::Fields(&set.st)),
            (Selection::Set(set), "header", None) => Some(Selection::Section(&set.header)),
            (Selection::Set(set), "footer", None) => Some(Selection::Section(&set.footer)),
            (Selection::Set(set), "detail", Some(i)) => set.detail_loops.get(i).map(Selection::Loop),
            (Selection::Section(section), tag, None) => section.get(tag).map(Selection::Fields),
            (Selection::Loop(detail), tag, None) => detail.get(tag).map(Selection::Fields),
            _ => None,
        }
    }
}

/// Split `NAME[3]` into its name and index
fn split_index<'p>(path: &str, segment: &'p str) -> Result<(&'p str, Option<usize>)> {
    let Some(open_bracket) = segment.find('[') else {
        return Ok((segment, None));
    };

    let close_bracket = segment
        .find(']')
        .filter(|&close| close == segment.len() - 1)
        .ok_or_else(|| Error::invalid_path(path, format!("Unclosed bracket in: {segment}")))?;
    let index = segment[open_bracket + 1..close_bracket]
        .parse::<usize>()
        .map_err(|_| Error::invalid_path(path, format!("Invalid index in: {segment}")))?;

    Ok((&segment[..open_bracket], Some(index)))
}
