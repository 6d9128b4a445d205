use indexmap::map::{Entry, VacantEntry};
use indexmap::IndexMap;

use crate::path::Segment;

/// A node of the accumulating tree. Its variant is fixed by the first write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// `None` when the key carried no `=`.
    Scalar(Option<String>),
    Object(IndexMap<String, Node>),
    Indexed(IndexedContainer),
}

impl Node {
    /// Fresh container of the kind `next` addresses into.
    pub(crate) fn container_for(next: &Segment) -> Self {
        match next {
            Segment::Name(_) => Node::Object(IndexMap::new()),
            Segment::Index(_) | Segment::Append => Node::Indexed(IndexedContainer::new()),
        }
    }
}

/// Integer-keyed children whose array-or-object fate is settled only by
/// [`finalize`](crate::tree::finalize).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexedContainer {
    entries: IndexMap<usize, Node>,
    next_append: usize,
}

impl IndexedContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compatibility array built from a repeated bare key.
    pub(crate) fn from_pair(first: Node, second: Node) -> Self {
        let mut entries = IndexMap::with_capacity(2);
        entries.insert(0, first);
        entries.insert(1, second);
        Self {
            entries,
            next_append: 2,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// The vacant slot an append marker targets, or `Err` with the index
    /// when that slot is already taken. The counter only moves forward on
    /// success; explicit indices never advance it.
    pub(crate) fn append_slot(&mut self) -> Result<(usize, VacantSlot<'_>), usize> {
        let index = self.next_append;
        match self.entries.entry(index) {
            Entry::Occupied(_) => Err(index),
            Entry::Vacant(entry) => {
                self.next_append += 1;
                Ok((index, VacantSlot::Index(entry)))
            }
        }
    }

    pub(crate) fn slot(&mut self, index: usize) -> Slot<'_> {
        match self.entries.entry(index) {
            Entry::Occupied(entry) => Slot::Occupied(entry.into_mut()),
            Entry::Vacant(entry) => Slot::Vacant(VacantSlot::Index(entry)),
        }
    }

    /// Keys form exactly `0..len`.
    pub fn is_dense(&self) -> bool {
        let len = self.entries.len();
        self.entries.keys().all(|index| *index < len)
    }

    pub(crate) fn into_entries(self) -> indexmap::map::IntoIter<usize, Node> {
        self.entries.into_iter()
    }
}

pub(crate) fn member_slot<'a>(members: &'a mut IndexMap<String, Node>, name: &str) -> Slot<'a> {
    match members.entry(name.to_string()) {
        Entry::Occupied(entry) => Slot::Occupied(entry.into_mut()),
        Entry::Vacant(entry) => Slot::Vacant(VacantSlot::Member(entry)),
    }
}

pub(crate) enum Slot<'a> {
    Occupied(&'a mut Node),
    Vacant(VacantSlot<'a>),
}

pub(crate) enum VacantSlot<'a> {
    Member(VacantEntry<'a, String, Node>),
    Index(VacantEntry<'a, usize, Node>),
}

impl<'a> VacantSlot<'a> {
    pub(crate) fn insert(self, node: Node) -> &'a mut Node {
        match self {
            VacantSlot::Member(entry) => entry.insert(node),
            VacantSlot::Index(entry) => entry.insert(node),
        }
    }
}
