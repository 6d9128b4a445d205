use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::finalize::finalize;
use super::node::{member_slot, IndexedContainer, Node, Slot};
use crate::path::{parse_key_with_depth, KeyPath, Segment};
use crate::{DecodeOptions, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RootUsage {
    Bare,
    Bracketed,
}

/// Folds decoded `(key, value)` pairs into one tree.
///
/// Pairs are applied in order; the first conflicting pair fails and the
/// builder must then be discarded. [`TreeBuilder::finish`] resolves every
/// indexed container and returns the finished value.
///
/// # Examples
/// ```
/// use serde_form_tree::{DecodeOptions, TreeBuilder};
/// use serde_json::json;
///
/// let mut builder = TreeBuilder::new(&DecodeOptions::default());
/// builder.push("a[x][]", Some("1".to_string())).unwrap();
/// builder.push("a[x][]", Some("2".to_string())).unwrap();
/// builder.push("flag", None).unwrap();
/// assert_eq!(builder.finish(), json!({"a": {"x": ["1", "2"]}, "flag": null}));
/// ```
#[derive(Debug)]
pub struct TreeBuilder {
    members: IndexMap<String, Node>,
    usage: HashMap<String, RootUsage>,
    max_depth: usize,
    max_pairs: Option<usize>,
    pairs: usize,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new(&DecodeOptions::default())
    }
}

impl TreeBuilder {
    pub fn new(options: &DecodeOptions) -> Self {
        Self {
            members: IndexMap::new(),
            usage: HashMap::new(),
            max_depth: options.effective_max_depth(),
            max_pairs: options.max_pairs,
            pairs: 0,
        }
    }

    /// Number of pairs applied so far.
    pub fn pair_count(&self) -> usize {
        self.pairs
    }

    /// Tokenize `key` and apply it.
    pub fn push(&mut self, key: &str, value: Option<String>) -> Result<()> {
        if let Some(max_pairs) = self.max_pairs {
            if self.pairs >= max_pairs {
                return Err(Error::limit(
                    Some(key),
                    format!("form body exceeds the maximum of {max_pairs} pairs"),
                ));
            }
        }
        let path = parse_key_with_depth(key, Some(self.max_depth))?;
        self.insert(key, &path, value)?;
        self.pairs += 1;
        Ok(())
    }

    /// Apply an already tokenized key. `key` is only used in error reports.
    pub fn insert(&mut self, key: &str, path: &KeyPath, value: Option<String>) -> Result<()> {
        let segments = path.segments();
        let root = path.root();
        if root.is_empty() {
            return Err(Error::empty_root(key));
        }
        if path.len() > self.max_depth {
            return Err(Error::limit(
                Some(key),
                format!(
                    "key `{key}` exceeds the maximum depth of {} segments",
                    self.max_depth
                ),
            ));
        }

        let usage = if path.is_bare() {
            RootUsage::Bare
        } else {
            RootUsage::Bracketed
        };
        if let Some(seen) = self.usage.get(root) {
            if *seen != usage {
                return Err(Error::bare_mix(key, root));
            }
        }

        match usage {
            RootUsage::Bare => self.insert_bare(key, segments, value)?,
            RootUsage::Bracketed => {
                let slot = member_slot(&mut self.members, root);
                settle(slot, segments[0].clone(), segments, 0, key, value)?;
            }
        }

        if !self.usage.contains_key(root) {
            self.usage.insert(root.to_string(), usage);
        }
        Ok(())
    }

    fn insert_bare(&mut self, key: &str, segments: &[Segment], value: Option<String>) -> Result<()> {
        let root = match segments.first() {
            Some(Segment::Name(name)) => name.as_str(),
            _ => return Err(Error::empty_root(key)),
        };
        let leaf = Node::Scalar(value);
        match member_slot(&mut self.members, root) {
            Slot::Vacant(slot) => {
                slot.insert(leaf);
                Ok(())
            }
            Slot::Occupied(existing) => match existing {
                Node::Scalar(_) => {
                    let first = std::mem::replace(existing, Node::Scalar(None));
                    *existing = Node::Indexed(IndexedContainer::from_pair(first, leaf));
                    Ok(())
                }
                Node::Indexed(container) => match container.append_slot() {
                    Ok((_, slot)) => {
                        slot.insert(leaf);
                        Ok(())
                    }
                    Err(index) => Err(Error::duplicate(
                        key,
                        vec![segments[0].clone(), Segment::Index(index)],
                    )),
                },
                Node::Object(_) => Err(Error::bare_mix(key, root)),
            },
        }
    }

    pub fn finish(self) -> Value {
        let mut map = Map::with_capacity(self.members.len());
        for (name, node) in self.members {
            map.insert(name, finalize(node));
        }
        Value::Object(map)
    }
}

/// Continue below `node`, the node addressed by `segments[..pos]`.
fn descend(
    node: &mut Node,
    segments: &[Segment],
    pos: usize,
    key: &str,
    value: Option<String>,
) -> Result<()> {
    let (slot, resolved) = match (node, &segments[pos]) {
        (Node::Object(members), Segment::Name(name)) => {
            (member_slot(members, name), segments[pos].clone())
        }
        (Node::Indexed(container), Segment::Index(index)) => {
            (container.slot(*index), Segment::Index(*index))
        }
        (Node::Indexed(container), Segment::Append) => match container.append_slot() {
            Ok((index, slot)) => (Slot::Vacant(slot), Segment::Index(index)),
            Err(index) => {
                let mut path = segments[..pos].to_vec();
                path.push(Segment::Index(index));
                return Err(Error::duplicate(key, path));
            }
        },
        (Node::Scalar(_), _) => {
            return Err(Error::scalar_conflict(key, segments[..pos].to_vec()));
        }
        (Node::Object(_), Segment::Index(_) | Segment::Append)
        | (Node::Indexed(_), Segment::Name(_)) => {
            return Err(Error::kind_conflict(key, segments[..=pos].to_vec()));
        }
    };
    settle(slot, resolved, segments, pos, key, value)
}

/// Fill or enter the child `slot` that `segments[pos]` (resolved to
/// `resolved`) selected.
fn settle(
    slot: Slot<'_>,
    resolved: Segment,
    segments: &[Segment],
    pos: usize,
    key: &str,
    value: Option<String>,
) -> Result<()> {
    let is_leaf = pos + 1 == segments.len();
    match (slot, is_leaf) {
        (Slot::Vacant(slot), true) => {
            slot.insert(Node::Scalar(value));
            Ok(())
        }
        (Slot::Vacant(slot), false) => {
            let child = slot.insert(Node::container_for(&segments[pos + 1]));
            descend(child, segments, pos + 1, key, value)
        }
        (Slot::Occupied(child), false) => descend(child, segments, pos + 1, key, value),
        (Slot::Occupied(existing), true) => {
            let mut path = segments[..pos].to_vec();
            path.push(resolved);
            Err(match existing {
                Node::Scalar(_) => Error::duplicate(key, path),
                Node::Object(_) | Node::Indexed(_) => Error::scalar_conflict(key, path),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::ErrorKind;

    fn build(pairs: &[(&str, Option<&str>)]) -> Result<Value> {
        let mut builder = TreeBuilder::new(&DecodeOptions::default());
        for (key, value) in pairs {
            builder.push(key, value.map(str::to_string))?;
        }
        Ok(builder.finish())
    }

    fn name(value: &str) -> Segment {
        Segment::Name(value.into())
    }

    #[rstest]
    fn test_nested_objects_share_containers() {
        let value = build(&[("a[x][y]", Some("1")), ("a[x][z]", Some("2"))]).unwrap();
        assert_eq!(value, json!({"a": {"x": {"y": "1", "z": "2"}}}));
    }

    #[rstest]
    fn test_bare_repeat_becomes_array() {
        let value = build(&[("z", Some("1")), ("z", None), ("z", Some(""))]).unwrap();
        assert_eq!(value, json!({"z": ["1", null, ""]}));
    }

    #[rstest]
    fn test_bracket_then_bare_conflict() {
        let err = build(&[("a[]", Some("1")), ("a", Some("2"))]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::BareBracketMixConflict);
        assert_eq!(err.path, vec![name("a")]);
    }

    #[rstest]
    fn test_bare_then_bracket_conflict() {
        let err = build(&[("a", Some("2")), ("a[b]", Some("1"))]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::BareBracketMixConflict);
    }

    #[rstest]
    fn test_scalar_then_container() {
        let err = build(&[("a[x]", Some("2")), ("a[x][]", Some("3"))]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ScalarContainerConflict);
        assert_eq!(err.path, vec![name("a"), name("x")]);
    }

    #[rstest]
    fn test_container_then_scalar() {
        let err = build(&[("a[x][]", Some("3")), ("a[x]", Some("2"))]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ScalarContainerConflict);
        assert_eq!(err.path, vec![name("a"), name("x")]);
    }

    #[rstest]
    fn test_named_then_indexed() {
        let err = build(&[("a[x]", Some("1")), ("a[0]", Some("2"))]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ContainerKindConflict);
        assert_eq!(err.path, vec![name("a"), Segment::Index(0)]);
    }

    #[rstest]
    fn test_duplicate_index() {
        let err = build(&[("a[1]", Some("1")), ("a[1]", Some("2"))]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateAssignment);
        assert_eq!(err.path, vec![name("a"), Segment::Index(1)]);
    }

    #[rstest]
    fn test_append_collides_with_explicit_index() {
        let err = build(&[("a[0]", Some("x")), ("a[]", Some("y"))]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateAssignment);
        assert_eq!(err.path, vec![name("a"), Segment::Index(0)]);
    }

    #[rstest]
    fn test_failed_append_keeps_its_slot() {
        let mut builder = TreeBuilder::default();
        builder.push("a[1]", Some("1".into())).unwrap();
        builder.push("a[]", Some("x".into())).unwrap();
        let err = builder.push("a[]", Some("y".into())).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateAssignment);
        assert_eq!(err.path, vec![name("a"), Segment::Index(1)]);
        let err = builder.push("a[]", Some("z".into())).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateAssignment);
        assert_eq!(builder.finish(), json!({"a": ["x", "1"]}));
    }

    #[rstest]
    fn test_pre_tokenized_path_respects_depth_ceiling() {
        let key = format!("a{}", "[b]".repeat(crate::constants::DEPTH_CEILING));
        let path = crate::parse_key(&key).unwrap();
        let mut builder = TreeBuilder::new(&DecodeOptions::unlimited());
        let err = builder.insert(&key, &path, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::LimitExceeded);
    }

    #[rstest]
    fn test_pair_limit() {
        let mut builder = TreeBuilder::new(&DecodeOptions::new().with_max_pairs(Some(2)));
        builder.push("a", None).unwrap();
        builder.push("b", None).unwrap();
        let err = builder.push("c", None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::LimitExceeded);
        assert_eq!(builder.pair_count(), 2);
    }

    #[rstest]
    fn test_insert_pre_tokenized() {
        let path = crate::parse_key("k[0][name]").unwrap();
        let mut builder = TreeBuilder::default();
        builder.insert("k[0][name]", &path, Some("v".into())).unwrap();
        assert_eq!(builder.finish(), json!({"k": [{"name": "v"}]}));
    }
}
