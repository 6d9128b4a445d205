use serde_json::{Map, Value};

use super::node::{IndexedContainer, Node};

/// Resolve a node into its final value. Indexed containers whose keys are
/// exactly `0..len` become arrays ordered by index; any gap or offset start
/// turns them into objects keyed by the decimal index, in insertion order.
pub fn finalize(node: Node) -> Value {
    match node {
        Node::Scalar(Some(text)) => Value::String(text),
        Node::Scalar(None) => Value::Null,
        Node::Object(members) => {
            let mut map = Map::with_capacity(members.len());
            for (name, child) in members {
                map.insert(name, finalize(child));
            }
            Value::Object(map)
        }
        Node::Indexed(container) => finalize_indexed(container),
    }
}

fn finalize_indexed(container: IndexedContainer) -> Value {
    if container.is_dense() {
        let mut entries: Vec<(usize, Node)> = container.into_entries().collect();
        entries.sort_unstable_by_key(|(index, _)| *index);
        return Value::Array(entries.into_iter().map(|(_, child)| finalize(child)).collect());
    }

    let mut map = Map::with_capacity(container.len());
    let mut index_buf = itoa::Buffer::new();
    for (index, child) in container.into_entries() {
        map.insert(index_buf.format(index).to_string(), finalize(child));
    }
    Value::Object(map)
}
