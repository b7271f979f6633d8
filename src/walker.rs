use crate::{
    scaffold::Scaffold,
    types::{node_name, Collection, Node, ShapeError, ITEM_KEY},
};
use log::debug;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub folders: usize,
    pub requests: usize,
}

/// Applies `scaffold` to every request of the collection, depth-first, in
/// document order. Folders themselves are left as they are.
pub fn scaffold_collection(
    collection: &mut Collection,
    scaffold: &Scaffold,
) -> Result<Summary, ShapeError> {
    let mut summary = Summary::default();
    for (i, node) in collection.items.iter_mut().enumerate() {
        visit(node, &format!("{}[{}]", ITEM_KEY, i), scaffold, &mut summary)?;
    }
    Ok(summary)
}

fn visit(
    node: &mut Node,
    path: &str,
    scaffold: &Scaffold,
    summary: &mut Summary,
) -> Result<(), ShapeError> {
    match node {
        Node::Folder { fields, children } => {
            debug!("{}: entering folder {}", path, node_name(fields).unwrap_or("<unnamed>"));
            summary.folders += 1;
            for (i, child) in children.iter_mut().enumerate() {
                visit(child, &format!("{}.{}[{}]", path, ITEM_KEY, i), scaffold, summary)?;
            }
        }
        Node::Request(fields) => {
            scaffold.apply(fields, path)?;
            summary.requests += 1;
            debug!("{}: scaffolded {}", path, node_name(fields).unwrap_or("<unnamed>"));
        }
    }
    Ok(())
}
