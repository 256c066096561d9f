use crate::dom::dom_model::{Element, NodeId, PageSnapshot};

// Parent chains in hostile markup can be long but never this long; the cap
// guards against a snapshot with a parent cycle.
const MAX_ANCESTOR_WALK: usize = 256;

/// Whether `node` is `ancestor` itself or lies inside its subtree.
pub fn is_within(snap: &PageSnapshot, node: NodeId, ancestor: NodeId) -> bool {
    let mut current = Some(node);
    for _ in 0..MAX_ANCESTOR_WALK {
        match current {
            Some(id) if id == ancestor => return true,
            Some(id) => current = snap.get(id).and_then(|el| el.parent),
            None => return false,
        }
    }
    false
}

/// The ancestor `levels` steps above `node` (1 = parent, 2 = grandparent).
pub fn ancestor_at(snap: &PageSnapshot, node: NodeId, levels: usize) -> Option<NodeId> {
    let mut current = node;
    for _ in 0..levels {
        current = snap.get(current)?.parent?;
    }
    Some(current)
}

/// Closest ancestor (excluding the node itself) that is a `<form>`.
pub fn nearest_form_ancestor(snap: &PageSnapshot, node: NodeId) -> Option<NodeId> {
    let mut current = snap.get(node)?.parent;
    for _ in 0..MAX_ANCESTOR_WALK {
        let el = snap.get(current?)?;
        if el.is_form() {
            return Some(el.node);
        }
        current = el.parent;
    }
    None
}

/// Whether `a` precedes `b` in document order. Unresolvable nodes compare
/// as not-preceding.
pub fn precedes(snap: &PageSnapshot, a: NodeId, b: NodeId) -> bool {
    match (snap.position(a), snap.position(b)) {
        (Some(pa), Some(pb)) => pa < pb,
        _ => false,
    }
}

/// Elements inside the subtree rooted at `root`, in document order,
/// excluding `root` itself.
pub fn descendants<'a>(snap: &'a PageSnapshot, root: NodeId) -> Vec<&'a Element> {
    snap.elements
        .iter()
        .filter(|el| el.node != root && is_within(snap, el.node, root))
        .collect()
}

/// Euclidean distance between two elements' viewport positions.
pub fn screen_distance(a: &Element, b: &Element) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}
