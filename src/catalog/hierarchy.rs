use std::collections::{HashMap, HashSet};

/// Check whether giving `id` the parents `new_parents` would make it its own
/// ancestor. `parents_of` maps every existing category to its current
/// parents; the entry for `id` itself is never followed.
///
/// Returns the offending chain, starting and ending at `id`.
pub fn find_cycle(
    id: &str,
    new_parents: &[String],
    parents_of: &HashMap<String, Vec<String>>,
) -> Option<Vec<String>> {
    let mut visited = HashSet::new();
    for parent in new_parents {
        let mut path = vec![id.to_string()];
        if let Some(cycle) = walk(parent, id, parents_of, &mut visited, &mut path) {
            return Some(cycle);
        }
    }
    None
}

fn walk(
    node: &str,
    target: &str,
    parents_of: &HashMap<String, Vec<String>>,
    visited: &mut HashSet<String>,
    path: &mut Vec<String>,
) -> Option<Vec<String>> {
    path.push(node.to_string());
    if node == target {
        return Some(path.clone());
    }

    if visited.insert(node.to_string()) {
        for parent in parents_of.get(node).into_iter().flatten() {
            if let Some(cycle) = walk(parent, target, parents_of, visited, path) {
                return Some(cycle);
            }
        }
    }

    path.pop();
    None
}
