use serde::Serialize;
use std::collections::HashMap;

use crate::models::Category;

/// Category with its nested subcategories
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<CategoryNode>,
}

/// Fold flat categories into a forest using each category's primary parent.
///
/// Pass one indexes every record; pass two attaches each record to its parent
/// or, when the parent is absent from `categories`, promotes it to a root.
/// Sibling order follows input order. Cycles are not detected here; writes
/// reject them (see `hierarchy::find_cycle`), and any record stranded on a
/// cycle is left out of the forest.
pub fn build_category_tree(categories: Vec<Category>) -> Vec<CategoryNode> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(categories.len());
    for (i, category) in categories.iter().enumerate() {
        index.entry(category.id.as_str()).or_insert(i);
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); categories.len()];
    let mut roots = Vec::new();
    for (i, category) in categories.iter().enumerate() {
        match category.parent_id() {
            Some(parent) => match index.get(parent) {
                Some(&p) if p != i => children[p].push(i),
                Some(_) => roots.push(i),
                None => {
                    tracing::warn!(
                        "Category {} references missing parent {}; treating as root",
                        category.id,
                        parent
                    );
                    roots.push(i);
                }
            },
            None => roots.push(i),
        }
    }

    let total = categories.len();
    let mut slots: Vec<Option<Category>> = categories.into_iter().map(Some).collect();
    let forest: Vec<CategoryNode> = roots
        .into_iter()
        .filter_map(|root| assemble(root, &mut slots, &children))
        .collect();

    let stranded = slots.iter().filter(|slot| slot.is_some()).count();
    if stranded > 0 {
        tracing::warn!("{} of {} categories sit on a parent cycle and were left out of the tree", stranded, total);
    }
    forest
}

fn assemble(i: usize, slots: &mut [Option<Category>], children: &[Vec<usize>]) -> Option<CategoryNode> {
    let category = slots[i].take()?;
    let kids = children[i]
        .iter()
        .filter_map(|&child| assemble(child, slots, children))
        .collect();
    Some(CategoryNode {
        category,
        children: kids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn category(id: &str, parent: Option<&str>) -> Category {
        serde_json::from_value(json!({
            "id": id,
            "name": id.to_uppercase(),
            "parent_ids": parent.map(|p| vec![p]).unwrap_or_default(),
        }))
        .unwrap()
    }

    fn ids(nodes: &[CategoryNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.category.id.as_str()).collect()
    }

    #[test]
    fn two_trees_and_an_orphan_give_three_roots() {
        let forest = build_category_tree(vec![
            category("a", None),
            category("a1", Some("a")),
            category("a2", Some("a")),
            category("a1x", Some("a1")),
            category("b", None),
            category("b1", Some("b")),
            category("orphan", Some("outside-page")),
        ]);

        assert_eq!(ids(&forest), vec!["a", "b", "orphan"]);
        assert_eq!(ids(&forest[0].children), vec!["a1", "a2"]);
        assert_eq!(ids(&forest[0].children[0].children), vec!["a1x"]);
        assert_eq!(ids(&forest[1].children), vec!["b1"]);
        assert!(forest[2].children.is_empty());
    }

    #[test]
    fn children_listed_before_parent_still_attach() {
        let forest = build_category_tree(vec![category("kid", Some("mom")), category("mom", None)]);
        assert_eq!(ids(&forest), vec!["mom"]);
        assert_eq!(ids(&forest[0].children), vec!["kid"]);
    }

    #[test]
    fn self_parent_becomes_root_and_cycles_drop_out() {
        let forest = build_category_tree(vec![
            category("solo", Some("solo")),
            category("x", Some("y")),
            category("y", Some("x")),
        ]);
        assert_eq!(ids(&forest), vec!["solo"]);
    }

    #[test]
    fn serializes_children_inline() {
        let forest = build_category_tree(vec![category("a", None), category("a1", Some("a"))]);
        let value = serde_json::to_value(&forest).unwrap();
        assert_eq!(value[0]["id"], "a");
        assert_eq!(value[0]["children"][0]["id"], "a1");
        assert_eq!(value[0]["children"][0]["children"], json!([]));
    }
}
