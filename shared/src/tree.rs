//! Hierarchy helpers for ordered trees (categories, header menus)
//!
//! Nodes are stored flat with a nullable parent reference and an integer
//! `sort_order` scoped to their sibling group. Everything here is pure: the
//! repositories load rows, these functions shape them.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// A row that lives in an ordered tree
pub trait TreeNode {
    fn id(&self) -> i64;
    fn parent_id(&self) -> Option<i64>;
    fn sort_order(&self) -> i32;
    fn created_at(&self) -> i64;
    fn is_active(&self) -> bool;
}

/// A node with its nested children, as returned by `?format=hierarchy`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeItem<T> {
    #[serde(flatten)]
    pub node: T,
    /// Depth, 0 for roots
    pub level: u32,
    pub children: Vec<TreeItem<T>>,
}

/// Sibling ordering: `sort_order`, then creation time, then id.
pub fn sibling_cmp<T: TreeNode>(a: &T, b: &T) -> Ordering {
    a.sort_order()
        .cmp(&b.sort_order())
        .then_with(|| a.created_at().cmp(&b.created_at()))
        .then_with(|| a.id().cmp(&b.id()))
}

/// Group nodes by parent and attach children recursively.
///
/// Nodes pointing at a missing parent are surfaced as roots. Nodes caught in a
/// parent cycle are appended as extra roots, so no input node is ever dropped.
pub fn build_hierarchy<T: TreeNode>(nodes: Vec<T>) -> Vec<TreeItem<T>> {
    let ids: HashSet<i64> = nodes.iter().map(TreeNode::id).collect();

    let mut groups: HashMap<Option<i64>, Vec<T>> = HashMap::new();
    for node in nodes {
        let key = match node.parent_id() {
            Some(parent) if parent != node.id() && ids.contains(&parent) => Some(parent),
            _ => None,
        };
        groups.entry(key).or_default().push(node);
    }
    for group in groups.values_mut() {
        group.sort_by(sibling_cmp);
    }

    let mut roots = attach(None, 0, &mut groups);

    // Whatever is left could not be reached from a root: a parent cycle.
    while let Some(key) = groups.keys().copied().min() {
        let Some(mut group) = groups.remove(&key) else {
            break;
        };
        let node = group.remove(0);
        if !group.is_empty() {
            groups.insert(key, group);
        }
        let id = node.id();
        roots.push(TreeItem {
            children: attach(Some(id), 1, &mut groups),
            node,
            level: 0,
        });
    }

    roots
}

fn attach<T: TreeNode>(
    parent: Option<i64>,
    level: u32,
    groups: &mut HashMap<Option<i64>, Vec<T>>,
) -> Vec<TreeItem<T>> {
    let Some(children) = groups.remove(&parent) else {
        return Vec::new();
    };
    children
        .into_iter()
        .map(|node| {
            let id = node.id();
            TreeItem {
                children: attach(Some(id), level + 1, groups),
                node,
                level,
            }
        })
        .collect()
}

/// Depth-first, pre-order flattening of a hierarchy.
pub fn flatten<T>(items: Vec<TreeItem<T>>) -> Vec<T> {
    let mut out = Vec::new();
    flatten_into(items, &mut out);
    out
}

fn flatten_into<T>(items: Vec<TreeItem<T>>, out: &mut Vec<T>) {
    for item in items {
        out.push(item.node);
        flatten_into(item.children, out);
    }
}

/// Drop inactive nodes together with their whole subtree (public views).
pub fn prune_inactive<T: TreeNode>(items: Vec<TreeItem<T>>) -> Vec<TreeItem<T>> {
    items
        .into_iter()
        .filter(|item| item.node.is_active())
        .map(|mut item| {
            item.children = prune_inactive(item.children);
            item
        })
        .collect()
}

/// The `(id, order)` assignments that make every sibling group `0..N-1`
/// in creation-time order.
///
/// Groups are keyed by the stored parent reference as-is. Output is ordered by
/// group (roots first), then by position.
pub fn sequential_orders<T: TreeNode>(nodes: &[T]) -> Vec<(i64, i32)> {
    let mut groups: BTreeMap<Option<i64>, Vec<&T>> = BTreeMap::new();
    for node in nodes {
        groups.entry(node.parent_id()).or_default().push(node);
    }

    let mut plan = Vec::with_capacity(nodes.len());
    for group in groups.values_mut() {
        group.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        plan.extend(
            group
                .iter()
                .enumerate()
                .map(|(position, node)| (node.id(), position as i32)),
        );
    }
    plan
}

/// Child → parent lookup used for ancestry checks.
pub fn parent_map<T: TreeNode>(nodes: &[T]) -> HashMap<i64, Option<i64>> {
    nodes.iter().map(|n| (n.id(), n.parent_id())).collect()
}

/// Whether `candidate` is `ancestor` itself or sits anywhere below it.
pub fn is_descendant(parents: &HashMap<i64, Option<i64>>, candidate: i64, ancestor: i64) -> bool {
    let mut visited = HashSet::new();
    let mut current = Some(candidate);
    while let Some(id) = current {
        if id == ancestor {
            return true;
        }
        if !visited.insert(id) {
            return false;
        }
        current = parents.get(&id).copied().flatten();
    }
    false
}
