use std::collections::{HashMap, HashSet};

use serde::Serialize;
use utoipa::ToSchema;

use crate::ids::PermissionId;


/// A single node of a role's permission tree
/// (represents either a menu or a button-level capability).
///
/// The `enabled` flag indicates whether the role being edited currently
/// holds the permission. **A node's flag is fully independent of its parent
/// and children** -- enabling a parent does not enable its children, and
/// vice versa.
///
/// Serialized with the `enable` field name, which is what the
/// administrative console expects on the wire.
#[derive(Serialize, Clone, PartialEq, Eq, Debug, ToSchema)]
#[cfg_attr(
    feature = "serde_impls_for_client_on_models",
    derive(serde::Deserialize)
)]
pub struct PermissionTreeNode {
    /// Internal ID of the permission; unique across the entire forest.
    pub id: PermissionId,

    /// Display label.
    pub name: String,

    /// Whether the role currently holds this permission.
    #[serde(rename = "enable")]
    pub enabled: bool,

    /// Display icon, carried through unchanged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Ordered child nodes. The order is display order
    /// and carries no weight for grant computation.
    pub children: Vec<PermissionTreeNode>,
}


/// A flat (not-yet-assembled) permission entry, as loaded from storage.
///
/// A `parent_id` of `None` *or* zero marks a top-level entry.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FlatPermission {
    pub id: PermissionId,

    pub name: String,

    pub icon: Option<String>,

    pub parent_id: Option<PermissionId>,
}


/// An ordered forest of [`PermissionTreeNode`]s, as loaded for one role.
///
/// The tree is an immutable snapshot: edits go through
/// [`with_enabled`][Self::with_enabled], which produces a new tree and
/// leaves the original untouched.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PermissionTree {
    /// Top-level nodes of the forest.
    roots: Vec<PermissionTreeNode>,
}

impl PermissionTree {
    #[inline]
    pub fn new_empty() -> Self {
        Self {
            roots: Vec::with_capacity(0),
        }
    }

    #[inline]
    pub fn from_roots(roots: Vec<PermissionTreeNode>) -> Self {
        Self { roots }
    }

    /// Assembles a permission tree out of a flat permission list and the set
    /// of permission IDs the role currently holds.
    ///
    /// Entries are grouped under their parents; sibling order follows the
    /// order of `permissions`. Each node is marked enabled iff its ID is
    /// present in `granted_permission_ids`.
    ///
    /// Entries whose parent does not appear in `permissions` are
    /// unreachable and silently dropped, matching how the console treats
    /// orphaned rows.
    pub fn assemble(
        permissions: Vec<FlatPermission>,
        granted_permission_ids: &HashSet<PermissionId>,
    ) -> Self {
        let mut top_level_permissions = Vec::new();
        let mut children_by_parent_id: HashMap<PermissionId, Vec<FlatPermission>> = HashMap::new();

        for permission in permissions {
            match permission.parent_id {
                // A parent of 0 also marks a top-level entry (legacy rows).
                Some(parent_id) if parent_id.into_inner() != 0 => {
                    children_by_parent_id
                        .entry(parent_id)
                        .or_default()
                        .push(permission);
                }
                _ => top_level_permissions.push(permission),
            }
        }


        struct SubtreeFrame {
            permission: FlatPermission,
            built_children: Vec<PermissionTreeNode>,
            remaining_children: std::vec::IntoIter<FlatPermission>,
        }

        let frame_for = |permission: FlatPermission,
                             children_by_parent_id: &mut HashMap<PermissionId, Vec<FlatPermission>>|
         -> SubtreeFrame {
            let direct_children = children_by_parent_id
                .remove(&permission.id)
                .unwrap_or_default();

            SubtreeFrame {
                permission,
                built_children: Vec::with_capacity(direct_children.len()),
                remaining_children: direct_children.into_iter(),
            }
        };


        let mut roots = Vec::with_capacity(top_level_permissions.len());

        for top_level_permission in top_level_permissions {
            let mut frame_stack = vec![frame_for(
                top_level_permission,
                &mut children_by_parent_id,
            )];

            while let Some(current_frame) = frame_stack.last_mut() {
                if let Some(next_child) = current_frame.remaining_children.next() {
                    let child_frame = frame_for(next_child, &mut children_by_parent_id);
                    frame_stack.push(child_frame);

                    continue;
                }

                // All of the node's children have been built; finish the node
                // and hand it to its parent frame (or to the root list).
                // PANIC SAFETY: `last_mut` above ensured the stack is non-empty.
                let finished_frame = frame_stack.pop().unwrap();

                let finished_node = PermissionTreeNode {
                    enabled: granted_permission_ids.contains(&finished_frame.permission.id),
                    id: finished_frame.permission.id,
                    name: finished_frame.permission.name,
                    icon: finished_frame.permission.icon,
                    children: finished_frame.built_children,
                };

                match frame_stack.last_mut() {
                    Some(parent_frame) => parent_frame.built_children.push(finished_node),
                    None => roots.push(finished_node),
                }
            }
        }

        Self { roots }
    }

    /// Produces a new tree, identical to this one except that the node with
    /// the given ID has its enabled flag set to `enabled`.
    ///
    /// If no node carries the given ID, the tree is returned unchanged --
    /// toggling a node that was removed mid-session is tolerated silently.
    ///
    /// Sibling order and the flags of all other nodes are preserved
    /// bit-for-bit. This performs no I/O and is referentially transparent.
    #[must_use = "with_enabled returns a new tree and leaves self untouched"]
    pub fn with_enabled(&self, id: PermissionId, enabled: bool) -> Self {
        let mut updated_tree = self.clone();

        // Depth-first with an explicit stack; the ID uniqueness invariant
        // means the first match is the only match.
        let mut node_stack: Vec<&mut PermissionTreeNode> =
            updated_tree.roots.iter_mut().rev().collect();

        while let Some(node) = node_stack.pop() {
            if node.id == id {
                node.enabled = enabled;
                break;
            }

            node_stack.extend(node.children.iter_mut().rev());
        }

        drop(node_stack);

        updated_tree
    }

    /// Collects the IDs of all currently enabled nodes, at any depth,
    /// in pre-order (parent before children, siblings in display order).
    ///
    /// A node's enabled state is read independently of its ancestors'
    /// and descendants' state. The pre-order only pins a canonical
    /// sequence; consumers treat the result as a set.
    pub fn enabled_permission_ids(&self) -> Vec<PermissionId> {
        let mut enabled_ids = Vec::new();

        let mut node_stack: Vec<&PermissionTreeNode> = self.roots.iter().rev().collect();

        while let Some(node) = node_stack.pop() {
            if node.enabled {
                enabled_ids.push(node.id);
            }

            node_stack.extend(node.children.iter().rev());
        }

        enabled_ids
    }

    /// Looks up a node anywhere in the forest by its ID.
    pub fn get(&self, id: PermissionId) -> Option<&PermissionTreeNode> {
        let mut node_stack: Vec<&PermissionTreeNode> = self.roots.iter().rev().collect();

        while let Some(node) = node_stack.pop() {
            if node.id == id {
                return Some(node);
            }

            node_stack.extend(node.children.iter().rev());
        }

        None
    }

    /// Returns a reference to the top-level nodes.
    pub fn roots(&self) -> &[PermissionTreeNode] {
        &self.roots
    }

    /// Consumes the tree and returns the raw top-level nodes.
    pub fn into_roots(self) -> Vec<PermissionTreeNode> {
        self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}


#[cfg(test)]
mod test {
    use super::*;

    fn leaf(id: i32, enabled: bool) -> PermissionTreeNode {
        PermissionTreeNode {
            id: PermissionId::new(id),
            name: format!("permission-{}", id),
            enabled,
            icon: None,
            children: Vec::new(),
        }
    }

    fn branch(id: i32, enabled: bool, children: Vec<PermissionTreeNode>) -> PermissionTreeNode {
        PermissionTreeNode {
            id: PermissionId::new(id),
            name: format!("permission-{}", id),
            enabled,
            icon: None,
            children,
        }
    }

    fn sample_tree() -> PermissionTree {
        PermissionTree::from_roots(vec![
            branch(
                1,
                false,
                vec![
                    leaf(2, true),
                    branch(3, false, vec![leaf(4, false), leaf(5, true)]),
                ],
            ),
            branch(6, true, vec![leaf(7, false)]),
        ])
    }

    fn enabled_id_set(tree: &PermissionTree) -> HashSet<PermissionId> {
        tree.enabled_permission_ids().into_iter().collect()
    }


    #[test]
    fn toggle_is_idempotent() {
        let tree = sample_tree();

        let toggled_once = tree.with_enabled(PermissionId::new(4), true);
        let toggled_twice = toggled_once.with_enabled(PermissionId::new(4), true);

        assert_eq!(toggled_once, toggled_twice);
    }

    #[test]
    fn toggles_of_distinct_ids_commute() {
        let tree = sample_tree();

        let first_then_second = tree
            .with_enabled(PermissionId::new(2), false)
            .with_enabled(PermissionId::new(7), true);

        let second_then_first = tree
            .with_enabled(PermissionId::new(7), true)
            .with_enabled(PermissionId::new(2), false);

        assert_eq!(first_then_second, second_then_first);
    }

    #[test]
    fn toggling_an_unknown_id_is_a_no_op() {
        let tree = sample_tree();

        let updated_tree = tree.with_enabled(PermissionId::new(999), true);

        assert_eq!(tree, updated_tree);
    }

    #[test]
    fn toggle_preserves_all_other_nodes() {
        let tree = sample_tree();

        let updated_tree = tree.with_enabled(PermissionId::new(3), true);

        assert!(updated_tree.get(PermissionId::new(3)).unwrap().enabled);

        let expected_unchanged_ids = [1, 2, 4, 5, 6, 7];
        for id in expected_unchanged_ids {
            assert_eq!(
                tree.get(PermissionId::new(id)).unwrap().enabled,
                updated_tree.get(PermissionId::new(id)).unwrap().enabled,
                "the enabled flag of node {} should not have been disturbed",
                id
            );
        }

        // Sibling order is untouched as well.
        let collect_ids = |tree: &PermissionTree| -> Vec<PermissionId> {
            let mut all_ids = Vec::new();
            let mut node_stack: Vec<&PermissionTreeNode> = tree.roots().iter().rev().collect();

            while let Some(node) = node_stack.pop() {
                all_ids.push(node.id);
                node_stack.extend(node.children.iter().rev());
            }

            all_ids
        };

        assert_eq!(collect_ids(&tree), collect_ids(&updated_tree));
    }

    #[test]
    fn extraction_contains_exactly_the_enabled_ids() {
        let tree = sample_tree();

        let enabled_ids = enabled_id_set(&tree);

        let expected_ids = [2, 5, 6]
            .into_iter()
            .map(PermissionId::new)
            .collect::<HashSet<_>>();

        assert_eq!(enabled_ids, expected_ids);
    }

    #[test]
    fn extraction_is_in_pre_order() {
        let tree = PermissionTree::from_roots(vec![
            branch(1, true, vec![leaf(2, true), leaf(3, true)]),
            leaf(4, true),
        ]);

        let enabled_ids = tree.enabled_permission_ids();

        assert_eq!(
            enabled_ids,
            vec![
                PermissionId::new(1),
                PermissionId::new(2),
                PermissionId::new(3),
                PermissionId::new(4),
            ]
        );
    }

    #[test]
    fn toggle_round_trips_through_extraction() {
        let tree = sample_tree();
        let target_id = PermissionId::new(4);

        let enabled_tree = tree.with_enabled(target_id, true);
        assert!(enabled_id_set(&enabled_tree).contains(&target_id));

        let disabled_tree = enabled_tree.with_enabled(target_id, false);
        assert!(!enabled_id_set(&disabled_tree).contains(&target_id));
    }

    #[test]
    fn enabling_a_parent_does_not_cascade_to_children() {
        // A(disabled) with children B(enabled) and C(disabled).
        let tree = PermissionTree::from_roots(vec![branch(
            1,
            false,
            vec![leaf(2, true), leaf(3, false)],
        )]);

        assert_eq!(
            enabled_id_set(&tree),
            HashSet::from([PermissionId::new(2)])
        );

        let updated_tree = tree.with_enabled(PermissionId::new(1), true);

        // A is now enabled, B stays enabled, C stays disabled.
        assert_eq!(
            enabled_id_set(&updated_tree),
            HashSet::from([PermissionId::new(1), PermissionId::new(2)])
        );
    }

    #[test]
    fn traversal_survives_a_deeply_nested_tree() {
        let mut node = leaf(2_000, true);
        for id in (1..2_000).rev() {
            node = branch(id, id % 2 == 0, vec![node]);
        }

        let tree = PermissionTree::from_roots(vec![node]);

        let enabled_ids = tree.enabled_permission_ids();
        assert_eq!(enabled_ids.len(), 1_000);

        let updated_tree = tree.with_enabled(PermissionId::new(2_000), false);
        assert_eq!(updated_tree.enabled_permission_ids().len(), 999);
    }

    #[test]
    fn assembly_groups_children_under_parents_in_input_order() {
        let permissions = vec![
            FlatPermission {
                id: PermissionId::new(1),
                name: "System".to_string(),
                icon: Some("setting".to_string()),
                parent_id: None,
            },
            FlatPermission {
                id: PermissionId::new(2),
                name: "Users".to_string(),
                icon: None,
                parent_id: Some(PermissionId::new(1)),
            },
            FlatPermission {
                id: PermissionId::new(3),
                name: "Create user".to_string(),
                icon: None,
                parent_id: Some(PermissionId::new(2)),
            },
            FlatPermission {
                id: PermissionId::new(4),
                name: "Roles".to_string(),
                icon: None,
                parent_id: Some(PermissionId::new(1)),
            },
            // A parent of zero is top-level, same as no parent at all.
            FlatPermission {
                id: PermissionId::new(5),
                name: "Dashboard".to_string(),
                icon: None,
                parent_id: Some(PermissionId::new(0)),
            },
        ];

        let granted = HashSet::from([PermissionId::new(2), PermissionId::new(3)]);

        let tree = PermissionTree::assemble(permissions, &granted);

        let roots = tree.roots();
        assert_eq!(roots.len(), 2);

        assert_eq!(roots[0].id, PermissionId::new(1));
        assert!(!roots[0].enabled);
        assert_eq!(roots[0].icon.as_deref(), Some("setting"));
        assert_eq!(roots[1].id, PermissionId::new(5));

        let system_children = &roots[0].children;
        assert_eq!(system_children.len(), 2);
        assert_eq!(system_children[0].id, PermissionId::new(2));
        assert!(system_children[0].enabled);
        assert_eq!(system_children[1].id, PermissionId::new(4));

        let users_children = &system_children[0].children;
        assert_eq!(users_children.len(), 1);
        assert_eq!(users_children[0].id, PermissionId::new(3));
        assert!(users_children[0].enabled);
    }
}
