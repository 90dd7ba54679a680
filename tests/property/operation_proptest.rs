//! Property-based tests for the operation apply rules
//!
//! The invariants here must hold for any graph and any operation order:
//! adds are idempotent, deletes cascade completely, and edits never touch
//! fields the patch does not carry.

use proptest::prelude::*;

use mindlink::shared::graph::{Edge, Node};
use mindlink::shared::operation::{apply, NodePatch, Operation, Target};

fn arb_node() -> impl Strategy<Value = Node> {
    ("[a-z][a-z0-9]{0,8}", any::<i32>(), any::<i32>()).prop_map(|(id, x, y)| Node {
        id,
        node_type: "text".to_string(),
        content: String::new(),
        x: x as f64,
        y: y as f64,
        width: None,
        height: None,
        style: serde_json::Map::new(),
    })
}

fn arb_graph() -> impl Strategy<Value = (Vec<Node>, Vec<Edge>)> {
    prop::collection::vec(arb_node(), 0..8).prop_flat_map(|nodes| {
        let node_count = nodes.len();
        let edges = if node_count < 2 {
            prop::collection::vec((0usize..1, 0usize..1), 0..1).boxed()
        } else {
            prop::collection::vec((0..node_count, 0..node_count), 0..8).boxed()
        };
        (Just(nodes), edges).prop_map(|(mut nodes, pairs)| {
            // Dedup node ids so the graph satisfies the id-uniqueness invariant
            nodes.sort_by(|a, b| a.id.cmp(&b.id));
            nodes.dedup_by(|a, b| a.id == b.id);
            let edges = if nodes.is_empty() {
                Vec::new()
            } else {
                pairs
                    .into_iter()
                    .enumerate()
                    .map(|(i, (s, t))| Edge {
                        id: format!("e{}", i),
                        source: nodes[s % nodes.len()].id.clone(),
                        target: nodes[t % nodes.len()].id.clone(),
                        color: None,
                    })
                    .collect()
            };
            (nodes, edges)
        })
    })
}

proptest! {
    /// Applying the same NODE_ADD twice never changes the outcome of the
    /// first application.
    #[test]
    fn node_add_idempotent((mut nodes, mut edges) in arb_graph(), new in arb_node()) {
        let op = Operation::NodeAdd(new);
        apply(&mut nodes, &mut edges, &op);
        let after_once = (nodes.clone(), edges.clone());
        apply(&mut nodes, &mut edges, &op);
        prop_assert_eq!((nodes, edges), after_once);
    }

    /// Deleting any node leaves no edge touching it, regardless of graph.
    #[test]
    fn node_delete_cascades((mut nodes, mut edges) in arb_graph(), pick in any::<prop::sample::Index>()) {
        if nodes.is_empty() {
            return Ok(());
        }
        let victim = nodes[pick.index(nodes.len())].id.clone();
        apply(&mut nodes, &mut edges, &Operation::NodeDelete(Target { id: victim.clone() }));

        prop_assert!(nodes.iter().all(|n| n.id != victim));
        prop_assert!(edges.iter().all(|e| e.source != victim && e.target != victim));
    }

    /// A content-only edit changes content and nothing else.
    #[test]
    fn node_edit_touches_only_present_fields((mut nodes, mut edges) in arb_graph(), pick in any::<prop::sample::Index>(), text in "[a-zA-Z ]{0,16}") {
        if nodes.is_empty() {
            return Ok(());
        }
        let idx = pick.index(nodes.len());
        let before = nodes[idx].clone();
        let id = before.id.clone();

        apply(&mut nodes, &mut edges, &Operation::NodeEdit(NodePatch::content(id.clone(), text.clone())));

        let after = nodes.iter().find(|n| n.id == id).unwrap();
        prop_assert_eq!(&after.content, &text);
        prop_assert_eq!(after.x, before.x);
        prop_assert_eq!(after.y, before.y);
        prop_assert_eq!(&after.style, &before.style);
        prop_assert_eq!(&after.node_type, &before.node_type);
    }

    /// Any operation leaves node and edge ids unique.
    #[test]
    fn ids_stay_unique((mut nodes, mut edges) in arb_graph(), new in arb_node()) {
        for op in [
            Operation::NodeAdd(new.clone()),
            Operation::NodeUpdate(new.clone()),
            Operation::NodeDelete(Target { id: new.id.clone() }),
        ] {
            apply(&mut nodes, &mut edges, &op);

            let mut node_ids: Vec<_> = nodes.iter().map(|n| &n.id).collect();
            node_ids.sort();
            node_ids.dedup();
            prop_assert_eq!(node_ids.len(), nodes.len());

            let mut edge_ids: Vec<_> = edges.iter().map(|e| &e.id).collect();
            edge_ids.sort();
            edge_ids.dedup();
            prop_assert_eq!(edge_ids.len(), edges.len());
        }
    }
}
