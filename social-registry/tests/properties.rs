//! Property tests for undo round trips and graph invariants.

use proptest::prelude::*;
use social_registry::SocialRegistry;

fn client_batch() -> impl Strategy<Value = Vec<(String, u32)>> {
    prop::collection::btree_map("[a-z]{1,6}", 0u32..200, 0..40)
        .prop_map(|clients| clients.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

proptest! {
    #[test]
    fn adds_then_undos_leave_an_empty_registry(clients in client_batch()) {
        let mut registry = SocialRegistry::new();
        for (name, score) in &clients {
            registry.add_client(name, *score).unwrap();
        }
        prop_assert_eq!(registry.count(), clients.len());
        prop_assert_eq!(registry.tree().len(), clients.len());

        for _ in 0..clients.len() {
            prop_assert!(registry.undo().unwrap().is_some());
        }

        prop_assert_eq!(registry.count(), 0);
        prop_assert_eq!(registry.store().score_buckets(), 0);
        prop_assert!(registry.tree().is_empty());
        prop_assert_eq!(registry.tree().node_count(), 0);
        prop_assert!(registry.graph().is_empty());
        prop_assert_eq!(registry.history_len(), 0);
    }

    #[test]
    fn range_results_stay_sorted_and_in_bounds(
        clients in client_batch(),
        min in 0u32..200,
        span in 0u32..200,
    ) {
        let mut registry = SocialRegistry::new();
        for (name, score) in &clients {
            registry.add_client(name, *score).unwrap();
        }

        let max = min.saturating_add(span);
        let found = registry.clients_in_range(min, max);
        let expected = clients.iter().filter(|(_, s)| (min..=max).contains(s)).count();
        prop_assert_eq!(found.len(), expected);
        prop_assert!(found.windows(2).all(|w| w[0].score() <= w[1].score()));
        prop_assert!(found.iter().all(|c| (min..=max).contains(&c.score())));

        let inorder = registry.clients_by_tree_order();
        prop_assert_eq!(inorder.len(), clients.len());
        prop_assert!(inorder.windows(2).all(|w| w[0].score() <= w[1].score()));
    }

    #[test]
    fn connections_stay_symmetric(
        edges in prop::collection::vec((0usize..8, 0usize..8), 0..30),
    ) {
        let mut registry = SocialRegistry::new();
        let names: Vec<String> = (0..8).map(|i| format!("c{i}")).collect();
        for (i, name) in names.iter().enumerate() {
            registry.add_client(name, i as u32).unwrap();
        }
        for (a, b) in edges {
            let result = registry.connect(&names[a], &names[b]);
            prop_assert_eq!(result.is_err(), a == b);
        }

        for a in &names {
            for b in registry.neighbors(a).unwrap() {
                prop_assert!(registry.has_edge(b, a));
                prop_assert!(registry.client(a).unwrap().connections().contains(b));
                prop_assert_eq!(registry.distance(a, b).unwrap(), Some(1));
            }
            prop_assert!(!registry.has_edge(a, a));
        }
    }
}
