//! End-to-end behaviour of the registry through its public surface.

use anyhow::Result;
use social_registry::history::ActionKind;
use social_registry::{Client, ErrorKind, SocialRegistry};

fn names(clients: Vec<&Client>) -> Vec<&str> {
    clients.into_iter().map(Client::name).collect()
}

fn registry_with(clients: &[(&str, u32)]) -> Result<SocialRegistry> {
    let mut registry = SocialRegistry::new();
    for (name, score) in clients {
        registry.add_client(name, *score)?;
    }
    Ok(registry)
}

#[test]
fn test_ana_bob_demo_scenario() -> Result<()> {
    let mut registry = registry_with(&[("Ana", 95), ("Bob", 80)])?;

    assert_eq!(names(registry.clients_in_range(0, 100)), vec!["Bob", "Ana"]);
    assert_eq!(names(registry.clients_with_score(95)), vec!["Ana"]);

    let before = registry.count();
    registry.add_client("Demo", 42)?;
    assert_eq!(registry.count(), before + 1);

    registry.undo()?;
    assert!(registry.client("Demo").is_none());
    assert_eq!(registry.count(), before);
    assert!(registry.clients_with_score(42).is_empty());
    Ok(())
}

#[test]
fn test_requests_are_delivered_in_fifo_order() -> Result<()> {
    let mut registry = registry_with(&[("A", 1), ("B", 2)])?;
    registry.request_follow("A", "B")?;
    registry.request_follow("B", "A")?;
    assert_eq!(registry.pending_count(), 2);

    let first = registry.process_next_request().expect("first request");
    let second = registry.process_next_request().expect("second request");
    assert_eq!((first.requester.as_str(), first.target.as_str()), ("A", "B"));
    assert_eq!((second.requester.as_str(), second.target.as_str()), ("B", "A"));
    assert!(registry.process_next_request().is_none());
    Ok(())
}

#[test]
fn test_undo_reverses_in_lifo_order() -> Result<()> {
    let mut registry = SocialRegistry::new();
    registry.add_client("A", 10)?;
    registry.add_client("B", 20)?;
    registry.request_follow("A", "B")?;

    let history: Vec<_> = registry.history(10).iter().map(|a| a.label()).collect();
    assert_eq!(history, vec!["REQUEST_FOLLOW", "ADD_CLIENT", "ADD_CLIENT"]);

    let kinds: Vec<ActionKind> = (0..3)
        .map(|_| registry.undo().map(|a| a.expect("action").kind))
        .collect::<Result<_, _>>()?;

    assert!(matches!(&kinds[0], ActionKind::RequestFollow(r) if r.requester == "A" && r.target == "B"));
    assert_eq!(kinds[1], ActionKind::AddClient("B".into()));
    assert_eq!(kinds[2], ActionKind::AddClient("A".into()));

    assert_eq!(registry.pending_count(), 0);
    assert_eq!(registry.count(), 0);
    assert!(registry.undo()?.is_none());
    Ok(())
}

#[test]
fn test_third_follow_is_rejected() -> Result<()> {
    let mut registry = registry_with(&[("A", 1), ("B", 2), ("C", 3), ("D", 4)])?;
    registry.confirm_follow("A", "B")?;
    registry.confirm_follow("A", "C")?;

    let err = registry.confirm_follow("A", "D").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let a = registry.client("A").expect("A");
    assert_eq!(a.following().len(), 2);
    assert_eq!(registry.client("D").expect("D").followers(), 0);
    Ok(())
}

#[test]
fn test_distance_along_a_path() -> Result<()> {
    let mut registry = registry_with(&[("A", 1), ("B", 2), ("C", 3), ("D", 4), ("E", 5)])?;
    registry.connect("A", "B")?;
    registry.connect("B", "C")?;
    registry.connect("C", "D")?;

    assert_eq!(registry.distance("A", "D")?, Some(3));
    assert_eq!(registry.distance("A", "A")?, Some(0));
    assert_eq!(registry.distance("A", "E")?, None);

    let err = registry.distance("A", "Nobody").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    Ok(())
}

#[test]
fn test_distance_prefers_the_shorter_side_of_a_cycle() -> Result<()> {
    let mut registry = registry_with(&[("A", 1), ("B", 2), ("C", 3), ("D", 4)])?;
    for (a, b) in [("A", "B"), ("B", "C"), ("C", "D"), ("D", "A")] {
        registry.connect(a, b)?;
    }

    assert_eq!(registry.distance("A", "C")?, Some(2));
    assert_eq!(registry.edge_count(), 4);
    assert!(registry.has_edge("A", "D"));
    assert!(registry.has_edge("D", "A"));
    Ok(())
}

#[test]
fn test_undo_after_delivery_reports_corruption() -> Result<()> {
    let mut registry = registry_with(&[("A", 1), ("B", 2)])?;
    registry.request_follow("A", "B")?;
    let delivered = registry.process_next_request().expect("request");
    registry.confirm_follow(&delivered.requester, &delivered.target)?;

    let err = registry.undo().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HistoryCorruption);
    // The confirmed follow is untouched.
    assert!(registry.client("A").expect("A").is_following("B"));
    Ok(())
}

#[test]
fn test_tree_views_after_mixed_inserts() -> Result<()> {
    let registry = registry_with(&[
        ("m", 50),
        ("f", 30),
        ("t", 70),
        ("c", 20),
        ("h", 40),
        ("w", 80),
        ("h2", 40),
    ])?;

    assert_eq!(registry.tree_height(), 2);
    assert_eq!(names(registry.clients_at_depth(2)), vec!["c", "h", "h2", "w"]);
    assert!(registry.level_four_by_followers().is_empty());
    assert_eq!(
        names(registry.clients_by_tree_order()),
        vec!["c", "f", "h", "h2", "m", "t", "w"]
    );
    Ok(())
}
