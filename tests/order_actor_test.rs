use order_pipeline::clients::{ActorClient, RosterClient};
use order_pipeline::model::{MenuItem, Order, OrderId, OrderStatus};

fn order(id: u64) -> Order {
    let mut order = Order::new(OrderId(id));
    order.add_item(MenuItem::new("Katsu", 95.0), 1);
    order
}

async fn status(roster: &RosterClient, id: u64) -> OrderStatus {
    roster
        .get(OrderId(id))
        .await
        .expect("roster alive")
        .expect("order present")
        .status()
}

/// Real roster actor exercised through its client.
#[tokio::test]
async fn test_roster_actor_transitions() {
    let (roster_actor, roster) = order_pipeline::order_actor::new(8);
    let actor_handle = tokio::spawn(roster_actor.run(()));

    // Insertion order is kept and ids are unique.
    for id in [30, 10, 20] {
        assert!(roster.insert(order(id)).await.expect("insert"));
    }
    assert!(!roster.insert(order(10)).await.expect("insert"));
    let ids: Vec<u64> = roster
        .list()
        .await
        .expect("list")
        .iter()
        .map(|o| o.id().0)
        .collect();
    assert_eq!(ids, vec![30, 10, 20]);

    // Oldest waiting means first inserted, not smallest id.
    assert_eq!(
        roster.start_next_waiting().await.expect("start"),
        Some(OrderId(30))
    );
    assert_eq!(status(&roster, 30).await, OrderStatus::Processing);

    // The processing slot is exclusive.
    assert!(!roster.start_processing(OrderId(10)).await.expect("start"));
    assert_eq!(roster.start_next_waiting().await.expect("start"), None);
    let mut second = order(40);
    second.start_processing();
    assert!(!roster.insert(second).await.expect("insert"));
    assert!(roster.get(OrderId(40)).await.expect("get").is_none());

    // Starting the processing order again is harmless.
    assert!(roster.start_processing(OrderId(30)).await.expect("start"));

    // complete needs PROCESSING; force_complete does not.
    assert!(!roster.complete(OrderId(10)).await.expect("complete"));
    assert!(roster.complete(OrderId(30)).await.expect("complete"));
    assert!(roster.force_complete(OrderId(20)).await.expect("force"));
    assert_eq!(status(&roster, 20).await, OrderStatus::Completed);

    // Slot is free again.
    assert_eq!(
        roster.start_next_waiting().await.expect("start"),
        Some(OrderId(10))
    );
    assert!(roster.cancel(OrderId(10)).await.expect("cancel"));
    assert!(!roster.force_complete(OrderId(10)).await.expect("force"));
    assert_eq!(status(&roster, 10).await, OrderStatus::Cancelled);
    assert!(roster.processing_order().await.expect("list").is_none());

    // Cleanup
    drop(roster);
    actor_handle.await.unwrap();
}
