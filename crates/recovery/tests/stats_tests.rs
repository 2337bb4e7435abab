//! Tests for the dashboard aggregates.

mod common;

use cart_recovery::dispatcher::process_pending_reminders_at;
use cart_recovery::recovery::mark_recovered_at;
use cart_recovery::stats::recovery_stats;
use cart_recovery::tracker::track_abandonment_at;
use common::{FakeCarts, FakeContacts, RecordingSender, line_item, resources_with, setup_db};
use rust_decimal::Decimal;
use time::macros::datetime;

#[tokio::test]
async fn empty_database_yields_zeroed_stats() {
    let db = setup_db().await;
    let stats = recovery_stats(&db).await.unwrap();

    assert_eq!(stats.abandoned_carts, 0);
    assert_eq!(stats.recovered_carts, 0);
    assert_eq!(stats.expired_carts, 0);
    assert_eq!(stats.recovery_rate, 0.0);
    assert_eq!(stats.total_abandoned_value, Decimal::ZERO);
    assert_eq!(stats.average_abandoned_value, Decimal::ZERO);
    assert_eq!(stats.reminders.pending, 0);
}

#[tokio::test]
async fn mixed_population_is_aggregated() {
    let carts = FakeCarts::with_items(1, vec![line_item(10, "10.00", 1)]);
    carts.set(2, vec![line_item(20, "15.00", 2)]);
    carts.set(3, vec![line_item(30, "5.00", 1)]);
    // Only user 1 has a contact address; user 2's first reminder will fail.
    let contacts = FakeContacts::with_contact(1, "alex@example.com", "Alex");
    let resources = resources_with(carts, contacts, RecordingSender::accepting()).await;

    let t0 = datetime!(2025-01-01 00:00 UTC);
    for user_id in [1, 2, 3] {
        track_abandonment_at(&resources, user_id, t0).await.unwrap();
    }

    // User 3 checks out; users 1 and 2 get a dispatch pass.
    mark_recovered_at(&resources, 3, datetime!(2025-01-01 00:30 UTC))
        .await
        .unwrap();
    process_pending_reminders_at(&resources, datetime!(2025-01-01 01:05 UTC))
        .await
        .unwrap();

    let stats = recovery_stats(resources.db.as_ref()).await.unwrap();
    assert_eq!(stats.abandoned_carts, 2);
    assert_eq!(stats.recovered_carts, 1);
    assert_eq!(stats.expired_carts, 0);
    assert!((stats.recovery_rate - 1.0 / 3.0).abs() < 1e-9);

    // Users 1 (10.00) and 2 (30.00) are still abandoned.
    assert_eq!(stats.total_abandoned_value, Decimal::new(4000, 2));
    assert_eq!(stats.average_abandoned_value, Decimal::new(2000, 2));

    // 3 tasks cancelled (user 3), 1 sent (user 1 first), 1 failed (user 2
    // first, no contact), 4 still pending.
    assert_eq!(stats.reminders.sent, 1);
    assert_eq!(stats.reminders.failed, 1);
    assert_eq!(stats.reminders.cancelled, 3);
    assert_eq!(stats.reminders.pending, 4);
}
