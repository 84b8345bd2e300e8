//! Bulk-execution child lifecycle against a real Postgres instance: the
//! pending rows inserted ahead of dispatch, concurrent partial acks
//! reconciling the parent counters, and the liveness sweep demoting a
//! child that never acked. Gated behind `sqlx::test`, so these require
//! `DATABASE_URL` to point at a reachable Postgres server to run.

use mdm_db::{BulkRepository, DeviceRepository, DispatchRepository};
use mdm_domain::dispatch::{BulkMode, DispatchAction};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

async fn enroll(devices: &DeviceRepository, device_id: &str) {
    devices
        .enroll(device_id, &format!("{device_id}-alias"), &format!("{device_id}-token"), "hash", None, None, 20)
        .await
        .expect("enroll device");
}

/// A `bulk_execution_result` row foreign-keys its `request_id` against
/// `command_dispatch`, so every child fixture needs a dispatch row created
/// first, the same order the fixed handler now follows.
async fn dispatch_row(dispatch_repo: &DispatchRepository, device_id: &str) -> Uuid {
    let request_id = Uuid::new_v4();
    dispatch_repo
        .create(request_id, device_id, DispatchAction::Ping, &json!({}), "hash", None)
        .await
        .expect("create command_dispatch row");
    request_id
}

#[sqlx::test(migrations = "../../libs/infra/db-turso/migrations")]
async fn pending_children_are_inserted_before_any_ack(pool: PgPool) {
    let devices = DeviceRepository::new(pool.clone());
    let dispatch_repo = DispatchRepository::new(pool.clone());
    let bulk = BulkRepository::new(pool.clone());
    let exec_id = Uuid::new_v4();
    let device_ids: Vec<String> = (0..4).map(|i| format!("dev-bulk-{i}")).collect();

    bulk.create(exec_id, BulkMode::Push, &json!({"action": "ping"}), &json!({"resolved_count": 4}), device_ids.len() as i32)
        .await
        .expect("create parent row");

    for device_id in &device_ids {
        enroll(&devices, device_id).await;
        let request_id = dispatch_row(&dispatch_repo, device_id).await;
        bulk.insert_pending_child(exec_id, device_id, request_id)
            .await
            .expect("insert pending child");
    }

    let pending_count: (i64,) = sqlx::query_as(
        "SELECT count(*) FROM bulk_execution_result WHERE exec_id = $1 AND status = 'pending'",
    )
    .bind(exec_id)
    .fetch_one(&pool)
    .await
    .expect("count pending children");
    assert_eq!(pending_count.0, 4, "every target device gets a pending child row up front, before any dispatch outcome is known");

    let parent = bulk.get(exec_id).await.expect("fetch parent");
    assert_eq!(parent.sent, 4);
    assert_eq!(parent.acked, 0);
    assert_eq!(parent.errored, 0);
}

#[sqlx::test(migrations = "../../libs/infra/db-turso/migrations")]
async fn partial_acks_reconcile_parent_counters_and_complete(pool: PgPool) {
    let devices = DeviceRepository::new(pool.clone());
    let dispatch_repo = DispatchRepository::new(pool.clone());
    let bulk = BulkRepository::new(pool.clone());
    let exec_id = Uuid::new_v4();
    let device_ids: Vec<String> = (0..4).map(|i| format!("dev-ack-{i}")).collect();

    bulk.create(exec_id, BulkMode::Push, &json!({"action": "ping"}), &json!({}), device_ids.len() as i32)
        .await
        .expect("create parent row");
    for device_id in &device_ids {
        enroll(&devices, device_id).await;
        let request_id = dispatch_row(&dispatch_repo, device_id).await;
        bulk.insert_pending_child(exec_id, device_id, request_id).await.expect("insert pending child");
    }

    // First two ack ok, last two error. The parent starts `running` and
    // flips to `completed` only once acked+errored == sent.
    bulk.apply_child_ack(exec_id, &device_ids[0], true, "ok", Some(0), Some("ok"), None)
        .await
        .expect("ack 0");
    bulk.apply_child_ack(exec_id, &device_ids[1], true, "ok", Some(0), Some("ok"), None)
        .await
        .expect("ack 1");

    let mid = bulk.get(exec_id).await.expect("fetch mid-flight parent");
    assert_eq!(mid.acked, 2);
    assert_eq!(mid.errored, 0);
    assert_eq!(mid.status, mdm_domain::dispatch::BulkStatus::Running, "not every child has acked yet");

    bulk.apply_child_ack(exec_id, &device_ids[2], false, "failed", Some(1), None, Some("device reported failure"))
        .await
        .expect("error 2");
    bulk.apply_child_ack(exec_id, &device_ids[3], false, "failed", Some(1), None, Some("device reported failure"))
        .await
        .expect("error 3");

    let done = bulk.get(exec_id).await.expect("fetch completed parent");
    assert_eq!(done.acked, 2);
    assert_eq!(done.errored, 2);
    assert_eq!(done.acked + done.errored, done.sent, "counters must never exceed sent, and must sum to it once every child is terminal");
    assert_eq!(done.status, mdm_domain::dispatch::BulkStatus::Completed);
}

#[sqlx::test(migrations = "../../libs/infra/db-turso/migrations")]
async fn duplicate_ack_on_already_terminal_child_is_a_no_op(pool: PgPool) {
    let devices = DeviceRepository::new(pool.clone());
    let dispatch_repo = DispatchRepository::new(pool.clone());
    let bulk = BulkRepository::new(pool.clone());
    let exec_id = Uuid::new_v4();
    enroll(&devices, "dev-dup").await;
    bulk.create(exec_id, BulkMode::Push, &json!({}), &json!({}), 1).await.expect("create parent row");
    let request_id = dispatch_row(&dispatch_repo, "dev-dup").await;
    bulk.insert_pending_child(exec_id, "dev-dup", request_id).await.expect("insert pending child");

    let first = bulk.apply_child_ack(exec_id, "dev-dup", true, "ok", Some(0), None, None).await.expect("first ack");
    assert!(first, "first ack on a pending child applies");

    let second = bulk.apply_child_ack(exec_id, "dev-dup", true, "ok", Some(0), None, None).await.expect("second ack");
    assert!(!second, "re-acking an already-terminal child must not double count");

    let parent = bulk.get(exec_id).await.expect("fetch parent");
    assert_eq!(parent.acked, 1, "the counter bumps exactly once despite two ack attempts");
}

#[sqlx::test(migrations = "../../libs/infra/db-turso/migrations")]
async fn liveness_sweep_finds_only_children_past_the_window(pool: PgPool) {
    let devices = DeviceRepository::new(pool.clone());
    let dispatch_repo = DispatchRepository::new(pool.clone());
    let bulk = BulkRepository::new(pool.clone());
    let exec_id = Uuid::new_v4();
    enroll(&devices, "dev-stale").await;
    enroll(&devices, "dev-fresh").await;
    bulk.create(exec_id, BulkMode::Push, &json!({}), &json!({}), 2).await.expect("create parent row");

    let stale_request_id = dispatch_row(&dispatch_repo, "dev-stale").await;
    bulk.insert_pending_child(exec_id, "dev-stale", stale_request_id).await.expect("insert stale child");
    let fresh_request_id = dispatch_row(&dispatch_repo, "dev-fresh").await;
    bulk.insert_pending_child(exec_id, "dev-fresh", fresh_request_id).await.expect("insert fresh child");

    // Backdate only the first child past the liveness window; the second
    // stays freshly inserted and must not be swept.
    sqlx::query("UPDATE bulk_execution_result SET created_at = now() - interval '120 seconds' WHERE exec_id = $1 AND device_id = $2")
        .bind(exec_id)
        .bind("dev-stale")
        .execute(&pool)
        .await
        .expect("backdate stale child");

    let stalled = bulk.list_stalled(60).await.expect("list stalled");
    assert_eq!(stalled.len(), 1, "only the backdated child is past the 60-second window");
    assert_eq!(stalled[0].1, "dev-stale");

    let applied = bulk
        .apply_child_ack(exec_id, &stalled[0].1, false, "timeout", None, None, Some("liveness timeout"))
        .await
        .expect("demote stalled child");
    assert!(applied, "the stalled child transitions out of pending into timeout");

    let parent = bulk.get(exec_id).await.expect("fetch parent");
    assert_eq!(parent.errored, 1, "a liveness timeout counts against errored, not acked");
}
