use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

/// A notification to be persisted for an external delivery worker.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_id: Uuid,
    pub kind: &'static str,
    pub title: String,
    pub message: String,
}

/// Notification sink. Delivery itself (email, push) is an external concern;
/// this seam only records what should be delivered.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, note: NewNotification) -> anyhow::Result<()>;
}

/// Persists notifications as rows in the `notifications` table.
pub struct PgNotifier {
    pool: PgPool,
}

impl PgNotifier {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Notifier for PgNotifier {
    async fn notify(&self, note: NewNotification) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (id, recipient_id, kind, title, message)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(note.recipient_id)
        .bind(note.kind)
        .bind(&note.title)
        .bind(&note.message)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// Fire-and-forget dispatch. A notification failure must never fail a request
/// whose state transition already committed; it is logged and dropped.
pub async fn dispatch(notifier: &dyn Notifier, note: NewNotification) {
    let kind = note.kind;
    let recipient = note.recipient_id;
    if let Err(e) = notifier.notify(note).await {
        warn!("Failed to record {kind} notification for {recipient}: {e:#}");
    }
}

/// Best-effort audit-log write, same contract as notifications: logged on
/// failure, never surfaced.
pub async fn record_activity(
    pool: &PgPool,
    actor_id: Uuid,
    action: &str,
    entity_type: &str,
    entity_id: Uuid,
    detail: serde_json::Value,
) {
    let result = sqlx::query(
        r#"
        INSERT INTO activity_log (id, actor_id, action, entity_type, entity_id, detail)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(actor_id)
    .bind(action)
    .bind(entity_type)
    .bind(entity_id)
    .bind(detail)
    .execute(pool)
    .await;

    if let Err(e) = result {
        warn!("Failed to record activity '{action}' for {entity_type} {entity_id}: {e}");
    }
}
