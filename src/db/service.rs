// Database services for proposals, earnings, messages, notifications and
// platform totals
//
// Every user-facing query is scoped to the owning user id taken from the
// verified token.

use crate::analytics::{Earning, EarningStatus, Proposal, ProposalStatus};
use crate::conversations::{ConversationMessage, Message, PartnerProfile};
use crate::db::queries::{
    INSERT_EARNING, INSERT_MESSAGE, INSERT_NOTIFICATION, LIST_CONVERSATION_MESSAGES,
    LIST_EARNINGS, LIST_NOTIFICATIONS, LIST_PROPOSALS, LIST_THREAD, MARK_NOTIFICATIONS_READ,
    PLATFORM_STATS, PROFILE_FULL_NAME, UPDATE_EARNING_STATUS, UPDATE_PROPOSAL,
};
use crate::error::{not_found_error, AppError};
use crate::notifications::{new_message_notice, Notification, NEW_MESSAGE_KIND};
use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;
use serde::Serialize;
use tokio_postgres::Row;
use tracing::{debug, info};
use uuid::Uuid;

// Fields a proposal update may change; None keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct ProposalUpdate {
    pub status: Option<ProposalStatus>,
    pub estimated_value: Option<f64>,
    pub actual_value: Option<f64>,
    pub completion_date: Option<DateTime<Utc>>,
}

// A new earning record
#[derive(Debug, Clone)]
pub struct NewEarning {
    pub amount: f64,
    pub description: Option<String>,
    pub proposal_id: Option<Uuid>,
    pub status: EarningStatus,
}

// A message to send
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub receiver_id: Uuid,
    pub content: String,
    pub job_id: Option<Uuid>,
    pub proposal_id: Option<Uuid>,
}

// Platform-wide totals
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub users: i64,
    pub jobs: i64,
    pub applications: i64,
    pub completed_jobs: i64,
    pub earnings: f64,
}

fn proposal_from_row(row: &Row) -> Proposal {
    let status: String = row.get("status");
    Proposal {
        id: row.get("id"),
        title: row.get("title"),
        status: ProposalStatus::from(status.as_str()),
        created_at: row.get("created_at"),
        estimated_value: row.get("estimated_value"),
        actual_value: row.get("actual_value"),
        completion_date: row.get("completion_date"),
    }
}

fn earning_from_row(row: &Row) -> Earning {
    let status: String = row.get("status");
    Earning {
        id: row.get("id"),
        amount: row.get("amount"),
        status: EarningStatus::from(status.as_str()),
        created_at: row.get("created_at"),
        description: row.get("description"),
        proposal_id: row.get("proposal_id"),
        payment_date: row.get("payment_date"),
    }
}

fn message_from_row(row: &Row) -> Message {
    Message {
        id: row.get("id"),
        sender_id: row.get("sender_id"),
        receiver_id: row.get("receiver_id"),
        job_id: row.get("job_id"),
        proposal_id: row.get("proposal_id"),
        content: row.get("content"),
        file_url: row.get("file_url"),
        sent_at: row.get("sent_at"),
    }
}

fn notification_from_row(row: &Row) -> Notification {
    Notification {
        id: row.get("id"),
        user_id: row.get("user_id"),
        kind: row.get("type"),
        content: row.get("content"),
        is_read: row.get("is_read"),
        created_at: row.get("created_at"),
    }
}

fn profile_from_row(row: &Row, prefix: &str) -> Option<PartnerProfile> {
    let id: Option<Uuid> = row.get(format!("{}_profile_id", prefix).as_str());
    id.map(|id| PartnerProfile {
        id,
        full_name: row.get(format!("{}_full_name", prefix).as_str()),
        avatar_url: row.get(format!("{}_avatar_url", prefix).as_str()),
    })
}

// Proposal service for database operations
pub struct ProposalService {
    pool: Pool,
}

impl ProposalService {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    // List a user's proposals, newest first
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        status: Option<ProposalStatus>,
    ) -> Result<Vec<Proposal>, AppError> {
        let client = self.pool.get().await?;
        let status = status.map(|s| s.as_str());

        let rows = client.query(LIST_PROPOSALS, &[&user_id, &status]).await?;
        debug!("Loaded {} proposals for user {}", rows.len(), user_id);

        Ok(rows.iter().map(proposal_from_row).collect())
    }

    // Update status and values of a proposal owned by the user
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: &ProposalUpdate,
    ) -> Result<Proposal, AppError> {
        let client = self.pool.get().await?;
        let status = update.status.map(|s| s.as_str());

        let row = client
            .query_opt(
                UPDATE_PROPOSAL,
                &[
                    &id,
                    &user_id,
                    &status,
                    &update.estimated_value,
                    &update.actual_value,
                    &update.completion_date,
                ],
            )
            .await?
            .ok_or_else(|| not_found_error(format!("Proposal {} not found", id)))?;

        Ok(proposal_from_row(&row))
    }
}

// Earning service for database operations
pub struct EarningService {
    pool: Pool,
}

impl EarningService {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    // List a user's earnings, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Earning>, AppError> {
        let client = self.pool.get().await?;

        let rows = client.query(LIST_EARNINGS, &[&user_id]).await?;
        debug!("Loaded {} earnings for user {}", rows.len(), user_id);

        Ok(rows.iter().map(earning_from_row).collect())
    }

    // Record an earning for the user
    pub async fn create(&self, user_id: Uuid, earning: &NewEarning) -> Result<Earning, AppError> {
        let client = self.pool.get().await?;

        let row = client
            .query_one(
                INSERT_EARNING,
                &[
                    &user_id,
                    &earning.amount,
                    &earning.description,
                    &earning.proposal_id,
                    &earning.status.as_str(),
                ],
            )
            .await?;

        Ok(earning_from_row(&row))
    }

    // Change the status of an earning owned by the user
    pub async fn update_status(
        &self,
        user_id: Uuid,
        id: Uuid,
        status: EarningStatus,
        payment_date: Option<DateTime<Utc>>,
    ) -> Result<Earning, AppError> {
        let client = self.pool.get().await?;

        let row = client
            .query_opt(
                UPDATE_EARNING_STATUS,
                &[&id, &user_id, &status.as_str(), &payment_date],
            )
            .await?
            .ok_or_else(|| not_found_error(format!("Earning {} not found", id)))?;

        Ok(earning_from_row(&row))
    }
}

// Message service for conversation lookups
pub struct MessageService {
    pool: Pool,
}

impl MessageService {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    // Messages the user sent or received, newest first
    pub async fn messages_for_user(&self, user_id: Uuid) -> Result<Vec<ConversationMessage>, AppError> {
        let client = self.pool.get().await?;

        let rows = client.query(LIST_CONVERSATION_MESSAGES, &[&user_id]).await?;

        Ok(rows
            .iter()
            .map(|row| ConversationMessage {
                sender_id: row.get("sender_id"),
                receiver_id: row.get("receiver_id"),
                sender: profile_from_row(row, "sender"),
                receiver: profile_from_row(row, "receiver"),
            })
            .collect())
    }

    // Messages between the user and one partner, oldest first
    pub async fn thread(&self, user_id: Uuid, partner_id: Uuid) -> Result<Vec<Message>, AppError> {
        let client = self.pool.get().await?;

        let rows = client.query(LIST_THREAD, &[&user_id, &partner_id]).await?;
        debug!("Loaded {} messages between {} and {}", rows.len(), user_id, partner_id);

        Ok(rows.iter().map(message_from_row).collect())
    }

    // Store a message and notify the receiver in one transaction.
    // `fallback_name` is used when the sender has no profile name.
    pub async fn send(
        &self,
        sender_id: Uuid,
        fallback_name: Option<&str>,
        message: &NewMessage,
    ) -> Result<Message, AppError> {
        let mut client = self.pool.get().await?;
        let transaction = client.transaction().await?;

        if transaction
            .query_opt(PROFILE_FULL_NAME, &[&message.receiver_id])
            .await?
            .is_none()
        {
            return Err(not_found_error(format!(
                "User {} not found",
                message.receiver_id
            )));
        }

        let sender_name: Option<String> = transaction
            .query_opt(PROFILE_FULL_NAME, &[&sender_id])
            .await?
            .and_then(|row| row.get("full_name"));

        let row = transaction
            .query_one(
                INSERT_MESSAGE,
                &[
                    &sender_id,
                    &message.receiver_id,
                    &message.content,
                    &message.job_id,
                    &message.proposal_id,
                ],
            )
            .await?;

        let notice = new_message_notice(sender_name.as_deref().or(fallback_name));
        transaction
            .execute(
                INSERT_NOTIFICATION,
                &[&message.receiver_id, &NEW_MESSAGE_KIND, &notice],
            )
            .await?;

        transaction.commit().await?;

        let sent = message_from_row(&row);
        info!("Message {} sent from {} to {}", sent.id, sender_id, message.receiver_id);

        Ok(sent)
    }
}

// Notification service for the notification bell
pub struct NotificationService {
    pool: Pool,
}

impl NotificationService {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    // The user's notifications, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, AppError> {
        let client = self.pool.get().await?;

        let rows = client.query(LIST_NOTIFICATIONS, &[&user_id]).await?;

        Ok(rows.iter().map(notification_from_row).collect())
    }

    // Mark every unread notification as read; returns how many changed
    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, AppError> {
        let client = self.pool.get().await?;

        let updated = client.execute(MARK_NOTIFICATIONS_READ, &[&user_id]).await?;
        debug!("Marked {} notifications read for user {}", updated, user_id);

        Ok(updated)
    }
}

// Platform totals for administrators
pub struct PlatformService {
    pool: Pool,
}

impl PlatformService {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    pub async fn stats(&self) -> Result<PlatformStats, AppError> {
        let client = self.pool.get().await?;
        let row = client.query_one(PLATFORM_STATS, &[]).await?;

        Ok(PlatformStats {
            users: row.get("users"),
            jobs: row.get("jobs"),
            applications: row.get("applications"),
            completed_jobs: row.get("completed_jobs"),
            earnings: row.get("earnings"),
        })
    }
}
