//! Conversations and messages
//!
//! Reduces a user's message history to the distinct people they talk to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Public profile fields shown in the conversation list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerProfile {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// A stored message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Option<Uuid>,
    pub receiver_id: Option<Uuid>,
    pub job_id: Option<Uuid>,
    pub proposal_id: Option<Uuid>,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
}

/// Participants of one message with their joined profiles
#[derive(Debug, Clone)]
pub struct ConversationMessage {
    pub sender_id: Option<Uuid>,
    pub receiver_id: Option<Uuid>,
    pub sender: Option<PartnerProfile>,
    pub receiver: Option<PartnerProfile>,
}

impl ConversationMessage {
    /// The other participant as seen from `user_id`, if their profile is known
    fn partner_of(&self, user_id: Uuid) -> Option<(Uuid, &PartnerProfile)> {
        if self.sender_id == Some(user_id) {
            self.receiver_id.zip(self.receiver.as_ref())
        } else if self.receiver_id == Some(user_id) {
            self.sender_id.zip(self.sender.as_ref())
        } else {
            None
        }
    }
}

/// Unique conversation partners in order of first appearance.
///
/// With messages sorted newest first, the most recent conversation comes
/// first. A later message for the same partner refreshes the profile but
/// keeps the position.
pub fn unique_partners(messages: &[ConversationMessage], user_id: Uuid) -> Vec<PartnerProfile> {
    let mut positions: HashMap<Uuid, usize> = HashMap::new();
    let mut partners: Vec<PartnerProfile> = Vec::new();

    for (partner_id, profile) in messages.iter().filter_map(|m| m.partner_of(user_id)) {
        match positions.get(&partner_id) {
            Some(&idx) => partners[idx] = profile.clone(),
            None => {
                positions.insert(partner_id, partners.len());
                partners.push(profile.clone());
            }
        }
    }

    partners
}
