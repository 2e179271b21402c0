//! Message request models

use crate::db::NewMessage;
use crate::error::{validation_error, AppError};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Request to send a message
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub receiver_id: Uuid,
    #[validate(length(min = 1, max = 5000, message = "Message must be between 1 and 5000 characters"))]
    pub content: String,
    pub job_id: Option<Uuid>,
    pub proposal_id: Option<Uuid>,
}

impl SendMessageRequest {
    /// Validate and convert into a storable message from `sender_id`
    pub fn into_new_message(self, sender_id: Uuid) -> Result<NewMessage, AppError> {
        self.validate().map_err(|e| validation_error(e.to_string()))?;

        if self.receiver_id == sender_id {
            return Err(validation_error("Cannot send a message to yourself"));
        }

        let content = self.content.trim();
        if content.is_empty() {
            return Err(validation_error("Message must not be blank"));
        }

        Ok(NewMessage {
            receiver_id: self.receiver_id,
            content: content.to_string(),
            job_id: self.job_id,
            proposal_id: self.proposal_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(receiver_id: Uuid, content: &str) -> SendMessageRequest {
        SendMessageRequest {
            receiver_id,
            content: content.to_string(),
            job_id: None,
            proposal_id: None,
        }
    }

    #[test]
    fn test_message_content_trimmed() {
        let receiver = Uuid::new_v4();
        let message = request(receiver, "  Invoice attached  ")
            .into_new_message(Uuid::new_v4())
            .unwrap();

        assert_eq!(message.receiver_id, receiver);
        assert_eq!(message.content, "Invoice attached");
    }

    #[test]
    fn test_blank_or_empty_message_rejected() {
        let sender = Uuid::new_v4();
        assert!(request(Uuid::new_v4(), "").into_new_message(sender).is_err());
        assert!(request(Uuid::new_v4(), "   ").into_new_message(sender).is_err());
    }

    #[test]
    fn test_message_to_self_rejected() {
        let me = Uuid::new_v4();
        let err = request(me, "hello").into_new_message(me).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_deserializes_camel_case() {
        let request: SendMessageRequest = serde_json::from_str(
            r#"{"receiverId": "6f1c2f0e-2f43-4a59-9a39-5d2f3c7b9b10", "content": "Hi", "jobId": null}"#,
        )
        .unwrap();

        assert_eq!(request.content, "Hi");
        assert!(request.job_id.is_none());
    }
}
