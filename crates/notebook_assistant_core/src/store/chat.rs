//! The cross-notebook chat history.

use crate::domain::{new_id, Message, NewMessage};
use crate::ports::{PersistenceService, PortResult};
use chrono::Utc;
use futures::lock::Mutex;
use std::sync::Arc;
use tracing::error;

pub struct ChatStore {
    persistence: Arc<dyn PersistenceService>,
    messages: Mutex<Vec<Message>>,
}

impl ChatStore {
    pub async fn load(persistence: Arc<dyn PersistenceService>) -> Self {
        let messages = persistence.load_chat_messages().await.unwrap_or_else(|e| {
            error!("Failed to load chat history, starting empty: {}", e);
            Vec::new()
        });
        Self {
            persistence,
            messages: Mutex::new(messages),
        }
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.messages.lock().await.clone()
    }

    /// Appends a message. Its id is unique across all chats, not just this one.
    pub async fn add_message(&self, fields: NewMessage) -> PortResult<Message> {
        let message = Message {
            id: new_id(),
            role: fields.role,
            content: fields.content,
            timestamp: Utc::now(),
            citations: fields.citations,
        };

        let mut messages = self.messages.lock().await;
        let mut next = messages.clone();
        next.push(message.clone());
        self.persistence.save_chat_messages(&next).await?;
        *messages = next;
        Ok(message)
    }

    pub async fn clear_messages(&self) -> PortResult<()> {
        let mut messages = self.messages.lock().await;
        self.persistence.save_chat_messages(&[]).await?;
        messages.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryPersistence;

    #[tokio::test]
    async fn messages_are_appended_persisted_and_cleared() {
        let persistence = Arc::new(MemoryPersistence::new());
        let chat = ChatStore::load(persistence.clone()).await;

        let first = chat.add_message(NewMessage::user("one")).await.unwrap();
        let second = chat
            .add_message(NewMessage::assistant("two", Vec::new()))
            .await
            .unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(chat.messages().await, vec![first.clone(), second.clone()]);
        assert_eq!(
            persistence.load_chat_messages().await.unwrap(),
            vec![first, second]
        );

        chat.clear_messages().await.unwrap();
        assert!(chat.messages().await.is_empty());
        assert!(persistence.load_chat_messages().await.unwrap().is_empty());
    }
}
