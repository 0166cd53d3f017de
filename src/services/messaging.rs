// src/services/messaging.rs
//
// Append-only channel log per team plus a live broadcast fan-out.
// Subscribers only see messages posted after they subscribed; callers
// combine `history` with `subscribe` and de-duplicate by message id.
use crate::models::{Message, ServiceError, User};
use crate::storage::{message_collection, KeyLockRegistry, Store};
use chrono::Utc;
use log::{error, info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 256;

// Append writes lock the whole channel; one logical writer per log.
const LOG_LOCK_KEY: &str = "log";

// One broadcast channel per team, created lazily on first subscription.
// At-least-once delivery; a slow subscriber that lags past the channel
// capacity loses its oldest undelivered messages.
#[derive(Clone)]
pub struct MessageHub {
    senders: Arc<Mutex<HashMap<String, broadcast::Sender<Message>>>>,
}

impl MessageHub {
    pub fn new() -> Self {
        Self {
            senders: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn subscribe(&self, team_id: &str) -> Result<broadcast::Receiver<Message>, ServiceError> {
        let mut senders = self.senders.lock().map_err(|e| {
            error!("Message hub poisoned: {:?}", e);
            ServiceError::Internal
        })?;

        let sender = senders
            .entry(team_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);

        Ok(sender.subscribe())
    }

    // Fan a freshly persisted message out to live subscribers. A channel
    // with no subscribers simply drops the message; history covers replay.
    fn publish(&self, team_id: &str, message: Message) {
        let senders = match self.senders.lock() {
            Ok(senders) => senders,
            Err(e) => {
                error!("Message hub poisoned during publish: {:?}", e);
                return;
            }
        };

        if let Some(sender) = senders.get(team_id) {
            if sender.send(message).is_err() {
                warn!("No live subscribers on team {}", team_id);
            }
        }
    }
}

impl Default for MessageHub {
    fn default() -> Self {
        Self::new()
    }
}

// Next sequence number for a channel, read off the highest stored key
// without replaying message contents. Keys are zero-padded, so the
// lexicographically last key carries the highest sequence.
fn next_seq(store: &dyn Store, collection: &str) -> Result<u64, ServiceError> {
    let last = match store.last_key(collection)? {
        Some(key) => key,
        None => return Ok(0),
    };

    let seq = last
        .split('-')
        .next()
        .and_then(|prefix| prefix.parse::<u64>().ok())
        .ok_or_else(|| {
            error!("Malformed message key in {}: {}", collection, last);
            ServiceError::StoreUnavailable
        })?;

    Ok(seq + 1)
}

fn decode_message(bytes: &[u8]) -> Result<Message, ServiceError> {
    serde_json::from_slice(bytes).map_err(|e| {
        error!("Failed to parse stored message: {:?}", e);
        ServiceError::StoreUnavailable
    })
}

// Append a message to the team channel, persist it, then broadcast it.
// The sequence number is assigned under the channel lock so concurrent
// posters cannot collide on a key.
pub fn post(
    store: &dyn Store,
    locks: &KeyLockRegistry,
    hub: &MessageHub,
    team_id: &str,
    sender: &User,
    text: &str,
) -> Result<Message, ServiceError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ServiceError::EmptyMessage);
    }

    let collection = message_collection(team_id);

    let message = {
        let lock = locks.lock_for(&collection, LOG_LOCK_KEY)?;
        let _guard = lock.lock().map_err(|_| ServiceError::Internal)?;

        let seq = next_seq(store, &collection)?;

        let message = Message {
            id: Uuid::new_v4().to_string(),
            sender_id: sender.id.clone(),
            text: text.to_string(),
            sent_at: Utc::now(),
            seq,
        };

        let bytes = serde_json::to_vec(&message).map_err(|e| {
            error!("Failed to serialize message: {:?}", e);
            ServiceError::Internal
        })?;

        // Zero-padded sequence keeps the scan order equal to append order.
        let key = format!("{:010}-{}", seq, message.id);
        store.put(&collection, &key, &bytes)?;

        message
    };

    hub.publish(team_id, message.clone());

    info!("💬 Message {} posted on team {}", message.id, team_id);

    Ok(message)
}

// Full replay of a team channel in (sent_at, seq) order.
pub fn history(store: &dyn Store, team_id: &str) -> Result<Vec<Message>, ServiceError> {
    let collection = message_collection(team_id);
    let mut messages = Vec::new();

    for (_, bytes) in store.scan(&collection)? {
        messages.push(decode_message(&bytes)?);
    }

    messages.sort_by(|a, b| a.sent_at.cmp(&b.sent_at).then(a.seq.cmp(&b.seq)));

    Ok(messages)
}
