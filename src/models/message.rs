// zentic-service/src/models/message.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// One entry in a team channel's append-only log. Messages are never
// mutated or deleted once stored. `seq` breaks ordering ties between
// messages sharing a `sent_at`, and `id` is the dedup key subscribers
// use when combining history with a live feed.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub text: String,
    pub sent_at: DateTime<Utc>,
    pub seq: u64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PostMessageRequest {
    pub text: String,
}
