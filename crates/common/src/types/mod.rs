use serde::{Deserialize, Serialize};

/// Liveness/readiness body, e.g. `{"status":"ok"}`.
#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Plain message body, e.g. `{"message":"pong"}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Error envelope shared by every failing endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}
