use serde::{Deserialize, Serialize};

/// Which attendance list an event belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    In,
    Out,
}

impl EventType {
    /// Human label used in rejection messages.
    pub fn label(&self) -> &'static str {
        match self {
            EventType::In => "check-in",
            EventType::Out => "check-out",
        }
    }

    pub fn is_in(&self) -> bool {
        matches!(self, EventType::In)
    }
}
