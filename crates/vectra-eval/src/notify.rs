//! Notifications for the user-facing layer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

/// A short message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub level: NotificationLevel,
    pub message: String,
}

/// Receives outcome messages from basis changes and UI operations.
pub trait NotificationSink {
    fn notify(&mut self, level: NotificationLevel, message: String);

    fn success(&mut self, message: impl Into<String>) {
        self.notify(NotificationLevel::Success, message.into());
    }

    fn error(&mut self, message: impl Into<String>) {
        self.notify(NotificationLevel::Error, message.into());
    }

    fn info(&mut self, message: impl Into<String>) {
        self.notify(NotificationLevel::Info, message.into());
    }
}

impl NotificationSink for Vec<Notification> {
    fn notify(&mut self, level: NotificationLevel, message: String) {
        self.push(Notification { level, message });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_collects() {
        let mut sink: Vec<Notification> = Vec::new();
        sink.success("done");
        sink.error("failed");
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[1].level, NotificationLevel::Error);
        let json = serde_json::to_string(&sink[0]).unwrap();
        assert_eq!(json, r#"{"type":"success","message":"done"}"#);
    }
}
