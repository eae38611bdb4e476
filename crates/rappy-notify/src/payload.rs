use rappy_core::notification::Notification;
use serde::{Deserialize, Serialize};

/// Discord-style webhook body: `{ "embeds": [ { color, title, footer? } ] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub color: u32,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub footer: Option<Footer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footer {
    pub text: String,
}

impl From<&Notification> for WebhookPayload {
    fn from(notification: &Notification) -> Self {
        Self {
            embeds: vec![Embed {
                color: notification.color,
                title: notification.title.clone(),
                footer: notification
                    .footer
                    .as_ref()
                    .map(|text| Footer { text: text.clone() }),
            }],
        }
    }
}
