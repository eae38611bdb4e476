mod client;
mod payload;

pub use client::WebhookNotifier;
pub use payload::{Embed, Footer, WebhookPayload};
