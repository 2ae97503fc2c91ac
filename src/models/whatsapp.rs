use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// `object` value carried by every WhatsApp Business notification.
pub const WHATSAPP_BUSINESS_ACCOUNT: &str = "whatsapp_business_account";

/// Query string of the subscription handshake (`hub.*` parameters).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyParams {
    pub mode: Option<String>,
    pub verify_token: Option<String>,
    pub challenge: Option<String>,
}

impl VerifyParams {
    /// Picks the `hub.*` values out of decoded query pairs. When a key repeats,
    /// the first occurrence wins and the rest are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "hub.mode" => &mut params.mode,
                "hub.verify_token" => &mut params.verify_token,
                "hub.challenge" => &mut params.challenge,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

/// The sender/text pair pulled out of one change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InboundMessage {
    pub sender_id: String,
    pub message_text: String,
}

/// Doc-only view of a notification. Runtime parsing works on raw JSON.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotificationDoc {
    #[schema(example = "whatsapp_business_account")]
    pub object: String,
    pub entry: Vec<EntryDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EntryDoc {
    pub id: Option<String>,
    pub changes: Vec<ChangeDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChangeDoc {
    pub field: Option<String>,
    /// Holds `messages[]`, each with `from` and `text.body`
    #[schema(value_type = Object)]
    pub value: Value,
}
