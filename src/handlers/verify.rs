use crate::models::whatsapp::VerifyParams;

const SUBSCRIBE: &str = "subscribe";

/// Result of checking a subscription handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// Mode and token matched; carries the challenge to echo back.
    Verified(String),
    Mismatch,
    MissingParams,
}

pub fn verify_subscription(expected_token: &str, params: &VerifyParams) -> Verification {
    let mode = params.mode.as_deref().filter(|m| !m.is_empty());
    let token = params.verify_token.as_deref().filter(|t| !t.is_empty());

    match (mode, token) {
        (Some(SUBSCRIBE), Some(token)) if token == expected_token => {
            Verification::Verified(params.challenge.clone().unwrap_or_default())
        }
        (Some(_), Some(_)) => Verification::Mismatch,
        _ => Verification::MissingParams,
    }
}
