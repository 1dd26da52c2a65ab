//! Transport layer: endpoint names, form encoding, and response-code tables.

mod balance;
mod delete_sms;
mod send_sms;
mod sending_status;

pub use balance::{BALANCE_ENDPOINT, BALANCE_RESPONSE_CODES, decode_balance_body};
pub use delete_sms::{DELETE_SMS_ENDPOINT, DELETE_SMS_RESPONSE_CODES, encode_delete_sms_form};
pub use send_sms::{
    SEND_SMS_ENDPOINT, SEND_SMS_RESPONSE_CODES, SEND_SMS_WITH_VARIABLES_ENDPOINT,
    encode_send_sms_form, send_sms_endpoint,
};
pub use sending_status::{SENDING_STATUS_ENDPOINT, SENDING_STATUS_RESPONSE_CODES};

use crate::domain::{OperationInput, OperationKind};

/// A per-operation mapping from raw vendor body to outcome name.
pub type ResponseCodes = &'static [(&'static str, &'static str)];

/// The response-code table for one operation.
pub fn response_codes(kind: OperationKind) -> ResponseCodes {
    match kind {
        OperationKind::SendSms => SEND_SMS_RESPONSE_CODES,
        OperationKind::DeleteSms => DELETE_SMS_RESPONSE_CODES,
        OperationKind::GetBalance => BALANCE_RESPONSE_CODES,
        OperationKind::SendingStatus => SENDING_STATUS_RESPONSE_CODES,
    }
}

/// The endpoint name a given input targets (without the `.php` suffix the
/// engine appends on the wire).
pub fn endpoint(input: &OperationInput) -> &'static str {
    match input {
        OperationInput::SendSms(send) => send_sms_endpoint(send),
        OperationInput::DeleteSms(_) => DELETE_SMS_ENDPOINT,
        OperationInput::GetBalance => BALANCE_ENDPOINT,
        OperationInput::SendingStatus => SENDING_STATUS_ENDPOINT,
    }
}

/// Encode the operation-specific form parameters for an input. Client-level
/// defaults and credentials are layered on top by the request engine.
pub fn encode_form(input: &OperationInput) -> Vec<(String, String)> {
    match input {
        OperationInput::SendSms(send) => encode_send_sms_form(send),
        OperationInput::DeleteSms(delete) => encode_delete_sms_form(delete),
        OperationInput::GetBalance | OperationInput::SendingStatus => Vec::new(),
    }
}

/// Resolve a raw body against a code table. Lookup trims the body; misses
/// stay `None` so unmapped vendor codes can pass through verbatim.
pub fn lookup_response_code(codes: ResponseCodes, raw: &str) -> Option<&'static str> {
    let trimmed = raw.trim();
    codes
        .iter()
        .find(|(code, _)| *code == trimmed)
        .map(|(_, name)| *name)
}
