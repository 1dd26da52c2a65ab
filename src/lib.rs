//! Typed Rust client for the Mobily.ws SMS HTTP API.
//!
//! The design is three small layers: a domain layer of strong types, a
//! transport layer for the gateway's wire-format quirks (form fields,
//! endpoint names, numeric response codes), and a client layer holding the
//! request engine. Every operation goes through the same engine, which
//! layers the client's parameter defaults under the request's own
//! parameters, puts the account credentials on top, and interprets the
//! plain-text response body through the operation's response-code table.
//!
//! Transport failures are not `Err`s: the gateway reports its own failures
//! as numeric codes in 200 responses, so the response type keeps both
//! levels apart. [`ApiResponse::successful`] answers for the exchange
//! itself, [`ApiResponse::result`] for the vendor's verdict.
//!
//! ```rust,no_run
//! use mobilyws::{
//!     AccountPassword, MessageText, MobilyClient, PhoneNumber, SendOptions, SendSms, Username,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MobilyClient::new(
//!         Username::new("96650000000")?,
//!         AccountPassword::new("...")?,
//!     )?;
//!
//!     let input = SendSms::new(
//!         vec![PhoneNumber::new("966500000001")?],
//!         MessageText::new("hello")?,
//!         SendOptions::default(),
//!     )?;
//!     let mut request = client.send_sms(input);
//!     if request.sent().await {
//!         println!("queued as {}", request.message_id().as_str());
//!     } else {
//!         println!("gateway said: {}", request.response().await.result());
//!     }
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    AnyRequest, ApiRequest, ApiResponse, BalanceRequest, ClientConfig, DeleteRequest,
    MobilyClient, MobilyClientBuilder, MobilyError, ParamDefaults, REQUEST_FAILED, SendRequest,
    SendingStatusRequest,
};
pub use domain::{
    AccountPassword, Balance, DeleteSms, DeletionKey, MessageId, MessageText, OperationInput,
    OperationKind, PhoneNumber, ScheduleTime, SendOptions, SendSms, SenderId, Username,
    ValidationError, VariableSet,
};
