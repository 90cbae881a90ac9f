//! Typed Rust client for the 24x SMS SOAP gateway.
//!
//! The crate is split into a domain layer of strong types, a transport layer
//! for the SOAP envelope and wire-format quirks, and a small client layer
//! orchestrating requests. Every operation is a single round trip; there is
//! no retrying, batching, or delivery tracking.
//!
//! ```rust,no_run
//! use sms24x::{AuthContext, Sms24xClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sms24x::Sms24xError> {
//!     let auth = AuthContext::new("username", "password")?;
//!     let client = Sms24xClient::new(Some(auth));
//!     let id = client.send_text("hello", "+15551234567", None).await?;
//!     println!("queued as {id}");
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{AuthContext, Sms24xClient, Sms24xClientBuilder, Sms24xError};
pub use domain::{
    Destination, Destinations, ErrorCode, KnownErrorCode, MessageId, Password, ReplyAddress,
    SenderId, Sms, UserField, Username, ValidationError,
};
pub use transport::SoapVersion;
