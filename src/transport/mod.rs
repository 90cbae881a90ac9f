//! Transport layer: SOAP envelope and wire-format details (encoding/decoding).

mod envelope;
mod scalar;
mod send_sms;

pub use envelope::{
    EnvelopeError, SoapResponse, SoapVersion, decode_envelope, encode_envelope, soap_action,
};
pub use scalar::{parse_loose_int, parse_server_error, parse_server_int};
pub use send_sms::{encode_send_full_params, encode_send_simple_params};
