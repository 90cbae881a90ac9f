use chrono::NaiveDateTime;

use crate::domain::{Destination, ReplyAddress, SenderId, UserField};

const MESSAGE_FIELD: &str = "MessageToSend";
const DATE_TIME_FIELD: &str = "DateTimeToSend";
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parameters for `SendSimpleSMS`, in the order the service schema lists them.
pub fn encode_send_simple_params(
    destinations: &[Destination],
    sender: &SenderId,
    text: &str,
) -> Vec<(String, String)> {
    let mobiles = destinations
        .iter()
        .map(Destination::as_str)
        .collect::<Vec<_>>()
        .join(",");
    vec![
        (Destination::FIELD.to_owned(), mobiles),
        (SenderId::FIELD.to_owned(), sender.as_str().to_owned()),
        (MESSAGE_FIELD.to_owned(), text.to_owned()),
    ]
}

/// Parameters for `SendFullSMS`: the simple set plus the schedule and the
/// optional reply address and user field, blank when unset.
pub fn encode_send_full_params(
    destinations: &[Destination],
    sender: &SenderId,
    text: &str,
    send_at: NaiveDateTime,
    reply_address: Option<&ReplyAddress>,
    user_field: Option<&UserField>,
) -> Vec<(String, String)> {
    let mut params = encode_send_simple_params(destinations, sender, text);
    params.push((
        DATE_TIME_FIELD.to_owned(),
        send_at.format(DATE_TIME_FORMAT).to_string(),
    ));
    params.push((
        ReplyAddress::FIELD.to_owned(),
        reply_address.map_or_else(String::new, |addr| addr.as_str().to_owned()),
    ));
    params.push((
        UserField::FIELD.to_owned(),
        user_field.map_or_else(String::new, |field| field.as_str().to_owned()),
    ));
    params
}
