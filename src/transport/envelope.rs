//! Minimal SOAP envelope codec for the gateway's document/literal operations.
//!
//! Requests wrap operation parameters in a fixed envelope layout. Responses
//! are scanned for the operation response element with a small tag scanner
//! that understands only the subset of XML the gateway emits.

use std::collections::BTreeMap;

use thiserror::Error;

/// XML namespace of the gateway web service.
pub const SERVICE_NAMESPACE: &str = "http://www.24x.com/WS/SendSMS";

/// SOAP protocol version used when talking to the gateway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SoapVersion {
    /// SOAP 1.1: `text/xml` body with a separate `SOAPAction` header.
    Soap11,
    /// SOAP 1.2: `application/soap+xml` body carrying the action in the media type.
    #[default]
    Soap12,
}

impl SoapVersion {
    pub fn envelope_namespace(self) -> &'static str {
        match self {
            Self::Soap11 => "http://schemas.xmlsoap.org/soap/envelope/",
            Self::Soap12 => "http://www.w3.org/2003/05/soap-envelope",
        }
    }

    /// Value of the `Content-Type` header for a request invoking `operation`.
    pub fn content_type(self, operation: &str) -> String {
        match self {
            Self::Soap11 => "text/xml; charset=utf-8".to_owned(),
            Self::Soap12 => format!(
                "application/soap+xml; charset=utf-8; action=\"{}\"",
                soap_action(operation)
            ),
        }
    }
}

/// SOAPAction URI identifying an operation of the gateway service.
pub fn soap_action(operation: &str) -> String {
    format!("{SERVICE_NAMESPACE}/{operation}")
}

/// Failure to decode a SOAP response envelope.
#[derive(Error, Debug)]
pub enum EnvelopeError {
    /// The server answered with a SOAP fault element.
    #[error("SOAP fault {code}: {message}")]
    Fault { code: String, message: String },
    /// The response body is not a well-formed SOAP envelope.
    #[error("malformed SOAP envelope: {reason}")]
    Malformed { reason: String },
}

/// Decoded fields of a SOAP operation response, keyed by local element name.
#[derive(Debug, Clone, Default)]
pub struct SoapResponse {
    fields: BTreeMap<String, String>,
}

impl SoapResponse {
    pub fn from_fields(fields: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    /// Returns the text of the named response field, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Encodes a request envelope invoking `operation` with the given parameters.
///
/// Parameters are emitted in order as child elements of the operation element,
/// with text content XML-escaped.
pub fn encode_envelope(
    version: SoapVersion,
    operation: &str,
    params: &[(String, String)],
) -> String {
    let mut xml = String::with_capacity(256);
    xml.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>");
    xml.push_str(&format!(
        "<soap:Envelope xmlns:soap=\"{}\"><soap:Body>",
        version.envelope_namespace()
    ));
    xml.push_str(&format!("<{operation} xmlns=\"{SERVICE_NAMESPACE}\">"));
    for (name, value) in params {
        xml.push_str(&format!("<{name}>{}</{name}>", escape_text(value)));
    }
    xml.push_str(&format!("</{operation}>"));
    xml.push_str("</soap:Body></soap:Envelope>");
    xml
}

/// Decodes a response body into the fields of the operation response element.
///
/// A `Fault` element inside the body decodes to [`EnvelopeError::Fault`],
/// accepting both the SOAP 1.1 and SOAP 1.2 fault layouts.
pub fn decode_envelope(body: &str) -> Result<SoapResponse, EnvelopeError> {
    let envelope = element_inner(body, "Envelope").ok_or_else(|| EnvelopeError::Malformed {
        reason: "missing Envelope element".to_owned(),
    })?;
    let body_inner = element_inner(envelope, "Body").ok_or_else(|| EnvelopeError::Malformed {
        reason: "missing Body element".to_owned(),
    })?;
    if let Some(fault) = element_inner(body_inner, "Fault") {
        return Err(decode_fault(fault));
    }
    let response = first_child_inner(body_inner).ok_or_else(|| EnvelopeError::Malformed {
        reason: "missing response element".to_owned(),
    })?;
    let fields = child_elements(response).ok_or_else(|| EnvelopeError::Malformed {
        reason: "unbalanced response element".to_owned(),
    })?;
    Ok(SoapResponse::from_fields(fields))
}

fn decode_fault(inner: &str) -> EnvelopeError {
    let code = element_inner(inner, "faultcode")
        .or_else(|| element_inner(inner, "Code").and_then(|code| element_inner(code, "Value")))
        .map(element_text)
        .unwrap_or_default();
    let message = element_inner(inner, "faultstring")
        .or_else(|| element_inner(inner, "Reason").and_then(|reason| element_inner(reason, "Text")))
        .map(element_text)
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| "unspecified SOAP fault".to_owned());
    EnvelopeError::Fault { code, message }
}

struct Tag<'a> {
    start: usize,
    end: usize,
    kind: TagKind<'a>,
}

enum TagKind<'a> {
    Open { name: &'a str, empty: bool },
    Close { name: &'a str },
    Skip,
}

/// Returns the next markup construct at or after `from`.
fn next_tag(xml: &str, from: usize) -> Option<Tag<'_>> {
    let start = from + xml.get(from..)?.find('<')?;
    let rest = &xml[start..];
    if rest.starts_with("<?") {
        let end = rest.find("?>")? + 2;
        return Some(Tag {
            start,
            end: start + end,
            kind: TagKind::Skip,
        });
    }
    if rest.starts_with("<!--") {
        let end = rest.find("-->")? + 3;
        return Some(Tag {
            start,
            end: start + end,
            kind: TagKind::Skip,
        });
    }
    if rest.starts_with("<![CDATA[") {
        let end = rest.find("]]>")? + 3;
        return Some(Tag {
            start,
            end: start + end,
            kind: TagKind::Skip,
        });
    }
    if rest.starts_with("<!") {
        let end = rest.find('>')? + 1;
        return Some(Tag {
            start,
            end: start + end,
            kind: TagKind::Skip,
        });
    }
    if let Some(tail) = rest.strip_prefix("</") {
        let close = tail.find('>')?;
        let name = tail[..close].trim();
        return Some(Tag {
            start,
            end: start + 2 + close + 1,
            kind: TagKind::Close { name },
        });
    }
    let (gt, empty) = tag_end(&rest[1..])?;
    let head = &rest[1..1 + gt];
    let name_end = head
        .find(|c: char| c.is_ascii_whitespace() || c == '/')
        .unwrap_or(head.len());
    Some(Tag {
        start,
        end: start + 1 + gt + 1,
        kind: TagKind::Open {
            name: &head[..name_end],
            empty,
        },
    })
}

/// Finds the first unquoted `>` in an open tag and whether the tag is
/// self-closing.
fn tag_end(s: &str) -> Option<(usize, bool)> {
    let mut quote = 0u8;
    let mut prev_non_ws = 0u8;
    for (idx, &b) in s.as_bytes().iter().enumerate() {
        match quote {
            0 => match b {
                b'"' | b'\'' => quote = b,
                b'>' => return Some((idx, prev_non_ws == b'/')),
                _ => {
                    if !b.is_ascii_whitespace() {
                        prev_non_ws = b;
                    }
                }
            },
            open => {
                if b == open {
                    quote = 0;
                }
            }
        }
    }
    None
}

fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

/// Returns the inner content of the first element whose local name matches
/// `target`, scanning nested content depth-first.
fn element_inner<'a>(xml: &'a str, target: &str) -> Option<&'a str> {
    let mut pos = 0;
    while let Some(tag) = next_tag(xml, pos) {
        pos = tag.end;
        if let TagKind::Open { name, empty } = tag.kind {
            if local_name(name) == target {
                if empty {
                    return Some("");
                }
                let close = find_matching_close(xml, tag.end, name)?;
                return Some(&xml[tag.end..close]);
            }
        }
    }
    None
}

/// Returns the start offset of the close tag matching an element named `name`
/// that was opened just before `from`.
fn find_matching_close(xml: &str, from: usize, name: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut pos = from;
    while let Some(tag) = next_tag(xml, pos) {
        pos = tag.end;
        match tag.kind {
            TagKind::Open { name: open, empty } if !empty && open == name => depth += 1,
            TagKind::Close { name: close } if close == name => {
                if depth == 0 {
                    return Some(tag.start);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}

fn first_child_inner(inner: &str) -> Option<&str> {
    let mut pos = 0;
    while let Some(tag) = next_tag(inner, pos) {
        pos = tag.end;
        match tag.kind {
            TagKind::Open { name, empty } => {
                if empty {
                    return Some("");
                }
                let close = find_matching_close(inner, tag.end, name)?;
                return Some(&inner[tag.end..close]);
            }
            TagKind::Close { .. } => return None,
            TagKind::Skip => {}
        }
    }
    None
}

/// Collects the direct child elements of `inner` as name/text pairs.
///
/// Returns `None` when the content is unbalanced.
fn child_elements(inner: &str) -> Option<Vec<(String, String)>> {
    let mut fields = Vec::new();
    let mut pos = 0;
    while let Some(tag) = next_tag(inner, pos) {
        pos = tag.end;
        match tag.kind {
            TagKind::Open { name, empty } => {
                if empty {
                    fields.push((local_name(name).to_owned(), String::new()));
                } else {
                    let close = find_matching_close(inner, tag.end, name)?;
                    fields.push((
                        local_name(name).to_owned(),
                        element_text(&inner[tag.end..close]),
                    ));
                    pos = next_tag(inner, close)?.end;
                }
            }
            TagKind::Close { .. } => return None,
            TagKind::Skip => {}
        }
    }
    Some(fields)
}

fn element_text(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Some(inner) = trimmed
        .strip_prefix("<![CDATA[")
        .and_then(|rest| rest.strip_suffix("]]>"))
    {
        return inner.to_owned();
    }
    unescape_text(trimmed)
}

fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let Some(semi) = tail.find(';') else {
            out.push_str(tail);
            return out;
        };
        match &tail[1..semi] {
            "amp" => out.push('&'),
            "lt" => out.push('<'),
            "gt" => out.push('>'),
            "quot" => out.push('"'),
            "apos" => out.push('\''),
            entity => match numeric_entity(entity) {
                Some(c) => out.push(c),
                None => out.push_str(&tail[..=semi]),
            },
        }
        rest = &tail[semi + 1..];
    }
    out.push_str(rest);
    out
}

fn numeric_entity(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let code = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse().ok()?,
    };
    char::from_u32(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_envelope_soap12_layout() {
        let params = vec![
            ("UserName".to_owned(), "alice".to_owned()),
            ("Password".to_owned(), "secret".to_owned()),
        ];
        let xml = encode_envelope(SoapVersion::Soap12, "CheckLoginDetails", &params);
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
             <soap:Envelope xmlns:soap=\"http://www.w3.org/2003/05/soap-envelope\">\
             <soap:Body>\
             <CheckLoginDetails xmlns=\"http://www.24x.com/WS/SendSMS\">\
             <UserName>alice</UserName><Password>secret</Password>\
             </CheckLoginDetails>\
             </soap:Body></soap:Envelope>"
        );
    }

    #[test]
    fn encode_envelope_escapes_parameter_text() {
        let params = vec![("MessageToSend".to_owned(), "a<b & \"c\"".to_owned())];
        let xml = encode_envelope(SoapVersion::Soap11, "SendSimpleSMS", &params);
        assert!(xml.contains("<MessageToSend>a&lt;b &amp; &quot;c&quot;</MessageToSend>"));
        assert!(xml.contains("xmlns:soap=\"http://schemas.xmlsoap.org/soap/envelope/\""));
    }

    #[test]
    fn decode_envelope_reads_response_fields() {
        let body = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
            <soap:Envelope xmlns:soap=\"http://www.w3.org/2003/05/soap-envelope\">\
            <soap:Body>\
            <CreditsAvailableResponse xmlns=\"http://www.24x.com/WS/SendSMS\">\
            <CreditsAvailableResult>42</CreditsAvailableResult>\
            </CreditsAvailableResponse>\
            </soap:Body></soap:Envelope>";
        let response = decode_envelope(body).unwrap();
        assert_eq!(response.field("CreditsAvailableResult"), Some("42"));
        assert_eq!(response.field("Missing"), None);
    }

    #[test]
    fn decode_envelope_unescapes_field_text() {
        let body = "<e:Envelope xmlns:e=\"http://www.w3.org/2003/05/soap-envelope\"><e:Body>\
            <R><SendSimpleSMSResult> 5 &amp; counting </SendSimpleSMSResult></R>\
            </e:Body></e:Envelope>";
        let response = decode_envelope(body).unwrap();
        assert_eq!(response.field("SendSimpleSMSResult"), Some("5 & counting"));
    }

    #[test]
    fn decode_envelope_handles_empty_and_cdata_fields() {
        let body = "<Envelope><Body><SendFullSMSResponse>\
            <SendFullSMSResult><![CDATA[17]]></SendFullSMSResult>\
            <Status/>\
            </SendFullSMSResponse></Body></Envelope>";
        let response = decode_envelope(body).unwrap();
        assert_eq!(response.field("SendFullSMSResult"), Some("17"));
        assert_eq!(response.field("Status"), Some(""));
    }

    #[test]
    fn decode_envelope_surfaces_soap11_fault() {
        let body = "<soap:Envelope xmlns:soap=\"http://schemas.xmlsoap.org/soap/envelope/\">\
            <soap:Body><soap:Fault>\
            <faultcode>soap:Client</faultcode>\
            <faultstring>Server was unable to read request.</faultstring>\
            </soap:Fault></soap:Body></soap:Envelope>";
        match decode_envelope(body).unwrap_err() {
            EnvelopeError::Fault { code, message } => {
                assert_eq!(code, "soap:Client");
                assert_eq!(message, "Server was unable to read request.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn decode_envelope_surfaces_soap12_fault() {
        let body = "<soap:Envelope xmlns:soap=\"http://www.w3.org/2003/05/soap-envelope\">\
            <soap:Body><soap:Fault>\
            <soap:Code><soap:Value>soap:Sender</soap:Value></soap:Code>\
            <soap:Reason><soap:Text xml:lang=\"en\">Invalid request.</soap:Text></soap:Reason>\
            </soap:Fault></soap:Body></soap:Envelope>";
        match decode_envelope(body).unwrap_err() {
            EnvelopeError::Fault { code, message } => {
                assert_eq!(code, "soap:Sender");
                assert_eq!(message, "Invalid request.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn decode_envelope_defaults_the_fault_message() {
        let body = "<Envelope><Body><Fault><faultcode>Server</faultcode></Fault></Body></Envelope>";
        match decode_envelope(body).unwrap_err() {
            EnvelopeError::Fault { code, message } => {
                assert_eq!(code, "Server");
                assert_eq!(message, "unspecified SOAP fault");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn decode_envelope_rejects_non_soap_payload() {
        match decode_envelope("<html><body>gateway timeout</body></html>").unwrap_err() {
            EnvelopeError::Malformed { reason } => assert_eq!(reason, "missing Envelope element"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn decode_envelope_requires_a_response_element() {
        let body = "<soap:Envelope xmlns:soap=\"http://www.w3.org/2003/05/soap-envelope\">\
            <soap:Body></soap:Body></soap:Envelope>";
        match decode_envelope(body).unwrap_err() {
            EnvelopeError::Malformed { reason } => assert_eq!(reason, "missing response element"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn content_type_carries_the_action_for_soap12() {
        assert_eq!(
            SoapVersion::Soap11.content_type("CreditsAvailable"),
            "text/xml; charset=utf-8"
        );
        assert_eq!(
            SoapVersion::Soap12.content_type("CreditsAvailable"),
            "application/soap+xml; charset=utf-8; action=\"http://www.24x.com/WS/SendSMS/CreditsAvailable\""
        );
        assert_eq!(
            soap_action("SendSimpleSMS"),
            "http://www.24x.com/WS/SendSMS/SendSimpleSMS"
        );
    }

    #[test]
    fn unescape_text_keeps_unknown_entities_literal() {
        assert_eq!(unescape_text("a &amp; b &copy; &#65;&#x42;"), "a & b &copy; AB");
    }
}
