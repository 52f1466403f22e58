//! Prowl XML response parsing
//!
//! The service answers every call with a small document such as
//! `<prowl><success code="200" resetdate="1230000000" remaining="999"/></prowl>`
//! or `<prowl><error code="401">Invalid API key</error></prowl>`.
//!
//! The whole document is read first so that truncated or ill-formed bodies
//! are rejected even if a usable element appeared early. When several
//! `<success>` or `<error>` elements exist only the first of each is used,
//! and any `<success>` wins over any `<error>`.

use chrono::{DateTime, SecondsFormat};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::errors::ProwlError;
use crate::models::{FailureInfo, ServiceResult, SuccessInfo};

const SUCCESS_TAG: &[u8] = b"success";
const ERROR_TAG: &[u8] = b"error";

/// First `<error>` element seen; validated only if no `<success>` exists
#[derive(Debug, Default)]
struct PendingError {
    code: Option<String>,
    message: String,
}

fn malformed(err: impl std::fmt::Display) -> ProwlError {
    ProwlError::MalformedResponse(err.to_string())
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>, ProwlError> {
    for attr in element.attributes() {
        let attr = attr.map_err(malformed)?;
        if attr.key.local_name().as_ref() == name.as_bytes() {
            let value = attr.unescape_value().map_err(malformed)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn parse_number<T: std::str::FromStr>(
    tag: &str,
    name: &str,
    value: Option<String>,
) -> Result<T, ProwlError> {
    let value =
        value.ok_or_else(|| malformed(format!("<{}> is missing the {} attribute", tag, name)))?;

    value.trim().parse().map_err(|_| {
        malformed(format!(
            "<{}> attribute {} is not an integer: {:?}",
            tag, name, value
        ))
    })
}

/// Render a Unix timestamp as ISO-8601 in UTC, e.g. `2008-12-23T02:40:00+00:00`
pub fn format_reset_date(timestamp: i64) -> Result<String, ProwlError> {
    DateTime::from_timestamp(timestamp, 0)
        .map(|date| date.to_rfc3339_opts(SecondsFormat::Secs, false))
        .ok_or_else(|| malformed(format!("resetdate {} is out of range", timestamp)))
}

fn parse_success(element: &BytesStart<'_>) -> Result<SuccessInfo, ProwlError> {
    let return_code = parse_number("success", "code", attribute(element, "code")?)?;
    let reset_timestamp: i64 =
        parse_number("success", "resetdate", attribute(element, "resetdate")?)?;
    let remaining = parse_number("success", "remaining", attribute(element, "remaining")?)?;

    Ok(SuccessInfo {
        return_code,
        reset_date: format_reset_date(reset_timestamp)?,
        remaining,
    })
}

/// Parse a raw response body into a `ServiceResult`
pub fn parse_response(body: &[u8]) -> Result<ServiceResult, ProwlError> {
    let mut reader = Reader::from_reader(body);

    let mut depth: usize = 0;
    let mut seen_root = false;
    let mut success: Option<SuccessInfo> = None;
    let mut error: Option<PendingError> = None;
    // Depth at which text belongs to the first <error> element
    let mut error_text_depth: Option<usize> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            malformed(format!("{} at position {}", e, reader.error_position()))
        })?;

        match event {
            Event::Start(ref element) | Event::Empty(ref element) => {
                if depth == 0 {
                    if seen_root {
                        return Err(malformed("multiple root elements"));
                    }
                    seen_root = true;
                }

                let name = element.local_name();
                if name.as_ref() == SUCCESS_TAG && success.is_none() {
                    success = Some(parse_success(element)?);
                } else if name.as_ref() == ERROR_TAG && error.is_none() {
                    error = Some(PendingError {
                        code: attribute(element, "code")?,
                        message: String::new(),
                    });
                    if matches!(event, Event::Start(_)) {
                        error_text_depth = Some(depth + 1);
                    }
                }

                if matches!(event, Event::Start(_)) {
                    depth += 1;
                }
            }
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| malformed("unexpected closing tag"))?;
                if error_text_depth.is_some_and(|d| depth < d) {
                    error_text_depth = None;
                }
            }
            Event::Text(ref text) => {
                let text = text.unescape().map_err(malformed)?;
                if depth == 0 && !text.trim().is_empty() {
                    return Err(malformed("text outside of the root element"));
                }
                if error_text_depth == Some(depth) {
                    if let Some(pending) = error.as_mut() {
                        pending.message.push_str(&text);
                    }
                }
            }
            Event::CData(ref data) => {
                if error_text_depth == Some(depth) {
                    if let Some(pending) = error.as_mut() {
                        pending.message.push_str(&String::from_utf8_lossy(data));
                    }
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if depth > 0 {
        return Err(malformed("unexpected end of document: unclosed element"));
    }
    if !seen_root {
        return Err(malformed("document has no root element"));
    }

    if let Some(info) = success {
        debug!(
            "Prowl success response: code={}, remaining={}",
            info.return_code, info.remaining
        );
        return Ok(ServiceResult::Success(info));
    }

    if let Some(pending) = error {
        let return_code = parse_number("error", "code", pending.code)?;
        debug!(
            "Prowl error response: code={}, message={}",
            return_code, pending.message
        );
        return Ok(ServiceResult::Failure(FailureInfo {
            return_code,
            error_message: pending.message,
        }));
    }

    Err(ProwlError::UnrecognizedResponse)
}
