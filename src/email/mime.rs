//! Raw MIME rendering of outgoing messages.

use base64::{Engine, engine::general_purpose::STANDARD};

use super::EmailMessage;

// Base64 bodies never contain '-', so a fixed boundary cannot collide with content.
const MIXED_BOUNDARY: &str = "----greetings-poster-mixed";
const LINE_LENGTH: usize = 76;

/// Render a `multipart/mixed` message with base64 encoded parts.
pub fn build_raw_message(message: &EmailMessage) -> Vec<u8> {
    let mut out = String::new();

    header(&mut out, "From", &encode_address(&message.from));
    header(&mut out, "To", &message.to.join(", "));
    if !message.cc.is_empty() {
        header(&mut out, "Cc", &message.cc.join(", "));
    }
    if let Some(reply_to) = &message.reply_to {
        header(&mut out, "Reply-To", reply_to);
    }
    header(&mut out, "Subject", &encode_header_value(&message.subject));
    header(&mut out, "MIME-Version", "1.0");
    header(
        &mut out,
        "Content-Type",
        &format!("multipart/mixed; boundary=\"{}\"", MIXED_BOUNDARY),
    );
    out.push_str("\r\n");

    out.push_str(&format!("--{}\r\n", MIXED_BOUNDARY));
    text_part(&mut out, "text/plain", &message.body);

    for attachment in &message.attachments {
        let filename = quoted_param(&attachment.filename);
        out.push_str(&format!("--{}\r\n", MIXED_BOUNDARY));
        header(
            &mut out,
            "Content-Type",
            &format!("{}; name=\"{}\"", attachment.content_type, filename),
        );
        header(
            &mut out,
            "Content-Disposition",
            &format!("attachment; filename=\"{}\"", filename),
        );
        header(&mut out, "Content-Transfer-Encoding", "base64");
        out.push_str("\r\n");
        base64_lines(&mut out, &attachment.data);
    }

    out.push_str(&format!("--{}--\r\n", MIXED_BOUNDARY));
    out.into_bytes()
}

fn text_part(out: &mut String, content_type: &str, content: &str) {
    header(
        out,
        "Content-Type",
        &format!("{}; charset=UTF-8", content_type),
    );
    header(out, "Content-Transfer-Encoding", "base64");
    out.push_str("\r\n");
    base64_lines(out, content.as_bytes());
}

fn header(out: &mut String, name: &str, value: &str) {
    out.push_str(name);
    out.push_str(": ");
    out.push_str(value);
    out.push_str("\r\n");
}

/// RFC 2047 encoded-word for non-ASCII header values.
fn encode_header_value(value: &str) -> String {
    if value.is_ascii() {
        value.to_string()
    } else {
        format!("=?UTF-8?B?{}?=", STANDARD.encode(value.as_bytes()))
    }
}

/// `Display Name <address>` with a non-ASCII display name encoded.
fn encode_address(value: &str) -> String {
    match value.rsplit_once('<') {
        Some((name, address)) if !name.trim().is_empty() => {
            format!("{} <{}", encode_header_value(name.trim()), address)
        }
        _ => value.to_string(),
    }
}

/// Quoted parameter values may not contain quotes, backslashes or line breaks.
fn quoted_param(value: &str) -> String {
    value
        .chars()
        .map(|c| if matches!(c, '"' | '\\' | '\r' | '\n') { '_' } else { c })
        .collect()
}

fn base64_lines(out: &mut String, data: &[u8]) {
    let encoded = STANDARD.encode(data);
    // Base64 output is ASCII, so byte chunks are valid str boundaries
    for chunk in encoded.as_bytes().chunks(LINE_LENGTH) {
        out.push_str(&String::from_utf8_lossy(chunk));
        out.push_str("\r\n");
    }
}
