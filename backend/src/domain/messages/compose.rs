//! Pure message composition.
//!
//! Nothing here suspends or performs I/O. Every interpolated participant or
//! event value passes through [`escape_html`].

use chrono::{DateTime, Utc};

use crate::domain::{Event, Participant};

use super::{Attachment, Notice, OutboundMessage, ProduceError};

const SIGN_OFF: &str = "<p>Best regards,<br>The organising team</p>";
const CELL_STYLE: &str = "padding: 10px; border: 1px solid #ddd;";

/// Escape text for inclusion in HTML element content or attribute values.
///
/// # Examples
/// ```
/// use backend::domain::messages::escape_html;
///
/// assert_eq!(escape_html("<b>\"Tom & Jerry's\"</b>"),
///     "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;");
/// ```
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Long-form English date used in mail bodies and certificates, e.g.
/// `March 5, 2026`.
pub fn format_event_date(date: DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Attachment name for a participant's certificate; whitespace becomes `_`.
pub fn certificate_filename(participant_name: &str) -> String {
    let stem: String = participant_name
        .chars()
        .map(|ch| if ch.is_whitespace() { '_' } else { ch })
        .collect();
    format!("Certificate_{stem}.pdf")
}

/// QR issuance mail with the rendered code attached as `qrcode.png`.
pub fn compose_qr(event: &Event, participant: &Participant, png: Vec<u8>) -> OutboundMessage {
    let event_name = escape_html(event.name());
    let html_body = format!(
        "<h2>Hello {name}!</h2>\
         <p>Thank you for registering for <strong>{event_name}</strong>.</p>\
         <p>Please find your QR code attached. Present it at the venue to record your attendance.</p>\
         <p><strong>Event Date:</strong> {date}</p>\
         {SIGN_OFF}",
        name = escape_html(participant.name()),
        date = format_event_date(event.date()),
    );

    OutboundMessage {
        to: participant.email().to_owned(),
        subject: format!("Your QR Code for {}", event.name()),
        html_body,
        attachments: vec![Attachment {
            filename: "qrcode.png".to_owned(),
            content_type: "image/png".to_owned(),
            content: png,
        }],
    }
}

/// Payment receipt. Fails with [`ProduceError::Contract`] when the
/// participant has no transaction id.
pub fn compose_receipt(
    event: &Event,
    participant: &Participant,
) -> Result<OutboundMessage, ProduceError> {
    if !participant.has_payment() {
        return Err(ProduceError::contract(
            "receipt requested for a participant without a transaction id",
        ));
    }

    let payment = participant.payment();
    let mut rows = vec![
        receipt_row("Event", &escape_html(event.name())),
        receipt_row("Name", &escape_html(participant.name())),
        receipt_row("Email", &escape_html(participant.email())),
    ];
    let optional = [
        ("Phone", participant.phone(), ""),
        ("Transaction ID", payment.transaction_id.as_str(), ""),
        ("Transaction Time", payment.transaction_time.as_str(), ""),
        ("Amount", payment.amount.as_str(), "\u{20b9}"),
        ("Payment Mode", payment.payment_mode.as_str(), ""),
    ];
    rows.extend(
        optional
            .into_iter()
            .filter(|(_, value, _)| !value.trim().is_empty())
            .map(|(label, value, prefix)| {
                receipt_row(label, &format!("{prefix}{}", escape_html(value)))
            }),
    );

    let html_body = format!(
        "<h2>Payment Receipt</h2>\
         <p>Dear <strong>{name}</strong>,</p>\
         <p>Thank you for your payment for <strong>{event_name}</strong>.</p>\
         <table style=\"width: 100%; border-collapse: collapse;\">{rows}</table>\
         <p><strong>Payment Confirmed</strong></p>\
         {SIGN_OFF}",
        name = escape_html(participant.name()),
        event_name = escape_html(event.name()),
        rows = rows.concat(),
    );

    Ok(OutboundMessage {
        to: participant.email().to_owned(),
        subject: format!("Payment Receipt - {}", event.name()),
        html_body,
        attachments: Vec::new(),
    })
}

fn receipt_row(label: &str, escaped_value: &str) -> String {
    format!(
        "<tr><td style=\"{CELL_STYLE}\"><strong>{label}</strong></td>\
         <td style=\"{CELL_STYLE}\">{escaped_value}</td></tr>"
    )
}

/// Certificate mail with the rendered PDF attached.
pub fn compose_certificate(
    event: &Event,
    participant: &Participant,
    pdf: Vec<u8>,
) -> OutboundMessage {
    let html_body = format!(
        "<h2>Congratulations {name}!</h2>\
         <p>Thank you for participating in <strong>{event_name}</strong>.</p>\
         <p>Please find your Certificate of Participation attached as a PDF.</p>\
         {SIGN_OFF}",
        name = escape_html(participant.name()),
        event_name = escape_html(event.name()),
    );

    OutboundMessage {
        to: participant.email().to_owned(),
        subject: format!("Your Certificate - {}", event.name()),
        html_body,
        attachments: vec![Attachment {
            filename: certificate_filename(participant.name()),
            content_type: "application/pdf".to_owned(),
            content: pdf,
        }],
    }
}

/// Free-form notice with the caller's subject and escaped body.
pub fn compose_notice(participant: &Participant, notice: &Notice) -> OutboundMessage {
    let html_body = format!(
        "<h2>Hello {name}!</h2><p>{body}</p>{SIGN_OFF}",
        name = escape_html(participant.name()),
        body = escape_html(notice.body()),
    );

    OutboundMessage {
        to: participant.email().to_owned(),
        subject: notice.subject().to_owned(),
        html_body,
        attachments: Vec::new(),
    }
}
