use chrono::NaiveDate;

use super::{Attachment, EmailMessage, Recipients};
use crate::poster::PosterKind;

pub fn greeting_subject(kind: PosterKind, date: NaiveDate) -> String {
    let day = date.format("%d %B %Y");
    match kind {
        PosterKind::Birthday => format!("🎂 Birthday Greetings – {}", day),
        PosterKind::Anniversary => format!("🎉 Work Anniversary Greetings – {}", day),
    }
}

pub fn greeting_body(kind: PosterKind) -> &'static str {
    match kind {
        PosterKind::Birthday => "Please find attached the birthday greeting poster(s) for today.",
        PosterKind::Anniversary => {
            "Please find attached the work anniversary greeting poster(s) for today."
        }
    }
}

/// One email carrying every poster of a kind, or `None` when there is
/// nothing to send or nobody to send it to.
pub fn greeting_message(
    kind: PosterKind,
    posters: Vec<Attachment>,
    recipients: &Recipients,
    from: &str,
    reply_to: Option<&str>,
    date: NaiveDate,
) -> Option<EmailMessage> {
    if posters.is_empty() || recipients.to.is_empty() {
        return None;
    }

    Some(EmailMessage {
        to: recipients.to.clone(),
        cc: recipients.cc.clone(),
        from: from.to_string(),
        subject: greeting_subject(kind, date),
        body: greeting_body(kind).to_string(),
        reply_to: reply_to.map(str::to_string),
        attachments: posters,
    })
}
