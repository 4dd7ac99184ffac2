//! Email import: turns a pasted job-related email into an application record
//! using keyword and phrase heuristics. No mailbox access, no model inference.

use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use serde::Deserialize;
use thiserror::Error;

use crate::models::application::{NewJobApplication, DEFAULT_STATUS};

const UNKNOWN: &str = "Unknown";

const JOB_KEYWORDS: &[&str] = &[
    "job",
    "application",
    "interview",
    "offer",
    "position",
    "role",
    "hiring",
    "career",
];

static RE_COMPANY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)applied to\s+(.*?)(?:\s+at\b|\.|$)").unwrap());

static RE_ROLES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?im)position of\s+(.*?)(?:\s+at\b|\.|$)",
        r"(?im)role of\s+(.*?)(?:\s+at\b|\.|$)",
        r"(?im)applied for\s+(.*?)(?:\s+at\b|\.|$)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

static RE_SENDER_DOMAIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"@([\w.-]+)").unwrap());

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IngestError {
    #[error("Email does not look job related")]
    NotJobRelated,

    #[error("Invalid received date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// An email as pasted into the import form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmailMessage {
    pub from: String,
    pub subject: String,
    pub body: String,
    #[serde(rename = "receivedDate")]
    pub received_date: String,
}

/// Plain text of an email body. HTML bodies are reduced to their text nodes.
pub fn email_text(body: &str) -> String {
    if !body.to_lowercase().contains("<html") {
        return body.to_string();
    }
    Html::parse_document(body)
        .root_element()
        .text()
        .collect::<String>()
}

pub fn is_job_related(subject: &str, body: &str) -> bool {
    let subject = subject.to_lowercase();
    let body = body.to_lowercase();
    JOB_KEYWORDS
        .iter()
        .any(|k| subject.contains(k) || body.contains(k))
}

/// Text following "applied to", e.g. "You applied to Acme Corp." gives "Acme Corp".
pub fn extract_company_name(text: &str) -> Option<String> {
    RE_COMPANY
        .captures(text)
        .map(|c| c[1].trim().to_string())
        .filter(|name| !name.is_empty())
}

pub fn guess_role(text: &str) -> String {
    RE_ROLES
        .iter()
        .find_map(|re| {
            re.captures(text)
                .map(|c| c[1].trim().to_string())
                .filter(|role| !role.is_empty())
        })
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// First matching rule wins.
pub fn guess_status(text: &str) -> &'static str {
    let text = text.to_lowercase();
    if text.contains("interview") || text.contains("scheduled") {
        "Interview Scheduled"
    } else if text.contains("shortlisted") {
        "Shortlisted"
    } else if text.contains("reject") || text.contains("not selected") {
        "Rejected"
    } else if text.contains("applied") {
        "Applied"
    } else {
        DEFAULT_STATUS
    }
}

/// Whole days from `date` to `today`. Negative for future dates.
pub fn days_since(date: NaiveDate, today: NaiveDate) -> i32 {
    let days = (today - date).num_days();
    days.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// "Jobs <jobs@mail.acme.com>" gives "Mail"; the first domain label, capitalized.
pub fn sender_company(from: &str) -> String {
    RE_SENDER_DOMAIN
        .captures(from)
        .and_then(|c| c[1].split('.').next().map(capitalize))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Builds a create payload from an email. The received date defaults to `today`.
pub fn extract_application(
    email: &EmailMessage,
    today: NaiveDate,
) -> Result<NewJobApplication, IngestError> {
    let body = email_text(&email.body);
    if !is_job_related(&email.subject, &body) {
        return Err(IngestError::NotJobRelated);
    }

    let received = match email.received_date.trim() {
        "" => today,
        raw => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| IngestError::InvalidDate(raw.to_string()))?,
    };

    Ok(NewJobApplication {
        company_name: extract_company_name(&body)
            .unwrap_or_else(|| sender_company(&email.from)),
        date_applied: received.format("%Y-%m-%d").to_string(),
        days_since_update: days_since(received, today),
        role_applied_for: guess_role(&body),
        status: guess_status(&body).to_string(),
    })
}

/// Local calendar date, used when the caller has no clock of its own.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn email(from: &str, subject: &str, body: &str, received: &str) -> EmailMessage {
        EmailMessage {
            from: from.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            received_date: received.to_string(),
        }
    }

    #[test]
    fn test_is_job_related_matches_subject_or_body() {
        assert!(is_job_related("Your Application", ""));
        assert!(is_job_related("Hello", "We are HIRING engineers"));
        assert!(!is_job_related("Lunch", "See you at noon"));
    }

    #[test]
    fn test_extract_company_name() {
        assert_eq!(
            extract_company_name("Thanks! You applied to Acme Corp. We will be in touch."),
            Some("Acme Corp".to_string())
        );
        assert_eq!(
            extract_company_name("You applied to Initech at their Austin office"),
            Some("Initech".to_string())
        );
        assert_eq!(extract_company_name("Nothing relevant here"), None);
    }

    #[test]
    fn test_guess_role_tries_each_phrase() {
        assert_eq!(
            guess_role("Thank you for your interest in the position of Backend Engineer at Acme."),
            "Backend Engineer"
        );
        assert_eq!(guess_role("You applied for Data Analyst."), "Data Analyst");
        assert_eq!(guess_role("No role mentioned"), "Unknown");
    }

    #[test]
    fn test_guess_role_skips_empty_capture() {
        assert_eq!(
            guess_role("position of . You applied for Data Analyst."),
            "Data Analyst"
        );
    }

    #[test]
    fn test_email_text_strips_html_markup() {
        let html = "<html><body><p>Thanks! You applied to <b>Acme Corp</b>.</p></body></html>";
        let text = email_text(html);
        assert!(!text.contains('<'));
        assert!(text.contains("You applied to Acme Corp."));

        assert_eq!(email_text("plain <b>text</b>"), "plain <b>text</b>");
    }

    #[test]
    fn test_extract_application_reads_html_body() {
        let msg = email(
            "careers@initech.com",
            "Your application",
            "<html><body><p>Thanks! You applied to <b>Acme Corp</b>.</p>\
             <p>We received your application for the position of <i>Data Engineer</i> at Acme.</p>\
             </body></html>",
            "2024-03-01",
        );
        let payload = extract_application(&msg, date("2024-03-02")).unwrap();

        assert_eq!(payload.company_name, "Acme Corp");
        assert_eq!(payload.role_applied_for, "Data Engineer");
        assert_eq!(payload.status, "Applied");
        assert_eq!(payload.days_since_update, 1);
    }

    #[test]
    fn test_guess_status_precedence() {
        assert_eq!(guess_status("Your interview is scheduled"), "Interview Scheduled");
        assert_eq!(guess_status("You have been shortlisted"), "Shortlisted");
        assert_eq!(guess_status("Unfortunately you were not selected"), "Rejected");
        assert_eq!(guess_status("We regret to reject"), "Rejected");
        assert_eq!(guess_status("You applied yesterday"), "Applied");
        assert_eq!(guess_status("Hello"), "Unknown");
        // interview outranks rejection
        assert_eq!(
            guess_status("After the interview we decided to reject"),
            "Interview Scheduled"
        );
    }

    #[test]
    fn test_days_since() {
        assert_eq!(days_since(date("2024-01-01"), date("2024-01-04")), 3);
        assert_eq!(days_since(date("2024-01-04"), date("2024-01-04")), 0);
        assert_eq!(days_since(date("2024-01-05"), date("2024-01-04")), -1);
    }

    #[test]
    fn test_sender_company() {
        assert_eq!(sender_company("Careers <careers@linkedin.com>"), "Linkedin");
        assert_eq!(sender_company("jobs@ACME.io"), "Acme");
        assert_eq!(sender_company("no address"), "Unknown");
    }

    #[test]
    fn test_extract_application_builds_payload() {
        let msg = email(
            "Talent <talent@acme.com>",
            "Application received",
            "Hi, you applied for Platform Engineer. We will review it soon.",
            "2024-03-01",
        );
        let payload = extract_application(&msg, date("2024-03-11")).unwrap();

        assert_eq!(payload.company_name, "Acme");
        assert_eq!(payload.role_applied_for, "Platform Engineer");
        assert_eq!(payload.date_applied, "2024-03-01");
        assert_eq!(payload.days_since_update, 10);
        assert_eq!(payload.status, "Applied");
    }

    #[test]
    fn test_extract_application_defaults_date_to_today() {
        let msg = email("", "Interview", "Your interview is on Monday.", "");
        let payload = extract_application(&msg, date("2024-05-20")).unwrap();
        assert_eq!(payload.date_applied, "2024-05-20");
        assert_eq!(payload.days_since_update, 0);
        assert_eq!(payload.status, "Interview Scheduled");
        assert_eq!(payload.company_name, "Unknown");
    }

    #[test]
    fn test_extract_application_rejects_unrelated_or_bad_date() {
        let unrelated = email("a@b.com", "Lunch", "Pizza on Friday", "");
        assert_eq!(
            extract_application(&unrelated, date("2024-01-01")),
            Err(IngestError::NotJobRelated)
        );

        let bad_date = email("a@b.com", "Application", "Thanks", "01/02/2024");
        assert_eq!(
            extract_application(&bad_date, date("2024-01-01")),
            Err(IngestError::InvalidDate("01/02/2024".to_string()))
        );
    }
}
