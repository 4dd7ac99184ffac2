use serde::{Deserialize, Deserializer, Serialize};

/// Status sent when the form's status field is left empty.
pub const DEFAULT_STATUS: &str = "Unknown";

/// A job application record as returned by the applications endpoint.
///
/// The server owns every invariant on these fields. Text columns the server
/// stores as `null` read as empty strings so a sparse record still renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role_applied_for: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date_applied: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub days_since_update: i32,
}

/// Body of a create or update request. Serializes exactly the five writable keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJobApplication {
    pub company_name: String,
    pub date_applied: String,
    pub days_since_update: i32,
    pub role_applied_for: String,
    pub status: String,
}

/// Raw values posted by the application form, keyed by the form control names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApplicationForm {
    #[serde(rename = "companyName")]
    pub company_name: String,
    #[serde(rename = "roleApplied")]
    pub role_applied: String,
    #[serde(rename = "applicationDate")]
    pub application_date: String,
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
    pub status: String,
}

impl ApplicationForm {
    /// Builds the request payload. Only two rules apply: an empty status becomes
    /// `"Unknown"` and an unparsable day count becomes 0. Other values pass through as typed.
    pub fn into_payload(self) -> NewJobApplication {
        let status = if self.status.is_empty() {
            DEFAULT_STATUS.to_string()
        } else {
            self.status
        };

        NewJobApplication {
            company_name: self.company_name,
            date_applied: self.application_date,
            days_since_update: parse_leading_int(&self.last_updated).unwrap_or(0),
            role_applied_for: self.role_applied,
            status,
        }
    }
}

/// Parses the integer at the start of `input`, ignoring anything after the digits.
///
/// `" 42 days"` gives `Some(42)`, `"abc"` gives `None`. Values that do not fit in
/// an `i32` also give `None`.
pub fn parse_leading_int(input: &str) -> Option<i32> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];
    if digits.is_empty() {
        return None;
    }

    let magnitude: i64 = digits.parse().ok()?;
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).ok()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
