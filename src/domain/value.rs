use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone};

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Mobily account username. Mobily uses the account's mobile phone number as
/// the username.
///
/// Invariant: non-empty after trimming.
pub struct Username(String);

impl Username {
    /// Form field name used by Mobily (`mobile`).
    pub const FIELD: &'static str = "mobile";

    /// Create a validated [`Username`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated username.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Mobily account password.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct AccountPassword(String);

impl AccountPassword {
    /// Form field name used by Mobily (`password`).
    pub const FIELD: &'static str = "password";

    /// Create a validated [`AccountPassword`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the password as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// A recipient phone number as sent to Mobily.
///
/// Invariant: non-empty after trimming. This type does not normalize or
/// validate number formats; Mobily accepts local-format numbers and reports
/// bad ones with its own response code.
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Form field name the joined recipient list is sent under (`numbers`).
    pub const FIELD: &'static str = "numbers";

    /// Create a validated [`PhoneNumber`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the number as it will appear on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message text (`msg`), UTF-8.
///
/// Invariant: non-empty after trimming. The original value (including
/// whitespace) is preserved.
pub struct MessageText(String);

impl MessageText {
    /// Form field name used by Mobily (`msg`).
    pub const FIELD: &'static str = "msg";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Sender name shown to the recipient (`sender`).
///
/// Invariant: non-empty after trimming. The value must be activated for your
/// Mobily account.
pub struct SenderId(String);

impl SenderId {
    /// Form field name used by Mobily (`sender`).
    pub const FIELD: &'static str = "sender";

    /// Create a validated [`SenderId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated sender id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Caller-chosen message id (`msgId`).
///
/// Invariant: non-empty after trimming.
pub struct MessageId(String);

impl MessageId {
    /// Form field name used by Mobily (`msgId`).
    pub const FIELD: &'static str = "msgId";

    /// Create a validated [`MessageId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated message id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Key that allows a previously scheduled message to be deleted (`deleteKey`).
///
/// Invariant: non-empty after trimming.
pub struct DeletionKey(String);

impl DeletionKey {
    /// Form field name used by Mobily (`deleteKey`).
    pub const FIELD: &'static str = "deleteKey";

    /// Create a validated [`DeletionKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated deletion key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Accepted textual schedule formats, tried in order.
const SCHEDULE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// The local wall-clock time a message is scheduled to be sent at.
///
/// Mobily receives this as two separate form fields; the wire formatting
/// lives in the transport layer.
pub struct ScheduleTime(DateTime<Local>);

impl ScheduleTime {
    /// Parse a schedule time from RFC 3339 or a local
    /// `YYYY-MM-DD HH:MM[:SS]` string.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(parsed.with_timezone(&Local)));
        }
        for format in SCHEDULE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
                if let Some(local) = Local.from_local_datetime(&naive).earliest() {
                    return Ok(Self(local));
                }
            }
        }
        Err(ValidationError::InvalidScheduleTime {
            input: input.to_owned(),
        })
    }

    /// The scheduled point in time.
    pub fn datetime(&self) -> DateTime<Local> {
        self.0
    }

    /// Whether the scheduled time is still ahead of the local clock.
    pub fn is_future(&self) -> bool {
        self.0 > Local::now()
    }

    /// Signed duration from now until the scheduled time (negative once the
    /// schedule has passed).
    pub fn until(&self) -> Duration {
        self.0.signed_duration_since(Local::now())
    }
}

impl From<DateTime<Local>> for ScheduleTime {
    fn from(value: DateTime<Local>) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// One recipient's key/value substitutions for templated bulk messages.
///
/// Keys are kept sorted so the encoded form is deterministic.
pub struct VariableSet(BTreeMap<String, String>);

impl VariableSet {
    /// Build a set from key/value pairs.
    pub fn new<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Iterate the substitutions in key order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether the set carries no substitutions.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_trims_and_rejects_empty() {
        assert_eq!(Username::new(" 96650000001 ").unwrap().as_str(), "96650000001");
        assert!(matches!(
            Username::new("   "),
            Err(ValidationError::Empty {
                field: Username::FIELD
            })
        ));
    }

    #[test]
    fn account_password_preserves_whitespace() {
        assert_eq!(AccountPassword::new(" p w ").unwrap().as_str(), " p w ");
        assert!(AccountPassword::new("").is_err());
    }

    #[test]
    fn schedule_time_parses_common_formats() {
        let from_space = ScheduleTime::parse("2030-06-01 08:30:00").unwrap();
        assert_eq!(
            from_space.datetime().naive_local().to_string(),
            "2030-06-01 08:30:00"
        );

        let without_seconds = ScheduleTime::parse("2030-06-01 08:30").unwrap();
        assert_eq!(from_space, without_seconds);

        assert!(ScheduleTime::parse("2030-06-01T08:30:00+03:00").is_ok());
        assert!(matches!(
            ScheduleTime::parse("tomorrow-ish"),
            Err(ValidationError::InvalidScheduleTime { .. })
        ));
    }

    #[test]
    fn schedule_time_future_and_until_agree() {
        let future = ScheduleTime::from(Local::now() + Duration::hours(1));
        assert!(future.is_future());
        assert!(future.until() > Duration::zero());

        let past = ScheduleTime::from(Local::now() - Duration::hours(1));
        assert!(!past.is_future());
        assert!(past.until() < Duration::zero());
    }

    #[test]
    fn variable_set_orders_keys() {
        let set = VariableSet::new([("b", "2"), ("a", "1")]);
        let pairs: Vec<_> = set.pairs().collect();
        assert_eq!(pairs, vec![("a", "1"), ("b", "2")]);
    }
}
