//! Sources of fresh record ids, check-number suffixes and today's date. The
//! store only talks to these traits so tests can swap in deterministic
//! implementations.

use chrono::{NaiveDate, Utc};
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use uuid::Uuid;

use crate::models::RecordId;

/// Length of the random part of a generated check number.
pub const CHECK_SUFFIX_LEN: usize = 6;
/// Prefix shared by all check numbers.
pub const CHECK_PREFIX: &str = "CHK-";

pub trait IdSource {
    /// A record id that has not been handed out before.
    fn record_id(&mut self) -> RecordId;
    /// `CHECK_SUFFIX_LEN` uppercase alphanumeric characters.
    fn check_suffix(&mut self) -> String;
}

pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Production id source: UUID v4 ids and thread-rng check suffixes.
#[derive(Debug, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn record_id(&mut self) -> RecordId {
        RecordId::new(Uuid::new_v4().to_string())
    }

    fn check_suffix(&mut self) -> String {
        thread_rng()
            .sample_iter(&Alphanumeric)
            .take(CHECK_SUFFIX_LEN)
            .map(|byte| char::from(byte).to_ascii_uppercase())
            .collect()
    }
}

/// Deterministic id source: `id-1`, `id-2`, ... and suffixes `000001`,
/// `000002`, ...
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: u64,
}

impl IdSource for SequentialIds {
    fn record_id(&mut self) -> RecordId {
        self.next += 1;
        RecordId::new(format!("id-{}", self.next))
    }

    fn check_suffix(&mut self) -> String {
        self.next += 1;
        format!("{:0width$}", self.next, width = CHECK_SUFFIX_LEN)
    }
}

/// Today's date in UTC.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock pinned to a single day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Build a check number from a suffix.
pub fn check_number(suffix: &str) -> String {
    format!("{CHECK_PREFIX}{suffix}")
}

/// Whether `value` looks like a generated check number.
pub fn is_generated_check_number(value: &str) -> bool {
    value.strip_prefix(CHECK_PREFIX).is_some_and(|suffix| {
        suffix.len() == CHECK_SUFFIX_LEN
            && suffix
                .chars()
                .all(|ch| ch.is_ascii_digit() || ch.is_ascii_uppercase())
    })
}
