//! Domain models for the weighing log. Records stay light-weight data holders
//! so the store can focus on state transitions and the UI on presentation.
//! The one rule baked into this module is the net weight derivation: nothing
//! outside `Record::new` ever writes `sof_vazin`.

use std::fmt;

/// Opaque identifier for a record. Seed rows use short `rec-NNN` ids while
/// records created at runtime carry a UUID string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// One cargo-weighing transaction.
pub struct Record {
    /// Assigned on creation and preserved across edits.
    pub id: RecordId,
    /// Vehicle plate as typed, trimmed.
    pub plate_number: String,
    /// Gross weight (loaded vehicle), kilograms.
    pub yuk_bilan: f64,
    /// Tare weight (empty vehicle), kilograms.
    pub yuksiz: f64,
    /// Net weight, always `max(yuk_bilan - yuksiz, 0)`.
    pub sof_vazin: f64,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Price charged for the weighing.
    pub summa: f64,
    pub check_number: String,
}

impl Record {
    /// Build a record, deriving the net weight from the gross and tare
    /// weights.
    pub fn new(
        id: RecordId,
        plate_number: impl Into<String>,
        yuk_bilan: f64,
        yuksiz: f64,
        date: impl Into<String>,
        summa: f64,
        check_number: impl Into<String>,
    ) -> Self {
        Self {
            id,
            plate_number: plate_number.into(),
            yuk_bilan,
            yuksiz,
            sof_vazin: net_weight(yuk_bilan, yuksiz),
            date: date.into(),
            summa,
            check_number: check_number.into(),
        }
    }

    /// Concatenate every field the way the search box sees them: plate,
    /// gross, tare, net, date, price and check number separated by spaces.
    pub fn search_text(&self) -> String {
        format!(
            "{} {} {} {} {} {} {}",
            self.plate_number,
            format_number(self.yuk_bilan),
            format_number(self.yuksiz),
            format_number(self.sof_vazin),
            self.date,
            format_number(self.summa),
            self.check_number
        )
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.plate_number)
    }
}

/// Gross minus tare, floored at zero.
pub fn net_weight(gross: f64, tare: f64) -> f64 {
    let difference = gross - tare;
    if difference > 0.0 {
        difference
    } else {
        0.0
    }
}

/// Render a number in its shortest decimal form: `42000` rather than
/// `42000.0`, `1.5` stays `1.5`.
pub fn format_number(value: f64) -> String {
    value.to_string()
}

/// The three hard-coded rows used at start-up and by "Reload". Every call
/// returns a fresh copy, so edits to the live collection never leak back.
pub fn seed_records() -> Vec<Record> {
    vec![
        Record::new(
            RecordId::new("rec-001"),
            "UZ 45 A123",
            42000.0,
            16000.0,
            "2024-06-15",
            30000.0,
            "CHK-9834",
        ),
        Record::new(
            RecordId::new("rec-002"),
            "KZ 90 B456",
            39800.0,
            15500.0,
            "2024-06-17",
            40000.0,
            "CHK-6542",
        ),
        Record::new(
            RecordId::new("rec-003"),
            "UZ 10 Z999",
            36500.0,
            14900.0,
            "2024-06-18",
            28000.0,
            "CHK-7741",
        ),
    ]
}
