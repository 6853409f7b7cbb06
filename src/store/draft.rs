use std::fmt;

use chrono::NaiveDate;

use crate::models::{format_number, net_weight, Record};

/// Date format used by drafts and records.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Editable fields of the record form. The net weight is derived and has no
/// draft counterpart.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DraftField {
    PlateNumber,
    YukBilan,
    Yuksiz,
    Date,
    Summa,
    CheckNumber,
}

impl DraftField {
    /// Whether the field holds a number that gets coerced on submit.
    pub fn is_numeric(self) -> bool {
        matches!(self, DraftField::YukBilan | DraftField::Yuksiz | DraftField::Summa)
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DraftField::PlateNumber => "Plate Number",
            DraftField::YukBilan => "Yuk bilan (Kg)",
            DraftField::Yuksiz => "Yuksiz (Kg)",
            DraftField::Date => "Date",
            DraftField::Summa => "Summa",
            DraftField::CheckNumber => "Check Number",
        };
        f.write_str(label)
    }
}

/// In-progress form contents. Every field is kept as the raw text the user
/// typed; coercion happens only when the draft is submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub plate_number: String,
    pub yuk_bilan: String,
    pub yuksiz: String,
    pub date: String,
    pub summa: String,
    pub check_number: String,
}

impl Draft {
    /// Empty draft with the date pre-filled.
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            date: today.format(DATE_FORMAT).to_string(),
            ..Self::default()
        }
    }

    /// Copy a record into the form, numbers rendered as text.
    pub fn from_record(record: &Record) -> Self {
        Self {
            plate_number: record.plate_number.clone(),
            yuk_bilan: format_number(record.yuk_bilan),
            yuksiz: format_number(record.yuksiz),
            date: record.date.clone(),
            summa: format_number(record.summa),
            check_number: record.check_number.clone(),
        }
    }

    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::PlateNumber => &self.plate_number,
            DraftField::YukBilan => &self.yuk_bilan,
            DraftField::Yuksiz => &self.yuksiz,
            DraftField::Date => &self.date,
            DraftField::Summa => &self.summa,
            DraftField::CheckNumber => &self.check_number,
        }
    }

    pub fn field_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::PlateNumber => &mut self.plate_number,
            DraftField::YukBilan => &mut self.yuk_bilan,
            DraftField::Yuksiz => &mut self.yuksiz,
            DraftField::Date => &mut self.date,
            DraftField::Summa => &mut self.summa,
            DraftField::CheckNumber => &mut self.check_number,
        }
    }

    /// Net weight shown in the read-only form field. `None` while both
    /// weight inputs are untouched so the form does not show a premature 0.
    pub fn computed_net_weight(&self) -> Option<f64> {
        if self.yuk_bilan.is_empty() && self.yuksiz.is_empty() {
            return None;
        }
        Some(net_weight(
            parse_number(&self.yuk_bilan),
            parse_number(&self.yuksiz),
        ))
    }
}

/// Coerce raw input into a non-negative number. Blank, non-numeric,
/// non-finite and negative input all become 0.
pub fn parse_number(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seed_records;

    #[test]
    fn parse_number_falls_back_to_zero() {
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("   "), 0.0);
        assert_eq!(parse_number("abc"), 0.0);
        assert_eq!(parse_number("NaN"), 0.0);
        assert_eq!(parse_number("inf"), 0.0);
        assert_eq!(parse_number("-12"), 0.0);
        assert_eq!(parse_number(" 42000 "), 42000.0);
        assert_eq!(parse_number("12.5"), 12.5);
    }

    #[test]
    fn net_weight_blank_until_a_weight_is_typed() {
        let mut draft = Draft::default();
        assert_eq!(draft.computed_net_weight(), None);

        draft.yuk_bilan = "42000".into();
        assert_eq!(draft.computed_net_weight(), Some(42000.0));

        draft.yuksiz = "50000".into();
        assert_eq!(draft.computed_net_weight(), Some(0.0));

        draft.yuk_bilan.clear();
        draft.yuksiz = "x".into();
        assert_eq!(draft.computed_net_weight(), Some(0.0));
    }

    #[test]
    fn blank_draft_carries_the_given_date() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let draft = Draft::blank(today);
        assert_eq!(draft.date, "2026-10-16");
        assert!(draft.plate_number.is_empty());
        assert!(draft.check_number.is_empty());
    }

    #[test]
    fn from_record_renders_numbers_as_text() {
        let record = &seed_records()[1];
        let draft = Draft::from_record(record);
        assert_eq!(draft.plate_number, "KZ 90 B456");
        assert_eq!(draft.yuk_bilan, "39800");
        assert_eq!(draft.yuksiz, "15500");
        assert_eq!(draft.summa, "40000");
        assert_eq!(draft.date, "2024-06-17");
        assert_eq!(draft.check_number, "CHK-6542");
        assert_eq!(draft.field(DraftField::Yuksiz), "15500");
    }
}
