use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::store::{Draft, DraftField};

/// Maximum length of a `YYYY-MM-DD` date.
const DATE_LEN: usize = 10;

/// Fields of the on-screen form in tab order. `SofVazin` is displayed but
/// never receives focus.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum FormField {
    PlateNumber,
    YukBilan,
    Yuksiz,
    SofVazin,
    Date,
    Summa,
    CheckNumber,
}

impl Default for FormField {
    fn default() -> Self {
        FormField::PlateNumber
    }
}

const TAB_ORDER: [FormField; 7] = [
    FormField::PlateNumber,
    FormField::YukBilan,
    FormField::Yuksiz,
    FormField::SofVazin,
    FormField::Date,
    FormField::Summa,
    FormField::CheckNumber,
];

impl FormField {
    /// Left column top to bottom, then right column.
    pub(crate) const LEFT: [FormField; 4] = [
        FormField::PlateNumber,
        FormField::YukBilan,
        FormField::Yuksiz,
        FormField::SofVazin,
    ];
    pub(crate) const RIGHT: [FormField; 3] =
        [FormField::Date, FormField::Summa, FormField::CheckNumber];

    pub(crate) fn label(self) -> &'static str {
        match self {
            FormField::PlateNumber => "Plate Number",
            FormField::YukBilan => "Yuk bilan (Kg)",
            FormField::Yuksiz => "Yuksiz (Kg)",
            FormField::SofVazin => "Sof Vazin (Kg)",
            FormField::Date => "Date",
            FormField::Summa => "Summa",
            FormField::CheckNumber => "Add-on Check Number",
        }
    }

    /// The draft field backing this form field, if it is editable.
    pub(crate) fn draft_field(self) -> Option<DraftField> {
        match self {
            FormField::PlateNumber => Some(DraftField::PlateNumber),
            FormField::YukBilan => Some(DraftField::YukBilan),
            FormField::Yuksiz => Some(DraftField::Yuksiz),
            FormField::SofVazin => None,
            FormField::Date => Some(DraftField::Date),
            FormField::Summa => Some(DraftField::Summa),
            FormField::CheckNumber => Some(DraftField::CheckNumber),
        }
    }

    pub(crate) fn next(self) -> Self {
        self.step(1)
    }

    pub(crate) fn previous(self) -> Self {
        self.step(TAB_ORDER.len() - 1)
    }

    fn step(self, by: usize) -> Self {
        let mut idx = TAB_ORDER.iter().position(|f| *f == self).unwrap_or(0);
        loop {
            idx = (idx + by) % TAB_ORDER.len();
            if TAB_ORDER[idx].draft_field().is_some() {
                return TAB_ORDER[idx];
            }
        }
    }

    /// Row and column of the field inside the form panel.
    pub(crate) fn grid_position(self) -> (u16, u16) {
        if let Some(row) = Self::LEFT.iter().position(|f| *f == self) {
            return (row as u16, 0);
        }
        let row = Self::RIGHT.iter().position(|f| *f == self).unwrap_or(0);
        (row as u16, 1)
    }
}

impl From<DraftField> for FormField {
    fn from(field: DraftField) -> Self {
        match field {
            DraftField::PlateNumber => FormField::PlateNumber,
            DraftField::YukBilan => FormField::YukBilan,
            DraftField::Yuksiz => FormField::Yuksiz,
            DraftField::Date => FormField::Date,
            DraftField::Summa => FormField::Summa,
            DraftField::CheckNumber => FormField::CheckNumber,
        }
    }
}

/// Whether `ch` may be appended to `current` for the given field. Numeric
/// fields take digits and one decimal point; the date takes digits and
/// dashes up to its fixed length.
pub(crate) fn accepts_char(field: DraftField, current: &str, ch: char) -> bool {
    if field.is_numeric() {
        return ch.is_ascii_digit() || (ch == '.' && !current.contains('.'));
    }
    match field {
        DraftField::Date => {
            (ch.is_ascii_digit() || ch == '-') && current.chars().count() < DATE_LEN
        }
        _ => !ch.is_control(),
    }
}

/// Text currently shown for a form field, including the derived net weight.
pub(crate) fn field_value(draft: &Draft, field: FormField) -> String {
    match field.draft_field() {
        Some(draft_field) => draft.field(draft_field).to_string(),
        None => draft
            .computed_net_weight()
            .map(|net| net.to_string())
            .unwrap_or_default(),
    }
}

/// Render one labelled field for the form panel.
pub(crate) fn build_line(draft: &Draft, field: FormField, active: bool) -> Line<'static> {
    let value = field_value(draft, field);
    let placeholder = match field {
        FormField::PlateNumber => "<required>",
        FormField::SofVazin => "",
        _ => "<optional>",
    };

    let display = if value.is_empty() {
        placeholder.to_string()
    } else {
        value.clone()
    };

    let style = if active {
        Style::default().fg(Color::Yellow)
    } else if field == FormField::SofVazin {
        Style::default().add_modifier(Modifier::BOLD)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(field_prefix(field)),
        Span::styled(display, style),
    ])
}

/// `"<label>: "`, the text before the value on a form line.
pub(crate) fn field_prefix(field: FormField) -> String {
    format!("{}: ", field.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_order_skips_net_weight() {
        assert_eq!(FormField::Yuksiz.next(), FormField::Date);
        assert_eq!(FormField::Date.previous(), FormField::Yuksiz);
        assert_eq!(FormField::CheckNumber.next(), FormField::PlateNumber);
        assert_eq!(FormField::PlateNumber.previous(), FormField::CheckNumber);
    }

    #[test]
    fn numeric_fields_take_one_decimal_point() {
        assert!(accepts_char(DraftField::YukBilan, "12", '3'));
        assert!(accepts_char(DraftField::YukBilan, "12", '.'));
        assert!(!accepts_char(DraftField::YukBilan, "12.5", '.'));
        assert!(!accepts_char(DraftField::Summa, "", 'a'));
        assert!(!accepts_char(DraftField::Summa, "", '-'));
    }

    #[test]
    fn date_is_length_limited() {
        assert!(accepts_char(DraftField::Date, "2024-06-1", '5'));
        assert!(!accepts_char(DraftField::Date, "2024-06-15", '5'));
        assert!(!accepts_char(DraftField::Date, "2024", '/'));
    }

    #[test]
    fn net_weight_value_is_blank_until_weights_typed() {
        let mut draft = Draft::default();
        assert_eq!(field_value(&draft, FormField::SofVazin), "");
        draft.yuk_bilan = "42000".into();
        draft.yuksiz = "16000".into();
        assert_eq!(field_value(&draft, FormField::SofVazin), "26000");
    }

    #[test]
    fn grid_positions_cover_both_columns() {
        assert_eq!(FormField::PlateNumber.grid_position(), (0, 0));
        assert_eq!(FormField::SofVazin.grid_position(), (3, 0));
        assert_eq!(FormField::CheckNumber.grid_position(), (2, 1));
    }
}
