//! Record definitions: the declarative field tables shared by the validator
//! and the line encoder.
//!
//! A definition lists, in declaration order, every field of one record kind
//! together with its semantic type, column placement, constraints and default.
//! Neither the validator nor the encoder knows anything about a particular
//! banking format; both are driven entirely by these tables.

use crate::constraint::Constraint;
use crate::record::Record;
use crate::violation::Violation;

/// Semantic type of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Whole number.
    Integer,
    /// Decimal rendered with `scale` implied decimal places.
    Amount { scale: u32 },
    /// Calendar date rendered with a `chrono` format string.
    Date { format: &'static str },
}

/// Padding rule for a rendered field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    /// Left-justified, space-filled.
    Left,
    /// Right-justified, space-filled.
    Right,
    /// Right-justified, zero-filled. Absent values render as all zeros.
    Zero,
    /// Right-justified, zero-filled when present; all spaces when absent.
    ZeroOrBlank,
}

/// Column span of a rendered field. `start` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub start: usize,
    pub width: usize,
    pub justify: Justify,
}

impl Placement {
    /// Last column occupied (inclusive, 1-based).
    pub fn end(&self) -> usize {
        self.start + self.width - 1
    }
}

/// One field of a record definition.
#[derive(Debug)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    /// `None` for batch metadata that is validated but never rendered.
    pub placement: Option<Placement>,
    pub constraints: Vec<Constraint>,
    pub default: Option<&'static str>,
}

impl FieldDef {
    fn placed(name: &'static str, kind: FieldKind, start: usize, width: usize, justify: Justify) -> Self {
        FieldDef {
            name,
            kind,
            placement: Some(Placement {
                start,
                width,
                justify,
            }),
            constraints: Vec::new(),
            default: None,
        }
    }

    /// Left-justified text field.
    pub fn text(name: &'static str, start: usize, width: usize) -> Self {
        Self::placed(name, FieldKind::Text, start, width, Justify::Left)
    }

    /// Zero-filled whole number field.
    pub fn integer(name: &'static str, start: usize, width: usize) -> Self {
        Self::placed(name, FieldKind::Integer, start, width, Justify::Zero)
    }

    /// Zero-filled implied-decimal amount field.
    pub fn amount(name: &'static str, start: usize, width: usize, scale: u32) -> Self {
        Self::placed(name, FieldKind::Amount { scale }, start, width, Justify::Zero)
    }

    /// Date field, limited to four-digit years unless narrowed with [`FieldDef::years`].
    pub fn date(name: &'static str, start: usize, width: usize, format: &'static str) -> Self {
        Self::placed(name, FieldKind::Date { format }, start, width, Justify::Left)
            .check(Constraint::years(0, 9999))
    }

    /// Field carried for validation only; the encoder skips it.
    pub fn unplaced(name: &'static str, kind: FieldKind) -> Self {
        FieldDef {
            name,
            kind,
            placement: None,
            constraints: Vec::new(),
            default: None,
        }
    }

    pub fn justify(mut self, justify: Justify) -> Self {
        if let Some(placement) = self.placement.as_mut() {
            placement.justify = justify;
        }
        self
    }

    pub fn default_value(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    /// Replaces the accepted year window of a date field.
    pub fn years(mut self, min_year: i32, max_year: i32) -> Self {
        self.constraints
            .retain(|c| !matches!(c, Constraint::DateRange { .. }));
        self.check(Constraint::years(min_year, max_year))
    }

    /// Appends a constraint; constraints run in the order they were added.
    pub fn check(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Human-readable name used in violation messages, e.g. `account_name` → `Account name`.
    pub fn label(&self) -> String {
        let spaced = self.name.replace('_', " ");
        let mut chars = spaced.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Every record kind the codec knows how to validate and encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    AbaHeader,
    AbaDetail,
    AbaTrailer,
    InternationalHeader,
    InternationalPayment,
    InternationalTrailer,
}

impl RecordKind {
    pub fn name(&self) -> &'static str {
        match self {
            RecordKind::AbaHeader => "ABA descriptive",
            RecordKind::AbaDetail => "ABA detail",
            RecordKind::AbaTrailer => "ABA file total",
            RecordKind::InternationalHeader => "international header",
            RecordKind::InternationalPayment => "international payment",
            RecordKind::InternationalTrailer => "international trailer",
        }
    }
}

/// A named record-level rule over several fields of one record.
#[derive(Debug, Clone, Copy)]
pub struct CrossFieldRule {
    pub name: &'static str,
    pub check: fn(&Record) -> Option<Violation>,
}

/// Complete declaration of one record kind.
#[derive(Debug)]
pub struct RecordDefinition {
    pub kind: RecordKind,
    /// Rendered line width in characters, excluding the line terminator.
    pub line_width: usize,
    pub fields: Vec<FieldDef>,
    pub rules: Vec<CrossFieldRule>,
}

impl RecordDefinition {
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Placed fields in column order.
    pub fn placed_fields(&self) -> Vec<(&FieldDef, Placement)> {
        let mut placed: Vec<_> = self
            .fields
            .iter()
            .filter_map(|f| f.placement.map(|p| (f, p)))
            .collect();
        placed.sort_by_key(|(_, p)| p.start);
        placed
    }

    /// Checks that placed fields fit the line and never overlap.
    ///
    /// Returns a description of the first problem found.
    pub fn layout_problem(&self) -> Option<String> {
        let mut next_free = 1;
        for (field, placement) in self.placed_fields() {
            if placement.width == 0 {
                return Some(format!("{} has zero width", field.name));
            }
            if placement.start < next_free {
                return Some(format!("{} overlaps the previous field", field.name));
            }
            if placement.end() > self.line_width {
                return Some(format!(
                    "{} ends at column {} beyond line width {}",
                    field.name,
                    placement.end(),
                    self.line_width
                ));
            }
            next_free = placement.end() + 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RecordDefinition {
        RecordDefinition {
            kind: RecordKind::AbaDetail,
            line_width: 10,
            fields: vec![
                FieldDef::integer("count", 5, 3),
                FieldDef::text("code", 1, 2),
                FieldDef::unplaced("meta", FieldKind::Text),
            ],
            rules: Vec::new(),
        }
    }

    #[test]
    fn test_label_humanises_name() {
        assert_eq!(FieldDef::text("account_name", 1, 1).label(), "Account name");
        assert_eq!(FieldDef::text("bsb", 1, 1).label(), "Bsb");
    }

    #[test]
    fn test_date_year_window_replaced_not_stacked() {
        let default = FieldDef::date("value_date", 1, 8, "%d%m%Y");
        assert!(matches!(
            default.constraints.as_slice(),
            [Constraint::DateRange { min_year: 0, max_year: 9999 }]
        ));

        let narrowed = FieldDef::date("processing_date", 1, 6, "%d%m%y").years(2000, 2099);
        assert!(matches!(
            narrowed.constraints.as_slice(),
            [Constraint::DateRange { min_year: 2000, max_year: 2099 }]
        ));
    }

    #[test]
    fn test_placed_fields_sorted_by_column() {
        let def = sample();
        let names: Vec<_> = def.placed_fields().iter().map(|(f, _)| f.name).collect();
        assert_eq!(names, vec!["code", "count"]);
        assert_eq!(def.layout_problem(), None);
    }

    #[test]
    fn test_layout_problem_detects_overlap_and_overflow() {
        let mut def = sample();
        def.fields.push(FieldDef::text("clash", 6, 1));
        assert!(def.layout_problem().unwrap().contains("overlaps"));

        let mut def = sample();
        def.fields.push(FieldDef::text("tail", 9, 5));
        assert!(def.layout_problem().unwrap().contains("beyond line width"));
    }
}
