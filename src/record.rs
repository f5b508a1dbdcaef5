//! Record values.
//!
//! A [`Record`] is the caller-facing, mutable form: an ordered mapping from
//! the fields of a [`RecordDefinition`] to optional [`Value`]s. A
//! [`ValidRecord`] is what the validator hands back once every constraint has
//! passed; its values are already coerced to the field's semantic type so the
//! encoder never has to parse anything.

use crate::definition::{FieldDef, FieldKind, RecordDefinition, RecordKind};
use crate::error::{CodecError, Result};
use crate::money::Money;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Date format accepted for dates supplied as text.
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// A value supplied by the caller for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Date(NaiveDate),
}

impl Value {
    /// Empty or whitespace-only text counts as not provided.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Canonical text form used by text constraints and text rendering.
    pub fn to_text(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Integer(n) => n.to_string(),
            Value::Decimal(d) => d.to_string(),
            Value::Date(d) => d.format(INPUT_DATE_FORMAT).to_string(),
        }
    }

    /// Interprets the value as a number; `None` if it is not one.
    pub fn to_number(&self) -> Option<Decimal> {
        match self {
            Value::Integer(n) => Some(Decimal::from(*n)),
            Value::Decimal(d) => Some(*d),
            Value::Text(s) => Decimal::from_str(s.trim()).ok(),
            Value::Date(_) => None,
        }
    }

    pub fn to_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::Text(s) => NaiveDate::parse_from_str(s.trim(), INPUT_DATE_FORMAT).ok(),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<Money> for Value {
    fn from(value: Money) -> Self {
        Value::Decimal(value.as_decimal())
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

/// A record under construction by the caller.
///
/// Created with the definition's defaults applied, then populated field by
/// field. Values are not checked on assignment; that is the validator's job.
#[derive(Debug, Clone)]
pub struct Record {
    definition: &'static RecordDefinition,
    values: Vec<Option<Value>>,
}

impl Record {
    /// Creates an empty record with the definition's defaults applied.
    pub fn new(definition: &'static RecordDefinition) -> Self {
        let values = definition
            .fields
            .iter()
            .map(|f| f.default.map(Value::from))
            .collect();
        Record { definition, values }
    }

    pub fn definition(&self) -> &'static RecordDefinition {
        self.definition
    }

    pub fn kind(&self) -> RecordKind {
        self.definition.kind
    }

    /// Raw value of a field, including blank text.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let idx = self.definition.index_of(name)?;
        self.values[idx].as_ref()
    }

    /// Value of a field if it was provided and is not blank.
    pub fn present(&self, name: &str) -> Option<&Value> {
        self.get(name).filter(|v| !v.is_blank())
    }

    /// Assigns a field value.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownField`] if the definition has no such field.
    pub fn set<V: Into<Value>>(&mut self, name: &str, value: V) -> Result<&mut Self> {
        let idx = self.position(name)?;
        self.values[idx] = Some(value.into());
        Ok(self)
    }

    /// Removes a field value, leaving it absent.
    pub fn clear(&mut self, name: &str) -> Result<&mut Self> {
        let idx = self.position(name)?;
        self.values[idx] = None;
        Ok(self)
    }

    /// Builder form of [`Record::set`].
    pub fn with<V: Into<Value>>(mut self, name: &str, value: V) -> Result<Self> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Sets a field the codec itself derives; names come from the definitions.
    pub(crate) fn fill(&mut self, name: &str, value: Value) {
        if let Some(idx) = self.definition.index_of(name) {
            self.values[idx] = Some(value);
        }
    }

    /// Fields in declaration order paired with their current values.
    pub fn fields(&self) -> impl Iterator<Item = (&'static FieldDef, Option<&Value>)> + '_ {
        self.definition
            .fields
            .iter()
            .zip(self.values.iter().map(|v| v.as_ref()))
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.definition
            .index_of(name)
            .ok_or_else(|| CodecError::UnknownField {
                record: self.definition.kind.name(),
                field: name.to_string(),
            })
    }
}

/// A field value coerced to its semantic type.
#[derive(Debug, Clone, PartialEq)]
pub enum Typed {
    Text(String),
    Number(Decimal),
    Date(NaiveDate),
}

impl Typed {
    /// Coerces a provided value to the type `kind` requires.
    pub fn coerce(value: &Value, kind: FieldKind) -> Option<Typed> {
        match kind {
            FieldKind::Text => Some(Typed::Text(value.to_text())),
            FieldKind::Integer | FieldKind::Amount { .. } => value.to_number().map(Typed::Number),
            FieldKind::Date { .. } => value.to_date().map(Typed::Date),
        }
    }
}

/// A record that passed validation, with every present value typed.
///
/// Only the validator constructs these, so holding one is proof that the
/// record satisfied every constraint of its definition.
#[derive(Debug, Clone)]
pub struct ValidRecord {
    definition: &'static RecordDefinition,
    values: Vec<Option<Typed>>,
    record_id: Option<usize>,
}

impl ValidRecord {
    pub(crate) fn new(definition: &'static RecordDefinition, values: Vec<Option<Typed>>) -> Self {
        ValidRecord {
            definition,
            values,
            record_id: None,
        }
    }

    pub(crate) fn with_record_id(mut self, id: usize) -> Self {
        self.record_id = Some(id);
        self
    }

    pub fn definition(&self) -> &'static RecordDefinition {
        self.definition
    }

    pub fn kind(&self) -> RecordKind {
        self.definition.kind
    }

    /// 1-based position within the batch, for detail records.
    pub fn record_id(&self) -> Option<usize> {
        self.record_id
    }

    pub fn get(&self, name: &str) -> Option<&Typed> {
        let idx = self.definition.index_of(name)?;
        self.values[idx].as_ref()
    }

    pub fn number(&self, name: &str) -> Option<Decimal> {
        match self.get(name) {
            Some(Typed::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(Typed::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static FieldDef, Option<&Typed>)> + '_ {
        self.definition
            .fields
            .iter()
            .zip(self.values.iter().map(|v| v.as_ref()))
    }
}

// Definitions are statics, so identity is enough to compare them.
impl PartialEq for ValidRecord {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.definition, other.definition)
            && self.values == other.values
            && self.record_id == other.record_id
    }
}
