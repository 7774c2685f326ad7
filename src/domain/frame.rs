// Frame domain models
use chrono::{DateTime, FixedOffset};

/// One rendered table, one per requested point.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Frame {
    pub fn new(name: String, fields: Vec<Field>) -> Self {
        Self { name, fields }
    }

    #[cfg(test)]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub values: FieldValues,
}

impl Field {
    pub fn new(name: impl Into<String>, values: FieldValues) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValues {
    Time(Vec<DateTime<FixedOffset>>),
    Number(Vec<f64>),
    Text(Vec<String>),
}

impl FieldValues {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValues::Time(_) => "time",
            FieldValues::Number(_) => "number",
            FieldValues::Text(_) => "string",
        }
    }
}
