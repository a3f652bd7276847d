//! Column-oriented result table handed back to the caller.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "values", rename_all = "lowercase")]
pub enum Values {
    Time(Vec<DateTime<Utc>>),
    Number(Vec<f64>),
}

impl Values {
    fn len(&self) -> usize {
        match self {
            Values::Time(v) => v.len(),
            Values::Number(v) => v.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    #[serde(flatten)]
    pub values: Values,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Frame {
    /// Empty `response` frame with a `time` and a `value` column.
    pub fn annotations() -> Self {
        Frame {
            name: "response".to_string(),
            fields: vec![
                Field {
                    name: "time".to_string(),
                    values: Values::Time(Vec::new()),
                },
                Field {
                    name: "value".to_string(),
                    values: Values::Number(Vec::new()),
                },
            ],
        }
    }

    pub fn append_row(&mut self, time: DateTime<Utc>, value: f64) {
        for field in self.fields.iter_mut() {
            match &mut field.values {
                Values::Time(v) => v.push(time),
                Values::Number(v) => v.push(value),
            }
        }
    }

    /// Row count; all columns are kept the same length by `append_row`.
    pub fn len(&self) -> usize {
        self.fields.first().map(|f| f.values.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn times(&self) -> &[DateTime<Utc>] {
        self.fields
            .iter()
            .find_map(|f| match &f.values {
                Values::Time(v) => Some(v.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn values(&self) -> &[f64] {
        self.fields
            .iter()
            .find_map(|f| match &f.values {
                Values::Number(v) => Some(v.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }
}
