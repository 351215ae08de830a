//! Storing mappings as text columns.
//!
//! [`DictData`] is a mapping that was read from (or will be written to) a
//! text column, and [`DictField`] converts between the two representations
//! with the null handling a database column needs. Form input goes through
//! [`DictField::clean`].

use core::{fmt, ops::Deref};

use thiserror::Error;

use crate::{
    api::data_eval,
    evaluator::DataEvalError,
    values::{DEFAULT_WIDTH, EncodeError, Mapping, Value, encode, to_pretty_string},
};

#[derive(Debug, Error)]
pub enum FieldError {
    /// The text evaluated to something other than a mapping.
    #[error("expected a mapping, got {type_name}")]
    NotAMapping { type_name: &'static str },

    #[error("This field cannot be null.")]
    Null,

    /// Stored text could not be evaluated.
    #[error("Can't deserialize {value:?}: {source}")]
    Deserialize {
        value: String,
        #[source]
        source: DataEvalError,
    },

    /// Form input could not be evaluated.
    #[error("Can't deserialize: {0}")]
    Invalid(#[source] DataEvalError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// A mapping read from text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DictData(Mapping);

impl DictData {
    pub fn new(mapping: Mapping) -> Self {
        Self(mapping)
    }

    /// Evaluate `text`, which must describe a mapping.
    pub fn from_text(text: &str) -> Result<Self, DictDataError> {
        match data_eval(text)? {
            Value::Dict(mapping) => Ok(Self(mapping)),
            other => Err(DictDataError::NotAMapping {
                type_name: other.type_name(),
            }),
        }
    }

    pub fn into_inner(self) -> Mapping {
        self.0
    }

    /// Canonical single-line encoding.
    pub fn encode(&self) -> Result<String, EncodeError> {
        encode(&Value::Dict(self.0.clone()))
    }
}

/// Failure of [`DictData::from_text`].
#[derive(Debug, Error)]
pub enum DictDataError {
    #[error(transparent)]
    Eval(#[from] DataEvalError),

    #[error("expected a mapping, got {type_name}")]
    NotAMapping { type_name: &'static str },
}

impl Deref for DictData {
    type Target = Mapping;

    fn deref(&self) -> &Mapping {
        &self.0
    }
}

impl From<Mapping> for DictData {
    fn from(mapping: Mapping) -> Self {
        Self(mapping)
    }
}

impl From<DictData> for Value {
    fn from(data: DictData) -> Self {
        Value::Dict(data.0)
    }
}

/// The pretty form, wrapped at the default width.
impl fmt::Display for DictData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = Value::Dict(self.0.clone());
        f.write_str(&to_pretty_string(&value, DEFAULT_WIDTH))
    }
}

/// Column codec for [`DictData`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DictField {
    /// Whether `NULL` is a valid column value.
    pub nullable: bool,
}

impl DictField {
    pub fn new(nullable: bool) -> Self {
        Self { nullable }
    }

    fn null<T>(&self) -> Result<Option<T>, FieldError> {
        if self.nullable {
            Ok(None)
        } else {
            Err(FieldError::Null)
        }
    }

    /// Decode a column value.
    pub fn from_db_value(&self, value: Option<&str>) -> Result<Option<DictData>, FieldError> {
        let Some(text) = value else {
            return self.null();
        };
        DictData::from_text(text)
            .map(Some)
            .map_err(|err| match err {
                DictDataError::Eval(source) => FieldError::Deserialize {
                    value: text.to_string(),
                    source,
                },
                DictDataError::NotAMapping { type_name } => FieldError::NotAMapping { type_name },
            })
    }

    /// Encode a value for the column.
    pub fn to_db_value(&self, value: Option<&DictData>) -> Result<Option<String>, FieldError> {
        match value {
            Some(data) => Ok(Some(data.encode()?)),
            None => self.null(),
        }
    }

    /// Validate form input. Empty input means no value.
    pub fn clean(&self, input: &str) -> Result<Option<DictData>, FieldError> {
        if input.is_empty() {
            return Ok(None);
        }
        DictData::from_text(input)
            .map(Some)
            .map_err(|err| match err {
                DictDataError::Eval(source) => FieldError::Invalid(source),
                DictDataError::NotAMapping { type_name } => FieldError::NotAMapping { type_name },
            })
    }
}
