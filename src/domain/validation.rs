/// Value under validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatableValue {
    Text(String),
    Number(f64),
}

impl ValidatableValue {
    fn as_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(number) => number.to_string(),
        }
    }
}

/// A value plus the declarative constraints it must satisfy
#[derive(Debug, Clone, PartialEq)]
pub struct Validatable {
    pub value: ValidatableValue,
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Validatable {
    pub fn text(value: impl Into<String>) -> Self {
        Self::with_value(ValidatableValue::Text(value.into()))
    }

    pub fn number(value: f64) -> Self {
        Self::with_value(ValidatableValue::Number(value))
    }

    fn with_value(value: ValidatableValue) -> Self {
        Self {
            value,
            required: false,
            min_length: None,
            max_length: None,
            min: None,
            max: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    pub fn max_length(mut self, len: usize) -> Self {
        self.max_length = Some(len);
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }
}

/// Checks a value against every constraint it carries.
///
/// Length bounds only apply to text and numeric bounds only to numbers.
/// Lengths count characters, not bytes.
pub fn validate(input: &Validatable) -> bool {
    let mut is_valid = true;

    if input.required {
        is_valid &= !input.value.as_text().trim().is_empty();
    }

    match &input.value {
        ValidatableValue::Text(text) => {
            let len = text.chars().count();
            if let Some(min_length) = input.min_length {
                is_valid &= len >= min_length;
            }
            if let Some(max_length) = input.max_length {
                is_valid &= len <= max_length;
            }
        }
        ValidatableValue::Number(number) => {
            // NaN compares false against every bound
            if let Some(min) = input.min {
                is_valid &= *number >= min;
            }
            if let Some(max) = input.max {
                is_valid &= *number <= max;
            }
        }
    }

    is_valid
}
