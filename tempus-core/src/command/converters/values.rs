use twilight_model::application::command::CommandOption;
use twilight_model::application::interaction::application_command::CommandOptionValue;
use twilight_util::builder::command::{BooleanBuilder, IntegerBuilder, NumberBuilder, StringBuilder};

use super::{CoalescingParser, Converted, ValueParser};
use crate::command::ParseCtxt;
use crate::command::errors::{ConversionError, RelayedError};

/// A single word of text.
#[derive(Clone, Copy, Debug, Default)]
pub struct Text {
    max_length: Option<usize>,
}

impl Text {
    pub fn new() -> Self {
        Self::default()
    }

    /// Longest accepted text, in characters.
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }
}

impl ValueParser for Text {
    type Output = String;

    fn signature_type(&self) -> &'static str {
        "converters.string.signatureType"
    }

    fn parse(&self, input: &str, cx: &ParseCtxt<'_>) -> Result<String, ConversionError> {
        match self.max_length {
            Some(max) if input.chars().count() > max => {
                Err(RelayedError::new(cx.translate_with("converters.string.error.length", &[&max])).into())
            },
            _ => Ok(input.to_owned()),
        }
    }

    fn as_command_option(&self, name: &str, description: &str) -> CommandOption {
        let mut builder = StringBuilder::new(name, description).required(true);
        if let Some(max) = self.max_length.and_then(|max| u16::try_from(max).ok()) {
            builder = builder.max_length(max);
        }
        builder.build()
    }
}

/// A whole number, optionally bounded.
#[derive(Clone, Copy, Debug, Default)]
pub struct Integer {
    min: Option<i64>,
    max: Option<i64>,
}

impl Integer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }
}

impl ValueParser for Integer {
    type Output = i64;

    fn signature_type(&self) -> &'static str {
        "converters.number.signatureType"
    }

    fn parse(&self, input: &str, cx: &ParseCtxt<'_>) -> Result<i64, ConversionError> {
        let value = input
            .parse::<i64>()
            .map_err(|_| RelayedError::new(cx.translate_with("converters.number.error.invalid", &[&input])))?;

        if let Some(min) = self.min.filter(|min| value < *min) {
            return Err(RelayedError::new(cx.translate_with("converters.number.error.tooLow", &[&min])).into());
        }

        if let Some(max) = self.max.filter(|max| value > *max) {
            return Err(RelayedError::new(cx.translate_with("converters.number.error.tooHigh", &[&max])).into());
        }

        Ok(value)
    }

    fn as_command_option(&self, name: &str, description: &str) -> CommandOption {
        let mut builder = IntegerBuilder::new(name, description).required(true);
        if let Some(min) = self.min {
            builder = builder.min_value(min);
        }
        if let Some(max) = self.max {
            builder = builder.max_value(max);
        }
        builder.build()
    }
}

/// A finite floating point number.
#[derive(Clone, Copy, Debug, Default)]
pub struct Decimal;

impl ValueParser for Decimal {
    type Output = f64;

    fn signature_type(&self) -> &'static str {
        "converters.decimal.signatureType"
    }

    fn parse(&self, input: &str, cx: &ParseCtxt<'_>) -> Result<f64, ConversionError> {
        match input.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(RelayedError::new(cx.translate_with("converters.decimal.error.invalid", &[&input])).into()),
        }
    }

    fn as_command_option(&self, name: &str, description: &str) -> CommandOption {
        NumberBuilder::new(name, description).required(true).build()
    }
}

/// A yes/no answer, using the locale's words for either.
#[derive(Clone, Copy, Debug, Default)]
pub struct Boolean;

impl ValueParser for Boolean {
    type Output = bool;

    fn signature_type(&self) -> &'static str {
        "converters.boolean.signatureType"
    }

    fn parse(&self, input: &str, cx: &ParseCtxt<'_>) -> Result<bool, ConversionError> {
        let input = input.to_lowercase();

        if cx.translate_list("converters.boolean.true").contains(&input) {
            Ok(true)
        } else if cx.translate_list("converters.boolean.false").contains(&input) {
            Ok(false)
        } else {
            Err(RelayedError::new(cx.translate_with("converters.boolean.error.invalid", &[&input])).into())
        }
    }

    fn as_command_option(&self, name: &str, description: &str) -> CommandOption {
        BooleanBuilder::new(name, description).required(true).build()
    }
}

/// Everything left in the input, joined with single spaces.
#[derive(Clone, Copy, Debug, Default)]
pub struct RestText;

impl CoalescingParser for RestText {
    type Output = String;

    fn signature_type(&self) -> &'static str {
        "converters.string.signatureType"
    }

    fn show_type_in_signature(&self) -> bool {
        false
    }

    fn coalesce(&self, tokens: &[String], _cx: &ParseCtxt<'_>) -> Result<Option<Converted<String>>, ConversionError> {
        if tokens.is_empty() {
            return Ok(None);
        }

        Ok(Some(Converted {
            value: tokens.join(" "),
            consumed: tokens.len(),
        }))
    }

    fn parse_option(&self, value: &CommandOptionValue, _cx: &ParseCtxt<'_>) -> Result<String, ConversionError> {
        match value {
            CommandOptionValue::String(s) if !s.trim().is_empty() => Ok(s.trim().to_owned()),
            _ => Err(ConversionError::InvalidValue),
        }
    }
}
