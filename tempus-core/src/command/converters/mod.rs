//! Converters: value parsers wrapped in a cardinality policy.
//!
//! A [`ValueParser`] knows what one value looks like; a [`CoalescingParser`] knows how to build one value out of
//! several tokens. The wrappers in [`single`] and [`coalescing`] decide how many values are taken and what happens
//! when input is missing or invalid:
//!
//! | Wrapper | Missing input | Invalid input |
//! |---|---|---|
//! | [`SingleConverter`] | fail | fail |
//! | [`OptionalConverter`] | `None` | fail, or `None` unless `output_error` is set |
//! | [`DefaultingConverter`] | default | fail |
//! | [`ListConverter`] | empty list | fail when `required` and nothing parsed, else stop |
//! | [`CoalescingConverter`] | fail | stop, value built from the tokens before |
//! | [`OptionalCoalescingConverter`] | `None` | like coalescing, `None` when nothing was usable |
//! | [`DefaultingCoalescingConverter`] | default | like coalescing, default when nothing was usable |

use std::any::Any;
use std::sync::Arc;

use twilight_model::application::command::CommandOption;
use twilight_model::application::interaction::application_command::CommandOptionValue;
use twilight_util::builder::command::StringBuilder;

use super::ParseCtxt;
use super::errors::{ConversionError, RelayedError};
use super::tokens::TokenStream;

pub mod coalescing;
pub mod duration;
pub mod single;
pub mod values;

pub use coalescing::{CoalescingConverter, DefaultingCoalescingConverter, OptionalCoalescingConverter};
pub use duration::{CoalescedDuration, DurationValue};
pub use single::{DefaultingConverter, ListConverter, OptionalConverter, SingleConverter};
pub use values::{Boolean, Decimal, Integer, RestText, Text};

/// Extra checks run on every user-supplied value. The error string is shown to the user.
pub type Validator<T> = Arc<dyn Fn(&T) -> Result<(), String> + Send + Sync>;

#[derive(Clone, Debug, PartialEq)]
pub struct Converted<T> {
    pub value: T,
    /// Raw tokens used, which the driver skips before the next argument.
    pub consumed: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cardinality {
    Single,
    Optional,
    Defaulting,
    List,
    Coalescing,
    OptionalCoalescing,
    DefaultingCoalescing,
}

impl Cardinality {
    /// Whether keyword input for this argument must be exactly one value.
    pub fn takes_one_value(self) -> bool {
        matches!(self, Self::Single | Self::Optional | Self::Defaulting)
    }
}

/// Parses one raw string into a value.
pub trait ValueParser: Send + Sync + 'static {
    type Output: Clone + Send + Sync + 'static;

    /// Translation key naming the kind of value, used in signatures and `invalidValue` errors.
    fn signature_type(&self) -> &'static str;

    fn show_type_in_signature(&self) -> bool {
        true
    }

    fn parse(&self, input: &str, cx: &ParseCtxt<'_>) -> Result<Self::Output, ConversionError>;

    /// Parses a value supplied by an interaction. Scalars go through [`ValueParser::parse`] as text so both input
    /// surfaces accept the same syntax.
    fn parse_option(&self, value: &CommandOptionValue, cx: &ParseCtxt<'_>) -> Result<Self::Output, ConversionError> {
        match value {
            CommandOptionValue::String(s) => self.parse(s.trim(), cx),
            CommandOptionValue::Integer(i) => self.parse(&i.to_string(), cx),
            CommandOptionValue::Number(n) => self.parse(&n.to_string(), cx),
            CommandOptionValue::Boolean(b) => self.parse(&b.to_string(), cx),
            _ => Err(ConversionError::InvalidValue),
        }
    }

    /// Schema of a required option taking this value.
    fn as_command_option(&self, name: &str, description: &str) -> CommandOption {
        StringBuilder::new(name, description).required(true).build()
    }
}

/// Builds one value out of a run of tokens.
pub trait CoalescingParser: Send + Sync + 'static {
    type Output: Clone + Send + Sync + 'static;

    fn signature_type(&self) -> &'static str;

    fn show_type_in_signature(&self) -> bool {
        true
    }

    /// Whether `token` could be part of a value. Lookahead stops before the first token that can't.
    fn accepts(&self, _token: &str, _cx: &ParseCtxt<'_>) -> bool {
        true
    }

    /// Builds a value from a prefix of `tokens`, or `None` when nothing could be used.
    fn coalesce(
        &self,
        tokens: &[String],
        cx: &ParseCtxt<'_>,
    ) -> Result<Option<Converted<Self::Output>>, ConversionError>;

    fn parse_option(&self, value: &CommandOptionValue, cx: &ParseCtxt<'_>) -> Result<Self::Output, ConversionError> {
        let CommandOptionValue::String(s) = value else {
            return Err(ConversionError::InvalidValue);
        };

        let tokens = s.split_whitespace().map(str::to_owned).collect::<Vec<_>>();
        match self.coalesce(&tokens, cx)? {
            Some(converted) if converted.consumed == tokens.len() => Ok(converted.value),
            _ => Err(ConversionError::InvalidValue),
        }
    }

    fn as_command_option(&self, name: &str, description: &str) -> CommandOption {
        StringBuilder::new(name, description).required(true).build()
    }
}

/// One argument's complete parsing behaviour.
pub trait Converter: Send + Sync + 'static {
    type Output: Send + Sync + 'static;

    fn cardinality(&self) -> Cardinality;

    /// Whether leaving this argument out fails the parse.
    fn required(&self) -> bool {
        matches!(self.cardinality(), Cardinality::Single | Cardinality::Coalescing)
    }

    fn signature_type(&self) -> &'static str;

    fn show_type_in_signature(&self) -> bool {
        true
    }

    /// Reads from `stream` without consuming it. The driver skips [`Converted::consumed`] tokens afterwards.
    fn parse(&self, stream: &dyn TokenStream, cx: &ParseCtxt<'_>) -> Result<Converted<Self::Output>, ConversionError>;

    /// Parses the values given to this argument by keyword.
    fn parse_named(&self, values: &[String], cx: &ParseCtxt<'_>) -> Result<Self::Output, ConversionError>;

    /// Parses the interaction option for this argument, `None` when the user left it out.
    fn parse_option(
        &self,
        option: Option<&CommandOptionValue>,
        cx: &ParseCtxt<'_>,
    ) -> Result<Self::Output, ConversionError>;

    /// The value to use when input ran out before this argument, `None` if there isn't one.
    fn exhausted(&self) -> Option<Self::Output>;

    fn as_command_option(&self, name: &str, description: &str) -> CommandOption;
}

pub(crate) fn validate<T>(validator: Option<&Validator<T>>, value: &T) -> Result<(), ConversionError> {
    match validator {
        Some(validator) => validator(value).map_err(|reason| RelayedError::new(reason).into()),
        None => Ok(()),
    }
}

pub(crate) fn optional_command_option(mut option: CommandOption) -> CommandOption {
    option.required = Some(false);
    option
}

pub(crate) type AnyValue = Box<dyn Any + Send + Sync>;

/// [`Converter`] with its output type erased, so arguments of different types can live in one list.
pub(crate) trait ErasedConverter: Send + Sync {
    fn cardinality(&self) -> Cardinality;
    fn required(&self) -> bool;
    fn signature_type(&self) -> &'static str;
    fn show_type_in_signature(&self) -> bool;
    fn parse_erased(&self, stream: &dyn TokenStream, cx: &ParseCtxt<'_>) -> Result<Converted<AnyValue>, ConversionError>;
    fn parse_named_erased(&self, values: &[String], cx: &ParseCtxt<'_>) -> Result<AnyValue, ConversionError>;
    fn parse_option_erased(
        &self,
        option: Option<&CommandOptionValue>,
        cx: &ParseCtxt<'_>,
    ) -> Result<AnyValue, ConversionError>;
    fn exhausted_erased(&self) -> Option<AnyValue>;
    fn as_command_option(&self, name: &str, description: &str) -> CommandOption;
}

impl<C: Converter> ErasedConverter for C {
    fn cardinality(&self) -> Cardinality {
        Converter::cardinality(self)
    }

    fn required(&self) -> bool {
        Converter::required(self)
    }

    fn signature_type(&self) -> &'static str {
        Converter::signature_type(self)
    }

    fn show_type_in_signature(&self) -> bool {
        Converter::show_type_in_signature(self)
    }

    fn parse_erased(&self, stream: &dyn TokenStream, cx: &ParseCtxt<'_>) -> Result<Converted<AnyValue>, ConversionError> {
        let Converted { value, consumed } = self.parse(stream, cx)?;
        Ok(Converted {
            value: Box::new(value),
            consumed,
        })
    }

    fn parse_named_erased(&self, values: &[String], cx: &ParseCtxt<'_>) -> Result<AnyValue, ConversionError> {
        Ok(Box::new(self.parse_named(values, cx)?))
    }

    fn parse_option_erased(
        &self,
        option: Option<&CommandOptionValue>,
        cx: &ParseCtxt<'_>,
    ) -> Result<AnyValue, ConversionError> {
        Ok(Box::new(self.parse_option(option, cx)?))
    }

    fn exhausted_erased(&self) -> Option<AnyValue> {
        self.exhausted().map(|value| Box::new(value) as AnyValue)
    }

    fn as_command_option(&self, name: &str, description: &str) -> CommandOption {
        Converter::as_command_option(self, name, description)
    }
}
