use std::sync::Arc;

use twilight_model::application::command::CommandOption;
use twilight_model::application::interaction::application_command::CommandOptionValue;

use super::{Cardinality, CoalescingParser, Converted, Converter, Validator, optional_command_option, validate};
use crate::command::ParseCtxt;
use crate::command::errors::ConversionError;
use crate::command::tokens::TokenStream;

/// The tokens at the front of `stream` that `parser` might use.
fn lookahead<C: CoalescingParser>(parser: &C, stream: &dyn TokenStream, cx: &ParseCtxt<'_>) -> Vec<String> {
    let mut fork = stream.fork();
    let mut tokens = Vec::new();

    while let Some(token) = fork.peek_next() {
        if !parser.accepts(token, cx) {
            break;
        }

        tokens.push(token.to_owned());
        fork.parse_next();
    }

    tokens
}

fn coalesce<C: CoalescingParser>(
    parser: &C,
    validator: Option<&Validator<C::Output>>,
    tokens: &[String],
    cx: &ParseCtxt<'_>,
) -> Result<Option<Converted<C::Output>>, ConversionError> {
    let converted = parser.coalesce(tokens, cx)?;
    if let Some(converted) = &converted {
        validate(validator, &converted.value)?;
    }
    Ok(converted)
}

/// Merges every fully used keyword value into one value.
fn coalesce_all<C: CoalescingParser>(
    parser: &C,
    validator: Option<&Validator<C::Output>>,
    values: &[String],
    cx: &ParseCtxt<'_>,
) -> Result<Option<C::Output>, ConversionError> {
    match coalesce(parser, validator, values, cx)? {
        Some(converted) if converted.consumed == values.len() => Ok(Some(converted.value)),
        Some(_) => Err(ConversionError::InvalidValue),
        None if values.is_empty() => Ok(None),
        None => Err(ConversionError::InvalidValue),
    }
}

fn coalesce_option<C: CoalescingParser>(
    parser: &C,
    validator: Option<&Validator<C::Output>>,
    option: &CommandOptionValue,
    cx: &ParseCtxt<'_>,
) -> Result<C::Output, ConversionError> {
    let value = parser.parse_option(option, cx)?;
    validate(validator, &value)?;
    Ok(value)
}

/// One value built from as many tokens as the parser can use. At least one token is required.
pub struct CoalescingConverter<C: CoalescingParser> {
    parser: C,
    validator: Option<Validator<C::Output>>,
}

impl<C: CoalescingParser> CoalescingConverter<C> {
    pub fn new(parser: C) -> Self {
        Self { parser, validator: None }
    }

    pub fn validator(mut self, validator: impl Fn(&C::Output) -> Result<(), String> + Send + Sync + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }
}

impl<C: CoalescingParser> Converter for CoalescingConverter<C> {
    type Output = C::Output;

    fn cardinality(&self) -> Cardinality {
        Cardinality::Coalescing
    }

    fn signature_type(&self) -> &'static str {
        self.parser.signature_type()
    }

    fn show_type_in_signature(&self) -> bool {
        self.parser.show_type_in_signature()
    }

    fn parse(&self, stream: &dyn TokenStream, cx: &ParseCtxt<'_>) -> Result<Converted<C::Output>, ConversionError> {
        if !stream.has_next() {
            return Err(ConversionError::ArgsExhausted);
        }

        let tokens = lookahead(&self.parser, stream, cx);
        coalesce(&self.parser, self.validator.as_ref(), &tokens, cx)?.ok_or(ConversionError::InvalidValue)
    }

    fn parse_named(&self, values: &[String], cx: &ParseCtxt<'_>) -> Result<C::Output, ConversionError> {
        coalesce_all(&self.parser, self.validator.as_ref(), values, cx)?.ok_or(ConversionError::ArgsExhausted)
    }

    fn parse_option(
        &self,
        option: Option<&CommandOptionValue>,
        cx: &ParseCtxt<'_>,
    ) -> Result<C::Output, ConversionError> {
        let option = option.ok_or(ConversionError::ArgsExhausted)?;
        coalesce_option(&self.parser, self.validator.as_ref(), option, cx)
    }

    fn exhausted(&self) -> Option<C::Output> {
        None
    }

    fn as_command_option(&self, name: &str, description: &str) -> CommandOption {
        self.parser.as_command_option(name, description)
    }
}

/// Like [`CoalescingConverter`], but `None` when there is no usable input.
///
/// Errors raised while building the value fail the parse only when `output_error` is set.
pub struct OptionalCoalescingConverter<C: CoalescingParser> {
    parser: C,
    validator: Option<Validator<C::Output>>,
    output_error: bool,
}

impl<C: CoalescingParser> OptionalCoalescingConverter<C> {
    pub fn new(parser: C) -> Self {
        Self {
            parser,
            validator: None,
            output_error: false,
        }
    }

    pub fn validator(mut self, validator: impl Fn(&C::Output) -> Result<(), String> + Send + Sync + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    pub fn output_error(mut self, output_error: bool) -> Self {
        self.output_error = output_error;
        self
    }

    fn recover<T>(&self, result: Result<Option<T>, ConversionError>) -> Result<Option<T>, ConversionError> {
        match result {
            Err(err) if !self.output_error => {
                tracing::debug!("Discarding optional value: {err}");
                Ok(None)
            },
            other => other,
        }
    }
}

impl<C: CoalescingParser> Converter for OptionalCoalescingConverter<C> {
    type Output = Option<C::Output>;

    fn cardinality(&self) -> Cardinality {
        Cardinality::OptionalCoalescing
    }

    fn signature_type(&self) -> &'static str {
        self.parser.signature_type()
    }

    fn show_type_in_signature(&self) -> bool {
        self.parser.show_type_in_signature()
    }

    fn parse(
        &self,
        stream: &dyn TokenStream,
        cx: &ParseCtxt<'_>,
    ) -> Result<Converted<Option<C::Output>>, ConversionError> {
        let tokens = lookahead(&self.parser, stream, cx);
        let converted = self.recover(coalesce(&self.parser, self.validator.as_ref(), &tokens, cx))?;

        Ok(match converted {
            Some(Converted { value, consumed }) => Converted {
                value: Some(value),
                consumed,
            },
            None => Converted { value: None, consumed: 0 },
        })
    }

    fn parse_named(&self, values: &[String], cx: &ParseCtxt<'_>) -> Result<Option<C::Output>, ConversionError> {
        self.recover(coalesce_all(&self.parser, self.validator.as_ref(), values, cx))
    }

    fn parse_option(
        &self,
        option: Option<&CommandOptionValue>,
        cx: &ParseCtxt<'_>,
    ) -> Result<Option<C::Output>, ConversionError> {
        let Some(option) = option else {
            return Ok(None);
        };

        self.recover(coalesce_option(&self.parser, self.validator.as_ref(), option, cx).map(Some))
    }

    fn exhausted(&self) -> Option<Option<C::Output>> {
        Some(None)
    }

    fn as_command_option(&self, name: &str, description: &str) -> CommandOption {
        optional_command_option(self.parser.as_command_option(name, description))
    }
}

/// Like [`CoalescingConverter`], but falls back to a default when there is no usable input.
///
/// Errors raised while building the value fail the parse only when `output_error` is set.
pub struct DefaultingCoalescingConverter<C: CoalescingParser> {
    parser: C,
    validator: Option<Validator<C::Output>>,
    default: C::Output,
    output_error: bool,
}

impl<C: CoalescingParser> DefaultingCoalescingConverter<C> {
    pub fn new(parser: C, default: C::Output) -> Self {
        Self {
            parser,
            validator: None,
            default,
            output_error: false,
        }
    }

    pub fn validator(mut self, validator: impl Fn(&C::Output) -> Result<(), String> + Send + Sync + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    pub fn output_error(mut self, output_error: bool) -> Self {
        self.output_error = output_error;
        self
    }

    fn or_default(&self, result: Result<Option<C::Output>, ConversionError>) -> Result<C::Output, ConversionError> {
        match result {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Ok(self.default.clone()),
            Err(err) if !self.output_error => {
                tracing::debug!("Falling back to default value: {err}");
                Ok(self.default.clone())
            },
            Err(err) => Err(err),
        }
    }
}

impl<C: CoalescingParser> Converter for DefaultingCoalescingConverter<C> {
    type Output = C::Output;

    fn cardinality(&self) -> Cardinality {
        Cardinality::DefaultingCoalescing
    }

    fn signature_type(&self) -> &'static str {
        self.parser.signature_type()
    }

    fn show_type_in_signature(&self) -> bool {
        self.parser.show_type_in_signature()
    }

    fn parse(&self, stream: &dyn TokenStream, cx: &ParseCtxt<'_>) -> Result<Converted<C::Output>, ConversionError> {
        let tokens = lookahead(&self.parser, stream, cx);

        match coalesce(&self.parser, self.validator.as_ref(), &tokens, cx) {
            Ok(Some(converted)) => Ok(converted),
            other => {
                let value = self.or_default(other.map(|converted| converted.map(|c| c.value)))?;
                Ok(Converted { value, consumed: 0 })
            },
        }
    }

    fn parse_named(&self, values: &[String], cx: &ParseCtxt<'_>) -> Result<C::Output, ConversionError> {
        self.or_default(coalesce_all(&self.parser, self.validator.as_ref(), values, cx))
    }

    fn parse_option(
        &self,
        option: Option<&CommandOptionValue>,
        cx: &ParseCtxt<'_>,
    ) -> Result<C::Output, ConversionError> {
        match option {
            Some(option) => self.or_default(coalesce_option(&self.parser, self.validator.as_ref(), option, cx).map(Some)),
            None => Ok(self.default.clone()),
        }
    }

    fn exhausted(&self) -> Option<C::Output> {
        Some(self.default.clone())
    }

    fn as_command_option(&self, name: &str, description: &str) -> CommandOption {
        optional_command_option(self.parser.as_command_option(name, description))
    }
}
