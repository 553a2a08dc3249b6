use twilight_model::application::command::CommandOption;
use twilight_model::application::interaction::application_command::CommandOptionValue;

use super::{Cardinality, Converted, Converter, Validator, ValueParser, optional_command_option, validate};
use crate::command::ParseCtxt;
use crate::command::errors::ConversionError;
use crate::command::tokens::TokenStream;

fn check<P: ValueParser>(
    parser: &P,
    validator: Option<&Validator<P::Output>>,
    input: &str,
    cx: &ParseCtxt<'_>,
) -> Result<P::Output, ConversionError> {
    let value = parser.parse(input, cx)?;
    validate(validator, &value)?;
    Ok(value)
}

fn check_option<P: ValueParser>(
    parser: &P,
    validator: Option<&Validator<P::Output>>,
    option: &CommandOptionValue,
    cx: &ParseCtxt<'_>,
) -> Result<P::Output, ConversionError> {
    let value = parser.parse_option(option, cx)?;
    validate(validator, &value)?;
    Ok(value)
}

/// Exactly one value.
pub struct SingleConverter<P: ValueParser> {
    parser: P,
    validator: Option<Validator<P::Output>>,
}

impl<P: ValueParser> SingleConverter<P> {
    pub fn new(parser: P) -> Self {
        Self { parser, validator: None }
    }

    pub fn validator(mut self, validator: impl Fn(&P::Output) -> Result<(), String> + Send + Sync + 'static) -> Self {
        self.validator = Some(std::sync::Arc::new(validator));
        self
    }
}

impl<P: ValueParser> Converter for SingleConverter<P> {
    type Output = P::Output;

    fn cardinality(&self) -> Cardinality {
        Cardinality::Single
    }

    fn signature_type(&self) -> &'static str {
        self.parser.signature_type()
    }

    fn show_type_in_signature(&self) -> bool {
        self.parser.show_type_in_signature()
    }

    fn parse(&self, stream: &dyn TokenStream, cx: &ParseCtxt<'_>) -> Result<Converted<P::Output>, ConversionError> {
        let token = stream.peek_next().ok_or(ConversionError::ArgsExhausted)?;
        let value = check(&self.parser, self.validator.as_ref(), token, cx)?;
        Ok(Converted { value, consumed: 1 })
    }

    fn parse_named(&self, values: &[String], cx: &ParseCtxt<'_>) -> Result<P::Output, ConversionError> {
        let value = values.first().ok_or(ConversionError::ArgsExhausted)?;
        check(&self.parser, self.validator.as_ref(), value, cx)
    }

    fn parse_option(
        &self,
        option: Option<&CommandOptionValue>,
        cx: &ParseCtxt<'_>,
    ) -> Result<P::Output, ConversionError> {
        let option = option.ok_or(ConversionError::ArgsExhausted)?;
        check_option(&self.parser, self.validator.as_ref(), option, cx)
    }

    fn exhausted(&self) -> Option<P::Output> {
        None
    }

    fn as_command_option(&self, name: &str, description: &str) -> CommandOption {
        self.parser.as_command_option(name, description)
    }
}

/// Zero or one value.
///
/// Invalid input fails the parse when `output_error` is set. Otherwise it yields `None` and the token is left for
/// the next argument.
pub struct OptionalConverter<P: ValueParser> {
    parser: P,
    validator: Option<Validator<P::Output>>,
    output_error: bool,
}

impl<P: ValueParser> OptionalConverter<P> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            validator: None,
            output_error: false,
        }
    }

    pub fn validator(mut self, validator: impl Fn(&P::Output) -> Result<(), String> + Send + Sync + 'static) -> Self {
        self.validator = Some(std::sync::Arc::new(validator));
        self
    }

    pub fn output_error(mut self, output_error: bool) -> Self {
        self.output_error = output_error;
        self
    }

    fn recover(&self, err: ConversionError) -> Result<Option<P::Output>, ConversionError> {
        if self.output_error { Err(err) } else { Ok(None) }
    }
}

impl<P: ValueParser> Converter for OptionalConverter<P> {
    type Output = Option<P::Output>;

    fn cardinality(&self) -> Cardinality {
        Cardinality::Optional
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
    ) -> Result<Converted<Option<P::Output>>, ConversionError> {
        let Some(token) = stream.peek_next() else {
            return Ok(Converted { value: None, consumed: 0 });
        };

        match check(&self.parser, self.validator.as_ref(), token, cx) {
            Ok(value) => Ok(Converted {
                value: Some(value),
                consumed: 1,
            }),
            Err(err) => self.recover(err).map(|value| Converted { value, consumed: 0 }),
        }
    }

    fn parse_named(&self, values: &[String], cx: &ParseCtxt<'_>) -> Result<Option<P::Output>, ConversionError> {
        let Some(value) = values.first() else {
            return Ok(None);
        };

        match check(&self.parser, self.validator.as_ref(), value, cx) {
            Ok(value) => Ok(Some(value)),
            Err(err) => self.recover(err),
        }
    }

    fn parse_option(
        &self,
        option: Option<&CommandOptionValue>,
        cx: &ParseCtxt<'_>,
    ) -> Result<Option<P::Output>, ConversionError> {
        let Some(option) = option else {
            return Ok(None);
        };

        match check_option(&self.parser, self.validator.as_ref(), option, cx) {
            Ok(value) => Ok(Some(value)),
            Err(err) => self.recover(err),
        }
    }

    fn exhausted(&self) -> Option<Option<P::Output>> {
        Some(None)
    }

    fn as_command_option(&self, name: &str, description: &str) -> CommandOption {
        optional_command_option(self.parser.as_command_option(name, description))
    }
}

/// Zero or one value, falling back to a default when missing. Invalid input always fails.
pub struct DefaultingConverter<P: ValueParser> {
    parser: P,
    validator: Option<Validator<P::Output>>,
    default: P::Output,
}

impl<P: ValueParser> DefaultingConverter<P> {
    pub fn new(parser: P, default: P::Output) -> Self {
        Self {
            parser,
            validator: None,
            default,
        }
    }

    pub fn validator(mut self, validator: impl Fn(&P::Output) -> Result<(), String> + Send + Sync + 'static) -> Self {
        self.validator = Some(std::sync::Arc::new(validator));
        self
    }
}

impl<P: ValueParser> Converter for DefaultingConverter<P> {
    type Output = P::Output;

    fn cardinality(&self) -> Cardinality {
        Cardinality::Defaulting
    }

    fn signature_type(&self) -> &'static str {
        self.parser.signature_type()
    }

    fn show_type_in_signature(&self) -> bool {
        self.parser.show_type_in_signature()
    }

    fn parse(&self, stream: &dyn TokenStream, cx: &ParseCtxt<'_>) -> Result<Converted<P::Output>, ConversionError> {
        let Some(token) = stream.peek_next() else {
            return Ok(Converted {
                value: self.default.clone(),
                consumed: 0,
            });
        };

        let value = check(&self.parser, self.validator.as_ref(), token, cx)?;
        Ok(Converted { value, consumed: 1 })
    }

    fn parse_named(&self, values: &[String], cx: &ParseCtxt<'_>) -> Result<P::Output, ConversionError> {
        match values.first() {
            Some(value) => check(&self.parser, self.validator.as_ref(), value, cx),
            None => Ok(self.default.clone()),
        }
    }

    fn parse_option(
        &self,
        option: Option<&CommandOptionValue>,
        cx: &ParseCtxt<'_>,
    ) -> Result<P::Output, ConversionError> {
        match option {
            Some(option) => check_option(&self.parser, self.validator.as_ref(), option, cx),
            None => Ok(self.default.clone()),
        }
    }

    fn exhausted(&self) -> Option<P::Output> {
        Some(self.default.clone())
    }

    fn as_command_option(&self, name: &str, description: &str) -> CommandOption {
        optional_command_option(self.parser.as_command_option(name, description))
    }
}

/// Any number of values, read until the first token that doesn't parse.
///
/// When `required` is set, a first token that doesn't parse fails the argument instead of producing an empty list.
pub struct ListConverter<P: ValueParser> {
    parser: P,
    validator: Option<Validator<P::Output>>,
    required: bool,
}

impl<P: ValueParser> ListConverter<P> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            validator: None,
            required: true,
        }
    }

    pub fn validator(mut self, validator: impl Fn(&P::Output) -> Result<(), String> + Send + Sync + 'static) -> Self {
        self.validator = Some(std::sync::Arc::new(validator));
        self
    }

    /// Lets an invalid first token produce an empty list.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

impl<P: ValueParser> Converter for ListConverter<P> {
    type Output = Vec<P::Output>;

    fn cardinality(&self) -> Cardinality {
        Cardinality::List
    }

    fn required(&self) -> bool {
        self.required
    }

    fn signature_type(&self) -> &'static str {
        self.parser.signature_type()
    }

    fn show_type_in_signature(&self) -> bool {
        self.parser.show_type_in_signature()
    }

    fn parse(&self, stream: &dyn TokenStream, cx: &ParseCtxt<'_>) -> Result<Converted<Vec<P::Output>>, ConversionError> {
        let mut fork = stream.fork();
        let mut values = Vec::new();

        while let Some(token) = fork.peek_next() {
            match check(&self.parser, self.validator.as_ref(), token, cx) {
                Ok(value) => values.push(value),
                Err(err) if values.is_empty() && self.required => return Err(err),
                Err(_) => break,
            }

            fork.parse_next();
        }

        let consumed = values.len();
        Ok(Converted { value: values, consumed })
    }

    fn parse_named(&self, values: &[String], cx: &ParseCtxt<'_>) -> Result<Vec<P::Output>, ConversionError> {
        values
            .iter()
            .map(|value| check(&self.parser, self.validator.as_ref(), value, cx))
            .collect()
    }

    fn parse_option(
        &self,
        option: Option<&CommandOptionValue>,
        cx: &ParseCtxt<'_>,
    ) -> Result<Vec<P::Output>, ConversionError> {
        match option {
            Some(CommandOptionValue::String(s)) => s
                .split_whitespace()
                .map(|value| check(&self.parser, self.validator.as_ref(), value, cx))
                .collect(),
            Some(option) => Ok(vec![check_option(&self.parser, self.validator.as_ref(), option, cx)?]),
            None => Ok(Vec::new()),
        }
    }

    fn exhausted(&self) -> Option<Vec<P::Output>> {
        Some(Vec::new())
    }

    fn as_command_option(&self, name: &str, description: &str) -> CommandOption {
        let mut option = self.parser.as_command_option(name, description);
        option.required = Some(self.required);
        option
    }
}
