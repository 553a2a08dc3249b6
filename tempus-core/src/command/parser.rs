//! The parsing driver: runs every argument's converter over one invocation's input.

use std::collections::{HashMap, HashSet};

use tracing::trace;
use twilight_model::application::interaction::application_command::CommandDataOption;

use super::ParseCtxt;
use super::arguments::{Argument, Arguments, ParsedArguments};
use super::errors::{ArgumentParseError, ConversionError, ParseError};
use super::tokens::{StringParser, TokenStream};

/// Parses chat-style input. Keyword arguments are pulled out first when the configuration allows them.
pub fn parse_raw_message(
    arguments: &Arguments,
    input: &str,
    cx: &ParseCtxt<'_>,
) -> Result<ParsedArguments, ParseError> {
    validate(arguments, cx)?;

    let mut stream = StringParser::new(input);
    let mut named = HashMap::<String, Vec<String>>::new();

    if cx.tempus.config.parsing.allow_keyword_arguments {
        let names = arguments
            .args()
            .iter()
            .map(|arg| arg.name(cx).to_lowercase())
            .collect::<HashSet<_>>();

        for (name, value) in stream.parse_named(|name| names.contains(name)) {
            named.entry(name).or_default().push(value);
        }
    }

    fill(arguments, &mut stream, &named, cx)
}

/// Parses an already split token stream. No keyword arguments are recognised.
pub fn parse_tokens(
    arguments: &Arguments,
    stream: &mut dyn TokenStream,
    cx: &ParseCtxt<'_>,
) -> Result<ParsedArguments, ParseError> {
    validate(arguments, cx)?;
    fill(arguments, stream, &HashMap::new(), cx)
}

/// Parses the options of an interaction. Each argument looks up its own option, so their order doesn't matter.
pub fn parse_command_options(
    arguments: &Arguments,
    options: &[CommandDataOption],
    cx: &ParseCtxt<'_>,
) -> Result<ParsedArguments, ParseError> {
    validate(arguments, cx)?;

    let mut values = Vec::with_capacity(arguments.len());

    for arg in arguments.args() {
        let name = arg.name(cx);
        let option = options
            .iter()
            .find(|option| option.name.to_lowercase() == name.to_lowercase())
            .map(|option| &option.value);

        trace!("Parsing option {name} ({})", if option.is_some() { "given" } else { "absent" });

        let value = arg
            .converter()
            .parse_option_erased(option, cx)
            .map_err(|e| argument_error(arg, &name, e, cx))?;

        values.push(Some(value));
    }

    Ok(ParsedArguments::new(values))
}

fn validate(arguments: &Arguments, cx: &ParseCtxt<'_>) -> Result<(), ParseError> {
    arguments
        .validate(&cx.locale, cx.tempus.translations.as_ref())
        .map_err(ParseError::Configuration)
}

fn fill(
    arguments: &Arguments,
    stream: &mut dyn TokenStream,
    named: &HashMap<String, Vec<String>>,
    cx: &ParseCtxt<'_>,
) -> Result<ParsedArguments, ParseError> {
    let mut values = Vec::with_capacity(arguments.len());
    let mut required = 0;
    let mut filled = 0;

    for arg in arguments.args() {
        let name = arg.name(cx);
        let converter = arg.converter();

        let value = if let Some(given) = named.get(&name.to_lowercase()) {
            if converter.cardinality().takes_one_value() && given.len() != 1 {
                return Err(ArgumentParseError {
                    argument: Some(name.clone()),
                    reason: cx.translate_with("argumentParser.error.requiresOneValue", &[&name, &given.len()]),
                }
                .into());
            }

            trace!("Argument {name} given {} keyword value(s)", given.len());
            let value = converter
                .parse_named_erased(given, cx)
                .map_err(|e| argument_error(arg, &name, e, cx))?;
            Some(value)
        } else if !stream.has_next() {
            trace!("Input exhausted before argument {name}");
            converter.exhausted_erased()
        } else {
            let converted = converter
                .parse_erased(&*stream, cx)
                .map_err(|e| argument_error(arg, &name, e, cx))?;

            trace!("Argument {name} consumed {} token(s)", converted.consumed);
            stream.skip(converted.consumed);
            Some(converted.value)
        };

        if converter.required() {
            required += 1;
            if value.is_some() {
                filled += 1;
            }
        }

        values.push(value);
    }

    trace!("Filled {filled} of {required} required argument(s)");

    if filled < required {
        let reason = if filled == 0 {
            cx.translate_with("argumentParser.error.noFilledArguments", &[&required])
        } else {
            cx.translate_with("argumentParser.error.someFilledArguments", &[&required, &filled])
        };

        return Err(ArgumentParseError { argument: None, reason }.into());
    }

    Ok(ParsedArguments::new(values))
}

fn argument_error(arg: &Argument, name: &str, error: ConversionError, cx: &ParseCtxt<'_>) -> ParseError {
    let reason = match error {
        ConversionError::ArgsExhausted => cx.translate_with("argumentParser.error.missingArgument", &[&name]),
        ConversionError::InvalidValue => {
            let kind = cx.translate(arg.converter().signature_type());
            cx.translate_with("argumentParser.error.invalidValue", &[&name, &kind])
        },
        ConversionError::Relayed(e) => cx.translate_with("argumentParser.error.errorInArgument", &[&name, &e.reason]),
    };

    ArgumentParseError {
        argument: Some(name.to_owned()),
        reason,
    }
    .into()
}
