use std::fmt::Display;

use tempus_common::config::config::ParsingConfig;
use tempus_common::Locale;
use tempus_duration::{DurationContainer, DurationError, DurationParser, Negatives, ParserErrorKind, TimeUnit};
use time::OffsetDateTime;
use tracing::debug;
use twilight_model::application::interaction::application_command::CommandOptionValue;

use super::{CoalescingParser, Converted, ValueParser};
use crate::command::ParseCtxt;
use crate::command::errors::{ConversionError, RelayedError};
use crate::util::regex::DISCORD_TIMESTAMP;

/// A duration written in a single token, like `1w2d`.
#[derive(Clone, Copy, Debug)]
pub struct DurationValue {
    long_help: bool,
    positive_only: bool,
    negatives: Negatives,
}

impl Default for DurationValue {
    fn default() -> Self {
        Self {
            long_help: true,
            positive_only: true,
            negatives: Negatives::Allowed,
        }
    }
}

impl DurationValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ParsingConfig) -> Self {
        Self {
            long_help: config.long_help,
            positive_only: config.positive_only,
            negatives: if config.allow_negatives {
                Negatives::Allowed
            } else {
                Negatives::Rejected
            },
        }
    }

    /// Append the list of valid units to unit errors.
    pub fn long_help(mut self, long_help: bool) -> Self {
        self.long_help = long_help;
        self
    }

    /// Reject durations that land in the past.
    pub fn positive_only(mut self, positive_only: bool) -> Self {
        self.positive_only = positive_only;
        self
    }

    /// Whether amounts may be negated, like `1d-2h`. Rejected negatives fail with their own message.
    pub fn negatives(mut self, negatives: Negatives) -> Self {
        self.negatives = negatives;
        self
    }

    fn parser<'a>(&self, cx: &ParseCtxt<'a>) -> DurationParser<'a> {
        cx.durations(self.negatives)
    }

    fn parse_str(&self, input: &str, cx: &ParseCtxt<'_>) -> Result<DurationContainer, ConversionError> {
        if is_blank(input) {
            return Err(ConversionError::InvalidValue);
        }

        let value = self.parser(cx).parse(input, &cx.locale).map_err(|e| self.relay(e, cx))?;
        self.check_positive(&value, cx)?;
        Ok(value)
    }

    fn relay(&self, error: DurationError, cx: &ParseCtxt<'_>) -> ConversionError {
        let reason = match &error {
            DurationError::InvalidTimeUnit { unit } if unit.is_empty() => {
                cx.translate("converters.duration.error.missingUnit")
            },
            DurationError::InvalidTimeUnit { unit } => cx.translate_with("converters.duration.error.invalidUnit", &[unit]),
            DurationError::Parser(e) => {
                let reason = match &e.kind {
                    ParserErrorKind::InvalidValue(value) => cx.translate_with(e.kind.translation_key(), &[value]),
                    kind => cx.translate(kind.translation_key()),
                };

                return RelayedError::new(reason).into();
            },
        };

        if self.long_help {
            RelayedError::new(format!("{reason}\n\n{}", unit_help(cx))).into()
        } else {
            RelayedError::new(reason).into()
        }
    }

    fn check_positive(&self, value: &DurationContainer, cx: &ParseCtxt<'_>) -> Result<(), ConversionError> {
        if !self.positive_only {
            return Ok(());
        }

        match value.normalize(OffsetDateTime::now_utc()) {
            Some(normalized) if normalized.is_positive() => Ok(()),
            Some(_) => Err(RelayedError::new(cx.translate("converters.duration.error.positiveOnly")).into()),
            None => Err(RelayedError::new(cx.translate("converters.duration.error.outOfRange")).into()),
        }
    }
}

fn unit_help(cx: &ParseCtxt<'_>) -> String {
    let units = cx.units();
    let list = TimeUnit::ALL
        .iter()
        .map(|unit| units.synonyms(*unit))
        .filter(|synonyms| !synonyms.is_empty())
        .map(|synonyms| {
            let synonyms = synonyms.iter().map(|s| format!("`{s}`")).collect::<Vec<_>>();
            format!("- {}", synonyms.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n");

    cx.translate_with("converters.duration.help", &[&list as &dyn Display])
}

impl ValueParser for DurationValue {
    type Output = DurationContainer;

    fn signature_type(&self) -> &'static str {
        "converters.duration.signatureType"
    }

    fn parse(&self, input: &str, cx: &ParseCtxt<'_>) -> Result<DurationContainer, ConversionError> {
        self.parse_str(input, cx)
    }
}

/// A duration spread over several tokens, like `1 day and 2 hours`, or a Discord timestamp.
///
/// Tokens are taken while the running concatenation still parses. A token that doesn't parse on its own is retried
/// glued to the next one, so `2` `hours` is read as `2hours`. Ignored words (`and`) between fragments are consumed
/// but otherwise skipped. The first token that can't be used ends the value; that is only an error when it is the
/// first fragment and `should_throw` is set.
#[derive(Clone, Copy, Debug, Default)]
pub struct CoalescedDuration {
    rules: DurationValue,
    should_throw: bool,
}

impl CoalescedDuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ParsingConfig) -> Self {
        Self {
            rules: DurationValue::from_config(config),
            should_throw: false,
        }
    }

    pub fn long_help(mut self, long_help: bool) -> Self {
        self.rules = self.rules.long_help(long_help);
        self
    }

    pub fn positive_only(mut self, positive_only: bool) -> Self {
        self.rules = self.rules.positive_only(positive_only);
        self
    }

    pub fn negatives(mut self, negatives: Negatives) -> Self {
        self.rules = self.rules.negatives(negatives);
        self
    }

    /// Fail instead of producing nothing when the first fragment doesn't parse.
    pub fn should_throw(mut self, should_throw: bool) -> Self {
        self.should_throw = should_throw;
        self
    }
}

/// Input the parser strips down to nothing, like a lone `+` or `,`.
fn is_blank(input: &str) -> bool {
    input.chars().all(|c| matches!(c, ',' | '+') || c.is_whitespace())
}

/// Parses `candidate` alone and appended to the fragments accepted so far.
fn attempt(
    parser: &DurationParser<'_>,
    fragments: &[String],
    candidate: &str,
    locale: &Locale,
) -> Result<(), DurationError> {
    if is_blank(candidate) {
        return Err(ParserErrorKind::InvalidValue(candidate.to_owned()).into());
    }

    parser.parse(candidate, locale)?;
    parser.parse(&format!("{}{candidate}", fragments.concat()), locale)?;
    Ok(())
}

fn parse_timestamp(token: &str) -> Option<OffsetDateTime> {
    let captures = DISCORD_TIMESTAMP.captures(token)?;
    let seconds = captures.get(1)?.as_str().parse::<i64>().ok()?;
    OffsetDateTime::from_unix_timestamp(seconds).ok()
}

impl CoalescingParser for CoalescedDuration {
    type Output = DurationContainer;

    fn signature_type(&self) -> &'static str {
        "converters.duration.signatureType"
    }

    fn accepts(&self, token: &str, cx: &ParseCtxt<'_>) -> bool {
        let Some(first) = token.chars().next() else {
            return false;
        };

        let parser = self.rules.parser(cx);

        (first == '-' && parser.negatives() == Negatives::Allowed)
            || parser.char_valid(first, &cx.locale)
            || DISCORD_TIMESTAMP.is_match(token)
            || cx
                .translate_list("utils.durations.ignoredWords")
                .contains(&token.to_lowercase())
    }

    fn coalesce(
        &self,
        tokens: &[String],
        cx: &ParseCtxt<'_>,
    ) -> Result<Option<Converted<DurationContainer>>, ConversionError> {
        let Some(first) = tokens.first() else {
            return Ok(None);
        };

        if let Some(instant) = parse_timestamp(first) {
            let value = DurationContainer::between(OffsetDateTime::now_utc(), instant);
            self.rules.check_positive(&value, cx)?;
            return Ok(Some(Converted { value, consumed: 1 }));
        }

        let parser = self.rules.parser(cx);
        let ignored = cx.translate_list("utils.durations.ignoredWords");

        let mut fragments = Vec::<String>::new();
        let mut index = 0;
        let mut consumed = 0;

        while let Some(token) = tokens.get(index) {
            if ignored.contains(&token.to_lowercase()) {
                index += 1;
                continue;
            }

            let error = match attempt(&parser, &fragments, token, &cx.locale) {
                Ok(()) => {
                    fragments.push(token.clone());
                    index += 1;
                    consumed = index;
                    continue;
                },
                Err(error) => error,
            };

            let error = match tokens.get(index + 1) {
                Some(next) => {
                    let merged = format!("{token}{next}");
                    match attempt(&parser, &fragments, &merged, &cx.locale) {
                        Ok(()) => {
                            fragments.push(merged);
                            index += 2;
                            consumed = index;
                            continue;
                        },
                        Err(error) => error,
                    }
                },
                None => error,
            };

            if fragments.is_empty() && self.should_throw {
                return Err(self.rules.relay(error, cx));
            }

            debug!("Duration ends before token {index} ({token:?}): {error}");
            break;
        }

        if fragments.is_empty() {
            return Ok(None);
        }

        let value = parser
            .parse(&fragments.concat(), &cx.locale)
            .map_err(|e| self.rules.relay(e, cx))?;
        self.rules.check_positive(&value, cx)?;

        Ok(Some(Converted { value, consumed }))
    }

    fn parse_option(
        &self,
        value: &CommandOptionValue,
        cx: &ParseCtxt<'_>,
    ) -> Result<DurationContainer, ConversionError> {
        let CommandOptionValue::String(s) = value else {
            return Err(ConversionError::InvalidValue);
        };

        let tokens = s.split_whitespace().map(str::to_owned).collect::<Vec<_>>();
        match self.coalesce(&tokens, cx)? {
            Some(converted) if converted.consumed == tokens.len() => Ok(converted.value),
            // let the parser explain what is wrong with the whole text
            _ => self.rules.parse_str(s.trim(), cx),
        }
    }
}
