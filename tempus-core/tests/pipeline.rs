use tempus_common::config::config::TempusConfig;
use tempus_common::Locale;
use tempus_core::command::arguments::Arguments;
use tempus_core::command::converters::{
    CoalescedDuration, CoalescingConverter, Converter, DefaultingCoalescingConverter, DefaultingConverter,
    DurationValue, Integer, ListConverter, OptionalCoalescingConverter, OptionalConverter, RestText, SingleConverter,
    Text,
};
use tempus_core::command::errors::ParseError;
use tempus_core::command::parser::{parse_command_options, parse_raw_message};
use tempus_core::command::tokens::TokenList;
use tempus_core::tempus::Tempus;
use tempus_duration::{DurationContainer, DurationParser, TimeUnit};
use twilight_model::application::interaction::application_command::{CommandDataOption, CommandOptionValue};

fn tempus() -> Tempus {
    Tempus::new(TempusConfig::default()).unwrap()
}

fn parse(tempus: &Tempus, input: &str, locale: &Locale) -> DurationContainer {
    DurationParser::signed(&tempus.units).parse(input, locale).unwrap()
}

#[test]
fn coalescing_counts_raw_tokens() {
    let tempus = tempus();
    let cx = tempus.context(Locale::ENGLISH);
    let converter = CoalescingConverter::new(CoalescedDuration::new());

    let stream = TokenList::new(["1", "day", "and", "2", "hours"]);
    let converted = converter.parse(&stream, &cx).unwrap();

    assert_eq!(converted.consumed, 5);
    assert_eq!(converted.value, parse(&tempus, "1day2hours", &Locale::ENGLISH));
}

#[test]
fn colliding_names_fail_validation() {
    let tempus = tempus();

    let mut args = Arguments::new();
    args.arg("commands.remind.duration", "", SingleConverter::new(Text::new()));
    args.arg("Duration", "", SingleConverter::new(Text::new()));

    assert!(args.validate(&Locale::ENGLISH, tempus.translations.as_ref()).is_err());
    // "durée" and "duration" differ
    assert!(args.validate(&Locale::FRENCH, tempus.translations.as_ref()).is_ok());
}

#[test]
fn both_surfaces_agree() {
    let tempus = tempus();

    for (locale, input) in [
        (Locale::ENGLISH, "1w2d"),
        (Locale::ENGLISH, "3h,20m"),
        (Locale::ENGLISH, "1y+6mo"),
        (Locale::FRENCH, "2j4h"),
        (Locale::ENGLISH, "10zz"),
        (Locale::ENGLISH, "-2d"),
    ] {
        let cx = tempus.context(locale);

        let mut args = Arguments::new();
        let key = args.arg("duration", "", SingleConverter::new(DurationValue::new()));

        let positional = parse_raw_message(&args, input, &cx);
        let structured = parse_command_options(
            &args,
            &[CommandDataOption {
                name: "duration".to_owned(),
                value: CommandOptionValue::String(input.to_owned()),
            }],
            &cx,
        );

        match (positional, structured) {
            (Ok(positional), Ok(structured)) => assert_eq!(positional.get(&key), structured.get(&key)),
            (Err(ParseError::Argument(positional)), Err(ParseError::Argument(structured))) => {
                assert_eq!(positional, structured)
            },
            (positional, structured) => panic!("{input}: surfaces disagree: {positional:?} / {structured:?}"),
        }
    }
}

#[test]
fn french_reminder() {
    let tempus = tempus();
    let cx = tempus.context(Locale::new("fr-FR"));

    let mut args = Arguments::new();
    let duration_key = args.arg(
        "commands.remind.duration",
        "",
        CoalescingConverter::new(CoalescedDuration::new()),
    );
    let message = args.arg("commands.remind.message", "", OptionalCoalescingConverter::new(RestText));

    let parsed = parse_raw_message(&args, "10 minutes et 4 heures arroser les plantes", &cx).unwrap();

    let duration = parsed.get(&duration_key).unwrap();
    assert_eq!(duration.get(TimeUnit::Hours), 4);
    assert_eq!(duration.get(TimeUnit::Minutes), 10);
    assert_eq!(parsed.get(&message).unwrap().as_deref(), Some("arroser les plantes"));

    // keyword names follow the locale too
    let parsed = parse_raw_message(&args, "durée=2j message=bientôt", &cx).unwrap();
    assert_eq!(parsed.get(&duration_key).unwrap().get(TimeUnit::Days), 2);
    assert_eq!(parsed.get(&message).unwrap().as_deref(), Some("bientôt"));
}

#[test]
fn mixed_policies() {
    let tempus = tempus();
    let cx = tempus.context(Locale::ENGLISH);

    let mut args = Arguments::new();
    let snooze = args.arg(
        "snooze",
        "",
        DefaultingConverter::new(DurationValue::new(), parse(&tempus, "5m", &Locale::ENGLISH)),
    );
    let repeat = args.arg("repeat", "", OptionalConverter::new(DurationValue::new()));
    let tags = args.arg("tags", "", ListConverter::new(Text::new().max_length(8)).optional());

    let parsed = parse_raw_message(&args, "10m 1d chores home", &cx).unwrap();
    assert_eq!(parsed.get(&snooze).unwrap().get(TimeUnit::Minutes), 10);
    assert_eq!(parsed.get(&repeat).unwrap().as_ref().map(|d| d.get(TimeUnit::Days)), Some(1));
    assert_eq!(parsed.get(&tags).unwrap(), &["chores", "home"]);

    let parsed = parse_raw_message(&args, "", &cx).unwrap();
    assert_eq!(parsed.get(&snooze).unwrap().get(TimeUnit::Minutes), 5);
    assert_eq!(parsed.get(&repeat), Some(&None));
    assert!(parsed.get(&tags).unwrap().is_empty());
}

fn reason(result: Result<impl std::fmt::Debug, ParseError>) -> String {
    match result {
        Err(ParseError::Argument(e)) => e.reason,
        other => panic!("expected an argument error, got {other:?}"),
    }
}

#[test]
fn punctuation_is_not_a_reminder() {
    let tempus = tempus();
    let cx = tempus.context(Locale::ENGLISH);

    let mut args = Arguments::new();
    args.arg(
        "commands.remind.duration",
        "",
        CoalescingConverter::new(CoalescedDuration::new().should_throw(true)),
    );
    args.arg("commands.remind.message", "", OptionalCoalescingConverter::new(RestText));

    for input in ["+ buy milk", ", buy milk", "+"] {
        let reason = reason(parse_raw_message(&args, input, &cx));
        assert!(reason.starts_with("Invalid value for argument `duration`"), "{input}: {reason}");
    }

    let reason = reason(parse_raw_message(&args, "duration=+", &cx));
    assert!(reason.contains("`+` is not a valid amount."), "{reason}");
}

#[test]
fn validators_relay_their_reason() {
    let tempus = tempus();
    let cx = tempus.context(Locale::ENGLISH);

    let mut args = Arguments::new();
    let count = args.arg(
        "count",
        "",
        SingleConverter::new(Integer::new()).validator(|n| {
            if n % 2 == 0 {
                Ok(())
            } else {
                Err("must be even".to_owned())
            }
        }),
    );

    assert_eq!(parse_raw_message(&args, "4", &cx).unwrap().get(&count), Some(&4));
    assert_eq!(
        reason(parse_raw_message(&args, "3", &cx)),
        "Invalid value for argument `count`: must be even"
    );
}

#[test]
fn defaulting_coalesced_duration() {
    let tempus = tempus();
    let cx = tempus.context(Locale::ENGLISH);
    let five_minutes = parse(&tempus, "5m", &Locale::ENGLISH);

    let mut args = Arguments::new();
    let snooze = args.arg(
        "snooze",
        "",
        DefaultingCoalescingConverter::new(CoalescedDuration::new(), five_minutes.clone()),
    );
    let message = args.arg("message", "", OptionalCoalescingConverter::new(RestText));

    let parsed = parse_raw_message(&args, "1 hour and 30 minutes stretch", &cx).unwrap();
    assert_eq!(parsed.get(&snooze), Some(&parse(&tempus, "1h30m", &Locale::ENGLISH)));
    assert_eq!(parsed.get(&message).unwrap().as_deref(), Some("stretch"));

    // nothing is consumed by the fallback
    let parsed = parse_raw_message(&args, "stretch now", &cx).unwrap();
    assert_eq!(parsed.get(&snooze), Some(&five_minutes));
    assert_eq!(parsed.get(&message).unwrap().as_deref(), Some("stretch now"));

    let parsed = parse_raw_message(&args, "", &cx).unwrap();
    assert_eq!(parsed.get(&snooze), Some(&five_minutes));
    assert_eq!(parsed.get(&message), Some(&None));

    // a past duration is an error that the default swallows unless asked not to
    let strict = DefaultingCoalescingConverter::new(CoalescedDuration::new(), five_minutes.clone()).output_error(true);
    assert!(strict.parse(&TokenList::new(["-2h"]), &cx).is_err());
    let lenient = DefaultingCoalescingConverter::new(CoalescedDuration::new(), five_minutes.clone());
    assert_eq!(lenient.parse(&TokenList::new(["-2h"]), &cx).unwrap().value, five_minutes);
}

#[test]
fn required_list_needs_one_value() {
    let tempus = tempus();
    let cx = tempus.context(Locale::ENGLISH);

    let mut args = Arguments::new();
    let counts = args.arg("counts", "", ListConverter::new(Integer::new()));

    let parsed = parse_raw_message(&args, "1 2 3", &cx).unwrap();
    assert_eq!(parsed.get(&counts).unwrap(), &[1, 2, 3]);

    assert_eq!(
        reason(parse_raw_message(&args, "x", &cx)),
        "Invalid value for argument `counts`: `x` is not a whole number."
    );

    let mut args = Arguments::new();
    let counts = args.arg("counts", "", ListConverter::new(Integer::new()).optional());
    let parsed = parse_raw_message(&args, "x", &cx).unwrap();
    assert!(parsed.get(&counts).unwrap().is_empty());
}
