use std::sync::Arc;

use tempus_common::config::{CONFIG, config_warning};
use tempus_common::config::config::ParsingConfig;
use tempus_common::{Locale, ok_or_break, ok_or_continue, tracing_init};
use tempus_core::command::ParseCtxt;
use tempus_core::command::arguments::{ArgKey, Arguments};
use tempus_core::command::converters::{CoalescedDuration, CoalescingConverter, OptionalCoalescingConverter, RestText};
use tempus_core::command::errors::ParseError;
use tempus_core::command::parser::parse_raw_message;
use tempus_core::tempus::{Tempus, ThreadSafeTempus};
use tempus_duration::DurationContainer;
use time::OffsetDateTime;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};

/// `remind <duration> [message]`
struct Remind {
    arguments: Arguments,
    duration: ArgKey<DurationContainer>,
    message: ArgKey<Option<String>>,
}

impl Remind {
    fn new(config: &ParsingConfig) -> Self {
        let mut arguments = Arguments::new();
        let duration = arguments.arg(
            "commands.remind.duration",
            "commands.remind.durationDescription",
            CoalescingConverter::new(CoalescedDuration::from_config(config).should_throw(true)),
        );
        let message = arguments.arg(
            "commands.remind.message",
            "commands.remind.messageDescription",
            OptionalCoalescingConverter::new(RestText),
        );

        Self {
            arguments,
            duration,
            message,
        }
    }

    fn run(&self, cx: &ParseCtxt<'_>, input: &str) -> String {
        let mut parsed = match parse_raw_message(&self.arguments, input, cx) {
            Ok(parsed) => parsed,
            Err(ParseError::Argument(e)) => return e.reason,
            Err(e @ ParseError::Configuration(_)) => {
                error!("{e:#}");
                return cx.translate("commands.remind.failed");
            },
        };

        let Some(duration) = parsed.take(&self.duration) else {
            return cx.translate("commands.remind.failed");
        };
        let message = parsed.take(&self.message).flatten().unwrap_or_default();

        match duration.normalize(OffsetDateTime::now_utc()) {
            Some(normalized) => cx.translate_with("commands.remind.success", &[&normalized, &message]),
            None => cx.translate("converters.duration.error.outOfRange"),
        }
    }
}

/// Splits an optional leading `@locale` off a line.
fn split_locale<'a>(line: &'a str, default: &Locale) -> (Locale, &'a str) {
    match line.strip_prefix('@').and_then(|rest| rest.split_once(char::is_whitespace)) {
        Some((tag, input)) => (Locale::new(tag), input),
        None => (default.clone(), line),
    }
}

#[tokio::main]
async fn main() {
    tracing_init!(&CONFIG.logging.filter);
    if let Some(warning) = config_warning() {
        warn!("{warning}");
    }

    info!("Initialising");
    let tempus: ThreadSafeTempus = match Tempus::new(CONFIG.clone()) {
        Ok(tempus) => Arc::new(tempus),
        Err(e) => {
            error!("Failed to initialise: {e:#}");
            return;
        },
    };

    let remind = Arc::new(Remind::new(&tempus.config.parsing));
    info!("Reading reminders from stdin, one per line (prefix with @<locale> to switch language)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tasks = Vec::new();
    let mut number = 0usize;

    loop {
        let Some(line) = ok_or_break!(lines.next_line().await) else {
            break;
        };

        number += 1;
        let tempus = tempus.clone();
        let remind = remind.clone();

        tasks.push(tokio::task::spawn_blocking(move || {
            let (locale, input) = split_locale(&line, tempus.translations.default_locale());
            debug!("Line {number} in {locale}: {input:?}");

            let cx = tempus.context(locale);
            println!("[{number}] {}", remind.run(&cx, input));
        }));
    }

    for task in tasks {
        ok_or_continue!(task.await);
    }

    info!("Done");
}
