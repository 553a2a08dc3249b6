use std::any::Any;
use std::collections::HashSet;
use std::marker::PhantomData;

use anyhow::bail;
use tempus_common::{Locale, Translate};
use twilight_model::application::command::CommandOption;

use super::ParseCtxt;
use super::converters::{AnyValue, Cardinality, Converter, ErasedConverter};

/// A named converter. The name and description may be translation keys; they are resolved per invocation.
pub struct Argument {
    display_name: String,
    description: String,
    converter: Box<dyn ErasedConverter>,
}

impl Argument {
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn cardinality(&self) -> Cardinality {
        self.converter.cardinality()
    }

    pub fn required(&self) -> bool {
        self.converter.required()
    }

    /// The display name in `locale`.
    pub fn name(&self, cx: &ParseCtxt<'_>) -> String {
        cx.translate(&self.display_name)
    }

    pub(crate) fn converter(&self) -> &dyn ErasedConverter {
        self.converter.as_ref()
    }

    fn signature(&self, cx: &ParseCtxt<'_>) -> String {
        let mut inner = self.name(cx);
        if self.converter.show_type_in_signature() {
            inner = format!("{inner}: {}", cx.translate(self.converter.signature_type()));
        }
        if self.cardinality() == Cardinality::List {
            inner.push_str("...");
        }

        if self.required() {
            format!("<{inner}>")
        } else {
            format!("[{inner}]")
        }
    }
}

/// Reads one argument's value out of [`ParsedArguments`].
pub struct ArgKey<T> {
    index: usize,
    marker: PhantomData<fn() -> T>,
}

impl<T> Clone for ArgKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for ArgKey<T> {}

/// The ordered arguments of one command.
///
/// Display names must be unique within a locale, ignoring case. That is checked by [`Arguments::validate`], which
/// the parsing driver runs before every parse.
#[derive(Default)]
pub struct Arguments {
    args: Vec<Argument>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an argument and returns the key its value is read back with.
    pub fn arg<C: Converter>(
        &mut self,
        display_name: impl Into<String>,
        description: impl Into<String>,
        converter: C,
    ) -> ArgKey<C::Output> {
        self.args.push(Argument {
            display_name: display_name.into(),
            description: description.into(),
            converter: Box::new(converter),
        });

        ArgKey {
            index: self.args.len() - 1,
            marker: PhantomData,
        }
    }

    pub fn args(&self) -> &[Argument] {
        &self.args
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Fails if two arguments share a display name in `locale`, ignoring case.
    pub fn validate(&self, locale: &Locale, translations: &dyn Translate) -> anyhow::Result<()> {
        let mut seen = HashSet::new();

        for arg in &self.args {
            let name = translations.translate(&arg.display_name, locale).to_lowercase();

            if name.trim().is_empty() {
                bail!("Argument {:?} has an empty display name in {locale}", arg.display_name);
            }

            if !seen.insert(name.clone()) {
                bail!("Duplicate argument name {name:?} in {locale}");
            }
        }

        Ok(())
    }

    /// Usage line, like `<duration: duration> [message]`.
    pub fn signature(&self, cx: &ParseCtxt<'_>) -> String {
        self.args.iter().map(|arg| arg.signature(cx)).collect::<Vec<_>>().join(" ")
    }

    /// Interaction option schema, in declaration order.
    pub fn as_command_options(&self, cx: &ParseCtxt<'_>) -> Vec<CommandOption> {
        self.args
            .iter()
            .map(|arg| {
                arg.converter
                    .as_command_option(&arg.name(cx).to_lowercase(), &cx.translate(&arg.description))
            })
            .collect()
    }
}

/// Values produced by a successful parse, one per argument.
#[derive(Debug)]
pub struct ParsedArguments {
    values: Vec<Option<AnyValue>>,
}

impl ParsedArguments {
    pub(crate) fn new(values: Vec<Option<AnyValue>>) -> Self {
        Self { values }
    }

    /// The value for `key`, or `None` if the key belongs to another argument set.
    pub fn get<T: Any>(&self, key: &ArgKey<T>) -> Option<&T> {
        self.values.get(key.index)?.as_ref()?.downcast_ref::<T>()
    }

    pub fn take<T: Any>(&mut self, key: &ArgKey<T>) -> Option<T> {
        let value = self.values.get_mut(key.index)?.take()?;
        value.downcast::<T>().ok().map(|value| *value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
