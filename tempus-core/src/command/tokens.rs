//! Positional token streams.
//!
//! Converters only ever look at a stream through [`TokenStream::peek_next`] or a [`fork`](TokenStream::fork); they
//! report how many tokens they used and the driver advances the real stream by that count.

use std::sync::Arc;

use tracing::trace;

pub trait TokenStream {
    fn has_next(&self) -> bool;
    /// The next token, without consuming it.
    fn peek_next(&self) -> Option<&str>;
    fn parse_next(&mut self) -> Option<String>;
    /// Cheaply forks this stream. Reading from the fork leaves `self` untouched.
    fn fork(&self) -> Box<dyn TokenStream + '_>;

    fn skip(&mut self, count: usize) {
        for _ in 0..count {
            if self.parse_next().is_none() {
                break;
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct RawToken {
    text: String,
    /// Whether the token opened with a quote, which stops it from being read as a keyword argument.
    quoted: bool,
}

/// Splits a raw message on whitespace, keeping double-quoted sections together.
///
/// Inside quotes, `\"` is a literal quote. Quotes can open mid-token, so `reason="two words"` is one token.
#[derive(Clone, Debug)]
pub struct StringParser {
    tokens: Arc<[RawToken]>,
    position: usize,
}

impl StringParser {
    pub fn new(input: &str) -> Self {
        Self {
            tokens: tokenize(input).into(),
            position: 0,
        }
    }

    /// Pulls keyword arguments (`name=value` and `--name value`) whose name passes `is_known` out of the unread
    /// input. Names are lower-cased; everything else stays in the stream in its original order.
    pub fn parse_named(&mut self, is_known: impl Fn(&str) -> bool) -> Vec<(String, String)> {
        let mut named = Vec::new();
        let mut positional = Vec::new();
        let mut tokens = self.tokens[self.position..].iter();

        while let Some(token) = tokens.next() {
            if !token.quoted {
                if let Some(name) = token.text.strip_prefix("--").map(str::to_lowercase) {
                    if is_known(&name) {
                        if let Some(value) = tokens.next() {
                            trace!("Keyword argument {name} from flag");
                            named.push((name, value.text.clone()));
                            continue;
                        }
                    }
                } else if let Some((name, value)) = token.text.split_once('=') {
                    let name = name.to_lowercase();
                    if is_known(&name) {
                        trace!("Keyword argument {name} from assignment");
                        named.push((name, value.to_owned()));
                        continue;
                    }
                }
            }

            positional.push(token.clone());
        }

        self.tokens = positional.into();
        self.position = 0;
        named
    }

    /// Unread tokens, in order.
    pub fn remaining(&self) -> impl Iterator<Item = &str> {
        self.tokens[self.position..].iter().map(|t| t.text.as_str())
    }
}

impl TokenStream for StringParser {
    fn has_next(&self) -> bool {
        self.position < self.tokens.len()
    }

    fn peek_next(&self) -> Option<&str> {
        self.tokens.get(self.position).map(|t| t.text.as_str())
    }

    fn parse_next(&mut self) -> Option<String> {
        let token = self.tokens.get(self.position)?.text.clone();
        self.position += 1;
        Some(token)
    }

    fn fork(&self) -> Box<dyn TokenStream + '_> {
        Box::new(self.clone())
    }
}

fn tokenize(input: &str) -> Vec<RawToken> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let Some(&first) = chars.peek() else {
            break;
        };

        let mut text = String::new();
        let mut in_quotes = false;

        while let Some(c) = chars.next() {
            match c {
                '\\' if in_quotes && chars.peek() == Some(&'"') => {
                    chars.next();
                    text.push('"');
                },
                '"' => in_quotes = !in_quotes,
                c if c.is_whitespace() && !in_quotes => break,
                c => text.push(c),
            }
        }

        tokens.push(RawToken {
            text,
            quoted: first == '"',
        });
    }

    tokens
}

/// A stream over tokens that were split elsewhere.
#[derive(Clone, Debug)]
pub struct TokenList {
    tokens: Arc<[String]>,
    position: usize,
}

impl TokenList {
    pub fn new<S: Into<String>>(tokens: impl IntoIterator<Item = S>) -> Self {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            position: 0,
        }
    }
}

impl TokenStream for TokenList {
    fn has_next(&self) -> bool {
        self.position < self.tokens.len()
    }

    fn peek_next(&self) -> Option<&str> {
        self.tokens.get(self.position).map(String::as_str)
    }

    fn parse_next(&mut self) -> Option<String> {
        let token = self.tokens.get(self.position)?.clone();
        self.position += 1;
        Some(token)
    }

    fn fork(&self) -> Box<dyn TokenStream + '_> {
        Box::new(self.clone())
    }
}
