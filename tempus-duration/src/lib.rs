#![warn(rust_2018_idioms)]

//! Human-written durations such as `1w2d3h` or `10 minutes, 4 heures`.
//!
//! Units are resolved per locale through a [`UnitCache`], parsed by a [`DurationParser`] and collected into a
//! [`DurationContainer`] that keeps calendar units (months, years) apart from clock units until it is applied to a
//! concrete instant.

pub mod cache;
pub mod container;
pub mod errors;
pub mod parser;
pub mod unit;

pub use cache::{UnitCache, UnitTable};
pub use container::DurationContainer;
pub use errors::{DurationError, DurationParserError, ParserErrorKind};
pub use parser::{DurationParser, Negatives};
pub use unit::TimeUnit;
