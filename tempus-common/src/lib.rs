pub mod config;
pub mod macros;
pub mod translations;

pub use translations::{Locale, Translate, Translations};

#[doc(hidden)]
pub use tracing_subscriber;
