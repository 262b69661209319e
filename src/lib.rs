//! Pim Pam Pet game core.
//!
//! Two engines: [`LetterWheel`] picks the letter a word must start with,
//! [`QuestionRotator`] picks the category question. Rendering lives in the
//! binary; everything here is plain state that can be driven from tests.

pub mod config;
pub mod error;
pub mod language;
pub mod letters;
pub mod questions;
pub mod rotator;
pub mod save_data;
pub mod spin;
pub mod store;
pub mod wheel;

pub use config::GameConfig;
pub use error::{ConfigError, QuestionError, Rejection, SaveDataError, StoreError, WheelError};
pub use language::{BuiltinQuestions, DefaultQuestionSource, Language};
pub use letters::{Letter, LetterSet};
pub use rotator::{QuestionRotator, RotatorConfig};
pub use spin::{Settled, SpinTiming};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use wheel::{LetterWheel, SpinConfig, SpinOutcome, WheelConfig};
