pub mod batch;
pub mod config;
pub mod logging;
pub mod report;
pub mod source;
pub mod validate;

pub use config::{TokenizerMode, UrlCheck, ValidatorConfig};
pub use report::{OutputFormat, Problem, ProblemKind, ValidationResult};
pub use validate::{validate, Validator};
