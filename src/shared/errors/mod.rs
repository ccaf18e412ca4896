pub mod app_error;
pub mod classifier;
pub mod error_kind;

pub use app_error::{AppError, AppResult};
pub use classifier::{ErrorClassifier, TraceSite};
pub use error_kind::ErrorKind;
