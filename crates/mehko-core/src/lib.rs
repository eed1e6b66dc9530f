pub mod model;
pub mod validate;

pub use model::{Application, FormStep, InfoStep, PdfStep, Step, SupportTools};
pub use validate::{Report, validate};
