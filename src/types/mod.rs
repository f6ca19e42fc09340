mod popsicle;
mod popsicle_error;

pub use popsicle::{Popsicle, PopsicleFields, PopsicleId};
pub use popsicle_error::{FieldError, PopsicleError, ValidationErrors};
