pub mod models;
pub mod validation;
pub mod lookup;
pub mod errors;

pub use models::*;
pub use validation::*;
pub use lookup::*;
pub use errors::*;
