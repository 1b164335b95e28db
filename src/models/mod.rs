pub mod consultation;
pub mod enums;
pub mod filters;

pub use consultation::*;
pub use enums::*;
pub use filters::*;
