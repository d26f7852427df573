pub mod load;
pub mod model;

pub use load::{load_settings, Paths};
pub use model::Settings;
