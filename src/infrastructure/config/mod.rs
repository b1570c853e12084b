//! Infrastructure configuration modules.

pub mod fleet;
pub mod logging;
pub mod settings;
pub mod setup;
pub mod worker;

pub use settings::Config;
