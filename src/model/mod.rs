pub mod config;
pub mod gate;
pub mod record;
pub mod risk;

pub use config::*;
pub use gate::*;
pub use record::*;
pub use risk::*;
