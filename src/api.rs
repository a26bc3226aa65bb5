mod backend;
pub mod energyflow;

pub use self::backend::Backend;
