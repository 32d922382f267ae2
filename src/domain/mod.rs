pub mod produto;

pub use produto::*;
