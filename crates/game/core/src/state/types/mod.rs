pub mod common;

pub use common::{AccountId, BoardSeed, Cell, Hash32};
