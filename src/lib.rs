pub mod error;
pub mod export;
pub mod pack;
pub mod source;
pub mod store;
pub mod util;

pub use error::LayoutError;
pub use pack::{PlacedCircle, pack, pack_with_rng};
pub use store::{CapPolicy, Item, LegendEntry, ResultStore, Series, Weight, Weighted};
