mod collect;
mod parse;

pub use collect::{LoadedSeries, load_series};
pub use parse::{Repository, WeightMetric, parse_search_response};
