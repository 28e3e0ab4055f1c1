pub mod market_api;
pub mod sources;

pub use market_api::HttpMarketSource;
pub use sources::{
    fetch_all_sources, fetch_batch, BatchOptions, FanInResult, MarketQuery, MarketSource,
    SourceError,
};
