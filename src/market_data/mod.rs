// Market data module entrypoint
pub mod adapters;   // venue-specific fetchers (Polygon, Dhan, Binance)
pub mod batch;      // fetch many instruments, retry the failures once
pub mod normaliser; // lenient wire value -> f64 coercion
pub mod order_book; // one side of a venue book, best level first
pub mod quality;    // Full / Partial / Missing tagging
pub mod snapshot;   // the venue-independent snapshot record
pub mod universe;   // built-in instrument lists per market

pub use adapters::{build_source, FetchError, QuoteSource, SourceError};
pub use batch::{BatchFetcher, BatchResult};
pub use order_book::{Level, OrderBook, OrderBookSide};
pub use quality::{classify, Quality};
pub use snapshot::{InstrumentSnapshot, QuoteFields};
pub use universe::Market;
