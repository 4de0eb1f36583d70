pub mod guide; // metric explanations
pub mod metrics; // spread, Amihud, imbalance, Kyle's lambda
pub mod table; // CSV -> numeric columns

pub use guide::explain;
pub use metrics::{
    amihud_illiquidity, bid_ask_spread, book_metrics, kyles_lambda, order_book_imbalance,
    table_metrics, MetricsError,
};
pub use table::{load_table, load_table_path, Table, TableError};
