//! # Domain Models
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Record`] | One ingested OHLCV row, numeric fields optional |
//! | [`PriceBar`] | Screened record with every strategy input present |
//! | [`Symbol`] | Normalized ticker used as the grouping key |
//! | [`TradeDate`] | Session date of a record |
//! | [`UtcDateTime`] | UTC timestamp for envelope metadata |

mod record;
mod symbol;
mod timestamp;

pub use record::{PriceBar, Record};
pub use symbol::Symbol;
pub use timestamp::{TradeDate, UtcDateTime};
