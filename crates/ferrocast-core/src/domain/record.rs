use serde::{Deserialize, Serialize};

use crate::{Symbol, TradeDate, ValidationError};

/// One ingested OHLCV row.
///
/// Fields are `None` when the source cell was absent, non-numeric or
/// non-finite (or, for `symbol`, not a valid ticker). Records are tolerated in
/// that state until screening decides whether they take part in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub symbol: Option<Symbol>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<TradeDate>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl Record {
    /// Builds a record from already-coerced values; non-finite numbers become `None`.
    pub fn new(
        symbol: impl Into<Option<Symbol>>,
        open: Option<f64>,
        high: Option<f64>,
        low: Option<f64>,
        close: Option<f64>,
        volume: Option<f64>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            date: None,
            open: finite(open),
            high: finite(high),
            low: finite(low),
            close: finite(close),
            volume: finite(volume),
        }
    }

    /// Shorthand for a fully populated row.
    pub fn ohlcv(
        symbol: Symbol,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self::new(
            symbol,
            Some(open),
            Some(high),
            Some(low),
            Some(close),
            Some(volume),
        )
    }

    pub fn with_date(mut self, date: TradeDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Symbol for messages; `?` when the record has none.
    pub fn symbol_label(&self) -> &str {
        self.symbol.as_ref().map_or("?", Symbol::as_str)
    }

    /// Name of the first missing price field, in `open, high, low, close` order.
    pub fn missing_price_field(&self) -> Option<&'static str> {
        [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ]
        .into_iter()
        .find_map(|(field, value)| value.is_none().then_some(field))
    }
}

/// Screened view of a [`Record`]: every field the strategies read is present.
///
/// `volume` is the record's volume, or `0.0` when it was missing and the run
/// tolerates that.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    pub fn new(open: f64, high: f64, low: f64, close: f64, volume: f64) -> Result<Self, ValidationError> {
        for (field, value) in [
            ("open", open),
            ("high", high),
            ("low", low),
            ("close", close),
            ("volume", volume),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::NonFiniteValue { field });
            }
        }

        Ok(Self {
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
