//! Per-record validation that runs before grouping.
//!
//! Screening is the only place the invalid-record policy is applied: a record
//! that is skipped here takes no part in grouping, aggregation or prediction.

use serde::Serialize;
use tracing::warn;

use crate::{InvalidRecordPolicy, PipelineConfig, PipelineError, PriceBar, Record, Symbol, ValidationError};

/// A record that passed screening, with its position in the ingested sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenedRecord<'a> {
    pub position: usize,
    pub record: &'a Record,
    pub symbol: &'a Symbol,
    pub bar: PriceBar,
}

impl<'a> ScreenedRecord<'a> {
    pub fn symbol(&self) -> &'a Symbol {
        self.symbol
    }
}

/// A record excluded under [`InvalidRecordPolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordRejection {
    pub position: usize,
    pub symbol: Option<Symbol>,
    pub field: &'static str,
}

impl RecordRejection {
    pub fn message(&self) -> String {
        format!(
            "skipped record at position {} ({}): missing or non-numeric '{}'",
            self.position,
            self.symbol.as_ref().map_or("?", Symbol::as_str),
            self.field
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Screening<'a> {
    pub accepted: Vec<ScreenedRecord<'a>>,
    pub rejected: Vec<RecordRejection>,
}

/// Screens every record in input order.
///
/// Fails with `EmptyInput` when `records` is empty or nothing survives, and
/// with the first `InvalidRecord` under [`InvalidRecordPolicy::Abort`].
pub fn screen<'a>(records: &'a [Record], config: &PipelineConfig) -> Result<Screening<'a>, PipelineError> {
    if records.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let mut accepted = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();

    for (position, record) in records.iter().enumerate() {
        match screen_one(record, config.strict_volume) {
            Ok((symbol, bar)) => accepted.push(ScreenedRecord {
                position,
                record,
                symbol,
                bar,
            }),
            Err(field) => {
                let error = PipelineError::InvalidRecord {
                    position,
                    symbol: record.symbol_label().to_owned(),
                    field,
                };
                match config.on_invalid {
                    InvalidRecordPolicy::Abort => return Err(error),
                    InvalidRecordPolicy::Skip => {
                        warn!(position, symbol = record.symbol_label(), field, "skipping invalid record");
                        rejected.push(RecordRejection {
                            position,
                            symbol: record.symbol.clone(),
                            field,
                        });
                    }
                }
            }
        }
    }

    if accepted.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    Ok(Screening { accepted, rejected })
}

fn screen_one(record: &Record, strict_volume: bool) -> Result<(&Symbol, PriceBar), &'static str> {
    let Some(symbol) = record.symbol.as_ref() else {
        return Err("symbol");
    };
    if let Some(field) = record.missing_price_field() {
        return Err(field);
    }

    // Non-finite volume counts as missing.
    let volume = match record.volume {
        Some(volume) if volume.is_finite() => volume,
        _ if strict_volume => return Err("volume"),
        _ => 0.0,
    };

    PriceBar::new(
        record.open.unwrap_or(f64::NAN),
        record.high.unwrap_or(f64::NAN),
        record.low.unwrap_or(f64::NAN),
        record.close.unwrap_or(f64::NAN),
        volume,
    )
    .map_err(|error| match error {
        ValidationError::NonFiniteValue { field } => field,
        _ => "record",
    })
    .map(|bar| (symbol, bar))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(open: Option<f64>, close: Option<f64>, volume: Option<f64>) -> Record {
        Record::new(
            Symbol::parse("AAL").expect("valid"),
            open,
            Some(12.0),
            Some(9.0),
            close,
            volume,
        )
    }

    #[test]
    fn missing_volume_defaults_to_zero() {
        let records = vec![record(Some(10.0), Some(11.0), None)];
        let screening = screen(&records, &PipelineConfig::default()).expect("screens");

        assert_eq!(screening.accepted.len(), 1);
        assert_eq!(screening.accepted[0].bar.volume, 0.0);
        assert!(screening.rejected.is_empty());
    }

    #[test]
    fn strict_volume_aborts_by_default() {
        let records = vec![
            record(Some(10.0), Some(11.0), Some(5.0)),
            record(Some(10.0), Some(11.0), None),
        ];
        let config = PipelineConfig::default().with_strict_volume(true);

        let err = screen(&records, &config).expect_err("must fail");
        assert_eq!(
            err,
            PipelineError::InvalidRecord {
                position: 1,
                symbol: String::from("AAL"),
                field: "volume",
            }
        );
    }

    #[test]
    fn skip_policy_records_rejections_in_order() {
        let records = vec![
            record(None, Some(11.0), Some(5.0)),
            record(Some(10.0), Some(11.0), Some(5.0)),
            record(Some(10.0), None, Some(5.0)),
        ];
        let config = PipelineConfig::default().with_policy(InvalidRecordPolicy::Skip);

        let screening = screen(&records, &config).expect("screens");
        assert_eq!(screening.accepted.len(), 1);
        assert_eq!(screening.accepted[0].position, 1);
        let rejected: Vec<_> = screening
            .rejected
            .iter()
            .map(|r| (r.position, r.field))
            .collect();
        assert_eq!(rejected, vec![(0, "open"), (2, "close")]);
    }

    #[test]
    fn nothing_left_after_skipping_is_empty_input() {
        let records = vec![record(None, Some(11.0), Some(5.0))];
        let config = PipelineConfig::default().with_policy(InvalidRecordPolicy::Skip);

        assert_eq!(
            screen(&records, &config).expect_err("must fail"),
            PipelineError::EmptyInput
        );
    }

    #[test]
    fn non_finite_volume_is_treated_like_missing_volume() {
        let mut nan = record(Some(10.0), Some(11.0), Some(5.0));
        nan.volume = Some(f64::NAN);
        let mut inf = record(Some(10.0), Some(11.0), Some(5.0));
        inf.volume = Some(f64::INFINITY);
        let records = vec![nan, inf];

        let screening = screen(&records, &PipelineConfig::default()).expect("screens");
        assert_eq!(screening.accepted.len(), 2);
        assert!(screening.accepted.iter().all(|r| r.bar.volume == 0.0));

        let strict = PipelineConfig::default().with_strict_volume(true);
        let err = screen(&records, &strict).expect_err("must fail");
        assert!(matches!(err, PipelineError::InvalidRecord { position: 0, field: "volume", .. }));
    }

    #[test]
    fn missing_symbol_follows_the_invalid_record_policy() {
        let mut records = vec![
            record(Some(10.0), Some(11.0), Some(5.0)),
            record(Some(10.0), Some(11.0), Some(5.0)),
        ];
        records[0].symbol = None;

        let err = screen(&records, &PipelineConfig::default()).expect_err("must fail");
        assert_eq!(
            err,
            PipelineError::InvalidRecord {
                position: 0,
                symbol: String::from("?"),
                field: "symbol",
            }
        );

        let config = PipelineConfig::default().with_policy(InvalidRecordPolicy::Skip);
        let screening = screen(&records, &config).expect("screens");
        assert_eq!(screening.accepted.len(), 1);
        assert_eq!(screening.rejected[0].symbol, None);
        assert_eq!(screening.rejected[0].field, "symbol");
        assert!(screening.rejected[0].message().contains("(?)"));
    }

    #[test]
    fn nan_written_directly_into_a_record_is_caught() {
        let mut bad = record(Some(10.0), Some(11.0), Some(5.0));
        bad.high = Some(f64::NAN);

        let err = screen(&[bad], &PipelineConfig::default()).expect_err("must fail");
        assert!(matches!(err, PipelineError::InvalidRecord { field: "high", .. }));
    }
}
