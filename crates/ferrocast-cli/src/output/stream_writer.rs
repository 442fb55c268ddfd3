//! NDJSON stream events for `--stream`.
//!
//! Every line is one [`StreamEvent`]; `seq` starts at 1 and increases by one
//! per event.

use std::io::Write;

use ferrocast_core::UtcDateTime;
use serde::Serialize;
use serde_json::Value;

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamEventType {
    Start,
    Progress,
    Chunk,
    End,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamEventError {
    pub code: String,
    pub message: String,
}

impl StreamEventError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamEvent {
    pub event: StreamEventType,
    pub seq: u64,
    pub ts: UtcDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StreamEventError>,
}

/// Writes events as newline-delimited JSON, flushing after each one.
pub struct NdjsonStreamWriter<W: Write> {
    writer: W,
    next_seq: u64,
}

impl<W: Write> NdjsonStreamWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            next_seq: 1,
        }
    }

    pub fn emit_start(&mut self, data: Option<Value>) -> Result<(), CliError> {
        self.emit(StreamEventType::Start, data, None)
    }

    pub fn emit_progress(&mut self, data: Option<Value>) -> Result<(), CliError> {
        self.emit(StreamEventType::Progress, data, None)
    }

    pub fn emit_chunk(&mut self, data: Option<Value>) -> Result<(), CliError> {
        self.emit(StreamEventType::Chunk, data, None)
    }

    pub fn emit_end(&mut self, data: Option<Value>) -> Result<(), CliError> {
        self.emit(StreamEventType::End, data, None)
    }

    pub fn emit_error(&mut self, error: StreamEventError, data: Option<Value>) -> Result<(), CliError> {
        self.emit(StreamEventType::Error, data, Some(error))
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(
        &mut self,
        event: StreamEventType,
        data: Option<Value>,
        error: Option<StreamEventError>,
    ) -> Result<(), CliError> {
        let event = StreamEvent {
            event,
            seq: self.next_seq,
            ts: UtcDateTime::now(),
            data,
            error,
        };
        serde_json::to_writer(&mut self.writer, &event)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.next_seq += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn events_are_sequenced_one_per_line() {
        let mut writer = NdjsonStreamWriter::new(Vec::new());
        writer.emit_start(Some(json!({ "request_id": "abc12345" }))).expect("start");
        writer
            .emit_error(StreamEventError::new("empty_input", "no records supplied"), None)
            .expect("error");
        writer.emit_end(None).expect("end");

        let output = String::from_utf8(writer.into_inner()).expect("utf8");
        let events: Vec<Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).expect("valid json line"))
            .collect();

        assert_eq!(events.len(), 3);
        assert_eq!(events[0]["event"], "start");
        assert_eq!(events[0]["seq"], 1);
        assert_eq!(events[1]["event"], "error");
        assert_eq!(events[1]["error"]["code"], "empty_input");
        assert_eq!(events[2]["seq"], 3);
        assert!(events[2].get("data").is_none());
    }
}
