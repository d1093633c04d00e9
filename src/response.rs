use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::extract::ExtractionResult;

/// Successful response: the extracted record and the seconds spent in the
/// extraction call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionEnvelope {
    pub execution_time: f64,
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `started` is taken right before the extraction call, so staging and text
/// decoding are not counted.
pub fn format_response(result: ExtractionResult, started: Instant) -> ExtractionEnvelope {
    ExtractionEnvelope {
        execution_time: started.elapsed().as_secs_f64(),
        data: result.into_data(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AirWaybillSchema, AwbRateLine, InvoiceSchema};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn test_elapsed_time_from_start() {
        let started = Instant::now() - Duration::from_millis(1500);
        let result = ExtractionResult::from_record(&InvoiceSchema::default()).unwrap();
        let envelope = format_response(result, started);
        assert!(envelope.execution_time >= 1.5);
        assert!(envelope.execution_time < 60.0);
    }

    #[test]
    fn test_envelope_round_trip_preserves_nulls() -> anyhow::Result<()> {
        let record = AirWaybillSchema {
            awb_number: Some("176-12345675".into()),
            consignee_name: Some("".into()),
            rate_lines: Some(vec![
                AwbRateLine { pieces: Some("3".into()), ..Default::default() },
                AwbRateLine::default(),
            ]),
            ..Default::default()
        };
        let envelope = format_response(ExtractionResult::from_record(&record)?, Instant::now());

        let wire = serde_json::to_string(&envelope)?;
        assert!(wire.contains("\"execution_time\":"));
        assert!(wire.contains("\"shipper_name\":null"));

        let parsed: ExtractionEnvelope = serde_json::from_str(&wire)?;
        assert_eq!(parsed.data, envelope.data);
        assert!((parsed.execution_time - envelope.execution_time).abs() < 1e-9);
        let back: AirWaybillSchema = serde_json::from_value(Value::Object(parsed.data))?;
        assert_eq!(back, record);
        Ok(())
    }
}
