//! Typed extraction records and the JSON schema contract handed to the model.
//!
//! Every record is flat optional strings plus optional sequences of flat
//! sub-records. Absence is always `None`, serialized as an explicit `null`.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::chat::ResponseSchema;

pub mod awb;
pub mod invoice;
pub mod packing_list;

pub use awb::{AirWaybillSchema, AwbRateLine};
pub use invoice::{InvoiceItem, InvoiceSchema};
pub use packing_list::{PackingListItem, PackingListSchema};

pub trait ExtractionSchema:
    Serialize + DeserializeOwned + JsonSchema + Default + Send + Sync + 'static
{
    /// Name of the schema as sent to the provider. `[A-Za-z0-9_-]` only.
    const NAME: &'static str;

    fn response_schema() -> ResponseSchema {
        ResponseSchema {
            name: Self::NAME.to_string(),
            schema: strict_schema::<Self>(),
            strict: true,
        }
    }
}

/// JSON schema for `S` in the strict structured-output dialect: every
/// property is listed as required (optional fields stay nullable) and no
/// object admits extra properties.
pub fn strict_schema<S: JsonSchema>() -> Value {
    let mut schema = schemars::schema_for!(S).to_value();
    if let Some(root) = schema.as_object_mut() {
        root.remove("$schema");
    }
    tighten(&mut schema);
    schema
}

fn tighten(node: &mut Value) {
    let Some(obj) = node.as_object_mut() else {
        return;
    };

    let required = match obj.get_mut("properties") {
        Some(Value::Object(props)) => {
            props.values_mut().for_each(tighten);
            Some(props.keys().cloned().map(Value::String).collect::<Vec<_>>())
        }
        _ => None,
    };
    if let Some(required) = required {
        obj.insert("required".to_string(), Value::Array(required));
        obj.insert("additionalProperties".to_string(), Value::Bool(false));
    }

    if let Some(items) = obj.get_mut("items") {
        tighten(items);
    }
    for key in ["$defs", "definitions"] {
        if let Some(Value::Object(defs)) = obj.get_mut(key) {
            defs.values_mut().for_each(tighten);
        }
    }
    for key in ["anyOf", "oneOf", "allOf"] {
        if let Some(Value::Array(variants)) = obj.get_mut(key) {
            variants.iter_mut().for_each(tighten);
        }
    }
}

/// Plain structured form of a record: field name to string, null, or
/// sequence of such maps.
pub fn to_structured<S: ExtractionSchema>(record: &S) -> Result<Map<String, Value>, serde_json::Error> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(serde::ser::Error::custom(format!(
            "{} did not serialize to an object: {}",
            S::NAME,
            other
        ))),
    }
}
