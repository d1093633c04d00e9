use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ExtractionSchema;

/// One rating line from the charges block of an air waybill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AwbRateLine {
    /// Number of pieces (RCP)
    pub pieces: Option<String>,
    pub gross_weight: Option<String>,
    /// Weight unit, kg or lb
    pub weight_unit: Option<String>,
    /// IATA rate class code, e.g. M, N, Q or C
    pub rate_class: Option<String>,
    pub commodity_item_number: Option<String>,
    pub chargeable_weight: Option<String>,
    /// Rate or charge per unit
    pub rate: Option<String>,
    pub total: Option<String>,
    /// Nature and quantity of goods, including dimensions or volume
    pub nature_and_quantity: Option<String>,
}

/// Key information of an air waybill (AWB).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AirWaybillSchema {
    /// Waybill number as printed, e.g. 176-12345675
    pub awb_number: Option<String>,
    pub master_awb_number: Option<String>,
    pub house_awb_number: Option<String>,

    pub shipper_name: Option<String>,
    pub shipper_address: Option<String>,
    pub consignee_name: Option<String>,
    pub consignee_address: Option<String>,

    pub issuing_carrier: Option<String>,
    pub agent_name: Option<String>,
    pub agent_iata_code: Option<String>,

    pub airport_of_departure: Option<String>,
    pub airport_of_destination: Option<String>,
    /// Routing and carriers between departure and destination
    pub routing: Option<String>,
    pub flight_number: Option<String>,
    pub flight_date: Option<String>,

    pub currency: Option<String>,
    /// Charges code, e.g. PP or CC
    pub charges_code: Option<String>,
    pub declared_value_carriage: Option<String>,
    pub declared_value_customs: Option<String>,
    pub handling_information: Option<String>,

    pub total_pieces: Option<String>,
    pub total_gross_weight: Option<String>,
    pub chargeable_weight: Option<String>,
    pub total_charge: Option<String>,

    pub execution_date: Option<String>,
    pub execution_place: Option<String>,
    /// Rate lines in the order they appear on the waybill
    pub rate_lines: Option<Vec<AwbRateLine>>,
}

impl ExtractionSchema for AirWaybillSchema {
    const NAME: &'static str = "air_waybill";
}
