use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ExtractionSchema;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PackingListItem {
    pub number: Option<String>,
    pub prod_number: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<String>,
    pub uom: Option<String>,
    /// Number of packages holding this line
    pub package_count: Option<String>,
    /// Package type, e.g. carton or pallet
    pub package_type: Option<String>,
    pub net_weight: Option<String>,
    pub gross_weight: Option<String>,
    /// Package dimensions as printed
    pub dimensions: Option<String>,
    pub volume: Option<String>,
    pub hs_code: Option<String>,
    pub origin: Option<String>,
}

/// Key information of a packing list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PackingListSchema {
    pub shipper_name: Option<String>,
    pub shipper_address: Option<String>,
    pub consignee_name: Option<String>,
    pub consignee_address: Option<String>,
    pub notify_party: Option<String>,

    pub packing_list_number: Option<String>,
    pub packing_list_date: Option<String>,
    /// Commercial invoice this packing list belongs to
    pub invoice_number: Option<String>,
    /// Purchase or sales order number
    pub order_number: Option<String>,
    pub shipping_marks: Option<String>,

    pub port_of_loading: Option<String>,
    pub port_of_discharge: Option<String>,
    /// Vessel name and voyage, or flight number
    pub vessel_or_flight: Option<String>,

    pub total_packages: Option<String>,
    pub total_net_weight: Option<String>,
    pub total_gross_weight: Option<String>,
    pub total_volume: Option<String>,
    /// Packed lines in the order they appear in the document
    pub items: Option<Vec<PackingListItem>>,
}

impl ExtractionSchema for PackingListSchema {
    const NAME: &'static str = "packing_list";
}
