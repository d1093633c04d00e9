use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ExtractionSchema;

/// One line item of a commercial invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct InvoiceItem {
    /// Line number of the item on the invoice
    pub number: Option<String>,
    /// Product or part number
    pub prod_number: Option<String>,
    /// Description of the goods
    pub description: Option<String>,
    /// Quantity invoiced
    pub quantity: Option<String>,
    /// Harmonized System tariff code
    pub hs_code: Option<String>,
    /// Unit of measure
    pub uom: Option<String>,
    /// Country of origin of the goods
    pub origin: Option<String>,
    pub vendor_name: Option<String>,
    pub vendor_number: Option<String>,
    /// Price per unit
    pub unit_price: Option<String>,
    /// Currency of the unit price
    pub currency: Option<String>,
}

/// Key information of a commercial invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct InvoiceSchema {
    pub seller_name: Option<String>,
    pub seller_address: Option<String>,
    pub seller_country: Option<String>,
    pub seller_phone: Option<String>,

    pub buyer_name: Option<String>,
    pub buyer_address: Option<String>,
    pub buyer_country: Option<String>,
    pub buyer_phone: Option<String>,

    /// Delivery address when it differs from the buyer
    pub ship_to: Option<String>,
    pub invoice_number: Option<String>,
    pub invoice_date: Option<String>,
    pub payment_terms: Option<String>,
    /// Incoterms, e.g. FOB or CIF
    pub inco_terms: Option<String>,
    pub freight_terms: Option<String>,
    /// Country of origin of the shipment
    pub origin: Option<String>,
    /// Ultimate destination country
    pub ultimate_dest: Option<String>,
    /// Tax or VAT identification number
    pub tax_id: Option<String>,
    /// Line items in the order they appear on the invoice
    pub items: Option<Vec<InvoiceItem>>,
}

impl ExtractionSchema for InvoiceSchema {
    const NAME: &'static str = "invoice";
}
