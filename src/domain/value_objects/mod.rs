//! Value objects shared across the storefront domain.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical GST rate. Listed costs are tax-inclusive, so the rate is used
/// to back the tax component out of a price, never to add it on top.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GstRate {
    #[default]
    #[serde(rename = "5")]
    Gst5,
    #[serde(rename = "18")]
    Gst18,
    #[serde(rename = "40")]
    Gst40,
}

impl GstRate {
    pub fn percent(self) -> u32 {
        match self {
            Self::Gst5 => 5,
            Self::Gst18 => 18,
            Self::Gst40 => 40,
        }
    }

    /// Divisor that converts a tax-inclusive amount into its pre-tax part.
    pub fn inclusive_divisor(self) -> Decimal {
        Decimal::ONE + Decimal::from(self.percent()) / Decimal::ONE_HUNDRED
    }
}

impl fmt::Display for GstRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// How the customer claims to have paid. The reference number captured at
/// checkout is the only proof; nothing is verified against a payment rail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "UPI")]
    Upi,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    #[serde(rename = "UPIQR")]
    UpiQr,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gst_rate_wire_format() {
        assert_eq!(serde_json::to_string(&GstRate::Gst18).unwrap(), "\"18\"");
        let rate: GstRate = serde_json::from_str("\"40\"").unwrap();
        assert_eq!(rate, GstRate::Gst40);
    }

    #[test]
    fn test_inclusive_divisor() {
        assert_eq!(GstRate::Gst5.inclusive_divisor(), Decimal::new(105, 2));
        assert_eq!(GstRate::Gst18.inclusive_divisor(), Decimal::new(118, 2));
    }

    #[test]
    fn test_payment_method_wire_format() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::BankTransfer).unwrap(),
            "\"Bank Transfer\""
        );
        let method: PaymentMethod = serde_json::from_str("\"UPIQR\"").unwrap();
        assert_eq!(method, PaymentMethod::UpiQr);
    }
}
