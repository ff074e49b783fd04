//! Argument values that clap can't parse on its own.

use std::str::FromStr;

use petshop::{
    payments::{PaymentMethod, Tender},
    prices::{self, Price},
    products::ProductUuid,
};
use rust_decimal::Decimal;

/// `PRODUCT_ID[:QTY]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ItemSpec {
    pub(crate) product: ProductUuid,
    pub(crate) quantity: u32,
}

impl FromStr for ItemSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (product, quantity) = s.split_once(':').unwrap_or((s, "1"));

        let product = product
            .trim()
            .parse()
            .map_err(|error| format!("invalid product id {product:?}: {error}"))?;

        let quantity = quantity
            .trim()
            .parse()
            .map_err(|error| format!("invalid quantity {quantity:?}: {error}"))?;

        Ok(Self { product, quantity })
    }
}

/// `METHOD:AMOUNT[:REFERENCE]`
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TenderSpec(pub(crate) Tender);

impl FromStr for TenderSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');

        let method: PaymentMethod = parts
            .next()
            .unwrap_or_default()
            .parse()
            .map_err(|error| format!("{error}"))?;

        let amount = parts
            .next()
            .ok_or_else(|| format!("missing amount in {s:?}"))
            .and_then(parse_amount)?;

        let tender = Tender::new(method, amount);

        Ok(Self(match parts.next().map(str::trim) {
            Some(reference) if !reference.is_empty() => tender.with_reference(reference),
            _ => tender,
        }))
    }
}

/// A peso amount such as `150` or `99.50`.
pub(crate) fn parse_amount(s: &str) -> Result<Price, String> {
    let decimal = Decimal::from_str(s.trim()).map_err(|error| format!("invalid amount {s:?}: {error}"))?;

    prices::from_decimal(decimal).map_err(|error| error.to_string())
}

#[cfg(test)]
mod tests {
    use petshop::prices::{centavos, pesos};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn items_default_to_one() -> TestResult {
        let product = ProductUuid::new();

        assert_eq!(
            product.to_string().parse::<ItemSpec>()?,
            ItemSpec { product, quantity: 1 }
        );
        assert_eq!(
            format!("{product}:3").parse::<ItemSpec>()?,
            ItemSpec { product, quantity: 3 }
        );
        assert!(format!("{product}:x").parse::<ItemSpec>().is_err());
        assert!("kibble".parse::<ItemSpec>().is_err());

        Ok(())
    }

    #[test]
    fn tenders_parse_method_amount_and_reference() -> TestResult {
        let TenderSpec(cash) = "cash:500".parse()?;

        assert_eq!(cash, Tender::new(PaymentMethod::Cash, pesos(500)));

        let TenderSpec(gcash) = "gcash:99.50:REF123".parse()?;

        assert_eq!(gcash.method, PaymentMethod::Gcash);
        assert_eq!(gcash.amount, centavos(9_950));
        assert_eq!(gcash.reference.as_deref(), Some("REF123"));

        assert!("cheque:100".parse::<TenderSpec>().is_err());
        assert!("cash".parse::<TenderSpec>().is_err());

        Ok(())
    }
}
