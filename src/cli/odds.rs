//! Odds command implementation

use clap::Args;

use crate::odds::{american_to_decimal, american_to_probability, parse_american, probability_to_american};

#[derive(Args, Debug)]
pub struct OddsArgs {
    /// American price, e.g. -120 or +150
    #[arg(allow_hyphen_values = true)]
    pub price: String,
}

/// Converted forms of one American price
#[derive(Debug, Clone, PartialEq)]
pub struct OddsConversion {
    pub price: f64,
    pub implied: f64,
    pub decimal: f64,
    /// Implied probability mapped back to an American price
    pub round_trip: i32,
}

impl OddsArgs {
    pub fn convert(&self) -> anyhow::Result<OddsConversion> {
        let price = parse_american(&self.price)
            .ok_or_else(|| anyhow::anyhow!("Not a price: {}", self.price))?;
        let implied = american_to_probability(price)?;
        Ok(OddsConversion {
            price,
            implied,
            decimal: american_to_decimal(price)?,
            round_trip: probability_to_american(implied),
        })
    }

    pub fn execute(&self) -> anyhow::Result<()> {
        let c = self.convert()?;
        println!("Price:       {:+}", c.price);
        println!("Implied:     {:.4}", c.implied);
        println!("Decimal:     {:.4}", c.decimal);
        println!("Round trip:  {:+}", c.round_trip);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(price: &str) -> OddsArgs {
        OddsArgs {
            price: price.to_string(),
        }
    }

    #[test]
    fn test_convert_favorite() {
        let c = args("-120").convert().unwrap();
        assert!((c.implied - 120.0 / 220.0).abs() < 1e-12);
        assert!((c.decimal - (1.0 + 100.0 / 120.0)).abs() < 1e-12);
        assert_eq!(c.round_trip, -120);
    }

    #[test]
    fn test_convert_underdog() {
        let c = args("+150").convert().unwrap();
        assert!((c.implied - 0.4).abs() < 1e-12);
        assert_eq!(c.round_trip, 150);
    }

    #[test]
    fn test_convert_rejects_bad_input() {
        assert!(args("-50").convert().is_err());
        assert!(args("abc").convert().is_err());
    }
}
