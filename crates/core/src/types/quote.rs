//! DTF transfer quote pricing engine.
//!
//! A quote prices a print run: a design of `width` x `height` inches printed
//! `quantity` times, pressed onto a blank product. Imprint cost scales with
//! printed area; product and press costs scale with unit count; retail price
//! is cost plus a percentage markup.
//!
//! [`calculate`] is pure and deterministic: identical input always produces
//! an identical [`QuoteResult`], and invalid input never produces a partial
//! one. All arithmetic is full-precision [`Decimal`]; rounding to display
//! precision happens only via [`QuoteResult::rounded`].

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when validating a [`QuoteInput`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    /// Width is zero or negative.
    #[error("width must be greater than zero")]
    NonPositiveWidth,
    /// Height is zero or negative.
    #[error("height must be greater than zero")]
    NonPositiveHeight,
    /// Quantity is zero.
    #[error("quantity must be greater than zero")]
    NonPositiveQuantity,
    /// A per-unit cost is negative.
    #[error("{field} cannot be negative")]
    NegativeCost {
        /// Name of the offending field.
        field: &'static str,
    },
    /// An intermediate value exceeded the numeric range.
    #[error("quote values are too large to price")]
    Overflow,
}

/// Pricing constants that apply to every quote.
///
/// The cost per printed square inch used to be a literal buried in the
/// formula; it is configuration so merchants on different film stock can
/// be priced differently without a code change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Imprint cost per square inch of printed film.
    pub cost_per_square_inch: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            // $0.50 per square inch
            cost_per_square_inch: Decimal::new(50, 2),
        }
    }
}

/// Input to a quote calculation.
///
/// Dimensions are inches; costs are per-unit currency amounts. The engine
/// rejects non-positive dimensions and quantity, and negative costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteInput {
    /// Design width in inches.
    pub width: Decimal,
    /// Design height in inches.
    pub height: Decimal,
    /// Number of units in the run.
    pub quantity: u32,
    /// Cost of the blank product, per unit.
    pub product_cost: Decimal,
    /// Heat press charge, per unit.
    pub press_cost: Decimal,
    /// Markup percentage applied to cost (may be zero).
    pub markup_percent: Decimal,
}

/// A complete cost/profit breakdown, entirely recomputed from its input.
///
/// All fields are full-precision; call [`Self::rounded`] before display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteResult {
    /// Printed area per piece, in square inches.
    pub area: Decimal,
    /// Printed area across the whole run.
    pub total_area: Decimal,
    /// Imprint cost (`total_area` * cost per square inch).
    pub imprint_cost: Decimal,
    /// Blank product cost across the run.
    pub total_product_cost: Decimal,
    /// Heat press cost across the run.
    pub total_press_cost: Decimal,
    /// Sum of imprint, product, and press costs.
    pub total_cost: Decimal,
    /// Cost per unit.
    pub unit_cost: Decimal,
    /// Retail price per unit after markup.
    pub retail_unit: Decimal,
    /// Retail price for the whole run.
    pub retail_total: Decimal,
    /// Retail total minus total cost (negative if markup is insufficient).
    pub total_profit: Decimal,
}

impl QuoteResult {
    /// Round every monetary and area field to 2 decimal places for display.
    ///
    /// Uses midpoint-away-from-zero, the rounding merchants expect on
    /// invoices.
    #[must_use]
    pub fn rounded(&self) -> Self {
        let r = |d: Decimal| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Self {
            area: r(self.area),
            total_area: r(self.total_area),
            imprint_cost: r(self.imprint_cost),
            total_product_cost: r(self.total_product_cost),
            total_press_cost: r(self.total_press_cost),
            total_cost: r(self.total_cost),
            unit_cost: r(self.unit_cost),
            retail_unit: r(self.retail_unit),
            retail_total: r(self.retail_total),
            total_profit: r(self.total_profit),
        }
    }
}

/// Calculate a quote from validated input.
///
/// # Errors
///
/// Returns a [`QuoteError`] if width, height, or quantity is not positive,
/// if either per-unit cost is negative, or if an intermediate value
/// overflows [`Decimal`]. No partial result is produced.
pub fn calculate(input: &QuoteInput, pricing: &PricingConfig) -> Result<QuoteResult, QuoteError> {
    if input.width <= Decimal::ZERO {
        return Err(QuoteError::NonPositiveWidth);
    }
    if input.height <= Decimal::ZERO {
        return Err(QuoteError::NonPositiveHeight);
    }
    if input.quantity == 0 {
        return Err(QuoteError::NonPositiveQuantity);
    }
    if input.product_cost < Decimal::ZERO {
        return Err(QuoteError::NegativeCost {
            field: "product cost",
        });
    }
    if input.press_cost < Decimal::ZERO {
        return Err(QuoteError::NegativeCost {
            field: "press cost",
        });
    }

    // Checked arithmetic throughout: unchecked Decimal ops panic on
    // overflow, and dimensions and costs arrive from user input
    let quantity = Decimal::from(input.quantity);
    let area = input
        .width
        .checked_mul(input.height)
        .ok_or(QuoteError::Overflow)?;
    let total_area = area.checked_mul(quantity).ok_or(QuoteError::Overflow)?;
    let imprint_cost = total_area
        .checked_mul(pricing.cost_per_square_inch)
        .ok_or(QuoteError::Overflow)?;
    let total_product_cost = input
        .product_cost
        .checked_mul(quantity)
        .ok_or(QuoteError::Overflow)?;
    let total_press_cost = input
        .press_cost
        .checked_mul(quantity)
        .ok_or(QuoteError::Overflow)?;
    let total_cost = imprint_cost
        .checked_add(total_product_cost)
        .and_then(|c| c.checked_add(total_press_cost))
        .ok_or(QuoteError::Overflow)?;
    let unit_cost = total_cost
        .checked_div(quantity)
        .ok_or(QuoteError::Overflow)?;
    let markup_factor = input
        .markup_percent
        .checked_div(Decimal::ONE_HUNDRED)
        .and_then(|m| Decimal::ONE.checked_add(m))
        .ok_or(QuoteError::Overflow)?;
    let retail_unit = unit_cost
        .checked_mul(markup_factor)
        .ok_or(QuoteError::Overflow)?;
    let retail_total = retail_unit
        .checked_mul(quantity)
        .ok_or(QuoteError::Overflow)?;
    let total_profit = retail_total
        .checked_sub(total_cost)
        .ok_or(QuoteError::Overflow)?;

    Ok(QuoteResult {
        area,
        total_area,
        imprint_cost,
        total_product_cost,
        total_press_cost,
        total_cost,
        unit_cost,
        retail_unit,
        retail_total,
        total_profit,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn sample_input() -> QuoteInput {
        QuoteInput {
            width: dec("10"),
            height: dec("8"),
            quantity: 50,
            product_cost: dec("2.86"),
            press_cost: dec("1.75"),
            markup_percent: dec("50"),
        }
    }

    #[test]
    fn test_worked_example() {
        let result = calculate(&sample_input(), &PricingConfig::default()).unwrap();
        let rounded = result.rounded();

        assert_eq!(rounded.area, dec("80.00"));
        assert_eq!(rounded.total_area, dec("4000.00"));
        assert_eq!(rounded.imprint_cost, dec("2000.00"));
        assert_eq!(rounded.total_product_cost, dec("143.00"));
        assert_eq!(rounded.total_press_cost, dec("87.50"));
        assert_eq!(rounded.total_cost, dec("2230.50"));
        assert_eq!(rounded.unit_cost, dec("44.61"));
        assert_eq!(rounded.retail_unit, dec("66.92"));
        assert_eq!(rounded.retail_total, dec("3345.75"));
        assert_eq!(rounded.total_profit, dec("1115.25"));
    }

    #[test]
    fn test_total_cost_identity() {
        let result = calculate(&sample_input(), &PricingConfig::default()).unwrap();

        assert_eq!(
            result.total_cost,
            result.imprint_cost + result.total_product_cost + result.total_press_cost
        );
        // unit_cost * quantity recovers total_cost within rounding tolerance
        let recovered = result.unit_cost * Decimal::from(50u32);
        assert!((recovered - result.total_cost).abs() < dec("0.01"));
    }

    #[test]
    fn test_zero_markup_means_zero_profit() {
        let input = QuoteInput {
            markup_percent: Decimal::ZERO,
            ..sample_input()
        };
        let result = calculate(&input, &PricingConfig::default()).unwrap();

        assert_eq!(result.retail_unit, result.unit_cost);
        assert_eq!(result.total_profit.round_dp(2), Decimal::ZERO.round_dp(2));
    }

    #[test]
    fn test_rejects_zero_width() {
        let input = QuoteInput {
            width: Decimal::ZERO,
            ..sample_input()
        };
        assert_eq!(
            calculate(&input, &PricingConfig::default()),
            Err(QuoteError::NonPositiveWidth)
        );
    }

    #[test]
    fn test_rejects_zero_height() {
        let input = QuoteInput {
            height: Decimal::ZERO,
            ..sample_input()
        };
        assert_eq!(
            calculate(&input, &PricingConfig::default()),
            Err(QuoteError::NonPositiveHeight)
        );
    }

    #[test]
    fn test_rejects_zero_quantity() {
        let input = QuoteInput {
            quantity: 0,
            ..sample_input()
        };
        assert_eq!(
            calculate(&input, &PricingConfig::default()),
            Err(QuoteError::NonPositiveQuantity)
        );
    }

    #[test]
    fn test_rejects_negative_width() {
        let input = QuoteInput {
            width: dec("-1"),
            ..sample_input()
        };
        assert!(calculate(&input, &PricingConfig::default()).is_err());
    }

    #[test]
    fn test_rejects_negative_costs() {
        let input = QuoteInput {
            product_cost: dec("-0.01"),
            ..sample_input()
        };
        assert_eq!(
            calculate(&input, &PricingConfig::default()),
            Err(QuoteError::NegativeCost {
                field: "product cost"
            })
        );

        let input = QuoteInput {
            press_cost: dec("-0.01"),
            ..sample_input()
        };
        assert!(calculate(&input, &PricingConfig::default()).is_err());
    }

    #[test]
    fn test_oversized_dimensions_return_error() {
        // 7e28 squared exceeds Decimal's range; must error, not panic
        let huge = dec("70000000000000000000000000000");
        let input = QuoteInput {
            width: huge,
            height: huge,
            ..sample_input()
        };
        assert_eq!(
            calculate(&input, &PricingConfig::default()),
            Err(QuoteError::Overflow)
        );
    }

    #[test]
    fn test_oversized_cost_returns_error() {
        let input = QuoteInput {
            product_cost: dec("79000000000000000000000000000"),
            ..sample_input()
        };
        assert_eq!(
            calculate(&input, &PricingConfig::default()),
            Err(QuoteError::Overflow)
        );
    }

    #[test]
    fn test_idempotent() {
        let input = sample_input();
        let a = calculate(&input, &PricingConfig::default()).unwrap();
        let b = calculate(&input, &PricingConfig::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_cost_per_square_inch_is_configurable() {
        let pricing = PricingConfig {
            cost_per_square_inch: dec("0.25"),
        };
        let result = calculate(&sample_input(), &pricing).unwrap();
        // 4000 sq in * 0.25
        assert_eq!(result.imprint_cost, dec("1000.00"));
    }

    #[test]
    fn test_negative_profit_when_markup_cannot_cover() {
        // markup floor is 0% in practice, but the engine keeps the sign honest
        let input = QuoteInput {
            markup_percent: dec("-10"),
            ..sample_input()
        };
        let result = calculate(&input, &PricingConfig::default()).unwrap();
        assert!(result.total_profit < Decimal::ZERO);
    }

    #[test]
    fn test_default_pricing_is_fifty_cents() {
        assert_eq!(
            PricingConfig::default().cost_per_square_inch,
            dec("0.50")
        );
    }
}
