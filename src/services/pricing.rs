use rust_decimal::{Decimal, RoundingStrategy};

/// Total units in one order that unlock the bulk discount.
pub const BULK_QUANTITY_THRESHOLD: i32 = 5;
/// Every Nth completed order earns the loyalty discount.
pub const LOYALTY_ORDER_INTERVAL: u64 = 11;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedOrder {
    pub subtotal: Decimal,
    pub total: Decimal,
    pub discount_amount: Decimal,
    pub applied_discounts: Vec<&'static str>,
}

impl PricedOrder {
    pub fn discount_tags(&self) -> String {
        self.applied_discounts.join(",")
    }
}

pub fn line_total(unit_price: Decimal, quantity: i32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Prices an order from its (unit price, quantity) lines and the member's
/// completed-order count. Discounts compound sequentially: bulk first, then
/// loyalty on the post-bulk running total.
pub fn price_order(lines: &[(Decimal, i32)], completed_orders: u64) -> PricedOrder {
    let subtotal: Decimal = lines
        .iter()
        .map(|(price, qty)| line_total(*price, *qty))
        .sum();
    let total_quantity: i32 = lines.iter().map(|(_, qty)| *qty).sum();

    let mut total = subtotal;
    let mut discount_amount = Decimal::ZERO;
    let mut applied_discounts = Vec::new();

    if total_quantity >= BULK_QUANTITY_THRESHOLD {
        let bulk = round_money(total * Decimal::new(5, 2)); // 5%
        total -= bulk;
        discount_amount += bulk;
        applied_discounts.push("bulk");
    }

    if (completed_orders + 1) % LOYALTY_ORDER_INTERVAL == 0 {
        let loyalty = round_money(total * Decimal::new(10, 2)); // 10%
        total -= loyalty;
        discount_amount += loyalty;
        applied_discounts.push("loyalty");
    }

    PricedOrder {
        subtotal,
        total,
        discount_amount,
        applied_discounts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    #[test]
    fn test_no_discount_below_thresholds() {
        // 3 units, first order
        let priced = price_order(&[(money(1000), 2), (money(500), 1)], 0);
        assert_eq!(priced.subtotal, money(2500));
        assert_eq!(priced.total, money(2500));
        assert_eq!(priced.discount_amount, Decimal::ZERO);
        assert!(priced.applied_discounts.is_empty());
    }

    #[test]
    fn test_bulk_discount_at_five_units() {
        // cart = [10.00 x 3, 5.00 x 2] -> subtotal 40.00, qty 5 -> bulk 2.00
        let priced = price_order(&[(money(1000), 3), (money(500), 2)], 0);
        assert_eq!(priced.subtotal, money(4000));
        assert_eq!(priced.discount_amount, money(200));
        assert_eq!(priced.total, money(3800));
        assert_eq!(priced.discount_tags(), "bulk");
    }

    #[test]
    fn test_loyalty_discount_on_eleventh_order() {
        // 10 completed orders -> this is the 11th; 2 units so no bulk
        let priced = price_order(&[(money(2000), 2)], 10);
        assert_eq!(priced.subtotal, money(4000));
        assert_eq!(priced.discount_amount, money(400));
        assert_eq!(priced.total, money(3600));
        assert_eq!(priced.discount_tags(), "loyalty");
    }

    #[test]
    fn test_loyalty_compounds_on_post_bulk_total() {
        // 40.00 -> bulk 2.00 -> 38.00 -> loyalty 3.80 -> 34.20
        let priced = price_order(&[(money(1000), 3), (money(500), 2)], 21);
        assert_eq!(priced.discount_amount, money(580));
        assert_eq!(priced.total, money(3420));
        assert_eq!(priced.discount_tags(), "bulk,loyalty");
    }

    #[test]
    fn test_loyalty_skipped_off_interval() {
        for completed in [0u64, 1, 9, 11, 12] {
            let priced = price_order(&[(money(1000), 1)], completed);
            assert!(!priced.applied_discounts.contains(&"loyalty"));
        }
        // 21 completed -> 22nd order
        let priced = price_order(&[(money(1000), 1)], 21);
        assert_eq!(priced.discount_tags(), "loyalty");
    }

    #[test]
    fn test_total_is_subtotal_minus_discounts() {
        let priced = price_order(&[(money(1999), 4), (money(350), 3)], 10);
        assert_eq!(
            priced.total,
            priced.subtotal - priced.discount_amount
        );
    }

    #[test]
    fn test_discount_rounding_to_cents() {
        // subtotal 33.33 with qty 5 -> 5% = 1.6665 -> rounds to 1.67
        let priced = price_order(&[(money(3333), 1), (Decimal::ZERO, 4)], 0);
        assert_eq!(priced.discount_amount, money(167));
        assert_eq!(priced.total, money(3166));
    }
}
