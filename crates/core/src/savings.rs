//! Savings totals and the per-settlement savings delta.
//!
//! Every confirmed purchase earns a flat incentive per item, plus a bonus
//! per reusable bag the shopper reports bringing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Co2Kg, Kroner};

/// Money credited per settled item, regardless of its price.
pub const SAVINGS_PER_ITEM: Kroner = Kroner::new(Decimal::from_parts(5, 0, 0, false, 0));

/// Money credited per reusable bag.
pub const BONUS_MONEY_PER_BAG: Kroner = Kroner::new(Decimal::from_parts(6, 0, 0, false, 0));

/// CO2 credited per reusable bag (1.58 kg).
pub const BONUS_CO2_PER_BAG: Co2Kg = Co2Kg::new(Decimal::from_parts(158, 0, 0, false, 2));

/// Running savings totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsTotals {
    pub money_saved: Kroner,
    pub co2_saved: Co2Kg,
}

impl SavingsTotals {
    /// Totals after applying `delta`.
    #[must_use]
    pub fn accumulate(self, delta: &SavingsDelta) -> Self {
        Self {
            money_saved: self.money_saved + delta.total_money(),
            co2_saved: self.co2_saved + delta.co2,
        }
    }
}

/// Savings earned by one settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavingsDelta {
    /// Flat per-item credit.
    pub base_money: Kroner,
    /// Reusable-bag credit.
    pub bonus_money: Kroner,
    pub co2: Co2Kg,
}

impl SavingsDelta {
    /// Compute the delta for `item_count` settled items.
    ///
    /// Bag credits only apply when the shopper remembered a bag.
    #[must_use]
    pub fn compute(item_count: u32, remembered_bag: bool, bag_count: u32) -> Self {
        let bags = if remembered_bag { bag_count } else { 0 };
        Self {
            base_money: SAVINGS_PER_ITEM * item_count,
            bonus_money: BONUS_MONEY_PER_BAG * bags,
            co2: BONUS_CO2_PER_BAG * bags,
        }
    }

    /// Base plus bonus money.
    #[must_use]
    pub fn total_money(&self) -> Kroner {
        self.base_money + self.bonus_money
    }
}
