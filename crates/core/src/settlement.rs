//! Purchase confirmation: checked items and the bag-choice state machine.
//!
//! ```text
//! Idle ──begin──▶ AwaitingBagChoice ──remembered_bag──▶ AwaitingBagCount
//!                        │                                   │
//!                 confirm_without_bag                   confirm_bags
//!                        ▼                                   ▼
//!                   Settlement ◀─────────────────────────────┘   (flow back to Idle)
//! ```
//!
//! `cancel` returns to `Idle` from any state without producing a settlement.

use core::fmt;

use crate::cart::Cart;
use crate::savings::SavingsDelta;
use crate::types::ProductId;

/// Errors raised by the purchase flow.
///
/// These are validation outcomes meant for the user, not faults.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SettlementError {
    /// No checked product is in the cart.
    #[error("no products checked: check at least one product before purchasing")]
    NothingChecked,
    /// Bag count input is not a whole number.
    #[error("bag count must be a whole number, got '{0}'")]
    InvalidBagCount(String),
    /// The requested step is not valid from the current state.
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: FlowState,
    },
}

/// Parse the bag-count text field. Blank input means zero bags.
///
/// # Errors
///
/// Returns [`SettlementError::InvalidBagCount`] for anything but a
/// non-negative whole number.
pub fn parse_bag_count(input: &str) -> Result<u32, SettlementError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| SettlementError::InvalidBagCount(trimmed.to_owned()))
}

// =============================================================================
// Checked Items
// =============================================================================

/// Products the shopper has ticked off on the shopping list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckedItems {
    ids: Vec<ProductId>,
}

impl CheckedItems {
    /// Create an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// Flip the checked state of `product_id`. Returns whether it is now checked.
    pub fn toggle(&mut self, product_id: ProductId) -> bool {
        if let Some(index) = self.ids.iter().position(|id| *id == product_id) {
            self.ids.remove(index);
            false
        } else {
            self.ids.push(product_id);
            true
        }
    }

    /// Mark `product_id` as checked.
    pub fn check(&mut self, product_id: ProductId) {
        if !self.is_checked(product_id) {
            self.ids.push(product_id);
        }
    }

    /// Unmark `product_id`. Returns whether it was checked.
    pub fn uncheck(&mut self, product_id: ProductId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| *id != product_id);
        self.ids.len() != before
    }

    #[must_use]
    pub fn is_checked(&self, product_id: ProductId) -> bool {
        self.ids.contains(&product_id)
    }

    /// Checked IDs in the order they were checked.
    #[must_use]
    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop checked IDs that are no longer in `cart`.
    pub fn retain_in(&mut self, cart: &Cart) {
        self.ids.retain(|id| cart.contains(*id));
    }
}

impl FromIterator<ProductId> for CheckedItems {
    fn from_iter<I: IntoIterator<Item = ProductId>>(iter: I) -> Self {
        let mut checked = Self::new();
        for id in iter {
            checked.check(id);
        }
        checked
    }
}

// =============================================================================
// Purchase Flow
// =============================================================================

/// Where the purchase confirmation dialog currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlowState {
    #[default]
    Idle,
    /// Asking "did you bring a bag?".
    AwaitingBagChoice,
    /// Asking "how many bags?".
    AwaitingBagCount,
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::AwaitingBagChoice => "awaiting bag choice",
            Self::AwaitingBagCount => "awaiting bag count",
        })
    }
}

/// A confirmed purchase, ready to be applied to the cart and savings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    /// Settled products, in the order they were checked.
    pub product_ids: Vec<ProductId>,
    pub remembered_bag: bool,
    pub bag_count: u32,
}

impl Settlement {
    /// Savings earned by this settlement.
    #[must_use]
    pub fn delta(&self) -> SavingsDelta {
        let item_count = u32::try_from(self.product_ids.len()).unwrap_or(u32::MAX);
        SavingsDelta::compute(item_count, self.remembered_bag, self.bag_count)
    }
}

/// The purchase confirmation state machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurchaseFlow {
    state: FlowState,
    pending: Vec<ProductId>,
}

impl PurchaseFlow {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: FlowState::Idle,
            pending: Vec::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> FlowState {
        self.state
    }

    /// Products captured when the flow began.
    #[must_use]
    pub fn pending(&self) -> &[ProductId] {
        &self.pending
    }

    /// Start confirming a purchase of the checked items still in `cart`.
    ///
    /// # Errors
    ///
    /// Returns [`SettlementError::NothingChecked`] when no checked item is in
    /// the cart (the flow stays idle), or `InvalidTransition` if a
    /// confirmation is already in progress.
    pub fn begin(&mut self, checked: &CheckedItems, cart: &Cart) -> Result<(), SettlementError> {
        self.expect(FlowState::Idle, "begin a purchase")?;

        let pending: Vec<ProductId> = checked
            .ids()
            .iter()
            .copied()
            .filter(|id| cart.contains(*id))
            .collect();
        if pending.is_empty() {
            return Err(SettlementError::NothingChecked);
        }

        self.pending = pending;
        self.state = FlowState::AwaitingBagChoice;
        Ok(())
    }

    /// The shopper brought reusable bags; ask how many.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless awaiting the bag choice.
    pub fn remembered_bag(&mut self) -> Result<(), SettlementError> {
        self.expect(FlowState::AwaitingBagChoice, "choose a bag")?;
        self.state = FlowState::AwaitingBagCount;
        Ok(())
    }

    /// Confirm without bags.
    ///
    /// Allowed while choosing, and while entering a count (the shopper
    /// changed their answer to "no").
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` when idle.
    pub fn confirm_without_bag(&mut self) -> Result<Settlement, SettlementError> {
        if self.state == FlowState::Idle {
            return Err(SettlementError::InvalidTransition {
                action: "confirm",
                state: self.state,
            });
        }
        Ok(self.finish(false, 0))
    }

    /// Confirm with `bag_count` reusable bags.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless awaiting the bag count.
    pub fn confirm_bags(&mut self, bag_count: u32) -> Result<Settlement, SettlementError> {
        self.expect(FlowState::AwaitingBagCount, "confirm bags")?;
        Ok(self.finish(true, bag_count))
    }

    /// Abandon the confirmation. No effects.
    pub fn cancel(&mut self) {
        self.state = FlowState::Idle;
        self.pending.clear();
    }

    fn finish(&mut self, remembered_bag: bool, bag_count: u32) -> Settlement {
        self.state = FlowState::Idle;
        Settlement {
            product_ids: core::mem::take(&mut self.pending),
            remembered_bag,
            bag_count,
        }
    }

    fn expect(&self, state: FlowState, action: &'static str) -> Result<(), SettlementError> {
        if self.state == state {
            Ok(())
        } else {
            Err(SettlementError::InvalidTransition {
                action,
                state: self.state,
            })
        }
    }
}
