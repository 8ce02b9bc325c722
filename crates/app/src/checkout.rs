//! Purchase settlement: checked items, the bag dialog, and its effects.
//!
//! A confirmed [`Settlement`] is applied in a fixed order:
//!
//! 1. savings totals become `previous + delta`
//! 2. every settled product line is removed from the cart
//! 3. the checked set is cleared
//!
//! Persistence of steps 1 and 2 happens in the background; failures are
//! logged by the writers and never undo the in-memory effects.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use handlekurv_core::settlement::parse_bag_count;
use handlekurv_core::{
    CheckedItems, FlowState, ProductId, PurchaseFlow, SavingsDelta, SavingsTotals, Settlement,
    SettlementError,
};
use tracing::{debug, info, instrument};

use crate::cart_store::CartStore;
use crate::error::add_breadcrumb;
use crate::savings_store::SavingsStore;
use crate::storage::{KeyValueStore, PersistHandle};

/// Outcome of a confirmed purchase.
#[derive(Debug)]
pub struct Receipt {
    /// Products removed from the cart, in the order they were checked.
    pub settled: Vec<ProductId>,
    /// Savings earned by this purchase.
    pub delta: SavingsDelta,
    /// Totals after applying `delta`.
    pub totals: SavingsTotals,
    pub settled_at: DateTime<Utc>,
    /// Background writes for the cart and savings.
    pub persisted: PersistHandle,
}

#[derive(Debug, Default)]
struct CheckoutState {
    checked: CheckedItems,
    flow: PurchaseFlow,
}

/// Drives the purchase confirmation against the cart and savings stores.
#[derive(Debug)]
pub struct CheckoutService<S> {
    cart: Arc<CartStore<S>>,
    savings: Arc<SavingsStore<S>>,
    state: Mutex<CheckoutState>,
}

impl<S: KeyValueStore> CheckoutService<S> {
    #[must_use]
    pub fn new(cart: Arc<CartStore<S>>, savings: Arc<SavingsStore<S>>) -> Self {
        Self {
            cart,
            savings,
            state: Mutex::new(CheckoutState::default()),
        }
    }

    // =========================================================================
    // Checked Items
    // =========================================================================

    /// Flip the checked state of `product_id`. Returns whether it is now checked.
    pub fn toggle(&self, product_id: ProductId) -> bool {
        self.lock().checked.toggle(product_id)
    }

    /// Mark `product_id` as checked.
    pub fn check(&self, product_id: ProductId) {
        self.lock().checked.check(product_id);
    }

    #[must_use]
    pub fn is_checked(&self, product_id: ProductId) -> bool {
        self.lock().checked.is_checked(product_id)
    }

    /// Copy of the checked set.
    #[must_use]
    pub fn checked(&self) -> CheckedItems {
        self.lock().checked.clone()
    }

    /// Uncheck everything.
    pub fn clear_checked(&self) {
        self.lock().checked.clear();
    }

    // =========================================================================
    // Purchase Flow
    // =========================================================================

    /// Where the confirmation dialog is.
    #[must_use]
    pub fn flow_state(&self) -> FlowState {
        self.lock().flow.state()
    }

    /// Open the confirmation for the checked items still in the cart.
    ///
    /// # Errors
    ///
    /// Returns [`SettlementError::NothingChecked`] when no checked product
    /// is in the cart; nothing changes in that case.
    pub fn begin(&self) -> Result<(), SettlementError> {
        let cart = self.cart.snapshot();
        let mut state = self.lock();
        let CheckoutState { checked, flow } = &mut *state;
        flow.begin(checked, &cart)?;
        debug!(items = flow.pending().len(), "Purchase confirmation started");
        Ok(())
    }

    /// The shopper brought bags; the next step asks how many.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the bag choice is pending.
    pub fn remembered_bag(&self) -> Result<(), SettlementError> {
        self.lock().flow.remembered_bag()
    }

    /// Confirm without bags.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` when no confirmation is in progress.
    pub fn confirm_without_bag(&self) -> Result<Receipt, SettlementError> {
        let settlement = self.lock().flow.confirm_without_bag()?;
        let receipt = self.settle(settlement);
        self.clear_checked();
        Ok(receipt)
    }

    /// Confirm with the bag count typed by the shopper.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBagCount` for non-numeric input (the dialog stays
    /// open), or `InvalidTransition` unless the bag count is pending.
    pub fn confirm_bags(&self, bag_count: &str) -> Result<Receipt, SettlementError> {
        let bag_count = parse_bag_count(bag_count)?;
        let settlement = self.lock().flow.confirm_bags(bag_count)?;
        let receipt = self.settle(settlement);
        self.clear_checked();
        Ok(receipt)
    }

    /// Close the dialog without effects.
    pub fn cancel(&self) {
        self.lock().flow.cancel();
        debug!("Purchase confirmation cancelled");
    }

    /// Run the whole dialog in one step for `product_ids`, confirming with
    /// `bags` reusable bags (`None` means no bag was brought).
    ///
    /// Uses its own checked set and dialog, so the shared ones are left
    /// alone apart from unchecking the settled products.
    ///
    /// # Errors
    ///
    /// Returns [`SettlementError::NothingChecked`] when none of the products
    /// are in the cart. Nothing changes in that case.
    pub fn purchase(
        &self,
        product_ids: &[ProductId],
        bags: Option<u32>,
    ) -> Result<Receipt, SettlementError> {
        let mut checked = CheckedItems::new();
        for id in product_ids {
            checked.check(*id);
        }

        let mut flow = PurchaseFlow::new();
        flow.begin(&checked, &self.cart.snapshot())?;
        let settlement = match bags {
            Some(count) => {
                flow.remembered_bag()?;
                flow.confirm_bags(count)?
            }
            None => flow.confirm_without_bag()?,
        };

        let receipt = self.settle(settlement);
        let mut state = self.lock();
        for id in &receipt.settled {
            state.checked.uncheck(*id);
        }
        drop(state);
        Ok(receipt)
    }

    #[instrument(skip(self, settlement), fields(items = settlement.product_ids.len(), bags = settlement.bag_count))]
    fn settle(&self, settlement: Settlement) -> Receipt {
        let delta = settlement.delta();
        let totals = self.savings.totals().accumulate(&delta);

        let savings_write = self
            .savings
            .update_savings(totals.money_saved, totals.co2_saved);
        let cart_writes: PersistHandle = settlement
            .product_ids
            .iter()
            .map(|id| self.cart.remove_all_from_cart(*id))
            .collect();

        info!(
            money = %delta.total_money(),
            co2 = %delta.co2,
            total_money = %totals.money_saved,
            total_co2 = %totals.co2_saved,
            "Purchase settled"
        );
        let items = settlement.product_ids.len().to_string();
        let bags = settlement.bag_count.to_string();
        add_breadcrumb(
            "checkout",
            "Settled purchase",
            Some(&[("items", items.as_str()), ("bags", bags.as_str())]),
        );

        Receipt {
            settled: settlement.product_ids,
            delta,
            totals,
            settled_at: Utc::now(),
            persisted: savings_write.merge(cart_writes),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CheckoutState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
