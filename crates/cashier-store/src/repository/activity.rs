//! # Activity Repository
//!
//! Holds both promotion kinds. Token and product activities are numbered
//! independently, so the first activity of each kind gets ID 1.
//!
//! `BTreeMap` keeps listings in ID order without a sort step.

use std::collections::BTreeMap;
use std::sync::RwLock;

use tracing::debug;

use cashier_core::{
    ActivityId, ActivityRepository, NewProductPurchaseActivity, NewTokenPurchaseActivity,
    ProductPurchaseActivity, StoreError, StoreResult, TokenPurchaseActivity,
};

use super::IdSequence;

/// In-memory storage for token and product purchase activities.
#[derive(Debug, Default)]
pub struct InMemoryActivityRepository {
    token_ids: IdSequence,
    product_ids: IdSequence,
    token_activities: RwLock<BTreeMap<ActivityId, TokenPurchaseActivity>>,
    product_activities: RwLock<BTreeMap<ActivityId, ProductPurchaseActivity>>,
}

impl InMemoryActivityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ActivityRepository for InMemoryActivityRepository {
    fn create_token_activity(
        &self,
        activity: NewTokenPurchaseActivity,
    ) -> StoreResult<ActivityId> {
        let id = self.token_ids.next();
        let activity = TokenPurchaseActivity {
            id,
            tier: activity.tier,
            discount: activity.discount,
            period: activity.period,
        };

        self.token_activities
            .write()
            .map_err(|_| StoreError::Poisoned("token activities"))?
            .insert(id, activity);

        debug!(activity_id = %id, "Token activity stored");
        Ok(id)
    }

    fn create_product_activity(
        &self,
        activity: NewProductPurchaseActivity,
    ) -> StoreResult<ActivityId> {
        let id = self.product_ids.next();
        let activity = ProductPurchaseActivity {
            id,
            discount: activity.discount,
            period: activity.period,
        };

        self.product_activities
            .write()
            .map_err(|_| StoreError::Poisoned("product activities"))?
            .insert(id, activity);

        debug!(activity_id = %id, "Product activity stored");
        Ok(id)
    }

    fn get_token_activity(&self, id: ActivityId) -> StoreResult<Option<TokenPurchaseActivity>> {
        let activities = self
            .token_activities
            .read()
            .map_err(|_| StoreError::Poisoned("token activities"))?;
        Ok(activities.get(&id).cloned())
    }

    fn get_product_activity(
        &self,
        id: ActivityId,
    ) -> StoreResult<Option<ProductPurchaseActivity>> {
        let activities = self
            .product_activities
            .read()
            .map_err(|_| StoreError::Poisoned("product activities"))?;
        Ok(activities.get(&id).cloned())
    }

    fn list_token_activities(&self) -> StoreResult<Vec<TokenPurchaseActivity>> {
        let activities = self
            .token_activities
            .read()
            .map_err(|_| StoreError::Poisoned("token activities"))?;
        Ok(activities.values().cloned().collect())
    }

    fn list_product_activities(&self) -> StoreResult<Vec<ProductPurchaseActivity>> {
        let activities = self
            .product_activities
            .read()
            .map_err(|_| StoreError::Poisoned("product activities"))?;
        Ok(activities.values().cloned().collect())
    }
}
