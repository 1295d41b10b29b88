//! # Product Repository
//!
//! In-memory product catalog. Products are immutable once stored.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use cashier_core::{NewProduct, Product, ProductId, ProductRepository, StoreError, StoreResult};

use super::IdSequence;

/// In-memory product storage.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    ids: IdSequence,
    products: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProductRepository for InMemoryProductRepository {
    fn create(&self, product: NewProduct) -> StoreResult<ProductId> {
        let id = self.ids.next();
        let product = Product {
            id,
            name: product.name,
            price: product.price,
        };

        self.products
            .write()
            .map_err(|_| StoreError::Poisoned("products"))?
            .insert(id, product);

        debug!(product_id = %id, "Product stored");
        Ok(id)
    }

    fn get(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let products = self
            .products
            .read()
            .map_err(|_| StoreError::Poisoned("products"))?;
        Ok(products.get(&id).cloned())
    }
}
