//! # Product Commands

use serde::Serialize;

use cashier_core::Product;

use crate::error::ApiError;
use crate::state::CashierState;

/// Product DTO for callers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: u64,
    pub name: String,
    pub price: u64,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        ProductDto {
            id: p.id,
            name: p.name,
            price: p.price,
        }
    }
}

/// Returned by `create_product`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedProductDto {
    pub product_id: u64,
}

pub fn create_product(
    state: &CashierState,
    name: &str,
    price: u64,
) -> Result<CreatedProductDto, ApiError> {
    let product_id = state.cashier.create_product(name, price)?;
    Ok(CreatedProductDto { product_id })
}

pub fn get_product(state: &CashierState, product_id: u64) -> Result<ProductDto, ApiError> {
    Ok(state.cashier.product(product_id)?.into())
}
