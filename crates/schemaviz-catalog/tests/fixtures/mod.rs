//! Test fixtures for catalog integration tests
//!
//! Small schemas shaped like the ones the inference has to cope with in
//! practice: plural table names, dangling `_id` columns and self references.

use schemaviz_catalog::{MockAdapter, MockAdapterBuilder};
use schemaviz_core::{Column, KeyRole};

/// Storefront schema
///
/// - `orders.customer_id` -> `customers` (plural match)
/// - `order_items.order_id` -> `orders`
/// - `order_items.product_id` -> `products`
/// - `products.category_id` -> `categories` (`y` -> `ies`)
/// - `orders.coupon_id` has no table
pub fn shop_adapter() -> MockAdapter {
    MockAdapterBuilder::new()
        .with_table("customers", customers_columns())
        .with_table("orders", orders_columns())
        .with_table("order_items", order_items_columns())
        .with_table("products", products_columns())
        .with_table("categories", categories_columns())
        .build()
}

pub fn customers_columns() -> Vec<Column> {
    vec![
        Column::primary("id", "int"),
        Column::new("email", "varchar(255)").with_key(KeyRole::Unique),
        Column::new("name", "varchar(100)"),
    ]
}

pub fn orders_columns() -> Vec<Column> {
    vec![
        Column::primary("id", "int"),
        Column::new("customer_id", "int").with_key(KeyRole::Multiple),
        Column::new("coupon_id", "int"),
        Column::new("total", "decimal(10,2)"),
    ]
}

pub fn order_items_columns() -> Vec<Column> {
    vec![
        Column::primary("id", "bigint"),
        Column::new("order_id", "int").with_key(KeyRole::Multiple),
        Column::new("product_id", "int").with_key(KeyRole::Multiple),
        Column::new("quantity", "int"),
    ]
}

pub fn products_columns() -> Vec<Column> {
    vec![
        Column::primary("id", "int"),
        Column::new("category_id", "int"),
        Column::new("sku", "char(12)"),
    ]
}

pub fn categories_columns() -> Vec<Column> {
    vec![Column::primary("id", "int"), Column::new("label", "varchar(64)")]
}

/// Single table whose `employee_id` column points back at itself
pub fn self_reference_adapter() -> MockAdapter {
    MockAdapterBuilder::new()
        .with_table(
            "employee",
            vec![
                Column::primary("id", "int"),
                Column::new("employee_id", "int"),
                Column::new("name", "varchar(80)"),
            ],
        )
        .build()
}
