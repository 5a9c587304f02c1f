//! Holds the stored `Product` row, the `NewProduct` used to insert one, and the
//! `ProductRepresentation` exchanged over HTTP.

use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::product;

/// Represents a product in the DB.
///
/// `id` is `None` until the product has been saved; the store assigns it on insert and it never
/// changes afterwards.
#[derive(Queryable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = product)]
pub struct Product {
    /// Primary key, assigned by the store.
    pub id: Option<i64>,
    /// Display name. Several products may share one.
    pub name: String,
    /// Unit price.
    pub price: f64,
    /// Calendar date attached to the product.
    pub date: NaiveDate,
}

impl Product {
    /// Creates an unsaved product.
    pub fn new<N: Into<String>>(name: N, price: f64, date: NaiveDate) -> Self {
        Product {
            id: None,
            name: name.into(),
            price,
            date,
        }
    }

    /// Whether the product has been written to the store.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Represents a new product to insert in the DB.
#[derive(Insertable, Debug)]
#[diesel(table_name = product)]
pub(crate) struct NewProduct<'a> {
    pub name: &'a str,
    pub price: f64,
    pub date: NaiveDate,
}

impl<'a> From<&'a Product> for NewProduct<'a> {
    fn from(p: &'a Product) -> Self {
        NewProduct {
            name: &p.name,
            price: p.price,
            date: p.date,
        }
    }
}

/// The wire representation of a product: everything but its identity.
///
/// Serialized as `{"name": "...", "price": 10.0, "date": "2024-09-01"}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProductRepresentation {
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: f64,
    /// Calendar date, `YYYY-MM-DD` on the wire.
    pub date: NaiveDate,
}

impl ProductRepresentation {
    /// Creates a representation from its field values.
    pub fn new<N: Into<String>>(name: N, price: f64, date: NaiveDate) -> Self {
        ProductRepresentation {
            name: name.into(),
            price,
            date,
        }
    }
}
