//! A CRUD REST service for products, built on Gotham and Diesel.
//!
//! Requests flow from the `router` through the `handlers` into `ProductService`, which converts
//! between `ProductRepresentation` and the stored `Product` with `ProductMapper` and persists
//! through `ProductRepository`.
#![warn(missing_docs, deprecated)]

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod mapper;
pub mod model;
pub mod repository;
pub mod router;
#[allow(missing_docs)]
pub mod schema;
pub mod service;

pub use config::Settings;
pub use db::Repo;
pub use mapper::{Mapper, ProductMapper};
pub use model::{Product, ProductRepresentation};
pub use repository::ProductRepository;
pub use router::router;
pub use service::{ProductService, ServiceError};
