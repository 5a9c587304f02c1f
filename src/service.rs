//! Product use cases, composed from the repository and the mapper.

use gotham_derive::StateData;
use log::debug;
use thiserror::Error;

use crate::db::StoreError;
use crate::mapper::{Mapper, ProductMapper};
use crate::model::ProductRepresentation;
use crate::repository::ProductRepository;

const PRODUCT_NOT_FOUND: &str = "Product not found";

/// Failures surfaced by `ProductService`.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No product exists with the requested id.
    #[error("{0}")]
    NotFound(String),

    /// The store failed underneath the operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// The not-found failure for a product id lookup.
    pub fn product_not_found() -> Self {
        ServiceError::NotFound(PRODUCT_NOT_FOUND.to_owned())
    }
}

/// Orchestrates repository calls and mapper conversions for the product endpoints.
///
/// The service is cloned into every request's `State`; clones share the repository's pool.
#[derive(Clone, StateData)]
pub struct ProductService {
    repository: ProductRepository,
    mapper: ProductMapper,
}

impl ProductService {
    /// Creates a service over the given collaborators.
    pub fn new(repository: ProductRepository, mapper: ProductMapper) -> Self {
        ProductService { repository, mapper }
    }

    /// Every stored product. An empty store yields an empty list.
    pub async fn get_all_products(&self) -> Result<Vec<ProductRepresentation>, ServiceError> {
        let products = self.repository.find_all().await?;
        Ok(self.mapper.to_representations(&products))
    }

    /// Stores a new product and returns what was stored.
    pub async fn create_product(
        &self,
        representation: ProductRepresentation,
    ) -> Result<ProductRepresentation, ServiceError> {
        let entity = self.mapper.entity(&representation);
        let saved = self.repository.save(entity).await?;
        debug!("created product {:?}", saved.id);
        Ok(self.mapper.representation(&saved))
    }

    /// The product with the given id, if any.
    pub async fn get_product_by_id(
        &self,
        id: i64,
    ) -> Result<Option<ProductRepresentation>, ServiceError> {
        let found = self.repository.find_by_id(id).await?;
        Ok(self.mapper.to_representation(found.as_ref()))
    }

    /// Every product named exactly `name`.
    pub async fn get_products_by_name(
        &self,
        name: &str,
    ) -> Result<Vec<ProductRepresentation>, ServiceError> {
        let products = self.repository.find_by_name(name).await?;
        Ok(self.mapper.to_representations(&products))
    }

    /// Overwrites the name, price and date of an existing product, keeping its id.
    pub async fn update_product(
        &self,
        id: i64,
        details: ProductRepresentation,
    ) -> Result<ProductRepresentation, ServiceError> {
        let mut product = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(ServiceError::product_not_found)?;

        product.name = details.name;
        product.price = details.price;
        product.date = details.date;

        let updated = self.repository.save(product).await?;
        debug!("updated product {}", id);
        Ok(self.mapper.representation(&updated))
    }

    /// Removes an existing product.
    pub async fn delete_product(&self, id: i64) -> Result<(), ServiceError> {
        let product = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(ServiceError::product_not_found)?;

        self.repository.delete(&product).await?;
        debug!("deleted product {}", id);
        Ok(())
    }
}
