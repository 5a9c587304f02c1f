//! Persistence of `Product` rows in the `product` table.

use diesel::prelude::*;
use log::debug;

use crate::db::{Repo, StoreError};
use crate::model::{NewProduct, Product};
use crate::schema::product;

/// Create, read, update and delete access to stored products.
#[derive(Clone)]
pub struct ProductRepository {
    repo: Repo,
}

impl ProductRepository {
    /// Creates a repository running its queries through `repo`.
    pub fn new(repo: Repo) -> Self {
        ProductRepository { repo }
    }

    /// Loads every product in natural storage order.
    pub async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        self.repo
            .run(|conn| {
                product::table
                    .select(Product::as_select())
                    .load(conn)
            })
            .await
    }

    /// Loads the product with the given id, if there is one.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Product>, StoreError> {
        self.repo
            .run(move |conn| {
                product::table
                    .filter(product::id.eq(id))
                    .select(Product::as_select())
                    .first(conn)
                    .optional()
            })
            .await
    }

    /// Loads every product whose name matches `name` exactly.
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Product>, StoreError> {
        let name = name.to_owned();
        self.repo
            .run(move |conn| {
                product::table
                    .filter(product::name.eq(name))
                    .select(Product::as_select())
                    .load(conn)
            })
            .await
    }

    /// Inserts an unsaved product, or overwrites the row of a saved one, and returns the stored
    /// state.
    pub async fn save(&self, entity: Product) -> Result<Product, StoreError> {
        self.repo
            .run(move |conn| match entity.id {
                None => diesel::insert_into(product::table)
                    .values(NewProduct::from(&entity))
                    .returning(Product::as_returning())
                    .get_result(conn),
                Some(id) => diesel::update(product::table.filter(product::id.eq(id)))
                    .set((
                        product::name.eq(entity.name.as_str()),
                        product::price.eq(entity.price),
                        product::date.eq(entity.date),
                    ))
                    .returning(Product::as_returning())
                    .get_result(conn),
            })
            .await
    }

    /// Removes the row backing `entity`. Deleting a row that is already gone, or an entity that
    /// was never saved, does nothing.
    pub async fn delete(&self, entity: &Product) -> Result<(), StoreError> {
        let id = match entity.id {
            Some(id) => id,
            None => {
                debug!("delete called with an unsaved product, nothing to remove");
                return Ok(());
            }
        };

        let removed = self
            .repo
            .run(move |conn| diesel::delete(product::table.filter(product::id.eq(id))).execute(conn))
            .await?;
        if removed == 0 {
            debug!("product {} was already absent", id);
        }
        Ok(())
    }

    /// Number of stored products.
    pub async fn count(&self) -> Result<i64, StoreError> {
        self.repo
            .run(|conn| product::table.count().get_result(conn))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()
    }

    fn repository() -> ProductRepository {
        ProductRepository::new(Repo::in_memory().unwrap())
    }

    #[tokio::test]
    async fn save_assigns_id_to_new_product() {
        let repository = repository();
        let saved = repository
            .save(Product::new("Product 1", 10.0, date()))
            .await
            .unwrap();

        assert!(saved.is_persisted());
        assert_eq!(saved.name, "Product 1");
        assert_eq!(saved.price, 10.0);
        assert_eq!(saved.date, date());
        assert_eq!(repository.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn find_all_on_empty_store() {
        assert!(repository().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_all_returns_every_row() {
        let repository = repository();
        repository.save(Product::new("a", 1.0, date())).await.unwrap();
        repository.save(Product::new("b", 2.0, date())).await.unwrap();

        let all = repository.find_all().await.unwrap();
        let mut names: Vec<String> = all.into_iter().map(|p| p.name).collect();
        names.sort();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn find_by_id_hits_and_misses() {
        let repository = repository();
        let saved = repository
            .save(Product::new("Product 1", 10.0, date()))
            .await
            .unwrap();

        let found = repository.find_by_id(saved.id.unwrap()).await.unwrap();
        assert_eq!(found, Some(saved));
        assert_eq!(repository.find_by_id(-1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn ids_wider_than_32_bits_are_stored_and_found() {
        let repository = repository();
        let wide: i64 = 1 << 32;
        repository
            .repo
            .run(move |conn| {
                diesel::insert_into(product::table)
                    .values((
                        product::id.eq(wide),
                        product::name.eq("Product 1"),
                        product::price.eq(10.0),
                        product::date.eq(date()),
                    ))
                    .execute(conn)
            })
            .await
            .unwrap();

        let found = repository.find_by_id(wide).await.unwrap().unwrap();
        assert_eq!(found.id, Some(wide));
        assert_eq!(found.name, "Product 1");

        let next = repository
            .save(Product::new("Product 2", 15.0, date()))
            .await
            .unwrap();
        assert_eq!(next.id, Some(wide + 1));
    }

    #[tokio::test]
    async fn find_by_name_is_exact() {
        let repository = repository();
        repository.save(Product::new("Widget", 1.0, date())).await.unwrap();
        repository.save(Product::new("Widget", 2.0, date())).await.unwrap();
        repository.save(Product::new("Widget XL", 3.0, date())).await.unwrap();

        assert_eq!(repository.find_by_name("Widget").await.unwrap().len(), 2);
        assert!(repository.find_by_name("widget").await.unwrap().is_empty());
        assert!(repository.find_by_name("Gadget").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_with_id_updates_in_place() {
        let repository = repository();
        let mut saved = repository
            .save(Product::new("Product", 20.0, date()))
            .await
            .unwrap();
        let id = saved.id;

        saved.name = "Updated Product".to_owned();
        saved.price = 30.0;
        let updated = repository.save(saved).await.unwrap();

        assert_eq!(updated.id, id);
        assert_eq!(updated.name, "Updated Product");
        assert_eq!(updated.price, 30.0);
        assert_eq!(repository.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let repository = repository();
        let saved = repository
            .save(Product::new("Product 1", 10.0, date()))
            .await
            .unwrap();

        repository.delete(&saved).await.unwrap();
        assert_eq!(repository.find_by_id(saved.id.unwrap()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_of_missing_row_is_a_no_op() {
        let repository = repository();
        let saved = repository
            .save(Product::new("Product 1", 10.0, date()))
            .await
            .unwrap();

        repository.delete(&saved).await.unwrap();
        repository.delete(&saved).await.unwrap();
        repository
            .delete(&Product::new("never saved", 1.0, date()))
            .await
            .unwrap();
        assert_eq!(repository.count().await.unwrap(), 0);
    }
}
