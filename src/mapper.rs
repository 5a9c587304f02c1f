//! Conversion between stored entities and their wire representations.

use crate::model::{Product, ProductRepresentation};

/// A stateless, two-way conversion between an entity and its representation.
///
/// Implementors provide the single-value conversions; the `Option` and slice forms are derived
/// from them. Identity is never carried across: a representation has none, and an entity built
/// from one is unsaved.
pub trait Mapper {
    /// The stored type.
    type Entity;
    /// The type exchanged with clients.
    type Representation;

    /// Copies the value fields of `entity` into a representation.
    fn representation(&self, entity: &Self::Entity) -> Self::Representation;

    /// Builds an unsaved entity from the value fields of `representation`.
    fn entity(&self, representation: &Self::Representation) -> Self::Entity;

    /// `None` maps to `None`.
    fn to_representation(&self, entity: Option<&Self::Entity>) -> Option<Self::Representation> {
        entity.map(|e| self.representation(e))
    }

    /// `None` maps to `None`.
    fn to_entity(&self, representation: Option<&Self::Representation>) -> Option<Self::Entity> {
        representation.map(|r| self.entity(r))
    }

    /// Maps every entity, preserving order.
    fn to_representations(&self, entities: &[Self::Entity]) -> Vec<Self::Representation> {
        entities.iter().map(|e| self.representation(e)).collect()
    }

    /// Maps every representation, preserving order.
    fn to_entities(&self, representations: &[Self::Representation]) -> Vec<Self::Entity> {
        representations.iter().map(|r| self.entity(r)).collect()
    }
}

/// Maps `Product` to and from `ProductRepresentation`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProductMapper;

impl Mapper for ProductMapper {
    type Entity = Product;
    type Representation = ProductRepresentation;

    fn representation(&self, entity: &Product) -> ProductRepresentation {
        ProductRepresentation {
            name: entity.name.clone(),
            price: entity.price,
            date: entity.date,
        }
    }

    fn entity(&self, representation: &ProductRepresentation) -> Product {
        Product::new(
            representation.name.clone(),
            representation.price,
            representation.date,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()
    }

    fn stored(id: i64, name: &str, price: f64) -> Product {
        Product {
            id: Some(id),
            name: name.to_owned(),
            price,
            date: date(),
        }
    }

    #[test]
    fn to_representation_copies_values_and_drops_id() {
        let r = ProductMapper
            .to_representation(Some(&stored(7, "Product 1", 10.0)))
            .unwrap();
        assert_eq!(r, ProductRepresentation::new("Product 1", 10.0, date()));
    }

    #[test]
    fn to_entity_builds_unsaved_entity() {
        let r = ProductRepresentation::new("Product 1", 10.0, date());
        let e = ProductMapper.to_entity(Some(&r)).unwrap();
        assert_eq!(e.id, None);
        assert_eq!(e.name, "Product 1");
        assert_eq!(e.price, 10.0);
        assert_eq!(e.date, date());
    }

    #[test]
    fn absent_input_maps_to_absent_output() {
        assert_eq!(ProductMapper.to_representation(None), None);
        assert_eq!(ProductMapper.to_entity(None), None);
    }

    #[test]
    fn round_trip_preserves_values() {
        let r = ProductRepresentation::new("Product 2", 15.5, date());
        let mapper = ProductMapper;
        let once = mapper.to_entity(Some(&r));
        let back = mapper.to_representation(once.as_ref());
        let again = mapper.to_entity(back.as_ref()).unwrap();
        assert_eq!(again.name, r.name);
        assert_eq!(again.price, r.price);
        assert_eq!(again.date, r.date);
        assert_eq!(again.id, None);
    }

    #[test]
    fn lists_preserve_order() {
        let entities = vec![stored(2, "b", 2.0), stored(1, "a", 1.0)];
        let reps = ProductMapper.to_representations(&entities);
        let names: Vec<&str> = reps.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);

        let back = ProductMapper.to_entities(&reps);
        assert!(back.iter().all(|e| e.id.is_none()));
        assert_eq!(back[0].name, "b");
    }

    #[test]
    fn empty_lists_map_to_empty_lists() {
        assert!(ProductMapper.to_representations(&[]).is_empty());
        assert!(ProductMapper.to_entities(&[]).is_empty());
    }
}
