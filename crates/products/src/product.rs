use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kitshelf_core::{DomainError, DomainResult, Entity, ProductId};

use crate::attributes::{Brand, Color, Size};
use crate::availability::{AvailabilitySet, EMPTY_AVAILABILITY};
use crate::interval::Interval;

/// A persisted product row.
///
/// `availability` is the stored text exactly as it sits in the store; use
/// [`ProductRecord::availability_set`] to work with the decoded windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    pub brand: Brand,
    pub size: Size,
    pub color: Color,
    pub availability: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductRecord {
    pub fn availability_set(&self) -> DomainResult<AvailabilitySet> {
        AvailabilitySet::decode(&self.availability)
    }
}

impl Entity for ProductRecord {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Fields for a product that does not exist yet (id and timestamps come from the store).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub brand: Brand,
    pub size: Size,
    pub color: Color,
    pub availability: String,
}

impl NewProduct {
    /// Seeds availability with `window` when given, otherwise with `[]`.
    pub fn new(
        name: impl Into<String>,
        brand: Brand,
        size: Size,
        color: Color,
        window: Option<Interval>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        let availability = match window {
            Some(interval) => AvailabilitySet::single(interval).encode(),
            None => EMPTY_AVAILABILITY.to_string(),
        };

        Ok(Self {
            name,
            brand,
            size,
            color,
            availability,
        })
    }
}

/// Partial update of a product row. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub brand: Option<Brand>,
    pub size: Option<Size>,
    pub color: Option<Color>,
    pub availability: Option<String>,
}

impl ProductPatch {
    /// Patch that only replaces the stored availability text.
    pub fn availability(set: &AvailabilitySet) -> Self {
        Self {
            availability: Some(set.encode()),
            ..Self::default()
        }
    }

    /// True when the patch would not change any column.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.brand.is_none()
            && self.size.is_none()
            && self.color.is_none()
            && self.availability.is_none()
    }

    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JAN_1: i64 = 1_704_067_200_000;
    const JAN_2: i64 = 1_704_153_600_000;

    #[test]
    fn new_product_without_window_starts_empty() {
        let product = NewProduct::new("Trail tent", Brand::Quechua, Size::M, Color::Green, None).unwrap();
        assert_eq!(product.availability, "[]");
    }

    #[test]
    fn new_product_with_window_seeds_one_interval() {
        let window = Interval::from_epoch_pair(JAN_1, JAN_2).unwrap();
        let product =
            NewProduct::new("Trail tent", Brand::Quechua, Size::M, Color::Green, Some(window)).unwrap();
        assert_eq!(
            product.availability,
            r#"["2024-01-01T00:00:00.000Z/2024-01-02T00:00:00.000Z"]"#
        );
    }

    #[test]
    fn new_product_rejects_blank_name() {
        let err = NewProduct::new("  ", Brand::Kipsta, Size::S, Color::Blue, None).unwrap_err();
        assert_eq!(err, DomainError::Validation("name cannot be empty".to_string()));
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(ProductPatch::default().is_empty());
        let patch = ProductPatch {
            color: Some(Color::White),
            ..ProductPatch::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn availability_patch_carries_encoded_set() {
        let set = AvailabilitySet::single(Interval::from_epoch_pair(JAN_1, JAN_2).unwrap());
        let patch = ProductPatch::availability(&set);
        assert_eq!(patch.availability.as_deref(), Some(set.encode().as_str()));
        assert!(patch.name.is_none());
    }

    #[test]
    fn patch_rejects_blank_name() {
        let patch = ProductPatch {
            name: Some(String::new()),
            ..ProductPatch::default()
        };
        assert!(matches!(patch.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn record_decodes_its_availability() {
        let now = Utc::now();
        let record = ProductRecord {
            id: ProductId::new(1),
            name: "Racket".to_string(),
            brand: Brand::Artengo,
            size: Size::L,
            color: Color::White,
            availability: "garbage".to_string(),
            created_at: now,
            updated_at: now,
        };
        assert!(matches!(
            record.availability_set(),
            Err(DomainError::MalformedStore(_))
        ));
        assert_eq!(*Entity::id(&record), ProductId::new(1));
    }
}
