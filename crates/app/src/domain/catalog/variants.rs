//! Variant attributes

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// The attributes a product variant can be distinguished by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantAttribute {
    Color,
    Size,
    Brand,
    Capacity,
}

impl VariantAttribute {
    pub const ALL: [Self; 4] = [Self::Color, Self::Size, Self::Brand, Self::Capacity];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Size => "size",
            Self::Brand => "brand",
            Self::Capacity => "capacity",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Color => "Color",
            Self::Size => "Size",
            Self::Brand => "Brand",
            Self::Capacity => "Capacity",
        }
    }
}

impl Display for VariantAttribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selected attribute values, either describing a stored variant or a shopper's selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantAttributes {
    #[serde(default)]
    pub color: Option<String>,

    #[serde(default)]
    pub size: Option<String>,

    #[serde(default)]
    pub brand: Option<String>,

    #[serde(default)]
    pub capacity: Option<String>,
}

impl VariantAttributes {
    #[must_use]
    pub fn get(&self, attribute: VariantAttribute) -> Option<&str> {
        let value = match attribute {
            VariantAttribute::Color => &self.color,
            VariantAttribute::Size => &self.size,
            VariantAttribute::Brand => &self.brand,
            VariantAttribute::Capacity => &self.capacity,
        };

        value.as_deref()
    }

    /// Drop blank values so an empty form field never filters a lookup.
    #[must_use]
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        }

        Self {
            color: clean(self.color),
            size: clean(self.size),
            brand: clean(self.brand),
            capacity: clean(self.capacity),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        VariantAttribute::ALL
            .iter()
            .all(|attribute| self.get(*attribute).is_none())
    }

    /// Present attributes in display order.
    #[must_use]
    pub fn labels(&self) -> SmallVec<[(VariantAttribute, &str); 4]> {
        VariantAttribute::ALL
            .iter()
            .filter_map(|attribute| self.get(*attribute).map(|value| (*attribute, value)))
            .collect()
    }
}

impl Display for VariantAttributes {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (index, (attribute, value)) in self.labels().into_iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }

            write!(f, "{}: {value}", attribute.title())?;
        }

        Ok(())
    }
}
