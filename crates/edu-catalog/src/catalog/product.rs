//! Course (product) types.

use crate::ids::ProductId;
use crate::price::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Difficulty level of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    /// All levels in ascending difficulty.
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "beginner" => Some(Level::Beginner),
            "intermediate" => Some(Level::Intermediate),
            "advanced" => Some(Level::Advanced),
            _ => None,
        }
    }

    /// Localized label shown next to a course.
    pub fn label(&self) -> &'static str {
        match self {
            Level::Beginner => "Cơ bản",
            Level::Intermediate => "Trung cấp",
            Level::Advanced => "Nâng cao",
        }
    }
}

/// A course in the catalog.
///
/// Serialized in the camelCase shape used by the persisted history payload.
/// Text fields default to empty so loosely-formed records still load; such a
/// record simply never matches filters on the missing field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique course identifier.
    pub id: ProductId,
    /// Course title.
    #[serde(default)]
    pub name: String,
    /// Listed price before discount.
    #[serde(default)]
    pub price: Price,
    /// Strike-through price shown on discounted cards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    /// Discount percentage, 0-100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<u8>,
    /// Cover image URL.
    #[serde(default)]
    pub image: String,
    /// Preview video URL.
    #[serde(default)]
    pub video: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub long_description: String,
    #[serde(default)]
    pub instructor: String,
    #[serde(default)]
    pub category: String,
    /// Average rating in `[0, 5]`.
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub students_count: u64,
    /// Display-only duration, e.g. "12 giờ".
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub level: Level,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_bestseller: bool,
}

impl Product {
    /// Create a course with the required fields; everything else is empty.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            original_price: None,
            discount: None,
            image: String::new(),
            video: String::new(),
            short_description: String::new(),
            long_description: String::new(),
            instructor: String::new(),
            category: String::new(),
            rating: 0.0,
            students_count: 0,
            duration: String::new(),
            level: Level::default(),
            tags: Vec::new(),
            created_at: None,
            updated_at: None,
            is_new: false,
            is_bestseller: false,
        }
    }

    /// Price after applying the discount percentage.
    pub fn effective_price(&self) -> Price {
        self.price.effective(self.discount)
    }

    /// Check if the course is sold below its listed price.
    pub fn is_discounted(&self) -> bool {
        self.discount.is_some_and(|d| d > 0)
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = instructor.into();
        self
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_students(mut self, students_count: u64) -> Self {
        self.students_count = students_count;
        self
    }

    pub fn with_discount(mut self, percent: u8) -> Self {
        self.discount = Some(percent);
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Add a tag to this course.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }
}
