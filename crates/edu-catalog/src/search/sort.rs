//! Sort keys and the sort engine.

use crate::catalog::Product;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;

/// Field a product list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    Name,
    Price,
    Rating,
    StudentsCount,
    CreatedAt,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn reversed(&self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Price => "price",
            SortKey::Rating => "rating",
            SortKey::StudentsCount => "studentsCount",
            SortKey::CreatedAt => "createdAt",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "name" => Some(SortKey::Name),
            "price" => Some(SortKey::Price),
            "rating" => Some(SortKey::Rating),
            "studentsCount" => Some(SortKey::StudentsCount),
            "createdAt" => Some(SortKey::CreatedAt),
            _ => None,
        }
    }

    /// Ascending comparison of two products on this key.
    ///
    /// Every arm is a total order, which `sort_by` requires. Products without a
    /// creation date sort before dated ones.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortKey::Name => collate(&a.name, &b.name),
            SortKey::Price => a.price.cmp(&b.price),
            SortKey::Rating => a.rating.total_cmp(&b.rating),
            SortKey::StudentsCount => a.students_count.cmp(&b.students_count),
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

/// Vietnamese text ordering.
///
/// Letters compare in the Vietnamese alphabet (`a < ă < â < b`, `d < đ < e`,
/// `o < ô < ơ`, `u < ư`). Tone marks and then letter case only break ties,
/// and the exact text breaks any that remain so that only identical strings
/// compare equal.
fn collate(a: &str, b: &str) -> Ordering {
    let (ka, kb) = (CollationKey::new(a), CollationKey::new(b));
    ka.letters
        .cmp(&kb.letters)
        .then_with(|| ka.tones.cmp(&kb.tones))
        .then_with(|| ka.upper.cmp(&kb.upper))
        .then_with(|| a.cmp(b))
}

#[derive(Default)]
struct CollationKey {
    /// Lowercase base letter and its alphabet variant (breve, circumflex, horn, stroke).
    letters: Vec<(char, u8)>,
    /// Tone per letter, in dictionary order: none, grave, hook, tilde, acute, dot.
    tones: Vec<u8>,
    upper: Vec<bool>,
}

impl CollationKey {
    fn new(text: &str) -> Self {
        let mut key = Self::default();
        for c in text.nfd() {
            match c {
                '\u{0306}' => key.mark_variant(1),
                '\u{0302}' => key.mark_variant(2),
                '\u{031B}' => key.mark_variant(3),
                '\u{0300}' => key.mark_tone(1),
                '\u{0309}' => key.mark_tone(2),
                '\u{0303}' => key.mark_tone(3),
                '\u{0301}' => key.mark_tone(4),
                '\u{0323}' => key.mark_tone(5),
                '\u{0300}'..='\u{036F}' => {}
                'đ' | 'Đ' => key.push('d', 1, c == 'Đ'),
                _ => {
                    for lower in c.to_lowercase() {
                        key.push(lower, 0, c.is_uppercase());
                    }
                }
            }
        }
        key
    }

    fn push(&mut self, letter: char, variant: u8, upper: bool) {
        self.letters.push((letter, variant));
        self.tones.push(0);
        self.upper.push(upper);
    }

    fn mark_variant(&mut self, variant: u8) {
        if let Some(last) = self.letters.last_mut() {
            last.1 = variant;
        }
    }

    fn mark_tone(&mut self, tone: u8) {
        if let Some(last) = self.tones.last_mut() {
            *last = tone;
        }
    }
}

/// Return a sorted copy of `products`.
///
/// The sort is stable in both directions: products with equal keys keep their
/// relative input order.
pub fn sort_products(products: &[Product], key: SortKey, order: SortOrder) -> Vec<Product> {
    let mut sorted = products.to_vec();
    match order {
        SortOrder::Asc => sorted.sort_by(|a, b| key.compare(a, b)),
        SortOrder::Desc => sorted.sort_by(|a, b| key.compare(b, a)),
    }
    sorted
}
