//! Domain types for the EcoWear storefront.
//!
//! Products, eco scores, reviews, cart items, and user accounts. Everything
//! here is plain data: derived values (grades, averages, totals) are computed
//! on read and never stored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a product
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(Uuid);

impl ProductId {
    /// Creates a new random `ProductId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a review
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewId(Uuid);

impl ReviewId {
    /// Creates a new random `ReviewId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ReviewId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ReviewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a user account
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random `UserId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Composite 0-100 sustainability rating split into four subscores.
///
/// Nominal subscore ranges: material 0-40, labor 0-30, certification 0-20,
/// transparency 0-10. The `total` field carries whatever was computed at
/// creation time and is never re-derived from the subscores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcoScore {
    /// Material sourcing subscore (nominal 0-40)
    pub material: u8,
    /// Labor conditions subscore (nominal 0-30)
    pub labor: u8,
    /// Certification subscore (nominal 0-20)
    pub certification: u8,
    /// Supply-chain transparency subscore (nominal 0-10)
    pub transparency: u8,
    /// Overall score (nominal 0-100)
    pub total: u8,
}

impl EcoScore {
    /// Grade derived from this score's total
    #[must_use]
    pub const fn grade(&self) -> Grade {
        Grade::from_total(self.total)
    }

    /// Color tier derived from this score's total
    #[must_use]
    pub const fn color_tier(&self) -> ColorTier {
        ColorTier::from_total(self.total)
    }
}

/// Qualitative grade over an eco score total
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    /// Total below 50
    LowImpact,
    /// Total 50-69
    Fair,
    /// Total 70-84
    Good,
    /// Total 85 and above
    Excellent,
}

impl Grade {
    /// Pure total-order function over the breakpoints {50, 70, 85}.
    ///
    /// Undefined for totals above 100; callers keep totals in range.
    #[must_use]
    pub const fn from_total(total: u8) -> Self {
        if total >= 85 {
            Self::Excellent
        } else if total >= 70 {
            Self::Good
        } else if total >= 50 {
            Self::Fair
        } else {
            Self::LowImpact
        }
    }

    /// Display label for this grade
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::LowImpact => "Low Impact",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Color tier selected by the same breakpoints as [`Grade`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorTier {
    /// Total 85 and above
    Emerald,
    /// Total 70-84
    Green,
    /// Total 50-69
    Yellow,
    /// Total below 50
    Red,
}

impl ColorTier {
    /// Color tier for a given eco score total
    #[must_use]
    pub const fn from_total(total: u8) -> Self {
        if total >= 85 {
            Self::Emerald
        } else if total >= 70 {
            Self::Green
        } else if total >= 50 {
            Self::Yellow
        } else {
            Self::Red
        }
    }
}

/// Fixed product category taxonomy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Shirts, tees, button-ups
    Tops,
    /// Trousers, jeans, lounge pants
    Bottoms,
    /// Sweaters, cardigans, beanies
    Knitwear,
    /// Bags, belts, wallets
    Accessories,
    /// Footwear
    Shoes,
}

impl Category {
    /// All categories, in display order
    pub const ALL: [Self; 5] = [
        Self::Tops,
        Self::Bottoms,
        Self::Knitwear,
        Self::Accessories,
        Self::Shoes,
    ];

    /// Display label for this category
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Tops => "Tops",
            Self::Bottoms => "Bottoms",
            Self::Knitwear => "Knitwear",
            Self::Accessories => "Accessories",
            Self::Shoes => "Shoes",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Catalog filter: either everything or a single category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryFilter {
    /// Sentinel value returning the full catalog unchanged
    #[default]
    All,
    /// Restrict to one category
    Only(Category),
}

impl CategoryFilter {
    /// Whether a product with `category` passes this filter
    #[must_use]
    pub fn matches(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == category,
        }
    }
}

/// Garment size
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Size {
    /// Extra small
    Xs,
    /// Small
    S,
    /// Medium
    M,
    /// Large
    L,
    /// Extra large
    Xl,
}

impl Size {
    /// All sizes, in display order
    pub const ALL: [Self; 5] = [Self::Xs, Self::S, Self::M, Self::L, Self::Xl];

    /// Display label for this size
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Xs => "XS",
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
            Self::Xl => "XL",
        }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind of media attached to a review
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Still image
    Image,
    /// Video clip
    Video,
}

/// Opaque media reference attached to a review.
///
/// URLs are never interpreted, only stored and displayed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewMedia {
    /// Image or video
    pub media_type: MediaType,
    /// Opaque URL
    pub url: String,
}

/// A customer review, immutable once created
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Unique identifier
    pub id: ReviewId,
    /// Reviewer display name (unauthenticated free text)
    pub user: String,
    /// Product quality rating, 1-5
    pub rating: u8,
    /// How accurate the product's eco claims felt, 1-5
    pub eco_accuracy_rating: u8,
    /// Review body
    pub comment: String,
    /// Calendar date of submission (no time component)
    pub date: NaiveDate,
    /// Attached media, in upload order
    #[serde(default)]
    pub media: Vec<ReviewMedia>,
}

/// A marketplace product.
///
/// Created from the seed catalog at startup or synthesized by the seller
/// portal; never deleted; mutated only by prepending a review.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier
    pub id: ProductId,
    /// Product name
    pub name: String,
    /// Brand name
    pub brand: String,
    /// List price in cents
    pub price_cents: u32,
    /// Discounted price in cents, at most `price_cents` when present
    pub discount_price_cents: Option<u32>,
    /// Category
    pub category: Category,
    /// Opaque image URL
    pub image: String,
    /// Marketing description
    pub description: String,
    /// Primary material info line
    pub material_info: String,
    /// Certification labels
    pub certifications: Vec<String>,
    /// Sustainability score
    pub eco_score: EcoScore,
    /// Reviews, most recent first
    pub reviews: Vec<Review>,
    /// Whether the marketplace has verified this listing
    pub is_verified: bool,
    /// Free-text warning when sustainability claims look misleading
    pub greenwashing_flag: Option<String>,
}

impl Product {
    /// Price the buyer actually pays: the discount price when present,
    /// otherwise the list price
    #[must_use]
    pub const fn effective_price_cents(&self) -> u32 {
        match self.discount_price_cents {
            Some(discounted) => discounted,
            None => self.price_cents,
        }
    }

    /// Arithmetic mean of review ratings, rounded to one decimal place.
    ///
    /// An empty review list yields 0.0 (an explicit default, not an error).
    #[must_use]
    pub fn average_rating(&self) -> f64 {
        if self.reviews.is_empty() {
            return 0.0;
        }
        let sum: u32 = self.reviews.iter().map(|r| u32::from(r.rating)).sum();
        #[allow(clippy::cast_precision_loss)]
        let mean = f64::from(sum) / self.reviews.len() as f64;
        (mean * 10.0).round() / 10.0
    }

    /// Star count for display: the average rating rounded to the nearest
    /// integer in 0..=5
    #[must_use]
    pub fn star_count(&self) -> u8 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let stars = self.average_rating().round().clamp(0.0, 5.0) as u8;
        stars
    }
}

/// A product selected for purchase.
///
/// Uniqueness key in a cart is `(product.id, selected_size)`; re-adding the
/// same key increments `quantity` instead of duplicating the entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Snapshot of the product at add time
    pub product: Product,
    /// Size chosen by the buyer
    pub selected_size: Size,
    /// Number of units, at least 1
    pub quantity: u32,
}

impl CartItem {
    /// Line total in cents: quantity times the effective price
    #[must_use]
    pub const fn line_total_cents(&self) -> u32 {
        self.quantity * self.product.effective_price_cents()
    }
}

/// Account role
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Shops the catalog
    Buyer,
    /// Lists products through the seller portal
    Seller,
}

impl UserRole {
    /// Default profile bio assigned at sign-up for this role
    #[must_use]
    pub const fn default_bio(&self) -> &'static str {
        match self {
            Self::Buyer => "Conscious consumer looking for impact.",
            Self::Seller => "Sustainable brand making a difference.",
        }
    }
}

/// A user profile as held in the session.
///
/// Never carries a password; credentials live only in [`AccountRecord`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Email address, the unique account key
    pub email: String,
    /// Phone number as entered
    pub phone: String,
    /// Buyer or seller
    pub role: UserRole,
    /// Opaque avatar URL (may be empty)
    pub avatar: String,
    /// Profile bio
    pub bio: Option<String>,
}

/// Registry entry pairing a profile with its credential.
///
/// This is the only place a password is stored; it is stripped before the
/// profile enters the session or session storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// The user profile
    pub user: User,
    /// Plaintext password (simulated backend, no hashing)
    pub password: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;

    fn product_with_ratings(ratings: &[u8]) -> Product {
        Product {
            id: ProductId::new(),
            name: "Test Tee".to_string(),
            brand: "Test Brand".to_string(),
            price_cents: 4500,
            discount_price_cents: None,
            category: Category::Tops,
            image: String::new(),
            description: String::new(),
            material_info: String::new(),
            certifications: vec![],
            eco_score: EcoScore {
                material: 38,
                labor: 28,
                certification: 20,
                transparency: 9,
                total: 95,
            },
            reviews: ratings
                .iter()
                .map(|&rating| Review {
                    id: ReviewId::new(),
                    user: "Reviewer".to_string(),
                    rating,
                    eco_accuracy_rating: rating,
                    comment: "Fine".to_string(),
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    media: vec![],
                })
                .collect(),
            is_verified: true,
            greenwashing_flag: None,
        }
    }

    #[test]
    fn grade_breakpoints() {
        assert_eq!(Grade::from_total(0), Grade::LowImpact);
        assert_eq!(Grade::from_total(49), Grade::LowImpact);
        assert_eq!(Grade::from_total(50), Grade::Fair);
        assert_eq!(Grade::from_total(69), Grade::Fair);
        assert_eq!(Grade::from_total(70), Grade::Good);
        assert_eq!(Grade::from_total(84), Grade::Good);
        assert_eq!(Grade::from_total(85), Grade::Excellent);
        assert_eq!(Grade::from_total(100), Grade::Excellent);
    }

    #[test]
    fn color_tier_matches_grade_breakpoints() {
        assert_eq!(ColorTier::from_total(95), ColorTier::Emerald);
        assert_eq!(ColorTier::from_total(75), ColorTier::Green);
        assert_eq!(ColorTier::from_total(69), ColorTier::Yellow);
        assert_eq!(ColorTier::from_total(31), ColorTier::Red);
    }

    #[test]
    fn grade_labels() {
        assert_eq!(Grade::Excellent.label(), "Excellent");
        assert_eq!(Grade::LowImpact.label(), "Low Impact");
        assert_eq!(format!("{}", Grade::Fair), "Fair");
    }

    #[test]
    fn average_rating_empty_is_zero() {
        let product = product_with_ratings(&[]);
        assert!((product.average_rating() - 0.0).abs() < f64::EPSILON);
        assert_eq!(product.star_count(), 0);
    }

    #[test]
    fn average_rating_rounds_to_one_decimal() {
        // (5 + 4 + 4) / 3 = 4.333... -> 4.3
        let product = product_with_ratings(&[5, 4, 4]);
        assert!((product.average_rating() - 4.3).abs() < f64::EPSILON);
        assert_eq!(product.star_count(), 4);
    }

    #[test]
    fn star_count_rounds_to_nearest() {
        // (5 + 4) / 2 = 4.5 -> 5 stars
        let product = product_with_ratings(&[5, 4]);
        assert_eq!(product.star_count(), 5);
    }

    #[test]
    fn effective_price_prefers_discount() {
        let mut product = product_with_ratings(&[]);
        assert_eq!(product.effective_price_cents(), 4500);
        product.discount_price_cents = Some(3800);
        assert_eq!(product.effective_price_cents(), 3800);
    }

    #[test]
    fn cart_item_line_total() {
        let mut product = product_with_ratings(&[]);
        product.discount_price_cents = Some(3800);
        let item = CartItem {
            product,
            selected_size: Size::M,
            quantity: 3,
        };
        assert_eq!(item.line_total_cents(), 11400);
    }

    #[test]
    fn category_filter_sentinel_matches_everything() {
        for category in Category::ALL {
            assert!(CategoryFilter::All.matches(category));
        }
        assert!(CategoryFilter::Only(Category::Shoes).matches(Category::Shoes));
        assert!(!CategoryFilter::Only(Category::Shoes).matches(Category::Tops));
    }

    #[test]
    fn role_default_bios() {
        assert_eq!(
            UserRole::Buyer.default_bio(),
            "Conscious consumer looking for impact."
        );
        assert_eq!(
            UserRole::Seller.default_bio(),
            "Sustainable brand making a difference."
        );
    }

    #[test]
    fn account_record_round_trips_with_password() {
        let record = AccountRecord {
            user: User {
                id: UserId::new(),
                name: "Ada".to_string(),
                email: "ada@gmail.com".to_string(),
                phone: "1234567890".to_string(),
                role: UserRole::Buyer,
                avatar: String::new(),
                bio: Some(UserRole::Buyer.default_bio().to_string()),
            },
            password: "hunter22".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("hunter22"));
        let back: AccountRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn session_user_serializes_without_password_field() {
        let user = User {
            id: UserId::new(),
            name: "Ada".to_string(),
            email: "ada@gmail.com".to_string(),
            phone: "1234567890".to_string(),
            role: UserRole::Seller,
            avatar: String::new(),
            bio: None,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
    }
}
