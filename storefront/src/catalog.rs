//! Product catalog: the seed inventory, category filtering, and brand
//! aggregation.
//!
//! The catalog is an ordered list. New listings are prepended (most recent
//! first), products are never deleted, and the only mutation an existing
//! product sees is a review being prepended to its review list.

use crate::types::{
    Category, CategoryFilter, EcoScore, Product, ProductId, Review, ReviewId, ReviewMedia,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Ordered product collection
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CatalogState {
    /// Products, most recently listed first
    pub products: Vec<Product>,
}

impl CatalogState {
    /// Catalog pre-populated with the fixed seed inventory
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            products: seed_products(),
        }
    }

    /// Number of products
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Looks up a product by id
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Subsequence of products passing the filter, original order preserved.
    ///
    /// [`CategoryFilter::All`] returns the full sequence.
    #[must_use]
    pub fn filter(&self, filter: CategoryFilter) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| filter.matches(p.category))
            .collect()
    }

    /// Prepends a freshly published product
    pub fn publish(&mut self, product: Product) {
        self.products.insert(0, product);
    }

    /// Prepends a review to the given product's review list.
    ///
    /// Returns `false` when the product does not exist.
    pub fn add_review(&mut self, product_id: &ProductId, review: Review) -> bool {
        match self.products.iter_mut().find(|p| &p.id == product_id) {
            Some(product) => {
                product.reviews.insert(0, review);
                true
            },
            None => false,
        }
    }

    /// Products listed under the given brand, catalog order preserved
    #[must_use]
    pub fn brand_products(&self, brand: &str) -> Vec<&Product> {
        self.products.iter().filter(|p| p.brand == brand).collect()
    }

    /// Mean eco score total across a brand's products, rounded to the
    /// nearest integer; 0 when the brand has no products
    #[must_use]
    pub fn brand_eco_score(&self, brand: &str) -> u8 {
        let products = self.brand_products(brand);
        if products.is_empty() {
            return 0;
        }
        let sum: u32 = products.iter().map(|p| u32::from(p.eco_score.total)).sum();
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let mean = (f64::from(sum) / products.len() as f64).round() as u8;
        mean
    }
}

// Seed dates are fixed literals known to be valid calendar dates.
#[allow(clippy::unwrap_used)]
fn seed_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn seed_review(
    user: &str,
    rating: u8,
    eco_accuracy_rating: u8,
    comment: &str,
    date: NaiveDate,
) -> Review {
    Review {
        id: ReviewId::new(),
        user: user.to_string(),
        rating,
        eco_accuracy_rating,
        comment: comment.to_string(),
        date,
        media: Vec::<ReviewMedia>::new(),
    }
}

#[allow(clippy::too_many_lines)]
fn seed_products() -> Vec<Product> {
    vec![
        Product {
            id: ProductId::new(),
            name: "Essential Hemp Tee".to_string(),
            brand: "Terra Threads".to_string(),
            price_cents: 4500,
            discount_price_cents: Some(3800),
            category: Category::Tops,
            image: "https://images.unsplash.com/photo-1521572267360-ee0c2909d518?auto=format&fit=crop&q=80&w=800".to_string(),
            description: "A breathable, durable t-shirt made from 100% industrial hemp. Grown without pesticides and requires 50% less water than conventional cotton.".to_string(),
            material_info: "100% Organic Hemp".to_string(),
            certifications: vec!["GOTS".to_string(), "Fair Trade".to_string()],
            eco_score: EcoScore { material: 38, labor: 28, certification: 20, transparency: 9, total: 95 },
            reviews: vec![seed_review(
                "Alex G.",
                5,
                5,
                "Best hemp shirt I own. Truly transparent brand.",
                seed_date(2023, 10, 12),
            )],
            is_verified: true,
            greenwashing_flag: None,
        },
        Product {
            id: ProductId::new(),
            name: "Recycled Ocean Denim".to_string(),
            brand: "Blue Wave".to_string(),
            price_cents: 12000,
            discount_price_cents: None,
            category: Category::Bottoms,
            image: "https://images.unsplash.com/photo-1542272604-787c3835535d?auto=format&fit=crop&q=80&w=800".to_string(),
            description: "Classic fit jeans made from 40% recycled ocean plastic and 60% organic cotton. Dyed using a waterless indigo process.".to_string(),
            material_info: "Recycled Polyester & Organic Cotton".to_string(),
            certifications: vec!["GOTS".to_string()],
            eco_score: EcoScore { material: 32, labor: 25, certification: 10, transparency: 8, total: 75 },
            reviews: vec![],
            is_verified: true,
            greenwashing_flag: None,
        },
        Product {
            id: ProductId::new(),
            name: "Natural Bamboo Cardigan".to_string(),
            brand: "GreenStyle".to_string(),
            price_cents: 8500,
            discount_price_cents: Some(6500),
            category: Category::Knitwear,
            image: "https://images.unsplash.com/photo-1434389677669-e08b4cac3105?auto=format&fit=crop&q=80&w=800".to_string(),
            description: "Soft bamboo viscose cardigan. Advertised as \"100% Natural\" but processed using conventional chemical methods.".to_string(),
            material_info: "Bamboo Viscose".to_string(),
            certifications: vec![],
            eco_score: EcoScore { material: 15, labor: 12, certification: 0, transparency: 4, total: 31 },
            reviews: vec![seed_review(
                "Sam R.",
                3,
                2,
                "Feels soft but \"natural\" is a stretch for viscose processing.",
                seed_date(2023, 11, 5),
            )],
            is_verified: false,
            greenwashing_flag: Some(
                "Vague terms: \"Natural\" often hides chemical-heavy viscose processing.".to_string(),
            ),
        },
        Product {
            id: ProductId::new(),
            name: "Recycled Pet Sneakers".to_string(),
            brand: "EcoStep".to_string(),
            price_cents: 11000,
            discount_price_cents: Some(9500),
            category: Category::Shoes,
            image: "https://images.unsplash.com/photo-1595950653106-6c9ebd614d3a?auto=format&fit=crop&q=80&w=800".to_string(),
            description: "Lightweight sneakers with an upper made entirely from 15 recycled plastic bottles. The sole is made from natural wild rubber.".to_string(),
            material_info: "Recycled PET & Wild Rubber".to_string(),
            certifications: vec!["Global Recycled Standard".to_string(), "B-Corp".to_string()],
            eco_score: EcoScore { material: 35, labor: 27, certification: 18, transparency: 8, total: 88 },
            reviews: vec![seed_review(
                "Maya L.",
                5,
                5,
                "Super comfy and I love that they used plastic waste!",
                seed_date(2024, 1, 20),
            )],
            is_verified: true,
            greenwashing_flag: None,
        },
        Product {
            id: ProductId::new(),
            name: "Cork Minimalist Wallet".to_string(),
            brand: "Oak & Bark".to_string(),
            price_cents: 3500,
            discount_price_cents: None,
            category: Category::Accessories,
            image: "https://images.unsplash.com/photo-1627123424574-724758594e93?auto=format&fit=crop&q=80&w=800".to_string(),
            description: "A vegan alternative to leather, harvested sustainably from cork oak trees in Portugal. Naturally water-resistant and durable.".to_string(),
            material_info: "Sustainable Cork".to_string(),
            certifications: vec!["PETA-Approved Vegan".to_string()],
            eco_score: EcoScore { material: 40, labor: 22, certification: 10, transparency: 9, total: 81 },
            reviews: vec![],
            is_verified: true,
            greenwashing_flag: None,
        },
        Product {
            id: ProductId::new(),
            name: "Upcycled Denim Tote".to_string(),
            brand: "ReThread".to_string(),
            price_cents: 4000,
            discount_price_cents: None,
            category: Category::Accessories,
            image: "https://images.unsplash.com/photo-1544816155-12df9643f363?auto=format&fit=crop&q=80&w=800".to_string(),
            description: "Large tote bag handcrafted from vintage denim scraps. Each piece is unique and prevents textile waste from entering landfills.".to_string(),
            material_info: "Upcycled Denim".to_string(),
            certifications: vec![],
            eco_score: EcoScore { material: 39, labor: 29, certification: 0, transparency: 10, total: 78 },
            reviews: vec![seed_review(
                "Jake W.",
                4,
                5,
                "Great quality and a cool story behind it.",
                seed_date(2024, 2, 14),
            )],
            is_verified: true,
            greenwashing_flag: None,
        },
        Product {
            id: ProductId::new(),
            name: "Organic Linen Button-Up".to_string(),
            brand: "Loom & Leaf".to_string(),
            price_cents: 7500,
            discount_price_cents: None,
            category: Category::Tops,
            image: "https://images.unsplash.com/photo-1594932224456-7484cf66198e?auto=format&fit=crop&q=80&w=800".to_string(),
            description: "A timeless staple made from European flax. Linen is one of the most biodegradable and low-impact fabrics available.".to_string(),
            material_info: "100% Organic Linen".to_string(),
            certifications: vec!["OEKO-TEX".to_string()],
            eco_score: EcoScore { material: 37, labor: 24, certification: 15, transparency: 7, total: 83 },
            reviews: vec![],
            is_verified: true,
            greenwashing_flag: None,
        },
        Product {
            id: ProductId::new(),
            name: "Pineapple Leather Belt".to_string(),
            brand: "Ananas Roots".to_string(),
            price_cents: 5500,
            discount_price_cents: None,
            category: Category::Accessories,
            image: "https://images.unsplash.com/photo-1624222247344-550fbadcd973?auto=format&fit=crop&q=80&w=800".to_string(),
            description: "Made from Piñatex, an innovative textile made from pineapple leaf fiber—a byproduct of existing agriculture.".to_string(),
            material_info: "Piñatex (Pineapple Fiber)".to_string(),
            certifications: vec!["B-Corp".to_string(), "PETA-Approved Vegan".to_string()],
            eco_score: EcoScore { material: 36, labor: 26, certification: 18, transparency: 8, total: 88 },
            reviews: vec![],
            is_verified: true,
            greenwashing_flag: None,
        },
        Product {
            id: ProductId::new(),
            name: "Recycled Wool Beanie".to_string(),
            brand: "Cold Care".to_string(),
            price_cents: 3000,
            discount_price_cents: Some(2200),
            category: Category::Accessories,
            image: "https://images.unsplash.com/photo-1576871337622-98d48d1cf027?auto=format&fit=crop&q=80&w=800".to_string(),
            description: "Warm and cozy beanie made from 70% recycled wool and 30% recycled nylon. Perfect for winter impact reduction.".to_string(),
            material_info: "Recycled Wool Blend".to_string(),
            certifications: vec!["GRS".to_string()],
            eco_score: EcoScore { material: 33, labor: 20, certification: 10, transparency: 6, total: 69 },
            reviews: vec![seed_review(
                "Elena V.",
                5,
                4,
                "Warm and fits perfectly. Happy to support recycled wool.",
                seed_date(2023, 12, 1),
            )],
            is_verified: true,
            greenwashing_flag: None,
        },
        Product {
            id: ProductId::new(),
            name: "Tencel Lounge Pants".to_string(),
            brand: "Flow State".to_string(),
            price_cents: 9000,
            discount_price_cents: None,
            category: Category::Bottoms,
            image: "https://images.unsplash.com/photo-1552902865-b72c031ac5ea?auto=format&fit=crop&q=80&w=800".to_string(),
            description: "Silky smooth pants made from Tencel Lyocell, sourced from sustainably managed wood pulp in a closed-loop system.".to_string(),
            material_info: "Tencel Lyocell".to_string(),
            certifications: vec!["OEKO-TEX".to_string(), "FSC Certified".to_string()],
            eco_score: EcoScore { material: 34, labor: 28, certification: 15, transparency: 9, total: 86 },
            reviews: vec![],
            is_verified: true,
            greenwashing_flag: None,
        },
        Product {
            id: ProductId::new(),
            name: "Apple Leather Sneakers".to_string(),
            brand: "FruitStep".to_string(),
            price_cents: 13500,
            discount_price_cents: None,
            category: Category::Shoes,
            image: "https://images.unsplash.com/photo-1460353581641-37baddab0fa2?auto=format&fit=crop&q=80&w=800".to_string(),
            description: "Innovative bio-based leather made from apple skins discarded by the juice industry. Luxury feel with zero animal impact.".to_string(),
            material_info: "AppleSkin Bio-leather".to_string(),
            certifications: vec!["PETA-Approved Vegan".to_string()],
            eco_score: EcoScore { material: 38, labor: 25, certification: 10, transparency: 7, total: 80 },
            reviews: vec![],
            is_verified: true,
            greenwashing_flag: None,
        },
        Product {
            id: ProductId::new(),
            name: "Ethical Alpaca Sweater".to_string(),
            brand: "Andean Heritage".to_string(),
            price_cents: 15000,
            discount_price_cents: Some(12500),
            category: Category::Knitwear,
            image: "https://images.unsplash.com/photo-1620799140408-edc6dcb6d633?auto=format&fit=crop&q=80&w=800".to_string(),
            description: "Hand-knitted in Peru by fair-trade artisans. Alpaca wool is carbon neutral and biodegradable.".to_string(),
            material_info: "100% Royal Alpaca".to_string(),
            certifications: vec!["Fair Trade".to_string(), "Responsible Wool Standard".to_string()],
            eco_score: EcoScore { material: 36, labor: 30, certification: 20, transparency: 10, total: 96 },
            reviews: vec![seed_review(
                "Sofia M.",
                5,
                5,
                "The softest sweater I have ever owned. Worth every penny.",
                seed_date(2024, 1, 15),
            )],
            is_verified: true,
            greenwashing_flag: None,
        },
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use crate::types::Grade;

    #[test]
    fn seed_catalog_has_twelve_products() {
        let catalog = CatalogState::seeded();
        assert_eq!(catalog.len(), 12);
        assert_eq!(catalog.products[0].name, "Essential Hemp Tee");
        assert_eq!(catalog.products[11].name, "Ethical Alpaca Sweater");
    }

    #[test]
    fn seed_reviews_are_in_place() {
        let catalog = CatalogState::seeded();
        let reviewed: usize = catalog
            .products
            .iter()
            .filter(|p| !p.reviews.is_empty())
            .count();
        assert_eq!(reviewed, 6);

        let cardigan = &catalog.products[2];
        assert_eq!(cardigan.reviews.len(), 1);
        assert_eq!(cardigan.reviews[0].user, "Sam R.");
        assert_eq!(cardigan.reviews[0].rating, 3);
        assert_eq!(cardigan.reviews[0].eco_accuracy_rating, 2);
        assert!(cardigan.greenwashing_flag.is_some());
        assert!(!cardigan.is_verified);
    }

    #[test]
    fn seed_grades_span_the_scale() {
        let catalog = CatalogState::seeded();
        let grades: Vec<Grade> = catalog
            .products
            .iter()
            .map(|p| p.eco_score.grade())
            .collect();
        assert!(grades.contains(&Grade::Excellent));
        assert!(grades.contains(&Grade::Good));
        assert!(grades.contains(&Grade::Fair));
        assert!(grades.contains(&Grade::LowImpact));
    }

    #[test]
    fn filter_preserves_relative_order() {
        let catalog = CatalogState::seeded();
        let accessories = catalog.filter(CategoryFilter::Only(Category::Accessories));
        let names: Vec<&str> = accessories.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Cork Minimalist Wallet",
                "Upcycled Denim Tote",
                "Pineapple Leather Belt",
                "Recycled Wool Beanie",
            ]
        );
    }

    #[test]
    fn filter_all_returns_everything() {
        let catalog = CatalogState::seeded();
        assert_eq!(catalog.filter(CategoryFilter::All).len(), catalog.len());
    }

    #[test]
    fn filter_partitions_the_catalog() {
        let catalog = CatalogState::seeded();
        let per_category: usize = Category::ALL
            .iter()
            .map(|&c| catalog.filter(CategoryFilter::Only(c)).len())
            .sum();
        assert_eq!(per_category, catalog.len());
    }

    #[test]
    fn publish_prepends() {
        let mut catalog = CatalogState::seeded();
        let mut product = catalog.products[1].clone();
        product.id = ProductId::new();
        product.name = "Fresh Listing".to_string();
        catalog.publish(product);
        assert_eq!(catalog.len(), 13);
        assert_eq!(catalog.products[0].name, "Fresh Listing");
    }

    #[test]
    fn add_review_prepends_to_the_right_product() {
        let mut catalog = CatalogState::seeded();
        let id = catalog.products[0].id.clone();
        let review = seed_review("New Buyer", 4, 4, "Holding up well.", seed_date(2025, 3, 1));
        assert!(catalog.add_review(&id, review));
        let product = catalog.get(&id).unwrap();
        assert_eq!(product.reviews.len(), 2);
        assert_eq!(product.reviews[0].user, "New Buyer");
        assert_eq!(product.reviews[1].user, "Alex G.");
    }

    #[test]
    fn add_review_unknown_product_is_rejected() {
        let mut catalog = CatalogState::seeded();
        let review = seed_review("Ghost", 1, 1, "?", seed_date(2025, 3, 1));
        assert!(!catalog.add_review(&ProductId::new(), review));
    }

    #[test]
    fn brand_eco_score_means_over_brand_products() {
        let catalog = CatalogState::seeded();
        // Terra Threads has a single product scoring 95.
        assert_eq!(catalog.brand_eco_score("Terra Threads"), 95);
        assert_eq!(catalog.brand_eco_score("No Such Brand"), 0);
    }

    #[test]
    fn brand_eco_score_rounds_to_nearest() {
        let mut catalog = CatalogState::seeded();
        let mut second = catalog.products[1].clone();
        second.id = ProductId::new();
        second.brand = "Terra Threads".to_string();
        second.eco_score.total = 90;
        catalog.publish(second);
        // (95 + 90) / 2 = 92.5 -> 93
        assert_eq!(catalog.brand_eco_score("Terra Threads"), 93);
    }
}
