//! Seller portal: listing drafts and the publish pipeline.
//!
//! Publishing is a two-step flow. `Submit` validates the draft (a photo is
//! mandatory and blocks before any work starts), snapshots it, and schedules
//! a publish delay; `PublishCompleted` synthesizes the product from that
//! snapshot, scores it, and prepends it to the catalog. Edits made while the
//! delay is in flight do not reach the published listing. New listings
//! always start unverified with no reviews.

use crate::app::{AppAction, AppEnv, AppState};
use crate::error::ListingError;
use crate::types::{Category, EcoScore, Product, ProductId};
use ecowear_core::{Effect, SmallVec, smallvec};
use serde::{Deserialize, Serialize};

/// Certifications a seller can attach to a draft
pub const CERTIFICATION_MENU: [&str; 5] = [
    "GOTS Certified",
    "Fair Trade",
    "B-Corp",
    "Oeko-Tex",
    "Global Recycled Standard",
];

/// Brand shown when the seller leaves the brand field blank
pub const INDEPENDENT_SELLER_BRAND: &str = "Independent Seller";

/// Which portal screen the seller is on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SellerView {
    /// The seller's published listings
    #[default]
    Listings,
    /// The new-listing form
    AddListing,
}

/// A listing under construction. Resets to defaults after a successful
/// publish.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingDraft {
    /// Product name
    pub name: String,
    /// Brand name; blank falls back to [`INDEPENDENT_SELLER_BRAND`]
    pub brand: String,
    /// Price in cents, unset until the seller enters one
    pub price_cents: Option<u32>,
    /// Product category
    pub category: Category,
    /// Primary material
    pub material: String,
    /// Selected certifications from [`CERTIFICATION_MENU`]
    pub certifications: Vec<String>,
    /// Product description
    pub description: String,
    /// Attached photo URL; mandatory for publishing
    pub photo: Option<String>,
    /// Attached video URL; kept on the draft, not carried onto the product
    pub video: Option<String>,
}

impl Default for ListingDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            brand: String::new(),
            price_cents: None,
            category: Category::Tops,
            material: "Organic Cotton".to_string(),
            certifications: Vec::new(),
            description: String::new(),
            photo: None,
            video: None,
        }
    }
}

impl ListingDraft {
    /// Checks the draft for publishing. The photo gate comes first; it
    /// blocks before any latency is simulated.
    pub fn validate(&self) -> Result<(), ListingError> {
        if self.photo.is_none() {
            return Err(ListingError::MissingPhoto);
        }
        if self.name.trim().is_empty() {
            return Err(ListingError::MissingField("name"));
        }
        if self.price_cents.is_none() {
            return Err(ListingError::MissingField("price"));
        }
        if self.description.trim().is_empty() {
            return Err(ListingError::MissingField("description"));
        }
        Ok(())
    }

    /// Scores the draft. Material, labor, and transparency are fixed
    /// baseline subscores; each certification adds five points to both the
    /// certification subscore and the total.
    #[must_use]
    pub fn eco_score(&self) -> EcoScore {
        let cert_count = u8::try_from(self.certifications.len()).unwrap_or(u8::MAX);
        let certification = cert_count.saturating_mul(5);
        EcoScore {
            material: 30,
            labor: 25,
            certification,
            transparency: 8,
            total: 63_u8.saturating_add(certification),
        }
    }
}

/// Seller portal state
#[derive(Clone, Debug, Default)]
pub struct SellerState {
    /// Current portal screen
    pub view: SellerView,
    /// The listing draft
    pub draft: ListingDraft,
    /// Snapshot taken at submit time; the publish builds from this, not the
    /// live draft
    pub pending: Option<ListingDraft>,
    /// A publish delay is in flight
    pub publishing: bool,
    /// Validation error from the last submit, if any
    pub error: Option<ListingError>,
}

/// Seller portal actions
#[derive(Clone, Debug)]
pub enum SellerAction {
    /// Switch to the listings screen
    ShowListings,
    /// Switch to the new-listing form
    ShowAddListing,
    /// Edit the product name
    SetName(String),
    /// Edit the brand name
    SetBrand(String),
    /// Set or clear the price
    SetPrice(Option<u32>),
    /// Pick a category
    SetCategory(Category),
    /// Edit the material
    SetMaterial(String),
    /// Edit the description
    SetDescription(String),
    /// Add the certification if absent, remove it if present
    ToggleCertification(String),
    /// Attach a photo
    AttachPhoto(String),
    /// Remove the attached photo
    RemovePhoto,
    /// Attach a video
    AttachVideo(String),
    /// Remove the attached video
    RemoveVideo,
    /// Validate the draft and start publishing
    Submit,
    /// The publish delay elapsed
    PublishCompleted,
}

/// Products in the catalog published under `brand`
#[must_use]
pub fn my_listings<'a>(state: &'a AppState, brand: &str) -> Vec<&'a Product> {
    state.catalog.brand_products(brand)
}

/// Reduces a seller action against the whole app state.
#[allow(clippy::too_many_lines)]
pub fn reduce(
    state: &mut AppState,
    action: SellerAction,
    env: &AppEnv,
) -> SmallVec<[Effect<AppAction>; 4]> {
    let seller = &mut state.seller;
    match action {
        SellerAction::ShowListings => {
            seller.view = SellerView::Listings;
        },
        SellerAction::ShowAddListing => {
            seller.view = SellerView::AddListing;
        },
        SellerAction::SetName(value) => seller.draft.name = value,
        SellerAction::SetBrand(value) => seller.draft.brand = value,
        SellerAction::SetPrice(value) => seller.draft.price_cents = value,
        SellerAction::SetCategory(value) => seller.draft.category = value,
        SellerAction::SetMaterial(value) => seller.draft.material = value,
        SellerAction::SetDescription(value) => seller.draft.description = value,
        SellerAction::ToggleCertification(cert) => {
            let certs = &mut seller.draft.certifications;
            if let Some(index) = certs.iter().position(|c| *c == cert) {
                certs.remove(index);
            } else {
                certs.push(cert);
            }
        },
        SellerAction::AttachPhoto(url) => seller.draft.photo = Some(url),
        SellerAction::RemovePhoto => seller.draft.photo = None,
        SellerAction::AttachVideo(url) => seller.draft.video = Some(url),
        SellerAction::RemoveVideo => seller.draft.video = None,

        SellerAction::Submit => {
            if seller.publishing {
                tracing::debug!("submit ignored while a publish is in flight");
                return SmallVec::new();
            }
            if let Err(error) = seller.draft.validate() {
                tracing::debug!(%error, "listing draft rejected");
                seller.error = Some(error);
                return SmallVec::new();
            }
            seller.error = None;
            seller.pending = Some(seller.draft.clone());
            seller.publishing = true;
            return smallvec![Effect::delay(
                env.latency.publish,
                AppAction::Seller(SellerAction::PublishCompleted),
            )];
        },

        SellerAction::PublishCompleted => {
            let Some(draft) = seller.pending.take() else {
                return SmallVec::new();
            };
            seller.draft = ListingDraft::default();
            let eco_score = draft.eco_score();
            let brand = if draft.brand.trim().is_empty() {
                INDEPENDENT_SELLER_BRAND.to_string()
            } else {
                draft.brand.clone()
            };
            let product = Product {
                id: ProductId::new(),
                name: draft.name,
                brand,
                price_cents: draft.price_cents.unwrap_or_default(),
                discount_price_cents: None,
                category: draft.category,
                image: draft.photo.unwrap_or_default(),
                description: draft.description,
                material_info: draft.material,
                certifications: draft.certifications,
                eco_score,
                reviews: Vec::new(),
                is_verified: false,
                greenwashing_flag: None,
            };
            tracing::info!(product_id = %product.id, brand = %product.brand, "listing published");
            state.catalog.publish(product);
            state.seller.publishing = false;
            state.seller.view = SellerView::Listings;
        },
    }
    SmallVec::new()
}
