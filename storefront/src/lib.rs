//! EcoWear storefront: a sustainability-scored fashion marketplace core.
//!
//! The whole app is one reducer over one state tree. [`app::AppReducer`]
//! handles navigation and dispatches feature actions to the slice modules:
//!
//! - [`catalog`]: seeded product catalog, category filtering, brand pages
//! - [`session`]: simulated sign-in/sign-up, role selection, persistence
//! - [`cart`]: size-gated cart, checkout form, order state machine
//! - [`seller`]: listing drafts, eco scoring, delayed publish
//! - [`review`]: delayed review submission with a self-clearing banner
//!
//! Backend round-trips are simulated as [`ecowear_core::Effect::Delay`]
//! effects carrying completion actions; time and storage are injected
//! through [`app::AppEnv`] so every flow is deterministic under test.

pub mod app;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod persistence;
pub mod review;
pub mod seller;
pub mod session;
pub mod types;

pub use app::{AppAction, AppEnv, AppReducer, AppState, Page, SimulatedLatency};
pub use error::{AuthError, ListingError};
pub use types::{
    Category, CategoryFilter, ColorTier, EcoScore, Grade, Product, ProductId, Review, Size, User,
    UserRole,
};
