//! Top-level state, actions, and reducer for the storefront.
//!
//! [`AppReducer`] owns the whole app: navigation is handled here and every
//! feature action is dispatched to its module's `reduce` function. Feature
//! reducers receive the full [`AppState`] because flows cut across slices
//! (adding to the cart consults the session; publishing writes the catalog).

use crate::cart::{self, CartAction, CartState};
use crate::catalog::CatalogState;
use crate::persistence;
use crate::review::{self, ReviewAction, ReviewFormState};
use crate::seller::{self, SellerAction, SellerState};
use crate::session::{self, SessionAction, SessionState};
use crate::types::{ProductId, UserRole};
use ecowear_core::environment::{Clock, Storage};
use ecowear_core::{Effect, Reducer, SmallVec};
use std::sync::Arc;
use std::time::Duration;

/// Artificial delays standing in for backend round-trips.
///
/// Every asynchronous flow in the app is a fixed delay followed by a
/// completion action. Tests zero these out with [`SimulatedLatency::none`]
/// or run under a paused runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulatedLatency {
    /// Credential check on sign-in and sign-up
    pub auth: Duration,
    /// Seller listing publish
    pub publish: Duration,
    /// Review submission
    pub review_submit: Duration,
    /// How long the missing-size error stays visible
    pub size_error_clear: Duration,
    /// How long the review success banner stays visible
    pub review_banner_clear: Duration,
}

impl Default for SimulatedLatency {
    fn default() -> Self {
        Self {
            auth: Duration::from_millis(800),
            publish: Duration::from_millis(1500),
            review_submit: Duration::from_millis(1000),
            size_error_clear: Duration::from_millis(500),
            review_banner_clear: Duration::from_millis(2000),
        }
    }
}

impl SimulatedLatency {
    /// All delays zeroed, for tests that step the reducer by hand
    #[must_use]
    pub const fn none() -> Self {
        Self {
            auth: Duration::ZERO,
            publish: Duration::ZERO,
            review_submit: Duration::ZERO,
            size_error_clear: Duration::ZERO,
            review_banner_clear: Duration::ZERO,
        }
    }
}

/// Injected dependencies shared by every reducer
#[derive(Clone)]
pub struct AppEnv {
    /// Time source
    pub clock: Arc<dyn Clock>,
    /// Durable key-value storage
    pub storage: Arc<dyn Storage>,
    /// Simulated backend latencies
    pub latency: SimulatedLatency,
}

impl AppEnv {
    /// Environment with the default latencies
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, storage: Arc<dyn Storage>) -> Self {
        Self {
            clock,
            storage,
            latency: SimulatedLatency::default(),
        }
    }
}

/// Where the user is in the app
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Page {
    /// The storefront landing page
    #[default]
    Home,
    /// A product detail page
    Product(ProductId),
    /// A brand page, keyed by brand name
    Brand(String),
    /// The seller portal; sellers only
    Seller,
    /// The profile page; any signed-in user
    Profile,
}

/// The whole application state
#[derive(Clone, Debug, Default)]
pub struct AppState {
    /// Product catalog
    pub catalog: CatalogState,
    /// Session, account registry, and auth flow
    pub session: SessionState,
    /// Cart and checkout
    pub cart: CartState,
    /// Seller portal
    pub seller: SellerState,
    /// Review form
    pub review_form: ReviewFormState,
    /// Current page
    pub page: Page,
}

impl AppState {
    /// Fresh state with the seeded catalog and no session
    #[must_use]
    pub fn new() -> Self {
        Self {
            catalog: CatalogState::seeded(),
            ..Self::default()
        }
    }

    /// Fresh state with the account registry and any persisted session
    /// loaded from storage. This is the cold-start path: a session saved in
    /// an earlier run survives into this one.
    #[must_use]
    pub fn restore(env: &AppEnv) -> Self {
        let mut state = Self::new();
        state.session.registry = persistence::load_registry(env.storage.as_ref());
        state.session.current_user = persistence::load_session(env.storage.as_ref());
        if let Some(user) = &state.session.current_user {
            tracing::info!(email = %user.email, "restored persisted session");
        }
        state
    }
}

/// Top-level actions
#[derive(Clone, Debug)]
pub enum AppAction {
    /// Navigate to a page
    Navigate(Page),
    /// Session and auth flow
    Session(SessionAction),
    /// Cart and checkout
    Cart(CartAction),
    /// Seller portal
    Seller(SellerAction),
    /// Review form
    Review(ReviewAction),
}

/// The application reducer
#[derive(Clone, Copy, Debug, Default)]
pub struct AppReducer;

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnv;

    fn reduce(
        &self,
        state: &mut AppState,
        action: AppAction,
        env: &AppEnv,
    ) -> SmallVec<[Effect<AppAction>; 4]> {
        match action {
            AppAction::Navigate(page) => navigate(state, page),
            AppAction::Session(action) => session::reduce(state, action, env),
            AppAction::Cart(action) => cart::reduce(state, action, env),
            AppAction::Seller(action) => seller::reduce(state, action, env),
            AppAction::Review(action) => review::reduce(state, action, env),
        }
    }
}

fn navigate(state: &mut AppState, page: Page) -> SmallVec<[Effect<AppAction>; 4]> {
    match page {
        Page::Product(product_id) => {
            if state.catalog.get(&product_id).is_none() {
                tracing::warn!(%product_id, "navigation to unknown product ignored");
                return SmallVec::new();
            }
            // Each product page starts with no size picked.
            state.cart.selected_size = None;
            state.cart.size_error = false;
            state.page = Page::Product(product_id);
        },
        Page::Seller => {
            if !state.session.is_authenticated() {
                session::open_auth_prompt(&mut state.session);
                return SmallVec::new();
            }
            if state.session.role() != Some(UserRole::Seller) {
                tracing::debug!("seller portal refused for non-seller account");
                return SmallVec::new();
            }
            state.page = Page::Seller;
        },
        Page::Profile => {
            if state.session.is_authenticated() {
                state.page = Page::Profile;
            } else {
                session::open_auth_prompt(&mut state.session);
            }
        },
        Page::Home | Page::Brand(_) => state.page = page,
    }
    SmallVec::new()
}
