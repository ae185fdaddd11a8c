//! Cart and checkout: item aggregation and the Cart → Checkout → Success
//! state machine.
//!
//! Adding to the cart is gated twice: an unauthenticated user is redirected
//! to the auth prompt (the cart is untouched), and a missing size raises a
//! validation signal that clears itself after a short delay. Items are keyed
//! by `(product, size)`; re-adding an existing key increments its quantity.
//! The order total is recomputed from the items on every read.

use crate::app::{AppAction, AppEnv, AppState};
use crate::session;
use crate::types::{CartItem, Product, ProductId, Size};
use ecowear_core::{Effect, SmallVec, smallvec};
use serde::{Deserialize, Serialize};

/// Checkout flow position. `Closed` means the modal is dismissed; closing
/// never clears the underlying items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartFlowState {
    /// Modal dismissed
    #[default]
    Closed,
    /// Reviewing cart contents
    Cart,
    /// Entering buyer and payment details
    Checkout,
    /// Order placed; terminal for this cart session
    Success,
}

/// Payment method choices
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Credit or debit card
    #[default]
    Card,
    /// UPI transfer; requires a UPI id
    Upi,
    /// Cash on delivery
    Cod,
}

/// The six required buyer fields on the checkout form
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuyerField {
    /// Full name
    Name,
    /// Contact number
    Phone,
    /// Email address
    Email,
    /// Street address
    Address,
    /// City
    City,
    /// ZIP code
    Zip,
}

impl BuyerField {
    /// All buyer fields, in form order
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::Phone,
        Self::Email,
        Self::Address,
        Self::City,
        Self::Zip,
    ];
}

/// Per-field error flags for the checkout form
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutErrors {
    /// Name blank at submit
    pub name: bool,
    /// Phone blank at submit
    pub phone: bool,
    /// Email blank at submit
    pub email: bool,
    /// Address blank at submit
    pub address: bool,
    /// City blank at submit
    pub city: bool,
    /// ZIP blank at submit
    pub zip: bool,
    /// UPI id blank at submit while UPI was selected
    pub upi_id: bool,
}

impl CheckoutErrors {
    /// Whether any field is flagged
    #[must_use]
    pub const fn any(&self) -> bool {
        self.name || self.phone || self.email || self.address || self.city || self.zip || self.upi_id
    }
}

/// Buyer details and payment selection typed into the checkout step.
///
/// Retained across Checkout → Cart back navigation and across closing the
/// modal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutForm {
    /// Full name
    pub name: String,
    /// Contact number
    pub phone: String,
    /// Email address
    pub email: String,
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// ZIP code
    pub zip: String,
    /// Selected payment method
    pub payment_method: PaymentMethod,
    /// UPI id, only validated when [`PaymentMethod::Upi`] is selected
    pub upi_id: String,
    /// Per-field error flags from the last failed submit
    pub errors: CheckoutErrors,
}

impl CheckoutForm {
    fn field_mut(&mut self, field: BuyerField) -> (&mut String, &mut bool) {
        match field {
            BuyerField::Name => (&mut self.name, &mut self.errors.name),
            BuyerField::Phone => (&mut self.phone, &mut self.errors.phone),
            BuyerField::Email => (&mut self.email, &mut self.errors.email),
            BuyerField::Address => (&mut self.address, &mut self.errors.address),
            BuyerField::City => (&mut self.city, &mut self.errors.city),
            BuyerField::Zip => (&mut self.zip, &mut self.errors.zip),
        }
    }

    /// Validates the form for submission, flagging exactly the blank
    /// fields. Returns `true` when everything required is present.
    pub fn validate(&mut self) -> bool {
        let blank = |value: &str| value.trim().is_empty();
        self.errors = CheckoutErrors {
            name: blank(&self.name),
            phone: blank(&self.phone),
            email: blank(&self.email),
            address: blank(&self.address),
            city: blank(&self.city),
            zip: blank(&self.zip),
            upi_id: self.payment_method == PaymentMethod::Upi && blank(&self.upi_id),
        };
        !self.errors.any()
    }
}

/// Cart state: items, flow position, and the pending size selection on the
/// product page
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CartState {
    /// Selected items, in add order
    pub items: Vec<CartItem>,
    /// Checkout flow position
    pub flow: CartFlowState,
    /// Size picked on the product page, if any
    pub selected_size: Option<Size>,
    /// Add-to-cart was attempted without a size; self-clears shortly
    pub size_error: bool,
    /// Checkout form contents
    pub checkout: CheckoutForm,
}

impl CartState {
    /// Order total in cents: sum of quantity times effective price over all
    /// items. Computed on demand, never cached.
    #[must_use]
    pub fn total_cents(&self) -> u32 {
        self.items.iter().map(CartItem::line_total_cents).sum()
    }

    /// Total number of units across all items
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Adds one unit of `(product, size)`, merging into an existing entry
    /// with the same key.
    pub fn upsert(&mut self, product: Product, size: Size) {
        let existing = self
            .items
            .iter_mut()
            .find(|item| item.product.id == product.id && item.selected_size == size);
        match existing {
            Some(item) => item.quantity += 1,
            None => self.items.push(CartItem {
                product,
                selected_size: size,
                quantity: 1,
            }),
        }
    }
}

/// Cart and checkout actions
#[derive(Clone, Debug)]
pub enum CartAction {
    /// Pick a size on the product page
    SelectSize(Size),
    /// Add one unit of a product in the selected size, opening the cart
    AddToCart {
        /// Product to add
        product_id: ProductId,
    },
    /// Add and jump straight to checkout
    BuyNow {
        /// Product to buy
        product_id: ProductId,
    },
    /// Open the cart modal without adding anything
    OpenCart,
    /// Dismiss the modal, keeping items and form contents
    CloseFlow,
    /// The size-error display window elapsed
    ClearSizeError,
    /// Move from cart review to the checkout form
    ProceedToCheckout,
    /// Back-navigate from checkout to cart review, keeping the form
    BackToCart,
    /// Edit one buyer field
    SetBuyerField {
        /// Which field
        field: BuyerField,
        /// New value
        value: String,
    },
    /// Choose the payment method
    SelectPaymentMethod(PaymentMethod),
    /// Edit the UPI id
    SetUpiId(String),
    /// Submit the checkout form
    PlaceOrder,
}

/// Adds a product through the auth and size gates, landing the flow on
/// `target` when both pass.
fn add_gated(
    state: &mut AppState,
    env: &AppEnv,
    product_id: &ProductId,
    target: CartFlowState,
) -> SmallVec<[Effect<AppAction>; 4]> {
    if !state.session.is_authenticated() {
        session::open_auth_prompt(&mut state.session);
        return SmallVec::new();
    }
    let Some(size) = state.cart.selected_size else {
        state.cart.size_error = true;
        return smallvec![Effect::delay(
            env.latency.size_error_clear,
            AppAction::Cart(CartAction::ClearSizeError),
        )];
    };
    let Some(product) = state.catalog.get(product_id).cloned() else {
        tracing::warn!(%product_id, "add to cart for unknown product");
        return SmallVec::new();
    };
    state.cart.upsert(product, size);
    state.cart.flow = target;
    SmallVec::new()
}

/// Reduces a cart action against the whole app state.
pub fn reduce(
    state: &mut AppState,
    action: CartAction,
    env: &AppEnv,
) -> SmallVec<[Effect<AppAction>; 4]> {
    match action {
        CartAction::SelectSize(size) => {
            state.cart.selected_size = Some(size);
            state.cart.size_error = false;
            SmallVec::new()
        },

        CartAction::AddToCart { product_id } => {
            add_gated(state, env, &product_id, CartFlowState::Cart)
        },

        CartAction::BuyNow { product_id } => {
            add_gated(state, env, &product_id, CartFlowState::Checkout)
        },

        CartAction::OpenCart => {
            if state.session.is_authenticated() {
                state.cart.flow = CartFlowState::Cart;
            } else {
                session::open_auth_prompt(&mut state.session);
            }
            SmallVec::new()
        },

        CartAction::CloseFlow => {
            // Items and form survive; only the modal dismisses.
            state.cart.flow = CartFlowState::Closed;
            SmallVec::new()
        },

        CartAction::ClearSizeError => {
            state.cart.size_error = false;
            SmallVec::new()
        },

        CartAction::ProceedToCheckout => {
            if state.cart.flow != CartFlowState::Cart || state.cart.items.is_empty() {
                return SmallVec::new();
            }
            if state.session.is_authenticated() {
                state.cart.flow = CartFlowState::Checkout;
            } else {
                session::open_auth_prompt(&mut state.session);
            }
            SmallVec::new()
        },

        CartAction::BackToCart => {
            if state.cart.flow == CartFlowState::Checkout {
                state.cart.flow = CartFlowState::Cart;
            }
            SmallVec::new()
        },

        CartAction::SetBuyerField { field, value } => {
            let (slot, error_flag) = state.cart.checkout.field_mut(field);
            if !value.trim().is_empty() {
                *error_flag = false;
            }
            *slot = value;
            SmallVec::new()
        },

        CartAction::SelectPaymentMethod(method) => {
            state.cart.checkout.payment_method = method;
            SmallVec::new()
        },

        CartAction::SetUpiId(value) => {
            if !value.trim().is_empty() {
                state.cart.checkout.errors.upi_id = false;
            }
            state.cart.checkout.upi_id = value;
            SmallVec::new()
        },

        CartAction::PlaceOrder => {
            if state.cart.flow != CartFlowState::Checkout {
                return SmallVec::new();
            }
            if state.cart.checkout.validate() {
                tracing::info!(total_cents = state.cart.total_cents(), "order placed");
                state.cart.flow = CartFlowState::Success;
            }
            SmallVec::new()
        },
    }
}
