//! CLI demo for the EcoWear storefront.
//!
//! Drives a full shopping session against a real [`Store`]: browse the
//! catalog, sign up, pick a role, add to the cart, and place an order. The
//! session and account registry are persisted under `./ecowear-data`, so a
//! second run starts signed in.

use ecowear_core::environment::SystemClock;
use ecowear_runtime::Store;
use ecowear_storefront::app::{AppAction, AppEnv, AppReducer, AppState};
use ecowear_storefront::cart::{BuyerField, CartAction};
use ecowear_storefront::persistence::FileStorage;
use ecowear_storefront::session::SessionAction;
use ecowear_storefront::types::{CategoryFilter, Size, UserRole};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("=== EcoWear Storefront ===\n");

    let env = AppEnv::new(
        Arc::new(SystemClock),
        Arc::new(FileStorage::new("ecowear-data")),
    );
    let store = Store::new(AppState::restore(&env), AppReducer, env);

    // Browse the catalog
    let (count, signed_in) = store
        .state(|state: &AppState| {
            (state.catalog.len(), state.session.is_authenticated())
        })
        .await;
    println!("Catalog: {count} products");
    store
        .state(|state: &AppState| {
            for product in state.catalog.filter(CategoryFilter::All) {
                println!(
                    "  {:<26} {:<18} ${:>6.2}  eco {:>3} ({})",
                    product.name,
                    product.brand,
                    f64::from(product.effective_price_cents()) / 100.0,
                    product.eco_score.total,
                    product.eco_score.grade().label(),
                );
            }
        })
        .await;

    if signed_in {
        let email = store
            .state(|state: &AppState| {
                state
                    .session
                    .current_user
                    .as_ref()
                    .map(|user| user.email.clone())
                    .unwrap_or_default()
            })
            .await;
        println!("\nWelcome back, {email} (session restored from disk)");
    } else {
        // Sign up; the credential check runs behind a simulated delay.
        println!("\nSigning up jamie.rivers@gmail.com...");
        let mut handle = store
            .send(AppAction::Session(SessionAction::Submit {
                mode: ecowear_storefront::session::AuthMode::SignUp,
                name: "Jamie Rivers".to_string(),
                email: "jamie.rivers@gmail.com".to_string(),
                phone: "415-555-0142".to_string(),
                password: "composted".to_string(),
            }))
            .await?;
        handle.wait().await;
        store
            .send(AppAction::Session(SessionAction::SelectRole(
                UserRole::Buyer,
            )))
            .await?;
        println!("Signed up and signed in as a buyer");
    }

    // Add the first catalog product to the cart and check out.
    let product_id = store
        .state(|state: &AppState| state.catalog.products[0].id.clone())
        .await;
    println!("\nAdding to cart (size M)...");
    store
        .send(AppAction::Cart(CartAction::SelectSize(Size::M)))
        .await?;
    store
        .send(AppAction::Cart(CartAction::AddToCart {
            product_id: product_id.clone(),
        }))
        .await?;
    store
        .send(AppAction::Cart(CartAction::AddToCart { product_id }))
        .await?;

    let (units, total) = store
        .state(|state: &AppState| (state.cart.unit_count(), state.cart.total_cents()))
        .await;
    println!("Cart: {units} units, total ${:.2}", f64::from(total) / 100.0);

    println!("\nChecking out...");
    store
        .send(AppAction::Cart(CartAction::ProceedToCheckout))
        .await?;
    for (field, value) in [
        (BuyerField::Name, "Jamie Rivers"),
        (BuyerField::Phone, "415-555-0142"),
        (BuyerField::Email, "jamie.rivers@gmail.com"),
        (BuyerField::Address, "18 Fern Alley"),
        (BuyerField::City, "San Francisco"),
        (BuyerField::Zip, "94133"),
    ] {
        store
            .send(AppAction::Cart(CartAction::SetBuyerField {
                field,
                value: value.to_string(),
            }))
            .await?;
    }
    store.send(AppAction::Cart(CartAction::PlaceOrder)).await?;

    let flow = store.state(|state: &AppState| state.cart.flow).await;
    println!("Order state: {flow:?}");

    println!("\n=== Demo Complete ===");
    Ok(())
}
