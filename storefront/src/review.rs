//! Review submission: a delayed write into the product's review list.
//!
//! Submission requires an authenticated session, a reviewer name, and a
//! comment; a blank name or comment drops the submission silently, matching
//! the inline form which simply does nothing until both are filled. The
//! accepted review is dated from the environment clock and prepended to the
//! product, then a success banner is shown and clears itself shortly after.

use crate::app::{AppAction, AppEnv, AppState};
use crate::session;
use crate::types::{ProductId, Review, ReviewId, ReviewMedia};
use ecowear_core::{Effect, SmallVec, smallvec};

/// A submission waiting out its simulated latency
#[derive(Clone, Debug)]
pub struct PendingReview {
    /// Target product
    pub product_id: ProductId,
    /// Reviewer display name
    pub user: String,
    /// Star rating, clamped to 1..=5
    pub rating: u8,
    /// Eco-accuracy rating, clamped to 1..=5
    pub eco_accuracy_rating: u8,
    /// Review text
    pub comment: String,
    /// Attached media
    pub media: Vec<ReviewMedia>,
}

/// Review form state
#[derive(Clone, Debug, Default)]
pub struct ReviewFormState {
    /// A submission delay is in flight
    pub submitting: bool,
    /// Success banner is showing; self-clears
    pub success: bool,
    /// The submission in flight, if any
    pub pending: Option<PendingReview>,
}

/// Review actions
#[derive(Clone, Debug)]
pub enum ReviewAction {
    /// Submit a review for a product
    Submit {
        /// Target product
        product_id: ProductId,
        /// Reviewer display name
        user: String,
        /// Star rating
        rating: u8,
        /// Eco-accuracy rating
        eco_accuracy_rating: u8,
        /// Review text
        comment: String,
        /// Attached media
        media: Vec<ReviewMedia>,
    },
    /// The submission delay elapsed
    SubmitCompleted,
    /// The success banner display window elapsed
    ClearSuccess,
}

fn clamp_rating(rating: u8) -> u8 {
    rating.clamp(1, 5)
}

/// Reduces a review action against the whole app state.
pub fn reduce(
    state: &mut AppState,
    action: ReviewAction,
    env: &AppEnv,
) -> SmallVec<[Effect<AppAction>; 4]> {
    match action {
        ReviewAction::Submit {
            product_id,
            user,
            rating,
            eco_accuracy_rating,
            comment,
            media,
        } => {
            if !state.session.is_authenticated() {
                session::open_auth_prompt(&mut state.session);
                return SmallVec::new();
            }
            if state.review_form.submitting {
                tracing::debug!("review submit ignored while one is in flight");
                return SmallVec::new();
            }
            // Blank name or comment drops the submission without feedback.
            if user.trim().is_empty() || comment.trim().is_empty() {
                return SmallVec::new();
            }
            state.review_form.pending = Some(PendingReview {
                product_id,
                user,
                rating: clamp_rating(rating),
                eco_accuracy_rating: clamp_rating(eco_accuracy_rating),
                comment,
                media,
            });
            state.review_form.submitting = true;
            smallvec![Effect::delay(
                env.latency.review_submit,
                AppAction::Review(ReviewAction::SubmitCompleted),
            )]
        },

        ReviewAction::SubmitCompleted => {
            let Some(pending) = state.review_form.pending.take() else {
                return SmallVec::new();
            };
            let review = Review {
                id: ReviewId::new(),
                user: pending.user,
                rating: pending.rating,
                eco_accuracy_rating: pending.eco_accuracy_rating,
                comment: pending.comment,
                date: env.clock.now().date_naive(),
                media: pending.media,
            };
            if !state.catalog.add_review(&pending.product_id, review) {
                tracing::warn!(product_id = %pending.product_id, "review for unknown product dropped");
            }
            state.review_form.submitting = false;
            state.review_form.success = true;
            smallvec![Effect::delay(
                env.latency.review_banner_clear,
                AppAction::Review(ReviewAction::ClearSuccess),
            )]
        },

        ReviewAction::ClearSuccess => {
            state.review_form.success = false;
            SmallVec::new()
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use crate::app::{AppReducer, AppState, SimulatedLatency};
    use crate::types::{MediaType, User, UserId, UserRole};
    use chrono::NaiveDate;
    use ecowear_core::reducer::Reducer;
    use ecowear_testing::{InMemoryStorage, ReducerTest, assertions, test_clock};
    use std::sync::Arc;

    fn test_env() -> AppEnv {
        AppEnv {
            clock: Arc::new(test_clock()),
            storage: Arc::new(InMemoryStorage::new()),
            latency: SimulatedLatency::default(),
        }
    }

    fn logged_in_state() -> AppState {
        let mut state = AppState::new();
        state.session.current_user = Some(User {
            id: UserId::new(),
            name: "Ada".to_string(),
            email: "ada@gmail.com".to_string(),
            phone: "1234567890".to_string(),
            role: UserRole::Buyer,
            avatar: String::new(),
            bio: None,
        });
        state
    }

    fn submit(product_id: ProductId, user: &str, comment: &str) -> AppAction {
        AppAction::Review(ReviewAction::Submit {
            product_id,
            user: user.to_string(),
            rating: 5,
            eco_accuracy_rating: 4,
            comment: comment.to_string(),
            media: Vec::new(),
        })
    }

    #[test]
    fn submit_while_logged_out_opens_auth_prompt() {
        let state = AppState::new();
        let product_id = state.catalog.products[0].id.clone();
        ReducerTest::new(AppReducer)
            .with_env(test_env())
            .given_state(state)
            .when_action(submit(product_id, "Ada", "Lovely fabric."))
            .then_state(|state| {
                assert!(state.session.auth_flow.is_open());
                assert!(!state.review_form.submitting);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn blank_name_or_comment_is_dropped_silently() {
        let state = logged_in_state();
        let product_id = state.catalog.products[0].id.clone();
        ReducerTest::new(AppReducer)
            .with_env(test_env())
            .given_state(state)
            .when_action(submit(product_id.clone(), "  ", "Lovely fabric."))
            .when_action(submit(product_id, "Ada", ""))
            .then_state(|state| {
                assert!(!state.review_form.submitting);
                assert!(state.review_form.pending.is_none());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn submit_schedules_the_review_delay() {
        let env = test_env();
        let review_delay = env.latency.review_submit;
        let state = logged_in_state();
        let product_id = state.catalog.products[0].id.clone();
        ReducerTest::new(AppReducer)
            .with_env(env)
            .given_state(state)
            .when_action(submit(product_id, "Ada", "Lovely fabric."))
            .then_state(|state| assert!(state.review_form.submitting))
            .then_effects(move |effects| {
                assertions::assert_has_delay_of(effects, review_delay);
            })
            .run();
    }

    #[test]
    fn completed_review_is_prepended_and_dated_from_the_clock() {
        let env = test_env();
        let mut state = logged_in_state();
        let product_id = state.catalog.products[0].id.clone();
        let before = state.catalog.products[0].reviews.len();

        let _ = AppReducer.reduce(
            &mut state,
            submit(product_id.clone(), "Ada", "Lovely fabric."),
            &env,
        );
        let effects = AppReducer.reduce(
            &mut state,
            AppAction::Review(ReviewAction::SubmitCompleted),
            &env,
        );
        assertions::assert_has_delay_of(&effects, env.latency.review_banner_clear);

        let product = state.catalog.get(&product_id).unwrap();
        assert_eq!(product.reviews.len(), before + 1);
        let newest = &product.reviews[0];
        assert_eq!(newest.user, "Ada");
        assert_eq!(newest.comment, "Lovely fabric.");
        assert_eq!(newest.date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert!(state.review_form.success);
        assert!(!state.review_form.submitting);
    }

    #[test]
    fn success_banner_clears() {
        let env = test_env();
        let mut state = logged_in_state();
        let product_id = state.catalog.products[0].id.clone();
        for action in [
            submit(product_id, "Ada", "Lovely fabric."),
            AppAction::Review(ReviewAction::SubmitCompleted),
            AppAction::Review(ReviewAction::ClearSuccess),
        ] {
            let _ = AppReducer.reduce(&mut state, action, &env);
        }
        assert!(!state.review_form.success);
    }

    #[test]
    fn ratings_are_clamped_into_range() {
        let env = test_env();
        let mut state = logged_in_state();
        let product_id = state.catalog.products[0].id.clone();
        for action in [
            AppAction::Review(ReviewAction::Submit {
                product_id: product_id.clone(),
                user: "Ada".to_string(),
                rating: 9,
                eco_accuracy_rating: 0,
                comment: "Lovely fabric.".to_string(),
                media: Vec::new(),
            }),
            AppAction::Review(ReviewAction::SubmitCompleted),
        ] {
            let _ = AppReducer.reduce(&mut state, action, &env);
        }
        let newest = &state.catalog.get(&product_id).unwrap().reviews[0];
        assert_eq!(newest.rating, 5);
        assert_eq!(newest.eco_accuracy_rating, 1);
    }

    #[test]
    fn media_is_carried_onto_the_review() {
        let env = test_env();
        let mut state = logged_in_state();
        let product_id = state.catalog.products[0].id.clone();
        for action in [
            AppAction::Review(ReviewAction::Submit {
                product_id: product_id.clone(),
                user: "Ada".to_string(),
                rating: 4,
                eco_accuracy_rating: 4,
                comment: "Holding up well.".to_string(),
                media: vec![ReviewMedia {
                    media_type: MediaType::Image,
                    url: "https://example.com/fit.jpg".to_string(),
                }],
            }),
            AppAction::Review(ReviewAction::SubmitCompleted),
        ] {
            let _ = AppReducer.reduce(&mut state, action, &env);
        }
        let newest = &state.catalog.get(&product_id).unwrap().reviews[0];
        assert_eq!(newest.media.len(), 1);
        assert_eq!(newest.media[0].media_type, MediaType::Image);
    }
}
