//! Session and identity: the simulated account registry, sign-in/sign-up,
//! role selection, and logout.
//!
//! Sign-up validates locally (gmail rule, phone digits, password length)
//! before any simulated latency; the duplicate-email conflict is only
//! checked at finalization, after the auth delay. Sign-in reports one
//! generic credential error regardless of which part was wrong.

use crate::app::{AppAction, AppEnv, AppState, Page};
use crate::error::AuthError;
use crate::persistence;
use crate::types::{AccountRecord, User, UserId, UserRole};
use ecowear_core::{Effect, SmallVec, smallvec};
use serde::{Deserialize, Serialize};

/// Which form the auth modal is showing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthMode {
    /// Existing account
    SignIn,
    /// New account
    SignUp,
}

/// Credentials as typed into the auth form
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialDraft {
    /// Full name (sign-up only, may be blank)
    pub name: String,
    /// Email address
    pub email: String,
    /// Phone number as typed (sign-up only, may be blank)
    pub phone: String,
    /// Password
    pub password: String,
}

/// State machine for the auth modal
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthFlowState {
    /// Modal dismissed
    #[default]
    Closed,
    /// Credential form showing
    Form {
        /// Sign-in or sign-up
        mode: AuthMode,
        /// A simulated auth call is in flight; resubmission is ignored
        processing: bool,
        /// Last failure, shown inline
        error: Option<AuthError>,
        /// What has been typed so far
        draft: CredentialDraft,
    },
    /// Sign-up passed credential checks; the account is only created once
    /// a role is chosen
    RoleSelection {
        /// Validated sign-up fields carried into finalization
        draft: CredentialDraft,
    },
}

impl AuthFlowState {
    /// Whether the modal is showing
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Whether a simulated auth call is in flight
    #[must_use]
    pub const fn is_processing(&self) -> bool {
        matches!(
            self,
            Self::Form {
                processing: true,
                ..
            }
        )
    }
}

/// Session state: the account registry, the current user, and the auth
/// modal
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SessionState {
    /// All registered accounts, credential included
    pub registry: Vec<AccountRecord>,
    /// The logged-in user, if any
    pub current_user: Option<User>,
    /// Auth modal state
    pub auth_flow: AuthFlowState,
}

impl SessionState {
    /// Whether someone is logged in
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    /// Role of the logged-in user, if any
    #[must_use]
    pub fn role(&self) -> Option<UserRole> {
        self.current_user.as_ref().map(|u| u.role)
    }
}

/// Opens the auth prompt for a gated action, leaving an already-open flow
/// untouched.
pub fn open_auth_prompt(session: &mut SessionState) {
    if !session.auth_flow.is_open() {
        session.auth_flow = AuthFlowState::Form {
            mode: AuthMode::SignIn,
            processing: false,
            error: None,
            draft: CredentialDraft::default(),
        };
    }
}

/// Session actions
#[derive(Clone, Debug)]
pub enum SessionAction {
    /// Show the auth modal
    OpenAuth,
    /// Dismiss the auth modal
    CloseAuth,
    /// Switch between sign-in and sign-up
    SwitchMode(AuthMode),
    /// Submit the credential form
    Submit {
        /// Sign-in or sign-up
        mode: AuthMode,
        /// Full name (sign-up)
        name: String,
        /// Email address
        email: String,
        /// Phone number (sign-up)
        phone: String,
        /// Password
        password: String,
    },
    /// The simulated auth delay elapsed; finish credential checking
    CredentialCheckCompleted,
    /// Finalize sign-up with an explicit role choice
    SelectRole(UserRole),
    /// End the session
    Logout,
}

/// Checks the fixed gmail.com business rule: a non-empty mailbox of
/// permitted characters followed by exactly `@gmail.com`.
#[must_use]
pub fn is_gmail_address(email: &str) -> bool {
    let Some(local) = email.strip_suffix("@gmail.com") else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-'))
}

/// Number of digits in a phone number once formatting is stripped
#[must_use]
pub fn phone_digit_count(phone: &str) -> usize {
    phone.chars().filter(char::is_ascii_digit).count()
}

/// Sign-up pre-submit validation, in order, short-circuiting on the first
/// failure.
fn validate_signup(draft: &CredentialDraft) -> Result<(), AuthError> {
    if !is_gmail_address(&draft.email) {
        return Err(AuthError::InvalidGmailAddress);
    }
    if phone_digit_count(&draft.phone) < 10 {
        return Err(AuthError::PhoneTooShort);
    }
    if draft.password.len() < 6 {
        return Err(AuthError::PasswordTooShort);
    }
    Ok(())
}

fn establish_session(state: &mut AppState, env: &AppEnv, user: User) {
    persistence::save_session(env.storage.as_ref(), &user);
    let is_seller = user.role == UserRole::Seller;
    state.session.current_user = Some(user);
    state.session.auth_flow = AuthFlowState::Closed;
    if is_seller {
        state.page = Page::Seller;
    }
}

/// Reduces a session action against the whole app state.
pub fn reduce(
    state: &mut AppState,
    action: SessionAction,
    env: &AppEnv,
) -> SmallVec<[Effect<AppAction>; 4]> {
    match action {
        SessionAction::OpenAuth => {
            open_auth_prompt(&mut state.session);
            SmallVec::new()
        },

        SessionAction::CloseAuth => {
            state.session.auth_flow = AuthFlowState::Closed;
            SmallVec::new()
        },

        SessionAction::SwitchMode(mode) => {
            match &mut state.session.auth_flow {
                AuthFlowState::Form {
                    mode: current,
                    processing: false,
                    error,
                    ..
                } => {
                    *current = mode;
                    *error = None;
                },
                // Ignored mid-flight and outside the form step.
                _ => {},
            }
            SmallVec::new()
        },

        SessionAction::Submit {
            mode,
            name,
            email,
            phone,
            password,
        } => {
            if state.session.auth_flow.is_processing() {
                tracing::debug!("auth submit ignored while processing");
                return SmallVec::new();
            }
            let draft = CredentialDraft {
                name,
                email,
                phone,
                password,
            };
            if mode == AuthMode::SignUp {
                if let Err(error) = validate_signup(&draft) {
                    state.session.auth_flow = AuthFlowState::Form {
                        mode,
                        processing: false,
                        error: Some(error),
                        draft,
                    };
                    return SmallVec::new();
                }
            }
            state.session.auth_flow = AuthFlowState::Form {
                mode,
                processing: true,
                error: None,
                draft,
            };
            smallvec![Effect::delay(
                env.latency.auth,
                AppAction::Session(SessionAction::CredentialCheckCompleted),
            )]
        },

        SessionAction::CredentialCheckCompleted => {
            let AuthFlowState::Form {
                mode,
                processing: true,
                draft,
                ..
            } = state.session.auth_flow.clone()
            else {
                return SmallVec::new();
            };
            match mode {
                AuthMode::SignIn => {
                    let matched = state
                        .session
                        .registry
                        .iter()
                        .find(|record| {
                            record.user.email == draft.email && record.password == draft.password
                        })
                        .map(|record| record.user.clone());
                    match matched {
                        Some(user) => {
                            tracing::info!(email = %user.email, "signed in");
                            establish_session(state, env, user);
                        },
                        None => {
                            state.session.auth_flow = AuthFlowState::Form {
                                mode,
                                processing: false,
                                error: Some(AuthError::InvalidCredentials),
                                draft,
                            };
                        },
                    }
                },
                AuthMode::SignUp => {
                    let exists = state
                        .session
                        .registry
                        .iter()
                        .any(|record| record.user.email == draft.email);
                    if exists {
                        state.session.auth_flow = AuthFlowState::Form {
                            mode,
                            processing: false,
                            error: Some(AuthError::EmailAlreadyRegistered),
                            draft,
                        };
                    } else {
                        state.session.auth_flow = AuthFlowState::RoleSelection { draft };
                    }
                },
            }
            SmallVec::new()
        },

        SessionAction::SelectRole(role) => {
            let AuthFlowState::RoleSelection { draft } = state.session.auth_flow.clone() else {
                return SmallVec::new();
            };
            let name = if draft.name.trim().is_empty() {
                draft
                    .email
                    .split('@')
                    .next()
                    .unwrap_or_default()
                    .to_string()
            } else {
                draft.name.clone()
            };
            let phone = if draft.phone.trim().is_empty() {
                "Not provided".to_string()
            } else {
                draft.phone.clone()
            };
            let user = User {
                id: UserId::new(),
                name,
                email: draft.email.clone(),
                phone,
                role,
                avatar: String::new(),
                bio: Some(role.default_bio().to_string()),
            };
            state.session.registry.push(AccountRecord {
                user: user.clone(),
                password: draft.password,
            });
            persistence::save_registry(env.storage.as_ref(), &state.session.registry);
            tracing::info!(email = %user.email, role = ?role, "account created");
            establish_session(state, env, user);
            SmallVec::new()
        },

        SessionAction::Logout => {
            persistence::clear_session(env.storage.as_ref());
            state.session.current_user = None;
            state.session.auth_flow = AuthFlowState::Closed;
            state.page = Page::Home;
            SmallVec::new()
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)] // Test code can use unwrap
mod tests {
    use super::*;
    use crate::app::{AppReducer, SimulatedLatency};
    use crate::persistence::{SESSION_KEY, USERS_KEY};
    use ecowear_core::environment::Storage;
    use ecowear_testing::{InMemoryStorage, ReducerTest, assertions, test_clock};
    use std::sync::Arc;

    fn test_env() -> AppEnv {
        AppEnv {
            clock: Arc::new(test_clock()),
            storage: Arc::new(InMemoryStorage::new()),
            latency: SimulatedLatency::default(),
        }
    }

    fn signup_submit(email: &str, phone: &str, password: &str) -> AppAction {
        AppAction::Session(SessionAction::Submit {
            mode: AuthMode::SignUp,
            name: "Ada Lovelace".to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            password: password.to_string(),
        })
    }

    #[test]
    fn gmail_rule() {
        assert!(is_gmail_address("user@gmail.com"));
        assert!(is_gmail_address("user.name+tag%x_y-z@gmail.com"));
        assert!(!is_gmail_address("user@yahoo.com"));
        assert!(!is_gmail_address("@gmail.com"));
        assert!(!is_gmail_address("us er@gmail.com"));
        assert!(!is_gmail_address("user@gmail.com "));
    }

    #[test]
    fn phone_digit_counting() {
        assert_eq!(phone_digit_count("123-456-7890"), 10);
        assert_eq!(phone_digit_count("(12) 345"), 5);
        assert_eq!(phone_digit_count("no digits"), 0);
    }

    #[test]
    fn signup_rejects_non_gmail_before_any_delay() {
        ReducerTest::new(AppReducer)
            .with_env(test_env())
            .given_state(AppState::new())
            .when_action(signup_submit("user@yahoo.com", "123-456-7890", "secret1"))
            .then_state(|state| {
                assert!(matches!(
                    &state.session.auth_flow,
                    AuthFlowState::Form {
                        processing: false,
                        error: Some(AuthError::InvalidGmailAddress),
                        ..
                    }
                ));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn signup_validation_order_short_circuits() {
        // Bad phone AND bad password: the phone error wins.
        ReducerTest::new(AppReducer)
            .with_env(test_env())
            .given_state(AppState::new())
            .when_action(signup_submit("user@gmail.com", "12345", "abc"))
            .then_state(|state| {
                assert!(matches!(
                    &state.session.auth_flow,
                    AuthFlowState::Form {
                        error: Some(AuthError::PhoneTooShort),
                        ..
                    }
                ));
            })
            .run();
    }

    #[test]
    fn signup_rejects_short_password() {
        ReducerTest::new(AppReducer)
            .with_env(test_env())
            .given_state(AppState::new())
            .when_action(signup_submit("user@gmail.com", "123-456-7890", "abc"))
            .then_state(|state| {
                assert!(matches!(
                    &state.session.auth_flow,
                    AuthFlowState::Form {
                        error: Some(AuthError::PasswordTooShort),
                        ..
                    }
                ));
            })
            .run();
    }

    #[test]
    fn valid_signup_enters_processing_with_auth_delay() {
        let env = test_env();
        let auth_delay = env.latency.auth;
        ReducerTest::new(AppReducer)
            .with_env(env)
            .given_state(AppState::new())
            .when_action(signup_submit("user@gmail.com", "123-456-7890", "secret"))
            .then_state(|state| {
                assert!(state.session.auth_flow.is_processing());
            })
            .then_effects(move |effects| {
                assertions::assert_has_delay_of(effects, auth_delay);
            })
            .run();
    }

    #[test]
    fn resubmission_while_processing_is_ignored() {
        ReducerTest::new(AppReducer)
            .with_env(test_env())
            .given_state(AppState::new())
            .when_action(signup_submit("user@gmail.com", "123-456-7890", "secret"))
            .when_action(signup_submit("other@gmail.com", "123-456-7890", "secret"))
            .then_state(|state| {
                let AuthFlowState::Form { draft, .. } = &state.session.auth_flow else {
                    panic!("expected form state");
                };
                assert_eq!(draft.email, "user@gmail.com");
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn signup_reaches_role_selection_when_email_is_new() {
        ReducerTest::new(AppReducer)
            .with_env(test_env())
            .given_state(AppState::new())
            .when_action(signup_submit("user@gmail.com", "123-456-7890", "secret"))
            .when_action(AppAction::Session(SessionAction::CredentialCheckCompleted))
            .then_state(|state| {
                assert!(matches!(
                    state.session.auth_flow,
                    AuthFlowState::RoleSelection { .. }
                ));
            })
            .run();
    }

    #[test]
    fn duplicate_email_conflict_surfaces_at_finalization() {
        let env = test_env();
        let mut state = AppState::new();
        // Register the account once.
        let reducer = AppReducer;
        run_actions(
            &reducer,
            &mut state,
            &env,
            vec![
                signup_submit("user@gmail.com", "123-456-7890", "secret"),
                AppAction::Session(SessionAction::CredentialCheckCompleted),
                AppAction::Session(SessionAction::SelectRole(UserRole::Buyer)),
                AppAction::Session(SessionAction::Logout),
                // Second sign-up with the same email passes pre-validation...
                signup_submit("user@gmail.com", "987-654-3210", "secret"),
            ],
        );
        assert!(state.session.auth_flow.is_processing());
        // ...and only fails once the simulated call completes.
        run_actions(
            &reducer,
            &mut state,
            &env,
            vec![AppAction::Session(SessionAction::CredentialCheckCompleted)],
        );
        assert!(matches!(
            &state.session.auth_flow,
            AuthFlowState::Form {
                error: Some(AuthError::EmailAlreadyRegistered),
                ..
            }
        ));
        assert_eq!(state.session.registry.len(), 1);
    }

    #[test]
    fn select_role_creates_account_and_session() {
        let env = test_env();
        let mut state = AppState::new();
        run_actions(
            &AppReducer,
            &mut state,
            &env,
            vec![
                signup_submit("user@gmail.com", "123-456-7890", "secret"),
                AppAction::Session(SessionAction::CredentialCheckCompleted),
                AppAction::Session(SessionAction::SelectRole(UserRole::Buyer)),
            ],
        );
        let user = state.session.current_user.as_ref().unwrap();
        assert_eq!(user.name, "Ada Lovelace");
        assert_eq!(user.role, UserRole::Buyer);
        assert_eq!(user.bio.as_deref(), Some(UserRole::Buyer.default_bio()));
        assert_eq!(state.session.registry.len(), 1);
        assert_eq!(state.session.registry[0].password, "secret");
        assert_eq!(state.page, Page::Home);

        // Registry blob carries the password, session blob does not.
        let registry_blob = env.storage.get(USERS_KEY).unwrap();
        assert!(registry_blob.contains("secret"));
        let session_blob = env.storage.get(SESSION_KEY).unwrap();
        assert!(!session_blob.contains("password"));
        assert!(!session_blob.contains("secret"));
    }

    #[test]
    fn seller_signup_routes_to_seller_page() {
        let env = test_env();
        let mut state = AppState::new();
        run_actions(
            &AppReducer,
            &mut state,
            &env,
            vec![
                signup_submit("brand@gmail.com", "123-456-7890", "secret"),
                AppAction::Session(SessionAction::CredentialCheckCompleted),
                AppAction::Session(SessionAction::SelectRole(UserRole::Seller)),
            ],
        );
        assert_eq!(state.page, Page::Seller);
        assert_eq!(state.session.role(), Some(UserRole::Seller));
    }

    #[test]
    fn blank_name_falls_back_to_email_local_part() {
        let env = test_env();
        let mut state = AppState::new();
        run_actions(
            &AppReducer,
            &mut state,
            &env,
            vec![
                AppAction::Session(SessionAction::Submit {
                    mode: AuthMode::SignUp,
                    name: "   ".to_string(),
                    email: "lovelace@gmail.com".to_string(),
                    phone: "123-456-7890".to_string(),
                    password: "secret".to_string(),
                }),
                AppAction::Session(SessionAction::CredentialCheckCompleted),
                AppAction::Session(SessionAction::SelectRole(UserRole::Buyer)),
            ],
        );
        let user = state.session.current_user.as_ref().unwrap();
        assert_eq!(user.name, "lovelace");
    }

    #[test]
    fn signin_mismatch_is_one_generic_error() {
        let env = test_env();
        let mut state = AppState::new();
        run_actions(
            &AppReducer,
            &mut state,
            &env,
            vec![
                signup_submit("user@gmail.com", "123-456-7890", "secret"),
                AppAction::Session(SessionAction::CredentialCheckCompleted),
                AppAction::Session(SessionAction::SelectRole(UserRole::Buyer)),
                AppAction::Session(SessionAction::Logout),
                AppAction::Session(SessionAction::Submit {
                    mode: AuthMode::SignIn,
                    name: String::new(),
                    email: "user@gmail.com".to_string(),
                    phone: String::new(),
                    password: "wrong-password".to_string(),
                }),
                AppAction::Session(SessionAction::CredentialCheckCompleted),
            ],
        );
        assert!(matches!(
            &state.session.auth_flow,
            AuthFlowState::Form {
                error: Some(AuthError::InvalidCredentials),
                ..
            }
        ));
        assert!(!state.session.is_authenticated());
    }

    #[test]
    fn logout_clears_session_and_returns_home() {
        let env = test_env();
        let mut state = AppState::new();
        run_actions(
            &AppReducer,
            &mut state,
            &env,
            vec![
                signup_submit("brand@gmail.com", "123-456-7890", "secret"),
                AppAction::Session(SessionAction::CredentialCheckCompleted),
                AppAction::Session(SessionAction::SelectRole(UserRole::Seller)),
                AppAction::Session(SessionAction::Logout),
            ],
        );
        assert!(!state.session.is_authenticated());
        assert_eq!(state.page, Page::Home);
        assert!(env.storage.get(SESSION_KEY).is_none());
        // The registry survives logout.
        assert!(env.storage.get(USERS_KEY).is_some());
    }

    fn run_actions(
        reducer: &AppReducer,
        state: &mut AppState,
        env: &AppEnv,
        actions: Vec<AppAction>,
    ) {
        use ecowear_core::reducer::Reducer;
        for action in actions {
            let _effects = reducer.reduce(state, action, env);
        }
    }
}
