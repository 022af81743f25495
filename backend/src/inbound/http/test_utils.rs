//! Test helpers for inbound HTTP components.
//!
//! [`TestContext`] wires the real services over the in-memory store so
//! handler tests exercise authentication, scoping and auditing end to end.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use chrono::{DateTime, Utc};

use crate::domain::ports::UserRepository;
use crate::domain::{
    AccountServiceImpl, BearerIdentityResolver, ComplaintWorkflow, Role, SigningKey,
    TokenKeyring, TokenService, User, UserDraft, UserId,
};
use crate::inbound::http::error::{json_error_handler, query_error_handler};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryStore;
use crate::outbound::password::Argon2PasswordHasher;
use crate::test_support::MutableClock;

const SIGNING_SECRET: &[u8] = b"http-test-signing-secret-of-32-bytes";

fn epoch() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-03-02T08:00:00Z")
        .expect("timestamp")
        .with_timezone(&Utc)
}

/// In-memory application stack shared by handler tests.
pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub tokens: Arc<TokenService>,
    pub clock: Arc<MutableClock>,
}

impl TestContext {
    pub fn new() -> Self {
        let clock = Arc::new(MutableClock::new(epoch()));
        let tokens = Arc::new(TokenService::new(
            TokenKeyring::new(SigningKey::new(SIGNING_SECRET.to_vec())),
            clock.clone(),
        ));
        Self {
            store: Arc::new(InMemoryStore::new()),
            tokens,
            clock,
        }
    }

    /// HTTP state backed by this context's store.
    pub fn state(&self) -> HttpState {
        let workflow = Arc::new(ComplaintWorkflow::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.clock.clone(),
        ));
        HttpState::new(HttpStatePorts {
            accounts: Arc::new(AccountServiceImpl::new(
                self.store.clone(),
                Arc::new(Argon2PasswordHasher::new()),
                self.tokens.clone(),
                self.clock.clone(),
            )),
            complaints: workflow.clone(),
            complaints_query: workflow,
            identity: Arc::new(BearerIdentityResolver::new(
                self.tokens.clone(),
                self.store.clone(),
            )),
        })
    }

    /// `Authorization` header value for a token naming `user_id`.
    pub fn bearer_for(&self, user_id: UserId) -> String {
        format!("Bearer {}", self.tokens.issue(user_id).expect("token"))
    }

    /// Insert a user directly and return it with a bearer header.
    ///
    /// The stored hash is a placeholder, so seeded users cannot log in.
    pub async fn seed_user(&self, username: &str, role: Role) -> (User, String) {
        let user = User::try_from(UserDraft {
            id: UserId::random(),
            full_name: format!("{username} Tester"),
            username: username.to_owned(),
            email: format!("{username}@university.edu"),
            role,
            department: Some("Facilities".to_owned()),
            phone: None,
            created_at: epoch(),
        })
        .expect("valid user");
        self.store
            .insert(&user, "placeholder-hash")
            .await
            .expect("user inserted");
        let bearer = self.bearer_for(user.id());
        (user, bearer)
    }
}

/// Application with the production extractor configuration and routes.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .configure(super::configure)
}
