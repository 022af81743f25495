//! Shared HTTP adapter state.
//!
//! Handlers receive this state through `actix_web::web::Data` so they only
//! depend on domain ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountService, ComplaintCommand, ComplaintQuery, IdentityResolver};

/// Parameter object bundling the port implementations handlers need.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountService>,
    pub complaints: Arc<dyn ComplaintCommand>,
    pub complaints_query: Arc<dyn ComplaintQuery>,
    pub identity: Arc<dyn IdentityResolver>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountService>,
    pub complaints: Arc<dyn ComplaintCommand>,
    pub complaints_query: Arc<dyn ComplaintQuery>,
    pub identity: Arc<dyn IdentityResolver>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use complaint_desk::domain::{
    ///     AccountServiceImpl, BearerIdentityResolver, ComplaintWorkflow, SigningKey,
    ///     TokenKeyring, TokenService,
    /// };
    /// use complaint_desk::inbound::http::state::{HttpState, HttpStatePorts};
    /// use complaint_desk::outbound::memory::InMemoryStore;
    /// use complaint_desk::outbound::password::Argon2PasswordHasher;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let clock = Arc::new(DefaultClock);
    /// let tokens = Arc::new(TokenService::new(
    ///     TokenKeyring::new(SigningKey::new(vec![7; 32])),
    ///     clock.clone(),
    /// ));
    /// let workflow = Arc::new(ComplaintWorkflow::new(
    ///     store.clone(),
    ///     store.clone(),
    ///     store.clone(),
    ///     clock.clone(),
    /// ));
    /// let state = HttpState::new(HttpStatePorts {
    ///     accounts: Arc::new(AccountServiceImpl::new(
    ///         store.clone(),
    ///         Arc::new(Argon2PasswordHasher::new()),
    ///         tokens.clone(),
    ///         clock,
    ///     )),
    ///     complaints: workflow.clone(),
    ///     complaints_query: workflow,
    ///     identity: Arc::new(BearerIdentityResolver::new(tokens, store)),
    /// });
    /// let _accounts = state.accounts.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            complaints,
            complaints_query,
            identity,
        } = ports;
        Self {
            accounts,
            complaints,
            complaints_query,
            identity,
        }
    }
}
