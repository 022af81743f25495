//! Builders wiring adapters and services into [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use complaint_desk::domain::ports::{AuditLedger, ComplaintRepository, UserRepository};
use complaint_desk::domain::{
    AccountServiceImpl, BearerIdentityResolver, ComplaintWorkflow, TokenKeyring, TokenService,
    TransitionPolicy,
};
use complaint_desk::inbound::http::state::{HttpState, HttpStatePorts};
use complaint_desk::outbound::memory::InMemoryStore;
use complaint_desk::outbound::password::Argon2PasswordHasher;
use complaint_desk::outbound::persistence::{
    DbPool, DieselAuditLedger, DieselComplaintRepository, DieselUserRepository,
};

/// Adapters behind the driven ports.
struct Adapters<U, R, L> {
    users: Arc<U>,
    complaints: Arc<R>,
    ledger: Arc<L>,
}

fn wire<U, R, L>(
    adapters: Adapters<U, R, L>,
    tokens: Arc<TokenService>,
    clock: Arc<dyn Clock>,
    policy: TransitionPolicy,
) -> HttpState
where
    U: UserRepository + 'static,
    R: ComplaintRepository + 'static,
    L: AuditLedger + 'static,
{
    let Adapters {
        users,
        complaints,
        ledger,
    } = adapters;
    let workflow = Arc::new(
        ComplaintWorkflow::new(complaints, ledger, users.clone(), clock.clone())
            .with_policy(policy),
    );
    HttpState::new(HttpStatePorts {
        accounts: Arc::new(AccountServiceImpl::new(
            users.clone(),
            Arc::new(Argon2PasswordHasher::new()),
            tokens.clone(),
            clock,
        )),
        complaints: workflow.clone(),
        complaints_query: workflow,
        identity: Arc::new(BearerIdentityResolver::new(tokens, users)),
    })
}

/// Build the shared HTTP state from the server configuration.
///
/// Uses the Diesel adapters when a pool is configured, otherwise an
/// in-memory store whose contents vanish on restart.
pub(super) fn build_http_state(
    keyring: TokenKeyring,
    db_pool: Option<&DbPool>,
    policy: TransitionPolicy,
) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let tokens = Arc::new(TokenService::new(keyring, clock.clone()));
    info!(kid = tokens.active_key_id(), policy = ?policy, "building HTTP state");

    let state = match db_pool {
        Some(pool) => wire(
            Adapters {
                users: Arc::new(DieselUserRepository::new(pool.clone())),
                complaints: Arc::new(DieselComplaintRepository::new(pool.clone())),
                ledger: Arc::new(DieselAuditLedger::new(pool.clone())),
            },
            tokens,
            clock,
            policy,
        ),
        None => {
            warn!("no database configured; complaints are kept in memory only");
            let store = Arc::new(InMemoryStore::new());
            wire(
                Adapters {
                    users: store.clone(),
                    complaints: store.clone(),
                    ledger: store,
                },
                tokens,
                clock,
                policy,
            )
        }
    };
    web::Data::new(state)
}
