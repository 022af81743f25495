//! Create technician and administrator accounts.
//!
//! Public registration only creates students, so staff accounts are
//! provisioned out of band. The password is read from `SEED_STAFF_PASSWORD`
//! to keep it out of shell history and process listings.

use std::env;
use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;
use complaint_desk::domain::ports::AccountService;
use complaint_desk::domain::{
    AccountServiceImpl, Registration, RegistrationParts, Role, SigningKey, TokenKeyring,
    TokenService,
};
use complaint_desk::outbound::password::Argon2PasswordHasher;
use complaint_desk::outbound::persistence::{
    DbPool, DieselUserRepository, PoolConfig, run_pending_migrations,
};
use mockable::{Clock, DefaultClock};
use rand::RngCore;
use tokio::runtime::Builder;
use zeroize::Zeroizing;

const PASSWORD_ENV: &str = "SEED_STAFF_PASSWORD";

/// `seed-staff` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "seed-staff",
    about = "Provision a technician or administrator account",
    version
)]
struct CliArgs {
    /// Staff role: `technician` or `admin`.
    #[arg(long, value_parser = parse_role)]
    role: Role,
    #[arg(long = "full-name", value_name = "name")]
    full_name: String,
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    department: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    /// Database connection URL. Falls back to `COMPLAINTS_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn parse_role(raw: &str) -> Result<Role, String> {
    match raw.parse::<Role>() {
        Ok(Role::Student) => Err("students register through the API".to_owned()),
        Ok(role) => Ok(role),
        Err(error) => Err(error.to_string()),
    }
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let password = Zeroizing::new(env::var(PASSWORD_ENV).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{PASSWORD_ENV} must hold the new account's password"),
        )
    })?);
    let registration = Registration::try_from_parts(RegistrationParts {
        full_name: &args.full_name,
        username: &args.username,
        email: &args.email,
        password: password.as_str(),
        department: args.department.as_deref(),
        phone: args.phone.as_deref(),
    })
    .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error.to_string()))?;

    let database_url = args
        .database_url
        .or_else(|| env::var("COMPLAINTS_DATABASE_URL").ok())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "pass --database-url or set COMPLAINTS_DATABASE_URL",
            )
        })?;
    run_pending_migrations(&database_url)
        .await
        .map_err(|error| io::Error::other(format!("apply migrations: {error}")))?;
    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let accounts = AccountServiceImpl::new(
        Arc::new(DieselUserRepository::new(pool)),
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(TokenService::new(unused_keyring(), clock.clone())),
        clock,
    );
    let user = accounts
        .provision_staff(registration, args.role)
        .await
        .map_err(|error| io::Error::other(format!("provision account: {}", error.message())))?;

    let mut out = io::stdout().lock();
    writeln!(out, "id={}", user.id())?;
    writeln!(out, "username={}", user.username().as_str())?;
    writeln!(out, "role={}", user.role())
}

/// Provisioning never issues tokens, so a throwaway key suffices.
fn unused_keyring() -> TokenKeyring {
    let mut secret = vec![0_u8; 32];
    rand::thread_rng().fill_bytes(&mut secret);
    TokenKeyring::new(SigningKey::new(secret))
}
