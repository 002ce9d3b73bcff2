mod report;

use anyhow::Context;
use chrono::{Datelike, Local};
use tracing_subscriber::EnvFilter;

use financesk_sdk::models::{AccountQuery, LoginRequest, TransactionSearchParams};
use financesk_sdk::store::month_bounds;
use financesk_sdk::FinanceSdk;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let sdk = FinanceSdk::builder()
        .build()
        .context("failed to initialize the FinancesK SDK")?;
    eprintln!("{}", sdk);

    if !sdk.session().is_authenticated() {
        let username = std::env::var("FINANCESK_USER").context("FINANCESK_USER is not set")?;
        let password =
            std::env::var("FINANCESK_PASSWORD").context("FINANCESK_PASSWORD is not set")?;
        sdk.session()
            .login(&LoginRequest::new(username, password))
            .await
            .context("login failed")?;
    }
    let user_id = sdk
        .session()
        .user_id()
        .context("no authenticated user")?;

    if sdk.onboarding().should_auto_start() {
        sdk.onboarding().start()?;
    }

    let today = Local::now().date_naive();
    let (start, end) = month_bounds(today);

    // Stores are independent; load them side by side.
    let (accounts, transactions, categories, balance) = tokio::join!(
        sdk.accounts().load(AccountQuery::for_user(user_id)),
        sdk.transactions()
            .load(TransactionSearchParams::new(user_id, start, end)),
        sdk.categories().load(()),
        sdk.balance().load_current_month(user_id, None),
    );
    for (name, result) in [
        ("accounts", accounts),
        ("transactions", transactions),
        ("categories", categories),
        ("balance", balance.map(|_| ())),
    ] {
        if let Err(e) = result {
            tracing::warn!(store = name, error = %e, "could not load");
        }
    }

    println!("FinancesK: {}/{}", today.month(), today.year());
    print!("{}", report::render(&sdk));
    Ok(())
}
