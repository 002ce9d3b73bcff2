use std::fmt::Write;

use financesk_sdk::currency::{format_brl, from_cents};
use financesk_sdk::{views, FinanceSdk};

/// Plain-text summary of everything the stores currently hold.
pub fn render(sdk: &FinanceSdk) -> String {
    let privacy = sdk.privacy();
    let mut out = String::new();

    let summary = sdk.balance().summary();
    let _ = writeln!(out, "\nBalance this month");
    let _ = writeln!(
        out,
        "  income   {}",
        privacy.display(&format_brl(summary.total_income))
    );
    let _ = writeln!(
        out,
        "  expense  {}  ({}% of income)",
        privacy.display(&format_brl(summary.total_expense)),
        views::expense_ratio(&summary)
    );
    let _ = writeln!(out, "  balance  {}", privacy.display(&format_brl(summary.balance)));

    let accounts = sdk.accounts().items();
    let _ = writeln!(out, "\nAccounts");
    for (bank, group) in views::accounts_by_bank(&accounts) {
        let _ = writeln!(out, "  {}", bank.as_deref().unwrap_or("No institution"));
        for account in group {
            let _ = writeln!(
                out,
                "    {:<24} {}",
                account.account_name,
                privacy.display(&format_brl(from_cents(account.account_current_balance)))
            );
        }
    }
    let _ = writeln!(
        out,
        "  total {}",
        privacy.display(&format_brl(from_cents(views::total_balance(&accounts))))
    );

    let transactions = sdk.transactions().snapshot();
    let categories = sdk.categories().items();
    let totals = views::totals_by_type(transactions.items());
    let _ = writeln!(out, "\nTransactions");
    for tx in transactions.items() {
        let category = views::category_name(&categories, tx.category_id)
            .unwrap_or(tx.category_name.as_str());
        let _ = writeln!(
            out,
            "  {} {:<28} {:<16} {:>8} {}",
            tx.due_date,
            tx.description,
            category,
            tx.transaction_type.as_str(),
            privacy.display(&format_brl(tx.amount))
        );
    }
    if let Some(page) = transactions.pagination() {
        let _ = writeln!(
            out,
            "  page {}/{} of {} transactions",
            page.page + 1,
            page.total_pages.max(1),
            page.total_items
        );
    }
    let _ = writeln!(
        out,
        "  net {}",
        privacy.display(&format_brl(totals.balance()))
    );

    if let Some(step) = sdk.onboarding().current_step() {
        let _ = writeln!(out, "\nNext step: {} ({})", step.title, step.route);
    }
    out
}
