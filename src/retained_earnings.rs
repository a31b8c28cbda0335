use crate::schema::{IncomeStatement, LeadSheetTree, RetainedEarnings, YearValue};
use crate::taxonomy::StatementTaxonomy;

/// Rolls retained earnings forward: prior-year ledger balance plus the
/// derived current-year net result.
///
/// The retained-earnings lead sheet's own final balance is deliberately
/// ignored; the ledger figure is informational and the roll-forward is the
/// value the balance sheet consumes. A missing lead sheet contributes zero.
pub fn derive_retained_earnings(
    tree: &LeadSheetTree,
    income_statement: &IncomeStatement,
    taxonomy: &StatementTaxonomy,
    current_year: i32,
) -> RetainedEarnings {
    let opening_balance = tree
        .find_group(&taxonomy.equity_group)
        .and_then(|group| group.find_subgroup(&taxonomy.retained_earnings_subgroup))
        .and_then(|subgroup| subgroup.find_lead_sheet(&taxonomy.retained_earnings_lead))
        .map(|lead| lead.totals.prior_year)
        .unwrap_or(0.0);

    RetainedEarnings {
        current_year: YearValue {
            year: current_year,
            value: opening_balance + income_statement.current_year.net_result,
        },
        prior_year: YearValue {
            year: current_year - 1,
            value: opening_balance,
        },
    }
}
