use crate::schema::{
    AmountField, BalanceSheet, BalanceSheetTotals, LeadSheetTree, RetainedEarnings, StatementLine,
    YearBalanceSheet,
};
use crate::taxonomy::StatementTaxonomy;

/// Absolute difference below which accumulated whole-unit rounding drift is
/// still considered balanced.
pub const BALANCE_TOLERANCE: f64 = 1.0;

/// Derives the two-year balance sheet from the tree and the retained
/// earnings roll-forward.
///
/// The raw equity sum excludes the current-year P&L branch and the
/// retained-earnings ledger lead sheet: both would double-count against the
/// roll-forward value, which is added in their place.
pub fn derive_balance_sheet(
    tree: &LeadSheetTree,
    retained_earnings: &RetainedEarnings,
    taxonomy: &StatementTaxonomy,
    current_year: i32,
) -> BalanceSheet {
    BalanceSheet {
        current_year: derive_year(
            tree,
            taxonomy,
            AmountField::FinalBalance,
            retained_earnings.current_year.value,
            current_year,
        ),
        prior_year: derive_year(
            tree,
            taxonomy,
            AmountField::PriorYear,
            retained_earnings.prior_year.value,
            current_year - 1,
        ),
    }
}

fn derive_year(
    tree: &LeadSheetTree,
    taxonomy: &StatementTaxonomy,
    field: AmountField,
    retained_value: f64,
    year: i32,
) -> YearBalanceSheet {
    let assets = group_line(tree, &taxonomy.assets_group, field, &[], &[]);
    let liabilities = group_line(tree, &taxonomy.liabilities_group, field, &[], &[]);

    let mut equity = group_line(
        tree,
        &taxonomy.equity_group,
        field,
        &[taxonomy.profit_and_loss_subgroup.as_str()],
        &[taxonomy.retained_earnings_lead.as_str()],
    );
    equity.value += retained_value;

    let total_assets = assets.clone();
    let total_equity_and_liabilities = StatementLine {
        value: equity.value + liabilities.value,
        accounts: equity
            .accounts
            .iter()
            .chain(liabilities.accounts.iter())
            .cloned()
            .collect(),
    };

    let balanced = (assets.value - (liabilities.value + equity.value)).abs() < BALANCE_TOLERANCE;

    YearBalanceSheet {
        year,
        totals: BalanceSheetTotals {
            assets,
            liabilities,
            equity,
            total_assets,
            total_equity_and_liabilities,
        },
        balanced,
    }
}

/// Sums one stored field over every lead sheet under a top-level group,
/// skipping whole second-level branches and individual lead sheets by
/// label, and collects the contributing lead-sheet ids.
fn group_line(
    tree: &LeadSheetTree,
    group_label: &str,
    field: AmountField,
    skip_subgroups: &[&str],
    skip_lead_sheets: &[&str],
) -> StatementLine {
    let mut line = StatementLine::default();

    let Some(group) = tree.find_group(group_label) else {
        return line;
    };

    for subgroup in &group.subgroups {
        if skip_subgroups.contains(&subgroup.label.as_str()) {
            continue;
        }
        for lead in &subgroup.lead_sheets {
            if skip_lead_sheets.contains(&lead.label.as_str()) {
                continue;
            }
            line.value += lead.totals.get(field);
            line.accounts.push(lead.id.clone());
        }
    }

    line
}
