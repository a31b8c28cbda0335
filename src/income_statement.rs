use crate::schema::{
    AmountField, IncomeStatement, LeadSheetTree, NetResultType, StatementLine, SubgroupNode,
    YearIncomeStatement,
};
use crate::taxonomy::StatementTaxonomy;
use std::collections::BTreeMap;

/// Derives the two-year income statement from the P&L branch of the tree.
///
/// The branch is `equity_group > profit_and_loss_subgroup`; after the
/// normalizer's sign flip its revenue lead sheets carry positive totals and
/// its expense lead sheets negative ones, so every subtotal in the cascade
/// is a plain sum. A missing branch yields the defined empty result (zero
/// net profit, no breakdowns) for both years, not an error.
pub fn derive_income_statement(
    tree: &LeadSheetTree,
    taxonomy: &StatementTaxonomy,
    current_year: i32,
) -> IncomeStatement {
    let branch = tree
        .find_group(&taxonomy.equity_group)
        .and_then(|group| group.find_subgroup(&taxonomy.profit_and_loss_subgroup));

    IncomeStatement {
        current_year: derive_year(branch, taxonomy, AmountField::FinalBalance, current_year),
        prior_year: derive_year(branch, taxonomy, AmountField::PriorYear, current_year - 1),
    }
}

fn derive_year(
    branch: Option<&SubgroupNode>,
    taxonomy: &StatementTaxonomy,
    field: AmountField,
    year: i32,
) -> YearIncomeStatement {
    let mut bucket_totals: BTreeMap<&str, f64> = BTreeMap::new();
    let mut breakdowns: BTreeMap<String, StatementLine> = BTreeMap::new();

    if let Some(branch) = branch {
        for lead in &branch.lead_sheets {
            let total = lead.totals.get(field);
            bucket_totals.insert(lead.label.as_str(), total);
            breakdowns.insert(
                lead.label.clone(),
                StatementLine {
                    value: total.abs(),
                    accounts: vec![lead.id.clone()],
                },
            );
        }
    }

    let tier_sum = |labels: &[String]| -> f64 {
        labels
            .iter()
            .map(|label| bucket_totals.get(label.as_str()).copied().unwrap_or(0.0))
            .sum()
    };

    let gross_profit = tier_sum(&taxonomy.gross_profit_buckets);
    let operating_profit = gross_profit + tier_sum(&taxonomy.operating_buckets);
    let profit_before_tax = operating_profit + tier_sum(&taxonomy.pre_tax_buckets);
    let net_result = profit_before_tax + tier_sum(&taxonomy.tax_buckets);

    let result_type = if net_result >= 0.0 {
        NetResultType::NetProfit
    } else {
        NetResultType::NetLoss
    };

    YearIncomeStatement {
        year,
        net_result,
        result_type,
        breakdowns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_rows;
    use crate::schema::AccountRow;
    use crate::tree::build_lead_sheet_tree;

    fn pl_row(id: &str, lead: &str, current_year: f64, prior_year: f64) -> AccountRow {
        AccountRow {
            id: id.to_string(),
            account_id: None,
            code: None,
            account_name: None,
            current_year,
            prior_year,
            adjustments: 0.0,
            re_classification: 0.0,
            final_balance: 0.0,
            classification: None,
            group1: Some("Equity".to_string()),
            group2: Some("Current Year Profits & Losses".to_string()),
            group3: Some(lead.to_string()),
        }
    }

    fn derive(rows: Vec<AccountRow>) -> IncomeStatement {
        let taxonomy = StatementTaxonomy::default();
        let tree = build_lead_sheet_tree(&normalize_rows(&rows, &taxonomy));
        derive_income_statement(&tree, &taxonomy, 2024)
    }

    #[test]
    fn test_missing_branch_yields_zeroed_statement() {
        let statement = derive(vec![]);

        for year_statement in [&statement.current_year, &statement.prior_year] {
            assert_eq!(year_statement.net_result, 0.0);
            assert_eq!(year_statement.result_type, NetResultType::NetProfit);
            assert!(year_statement.breakdowns.is_empty());
        }
        assert_eq!(statement.current_year.year, 2024);
        assert_eq!(statement.prior_year.year, 2023);
    }

    #[test]
    fn test_profit_cascade() {
        // Ledger convention: credits negative, debits positive. The
        // normalizer flips the whole Equity group.
        let statement = derive(vec![
            pl_row("1", "Revenue", -1000.0, -900.0),
            pl_row("2", "Cost of sales", 400.0, 380.0),
            pl_row("3", "Administrative expenses", 100.0, 90.0),
            pl_row("4", "Income tax expense", 50.0, 40.0),
        ]);

        assert_eq!(statement.current_year.net_result, 450.0);
        assert_eq!(statement.current_year.result_type, NetResultType::NetProfit);
        assert_eq!(statement.prior_year.net_result, 390.0);

        let revenue = &statement.current_year.breakdowns["Revenue"];
        assert_eq!(revenue.value, 1000.0);
        assert_eq!(revenue.accounts, vec!["LS_1"]);

        // Breakdown values are absolute sizes even for expense buckets.
        assert_eq!(statement.current_year.breakdowns["Cost of sales"].value, 400.0);
    }

    #[test]
    fn test_net_loss_classification() {
        let statement = derive(vec![
            pl_row("1", "Revenue", -100.0, 0.0),
            pl_row("2", "Cost of sales", 250.0, 0.0),
        ]);

        assert_eq!(statement.current_year.net_result, -150.0);
        assert_eq!(statement.current_year.result_type, NetResultType::NetLoss);
    }

    #[test]
    fn test_unrecognized_lead_appears_in_breakdowns_only() {
        let statement = derive(vec![
            pl_row("1", "Revenue", -100.0, 0.0),
            pl_row("2", "Sundry items", 30.0, 0.0),
        ]);

        // "Sundry items" is not in any subtotal tier: reported, not summed.
        assert_eq!(statement.current_year.net_result, 100.0);
        assert!(statement.current_year.breakdowns.contains_key("Sundry items"));
        assert_eq!(statement.current_year.breakdowns["Sundry items"].value, 30.0);
    }
}
