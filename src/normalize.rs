use crate::schema::AccountRow;
use crate::taxonomy::StatementTaxonomy;

/// Normalizes raw trial-balance rows for aggregation.
///
/// Accounts under a credit-balance group (liabilities, equity) carry
/// natural credit balances in the source ledger; their amounts are
/// sign-flipped so every final balance reads as a positive "size" in its
/// bucket. Amounts are rounded to whole currency units before flipping,
/// and the final balance is recomputed as
/// `currentYear + adjustments + reClassification`. The prior year is a
/// comparative figure only and never feeds the final balance.
pub fn normalize_rows(rows: &[AccountRow], taxonomy: &StatementTaxonomy) -> Vec<AccountRow> {
    rows.iter()
        .map(|row| normalize_row(row, taxonomy))
        .collect()
}

fn normalize_row(row: &AccountRow, taxonomy: &StatementTaxonomy) -> AccountRow {
    let sign = match row.primary_group() {
        Some(group) if taxonomy.is_credit_balance_group(group) => -1.0,
        _ => 1.0,
    };

    let mut normalized = row.clone();
    normalized.current_year = row.current_year.round() * sign;
    normalized.prior_year = row.prior_year.round() * sign;
    normalized.adjustments = row.adjustments.round() * sign;
    normalized.re_classification = row.re_classification.round() * sign;
    normalized.final_balance =
        normalized.current_year + normalized.adjustments + normalized.re_classification;
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(group1: &str, current_year: f64) -> AccountRow {
        AccountRow {
            id: "1".to_string(),
            account_id: None,
            code: None,
            account_name: None,
            current_year,
            prior_year: 0.0,
            adjustments: 0.0,
            re_classification: 0.0,
            final_balance: 0.0,
            classification: None,
            group1: Some(group1.to_string()),
            group2: None,
            group3: None,
        }
    }

    #[test]
    fn test_sign_flip_for_credit_balance_groups() {
        let taxonomy = StatementTaxonomy::default();

        for group in ["Equity", "Liabilities"] {
            let normalized = normalize_rows(&[row(group, -500.0)], &taxonomy);
            assert_eq!(normalized[0].current_year, 500.0);
        }

        let normalized = normalize_rows(&[row("Assets", -500.0)], &taxonomy);
        assert_eq!(normalized[0].current_year, -500.0);
    }

    #[test]
    fn test_rounding_precedes_sign_flip() {
        let taxonomy = StatementTaxonomy::default();
        let normalized = normalize_rows(&[row("Liabilities", -400.6)], &taxonomy);
        assert_eq!(normalized[0].current_year, 401.0);
    }

    #[test]
    fn test_final_balance_identity() {
        let taxonomy = StatementTaxonomy::default();
        let mut input = row("Assets", 1000.2);
        input.adjustments = 49.9;
        input.re_classification = -25.4;

        let normalized = normalize_rows(&[input], &taxonomy);
        let n = &normalized[0];
        assert_eq!(n.current_year, 1000.0);
        assert_eq!(n.adjustments, 50.0);
        assert_eq!(n.re_classification, -25.0);
        assert_eq!(n.final_balance, n.current_year + n.adjustments + n.re_classification);
        assert_eq!(n.final_balance, 1025.0);
    }

    #[test]
    fn test_prior_year_excluded_from_final_balance() {
        let taxonomy = StatementTaxonomy::default();
        let mut input = row("Assets", 100.0);
        input.prior_year = 999.0;

        let normalized = normalize_rows(&[input], &taxonomy);
        assert_eq!(normalized[0].prior_year, 999.0);
        assert_eq!(normalized[0].final_balance, 100.0);
    }

    #[test]
    fn test_group_resolved_from_classification() {
        let taxonomy = StatementTaxonomy::default();
        let mut input = row("ignored", -200.0);
        input.group1 = None;
        input.classification = Some("Equity > Equity > Retained earnings".to_string());

        let normalized = normalize_rows(&[input], &taxonomy);
        assert_eq!(normalized[0].current_year, 200.0);
    }

    #[test]
    fn test_other_fields_preserved() {
        let taxonomy = StatementTaxonomy::default();
        let mut input = row("Assets", 10.0);
        input.account_name = Some("Cash at bank".to_string());
        input.code = Some("1000".to_string());

        let normalized = normalize_rows(&[input], &taxonomy);
        assert_eq!(normalized[0].account_name.as_deref(), Some("Cash at bank"));
        assert_eq!(normalized[0].code.as_deref(), Some("1000"));
        assert_eq!(normalized[0].group1.as_deref(), Some("Assets"));
    }
}
