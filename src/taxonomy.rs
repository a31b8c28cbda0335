use crate::error::{LeadSheetError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The chart-of-accounts vocabulary the derivers navigate by.
///
/// Every label the engine matches on lives here rather than inline in the
/// computations, so an engagement with a different taxonomy can swap the
/// whole vocabulary in one place. `Default` carries the standard vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StatementTaxonomy {
    #[schemars(description = "Top-level group aggregated as assets on the balance sheet.")]
    pub assets_group: String,

    #[schemars(description = "Top-level group aggregated as liabilities on the balance sheet.")]
    pub liabilities_group: String,

    #[schemars(description = "Top-level group aggregated as equity on the balance sheet.")]
    pub equity_group: String,

    #[schemars(
        description = "Top-level groups whose accounts carry natural credit balances in the source ledger. Their amounts are sign-flipped at normalization so statements render them as positive sizes."
    )]
    pub credit_balance_groups: Vec<String>,

    #[schemars(description = "Second-level branch under the equity group holding current-year P&L lead sheets.")]
    pub profit_and_loss_subgroup: String,

    #[schemars(description = "Second-level branch under the equity group holding the retained-earnings lead sheet.")]
    pub retained_earnings_subgroup: String,

    #[schemars(description = "Lead-sheet label of the retained-earnings ledger balance.")]
    pub retained_earnings_lead: String,

    #[schemars(description = "P&L buckets summed into gross profit.")]
    pub gross_profit_buckets: Vec<String>,

    #[schemars(description = "P&L buckets added to gross profit to reach operating profit.")]
    pub operating_buckets: Vec<String>,

    #[schemars(description = "P&L buckets added to operating profit to reach net profit before tax.")]
    pub pre_tax_buckets: Vec<String>,

    #[schemars(description = "P&L buckets added to net profit before tax to reach the net result.")]
    pub tax_buckets: Vec<String>,
}

impl Default for StatementTaxonomy {
    fn default() -> Self {
        let owned = |labels: &[&str]| labels.iter().map(|s| s.to_string()).collect();

        Self {
            assets_group: "Assets".to_string(),
            liabilities_group: "Liabilities".to_string(),
            equity_group: "Equity".to_string(),
            credit_balance_groups: owned(&["Equity", "Liabilities"]),
            profit_and_loss_subgroup: "Current Year Profits & Losses".to_string(),
            retained_earnings_subgroup: "Equity".to_string(),
            retained_earnings_lead: "Retained earnings".to_string(),
            gross_profit_buckets: owned(&["Revenue", "Cost of sales"]),
            operating_buckets: owned(&[
                "Sales and marketing expenses",
                "Administrative expenses",
                "Other operating income",
            ]),
            pre_tax_buckets: owned(&[
                "Investment income",
                "Investment losses",
                "Finance costs",
                "Share of profit of subsidiary",
                "PBT Expenses",
            ]),
            tax_buckets: owned(&["Income tax expense"]),
        }
    }
}

impl StatementTaxonomy {
    /// Whether the normalizer should flip signs for accounts under this
    /// top-level group.
    pub fn is_credit_balance_group(&self, group: &str) -> bool {
        self.credit_balance_groups.iter().any(|g| g == group)
    }

    /// The four subtotal tiers in cascade order.
    pub fn bucket_tiers(&self) -> [&[String]; 4] {
        [
            &self.gross_profit_buckets,
            &self.operating_buckets,
            &self.pre_tax_buckets,
            &self.tax_buckets,
        ]
    }

    pub fn validate(&self) -> Result<()> {
        for (name, label) in [
            ("assets_group", &self.assets_group),
            ("liabilities_group", &self.liabilities_group),
            ("equity_group", &self.equity_group),
            ("profit_and_loss_subgroup", &self.profit_and_loss_subgroup),
            ("retained_earnings_subgroup", &self.retained_earnings_subgroup),
            ("retained_earnings_lead", &self.retained_earnings_lead),
        ] {
            if label.trim().is_empty() {
                return Err(LeadSheetError::InvalidTaxonomy(format!(
                    "{} must not be empty",
                    name
                )));
            }
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for tier in self.bucket_tiers() {
            for label in tier {
                if label.trim().is_empty() {
                    return Err(LeadSheetError::InvalidTaxonomy(
                        "bucket labels must not be empty".to_string(),
                    ));
                }
                if !seen.insert(label.as_str()) {
                    return Err(LeadSheetError::DuplicateBucket {
                        label: label.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_taxonomy_is_valid() {
        assert!(StatementTaxonomy::default().validate().is_ok());
    }

    #[test]
    fn test_default_vocabulary() {
        let taxonomy = StatementTaxonomy::default();
        assert!(taxonomy.is_credit_balance_group("Equity"));
        assert!(taxonomy.is_credit_balance_group("Liabilities"));
        assert!(!taxonomy.is_credit_balance_group("Assets"));
        assert_eq!(taxonomy.profit_and_loss_subgroup, "Current Year Profits & Losses");
        assert_eq!(taxonomy.retained_earnings_lead, "Retained earnings");
    }

    #[test]
    fn test_duplicate_bucket_rejected() {
        let mut taxonomy = StatementTaxonomy::default();
        taxonomy.tax_buckets.push("Revenue".to_string());
        let err = taxonomy.validate().unwrap_err();
        assert!(matches!(
            err,
            crate::error::LeadSheetError::DuplicateBucket { ref label } if label == "Revenue"
        ));
    }

    #[test]
    fn test_empty_group_label_rejected() {
        let taxonomy = StatementTaxonomy {
            equity_group: "  ".to_string(),
            ..StatementTaxonomy::default()
        };
        assert!(taxonomy.validate().is_err());
    }
}
