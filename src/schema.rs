use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Delimiter used inside free-form classification strings,
/// e.g. "Assets > Current assets > Cash and cash equivalents".
pub const CLASSIFICATION_DELIMITER: &str = " > ";

/// Accepts a number, a numeric string, null, or an absent field.
/// Anything unparseable degrades to 0.0; malformed ledger exports are
/// treated as zero activity rather than rejected.
fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce_amount(&value))
}

fn coerce_amount(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// One extended-trial-balance line item as delivered by the engagement
/// backend. Monetary fields are lenient on ingestion (see `lenient_amount`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AccountRow {
    #[schemars(description = "Row-local identifier, reassigned on every load. Not stable across reloads.")]
    pub id: String,

    #[serde(default, rename = "accountId", skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Stable external account identifier. Preferred over `id` when present.")]
    pub account_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Ledger account code. Display only, no role in aggregation.")]
    pub code: Option<String>,

    #[serde(default, rename = "accountName", skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Ledger account name. Display only, no role in aggregation.")]
    pub account_name: Option<String>,

    #[serde(default, rename = "currentYear", deserialize_with = "lenient_amount")]
    #[schemars(with = "f64", description = "Current-year balance in whole reporting-currency units.")]
    pub current_year: f64,

    #[serde(default, rename = "priorYear", deserialize_with = "lenient_amount")]
    #[schemars(with = "f64", description = "Prior-year comparative balance.")]
    pub prior_year: f64,

    #[serde(default, deserialize_with = "lenient_amount")]
    #[schemars(with = "f64", description = "Audit adjustments posted against this account.")]
    pub adjustments: f64,

    #[serde(default, rename = "reClassification", deserialize_with = "lenient_amount")]
    #[schemars(with = "f64", description = "Reclassification entries posted against this account.")]
    pub re_classification: f64,

    #[serde(default, rename = "finalBalance")]
    #[schemars(description = "Derived: currentYear + adjustments + reClassification. Computed by the normalizer, ignored on input.")]
    pub final_balance: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(
        description = "Free-form hierarchical classification, 'Group1 > Group2 > Group3'. Used only when the explicit group fields are absent."
    )]
    pub classification: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Explicit top-level grouping (e.g. 'Assets'). Takes precedence over `classification`.")]
    pub group1: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Explicit second-level grouping. Takes precedence over `classification`.")]
    pub group2: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Explicit lead-sheet grouping. Takes precedence over `classification`.")]
    pub group3: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

impl AccountRow {
    /// Splits the free-form classification string into up to three trimmed
    /// segments. Missing or empty segments come back as `None`.
    pub fn parsed_classification(&self) -> [Option<&str>; 3] {
        let mut segments = [None, None, None];
        if let Some(classification) = non_empty(&self.classification) {
            for (i, part) in classification
                .split(CLASSIFICATION_DELIMITER)
                .take(3)
                .enumerate()
            {
                let part = part.trim();
                if !part.is_empty() {
                    segments[i] = Some(part);
                }
            }
        }
        segments
    }

    /// Resolves the three grouping levels, preferring the explicit group
    /// fields over the parsed classification string.
    pub fn resolved_groups(&self) -> [Option<&str>; 3] {
        let parsed = self.parsed_classification();
        [
            non_empty(&self.group1).or(parsed[0]),
            non_empty(&self.group2).or(parsed[1]),
            non_empty(&self.group3).or(parsed[2]),
        ]
    }

    /// The top-level grouping driving the sign convention.
    pub fn primary_group(&self) -> Option<&str> {
        self.resolved_groups()[0]
    }

    /// The identifier recorded against lead sheets: the stable external
    /// account id when present, else the row-local id.
    pub fn ledger_key(&self) -> &str {
        non_empty(&self.account_id).unwrap_or(&self.id)
    }
}

/// Which stored amount a derivation reads from a lead sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountField {
    PriorYear,
    FinalBalance,
}

/// Running totals accumulated on a lead sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadTotals {
    #[serde(rename = "currentYear")]
    pub current_year: f64,
    #[serde(rename = "priorYear")]
    pub prior_year: f64,
    pub adjustments: f64,
    pub reclassification: f64,
    #[serde(rename = "finalBalance")]
    pub final_balance: f64,
}

impl LeadTotals {
    pub fn accumulate(&mut self, row: &AccountRow) {
        self.current_year += row.current_year;
        self.prior_year += row.prior_year;
        self.adjustments += row.adjustments;
        self.reclassification += row.re_classification;
        self.final_balance += row.final_balance;
    }

    pub fn get(&self, field: AmountField) -> f64 {
        match field {
            AmountField::PriorYear => self.prior_year,
            AmountField::FinalBalance => self.final_balance,
        }
    }
}

/// Leaf of the grouping tree: one lead sheet with its synthetic id,
/// accumulated totals, and the accounts that feed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadSheet {
    pub id: String,
    pub label: String,
    #[serde(rename = "accountIds")]
    pub account_ids: Vec<String>,
    pub totals: LeadTotals,
}

/// Second-level grouping node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubgroupNode {
    pub label: String,
    pub lead_sheets: Vec<LeadSheet>,
}

impl SubgroupNode {
    pub fn find_lead_sheet(&self, label: &str) -> Option<&LeadSheet> {
        self.lead_sheets.iter().find(|l| l.label == label)
    }
}

/// Top-level grouping node (e.g. "Assets", "Liabilities", "Equity").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupNode {
    pub label: String,
    pub subgroups: Vec<SubgroupNode>,
}

impl GroupNode {
    pub fn find_subgroup(&self, label: &str) -> Option<&SubgroupNode> {
        self.subgroups.iter().find(|s| s.label == label)
    }
}

/// The three-level grouping tree. Node order is first-seen order from the
/// build pass; lead-sheet ids are only stable within a single build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadSheetTree {
    pub groups: Vec<GroupNode>,
}

impl LeadSheetTree {
    pub fn find_group(&self, label: &str) -> Option<&GroupNode> {
        self.groups.iter().find(|g| g.label == label)
    }

    /// All lead sheets in traversal order (group1, group2, group3,
    /// each first-seen).
    pub fn iter_lead_sheets(&self) -> impl Iterator<Item = (&GroupNode, &SubgroupNode, &LeadSheet)> {
        self.groups.iter().flat_map(|group| {
            group.subgroups.iter().flat_map(move |subgroup| {
                subgroup
                    .lead_sheets
                    .iter()
                    .map(move |lead| (group, subgroup, lead))
            })
        })
    }

    pub fn lead_sheet_count(&self) -> usize {
        self.iter_lead_sheets().count()
    }
}

/// One aggregate on a derived statement: the figure plus the lead-sheet ids
/// that contributed to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementLine {
    pub value: f64,
    pub accounts: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetResultType {
    NetProfit,
    NetLoss,
}

/// Income statement for one reporting year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearIncomeStatement {
    pub year: i32,
    pub net_result: f64,
    #[serde(rename = "resultType")]
    pub result_type: NetResultType,
    pub breakdowns: BTreeMap<String, StatementLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub current_year: YearIncomeStatement,
    pub prior_year: YearIncomeStatement,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

/// Retained-earnings roll-forward: prior-year ledger balance carried into
/// the current year plus the derived net result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetainedEarnings {
    pub current_year: YearValue,
    pub prior_year: YearValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheetTotals {
    pub assets: StatementLine,
    pub liabilities: StatementLine,
    pub equity: StatementLine,
    pub total_assets: StatementLine,
    pub total_equity_and_liabilities: StatementLine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearBalanceSheet {
    pub year: i32,
    pub totals: BalanceSheetTotals,
    pub balanced: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub current_year: YearBalanceSheet,
    pub prior_year: YearBalanceSheet,
}

/// Flat view of one lead sheet, used for sidebar/menu navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationGroup {
    pub id: String,
    pub label: String,
    pub group1: String,
    pub group2: String,
    pub group3: String,
    #[serde(rename = "accountIds")]
    pub account_ids: Vec<String>,
    pub totals: LeadTotals,
}
