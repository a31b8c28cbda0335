//! # Lead Sheet Builder
//!
//! A library for aggregating extended trial balance (ETB) rows into a
//! lead-sheet hierarchy and deriving financial statements from it.
//!
//! ## Core Concepts
//!
//! - **Account Row**: one trial-balance line item with current-year,
//!   prior-year, adjustment and reclassification amounts
//! - **Normalization**: credit-balance groups (Liabilities, Equity) are
//!   sign-flipped and amounts rounded to whole currency units, so every
//!   final balance reads as a positive size in its bucket
//! - **Lead-Sheet Tree**: a three-level grouping (group1 > group2 > group3)
//!   with running totals per lead sheet
//! - **Derived Statements**: income statement, retained-earnings
//!   roll-forward, and a balance sheet with an
//!   Assets = Liabilities + Equity check
//!
//! Everything is recomputed from scratch per call: the functions are pure,
//! synchronous, and allocate fresh output, so concurrent derivations over
//! the same rows are safe.
//!
//! ## Example
//!
//! ```rust,ignore
//! use lead_sheet_builder::*;
//!
//! let rows: Vec<AccountRow> = serde_json::from_str(&backend_response)?;
//! let pack = build_statement_pack(&rows, 2024)?;
//!
//! assert!(pack.balance_sheet.current_year.balanced);
//! println!("{}", pack.income_statement.current_year.net_result);
//! ```

pub mod balance_sheet;
pub mod classification;
pub mod error;
pub mod income_statement;
pub mod normalize;
pub mod retained_earnings;
pub mod schema;
pub mod taxonomy;
pub mod tree;

pub use balance_sheet::{derive_balance_sheet, BALANCE_TOLERANCE};
pub use classification::{
    extract_classification_groups, find_group_for_row, organize_classifications_by_hierarchy,
};
pub use error::{LeadSheetError, Result};
pub use income_statement::derive_income_statement;
pub use normalize::normalize_rows;
pub use retained_earnings::derive_retained_earnings;
pub use schema::*;
pub use taxonomy::StatementTaxonomy;
pub use tree::{
    build_lead_sheet_index, build_lead_sheet_tree, classification_path, find_lead_sheet_by_label,
    LeadSheetTreeBuilder,
};

use crate::classification::classification_groups_from_tree;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Everything one UI data-fetch cycle derives from a set of rows. Owned by
/// the caller and discarded on refetch; lead-sheet ids inside are only
/// valid within this pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementPack {
    /// Normalized rows (sign-adjusted, rounded, final balance computed).
    pub rows: Vec<AccountRow>,
    pub tree: LeadSheetTree,
    pub income_statement: IncomeStatement,
    pub retained_earnings: RetainedEarnings,
    pub balance_sheet: BalanceSheet,
    pub classification_groups: Vec<ClassificationGroup>,
}

/// Runs the full pipeline: normalize → tree → income statement →
/// retained earnings → balance sheet, plus the flat classification view.
pub struct StatementPackBuilder {
    taxonomy: StatementTaxonomy,
}

impl StatementPackBuilder {
    pub fn new() -> Self {
        Self {
            taxonomy: StatementTaxonomy::default(),
        }
    }

    pub fn with_taxonomy(taxonomy: StatementTaxonomy) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &StatementTaxonomy {
        &self.taxonomy
    }

    pub fn build(&self, rows: &[AccountRow], current_year: i32) -> Result<StatementPack> {
        self.taxonomy.validate()?;

        info!(
            "Building statement pack for year {} from {} trial-balance rows",
            current_year,
            rows.len()
        );

        let normalized = normalize_rows(rows, &self.taxonomy);
        let tree = build_lead_sheet_tree(&normalized);
        debug!(
            "Grouping tree has {} top-level groups and {} lead sheets",
            tree.groups.len(),
            tree.lead_sheet_count()
        );

        let income_statement = derive_income_statement(&tree, &self.taxonomy, current_year);
        let retained_earnings =
            derive_retained_earnings(&tree, &income_statement, &self.taxonomy, current_year);
        let balance_sheet =
            derive_balance_sheet(&tree, &retained_earnings, &self.taxonomy, current_year);

        if !balance_sheet.current_year.balanced {
            debug!(
                "Current-year balance sheet is out of balance: assets {} vs equity+liabilities {}",
                balance_sheet.current_year.totals.assets.value,
                balance_sheet.current_year.totals.total_equity_and_liabilities.value
            );
        }

        let classification_groups = classification_groups_from_tree(&tree);

        Ok(StatementPack {
            rows: normalized,
            tree,
            income_statement,
            retained_earnings,
            balance_sheet,
            classification_groups,
        })
    }
}

impl Default for StatementPackBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a statement pack with the default taxonomy.
pub fn build_statement_pack(rows: &[AccountRow], current_year: i32) -> Result<StatementPack> {
    StatementPackBuilder::new().build(rows, current_year)
}
