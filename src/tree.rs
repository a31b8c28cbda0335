use crate::schema::{
    AccountRow, GroupNode, LeadSheet, LeadSheetTree, LeadTotals, SubgroupNode,
    CLASSIFICATION_DELIMITER,
};
use log::warn;
use std::collections::BTreeMap;

/// Incremental builder for the three-level grouping tree.
///
/// Owns the `LS_<n>` id counter: ids are assigned in first-seen order
/// across the whole tree, starting at 1, and are only stable within the
/// tree returned by a single [`finish`](Self::finish) call. Callers must
/// not persist them across builds.
#[derive(Debug)]
pub struct LeadSheetTreeBuilder {
    tree: LeadSheetTree,
    next_lead_sheet: usize,
}

impl Default for LeadSheetTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LeadSheetTreeBuilder {
    pub fn new() -> Self {
        Self {
            tree: LeadSheetTree::default(),
            next_lead_sheet: 1,
        }
    }

    /// Accumulates one row into the tree. Rows missing any of the three
    /// grouping levels are dropped entirely; there is no default bucket.
    pub fn insert(&mut self, row: &AccountRow) {
        let [Some(g1), Some(g2), Some(g3)] = row.resolved_groups() else {
            return;
        };

        let groups = &mut self.tree.groups;
        let gi = match groups.iter().position(|g| g.label == g1) {
            Some(i) => i,
            None => {
                groups.push(GroupNode {
                    label: g1.to_string(),
                    subgroups: Vec::new(),
                });
                groups.len() - 1
            }
        };

        let subgroups = &mut groups[gi].subgroups;
        let si = match subgroups.iter().position(|s| s.label == g2) {
            Some(i) => i,
            None => {
                subgroups.push(SubgroupNode {
                    label: g2.to_string(),
                    lead_sheets: Vec::new(),
                });
                subgroups.len() - 1
            }
        };

        let lead_sheets = &mut subgroups[si].lead_sheets;
        let li = match lead_sheets.iter().position(|l| l.label == g3) {
            Some(i) => i,
            None => {
                let id = format!("LS_{}", self.next_lead_sheet);
                self.next_lead_sheet += 1;
                lead_sheets.push(LeadSheet {
                    id,
                    label: g3.to_string(),
                    account_ids: Vec::new(),
                    totals: LeadTotals::default(),
                });
                lead_sheets.len() - 1
            }
        };

        let lead = &mut lead_sheets[li];
        lead.totals.accumulate(row);
        lead.account_ids.push(row.ledger_key().to_string());
    }

    pub fn finish(self) -> LeadSheetTree {
        self.tree
    }
}

/// Builds the grouping tree from normalized rows in one pass.
pub fn build_lead_sheet_tree(rows: &[AccountRow]) -> LeadSheetTree {
    let mut builder = LeadSheetTreeBuilder::new();
    for row in rows {
        builder.insert(row);
    }
    builder.finish()
}

/// Joins the three grouping labels into the canonical path string.
pub fn classification_path(group1: &str, group2: &str, group3: &str) -> String {
    [group1, group2, group3].join(CLASSIFICATION_DELIMITER)
}

/// Flattens the tree into a full-path → lead-sheet-id lookup.
///
/// Keys are `"g1 > g2 > g3"` paths, so lead sheets sharing a label under
/// different parents do not collide.
pub fn build_lead_sheet_index(tree: &LeadSheetTree) -> BTreeMap<String, String> {
    tree.iter_lead_sheets()
        .map(|(group, subgroup, lead)| {
            (
                classification_path(&group.label, &subgroup.label, &lead.label),
                lead.id.clone(),
            )
        })
        .collect()
}

/// Looks a lead sheet up by bare label, for consumers that do not hold the
/// full path. Labels are expected to be globally unique by convention; when
/// they are not, the first match in traversal order wins and the ambiguity
/// is logged.
pub fn find_lead_sheet_by_label<'a>(
    tree: &'a LeadSheetTree,
    label: &str,
) -> Option<&'a LeadSheet> {
    let mut matches = tree
        .iter_lead_sheets()
        .filter(|(_, _, lead)| lead.label == label);

    let first = matches.next().map(|(_, _, lead)| lead);
    if first.is_some() && matches.next().is_some() {
        warn!(
            "lead-sheet label '{}' appears under more than one branch; using first occurrence",
            label
        );
    }
    first
}
