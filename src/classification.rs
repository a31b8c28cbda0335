use crate::schema::{AccountRow, ClassificationGroup, LeadSheetTree};
use crate::tree::build_lead_sheet_tree;
use std::collections::BTreeMap;

/// Flattens every lead sheet of the tree into one navigable record, in
/// traversal order.
pub fn classification_groups_from_tree(tree: &LeadSheetTree) -> Vec<ClassificationGroup> {
    tree.iter_lead_sheets()
        .map(|(group, subgroup, lead)| ClassificationGroup {
            id: lead.id.clone(),
            label: lead.label.clone(),
            group1: group.label.clone(),
            group2: subgroup.label.clone(),
            group3: lead.label.clone(),
            account_ids: lead.account_ids.clone(),
            totals: lead.totals,
        })
        .collect()
}

/// Builds the tree from (already normalized) rows and flattens it for
/// sidebar/menu display.
pub fn extract_classification_groups(rows: &[AccountRow]) -> Vec<ClassificationGroup> {
    classification_groups_from_tree(&build_lead_sheet_tree(rows))
}

/// Re-nests the flat group list as `group1 -> group2 -> groups` for menu
/// rendering. A pure regroup; totals are not re-aggregated.
pub fn organize_classifications_by_hierarchy(
    groups: &[ClassificationGroup],
) -> BTreeMap<String, BTreeMap<String, Vec<ClassificationGroup>>> {
    let mut hierarchy: BTreeMap<String, BTreeMap<String, Vec<ClassificationGroup>>> =
        BTreeMap::new();

    for group in groups {
        hierarchy
            .entry(group.group1.clone())
            .or_default()
            .entry(group.group2.clone())
            .or_default()
            .push(group.clone());
    }

    hierarchy
}

/// Maps a row back to the classification group it contributed to.
pub fn find_group_for_row<'a>(
    groups: &'a [ClassificationGroup],
    row: &AccountRow,
) -> Option<&'a ClassificationGroup> {
    let key = row.ledger_key();
    groups
        .iter()
        .find(|group| group.account_ids.iter().any(|id| id == key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, g1: &str, g2: &str, g3: &str) -> AccountRow {
        AccountRow {
            id: id.to_string(),
            account_id: None,
            code: None,
            account_name: None,
            current_year: 0.0,
            prior_year: 0.0,
            adjustments: 0.0,
            re_classification: 0.0,
            final_balance: 100.0,
            classification: None,
            group1: Some(g1.to_string()),
            group2: Some(g2.to_string()),
            group3: Some(g3.to_string()),
        }
    }

    fn sample_rows() -> Vec<AccountRow> {
        vec![
            row("1", "Assets", "Current", "Cash"),
            row("2", "Assets", "Current", "Receivables"),
            row("3", "Assets", "Non-current", "Plant"),
            row("4", "Liabilities", "Current", "Payables"),
        ]
    }

    #[test]
    fn test_extraction_preserves_traversal_order() {
        let groups = extract_classification_groups(&sample_rows());

        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Cash", "Receivables", "Plant", "Payables"]);
        assert_eq!(groups[0].id, "LS_1");
        assert_eq!(groups[0].group1, "Assets");
        assert_eq!(groups[0].group2, "Current");
        assert_eq!(groups[0].group3, "Cash");
        assert_eq!(groups[0].account_ids, vec!["1"]);
        assert_eq!(groups[0].totals.final_balance, 100.0);
    }

    #[test]
    fn test_hierarchy_regroup() {
        let groups = extract_classification_groups(&sample_rows());
        let hierarchy = organize_classifications_by_hierarchy(&groups);

        assert_eq!(hierarchy.len(), 2);
        let assets = &hierarchy["Assets"];
        assert_eq!(assets["Current"].len(), 2);
        assert_eq!(assets["Non-current"].len(), 1);
        assert_eq!(hierarchy["Liabilities"]["Current"][0].label, "Payables");
    }

    #[test]
    fn test_find_group_for_row() {
        let rows = sample_rows();
        let groups = extract_classification_groups(&rows);

        let found = find_group_for_row(&groups, &rows[2]).unwrap();
        assert_eq!(found.label, "Plant");

        let stranger = row("99", "Assets", "Current", "Cash");
        assert!(find_group_for_row(&groups, &stranger).is_none());
    }
}
