//! Static catalog of legal form templates and the loan-amount tiering rule.

use serde::{Deserialize, Serialize};

/// Upper bound (inclusive) of the small-business tier.
pub const SMALL_BUSINESS_LIMIT: u64 = 1_000_000;
/// Upper bound (inclusive) of the standard commercial tier.
pub const STANDARD_COMMERCIAL_LIMIT: u64 = 10_000_000;

/// Catalog entry describing a legal form to prepare for a loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormReference {
    pub form_id: String,
    pub form_name: String,
    pub template_path: String,
    pub jurisdiction: String,
    /// Lower values take precedence.
    pub priority: u8,
    pub required_approvals: Vec<String>,
}

struct FormTemplate {
    form_id: &'static str,
    form_name: &'static str,
    template_path: &'static str,
    jurisdiction: &'static str,
    priority: u8,
    required_approvals: &'static [&'static str],
}

impl FormTemplate {
    fn reference(&self) -> FormReference {
        FormReference {
            form_id: self.form_id.to_string(),
            form_name: self.form_name.to_string(),
            template_path: self.template_path.to_string(),
            jurisdiction: self.jurisdiction.to_string(),
            priority: self.priority,
            required_approvals: self
                .required_approvals
                .iter()
                .map(|role| role.to_string())
                .collect(),
        }
    }
}

const LARGE_COMMERCIAL_AGREEMENT: FormTemplate = FormTemplate {
    form_id: "LCA-001",
    form_name: "Large Commercial Loan Agreement",
    template_path: "templates/commercial/large_commercial_agreement.docx",
    jurisdiction: "Federal",
    priority: 1,
    required_approvals: &["credit_officer", "senior_credit_committee", "legal_counsel"],
};

const HIGH_VALUE_COMPLIANCE: FormTemplate = FormTemplate {
    form_id: "HVC-002",
    form_name: "High-Value Loan Compliance Certificate",
    template_path: "templates/compliance/high_value_compliance.docx",
    jurisdiction: "Federal",
    priority: 2,
    required_approvals: &["compliance_officer"],
};

const STANDARD_COMMERCIAL_AGREEMENT: FormTemplate = FormTemplate {
    form_id: "SCA-001",
    form_name: "Standard Commercial Loan Agreement",
    template_path: "templates/commercial/standard_commercial_agreement.docx",
    jurisdiction: "Provincial",
    priority: 1,
    required_approvals: &["credit_officer", "branch_manager"],
};

const SMALL_BUSINESS_AGREEMENT: FormTemplate = FormTemplate {
    form_id: "SBL-001",
    form_name: "Small Business Loan Agreement",
    template_path: "templates/small_business/small_business_agreement.docx",
    jurisdiction: "Provincial",
    priority: 1,
    required_approvals: &["credit_officer"],
};

const LARGE_LOAN_TIER: &[FormTemplate] = &[LARGE_COMMERCIAL_AGREEMENT, HIGH_VALUE_COMPLIANCE];
const STANDARD_LOAN_TIER: &[FormTemplate] = &[STANDARD_COMMERCIAL_AGREEMENT];
const SMALL_LOAN_TIER: &[FormTemplate] = &[SMALL_BUSINESS_AGREEMENT];

/// Forms required for a loan of `loan_amount`, ordered by priority. Never empty.
pub fn match_forms(loan_amount: u64) -> Vec<FormReference> {
    let tier = if loan_amount > STANDARD_COMMERCIAL_LIMIT {
        LARGE_LOAN_TIER
    } else if loan_amount > SMALL_BUSINESS_LIMIT {
        STANDARD_LOAN_TIER
    } else {
        SMALL_LOAN_TIER
    };

    tier.iter().map(FormTemplate::reference).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(amount: u64) -> Vec<String> {
        match_forms(amount)
            .into_iter()
            .map(|form| form.form_id)
            .collect()
    }

    #[test]
    fn tier_boundaries_are_inclusive_on_the_upper_side() {
        assert_eq!(ids(0), vec!["SBL-001"]);
        assert_eq!(ids(1_000_000), vec!["SBL-001"]);
        assert_eq!(ids(1_000_001), vec!["SCA-001"]);
        assert_eq!(ids(10_000_000), vec!["SCA-001"]);
        assert_eq!(ids(10_000_001), vec!["LCA-001", "HVC-002"]);
        assert_eq!(ids(u64::MAX), vec!["LCA-001", "HVC-002"]);
    }

    #[test]
    fn large_bundle_is_ordered_by_priority() {
        let forms = match_forms(25_000_000);
        let priorities: Vec<u8> = forms.iter().map(|form| form.priority).collect();
        assert_eq!(priorities, vec![1, 2]);
        assert_eq!(forms[0].form_name, "Large Commercial Loan Agreement");
        assert_eq!(forms[1].required_approvals, vec!["compliance_officer"]);
    }

    #[test]
    fn matching_is_deterministic() {
        for amount in [1, 999_999, 5_000_000, 50_000_000] {
            let first = match_forms(amount);
            assert!(!first.is_empty());
            assert_eq!(first, match_forms(amount));
        }
    }
}
