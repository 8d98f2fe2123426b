//! Keyword-based document classification.
//!
//! The classifier only decides which extraction template to request — it is
//! deliberately coarse and makes no guarantee about document content. Rules
//! are data, not control flow: priority order and keyword sets live in one
//! table so that adding a category is a table edit, and each rule can be
//! unit-tested on its own.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of document categories driving prompt selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentCategory {
    Invoice,
    Contract,
    Form,
    General,
}

impl DocumentCategory {
    /// Lowercase name, matching the serialised form.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentCategory::Invoice => "invoice",
            DocumentCategory::Contract => "contract",
            DocumentCategory::Form => "form",
            DocumentCategory::General => "general",
        }
    }
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered classification rules; the first matching rule wins.
///
/// Matching is a case-insensitive substring test with no scoring or
/// weighting. Text matching none of the rules is [`DocumentCategory::General`].
const CLASSIFICATION_RULES: &[(DocumentCategory, &[&str])] = &[
    (DocumentCategory::Invoice, &["invoice", "bill"]),
    (
        DocumentCategory::Contract,
        &["contract", "agreement", "terms and conditions"],
    ),
    (DocumentCategory::Form, &["form", "application"]),
];

/// Infer the document category from extracted raw text.
///
/// Deterministic and total: exactly one category is returned for any input.
pub fn classify(raw_text: &str) -> DocumentCategory {
    let haystack = raw_text.to_lowercase();
    for (category, keywords) in CLASSIFICATION_RULES {
        if keywords.iter().any(|kw| haystack.contains(kw)) {
            return *category;
        }
    }
    DocumentCategory::General
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_keywords() {
        assert_eq!(classify("INVOICE #123"), DocumentCategory::Invoice);
        assert_eq!(classify("please pay this bill"), DocumentCategory::Invoice);
    }

    #[test]
    fn contract_keywords() {
        assert_eq!(classify("Service AGREEMENT"), DocumentCategory::Contract);
        assert_eq!(
            classify("see the Terms and Conditions below"),
            DocumentCategory::Contract
        );
    }

    #[test]
    fn form_keywords() {
        assert_eq!(classify("Registration Form"), DocumentCategory::Form);
        assert_eq!(classify("visa APPLICATION"), DocumentCategory::Form);
    }

    #[test]
    fn unmatched_text_is_general() {
        assert_eq!(classify("quarterly progress notes"), DocumentCategory::General);
        assert_eq!(classify(""), DocumentCategory::General);
    }

    #[test]
    fn priority_order_holds_when_multiple_rules_match() {
        // invoice > contract > form
        assert_eq!(
            classify("invoice attached to the agreement"),
            DocumentCategory::Invoice
        );
        assert_eq!(
            classify("agreement for the application"),
            DocumentCategory::Contract
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify("InVoIcE"), DocumentCategory::Invoice);
    }
}
