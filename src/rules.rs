//! Rule matching for folder reorganization.
//!
//! A rule maps a condition on a file name to a destination folder. Rules are
//! evaluated in list order and the first satisfied rule wins.
//!
//! # Examples
//!
//! ```
//! use cluttercut::rules::{ConditionType, Rule, match_rule};
//!
//! let rules = vec![
//!     Rule::new(ConditionType::Extension, "pdf", "Documents"),
//!     Rule::new(ConditionType::NameContains, "report", "Reports"),
//! ];
//!
//! let found = match_rule("Report.PDF", &rules).unwrap();
//! assert_eq!(found.index, 0);
//! assert_eq!(found.destination, "Documents");
//! assert!(match_rule("notes.txt", &rules).is_none());
//! ```
use serde::{Deserialize, Serialize};

/// The kind of condition a rule evaluates against a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionType {
    /// Compare the file's own extension, case-insensitively.
    #[serde(rename = "extension", alias = "file_extension")]
    Extension,
    /// Case-insensitive substring test against the full file name.
    #[serde(rename = "name_contains")]
    NameContains,
}

impl ConditionType {
    /// Parses the short names accepted on the command line.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "extension" | "ext" | "file_extension" => Some(Self::Extension),
            "name_contains" | "name" | "contains" => Some(Self::NameContains),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extension => "extension",
            Self::NameContains => "name_contains",
        }
    }
}

/// A single user-defined rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(alias = "condition_type")]
    pub condition_type: ConditionType,
    #[serde(alias = "condition_value")]
    pub condition_value: String,
    /// A bare folder name directly under the reorganized root.
    #[serde(alias = "destination_folder")]
    pub destination_folder: String,
}

impl Rule {
    pub fn new(
        condition_type: ConditionType,
        condition_value: impl Into<String>,
        destination_folder: impl Into<String>,
    ) -> Self {
        Self {
            condition_type,
            condition_value: condition_value.into(),
            destination_folder: destination_folder.into(),
        }
    }

    /// Tests this rule alone against a file name.
    ///
    /// Rules with a blank condition value or a blank destination never match.
    pub fn matches(&self, file_name: &str) -> bool {
        if self.destination_folder.trim().is_empty() {
            return false;
        }

        let value = normalize_condition(self.condition_type, &self.condition_value);
        if value.is_empty() {
            return false;
        }

        match self.condition_type {
            ConditionType::Extension => {
                file_extension(file_name).is_some_and(|ext| ext == value)
            }
            ConditionType::NameContains => file_name.to_lowercase().contains(&value),
        }
    }
}

/// The first rule satisfied by a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch<'a> {
    /// Position of the rule in the caller-supplied list.
    pub index: usize,
    /// Trimmed destination folder name.
    pub destination: &'a str,
    pub rule: &'a Rule,
}

/// Returns the first rule (by list order) that `file_name` satisfies.
///
/// Later rules are never evaluated once one matches.
pub fn match_rule<'a>(file_name: &str, rules: &'a [Rule]) -> Option<RuleMatch<'a>> {
    rules
        .iter()
        .enumerate()
        .find(|(_, rule)| rule.matches(file_name))
        .map(|(index, rule)| RuleMatch {
            index,
            destination: rule.destination_folder.trim(),
            rule,
        })
}

/// Normalizes a rule's condition value for comparison.
///
/// Whitespace is trimmed and the value lower-cased. Extension values also
/// lose one leading dot, so `".PDF"` and `"pdf"` are equivalent.
pub fn normalize_condition(condition_type: ConditionType, value: &str) -> String {
    let trimmed = value.trim();
    match condition_type {
        ConditionType::Extension => trimmed
            .strip_prefix('.')
            .unwrap_or(trimmed)
            .to_lowercase(),
        ConditionType::NameContains => trimmed.to_lowercase(),
    }
}

/// Returns the lower-cased extension of a file name, without the dot.
///
/// Only a dot after the first character counts, so `.bashrc` and `README`
/// have no extension. A trailing dot yields no extension either.
pub fn file_extension(file_name: &str) -> Option<String> {
    match file_name.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < file_name.len() => {
            Some(file_name[dot + 1..].to_lowercase())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ext(value: &str, dest: &str) -> Rule {
        Rule::new(ConditionType::Extension, value, dest)
    }

    fn contains(value: &str, dest: &str) -> Rule {
        Rule::new(ConditionType::NameContains, value, dest)
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let rules = vec![ext("pdf", "Documents")];
        assert!(match_rule("Report.PDF", &rules).is_some());
        assert!(match_rule("report.Pdf", &rules).is_some());

        let rules = vec![ext(".PDF", "Documents")];
        assert!(match_rule("Report.PDF", &rules).is_some());
        assert!(match_rule("report.pdf", &rules).is_some());
    }

    #[test]
    fn test_extension_does_not_match_substring() {
        let rules = vec![ext("pdf", "Documents")];
        assert!(match_rule("mypdf.txt", &rules).is_none());
        assert!(match_rule("README", &rules).is_none());
        assert!(match_rule("notes.docx", &rules).is_none());
    }

    #[test]
    fn test_extension_uses_last_dot() {
        let rules = vec![ext("gz", "Archives")];
        assert!(match_rule("backup.tar.gz", &rules).is_some());

        let rules = vec![ext("tar", "Archives")];
        assert!(match_rule("backup.tar.gz", &rules).is_none());
    }

    #[test]
    fn test_file_extension_edge_cases() {
        assert_eq!(file_extension("photo.JPG"), Some("jpg".to_string()));
        assert_eq!(file_extension(".bashrc"), None);
        assert_eq!(file_extension("README"), None);
        assert_eq!(file_extension("trailing."), None);
        assert_eq!(file_extension("a.b.c"), Some("c".to_string()));
    }

    #[test]
    fn test_empty_condition_never_matches() {
        for value in ["", "   ", ".", " . "] {
            let rules = vec![ext(value, "X")];
            assert!(match_rule("report.pdf", &rules).is_none(), "value {value:?}");
            assert!(match_rule("README", &rules).is_none(), "value {value:?}");
        }

        let rules = vec![contains("", "X"), contains("  ", "X")];
        assert!(match_rule("anything.txt", &rules).is_none());
    }

    #[test]
    fn test_blank_destination_never_matches() {
        let rules = vec![ext("pdf", "   "), ext("pdf", "Documents")];
        let found = match_rule("a.pdf", &rules).unwrap();
        assert_eq!(found.index, 1);
    }

    #[test]
    fn test_name_contains_spans_extension() {
        let rules = vec![contains("Report", "Reports")];
        assert!(match_rule("q3_REPORT_final.xlsx", &rules).is_some());

        let rules = vec![contains("t.pd", "X")];
        assert!(match_rule("report.pdf", &rules).is_some());
    }

    #[test]
    fn test_name_contains_trims_value() {
        let rules = vec![contains("  invoice ", "Invoices")];
        assert!(match_rule("march-invoice.pdf", &rules).is_some());
    }

    #[test]
    fn test_first_match_wins() {
        let rules = vec![ext("pdf", "Documents"), contains("report", "Reports")];
        let found = match_rule("report.pdf", &rules).unwrap();
        assert_eq!(found.index, 0);
        assert_eq!(found.destination, "Documents");

        let rules = vec![contains("report", "Reports"), ext("pdf", "Documents")];
        let found = match_rule("report.pdf", &rules).unwrap();
        assert_eq!(found.index, 0);
        assert_eq!(found.destination, "Reports");
    }

    #[test]
    fn test_destination_is_trimmed() {
        let rules = vec![ext("pdf", "  Documents ")];
        assert_eq!(match_rule("a.pdf", &rules).unwrap().destination, "Documents");
    }

    #[test]
    fn test_condition_type_wire_names() {
        let rule: Rule = serde_json::from_str(
            r#"{"conditionType":"file_extension","conditionValue":"pdf","destinationFolder":"Docs"}"#,
        )
        .unwrap();
        assert_eq!(rule.condition_type, ConditionType::Extension);

        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["conditionType"], "extension");
        assert_eq!(json["destinationFolder"], "Docs");
    }

    #[test]
    fn test_condition_type_parse() {
        assert_eq!(ConditionType::parse("ext"), Some(ConditionType::Extension));
        assert_eq!(
            ConditionType::parse("NAME_CONTAINS"),
            Some(ConditionType::NameContains)
        );
        assert_eq!(ConditionType::parse("regex"), None);
    }

    fn rule_strategy() -> impl Strategy<Value = Rule> {
        (
            prop_oneof![
                Just(ConditionType::Extension),
                Just(ConditionType::NameContains)
            ],
            "[ .]{0,2}[a-zA-Z]{0,4}[ ]{0,2}",
            "[A-Za-z]{1,8}",
        )
            .prop_map(|(kind, value, dest)| Rule::new(kind, value, dest))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_match_is_stable(
            name in "[a-zA-Z_]{1,10}(\\.[a-zA-Z]{1,4})?",
            rules in proptest::collection::vec(rule_strategy(), 0..6),
        ) {
            let first = match_rule(&name, &rules).map(|m| m.index);
            let second = match_rule(&name, &rules).map(|m| m.index);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_match_is_earliest_satisfied_rule(
            name in "[a-zA-Z_]{1,10}(\\.[a-zA-Z]{1,4})?",
            rules in proptest::collection::vec(rule_strategy(), 0..6),
        ) {
            let expected = rules.iter().position(|rule| rule.matches(&name));
            prop_assert_eq!(match_rule(&name, &rules).map(|m| m.index), expected);
        }

        #[test]
        fn prop_blank_extension_never_matches(
            name in "[a-zA-Z_. ]{0,12}",
            blank in "[ \t]{0,4}",
        ) {
            let rules = vec![Rule::new(ConditionType::Extension, blank, "X")];
            prop_assert!(match_rule(&name, &rules).is_none());
        }
    }
}
