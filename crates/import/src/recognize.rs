use std::path::Path;

use regex::Regex;

use crate::util::{file_name, re};

re!(re_chase_checking, r"(?i)^Chase(\d{4})_Activity_[\d_]{8}.*\.CSV$");
re!(re_chase_credit, r"(?i)^Chase(\d{4})_Activity(?:\d+_)*\d+\.CSV$");
re!(re_mercury, r"(?i)^transactions-.+\.CSV$");

/// Decides whether a statement file belongs to an importer by its name.
///
/// When the naming grammar has a capture group it holds the last four digits
/// of the account number, which must equal `last_four` if one is configured.
#[derive(Debug, Clone)]
pub struct FilenamePattern {
    pattern: &'static Regex,
    last_four: Option<String>,
}

impl FilenamePattern {
    pub fn chase_checking(last_four: Option<String>) -> Self {
        Self {
            pattern: re_chase_checking(),
            last_four,
        }
    }

    pub fn chase_credit(last_four: Option<String>) -> Self {
        Self {
            pattern: re_chase_credit(),
            last_four,
        }
    }

    pub fn mercury() -> Self {
        Self {
            pattern: re_mercury(),
            last_four: None,
        }
    }

    pub fn matches(&self, filename: &str) -> bool {
        let Some(caps) = self.pattern.captures(filename) else {
            return false;
        };
        match (&self.last_four, caps.get(1)) {
            (Some(expected), Some(found)) => found.as_str() == expected,
            (Some(_), None) => false,
            (None, _) => true,
        }
    }

    pub fn matches_path(&self, path: &Path) -> bool {
        file_name(path).is_some_and(|name| self.matches(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn chase_checking_names() {
        let p = FilenamePattern::chase_checking(four("1234"));
        assert!(p.matches("Chase1234_Activity_20211019.CSV"));
        assert!(p.matches("chase1234_activity_20211019.csv"));
        assert!(p.matches("Chase1234_Activity_20211019_extra.CSV"));
        assert!(!p.matches("Chase9999_Activity_20211019.CSV"));
        assert!(!p.matches("Chase1234_Activity20210103_20210202_20210214.CSV"));
        assert!(!p.matches("Chase1234_Activity_20211019.txt"));
    }

    #[test]
    fn chase_credit_names() {
        let p = FilenamePattern::chase_credit(four("1234"));
        assert!(p.matches("Chase1234_Activity20210103_20210202_20210214.CSV"));
        assert!(p.matches("Chase1234_Activity20220720.CSV"));
        assert!(!p.matches("Chase1234_Activity_20211019.CSV"));
        assert!(!p.matches("Chase4321_Activity20220720.CSV"));
        assert!(!p.matches("Chase1234_Activity20220720xCSV"));
    }

    #[test]
    fn missing_suffix_accepts_any_account() {
        let p = FilenamePattern::chase_checking(None);
        assert!(p.matches("Chase1234_Activity_20211019.CSV"));
        assert!(p.matches("Chase0001_Activity_20211019.CSV"));
    }

    #[test]
    fn mercury_names() {
        let p = FilenamePattern::mercury();
        assert!(p.matches("transactions-dummy-to-feb052022.csv"));
        assert!(p.matches("Transactions-ACME.CSV"));
        assert!(!p.matches("transactions-.csv"));
        assert!(!p.matches("Chase1234_Activity20220720.CSV"));
    }

    #[test]
    fn matches_path_uses_base_name() {
        let p = FilenamePattern::chase_credit(four("1234"));
        assert!(p.matches_path(Path::new("/downloads/Chase1234_Activity20220720.CSV")));
        assert!(!p.matches_path(Path::new("/Chase1234_Activity20220720.CSV/notes.txt")));
    }
}
