/// Declares a function returning a lazily compiled, process-wide regex.
///
/// Patterns passed here are literals, so a compile failure is a programming
/// error and panics on first use.
macro_rules! re {
    ($name:ident, $pat:expr) => {
        pub(crate) fn $name() -> &'static ::regex::Regex {
            static R: ::std::sync::OnceLock<::regex::Regex> = ::std::sync::OnceLock::new();
            R.get_or_init(|| ::regex::Regex::new($pat).expect("invalid regex"))
        }
    };
}

pub(crate) use re;

/// Base name of a path as UTF-8, if it has one.
pub(crate) fn file_name(path: &std::path::Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    re!(re_digits, r"^\d+$");

    #[test]
    fn cached_regex_is_reused() {
        assert!(std::ptr::eq(re_digits(), re_digits()));
        assert!(re_digits().is_match("1234"));
        assert!(!re_digits().is_match("12a4"));
    }

    #[test]
    fn file_name_strips_directories() {
        assert_eq!(
            file_name(Path::new("/tmp/x/Chase1234_Activity_20211019.CSV")),
            Some("Chase1234_Activity_20211019.CSV")
        );
        assert_eq!(file_name(Path::new("/")), None);
    }
}
