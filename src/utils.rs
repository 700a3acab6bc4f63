/// Case-insensitive attribute name comparison.
///
/// Directory and user model attribute names are matched regardless of case,
/// using full Unicode lowercase folding.
#[inline]
pub(crate) fn names_match(left: &str, right: &str) -> bool {
    left.eq_ignore_ascii_case(right)
        || left
            .chars()
            .flat_map(char::to_lowercase)
            .eq(right.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::names_match;

    #[test]
    fn ignores_case() {
        assert!(names_match("objectSid", "OBJECTSID"));
        assert!(names_match("Straße", "STRAßE"));
        assert!(!names_match("objectSid", "objectGUID"));
        assert!(!names_match("sid", "sid "));
    }
}
