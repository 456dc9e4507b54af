use crate::errors::RosterError;

/// Strips the line terminator but keeps interior and leading whitespace, so
/// names like "Mary Ann" survive intact.
pub fn parse_name(raw: &str) -> String {
    raw.trim_end_matches(['\r', '\n']).to_string()
}

pub fn parse_age(raw: &str) -> Result<i32, RosterError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i32>()
        .map_err(|_| RosterError::Parse(trimmed.to_string()))
}

pub fn parse_index(raw: &str) -> Result<i64, RosterError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| RosterError::Parse(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_keeps_spaces_and_drops_line_ending() {
        assert_eq!(parse_name("Mary Ann\r\n"), "Mary Ann");
        assert_eq!(parse_name("  padded  \n"), "  padded  ");
        assert_eq!(parse_name("\n"), "");
    }

    #[test]
    fn numbers_tolerate_surrounding_whitespace() {
        assert_eq!(parse_age(" 42\n").expect("age"), 42);
        assert_eq!(parse_age("-3").expect("negative age"), -3);
        assert_eq!(parse_index("7\n").expect("index"), 7);
        assert_eq!(parse_index("-1").expect("negative index"), -1);
    }

    #[test]
    fn malformed_numbers_are_parse_errors() {
        assert_eq!(
            parse_age("thirty\n").expect_err("words"),
            RosterError::Parse("thirty".to_string())
        );
        assert!(parse_age("").is_err());
        assert!(parse_age("99999999999").is_err());
        assert!(parse_index("1.5").is_err());
    }
}
