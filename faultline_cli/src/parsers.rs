pub fn parse_duration(input: &str) -> Result<jiff::SignedDuration, String> {
    if let Ok(duration) = input.parse::<jiff::SignedDuration>() {
        if duration.is_negative() {
            return Err(String::from("Duration must be positive"));
        }
        return Ok(duration);
    }

    if let Ok(seconds) = input.parse::<i64>() {
        return Ok(jiff::SignedDuration::from_secs(seconds.abs()));
    }

    Err(String::from("Invalid duration"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_accepts_friendly_and_bare_forms() {
        assert_eq!(
            parse_duration("30s").unwrap(),
            jiff::SignedDuration::from_secs(30)
        );
        assert_eq!(
            parse_duration("5m").unwrap(),
            jiff::SignedDuration::from_mins(5)
        );
        assert_eq!(
            parse_duration("45").unwrap(),
            jiff::SignedDuration::from_secs(45)
        );
    }

    #[test]
    fn test_parse_duration_rejects_garbage_and_negatives() {
        assert!(parse_duration("soon").is_err());
        assert!(parse_duration("-30s").is_err());
    }
}
