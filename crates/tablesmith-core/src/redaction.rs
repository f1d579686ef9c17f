/// Mask an API key for logs and status output.
///
/// Keys longer than eight characters keep their last four; anything shorter
/// is fully masked.
pub fn redact_api_key(key: &str) -> String {
    let key = key.trim();
    if key.is_empty() {
        return "(none)".to_string();
    }

    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "***".to_string();
    }

    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("***{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_tail_of_long_keys() {
        let redacted = redact_api_key("csk-1234567890abcd");
        assert_eq!(redacted, "***abcd");
        assert!(!redacted.contains("1234"));
    }

    #[test]
    fn masks_short_and_empty_keys() {
        assert_eq!(redact_api_key("zyz-asd"), "***");
        assert_eq!(redact_api_key("  "), "(none)");
    }
}
