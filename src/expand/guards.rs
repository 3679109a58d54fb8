//! Guard evaluation for conditional template blocks
//!
//! Predicates are pure and total over any record. They are evaluated against
//! the record only, never against partially substituted text, so repeated or
//! reordered blocks cannot interfere with each other.

use crate::record::DataRecord;

/// Ordered SIP transport alternatives and the numeric codes they map to.
///
/// `dns srv` has no code of its own and shares `1` with `tcp`; the DNS-SRV
/// flag and mode it additionally enables are separate blocks in the template,
/// each evaluated on its own.
pub const TRANSPORT_ALTERNATIVES: &[(&str, &str)] = &[
    ("udp", "0"),
    ("tcp", "1"),
    ("tls", "2"),
    ("dns srv", "1"),
];

/// True when the key is present and non-empty after trimming
pub fn is_set(key: &str, record: &DataRecord) -> bool {
    record
        .get(key)
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false)
}

/// Region guards use the same truthiness as is-set tests
pub fn is_region_included(guard_key: &str, record: &DataRecord) -> bool {
    is_set(guard_key, record)
}

/// First alternative equal to the record value, compared case-insensitively
/// after trimming both sides; a missing key compares as the empty string
pub fn match_branch_literal<'a>(
    key: &str,
    record: &DataRecord,
    alternatives: &[&'a str],
) -> Option<&'a str> {
    let value = record.get(key).unwrap_or("").trim();
    alternatives
        .iter()
        .copied()
        .find(|lit| value.eq_ignore_ascii_case(lit.trim()))
}

/// Numeric transport code for a value, per [`TRANSPORT_ALTERNATIVES`]
pub fn transport_code(value: &str) -> Option<&'static str> {
    let value = value.trim();
    TRANSPORT_ALTERNATIVES
        .iter()
        .find(|(lit, _)| value.eq_ignore_ascii_case(lit))
        .map(|(_, code)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_set() {
        let record = DataRecord::from_pairs([("a", "x"), ("b", ""), ("c", "   ")]);
        assert!(is_set("a", &record));
        assert!(!is_set("b", &record));
        assert!(!is_set("c", &record));
        assert!(!is_set("missing", &record));
    }

    #[test]
    fn test_region_included_matches_is_set() {
        let record = DataRecord::from_pairs([("account.2.user_id", "201")]);
        assert!(is_region_included("account.2.user_id", &record));
        assert!(!is_region_included("account.3.user_id", &record));
    }

    #[test]
    fn test_match_branch_literal_case_insensitive() {
        let record = DataRecord::from_pairs([("t", "TCP")]);
        assert_eq!(
            match_branch_literal("t", &record, &["udp", "tcp", "tls"]),
            Some("tcp")
        );
    }

    #[test]
    fn test_match_branch_literal_first_wins() {
        let record = DataRecord::from_pairs([("t", "x")]);
        assert_eq!(match_branch_literal("t", &record, &["x", "X"]), Some("x"));
    }

    #[test]
    fn test_match_branch_literal_no_match() {
        let record = DataRecord::from_pairs([("t", "unknown")]);
        assert_eq!(match_branch_literal("t", &record, &["udp", "tcp"]), None);
        assert_eq!(match_branch_literal("missing", &record, &["udp"]), None);
    }

    #[test]
    fn test_match_branch_literal_missing_key_is_empty() {
        let record = DataRecord::new();
        assert_eq!(match_branch_literal("missing", &record, &["", "udp"]), Some(""));
    }

    #[test]
    fn test_transport_codes() {
        assert_eq!(transport_code("udp"), Some("0"));
        assert_eq!(transport_code("TCP"), Some("1"));
        assert_eq!(transport_code("tls"), Some("2"));
        assert_eq!(transport_code("carrier pigeon"), None);
    }

    #[test]
    fn test_dns_srv_shares_tcp_code() {
        assert_eq!(transport_code("dns srv"), transport_code("tcp"));
    }
}
