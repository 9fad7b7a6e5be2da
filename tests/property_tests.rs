//! Property-based tests for node_logger using proptest

use node_logger::core::JsonEncoder;
use node_logger::prelude::*;
use node_logger::LogEntry;
use proptest::prelude::*;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::DPanic),
        Just(LogLevel::Panic),
        Just(LogLevel::Fatal),
    ]
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Level names parse back to the same level, in any case
    #[test]
    fn test_log_level_str_roundtrip(level in any_level(), upper in any::<bool>()) {
        let name = if upper { level.as_str().to_uppercase() } else { level.as_str().to_string() };
        let parsed: LogLevel = name.parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Ordering follows the numeric value
    #[test]
    fn test_log_level_ordering(level1 in any_level(), level2 in any_level()) {
        let val1 = level1 as u8;
        let val2 = level2 as u8;

        prop_assert_eq!(level1 <= level2, val1 <= val2);
        prop_assert_eq!(level1 > level2, val1 > val2);
    }

    /// Anything that is not a level name is rejected
    #[test]
    fn test_log_level_invalid_parse(invalid in "[0-9 _]{0,12}") {
        prop_assert!(invalid.parse::<LogLevel>().is_err());
    }
}

// ============================================================================
// Pretty Console Tests
// ============================================================================

proptest! {
    /// Lines that are not JSON records come out byte-for-byte
    #[test]
    fn test_pretty_passthrough(line in "[^{\\s][^\n]{0,80}") {
        let screen = MemorySink::new();
        let pretty = PrettyConsole::new(screen.clone()).with_colors(false);

        let input = format!("{line}\n");
        prop_assert_eq!(pretty.write(input.as_bytes()).unwrap(), input.len());
        prop_assert_eq!(screen.contents(), input.into_bytes());
    }

    /// Any record renders on a single line, whatever its message
    #[test]
    fn test_pretty_record_is_one_line(level in any_level(), message in ".*") {
        let pretty = PrettyConsole::new(MemorySink::new()).with_colors(false);
        let record = JsonEncoder::default()
            .encode(&LogEntry::new(level, message))
            .unwrap();

        let rendered = pretty.render(&record).unwrap();
        prop_assert_eq!(rendered.matches('\n').count(), 1);
        let tag = format!("[{}]", level.as_str().to_uppercase());
        prop_assert!(rendered.contains(&tag));
    }
}

// ============================================================================
// Context Tests
// ============================================================================

proptest! {
    /// Loose pairs never lose a value: odd counts keep the trailing key
    #[test]
    fn test_loose_pairs(keys in prop::collection::vec("[a-z]{1,8}", 0..10), odd in any::<bool>()) {
        let mut values: Vec<FieldValue> = Vec::new();
        for (i, key) in keys.iter().enumerate() {
            values.push(format!("{key}{i}").into());
            values.push((i as i64).into());
        }
        if odd {
            values.push("dangling".into());
        }

        let ctx = LogContext::from_loose(values);
        prop_assert_eq!(ctx.len(), keys.len() + usize::from(odd));
        prop_assert_eq!(ctx.get("ignored").is_some(), odd);
    }

    /// Encoded records are valid JSON carrying every field
    #[test]
    fn test_encoded_record_is_json(message in ".*", value in any::<i64>()) {
        let entry = LogEntry::new(LogLevel::Info, message.clone())
            .with_context(LogContext::new().with_field("value", value));
        let bytes = JsonEncoder::default().encode(&entry).unwrap();

        prop_assert_eq!(bytes.last(), Some(&b'\n'));
        let record: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        prop_assert_eq!(record["msg"].as_str(), Some(message.as_str()));
        prop_assert_eq!(record["value"].as_i64(), Some(value));
    }
}
