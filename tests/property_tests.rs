//! Property-based tests for sinklog using proptest

use parking_lot::Mutex;
use proptest::prelude::*;
use sinklog::prelude::*;
use sinklog::LineFormat;
use std::sync::Arc;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
    ]
}

fn quiet_logger() -> Logger {
    Logger::builder()
        .min_level(LogLevel::Debug)
        .format("{message}")
        .without_console()
        .build()
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// LogLevel string conversions roundtrip, in any letter case
    #[test]
    fn test_log_level_str_roundtrip(level in any_level(), lower in any::<bool>()) {
        let text = if lower { level.to_str().to_lowercase() } else { level.to_str().to_string() };
        let parsed: LogLevel = text.parse().unwrap();
        prop_assert_eq!(level, parsed);
        prop_assert_eq!(level.to_string(), level.to_str());
    }

    /// Ordering follows the numeric severity
    #[test]
    fn test_log_level_ordering(a in any_level(), b in any_level()) {
        prop_assert_eq!(a <= b, (a as u8) <= (b as u8));
        prop_assert_eq!(a.cmp(&b), (a as u8).cmp(&(b as u8)));
    }
}

// ============================================================================
// Channel Tests
// ============================================================================

proptest! {
    /// set_channels clears `unset` before setting `set`
    #[test]
    fn test_set_channels_formula(initial in any::<u8>(), set in any::<u8>(), unset in any::<u8>()) {
        let logger = quiet_logger();
        logger.set_channels(ChannelFlags::new(initial), ChannelFlags::ALL);
        prop_assert_eq!(logger.channels().bits(), initial);

        let next = logger.set_channels(ChannelFlags::new(set), ChannelFlags::new(unset));
        prop_assert_eq!(next.bits(), (initial & !unset) | set);
        prop_assert_eq!(logger.channels(), next);
    }

    /// Channel 0 always passes; any other channel passes iff it shares a bit
    /// with the enabled mask
    #[test]
    fn test_channel_filter(enabled in any::<u8>(), channel in any::<u8>(), level in any_level()) {
        let logger = quiet_logger();
        logger.set_channels(ChannelFlags::new(enabled), ChannelFlags::ALL);

        let expected = channel == 0 || (channel & enabled) != 0;
        prop_assert_eq!(logger.is_enabled(level, ChannelFlags::new(channel)), expected);

        let lines = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&lines);
        let _handle = logger.attach_sink(move |_: LogLevel, _: &str| *counter.lock() += 1);
        logger.log_channel(level, ChannelFlags::new(channel), "x");
        prop_assert_eq!(*lines.lock(), usize::from(expected));
    }
}

// ============================================================================
// Level Filter Tests
// ============================================================================

proptest! {
    /// A message is dispatched iff its level is at least the minimum
    #[test]
    fn test_level_filter(min in any_level(), level in any_level()) {
        let logger = quiet_logger();
        logger.set_min_level(min);

        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink_lines = Arc::clone(&lines);
        let _handle = logger.attach_sink(move |l: LogLevel, _: &str| sink_lines.lock().push(l));

        logger.log(level, "m");
        let expected = if level >= min { vec![level] } else { vec![] };
        prop_assert_eq!(&*lines.lock(), &expected);
        prop_assert_eq!(logger.metrics().filtered(), u64::from(level < min));
    }
}

// ============================================================================
// Format Tests
// ============================================================================

proptest! {
    /// Placeholder-looking text inside a message is never expanded
    #[test]
    fn test_message_text_not_rescanned(message in "[a-z{}]{0,40}", level in any_level()) {
        let format = LineFormat::parse("[{level}] {message}!");
        let line = format.render(level, &message);
        prop_assert_eq!(line, format!("[{}] {}!", level.letter(), message));
    }

    /// A template without placeholders renders as itself
    #[test]
    fn test_literal_template(template in "[a-z0-9 \\[\\]:]{0,40}", level in any_level()) {
        let format = LineFormat::parse(template.as_str());
        prop_assert_eq!(format.render(level, "ignored"), template);
    }

    /// format_only agrees with what sinks receive
    #[test]
    fn test_format_only_matches_dispatch(message in ".{0,60}", level in any_level()) {
        let logger = quiet_logger();
        logger.set_format("<{level}> {message} <{level}>");

        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink_lines = Arc::clone(&lines);
        let _handle = logger.attach_sink(move |_: LogLevel, line: &str| {
            sink_lines.lock().push(line.to_string());
        });

        logger.log(level, &message);
        let expected = vec![logger.format_only(level, &message)];
        prop_assert_eq!(&*lines.lock(), &expected);
    }
}
