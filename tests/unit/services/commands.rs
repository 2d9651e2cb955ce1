//! Unit tests for chat command parsing

use confluence_signals::services::telegram::Command;

#[test]
fn test_basic_commands() {
    assert_eq!(Command::parse("/start"), Some(Command::Start));
    assert_eq!(Command::parse("/stop"), Some(Command::Stop));
    assert_eq!(Command::parse("/status"), Some(Command::Status));
    assert_eq!(Command::parse("/help"), Some(Command::Help));
}

#[test]
fn test_check_argument_is_uppercased() {
    assert_eq!(
        Command::parse("/check btc/usdt"),
        Some(Command::Check(Some("BTC/USDT".to_string())))
    );
    assert_eq!(Command::parse("/check"), Some(Command::Check(None)));
    assert_eq!(
        Command::parse("  /check   ETH/USDT extra"),
        Some(Command::Check(Some("ETH/USDT".to_string())))
    );
}

#[test]
fn test_bot_name_suffix() {
    assert_eq!(Command::parse("/start@ConfluenceBot"), Some(Command::Start));
    assert_eq!(Command::parse("/STATUS@ConfluenceBot"), Some(Command::Status));
}

#[test]
fn test_non_commands() {
    assert_eq!(Command::parse(""), None);
    assert_eq!(Command::parse("hello"), None);
    assert_eq!(Command::parse("start"), None);
    assert_eq!(Command::parse("/unknown"), None);
}
