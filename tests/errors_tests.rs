use std::error::Error;

use purgecord::errors::BotError;

#[test]
fn bot_error_implements_error_trait() {
    fn assert_error<T: Error>(_: &T) {}

    let error = BotError::MalformedCommand("test error".to_string());
    assert_error(&error);
}

#[test]
fn bot_error_display() {
    let error = BotError::MalformedCommand("unparseable date: soon".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to parse command: unparseable date: soon"
    );

    let error = BotError::ApiError("connection reset".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to access Discord API: connection reset"
    );
}

#[test]
fn serenity_errors_convert_to_api_errors() {
    let err = serenity::Error::Other("gateway closed");
    let bot_err: BotError = err.into();

    match bot_err {
        BotError::ApiError(msg) => assert!(msg.contains("gateway closed")),
        other => panic!("unexpected error type: {other}"),
    }
}
