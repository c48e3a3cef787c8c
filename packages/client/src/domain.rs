//! Domain logic for client-side operations.
//!
//! Pure functions deciding what to do with prompt input and session errors.

use reportcast_server::ui::dispatch::{
    GET_ANNUAL_REPORTS, GET_INITIAL_METRICS, GET_INITIAL_RECENT_REPORTS,
};

use url::Url;

use crate::error::ClientError;

/// Commands accepted at the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Recent,
    Annual,
    Metrics,
    Help,
}

impl Command {
    /// Request event name sent for this command, `None` for local commands
    pub fn request_event(&self) -> Option<&'static str> {
        match self {
            Command::Recent => Some(GET_INITIAL_RECENT_REPORTS),
            Command::Annual => Some(GET_ANNUAL_REPORTS),
            Command::Metrics => Some(GET_INITIAL_METRICS),
            Command::Help => None,
        }
    }
}

/// Parse a prompt line into a command.
///
/// Matching is case-insensitive and ignores surrounding whitespace.
pub fn parse_command(line: &str) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "recent" => Some(Command::Recent),
        "annual" => Some(Command::Annual),
        "metrics" => Some(Command::Metrics),
        "help" | "?" => Some(Command::Help),
        _ => None,
    }
}

/// Build the WebSocket URL carrying the session token.
///
/// Existing query pairs are kept; a `token` pair already in `base` is replaced.
pub fn connect_url(base: &str, token: &str) -> Result<Url, ClientError> {
    let mut url =
        Url::parse(base).map_err(|e| ClientError::InvalidUrl(base.to_string(), e.to_string()))?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "token")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("token", token);
    Ok(url)
}

/// Check if the client should exit immediately based on the error type.
///
/// A rejected credential or a bad URL fails the same way on every retry.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(
        error,
        ClientError::AuthRejected(_) | ClientError::InvalidUrl(..)
    )
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_known_words() {
        // テスト項目: recent / annual / metrics が対応するリクエストに変換される
        // given (前提条件):
        let lines = ["recent", "  ANNUAL ", "metrics"];

        // when (操作):
        let events: Vec<_> = lines
            .iter()
            .map(|line| parse_command(line).and_then(|c| c.request_event()))
            .collect();

        // then (期待する結果):
        assert_eq!(
            events,
            vec![
                Some("getInitialRecentReports"),
                Some("getAnnualReports"),
                Some("getInitialMetrics"),
            ]
        );
    }

    #[test]
    fn test_parse_command_help_is_local() {
        // テスト項目: help はサーバーへ送信しないローカルコマンドになる
        // given (前提条件):
        let line = "?";

        // when (操作):
        let command = parse_command(line);

        // then (期待する結果):
        assert_eq!(command, Some(Command::Help));
        assert_eq!(command.and_then(|c| c.request_event()), None);
    }

    #[test]
    fn test_parse_command_unknown_word() {
        // テスト項目: 未知の入力はコマンドにならない
        // given (前提条件):
        let line = "delete everything";

        // when (操作):
        let command = parse_command(line);

        // then (期待する結果):
        assert_eq!(command, None);
    }

    #[test]
    fn test_connect_url_appends_token() {
        // テスト項目: トークンがクエリに追加され、特殊文字はエンコードされる
        // given (前提条件):
        let base = "ws://127.0.0.1:3000/ws/reports";

        // when (操作):
        let url = connect_url(base, "a+b/c=").unwrap();

        // then (期待する結果):
        assert_eq!(
            url.as_str(),
            "ws://127.0.0.1:3000/ws/reports?token=a%2Bb%2Fc%3D"
        );
    }

    #[test]
    fn test_connect_url_keeps_existing_query() {
        // テスト項目: 既存のクエリは保持され、既存の token は置き換えられる
        // given (前提条件):
        let base = "ws://campus.example/ws/reports?tenant=north&token=old";

        // when (操作):
        let url = connect_url(base, "new").unwrap();

        // then (期待する結果):
        assert_eq!(
            url.as_str(),
            "ws://campus.example/ws/reports?tenant=north&token=new"
        );
    }

    #[test]
    fn test_connect_url_rejects_invalid_base() {
        // テスト項目: 解釈できない URL は InvalidUrl になり、再接続しない
        // given (前提条件):
        let base = "not a url";

        // when (操作):
        let result = connect_url(base, "token");

        // then (期待する結果):
        let error = result.unwrap_err();
        assert!(matches!(error, ClientError::InvalidUrl(..)));
        assert!(!should_attempt_reconnect(&error, 0, 5));
    }

    #[test]
    fn test_should_exit_immediately_with_auth_rejected() {
        // テスト項目: AuthRejected エラーの場合、即座に終了すべきと判定される
        // given (前提条件):
        let error = ClientError::AuthRejected("invalid credential".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_exit_immediately_with_connection_error() {
        // テスト項目: ConnectionError の場合、即座に終了すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_with_auth_rejected() {
        // テスト項目: AuthRejected エラーの場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::AuthRejected("expired credential".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 0, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_within_limit() {
        // テスト項目: 再接続回数が上限未満の場合、再接続すべきと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 4, 5);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_attempt_reconnect_at_limit() {
        // テスト項目: 再接続回数が上限に達した場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 5, 5);

        // then (期待する結果):
        assert!(!result);
    }
}
