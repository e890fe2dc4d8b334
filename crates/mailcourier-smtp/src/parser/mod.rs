//! SMTP reply parser.

use crate::error::{Error, Result};
use crate::types::{Reply, ReplyCode};

/// Parses an SMTP reply from accumulated response lines.
///
/// Replies can be single-line or multi-line:
/// - Single: `250 OK\r\n`
/// - Multi: `250-First line\r\n250-Second line\r\n250 Last line\r\n`
///
/// The reply code is taken from the final line; each line contributes its
/// trailing text.
///
/// # Errors
///
/// Returns an error if any line is malformed.
pub fn parse_reply(lines: &[String]) -> Result<Reply> {
    if lines.is_empty() {
        return Err(Error::MalformedReply("empty reply".into()));
    }

    let mut code = ReplyCode::new(0);
    let mut message = Vec::new();
    for line in lines {
        let (line_code, text) = parse_line(line)?;
        code = line_code;
        message.push(text.to_string());
    }

    Ok(Reply::new(code, message))
}

/// Splits one reply line into its code and trailing text.
fn parse_line(line: &str) -> Result<(ReplyCode, &str)> {
    if line.len() < 3 {
        return Err(Error::MalformedReply(format!("reply too short: {line}")));
    }

    let code_str = &line[0..3];
    let code = code_str
        .parse::<u16>()
        .map_err(|_| Error::MalformedReply(format!("invalid reply code: {code_str}")))?;

    // 4th character is the separator: '-' continues, ' ' ends. A bare code
    // with no separator at all also ends the reply.
    let text = match line.as_bytes().get(3).copied() {
        None => "",
        Some(b' ' | b'-') => &line[4..],
        Some(_) => {
            return Err(Error::MalformedReply(format!(
                "invalid separator in reply line: {line}"
            )));
        }
    };

    Ok((ReplyCode::new(code), text))
}

/// Checks if a line ends a (possibly multi-line) reply.
///
/// Only an explicit `-` separator in the 4th column continues a reply;
/// anything else is final.
#[must_use]
pub fn is_last_reply_line(line: &str) -> bool {
    line.as_bytes().get(3) != Some(&b'-')
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_line_reply() {
        let lines = vec!["250 OK".to_string()];
        let reply = parse_reply(&lines).unwrap();
        assert_eq!(reply.code.as_u16(), 250);
        assert_eq!(reply.message, vec!["OK"]);
        assert_eq!(reply.text(), "OK");
    }

    #[test]
    fn test_parse_multi_line_reply() {
        let lines = vec!["250-Hello".to_string(), "250 World".to_string()];
        let reply = parse_reply(&lines).unwrap();
        assert_eq!(reply.code.as_u16(), 250);
        assert_eq!(reply.message, vec!["Hello", "World"]);
        // The canonical text is the final line's
        assert_eq!(reply.text(), "World");
    }

    #[test]
    fn test_parse_greeting() {
        let lines = vec!["220 smtp.example.com ESMTP ready".to_string()];
        let reply = parse_reply(&lines).unwrap();
        assert_eq!(reply.code, ReplyCode::SERVICE_READY);
        assert_eq!(reply.text(), "smtp.example.com ESMTP ready");
    }

    #[test]
    fn test_parse_bare_code() {
        let lines = vec!["250".to_string()];
        let reply = parse_reply(&lines).unwrap();
        assert_eq!(reply.code.as_u16(), 250);
        assert_eq!(reply.text(), "");
    }

    #[test]
    fn test_is_last_reply_line() {
        assert!(is_last_reply_line("250 OK"));
        assert!(!is_last_reply_line("250-Continuing"));
        assert!(is_last_reply_line("250"));
        assert!(is_last_reply_line("220 "));
    }

    #[test]
    fn test_parse_error_empty() {
        assert!(parse_reply(&[]).is_err());
    }

    #[test]
    fn test_parse_error_too_short() {
        let lines = vec!["25".to_string()];
        assert!(parse_reply(&lines).is_err());
    }

    #[test]
    fn test_parse_error_invalid_code() {
        let lines = vec!["ABC OK".to_string()];
        assert!(parse_reply(&lines).is_err());
    }

    #[test]
    fn test_parse_error_invalid_separator() {
        let lines = vec!["250+nope".to_string()];
        assert!(parse_reply(&lines).is_err());
    }

    #[test]
    fn test_code_comes_from_final_line() {
        // Not protocol-legal, but the final line decides the code
        let lines = vec!["250-first".to_string(), "354 go ahead".to_string()];
        let reply = parse_reply(&lines).unwrap();
        assert_eq!(reply.code, ReplyCode::START_DATA);
    }
}
