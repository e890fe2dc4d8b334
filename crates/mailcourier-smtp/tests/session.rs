//! Integration tests driving a `Session` against a scripted local server.
//!
//! Each test binds a localhost listener, plays a fixed server side of the
//! dialogue, and captures every line the client sends so the wire order can
//! be asserted exactly.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::net::tcp::OwnedReadHalf;
use tokio::task::JoinHandle;
use tokio_test::assert_ok;

use mailcourier_smtp::{
    Address, AuthMethod, ConnectionType, Error, ErrorKind, OutgoingMessage, Session,
    SessionConfig, SessionState,
};

/// One step of the server side of the dialogue.
enum Step {
    /// Write raw bytes to the client (may span several reply lines).
    Send(&'static str),
    /// Read one line and assert it starts with the given prefix.
    Expect(&'static str),
    /// Read message data lines until the terminating lone dot.
    ExpectData,
    /// Assert the client hung up without sending anything further.
    ExpectEof,
}

use Step::{Expect, ExpectData, ExpectEof, Send};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

async fn read_trimmed_line(reader: &mut BufReader<OwnedReadHalf>) -> String {
    let mut line = String::new();
    let n = reader.read_line(&mut line).await.unwrap();
    assert!(n > 0, "client closed the connection mid-script");
    line.trim_end().to_string()
}

/// Spawns a one-connection server that plays the script and returns every
/// line the client sent.
async fn spawn_server(script: Vec<Step>) -> (u16, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (read_half, mut write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);
        let mut received = Vec::new();

        for step in script {
            match step {
                Send(data) => {
                    write_half.write_all(data.as_bytes()).await.unwrap();
                }
                Expect(prefix) => {
                    let line = read_trimmed_line(&mut reader).await;
                    assert!(
                        line.starts_with(prefix),
                        "expected line starting with {prefix:?}, got {line:?}"
                    );
                    received.push(line);
                }
                ExpectData => loop {
                    let line = read_trimmed_line(&mut reader).await;
                    let done = line == ".";
                    received.push(line);
                    if done {
                        break;
                    }
                },
                ExpectEof => {
                    let mut line = String::new();
                    let n = reader.read_line(&mut line).await.unwrap();
                    assert_eq!(n, 0, "expected EOF, got {line:?}");
                }
            }
        }

        received
    });

    (port, handle)
}

fn plain_session(port: u16) -> Session {
    let config = SessionConfig::builder("127.0.0.1")
        .port(port)
        .connection_type(ConnectionType::Plain)
        .display_name("client.test")
        .response_timeout(Duration::from_secs(2))
        .build();
    Session::new(config)
}

fn addr(s: &str) -> Address {
    Address::new(s).unwrap()
}

#[tokio::test]
async fn connect_runs_greeting_and_ehlo() {
    init_tracing();
    let (port, handle) = spawn_server(vec![
        Send("220 mail.test ESMTP ready\r\n"),
        Expect("EHLO client.test"),
        Send("250-mail.test\r\n250-STARTTLS\r\n250-AUTH PLAIN LOGIN\r\n250 SIZE 1000\r\n"),
    ])
    .await;

    let mut session = plain_session(port);
    assert_ok!(session.connect().await);

    assert_eq!(session.state(), SessionState::Ready);
    assert!(session.is_connected());

    let info = session.server_info();
    assert_eq!(info.hostname, "mail.test");
    assert!(info.supports_starttls());
    assert_eq!(info.max_message_size(), Some(1000));
    assert_eq!(info.auth_mechanisms().len(), 2);

    let received = handle.await.unwrap();
    assert_eq!(received, vec!["EHLO client.test"]);
}

#[tokio::test]
async fn connect_rejects_bad_greeting_without_sending_ehlo() {
    let (port, handle) = spawn_server(vec![Send("554 go away\r\n"), ExpectEof]).await;

    let mut session = plain_session(port);
    let err = session.connect().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ServerError);
    assert_eq!(session.state(), SessionState::Disconnected);
    assert_eq!(session.last_reply().unwrap().code.as_u16(), 554);

    let received = handle.await.unwrap();
    assert!(received.is_empty(), "no command may precede the greeting");
}

#[tokio::test]
async fn multiline_reply_is_one_response() {
    let (port, handle) = spawn_server(vec![
        Send("220 ok\r\n"),
        Expect("EHLO"),
        Send("250-Hello\r\n250 World\r\n"),
    ])
    .await;

    let mut session = plain_session(port);
    assert_ok!(session.connect().await);

    let reply = session.last_reply().unwrap();
    assert_eq!(reply.code.as_u16(), 250);
    assert_eq!(reply.message, vec!["Hello", "World"]);
    assert_eq!(reply.text(), "World");

    handle.await.unwrap();
}

#[tokio::test]
async fn send_mail_happy_path() {
    init_tracing();
    let (port, handle) = spawn_server(vec![
        Send("220 mail.test ready\r\n"),
        Expect("EHLO client.test"),
        Send("250 mail.test\r\n"),
        Expect("MAIL FROM:<alice@example.com>"),
        Send("250 ok\r\n"),
        Expect("RCPT TO:<bob@example.com>"),
        Send("250 ok\r\n"),
        Expect("DATA"),
        Send("354 go ahead\r\n"),
        ExpectData,
        Send("250 accepted\r\n"),
    ])
    .await;

    let mut session = plain_session(port);
    assert_ok!(session.connect().await);
    assert_eq!(session.state(), SessionState::Ready);

    let message = OutgoingMessage::new(
        addr("alice@example.com"),
        "Subject: hi\r\n\r\nhello world\r\n",
    )
    .with_to(addr("bob@example.com"));

    assert_ok!(session.send_mail(&message).await);
    // the transaction does not move the state machine
    assert_eq!(session.state(), SessionState::Ready);

    let received = handle.await.unwrap();
    assert_eq!(
        received,
        vec![
            "EHLO client.test",
            "MAIL FROM:<alice@example.com>",
            "RCPT TO:<bob@example.com>",
            "DATA",
            "Subject: hi",
            "",
            "hello world",
            "",
            ".",
        ]
    );
}

#[tokio::test]
async fn send_mail_stops_at_first_rejected_recipient() {
    let (port, handle) = spawn_server(vec![
        Send("220 mail.test ready\r\n"),
        Expect("EHLO"),
        Send("250 mail.test\r\n"),
        Expect("MAIL FROM:<alice@example.com>"),
        Send("250 ok\r\n"),
        Expect("RCPT TO:<to@example.com>"),
        Send("250 ok\r\n"),
        Expect("RCPT TO:<cc@example.com>"),
        Send("550 no such user\r\n"),
        ExpectEof,
    ])
    .await;

    let mut session = plain_session(port);
    assert_ok!(session.connect().await);

    let message = OutgoingMessage::new(addr("alice@example.com"), "Subject: x\r\n\r\nbody\r\n")
        .with_to(addr("to@example.com"))
        .with_cc(addr("cc@example.com"))
        .with_bcc(addr("bcc@example.com"));

    let err = session.send_mail(&message).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ClientError);
    match err {
        Error::RecipientRejected { address, reply } => {
            assert_eq!(address.as_str(), "cc@example.com");
            assert_eq!(reply.code.as_u16(), 550);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // the session itself stays usable; recovery is the caller's decision
    assert_eq!(session.state(), SessionState::Ready);

    drop(session);
    let received = handle.await.unwrap();
    assert_eq!(
        received,
        vec![
            "EHLO client.test",
            "MAIL FROM:<alice@example.com>",
            "RCPT TO:<to@example.com>",
            "RCPT TO:<cc@example.com>",
        ],
        "neither the Bcc recipient nor DATA may be sent after a rejection"
    );
}

#[tokio::test]
async fn login_plain_sends_exact_payload() {
    let (port, handle) = spawn_server(vec![
        Send("220 mail.test ready\r\n"),
        Expect("EHLO"),
        Send("250-mail.test\r\n250 AUTH PLAIN LOGIN\r\n"),
        Expect("AUTH PLAIN AHVzZXIAcGFzcw=="),
        Send("235 authenticated\r\n"),
    ])
    .await;

    let config = SessionConfig::builder("127.0.0.1")
        .port(port)
        .connection_type(ConnectionType::Plain)
        .display_name("client.test")
        .credentials("user", "pass")
        .auth_method(AuthMethod::Plain)
        .response_timeout(Duration::from_secs(2))
        .build();
    let mut session = Session::new(config);

    assert_ok!(session.connect().await);
    assert_ok!(session.login().await);
    assert_eq!(session.state(), SessionState::Authenticated);
    assert!(session.is_authenticated());

    handle.await.unwrap();
}

#[tokio::test]
async fn login_login_failure_leaves_state_ready() {
    let (port, handle) = spawn_server(vec![
        Send("220 mail.test ready\r\n"),
        Expect("EHLO"),
        Send("250 mail.test\r\n"),
        Expect("AUTH LOGIN"),
        Send("334 VXNlcm5hbWU6\r\n"),
        // base64("user")
        Expect("dXNlcg=="),
        Send("334 UGFzc3dvcmQ6\r\n"),
        // base64("pass")
        Expect("cGFzcw=="),
        Send("535 bad credentials\r\n"),
    ])
    .await;

    let mut session = plain_session(port);
    assert_ok!(session.connect().await);

    let err = session
        .login_with("user", "pass", AuthMethod::Login)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
    assert_eq!(err.reply().unwrap().code.as_u16(), 535);

    // not authenticated, but still connected
    assert_eq!(session.state(), SessionState::Ready);
    assert!(!session.is_authenticated());

    handle.await.unwrap();
}

#[tokio::test]
async fn login_login_stops_after_first_mismatch() {
    let (port, handle) = spawn_server(vec![
        Send("220 mail.test ready\r\n"),
        Expect("EHLO"),
        Send("250 mail.test\r\n"),
        Expect("AUTH LOGIN"),
        Send("503 bad sequence\r\n"),
        ExpectEof,
    ])
    .await;

    let mut session = plain_session(port);
    assert_ok!(session.connect().await);

    let err = session
        .login_with("user", "pass", AuthMethod::Login)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
    assert_eq!(session.state(), SessionState::Ready);

    drop(session);
    let received = handle.await.unwrap();
    assert_eq!(
        received,
        vec!["EHLO client.test", "AUTH LOGIN"],
        "credential lines may not follow a rejected AUTH LOGIN"
    );
}

#[tokio::test]
async fn login_with_method_none_is_a_no_op() {
    let (port, handle) = spawn_server(vec![
        Send("220 mail.test ready\r\n"),
        Expect("EHLO"),
        Send("250 mail.test\r\n"),
        ExpectEof,
    ])
    .await;

    let mut session = plain_session(port);
    assert_ok!(session.connect().await);
    assert_ok!(session.login().await);

    // nothing to negotiate, nothing sent, state untouched
    assert_eq!(session.state(), SessionState::Ready);

    drop(session);
    let received = handle.await.unwrap();
    assert_eq!(received, vec!["EHLO client.test"]);
}

#[tokio::test]
async fn greeting_timeout_surfaces_as_response_timeout() {
    let (port, handle) = spawn_server(vec![ExpectEof]).await;

    let config = SessionConfig::builder("127.0.0.1")
        .port(port)
        .connection_type(ConnectionType::Plain)
        .response_timeout(Duration::from_millis(100))
        .build();
    let mut session = Session::new(config);

    let err = session.connect().await.unwrap_err();
    assert!(matches!(err, Error::ResponseTimeout));
    assert_eq!(err.kind(), ErrorKind::ResponseTimeout);
    assert_eq!(session.state(), SessionState::Disconnected);

    handle.await.unwrap();
}

#[tokio::test]
async fn quit_does_not_wait_for_a_reply() {
    let (port, handle) = spawn_server(vec![
        Send("220 mail.test ready\r\n"),
        Expect("EHLO"),
        Send("250 mail.test\r\n"),
        Expect("QUIT"),
    ])
    .await;

    let mut session = plain_session(port);
    assert_ok!(session.connect().await);
    // the server never answers QUIT; this must still return promptly
    assert_ok!(session.quit().await);

    let received = handle.await.unwrap();
    assert_eq!(received, vec!["EHLO client.test", "QUIT"]);
}

#[tokio::test]
async fn switching_connection_type_resets_the_session() {
    let (port, handle) = spawn_server(vec![
        Send("220 mail.test ready\r\n"),
        Expect("EHLO"),
        Send("250 mail.test\r\n"),
        ExpectEof,
    ])
    .await;

    let mut session = plain_session(port);
    assert_ok!(session.connect().await);
    assert_eq!(session.state(), SessionState::Ready);

    session.set_connection_type(ConnectionType::ImplicitTls);
    assert_eq!(session.state(), SessionState::Disconnected);

    let message =
        OutgoingMessage::new(addr("a@example.com"), "x").with_to(addr("b@example.com"));
    let err = session.send_mail(&message).await.unwrap_err();
    assert!(matches!(err, Error::InvalidState(_)));

    drop(session);
    handle.await.unwrap();
}

#[tokio::test]
async fn operations_require_a_connection() {
    let mut session = Session::new(SessionConfig::new("smtp.example.com"));

    let message =
        OutgoingMessage::new(addr("a@example.com"), "x").with_to(addr("b@example.com"));
    assert!(matches!(
        session.send_mail(&message).await,
        Err(Error::InvalidState(_))
    ));
    assert!(matches!(
        session.login_with("u", "p", AuthMethod::Plain).await,
        Err(Error::InvalidState(_))
    ));
    assert!(matches!(session.quit().await, Err(Error::InvalidState(_))));
}
