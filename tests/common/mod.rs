//! Common test utilities

#![allow(dead_code)]

use async_trait::async_trait;
use lettre::transport::stub::AsyncStubTransport;
use mailer_core::email::{SesApi, SesMailTransport, SesSendRequest, SmtpMailTransport};
use mailer_core::error::TransportError;
use mailer_core::Mailer;
use std::sync::{Arc, Mutex};

/// SES client double that records every request it receives
#[derive(Clone, Default)]
pub struct RecordingSesClient {
    requests: Arc<Mutex<Vec<SesSendRequest>>>,
    fail: bool,
}

impl RecordingSesClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<SesSendRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SesApi for RecordingSesClient {
    async fn submit(&self, request: SesSendRequest) -> Result<Option<String>, TransportError> {
        self.requests.lock().unwrap().push(request);
        if self.fail {
            Err(TransportError::RateLimited(
                "ThrottlingException: Maximum sending rate exceeded".to_string(),
            ))
        } else {
            Ok(Some("0100018c-test-message-id".to_string()))
        }
    }
}

/// Mailer over lettre's stub transport, plus a handle to inspect it
pub fn smtp_stub_mailer(stub: AsyncStubTransport) -> (Mailer, AsyncStubTransport) {
    let transport = SmtpMailTransport::with_submission(stub.clone());
    (Mailer::with_transport(Arc::new(transport)), stub)
}

/// Mailer over a recording SES client, plus a handle to inspect it
pub fn ses_stub_mailer(client: RecordingSesClient) -> (Mailer, RecordingSesClient) {
    let transport = SesMailTransport::with_client(client.clone());
    (Mailer::with_transport(Arc::new(transport)), client)
}

/// A local port with nothing listening on it
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

/// Minimal SMTP server that accepts everything and records each client line.
///
/// Returns the port it listens on and the shared transcript.
pub async fn spawn_smtp_sink() -> (u16, Arc<Mutex<Vec<String>>>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let transcript = Arc::new(Mutex::new(Vec::new()));

    let log = transcript.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let log = log.clone();
            tokio::spawn(async move {
                let _ = serve_smtp_session(stream, log).await;
            });
        }
    });

    (port, transcript)
}

async fn serve_smtp_session(
    stream: tokio::net::TcpStream,
    log: Arc<Mutex<Vec<String>>>,
) -> std::io::Result<()> {
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();
    writer.write_all(b"220 sink ESMTP ready\r\n").await?;

    let mut in_data = false;
    while let Some(line) = lines.next_line().await? {
        log.lock().unwrap().push(line.clone());

        if in_data {
            if line == "." {
                in_data = false;
                writer.write_all(b"250 2.0.0 queued\r\n").await?;
            }
            continue;
        }

        let verb = line
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();
        let reply: &[u8] = match verb.as_str() {
            "EHLO" | "HELO" => b"250 sink\r\n",
            "MAIL" | "RCPT" | "RSET" | "NOOP" => b"250 2.1.0 ok\r\n",
            "DATA" => {
                in_data = true;
                b"354 end data with <CR><LF>.<CR><LF>\r\n"
            }
            "QUIT" => {
                writer.write_all(b"221 2.0.0 bye\r\n").await?;
                return Ok(());
            }
            _ => b"502 5.5.2 command not recognized\r\n",
        };
        writer.write_all(reply).await?;
    }

    Ok(())
}
