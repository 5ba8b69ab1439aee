//! Line-delimited JSON-RPC over stdio
//!
//! One message per line in, one response per line out. Notifications produce
//! no output; blank lines are skipped. Logging must go to stderr so stdout
//! carries protocol traffic only.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::client::Credential;
use crate::server::McpServer;

impl McpServer {
    /// Serve stdin/stdout until EOF
    pub async fn run_stdio(&self, credential: Option<Credential>) -> io::Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve_lines(stdin, stdout, credential.as_ref()).await
    }

    /// Serve any line-oriented reader/writer pair
    pub async fn serve_lines<R, W>(
        &self,
        reader: R,
        mut writer: W,
        credential: Option<&Credential>,
    ) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let Some(response) = self.handle_bytes(line.as_bytes(), credential).await else {
                continue;
            };
            let mut out = serde_json::to_vec(&response)?;
            out.push(b'\n');
            writer.write_all(&out).await?;
            writer.flush().await?;
        }
        tracing::info!("stdin closed, shutting down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::Value;

    use super::*;
    use crate::client::{UpstreamClient, UpstreamOutcome, UpstreamRequest};
    use crate::{RpcResponse, ServerInfo, ToolCatalog};

    struct Unreachable;

    #[async_trait]
    impl UpstreamClient for Unreachable {
        async fn execute(&self, _: &Credential, _: &UpstreamRequest) -> UpstreamOutcome {
            panic!("no upstream call expected")
        }
    }

    fn server() -> McpServer {
        McpServer::new(Arc::new(ToolCatalog::new().unwrap()), Arc::new(Unreachable), ServerInfo::default())
    }

    #[tokio::test]
    async fn test_one_response_per_request_line() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            "not json\n",
        );
        let mut output = Vec::new();
        server().serve_lines(input.as_bytes(), &mut output, None).await.unwrap();

        let responses: Vec<RpcResponse> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].id, Value::from(1));
        assert_eq!(responses[0].result, Some(serde_json::json!({})));
        assert_eq!(responses[1].id, Value::Null);
        assert_eq!(responses[1].error.as_ref().unwrap().code, -32700);
    }
}
