use reqwest::{Client, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("rpc method '{method}' failed with code {code}: {message}")]
    Server {
        method: String,
        code: i64,
        message: String,
    },
    #[error("rpc method '{method}' returned neither result nor error")]
    MissingResult { method: String },
}

/// Minimal JSON-RPC 2.0 client for the daemons' HTTP endpoints.
///
/// The daemons expect `params` as a single-element array wrapping the
/// argument object.
#[derive(Clone, Debug)]
pub struct RpcClient {
    client: Client,
    endpoint: Url,
}

#[derive(Serialize)]
struct RpcRequest<'a, P> {
    jsonrpc: &'static str,
    method: &'a str,
    params: [&'a P; 1],
    id: u64,
}

#[derive(Deserialize)]
struct RpcResponse<R> {
    result: Option<R>,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    #[serde(default)]
    code: i64,
    message: String,
}

impl RpcClient {
    #[must_use]
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Dispatch a single call and decode the result, surfacing server error
    /// objects as typed errors.
    pub async fn call<P, R>(&self, method: &str, params: &P) -> Result<R, RpcError>
    where
        P: Serialize + Sync,
        R: DeserializeOwned,
    {
        let request = RpcRequest {
            jsonrpc: "2.0",
            method,
            params: [params],
            id: 1,
        };

        debug!(method, endpoint = %self.endpoint, "dispatching rpc call");

        let envelope: RpcResponse<R> = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = envelope.error {
            return Err(RpcError::Server {
                method: method.to_owned(),
                code: error.code,
                message: error.message,
            });
        }

        envelope.result.ok_or_else(|| RpcError::MissingResult {
            method: method.to_owned(),
        })
    }
}
