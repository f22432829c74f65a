//! Fire-and-forget score and airdrop submission
//!
//! Submission never blocks the caller and its outcome never reaches the
//! simulation: failures are logged and dropped.

#[cfg(target_arch = "wasm32")]
use crate::airdrop::ClaimError;
use crate::airdrop::AirdropClaim;
use crate::highscores::HighScoreRecord;

/// Sends a finished session's score somewhere durable
pub trait ScoreSubmitter {
    fn submit(&self, record: HighScoreRecord);
}

/// Submitter that only logs (native builds, or no backend configured)
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSubmitter;

impl ScoreSubmitter for LogSubmitter {
    fn submit(&self, record: HighScoreRecord) {
        log::info!(
            "Score {} for {} (not submitted: no backend)",
            record.score,
            record.wallet_address
        );
    }
}

/// Sends a finished airdrop claim. Outcomes are logged, never returned.
pub trait ClaimSubmitter {
    fn submit_claim(&self, claim: AirdropClaim);
}

/// Claim submitter that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct LogClaimSubmitter;

impl ClaimSubmitter for LogClaimSubmitter {
    fn submit_claim(&self, claim: AirdropClaim) {
        log::info!(
            "Airdrop claim for {} (not submitted: no backend)",
            claim.wallet_address
        );
    }
}

#[cfg(target_arch = "wasm32")]
mod http {
    use anyhow::{Context, anyhow};
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    use crate::highscores::Leaderboard;

    async fn send(method: &str, endpoint: &str, body: Option<&str>) -> anyhow::Result<Response> {
        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::SameOrigin);
        if let Some(body) = body {
            opts.set_body(&wasm_bindgen::JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(endpoint, &opts)
            .map_err(|e| anyhow!("bad request: {:?}", e))?;
        if body.is_some() {
            request
                .headers()
                .set("Content-Type", "application/json")
                .map_err(|e| anyhow!("bad header: {:?}", e))?;
        }

        let window = web_sys::window().context("no window")?;
        let value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| anyhow!("fetch failed: {:?}", e))?;
        value
            .dyn_into()
            .map_err(|_| anyhow!("fetch returned a non-Response"))
    }

    /// POST a JSON body and return the status code
    pub async fn post_json(endpoint: &str, body: &str) -> anyhow::Result<u16> {
        Ok(send("POST", endpoint, Some(body)).await?.status())
    }

    /// GET the shared high score table
    pub async fn fetch_leaderboard(endpoint: &str) -> anyhow::Result<Leaderboard> {
        let response = send("GET", endpoint, None).await?;
        if !response.ok() {
            anyhow::bail!("server answered {}", response.status());
        }
        let text = response.text().map_err(|e| anyhow!("no body: {:?}", e))?;
        let text = JsFuture::from(text)
            .await
            .map_err(|e| anyhow!("body read failed: {:?}", e))?
            .as_string()
            .context("body is not text")?;
        Leaderboard::from_json(&text)
    }
}

#[cfg(target_arch = "wasm32")]
pub use http::fetch_leaderboard;

/// POSTs `{ walletAddress, score }` JSON to the high score endpoint
#[cfg(target_arch = "wasm32")]
pub struct HttpSubmitter {
    endpoint: String,
}

#[cfg(target_arch = "wasm32")]
impl HttpSubmitter {
    /// Default API route, also serves the table on GET
    pub const DEFAULT_ENDPOINT: &'static str = "/api/highscores";

    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreSubmitter for HttpSubmitter {
    fn submit(&self, record: HighScoreRecord) {
        if let Err(e) = record.validate() {
            log::warn!("Skipping score submission: {}", e);
            return;
        }
        let body = match serde_json::to_string(&record) {
            Ok(body) => body,
            Err(e) => {
                log::error!("Failed to encode score record: {}", e);
                return;
            }
        };
        let endpoint = self.endpoint.clone();
        let score = record.score;

        wasm_bindgen_futures::spawn_local(async move {
            match http::post_json(&endpoint, &body).await {
                Ok(status) if (200..300).contains(&status) => {
                    log::info!("Score {} submitted", score)
                }
                Ok(status) => log::error!("Score submission failed: server answered {}", status),
                Err(e) => log::error!("Score submission failed: {:#}", e),
            }
        });
    }
}

/// POSTs `{ walletAddress }` JSON to the airdrop endpoint
#[cfg(target_arch = "wasm32")]
pub struct HttpClaimSubmitter {
    endpoint: String,
}

#[cfg(target_arch = "wasm32")]
impl HttpClaimSubmitter {
    pub const DEFAULT_ENDPOINT: &'static str = "/api/airdrop";

    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl ClaimSubmitter for HttpClaimSubmitter {
    fn submit_claim(&self, claim: AirdropClaim) {
        let body = match serde_json::to_string(&claim) {
            Ok(body) => body,
            Err(e) => {
                log::error!("Failed to encode airdrop claim: {}", e);
                return;
            }
        };
        let endpoint = self.endpoint.clone();

        wasm_bindgen_futures::spawn_local(async move {
            match http::post_json(&endpoint, &body).await {
                Ok(status) => match ClaimError::from_status(status, &claim.wallet_address) {
                    Ok(()) => log::info!("Airdrop claimed by {}", claim.wallet_address),
                    Err(e) => log::warn!("Airdrop claim not accepted: {}", e),
                },
                Err(e) => log::error!("Airdrop claim failed: {:#}", e),
            }
        });
    }
}
