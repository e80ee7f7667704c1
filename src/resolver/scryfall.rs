//! HTTP resolver backed by the Scryfall card database.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{CardResolver, RateLimited, ResolveError, MAX_BATCH};
use crate::model::{Card, Prices};

pub const DEFAULT_BASE_URL: &str = "https://api.scryfall.com";

#[derive(Clone, Debug)]
pub struct ScryfallConfig {
    pub base_url: String,
    pub user_agent: String,
}

impl Default for ScryfallConfig {
    fn default() -> Self {
        ScryfallConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("deckhand/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Talks to the Scryfall REST API. Not rate limited on its own; use
/// [`ScryfallClient::rate_limited`] for the usual 100 ms spacing.
pub struct ScryfallClient {
    http: Client,
    base_url: String,
}

impl ScryfallClient {
    pub fn new(config: ScryfallConfig) -> Result<Self, ResolveError> {
        let http = Client::builder()
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| ResolveError::Transport(e.to_string()))?;
        Ok(ScryfallClient {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn rate_limited(config: ScryfallConfig) -> Result<RateLimited<Self>, ResolveError> {
        Ok(RateLimited::new(Self::new(config)?))
    }

    async fn named(&self, mode: &str, name: &str) -> Result<Option<Card>, ResolveError> {
        let response = self
            .http
            .get(format!("{}/cards/named", self.base_url))
            .query(&[(mode, name)])
            .send()
            .await
            .map_err(transport)?;
        optional_card(response).await
    }
}

#[async_trait]
impl CardResolver for ScryfallClient {
    async fn card(&self, id: &str) -> Result<Option<Card>, ResolveError> {
        let response = self
            .http
            .get(card_url(&self.base_url, id)?)
            .send()
            .await
            .map_err(transport)?;
        optional_card(response).await
    }

    async fn cards(&self, ids: &[String]) -> Result<Vec<Card>, ResolveError> {
        if ids.len() > MAX_BATCH {
            return Err(ResolveError::BatchTooLarge {
                requested: ids.len(),
                limit: MAX_BATCH,
            });
        }
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let identifiers: Vec<_> = ids.iter().map(|id| json!({ "id": id })).collect();
        let response = self
            .http
            .post(format!("{}/cards/collection", self.base_url))
            .json(&json!({ "identifiers": identifiers }))
            .send()
            .await
            .map_err(transport)?;
        let response = ensure_success(response).await?;

        let page: CollectionPage = response.json().await.map_err(decode)?;
        if !page.not_found.is_empty() {
            debug!(missing = page.not_found.len(), "batch lookup left ids unresolved");
        }
        Ok(page.data.into_iter().map(Card::from).collect())
    }

    async fn card_named(&self, name: &str) -> Result<Option<Card>, ResolveError> {
        match self.named("exact", name).await? {
            Some(card) => Ok(Some(card)),
            None => self.named("fuzzy", name).await,
        }
    }
}

async fn optional_card(response: Response) -> Result<Option<Card>, ResolveError> {
    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    let response = ensure_success(response).await?;
    let raw: ScryfallCard = response.json().await.map_err(decode)?;
    Ok(Some(raw.into()))
}

async fn ensure_success(response: Response) -> Result<Response, ResolveError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.details,
        Err(_) => status.canonical_reason().unwrap_or("unknown").to_string(),
    };
    warn!(status = status.as_u16(), %message, "card database request failed");
    Err(ResolveError::Status {
        status: status.as_u16(),
        message,
    })
}

/// `{base}/cards/{id}` with the id percent-encoded as one path segment.
fn card_url(base_url: &str, id: &str) -> Result<Url, ResolveError> {
    let mut url = Url::parse(base_url)
        .map_err(|err| ResolveError::Transport(format!("invalid base url {base_url}: {err}")))?;
    url.path_segments_mut()
        .map_err(|()| ResolveError::Transport(format!("base url {base_url} cannot take a path")))?
        .pop_if_empty()
        .extend(["cards", id]);
    Ok(url)
}

fn transport(err: reqwest::Error) -> ResolveError {
    ResolveError::Transport(err.to_string())
}

fn decode(err: reqwest::Error) -> ResolveError {
    ResolveError::Decode(err.to_string())
}

#[derive(Deserialize)]
struct ErrorBody {
    details: String,
}

#[derive(Deserialize)]
struct CollectionPage {
    #[serde(default)]
    data: Vec<ScryfallCard>,
    #[serde(default)]
    not_found: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct ImageUris {
    normal: Option<String>,
}

#[derive(Deserialize)]
struct CardFace {
    mana_cost: Option<String>,
    image_uris: Option<ImageUris>,
}

#[derive(Deserialize)]
struct ScryfallCard {
    id: String,
    name: String,
    set: String,
    set_name: String,
    mana_cost: Option<String>,
    #[serde(default)]
    type_line: String,
    colors: Option<Vec<String>>,
    #[serde(default)]
    color_identity: Vec<String>,
    image_uris: Option<ImageUris>,
    #[serde(default)]
    card_faces: Vec<CardFace>,
    #[serde(default)]
    prices: Prices,
}

impl From<ScryfallCard> for Card {
    fn from(raw: ScryfallCard) -> Self {
        let front = raw.card_faces.first();
        let image_uri = raw
            .image_uris
            .and_then(|uris| uris.normal)
            .or_else(|| front.and_then(|f| f.image_uris.as_ref()).and_then(|u| u.normal.clone()));
        let mana_cost = raw
            .mana_cost
            .filter(|cost| !cost.is_empty())
            .or_else(|| front.and_then(|f| f.mana_cost.clone()))
            .filter(|cost| !cost.is_empty());

        Card {
            id: raw.id,
            name: raw.name,
            set: raw.set,
            set_name: raw.set_name,
            mana_cost,
            type_line: raw.type_line,
            colors: raw.colors,
            color_identity: raw.color_identity,
            image_uri,
            prices: raw.prices,
        }
    }
}
