//! `ViaCEP` client for postal-code address lookup.
//!
//! Lookup is a convenience: any failure (network, HTTP status, bad JSON, or
//! an unknown code) is logged and reported as "no address", and the buyer
//! types the address by hand.
//!
//! Lookups fire while the buyer is typing, so several can be in flight at
//! once. [`LookupSequencer`] tags each request with a ticket and only the
//! response to the most recent ticket is applied; earlier responses that
//! arrive late come back as [`LookupOutcome::Stale`].

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Deserialize;
use shopkeep_core::{AddressFragment, PostalCode, ValidationError};
use thiserror::Error;
use url::Url;

use crate::config::LookupConfig;

/// Errors that can occur when talking to the lookup service.
#[derive(Debug, Error)]
pub enum LookupError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service returned a non-success status.
    #[error("lookup service returned status {0}")]
    Status(u16),

    /// Service does not know the postal code.
    #[error("postal code not found: {0}")]
    NotFound(String),
}

/// Something that can turn a postal code into address fields.
pub trait AddressLookup {
    /// Look up `code`. `None` means no address data is available.
    fn lookup(&self, code: &PostalCode) -> impl Future<Output = Option<AddressFragment>> + Send;
}

/// HTTP client for `{base_url}/{digits}/json/`.
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    client: reqwest::Client,
    base_url: Url,
}

/// Response body. Every field is optional because an unknown code returns
/// only `erro`.
#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
    /// Present on unknown codes, as `true` or `"true"` depending on the API
    /// revision.
    #[serde(default)]
    erro: Option<serde_json::Value>,
}

impl ViaCepResponse {
    fn is_error(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
            Some(_) => true,
            None => false,
        }
    }
}

impl From<ViaCepResponse> for AddressFragment {
    fn from(body: ViaCepResponse) -> Self {
        Self {
            street: body.logradouro,
            neighborhood: body.bairro,
            city: body.localidade,
            state: body.uf,
        }
    }
}

impl ViaCepClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, config.base_url.clone()))
    }

    /// Create a client around an existing HTTP client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// URL queried for `code`.
    #[must_use]
    pub fn url_for(&self, code: &PostalCode) -> String {
        format!(
            "{}/{}/json/",
            self.base_url.as_str().trim_end_matches('/'),
            code.digits()
        )
    }

    /// Fetch the address for `code`, reporting why it failed.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the service answers with a
    /// non-success status or malformed JSON, or the code is unknown.
    pub async fn fetch(&self, code: &PostalCode) -> Result<AddressFragment, LookupError> {
        let response = self.client.get(self.url_for(code)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body: ViaCepResponse = response.json().await?;
        if body.is_error() {
            return Err(LookupError::NotFound(code.formatted()));
        }
        Ok(body.into())
    }
}

impl AddressLookup for ViaCepClient {
    async fn lookup(&self, code: &PostalCode) -> Option<AddressFragment> {
        match self.fetch(code).await {
            Ok(fragment) => {
                tracing::debug!(cep = %code, city = %fragment.city, "Address found");
                Some(fragment)
            }
            Err(e) => {
                tracing::warn!(cep = %code, error = %e, "Address lookup failed");
                None
            }
        }
    }
}

/// A lookup request's place in the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LookupTicket(u64);

/// What became of one lookup request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Latest request, with address data.
    Found(AddressFragment),
    /// Latest request, but no address data is available.
    NotFound,
    /// A newer request was issued while this one was in flight.
    Stale,
}

impl LookupOutcome {
    /// The fragment to apply, if any.
    #[must_use]
    pub fn into_fragment(self) -> Option<AddressFragment> {
        match self {
            Self::Found(fragment) => Some(fragment),
            Self::NotFound | Self::Stale => None,
        }
    }
}

/// Issues lookup tickets and tells whether a ticket is still the latest.
#[derive(Debug, Default)]
pub struct LookupSequencer {
    latest: AtomicU64,
}

impl LookupSequencer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket newer than every ticket issued before.
    pub fn issue(&self) -> LookupTicket {
        LookupTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether no newer ticket has been issued since `ticket`.
    #[must_use]
    pub fn is_current(&self, ticket: LookupTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Run a lookup for the zip code typed so far.
    ///
    /// Every call supersedes earlier ones, even when `input` is incomplete,
    /// so a response for a code the buyer has since edited is never applied.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidPostalCode` if `input` does not hold
    /// exactly eight digits. No request is sent.
    pub async fn run<L: AddressLookup>(
        &self,
        lookup: &L,
        input: &str,
    ) -> Result<LookupOutcome, ValidationError> {
        let ticket = self.issue();
        let code = PostalCode::parse(input)?;

        let result = lookup.lookup(&code).await;
        if !self.is_current(ticket) {
            tracing::debug!(cep = %code, "Discarding stale address lookup");
            return Ok(LookupOutcome::Stale);
        }
        Ok(result.map_or(LookupOutcome::NotFound, LookupOutcome::Found))
    }
}
