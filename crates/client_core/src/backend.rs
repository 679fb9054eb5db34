use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{CollectionCode, GameMode},
    error::ApiError,
    protocol::{
        CollectionWord, CommunityCollection, CommunitySearchRequest, CreateCollectionRequest,
        CreateRoundRequest, CreateRoundResponse, Envelope, LoginRequest, LoginResponse,
        RegisterRequest, UpdateCollectionRequest, UserCollection,
    },
};
use tracing::{debug, info};
use url::Url;

use crate::error::BackendError;

/// The game backend: role assignment, collections and accounts all live there.
#[async_trait]
pub trait GameBackend: Send + Sync {
    async fn game_modes(&self) -> Result<Vec<GameMode>, BackendError>;
    async fn general_collections(&self) -> Result<Vec<String>, BackendError>;
    async fn community_collections(
        &self,
        search: &CommunitySearchRequest,
    ) -> Result<Vec<CommunityCollection>, BackendError>;
    async fn user_collections(&self, token: &str) -> Result<Vec<UserCollection>, BackendError>;
    async fn create_collection(
        &self,
        token: &str,
        request: &CreateCollectionRequest,
    ) -> Result<(), BackendError>;
    async fn collection_words(
        &self,
        token: &str,
        code: &CollectionCode,
    ) -> Result<Vec<CollectionWord>, BackendError>;
    async fn update_collection(
        &self,
        token: &str,
        code: &CollectionCode,
        request: &UpdateCollectionRequest,
    ) -> Result<(), BackendError>;
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, BackendError>;
    /// Returns the session token of the new account.
    async fn register(&self, request: &RegisterRequest) -> Result<String, BackendError>;
    async fn create_round(
        &self,
        request: &CreateRoundRequest,
    ) -> Result<CreateRoundResponse, BackendError>;
}

pub struct HttpBackend {
    http: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        let parsed = Url::parse(base_url).map_err(|source| BackendError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self {
            http: Client::new(),
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        debug!("backend: {method} {path}");
        let request = self.http.request(method, self.url(path));
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, BackendError> {
        let response = self.request(Method::GET, path, token).send().await?;
        unwrap_envelope(path, response).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, BackendError>
    where
        B: serde::Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::POST, path, None)
            .json(body)
            .send()
            .await?;
        unwrap_envelope(path, response).await
    }

    /// Authenticated write whose reply carries no data worth keeping.
    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        token: &str,
        body: &B,
    ) -> Result<(), BackendError>
    where
        B: serde::Serialize + Sync + ?Sized,
    {
        let response = self
            .request(method, path, Some(token))
            .json(body)
            .send()
            .await?;
        if response.status().is_success() {
            return Ok(());
        }
        Err(api_error(response).await)
    }
}

fn require_token(token: &str) -> Result<&str, BackendError> {
    if token.is_empty() {
        return Err(BackendError::Unauthenticated);
    }
    Ok(token)
}

fn user_collection_path(code: &CollectionCode) -> String {
    format!("/colecciones/usuario/{code}")
}

async fn unwrap_envelope<T: DeserializeOwned>(
    endpoint: &str,
    response: Response,
) -> Result<T, BackendError> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    let envelope: Envelope<T> = response.json().await?;
    envelope.data.ok_or_else(|| BackendError::MissingData {
        endpoint: endpoint.to_string(),
    })
}

/// Prefers the envelope's message and falls back to the status reason.
async fn api_error(response: Response) -> BackendError {
    let status = response.status();
    let message = match response.json::<Envelope<serde_json::Value>>().await {
        Ok(envelope) if !envelope.message.is_empty() => envelope.message,
        _ => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    ApiError::new(status.as_u16(), message).into()
}

#[async_trait]
impl GameBackend for HttpBackend {
    async fn game_modes(&self) -> Result<Vec<GameMode>, BackendError> {
        self.get("/modos-partida", None).await
    }

    async fn general_collections(&self) -> Result<Vec<String>, BackendError> {
        self.get("/colecciones/general", None).await
    }

    async fn community_collections(
        &self,
        search: &CommunitySearchRequest,
    ) -> Result<Vec<CommunityCollection>, BackendError> {
        self.post("/colecciones/comunidad", search).await
    }

    async fn user_collections(&self, token: &str) -> Result<Vec<UserCollection>, BackendError> {
        let token = require_token(token)?;
        self.get("/colecciones/usuario", Some(token)).await
    }

    async fn create_collection(
        &self,
        token: &str,
        request: &CreateCollectionRequest,
    ) -> Result<(), BackendError> {
        let token = require_token(token)?;
        self.send(Method::POST, "/colecciones", token, request).await?;
        info!(
            "backend: collection created name={} words={}",
            request.name,
            request.words.len()
        );
        Ok(())
    }

    async fn collection_words(
        &self,
        token: &str,
        code: &CollectionCode,
    ) -> Result<Vec<CollectionWord>, BackendError> {
        let token = require_token(token)?;
        self.get(&user_collection_path(code), Some(token)).await
    }

    async fn update_collection(
        &self,
        token: &str,
        code: &CollectionCode,
        request: &UpdateCollectionRequest,
    ) -> Result<(), BackendError> {
        let token = require_token(token)?;
        self.send(Method::PATCH, &user_collection_path(code), token, request)
            .await?;
        info!(
            "backend: collection updated code={code} visibility={:?} words={}",
            request.visibility,
            request.words.len()
        );
        Ok(())
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, BackendError> {
        let response: LoginResponse = self
            .post(
                "/usuarios/auth/login",
                &LoginRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;
        info!("backend: logged in as {}", response.user_name);
        Ok(response)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<String, BackendError> {
        self.post("/usuarios/auth/register", request).await
    }

    async fn create_round(
        &self,
        request: &CreateRoundRequest,
    ) -> Result<CreateRoundResponse, BackendError> {
        let response: CreateRoundResponse = self.post("/partidas", request).await?;
        info!(
            "backend: round created game_id={} players={}",
            response.game_id,
            response.assignments.len()
        );
        Ok(response)
    }
}

#[cfg(test)]
#[path = "tests/backend_tests.rs"]
mod tests;
