//! Wire types for the game backend's JSON API.
//!
//! The backend speaks Spanish field names; the Rust side keeps English names and
//! maps them with serde renames.

use serde::{Deserialize, Serialize};

use crate::domain::{
    CollectionCode, CollectionRef, CollectionVisibility, GameId, Participant, ParticipantId, Role,
    RoundData,
};

/// Every backend response, successful or not, is wrapped in this envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub codigo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            message: "OK".to_string(),
            codigo: "200".to_string(),
            data: Some(data),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoundRequest {
    #[serde(rename = "modo")]
    pub mode: String,
    #[serde(rename = "nombreColeccion")]
    pub collection_name: String,
    #[serde(rename = "codigoColeccion")]
    pub collection_code: Option<CollectionCode>,
    #[serde(rename = "tipoColeccion")]
    pub collection_visibility: CollectionVisibility,
    #[serde(rename = "cantidadJugadores")]
    pub player_count: usize,
    #[serde(rename = "cantidadImpostores")]
    pub impostor_count: usize,
    #[serde(rename = "jugadores")]
    pub players: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    #[serde(rename = "jugador")]
    pub player: String,
    #[serde(rename = "rol")]
    pub role: Role,
    #[serde(rename = "palabra", default)]
    pub word: Option<String>,
}

impl RoleAssignment {
    /// The backend identifies players by their display name.
    pub fn into_participant(self) -> Participant {
        Participant {
            id: ParticipantId::new(self.player.clone()),
            name: self.player,
            role: self.role,
            word: self.word.filter(|word| !word.trim().is_empty()),
            eliminated: false,
            ready: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoundResponse {
    #[serde(rename = "idPartida")]
    pub game_id: GameId,
    #[serde(rename = "rolesJugadores")]
    pub assignments: Vec<RoleAssignment>,
}

impl CreateRoundResponse {
    pub fn into_round_data(self, impostor_count: usize) -> RoundData {
        RoundData {
            participants: self
                .assignments
                .into_iter()
                .map(RoleAssignment::into_participant)
                .collect(),
            impostor_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SearchBy {
    #[default]
    #[serde(rename = "Nombre")]
    Name,
    #[serde(rename = "Código")]
    Code,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "POPULAR")]
    Popular,
    #[serde(rename = "RECIENTE")]
    Recent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunitySearchRequest {
    pub query: String,
    pub codigo: Option<String>,
    #[serde(rename = "tipoBusqueda")]
    pub search_by: SearchBy,
    #[serde(rename = "tipoOrden")]
    pub order: SortOrder,
}

impl CommunitySearchRequest {
    pub fn by_name(query: impl Into<String>, order: SortOrder) -> Self {
        Self {
            query: query.into(),
            codigo: None,
            search_by: SearchBy::Name,
            order,
        }
    }

    pub fn by_code(code: impl Into<String>, order: SortOrder) -> Self {
        Self {
            query: String::new(),
            codigo: Some(code.into()),
            search_by: SearchBy::Code,
            order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityCollection {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "codigo")]
    pub code: CollectionCode,
    #[serde(rename = "autor", default)]
    pub author: String,
    #[serde(rename = "visibilidad")]
    pub visibility: CollectionVisibility,
}

impl From<CommunityCollection> for CollectionRef {
    fn from(value: CommunityCollection) -> Self {
        Self {
            name: value.name,
            code: Some(value.code),
            visibility: value.visibility,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCollection {
    #[serde(rename = "nombreColeccion")]
    pub name: String,
    #[serde(rename = "codigoColeccion")]
    pub code: CollectionCode,
    #[serde(rename = "tipoColeccion")]
    pub visibility: CollectionVisibility,
}

impl From<UserCollection> for CollectionRef {
    fn from(value: UserCollection) -> Self {
        Self {
            name: value.name,
            code: Some(value.code),
            visibility: value.visibility,
        }
    }
}

/// Body of `POST /colecciones`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCollectionRequest {
    #[serde(rename = "nombreColeccion")]
    pub name: String,
    #[serde(rename = "palabras")]
    pub words: Vec<String>,
}

/// A word stored in a user collection. Words not yet saved have no id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionWord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "palabra")]
    pub word: String,
}

impl CollectionWord {
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            id: None,
            word: word.into(),
        }
    }
}

/// Body of `PATCH /colecciones/usuario/{code}`. The word list replaces the
/// stored one: saved words keep their id, new ones go without.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCollectionRequest {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "visibilidad")]
    pub visibility: CollectionVisibility,
    #[serde(rename = "palabras")]
    pub words: Vec<CollectionWord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "correo")]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "nombre")]
    pub user_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "nombre")]
    pub user_name: String,
    #[serde(rename = "correo")]
    pub email: String,
    pub password: String,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
