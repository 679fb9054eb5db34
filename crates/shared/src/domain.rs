use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(ParticipantId);
id_newtype!(GameId);
id_newtype!(CollectionCode);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Civil,
    Impostor,
}

impl Role {
    pub fn is_impostor(self) -> bool {
        matches!(self, Role::Impostor)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Civil => f.write_str("CIVIL"),
            Role::Impostor => f.write_str("IMPOSTOR"),
        }
    }
}

/// Terminal result of a round, from the civilians' point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Victory,
    Defeat,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Victory => f.write_str("VICTORY"),
            Outcome::Defeat => f.write_str("DEFEAT"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub outcome: Outcome,
    pub elapsed_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
    #[serde(default)]
    pub eliminated: bool,
    #[serde(default)]
    pub ready: bool,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: ParticipantId::new(id),
            name: name.into(),
            role,
            word: None,
            eliminated: false,
            ready: false,
        }
    }

    pub fn with_word(mut self, word: impl Into<String>) -> Self {
        self.word = Some(word.into());
        self
    }

    pub fn is_active(&self) -> bool {
        !self.eliminated
    }
}

/// Round data as handed over once roles have been assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundData {
    pub participants: Vec<Participant>,
    pub impostor_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMode {
    #[serde(rename = "modo")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
}

impl GameMode {
    pub const BLIND: &'static str = "A CIEGAS";

    pub fn is_blind(&self) -> bool {
        self.name.eq_ignore_ascii_case(Self::BLIND)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum CollectionVisibility {
    #[default]
    General,
    #[serde(rename = "PUBLICA")]
    Public,
    #[serde(rename = "COMPARTIDA")]
    Shared,
    #[serde(rename = "PRIVADA")]
    Private,
}

impl std::str::FromStr for CollectionVisibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GENERAL" => Ok(Self::General),
            "PUBLICA" | "PUBLIC" => Ok(Self::Public),
            "COMPARTIDA" | "SHARED" => Ok(Self::Shared),
            "PRIVADA" | "PRIVATE" => Ok(Self::Private),
            other => Err(format!("unknown collection visibility '{other}'")),
        }
    }
}

/// A collection the round's words are drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CollectionCode>,
    pub visibility: CollectionVisibility,
}

impl CollectionRef {
    pub fn general(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: None,
            visibility: CollectionVisibility::General,
        }
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
