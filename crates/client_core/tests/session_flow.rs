use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use client_core::{BackendError, GameBackend, Lobby, RoundSetup, SessionRuntime, SessionState};
use shared::{
    domain::{CollectionCode, CollectionRef, GameId, GameMode, Outcome, Role, RoundOutcome},
    protocol::{
        CollectionWord, CommunityCollection, CommunitySearchRequest, CreateCollectionRequest,
        CreateRoundRequest, CreateRoundResponse, LoginResponse, RegisterRequest, RoleAssignment,
        UpdateCollectionRequest, UserCollection,
    },
};
use tokio::sync::Mutex;

/// Assigns the impostor role to the last players in the request.
#[derive(Default)]
struct InMemoryBackend {
    created: Mutex<Vec<CreateRoundRequest>>,
}

#[async_trait]
impl GameBackend for InMemoryBackend {
    async fn game_modes(&self) -> Result<Vec<GameMode>, BackendError> {
        Ok(Vec::new())
    }

    async fn general_collections(&self) -> Result<Vec<String>, BackendError> {
        Ok(vec!["Animales".to_string()])
    }

    async fn community_collections(
        &self,
        _search: &CommunitySearchRequest,
    ) -> Result<Vec<CommunityCollection>, BackendError> {
        Ok(Vec::new())
    }

    async fn user_collections(&self, _token: &str) -> Result<Vec<UserCollection>, BackendError> {
        Err(BackendError::Unauthenticated)
    }

    async fn create_collection(
        &self,
        _token: &str,
        _request: &CreateCollectionRequest,
    ) -> Result<(), BackendError> {
        Err(BackendError::Unauthenticated)
    }

    async fn collection_words(
        &self,
        _token: &str,
        _code: &CollectionCode,
    ) -> Result<Vec<CollectionWord>, BackendError> {
        Err(BackendError::Unauthenticated)
    }

    async fn update_collection(
        &self,
        _token: &str,
        _code: &CollectionCode,
        _request: &UpdateCollectionRequest,
    ) -> Result<(), BackendError> {
        Err(BackendError::Unauthenticated)
    }

    async fn login(&self, _email: &str, _password: &str) -> Result<LoginResponse, BackendError> {
        Err(BackendError::Unauthenticated)
    }

    async fn register(&self, _request: &RegisterRequest) -> Result<String, BackendError> {
        Err(BackendError::Unauthenticated)
    }

    async fn create_round(
        &self,
        request: &CreateRoundRequest,
    ) -> Result<CreateRoundResponse, BackendError> {
        let civilians = request.players.len() - request.impostor_count;
        let assignments = request
            .players
            .iter()
            .enumerate()
            .map(|(index, player)| RoleAssignment {
                player: player.clone(),
                role: if index < civilians {
                    Role::Civil
                } else {
                    Role::Impostor
                },
                word: (index < civilians).then(|| "tortuga".to_string()),
            })
            .collect();
        self.created.lock().await.push(request.clone());
        Ok(CreateRoundResponse {
            game_id: GameId::new("round-1"),
            assignments,
        })
    }
}

#[tokio::test(start_paused = true)]
async fn setup_to_victory() {
    let backend = InMemoryBackend::default();
    let setup = RoundSetup::new(
        GameMode {
            name: "CLASICO".to_string(),
            description: String::new(),
        },
        CollectionRef::general("Animales"),
        ["Ana", "Ben", "Cleo", "Dev", "Eli"],
        2,
    );
    let request = setup.to_request().expect("valid setup");
    let response = backend.create_round(&request).await.expect("round");
    assert_eq!(backend.created.lock().await.len(), 1);

    let mut lobby = Lobby::new(response.into_round_data(request.impostor_count), false);
    for name in ["Ana", "Ben", "Cleo", "Dev", "Eli"] {
        lobby.mark_ready(&name.into()).expect("ready");
    }
    let round = lobby.start().expect("start");

    let outcomes = Arc::new(std::sync::Mutex::new(Vec::<RoundOutcome>::new()));
    let sink = outcomes.clone();
    let (handle, task) = SessionRuntime::spawn(
        round,
        Arc::new(move |outcome: RoundOutcome| {
            sink.lock().expect("lock").push(outcome);
        }),
    );

    tokio::time::sleep(Duration::from_millis(30_500)).await;
    handle.open_vote().await.expect("vote");
    let first = handle.cast_vote("Dev".into()).await.expect("eject Dev");
    assert!(first.was_impostor());
    assert_eq!(first.outcome, None);

    tokio::time::sleep(Duration::from_millis(3_700)).await;
    let snapshot = handle.snapshot();
    assert_eq!(snapshot.state, SessionState::Running);
    assert_eq!(snapshot.elapsed_seconds, 30);

    handle.open_vote().await.expect("vote");
    let second = handle.cast_vote("Eli".into()).await.expect("eject Eli");
    assert_eq!(second.outcome, Some(Outcome::Victory));

    let outcome = task.await.expect("join").expect("outcome");
    assert_eq!(outcome.outcome, Outcome::Victory);
    assert_eq!(outcome.elapsed_seconds, 30);
    assert_eq!(outcomes.lock().expect("lock").as_slice(), &[outcome]);
}

#[tokio::test]
async fn invalid_setup_never_reaches_the_backend() {
    let setup = RoundSetup::new(
        GameMode {
            name: "CLASICO".to_string(),
            description: String::new(),
        },
        CollectionRef::general("Animales"),
        ["Ana", "Ben", "Cleo", "Dev"],
        3,
    );
    assert!(setup.to_request().is_err());
}
