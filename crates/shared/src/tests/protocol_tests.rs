use serde_json::json;

use super::*;

#[test]
fn create_round_request_uses_backend_field_names() {
    let request = CreateRoundRequest {
        mode: "CLASICO".to_string(),
        collection_name: "Pelis".to_string(),
        collection_code: Some(CollectionCode::new("P1")),
        collection_visibility: CollectionVisibility::Shared,
        player_count: 3,
        impostor_count: 1,
        players: vec!["Ana".to_string(), "Ben".to_string(), "Cleo".to_string()],
    };

    assert_eq!(
        serde_json::to_value(&request).expect("serialize"),
        json!({
            "modo": "CLASICO",
            "nombreColeccion": "Pelis",
            "codigoColeccion": "P1",
            "tipoColeccion": "COMPARTIDA",
            "cantidadJugadores": 3,
            "cantidadImpostores": 1,
            "jugadores": ["Ana", "Ben", "Cleo"]
        })
    );
}

#[test]
fn role_assignments_become_participants() {
    let envelope: Envelope<CreateRoundResponse> = serde_json::from_value(json!({
        "message": "OK",
        "codigo": "200",
        "data": {
            "idPartida": "12",
            "rolesJugadores": [
                { "jugador": "Ana", "rol": "CIVIL", "palabra": "faro" },
                { "jugador": "Ben", "rol": "IMPOSTOR", "palabra": "  " },
                { "jugador": "Cleo", "rol": "CIVIL", "palabra": "faro" }
            ]
        }
    }))
    .expect("deserialize");

    let data = envelope.data.expect("data").into_round_data(1);
    assert_eq!(data.impostor_count, 1);
    assert_eq!(data.participants[0].id, ParticipantId::new("Ana"));
    assert_eq!(data.participants[0].word.as_deref(), Some("faro"));
    assert_eq!(data.participants[1].role, Role::Impostor);
    assert_eq!(data.participants[1].word, None);
    assert!(data.participants.iter().all(|p| !p.eliminated && !p.ready));
}

#[test]
fn error_envelope_may_omit_data() {
    let envelope: Envelope<serde_json::Value> =
        serde_json::from_value(json!({ "message": "Credenciales inválidas", "codigo": "401" }))
            .expect("deserialize");
    assert_eq!(envelope.message, "Credenciales inválidas");
    assert!(envelope.data.is_none());
}

#[test]
fn community_search_by_code() {
    let search = CommunitySearchRequest::by_code("X7K2", SortOrder::Recent);
    assert_eq!(
        serde_json::to_value(&search).expect("serialize"),
        json!({
            "query": "",
            "codigo": "X7K2",
            "tipoBusqueda": "Código",
            "tipoOrden": "RECIENTE"
        })
    );
}

#[test]
fn collections_convert_to_refs() {
    let collection: CollectionRef = UserCollection {
        name: "Mis pelis".to_string(),
        code: CollectionCode::new("M9"),
        visibility: CollectionVisibility::Private,
    }
    .into();
    assert_eq!(collection.code, Some(CollectionCode::new("M9")));
    assert_eq!(collection.visibility, CollectionVisibility::Private);
}

#[test]
fn collection_edits_keep_ids_of_saved_words() {
    let request = UpdateCollectionRequest {
        name: "Pelis".to_string(),
        visibility: CollectionVisibility::Private,
        words: vec![
            CollectionWord {
                id: Some(7),
                word: "Alien".to_string(),
            },
            CollectionWord::new("Tiburón"),
        ],
    };

    assert_eq!(
        serde_json::to_value(&request).expect("serialize"),
        json!({
            "nombre": "Pelis",
            "visibilidad": "PRIVADA",
            "palabras": [
                { "id": 7, "palabra": "Alien" },
                { "id": null, "palabra": "Tiburón" }
            ]
        })
    );

    let words: Vec<CollectionWord> =
        serde_json::from_value(json!([{ "palabra": "Matrix" }])).expect("words");
    assert_eq!(words, vec![CollectionWord::new("Matrix")]);
}
