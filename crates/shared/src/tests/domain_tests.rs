use super::*;

#[test]
fn blind_mode_is_recognised_case_insensitively() {
    let mode = GameMode {
        name: "a ciegas".to_string(),
        description: String::new(),
    };
    assert!(mode.is_blind());

    let classic = GameMode {
        name: "CLASICO".to_string(),
        description: String::new(),
    };
    assert!(!classic.is_blind());
}

#[test]
fn visibility_parses_both_languages() {
    assert_eq!("privada".parse::<CollectionVisibility>(), Ok(CollectionVisibility::Private));
    assert_eq!("Shared".parse::<CollectionVisibility>(), Ok(CollectionVisibility::Shared));
    assert_eq!(" general ".parse::<CollectionVisibility>(), Ok(CollectionVisibility::General));
    assert!("secret".parse::<CollectionVisibility>().is_err());
}

#[test]
fn ids_serialize_as_plain_strings() {
    let id = ParticipantId::new("ana");
    assert_eq!(serde_json::to_string(&id).expect("serialize"), "\"ana\"");
    assert_eq!(id.to_string(), "ana");
}

#[test]
fn roles_use_backend_names() {
    assert_eq!(
        serde_json::to_string(&Role::Impostor).expect("serialize"),
        "\"IMPOSTOR\""
    );
    assert!(Role::Impostor.is_impostor());
    assert!(!Role::Civil.is_impostor());
}
