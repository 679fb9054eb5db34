use super::*;

fn civil(id: &str) -> Participant {
    Participant::new(id, id.to_uppercase(), Role::Civil).with_word("lighthouse")
}

fn impostor(id: &str) -> Participant {
    Participant::new(id, id.to_uppercase(), Role::Impostor)
}

fn eliminated(mut participant: Participant) -> Participant {
    participant.eliminated = true;
    participant
}

#[test]
fn tally_accounts_for_every_active_participant() {
    let lists = vec![
        vec![civil("a"), civil("b"), impostor("c")],
        vec![eliminated(civil("a")), civil("b"), impostor("c"), impostor("d")],
        vec![eliminated(impostor("a")), eliminated(civil("b"))],
        Vec::new(),
    ];

    for participants in lists {
        let active = participants.iter().filter(|p| !p.eliminated).count();
        assert_eq!(tally(&participants).active_total(), active);
    }
}

#[test]
fn no_outcome_while_civilians_outnumber_impostors() {
    let participants = vec![civil("a"), civil("b"), civil("c"), impostor("d")];
    assert_eq!(evaluate(&participants, 1), None);
}

#[test]
fn victory_once_every_impostor_is_out() {
    let participants = vec![civil("a"), civil("b"), civil("c"), eliminated(impostor("d"))];
    assert_eq!(evaluate(&participants, 1), Some(Outcome::Victory));
}

#[test]
fn defeat_when_civilians_no_longer_outnumber_impostors() {
    let participants = vec![
        eliminated(civil("a")),
        eliminated(civil("b")),
        civil("c"),
        impostor("d"),
        impostor("e"),
    ];
    assert_eq!(evaluate(&participants, 2), Some(Outcome::Defeat));

    let tied = vec![eliminated(civil("a")), civil("b"), impostor("c")];
    assert_eq!(evaluate(&tied, 1), Some(Outcome::Defeat));
}

#[test]
fn victory_is_checked_before_defeat() {
    // No civilians left either, but with zero active impostors civilians win.
    let participants = vec![eliminated(civil("a")), eliminated(impostor("b"))];
    assert_eq!(evaluate(&participants, 1), Some(Outcome::Victory));
}

#[test]
fn zero_configured_impostors_never_ends_the_round() {
    let participants = vec![eliminated(civil("a")), eliminated(civil("b")), civil("c")];
    assert_eq!(evaluate(&participants, 0), None);

    let with_impostor = vec![eliminated(civil("a")), impostor("b")];
    assert_eq!(evaluate(&with_impostor, 0), None);
}

#[test]
fn rejects_impostor_count_outside_bounds() {
    let players = || vec![civil("a"), civil("b"), impostor("c")];

    assert!(matches!(
        Round::new(players(), 0),
        Err(SessionError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        Round::new(players(), 3),
        Err(SessionError::InvalidConfiguration(_))
    ));
    assert!(Round::new(players(), 1).is_ok());
    assert!(Round::new(players(), 2).is_ok());
}

#[test]
fn rejects_duplicate_participant_ids() {
    let err = Round::new(vec![civil("a"), civil("a"), impostor("c")], 1).expect_err("duplicate");
    assert!(err.to_string().contains("more than once"), "unexpected: {err}");
}

#[test]
fn eliminate_unknown_participant_is_not_found() {
    let mut round = Round::new(vec![civil("a"), civil("b"), impostor("c")], 1).expect("round");
    let before = round.clone();

    let err = round
        .eliminate(&ParticipantId::new("zed"))
        .expect_err("unknown id");
    assert_eq!(err, SessionError::NotFound(ParticipantId::new("zed")));
    assert_eq!(round, before);
}

#[test]
fn second_elimination_is_rejected_and_changes_nothing() {
    let mut round = Round::new(
        vec![civil("a"), civil("b"), civil("c"), civil("d"), impostor("e")],
        1,
    )
    .expect("round");

    round.eliminate(&ParticipantId::new("a")).expect("first");
    let after_first = round.clone();
    let outcome_after_first = round.evaluate();

    let err = round
        .eliminate(&ParticipantId::new("a"))
        .expect_err("second");
    assert_eq!(err, SessionError::AlreadyEliminated(ParticipantId::new("a")));
    assert_eq!(round, after_first);
    assert_eq!(round.evaluate(), outcome_after_first);
}

#[test]
fn participants_keep_join_order() {
    let round = Round::from_data(RoundData {
        participants: vec![civil("zoe"), impostor("adam"), civil("mia")],
        impostor_count: 1,
    })
    .expect("round");

    let ids: Vec<&str> = round.participants().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["zoe", "adam", "mia"]);
    assert_eq!(round.impostors().count(), 1);
}
