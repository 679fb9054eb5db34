use clap::Parser;
use shared::protocol::CollectionWord;

use super::*;

#[derive(Parser, Debug)]
struct Harness {
    #[command(subcommand)]
    command: Wrapped,
}

#[derive(Subcommand, Debug)]
enum Wrapped {
    Collections(CollectionsArgs),
}

fn parse(args: &[&str]) -> CollectionsArgs {
    let Wrapped::Collections(args) = Harness::try_parse_from(
        ["spotimpostor", "collections"]
            .into_iter()
            .chain(args.iter().copied()),
    )
    .expect("valid arguments")
    .command;
    args
}

fn saved() -> CollectionDraft {
    CollectionDraft::from_saved(
        "Pelis",
        vec![
            CollectionWord {
                id: Some(1),
                word: "Alien".to_string(),
            },
            CollectionWord {
                id: Some(2),
                word: "Matrix".to_string(),
            },
            CollectionWord {
                id: Some(3),
                word: "Tiburón".to_string(),
            },
        ],
    )
}

#[test]
fn bare_collections_lists() {
    let args = parse(&["--community", "pel", "--recent"]);
    assert!(args.action.is_none());
    assert_eq!(args.list.community.as_deref(), Some("pel"));
    assert!(args.list.recent);
}

#[test]
fn parses_create_show_and_edit() {
    match parse(&["create", "--name", "Series", "Lost", "Dark", "Fargo"]).action {
        Some(CollectionAction::Create { name, words }) => {
            assert_eq!(name, "Series");
            assert_eq!(words, vec!["Lost", "Dark", "Fargo"]);
        }
        other => panic!("expected create, got {other:?}"),
    }

    assert!(matches!(
        parse(&["show", "--code", "P1"]).action,
        Some(CollectionAction::Show { code }) if code == "P1"
    ));

    match parse(&[
        "edit",
        "--code",
        "P1",
        "--visibility",
        "publica",
        "--add",
        "Coco",
        "--add",
        "Up",
        "--remove",
        "Alien",
    ])
    .action
    {
        Some(CollectionAction::Edit(edit)) => {
            assert_eq!(edit.visibility, Some(CollectionVisibility::Public));
            assert_eq!(edit.add, vec!["Coco", "Up"]);
            assert_eq!(edit.remove, vec!["Alien"]);
        }
        other => panic!("expected edit, got {other:?}"),
    }
}

#[test]
fn edits_rename_and_swap_words() {
    let mut draft = saved();
    let edit = EditArgs {
        code: "P1".to_string(),
        name: Some("Cine".to_string()),
        add: vec!["Coco".to_string()],
        remove: vec!["matrix".to_string()],
        ..EditArgs::default()
    };

    apply_edits(&mut draft, &edit).expect("edit");

    assert_eq!(draft.name, "Cine");
    let words: Vec<_> = draft.words.iter().map(|w| (w.id, w.word.as_str())).collect();
    assert_eq!(
        words,
        vec![(Some(1), "Alien"), (Some(3), "Tiburón"), (None, "Coco")]
    );
}

#[test]
fn removing_an_unknown_word_fails() {
    let mut draft = saved();
    let edit = EditArgs {
        remove: vec!["Titanic".to_string()],
        ..EditArgs::default()
    };

    let err = apply_edits(&mut draft, &edit).expect_err("unknown word");
    assert!(err.to_string().contains("Titanic"), "{err}");
    assert_eq!(draft, saved());
}
