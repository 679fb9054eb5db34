use anyhow::{anyhow, bail, Result};
use clap::{Args, Subcommand};
use client_core::{BackendError, CollectionDraft, CredentialStore, GameBackend};
use shared::{
    domain::{CollectionCode, CollectionRef, CollectionVisibility},
    protocol::{CommunitySearchRequest, SortOrder},
};
use tracing::info;

#[derive(Args, Debug)]
#[command(args_conflicts_with_subcommands = true)]
pub struct CollectionsArgs {
    #[command(subcommand)]
    action: Option<CollectionAction>,
    #[command(flatten)]
    list: ListArgs,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Search community collections by name.
    #[arg(long, conflicts_with = "mine")]
    community: Option<String>,
    /// Treat --community as a collection code.
    #[arg(long, requires = "community")]
    by_code: bool,
    #[arg(long, requires = "community")]
    recent: bool,
    /// Collections owned by the logged in user.
    #[arg(long)]
    mine: bool,
}

#[derive(Subcommand, Debug)]
enum CollectionAction {
    /// Create a collection owned by the logged in user.
    Create {
        #[arg(long)]
        name: String,
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Print the words of one of your collections.
    Show {
        #[arg(long)]
        code: String,
    },
    /// Rename, change visibility, or add and remove words.
    Edit(EditArgs),
}

#[derive(Args, Debug, Default)]
pub struct EditArgs {
    #[arg(long)]
    code: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    visibility: Option<CollectionVisibility>,
    /// May be repeated.
    #[arg(long = "add")]
    add: Vec<String>,
    /// May be repeated.
    #[arg(long = "remove")]
    remove: Vec<String>,
}

pub async fn run(
    backend: &impl GameBackend,
    store: &CredentialStore,
    args: CollectionsArgs,
) -> Result<()> {
    match args.action {
        None => list(backend, store, args.list).await,
        Some(CollectionAction::Create { name, words }) => {
            let request = CollectionDraft::new(name, words).to_create_request()?;
            backend
                .create_collection(&token(store).await?, &request)
                .await?;
            println!(
                "Created '{}' with {} words",
                request.name,
                request.words.len()
            );
            Ok(())
        }
        Some(CollectionAction::Show { code }) => {
            let words = backend
                .collection_words(&token(store).await?, &CollectionCode::new(code))
                .await?;
            for entry in words {
                println!("{}", entry.word);
            }
            Ok(())
        }
        Some(CollectionAction::Edit(edit)) => {
            let token = token(store).await?;
            let code = CollectionCode::new(edit.code.clone());
            let current = backend
                .user_collections(&token)
                .await?
                .into_iter()
                .find(|collection| collection.code == code)
                .ok_or_else(|| anyhow!("collection {code} is not one of yours"))?;
            let words = backend.collection_words(&token, &code).await?;

            let mut draft = CollectionDraft::from_saved(current.name, words);
            apply_edits(&mut draft, &edit)?;
            let request = draft.to_update_request(edit.visibility.unwrap_or(current.visibility))?;
            backend.update_collection(&token, &code, &request).await?;
            println!("Saved '{}' with {} words", request.name, request.words.len());
            Ok(())
        }
    }
}

async fn token(store: &CredentialStore) -> Result<String> {
    let credentials = store.load().await?;
    Ok(credentials
        .bearer()
        .ok_or(BackendError::Unauthenticated)?
        .to_string())
}

/// Applies the requested rename and word changes. Removing a word the
/// collection does not have is an error.
pub fn apply_edits(draft: &mut CollectionDraft, edit: &EditArgs) -> Result<()> {
    if let Some(name) = &edit.name {
        draft.name = name.clone();
    }
    for word in &edit.remove {
        if !draft.remove_word(word) {
            bail!("'{word}' is not in the collection");
        }
    }
    for word in &edit.add {
        draft.add_word(word.clone());
    }
    info!(
        "collections: edited name={} words={}",
        draft.name,
        draft.words.len()
    );
    Ok(())
}

async fn list(backend: &impl GameBackend, store: &CredentialStore, args: ListArgs) -> Result<()> {
    let collections: Vec<CollectionRef> = if args.mine {
        backend
            .user_collections(&token(store).await?)
            .await?
            .into_iter()
            .map(Into::into)
            .collect()
    } else if let Some(query) = args.community {
        let order = if args.recent {
            SortOrder::Recent
        } else {
            SortOrder::Popular
        };
        let search = if args.by_code {
            CommunitySearchRequest::by_code(query, order)
        } else {
            CommunitySearchRequest::by_name(query, order)
        };
        backend
            .community_collections(&search)
            .await?
            .into_iter()
            .map(Into::into)
            .collect()
    } else {
        backend
            .general_collections()
            .await?
            .into_iter()
            .map(CollectionRef::general)
            .collect()
    };

    for collection in collections {
        match collection.code {
            Some(code) => println!(
                "{:<24} {code} {:?}",
                collection.name, collection.visibility
            ),
            None => println!("{}", collection.name),
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/collections_tests.rs"]
mod tests;
