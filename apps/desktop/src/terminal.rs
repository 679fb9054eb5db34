use std::{io::Write, sync::Arc};

use anyhow::{bail, Context, Result};
use client_core::{
    format_elapsed, Lobby, Round, SessionHandle, SessionRuntime, SessionSnapshot, SessionState,
};
use shared::domain::{ParticipantId, Role, RoundOutcome};
use tokio::{
    io::{AsyncBufRead, Lines},
    sync::mpsc,
};

/// One line typed at the session prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Vote,
    Cancel,
    Reveal,
    Status,
    Quit,
    Help,
    /// A ballot number or participant id.
    Target(String),
    Empty,
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "" => Input::Empty,
        "vote" | "v" => Input::Vote,
        "cancel" | "c" => Input::Cancel,
        "reveal" => Input::Reveal,
        "status" | "s" => Input::Status,
        "quit" | "q" | "exit" => Input::Quit,
        "help" | "?" => Input::Help,
        _ => Input::Target(line.to_string()),
    }
}

/// Ballot numbers are 1-based positions among the active participants. Anything
/// else is taken as an id and left for the session to accept or reject.
pub fn resolve_target(snapshot: &SessionSnapshot, raw: &str) -> ParticipantId {
    if let Ok(number) = raw.parse::<usize>() {
        if let Some(participant) = number
            .checked_sub(1)
            .and_then(|index| snapshot.active_participants().nth(index))
        {
            return participant.id.clone();
        }
    }
    snapshot
        .participants
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(raw))
        .map(|p| p.id.clone())
        .unwrap_or_else(|| ParticipantId::new(raw))
}

async fn next_line<R>(lines: &mut Lines<R>) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    lines.next_line().await.context("failed to read input")
}

/// Passes the device around: every player privately reads their card and
/// confirms before the round starts.
pub async fn run_lobby<R, W>(
    mut lobby: Lobby,
    lines: &mut Lines<R>,
    out: &mut W,
) -> Result<Round>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let players: Vec<(ParticipantId, String)> = lobby
        .participants()
        .iter()
        .map(|p| (p.id.clone(), p.name.clone()))
        .collect();

    for (id, name) in players {
        writeln!(out, "Pass the device to {name} and press enter.")?;
        if next_line(lines).await?.is_none() {
            bail!("input closed before {name} saw their card");
        }

        let card = lobby.reveal(&id)?;
        match (card.role, card.word.as_deref()) {
            (Some(Role::Impostor), _) => writeln!(out, "{name}, you are the IMPOSTOR.")?,
            (Some(Role::Civil), Some(word)) => {
                writeln!(out, "{name}, you are a civilian. The word is: {word}")?
            }
            (None, Some(word)) => writeln!(out, "{name}, your word is: {word}")?,
            (_, None) => writeln!(out, "{name}, you have no word.")?,
        }

        writeln!(out, "Press enter when you are ready.")?;
        if next_line(lines).await?.is_none() {
            bail!("input closed before {name} was ready");
        }
        lobby.mark_ready(&id)?;
        writeln!(
            out,
            "{}/{} ready",
            lobby.ready_count(),
            lobby.participants().len()
        )?;
    }

    Ok(lobby.start()?)
}

/// Runs a round at the prompt until it ends or the user quits.
///
/// Returns the outcome, or `None` when the round was abandoned.
pub async fn run_session<R, W>(
    round: Round,
    lines: &mut Lines<R>,
    out: &mut W,
) -> Result<Option<RoundOutcome>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let impostors: Vec<String> = round.impostors().map(|p| p.name.clone()).collect();
    // The result screen shows whatever the session reports.
    let (results, mut reported) = mpsc::unbounded_channel();
    let (handle, task) = SessionRuntime::spawn(
        round,
        Arc::new(move |outcome: RoundOutcome| {
            let _ = results.send(outcome);
        }),
    );
    let mut snapshots = handle.subscribe();
    let mut last_state = SessionState::Running;

    writeln!(out, "Round started. Type 'help' for commands.")?;
    loop {
        if snapshots.borrow().state == SessionState::Ended {
            break;
        }
        tokio::select! {
            line = next_line(lines) => {
                let Some(line) = line? else { break };
                if !handle_input(&handle, parse_input(&line), out).await? {
                    break;
                }
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = snapshots.borrow_and_update().state;
                if state == SessionState::Ended {
                    break;
                }
                if last_state == SessionState::Announcing && state == SessionState::Running {
                    writeln!(out, "The clock is running again.")?;
                }
                last_state = state;
            }
        }
    }

    drop(handle);
    task.await.context("session task failed")?;
    // The reporter is dropped with the finished task, so this never waits.
    let outcome = reported.recv().await;
    match outcome {
        Some(outcome) => {
            writeln!(
                out,
                "{} after {}",
                outcome.outcome,
                format_elapsed(outcome.elapsed_seconds)
            )?;
            writeln!(out, "The impostors were: {}", impostors.join(", "))?;
        }
        None => writeln!(out, "Round abandoned.")?,
    }
    Ok(outcome)
}

/// Returns `false` once the user asked to leave.
async fn handle_input<W: Write>(
    handle: &SessionHandle,
    input: Input,
    out: &mut W,
) -> Result<bool> {
    match input {
        Input::Empty => {}
        Input::Quit => return Ok(false),
        Input::Help => {
            writeln!(
                out,
                "vote: open a vote | cancel: close it | <number|name>: eject | reveal: give up | status | quit"
            )?;
        }
        Input::Status => print_status(&handle.snapshot(), out)?,
        Input::Vote => match handle.open_vote().await {
            Ok(()) => print_ballot(&handle.snapshot(), out)?,
            Err(err) => writeln!(out, "{err}")?,
        },
        Input::Cancel => match handle.cancel_vote().await {
            Ok(()) => writeln!(out, "Vote cancelled.")?,
            Err(err) => writeln!(out, "{err}")?,
        },
        Input::Target(raw) => {
            let snapshot = handle.snapshot();
            if snapshot.state != SessionState::VoteOpen {
                writeln!(out, "Open a vote first.")?;
                return Ok(true);
            }
            match handle.cast_vote(resolve_target(&snapshot, &raw)).await {
                Ok(elimination) => writeln!(out, "{elimination}")?,
                Err(err) => writeln!(out, "{err}")?,
            }
        }
        Input::Reveal => {
            if let Err(err) = handle.reveal().await {
                writeln!(out, "{err}")?;
            }
        }
    }
    Ok(true)
}

fn print_status<W: Write>(snapshot: &SessionSnapshot, out: &mut W) -> Result<()> {
    writeln!(
        out,
        "[{}] {} | {} players left",
        format_elapsed(snapshot.elapsed_seconds),
        snapshot.state,
        snapshot.active_participants().count()
    )?;
    Ok(())
}

fn print_ballot<W: Write>(snapshot: &SessionSnapshot, out: &mut W) -> Result<()> {
    writeln!(out, "Who is the impostor?")?;
    for (index, participant) in snapshot.active_participants().enumerate() {
        writeln!(out, "  {}. {}", index + 1, participant.name)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/terminal_tests.rs"]
mod tests;
