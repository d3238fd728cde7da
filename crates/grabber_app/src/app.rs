use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use engine_logging::{engine_info, engine_warn};
use grabber_core::{update, FetchPhase, Msg, Notice, SearchSession, SessionView};
use grabber_engine::DownloadCandidate;

use crate::effects::EffectRunner;
use crate::{persistence, render, settings};

/// Upper bound on waiting for an asynchronous engine response before the
/// prompt is given back to the user. The response still applies when it
/// eventually arrives (it is pumped on the next command).
const ENGINE_WAIT: Duration = Duration::from_secs(30);

pub(crate) fn run() -> anyhow::Result<()> {
    engine_logging::initialize_for_app(Path::new("./grabber.log"));
    let settings = settings::from_env();

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let (dispatch_tx, dispatch_rx) = mpsc::channel::<DownloadCandidate>();
    spawn_dispatch_drain(dispatch_rx);

    let runner = EffectRunner::new(settings.config, msg_tx, dispatch_tx)?;
    let library_dir = settings.library_dir;

    let mut session = SearchSession::new();
    if let Some(snapshot) = persistence::load_session(&library_dir) {
        session = dispatch(session, Msg::RestoreSession(snapshot), &runner, &library_dir);
        print!("{}", render::render(&session.view()));
    }

    println!("grabber: search <term> | more | get <n> | list | quit");
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush().ok();
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "" => {}
            "quit" | "exit" => break,
            "list" => print!("{}", render::render(&session.view())),
            "search" => {
                if rest.trim().is_empty() {
                    println!("Usage: search <term>");
                    continue;
                }
                session = dispatch(
                    session,
                    Msg::SearchSubmitted(rest.to_string()),
                    &runner,
                    &library_dir,
                );
                session = dispatch(session, Msg::LoadMoreRequested, &runner, &library_dir);
                session = pump_until(session, &msg_rx, &runner, &library_dir, |view| {
                    view.fetch != FetchPhase::Loading
                });
                print!("{}", render::render(&session.view()));
            }
            "more" => {
                session = dispatch(session, Msg::LoadMoreRequested, &runner, &library_dir);
                session = pump_until(session, &msg_rx, &runner, &library_dir, |view| {
                    view.fetch != FetchPhase::Loading
                });
                print!("{}", render::render(&session.view()));
            }
            "get" => {
                let chosen = rest
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| session.item(index).cloned());
                let Some(item) = chosen else {
                    println!("Usage: get <result number>");
                    continue;
                };
                // The affirmative confirmation gate. The workflow itself
                // never re-prompts.
                if !confirm(&stdin, &item.title)? {
                    println!("Cancelled");
                    continue;
                }
                session = dispatch(session, Msg::DownloadRequested { item }, &runner, &library_dir);
                session = pump_until(session, &msg_rx, &runner, &library_dir, |view| {
                    matches!(
                        view.last_notice,
                        Some(
                            Notice::Dispatched { .. }
                                | Notice::AlreadyInLibrary { .. }
                                | Notice::MetadataFailed
                                | Notice::BadSourceUrl
                        )
                    )
                });
                print!("{}", render::render(&session.view()));
            }
            _ => println!("Unknown command {command:?}"),
        }
    }

    persistence::save_session(&library_dir, &session.snapshot());
    engine_info!("Session saved, exiting");
    Ok(())
}

/// Applies one message, runs the resulting effects, and saves the snapshot
/// whenever the session changed.
fn dispatch(
    session: SearchSession,
    msg: Msg,
    runner: &EffectRunner,
    library_dir: &Path,
) -> SearchSession {
    let (mut next, effects) = update(session, msg);
    runner.run(effects);
    if next.consume_dirty() {
        persistence::save_session(library_dir, &next.snapshot());
    }
    next
}

/// Pumps engine-originated messages into the session until `done` holds or
/// the wait window runs out.
fn pump_until(
    mut session: SearchSession,
    msg_rx: &mpsc::Receiver<Msg>,
    runner: &EffectRunner,
    library_dir: &Path,
    done: impl Fn(&SessionView) -> bool,
) -> SearchSession {
    let deadline = Instant::now() + ENGINE_WAIT;
    while !done(&session.view()) {
        let now = Instant::now();
        if now >= deadline {
            engine_warn!("Timed out waiting for the engine");
            break;
        }
        match msg_rx.recv_timeout(deadline - now) {
            Ok(msg) => session = dispatch(session, msg, runner, library_dir),
            Err(_) => {
                engine_warn!("Timed out waiting for the engine");
                break;
            }
        }
    }
    session
}

fn confirm(stdin: &io::Stdin, title: &str) -> anyhow::Result<bool> {
    print!("Download {title:?}? [y/N] ");
    io::stdout().flush().ok();
    let mut answer = String::new();
    stdin.lock().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

/// Receiving end of the dispatch sink: the boundary to the external
/// download service. The actual byte transfer lives outside this app, so
/// commands are only acknowledged in the log here.
fn spawn_dispatch_drain(dispatch_rx: mpsc::Receiver<DownloadCandidate>) {
    thread::spawn(move || {
        while let Ok(candidate) = dispatch_rx.recv() {
            engine_info!(
                "Download command received: {:?} -> {:?}",
                candidate.media_url,
                candidate.destination
            );
        }
    });
}
