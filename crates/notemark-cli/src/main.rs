use miette::{IntoDiagnostic, Result};
use notemark_common::telemetry::{self, TelemetryConfig};
use notemark_common::{FileStore, NotemarkConfig, NotemarkError, load_roster};
use notemark_editor_core::{
    AnnotationSession, Classification, HeadlessSurface, NotesApi, RosterEntry, SavedNote,
    SubmissionPayload, SubmitCallback, SubmitError, build_tree, compose_text, render_html,
};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::{Parser, Subcommand};

mod replay;

#[derive(Parser)]
#[command(version, about = "notemark - hashtag and mention annotation for notes", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to config file (.toml or .json)
    #[arg(long, global = true, env = "NOTEMARK_CONFIG", default_value = "notemark.toml")]
    config: PathBuf,

    /// Path to roster file, overrides the config file
    #[arg(long, global = true)]
    roster: Option<PathBuf>,

    /// Log at trace level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the classified segments of a note
    Annotate {
        /// Note file
        file: PathBuf,

        /// Print rendered HTML instead
        #[arg(long)]
        html: bool,
    },
    /// Assemble a note and hand it to the notes API
    Submit {
        /// Note file
        file: PathBuf,

        /// Note title
        #[arg(long)]
        title: Option<String>,

        /// Update this note instead of creating one
        #[arg(long)]
        note_id: Option<i64>,
    },
    /// Type a script into a headless editor and print the final markup
    Replay {
        /// Script file; named keys go in braces, e.g. {down} {enter}
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    init_miette()?;

    let cli = Cli::parse();
    telemetry::init(TelemetryConfig::from_env("notemark").verbose(cli.verbose));

    let config = NotemarkConfig::load(&FileStore::new(&cli.config))?;
    let roster = match cli.roster.as_ref().or(config.roster.as_ref()) {
        Some(path) => load_roster(path)?,
        None => {
            tracing::warn!("no roster configured, every mention will be invalid");
            Vec::new()
        }
    };

    match cli.command {
        Commands::Annotate { file, html } => annotate(&file, html, &config, &roster)?,
        Commands::Submit {
            file,
            title,
            note_id,
        } => submit(&file, title.as_deref(), note_id, &config, &roster)?,
        Commands::Replay { file } => run_replay(&file, &config, &roster)?,
    }

    Ok(())
}

fn read_note(path: &Path) -> Result<String, NotemarkError> {
    std::fs::read_to_string(path).map_err(|err| NotemarkError::io(path, err))
}

fn annotate(path: &Path, html: bool, config: &NotemarkConfig, roster: &[RosterEntry]) -> Result<()> {
    let text = read_note(path)?;
    let segments = compose_text(&text, roster);

    if html {
        let tree = build_tree(&segments);
        println!("{}", render_html(&tree, &config.engine.class_prefix));
        return Ok(());
    }

    for segment in &segments {
        let label = match segment.classification {
            Classification::PlainText => "text",
            Classification::Hashtag => "hashtag",
            Classification::ValidMention => "mention",
            Classification::InvalidMention => "mention?",
        };
        let id = segment
            .roster_id
            .map(|id| format!(" -> {id}"))
            .unwrap_or_default();
        println!(
            "{:>5}..{:<5} {:<9} {:?}{}",
            segment.char_range.start, segment.char_range.end, label, segment.text, id
        );
    }
    Ok(())
}

fn submit(
    path: &Path,
    title: Option<&str>,
    note_id: Option<i64>,
    config: &NotemarkConfig,
    roster: &[RosterEntry],
) -> Result<()> {
    let surface = HeadlessSurface::with_text(&read_note(path)?);
    let session = AnnotationSession::new(config.engine.clone());
    let api = PrintingApi { roster };

    let outcome: Rc<RefCell<Option<Result<SavedNote, SubmitError>>>> = Rc::default();
    let sink = outcome.clone();
    session.submit(
        &surface,
        title,
        note_id,
        roster,
        &api,
        Box::new(move |result: Result<SavedNote, SubmitError>| {
            *sink.borrow_mut() = Some(result)
        }),
    );

    match outcome.take() {
        Some(Ok(note)) => {
            println!("saved note {}", note.id);
            Ok(())
        }
        Some(Err(err)) => Err(NotemarkError::from(err).into()),
        None => Err(miette::miette!("notes API never completed the submission")),
    }
}

fn run_replay(path: &Path, config: &NotemarkConfig, roster: &[RosterEntry]) -> Result<()> {
    let script = read_note(path)?;
    let mut session = AnnotationSession::new(config.engine.clone());
    let mut surface = HeadlessSurface::new();

    let stats = replay::replay(
        &mut session,
        &mut surface,
        &replay::parse_script(&script),
        roster,
    )
    .map_err(NotemarkError::from)?;

    tracing::info!(
        renders = stats.renders,
        skipped = stats.skipped,
        accepted = stats.accepted,
        "replay finished"
    );
    println!("{}", surface.markup());
    Ok(())
}

/// Notes API that prints the payload as JSON instead of storing it.
///
/// Rejects blank content the way the persistence service does.
struct PrintingApi<'a> {
    roster: &'a [RosterEntry],
}

impl PrintingApi<'_> {
    fn save(&self, id: i64, payload: SubmissionPayload, done: SubmitCallback) {
        if payload.is_blank() {
            done(Err(SubmitError::field("content", "This field may not be blank.")));
            return;
        }
        match serde_json::to_string_pretty(&payload) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                done(Err(SubmitError::Failed(err.to_string())));
                return;
            }
        }

        let mentions = payload
            .mention_ids
            .iter()
            .filter_map(|id| self.roster.iter().find(|entry| entry.id == *id).cloned())
            .collect();
        done(Ok(SavedNote {
            id,
            title: payload.title,
            content: payload.content,
            tags: payload.tags,
            mentions,
        }));
    }
}

impl NotesApi for PrintingApi<'_> {
    fn create(&self, payload: SubmissionPayload, done: SubmitCallback) {
        self.save(1, payload, done);
    }

    fn update(&self, note_id: i64, payload: SubmissionPayload, done: SubmitCallback) {
        self.save(note_id, payload, done);
    }
}

fn init_miette() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(3)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    miette::set_panic_hook();
    Ok(())
}
