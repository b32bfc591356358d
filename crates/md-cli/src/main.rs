//! MediaDeck command-line session
//!
//! Usage:
//!   mediadeck take.wav --editor sox {in} {out} trim 0 1
//!
//! Then type commands on stdin (`help` lists them).

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::Command as Process;

use anyhow::{Context, Result, bail};
use clap::Parser;
use md_core::{ArtifactRef, MediaKind};
use md_display::{AudioMedia, MediaDisplay, OutputLabel};
use md_file::FsArtifactStore;
use md_state::DisplayPreferences;

#[derive(Parser)]
#[command(name = "mediadeck", about = "Edit a media file through a snapshot history")]
struct Cli {
    /// File to open
    target: PathBuf,

    /// Editor command run by `edit`; `{in}` and `{out}` are replaced by the
    /// previous and new snapshot paths
    #[arg(long, num_args = 1.., value_name = "PROGRAM")]
    editor: Vec<String>,

    /// Preferences file (defaults to the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep snapshot files on exit
    #[arg(long)]
    keep_snapshots: bool,
}

#[derive(Debug, PartialEq)]
enum Command {
    Edit,
    Reload,
    Back,
    Forward,
    Commit,
    Status,
    Label { secs: f64, text: String },
    Drop(PathBuf),
    Load(Option<PathBuf>),
    Help,
    Quit,
}

const HELP: &str = "\
commands:
  edit                 new snapshot, then run the editor on it
  reload               reload the current snapshot after editing it by hand
  back | forward       move through the history
  commit               write the current snapshot over the target
  status               show the history
  label <secs> <text>  attach a label
  drop <path>          stage a file for loading
  load [path]          open a file (or the staged one)
  quit";

fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    let command = match word {
        "" => return Ok(None),
        "edit" => Command::Edit,
        "reload" => Command::Reload,
        "back" => Command::Back,
        "forward" => Command::Forward,
        "commit" => Command::Commit,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "label" => {
            let (secs, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let secs: f64 = secs
                .parse()
                .with_context(|| format!("Invalid label time '{}'", secs))?;
            if text.trim().is_empty() {
                bail!("label needs a text");
            }
            Command::Label {
                secs,
                text: text.trim().to_string(),
            }
        }
        "drop" => {
            if rest.is_empty() {
                bail!("drop needs a path");
            }
            Command::Drop(PathBuf::from(rest))
        }
        "load" => Command::Load((!rest.is_empty()).then(|| PathBuf::from(rest))),
        other => bail!("Unknown command '{}' (try 'help')", other),
    };
    Ok(Some(command))
}

/// Substitute `{in}`/`{out}` in the editor arguments
fn editor_args(args: &[String], input: &ArtifactRef, output: &ArtifactRef) -> Vec<String> {
    let input = input.path().to_string_lossy();
    let output = output.path().to_string_lossy();
    args.iter()
        .map(|a| a.replace("{in}", &input).replace("{out}", &output))
        .collect()
}

fn run_program(program: &str, args: &[String]) -> Result<()> {
    let status = Process::new(program)
        .args(args)
        .status()
        .with_context(|| format!("Failed to run editor '{}'", program))?;
    if !status.success() {
        bail!("Editor exited with {}", status);
    }
    Ok(())
}

struct Session {
    display: MediaDisplay<AudioMedia>,
    editor: Vec<String>,
}

impl Session {
    /// Run the editor into a fresh snapshot; only a successful, loadable
    /// result becomes part of the history
    fn run_editor(&mut self) -> Result<()> {
        let Some((program, args)) = self.editor.split_first() else {
            let snapshot = self.display.add_new_temp_file()?;
            println!("snapshot {}", snapshot);
            println!("no --editor given; edit the snapshot, then 'reload'");
            return Ok(());
        };

        let previous = self
            .display
            .temp_file_path()
            .cloned()
            .context("No file loaded")?;
        let store = self.display.history().store();
        let snapshot = store
            .allocate(&previous)
            .with_context(|| format!("Failed to create a snapshot of {}", previous))?;

        let result = run_program(program, &editor_args(args, &previous, &snapshot))
            .and_then(|()| {
                self.display
                    .add_external_result(snapshot.clone())
                    .map_err(anyhow::Error::from)
            });
        if let Err(e) = result {
            if let Err(release) = self.display.history().store().release(&snapshot) {
                log::warn!("Failed to discard {}: {}", snapshot, release);
            }
            return Err(e);
        }

        println!("snapshot {}", snapshot);
        self.print_length();
        Ok(())
    }

    fn execute(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Edit => self.run_editor()?,
            Command::Reload => {
                self.display.update_display()?;
                self.print_length();
            }
            Command::Back => {
                if self.display.iterate_previous_temp_file()? {
                    self.print_current();
                } else {
                    println!("already at the oldest snapshot");
                }
            }
            Command::Forward => {
                if self.display.iterate_next_temp_file()? {
                    self.print_current();
                } else {
                    println!("already at the newest snapshot");
                }
            }
            Command::Commit => {
                self.display.overwrite_target()?;
                if let Some(target) = self.display.target_file_path() {
                    println!("wrote {}", target);
                }
            }
            Command::Status => self.print_status(),
            Command::Label { secs, text } => {
                let ids = self.display.add_labels(&[OutputLabel::new(secs, text)]);
                if let Some(id) = ids.first() {
                    println!("label {}", id);
                }
            }
            Command::Drop(path) => {
                if !self.display.files_dropped(&[path]) {
                    println!("not a {} file", self.display.kind().name());
                }
            }
            Command::Load(path) => {
                let artifact = match path {
                    Some(p) => ArtifactRef::new(p),
                    None => self
                        .display
                        .dropped_file_path()
                        .cloned()
                        .context("Nothing dropped")?,
                };
                self.display.setup_display(artifact)?;
                self.print_current();
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn print_current(&self) {
        if let Some(current) = self.display.temp_file_path() {
            println!("showing {}", current);
        }
        self.print_length();
    }

    fn print_length(&self) {
        println!("length {:.3}s", self.display.kind().total_length_secs());
    }

    fn print_status(&self) {
        let summary = self.display.history().summary();
        if let Some(target) = &summary.target {
            println!("target   {}", target);
        }
        for (i, snapshot) in self.display.history().snapshots().iter().enumerate() {
            let marker = if summary.cursor == Some(i) { '>' } else { ' ' };
            println!("{} {:3} {}", marker, i, snapshot);
        }
        println!(
            "labels   {}",
            self.display.overlays().len_inline() + self.display.overlays().len_overhead()
        );
        if let Some(dropped) = self.display.dropped_file_path() {
            println!("dropped  {}", dropped);
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let prefs = match &cli.config {
        Some(path) => DisplayPreferences::load_from(path),
        None => DisplayPreferences::load(),
    };

    let mut store = FsArtifactStore::new(&prefs.temp_dir())
        .with_context(|| format!("Failed to create snapshot dir in {}", prefs.temp_dir().display()))?;
    store.set_keep_files(cli.keep_snapshots);

    let mut display = MediaDisplay::new(AudioMedia::new(), Box::new(store), &prefs);
    display
        .setup_display(ArtifactRef::new(&cli.target))
        .with_context(|| format!("Failed to open {}", cli.target.display()))?;
    log::info!("Session started on {}", cli.target.display());

    let mut session = Session {
        display,
        editor: cli.editor,
    };
    session.print_current();

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let command = match parse_command(&line) {
            Ok(Some(c)) => c,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{:#}", e);
                continue;
            }
        };
        match session.execute(command) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => eprintln!("error: {:#}", e),
        }
    }
    Ok(())
}
