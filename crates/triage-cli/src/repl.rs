//! Interactive intake session.

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use triage_domain::traits::{ExtractionService, TriageService};
use triage_domain::Modality;
use triage_orchestrator::{
    ExportStatus, FileSurfaceFactory, Orchestrator, ReportExporter, ReportFormat,
    StdoutSurfaceFactory,
};

/// Run the interactive session.
pub async fn run_session<E, T>(
    orchestrator: &Orchestrator<E, T>,
    formatter: &Formatter,
    history_size: usize,
) -> Result<()>
where
    E: ExtractionService + Sync,
    T: TriageService + Sync,
{
    println!("{}", formatter.disclaimer());
    println!(
        "{}",
        formatter.info("Triage session - Type 'help' for commands, 'exit' to quit")
    );
    println!();

    let editor_config = rustyline::Config::builder()
        .max_history_size(history_size)
        .map_err(editor_error)?
        .build();
    let mut editor = DefaultEditor::with_config(editor_config).map_err(editor_error)?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        match editor.readline("triage> ") {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_session_command(line) {
                    Ok(SessionCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(SessionCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(cmd) => {
                        if let Err(e) = execute_session_command(cmd, orchestrator, formatter).await {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

/// Session command.
#[derive(Debug, PartialEq, Eq)]
enum SessionCommand {
    Exit,
    Help,
    Select(Modality, PathBuf),
    Clear(Option<Modality>),
    Inputs,
    Run,
    Show,
    Export(Option<PathBuf>),
    Discard,
    Status,
}

/// Parse a session command line.
fn parse_session_command(line: &str) -> Result<SessionCommand> {
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let command = match head {
        "exit" | "quit" | "q" => SessionCommand::Exit,
        "help" | "?" => SessionCommand::Help,
        "inputs" => SessionCommand::Inputs,
        "run" => SessionCommand::Run,
        "show" => SessionCommand::Show,
        "discard" => SessionCommand::Discard,
        "status" => SessionCommand::Status,
        "export" if rest.is_empty() => SessionCommand::Export(None),
        "export" => SessionCommand::Export(Some(PathBuf::from(rest))),
        "clear" => match rest {
            "" => {
                return Err(CliError::InvalidInput(
                    "Usage: clear <audio|document|image|all>".to_string(),
                ))
            }
            "all" => SessionCommand::Clear(None),
            other => SessionCommand::Clear(Some(parse_modality(other)?)),
        },
        other => match Modality::parse(other) {
            Some(_) if rest.is_empty() => {
                return Err(CliError::InvalidInput(format!("Usage: {} <path>", other)))
            }
            Some(modality) => SessionCommand::Select(modality, PathBuf::from(rest)),
            None => {
                return Err(CliError::InvalidInput(format!(
                    "Unknown command: {}. Type 'help' for available commands.",
                    other
                )))
            }
        },
    };

    Ok(command)
}

fn parse_modality(s: &str) -> Result<Modality> {
    Modality::parse(s).ok_or_else(|| CliError::InvalidInput(format!("Unknown modality: {}", s)))
}

/// Execute a session command.
async fn execute_session_command<E, T>(
    cmd: SessionCommand,
    orchestrator: &Orchestrator<E, T>,
    formatter: &Formatter,
) -> Result<()>
where
    E: ExtractionService + Sync,
    T: TriageService + Sync,
{
    match cmd {
        SessionCommand::Select(modality, path) => {
            orchestrator.select_path(modality, &path).await?;
            println!(
                "{}",
                formatter.success(&format!("Selected {} for {}", path.display(), modality))
            );
        }
        SessionCommand::Clear(Some(modality)) => {
            orchestrator.select(modality, None)?;
            println!("{}", formatter.success(&format!("Cleared {}", modality)));
        }
        SessionCommand::Clear(None) => {
            orchestrator.clear_inputs();
            println!("{}", formatter.success("Cleared all inputs"));
        }
        SessionCommand::Inputs => {
            println!("{}", formatter.format_inputs(&orchestrator.inputs()));
        }
        SessionCommand::Run => {
            println!("{}", formatter.info("Running triage..."));
            let result = orchestrator.run().await?;
            println!("{}", formatter.format_result(&result)?);
        }
        SessionCommand::Show => match orchestrator.session_result() {
            Some(result) => println!("{}", formatter.format_result(&result)?),
            None => println!("{}", formatter.info("No result yet. Use 'run' first.")),
        },
        SessionCommand::Export(None) => {
            let exporter =
                ReportExporter::new(StdoutSurfaceFactory).with_format(ReportFormat::Json);
            if orchestrator.export(&exporter) == ExportStatus::Skipped {
                println!("{}", formatter.info("Nothing to export"));
            }
        }
        SessionCommand::Export(Some(path)) => {
            let format = match path.extension().and_then(|ext| ext.to_str()) {
                Some("json") => ReportFormat::Json,
                _ => ReportFormat::Html,
            };
            let exporter = ReportExporter::new(FileSurfaceFactory::new(&path)).with_format(format);
            match orchestrator.export(&exporter) {
                ExportStatus::Printed => println!(
                    "{}",
                    formatter.success(&format!("Report written to {}", path.display()))
                ),
                ExportStatus::Skipped => println!("{}", formatter.info("Nothing to export")),
                ExportStatus::Unavailable => {}
            }
        }
        SessionCommand::Discard => {
            orchestrator.discard_session();
            println!("{}", formatter.success("Session discarded"));
        }
        SessionCommand::Status => {
            println!("State: {}", formatter.run_state(orchestrator.state()));
            println!("Inputs: {}", orchestrator.inputs().present_count());
            let result = if orchestrator.session_result().is_some() {
                "available"
            } else {
                "none"
            };
            println!("Result: {}", result);
        }
        SessionCommand::Exit | SessionCommand::Help => {}
    }

    Ok(())
}

fn editor_error(e: ReadlineError) -> CliError {
    CliError::Io(std::io::Error::other(format!(
        "Failed to initialize editor: {}",
        e
    )))
}

fn get_history_path() -> Result<PathBuf> {
    let dir = Config::dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  audio <path>                   - Select a voice recording (audio/*)");
    println!("  document <path>                - Select a lab report (application/pdf)");
    println!("  image <path>                   - Select a medical image (image/*)");
    println!("  clear <modality|all>           - Clear one or every input");
    println!("  inputs                         - Show the current selection");
    println!("  run                            - Run triage over the selection");
    println!("  show                           - Show the last result");
    println!("  export [path]                  - Export the result (stdout, or .html/.json file)");
    println!("  discard                        - Discard the current result");
    println!("  status                         - Show run state");
    println!("  help, ?                        - Show this help");
    println!("  exit, quit, q                  - Exit session");
    println!();
}
