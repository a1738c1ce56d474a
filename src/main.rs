//! Interactive REPL for trying filter queries against each entity schema.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use oql::QueryCompiler;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("--- OQL filter compiler ---");
    println!("Type a filter query to compile it, e.g. name = \"test\" and duration > 100");
    println!("Commands: :entity <traces|spans|threads|prompts|dataset_items>, :fields, :quit");

    let mut compiler = QueryCompiler::for_traces();
    let mut rl = DefaultEditor::new()?;

    loop {
        let prompt = format!("{}> ", compiler.entity().name());
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;
                if let Some(command) = line.strip_prefix(':') {
                    if !handle_command(&mut compiler, command) {
                        break;
                    }
                    continue;
                }
                match compiler.compile_json(line) {
                    Ok(Some(json)) => println!("{}", json),
                    Ok(None) => println!("(no filter)"),
                    Err(e) => println!("error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

/// Handles a `:command` line; returns false when the REPL should exit
fn handle_command(compiler: &mut QueryCompiler, command: &str) -> bool {
    let mut parts = command.split_whitespace();
    match parts.next() {
        Some("entity") => match parts.next() {
            Some("traces") => *compiler = QueryCompiler::for_traces(),
            Some("spans") => *compiler = QueryCompiler::for_spans(),
            Some("threads") => *compiler = QueryCompiler::for_threads(),
            Some("prompts") => *compiler = QueryCompiler::for_prompts(),
            Some("dataset_items") => *compiler = QueryCompiler::for_dataset_items(),
            other => println!(
                "unknown entity {:?}, expected traces|spans|threads|prompts|dataset_items",
                other.unwrap_or("")
            ),
        },
        Some("fields") => {
            for field in compiler.entity().fields() {
                let key_note = if field.supports_key {
                    "  (accepts nested key)"
                } else {
                    ""
                };
                println!("  {:<26} {}{}", field.name, field.column_type, key_note);
            }
        }
        Some("quit") | Some("q") => return false,
        _ => println!("commands: :entity <name>, :fields, :quit"),
    }
    true
}
