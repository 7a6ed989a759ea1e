//! Markcraft - apply markdown formatting commands to a selection.
//!
//! # Usage
//!
//! ```bash
//! markcraft --select 0:5 --command bold notes.md
//! echo "one\ntwo" | markcraft --select 0..7 -c ordered-list
//! markcraft --list
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use futures_executor::block_on;

use markcraft::TextBuffer;
use markcraft::commands::{CommandMap, image_with_placeholder};
use markcraft::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use markcraft::dispatch::CommandDispatcher;
use markcraft::editor::{BufferHandle, EditorBuffer};
use markcraft::text::SelectionRange;

/// Apply markdown formatting commands to a selection
#[derive(Parser, Debug)]
#[command(name = "markcraft", version, about, long_about = None)]
struct Cli {
    /// Markdown file to edit (reads stdin when omitted)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Initial selection as `N`, `START:END` or `START..END` (character offsets)
    #[arg(short, long, value_name = "RANGE")]
    select: Option<SelectionRange>,

    /// Command to run; repeat to run several in order
    #[arg(short, long = "command", value_name = "NAME")]
    commands: Vec<String>,

    /// Print the final selection to stderr
    #[arg(long)]
    show_selection: bool,

    /// List the available command names and exit
    #[arg(long)]
    list: bool,

    /// URL inserted by the image command when nothing is selected
    #[arg(long, value_name = "URL")]
    image_placeholder: Option<String>,

    /// Log each command the dispatcher runs
    #[arg(short, long)]
    verbose: bool,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.verbose);

    let mut commands = CommandMap::standard();
    if let Some(placeholder) = &effective.image_placeholder {
        commands.insert("image", image_with_placeholder(placeholder.clone()));
    }

    if cli.list {
        for name in commands.names() {
            println!("{name}");
        }
        return Ok(());
    }

    let text = read_input(cli.file.as_deref())?;
    let mut buffer = EditorBuffer::from_text(&text);
    buffer.select(cli.select.unwrap_or_default());

    let handle = BufferHandle::new(buffer);
    let dispatcher = CommandDispatcher::new(handle.clone(), commands);
    for name in &cli.commands {
        block_on(dispatcher.run(name, None))
            .with_context(|| format!("Command `{name}` failed"))?;
    }

    let state = handle.state().context("Buffer no longer available")?;
    print!("{}", state.text);
    if effective.show_selection {
        eprintln!("selection: {}", state.selection);
    }
    Ok(())
}
