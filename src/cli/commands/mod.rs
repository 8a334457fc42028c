//! Command implementations for the CLI.
//!
//! Each command is implemented in its own module.

pub mod build;
pub mod init;
pub mod resolve;
pub mod scan;
pub mod search;

use crate::types::Match;
use console::style;
use std::io::{self, Write};

/// Print matches as `<file> Page: <n> : <context>` lines, or as JSON.
pub fn print_matches(matches: &[Match], json: bool) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if json {
        serde_json::to_writer_pretty(&mut out, matches)?;
        writeln!(out)?;
        return Ok(());
    }

    for m in matches {
        writeln!(
            out,
            "{} Page: {} : {}",
            style(m.filename.display()).cyan(),
            m.page_num,
            m.context
        )?;
    }
    Ok(())
}
