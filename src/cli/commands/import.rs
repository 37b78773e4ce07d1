//! cli::commands::import
//!
//! Load raw post documents from a JSON-lines file into the post store.
//!
//! Each non-blank line is one document in the search API's tweet shape.
//! Lines that do not parse are skipped with a warning.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use anyhow::{Context as _, Result};

use super::open_store_for_write;
use crate::cli::Context;
use crate::core::document::RawPost;
use crate::ui::output;

/// Run the import command. `-` reads stdin.
pub fn import(ctx: &Context, file: &Path) -> Result<()> {
    let reader: Box<dyn BufRead> = if file == Path::new("-") {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let path = ctx.resolve(file);
        let f = File::open(&path).with_context(|| format!("cannot open {}", path.display()))?;
        Box::new(BufReader::new(f))
    };

    let (posts, rejected) = parse_lines(reader)?;
    let mut store = open_store_for_write(ctx)?;
    let report = store
        .insert_posts(&posts)
        .context("failed to store imported posts")?;

    if rejected > 0 {
        output::warn(
            format!("{} lines were not valid post documents", rejected),
            ctx.verbosity(),
        );
    }
    output::success(format!("Imported {} documents: {}", posts.len(), report), ctx.verbosity());
    tracing::info!(total = store.post_count()?, "post store updated");
    Ok(())
}

/// Parse JSON lines, returning the documents and the number of bad lines.
fn parse_lines<R: BufRead>(reader: R) -> Result<(Vec<RawPost>, usize)> {
    let mut posts = Vec::new();
    let mut rejected = 0;

    for (number, line) in reader.lines().enumerate() {
        let line = line.context("failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<RawPost>(&line) {
            Ok(post) => posts.push(post),
            Err(err) => {
                tracing::warn!(line = number + 1, error = %err, "skipping malformed document");
                rejected += 1;
            }
        }
    }

    Ok((posts, rejected))
}
