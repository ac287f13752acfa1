//! `inspect` subcommand: list archive entries without extracting.

use std::path::Path;

use super::{EXIT_FAILURE, EXIT_SUCCESS, EXIT_USAGE};
use crate::archive::{list_entries, ArchiveEntry, EntryKind};

/// Run `inspect <ARCHIVE>`. Returns the exit code.
pub fn run(args: &[String]) -> i32 {
    let [archive] = args else {
        eprintln!("Usage: model-archival-cli inspect <ARCHIVE>");
        return EXIT_USAGE;
    };

    match list_entries(Path::new(archive)) {
        Ok(entries) => {
            print_entries(&entries);
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    }
}

/// Format and print archive entries to stdout.
pub fn print_entries(entries: &[ArchiveEntry]) {
    println!("{:<6} {:>12}  {}", "KIND", "SIZE", "PATH");
    println!("{}", "-".repeat(60));
    for entry in entries {
        let kind = match entry.kind {
            EntryKind::File => "file",
            EntryKind::Directory => "dir",
            EntryKind::Other => "other",
        };
        println!("{:<6} {:>12}  {}", kind, entry.size, entry.path);
    }
    let total: u64 = entries.iter().map(|e| e.size).sum();
    println!("{}", "-".repeat(60));
    println!("{} entries, {} bytes uncompressed", entries.len(), total);
}
