// pwmsg — CLI Command Handlers
//
// Each function handles one CLI subcommand against an already-loaded store
// and writes user-facing text to `out`. `run` opens the store (in memory when
// the database is unusable) and dispatches; `execute` binds it to stdout.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::{PwmsgError, Result};
use crate::store::{Database, EditForm, MemorySlots, PairStore, SlotStorage, StoreError};

use super::{Cli, Commands};

/// Default directory for pwmsg data files.
fn data_dir() -> PathBuf {
    let base = dirs_next::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("pwmsg")
}

/// Default path of the slot database.
fn db_path() -> PathBuf {
    data_dir().join("pwmsg.db")
}

/// Execute the parsed CLI command against stdout.
pub async fn execute(cli: Cli) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out).await
}

/// Open the store and dispatch the command, writing user-facing text to `out`.
pub async fn run<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    let path = cli.db.unwrap_or_else(db_path);
    let mut store = PairStore::load(open_slots(&path), cli.schema);

    match cli.command {
        Commands::Reveal { password } => cmd_reveal(&store, &password, out),
        Commands::Add {
            password,
            message,
            category,
        } => cmd_add(&mut store, password, message, category, out),
        Commands::Edit {
            index,
            password,
            message,
            category,
        } => cmd_edit(&mut store, index, password, message, category, out),
        Commands::Delete { index, yes } => {
            cmd_delete(&mut store, index, yes, out, confirm_on_stdin)
        }
        Commands::List {
            filter,
            show_passwords,
        } => cmd_list(&store, &filter, show_passwords, out),
        Commands::Export { dir } => cmd_export(&store, &dir, out),
        Commands::Import { file } => cmd_import(&mut store, &file, out).await,
    }
}

// ─── Reveal ──────────────────────────────────────────────────────────────────

fn cmd_reveal<S: SlotStorage>(
    store: &PairStore<S>,
    password: &str,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "{}", store.reveal(password))?;
    Ok(())
}

// ─── Add / Edit ──────────────────────────────────────────────────────────────

fn cmd_add<S: SlotStorage>(
    store: &mut PairStore<S>,
    password: String,
    message: String,
    category: String,
    out: &mut impl Write,
) -> Result<()> {
    let mut form = EditForm::new();
    form.password = password;
    form.message = message;
    form.category = category;

    let index = form.save(store)?;
    writeln!(out, "✓ Pair stored at index {}", index)?;
    Ok(())
}

fn cmd_edit<S: SlotStorage>(
    store: &mut PairStore<S>,
    index: usize,
    password: Option<String>,
    message: Option<String>,
    category: Option<String>,
    out: &mut impl Write,
) -> Result<()> {
    let mut form = EditForm::new();
    form.begin_edit(store, index)?;

    if let Some(password) = password {
        form.password = password;
    }
    if let Some(message) = message {
        form.message = message;
    }
    if let Some(category) = category {
        form.category = category;
    }

    form.save(store)?;
    writeln!(out, "✓ Pair {} updated", index)?;
    Ok(())
}

// ─── Delete ──────────────────────────────────────────────────────────────────

fn confirm_on_stdin<W: Write>(index: usize, out: &mut W) -> Result<bool> {
    write!(out, "Delete pair {}? [y/N] ", index)?;
    out.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

/// Delete the pair at `index`. The index is checked before `confirm` is asked,
/// so the user is never prompted for a pair that does not exist.
fn cmd_delete<S: SlotStorage, W: Write>(
    store: &mut PairStore<S>,
    index: usize,
    yes: bool,
    out: &mut W,
    confirm: impl FnOnce(usize, &mut W) -> Result<bool>,
) -> Result<()> {
    if store.get(index).is_none() {
        return Err(StoreError::IndexOutOfRange {
            index,
            len: store.len(),
        }
        .into());
    }

    if !yes && !confirm(index, out)? {
        writeln!(out, "Nothing deleted.")?;
        return Ok(());
    }

    store.delete(index)?;
    writeln!(out, "✓ Pair {} deleted", index)?;
    Ok(())
}

// ─── List ────────────────────────────────────────────────────────────────────

fn cmd_list<S: SlotStorage>(
    store: &PairStore<S>,
    filter: &str,
    show_passwords: bool,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "Stored pairs ({}):\n", store.len())?;

    let with_category = store.schema().has_category();
    let mut shown = 0;
    for (index, record) in store.filter(filter) {
        let password = match record.password() {
            Some(pw) if show_passwords => pw.to_string(),
            Some(pw) => "*".repeat(pw.chars().count()),
            None => "(none)".to_string(),
        };
        let message = if record.message.is_empty() {
            "(empty)"
        } else {
            record.message.as_str()
        };

        if with_category {
            writeln!(
                out,
                "  {:>3} │ {:16} │ {:12} │ {}",
                index, password, record.category, message
            )?;
        } else {
            writeln!(out, "  {:>3} │ {:16} │ {}", index, password, message)?;
        }
        shown += 1;
    }

    if shown == 0 {
        writeln!(out, "  No pairs.")?;
    }
    Ok(())
}

// ─── Export / Import ─────────────────────────────────────────────────────────

fn cmd_export<S: SlotStorage>(
    store: &PairStore<S>,
    dir: &Path,
    out: &mut impl Write,
) -> Result<()> {
    let path = store.write_export(dir)?;
    writeln!(out, "✓ Exported {} pairs to {}", store.len(), path.display())?;
    Ok(())
}

async fn cmd_import<S: SlotStorage>(
    store: &mut PairStore<S>,
    file: &Path,
    out: &mut impl Write,
) -> Result<()> {
    let count = store.import_file(file).await?;
    writeln!(out, "✓ Imported {} pairs", count)?;
    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Open the durable slots, falling back to in-memory slots when the database
/// cannot be opened. The session then works normally but nothing is saved.
fn open_slots(path: &Path) -> Box<dyn SlotStorage> {
    match open_db(path) {
        Ok(db) => Box::new(db),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Storage unavailable, changes will not be saved");
            Box::new(MemorySlots::new())
        }
    }
}

/// Open the slot database, creating its directory if needed.
fn open_db(path: &Path) -> Result<Database> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    Database::open(path).map_err(|e| {
        PwmsgError::Other(format!(
            "Failed to open database at {}: {}",
            path.display(),
            e
        ))
    })
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::store::{Record, Schema, NO_MATCH_SENTINEL};

    fn store() -> PairStore<MemorySlots> {
        let mut store = PairStore::load(MemorySlots::new(), Schema::V2);
        store
            .create_or_update(Record::new("abc", "hi", "greeting"), None)
            .unwrap();
        store
            .create_or_update(Record::new("quiet", "", ""), None)
            .unwrap();
        store
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_reveal_prints_message_or_sentinel() {
        let store = store();
        let mut buf = Vec::new();
        cmd_reveal(&store, "abc", &mut buf).unwrap();
        cmd_reveal(&store, "quiet", &mut buf).unwrap();
        cmd_reveal(&store, "nope", &mut buf).unwrap();

        assert_eq!(
            output(buf),
            "hi\n(empty message)\nNo matching message found.\n"
        );
    }

    #[test]
    fn test_add_with_empty_password_fails() {
        let mut store = store();
        let mut buf = Vec::new();
        let result = cmd_add(&mut store, String::new(), "x".into(), String::new(), &mut buf);

        assert!(matches!(
            result,
            Err(PwmsgError::Store(StoreError::Validation(_)))
        ));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_edit_keeps_unspecified_fields() {
        let mut store = store();
        let mut buf = Vec::new();
        cmd_edit(&mut store, 0, None, Some("hello".into()), None, &mut buf).unwrap();

        let record = store.get(0).unwrap();
        assert_eq!(record.password(), Some("abc"));
        assert_eq!(record.message, "hello");
        assert_eq!(record.category, "greeting");
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut store = store();
        let mut buf = Vec::new();

        cmd_delete(&mut store, 0, false, &mut buf, |_, _| Ok(false)).unwrap();
        assert_eq!(store.len(), 2);

        cmd_delete(&mut store, 0, false, &mut buf, |_, _| Ok(true)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0).unwrap().password(), Some("quiet"));
    }

    #[test]
    fn test_delete_with_yes_skips_prompt() {
        let mut store = store();
        let mut buf = Vec::new();

        cmd_delete(&mut store, 1, true, &mut buf, |_, _| {
            panic!("must not prompt when --yes is given")
        })
        .unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_checks_index_before_prompting() {
        let mut store = store();
        let mut buf = Vec::new();
        let mut prompted = false;

        let result = cmd_delete(&mut store, 9, false, &mut buf, |_, _| {
            prompted = true;
            Ok(true)
        });

        assert!(matches!(
            result,
            Err(PwmsgError::Store(StoreError::IndexOutOfRange { index: 9, len: 2 }))
        ));
        assert!(!prompted, "User must not be asked to confirm a missing pair");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_list_masks_passwords_and_shows_original_indices() {
        let store = store();
        let mut buf = Vec::new();
        cmd_list(&store, "quiet", false, &mut buf).unwrap();

        let text = output(buf);
        assert!(text.contains("Stored pairs (2)"));
        assert!(text.contains("  1 │ *****"), "got: {}", text);
        assert!(!text.contains("quiet"));
        assert!(!text.contains("abc"));
    }

    #[test]
    fn test_list_can_show_passwords() {
        let store = store();
        let mut buf = Vec::new();
        cmd_list(&store, "", true, &mut buf).unwrap();

        let text = output(buf);
        assert!(text.contains("abc"));
        assert!(text.contains("quiet"));
    }

    #[test]
    fn test_list_reports_no_matches() {
        let store = store();
        let mut buf = Vec::new();
        cmd_list(&store, "zzz", false, &mut buf).unwrap();
        assert!(output(buf).contains("No pairs."));
    }

    #[tokio::test]
    async fn test_export_then_import_through_commands() {
        let dir = tempfile::tempdir().unwrap();
        let source = store();
        let mut buf = Vec::new();
        cmd_export(&source, dir.path(), &mut buf).unwrap();

        let mut target = PairStore::load(MemorySlots::new(), Schema::V2);
        let file = dir.path().join(crate::store::EXPORT_FILE_NAME);
        cmd_import(&mut target, &file, &mut buf).await.unwrap();

        assert_eq!(target.records(), source.records());
        assert!(output(buf).contains("✓ Imported 2 pairs"));
    }

    #[test]
    fn test_open_db_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("pwmsg.db");

        open_db(&path).unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_corrupt_database_falls_back_to_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pwmsg.db");
        std::fs::write(&path, b"not a sqlite database ".repeat(64)).unwrap();
        let db = path.to_str().unwrap();

        let mut buf = Vec::new();
        run(Cli::parse_from(["pwmsg", "--db", db, "reveal", "abc"]), &mut buf)
            .await
            .unwrap();
        assert_eq!(output(buf), format!("{}\n", NO_MATCH_SENTINEL));

        let mut buf = Vec::new();
        run(
            Cli::parse_from(["pwmsg", "--db", db, "add", "--password", "abc"]),
            &mut buf,
        )
        .await
        .unwrap();
        assert!(output(buf).contains("✓ Pair stored at index 0"));
    }

    #[tokio::test]
    async fn test_run_persists_between_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pwmsg.db");
        let db = path.to_str().unwrap();

        let mut buf = Vec::new();
        run(
            Cli::parse_from(["pwmsg", "--db", db, "add", "--password", "k", "--message", "v"]),
            &mut buf,
        )
        .await
        .unwrap();

        let mut buf = Vec::new();
        run(Cli::parse_from(["pwmsg", "--db", db, "reveal", "k"]), &mut buf)
            .await
            .unwrap();
        assert_eq!(output(buf), "v\n");
    }
}
