//! Persistence port for the ledger
//!
//! The application loads the ledger once at startup and saves it after each
//! successful mutation. Two adapters are provided: [`FileStatePort`] for the
//! `.shift/` directory and [`MemoryStatePort`] for tests and embedding.
//!
//! Loading never fails because of record contents: a missing record starts
//! from its default (seed roster, empty schedule) and a damaged one is
//! replaced by its default after a copy is kept beside it as `*.corrupt`.

use std::cell::RefCell;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use super::records::{
    deserialize_roster, deserialize_schedule, serialize_roster, serialize_schedule, Decoded,
    RecordError,
};
use crate::domain::{Ledger, Roster, ScheduleStore};

/// File name of the roster record inside `.shift/`
pub const ROSTER_FILE: &str = "roster.json";

/// File name of the schedule record inside `.shift/`
pub const SCHEDULE_FILE: &str = "schedule.json";

/// Result of loading persisted state
#[derive(Debug)]
pub struct Loaded {
    pub ledger: Ledger,
    /// Human-readable notes about defaults and repairs applied while loading
    pub notices: Vec<String>,
    /// True when neither record existed
    pub first_run: bool,
}

/// Where the ledger lives between sessions
pub trait StatePort {
    /// Loads the ledger, substituting defaults for missing or damaged records
    fn load(&self) -> Result<Loaded>;

    /// Persists the full ledger
    fn save(&self, ledger: &Ledger) -> Result<()>;
}

/// Raw text of a record, or why it could not be read
enum RawRecord {
    Missing,
    Present(String),
    Unreadable(String),
}

/// Decodes both records and assembles the ledger
///
/// `on_corrupt` is called with the record name for each record that had to
/// be replaced by its default.
fn assemble(
    roster: RawRecord,
    schedule: RawRecord,
    mut on_corrupt: impl FnMut(&'static str, &mut Vec<String>),
) -> Loaded {
    let mut notices = Vec::new();
    let first_run = matches!(roster, RawRecord::Missing) && matches!(schedule, RawRecord::Missing);

    let roster = decode_or_default(
        "roster",
        roster,
        deserialize_roster,
        Roster::seed,
        &mut notices,
        &mut on_corrupt,
    );
    let schedule = decode_or_default(
        "schedule",
        schedule,
        deserialize_schedule,
        ScheduleStore::new,
        &mut notices,
        &mut on_corrupt,
    );

    Loaded {
        ledger: Ledger::new(roster, schedule),
        notices,
        first_run,
    }
}

fn decode_or_default<T>(
    record: &'static str,
    raw: RawRecord,
    decode: fn(&str) -> Result<Decoded<T>, RecordError>,
    default: fn() -> T,
    notices: &mut Vec<String>,
    on_corrupt: &mut impl FnMut(&'static str, &mut Vec<String>),
) -> T {
    match raw {
        RawRecord::Missing => default(),
        RawRecord::Present(text) => match decode(&text) {
            Ok(decoded) => {
                notices.extend(decoded.notices);
                decoded.value
            }
            Err(e) => {
                notices.push(format!("{}; starting from the default {}", e, record));
                on_corrupt(record, notices);
                default()
            }
        },
        RawRecord::Unreadable(reason) => {
            notices.push(format!(
                "Could not read {} record ({}); starting from the default",
                record, reason
            ));
            default()
        }
    }
}

/// Stores the records as JSON files
pub struct FileStatePort {
    dir: PathBuf,
}

impl FileStatePort {
    /// Creates a port over the given data directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates the default port for a workspace
    pub fn for_workspace(root: &Path) -> Self {
        Self::new(root.join(".shift"))
    }

    pub fn roster_path(&self) -> PathBuf {
        self.dir.join(ROSTER_FILE)
    }

    pub fn schedule_path(&self) -> PathBuf {
        self.dir.join(SCHEDULE_FILE)
    }

    fn path_for(&self, record: &str) -> PathBuf {
        match record {
            "roster" => self.roster_path(),
            _ => self.schedule_path(),
        }
    }

    fn read(path: &Path) -> RawRecord {
        if !path.exists() {
            return RawRecord::Missing;
        }

        let read = || -> Result<String> {
            let mut file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;

            // Acquire shared lock for reading
            file.lock_shared()
                .context("Failed to acquire read lock")?;

            let mut text = String::new();
            file.read_to_string(&mut text)
                .with_context(|| format!("Failed to read {}", path.display()))?;

            // Lock is released when file is dropped
            Ok(text)
        };

        match read() {
            Ok(text) => RawRecord::Present(text),
            Err(e) => RawRecord::Unreadable(format!("{:#}", e)),
        }
    }

    fn write(path: &Path, content: &str) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        // Write to temp file first
        let temp_path = path.with_extension("json.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            // Acquire exclusive lock
            file.lock_exclusive()
                .context("Failed to acquire write lock")?;

            let mut writer = BufWriter::new(&file);
            writer
                .write_all(content.as_bytes())
                .with_context(|| format!("Failed to write {}", temp_path.display()))?;
            writer.write_all(b"\n").context("Failed to write record")?;
            writer.flush().context("Failed to flush record")?;
        }

        // Atomic rename
        fs::rename(&temp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }

    /// Keeps a copy of a damaged record beside the original
    fn preserve_corrupt(&self, record: &'static str, notices: &mut Vec<String>) {
        let path = self.path_for(record);
        let backup = path.with_extension("json.corrupt");
        match fs::copy(&path, &backup) {
            Ok(_) => notices.push(format!("Kept damaged {} record as {}", record, backup.display())),
            Err(e) => notices.push(format!("Could not back up damaged {} record: {}", record, e)),
        }
    }
}

impl StatePort for FileStatePort {
    fn load(&self) -> Result<Loaded> {
        let roster = Self::read(&self.roster_path());
        let schedule = Self::read(&self.schedule_path());

        Ok(assemble(roster, schedule, |record, notices| {
            self.preserve_corrupt(record, notices)
        }))
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        let roster = serialize_roster(ledger.roster()).context("Failed to serialize roster")?;
        let schedule =
            serialize_schedule(ledger.schedule()).context("Failed to serialize schedule")?;

        Self::write(&self.roster_path(), &roster)?;
        Self::write(&self.schedule_path(), &schedule)?;
        Ok(())
    }
}

/// Keeps the serialized records in memory
#[derive(Debug, Default)]
pub struct MemoryStatePort {
    roster: RefCell<Option<String>>,
    schedule: RefCell<Option<String>>,
}

impl MemoryStatePort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the given raw record texts
    pub fn with_records(roster: Option<&str>, schedule: Option<&str>) -> Self {
        Self {
            roster: RefCell::new(roster.map(str::to_string)),
            schedule: RefCell::new(schedule.map(str::to_string)),
        }
    }

    /// Raw roster record as last saved
    pub fn roster_text(&self) -> Option<String> {
        self.roster.borrow().clone()
    }

    /// Raw schedule record as last saved
    pub fn schedule_text(&self) -> Option<String> {
        self.schedule.borrow().clone()
    }
}

impl StatePort for MemoryStatePort {
    fn load(&self) -> Result<Loaded> {
        let raw = |slot: &RefCell<Option<String>>| match slot.borrow().as_ref() {
            Some(text) => RawRecord::Present(text.clone()),
            None => RawRecord::Missing,
        };

        Ok(assemble(raw(&self.roster), raw(&self.schedule), |_, _| {}))
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        let roster = serialize_roster(ledger.roster()).context("Failed to serialize roster")?;
        let schedule =
            serialize_schedule(ledger.schedule()).context("Failed to serialize schedule")?;

        *self.roster.borrow_mut() = Some(roster);
        *self.schedule.borrow_mut() = Some(schedule);
        Ok(())
    }
}
