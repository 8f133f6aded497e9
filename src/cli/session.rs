//! Per-invocation state shared by the ledger commands

use anyhow::{bail, Result};
use clap::Args;

use super::output::Output;
use crate::domain::{Ledger, MonthKey, MonthWindow, StaffId, StaffMember};
use crate::storage::{Workspace, WorkspaceConfig};

/// Month selection flags
#[derive(Args, Debug, Clone, Default)]
pub struct MonthArgs {
    /// Month to operate on (YYYY-MM)
    #[arg(long, short = 'm', conflicts_with = "offset")]
    pub month: Option<MonthKey>,

    /// Months relative to the current month (e.g. -1, 2)
    #[arg(long, short = 'o', allow_negative_numbers = true)]
    pub offset: Option<i32>,
}

impl MonthArgs {
    /// Resolves the selection against the real current month
    ///
    /// Forward moves past `forward_limit` months are rejected.
    pub fn resolve(&self, forward_limit: u32) -> Result<MonthKey> {
        self.resolve_from(forward_limit, MonthKey::current())
    }

    fn resolve_from(&self, forward_limit: u32, today: MonthKey) -> Result<MonthKey> {
        let mut window = MonthWindow::new(today, forward_limit);
        let month = match (self.month, self.offset) {
            (Some(target), _) => window.go_to(target, today)?,
            (None, Some(offset)) => window.shift_from(offset, today)?,
            (None, None) => window.current(),
        };
        Ok(month)
    }
}

/// An opened workspace and its loaded ledger
pub struct Session {
    workspace: Workspace,
    pub ledger: Ledger,
}

impl Session {
    /// Opens the enclosing workspace and loads its ledger
    pub fn open(output: &Output) -> Result<Self> {
        Self::from_workspace(Workspace::open_current()?, output)
    }

    /// Loads the ledger of an already opened workspace
    pub fn from_workspace(workspace: Workspace, output: &Output) -> Result<Self> {
        output.verbose_ctx(
            "load",
            &format!("Workspace root: {}", workspace.root().display()),
        );

        let loaded = workspace.load()?;
        if loaded.first_run {
            output.verbose_ctx("load", "No records found, starting from the seed roster");
        }
        for notice in &loaded.notices {
            output.notice(notice);
        }

        Ok(Self {
            workspace,
            ledger: loaded.ledger,
        })
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.workspace.config().workspace
    }

    /// Resolves `--month`/`--offset` with the configured forward limit
    pub fn month(&self, args: &MonthArgs) -> Result<MonthKey> {
        args.resolve(self.config().forward_month_limit)
    }

    /// Finds a roster member by id or exact name
    pub fn member(&self, query: &str) -> Result<StaffMember> {
        match self.ledger.roster().find(query) {
            Some(member) => Ok(member.clone()),
            None => bail!("Unknown staff member '{}'", query),
        }
    }

    /// Like [`member`](Self::member), but accepts ids that only exist in history
    pub fn staff_id(&self, query: &str) -> StaffId {
        self.ledger
            .roster()
            .find(query)
            .map(|member| member.id.clone())
            .unwrap_or_else(|| StaffId::new(query.trim()))
    }

    /// Persists the ledger after a mutation
    pub fn save(&self, output: &Output) -> Result<()> {
        self.workspace.save(&self.ledger)?;
        output.verbose_ctx(
            "save",
            &format!("Wrote {}", self.workspace.shift_dir().display()),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    #[test]
    fn default_selection_is_today() {
        let args = MonthArgs::default();
        assert_eq!(args.resolve_from(2, key("2025-11")).unwrap(), key("2025-11"));
    }

    #[test]
    fn offset_respects_forward_limit() {
        let today = key("2025-11");
        let ok = MonthArgs {
            offset: Some(2),
            ..MonthArgs::default()
        };
        let too_far = MonthArgs {
            offset: Some(3),
            ..MonthArgs::default()
        };

        assert_eq!(ok.resolve_from(2, today).unwrap(), key("2026-01"));
        assert!(too_far.resolve_from(2, today).is_err());
    }

    #[test]
    fn explicit_month_goes_through_window() {
        let today = key("2025-11");
        let past = MonthArgs {
            month: Some(key("2019-04")),
            ..MonthArgs::default()
        };
        let future = MonthArgs {
            month: Some(key("2026-02")),
            ..MonthArgs::default()
        };

        assert_eq!(past.resolve_from(2, today).unwrap(), key("2019-04"));
        assert!(future.resolve_from(2, today).is_err());
    }
}
