//! Output rendering and formatting

use crate::cli::ColorChoice;
use chrono::DateTime;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::{Style, Term};
use modhost_ops::{CommandReply, ExportReport, OperationResult, PlayersData, ProjectView};
use modhost_types::{
    CommandRecord, ContainerState, InstallOutcome, InstallReport, PackageRecord, ProjectLookup,
    RemovalReport, SearchPage, StageReport,
};
use std::io;

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    color_choice: ColorChoice,
    term: Term,
}

impl OutputRenderer {
    pub fn new(json_output: bool, color_choice: ColorChoice) -> Self {
        Self {
            json_output,
            color_choice,
            term: Term::stdout(),
        }
    }

    /// Render operation result
    pub fn render_result(&self, result: &OperationResult) -> io::Result<()> {
        if self.json_output {
            self.render_json(result)
        } else {
            self.render_table(result)
        }
    }

    fn render_json(&self, result: &OperationResult) -> io::Result<()> {
        let json = result.to_json().map_err(io::Error::other)?;
        self.term.write_line(&json)
    }

    fn render_table(&self, result: &OperationResult) -> io::Result<()> {
        match result {
            OperationResult::PackageList(records) => self.render_package_list(records),
            OperationResult::Lookup(lookup) => self.render_lookup(lookup),
            OperationResult::SearchResults(page) => self.render_search_results(page),
            OperationResult::Project(view) => self.render_project(view),
            OperationResult::Staged(report) => self.render_staged(report),
            OperationResult::Install(outcome) => self.render_install(outcome),
            OperationResult::Removal(report) => self.render_removal(report),
            OperationResult::Command(reply) => self.render_command(reply),
            OperationResult::CommandHistory(history) => self.render_history(history),
            OperationResult::ServerStatus(state) => self.render_status(state),
            OperationResult::ServerConfig(settings) => {
                self.render_settings(settings.iter().map(|(k, v)| (k, Some(v))))
            }
            OperationResult::ServerConfigSummary(settings) => {
                self.render_settings(settings.iter().map(|(k, v)| (k, v.as_ref())))
            }
            OperationResult::Players(players) => self.render_players(players),
            OperationResult::Backups(backups) => self.render_backups(backups),
            OperationResult::Export(report) => self.render_export(report),
            OperationResult::Success(message) => self.term.write_line(message),
        }
    }

    fn table(&self, headers: &[&str]) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
        table
    }

    fn render_settings<'a>(
        &self,
        settings: impl Iterator<Item = (&'a String, Option<&'a String>)>,
    ) -> io::Result<()> {
        let mut table = self.table(&["Setting", "Value"]);
        for (key, value) in settings {
            let value = match value {
                Some(value) => Cell::new(value),
                None => Cell::new("(unset)").fg(Color::DarkGrey),
            };
            table.add_row(vec![Cell::new(key), value]);
        }
        self.term.write_line(&table.to_string())
    }

    fn render_players(&self, players: &PlayersData) -> io::Result<()> {
        let mut table = self.table(&["List", "Entries"]);
        let lists = [
            ("Banned IPs", &players.banned_ips),
            ("Banned players", &players.banned_players),
            ("Whitelist", &players.whitelist),
            ("Operators", &players.ops),
        ];
        for (label, entries) in lists {
            let entries = if entries.is_empty() {
                Cell::new("-")
            } else {
                Cell::new(entries.join(", "))
            };
            table.add_row(vec![Cell::new(label), entries]);
        }
        self.term.write_line(&table.to_string())
    }

    fn render_package_list(&self, records: &[PackageRecord]) -> io::Result<()> {
        if records.is_empty() {
            return self.term.write_line("No mods in this list.");
        }

        let mut table = self.table(&["Mod", "Version", "Project", "Required by", "Installed"]);
        for record in records {
            let required_by = if record.dependency_of.is_empty() {
                Cell::new("-")
            } else {
                Cell::new(record.dependency_of.join(", ")).fg(Color::Blue)
            };
            table.add_row(vec![
                Cell::new(record.label()),
                Cell::new(&record.id),
                Cell::new(&record.project_id),
                required_by,
                Cell::new(record.installed_at.map_or_else(|| "-".to_string(), format_timestamp)),
            ]);
        }

        self.term.write_line(&table.to_string())
    }

    fn render_lookup(&self, lookup: &ProjectLookup) -> io::Result<()> {
        match &lookup.version_id {
            None => self.term.write_line("Not added."),
            Some(version_id) => {
                let place = if lookup.installed {
                    "installed"
                } else {
                    "ready to install"
                };
                self.term.write_line(&format!("{version_id}: {place}"))
            }
        }
    }

    fn render_search_results(&self, page: &SearchPage) -> io::Result<()> {
        if page.results.is_empty() {
            return self.term.write_line("No mods found.");
        }

        let mut table = self.table(&["Project", "Title", "Author", "Description"]);
        for hit in &page.results {
            table.add_row(vec![
                Cell::new(&hit.project_id),
                Cell::new(&hit.title).add_attribute(Attribute::Bold),
                Cell::new(hit.author.as_deref().unwrap_or("-")),
                Cell::new(&hit.description),
            ]);
        }

        self.term.write_line(&table.to_string())?;
        let last = u64::from(page.offset) + page.results.len() as u64;
        self.term.write_line(&format!(
            "Showing {}-{last} of {} results",
            page.offset + 1,
            page.total_hits
        ))
    }

    fn render_project(&self, view: &ProjectView) -> io::Result<()> {
        let details = &view.details;
        self.term.write_line(&self.bold(&details.title))?;
        self.term.write_line("")?;
        self.term.write_line(&details.description)?;
        self.term.write_line("")?;
        self.term.write_line(&format!("Project:     {}", details.project_id))?;
        self.term.write_line(&format!("Downloads:   {}", details.downloads))?;
        self.term.write_line(&format!("Followers:   {}", details.followers))?;
        if let Some(server_side) = &details.server_side {
            self.term.write_line(&format!("Server side: {server_side}"))?;
        }
        if let Some(updated) = &details.updated {
            self.term.write_line(&format!("Updated:     {updated}"))?;
        }

        let status = match (&view.version_id, view.installed, view.ready) {
            (Some(id), true, _) => {
                self.colored(&format!("installed ({id})"), &Style::new().green())
            }
            (Some(id), false, true) => {
                self.colored(&format!("ready to install ({id})"), &Style::new().yellow())
            }
            _ => "not added".to_string(),
        };
        self.term.write_line(&format!("Status:      {status}"))?;

        if !details.versions.is_empty() {
            self.term.write_line("")?;
            let mut table = self.table(&["Version", "Id", "Published", "File"]);
            for version in &details.versions {
                table.add_row(vec![
                    Cell::new(&version.version_number),
                    Cell::new(&version.id),
                    Cell::new(version.date_published.as_deref().unwrap_or("-")),
                    Cell::new(version.primary_file().map_or("-", |f| f.filename.as_str())),
                ]);
            }
            self.term.write_line(&table.to_string())?;
        }
        Ok(())
    }

    fn render_staged(&self, report: &StageReport) -> io::Result<()> {
        self.term
            .write_line(&self.colored(&report.message(), &Style::new().green()))?;
        for id in &report.added {
            self.term.write_line(&format!("  + {id}"))?;
        }
        for id in &report.linked {
            self.term.write_line(&format!("  = {id} (already tracked)"))?;
        }
        Ok(())
    }

    fn render_install(&self, outcome: &InstallOutcome) -> io::Result<()> {
        match outcome {
            InstallOutcome::NothingToInstall => self.term.write_line("No mods to install."),
            InstallOutcome::Completed(report) => self.render_install_report(report),
        }
    }

    fn render_install_report(&self, report: &InstallReport) -> io::Result<()> {
        if let Some(backup) = &report.backup {
            self.term.write_line(&format!("Backup: {backup}"))?;
        }

        let mut table = self.table(&["Mod", "Result"]);
        for id in &report.installed {
            table.add_row(vec![Cell::new(id), Cell::new("installed").fg(Color::Green)]);
        }
        for id in &report.already_installed {
            table.add_row(vec![Cell::new(id), Cell::new("already installed")]);
        }
        for skipped in &report.skipped {
            table.add_row(vec![
                Cell::new(&skipped.id),
                Cell::new(format!("skipped: {}", skipped.reason)).fg(Color::Yellow),
            ]);
        }
        for failure in &report.restore_failures {
            table.add_row(vec![
                Cell::new(&failure.id),
                Cell::new(format!("not restored: {}", failure.reason)).fg(Color::Red),
            ]);
        }
        self.term.write_line(&table.to_string())?;

        let summary = format!("{} mod(s) installed", report.installed_count());
        if report.is_complete() {
            self.term
                .write_line(&self.colored(&summary, &Style::new().green()))
        } else {
            self.term.write_line(&self.colored(
                &format!("{summary}, some entries need attention"),
                &Style::new().yellow(),
            ))
        }
    }

    fn render_removal(&self, report: &RemovalReport) -> io::Result<()> {
        for record in &report.removed {
            self.term.write_line(&format!(
                "Removed {} ({}) from {}",
                record.label(),
                record.id,
                report.list
            ))?;
        }
        for id in &report.retained {
            self.term
                .write_line(&format!("Kept {id}, still required by another mod"))?;
        }
        if !report.artifacts_deleted.is_empty() {
            self.term.write_line(&format!(
                "Deleted {} artifact(s)",
                report.artifacts_deleted.len()
            ))?;
        }
        Ok(())
    }

    fn render_command(&self, reply: &CommandReply) -> io::Result<()> {
        if reply.output.trim().is_empty() {
            self.term.write_line("Command sent.")
        } else {
            self.term.write_line(reply.output.trim_end())
        }
    }

    fn render_history(&self, history: &[CommandRecord]) -> io::Result<()> {
        if history.is_empty() {
            return self.term.write_line("No commands sent yet.");
        }

        let mut table = self.table(&["Sent", "Command"]);
        for record in history {
            table.add_row(vec![
                Cell::new(format_timestamp(record.timestamp)),
                Cell::new(&record.command),
            ]);
        }
        self.term.write_line(&table.to_string())
    }

    fn render_status(&self, state: &ContainerState) -> io::Result<()> {
        let style = match state {
            ContainerState::Running => Style::new().green(),
            ContainerState::NotFound | ContainerState::Dead => Style::new().red(),
            _ => Style::new().yellow(),
        };
        self.term
            .write_line(&format!("Server: {}", self.colored(&state.to_string(), &style)))
    }

    fn render_backups(&self, backups: &[String]) -> io::Result<()> {
        if backups.is_empty() {
            return self.term.write_line("No backups.");
        }
        for backup in backups {
            self.term.write_line(backup)?;
        }
        Ok(())
    }

    fn render_export(&self, report: &ExportReport) -> io::Result<()> {
        self.term.write_line(&format!(
            "Exported {} artifact(s) to {}",
            report.artifacts,
            report.path.display()
        ))
    }

    fn bold(&self, text: &str) -> String {
        self.colored(text, &Style::new().bold())
    }

    fn colored(&self, text: &str, style: &Style) -> String {
        if self.supports_color() {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn supports_color(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.term.features().colors_supported(),
        }
    }
}

fn format_timestamp(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0).map_or_else(
        || secs.to_string(),
        |t| t.format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_unix_seconds() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00");
        assert_eq!(format_timestamp(1_700_000_000), "2023-11-14 22:13:20");
    }

    #[test]
    fn never_colors_when_disabled() {
        let renderer = OutputRenderer::new(false, ColorChoice::Never);
        assert_eq!(renderer.bold("title"), "title");
    }
}
