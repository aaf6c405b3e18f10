//! Integration tests for types

#[cfg(test)]
mod tests {
    use modhost_types::*;

    #[test]
    fn test_list_documents_match_on_disk_names() {
        assert_eq!(ListName::Ready.document(), "ready_to_install.json");
        assert_eq!(ListName::Installed.document(), "installed_mods.json");
        assert_eq!(ListName::Installed.to_string(), "installed");
    }

    #[test]
    fn test_container_state_parse() {
        assert_eq!(ContainerState::parse("running\n"), ContainerState::Running);
        assert_eq!(ContainerState::parse("exited"), ContainerState::Exited);
        assert_eq!(
            ContainerState::parse("weird"),
            ContainerState::Unknown("weird".into())
        );
        assert!(ContainerState::Running.is_running());
        assert_eq!(ContainerState::NotFound.to_string(), "not_found");
    }

    #[test]
    fn test_install_outcome_distinguishes_nothing_to_do() {
        let nothing = InstallOutcome::NothingToInstall;
        assert!(!nothing.is_success());
        assert!(nothing.report().is_none());

        let partial = InstallOutcome::Completed(InstallReport {
            installed: vec!["v1".into()],
            skipped: vec![SkippedRecord {
                id: "v2".into(),
                reason: "HTTP error 404: Not Found".into(),
            }],
            ..InstallReport::default()
        });
        assert!(partial.is_success());
        let report = partial.report().unwrap();
        assert_eq!(report.installed_count(), 1);
        assert!(!report.is_complete());

        let json = serde_json::to_value(&partial).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["report"]["skipped"][0]["id"], "v2");
    }

    #[test]
    fn test_project_file_into_record() {
        let file = ProjectFile {
            project_id: "P7dR8mSH".into(),
            version_id: "v1".into(),
            title: "Fabric API".into(),
            description: "Core hooks".into(),
            icon_url: None,
            file_url: "https://cdn.modrinth.com/data/P7dR8mSH/fabric-api.jar".into(),
            file_name: "fabric-api.jar".into(),
        };
        let record = file.into_record();
        assert_eq!(record.id, "v1");
        assert_eq!(record.project_id, "P7dR8mSH");
        assert_eq!(record.file_name, "fabric-api.jar");
        assert!(record.is_direct());
        assert_eq!(record.installed_at, None);
    }

    #[test]
    fn test_stage_report_message() {
        let report = StageReport {
            root_id: "v1".into(),
            project_id: "P1".into(),
            added: vec!["v2".into(), "v3".into()],
            linked: Vec::new(),
        };
        assert_eq!(
            report.message(),
            "Mod added to ready to install list with 2 dependencies"
        );
    }
}
