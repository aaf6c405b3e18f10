//! Integration tests for events

#[cfg(test)]
mod tests {
    use modhost_events::*;

    struct Component {
        tx: Option<EventSender>,
    }

    impl EventEmitter for Component {
        fn event_sender(&self) -> Option<&EventSender> {
            self.tx.as_ref()
        }
    }

    #[tokio::test]
    async fn operation_helpers_emit_in_order() {
        let (tx, mut rx) = channel();
        let component = Component { tx: Some(tx) };

        component.emit_operation_started("install");
        component.emit_operation_completed("install", false);
        component.emit_operation_failed("remove", "not found");
        drop(component);

        let mut received = Vec::new();
        while let Some(message) = rx.recv().await {
            received.push(message);
        }
        assert_eq!(received.len(), 3);
        assert!(matches!(
            &received[0].event,
            AppEvent::General(GeneralEvent::OperationStarted { operation })
                if operation == "install"
        ));
        assert!(matches!(
            &received[1].event,
            AppEvent::General(GeneralEvent::OperationCompleted { success: false, .. })
        ));
        assert_eq!(received[2].meta.level, EventLevel::Error);
    }

    #[tokio::test]
    async fn component_without_sender_is_a_no_op() {
        let component = Component { tx: None };
        component.emit_warning_with_context("ignored", "no channel");
        component.emit(AppEvent::Download(DownloadEvent::Started {
            url: "https://cdn.modrinth.com/data/AABB/versions/v1/mod.jar".into(),
            package: Some("v1".into()),
        }));
    }

    #[tokio::test]
    async fn each_domain_maps_to_its_source() {
        let (tx, mut rx) = channel();
        let events = vec![
            (AppEvent::General(GeneralEvent::debug("d")), EventSource::General),
            (
                AppEvent::Uninstall(UninstallEvent::Started {
                    version_id: "v1".into(),
                    list: "installed".into(),
                }),
                EventSource::Uninstall,
            ),
            (
                AppEvent::Host(HostEvent::ActionStarted {
                    action: "stop".into(),
                    container: "mc".into(),
                }),
                EventSource::Host,
            ),
        ];

        for (event, source) in events {
            tx.emit(event);
            let message = rx.recv().await.unwrap();
            assert_eq!(message.meta.source, source);
        }
    }

    #[test]
    fn metadata_serializes_in_camel_case() {
        let meta = EventMessage::from_event(AppEvent::Install(InstallEvent::Completed {
            installed: 2,
            already_installed: 1,
            skipped: 0,
        }))
        .meta
        .with_correlation_id("batch-1");
        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains("\"correlationId\":\"batch-1\""));
        assert!(json.contains("\"source\":\"install\""));
    }
}
