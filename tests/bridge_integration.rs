// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests driving a bridge through a mock transceiver.

mod common;

use common::MockTransceiver;
use rfxmqtt_lib::protocol::{SUBTYPE_NOT_FOUND, is_group_command};
use rfxmqtt_lib::{
    Bridge, BridgeConfig, BridgeEvent, BridgeStatus, CommandPayload, ConfigError, DeviceConfigOverride,
    DeviceKind, DispatchOutcome, Error, RawEvent, Rejection, Settings, StateError, TransceiverError,
    TransceiverStatus,
};
use serde_json::json;

fn settings() -> Settings {
    Settings::from_json_str(
        r#"{
            "mqtt": {"server": "mqtt://127.0.0.1:1883", "baseTopic": "rfxcom2mqtt"},
            "rfxcom": {
                "usbport": "/dev/ttyUSB0",
                "receive": ["lighting2", "lighting4", "security1"],
                "devices": [
                    {"friendlyName": "lamp1", "id": "0x01", "subtype": 1, "repetitions": 3},
                    {"friendlyName": "porch", "id": "0x0102ABCD", "type": "Lighting2", "subtype": "0"},
                    {"friendlyName": "broken", "type": "NoSuchDevice", "subtype": 0},
                    {"friendlyName": "blind", "type": "Rfy", "subtype": 0, "options": {"venetianBlindsMode": "EU"}}
                ]
            }
        }"#,
    )
    .unwrap()
}

fn bridge() -> (Bridge<MockTransceiver>, MockTransceiver) {
    let transceiver = MockTransceiver::new();
    let bridge = Bridge::new(transceiver.clone(), settings().rfxcom);
    (bridge, transceiver)
}

// ============================================================================
// Command dispatch
// ============================================================================

mod dispatch {
    use super::*;

    #[test]
    fn override_repeats_and_substitutes_id() {
        let (bridge, transceiver) = bridge();

        let outcome = bridge
            .dispatch("Lighting2", "lamp1", &CommandPayload::new("switchOn"))
            .unwrap();

        assert_eq!(
            outcome,
            DispatchOutcome::Sent {
                kind: DeviceKind::Lighting2,
                entity: "0x01".to_string(),
                repetitions: 3,
            }
        );

        let sent = transceiver.sent();
        assert_eq!(sent.len(), 3);
        for transmission in &sent {
            assert_eq!(transmission.device_id, "0x01");
            assert_eq!(transmission.function, "switchOn");
            assert_eq!(transmission.subtype.code(), Some(1));
        }
    }

    #[test]
    fn every_class_and_function_honours_repetitions() {
        let (bridge, transceiver) = bridge();

        for kind in DeviceKind::ALL {
            for function in kind.functions() {
                let before = transceiver.sent().len();
                let outcome = bridge
                    .dispatch(kind.class_name(), "lamp1", &CommandPayload::new(*function))
                    .unwrap();

                assert!(outcome.is_sent(), "{kind}.{function}: {outcome:?}");
                assert_eq!(transceiver.sent().len() - before, 3, "{kind}.{function}");
            }
        }
    }

    #[test]
    fn unconfigured_entity_is_sent_once_with_payload_subtype() {
        let (bridge, transceiver) = bridge();

        let payload = CommandPayload::new("setLevel")
            .with_subtype("1")
            .with_value(json!(7));
        bridge.dispatch("Lighting2", "0x0A/2", &payload).unwrap();

        let sent = transceiver.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].device_id, "0x0A/2");
        assert_eq!(sent[0].value, Some(json!(7)));
    }

    #[test]
    fn override_options_reach_the_driver() {
        let (bridge, transceiver) = bridge();

        bridge
            .dispatch("Rfy", "blind", &CommandPayload::new("up"))
            .unwrap();

        let sent = transceiver.sent();
        assert_eq!(sent[0].kind, DeviceKind::Rfy);
        assert_eq!(sent[0].options, Some(json!({"venetianBlindsMode": "EU"})));
    }

    #[test]
    fn unknown_type_is_a_silent_noop() {
        let (bridge, transceiver) = bridge();

        let outcome = bridge
            .dispatch("Lighting99", "lamp1", &CommandPayload::new("switchOn").with_subtype(0))
            .unwrap();

        assert_eq!(
            outcome.rejection(),
            Some(&Rejection::UnknownDeviceType("Lighting99".to_string()))
        );
        assert!(transceiver.sent().is_empty());
    }

    #[test]
    fn unknown_function_is_a_silent_noop() {
        let (bridge, transceiver) = bridge();

        let outcome = bridge
            .dispatch("Lighting2", "lamp1", &CommandPayload::new("explode"))
            .unwrap();

        assert!(matches!(
            outcome,
            DispatchOutcome::Rejected(Rejection::UnknownFunction { .. })
        ));
        assert!(transceiver.sent().is_empty());
    }

    #[test]
    fn missing_subtype_is_fatal() {
        let (bridge, transceiver) = bridge();

        let err = bridge
            .dispatch("Lighting2", "0x0A/2", &CommandPayload::new("switchOff"))
            .unwrap_err();

        assert!(matches!(err, Error::Config(ConfigError::MissingSubtype { .. })));
        assert!(transceiver.sent().is_empty());
    }

    #[test]
    fn misconfigured_override_type_is_fatal() {
        let (bridge, transceiver) = bridge();

        let err = bridge
            .dispatch("Lighting2", "broken", &CommandPayload::new("switchOn"))
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidDeviceType { ref device_type }) if device_type == "NoSuchDevice"
        ));
        assert!(transceiver.sent().is_empty());
    }

    #[test]
    fn send_command_addresses_by_packet_type() {
        let (bridge, transceiver) = bridge();

        bridge
            .send_command("lighting2", "AC", Some("switchOn"), "0x0102ABCD/1")
            .unwrap();

        let sent = transceiver.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, DeviceKind::Lighting2);
        assert_eq!(sent[0].subtype.code(), Some(0));
    }
}

// ============================================================================
// Event routing and device state
// ============================================================================

mod routing {
    use super::*;

    #[tokio::test]
    async fn lighting4_device_is_identified_by_data() {
        let (bridge, transceiver) = bridge();
        let mut events = bridge.subscribe();
        bridge.start().await.unwrap();

        transceiver.receive(
            "lighting4",
            RawEvent::new(0x13, 0)
                .with_data("0x3F8F01")
                .with_field("pulse", 350),
        );

        let event = events.recv().await.unwrap();
        assert_eq!(event.device_id(), Some("0x3F8F01"));
        assert_eq!(event.protocol(), Some("lighting4"));
        assert!(bridge.registry().get("0x3F8F01").is_some());
    }

    #[tokio::test]
    async fn unresolved_subtype_is_forwarded() {
        let (bridge, transceiver) = bridge();
        let mut events = bridge.subscribe();
        bridge.start().await.unwrap();

        transceiver.receive("lighting2", RawEvent::new(0x11, 77).with_id("0x0B"));

        let BridgeEvent::Received { event, .. } = events.recv().await.unwrap() else {
            panic!("expected a received event");
        };
        assert_eq!(event.sub_type_value, SUBTYPE_NOT_FOUND);
    }

    #[tokio::test]
    async fn unsubscribed_protocols_are_not_routed() {
        let (bridge, transceiver) = bridge();
        let mut events = bridge.subscribe();
        bridge.start().await.unwrap();

        transceiver.receive("lighting1", RawEvent::new(0x10, 0).with_id("A1"));

        assert!(events.try_recv().is_err());
        assert!(bridge.registry().get("A1").is_none());
    }

    #[tokio::test]
    async fn switch_topics_are_shared_between_directions() {
        let (bridge, transceiver) = bridge();
        bridge.start().await.unwrap();

        transceiver.receive(
            "lighting2",
            RawEvent::new(0x11, 0)
                .with_id("0x0102ABCD")
                .with_unit_code(3)
                .with_command_number(1),
        );

        let registry = bridge.registry();
        let command = registry.command_topic("rfxcom2mqtt/", "0x0102ABCD", "porch_3").unwrap();
        let state = registry.state_topic("rfxcom2mqtt/", "0x0102ABCD", "porch_3").unwrap();
        assert_eq!(command, "rfxcom2mqtt/lighting2/0/0x0102ABCD/3");
        assert_eq!(command, state);

        assert!(matches!(
            registry.command_topic("rfxcom2mqtt/", "0x0102ABCD", "kitchen"),
            Err(StateError::SwitchNotRegistered { .. })
        ));
    }

    #[tokio::test]
    async fn group_commands_register_no_switch() {
        let (bridge, transceiver) = bridge();
        bridge.start().await.unwrap();

        assert!(is_group_command("lighting2", 4));
        transceiver.receive(
            "lighting2",
            RawEvent::new(0x11, 0)
                .with_id("0x0C")
                .with_unit_code(1)
                .with_command_number(4),
        );

        let state = bridge.registry().get("0x0C").unwrap();
        assert!(state.switches().is_empty());
        assert_eq!(state.entities(), ["0x0C"]);
    }

    #[tokio::test]
    async fn repeated_events_do_not_duplicate_entities() {
        let (bridge, transceiver) = bridge();
        bridge.start().await.unwrap();

        for _ in 0..3 {
            transceiver.receive("security1", RawEvent::new(0x20, 0).with_id("0xAB12"));
        }

        assert_eq!(bridge.registry().get("0xAB12").unwrap().entities().len(), 1);
    }

    #[test]
    fn configured_device_is_known_before_start() {
        let (bridge, _) = bridge();
        let info = bridge.registry().info("0x0102ABCD").unwrap();

        assert_eq!(info.name, "porch");
        assert_eq!(info.identifiers, ["rfxcom2mqtt_0x0102ABCD"]);
        assert_eq!(info.manufacturer, "Rfxcom");
        assert_eq!(info.via_device, "rfxcom2mqtt_bridge");
    }
}

// ============================================================================
// Session lifecycle
// ============================================================================

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn start_enables_configured_protocols() {
        let (bridge, transceiver) = bridge();
        bridge.start().await.unwrap();
        assert_eq!(transceiver.enabled(), ["lighting2", "lighting4", "security1"]);
    }

    #[tokio::test]
    async fn unreachable_transceiver_fails_start() {
        let transceiver = MockTransceiver::unreachable();
        let bridge = Bridge::new(transceiver.clone(), BridgeConfig::new("/dev/null"));

        let err = bridge.start().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Transceiver(TransceiverError::InitialisationFailed(_))
        ));
        assert_eq!(bridge.health_check(), BridgeStatus::Offline);
    }

    #[tokio::test]
    async fn status_updates_bridge_info() {
        let (bridge, transceiver) = bridge();
        let mut events = bridge.subscribe();
        bridge.start().await.unwrap();

        let status = TransceiverStatus {
            receiver_type: "433.92MHz transceiver".to_string(),
            firmware_type: "Pro XL1".to_string(),
            firmware_version: 1044,
            enabled_protocols: vec!["AC".to_string()],
            ..TransceiverStatus::default()
        };
        transceiver.report_status(status.clone());

        assert_eq!(events.recv().await.unwrap(), BridgeEvent::Status(status.clone()));

        let info = serde_json::to_value(bridge.bridge_info()).unwrap();
        assert_eq!(info["coordinator"]["firmwareType"], "Pro XL1");
        assert_eq!(info["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(info["logLevel"], "info");
    }

    #[tokio::test]
    async fn disconnect_is_published_and_stop_closes() {
        let (bridge, transceiver) = bridge();
        let mut events = bridge.subscribe();
        bridge.start().await.unwrap();

        transceiver.disconnect();
        assert_eq!(events.recv().await.unwrap(), BridgeEvent::Disconnected);

        bridge.stop();
        assert!(transceiver.is_closed());
    }

    #[test]
    fn health_check_reports_online() {
        let bridge = Bridge::new(MockTransceiver::new(), settings().rfxcom).with_log_level("debug");
        assert_eq!(bridge.health_check(), BridgeStatus::Online);
        assert_eq!(bridge.bridge_info().log_level, "debug");
    }

    #[test]
    fn programmatic_config_matches_json() {
        let config = BridgeConfig::new("/dev/ttyUSB0")
            .with_receive("lighting2")
            .with_device(
                DeviceConfigOverride::new()
                    .with_friendly_name("lamp1")
                    .with_id("0x01")
                    .with_subtype(1)
                    .with_repetitions(3),
            );

        assert_eq!(config.devices[0], settings().rfxcom.devices[0]);
    }
}
