#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use chrono::{TimeZone, Utc};
use secrecy::SecretString;
use serde_json::json;
use tokio::time::timeout;
use url::Url;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zabbix_objects::error::{EntityError, Error, LookupError, ZbxError};
use zabbix_objects::objects::{
    EventFactory, Host, HostFactory, HostGroupFactory, HostInterfaceFactory, TemplateFactory,
    TriggerFactory, UserMacroFactory,
};
use zabbix_objects::types::{InterfaceKind, Severity, TriggerState};
use zabbix_objects::zbx_client::ZbxClient;

fn client(base: &MockServer) -> ZbxClient {
    ZbxClient::new(
        Url::parse(&base.uri()).expect("valid mock url"),
        SecretString::from("token"),
        Duration::from_secs(2),
        Duration::from_secs(1),
        true,
    )
    .expect("client")
}

fn rpc_result(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "result": result,
        "id": 1
    }))
}

#[tokio::test]
async fn get_by_name_returns_matching_host() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("host.get"))
        .respond_with(rpc_result(json!([
            {"hostid": "101", "host": "zabbix", "name": "Zabbix server", "status": "0"}
        ])))
        .mount(&server)
        .await;

    let host = HostFactory::new(client(&server))
        .get_by_name("zabbix")
        .await
        .expect("host");
    assert_eq!(host.hostid(), 101);
    assert_eq!(host.host(), Some("zabbix"));
    assert_eq!(host.name(), Some("Zabbix server"));
    assert!(host.is_monitored());
}

#[tokio::test]
async fn get_by_name_fails_on_zero_matches() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([])))
        .mount(&server)
        .await;

    let err = HostFactory::new(client(&server))
        .get_by_name("ghost")
        .await
        .expect_err("should fail");
    assert!(matches!(
        err,
        Error::Lookup(LookupError::NotFound { entity: "host", .. })
    ));
    insta::assert_snapshot!(err.to_string(), @r#"no host matched name "ghost""#);
}

#[tokio::test]
async fn get_by_name_fails_on_multiple_matches() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([
            {"hostid": "1", "host": "dup"},
            {"hostid": "2", "host": "dup"}
        ])))
        .mount(&server)
        .await;

    let err = HostFactory::new(client(&server))
        .get_by_name("dup")
        .await
        .expect_err("should fail");
    assert!(matches!(
        err,
        Error::Lookup(LookupError::Ambiguous { count: 2, .. })
    ));
    insta::assert_snapshot!(
        err.to_string(),
        @r#"2 host records matched name "dup", expected exactly one"#
    );
}

#[tokio::test]
async fn empty_name_short_circuits_without_remote_call() {
    let server = MockServer::start().await;

    let err = HostFactory::new(client(&server))
        .get_by_name("  ")
        .await
        .expect_err("should fail");
    assert!(matches!(
        err,
        Error::Lookup(LookupError::EmptyName { entity: "host" })
    ));

    let requests = server.received_requests().await.expect("requests");
    assert!(requests.is_empty());
}

#[tokio::test]
async fn record_without_identifier_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([{"host": "zabbix"}])))
        .mount(&server)
        .await;

    let err = HostFactory::new(client(&server))
        .get_by_name("zabbix")
        .await
        .expect_err("should fail");
    assert!(matches!(
        err,
        Error::Entity(EntityError::MissingIdentifier { field: "hostid" })
    ));
}

#[tokio::test]
async fn api_errors_pass_through_unchanged() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "error": {
                "code": 42,
                "message": "Invalid token"
            },
            "id": 1
        })))
        .mount(&server)
        .await;

    let err = HostFactory::new(client(&server))
        .get_by_name("zabbix")
        .await
        .expect_err("should fail");
    assert!(err.is_remote());
    match err {
        Error::Zabbix(ZbxError::Api { code, message }) => {
            assert_eq!(code, 42);
            assert_eq!(message, "Invalid token");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn lookup_payload_carries_method_filter_and_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([])))
        .mount(&server)
        .await;

    let _ = HostFactory::new(client(&server)).get_by_name("zabbix").await;

    let requests = server.received_requests().await.expect("requests");
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).expect("json body");
    assert_eq!(body["jsonrpc"], "2.0");
    assert_eq!(body["method"], "host.get");
    assert_eq!(body["auth"], "token");
    assert_eq!(body["params"]["output"], "extend");
    assert_eq!(body["params"]["filter"], json!({"host": "zabbix"}));
}

#[tokio::test]
async fn repeated_lookups_issue_fresh_queries_and_agree() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([
            {"hostid": "101", "host": "zabbix"}
        ])))
        .mount(&server)
        .await;

    let factory = HostFactory::new(client(&server));
    let first = factory.get_by_name("zabbix").await.expect("first");
    let second = factory.get_by_name("zabbix").await.expect("second");
    assert_eq!(first.hostid(), second.hostid());
    assert_eq!(first.host(), second.host());

    let requests = server.received_requests().await.expect("requests");
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn create_builds_host_from_assigned_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("host.create"))
        .respond_with(rpc_result(json!({"hostids": ["10501"]})))
        .mount(&server)
        .await;

    let factory = HostFactory::new(client(&server));
    let host = factory
        .create(json!({
            "host": "new-host",
            "groups": [{"groupid": "7"}]
        }))
        .await
        .expect("created host");
    assert_eq!(host.hostid(), 10501);

    let err = factory
        .create(json!({"groups": [{"groupid": "7"}]}))
        .await
        .expect_err("definition without a name should fail");
    assert!(matches!(
        err,
        Error::Lookup(LookupError::EmptyName { entity: "host" })
    ));
}

#[tokio::test]
async fn refresh_replaces_fields_but_keeps_identifier() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("filter"))
        .respond_with(rpc_result(json!([
            {"hostid": "101", "host": "zabbix", "status": "1"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("hostids"))
        .respond_with(rpc_result(json!([
            {"hostid": "101", "host": "zabbix", "name": "Zabbix server", "status": "0"}
        ])))
        .mount(&server)
        .await;

    let mut host = HostFactory::new(client(&server))
        .get_by_name("zabbix")
        .await
        .expect("host");
    assert_eq!(host.status(), Some(1));
    assert_eq!(host.name(), None);

    host.refresh().await.expect("refresh");
    assert_eq!(host.hostid(), 101);
    assert_eq!(host.status(), Some(0));
    assert_eq!(host.name(), Some("Zabbix server"));
}

#[tokio::test]
async fn bulk_lookup_marks_missing_names_as_none() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("alpha"))
        .respond_with(rpc_result(json!([
            {"hostid": "101", "host": "alpha"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("ghost"))
        .respond_with(rpc_result(json!([])))
        .mount(&server)
        .await;

    let hosts = HostFactory::new(client(&server))
        .get_by_names(&["alpha".to_string(), "ghost".to_string()], 2)
        .await
        .expect("bulk lookup");
    assert_eq!(hosts.len(), 2);
    assert_eq!(hosts[0].as_ref().map(Host::hostid), Some(101));
    assert!(hosts[1].is_none());
}

#[tokio::test]
async fn timeouts_surface_as_request_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"jsonrpc":"2.0","result":[],"id":1}))
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;

    let client = ZbxClient::new(
        Url::parse(&server.uri()).unwrap(),
        SecretString::from("token"),
        Duration::from_millis(500),
        Duration::from_millis(200),
        true,
    )
    .unwrap();

    let res = timeout(
        Duration::from_secs(5),
        HostFactory::new(client).get_by_name("zabbix"),
    )
    .await;
    let err = res.expect("timeout future").expect_err("should fail");
    assert!(matches!(err, Error::Zabbix(ZbxError::Request { .. })));
}

#[tokio::test]
async fn group_lookup_and_create_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("hostgroup.get"))
        .respond_with(rpc_result(json!([
            {"groupid": "7", "name": "Linux servers"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("hostgroup.create"))
        .respond_with(rpc_result(json!({"groupids": ["8"]})))
        .mount(&server)
        .await;

    let factory = HostGroupFactory::new(client(&server));
    let group = factory.get_by_name("Linux servers").await.expect("group");
    assert_eq!(group.groupid(), 7);
    assert_eq!(group.name(), Some("Linux servers"));

    let created = factory.create("Databases").await.expect("created group");
    assert_eq!(created.groupid(), 8);
    assert_eq!(created.name(), Some("Databases"));
}

#[tokio::test]
async fn macro_create_builds_entity_with_known_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("usermacro.create"))
        .respond_with(rpc_result(json!({"hostmacroids": ["55"]})))
        .mount(&server)
        .await;

    let created = UserMacroFactory::new(client(&server))
        .create(101, "{$IS_VIP}", "1")
        .await
        .expect("created macro");
    assert_eq!(created.hostmacroid(), 55);
    assert_eq!(created.hostid(), Some(101));
    assert_eq!(created.name(), Some("{$IS_VIP}"));
    assert_eq!(created.value(), Some("1"));
}

#[tokio::test]
async fn template_lookup_uses_technical_name() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("template.get"))
        .respond_with(rpc_result(json!([
            {
                "templateid": "301",
                "host": "Template OS Linux",
                "name": "Linux by agent",
                "description": "Base Linux checks"
            }
        ])))
        .mount(&server)
        .await;

    let template = TemplateFactory::new(client(&server))
        .get_by_name("Template OS Linux")
        .await
        .expect("template");
    assert_eq!(template.templateid(), 301);
    assert_eq!(template.host(), Some("Template OS Linux"));
    assert_eq!(template.name(), Some("Linux by agent"));
    assert_eq!(template.description(), Some("Base Linux checks"));
}

#[tokio::test]
async fn interfaces_for_host_expose_typed_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("hostinterface.get"))
        .respond_with(rpc_result(json!([
            {
                "interfaceid": "21",
                "hostid": "101",
                "ip": "192.0.2.10",
                "dns": "",
                "port": "10050",
                "type": "1",
                "main": "1",
                "useip": "1"
            },
            {
                "interfaceid": "22",
                "hostid": "101",
                "ip": "",
                "dns": "snmp.example.org",
                "port": "161",
                "type": "2",
                "main": "0",
                "useip": "0"
            }
        ])))
        .mount(&server)
        .await;

    let interfaces = HostInterfaceFactory::new(client(&server))
        .for_host(101)
        .await
        .expect("interfaces");
    assert_eq!(interfaces.len(), 2);
    assert_eq!(interfaces[0].kind(), Some(InterfaceKind::Agent));
    assert!(interfaces[0].is_main());
    assert_eq!(interfaces[0].use_ip(), Some(true));
    assert_eq!(interfaces[0].port(), Some(10050));
    assert_eq!(interfaces[1].kind(), Some(InterfaceKind::Snmp));
    assert!(!interfaces[1].is_main());
    assert_eq!(interfaces[1].dns(), Some("snmp.example.org"));
}

#[tokio::test]
async fn trigger_lookup_resolves_owning_host() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("trigger.get"))
        .respond_with(rpc_result(json!([
            {
                "triggerid": "999",
                "description": "Disk full on srv01",
                "value": "1",
                "priority": "4",
                "hosts": [{"hostid": "101", "host": "srv01"}]
            }
        ])))
        .mount(&server)
        .await;

    let trigger = TriggerFactory::new(client(&server))
        .get_by_id(999)
        .await
        .expect("trigger");
    assert_eq!(trigger.triggerid(), 999);
    assert_eq!(trigger.description(), Some("Disk full on srv01"));
    assert_eq!(trigger.state(), Some(TriggerState::Problem));
    assert_eq!(trigger.severity(), Some(Severity::High));
    assert_eq!(trigger.host().hostid(), 101);
    assert_eq!(trigger.host().host(), Some("srv01"));
}

#[tokio::test]
async fn event_lookup_resolves_related_trigger() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("event.get"))
        .respond_with(rpc_result(json!([
            {
                "eventid": "123",
                "clock": "1700000000",
                "acknowledged": "0",
                "objectid": "999"
            }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("trigger.get"))
        .respond_with(rpc_result(json!([
            {
                "triggerid": "999",
                "description": "Disk full on srv01",
                "value": "1",
                "priority": "4",
                "hosts": [{"hostid": "101", "host": "srv01"}]
            }
        ])))
        .mount(&server)
        .await;

    let event = EventFactory::new(client(&server))
        .get_by_id(123)
        .await
        .expect("event");
    assert_eq!(event.eventid(), 123);
    assert_eq!(
        event.clock(),
        Utc.timestamp_opt(1_700_000_000, 0).single()
    );
    assert_eq!(event.acknowledged(), Some(false));
    assert_eq!(event.trigger().triggerid(), 999);
    assert_eq!(event.trigger().host().host(), Some("srv01"));
}

#[tokio::test]
async fn recent_events_build_from_query_embeds() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("event.get"))
        .respond_with(rpc_result(json!([
            {
                "eventid": "124",
                "clock": "1700000200",
                "name": "High CPU",
                "severity": "4",
                "acknowledged": "0",
                "hosts": [{"hostid": "102", "host": "srv02", "name": "Server 02"}],
                "relatedObject": {
                    "triggerid": "1000",
                    "description": "High CPU",
                    "value": "1",
                    "priority": "4"
                }
            }
        ])))
        .mount(&server)
        .await;

    let since = Utc.timestamp_opt(1_700_000_000, 0).single().expect("since");
    let events = EventFactory::new(client(&server))
        .recent_for_groups(&[10], since, 100)
        .await
        .expect("events");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name(), Some("High CPU"));
    assert_eq!(events[0].severity(), Some(Severity::High));
    assert_eq!(events[0].trigger().triggerid(), 1000);
    assert_eq!(events[0].trigger().host().hostid(), 102);

    let requests = server.received_requests().await.expect("requests");
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).expect("json body");
    assert_eq!(body["params"]["groupids"], json!(["10"]));
    assert_eq!(body["params"]["time_from"], json!(1_700_000_000));
    assert_eq!(body["params"]["value"], json!(1));
    assert_eq!(body["params"]["limit"], json!(100));
}
