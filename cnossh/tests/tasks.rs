//! End-to-end task runs against a scripted switch.

mod common;

use secrecy::SecretString;

use cnossh::task::{self, BackupParams, CommandParams, ConfigType, Protocol, TaskKind, TaskOutcome};
use common::{SwitchConfig, session, spawn_switch};

const DEVICE_ERROR: &str = "Device returned an Error. Please check Results for more information";

struct Run {
    outcome: TaskOutcome,
    received: Vec<String>,
    output: String,
}

async fn run(config: SwitchConfig, task: TaskKind, enable: Option<&str>) -> Run {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    run_to(&path, config, task, enable).await
}

async fn run_to(
    path: &std::path::Path,
    config: SwitchConfig,
    task: TaskKind,
    enable: Option<&str>,
) -> Run {
    let (stream, switch) = spawn_switch(config);
    let mut session = session(stream);
    let enable = enable.map(|p| SecretString::from(p.to_string()));

    let outcome = task::run_session(&mut session, &task, enable.as_ref(), path)
        .await
        .unwrap();
    session.close().await.unwrap();

    Run {
        outcome,
        received: switch.await.unwrap(),
        output: std::fs::read_to_string(path).unwrap(),
    }
}

fn backup(protocol: Protocol, password: Option<&str>) -> TaskKind {
    TaskKind::Backup(BackupParams {
        config_type: ConfigType::RunningConfig,
        protocol,
        server_ip: "10.0.0.9".to_string(),
        remote_path: "sw.cfg".to_string(),
        server_username: Some("root".to_string()),
        server_password: password.map(|p| SecretString::from(p.to_string())),
    })
}

fn commands(list: &[&str]) -> TaskKind {
    TaskKind::Command(CommandParams::new(list.iter().copied()).unwrap())
}

#[tokio::test]
async fn save_writes_memory_and_succeeds() {
    let run = run(SwitchConfig::default(), TaskKind::Save, None).await;

    assert_eq!(run.outcome, TaskOutcome::changed(task::save::SAVED));
    assert_eq!(run.received, ["", "enable", "terminal-length 0", "write memory"]);
    assert!(run.output.starts_with("\r\nLenovo Networking Operating System"));
    assert!(run.output.ends_with("write memory\r\nG8272#"));
}

#[tokio::test]
async fn output_file_accumulates_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.txt");

    let first = run_to(&path, SwitchConfig::default(), TaskKind::Save, None).await;
    let second = run_to(&path, SwitchConfig::default(), TaskKind::Save, None).await;

    assert!(first.outcome.is_success());
    assert_eq!(second.output.len(), 2 * first.output.len());
    assert_eq!(second.output.matches("write memory").count(), 2);
}

#[tokio::test]
async fn enable_password_is_answered_but_not_recorded() {
    let config = SwitchConfig {
        enable_password: Some("anil".to_string()),
        ..Default::default()
    };
    let run = run(config, TaskKind::Save, Some("anil")).await;

    assert!(run.outcome.is_success());
    assert_eq!(run.received[2], "anil");
    assert!(!run.output.contains("anil"));
}

#[tokio::test(start_paused = true)]
async fn wrong_enable_password_reports_device_error() {
    let config = SwitchConfig {
        enable_password: Some("anil".to_string()),
        ..Default::default()
    };
    let run = run(config, TaskKind::Save, Some("guess")).await;

    assert_eq!(run.outcome, TaskOutcome::failed(DEVICE_ERROR));
    assert!(run.output.contains("% Incorrect password"));
    assert!(!run.received.iter().any(|line| line == "write memory"));
}

#[tokio::test]
async fn commands_run_in_configuration_mode() {
    let run = run(
        SwitchConfig::default(),
        commands(&["interface ethernet 1/1", "description uplink"]),
        None,
    )
    .await;

    assert_eq!(run.outcome, TaskOutcome::changed(task::command::EXECUTED));
    assert_eq!(
        &run.received[3..],
        [
            "terminal dont-ask",
            "configure t",
            "interface ethernet 1/1",
            "description uplink"
        ]
    );
    assert!(run.output.ends_with("G8272(config-if)#"));
}

#[tokio::test]
async fn invalid_command_fails_with_device_error() {
    let run = run(SwitchConfig::default(), commands(&["vlan 10", "bogus"]), None).await;

    assert_eq!(run.outcome, TaskOutcome::failed(DEVICE_ERROR));
    assert!(run.output.contains("% Invalid input detected"));
}

#[tokio::test(start_paused = true)]
async fn hung_command_fails_instead_of_truncating() {
    let run = run(SwitchConfig::default(), commands(&["hang"]), None).await;

    assert!(run.outcome.failed);
    assert!(run.outcome.msg.starts_with("Timed out after 2s"));
    assert!(run.outcome.msg.contains("(sent 'hang')"));
    assert!(run.output.ends_with("hang\r\n"));
}

#[tokio::test]
async fn sftp_backup_trusts_host_and_logs_in() {
    let config = SwitchConfig {
        server_password: "root123".to_string(),
        ask_host_key: true,
        ..Default::default()
    };
    let run = run(config, backup(Protocol::Sftp, Some("root123")), None).await;

    assert_eq!(run.outcome, TaskOutcome::changed(task::backup::TRANSFERRED));
    assert_eq!(
        &run.received[3..],
        [
            "copy running-config sftp sftp://root@10.0.0.9/sw.cfg vrf management",
            "yes",
            "root123"
        ]
    );
    assert!(run.output.contains("\n Config Back Up status \n"));
    assert!(run.output.contains("Copy complete."));
    assert!(!run.output.contains("root123"));
}

#[tokio::test]
async fn scp_backup_with_known_server() {
    let config = SwitchConfig {
        server_password: "root123".to_string(),
        ..Default::default()
    };
    let run = run(config, backup(Protocol::Scp, Some("root123")), None).await;

    assert!(run.outcome.is_success());
    assert_eq!(run.received.last().map(String::as_str), Some("root123"));
}

#[tokio::test]
async fn rejected_server_password_fails() {
    let config = SwitchConfig {
        server_password: "root123".to_string(),
        ..Default::default()
    };
    let run = run(config, backup(Protocol::Sftp, Some("wrong")), None).await;

    assert_eq!(run.outcome, TaskOutcome::failed(DEVICE_ERROR));
    assert!(run.output.contains("Permission denied"));
}

#[tokio::test]
async fn ftp_backup_sends_password() {
    let config = SwitchConfig {
        server_password: "ftppw".to_string(),
        ..Default::default()
    };
    let run = run(config, backup(Protocol::Ftp, Some("ftppw")), None).await;

    assert!(run.outcome.is_success());
    assert_eq!(
        &run.received[3..],
        ["copy running-config ftp ftp://root@10.0.0.9/sw.cfg vrf management", "ftppw"]
    );
}

#[tokio::test]
async fn tftp_backup_needs_no_login() {
    let run = run(SwitchConfig::default(), backup(Protocol::Tftp, None), None).await;

    assert!(run.outcome.is_success());
    assert_eq!(
        run.received.last().map(String::as_str),
        Some("copy running-config tftp tftp://10.0.0.9/sw.cfg vrf management")
    );
}

#[tokio::test]
async fn missing_server_password_is_rejected_before_copy() {
    let (stream, switch) = spawn_switch(SwitchConfig::default());
    let mut session = session(stream);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");

    let result =
        task::run_session(&mut session, &backup(Protocol::Sftp, None), None, &path).await;
    session.close().await.unwrap();

    assert!(result.is_err());
    assert!(
        !switch
            .await
            .unwrap()
            .iter()
            .any(|line| line.starts_with("copy"))
    );
}

#[tokio::test(start_paused = true)]
async fn secure_backup_without_password_prompt_sends_no_password() {
    let config = SwitchConfig {
        server_password: "root123".to_string(),
        silent_copy: true,
        ..Default::default()
    };
    let run = run(config, backup(Protocol::Sftp, Some("root123")), None).await;

    assert!(run.outcome.failed);
    assert!(run.outcome.msg.starts_with("Timed out after 3s"));
    assert!(run.outcome.msg.contains("'(yes/no)' or 'assword:'"));
    assert!(!run.received.iter().any(|line| line == "root123"));
    assert!(run.received.last().unwrap().starts_with("copy running-config sftp"));
}

#[tokio::test(start_paused = true)]
async fn ftp_backup_stops_after_stalled_step() {
    let config = SwitchConfig {
        server_password: "ftppw".to_string(),
        silent_copy: true,
        ..Default::default()
    };
    let run = run(config, backup(Protocol::Ftp, Some("ftppw")), None).await;

    assert!(run.outcome.failed);
    assert!(run.outcome.msg.starts_with("Timed out after 2s"));
    assert!(!run.received.iter().any(|line| line == "ftppw"));
    assert!(run.received.last().unwrap().starts_with("copy running-config ftp"));
}

#[tokio::test]
async fn login_without_password_or_key_fails_before_connecting() {
    let args = cnossh::ModuleArgs::from_json(
        r#"{"module": "save", "host": "10.0.0.1", "username": "admin",
            "deviceType": "g8272_cnos", "outputfile": "out.txt"}"#,
    )
    .unwrap();

    let outcome = task::run(args).await;

    assert!(!outcome.is_success());
    assert!(outcome.msg.contains("A password or private key is required"));
}
