//! Switch operations and the run loop around them.
//!
//! Every task follows the same shape: connect, bring the shell to the
//! privileged prompt, run the task's exchanges, append the whole transcript
//! to the output file, then judge the transcript. Device error phrases and
//! timed-out waits both fail the task.

pub mod backup;
pub mod command;
mod outcome;
pub mod params;
pub mod save;

use std::path::Path;

use log::{error, info, warn};
use secrecy::SecretString;
use tokio::io::{AsyncRead, AsyncWrite};

pub use backup::{BackupParams, ConfigType, Protocol};
pub use command::CommandParams;
pub use outcome::TaskOutcome;
pub use params::{ConnectionParams, ModuleArgs, TaskKind};

use crate::driver::{DriverBuilder, Session};
use crate::error::Result;

/// Run a request end to end. Never fails: errors become a failed outcome.
pub async fn run(args: ModuleArgs) -> TaskOutcome {
    let task = args.task.name();
    let host = args.connection.host.clone();

    match connect_and_run(args).await {
        Ok(outcome) => {
            info!("{} on {}: {}", task, host, outcome.msg);
            outcome
        }
        Err(e) => {
            error!("{} on {} failed: {}", task, host, e);
            TaskOutcome::failed(e.to_string())
        }
    }
}

async fn connect_and_run(args: ModuleArgs) -> Result<TaskOutcome> {
    let ModuleArgs {
        mut connection,
        task,
    } = args;
    task.validate()?;

    let auth = connection.take_auth();
    let ConnectionParams {
        host,
        port,
        username,
        enable_password,
        device_type,
        output_file,
        timeouts,
        host_key_verification,
        known_hosts,
        ..
    } = connection;

    let mut builder = DriverBuilder::new(host)
        .port(port)
        .username(username)
        .device_type(device_type)
        .timeouts(timeouts)
        .host_key_verification(host_key_verification);
    if let Some(auth) = auth {
        builder = builder.auth(auth);
    }
    if let Some(path) = known_hosts {
        builder = builder.known_hosts_path(path);
    }

    let mut session = builder.build()?.open().await?;
    let outcome = run_session(&mut session, &task, enable_password.as_ref(), &output_file).await;

    if let Err(e) = session.close().await {
        warn!("Error closing session: {}", e);
    }
    outcome
}

/// Run `task` on an open shell and judge the result.
///
/// The transcript is appended to `output_file` whether or not the task's
/// exchanges succeeded. When an exchange fails, a device error phrase in the
/// transcript is reported in preference to the local error.
pub async fn run_session<S>(
    session: &mut Session<S>,
    task: &TaskKind,
    enable_password: Option<&SecretString>,
    output_file: &Path,
) -> Result<TaskOutcome>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    let result = execute(session, task, enable_password).await;
    session.transcript().append_to_file(output_file).await?;
    let scanner = session.platform().scanner();

    let success = match result {
        Ok(success) => success,
        Err(e) => match scanner.scan(session.transcript().as_str()) {
            Some(device_error) => {
                warn!("{} (device reported: {})", e, device_error.marker);
                return Ok(TaskOutcome::failed(device_error.message()));
            }
            None => return Err(e),
        },
    };

    Ok(TaskOutcome::judge(
        session.transcript(),
        session.stalls(),
        &scanner,
        success,
    ))
}

async fn execute<S>(
    session: &mut Session<S>,
    task: &TaskKind,
    enable_password: Option<&SecretString>,
) -> Result<&'static str>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    session.initialize(enable_password).await?;

    match task {
        TaskKind::Save => save::execute(session).await,
        TaskKind::Backup(params) => backup::execute(session, params).await,
        TaskKind::Command(params) => command::execute(session, params).await,
    }
}
