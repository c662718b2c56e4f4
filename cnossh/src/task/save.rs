//! Persist the running configuration.

use tokio::io::{AsyncRead, AsyncWrite};

use crate::channel::Prompt;
use crate::driver::Session;
use crate::error::Result;

pub const SAVED: &str = "Switch Running Config is Saved to Startup Config";

/// Run `write memory` and wait for the privileged prompt.
pub async fn execute<S>(session: &mut Session<S>) -> Result<&'static str>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    let timeout = session.timeouts().prompt;
    session
        .send_and_wait("write memory", &Prompt::literal("#"), timeout)
        .await?;
    Ok(SAVED)
}
