//! Scripted CNOS switch on the far end of an in-memory pipe.

#![allow(dead_code)]

use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream, duplex};
use tokio::task::JoinHandle;

use cnossh::Session;
use cnossh::Timeouts;
use cnossh::platform::vendors::cnos;

pub const HOSTNAME: &str = "G8272";

#[derive(Debug, Clone, Default)]
pub struct SwitchConfig {
    /// Password `enable` asks for; `None` enters privileged mode directly.
    pub enable_password: Option<String>,

    /// Password the copy server accepts.
    pub server_password: String,

    /// Ask to trust the server's host key before sftp/scp logins.
    pub ask_host_key: bool,

    /// `copy` prints nothing at all, as if the server never answered.
    pub silent_copy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Exec,
    Privileged,
    Config,
    ConfigIf,
}

impl Mode {
    fn prompt(self) -> String {
        match self {
            Mode::Exec => format!("{}>", HOSTNAME),
            Mode::Privileged => format!("{}#", HOSTNAME),
            Mode::Config => format!("{}(config)#", HOSTNAME),
            Mode::ConfigIf => format!("{}(config-if)#", HOSTNAME),
        }
    }
}

enum Pending {
    None,
    EnablePassword,
    HostKey(String),
    ServerPassword,
}

struct FakeSwitch {
    config: SwitchConfig,
    mode: Mode,
    pending: Pending,
}

impl FakeSwitch {
    fn respond(&mut self, line: &str) -> String {
        match std::mem::replace(&mut self.pending, Pending::None) {
            Pending::EnablePassword => {
                if Some(line) == self.config.enable_password.as_deref() {
                    self.mode = Mode::Privileged;
                    return format!("\r\n{}", self.mode.prompt());
                }
                return format!("\r\n% Incorrect password\r\n{}", self.mode.prompt());
            }
            Pending::HostKey(user_host) => {
                if line == "yes" {
                    self.pending = Pending::ServerPassword;
                    return format!(
                        "yes\r\nWarning: Permanently added the host key.\r\n{}'s password: ",
                        user_host
                    );
                }
                return format!("{}\r\nHost key verification failed.\r\n{}", line, self.mode.prompt());
            }
            Pending::ServerPassword => {
                if line == self.config.server_password {
                    return format!("\r\nCopy complete.\r\n{}", self.mode.prompt());
                }
                return format!(
                    "\r\nPermission denied, please try again.\r\nError: copy failed\r\n{}",
                    self.mode.prompt()
                );
            }
            Pending::None => {}
        }

        let echo = format!("{}\r\n", line);
        let body = self.run(line);
        match body {
            Some(body) => format!("{}{}{}", echo, body, self.prompt_unless_pending()),
            None => echo,
        }
    }

    fn prompt_unless_pending(&self) -> String {
        match self.pending {
            Pending::None => self.mode.prompt(),
            _ => String::new(),
        }
    }

    /// Output of `line` before the next prompt; `None` means the switch hangs.
    fn run(&mut self, line: &str) -> Option<String> {
        let mut words = line.split_whitespace();
        let first = words.next().unwrap_or("");

        let out = match (first, self.mode) {
            ("", _) => String::new(),
            ("hang", _) => return None,
            ("enable", Mode::Exec) => match self.config.enable_password {
                Some(_) => {
                    self.pending = Pending::EnablePassword;
                    "Password:".to_string()
                }
                None => {
                    self.mode = Mode::Privileged;
                    String::new()
                }
            },
            ("configure", Mode::Privileged) => {
                self.mode = Mode::Config;
                "Enter configuration commands, one per line.  End with CNTL/Z.\r\n".to_string()
            }
            ("end", _) => {
                self.mode = Mode::Privileged;
                String::new()
            }
            ("interface", Mode::Config | Mode::ConfigIf) => {
                self.mode = Mode::ConfigIf;
                String::new()
            }
            ("terminal-length" | "terminal" | "write", Mode::Privileged) => String::new(),
            ("copy", Mode::Privileged) if self.config.silent_copy => return None,
            ("copy", Mode::Privileged) => self.copy(line),
            ("vlan" | "description" | "name" | "display", _) => String::new(),
            _ => "% Invalid input detected at '^' marker.\r\n".to_string(),
        };
        Some(out)
    }

    fn copy(&mut self, line: &str) -> String {
        let url = line.split_whitespace().nth(3).unwrap_or("");
        let (scheme, rest) = url.split_once("://").unwrap_or(("", ""));
        let authority = rest.split('/').next().unwrap_or("");

        match scheme {
            "tftp" => "Copy complete.\r\n".to_string(),
            "ftp" => {
                self.pending = Pending::ServerPassword;
                "Password:".to_string()
            }
            "sftp" | "scp" if self.config.ask_host_key => {
                self.pending = Pending::HostKey(authority.to_string());
                "The authenticity of host can't be established.\r\n\
                 Are you sure you want to continue connecting (yes/no)? "
                    .to_string()
            }
            "sftp" | "scp" => {
                self.pending = Pending::ServerPassword;
                format!("{}'s password: ", authority)
            }
            _ => "% Invalid input detected at '^' marker.\r\n".to_string(),
        }
    }
}

async fn read_line(stream: &mut DuplexStream) -> Option<String> {
    let mut line = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        stream.read_exact(&mut byte).await.ok()?;
        match byte[0] {
            b'\n' => return Some(String::from_utf8_lossy(&line).trim_end_matches('\r').to_string()),
            b => line.push(b),
        }
    }
}

/// Start a switch; the handle resolves to every line it received once the
/// client side closes.
pub fn spawn_switch(config: SwitchConfig) -> (DuplexStream, JoinHandle<Vec<String>>) {
    let (client, mut device) = duplex(16 * 1024);

    let handle = tokio::spawn(async move {
        let mut switch = FakeSwitch {
            config,
            mode: Mode::Exec,
            pending: Pending::None,
        };
        let mut received = Vec::new();

        let banner = format!("\r\nLenovo Networking Operating System\r\n\r\n{}", Mode::Exec.prompt());
        if device.write_all(banner.as_bytes()).await.is_err() {
            return received;
        }

        while let Some(line) = read_line(&mut device).await {
            let reply = switch.respond(&line);
            received.push(line);
            if device.write_all(reply.as_bytes()).await.is_err() {
                break;
            }
        }
        received
    });

    (client, handle)
}

pub fn session(stream: DuplexStream) -> Session<DuplexStream> {
    Session::new(stream, cnos::platform(), Timeouts::default())
}
