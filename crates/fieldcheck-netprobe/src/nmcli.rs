//! NetworkManager profile listing and Wi-Fi connection via `nmcli`.
//!
//! Listing uses terse mode (`-t`), which prints one profile per line with
//! fields separated by `:`. Literal colons inside a field are escaped as `\:`.

use crate::error::ProbeError;
use crate::runner::{CommandOutput, CommandRunner};

/// Connection type NetworkManager reports for Wi-Fi profiles.
pub const WIRELESS_TYPE: &str = "802-11-wireless";

/// One saved NetworkManager connection profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownNetwork {
    pub name: String,
    pub uuid: String,
    pub active: bool,
    pub kind: String,
}

impl KnownNetwork {
    pub fn is_wireless(&self) -> bool {
        self.kind == WIRELESS_TYPE
    }
}

/// Result of [`connect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// A matching profile was already up; nothing was run.
    AlreadyActive { uuid: String },
    /// An existing inactive profile was brought up by UUID.
    Activated { uuid: String },
    /// No matching profile existed; a new one was created and activated.
    Created,
}

/// List the known connection profiles.
///
/// Returns the raw command output; see [`parse_known`] to decode it.
pub fn get_known(runner: &dyn CommandRunner) -> Result<CommandOutput, ProbeError> {
    runner.run(
        "nmcli",
        &["-t", "--fields", "NAME,UUID,ACTIVE,TYPE", "c"],
    )
}

/// Decode terse `NAME:UUID:ACTIVE:TYPE` records. Lines with fewer than four
/// fields are skipped.
pub fn parse_known(listing: &str) -> Vec<KnownNetwork> {
    listing
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let mut fields = split_terse(line).into_iter();
            let name = fields.next()?;
            let uuid = fields.next()?;
            let active = fields.next()?;
            let kind = fields.next()?;
            Some(KnownNetwork {
                name,
                uuid,
                active: active == "yes",
                kind,
            })
        })
        .collect()
}

/// Split one terse line on unescaped `:`, undoing `\:` and `\\` escapes.
fn split_terse(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ':' => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Connect to the Wi-Fi network `ssid`.
///
/// An existing wireless profile named `ssid` is reused: it is brought up by
/// UUID unless it is already active. Otherwise a new profile is created with
/// `password` and activated in one `nmcli dev wifi con` call.
pub fn connect(
    runner: &dyn CommandRunner,
    ssid: &str,
    password: &str,
) -> Result<ConnectOutcome, ProbeError> {
    let listing = get_known(runner)?.into_result("nmcli")?;
    let known = parse_known(&listing.stdout);

    if let Some(profile) = known
        .iter()
        .find(|n| n.name == ssid && n.is_wireless())
    {
        if profile.active {
            tracing::info!(%ssid, uuid = %profile.uuid, "profile already active");
            return Ok(ConnectOutcome::AlreadyActive {
                uuid: profile.uuid.clone(),
            });
        }
        tracing::info!(%ssid, uuid = %profile.uuid, "activating known profile");
        runner
            .run("nmcli", &["con", "up", "uuid", &profile.uuid])?
            .into_result("nmcli")?;
        return Ok(ConnectOutcome::Activated {
            uuid: profile.uuid.clone(),
        });
    }

    tracing::info!(%ssid, "no known profile, creating one");
    runner
        .run("nmcli", &["dev", "wifi", "con", ssid, "password", password])?
        .into_result("nmcli")?;
    Ok(ConnectOutcome::Created)
}
