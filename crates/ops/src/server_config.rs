//! Server settings and player lists read from inside the container

use crate::{OpsCtx, PlayersData, ServerProperties};
use modhost_errors::{Error, HostError};
use modhost_events::EventEmitter;
use serde::Deserialize;
use std::collections::BTreeMap;

const PROPERTIES_FILE: &str = "server.properties";

/// Settings shown by the short form of the server config
pub const SUMMARY_KEYS: [&str; 16] = [
    "difficulty",
    "gamemode",
    "hardcore",
    "simulation-distance",
    "server-port",
    "pvp",
    "rcon.password",
    "rcon.port",
    "enable-rcon",
    "level-seed",
    "max-world-size",
    "max-tick-time",
    "max-players",
    "motd",
    "white-list",
    "view-distance",
];

/// Parse `key=value` lines. Comments and lines without `=` are skipped;
/// only the first `=` separates key from value.
#[must_use]
pub fn parse_properties(text: &str) -> ServerProperties {
    text.lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}

/// Every setting in `server.properties`
///
/// # Errors
///
/// Returns `CommandFailed` if the file cannot be read in the container, or
/// `ContainerNotFound` if the container does not exist.
pub async fn server_config(ctx: &OpsCtx) -> Result<ServerProperties, Error> {
    let text = read_server_file(ctx, PROPERTIES_FILE).await?;
    Ok(parse_properties(&text))
}

/// The [`SUMMARY_KEYS`] settings; keys absent from the file map to `None`
///
/// # Errors
///
/// See [`server_config`].
pub async fn server_config_summary(
    ctx: &OpsCtx,
) -> Result<BTreeMap<String, Option<String>>, Error> {
    let mut all = server_config(ctx).await?;
    Ok(SUMMARY_KEYS
        .iter()
        .map(|key| ((*key).to_string(), all.remove(*key)))
        .collect())
}

#[derive(Deserialize)]
struct PlayerEntry {
    ip: Option<String>,
    name: Option<String>,
}

/// Banned IPs, banned players, whitelist and operators
///
/// A list that is missing or unreadable is reported empty.
///
/// # Errors
///
/// Returns `ContainerNotFound` if the container does not exist, or
/// `RuntimeUnavailable` if the runtime cannot be run.
pub async fn players_data(ctx: &OpsCtx) -> Result<PlayersData, Error> {
    Ok(PlayersData {
        banned_ips: player_list(ctx, "banned-ips.json", |e| e.ip).await?,
        banned_players: player_list(ctx, "banned-players.json", |e| e.name).await?,
        whitelist: player_list(ctx, "whitelist.json", |e| e.name).await?,
        ops: player_list(ctx, "ops.json", |e| e.name).await?,
    })
}

async fn player_list(
    ctx: &OpsCtx,
    file: &str,
    field: fn(PlayerEntry) -> Option<String>,
) -> Result<Vec<String>, Error> {
    let text = match read_server_file(ctx, file).await {
        Ok(text) => text,
        Err(Error::Host(HostError::CommandFailed { .. })) => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    match serde_json::from_str::<Vec<PlayerEntry>>(&text) {
        Ok(entries) => Ok(entries.into_iter().filter_map(field).collect()),
        Err(e) => {
            ctx.emit_warning_with_context(
                format!("{file} is not a valid player list"),
                e.to_string(),
            );
            Ok(Vec::new())
        }
    }
}

async fn read_server_file(ctx: &OpsCtx, file: &str) -> Result<String, Error> {
    let dir = ctx.config.host.server_dir.trim_end_matches('/');
    let argv = ["cat".to_string(), format!("{dir}/{file}")];
    let out = ctx.host.exec_command(&argv).await?;
    if out.success() {
        Ok(out.stdout)
    } else {
        Err(HostError::CommandFailed {
            exit_code: out.exit_code,
            output: out.combined(),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn properties_skip_comments_and_split_on_first_equals() {
        let text = "#Minecraft server properties\n\
                    # motd=ignored\n\
                    motd = A = B \n\
                    pvp=true\n\
                    not a setting\n\
                    level-seed=\n";
        let props = parse_properties(text);

        assert_eq!(props.len(), 3);
        assert_eq!(props["motd"], "A = B");
        assert_eq!(props["pvp"], "true");
        assert_eq!(props["level-seed"], "");
    }
}
