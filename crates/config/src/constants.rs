//! Default locations matching the layout of the managed server volume

pub const SERVER_ROOT: &str = "/minecraft";

pub const DATA_DIR: &str = "/minecraft/config";
pub const ARTIFACTS_DIR: &str = "/minecraft/mods";
pub const BACKUPS_DIR: &str = "/minecraft/mods_backup";
pub const LOGS_DIR: &str = "/minecraft/logs";

pub const REGISTRY_BASE_URL: &str = "https://api.modrinth.com/v2";
pub const CONTAINER_NAME: &str = "minecraft-server";
