//! Configuration structs for the tagfig demo application.
//!
//! The root [`DemoConfig`] nests a [`ServerConfig`] and a [`DisplayConfig`]
//! to show how paths, environment names and flag names are derived.
//!
//! | Field | Env var | Flag |
//! |-------|---------|------|
//! | `name` | `TAGFIG_DEMO_NAME` | `--name` |
//! | `verbose` | `TAGFIG_DEMO_VERBOSE` | `--verbose` |
//! | `server.host` | `TAGFIG_DEMO_SERVER_HOST` | `--server-host` |
//! | `server.port` | `TAGFIG_DEMO_SERVER_PORT` | `--port` |
//! | `server.max_connections` | `TAGFIG_DEMO_SERVER_MAX_CONNECTIONS` | `--server-max-connections` |
//! | `server.token` | `DEMO_TOKEN` | none |
//! | `display.color` | `TAGFIG_DEMO_DISPLAY_COLOR` | `--color` |

use serde::{Deserialize, Serialize};
use tagfig::Record;

/// Root configuration for the demo application.
#[derive(Record, Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct DemoConfig {
    #[tag(default = "tagfig-demo", env, usage = "Application name shown in the banner")]
    pub name: String,

    #[tag(env, usage = "Enable verbose output")]
    pub verbose: bool,

    #[field(nested)]
    pub server: ServerConfig,

    #[field(nested)]
    pub display: DisplayConfig,
}

#[derive(Record, Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct ServerConfig {
    #[tag(default = "127.0.0.1", env, usage = "Hostname to bind to")]
    pub host: String,

    #[tag(default = "8080", env, flag = "port", usage = "Port to listen on")]
    pub port: u16,

    #[tag(default = "100", env, usage = "Maximum concurrent connections")]
    pub max_connections: u32,

    /// Never accepted on the command line, and must come from somewhere.
    #[tag(env = "DEMO_TOKEN", flag = "-", required = "true")]
    pub token: String,
}

#[derive(Record, Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct DisplayConfig {
    #[tag(default = "yellow", env, flag = "color", usage = "Banner color")]
    pub color: String,
}
