//! Server configuration

use clap::Parser;
use seill_acl::{Identity, LookupPolicy};
use std::path::PathBuf;

/// Member id of the identity used in local mode
pub const LOCAL_MEMBER_ID: &str = "000000000000000_LOCAL_TEST";

/// Role of the identity used in local mode
pub const LOCAL_ROLE: &str = "system/admin";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "api-server",
    version,
    about = "Role-based API dispatcher",
    long_about = None
)]
pub struct ServerConfig {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "API_SERVER_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short = 'p', long, default_value = "8080", env = "API_SERVER_PORT")]
    pub port: u16,

    /// Deployment stage reported on each request
    #[arg(long, default_value = "dev", env = "API_STAGE")]
    pub stage: String,

    /// Treat every caller as a local administrator
    #[arg(long, env = "API_LOCAL")]
    pub local: bool,

    /// Let authorization continue as guest when the identity store fails
    #[arg(long, env = "API_LENIENT_LOOKUP")]
    pub lenient_lookup: bool,

    /// Stage variable merged into every request payload, as `KEY=VALUE`
    #[arg(
        long = "stage-var",
        value_name = "KEY=VALUE",
        value_parser = parse_stage_variable,
        value_delimiter = ',',
        env = "API_STAGE_VARIABLES"
    )]
    pub stage_variables: Vec<(String, String)>,

    /// JSON manifest with ACLs, menu, error codes and users
    #[arg(long, env = "API_MANIFEST")]
    pub manifest: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            stage: "dev".to_string(),
            local: false,
            lenient_lookup: false,
            stage_variables: Vec::new(),
            manifest: None,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn lookup_policy(&self) -> LookupPolicy {
        if self.lenient_lookup {
            LookupPolicy::Lenient
        } else {
            LookupPolicy::Strict
        }
    }

    /// Identity substituted for every request in local mode
    pub fn local_identity() -> Identity {
        Identity::fixed([LOCAL_ROLE], "local user").with_member_id(LOCAL_MEMBER_ID)
    }
}

fn parse_stage_variable(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}
