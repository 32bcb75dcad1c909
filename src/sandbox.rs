//! Restricted projection of the process environment for the user-script
//! sandbox. Selection is allowlist-only: a variable not selected here does
//! not exist as far as user scripts are concerned.

use std::env;
use std::fmt::Write as _;

/// Prefix marking an environment variable as deliberately exposed to
/// user scripts.
pub const EXPOSED_PREFIX: &str = "EXPOSED_";

/// Environment variables visible to user scripts regardless of prefix:
/// locale and proxy plumbing only.
pub const ENV_ALLOWLIST: &[&str] = &[
    "TZ",
    "LANG",
    "LC_ALL",
    "LC_CTYPE",
    "HTTP_PROXY",
    "HTTPS_PROXY",
    "NO_PROXY",
];

/// Operational attributes of the running server, the `process`-level half
/// of the projection.
#[derive(Clone, Debug)]
pub struct ServerInfo {
    pub host: String,
    pub port: u16,
    pub external_url: String,
    pub proxy_enabled: bool,
}

impl ServerInfo {
    /// Read the server attributes from the process environment, with the
    /// platform defaults.
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "localhost".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);
        let external_url =
            env::var("EXTERNAL_URL").unwrap_or_else(|_| format!("http://{host}:{port}"));
        let proxy_enabled = env::var("PROXY").map(|v| !v.is_empty()).unwrap_or(false);
        Self {
            host,
            port,
            external_url,
            proxy_enabled,
        }
    }
}

/// Declared type of a projected value in the sandbox's static checker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclaredType {
    String,
    Number,
    Boolean,
}

impl DeclaredType {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclaredType::String => "string",
            DeclaredType::Number => "number",
            DeclaredType::Boolean => "boolean",
        }
    }
}

/// One projected name/value pair.
#[derive(Clone, Debug)]
pub struct SnapshotEntry {
    pub name: String,
    pub value: String,
    pub declared_type: DeclaredType,
}

/// Read-only view of the process attributes and environment variables the
/// sandbox may observe. Anything not selected here does not exist as far as
/// generated declarations and the sandbox runtime are concerned.
#[derive(Clone, Debug)]
pub struct RestrictedProcessSnapshot {
    root: Vec<SnapshotEntry>,
    env: Vec<SnapshotEntry>,
}

impl RestrictedProcessSnapshot {
    /// Project from explicit environment pairs. Entries are sorted by name
    /// so rendered declarations are stable across runs.
    pub fn project<I>(server: &ServerInfo, env_pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut env: Vec<SnapshotEntry> = env_pairs
            .into_iter()
            .filter(|(name, _)| {
                name.starts_with(EXPOSED_PREFIX) || ENV_ALLOWLIST.contains(&name.as_str())
            })
            .map(|(name, value)| SnapshotEntry {
                name,
                value,
                declared_type: DeclaredType::String,
            })
            .collect();
        env.sort_by(|a, b| a.name.cmp(&b.name));
        env.dedup_by(|a, b| a.name == b.name);

        let root = vec![
            SnapshotEntry {
                name: "HOST".to_string(),
                value: server.host.clone(),
                declared_type: DeclaredType::String,
            },
            SnapshotEntry {
                name: "PORT".to_string(),
                value: server.port.to_string(),
                declared_type: DeclaredType::Number,
            },
            SnapshotEntry {
                name: "EXTERNAL_URL".to_string(),
                value: server.external_url.clone(),
                declared_type: DeclaredType::String,
            },
            SnapshotEntry {
                name: "PROXY".to_string(),
                value: server.proxy_enabled.to_string(),
                declared_type: DeclaredType::Boolean,
            },
        ];

        Self { root, env }
    }

    /// Project from the live process environment.
    pub fn project_process(server: &ServerInfo) -> Self {
        Self::project(server, env::vars())
    }

    pub fn root_entries(&self) -> &[SnapshotEntry] {
        &self.root
    }

    pub fn env_entries(&self) -> &[SnapshotEntry] {
        &self.env
    }

    /// Render the declaration block consumed by the sandbox's type checker
    /// when it checks user scripts referencing `process` and `process.env`.
    pub fn render_declarations(&self) -> String {
        let mut out = String::new();
        out.push_str("declare var process: RestrictedProcess;\n");
        out.push_str("interface RestrictedProcess {\n");
        for entry in &self.root {
            let _ = writeln!(out, "  /** Current value: {} */", entry.value);
            let _ = writeln!(out, "  {}: {}", entry.name, entry.declared_type.as_str());
        }
        out.push_str("\n  env: {\n");
        for entry in &self.env {
            let _ = writeln!(out, "    /** Current value: {} */", entry.value);
            let _ = writeln!(out, "    {}: {}", entry.name, entry.declared_type.as_str());
        }
        out.push_str("  }\n}\n");
        out
    }
}
