//! Target languages and packaging policies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A language client libraries are generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Go,
    Rust,
    Dart,
    Java,
    #[serde(alias = "nodejs")]
    Node,
    #[serde(alias = "csharp")]
    Dotnet,
}

impl Language {
    /// The lowercase name used in configuration files and override tables.
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Dart => "dart",
            Language::Java => "java",
            Language::Node => "node",
            Language::Dotnet => "dotnet",
        }
    }

    /// The packaging policy used when the configuration does not set one.
    pub fn default_packaging(self) -> Packaging {
        match self {
            Language::Rust | Language::Dart => Packaging::Version,
            _ => Packaging::Service,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "python" => Ok(Language::Python),
            "go" => Ok(Language::Go),
            "rust" => Ok(Language::Rust),
            "dart" => Ok(Language::Dart),
            "java" => Ok(Language::Java),
            "node" | "nodejs" => Ok(Language::Node),
            "dotnet" | "csharp" => Ok(Language::Dotnet),
            other => Err(Error::ConfigParse {
                message: format!("Unknown language: {:?}", other),
                hint: Some("Use one of python, go, rust, dart, java, node, dotnet".to_string()),
            }),
        }
    }
}

/// How versioned APIs are grouped into libraries (`one_library_per`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Packaging {
    /// All versions of a service share one library.
    Service,
    /// Each API version is its own library.
    Version,
}

impl Packaging {
    pub fn as_str(self) -> &'static str {
        match self {
            Packaging::Service => "service",
            Packaging::Version => "version",
        }
    }
}

impl fmt::Display for Packaging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Packaging {
    type Err = Error;

    /// Accepts the current names and the older `api`/`channel` spellings.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "service" | "api" => Ok(Packaging::Service),
            "version" | "channel" => Ok(Packaging::Version),
            other => Err(Error::Packaging {
                value: other.to_string(),
            }),
        }
    }
}
