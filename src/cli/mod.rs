//! Command-line interface.

pub mod add;
pub mod list;
pub mod output;
pub mod password;
pub mod rm;
pub mod run;
pub mod show;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use crate::core::client::ClientFactory;
use crate::core::constants;
use crate::error::Result;

/// Bucketcred - credentials whose password lives in a bucket.
#[derive(Parser)]
#[command(
    name = "bucketcred",
    about = "Username/password credentials with the password fetched from a bucket",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Credential store file
    #[arg(
        short,
        long,
        global = true,
        env = constants::CONFIG_FILE_ENV,
        default_value = constants::CONFIG_FILE
    )]
    pub file: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Add a credential definition
    Add(AddArgs),

    /// Remove a credential definition
    Rm {
        /// Credential id
        id: String,
    },

    /// List credential definitions
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one credential definition (never the password)
    Show {
        /// Credential id
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch, decrypt and print a password
    Password {
        /// Credential id
        id: String,
    },

    /// Run a command with the username and password bound as env vars
    Run {
        /// Credential id
        id: String,
        /// Variable for the username (default BUCKET_USER_NAME)
        #[arg(long)]
        username_variable: Option<String>,
        /// Variable for the password (default BUCKET_PASSWORD)
        #[arg(long)]
        password_variable: Option<String>,
        /// Command and arguments to run
        #[arg(trailing_var_arg = true, required = true)]
        command: Vec<String>,
    },
}

/// Arguments for `add`.
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Credential id
    pub id: String,

    /// Bucket holding the password object
    #[arg(long)]
    pub bucket: String,

    /// Path of the password object within the bucket
    #[arg(long)]
    pub path: String,

    /// Username returned alongside the password
    #[arg(long)]
    pub username: String,

    /// Free-text description
    #[arg(long)]
    pub description: Option<String>,

    /// Region to pin clients to (default resolution when omitted)
    #[arg(long)]
    pub region: Option<String>,

    /// Decrypt the object through KMS
    #[arg(long)]
    pub kms: bool,

    /// KMS encryption context key
    #[arg(long, requires = "kms")]
    pub context_key: Option<String>,

    /// KMS encryption context value
    #[arg(long, requires = "kms")]
    pub context_value: Option<String>,

    /// Send KMS traffic through the proxy
    #[arg(long, requires = "kms")]
    pub kms_proxy: bool,

    /// Send bucket traffic through the proxy
    #[arg(long)]
    pub s3_proxy: bool,

    /// Proxy host
    #[arg(long)]
    pub proxy_host: Option<String>,

    /// Proxy port
    #[arg(long)]
    pub proxy_port: Option<String>,

    /// Replace an existing definition with the same id
    #[arg(long)]
    pub force: bool,
}

/// Execute a command against the store at `file`.
pub fn execute(command: Command, file: &Path, clients: Arc<dyn ClientFactory>) -> Result<()> {
    use Command::*;

    match command {
        Add(args) => add::execute(file, args),
        Rm { id } => rm::execute(file, &id),
        List { json } => list::execute(file, json),
        Show { id, json } => show::execute(file, &id, json),
        Password { id } => password::execute(file, &id, clients),
        Run {
            id,
            username_variable,
            password_variable,
            command,
        } => run::execute(
            file,
            &id,
            username_variable.as_deref(),
            password_variable.as_deref(),
            &command,
            clients,
        ),
    }
}
