//! Constants used throughout bucketcred.
//!
//! Centralizes magic strings and configuration values.

/// Credential store file name (.bucketcred.toml).
pub const CONFIG_FILE: &str = ".bucketcred.toml";

/// Environment variable overriding the credential store path.
pub const CONFIG_FILE_ENV: &str = "BUCKETCRED_FILE";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "BUCKETCRED_LOG";

/// Highest credential record schema this build understands.
pub const RECORD_SCHEMA: u32 = 2;

/// Default environment variable for the bound username.
pub const DEFAULT_USERNAME_VARIABLE: &str = "BUCKET_USER_NAME";

/// Default environment variable for the bound password.
pub const DEFAULT_PASSWORD_VARIABLE: &str = "BUCKET_PASSWORD";

/// Size of each read from the object body.
pub const READ_CHUNK_SIZE: usize = 1024;

/// Region names a client may be pinned to.
pub const KNOWN_REGIONS: &[&str] = &[
    "af-south-1",
    "ap-east-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-south-1",
    "ap-south-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-southeast-3",
    "ap-southeast-4",
    "ca-central-1",
    "ca-west-1",
    "cn-north-1",
    "cn-northwest-1",
    "eu-central-1",
    "eu-central-2",
    "eu-north-1",
    "eu-south-1",
    "eu-south-2",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "il-central-1",
    "me-central-1",
    "me-south-1",
    "sa-east-1",
    "us-east-1",
    "us-east-2",
    "us-gov-east-1",
    "us-gov-west-1",
    "us-west-1",
    "us-west-2",
];
