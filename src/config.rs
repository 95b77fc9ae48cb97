//! Runtime configuration.
//!
//! Flags fall back to environment variables, which may come from a `.env`
//! file loaded by `main` before parsing.

use crate::azure::{AzCliDirectory, StaticDirectory, VnetDirectory};
use crate::error::Result;
use crate::output::ProposalResponse;
use crate::processing::{propose_subnet, ProposalRequest};
use chrono_tz::Tz;
use clap::Parser;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config as LogConfig, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;
use std::path::{Path, PathBuf};

/// Default log4rs configuration file.
pub const LOG_CONFIG_FILE: &str = "log4rs.yml";

/// Timezone used to date inventory cache files.
pub const CACHE_TIMEZONE: Tz = chrono_tz::Pacific::Auckland;

/// Largest stdout accepted from an `az` call.
pub const MAX_CLI_OUTPUT_BYTES: usize = 5_000_000;

/// Propose the next free subnet CIDR in an Azure virtual network.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "azure-next-cidr", version)]
pub struct Config {
    /// Subscription that owns the virtual network
    #[arg(long, env = "ARM_SUBSCRIPTION_ID")]
    pub subscription_id: Option<String>,

    /// Resource group of the virtual network
    #[arg(long, env = "AZ_RESOURCE_GROUP")]
    pub resource_group: Option<String>,

    /// Name of the virtual network
    #[arg(long, env = "AZ_VNET_NAME")]
    pub vnet_name: Option<String>,

    /// Requested prefix length, e.g. 24 for a /24
    #[arg(long, env = "AZ_SUBNET_CIDR", allow_hyphen_values = true)]
    pub cidr: Option<String>,

    /// Only allocate from this address space prefix, e.g. 10.1.0.0/16
    #[arg(long, env = "AZ_ADDRESS_SPACE")]
    pub address_space: Option<String>,

    /// Read virtual networks from this `az network vnet list` JSON file instead of calling az
    #[arg(long, conflicts_with = "cache")]
    pub inventory: Option<PathBuf>,

    /// Reuse today's cached `az network vnet list` output, creating it when missing
    #[arg(long)]
    pub cache: bool,

    /// Directory for cache files
    #[arg(long, default_value = ".")]
    pub cache_dir: PathBuf,

    /// log4rs YAML configuration
    #[arg(long, default_value = LOG_CONFIG_FILE)]
    pub log_config: PathBuf,
}

impl Config {
    /// The request as the presentation layer sees it; missing values stay empty.
    pub fn request(&self) -> ProposalRequest {
        ProposalRequest {
            subscription_id: self.subscription_id.clone().unwrap_or_default(),
            resource_group: self.resource_group.clone().unwrap_or_default(),
            vnet_name: self.vnet_name.clone().unwrap_or_default(),
            cidr: self.cidr.clone().unwrap_or_default(),
            address_space: self.address_space.clone(),
        }
    }

    /// Validate the request, then look it up. A bad request never touches
    /// the inventory.
    pub fn propose(&self) -> ProposalResponse {
        let request = self.request();
        match request.validate().and_then(|()| self.directory()) {
            Ok(directory) => propose_subnet(directory.as_ref(), &request),
            Err(err) => {
                if err.status_code() >= 500 {
                    log::error!("Error setting up vnet lookup: {err}");
                } else {
                    log::warn!("Request rejected: {err}");
                }
                ProposalResponse::from_error(&err)
            }
        }
    }

    /// Pick the directory lookup the flags ask for.
    pub fn directory(&self) -> Result<Box<dyn VnetDirectory + Send>> {
        if let Some(path) = &self.inventory {
            return Ok(Box::new(StaticDirectory::from_file(path)?));
        }
        let directory = AzCliDirectory::new(self.subscription_id.clone().unwrap_or_default());
        if self.cache {
            Ok(Box::new(directory.with_cache(self.cache_dir.clone())))
        } else {
            Ok(Box::new(directory))
        }
    }
}

/// Start log4rs from `path`, or log `info` and above to stderr if it is missing.
///
/// Stdout is reserved for the JSON response, so nothing logs there.
pub fn init_logging(path: &Path) -> std::result::Result<(), Box<dyn Error>> {
    if path.exists() {
        log4rs::init_file(path, Default::default())?;
        return Ok(());
    }

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {h({l:<5})} {t} - {m}{n}",
        )))
        .build();
    let config = LogConfig::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Info))?;
    log4rs::init_config(config)?;
    log::warn!("{} not found, logging to stderr", path.display());
    Ok(())
}
