use crate::utils::error::{LiveNftError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_url, Validate,
};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "live-nft")]
#[command(about = "Fetches live data, renders it onto a token image and updates the NFT")]
pub struct Cli {
    #[arg(
        long,
        help = "Create a new collection, mint a placeholder token and print out the ids"
    )]
    pub create_collection: bool,

    #[arg(
        long,
        help = "Update the configured token once. Requires COLLECTION_ID and TOKEN_ID"
    )]
    pub update: bool,

    #[arg(
        long,
        help = "Update the configured token on a fixed interval. Requires COLLECTION_ID and TOKEN_ID"
    )]
    pub cron: bool,

    #[arg(
        long,
        help = "Test the image generator: fetch the data and write the image, nothing else"
    )]
    pub test_image: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// How the data API expects its credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScheme {
    Bearer,
    Query { param: String },
}

impl AuthScheme {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.eq_ignore_ascii_case("bearer") {
            return Ok(AuthScheme::Bearer);
        }
        if let Some(param) = raw.strip_prefix("query:") {
            if !param.trim().is_empty() {
                return Ok(AuthScheme::Query {
                    param: param.to_string(),
                });
            }
        }
        Err(LiveNftError::InvalidConfigValueError {
            field: "API_AUTH".to_string(),
            value: raw.to_string(),
            reason: "Expected 'bearer' or 'query:<param-name>'".to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub url: String,
    pub key: String,
    pub auth: AuthScheme,
}

#[derive(Debug, Clone)]
pub struct ChainSettings {
    pub mnemonic: String,
    pub sdk_rest_url: String,
    /// Separate base URL for IPFS uploads, falls back to `sdk_rest_url`.
    pub ipfs_rest_url: String,
}

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub assets_dir: String,
    pub output_dir: String,
}

#[derive(Debug, Clone)]
pub struct TestImageSettings {
    pub api: ApiSettings,
    pub render: RenderSettings,
}

#[derive(Debug, Clone)]
pub struct UpdateSettings {
    pub api: ApiSettings,
    pub chain: ChainSettings,
    pub render: RenderSettings,
    pub collection_id: u32,
    pub token_id: u32,
}

#[derive(Debug, Clone)]
pub struct CreateSettings {
    pub chain: ChainSettings,
    pub owner_address: String,
}

#[derive(Debug, Clone)]
pub struct CronSettings {
    pub update: UpdateSettings,
    pub interval_secs: u64,
}

fn required_env(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| LiveNftError::MissingConfigError {
            field: name.to_string(),
        })
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn int_env<T: std::str::FromStr>(name: &str) -> Result<T> {
    let raw = required_env(name)?;
    raw.trim()
        .parse::<T>()
        .map_err(|_| LiveNftError::InvalidConfigValueError {
            field: name.to_string(),
            value: raw,
            reason: "Expected a valid integer".to_string(),
        })
}

impl ApiSettings {
    pub fn from_env() -> Result<Self> {
        let auth = AuthScheme::parse(&env_or("API_AUTH", "bearer"))?;
        Ok(Self {
            url: required_env("API_URL")?,
            key: required_env("API_KEY")?,
            auth,
        })
    }
}

impl ChainSettings {
    pub fn from_env() -> Result<Self> {
        let sdk_rest_url = required_env("SDK_REST_URL")?;
        let ipfs_rest_url = env_or("SDK_REST_URL_FOR_IPFS", &sdk_rest_url);
        Ok(Self {
            mnemonic: required_env("COLLECTION_ADMIN_MNEMONIC")?,
            sdk_rest_url,
            ipfs_rest_url,
        })
    }
}

impl RenderSettings {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            assets_dir: env_or("ASSETS_DIR", "files"),
            output_dir: required_env("OUTPUT_IMAGES_DIR")?,
        })
    }
}

impl TestImageSettings {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api: ApiSettings::from_env()?,
            render: RenderSettings::from_env()?,
        })
    }
}

impl UpdateSettings {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api: ApiSettings::from_env()?,
            chain: ChainSettings::from_env()?,
            render: RenderSettings::from_env()?,
            collection_id: int_env::<u32>("COLLECTION_ID")?,
            token_id: int_env::<u32>("TOKEN_ID")?,
        })
    }
}

impl CreateSettings {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            chain: ChainSettings::from_env()?,
            owner_address: required_env("OWNER_ADDRESS")?,
        })
    }
}

impl CronSettings {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            update: UpdateSettings::from_env()?,
            interval_secs: int_env("CRON_INTERVAL_SECS")?,
        })
    }
}

impl Validate for ApiSettings {
    fn validate(&self) -> Result<()> {
        validate_url("API_URL", &self.url)?;
        validate_non_empty_string("API_KEY", &self.key)?;
        Ok(())
    }
}

impl Validate for ChainSettings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("COLLECTION_ADMIN_MNEMONIC", &self.mnemonic)?;
        validate_url("SDK_REST_URL", &self.sdk_rest_url)?;
        validate_url("SDK_REST_URL_FOR_IPFS", &self.ipfs_rest_url)?;
        Ok(())
    }
}

impl Validate for RenderSettings {
    fn validate(&self) -> Result<()> {
        validate_path("ASSETS_DIR", &self.assets_dir)?;
        validate_path("OUTPUT_IMAGES_DIR", &self.output_dir)?;
        Ok(())
    }
}

impl Validate for TestImageSettings {
    fn validate(&self) -> Result<()> {
        self.api.validate()?;
        self.render.validate()?;
        Ok(())
    }
}

impl Validate for UpdateSettings {
    fn validate(&self) -> Result<()> {
        self.api.validate()?;
        self.chain.validate()?;
        self.render.validate()?;
        Ok(())
    }
}

impl Validate for CreateSettings {
    fn validate(&self) -> Result<()> {
        self.chain.validate()?;
        validate_non_empty_string("OWNER_ADDRESS", &self.owner_address)?;
        Ok(())
    }
}

impl Validate for CronSettings {
    fn validate(&self) -> Result<()> {
        self.update.validate()?;
        validate_positive_number("CRON_INTERVAL_SECS", self.interval_secs, 1)?;
        Ok(())
    }
}
