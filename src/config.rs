//! Connection resolution.
//!
//! Builds an authenticated DynamoDB client from region, credential, and endpoint settings.
//! Settings left unset fall back to the SDK's default provider chains.

use crate::error::{Error, Result};

use aws_config::{
    BehaviorVersion,
    environment::region::EnvironmentVariableRegionProvider,
    imds::region::ImdsRegionProvider,
    meta::region::RegionProviderChain,
    profile::{ProfileFileCredentialsProvider, region::ProfileFileRegionProvider},
};
use aws_sdk_dynamodb::{
    Client,
    config::{Credentials, ProvideCredentials, Region},
};
use serde::Deserialize;

const MISSING_REGION: &str = "Region must be specified as a parameter, in EC2_REGION or AWS_REGION environment variables or in boto configuration file";

/// Region, credential, and endpoint settings.
///
/// Field aliases follow the names the orchestration engine's AWS modules accept.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct ConnectionArgs {
    /// AWS region.
    #[serde(default, alias = "aws_region", alias = "ec2_region")]
    pub region: Option<String>,
    /// Custom endpoint URL (for local DynamoDB).
    #[serde(
        default,
        alias = "ec2_url",
        alias = "aws_endpoint_url",
        alias = "endpoint"
    )]
    pub endpoint_url: Option<String>,
    /// Named profile from the shared AWS configuration files.
    #[serde(default, alias = "aws_profile")]
    pub profile: Option<String>,
    /// AWS access key ID.
    #[serde(default, alias = "aws_access_key", alias = "ec2_access_key")]
    pub access_key: Option<String>,
    /// AWS secret access key.
    #[serde(default, alias = "aws_secret_key", alias = "ec2_secret_key")]
    pub secret_key: Option<String>,
    /// AWS session token for temporary credentials.
    #[serde(
        default,
        alias = "security_token",
        alias = "aws_security_token",
        alias = "aws_session_token"
    )]
    pub session_token: Option<String>,
}

impl ConnectionArgs {
    /// Fill unset fields from `other`.
    pub fn or(self, other: Self) -> Self {
        Self {
            region: self.region.or(other.region),
            endpoint_url: self.endpoint_url.or(other.endpoint_url),
            profile: self.profile.or(other.profile),
            access_key: self.access_key.or(other.access_key),
            secret_key: self.secret_key.or(other.secret_key),
            session_token: self.session_token.or(other.session_token),
        }
    }

    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        match (&self.endpoint_url, &self.region) {
            (Some(url), _) => format!("DynamoDB at {url}"),
            (None, Some(region)) => format!("AWS DynamoDB (region: {region})"),
            (None, None) => "AWS DynamoDB (default region)".to_string(),
        }
    }
}

/// Region sources in priority order: the parameter, `AWS_REGION`, the shared configuration
/// files (under `profile` when given), `EC2_REGION`, then instance metadata.
fn region_provider(args: &ConnectionArgs) -> RegionProviderChain {
    RegionProviderChain::first_try(args.region.clone().map(Region::new))
        .or_else(EnvironmentVariableRegionProvider::new())
        .or_else(profile_region_provider(args.profile.as_deref()))
        .or_else(std::env::var("EC2_REGION").ok().map(Region::new))
        .or_else(ImdsRegionProvider::builder().build())
}

fn profile_region_provider(profile: Option<&str>) -> ProfileFileRegionProvider {
    let builder = ProfileFileRegionProvider::builder();
    match profile {
        Some(profile) => builder.profile_name(profile).build(),
        None => builder.build(),
    }
}

/// Explicit keys, which must be given as a pair.
fn static_credentials(args: &ConnectionArgs) -> Result<Option<Credentials>> {
    match (&args.access_key, &args.secret_key) {
        (Some(access_key), Some(secret_key)) => Ok(Some(Credentials::new(
            access_key,
            secret_key,
            args.session_token.clone(),
            None,
            "dynamodb-item-parameters",
        ))),
        (None, None) => Ok(None),
        (Some(_), None) => Err(Error::Configuration(
            "access_key was given without secret_key".to_string(),
        )),
        (None, Some(_)) => Err(Error::Configuration(
            "secret_key was given without access_key".to_string(),
        )),
    }
}

/// Creates a DynamoDB client and resolves its credentials.
///
/// Region priority: parameter, `AWS_REGION`, shared configuration files, `EC2_REGION`,
/// instance metadata. The profile, when given, selects the section of the shared files used
/// for both region and credentials.
/// Credentials priority: explicit keys, profile, SDK default chain.
/// Fails with [`Error::Configuration`] when only half of the key pair is given, when no
/// region is found, or when the credentials cannot be resolved; no table is contacted.
pub async fn connect(args: &ConnectionArgs) -> Result<Client> {
    let credentials = static_credentials(args)?;

    let mut config_loader =
        aws_config::defaults(BehaviorVersion::latest()).region(region_provider(args));
    if let Some(profile) = &args.profile {
        config_loader = config_loader.profile_name(profile);
    }
    if let Some(credentials) = credentials {
        config_loader = config_loader.credentials_provider(credentials);
    } else if let Some(profile) = &args.profile {
        let profile_provider = ProfileFileCredentialsProvider::builder()
            .profile_name(profile)
            .build();
        config_loader = config_loader.credentials_provider(profile_provider);
    }

    let sdk_config = config_loader.load().await;
    let region = sdk_config
        .region()
        .ok_or_else(|| Error::Configuration(MISSING_REGION.to_string()))?;

    if let Some(provider) = sdk_config.credentials_provider() {
        provider
            .provide_credentials()
            .await
            .map_err(|error| Error::Configuration(format!("Can't authorize connection - {error}")))?;
    }

    let mut dynamo_config = aws_sdk_dynamodb::config::Builder::from(&sdk_config);
    if let Some(url) = &args.endpoint_url {
        dynamo_config = dynamo_config.endpoint_url(url);
    }

    tracing::debug!(%region, target = %args.target_display(), "resolved connection");
    Ok(Client::from_conf(dynamo_config.build()))
}
