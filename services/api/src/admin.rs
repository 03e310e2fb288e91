use bazaar::config::{AdminBootstrap, AppConfig, ConfigError};
use bazaar::error::AppError;
use bazaar::Marketplace;
use clap::Args;

#[derive(Args, Debug, Default)]
pub(crate) struct BootstrapAdminArgs {
    /// Staff username; falls back to MARKET_ADMIN_USERNAME
    #[arg(long)]
    pub(crate) username: Option<String>,
    /// Staff phone number; falls back to MARKET_ADMIN_PHONE
    #[arg(long)]
    pub(crate) phone: Option<String>,
}

/// Merge CLI flags over the configured admin account.
pub(crate) fn resolve_admin(
    args: BootstrapAdminArgs,
    configured: Option<AdminBootstrap>,
) -> Result<AdminBootstrap, ConfigError> {
    let (config_username, config_phone) = match configured {
        Some(admin) => (Some(admin.username), Some(admin.phone_number)),
        None => (None, None),
    };
    match (args.username.or(config_username), args.phone.or(config_phone)) {
        (Some(username), Some(phone_number)) => Ok(AdminBootstrap {
            username,
            phone_number,
        }),
        _ => Err(ConfigError::MissingAdmin),
    }
}

/// Validate the staff account that `serve` would ensure at startup.
pub(crate) fn run_bootstrap_admin(args: BootstrapAdminArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let admin = resolve_admin(args, config.admin)?;

    let market = Marketplace::in_memory(&config.market);
    let user = market.bootstrap_admin(&admin)?;
    println!(
        "Admin account '{}' ({}) is valid; staff = {}",
        user.username, user.phone_number, user.is_staff
    );
    println!("Export MARKET_ADMIN_USERNAME and MARKET_ADMIN_PHONE so `serve` ensures it on startup.");
    Ok(())
}
