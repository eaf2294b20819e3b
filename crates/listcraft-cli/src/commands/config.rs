use anyhow::Result;
use colored::Colorize;
use listcraft_infrastructure::ConfigService;

pub fn show(service: &ConfigService) -> Result<()> {
    print!("{}", toml::to_string_pretty(&service.get_config())?);
    Ok(())
}

pub fn path(service: &ConfigService) -> Result<()> {
    println!("{}", service.config_path()?.display());
    Ok(())
}

pub fn init(service: &ConfigService) -> Result<()> {
    service.save_config(&service.get_config())?;
    println!("{} {}", "Wrote".green(), service.config_path()?.display());
    Ok(())
}
