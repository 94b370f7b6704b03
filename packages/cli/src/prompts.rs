//! Prompts shared by the interactive tools.

use std::path::PathBuf;

use dialoguer::{Input, Select};
use nc_resilience_county_models::fips::{NC_COUNTIES, nc_fips_for_name};
use nc_resilience_county_models::{CountyFips, EntityType};
use nc_resilience_export::ExportFormat;

/// Rows shown at once in long selection lists.
pub const LIST_PAGE: usize = 15;

pub fn entity_type() -> dialoguer::Result<EntityType> {
    let labels: Vec<&str> = EntityType::all().iter().map(|e| e.label()).collect();
    let idx = Select::new()
        .with_prompt("Sector")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(EntityType::all()[idx])
}

pub fn county() -> dialoguer::Result<Option<CountyFips>> {
    let names: Vec<&str> = NC_COUNTIES.iter().map(|(_, name)| *name).collect();
    let idx = Select::new()
        .with_prompt("County")
        .items(&names)
        .default(0)
        .max_length(LIST_PAGE)
        .interact()?;
    Ok(nc_fips_for_name(names[idx]))
}

pub fn export_format() -> dialoguer::Result<ExportFormat> {
    let labels: Vec<String> = ExportFormat::all().iter().map(ToString::to_string).collect();
    let idx = Select::new()
        .with_prompt("Format")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(ExportFormat::all()[idx])
}

pub fn out_dir() -> dialoguer::Result<PathBuf> {
    let dir: String = Input::new()
        .with_prompt("Output directory")
        .default(".".to_string())
        .interact_text()?;
    Ok(PathBuf::from(dir))
}
