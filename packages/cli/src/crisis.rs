//! Crisis-mode resources in the terminal.

use std::fmt::Write as _;

use dialoguer::Select;
use nc_resilience_assessment::crisis::{CrisisGuide, crisis_resources};
use nc_resilience_county_models::HazardType;

/// Hazards offered in the interactive picker.
const HAZARD_CHOICES: &[HazardType] = &[
    HazardType::Hurricane,
    HazardType::RiverineFlooding,
    HazardType::CoastalFlooding,
    HazardType::Drought,
    HazardType::HeatWave,
    HazardType::Wildfire,
    HazardType::Tornado,
    HazardType::StrongWind,
    HazardType::WinterWeather,
    HazardType::IceStorm,
];

fn render(guide: &CrisisGuide) -> String {
    let mut out = String::new();
    writeln!(out, "== {} ==\n{}", guide.title, guide.summary).unwrap();
    if !guide.checklist.is_empty() {
        writeln!(out).unwrap();
        for item in &guide.checklist {
            writeln!(out, "  [ ] {item}").unwrap();
        }
    }
    if !guide.contacts.is_empty() {
        writeln!(out, "\nContacts:").unwrap();
        for contact in &guide.contacts {
            write!(out, "  {}", contact.name).unwrap();
            if let Some(phone) = &contact.phone {
                write!(out, "  {phone}").unwrap();
            }
            if let Some(url) = &contact.url {
                write!(out, "  {url}").unwrap();
            }
            writeln!(out, "\n    {}", contact.description).unwrap();
        }
    }
    out
}

pub fn print(hazard: Option<HazardType>) {
    for guide in crisis_resources(hazard) {
        println!("{}", render(guide));
    }
}

pub fn interactive() -> dialoguer::Result<()> {
    let mut labels = vec!["General guidance only"];
    labels.extend(HAZARD_CHOICES.iter().map(|h| h.display_name()));

    let idx = Select::new()
        .with_prompt("What are you dealing with?")
        .items(&labels)
        .default(0)
        .interact()?;

    print(idx.checked_sub(1).map(|i| HAZARD_CHOICES[i]));
    Ok(())
}
