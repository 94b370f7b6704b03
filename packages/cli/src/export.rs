//! File exports: county impact reports and the statewide ranking.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::Utc;
use dialoguer::Input;
use nc_resilience_api::ResilienceApi;
use nc_resilience_api_models::RankingsQuery;
use nc_resilience_cli_utils::{IndicatifProgress, MultiProgress};
use nc_resilience_county_models::{CountyFips, EntityType};
use nc_resilience_export::csv_export::write_rankings_csv;
use nc_resilience_export::{ExportFormat, export_filename, render};
use nc_resilience_server::services::{REPORT_EXPORT_KIND, load_report};

use crate::prompts;

/// Filename `kind` for ranking exports.
const RANKINGS_EXPORT_KIND: &str = "rankings";

/// Name used in place of a county for statewide exports.
const STATEWIDE_NAME: &str = "North Carolina";

/// Fetches a county's report and writes it to `out_dir`.
///
/// # Errors
///
/// Returns an error if the upstream request, rendering or the write fails.
pub async fn county_report(
    api: &dyn ResilienceApi,
    multi: &MultiProgress,
    fips: &CountyFips,
    entity_type: EntityType,
    format: ExportFormat,
    out_dir: &Path,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let progress = IndicatifProgress::export_bar(multi, &format!("Loading county {fips}"));
    let report = load_report(api, fips, entity_type).await?;

    let now = Utc::now();
    let body = render(&report, format, now)?;
    let path = out_dir.join(export_filename(
        &report.county_name,
        entity_type,
        REPORT_EXPORT_KIND,
        now.date_naive(),
        format,
    ));

    fs::create_dir_all(out_dir)?;
    fs::write(&path, body)?;
    progress.finish(format!("{} report exported", report.county_name));
    log::info!("Exported {format} report for {fips} to {}", path.display());
    Ok(path)
}

/// Fetches the ranking and writes it to `out_dir` as CSV.
///
/// # Errors
///
/// Returns an error if the upstream request or the write fails.
pub async fn rankings(
    api: &dyn ResilienceApi,
    multi: &MultiProgress,
    entity_type: EntityType,
    limit: Option<u32>,
    out_dir: &Path,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let progress = IndicatifProgress::export_bar(multi, "Loading rankings");
    let rows = api.rankings(&RankingsQuery { entity_type, limit }).await?;

    let path = out_dir.join(export_filename(
        STATEWIDE_NAME,
        entity_type,
        RANKINGS_EXPORT_KIND,
        Utc::now().date_naive(),
        ExportFormat::Csv,
    ));
    fs::create_dir_all(out_dir)?;

    progress.set_message("Writing rankings".to_string());
    write_rankings_csv(BufWriter::new(File::create(&path)?), &rows, progress.as_ref())?;
    progress.finish(format!("{} counties exported", rows.len()));
    Ok(path)
}

pub async fn interactive_report(
    api: &dyn ResilienceApi,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let entity_type = prompts::entity_type()?;
    let Some(fips) = prompts::county()? else {
        return Err("Selected county has no FIPS code".into());
    };
    let format = prompts::export_format()?;
    let out_dir = prompts::out_dir()?;

    let path = county_report(api, multi, &fips, entity_type, format, &out_dir).await?;
    println!("Wrote {}", path.display());
    Ok(())
}

pub async fn interactive_rankings(
    api: &dyn ResilienceApi,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let entity_type = prompts::entity_type()?;
    let limit: u32 = Input::new()
        .with_prompt("How many counties (0 for all)")
        .default(0)
        .interact_text()?;
    let out_dir = prompts::out_dir()?;

    let limit = (limit > 0).then_some(limit);
    let path = rankings(api, multi, entity_type, limit, &out_dir).await?;
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nc_resilience_api::ApiError;
    use nc_resilience_api_models::{AssessRequest, CountyQuery, ResilienceStatistics};
    use nc_resilience_county_models::{
        County, CountyRanking, DisasterRisk, ResilienceScore,
    };

    struct Stub;

    fn fips() -> CountyFips {
        CountyFips::new("37063").unwrap()
    }

    #[async_trait]
    impl ResilienceApi for Stub {
        async fn list_counties(&self, _query: &CountyQuery) -> Result<Vec<County>, ApiError> {
            Ok(Vec::new())
        }

        async fn get_county(&self, fips: &CountyFips) -> Result<County, ApiError> {
            Ok(County {
                fips_code: fips.clone(),
                name: "Durham".to_string(),
                population: None,
                area_sq_miles: None,
                resilience_scores: Vec::new(),
            })
        }

        async fn get_county_resilience(
            &self,
            _fips: &CountyFips,
        ) -> Result<Vec<ResilienceScore>, ApiError> {
            Ok(Vec::new())
        }

        async fn get_county_risks(
            &self,
            _fips: &CountyFips,
        ) -> Result<Vec<DisasterRisk>, ApiError> {
            Ok(Vec::new())
        }

        async fn rankings(&self, query: &RankingsQuery) -> Result<Vec<CountyRanking>, ApiError> {
            Ok(vec![
                CountyRanking {
                    rank: 1,
                    county_fips: CountyFips::new("37183").unwrap(),
                    county_name: "Wake".to_string(),
                    entity_type: query.entity_type,
                    overall_score: 71.5,
                },
                CountyRanking {
                    rank: 2,
                    county_fips: fips(),
                    county_name: "Durham".to_string(),
                    entity_type: query.entity_type,
                    overall_score: 69.0,
                },
            ])
        }

        async fn assess(&self, _request: &AssessRequest) -> Result<ResilienceScore, ApiError> {
            Err(ApiError::api("not used"))
        }

        async fn statistics(&self) -> Result<ResilienceStatistics, ApiError> {
            Err(ApiError::api("not used"))
        }
    }

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("nc-resilience-cli-{name}-{}", std::process::id()))
    }

    fn hidden() -> MultiProgress {
        MultiProgress::with_draw_target(indicatif::ProgressDrawTarget::hidden())
    }

    #[tokio::test]
    async fn county_report_writes_named_file() {
        let dir = scratch("report");
        let path = county_report(
            &Stub,
            &hidden(),
            &fips(),
            EntityType::Agriculture,
            ExportFormat::Text,
            &dir,
        )
        .await
        .unwrap();

        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.starts_with("durham-agriculture-impact-report-"));
        assert!(name.ends_with(".txt"));
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("Resilience Score: no data available"));
        fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn rankings_export_writes_every_row() {
        let dir = scratch("rankings");
        let path = rankings(&Stub, &hidden(), EntityType::SmallBusiness, None, &dir)
            .await
            .unwrap();

        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.starts_with("north-carolina-small-business-rankings-"));
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("\"Durham\""));
        fs::remove_dir_all(dir).ok();
    }
}
