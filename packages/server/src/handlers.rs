//! HTTP handler functions for the dashboard API.
//!
//! Bad input is a 400 with `{ "error": ... }`. Upstream failures are a 502;
//! the county details panel additionally returns a recoverable error panel.

use actix_web::http::header;
use actix_web::{HttpResponse, web};
use chrono::Utc;
use nc_resilience_api::{ApiError, load_county_details, load_overview};
use nc_resilience_api_models::{CountyQuery, RankingsQuery};
use nc_resilience_assessment::Wizard;
use nc_resilience_assessment::crisis::crisis_resources;
use nc_resilience_assessment::programs::match_programs;
use nc_resilience_assessment::wizard::steps_for;
use nc_resilience_county_models::{CountyFips, HazardType};
use nc_resilience_export::{ExportFormat, export_filename, render};
use nc_resilience_server_models::{
    ApiAction, ApiAssessmentRequest, ApiCrisis, ApiErrorBody, ApiErrorPanel, ApiHealth,
    COUNTY_LOAD_ERROR_TITLE, CrisisParams, EntityTypeParams, ProgramParams, RankingsParams,
};

use crate::services::{REPORT_EXPORT_KIND, complete_assessment, load_report};
use crate::{AppState, views};

fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiErrorBody {
        error: message.into(),
    })
}

fn upstream_error(context: &str, e: &ApiError) -> HttpResponse {
    log::error!("{context}: {e}");
    HttpResponse::BadGateway().json(ApiErrorBody {
        error: e.to_string(),
    })
}

fn parse_fips(raw: &str) -> Result<CountyFips, HttpResponse> {
    CountyFips::new(raw).map_err(|e| bad_request(e.to_string()))
}

fn parse_hazard(raw: &str) -> Result<HazardType, HttpResponse> {
    match raw.trim().to_ascii_uppercase().parse::<HazardType>() {
        Ok(HazardType::Other) | Err(_) => Err(bad_request(format!("Unknown hazard code '{raw}'"))),
        Ok(hazard) => Ok(hazard),
    }
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/map`
///
/// Every county with its map bucket for the selected entity type.
pub async fn map(state: web::Data<AppState>, params: web::Query<EntityTypeParams>) -> HttpResponse {
    let query = CountyQuery::with_scores(params.entity_type);
    match state.api.list_counties(&query).await {
        Ok(counties) => HttpResponse::Ok().json(views::map_view(&counties, params.entity_type)),
        Err(e) => upstream_error("Failed to load counties", &e),
    }
}

/// `GET /api/counties/{fips}`
///
/// The details panel. Upstream failure returns an error panel with a
/// reset action.
pub async fn county_details(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<EntityTypeParams>,
) -> HttpResponse {
    let fips = match parse_fips(&path) {
        Ok(fips) => fips,
        Err(resp) => return resp,
    };

    match load_county_details(state.api.as_ref(), &fips, params.entity_type).await {
        Ok(details) => {
            HttpResponse::Ok().json(views::county_details_view(&details, params.entity_type))
        }
        Err(e) => {
            log::error!("Failed to load county {fips}: {e}");
            HttpResponse::BadGateway().json(ApiErrorPanel {
                title: COUNTY_LOAD_ERROR_TITLE.to_string(),
                message: e.to_string(),
                actions: vec![ApiAction::reset()],
            })
        }
    }
}

/// `GET /api/counties/{fips}/dashboard`
pub async fn dashboard(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<EntityTypeParams>,
) -> HttpResponse {
    let fips = match parse_fips(&path) {
        Ok(fips) => fips,
        Err(resp) => return resp,
    };

    match load_report(state.api.as_ref(), &fips, params.entity_type).await {
        Ok(report) => HttpResponse::Ok().json(views::dashboard_view(&report)),
        Err(e) => upstream_error("Failed to load dashboard", &e),
    }
}

/// `GET /api/counties/{fips}/export/{format}`
///
/// The county report as a file attachment.
pub async fn export(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    params: web::Query<EntityTypeParams>,
) -> HttpResponse {
    let (raw_fips, raw_format) = path.into_inner();
    let fips = match parse_fips(&raw_fips) {
        Ok(fips) => fips,
        Err(resp) => return resp,
    };
    let Ok(format) = raw_format.parse::<ExportFormat>() else {
        return bad_request(format!("Unknown export format '{raw_format}'"));
    };

    let report = match load_report(state.api.as_ref(), &fips, params.entity_type).await {
        Ok(report) => report,
        Err(e) => return upstream_error("Failed to load report", &e),
    };

    let now = Utc::now();
    match render(&report, format, now) {
        Ok(body) => {
            let filename = export_filename(
                &report.county_name,
                report.entity_type,
                REPORT_EXPORT_KIND,
                now.date_naive(),
                format,
            );
            HttpResponse::Ok()
                .content_type(format.content_type())
                .insert_header((
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{filename}\""),
                ))
                .body(body)
        }
        Err(e) => {
            log::error!("Failed to render {format} export for {fips}: {e}");
            HttpResponse::InternalServerError().json(ApiErrorBody {
                error: "Failed to render export".to_string(),
            })
        }
    }
}

/// `GET /api/rankings`
pub async fn rankings(
    state: web::Data<AppState>,
    params: web::Query<RankingsParams>,
) -> HttpResponse {
    let query = RankingsQuery {
        entity_type: params.entity_type,
        limit: params.limit,
    };
    match state.api.rankings(&query).await {
        Ok(rows) => HttpResponse::Ok().json(views::rankings_view(&rows)),
        Err(e) => upstream_error("Failed to load rankings", &e),
    }
}

/// `GET /api/analytics`
///
/// Counties and statewide statistics, fetched concurrently.
pub async fn analytics(
    state: web::Data<AppState>,
    params: web::Query<EntityTypeParams>,
) -> HttpResponse {
    match load_overview(state.api.as_ref(), params.entity_type).await {
        Ok(overview) => HttpResponse::Ok().json(views::analytics_view(&overview, params.entity_type)),
        Err(e) => upstream_error("Failed to load analytics", &e),
    }
}

/// `GET /api/assessment/steps`
///
/// The wizard's step list for the selected entity type.
pub async fn assessment_steps(params: web::Query<EntityTypeParams>) -> HttpResponse {
    HttpResponse::Ok().json(steps_for(params.entity_type))
}

/// `POST /api/assessment`
///
/// Validates the answers, derives the assessment and matches programs.
/// The county's real score is used as the base when it can be fetched;
/// upstream failures fall back to the default base.
pub async fn assessment(
    state: web::Data<AppState>,
    body: web::Json<ApiAssessmentRequest>,
) -> HttpResponse {
    let request = body.into_inner();
    let entity_type = request.entity_type;

    let mut wizard = Wizard::new(entity_type);
    for (field, answer) in request.responses {
        if let Err(e) = wizard.answer(&field, answer) {
            return bad_request(e.to_string());
        }
    }

    let county_fips = match request.county_fips.as_deref() {
        Some(raw) => match parse_fips(raw) {
            Ok(fips) => Some(fips),
            Err(resp) => return resp,
        },
        None => None,
    };

    match complete_assessment(state.api.as_ref(), &wizard, county_fips).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => bad_request(e.to_string()),
    }
}

/// `GET /api/programs`
pub async fn programs(params: web::Query<ProgramParams>) -> HttpResponse {
    let county = match params.county_fips.as_deref() {
        Some(raw) => match parse_fips(raw) {
            Ok(fips) => Some(fips),
            Err(resp) => return resp,
        },
        None => None,
    };

    let mut hazards = Vec::new();
    for raw in params
        .hazards
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .filter(|s| !s.trim().is_empty())
    {
        match parse_hazard(raw) {
            Ok(hazard) => hazards.push(hazard),
            Err(resp) => return resp,
        }
    }

    HttpResponse::Ok().json(match_programs(params.entity_type, county.as_ref(), &hazards))
}

/// `GET /api/crisis`
pub async fn crisis(params: web::Query<CrisisParams>) -> HttpResponse {
    let hazard = match params.hazard.as_deref() {
        Some(raw) => match parse_hazard(raw) {
            Ok(hazard) => Some(hazard),
            Err(resp) => return resp,
        },
        None => None,
    };

    HttpResponse::Ok().json(ApiCrisis {
        hazard,
        guides: crisis_resources(hazard).into_iter().cloned().collect(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use actix_web::{App, test};
    use async_trait::async_trait;
    use nc_resilience_api::ResilienceApi;
    use nc_resilience_api_models::{
        AssessRequest, CountyQuery, RankingsQuery, ResilienceStatistics,
    };
    use nc_resilience_county_models::{
        County, CountyRanking, DisasterRisk, EntityType, ResilienceScore,
    };
    use serde_json::{Value, json};

    use super::*;
    use crate::configure;

    #[derive(Default)]
    struct Stub {
        fail: bool,
        no_scores: bool,
        assess_fails: bool,
        assess_calls: Arc<AtomicUsize>,
    }

    impl Stub {
        fn check(&self) -> Result<(), ApiError> {
            if self.fail {
                Err(ApiError::api("Upstream is down"))
            } else {
                Ok(())
            }
        }
    }

    fn score(fips: &CountyFips, entity_type: EntityType, overall: f64) -> ResilienceScore {
        ResilienceScore {
            county_fips: fips.clone(),
            entity_type,
            overall_score: overall,
            credit_risk_component: 35.0,
            disaster_risk_component: 62.0,
            supply_chain_risk_component: 18.0,
            confidence_lower: None,
            confidence_upper: None,
        }
    }

    fn wake() -> County {
        County {
            fips_code: CountyFips::new("37183").unwrap(),
            name: "Wake".to_string(),
            population: Some(1_175_000),
            area_sq_miles: Some(835.0),
            resilience_scores: Vec::new(),
        }
    }

    #[async_trait]
    impl ResilienceApi for Stub {
        async fn list_counties(&self, query: &CountyQuery) -> Result<Vec<County>, ApiError> {
            self.check()?;
            let mut county = wake();
            if let Some(entity_type) = query.entity_type {
                county.resilience_scores = vec![score(&county.fips_code, entity_type, 66.0)];
            }
            Ok(vec![county])
        }

        async fn get_county(&self, _fips: &CountyFips) -> Result<County, ApiError> {
            self.check()?;
            Ok(wake())
        }

        async fn get_county_resilience(
            &self,
            fips: &CountyFips,
        ) -> Result<Vec<ResilienceScore>, ApiError> {
            self.check()?;
            if self.no_scores {
                return Ok(Vec::new());
            }
            Ok(EntityType::all()
                .iter()
                .map(|e| score(fips, *e, 70.0))
                .collect())
        }

        async fn get_county_risks(
            &self,
            fips: &CountyFips,
        ) -> Result<Vec<DisasterRisk>, ApiError> {
            self.check()?;
            Ok([
                (HazardType::Drought, 35.0),
                (HazardType::Hurricane, 91.0),
                (HazardType::RiverineFlooding, 74.0),
            ]
            .into_iter()
            .map(|(hazard_type, risk_score)| DisasterRisk {
                county_fips: fips.clone(),
                hazard_type,
                risk_score,
                annual_loss_expected: None,
                risk_rating: None,
            })
            .collect())
        }

        async fn rankings(&self, query: &RankingsQuery) -> Result<Vec<CountyRanking>, ApiError> {
            self.check()?;
            Ok(vec![CountyRanking {
                rank: 1,
                county_fips: CountyFips::new("37183").unwrap(),
                county_name: "Wake".to_string(),
                entity_type: query.entity_type,
                overall_score: 72.0,
            }])
        }

        async fn assess(&self, request: &AssessRequest) -> Result<ResilienceScore, ApiError> {
            self.assess_calls.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            if self.assess_fails {
                return Err(ApiError::api("Assessment model unavailable"));
            }
            assert_eq!(request.farm_acres, Some(120.0));
            Ok(score(&request.county_fips, request.entity_type, 64.0))
        }

        async fn statistics(&self) -> Result<ResilienceStatistics, ApiError> {
            self.check()?;
            Ok(ResilienceStatistics {
                total_counties: 100,
                by_entity_type: Vec::new(),
            })
        }
    }

    macro_rules! app {
        ($stub:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(AppState {
                        api: Arc::new($stub),
                    }))
                    .configure(configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = app!(Stub::default());
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], true);
    }

    #[actix_web::test]
    async fn county_load_failure_shows_error_panel() {
        let app = app!(Stub {
            fail: true,
            ..Stub::default()
        });
        let req = test::TestRequest::get()
            .uri("/api/counties/37183")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 502);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["title"], "Unable to Load County Data");
        assert_eq!(body["message"], "Upstream is down");
        assert_eq!(body["actions"][0]["id"], "reset");
    }

    #[actix_web::test]
    async fn county_details_sorted_and_bucketed() {
        let app = app!(Stub::default());
        let req = test::TestRequest::get()
            .uri("/api/counties/37183?entityType=small-business")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["name"], "Wake");
        assert_eq!(body["entityType"], "small-business");
        assert_eq!(body["scoreCard"]["overallBucket"]["tier"], "Moderate");
        assert_eq!(body["hazards"][0]["hazardType"], "HRCN");
        assert_eq!(body["hazards"][0]["bucket"]["color"], "red");
        assert_eq!(body["hazards"][2]["hazardType"], "DRGT");
        assert!(body["noDataMessage"].is_null());
    }

    #[actix_web::test]
    async fn county_without_score_is_no_data() {
        let app = app!(Stub {
            no_scores: true,
            ..Stub::default()
        });
        let req = test::TestRequest::get()
            .uri("/api/counties/37183")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["scoreCard"].is_null());
        assert!(body["noDataMessage"].is_string());
    }

    #[actix_web::test]
    async fn invalid_fips_is_bad_request() {
        let app = app!(Stub::default());
        let req = test::TestRequest::get()
            .uri("/api/counties/3718")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn map_buckets_counties() {
        let app = app!(Stub::default());
        let req = test::TestRequest::get().uri("/api/map").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["entityType"], "agriculture");
        assert_eq!(body["counties"][0]["bucket"]["tier"], "Moderate-High");
        assert_eq!(body["legend"].as_array().unwrap().len(), 4);
    }

    #[actix_web::test]
    async fn map_failure_is_bad_gateway() {
        let app = app!(Stub {
            fail: true,
            ..Stub::default()
        });
        let req = test::TestRequest::get().uri("/api/map").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 502);
    }

    #[actix_web::test]
    async fn dashboard_has_composite_and_insights() {
        let app = app!(Stub::default());
        let req = test::TestRequest::get()
            .uri("/api/counties/37183/dashboard?entityType=agriculture")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["countyName"], "Wake");
        assert!(body["overallScore"].as_u64().unwrap() <= 100);
        let titles: Vec<&str> = body["insights"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|i| i["title"].as_str())
            .collect();
        assert_eq!(titles.first(), Some(&"Strongest Area"));
        assert_eq!(titles.last(), Some(&"Regional Standing"));
    }

    #[actix_web::test]
    async fn csv_export_is_an_attachment() {
        let app = app!(Stub::default());
        let req = test::TestRequest::get()
            .uri("/api/counties/37183/export/csv")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let disposition = resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("wake-agriculture-impact-report-"));
        assert!(disposition.contains(".csv"));
        let body = test::read_body(resp).await;
        let text = std::str::from_utf8(&body).unwrap();
        assert!(text.starts_with("\"Metric ID\""));
    }

    #[actix_web::test]
    async fn unknown_export_format_is_bad_request() {
        let app = app!(Stub::default());
        let req = test::TestRequest::get()
            .uri("/api/counties/37183/export/pdf")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn rankings_and_analytics() {
        let app = app!(Stub::default());
        let req = test::TestRequest::get()
            .uri("/api/rankings?entityType=small-business&limit=10")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body[0]["countyName"], "Wake");
        assert_eq!(body[0]["bucket"]["tier"], "High");

        let req = test::TestRequest::get().uri("/api/analytics").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["totalCounties"], 100);
        assert_eq!(body["scoredCounties"], 1);
    }

    fn complete_responses() -> Value {
        json!({
            "county": "Wake",
            "farm_acres": 120,
            "primary_crops": ["Soybeans"],
            "preparedness_level": 20,
            "has_emergency_plan": false,
            "insurance_coverage": ["Property"],
            "cash_reserve_months": 2,
            "supplier_count": 1
        })
    }

    #[actix_web::test]
    async fn assessment_uses_upstream_score() {
        let assess_calls = Arc::new(AtomicUsize::new(0));
        let app = app!(Stub {
            assess_calls: assess_calls.clone(),
            ..Stub::default()
        });
        let req = test::TestRequest::post()
            .uri("/api/assessment")
            .set_json(json!({
                "entityType": "agriculture",
                "responses": complete_responses(),
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["countyFips"], "37183");
        assert_eq!(body["usesCountyScore"], true);
        assert_eq!(body["assessment"]["baseScore"], 64.0);
        assert_eq!(assess_calls.load(Ordering::SeqCst), 1);
        let factors: Vec<&str> = body["assessment"]["riskFactors"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(factors.contains(&"Low disaster preparedness"));
        assert!(factors.contains(&"Insufficient insurance coverage"));
        assert!(!body["programs"].as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn failed_upstream_assessment_uses_published_score() {
        let app = app!(Stub {
            assess_fails: true,
            ..Stub::default()
        });
        let req = test::TestRequest::post()
            .uri("/api/assessment")
            .set_json(json!({
                "entityType": "agriculture",
                "responses": complete_responses(),
                "countyFips": "37183",
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["usesCountyScore"], true);
        assert_eq!(body["assessment"]["baseScore"], 70.0);
    }

    #[actix_web::test]
    async fn assessment_falls_back_to_default_base() {
        let app = app!(Stub {
            fail: true,
            ..Stub::default()
        });
        let req = test::TestRequest::post()
            .uri("/api/assessment")
            .set_json(json!({
                "entityType": "agriculture",
                "responses": complete_responses(),
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["usesCountyScore"], false);
        assert_eq!(body["assessment"]["baseScore"], 65.0);
    }

    #[actix_web::test]
    async fn incomplete_assessment_is_bad_request() {
        let app = app!(Stub::default());
        let req = test::TestRequest::post()
            .uri("/api/assessment")
            .set_json(json!({
                "entityType": "agriculture",
                "responses": { "county": "Wake" },
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn programs_filter_and_validate_hazards() {
        let app = app!(Stub::default());
        let req = test::TestRequest::get()
            .uri("/api/programs?entityType=small-business&countyFips=37183&hazards=HRCN,RFLD")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|m| m["program"]["id"].as_str())
            .collect();
        assert!(ids.contains(&"sba-eidl"));
        assert!(ids.contains(&"nc-sbtdc"));
        let sbtdc = body
            .as_array()
            .unwrap()
            .iter()
            .find(|m| m["program"]["id"] == "nc-sbtdc")
            .unwrap();
        assert_eq!(sbtdc["coverageArea"], "North Carolina");

        let req = test::TestRequest::get()
            .uri("/api/programs?hazards=XXXX")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn crisis_includes_general_guide() {
        let app = app!(Stub::default());
        let req = test::TestRequest::get()
            .uri("/api/crisis?hazard=hrcn")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["hazard"], "HRCN");
        assert_eq!(body["guides"].as_array().unwrap().len(), 2);
        assert_eq!(body["guides"][0]["title"], "Immediate Safety");
    }
}
