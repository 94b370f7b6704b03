//! The self-assessment wizard in the terminal.
//!
//! Walks the steps in order with the same required-field gate the server
//! applies, allowing the user to go back, then prints the assessment and
//! the matching assistance programs.

use dialoguer::{Confirm, Input, MultiSelect, Select};
use nc_resilience_api::ResilienceApi;
use nc_resilience_assessment::wizard::{FieldKind, Question};
use nc_resilience_assessment::{Answer, Wizard, WizardError};
use nc_resilience_county_models::EntityType;
use nc_resilience_server::services::complete_assessment;
use nc_resilience_server_models::ApiAssessmentResult;

use crate::prompts;

enum StepAction {
    Continue,
    Back,
    Quit,
}

fn ask(question: &Question, current: Option<&Answer>) -> dialoguer::Result<Option<Answer>> {
    let answer = match &question.kind {
        FieldKind::Select { options } => {
            let default = current
                .and_then(Answer::as_text)
                .and_then(|c| options.iter().position(|o| o == c))
                .unwrap_or(0);
            let idx = Select::new()
                .with_prompt(question.prompt)
                .items(options)
                .default(default)
                .max_length(prompts::LIST_PAGE)
                .interact()?;
            Some(Answer::Text(options[idx].clone()))
        }
        FieldKind::Checklist { options } => {
            let chosen = current.and_then(Answer::as_checklist).unwrap_or_default();
            let defaults: Vec<bool> = options.iter().map(|o| chosen.contains(o)).collect();
            let picked = MultiSelect::new()
                .with_prompt(format!("{} (space to toggle)", question.prompt))
                .items(options)
                .defaults(&defaults)
                .interact()?;
            if picked.is_empty() && !question.required {
                None
            } else {
                Some(Answer::Checklist(
                    picked.into_iter().map(|i| options[i].clone()).collect(),
                ))
            }
        }
        FieldKind::Number { min, max } => {
            let (min, max) = (*min, *max);
            let mut input = Input::<f64>::new()
                .with_prompt(format!("{} [{min}-{max}]", question.prompt))
                .validate_with(move |v: &f64| {
                    if (min..=max).contains(v) {
                        Ok(())
                    } else {
                        Err(format!("Enter a number between {min} and {max}"))
                    }
                });
            if let Some(n) = current.and_then(Answer::as_number) {
                input = input.default(n);
            }
            Some(Answer::Number(input.interact_text()?))
        }
        FieldKind::YesNo => Some(Answer::YesNo(
            Confirm::new()
                .with_prompt(question.prompt)
                .default(current.and_then(Answer::as_bool).unwrap_or(false))
                .interact()?,
        )),
    };
    Ok(answer)
}

fn choose_action(first: bool, last: bool) -> dialoguer::Result<StepAction> {
    let mut actions = vec![
        (if last { "Finish" } else { "Continue" }, StepAction::Continue),
    ];
    if !first {
        actions.push(("Back", StepAction::Back));
    }
    actions.push(("Quit", StepAction::Quit));

    let labels: Vec<&str> = actions.iter().map(|(l, _)| *l).collect();
    let idx = Select::new().items(&labels).default(0).interact()?;
    Ok(actions.swap_remove(idx).1)
}

/// Walks the steps until the user finishes or quits. Returns `false` on
/// quit.
fn walk(wizard: &mut Wizard) -> Result<bool, Box<dyn std::error::Error>> {
    let total = wizard.steps().len();
    loop {
        let step = wizard.current_step().clone();
        println!();
        println!(
            "Step {}/{}: {}",
            wizard.current_index() + 1,
            total,
            step.title
        );

        for question in &step.questions {
            if let Some(answer) = ask(question, wizard.responses().get(question.id))? {
                wizard.answer(question.id, answer)?;
            }
        }

        let first = wizard.current_index() == 0;
        match choose_action(first, wizard.is_last_step())? {
            StepAction::Back => {
                wizard.back();
            }
            StepAction::Quit => return Ok(false),
            StepAction::Continue if wizard.is_last_step() => {
                let missing = wizard.missing_required();
                if missing.is_empty() {
                    return Ok(true);
                }
                println!("Please answer: {}", missing.join(", "));
            }
            StepAction::Continue => match wizard.next() {
                Ok(_) => {}
                Err(WizardError::MissingRequired { fields, .. }) => {
                    println!("Please answer: {}", fields.join(", "));
                }
                Err(e) => return Err(e.into()),
            },
        }
    }
}

fn summary(result: &ApiAssessmentResult) -> String {
    let a = &result.assessment;
    let mut lines = vec![
        String::new(),
        format!("{} Resilience Assessment", a.entity_type.label()),
        format!(
            "Adjusted score: {}/100 (base {:.1}{})",
            a.adjusted_score,
            a.base_score,
            if result.uses_county_score {
                ", county score"
            } else {
                ", default"
            }
        ),
        String::new(),
    ];

    if a.risk_factors.is_empty() {
        lines.push("No major risk factors identified.".to_string());
    } else {
        lines.push("Risk factors:".to_string());
        lines.extend(a.risk_factors.iter().map(|f| format!("  - {f}")));
    }

    lines.push(String::new());
    lines.push("Recommendations:".to_string());
    lines.extend(a.recommendations.iter().map(|r| format!("  - {r}")));

    if !result.programs.is_empty() {
        lines.push(String::new());
        lines.push("Assistance programs:".to_string());
        for m in &result.programs {
            lines.push(format!(
                "  * {} ({}, {})",
                m.program.name, m.program.agency, m.coverage_area
            ));
            if !m.matched_hazards.is_empty() {
                let names: Vec<&str> = m
                    .matched_hazards
                    .iter()
                    .map(|h| h.display_name())
                    .collect();
                lines.push(format!("    Covers: {}", names.join(", ")));
            }
            lines.push(format!("    {}", m.program.url));
        }
    }

    lines.join("\n")
}

/// Runs the wizard, prompting for the sector if not given.
///
/// # Errors
///
/// Returns an error if a prompt fails or the terminal is not interactive.
pub async fn run(
    api: &dyn ResilienceApi,
    entity_type: Option<EntityType>,
) -> Result<(), Box<dyn std::error::Error>> {
    let entity_type = match entity_type {
        Some(e) => e,
        None => prompts::entity_type()?,
    };

    let mut wizard = Wizard::new(entity_type);
    if !walk(&mut wizard)? {
        println!("Assessment cancelled.");
        return Ok(());
    }

    let result = complete_assessment(api, &wizard, None).await?;
    println!("{}", summary(&result));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nc_resilience_assessment::fields;
    use nc_resilience_assessment::programs::match_programs;
    use nc_resilience_county_models::CountyFips;

    fn result(responses: &[(&str, Answer)], uses_county_score: bool) -> ApiAssessmentResult {
        let mut wizard = Wizard::new(EntityType::SmallBusiness);
        for (field, answer) in responses {
            wizard.answer(field, answer.clone()).unwrap();
        }
        ApiAssessmentResult {
            county_fips: None,
            uses_county_score,
            assessment: wizard.finish(None).unwrap(),
            programs: match_programs(EntityType::SmallBusiness, None, &[]),
        }
    }

    fn complete() -> Vec<(&'static str, Answer)> {
        vec![
            (fields::COUNTY, Answer::Text("Durham".to_string())),
            (fields::EMPLOYEE_COUNT, Answer::Number(12.0)),
            (fields::BUSINESS_TYPE, Answer::Text("Retail".to_string())),
            (fields::PREPAREDNESS_LEVEL, Answer::Number(15.0)),
            (fields::HAS_EMERGENCY_PLAN, Answer::YesNo(false)),
            (
                fields::INSURANCE_COVERAGE,
                Answer::Checklist(vec!["Property".to_string()]),
            ),
            (fields::CASH_RESERVE_MONTHS, Answer::Number(1.0)),
            (fields::SUPPLIER_COUNT, Answer::Number(1.0)),
        ]
    }

    #[test]
    fn summary_lists_factors_and_programs() {
        let text = summary(&result(&complete(), false));
        assert!(text.contains("Small Business Resilience Assessment"));
        assert!(text.contains("base 65.0, default"));
        assert!(text.contains("  - Low disaster preparedness"));
        assert!(text.contains("  - No written emergency plan"));
        assert!(text.contains("Assistance programs:"));
        assert!(text.contains("Economic Injury Disaster Loans") || text.contains("sba.gov"));
        assert!(text.contains(", Nationwide)"));
    }

    #[test]
    fn summary_names_state_programs() {
        let mut result = result(&complete(), true);
        let durham = CountyFips::new("37063").unwrap();
        result.programs = match_programs(EntityType::SmallBusiness, Some(&durham), &[]);
        result.county_fips = Some(durham);
        let text = summary(&result);
        assert!(text.contains(", North Carolina)"));
    }
}
