//! Linear self-assessment wizard.
//!
//! The wizard holds an index into a fixed step list. Moving forward is
//! gated on every required question of the current step being answered;
//! moving back is always allowed.

use nc_resilience_county_models::EntityType;
use nc_resilience_county_models::fips::NC_COUNTIES;
use serde::Serialize;

use crate::factors::assess;
use crate::{Answer, Responses, WizardAssessment, WizardError, fields};

/// Insurance products offered in the coverage checklist.
pub const INSURANCE_OPTIONS: &[&str] = &[
    "Property",
    "Crop",
    "Business Interruption",
    "Flood",
    "Liability",
    "Livestock",
    "Equipment",
];

/// Disasters offered in the history checklist.
pub const DISASTER_OPTIONS: &[&str] = &[
    "Hurricane",
    "Flood",
    "Drought",
    "Tornado",
    "Winter Storm",
    "Wildfire",
    "Extreme Heat",
];

const CROP_OPTIONS: &[&str] = &[
    "Tobacco",
    "Sweet Potatoes",
    "Soybeans",
    "Corn",
    "Cotton",
    "Peanuts",
    "Poultry",
    "Hogs",
    "Cattle",
    "Vegetables",
    "Christmas Trees",
];

const BUSINESS_TYPE_OPTIONS: &[&str] = &[
    "Retail",
    "Restaurant / Food Service",
    "Professional Services",
    "Manufacturing",
    "Construction",
    "Hospitality / Tourism",
    "Health Care",
    "Other",
];

/// What kind of input a question takes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Pick exactly one option.
    Select {
        /// Allowed options.
        options: Vec<String>,
    },
    /// Pick any number of options.
    Checklist {
        /// Allowed options.
        options: Vec<String>,
    },
    /// A number within an inclusive range.
    Number {
        /// Smallest accepted value.
        min: f64,
        /// Largest accepted value.
        max: f64,
    },
    /// Yes or no.
    YesNo,
}

/// A single question on a wizard step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Field id the answer is stored under.
    pub id: &'static str,
    /// Prompt shown to the user.
    pub prompt: &'static str,
    /// Input kind.
    pub kind: FieldKind,
    /// Whether the step gate requires an answer.
    pub required: bool,
}

/// One page of the wizard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Step id.
    pub id: &'static str,
    /// Step heading.
    pub title: &'static str,
    /// Questions on this step.
    pub questions: Vec<Question>,
}

fn options(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn question(id: &'static str, prompt: &'static str, kind: FieldKind) -> Question {
    Question {
        id,
        prompt,
        kind,
        required: true,
    }
}

/// The step list for `entity_type`.
#[must_use]
pub fn steps_for(entity_type: EntityType) -> Vec<Step> {
    let county_names: Vec<String> = NC_COUNTIES
        .iter()
        .map(|(_, name)| (*name).to_string())
        .collect();

    let profile = match entity_type {
        EntityType::Agriculture => Step {
            id: "operation",
            title: "Your Farm",
            questions: vec![
                question(
                    fields::FARM_ACRES,
                    "How many acres do you farm?",
                    FieldKind::Number {
                        min: 0.0,
                        max: 100_000.0,
                    },
                ),
                question(
                    fields::PRIMARY_CROPS,
                    "What do you grow or raise?",
                    FieldKind::Checklist {
                        options: options(CROP_OPTIONS),
                    },
                ),
            ],
        },
        EntityType::SmallBusiness => Step {
            id: "operation",
            title: "Your Business",
            questions: vec![
                question(
                    fields::EMPLOYEE_COUNT,
                    "How many employees do you have?",
                    FieldKind::Number {
                        min: 0.0,
                        max: 500.0,
                    },
                ),
                question(
                    fields::BUSINESS_TYPE,
                    "What type of business do you run?",
                    FieldKind::Select {
                        options: options(BUSINESS_TYPE_OPTIONS),
                    },
                ),
            ],
        },
    };

    vec![
        Step {
            id: "location",
            title: "Location",
            questions: vec![question(
                fields::COUNTY,
                "Which county is your operation in?",
                FieldKind::Select {
                    options: county_names,
                },
            )],
        },
        profile,
        Step {
            id: "preparedness",
            title: "Preparedness",
            questions: vec![
                question(
                    fields::PREPAREDNESS_LEVEL,
                    "How prepared are you for a disaster today (0-100)?",
                    FieldKind::Number {
                        min: 0.0,
                        max: 100.0,
                    },
                ),
                question(
                    fields::HAS_EMERGENCY_PLAN,
                    "Do you have a written emergency plan?",
                    FieldKind::YesNo,
                ),
            ],
        },
        Step {
            id: "financial",
            title: "Financial Protection",
            questions: vec![
                question(
                    fields::INSURANCE_COVERAGE,
                    "Which insurance coverage do you carry?",
                    FieldKind::Checklist {
                        options: options(INSURANCE_OPTIONS),
                    },
                ),
                question(
                    fields::CASH_RESERVE_MONTHS,
                    "How many months of expenses could you cover from reserves?",
                    FieldKind::Number {
                        min: 0.0,
                        max: 60.0,
                    },
                ),
            ],
        },
        Step {
            id: "supply_chain",
            title: "Supply Chain & History",
            questions: vec![
                question(
                    fields::SUPPLIER_COUNT,
                    "How many independent suppliers do you rely on for critical inputs?",
                    FieldKind::Number {
                        min: 0.0,
                        max: 100.0,
                    },
                ),
                Question {
                    required: false,
                    ..question(
                        fields::PAST_DISASTERS,
                        "Which disasters have affected you in the last ten years?",
                        FieldKind::Checklist {
                            options: options(DISASTER_OPTIONS),
                        },
                    )
                },
            ],
        },
    ]
}

/// Wizard state: the step list, the current position and the answers so
/// far.
#[derive(Debug, Clone)]
pub struct Wizard {
    entity_type: EntityType,
    steps: Vec<Step>,
    index: usize,
    responses: Responses,
}

impl Wizard {
    /// Starts a wizard at the first step.
    #[must_use]
    pub fn new(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            steps: steps_for(entity_type),
            index: 0,
            responses: Responses::new(),
        }
    }

    /// Sector this wizard was started for.
    #[must_use]
    pub const fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    /// All steps.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Zero-based index of the current step.
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.index
    }

    /// The current step.
    #[must_use]
    pub fn current_step(&self) -> &Step {
        &self.steps[self.index]
    }

    /// Whether the current step is the last one.
    #[must_use]
    pub fn is_last_step(&self) -> bool {
        self.index + 1 == self.steps.len()
    }

    /// Answers recorded so far.
    #[must_use]
    pub const fn responses(&self) -> &Responses {
        &self.responses
    }

    /// Records an answer after checking it against the question definition.
    ///
    /// # Errors
    ///
    /// * [`WizardError::UnknownField`] if no step has a question `field`.
    /// * [`WizardError::InvalidAnswer`] if the answer has the wrong shape,
    ///   is out of range, or names an option that is not offered.
    pub fn answer(&mut self, field: &str, answer: Answer) -> Result<(), WizardError> {
        let question = self
            .steps
            .iter()
            .flat_map(|s| &s.questions)
            .find(|q| q.id == field)
            .ok_or_else(|| WizardError::UnknownField {
                field: field.to_string(),
            })?;

        validate(question, &answer)?;
        self.responses.insert(field.to_string(), answer);
        Ok(())
    }

    /// Required fields of the current step that are still unanswered.
    #[must_use]
    pub fn missing_required(&self) -> Vec<&'static str> {
        missing_in(self.current_step(), &self.responses)
    }

    /// Advances to the next step.
    ///
    /// # Errors
    ///
    /// * [`WizardError::MissingRequired`] if the current step has
    ///   unanswered required fields.
    /// * [`WizardError::AtLastStep`] if there is no next step.
    pub fn next(&mut self) -> Result<usize, WizardError> {
        self.check_current()?;
        if self.is_last_step() {
            return Err(WizardError::AtLastStep);
        }
        self.index += 1;
        log::debug!("Wizard advanced to step '{}'", self.current_step().id);
        Ok(self.index)
    }

    /// Goes back one step. Stays on the first step if already there.
    pub fn back(&mut self) -> usize {
        self.index = self.index.saturating_sub(1);
        self.index
    }

    /// Finishes the wizard and derives the assessment.
    ///
    /// `base_score` is the score the modifiers apply to; pass the county's
    /// real overall score when known.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::MissingRequired`] for the first step that
    /// still has unanswered required fields.
    pub fn finish(&self, base_score: Option<f64>) -> Result<WizardAssessment, WizardError> {
        for step in &self.steps {
            let missing = missing_in(step, &self.responses);
            if !missing.is_empty() {
                return Err(missing_error(step, &missing));
            }
        }
        Ok(assess(&self.responses, self.entity_type, base_score))
    }

    fn check_current(&self) -> Result<(), WizardError> {
        let missing = self.missing_required();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(missing_error(self.current_step(), &missing))
        }
    }
}

fn missing_in(step: &Step, responses: &Responses) -> Vec<&'static str> {
    step.questions
        .iter()
        .filter(|q| q.required)
        .filter(|q| !responses.get(q.id).is_some_and(Answer::is_answered))
        .map(|q| q.id)
        .collect()
}

fn missing_error(step: &Step, missing: &[&str]) -> WizardError {
    WizardError::MissingRequired {
        step: step.id.to_string(),
        fields: missing.iter().map(|f| (*f).to_string()).collect(),
    }
}

fn validate(question: &Question, answer: &Answer) -> Result<(), WizardError> {
    let invalid = |message: String| WizardError::InvalidAnswer {
        field: question.id.to_string(),
        message,
    };

    match (&question.kind, answer) {
        (FieldKind::Select { options }, Answer::Text(choice)) => {
            if choice.is_empty() || options.iter().any(|o| o == choice) {
                Ok(())
            } else {
                Err(invalid(format!("'{choice}' is not one of the options")))
            }
        }
        (FieldKind::Checklist { options }, Answer::Checklist(items)) => {
            match items.iter().find(|i| !options.contains(i)) {
                Some(item) => Err(invalid(format!("'{item}' is not one of the options"))),
                None => Ok(()),
            }
        }
        (FieldKind::Number { min, max }, Answer::Number(n)) => {
            if n.is_finite() && (*min..=*max).contains(n) {
                Ok(())
            } else {
                Err(invalid(format!("{n} is outside {min}-{max}")))
            }
        }
        (FieldKind::YesNo, Answer::YesNo(_)) => Ok(()),
        (kind, _) => Err(invalid(format!("expected {}", kind_name(kind)))),
    }
}

const fn kind_name(kind: &FieldKind) -> &'static str {
    match kind {
        FieldKind::Select { .. } => "a selection",
        FieldKind::Checklist { .. } => "a list of selections",
        FieldKind::Number { .. } => "a number",
        FieldKind::YesNo => "yes or no",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Answer {
        Answer::Text(s.to_string())
    }

    fn list(items: &[&str]) -> Answer {
        Answer::Checklist(items.iter().map(|s| (*s).to_string()).collect())
    }

    fn complete_agriculture() -> Wizard {
        let mut w = Wizard::new(EntityType::Agriculture);
        w.answer(fields::COUNTY, text("Sampson")).unwrap();
        w.answer(fields::FARM_ACRES, Answer::Number(240.0)).unwrap();
        w.answer(fields::PRIMARY_CROPS, list(&["Sweet Potatoes", "Hogs"]))
            .unwrap();
        w.answer(fields::PREPAREDNESS_LEVEL, Answer::Number(20.0))
            .unwrap();
        w.answer(fields::HAS_EMERGENCY_PLAN, Answer::YesNo(false))
            .unwrap();
        w.answer(fields::INSURANCE_COVERAGE, list(&["Property"]))
            .unwrap();
        w.answer(fields::CASH_RESERVE_MONTHS, Answer::Number(2.0))
            .unwrap();
        w.answer(fields::SUPPLIER_COUNT, Answer::Number(1.0)).unwrap();
        w
    }

    #[test]
    fn step_lists_differ_by_sector() {
        let ag = steps_for(EntityType::Agriculture);
        let sb = steps_for(EntityType::SmallBusiness);
        assert_eq!(ag.len(), 5);
        assert_eq!(sb.len(), 5);
        assert_eq!(ag[1].title, "Your Farm");
        assert_eq!(sb[1].title, "Your Business");
    }

    #[test]
    fn gate_blocks_until_required_fields_answered() {
        let mut w = Wizard::new(EntityType::SmallBusiness);
        let err = w.next().unwrap_err();
        assert_eq!(
            err,
            WizardError::MissingRequired {
                step: "location".to_string(),
                fields: vec![fields::COUNTY.to_string()],
            }
        );
        w.answer(fields::COUNTY, text("")).unwrap();
        assert!(w.next().is_err());
        w.answer(fields::COUNTY, text("Wake")).unwrap();
        assert_eq!(w.next().unwrap(), 1);
    }

    #[test]
    fn empty_checklist_does_not_satisfy_gate() {
        let mut w = complete_agriculture();
        w.answer(fields::PRIMARY_CROPS, list(&[])).unwrap();
        w.next().unwrap();
        assert_eq!(w.missing_required(), vec![fields::PRIMARY_CROPS]);
    }

    #[test]
    fn optional_fields_do_not_block() {
        let mut w = complete_agriculture();
        while !w.is_last_step() {
            w.next().unwrap();
        }
        assert!(w.missing_required().is_empty());
        assert_eq!(w.next().unwrap_err(), WizardError::AtLastStep);
    }

    #[test]
    fn back_saturates_at_first_step() {
        let mut w = complete_agriculture();
        assert_eq!(w.back(), 0);
        w.next().unwrap();
        w.next().unwrap();
        assert_eq!(w.back(), 1);
        assert_eq!(w.back(), 0);
    }

    #[test]
    fn rejects_bad_answers() {
        let mut w = Wizard::new(EntityType::Agriculture);
        assert!(matches!(
            w.answer("favorite_color", text("blue")),
            Err(WizardError::UnknownField { .. })
        ));
        assert!(matches!(
            w.answer(fields::COUNTY, text("Atlantis")),
            Err(WizardError::InvalidAnswer { .. })
        ));
        assert!(matches!(
            w.answer(fields::PREPAREDNESS_LEVEL, Answer::Number(150.0)),
            Err(WizardError::InvalidAnswer { .. })
        ));
        assert!(matches!(
            w.answer(fields::HAS_EMERGENCY_PLAN, text("yes")),
            Err(WizardError::InvalidAnswer { .. })
        ));
        assert!(matches!(
            w.answer(fields::INSURANCE_COVERAGE, list(&["Pet"])),
            Err(WizardError::InvalidAnswer { .. })
        ));
        // Small-business questions are not part of the farm wizard.
        assert!(matches!(
            w.answer(fields::EMPLOYEE_COUNT, Answer::Number(3.0)),
            Err(WizardError::UnknownField { .. })
        ));
    }

    #[test]
    fn finish_requires_every_step() {
        let mut w = Wizard::new(EntityType::Agriculture);
        w.answer(fields::COUNTY, text("Sampson")).unwrap();
        let err = w.finish(None).unwrap_err();
        assert!(matches!(err, WizardError::MissingRequired { step, .. } if step == "operation"));
    }

    #[test]
    fn finish_produces_assessment() {
        let assessment = complete_agriculture().finish(None).unwrap();
        assert_eq!(assessment.entity_type, EntityType::Agriculture);
        assert!((assessment.base_score - 65.0).abs() < f64::EPSILON);
        assert!(!assessment.risk_factors.is_empty());
        assert_eq!(
            assessment.recommendations.len(),
            assessment.risk_factors.len()
        );
    }
}
