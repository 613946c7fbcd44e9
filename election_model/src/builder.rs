pub use crate::model::*;

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

/// The five steps of the election wizard, in order.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum WizardStep {
    GeneralInfo = 1,
    Scope = 2,
    Candidates = 3,
    Infrastructure = 4,
    Review = 5,
}

impl WizardStep {
    pub const FIRST: WizardStep = WizardStep::GeneralInfo;
    pub const LAST: WizardStep = WizardStep::Review;

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Out-of-range indices are clamped to the first or last step.
    pub fn from_index(idx: u8) -> WizardStep {
        match idx {
            0 | 1 => WizardStep::GeneralInfo,
            2 => WizardStep::Scope,
            3 => WizardStep::Candidates,
            4 => WizardStep::Infrastructure,
            _ => WizardStep::Review,
        }
    }

    pub fn title(self, organization_type: OrganizationType) -> &'static str {
        model_for(organization_type).step_titles[(self.index() - 1) as usize]
    }
}

/// The form fields of the election wizard.
///
/// Both the territorial and the professional scope fields are present; only
/// the ones matching the organization type are checked and used.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElectionDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub election_type: String,
    pub date: String,
    pub seats_available: u32,
    pub budget: u64,
    pub vote_goal: u64,

    pub province: String,
    pub department: String,
    pub commune: String,
    pub arrondissement: String,

    pub company: String,
    pub direction: String,
    pub service: String,

    pub total_centers: u64,
    pub average_bureaux: u64,
    pub total_voters: u64,
}

impl Default for ElectionDraft {
    fn default() -> Self {
        ElectionDraft {
            name: String::new(),
            election_type: String::new(),
            date: String::new(),
            seats_available: 1,
            budget: 0,
            vote_goal: 0,
            province: String::new(),
            department: String::new(),
            commune: String::new(),
            arrondissement: String::new(),
            company: String::new(),
            direction: String::new(),
            service: String::new(),
            total_centers: 0,
            average_bureaux: 0,
            total_voters: 0,
        }
    }
}

/// A candidate as typed in the candidates step.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateInput {
    pub name: String,
    pub party: String,
    pub is_our_candidate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

fn filled(s: &str) -> bool {
    !s.trim().is_empty()
}

/// Whether the wizard may move forward from `step`.
pub fn can_proceed(
    step: WizardStep,
    organization_type: OrganizationType,
    draft: &ElectionDraft,
) -> bool {
    match step {
        WizardStep::GeneralInfo => {
            filled(&draft.name) && filled(&draft.election_type) && filled(&draft.date)
        }
        WizardStep::Scope => match organization_type {
            OrganizationType::Territorial => filled(&draft.province) && filled(&draft.commune),
            OrganizationType::Professional => filled(&draft.company) && filled(&draft.direction),
        },
        // Candidates are optional.
        WizardStep::Candidates => true,
        WizardStep::Infrastructure => {
            draft.total_centers > 0 && draft.average_bureaux > 0 && draft.total_voters > 0
        }
        WizardStep::Review => true,
    }
}

/// Accumulates the input of the election wizard and builds the final record.
///
/// ```
/// use election_model::builder::ElectionWizard;
/// use election_model::OrganizationType;
///
/// let mut wizard = ElectionWizard::new(OrganizationType::Territorial);
/// wizard.draft_mut().name = "Municipales 2024".to_string();
/// wizard.draft_mut().election_type = "municipal".to_string();
/// wizard.draft_mut().date = "2024-08-26".to_string();
/// assert!(wizard.next());
///
/// // Province and commune are still missing.
/// assert!(!wizard.next());
/// ```
#[derive(Debug, Clone)]
pub struct ElectionWizard {
    organization_type: OrganizationType,
    step: WizardStep,
    draft: ElectionDraft,
    candidates: Vec<Candidate>,
}

impl ElectionWizard {
    pub fn new(organization_type: OrganizationType) -> ElectionWizard {
        ElectionWizard::with_draft(organization_type, ElectionDraft::default())
    }

    pub fn with_draft(organization_type: OrganizationType, draft: ElectionDraft) -> ElectionWizard {
        ElectionWizard {
            organization_type,
            step: WizardStep::FIRST,
            draft,
            candidates: Vec::new(),
        }
    }

    pub fn organization_type(&self) -> OrganizationType {
        self.organization_type
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn step_title(&self) -> &'static str {
        self.step.title(self.organization_type)
    }

    pub fn draft(&self) -> &ElectionDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ElectionDraft {
        &mut self.draft
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn can_proceed(&self) -> bool {
        can_proceed(self.step, self.organization_type, &self.draft)
    }

    /// Moves to the next step if the current one is complete.
    ///
    /// Returns false (and stays put) when the step is incomplete or already the last one.
    pub fn next(&mut self) -> bool {
        if self.step == WizardStep::LAST || !self.can_proceed() {
            return false;
        }
        self.step = WizardStep::from_index(self.step.index() + 1);
        debug!("ElectionWizard::next: now at step {:?}", self.step);
        true
    }

    pub fn previous(&mut self) -> bool {
        if self.step == WizardStep::FIRST {
            return false;
        }
        self.step = WizardStep::from_index(self.step.index() - 1);
        true
    }

    /// Adds a candidate and returns its id.
    ///
    /// Name and party are required. A candidate flagged as ours takes the flag
    /// away from all the candidates added before.
    pub fn add_candidate(&mut self, input: &CandidateInput, now: DateTime<Utc>) -> Option<String> {
        if !filled(&input.name) || !filled(&input.party) {
            return None;
        }
        if input.is_our_candidate {
            for c in self.candidates.iter_mut() {
                c.is_our_candidate = false;
            }
        }
        let id = next_timestamp_id(
            now,
            self.candidates.iter().filter_map(|c| c.id.parse::<i64>().ok()),
        )
        .to_string();
        self.candidates.push(Candidate {
            id: id.clone(),
            name: input.name.trim().to_string(),
            party: input.party.trim().to_string(),
            is_our_candidate: input.is_our_candidate,
            photo: input.photo.clone(),
        });
        Some(id)
    }

    pub fn remove_candidate(&mut self, id: &str) -> bool {
        let before = self.candidates.len();
        self.candidates.retain(|c| c.id != id);
        before != self.candidates.len()
    }

    /// Builds the election record.
    ///
    /// The record comes out active and upcoming. Its id is left at 0: the id
    /// is assigned when the election is added to the stored collection.
    pub fn submit(&self, organization_id: &str) -> Election {
        let d = &self.draft;
        let scope = match self.organization_type {
            OrganizationType::Territorial => ElectionScope::Territorial(TerritorialScope {
                province: d.province.clone(),
                department: d.department.clone(),
                commune: d.commune.clone(),
                arrondissement: d.arrondissement.clone(),
            }),
            OrganizationType::Professional => ElectionScope::Professional(ProfessionalScope {
                company: d.company.clone(),
                direction: d.direction.clone(),
                service: d.service.clone(),
            }),
        };
        let non_zero = |x: u64| if x == 0 { None } else { Some(x) };
        Election {
            id: 0,
            title: d.name.clone(),
            date: d.date.clone(),
            status: ElectionStatus::Upcoming,
            status_color: ElectionStatus::Upcoming.color(),
            description: scope.description(),
            voters: d.total_voters,
            candidates: self.candidates.len() as u64,
            centers: d.total_centers,
            bureaux: d.total_centers.saturating_mul(d.average_bureaux),
            location: scope.location(),
            election_type: d.election_type.clone(),
            seats_available: d.seats_available,
            budget: non_zero(d.budget),
            vote_goal: non_zero(d.vote_goal),
            organization_id: organization_id.to_string(),
            scope,
            candidates_list: self.candidates.clone(),
            voting_locations: None,
            is_active: true,
        }
    }
}

/// The form of the organization wizard.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrganizationDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub organization_type: Option<OrganizationType>,
    pub description: String,
}

impl OrganizationDraft {
    pub fn can_submit(&self) -> bool {
        filled(&self.name) && self.organization_type.is_some()
    }

    /// Builds the organization, with an id unique among `existing`.
    pub fn submit(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        existing: &[Organization],
    ) -> Option<Organization> {
        if !self.can_submit() {
            return None;
        }
        let organization_type = self.organization_type?;
        let id = next_timestamp_id(now, existing.iter().filter_map(|o| o.id.parse::<i64>().ok()));
        let description = if filled(&self.description) {
            Some(self.description.trim().to_string())
        } else {
            None
        };
        Some(Organization {
            id: id.to_string(),
            name: self.name.trim().to_string(),
            organization_type,
            description,
            user_id: user_id.to_string(),
            created_at: now,
        })
    }
}
