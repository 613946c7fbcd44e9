use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};

use std::fs;

use chrono::{DateTime, Utc};
use election_model::builder::*;
use election_model::registry::Session;
use election_model::store::{FileStore, StoreError};
use election_model::*;

use serde::Deserialize;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::*;
use crate::console::config_reader::*;
use crate::console::report::*;

mod config_reader;
mod report;

#[derive(Debug, Snafu)]
pub enum ConsoleError {
    #[snafu(display("Storage error: {source}"))]
    Store { source: StoreError },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the JSON file {path}: {source}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error writing to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Could not serialize the summary"))]
    SerializingSummary { source: serde_json::Error },
    #[snafu(display("No organization selected. Create one with `org create` or pick one with `org select`"))]
    NoOrganization {},
    #[snafu(display("Unknown organization {id}"))]
    UnknownOrganization { id: String },
    #[snafu(display("Unknown election {id} in the current organization"))]
    UnknownElection { id: ElectionId },
    #[snafu(display("The current organization has no election"))]
    NoElection {},
    #[snafu(display("The draft is incomplete at step {step} ({title})"))]
    StepRefused { step: u8, title: String },
    #[snafu(display("Invalid organization: {message}"))]
    InvalidOrganization { message: String },
    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

type ConsoleResult<T> = Result<T, ConsoleError>;

type ConsoleSession = Session<FileStore>;

pub fn run(args: &Args) -> ConsoleResult<()> {
    let settings = resolve_settings(args)?;
    info!("settings: {:?}", settings);
    let mut session =
        Session::load(FileStore::new(&settings.data_dir), &settings.user_id).context(StoreSnafu)?;
    let now = Utc::now();
    match &args.command {
        Command::Org(c) => run_org(&mut session, c, now),
        Command::Election(c) => run_election(&mut session, c, now),
        Command::Results {
            election,
            out,
            reference,
        } => run_results(
            &session,
            &settings.ratios,
            *election,
            out.as_deref(),
            reference.as_deref(),
        ),
        Command::Dashboard => {
            let org = current_organization(&session)?;
            let election = session.active_election().context(StoreSnafu)?;
            println!(
                "{}",
                render_dashboard(&org, election.as_ref(), &settings.ratios, now)
            );
            Ok(())
        }
        Command::Logout => {
            session.logout().context(StoreSnafu)?;
            println!("Logged out");
            Ok(())
        }
        Command::Reset => {
            session.reset().context(StoreSnafu)?;
            println!("All the stored data was removed");
            Ok(())
        }
    }
}

fn current_organization(session: &ConsoleSession) -> ConsoleResult<Organization> {
    session
        .current_organization()
        .cloned()
        .context(NoOrganizationSnafu)
}

fn run_org(session: &mut ConsoleSession, command: &OrgCommand, now: DateTime<Utc>) -> ConsoleResult<()> {
    match command {
        OrgCommand::Create {
            name,
            org_type,
            description,
        } => {
            let organization_type: OrganizationType = match org_type.parse() {
                Ok(t) => t,
                Err(message) => return InvalidOrganizationSnafu { message }.fail(),
            };
            let draft = OrganizationDraft {
                name: name.clone(),
                organization_type: Some(organization_type),
                description: description.clone().unwrap_or_default(),
            };
            match session.create_organization(&draft, now).context(StoreSnafu)? {
                Some(org) => {
                    println!("{}", render_organization(&org, true));
                    Ok(())
                }
                None => InvalidOrganizationSnafu {
                    message: "the name may not be empty",
                }
                .fail(),
            }
        }
        OrgCommand::List => {
            let current_id = session.current_organization().map(|o| o.id.clone());
            let organizations = session.organizations().context(StoreSnafu)?;
            if organizations.is_empty() {
                println!("No organization yet");
            }
            for org in organizations.iter() {
                println!(
                    "{}",
                    render_organization(org, current_id.as_deref() == Some(org.id.as_str()))
                );
            }
            Ok(())
        }
        OrgCommand::Select { id } => match session.select_organization(id).context(StoreSnafu)? {
            Some(org) => {
                println!("{}", render_organization(&org, true));
                Ok(())
            }
            None => UnknownOrganizationSnafu { id }.fail(),
        },
    }
}

/// Walks a draft through the wizard steps and submits it.
///
/// The candidates of the draft are added when the wizard reaches the candidates step.
fn run_wizard(
    organization_type: OrganizationType,
    draft_file: &DraftFile,
    organization_id: &str,
    now: DateTime<Utc>,
) -> ConsoleResult<Election> {
    let mut wizard = ElectionWizard::with_draft(organization_type, draft_file.draft.clone());
    while wizard.step() != WizardStep::LAST {
        if wizard.step() == WizardStep::Candidates {
            for input in draft_file.candidates.iter() {
                if wizard.add_candidate(input, now).is_none() {
                    whatever!("Candidate {:?} needs a name and a party", input.name);
                }
            }
        }
        if !wizard.next() {
            return StepRefusedSnafu {
                step: wizard.step().index(),
                title: wizard.step_title(),
            }
            .fail();
        }
        debug!("run_wizard: reached step {:?}", wizard.step());
    }
    Ok(wizard.submit(organization_id))
}

fn run_election(
    session: &mut ConsoleSession,
    command: &ElectionCommand,
    now: DateTime<Utc>,
) -> ConsoleResult<()> {
    let org = current_organization(session)?;
    match command {
        ElectionCommand::Create { draft } => {
            let draft_file = read_draft(draft)?;
            let election = run_wizard(org.organization_type, &draft_file, &org.id, now)?;
            let stored = session.add_election(election, now).context(StoreSnafu)?;
            println!("{}", render_election(&stored, now.date_naive()));
            Ok(())
        }
        ElectionCommand::List => {
            let elections = session.elections().context(StoreSnafu)?;
            if elections.is_empty() {
                println!("No election yet");
            }
            for e in elections.iter() {
                println!("{}", render_election(e, now.date_naive()));
            }
            Ok(())
        }
        ElectionCommand::Activate { id } => {
            if !session.set_active_election(*id).context(StoreSnafu)? {
                return UnknownElectionSnafu { id: *id }.fail();
            }
            println!("Election {} is now active", id);
            Ok(())
        }
    }
}

fn run_results(
    session: &ConsoleSession,
    ratios: &ConsolidationRatios,
    election_id: Option<ElectionId>,
    out: Option<&str>,
    reference: Option<&str>,
) -> ConsoleResult<()> {
    current_organization(session)?;
    let election = match election_id {
        Some(id) => session
            .election(id)
            .context(StoreSnafu)?
            .context(UnknownElectionSnafu { id })?,
        None => session
            .active_election()
            .context(StoreSnafu)?
            .context(NoElectionSnafu)?,
    };
    let consolidation = consolidate(&election, ratios);
    let summary = build_summary_js(&election, &consolidation);
    let pretty = serde_json::to_string_pretty(&summary).context(SerializingSummarySnafu)?;

    match out {
        None | Some("") | Some("stdout") => println!("{}", pretty),
        Some(path) => {
            fs::write(path, &pretty).context(WritingOutputSnafu { path })?;
            info!("summary written to {}", path);
        }
    }

    if let Some(reference_path) = reference {
        let reference_js = read_summary(reference_path)?;
        let pretty_reference =
            serde_json::to_string_pretty(&reference_js).context(SerializingSummarySnafu)?;
        if pretty_reference != pretty {
            warn!("summary differs from the reference {}", reference_path);
            print_diff(pretty_reference.as_str(), pretty.as_str(), "\n");
            return ReferenceMismatchSnafu.fail();
        }
        info!("summary matches the reference {}", reference_path);
    }
    Ok(())
}
