// Rendering of the console output.

use chrono::{DateTime, NaiveDate, Utc};
use election_model::schedule::{countdown_until, status_on};
use serde_json::json;

use crate::console::*;

/// The JSON summary written by the `results` command.
///
/// Only stored fields go into it, so that the summary of an election does not
/// change from one day to the next.
pub fn build_summary_js(election: &Election, consolidation: &Consolidation) -> JSValue {
    json!({
        "election": {
            "id": election.id,
            "title": election.title,
            "date": election.date,
            "organizationType": election.organization_type(),
            "location": election.location,
            "status": election.status,
        },
        "results": consolidation,
    })
}

pub fn render_organization(org: &Organization, is_current: bool) -> String {
    let marker = if is_current { "*" } else { " " };
    let mut line = format!(
        "{} {} {} ({}, created {})",
        marker,
        org.id,
        org.name,
        org.organization_type,
        org.created_at.format("%Y-%m-%d")
    );
    if let Some(d) = &org.description {
        line.push_str(&format!(" - {}", d));
    }
    line
}

pub fn render_election(election: &Election, today: NaiveDate) -> String {
    let status = status_on(&election.date, today);
    let countdown = status
        .countdown
        .map(|c| format!(" {}", c))
        .unwrap_or_default();
    format!(
        "{} {} {} [{}{}] {} - {} voters, {} candidates, {} centers, {} bureaux",
        if election.is_active { "*" } else { " " },
        election.id,
        election.title,
        status.status,
        countdown,
        election.date,
        election.voters,
        election.candidates_list.len(),
        election.centers,
        election.bureaux
    )
}

pub fn render_dashboard(
    org: &Organization,
    election: Option<&Election>,
    ratios: &ConsolidationRatios,
    now: DateTime<Utc>,
) -> String {
    let model = model_for(org.organization_type);
    let mut lines: Vec<String> = vec![
        format!("Organization: {} ({})", org.name, model.name),
        format!("Created: {}", org.created_at.format("%Y-%m-%d")),
    ];
    if let Some(d) = &org.description {
        lines.push(format!("Description: {}", d));
    }
    let e = match election {
        Some(e) => e,
        None => {
            lines.push("No election configured yet.".to_string());
            return lines.join("\n");
        }
    };
    let status = status_on(&e.date, now.date_naive());
    let c = countdown_until(&e.date, now);
    let infra = compute_infrastructure_summary(e);
    let progress = compute_results_progress(e, ratios);
    lines.push(format!("Active election: {} ({}) on {}", e.title, e.id, e.date));
    lines.push(format!("Status: {}", status.status));
    lines.push(format!(
        "Countdown: {}d {:02}h {:02}m {:02}s",
        c.days, c.hours, c.minutes, c.seconds
    ));
    lines.push(format!("Registered voters: {}", e.voters));
    lines.push(format!(
        "Infrastructure: {} centers, {} bureaux, {:.1} bureaux per center",
        infra.centers, infra.bureaux, infra.average_per_center
    ));
    lines.push(format!(
        "Results entry: {}/{} bureaux, {} reports pending",
        progress.bureaux_entered, progress.total_bureaux, progress.pending_reports
    ));
    if let Some(ours) = e.our_candidate() {
        lines.push(format!("Our candidate: {} ({})", ours.name, ours.party));
    }
    lines.join("\n")
}
