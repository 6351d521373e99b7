use crate::infra::{parse_reach, InMemoryScoreRepository};
use clap::Args;
use pb_portal::coefficient::{
    format_boost, format_factor, tally_votes, CoefficientSettings, PublicVote, VoteChannel,
};
use pb_portal::committee::{CommitteeScoringService, ScoreSubmission};
use pb_portal::config::PortalConfig;
use pb_portal::domain::{ApplicationId, ApplicationStatus, ApplicationSummary, PortalUser};
use pb_portal::error::AppError;
use pb_portal::finance::{ApplicationImporter, FinanceScope, FinancialAggregator, FinancialSummary};
use pb_portal::roles::Role;
use pb_portal::scoring::ScoringEngine;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct TierArgs {
    /// Reach figure declared by the organisation (people engaged)
    #[arg(long, value_parser = parse_reach)]
    pub(crate) reach: u64,
    /// Raw vote count to adjust with the tier factor
    #[arg(long)]
    pub(crate) votes: Option<u64>,
    /// Report as if coefficients were switched off for the round
    #[arg(long)]
    pub(crate) disabled: bool,
}

#[derive(Args, Debug)]
pub(crate) struct FinanceReportArgs {
    /// CSV export of applications (id, ref, projectTitle, area, priority, amountRequested, status)
    #[arg(long)]
    pub(crate) applications: PathBuf,
    /// Restrict the area breakdown to one committee area
    #[arg(long)]
    pub(crate) area: Option<String>,
    /// Application id to run a funding simulation for
    #[arg(long)]
    pub(crate) simulate: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Average score an application needs to be recommended (defaults to 60)
    #[arg(long)]
    pub(crate) threshold: Option<u8>,
}

pub(crate) fn run_tier(args: TierArgs) -> Result<(), AppError> {
    let settings = CoefficientSettings {
        enabled: !args.disabled,
        ..CoefficientSettings::default()
    };
    let assessment = settings.assess(args.reach);

    println!("Reach {}", assessment.reach);
    println!("  Tier:   {}", settings.tier_label(assessment.tier));
    println!(
        "  Factor: {} ({})",
        format_factor(assessment.factor),
        format_boost(assessment.factor)
    );
    if let Some(votes) = args.votes {
        println!(
            "  Votes:  {votes} raw -> {} adjusted",
            settings.adjusted_votes(votes, args.reach)
        );
    }
    Ok(())
}

pub(crate) fn run_finance_report(args: FinanceReportArgs) -> Result<(), AppError> {
    let applications = ApplicationImporter::from_path(&args.applications)?;
    let aggregator = FinancialAggregator::default();
    let scope = match args.area {
        Some(area) => FinanceScope::Area(area),
        None => FinanceScope::All,
    };

    let summary = aggregator.summary(&applications, None, &scope);
    println!(
        "Financial report for {} ({} applications)",
        args.applications.display(),
        applications.len()
    );
    render_summary(&summary);

    if let Some(id) = args.simulate {
        let id = ApplicationId(id);
        match aggregator.simulate_by_id(&id, &applications, None) {
            Some(simulation) => {
                println!("\nFunding simulation for {}", simulation.application_id);
                println!(
                    "  {} requested in {}; remaining after approval {}",
                    currency(simulation.amount_requested),
                    simulation.area,
                    currency(simulation.remaining_after_approval)
                );
                println!(
                    "  {} spend {} -> {}",
                    simulation.priority_impact.category,
                    currency(simulation.priority_impact.current_spend),
                    currency(simulation.priority_impact.new_spend)
                );
                if simulation.exceeds_budget {
                    println!("  Warning: approval would exceed the area budget");
                }
            }
            None => println!("\nNo application with id {id} in the export"),
        }
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let portal = PortalConfig {
        scoring_threshold: args
            .threshold
            .unwrap_or(PortalConfig::DEFAULT_SCORING_THRESHOLD)
            .min(100),
        ..PortalConfig::default()
    };

    println!("Participatory budgeting demo");
    let applications = demo_applications();
    let committee = demo_committee();

    let service = CommitteeScoringService::new(
        Arc::new(InMemoryScoreRepository::default()),
        ScoringEngine::standard(),
        &portal,
    );
    for (app, scorer, raw) in [
        ("app_PB101", "comm_bln_01", 3),
        ("app_PB101", "comm_bln_02", 2),
        ("app_PB102", "comm_bln_01", 1),
        ("app_PB103", "comm_thn_01", 2),
        ("app_PB103", "comm_tre_01", 3),
    ] {
        let member = committee
            .iter()
            .find(|member| member.uid == scorer)
            .map(|member| member.display_name.clone())
            .unwrap_or_default();
        service.submit(demo_submission(app, scorer, &member, raw), Role::Committee)?;
    }

    println!(
        "\nCommittee scoring progress (threshold {}%)",
        portal.scoring_threshold
    );
    for entry in service.progress(&applications, &committee, None)? {
        println!(
            "  {} {:<28} {:>3}% scored  avg {:>3}  {}",
            entry.reference,
            entry.project_title,
            entry.percent_complete,
            entry.average_score,
            if entry.meets_threshold {
                "recommended"
            } else {
                "below threshold"
            }
        );
        if !entry.outstanding.is_empty() {
            println!("      awaiting: {}", entry.outstanding.join(", "));
        }
    }

    let settings = CoefficientSettings::default();
    let reach = BTreeMap::from([
        (ApplicationId("app_PB101".to_string()), 35),
        (ApplicationId("app_PB103".to_string()), 640),
    ]);
    let mut votes = demo_votes("app_PB101", 42, 6);
    votes.extend(demo_votes("app_PB103", 55, 4));

    println!("\nPublic vote (coefficients applied to digital votes)");
    for tally in tally_votes(&votes, &reach, &settings) {
        let tier = tally
            .tier
            .map(|tier| settings.tier_label(tier))
            .unwrap_or_else(|| "no reach data".to_string());
        println!(
            "  {:<10} {:>3} digital + {:>2} in person -> {:>5} ({}, {})",
            tally.application_id.0,
            tally.digital_votes,
            tally.in_person_votes,
            tally.adjusted_votes,
            tier,
            format_factor(tally.factor)
        );
    }

    let aggregator = FinancialAggregator::default();
    println!("\nFinancial dashboard");
    render_summary(&aggregator.summary(&applications, None, &FinanceScope::All));

    Ok(())
}

fn render_summary(summary: &FinancialSummary) {
    println!(
        "  Budget {}  Spent {}  Remaining {}{}",
        currency(summary.totals.total_budget),
        currency(summary.totals.total_spent),
        currency(summary.totals.remaining_pot),
        if summary.over_budget { "  OVER BUDGET" } else { "" }
    );
    for area in &summary.areas {
        println!(
            "  {:<34} {:>10} / {:>10}  {:>3.0}%  {} funded, {} pending",
            area.area,
            currency(area.spent),
            currency(area.allocated),
            area.percent_spent(),
            area.project_count,
            currency(area.pending_requests)
        );
    }
    let mut priorities: Vec<(&String, &f64)> = summary
        .spend_by_priority
        .iter()
        .filter(|(_, spend)| **spend > 0.0)
        .collect();
    priorities.sort_by(|a, b| b.1.total_cmp(a.1));
    for (category, spend) in priorities {
        println!("  {:<34} {:>10}", category, currency(*spend));
    }
}

fn currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-£{:.2}", amount.abs())
    } else {
        format!("£{amount:.2}")
    }
}

fn demo_applications() -> Vec<ApplicationSummary> {
    let app = |id: &str,
               title: &str,
               area: &str,
               priority: &str,
               amount: f64,
               status: ApplicationStatus| {
        ApplicationSummary {
            id: ApplicationId(format!("app_{id}")),
            reference: id.to_string(),
            project_title: title.to_string(),
            area: area.to_string(),
            priority: Some(priority.to_string()),
            amount_requested: amount,
            status,
        }
    };
    vec![
        app(
            "PB101",
            "Youth Club Summer Programme",
            "Blaenavon",
            "Youth Services",
            4_800.0,
            ApplicationStatus::SubmittedStage2,
        ),
        app(
            "PB102",
            "Heritage Walking Trail",
            "Blaenavon",
            "Heritage & Tourism",
            3_200.0,
            ApplicationStatus::SubmittedStage2,
        ),
        app(
            "PB103",
            "Community Pantry",
            "Cross-Area",
            "Health & Wellbeing",
            6_500.0,
            ApplicationStatus::InvitedStage2,
        ),
        app(
            "PB090",
            "MUGA Floodlights",
            "Trevethin, Penygarn & St. Cadocs",
            "Community Safety",
            7_500.0,
            ApplicationStatus::Funded,
        ),
        app(
            "PB091",
            "Allotment Water Butts",
            "Thornhill & Upper Cwmbran",
            "Environment",
            1_150.0,
            ApplicationStatus::Funded,
        ),
    ]
}

fn demo_committee() -> Vec<PortalUser> {
    [
        ("comm_bln_01", "Louise White", "Blaenavon"),
        ("comm_bln_02", "Sharon Ford", "Blaenavon"),
        ("comm_bln_03", "Boyd Paynter", "Blaenavon"),
        ("comm_thn_01", "Tracey Daniels", "Thornhill & Upper Cwmbran"),
        ("comm_tre_01", "Hannah Davies", "Trevethin, Penygarn & St. Cadocs"),
    ]
    .into_iter()
    .map(|(uid, name, area)| PortalUser {
        uid: uid.to_string(),
        display_name: name.to_string(),
        role: Role::Committee,
        area: Some(area.to_string()),
    })
    .collect()
}

fn demo_submission(app: &str, scorer: &str, scorer_name: &str, raw: i32) -> ScoreSubmission {
    let breakdown = ScoringEngine::standard()
        .criteria()
        .iter()
        .enumerate()
        .map(|(index, criterion)| {
            // Vary scores a little so totals are not uniform.
            let value = if index % 3 == 0 { (raw - 1).max(0) } else { raw };
            (criterion.id.clone(), value)
        })
        .collect();
    ScoreSubmission {
        app_id: ApplicationId(app.to_string()),
        scorer_id: scorer.to_string(),
        scorer_name: scorer_name.to_string(),
        breakdown,
        notes: BTreeMap::new(),
        is_final: true,
    }
}

fn demo_votes(app: &str, digital: usize, in_person: usize) -> Vec<PublicVote> {
    (0..digital + in_person)
        .map(|index| PublicVote {
            application_id: ApplicationId(app.to_string()),
            voter_id: format!("voter_{index:04}"),
            area: None,
            channel: if index < digital {
                VoteChannel::Digital
            } else {
                VoteChannel::InPerson
            },
        })
        .collect()
}
