use std::collections::BTreeMap;

use pb_portal::domain::ApplicationId;
use pb_portal::finance::{
    ApplicationImporter, FinanceScope, FinancialAggregator, FinancialRecord,
};
use pb_portal::roles::Role;

const EXPORT: &str = "id,ref,projectTitle,area,priority,amountRequested,status\n\
app_1,PB-001,Pitch Floodlights,\"Trevethin, Penygarn & St. Cadocs\",Community Safety,\"£4,000\",Funded\n\
app_2,PB-002,Heritage Trail,Blaenavon,Heritage & Tourism,2500,Funded\n\
app_3,PB-003,Walking Group,Blaenavon,,1200,Submitted-Stage2\n\
app_4,PB-004,Repair Cafe,Thornhill & Upper Cwmbran,Environment,3000,Invited-Stage2\n\
app_5,PB-005,Youth Radio,Blaenavon,Youth Services,9000,Submitted-Stage2\n";

#[test]
fn imported_round_summarises_and_simulates() {
    let applications = ApplicationImporter::from_reader(EXPORT.as_bytes()).expect("import succeeds");
    let aggregator = FinancialAggregator::default();

    let summary = aggregator.summary(&applications, None, &FinanceScope::All);
    assert_eq!(summary.totals.total_budget, 30_000.0);
    assert_eq!(summary.totals.total_spent, 6_500.0);
    assert_eq!(summary.totals.remaining_pot, 23_500.0);
    assert_eq!(summary.spend_by_priority["Community Safety"], 4_000.0);

    let blaenavon = summary
        .areas
        .iter()
        .find(|area| area.area == "Blaenavon")
        .expect("area listed");
    assert_eq!(blaenavon.project_count, 1);
    assert_eq!(blaenavon.pending_requests, 10_200.0);

    let simulation = aggregator
        .simulate_by_id(&ApplicationId("app_5".to_string()), &applications, None)
        .expect("application present");
    assert_eq!(simulation.remaining_after_approval, -1_500.0);
    assert!(simulation.exceeds_budget);
    assert_eq!(simulation.priority_impact.current_spend, 0.0);
    assert_eq!(simulation.priority_impact.new_spend, 9_000.0);
}

#[test]
fn committee_view_is_limited_and_reports_overspend() {
    let applications = ApplicationImporter::from_reader(EXPORT.as_bytes()).expect("import succeeds");
    let aggregator = FinancialAggregator::default();
    let record = FinancialRecord::from_maps(
        "round_2025",
        BTreeMap::from([
            ("Blaenavon".to_string(), 1_000.0),
            ("Thornhill & Upper Cwmbran".to_string(), 5_000.0),
        ]),
        BTreeMap::from([("Blaenavon".to_string(), 1_200.0)]),
    );

    let scope = FinanceScope::for_viewer(Role::Committee, Some("Blaenavon"));
    let summary = aggregator.summary(&applications, Some(&record), &scope);

    assert_eq!(summary.round_id, "round_2025");
    assert_eq!(summary.areas.len(), 1);
    assert_eq!(summary.areas[0].remaining, -200.0);
    assert!(summary.areas[0].over_budget());
    assert_eq!(summary.totals.total_budget, 6_000.0);
    assert_eq!(summary.totals.total_spent, 1_200.0);

    let candidate = applications
        .iter()
        .find(|app| app.area == "Blaenavon" && !app.is_funded())
        .expect("pending Blaenavon application");
    assert!(aggregator.simulate(candidate, &applications, Some(&record)).exceeds_budget);
}
