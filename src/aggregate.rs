use std::collections::BTreeMap;

use crate::models::{ClientRecord, SummaryStats};

#[derive(Default)]
struct GroupTally {
    count: usize,
    fee: f64,
    lifetime: f64,
}

/// Compute dashboard aggregates for a batch of records.
///
/// Averages divide by `max(count, 1)`, so an empty batch yields zeros rather than NaN.
/// Nothing is cached: every call starts from scratch.
pub fn summarize(records: &[ClientRecord]) -> SummaryStats {
    let total_count = records.len();
    let divisor = total_count.max(1) as f64;

    let mut total_fee = 0.0;
    let mut total_lifetime = 0.0;
    let mut counts_by_status = BTreeMap::new();
    let mut tallies: BTreeMap<String, GroupTally> = BTreeMap::new();

    for record in records {
        total_fee += record.fee;
        total_lifetime += record.lifetime_months;
        *counts_by_status.entry(record.status).or_insert(0) += 1;

        let tally = tallies.entry(record.group.clone()).or_default();
        tally.count += 1;
        tally.fee += record.fee;
        tally.lifetime += record.lifetime_months;
    }

    let mut stats = SummaryStats {
        total_count,
        total_fee,
        average_lifetime: total_lifetime / divisor,
        average_ticket: total_fee / divisor,
        counts_by_status,
        ..SummaryStats::default()
    };

    for (group, tally) in tallies {
        let count = tally.count as f64;
        stats.count_by_group.insert(group.clone(), tally.count);
        stats.sum_fee_by_group.insert(group.clone(), tally.fee);
        stats.avg_lifetime_by_group.insert(group.clone(), tally.lifetime / count);
        stats.avg_ticket_by_group.insert(group, tally.fee / count);
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;

    fn record(group: &str, fee: f64, lt: f64, status: Status) -> ClientRecord {
        ClientRecord {
            id: 0,
            name: "Cliente".to_string(),
            group: group.to_string(),
            fee,
            lifetime_months: lt,
            status,
        }
    }

    fn sample() -> Vec<ClientRecord> {
        vec![
            record("A", 100.0, 2.0, Status::Safe),
            record("A", 300.0, 4.0, Status::Danger),
            record("B", 50.0, 1.0, Status::Safe),
        ]
    }

    #[test]
    fn test_three_record_scenario() {
        let stats = summarize(&sample());

        assert_eq!(stats.total_count, 3);
        assert_eq!(stats.total_fee, 450.0);
        assert!((stats.average_lifetime - 7.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.average_ticket, 150.0);

        assert_eq!(stats.sum_fee_by_group["A"], 400.0);
        assert_eq!(stats.sum_fee_by_group["B"], 50.0);
        assert_eq!(stats.avg_lifetime_by_group["A"], 3.0);
        assert_eq!(stats.avg_lifetime_by_group["B"], 1.0);
        assert_eq!(stats.avg_ticket_by_group["A"], 200.0);
        assert_eq!(stats.avg_ticket_by_group["B"], 50.0);
        assert_eq!(stats.count_by_group["A"], 2);
    }

    #[test]
    fn test_empty_batch_has_zero_averages() {
        let stats = summarize(&[]);
        assert_eq!(stats.total_count, 0);
        assert_eq!(stats.total_fee, 0.0);
        assert_eq!(stats.average_lifetime, 0.0);
        assert_eq!(stats.average_ticket, 0.0);
        assert!(stats.counts_by_status.is_empty());
        assert!(stats.sum_fee_by_group.is_empty());
    }

    #[test]
    fn test_status_counts_only_present_keys() {
        let stats = summarize(&sample());
        assert_eq!(stats.counts_by_status.len(), 2);
        assert_eq!(stats.status_count(Status::Safe), 2);
        assert_eq!(stats.status_count(Status::Danger), 1);
        assert!(!stats.counts_by_status.contains_key(&Status::Care));
        assert_eq!(stats.status_count(Status::Care), 0);
        assert_eq!(
            stats.counts_by_status.values().sum::<usize>(),
            stats.total_count
        );
    }

    #[test]
    fn test_ticket_is_group_fee_over_group_count() {
        let records = vec![
            record("Templários", 5000.0, 10.0, Status::Safe),
            record("Spartans", 2500.0, 3.0, Status::Care),
            record("Templários", 4000.0, 6.0, Status::Safe),
            record("Spartans", 3500.0, 9.0, Status::Safe),
            record("Outros", 0.0, 0.0, Status::Safe),
        ];
        let stats = summarize(&records);

        for (group, fee) in &stats.sum_fee_by_group {
            let count = records.iter().filter(|r| &r.group == group).count() as f64;
            assert_eq!(stats.avg_ticket_by_group[group], fee / count);
        }
        assert_eq!(
            stats.total_fee,
            records.iter().map(|r| r.fee).sum::<f64>()
        );
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let records = sample();
        assert_eq!(summarize(&records), summarize(&records));
    }
}
