//! Property tests for merger commutativity.
//!
//! The final payload and the missing-field accounting must not depend on
//! which parallel task finished first, i.e. on the order outcomes entered
//! the mapping.

mod common;

use proptest::prelude::*;
use rustc_hash::FxHashMap;
use std::time::Duration;

use lexweave::catalog::TaskCatalog;
use lexweave::merge::merge_section;
use lexweave::payload::Fragment;
use lexweave::pool::{FanOutReport, TaskOutcome};
use lexweave::section::{Section, SenseAddress, TaskId, TaskKind};

use common::*;

fn outcome_for(kind: TaskKind, succeed: bool, latency_ms: u64) -> TaskOutcome {
    let result = if succeed {
        Ok(Fragment::parse(kind, canned_fragment(TaskCatalog::schema(kind))).unwrap())
    } else {
        Err(lexweave::error::TaskError::Backend {
            kind,
            message: "scripted failure".to_string(),
        })
    };
    TaskOutcome {
        result,
        elapsed: Duration::from_millis(latency_ms),
    }
}

fn merge_with_order(success_mask: [bool; 4], order: &[usize]) -> (Option<String>, Vec<String>) {
    let address = SenseAddress::new(0, 0);
    let kinds = TaskCatalog::kinds(Section::DetailedSense);
    let mut outcomes = FxHashMap::default();
    for &i in order {
        let kind = kinds[i];
        outcomes.insert(
            TaskId::sense_scoped(kind, address),
            outcome_for(kind, success_mask[i], 10 + 10 * i as u64),
        );
    }
    let fanout = FanOutReport {
        outcomes,
        ceiling_hit: false,
    };
    let report = merge_section(
        Section::DetailedSense,
        &entry_set_with_senses(1),
        Some(address),
        &fanout,
    );
    let payload_json = report
        .payload
        .map(|p| serde_json::to_string(&p).unwrap());
    (payload_json, report.missing_fields)
}

proptest! {
    #[test]
    fn merge_is_commutative_over_completion_order(
        success_mask in any::<[bool; 4]>(),
        order in Just((0..4usize).collect::<Vec<_>>()).prop_shuffle(),
    ) {
        let canonical = merge_with_order(success_mask, &[0, 1, 2, 3]);
        let permuted = merge_with_order(success_mask, &order);
        prop_assert_eq!(canonical.0, permuted.0);
        prop_assert_eq!(canonical.1, permuted.1);
    }

    #[test]
    fn missing_fields_match_failed_tasks_exactly(
        success_mask in any::<[bool; 4]>(),
    ) {
        let (_, missing) = merge_with_order(success_mask, &[0, 1, 2, 3]);
        let kinds = TaskCatalog::kinds(Section::DetailedSense);
        let expected: Vec<String> = kinds
            .iter()
            .enumerate()
            .filter(|(i, _)| !success_mask[*i])
            .flat_map(|(_, kind)| kind.fields().iter().map(|f| (*f).to_string()))
            .collect();
        prop_assert_eq!(missing, expected);
    }
}
