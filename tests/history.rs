use std::sync::Arc;
use std::thread;

use postfix_calc::{CalcError, Calculator, History, evaluate_postfix};

#[test]
fn evaluations_append_in_order() {
    let history = History::new();
    for input in ["2+3", "4*5"] {
        Calculator::new(input)
            .and_then(|calc| calc.evaluate(&history))
            .expect("evaluates");
    }

    let entries = history.snapshot();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].expression, "2+3");
    assert_eq!(entries[0].postfix, "2 3 +");
    assert_eq!(entries[0].result, 5.0);
    assert_eq!(entries[1].expression, "4*5");
    assert_eq!(entries[1].postfix, "4 5 *");
    assert_eq!(entries[1].result, 20.0);
}

#[test]
fn mutating_a_snapshot_leaves_history_alone() {
    let history = History::new();
    Calculator::new("2+3")
        .and_then(|calc| calc.evaluate(&history))
        .expect("evaluates");

    let mut snapshot = history.snapshot();
    snapshot[0].result = -1.0;
    snapshot.push(snapshot[0].clone());

    let again = history.snapshot();
    assert_eq!(again.len(), 1);
    assert_eq!(again[0].result, 5.0);
}

#[test]
fn failed_evaluations_record_nothing() {
    let history = History::new();
    let failures = ["7+", "2$2", "bogus(1)", "(0-1)!"];
    for input in failures {
        let calc = Calculator::new(input).expect("parentheses balance");
        assert!(calc.evaluate(&history).is_err(), "{input} should fail");
    }
    assert!(history.is_empty());
}

#[test]
fn rejected_construction_never_reaches_history() {
    let history = History::new();
    let result = Calculator::new("(2+3").and_then(|calc| calc.evaluate(&history));
    assert!(matches!(result, Err(CalcError::ImbalancedParentheses(_))));
    assert!(history.is_empty());
}

#[test]
fn separate_histories_do_not_share_entries() {
    let first = History::new();
    let second = History::new();
    let calc = Calculator::new("9-3").expect("valid expression");
    calc.evaluate(&first).expect("evaluates");
    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
}

#[test]
fn shared_history_collects_from_threads() {
    let history = Arc::new(History::new());
    let workers: Vec<_> = (1..=8)
        .map(|n| {
            let history = Arc::clone(&history);
            thread::spawn(move || {
                let calc = Calculator::new(&format!("{n}*{n}")).expect("valid expression");
                calc.evaluate(&history).expect("evaluates")
            })
        })
        .collect();

    for worker in workers {
        worker.join().expect("worker finished");
    }

    let mut results: Vec<f64> = history.snapshot().iter().map(|entry| entry.result).collect();
    results.sort_by(f64::total_cmp);
    assert_eq!(results, vec![1.0, 4.0, 9.0, 16.0, 25.0, 36.0, 49.0, 64.0]);
}

#[test]
fn standalone_postfix_evaluation_has_no_history() {
    assert_eq!(evaluate_postfix("2 3 4 * +").expect("evaluates"), 14.0);
}
