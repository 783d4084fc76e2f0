//! Cluster status reports.

use colshell::FormatEvent;
use colshell_storage::ClusterLayout;

use crate::common::{s, TestShell};

#[test]
fn summary_of_an_empty_cluster() {
    let mut t = TestShell::with_layout(ClusterLayout::empty());
    t.ok("status", &[s("summary")]);
    assert_eq!(
        t.out.events()[0],
        FormatEvent::Line("0 servers, 0 dead, 0.0000 average load".into())
    );
}

#[test]
fn summary_is_the_default_level() {
    let mut t = TestShell::with_layout(ClusterLayout::with_servers(3));
    t.ok("status", &[]);
    let summary = t.out.lines()[0].to_string();
    t.ok("status", &[s("summary")]);
    assert_eq!(t.out.lines()[0], summary);
    assert!(summary.starts_with("3 servers, 0 dead"));
}

#[test]
fn detailed_lists_every_server() {
    let mut t = TestShell::with_layout(ClusterLayout::with_servers(2));
    t.ok("create", &[s("t1"), s("x")]);
    t.ok("status", &[s("detailed")]);
    let lines = t.out.lines();
    assert!(lines.iter().any(|l| l.contains("2 live servers")));
}
