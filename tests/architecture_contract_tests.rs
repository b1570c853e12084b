//! Architecture contract tests.

mod support;

use support::architecture::{find_lines_containing, find_non_test_lines_containing};

#[test]
fn domain_has_no_framework_or_outer_layer_imports() {
    let hits = find_lines_containing(
        "src/domain",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "crate::port",
            "tokio::",
            "reqwest::",
            "tokio_tungstenite::",
        ],
    );

    assert!(
        hits.is_empty(),
        "found forbidden imports in domain layer: {hits:#?}"
    );
}

#[test]
fn ports_do_not_depend_on_implementations() {
    let hits = find_lines_containing(
        "src/port",
        &[
            "crate::adapter",
            "crate::application",
            "crate::infrastructure",
            "reqwest::",
            "tokio_tungstenite::",
        ],
    );

    assert!(
        hits.is_empty(),
        "found implementation imports in ports: {hits:#?}"
    );
}

#[test]
fn application_reaches_collaborators_through_ports() {
    let hits = find_lines_containing(
        "src/application",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "reqwest::",
            "tokio_tungstenite::",
        ],
    );

    assert!(
        hits.is_empty(),
        "found adapter or infrastructure imports in application layer: {hits:#?}"
    );
}

#[test]
fn outbound_adapters_do_not_call_use_cases() {
    let hits = find_non_test_lines_containing(
        "src/adapter/outbound",
        &["crate::application", "crate::adapter::inbound"],
    );

    assert!(
        hits.is_empty(),
        "found use-case imports in outbound adapters: {hits:#?}"
    );
}

#[test]
fn cli_drives_the_inbound_port_only() {
    let hits = find_non_test_lines_containing(
        "src/adapter/inbound/cli",
        &["crate::application::", "crate::adapter::outbound"],
    );

    assert!(
        hits.is_empty(),
        "found direct application or outbound imports in the CLI: {hits:#?}"
    );
}
