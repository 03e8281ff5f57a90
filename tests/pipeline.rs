//! End-to-end pipeline tests.
//!
//! These run the full input -> workers -> writer pipeline against inputs that
//! never touch the network: IP literals take the pass-through path, and hosts
//! with empty labels fail name parsing before any query is sent.

use std::io::Write;
use std::path::PathBuf;

use tempfile::TempDir;

use dns_sweep::{run_probe, Config, OutputMode};

fn write_input(dir: &TempDir, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    path
}

fn offline_config(hosts: PathBuf, output: PathBuf) -> Config {
    Config {
        hosts_file: Some(hosts),
        output_file: Some(output),
        silent: true,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_mixed_input_drops_failures_silently() {
    let dir = tempfile::tempdir().unwrap();
    let hosts = write_input(
        &dir,
        "hosts.txt",
        &["# fleet snapshot", "", "1.2.3.4", "invalid..hostname"],
    );
    let output = dir.path().join("out.txt");

    let config = Config {
        output_mode: OutputMode::Ip,
        concurrency: 1,
        ..offline_config(hosts, output.clone())
    };
    let report = run_probe(config).await.unwrap();

    assert_eq!(report.attempted, 2);
    assert_eq!(report.resolved, 1);
    assert_eq!(report.dropped, 1);

    // The failed host leaves no trace in the output
    let contents = std::fs::read_to_string(&output).unwrap();
    assert_eq!(contents, "1.2.3.4\n");
}

#[tokio::test]
async fn test_empty_input_terminates_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let hosts = write_input(&dir, "hosts.txt", &[]);
    let output = dir.path().join("out.txt");

    let report = run_probe(offline_config(hosts, output.clone()))
        .await
        .unwrap();

    assert_eq!(report.attempted, 0);
    assert_eq!(report.resolved, 0);
    assert_eq!(report.dropped, 0);
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "");
}

#[tokio::test]
async fn test_output_set_is_concurrency_independent() {
    let dir = tempfile::tempdir().unwrap();
    let lines: Vec<String> = (1..=20).map(|i| format!("198.51.100.{i}")).collect();
    let line_refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let hosts = write_input(&dir, "hosts.txt", &line_refs);

    let mut outputs = Vec::new();
    for (name, concurrency) in [("serial.txt", 1), ("parallel.txt", 8)] {
        let output = dir.path().join(name);
        let config = Config {
            output_mode: OutputMode::Ip,
            concurrency,
            ..offline_config(hosts.clone(), output.clone())
        };
        let report = run_probe(config).await.unwrap();
        assert_eq!(report.resolved, 20);

        let mut got: Vec<String> = std::fs::read_to_string(&output)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect();
        got.sort();
        outputs.push(got);
    }

    assert_eq!(outputs[0], outputs[1]);
    let mut expected = lines.clone();
    expected.sort();
    assert_eq!(outputs[0], expected);
}

#[tokio::test]
async fn test_input_much_larger_than_pool_streams_through() {
    // Hosts far outnumber workers; every line must still come out exactly once
    let dir = tempfile::tempdir().unwrap();
    let lines: Vec<String> = (0..500)
        .map(|i| format!("10.0.{}.{}", i / 256, i % 256))
        .collect();
    let line_refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let hosts = write_input(&dir, "hosts.txt", &line_refs);
    let output = dir.path().join("out.txt");

    let config = Config {
        output_mode: OutputMode::Ip,
        concurrency: 4,
        ..offline_config(hosts, output.clone())
    };
    let report = run_probe(config).await.unwrap();

    assert_eq!(report.attempted, 500);
    assert_eq!(report.resolved, 500);

    let contents = std::fs::read_to_string(&output).unwrap();
    let mut got: Vec<&str> = contents.lines().collect();
    got.sort();
    let mut expected: Vec<&str> = line_refs.clone();
    expected.sort();
    assert_eq!(got, expected);
}

#[tokio::test]
async fn test_url_input_is_reduced_to_its_host() {
    let dir = tempfile::tempdir().unwrap();
    let hosts = write_input(&dir, "hosts.txt", &["https://203.0.113.7/login?next=/"]);
    let output = dir.path().join("out.txt");

    let config = Config {
        output_mode: OutputMode::Domain,
        ..offline_config(hosts, output.clone())
    };
    let report = run_probe(config).await.unwrap();

    assert_eq!(report.resolved, 1);
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "203.0.113.7\n");
}

#[tokio::test]
async fn test_json_mode_emits_one_object_per_line() {
    let dir = tempfile::tempdir().unwrap();
    let hosts = write_input(&dir, "hosts.txt", &["1.2.3.4"]);
    let output = dir.path().join("out.json");

    let config = Config {
        output_mode: OutputMode::Json,
        ..offline_config(hosts, output.clone())
    };
    run_probe(config).await.unwrap();

    let contents = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        contents,
        "{\"Domain\":\"1.2.3.4\",\"Response\":\"1.2.3.4\",\"IP\":\"1.2.3.4\"}\n"
    );
}

#[tokio::test]
async fn test_rate_limited_run_completes() {
    let dir = tempfile::tempdir().unwrap();
    let hosts = write_input(&dir, "hosts.txt", &["1.2.3.4", "5.6.7.8", "9.10.11.12"]);
    let output = dir.path().join("out.txt");

    let config = Config {
        output_mode: OutputMode::Ip,
        rate_limit_qps: 50,
        ..offline_config(hosts, output.clone())
    };
    let report = run_probe(config).await.unwrap();

    assert_eq!(report.attempted, 3);
    assert_eq!(report.resolved, 3);

    let contents = std::fs::read_to_string(&output).unwrap();
    let mut got: Vec<&str> = contents.lines().collect();
    got.sort();
    assert_eq!(got, vec!["1.2.3.4", "5.6.7.8", "9.10.11.12"]);
}

#[tokio::test]
async fn test_missing_hosts_file_is_a_fatal_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        hosts_file: Some(dir.path().join("no-such-file.txt")),
        output_file: Some(dir.path().join("out.txt")),
        silent: true,
        ..Default::default()
    };
    let err = run_probe(config).await.unwrap_err();
    assert!(err.to_string().contains("hosts file"));
}

#[tokio::test]
async fn test_resolvers_file_replaces_defaults() {
    // A resolvers file pointing at a blackhole must not break the IP-literal
    // pass-through path, which never consults the resolver pool.
    let dir = tempfile::tempdir().unwrap();
    let resolvers = write_input(&dir, "resolvers.txt", &["# lab resolver", "192.0.2.1:5353"]);
    let hosts = write_input(&dir, "hosts.txt", &["1.2.3.4"]);
    let output = dir.path().join("out.txt");

    let config = Config {
        resolvers_file: Some(resolvers),
        output_mode: OutputMode::Ip,
        ..offline_config(hosts, output.clone())
    };
    let report = run_probe(config).await.unwrap();

    assert_eq!(report.resolved, 1);
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "1.2.3.4\n");
}
