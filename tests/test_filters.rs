//! End-to-end tests over the shipped MikroTik filter definitions,
//! exercising the full read -> extract -> substitute -> compile -> match
//! pipeline the way a banning component would.

use filter_analyzer::filter::{
    MatcherSet, Placeholders, build_matchers, extract_rules, read_filter_definition,
};
use std::io::Write as _;
use std::path::PathBuf;

fn filter_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fail2ban/filter.d")
}

fn load_filter(name: &str) -> MatcherSet {
    let text = read_filter_definition(&filter_dir(), name).expect("filter file should exist");
    let set = build_matchers(&extract_rules(&text));
    assert!(
        set.diagnostics().is_empty(),
        "shipped filters must compile cleanly: {:?}",
        set.diagnostics()
    );
    set
}

#[test]
fn test_login_filter_matches_failed_logins() {
    let set = load_filter("mikrotik-login.conf");
    let log_lines = [
        "Jan 10 12:34:56 mikrotik login failure for user admin from 192.168.1.100 via ssh",
        "Jan 10 12:34:57 mikrotik login failure for user test from 10.0.0.50 via ssh",
        "login failure for user root from 172.16.0.1 via ssh",
        "Jan 10 12:34:56 mikrotik login failure for user admin from 192.168.1.100 via winbox",
        "login failure for user test from 10.0.0.50 via winbox",
        "Jan 10 12:34:56 mikrotik login failure for user admin from 192.168.1.100 via api",
        "login failure for user apiuser from 10.0.0.50 via api",
    ];
    for log_line in log_lines {
        assert!(set.any_match(log_line), "should match: {log_line}");
    }
}

#[test]
fn test_login_filter_ignores_successful_logins() {
    let set = load_filter("mikrotik-login.conf");
    let log_lines = [
        "Jan 10 12:34:56 mikrotik user admin logged in from 192.168.1.100 via ssh",
        "Jan 10 12:34:57 mikrotik admin logged in via winbox",
        "authentication succeeded for user admin from 192.168.1.100",
    ];
    for log_line in log_lines {
        assert!(!set.any_match(log_line), "should NOT match: {log_line}");
    }
}

#[test]
fn test_l2tp_filter_matches_chap_failures() {
    let set = load_filter("mikrotik-l2tp.conf");
    let log_lines = [
        "Jan 10 12:34:56 mikrotik l2tp,ppp,info <192.168.1.100>: sent CHAP Failure id=0x5",
        "l2tp,ppp,info <10.0.0.50>: sent CHAP Failure id=0x3",
        "l2tp <172.16.0.1>: sent CHAP Failure id=0x1",
        "Jan 10 12:34:56 mikrotik sstp,ppp,info <192.168.1.100>: sent CHAP Failure id=0x5",
        "sstp,ppp,info <10.0.0.50>: sent CHAP Failure id=0x3",
        "sstp <172.16.0.1>: sent CHAP Failure id=0x1",
    ];
    for log_line in log_lines {
        assert!(set.any_match(log_line), "should match: {log_line}");
    }
}

#[test]
fn test_l2tp_filter_ignores_successful_sessions() {
    let set = load_filter("mikrotik-l2tp.conf");
    let log_lines = [
        "Jan 10 12:34:56 mikrotik l2tp,ppp,info <192.168.1.100>: authenticated",
        "l2tp,ppp,info <10.0.0.50>: connected",
        "l2tp user testuser logged in from 192.168.1.100",
    ];
    for log_line in log_lines {
        assert!(!set.any_match(log_line), "should NOT match: {log_line}");
    }
}

#[test]
fn test_ovpn_filter_matches_authentication_failures() {
    let set = load_filter("mikrotik-ovpn.conf");
    let log_lines = [
        "Jan 10 12:34:56 mikrotik ovpn,info <192.168.1.100>: user 'testuser' authentication failed",
        "ovpn,error <10.0.0.50> authentication failed",
        "openvpn,info <172.16.0.1>: authentication failed",
    ];
    for log_line in log_lines {
        assert!(set.any_match(log_line), "should match: {log_line}");
    }
}

#[test]
fn test_ovpn_filter_ignores_successful_sessions() {
    let set = load_filter("mikrotik-ovpn.conf");
    let log_lines = [
        "Jan 10 12:34:56 mikrotik ovpn,info <192.168.1.100>: authenticated",
        "ovpn,info <10.0.0.50>: connected",
        "openvpn user testuser logged in from 192.168.1.100",
    ];
    for log_line in log_lines {
        assert!(!set.any_match(log_line), "should NOT match: {log_line}");
    }
}

#[test]
fn test_out_of_range_octets_never_count_as_a_host() {
    let set = load_filter("mikrotik-login.conf");
    assert!(!set.any_match("login failure for user admin from 300.1.1.1 via ssh"));
    assert!(!set.any_match("login failure for user admin from 999.999.999.999 via ssh"));
}

#[test]
fn test_filter_with_broken_fragment_still_bans_on_valid_ones() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("mixed.conf");
    let mut file = std::fs::File::create(&path).expect("create filter file");
    writeln!(file, "[Definition]").unwrap();
    writeln!(
        file,
        "failregex = ^.*login failure for user \\S+ from <HOST>"
    )
    .unwrap();
    writeln!(file, "            ^broken (?=lookahead) fragment").unwrap();
    writeln!(file, "            ^.*sent CHAP Failure").unwrap();
    writeln!(file, "ignoreregex =").unwrap();

    let text = read_filter_definition(dir.path(), "mixed.conf").expect("filter should load");
    let set = MatcherSet::build(&extract_rules(&text), &Placeholders::default());

    assert_eq!(set.len(), 2);
    assert_eq!(set.diagnostics().len(), 1);
    assert!(set.any_match("login failure for user admin from 10.0.0.1"));
    assert!(set.any_match("l2tp,ppp,info <10.0.0.50>: sent CHAP Failure id=0x3"));
}
