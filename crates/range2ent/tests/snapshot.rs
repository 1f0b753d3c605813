// SPDX-FileCopyrightText: 2025 xfnw
//
// SPDX-License-Identifier: MIT

use std::process::{Command, Output};

static BIN: &str = env!("CARGO_BIN_EXE_range2ent");

fn command_output(args: &[&str]) -> Output {
    Command::new(BIN).args(args).output().unwrap()
}

fn snapshot(args: &[&str], expected: &str) {
    let output = command_output(args);

    assert!(output.status.success());
    assert!(output.stderr.is_empty());

    let output = String::from_utf8(output.stdout).unwrap();
    let mut lines = output.lines();

    for (n, el) in expected.lines().enumerate() {
        assert_eq!(lines.next().unwrap(), el, "line {}", n + 1);
    }

    assert_eq!(lines.next(), None);
}

#[test]
fn one_to_six() {
    snapshot(
        &["1", "6"],
        "patt: 00000006  (6 - 6)
mask: ffffffff
patt: 00000004  (4 - 5)
mask: fffffffe
patt: 00000002  (2 - 3)
mask: fffffffe
patt: 00000001  (1 - 1)
mask: ffffffff",
    );
}

#[test]
fn tie_stays_direct() {
    snapshot(
        &["1", "6", "--optimize"],
        "patt: 00000006  (6 - 6)
mask: ffffffff
patt: 00000004  (4 - 5)
mask: fffffffe
patt: 00000002  (2 - 3)
mask: fffffffe
patt: 00000001  (1 - 1)
mask: ffffffff",
    );
}

#[test]
fn optimized_split() {
    snapshot(
        &["1", "0xe", "-o"],
        "Reject: 0 - 0
patt: 00000000  (0 - 0)
mask: ffffffff
Accept: 0 - 14
patt: 0000000e  (14 - 14)
mask: ffffffff
patt: 0000000c  (12 - 13)
mask: fffffffe
patt: 00000008  (8 - 11)
mask: fffffffc
patt: 00000000  (0 - 7)
mask: fffffff8",
    );
}

#[test]
fn whole_space() {
    snapshot(
        &["0", "0xffffffff"],
        "patt: 00000000  (0 - 4294967295)
mask: 00000000",
    );
}

#[test]
fn addresses() {
    snapshot(&["10.0.0.0", "10.0.0.255", "--prefix"], "10.0.0.0/24");
    snapshot(
        &["192.168.1.1", "192.168.1.6", "-p"],
        "192.168.1.6/32
192.168.1.4/31
192.168.1.2/31
192.168.1.1/32",
    );
}

#[test]
fn verbose_goes_to_stderr() {
    let output = command_output(&["1", "14", "-o", "-v"]);
    assert!(output.status.success());
    assert_eq!(
        str::from_utf8(&output.stderr).unwrap(),
        "split encoding: 1 reject + 4 accept entries\n"
    );
}

#[test]
fn range_too_large() {
    let output = command_output(&["5", "0xffffffff"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert_eq!(
        str::from_utf8(&output.stderr).unwrap(),
        "could not split range: end must be below 0xffffffff unless start is 0: st: 5, end: 4294967295\n"
    );
}

#[test]
fn too_many_entries() {
    let output = command_output(&["1", "0xfffffffe"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    let output = command_output(&["1", "0xfffffffe", "--optimize"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("Reject: 0 - 0\n"));
    assert_eq!(stdout.lines().filter(|l| l.starts_with("patt:")).count(), 33);
}

#[test]
fn invalid_argument() {
    let output = command_output(&["fox", "5"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("not a number or ipv4 address: fox"), "{stderr}");
}
