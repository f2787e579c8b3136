use std::fs;
use std::process::{Child, Command as StdCommand};

use assert_cmd::Command;
use predicates::prelude::*;

/// Check if running as root
fn is_root() -> bool {
    unsafe { libc::getuid() == 0 }
}

/// A pid that cannot exist (above the kernel's pid_max ceiling)
const MISSING_PID: &str = "2147483647";

#[test]
fn test_help_command() {
    Command::new(env!("CARGO_BIN_EXE_vethpeer"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("veth"))
        .stdout(predicate::str::contains("<PID>"))
        .stdout(predicate::str::contains("[INTERFACE]"))
        .stdout(predicate::str::contains("--proc-root"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_version_command() {
    Command::new(env!("CARGO_BIN_EXE_vethpeer"))
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("vethpeer"));
}

#[test]
fn test_missing_pid() {
    Command::new(env!("CARGO_BIN_EXE_vethpeer"))
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_invalid_interface_name() {
    Command::new(env!("CARGO_BIN_EXE_vethpeer"))
        .arg("1")
        .arg("not a name")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("invalid"));
}

#[test]
fn test_unknown_option_exit_code() {
    Command::new(env!("CARGO_BIN_EXE_vethpeer"))
        .arg("--no-such-flag")
        .arg("1")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--no-such-flag"));
}

#[test]
fn test_nonexistent_pid() {
    Command::new(env!("CARGO_BIN_EXE_vethpeer"))
        .arg(MISSING_PID)
        .arg("eth0")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("cannot set network namespace"))
        .stderr(predicate::str::contains("cannot read from worker"))
        .stderr(predicate::str::contains("ERROR").not());
}

#[test]
fn test_non_numeric_pid() {
    Command::new(env!("CARGO_BIN_EXE_vethpeer"))
        .arg("self")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("cannot set network namespace"));
}

#[test]
fn test_missing_proc_root() {
    Command::new(env!("CARGO_BIN_EXE_vethpeer"))
        .arg("--proc-root")
        .arg("/nonexistent-proc-root")
        .arg("1")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot set network namespace"));
}

#[test]
#[ignore] // Requires root
fn test_interface_without_peer_counter() {
    if !is_root() {
        return;
    }

    // lo in our own namespace exposes no peer_ifindex counter
    Command::new(env!("CARGO_BIN_EXE_vethpeer"))
        .arg(std::process::id().to_string())
        .arg("lo")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("cannot find peer ifindex"));
}

/// veth pair with one end inside a throwaway namespace held open by `sleep`
struct VethFixture {
    holder: Child,
}

impl VethFixture {
    const NETNS: &'static str = "vethpeer-test";
    const HOST: &'static str = "vp-host0";
    const CONTAINER: &'static str = "vp-ctr0";

    fn create() -> Self {
        let ip = |args: &[&str]| {
            let status = StdCommand::new("ip").args(args).status().expect("ip");
            assert!(status.success(), "ip {args:?} failed");
        };

        ip(&["netns", "add", Self::NETNS]);
        ip(&[
            "link",
            "add",
            Self::HOST,
            "type",
            "veth",
            "peer",
            "name",
            Self::CONTAINER,
        ]);
        ip(&["link", "set", Self::CONTAINER, "netns", Self::NETNS]);

        let holder = StdCommand::new("ip")
            .args(["netns", "exec", Self::NETNS, "sleep", "60"])
            .spawn()
            .expect("spawn namespace holder");

        // Give `ip netns exec` time to enter the namespace
        std::thread::sleep(std::time::Duration::from_millis(300));

        Self { holder }
    }

    fn host_ifindex(&self) -> String {
        fs::read_to_string(format!("/sys/class/net/{}/ifindex", Self::HOST))
            .expect("host ifindex")
            .trim()
            .to_string()
    }
}

impl Drop for VethFixture {
    fn drop(&mut self) {
        let _ = self.holder.kill();
        let _ = self.holder.wait();
        let _ = StdCommand::new("ip")
            .args(["link", "del", Self::HOST])
            .status();
        let _ = StdCommand::new("ip")
            .args(["netns", "del", Self::NETNS])
            .status();
    }
}

#[test]
#[ignore] // Requires root and iproute2
fn test_veth_peer_end_to_end() {
    if !is_root() {
        return;
    }

    let fixture = VethFixture::create();
    let expected = format!("{} {}", fixture.host_ifindex(), VethFixture::HOST);
    let pid = fixture.holder.id().to_string();

    // Running twice against a stable namespace yields the same answer
    for _ in 0..2 {
        Command::new(env!("CARGO_BIN_EXE_vethpeer"))
            .arg(&pid)
            .arg(VethFixture::CONTAINER)
            .assert()
            .success()
            .stdout(expected.clone());
    }

    Command::new(env!("CARGO_BIN_EXE_vethpeer"))
        .arg("--json")
        .arg(&pid)
        .arg(VethFixture::CONTAINER)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "\"ifname\":\"{}\"",
            VethFixture::HOST
        )));
}
