//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a pass-server command pointed at this store.
    ///
    /// Returns a Command configured with:
    /// - HOME set to the temporary home directory, so no user config is read
    /// - PASSWORD_STORE set to the test store
    /// - server and logging overrides from the caller's environment removed
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("pass-server").expect("failed to find pass-server binary");
        cmd.env("HOME", self.home.path());
        cmd.env("XDG_CONFIG_HOME", self.home.path().join(".config"));
        // Windows uses USERPROFILE instead of HOME for home directory
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("PASSWORD_STORE", self.root());
        cmd.env("NO_COLOR", "1");
        for var in [
            "PASS_SERVER_CONFIG",
            "PASS_SERVER_BIND",
            "PASS_SERVER_ENV",
            "PASS_SERVER_LOG",
        ] {
            cmd.env_remove(var);
        }
        cmd.current_dir(self.home.path());
        cmd
    }

    /// Shortcut for `pass-server list`.
    pub fn list(&self) -> Output {
        self.cmd()
            .arg("list")
            .output()
            .expect("failed to run pass-server list")
    }

    /// Shortcut for `pass-server list --json`.
    pub fn list_json(&self) -> Output {
        self.cmd()
            .args(["list", "--json"])
            .output()
            .expect("failed to run pass-server list --json")
    }

    /// Shortcut for `pass-server index`.
    pub fn index(&self) -> Output {
        self.cmd()
            .arg("index")
            .output()
            .expect("failed to run pass-server index")
    }

    /// Write a config file into the temp home and return its path.
    pub fn config(&self, contents: &str) -> std::path::PathBuf {
        let path = self.home.path().join("config.toml");
        std::fs::write(&path, contents).expect("failed to write config");
        path
    }
}
