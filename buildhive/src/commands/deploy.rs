//! Secure-copy deployment command.

use std::path::Path;

use anyhow::Result;
use buildhive_core::{Config, Deployer};

use crate::formatting::{print_fail_banner, print_success_banner};

use super::collect_dir;

pub fn cmd_deploy(root: &Path) -> Result<()> {
    let config = Config::load(root)?;

    let Some(deploy_config) = &config.deploy else {
        print_fail_banner("No [deploy] section in buildhive.toml");
        std::process::exit(1);
    };

    let deployer = Deployer::new(deploy_config);
    match deployer.deploy(&collect_dir(root, &config)) {
        Ok(()) => {
            print_success_banner(&format!("Deployed to {}", deployer.remote()));
            Ok(())
        }
        Err(e) => {
            print_fail_banner(&format!("Deploy failed: {}", e));
            std::process::exit(1);
        }
    }
}
