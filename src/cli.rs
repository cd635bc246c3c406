use clap::{ArgAction, Parser};
use std::path::PathBuf;
use svn_ripper::config::Config;

#[derive(Parser, Debug)]
#[command(name = "svn-ripper", version)]
#[command(about = "Recover source from exposed .svn working-copy metadata", long_about = None)]
pub struct Cli {
    /// Single target base URL
    #[arg(short, long)]
    pub url: Option<String>,

    /// File with one target base URL per line
    #[arg(short, long, value_name = "FILE")]
    pub list: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// HTML report template (built-in template if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Proxy URL for all requests (http, https or socks5)
    #[arg(short, long)]
    pub proxy: Option<String>,

    /// Skip TLS certificate verification
    #[arg(short = 'k', long)]
    pub insecure: bool,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Concurrent downloads per target
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Package each target's output directory into a zip archive
    #[arg(long)]
    pub archive: bool,

    /// Write every target straight into the output directory
    #[arg(long)]
    pub flat: bool,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Do not print the banner
    #[arg(long)]
    pub no_banner: bool,
}

impl Cli {
    /// Flags override whatever the config sources produced
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(ref out) = self.out {
            config.recovery.output_dir = out.clone();
        }
        if let Some(ref template) = self.template {
            config.recovery.template = Some(template.clone());
        }
        if let Some(ref proxy) = self.proxy {
            config.transport.proxy = Some(proxy.clone());
        }
        if self.insecure {
            config.transport.accept_invalid_certs = true;
        }
        if let Some(timeout) = self.timeout {
            config.transport.request_timeout_secs = timeout;
        }
        if let Some(workers) = self.workers {
            config.recovery.workers = workers;
        }
        if self.archive {
            config.recovery.archive = true;
        }
        if self.flat {
            config.recovery.per_target_dirs = false;
        }
    }
}

pub const BANNER: &str = r"
 ___ __   __ _  _        ___  _
/ __|\ \ / /| \| | ___  | _ \(_) _ __  _ __  ___  _ _
\__ \ \ V / | .` ||___| |   /| || '_ \| '_ \/ -_)| '_|
|___/  \_/  |_|\_|      |_|_\|_|| .__/| .__/\___||_|
                                |_|   |_|
      Recover source from leaked .svn metadata
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "svn-ripper",
            "-u",
            "http://example.com/",
            "-o",
            "loot",
            "-k",
            "--timeout",
            "3",
            "-w",
            "2",
            "--flat",
            "-vv",
        ]);
        let mut config = Config::default();
        cli.apply_to(&mut config);

        assert_eq!(cli.verbose, 2);
        assert_eq!(config.recovery.output_dir, PathBuf::from("loot"));
        assert!(config.transport.accept_invalid_certs);
        assert_eq!(config.transport.request_timeout_secs, 3);
        assert_eq!(config.recovery.workers, 2);
        assert!(!config.recovery.per_target_dirs);
        assert!(!config.recovery.archive);
    }

    #[test]
    fn test_defaults_leave_config_alone() {
        let cli = Cli::parse_from(["svn-ripper", "-l", "targets.txt"]);
        let mut config = Config::default();
        cli.apply_to(&mut config);

        assert_eq!(cli.list, Some(PathBuf::from("targets.txt")));
        assert_eq!(config.recovery.workers, 8);
        assert!(config.recovery.per_target_dirs);
    }
}
