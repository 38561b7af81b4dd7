mod commands;
mod terminal;

use commands::{CommandLine, Commands, backup, issue, scan};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init(commands.verbose, commands.quiet)?;
    let mut cfg = commands.load_config()?;
    print::banner(commands.quiet);

    match commands.command {
        Commands::Scan {
            range,
            login,
            output,
            concurrency,
            timeout,
            archive,
            archive_login,
        } => {
            if let Some(concurrency) = concurrency {
                cfg.scan.concurrency = concurrency;
            }
            if let Some(timeout) = timeout {
                cfg.scan.host_timeout = timeout;
            }
            let job = scan::ScanJob {
                range,
                credentials: login.credentials()?,
                output: output.unwrap_or_else(|| cfg.report.path.clone()),
                archive_credentials: archive_login.credentials(&cfg),
                archive,
            };
            print::header("starting inventory scan", commands.quiet);
            scan::scan(job, &cfg, commands.quiet).await
        }
        Commands::Backup {
            range,
            login,
            archive_login,
        } => {
            print::header("starting configuration backup", commands.quiet);
            let credentials = login.credentials()?;
            let archive_credentials = archive_login.credentials(&cfg);
            backup::backup(&range, &credentials, archive_credentials, &cfg, commands.quiet).await
        }
        Commands::Issue {
            interface,
            address,
            vrf_forwarding,
            admin_secret,
        } => {
            let request = issue::IssueRequest {
                interface,
                address,
                vrf_forwarding,
                admin_secret,
            };
            issue::issue(request, &cfg, commands.quiet).await
        }
    }
}
