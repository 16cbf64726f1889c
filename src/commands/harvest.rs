//! Harvest command implementation

use crate::config::HarvestSettings;
use crate::harvest::{HarvestReport, Harvester, HttpIssuerFetcher, TlsChainSource};
use crate::output::{print_harvest_summary, print_json};
use crate::utils::progress::print_header;
use crate::utils::{HarvestError, Result};

/// Run the harvest command.
///
/// Only client setup can fail here; per-host failures end up in the
/// returned report.
pub async fn run_harvest(settings: &HarvestSettings, json: bool) -> Result<HarvestReport> {
    settings.validate()?;

    std::fs::create_dir_all(&settings.output_dir).map_err(|e| HarvestError::Write {
        path: settings.output_dir.display().to_string(),
        message: e.to_string(),
    })?;

    let source = TlsChainSource::new(settings.connect_timeout(), settings.handshake_timeout())?;
    let fetcher = HttpIssuerFetcher::new(settings.fetch_timeout())?;
    let mut harvester = Harvester::new(source, fetcher, settings.port, settings.output_dir.clone());

    if json {
        harvester = harvester.quiet();
    } else {
        print_header(&format!(
            "Harvesting {} host(s) into {}",
            settings.hosts.len(),
            settings.output_dir.display()
        ));
    }

    let report = harvester.run(&settings.hosts).await;

    if json {
        print_json(&report)?;
    } else {
        print_harvest_summary(&report);
    }

    Ok(report)
}
