//! `sonar verify-sites`: prune dead entries from the popular-sites list.
//!
//! Every site is resolved through DNS, then fetched over https and http, with
//! and without `www.`. Sites whose domain does not resolve, or that answer
//! 404, 410 or 451, are reported as removable. Other failures are reported
//! but keep the entry, since they are often transient.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::future::Future;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use sonar_core::suggest::{ReferenceData, SiteEntry};

/// Status codes that mean the site is gone for good.
pub const REMOVABLE_STATUS: [u16; 3] = [404, 410, 451];
/// Status codes worth retrying.
const RETRY_STATUS: [u16; 5] = [429, 500, 502, 503, 504];
const RETRY_ATTEMPTS: u32 = 3;
const BACKOFF: Duration = Duration::from_millis(600);
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

#[derive(clap::Args, Debug)]
pub struct VerifyArgs {
    /// Rewrite the sites file without the removable entries (needs --sites).
    #[arg(long)]
    pub write: bool,
    /// Number of sites checked in parallel.
    #[arg(long, default_value_t = 20)]
    pub concurrency: usize,
    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,
    /// Write a JSON report of removed sites to this file.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Outcome of checking one site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Reachable { status: u16 },
    /// Failing, but possibly transiently; the entry is kept.
    Unhealthy { reason: String },
    Removable { reason: String },
}

impl Verdict {
    pub const fn is_removable(&self) -> bool {
        matches!(self, Self::Removable { .. })
    }

    fn label(&self) -> String {
        match self {
            Self::Reachable { status } => format!("OK {status}"),
            Self::Unhealthy { reason } | Self::Removable { reason } => reason.clone(),
        }
    }
}

/// Network access used by the checker.
pub trait SiteProbe: Send + Sync + 'static {
    /// Whether `domain` resolves to at least one address.
    fn resolves(&self, domain: &str) -> impl Future<Output = bool> + Send;
    /// Final status code of a GET for `url`, following redirects.
    fn status(&self, url: &str) -> impl Future<Output = Result<u16, String>> + Send;
}

/// Probe backed by the system resolver and reqwest.
pub struct HttpProbe {
    http: reqwest::Client,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        // reqwest is built with rustls-no-provider; `Err` means a provider is
        // already installed.
        let _ = rustls::crypto::ring::default_provider().install_default();
        let http = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { http })
    }
}

impl SiteProbe for HttpProbe {
    async fn resolves(&self, domain: &str) -> bool {
        match tokio::net::lookup_host((domain, 443)).await {
            Ok(mut addrs) => addrs.next().is_some(),
            Err(e) => {
                debug!(domain, error = %e, "DNS lookup failed");
                false
            }
        }
    }

    async fn status(&self, url: &str) -> Result<u16, String> {
        let mut attempt = 0;
        loop {
            let outcome = self.http.get(url).send().await;
            let retryable = match &outcome {
                Ok(resp) => RETRY_STATUS.contains(&resp.status().as_u16()),
                Err(e) => e.is_connect() || e.is_timeout(),
            };
            attempt += 1;
            if !retryable || attempt >= RETRY_ATTEMPTS {
                return outcome
                    .map(|resp| resp.status().as_u16())
                    .map_err(|e| error_kind(&e));
            }
            tokio::time::sleep(BACKOFF * 2u32.pow(attempt - 1)).await;
        }
    }
}

fn error_kind(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Timeout".to_string()
    } else if e.is_connect() {
        "ConnectionError".to_string()
    } else if e.is_redirect() {
        "TooManyRedirects".to_string()
    } else {
        "RequestError".to_string()
    }
}

/// Check one site: DNS first, then https/http with and without `www.`.
pub async fn check_site<P: SiteProbe>(probe: &P, domain: &str) -> Verdict {
    if !probe.resolves(domain).await {
        return Verdict::Removable {
            reason: "DNS Not Found".to_string(),
        };
    }

    let mut last_error = "Unreachable".to_string();
    for prefix in ["", "www."] {
        for scheme in ["https", "http"] {
            let url = format!("{scheme}://{prefix}{domain}");
            match probe.status(&url).await {
                Ok(code) if REMOVABLE_STATUS.contains(&code) => {
                    return Verdict::Removable {
                        reason: format!("{code} DEAD"),
                    };
                }
                Ok(code) if code < 400 => return Verdict::Reachable { status: code },
                Ok(code) if scheme == "http" => {
                    return Verdict::Unhealthy {
                        reason: format!("HTTP {code}"),
                    };
                }
                Ok(_) => {}
                Err(e) => last_error = e,
            }
        }
    }
    Verdict::Unhealthy { reason: last_error }
}

/// A site dropped from the list, as written to the report.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RemovedSite {
    pub domain: String,
    pub title: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyReport {
    pub removed: Vec<RemovedSite>,
    pub remaining_count: usize,
    pub removed_count: usize,
    pub execution_time: f64,
}

/// Check every site, at most `concurrency` at a time, reporting each result
/// to `out` as it completes. Returns the kept sites, in input order, and the
/// removed ones.
pub async fn verify_all<P: SiteProbe>(
    probe: Arc<P>,
    sites: &[SiteEntry],
    concurrency: usize,
    out: &mut impl Write,
) -> anyhow::Result<(Vec<SiteEntry>, Vec<RemovedSite>)> {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();
    for (index, site) in sites.iter().enumerate() {
        let probe = Arc::clone(&probe);
        let permits = Arc::clone(&permits);
        let domain = site.domain.clone();
        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await;
            (index, check_site(probe.as_ref(), &domain).await)
        });
    }

    let mut verdicts: Vec<Option<Verdict>> = vec![None; sites.len()];
    let mut done = 0;
    while let Some(joined) = tasks.join_next().await {
        let (index, verdict) = joined.context("site check task failed")?;
        done += 1;
        writeln!(
            out,
            "[{done}/{}] {:<16} {}",
            sites.len(),
            verdict.label(),
            sites[index].domain
        )?;
        verdicts[index] = Some(verdict);
    }

    let mut kept = Vec::new();
    let mut removed = Vec::new();
    for (site, verdict) in sites.iter().zip(verdicts) {
        match verdict {
            Some(Verdict::Removable { reason }) => removed.push(RemovedSite {
                domain: site.domain.clone(),
                title: site.title.clone(),
                reason,
            }),
            _ => kept.push(site.clone()),
        }
    }
    Ok((kept, removed))
}

/// Process exit status for a run that found `removed` removable sites.
pub fn exit_status(removed: usize) -> u8 {
    u8::from(removed > 0)
}

/// Rewrite a sites file in the same two-space JSON layout it is read from.
pub fn write_sites(path: &Path, sites: &[SiteEntry]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(sites)?;
    std::fs::write(path, json + "\n").with_context(|| format!("writing {}", path.display()))
}

/// Run `sonar verify-sites`. Returns the number of removable sites.
pub async fn run(args: &VerifyArgs, sites_path: Option<&Path>) -> anyhow::Result<usize> {
    let sites: Vec<SiteEntry> = match sites_path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?
        }
        None => {
            if args.write {
                anyhow::bail!("--write needs a sites file (pass --sites or set SONAR_SITES_PATH)");
            }
            ReferenceData::bundled().sites.to_vec()
        }
    };

    let mut out = io::stdout();
    writeln!(out, "Total sites: {}", sites.len())?;

    let probe = Arc::new(HttpProbe::new(Duration::from_secs(args.timeout_secs))?);
    let start = Instant::now();
    let (kept, removed) = verify_all(probe, &sites, args.concurrency, &mut out).await?;
    let elapsed = start.elapsed().as_secs_f64();

    writeln!(out, "\nChecked in {elapsed:.2}s")?;
    writeln!(out, "Remaining sites: {}", kept.len())?;
    writeln!(out, "Removable sites: {}", removed.len())?;
    for site in &removed {
        writeln!(out, "  - {} ({}): {}", site.domain, site.title, site.reason)?;
    }

    if args.write {
        if let Some(path) = sites_path {
            write_sites(path, &kept)?;
            writeln!(out, "Rewrote {}", path.display())?;
        }
    }

    if let Some(report_path) = &args.report {
        let report = VerifyReport {
            remaining_count: kept.len(),
            removed_count: removed.len(),
            removed,
            execution_time: elapsed,
        };
        std::fs::write(report_path, serde_json::to_string_pretty(&report)?)?;
        writeln!(out, "Report written to {}", report_path.display())?;
        return Ok(report.removed_count);
    }

    if !removed.is_empty() {
        warn!(count = removed.len(), "Removable sites found");
    }
    Ok(removed.len())
}
